#![allow(dead_code)]

use assert_cmd::Command;
use std::path::Path;

/// The `taxonomist` binary, isolated from the caller's home and environment
pub fn taxonomist_cmd(home: &Path) -> Command {
    let mut cmd = Command::cargo_bin("taxonomist").expect("binary is built");
    cmd.env("TAXONOMIST_HOME", home)
        .env("NO_COLOR", "1")
        .env_remove("RUST_LOG")
        .env_remove("TAXONOMIST_LOG")
        .env_remove("TAXONOMIST_CONFIG")
        .env_remove("PUBLISHING_API_URL")
        .env_remove("PUBLISHING_API_BEARER_TOKEN");
    cmd
}

/// Same as [`taxonomist_cmd`], pointed at a stub publishing API
pub fn taxonomist_cmd_for(home: &Path, api_url: &str) -> Command {
    let mut cmd = taxonomist_cmd(home);
    cmd.env("PUBLISHING_API_URL", api_url)
        .env("PUBLISHING_API_BEARER_TOKEN", "test-token");
    cmd
}

pub fn content_item(content_id: &str, title: &str, base_path: &str) -> serde_json::Value {
    serde_json::json!({
        "content_id": content_id,
        "title": title,
        "base_path": base_path,
        "description": format!("{} description", title),
        "document_type": "taxon",
        "publication_state": "published",
        "phase": "live",
        "details": {
            "internal_name": format!("{} [internal]", title),
            "notes_for_editors": ""
        }
    })
}
