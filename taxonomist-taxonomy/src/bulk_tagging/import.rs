//! Tag mappings read from a published spreadsheet (CSV export)
//!
//! The sheet needs `content_base_path` and `link_content_id` columns;
//! `link_title` and `link_type` are optional and other columns are ignored.
//! Every cell is trimmed. An empty `link_type` means `taxons`.

use super::migration::TagMapping;
use crate::error::{TaxonomyError, TaxonomyResult};
use reqwest::{Client, StatusCode};
use serde::Deserialize;
use std::time::Duration;
use taxonomist_core::ContentId;
use taxonomist_publishing::TAXONS;
use tracing::{debug, info, warn};

pub const DOWNLOAD_PROBLEM: &str = "There is a problem downloading the spreadsheet";

#[derive(Debug, Deserialize)]
struct SpreadsheetRow {
    #[serde(default)]
    content_base_path: Option<String>,
    #[serde(default)]
    link_title: Option<String>,
    #[serde(default)]
    link_content_id: Option<String>,
    #[serde(default)]
    link_type: Option<String>,
}

impl SpreadsheetRow {
    fn is_blank(&self) -> bool {
        [
            &self.content_base_path,
            &self.link_title,
            &self.link_content_id,
            &self.link_type,
        ]
        .iter()
        .all(|cell| cell.as_deref().map_or(true, str::is_empty))
    }
}

/// Downloads a spreadsheet and turns its rows into [`TagMapping`]s
pub struct TagImporter {
    client: Client,
}

impl TagImporter {
    pub fn new(timeout: Duration) -> TaxonomyResult<Self> {
        let client = Client::builder()
            .timeout(timeout)
            .build()
            .map_err(|e| TaxonomyError::Import(format!("could not build HTTP client: {}", e)))?;
        Ok(Self { client })
    }

    /// Fetch `url` and parse the body. Anything but a 200 yields no mappings.
    pub async fn fetch(&self, url: &str) -> TaxonomyResult<Vec<TagMapping>> {
        debug!("Downloading tag spreadsheet from {}", url);
        let response = self.client.get(url).send().await.map_err(|e| {
            warn!("Downloading {} failed: {}", url, e);
            TaxonomyError::Import(format!("{}: {}", DOWNLOAD_PROBLEM, e))
        })?;

        let status = response.status();
        if status != StatusCode::OK {
            warn!("Downloading {} returned {}", url, status);
            return Err(TaxonomyError::Import(format!(
                "{} (status {})",
                DOWNLOAD_PROBLEM,
                status.as_u16()
            )));
        }

        let body = response
            .text()
            .await
            .map_err(|e| TaxonomyError::Import(format!("{}: {}", DOWNLOAD_PROBLEM, e)))?;
        let mappings = parse_tag_mappings(&body)?;
        info!("Read {} tag mappings from {}", mappings.len(), url);
        Ok(mappings)
    }
}

/// Parse CSV text with a header row into mappings, in row order
pub fn parse_tag_mappings(body: &str) -> TaxonomyResult<Vec<TagMapping>> {
    let mut reader = csv::ReaderBuilder::new()
        .trim(csv::Trim::All)
        .flexible(true)
        .from_reader(body.as_bytes());

    let headers = reader
        .headers()
        .map_err(|e| TaxonomyError::Import(format!("unreadable header row: {}", e)))?;
    for required in ["content_base_path", "link_content_id"] {
        if !headers.iter().any(|h| h == required) {
            return Err(TaxonomyError::Import(format!("missing column {}", required)));
        }
    }

    let mut mappings = Vec::new();
    for (index, row) in reader.deserialize::<SpreadsheetRow>().enumerate() {
        // Row 1 is the header
        let line = index + 2;
        let row = row.map_err(|e| TaxonomyError::Import(format!("row {}: {}", line, e)))?;
        if row.is_blank() {
            continue;
        }

        let base_path = non_empty(row.content_base_path)
            .ok_or_else(|| TaxonomyError::Import(format!("row {}: no content_base_path", line)))?;
        let link_content_id = non_empty(row.link_content_id)
            .ok_or_else(|| TaxonomyError::Import(format!("row {}: no link_content_id", line)))?;

        let mut mapping = TagMapping::new(base_path, ContentId::from(link_content_id))
            .with_link_type(non_empty(row.link_type).unwrap_or_else(|| TAXONS.to_string()));
        mapping.link_title = non_empty(row.link_title);
        mappings.push(mapping);
    }
    Ok(mappings)
}

fn non_empty(cell: Option<String>) -> Option<String> {
    cell.filter(|value| !value.is_empty())
}
