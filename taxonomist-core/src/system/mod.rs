pub mod paths;

// Re-export commonly used functions
pub use paths::{
    describe_paths, generate_utc_timestamp, taxonomist_config_path, taxonomist_home,
    taxonomist_versions_db,
};
