pub mod config;
pub mod taxon;
pub mod versions;
