//! Shelf-Census: a product catalog census crawler
//!
//! This crate walks a shop's two-level category hierarchy (section →
//! subsection, each subsection paginated), records every discovered product
//! exactly once in an append-only tab-separated catalog, captures the
//! product image where one exists, and reports on catalog composition and
//! image sizes.

pub mod assets;
pub mod catalog;
pub mod config;
pub mod crawler;
pub mod output;

use std::path::PathBuf;
use thiserror::Error;

/// Main error type for Shelf-Census operations
#[derive(Debug, Error)]
pub enum CensusError {
    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),

    #[error("Validation error: {0}")]
    Validation(#[from] ValidationError),

    #[error("Fetch error: {0}")]
    Fetch(#[from] FetchError),

    #[error("Catalog integrity error: {0}")]
    Integrity(#[from] IntegrityError),

    #[error("Asset error: {0}")]
    Asset(#[from] AssetError),

    #[error("HTTP client error: {0}")]
    Reqwest(#[from] reqwest::Error),

    #[error("URL parse error: {0}")]
    UrlParse(#[from] url::ParseError),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

/// Configuration-specific errors
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Failed to read config file: {0}")]
    Io(#[from] std::io::Error),

    #[error("Failed to parse TOML: {0}")]
    Parse(#[from] toml::de::Error),

    #[error("Validation error: {0}")]
    Validation(String),

    #[error("Invalid CSS selector '{0}'")]
    InvalidSelector(String),

    #[error("Invalid URL in config: {0}")]
    InvalidUrl(String),
}

/// Item construction errors: a candidate product missing a required field
/// is dropped, never recorded.
#[derive(Debug, Error)]
pub enum ValidationError {
    #[error("missing required field '{0}'")]
    MissingField(&'static str),
}

/// Network or markup failures while fetching a page.
///
/// These are recovered locally during traversal: the failing node yields no
/// further items and the crawl continues with its next sibling.
#[derive(Debug, Error)]
pub enum FetchError {
    #[error("HTTP error for {url}: {source}")]
    Http { url: String, source: reqwest::Error },

    #[error("HTTP status {status} for {url}")]
    Status { url: String, status: u16 },
}

/// Failures while downloading or writing an image file.
///
/// The catalog record itself is kept; only the local asset is missing.
#[derive(Debug, Error)]
pub enum AssetError {
    #[error("failed to download asset from {url}: {source}")]
    Fetch {
        url: String,
        #[source]
        source: FetchError,
    },

    #[error("failed to write asset {path}: {source}")]
    Io {
        path: PathBuf,
        source: std::io::Error,
    },
}

/// Fatal inconsistencies detected while loading persisted state at startup.
#[derive(Debug, Error)]
pub enum IntegrityError {
    #[error("catalog line {line}: expected 6 fields, found {found}")]
    MalformedRecord { line: usize, found: usize },

    #[error("catalog line {line}: stored hash {stored} disagrees with recomputed {computed}")]
    HashMismatch {
        line: usize,
        stored: String,
        computed: String,
    },

    #[error("catalog line {line}: duplicate identity {hash}")]
    DuplicateRecord { line: usize, hash: String },

    #[error("catalog line {line}: {reason}")]
    UnreadableRecord { line: usize, reason: String },

    #[error("image directory holds {count} image files but the catalog is empty")]
    OrphanedAssets { count: usize },
}

/// Result type alias for Shelf-Census operations
pub type Result<T> = std::result::Result<T, CensusError>;

/// Result type alias for configuration operations
pub type ConfigResult<T> = std::result::Result<T, ConfigError>;

// Re-export commonly used types
pub use catalog::{AddOutcome, Catalog, Item};
pub use config::Config;
pub use crawler::{Coordinator, RunSummary, Traversal};
