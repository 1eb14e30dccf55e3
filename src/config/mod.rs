//! Configuration loading, parsing and validation.
//!
//! Run parameters (quota, storage paths, field separator, site URLs and CSS
//! selectors) come from a TOML file; every field except the site base URL
//! carries a sensible default.

mod parser;
pub mod types;
mod validation;

pub use parser::{compute_config_hash, load_config, load_config_with_hash};
pub use types::{
    Config, CrawlConfig, SelectorConfig, SiteConfig, StorageConfig, UserAgentConfig,
};
pub use validation::validate;
