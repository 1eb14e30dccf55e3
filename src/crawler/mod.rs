//! Crawler module: remote catalog traversal.
//!
//! - `fetcher`: HTTP client construction and page/byte fetching
//! - `parser`: markup extraction for sections, products and pagination
//! - `planner`: category tree discovery and per-subsection page cursors
//! - `coordinator`: the quota-bounded run loop with refill passes

mod coordinator;
mod fetcher;
mod parser;
mod planner;

pub use coordinator::{Coordinator, RunSummary, Traversal};
pub use fetcher::{build_http_client, fetch_bytes, fetch_page};
pub use parser::{ProductPage, ProductRef, SectionListing, Selectors, SubsectionRef};
pub use planner::{CategoryTree, PageCursor, Planner, Section, Subsection};

use crate::config::Config;
use crate::CensusError;

/// Runs a complete crawl for the given configuration and returns the
/// coordinator so callers can report on the final state.
pub async fn crawl(config: Config) -> Result<(Coordinator, RunSummary), CensusError> {
    let mut coordinator = Coordinator::new(config)?;
    let summary = coordinator.run().await?;
    Ok((coordinator, summary))
}
