//! Run coordination: the quota-bounded traversal loop.
//!
//! The coordinator owns the catalog, the asset store and the planner, and
//! drives traversal passes until the quota is met or the category tree is
//! spent. After every pass it inspects the aggregation tree: when the
//! sample collapsed onto a single subsection per category and unattempted
//! subsections remain, it resets the pass counter and goes around again so
//! the catalog gets some subcategory diversity.

use crate::assets::AssetStore;
use crate::catalog::{AddOutcome, Catalog, Item};
use crate::config::Config;
use crate::crawler::fetcher::build_http_client;
use crate::crawler::parser::{ProductRef, Selectors};
use crate::crawler::planner::{CategoryTree, Planner};
use crate::CensusError;
use std::path::Path;
use url::Url;

/// Terminal signal propagated up through the traversal calls.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Traversal {
    /// Keep yielding candidates.
    Continue,
    /// The run-wide quota was hit; no further fetches are issued.
    QuotaReached,
    /// The category tree is spent.
    Exhausted,
}

/// What a finished run looked like.
#[derive(Debug, Clone, Copy)]
pub struct RunSummary {
    /// Non-duplicate items accepted across all passes of this run.
    pub accepted: usize,
    /// Traversal passes performed (more than one means a refill happened).
    pub passes: usize,
    /// How the final pass ended.
    pub end: Traversal,
}

/// Drives the crawl: discovery, quota accounting, refill passes.
pub struct Coordinator {
    planner: Planner,
    catalog: Catalog,
    assets: AssetStore,
    quota: usize,
    /// Accepted counter for the current pass; a refill pass restarts it.
    accepted: usize,
    total_accepted: usize,
}

impl Coordinator {
    /// Bootstraps a run from configuration: opens (and replays) the
    /// catalog, creates the image directory, checks persisted state for
    /// consistency, and builds the HTTP client.
    ///
    /// Startup integrity failures are fatal here; nothing network-facing
    /// has happened yet.
    pub fn new(config: Config) -> Result<Self, CensusError> {
        let catalog = Catalog::open(
            Path::new(&config.storage.catalog_path),
            config.storage.separator_char(),
        )?;
        tracing::info!("catalog holds {} items", catalog.len());

        let assets = AssetStore::create(Path::new(&config.storage.image_dir))?;
        assets.verify_against_catalog(catalog.len())?;

        let base = Url::parse(&config.site.base_url)?;
        let selectors = Selectors::compile(&config.selectors)?;
        let client = build_http_client(&config.user_agent)?;
        let planner = Planner::new(
            client,
            selectors,
            base,
            &config.site.catalog_page,
            config.site.no_image_marker.clone(),
        )?;

        Ok(Self {
            planner,
            catalog,
            assets,
            quota: config.crawl.quota,
            accepted: 0,
            total_accepted: 0,
        })
    }

    /// Runs the full crawl and returns a summary.
    ///
    /// Fetch-level failures never surface here; only storage and asset
    /// directory failures do.
    pub async fn run(&mut self) -> Result<RunSummary, CensusError> {
        let mut tree = self.planner.discover().await;
        if tree.is_empty() {
            tracing::warn!("category tree is empty, nothing to traverse");
        }
        let mut passes = 0;

        loop {
            passes += 1;
            let end = self.pass(&mut tree).await?;
            tracing::info!(
                "pass {} ended ({:?}), {} accepted this pass",
                passes,
                end,
                self.accepted
            );

            if self.refill_needed(&tree) {
                tracing::info!(
                    "sample collapsed onto a single subsection per category; refilling"
                );
                self.accepted = 0;
                continue;
            }

            return Ok(RunSummary {
                accepted: self.total_accepted,
                passes,
                end,
            });
        }
    }

    /// One Accumulating pass: sections in discovery order, subsections in
    /// discovery order, pages in link order. Subsections already attempted
    /// in an earlier pass of this run are skipped.
    async fn pass(&mut self, tree: &mut CategoryTree) -> Result<Traversal, CensusError> {
        for section in &mut tree.sections {
            for subsection in &mut section.subsections {
                if subsection.attempted {
                    continue;
                }
                subsection.attempted = true;
                tracing::debug!(
                    "draining subsection '{}' of '{}'",
                    subsection.title,
                    section.title
                );

                let mut cursor = self.planner.pages(&subsection.url);
                while let Some(products) = cursor.advance(&self.planner).await {
                    for candidate in products {
                        let flow = self
                            .accept(&section.title, &subsection.title, candidate)
                            .await?;
                        if flow == Traversal::QuotaReached {
                            return Ok(Traversal::QuotaReached);
                        }
                    }
                }
            }
        }
        Ok(Traversal::Exhausted)
    }

    /// Handles one candidate: validate, deduplicate, persist, capture its
    /// image. Returns whether traversal may continue.
    async fn accept(
        &mut self,
        category: &str,
        subcategory: &str,
        candidate: ProductRef,
    ) -> Result<Traversal, CensusError> {
        let item = match Item::new(
            category,
            subcategory,
            &candidate.name,
            &candidate.product_url,
            &candidate.image_url,
        ) {
            Ok(item) => item,
            Err(e) => {
                tracing::warn!(
                    "dropping candidate under '{}' / '{}': {}",
                    category,
                    subcategory,
                    e
                );
                return Ok(Traversal::Continue);
            }
        };

        let image_url = item.has_image().then(|| item.image_url().to_string());
        match self.catalog.add(item)? {
            AddOutcome::Duplicate(hash) => {
                tracing::debug!("already cataloged: {}", hash);
                Ok(Traversal::Continue)
            }
            AddOutcome::Added(hash) => {
                if let Some(url) = image_url {
                    match self
                        .assets
                        .capture(self.planner.client(), &url, &hash)
                        .await
                    {
                        Ok(path) => tracing::debug!("captured image {}", path.display()),
                        Err(e) => tracing::warn!("image capture failed for {}: {}", hash, e),
                    }
                }

                self.accepted += 1;
                self.total_accepted += 1;
                if self.accepted >= self.quota {
                    Ok(Traversal::QuotaReached)
                } else {
                    Ok(Traversal::Continue)
                }
            }
        }
    }

    /// A refill pass is due when every sampled category sits entirely in
    /// one subcategory and the tree still has subsections nobody attempted.
    fn refill_needed(&self, tree: &CategoryTree) -> bool {
        !self.catalog.is_empty()
            && self.catalog.collapsed_to_single_subcategory()
            && tree.has_unattempted()
    }

    pub fn catalog(&self) -> &Catalog {
        &self.catalog
    }

    pub fn assets(&self) -> &AssetStore {
        &self.assets
    }
}
