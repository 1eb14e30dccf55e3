//! Crawl planning: category tree discovery and per-subsection pagination.
//!
//! The planner walks the remote catalog strictly sequentially. The category
//! tree is discovered once per run; each subsection is then drained through
//! a [`PageCursor`], a lazy cursor over its pages that stops when the site
//! stops offering a next-page link, or earlier when the caller simply
//! stops advancing it. A fetch failure at any level yields no further items
//! from that node instead of aborting the run.

use crate::crawler::fetcher::fetch_page;
use crate::crawler::parser::{
    parse_catalog_page, parse_product_page, ProductPage, ProductRef, Selectors,
};
use crate::FetchError;
use reqwest::Client;
use url::Url;

/// The discovered category tree for one run.
///
/// Ephemeral: rebuilt from the remote site at the start of every run, never
/// persisted.
#[derive(Debug, Default)]
pub struct CategoryTree {
    pub sections: Vec<Section>,
}

/// A top-level section with its discovered subsections, in discovery order.
#[derive(Debug)]
pub struct Section {
    pub title: String,
    pub subsections: Vec<Subsection>,
}

/// One subsection plus its per-run traversal flag.
#[derive(Debug)]
pub struct Subsection {
    pub title: String,
    pub url: String,
    /// Set once a pass starts draining this subsection; a refill pass never
    /// re-fetches an attempted subsection.
    pub attempted: bool,
}

impl CategoryTree {
    pub fn is_empty(&self) -> bool {
        self.sections.iter().all(|s| s.subsections.is_empty())
    }

    pub fn subsection_count(&self) -> usize {
        self.sections.iter().map(|s| s.subsections.len()).sum()
    }

    pub fn has_unattempted(&self) -> bool {
        self.sections
            .iter()
            .any(|s| s.subsections.iter().any(|sub| !sub.attempted))
    }
}

/// Walks the remote catalog: discovers the tree, pages through subsections.
pub struct Planner {
    client: Client,
    selectors: Selectors,
    base: Url,
    catalog_url: Url,
    no_image_marker: String,
}

impl Planner {
    pub fn new(
        client: Client,
        selectors: Selectors,
        base: Url,
        catalog_page: &str,
        no_image_marker: String,
    ) -> Result<Self, url::ParseError> {
        let catalog_url = base.join(catalog_page)?;
        Ok(Self {
            client,
            selectors,
            base,
            catalog_url,
            no_image_marker,
        })
    }

    /// Discovers the category tree from the catalog landing page.
    ///
    /// A fetch failure here degrades to an empty tree (the run ends with
    /// nothing to traverse) rather than an error.
    pub async fn discover(&self) -> CategoryTree {
        let html = match fetch_page(&self.client, self.catalog_url.as_str()).await {
            Ok(html) => html,
            Err(e) => {
                tracing::warn!("catalog page fetch failed, nothing to traverse: {}", e);
                return CategoryTree::default();
            }
        };

        let sections = parse_catalog_page(&html, &self.selectors, &self.base)
            .into_iter()
            .map(|listing| Section {
                title: listing.title,
                subsections: listing
                    .subsections
                    .into_iter()
                    .map(|s| Subsection {
                        title: s.title,
                        url: s.url,
                        attempted: false,
                    })
                    .collect(),
            })
            .collect::<Vec<_>>();

        let tree = CategoryTree { sections };
        tracing::info!(
            "discovered {} sections, {} subsections",
            tree.sections.len(),
            tree.subsection_count()
        );
        tree
    }

    /// Starts a page cursor at the given subsection URL.
    pub fn pages(&self, start_url: &str) -> PageCursor {
        PageCursor {
            next: Some(start_url.to_string()),
        }
    }

    pub(crate) async fn fetch_product_page(&self, url: &str) -> Result<ProductPage, FetchError> {
        let html = fetch_page(&self.client, url).await?;
        Ok(parse_product_page(
            &html,
            &self.selectors,
            &self.base,
            &self.no_image_marker,
        ))
    }

    pub fn client(&self) -> &Client {
        &self.client
    }
}

/// A lazy cursor over one subsection's pages.
///
/// Each [`advance`](PageCursor::advance) call fetches the current page and
/// remembers its next-page link as the continuation. The sequence is
/// consumed as it is produced; once a page has been yielded the cursor
/// cannot replay it. A fetch failure drains the cursor.
pub struct PageCursor {
    next: Option<String>,
}

impl PageCursor {
    /// Fetches the next page and returns its product references, or `None`
    /// when the subsection is exhausted (or its fetch failed).
    pub async fn advance(&mut self, planner: &Planner) -> Option<Vec<ProductRef>> {
        let url = self.next.take()?;
        match planner.fetch_product_page(&url).await {
            Ok(page) => {
                self.next = page.next_page;
                Some(page.products)
            }
            Err(e) => {
                tracing::warn!("page fetch failed, subsection ends early: {}", e);
                None
            }
        }
    }
}
