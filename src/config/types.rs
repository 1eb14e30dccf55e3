use serde::Deserialize;

/// Main configuration structure for Shelf-Census
#[derive(Debug, Clone, Deserialize)]
pub struct Config {
    pub site: SiteConfig,
    #[serde(default)]
    pub crawl: CrawlConfig,
    #[serde(default)]
    pub storage: StorageConfig,
    #[serde(default)]
    pub selectors: SelectorConfig,
    #[serde(rename = "user-agent", default)]
    pub user_agent: UserAgentConfig,
}

/// The site being cataloged
#[derive(Debug, Clone, Deserialize)]
pub struct SiteConfig {
    /// Root URL of the shop (e.g., "http://www.piknikvdom.ru")
    #[serde(rename = "base-url")]
    pub base_url: String,

    /// Path of the catalog landing page listing all sections
    #[serde(rename = "catalog-page", default = "default_catalog_page")]
    pub catalog_page: String,

    /// Image path the site serves for products without a photo; product
    /// cards pointing at it are recorded with an empty image URL
    #[serde(rename = "no-image-marker", default = "default_no_image_marker")]
    pub no_image_marker: String,
}

/// Crawl behavior configuration
#[derive(Debug, Clone, Deserialize)]
pub struct CrawlConfig {
    /// Maximum number of distinct items accepted in one run
    #[serde(default = "default_quota")]
    pub quota: usize,
}

impl Default for CrawlConfig {
    fn default() -> Self {
        Self {
            quota: default_quota(),
        }
    }
}

/// Storage locations and format
#[derive(Debug, Clone, Deserialize)]
pub struct StorageConfig {
    /// Path to the tab-separated catalog log
    #[serde(rename = "catalog-path", default = "default_catalog_path")]
    pub catalog_path: String,

    /// Directory receiving downloaded product images
    #[serde(rename = "image-dir", default = "default_image_dir")]
    pub image_dir: String,

    /// Field separator for the catalog log; must be a single character
    #[serde(default = "default_separator")]
    pub separator: String,
}

impl Default for StorageConfig {
    fn default() -> Self {
        Self {
            catalog_path: default_catalog_path(),
            image_dir: default_image_dir(),
            separator: default_separator(),
        }
    }
}

/// CSS selectors locating the catalog structure in the site's markup.
///
/// Defaults match the source site's current layout.
#[derive(Debug, Clone, Deserialize)]
pub struct SelectorConfig {
    /// One block per top-level section on the catalog page
    #[serde(rename = "section-block", default = "default_section_block")]
    pub section_block: String,

    /// Within a section block, the link carrying the section title
    #[serde(rename = "section-title", default = "default_section_title")]
    pub section_title: String,

    /// Within a section block, one link per subsection
    #[serde(rename = "subsection-link", default = "default_subsection_link")]
    pub subsection_link: String,

    /// One card per product on a subsection page
    #[serde(rename = "product-card", default = "default_product_card")]
    pub product_card: String,

    /// Within a product card, the node whose `alt` attribute is the name
    #[serde(rename = "product-name", default = "default_product_name")]
    pub product_name: String,

    /// The pagination link to the next page, when present
    #[serde(rename = "next-page", default = "default_next_page")]
    pub next_page: String,
}

impl Default for SelectorConfig {
    fn default() -> Self {
        Self {
            section_block: default_section_block(),
            section_title: default_section_title(),
            subsection_link: default_subsection_link(),
            product_card: default_product_card(),
            product_name: default_product_name(),
            next_page: default_next_page(),
        }
    }
}

/// User agent identification configuration
#[derive(Debug, Clone, Deserialize)]
pub struct UserAgentConfig {
    /// Name of the crawler
    #[serde(default = "default_ua_name")]
    pub name: String,

    /// Version of the crawler
    #[serde(default = "default_ua_version")]
    pub version: String,

    /// URL with information about the crawler (optional)
    #[serde(rename = "contact-url", default)]
    pub contact_url: String,

    /// Email address for crawler-related contact (optional)
    #[serde(rename = "contact-email", default)]
    pub contact_email: String,
}

impl Default for UserAgentConfig {
    fn default() -> Self {
        Self {
            name: default_ua_name(),
            version: default_ua_version(),
            contact_url: String::new(),
            contact_email: String::new(),
        }
    }
}

fn default_catalog_page() -> String {
    "/products".to_string()
}

fn default_no_image_marker() -> String {
    "/images/no_photo_2.png".to_string()
}

fn default_quota() -> usize {
    50
}

fn default_catalog_path() -> String {
    "./catalog.txt".to_string()
}

fn default_image_dir() -> String {
    "./img".to_string()
}

fn default_separator() -> String {
    "\t".to_string()
}

fn default_ua_name() -> String {
    "ShelfCensus".to_string()
}

fn default_ua_version() -> String {
    env!("CARGO_PKG_VERSION").to_string()
}

fn default_section_block() -> String {
    "div.section".to_string()
}

fn default_section_title() -> String {
    "span.h3 > a.category-image".to_string()
}

fn default_subsection_link() -> String {
    "p.categories-wrap > span > a".to_string()
}

fn default_product_card() -> String {
    "a.product-image".to_string()
}

fn default_product_name() -> String {
    "img".to_string()
}

fn default_next_page() -> String {
    "a.pager-next".to_string()
}

impl StorageConfig {
    /// The separator as a char; validation guarantees a single character.
    pub fn separator_char(&self) -> char {
        self.separator.chars().next().unwrap_or('\t')
    }
}
