//! Markup extraction for the catalog structure.
//!
//! Everything here is a pure function over fetched HTML: section listings
//! from the catalog landing page, product references and the next-page link
//! from a subsection page. All returned URLs are resolved to absolute form
//! against the site base.

use crate::config::SelectorConfig;
use crate::ConfigError;
use scraper::{Html, Selector};
use url::Url;

/// Compiled CSS selectors for the site's catalog markup.
pub struct Selectors {
    section_block: Selector,
    section_title: Selector,
    subsection_link: Selector,
    product_card: Selector,
    product_name: Selector,
    next_page: Selector,
}

impl Selectors {
    /// Compiles the configured selector strings once, up front.
    pub fn compile(config: &SelectorConfig) -> Result<Self, ConfigError> {
        let parse = |s: &String| {
            Selector::parse(s).map_err(|_| ConfigError::InvalidSelector(s.clone()))
        };
        Ok(Self {
            section_block: parse(&config.section_block)?,
            section_title: parse(&config.section_title)?,
            subsection_link: parse(&config.subsection_link)?,
            product_card: parse(&config.product_card)?,
            product_name: parse(&config.product_name)?,
            next_page: parse(&config.next_page)?,
        })
    }
}

/// A top-level section as listed on the catalog landing page.
#[derive(Debug, Clone)]
pub struct SectionListing {
    pub title: String,
    pub subsections: Vec<SubsectionRef>,
}

/// A subsection link: where to fetch it and what to call it.
#[derive(Debug, Clone)]
pub struct SubsectionRef {
    pub url: String,
    pub title: String,
}

/// A candidate product reference extracted from one card.
///
/// Fields may be empty when the markup lacks them; item validation decides
/// whether the candidate survives.
#[derive(Debug, Clone)]
pub struct ProductRef {
    pub name: String,
    pub product_url: String,
    pub image_url: String,
}

/// One fetched subsection page: its products plus the next-page link.
#[derive(Debug, Clone)]
pub struct ProductPage {
    pub products: Vec<ProductRef>,
    pub next_page: Option<String>,
}

/// Extracts all sections and their subsection links from the catalog
/// landing page. Blocks without a title link or subsections without an
/// `href` are skipped.
pub fn parse_catalog_page(html: &str, selectors: &Selectors, base: &Url) -> Vec<SectionListing> {
    let document = Html::parse_document(html);
    let mut sections = Vec::new();

    for block in document.select(&selectors.section_block) {
        let title = match block
            .select(&selectors.section_title)
            .next()
            .and_then(|el| el.value().attr("title"))
        {
            Some(t) if !t.trim().is_empty() => t.trim().to_string(),
            _ => {
                tracing::warn!("skipping section block without a title link");
                continue;
            }
        };

        let mut subsections = Vec::new();
        for link in block.select(&selectors.subsection_link) {
            let Some(href) = link.value().attr("href") else {
                continue;
            };
            let Some(url) = resolve(base, href) else {
                continue;
            };
            let text = link.text().collect::<String>().trim().to_string();
            subsections.push(SubsectionRef { url, title: text });
        }

        sections.push(SectionListing { title, subsections });
    }

    sections
}

/// Extracts product references and the pagination link from a subsection
/// page.
///
/// For each card: the `href` becomes the product URL, the `alt` attribute
/// of the name node becomes the name, and the image URL is pulled out of
/// the card's inline `background: url(...)` style. A card whose image is
/// the site's no-photo placeholder gets an empty image URL.
pub fn parse_product_page(
    html: &str,
    selectors: &Selectors,
    base: &Url,
    no_image_marker: &str,
) -> ProductPage {
    let document = Html::parse_document(html);
    let mut products = Vec::new();

    for card in document.select(&selectors.product_card) {
        let product_url = card
            .value()
            .attr("href")
            .and_then(|href| resolve(base, href))
            .unwrap_or_default();

        let name = card
            .select(&selectors.product_name)
            .next()
            .and_then(|el| el.value().attr("alt"))
            .unwrap_or_default()
            .trim()
            .to_string();

        let image_url = card
            .value()
            .attr("style")
            .and_then(style_background_url)
            .filter(|path| *path != no_image_marker)
            .and_then(|path| resolve(base, path))
            .unwrap_or_default();

        products.push(ProductRef {
            name,
            product_url,
            image_url,
        });
    }

    let next_page = document
        .select(&selectors.next_page)
        .next()
        .and_then(|el| el.value().attr("href"))
        .and_then(|href| resolve(base, href));

    ProductPage {
        products,
        next_page,
    }
}

/// Pulls the target of `url(...)` out of an inline style declaration.
fn style_background_url(style: &str) -> Option<&str> {
    let start = style.find("url(")? + 4;
    let end = style[start..].find(')')? + start;
    let url = style[start..end].trim().trim_matches(|c| c == '\'' || c == '"');
    (!url.is_empty()).then_some(url)
}

/// Resolves an href against the base URL; unresolvable links are dropped.
fn resolve(base: &Url, href: &str) -> Option<String> {
    match base.join(href.trim()) {
        Ok(url) => Some(url.to_string()),
        Err(e) => {
            tracing::warn!("cannot resolve '{}' against {}: {}", href, base, e);
            None
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn selectors() -> Selectors {
        Selectors::compile(&SelectorConfig::default()).unwrap()
    }

    fn base() -> Url {
        Url::parse("http://shop.example.com").unwrap()
    }

    const CATALOG_PAGE: &str = r#"
        <html><body>
        <div class="section">
            <span class="h3"><a class="category-image" href="/products/drinks" title="Drinks"></a></span>
            <p class="categories-wrap">
                <span><a href="/products/drinks/tea">Tea</a></span>
                <span><a href="/products/drinks/coffee">Coffee</a></span>
            </p>
        </div>
        <div class="section">
            <span class="h3"><a class="category-image" href="/products/bakery" title="Bakery"></a></span>
            <p class="categories-wrap">
                <span><a href="/products/bakery/bread">Bread</a></span>
            </p>
        </div>
        </body></html>
    "#;

    #[test]
    fn test_parse_catalog_page() {
        let sections = parse_catalog_page(CATALOG_PAGE, &selectors(), &base());
        assert_eq!(sections.len(), 2);
        assert_eq!(sections[0].title, "Drinks");
        assert_eq!(sections[0].subsections.len(), 2);
        assert_eq!(sections[0].subsections[0].title, "Tea");
        assert_eq!(
            sections[0].subsections[0].url,
            "http://shop.example.com/products/drinks/tea"
        );
        assert_eq!(sections[1].title, "Bakery");
    }

    #[test]
    fn test_section_without_title_is_skipped() {
        let html = r#"
            <div class="section">
                <p class="categories-wrap"><span><a href="/x">X</a></span></p>
            </div>
        "#;
        let sections = parse_catalog_page(html, &selectors(), &base());
        assert!(sections.is_empty());
    }

    #[test]
    fn test_parse_product_page() {
        let html = r#"
            <html><body>
            <a class="product-image" href="/products/tea/green"
               style="background: url(/upload/green.jpg) no-repeat center center">
                <img alt="Green Tea">
            </a>
            <a class="product-image" href="/products/tea/black"
               style="background: url(/images/no_photo_2.png) no-repeat center center">
                <img alt="Black Tea">
            </a>
            <a class="pager-next" href="products/tea?page=2">next</a>
            </body></html>
        "#;
        let page = parse_product_page(html, &selectors(), &base(), "/images/no_photo_2.png");

        assert_eq!(page.products.len(), 2);
        assert_eq!(page.products[0].name, "Green Tea");
        assert_eq!(
            page.products[0].product_url,
            "http://shop.example.com/products/tea/green"
        );
        assert_eq!(
            page.products[0].image_url,
            "http://shop.example.com/upload/green.jpg"
        );
        // The no-photo placeholder maps to "no image"
        assert_eq!(page.products[1].image_url, "");
        assert_eq!(
            page.next_page.as_deref(),
            Some("http://shop.example.com/products/tea?page=2")
        );
    }

    #[test]
    fn test_last_page_has_no_next_link() {
        let html = r#"<a class="product-image" href="/p"><img alt="P"></a>"#;
        let page = parse_product_page(html, &selectors(), &base(), "/images/no_photo_2.png");
        assert!(page.next_page.is_none());
    }

    #[test]
    fn test_card_without_name_yields_empty_name() {
        let html = r#"<a class="product-image" href="/p"></a>"#;
        let page = parse_product_page(html, &selectors(), &base(), "/images/no_photo_2.png");
        assert_eq!(page.products.len(), 1);
        assert_eq!(page.products[0].name, "");
    }

    #[test]
    fn test_style_background_url() {
        assert_eq!(
            style_background_url("background: url(/upload/a.jpg) no-repeat center center"),
            Some("/upload/a.jpg")
        );
        assert_eq!(
            style_background_url("background: url('/upload/a.jpg')"),
            Some("/upload/a.jpg")
        );
        assert_eq!(style_background_url("color: red"), None);
        assert_eq!(style_background_url("background: url()"), None);
    }
}
