//! Configuration validation rules.

use crate::config::types::Config;
use crate::ConfigError;
use scraper::Selector;
use url::Url;

/// Validates a parsed configuration.
///
/// Checks that the quota is positive, the base URL parses, the separator is
/// a single character, storage paths are non-empty, and every CSS selector
/// compiles.
pub fn validate(config: &Config) -> Result<(), ConfigError> {
    if config.crawl.quota == 0 {
        return Err(ConfigError::Validation(
            "crawl.quota must be at least 1".to_string(),
        ));
    }

    let base = Url::parse(&config.site.base_url)
        .map_err(|_| ConfigError::InvalidUrl(config.site.base_url.clone()))?;
    if !matches!(base.scheme(), "http" | "https") {
        return Err(ConfigError::InvalidUrl(config.site.base_url.clone()));
    }

    if config.site.catalog_page.is_empty() {
        return Err(ConfigError::Validation(
            "site.catalog-page must not be empty".to_string(),
        ));
    }

    if config.storage.catalog_path.is_empty() {
        return Err(ConfigError::Validation(
            "storage.catalog-path must not be empty".to_string(),
        ));
    }
    if config.storage.image_dir.is_empty() {
        return Err(ConfigError::Validation(
            "storage.image-dir must not be empty".to_string(),
        ));
    }
    if config.storage.separator.chars().count() != 1 {
        return Err(ConfigError::Validation(
            "storage.separator must be a single character".to_string(),
        ));
    }

    for selector in [
        &config.selectors.section_block,
        &config.selectors.section_title,
        &config.selectors.subsection_link,
        &config.selectors.product_card,
        &config.selectors.product_name,
        &config.selectors.next_page,
    ] {
        Selector::parse(selector).map_err(|_| ConfigError::InvalidSelector(selector.clone()))?;
    }

    if config.user_agent.name.is_empty() {
        return Err(ConfigError::Validation(
            "user-agent.name must not be empty".to_string(),
        ));
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::types::SiteConfig;

    fn valid_config() -> Config {
        Config {
            site: SiteConfig {
                base_url: "http://shop.example.com".to_string(),
                catalog_page: "/products".to_string(),
                no_image_marker: "/images/no_photo_2.png".to_string(),
            },
            crawl: Default::default(),
            storage: Default::default(),
            selectors: Default::default(),
            user_agent: Default::default(),
        }
    }

    #[test]
    fn test_valid_config_passes() {
        assert!(validate(&valid_config()).is_ok());
    }

    #[test]
    fn test_zero_quota_rejected() {
        let mut config = valid_config();
        config.crawl.quota = 0;
        assert!(matches!(
            validate(&config),
            Err(ConfigError::Validation(_))
        ));
    }

    #[test]
    fn test_unparseable_base_url_rejected() {
        let mut config = valid_config();
        config.site.base_url = "not a url".to_string();
        assert!(matches!(validate(&config), Err(ConfigError::InvalidUrl(_))));
    }

    #[test]
    fn test_non_http_scheme_rejected() {
        let mut config = valid_config();
        config.site.base_url = "ftp://shop.example.com".to_string();
        assert!(matches!(validate(&config), Err(ConfigError::InvalidUrl(_))));
    }

    #[test]
    fn test_multi_char_separator_rejected() {
        let mut config = valid_config();
        config.storage.separator = "||".to_string();
        assert!(matches!(
            validate(&config),
            Err(ConfigError::Validation(_))
        ));
    }

    #[test]
    fn test_bad_selector_rejected() {
        let mut config = valid_config();
        config.selectors.product_card = "a[".to_string();
        assert!(matches!(
            validate(&config),
            Err(ConfigError::InvalidSelector(_))
        ));
    }
}
