//! Catalog composition and asset-size statistics.
//!
//! Pure read-side computation over the final catalog and the asset
//! directory listing, plus console rendering.

use crate::assets::{AssetFile, AssetStore};
use crate::catalog::Catalog;

/// Full report over a catalog and its captured images.
#[derive(Debug, Clone)]
pub struct CatalogReport {
    /// Total distinct items.
    pub total: usize,
    pub categories: Vec<CategoryStat>,
    /// `None` when the catalog is empty or no images were captured.
    pub assets: Option<AssetStats>,
}

#[derive(Debug, Clone)]
pub struct CategoryStat {
    pub title: String,
    pub count: usize,
    pub subcategories: Vec<SubcategoryStat>,
}

#[derive(Debug, Clone)]
pub struct SubcategoryStat {
    pub title: String,
    pub count: usize,
    /// Percentage share of the owning category's count.
    pub share: f64,
}

/// Image coverage and size distribution.
#[derive(Debug, Clone)]
pub struct AssetStats {
    /// Image files present in the asset directory.
    pub count: usize,
    /// `100 * count / total`, integer percent.
    pub coverage_percent: u64,
    pub average_kb: f64,
    pub min: AssetExtreme,
    pub max: AssetExtreme,
}

/// The smallest or largest captured image, resolved back to its item.
#[derive(Debug, Clone)]
pub struct AssetExtreme {
    pub file_name: String,
    pub item_name: String,
    pub size_kb: f64,
}

/// Builds the report from the catalog and the asset directory.
pub fn build_report(catalog: &Catalog, assets: &AssetStore) -> std::io::Result<CatalogReport> {
    let categories = catalog
        .tree()
        .categories()
        .iter()
        .map(|category| CategoryStat {
            title: category.title.clone(),
            count: category.count,
            subcategories: category
                .subcategories
                .iter()
                .map(|sub| SubcategoryStat {
                    title: sub.title.clone(),
                    count: sub.count,
                    share: if category.count > 0 {
                        100.0 * sub.count as f64 / category.count as f64
                    } else {
                        0.0
                    },
                })
                .collect(),
        })
        .collect();

    let files = assets.image_files()?;
    let asset_stats = compute_asset_stats(catalog, &files);

    Ok(CatalogReport {
        total: catalog.len(),
        categories,
        assets: asset_stats,
    })
}

/// Coverage and extremes over the image files, in directory-listing order;
/// ties on size keep the first file seen.
fn compute_asset_stats(catalog: &Catalog, files: &[AssetFile]) -> Option<AssetStats> {
    if catalog.is_empty() || files.is_empty() {
        return None;
    }

    let mut min = &files[0];
    let mut max = &files[0];
    let mut sum: u64 = 0;
    for file in files {
        if file.size < min.size {
            min = file;
        }
        if file.size > max.size {
            max = file;
        }
        sum += file.size;
    }

    let extreme = |file: &AssetFile| AssetExtreme {
        file_name: file.file_name.clone(),
        item_name: catalog
            .item_by_hash(file.content_hash())
            .map(|item| item.name().to_string())
            .unwrap_or_else(|| "(unknown)".to_string()),
        size_kb: to_kb(file.size),
    };

    Some(AssetStats {
        count: files.len(),
        coverage_percent: 100 * files.len() as u64 / catalog.len() as u64,
        average_kb: to_kb(sum) / files.len() as f64,
        min: extreme(min),
        max: extreme(max),
    })
}

fn to_kb(size: u64) -> f64 {
    size as f64 / 1024.0
}

/// Prints the report to stdout.
pub fn print_report(report: &CatalogReport) {
    println!("Catalog contains {} items.", report.total);
    if report.total == 0 {
        return;
    }

    for category in &report.categories {
        println!("{}: {}", category.title, category.count);
        for sub in &category.subcategories {
            println!("  {}: {} ({:.2}%)", sub.title, sub.count, sub.share);
        }
    }

    match &report.assets {
        None => println!("No images captured."),
        Some(assets) => {
            println!(
                "{} of {} ({}%) items have an image.",
                assets.count, report.total, assets.coverage_percent
            );
            println!("Average: {:.2}KB.", assets.average_kb);
            println!(
                "Min file {} for {}: {:.2}KB.",
                assets.min.file_name, assets.min.item_name, assets.min.size_kb
            );
            println!(
                "Max file {} for {}: {:.2}KB.",
                assets.max.file_name, assets.max.item_name, assets.max.size_kb
            );
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::assets::file_name_for;
    use crate::catalog::Item;
    use std::path::PathBuf;
    use tempfile::TempDir;

    fn populated_catalog(dir: &TempDir) -> (Catalog, Vec<String>) {
        let mut catalog = Catalog::open(&dir.path().join("catalog.txt"), '\t').unwrap();
        let mut hashes = Vec::new();
        for (sub, name, img) in [
            ("Socks", "Red Sock", "/img/red.jpg"),
            ("Socks", "Blue Sock", "/img/blue.jpg"),
            ("Gloves", "Left Glove", ""),
            ("Gloves", "Right Glove", ""),
        ] {
            let item = Item::new("Tights", sub, name, "/p", img).unwrap();
            let outcome = catalog.add(item).unwrap();
            hashes.push(outcome.content_hash().to_string());
        }
        (catalog, hashes)
    }

    #[test]
    fn test_composition_shares() {
        let dir = TempDir::new().unwrap();
        let (catalog, _) = populated_catalog(&dir);
        let assets = AssetStore::create(&dir.path().join("img")).unwrap();

        let report = build_report(&catalog, &assets).unwrap();
        assert_eq!(report.total, 4);
        assert_eq!(report.categories.len(), 1);
        let category = &report.categories[0];
        assert_eq!(category.count, 4);
        assert_eq!(category.subcategories[0].title, "Socks");
        assert!((category.subcategories[0].share - 50.0).abs() < f64::EPSILON);
    }

    #[test]
    fn test_asset_coverage_and_extremes() {
        let dir = TempDir::new().unwrap();
        let (catalog, hashes) = populated_catalog(&dir);
        let assets = AssetStore::create(&dir.path().join("img")).unwrap();

        // Two images for four items: 1024 and 4096 bytes.
        std::fs::write(
            assets.dir().join(file_name_for(&hashes[0], "/img/red.jpg")),
            vec![0u8; 1024],
        )
        .unwrap();
        std::fs::write(
            assets.dir().join(file_name_for(&hashes[1], "/img/blue.jpg")),
            vec![0u8; 4096],
        )
        .unwrap();

        let report = build_report(&catalog, &assets).unwrap();
        let stats = report.assets.unwrap();
        assert_eq!(stats.count, 2);
        assert_eq!(stats.coverage_percent, 50);
        assert!((stats.average_kb - 2.5).abs() < 1e-9);
        assert_eq!(stats.min.item_name, "Red Sock");
        assert!((stats.min.size_kb - 1.0).abs() < 1e-9);
        assert_eq!(stats.max.item_name, "Blue Sock");
        assert!((stats.max.size_kb - 4.0).abs() < 1e-9);
    }

    #[test]
    fn test_no_assets_reported_when_directory_empty() {
        let dir = TempDir::new().unwrap();
        let (catalog, _) = populated_catalog(&dir);
        let assets = AssetStore::create(&dir.path().join("img")).unwrap();

        let report = build_report(&catalog, &assets).unwrap();
        assert!(report.assets.is_none());
    }

    #[test]
    fn test_empty_catalog_report() {
        let dir = TempDir::new().unwrap();
        let catalog = Catalog::open(&dir.path().join("catalog.txt"), '\t').unwrap();
        let assets = AssetStore::create(&dir.path().join("img")).unwrap();

        let report = build_report(&catalog, &assets).unwrap();
        assert_eq!(report.total, 0);
        assert!(report.categories.is_empty());
        assert!(report.assets.is_none());
    }

    #[test]
    fn test_size_ties_keep_first_file_in_listing_order() {
        let dir = TempDir::new().unwrap();
        let (catalog, hashes) = populated_catalog(&dir);

        let files: Vec<AssetFile> = hashes[..2]
            .iter()
            .map(|hash| AssetFile {
                path: PathBuf::from(format!("/img/{hash}.jpg")),
                file_name: format!("{hash}.jpg"),
                size: 2048,
            })
            .collect();

        let stats = compute_asset_stats(&catalog, &files).unwrap();
        assert_eq!(stats.min.file_name, files[0].file_name);
        assert_eq!(stats.max.file_name, files[0].file_name);
    }

    #[test]
    fn test_unknown_hash_resolves_to_placeholder() {
        let dir = TempDir::new().unwrap();
        let (catalog, _) = populated_catalog(&dir);

        let files = vec![AssetFile {
            path: PathBuf::from("/img/ffff.jpg"),
            file_name: "ffff.jpg".to_string(),
            size: 10,
        }];
        let stats = compute_asset_stats(&catalog, &files).unwrap();
        assert_eq!(stats.min.item_name, "(unknown)");
    }
}
