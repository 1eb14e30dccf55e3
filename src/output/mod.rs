//! Output module: report computation and console rendering.

pub mod stats;

pub use stats::{build_report, print_report, AssetStats, CatalogReport, CategoryStat};
