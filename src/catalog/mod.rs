//! The catalog store: a deduplicated, append-only collection of items.
//!
//! The persisted form is a tab-separated log, one record per line, columns
//! `category, subcategory, name, product_url, image_url, content_hash`,
//! no header. The store never truncates or rewrites the log; the only
//! mutation is [`Catalog::add`], which appends. Alongside the log the store
//! keeps an identity index for O(1) duplicate detection and an aggregation
//! tree for reporting.

mod item;
mod tree;

pub use item::{identity_hash, Item};
pub use tree::{AggregationTree, CategoryNode, SubcategoryNode};

use crate::{CensusError, IntegrityError};
use std::collections::HashMap;
use std::fs::{File, OpenOptions};
use std::io::{BufWriter, Write};
use std::path::{Path, PathBuf};

/// Outcome of [`Catalog::add`]. A duplicate is an expected result, not an
/// error; both variants carry the identity hash so callers can correlate
/// side effects (such as an asset download) to the exact record.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AddOutcome {
    /// The item was appended and indexed.
    Added(String),
    /// The identity was already known; nothing changed.
    Duplicate(String),
}

impl AddOutcome {
    pub fn content_hash(&self) -> &str {
        match self {
            Self::Added(hash) | Self::Duplicate(hash) => hash,
        }
    }

    pub fn is_added(&self) -> bool {
        matches!(self, Self::Added(_))
    }
}

/// Deduplicated persisted collection of items with a hierarchical
/// aggregation index.
pub struct Catalog {
    path: PathBuf,
    separator: char,
    log: BufWriter<File>,
    // identity hash → position inside the tree; doubles as the known-hash
    // set for duplicate detection
    index: HashMap<String, (usize, usize, usize)>,
    tree: AggregationTree,
}

impl Catalog {
    /// Opens (or creates) a catalog at `path`.
    ///
    /// Every existing line is replayed through the same identity
    /// computation used for new items, so hashes are never trusted blindly
    /// from disk. A line whose recomputed hash disagrees with its stored
    /// hash, a line with the wrong number of fields, or a repeated identity
    /// is a fatal [`IntegrityError`].
    ///
    /// # Arguments
    ///
    /// * `path` - Location of the tab-separated catalog log
    /// * `separator` - Field separator, a single character (tab by default)
    pub fn open(path: &Path, separator: char) -> Result<Self, CensusError> {
        let mut index = HashMap::new();
        let mut tree = AggregationTree::new();

        if path.exists() {
            let content = std::fs::read_to_string(path)?;
            for (idx, line) in content.lines().enumerate() {
                let line_no = idx + 1;
                let record = Self::parse_line(line, separator, line_no)?;
                if index.contains_key(&record.hash) {
                    return Err(IntegrityError::DuplicateRecord {
                        line: line_no,
                        hash: record.hash,
                    }
                    .into());
                }
                let position = tree.fold(record.item);
                index.insert(record.hash, position);
            }
            tracing::debug!("replayed {} catalog records from disk", index.len());
        }

        let file = OpenOptions::new().append(true).create(true).open(path)?;

        Ok(Self {
            path: path.to_path_buf(),
            separator,
            log: BufWriter::new(file),
            index,
            tree,
        })
    }

    fn parse_line(
        line: &str,
        separator: char,
        line_no: usize,
    ) -> Result<LoadedRecord, CensusError> {
        let fields: Vec<&str> = line.split(separator).collect();
        if fields.len() != 6 {
            return Err(IntegrityError::MalformedRecord {
                line: line_no,
                found: fields.len(),
            }
            .into());
        }

        let item = Item::new(fields[0], fields[1], fields[2], fields[3], fields[4]).map_err(
            |e| IntegrityError::UnreadableRecord {
                line: line_no,
                reason: e.to_string(),
            },
        )?;

        if item.content_hash() != fields[5] {
            return Err(IntegrityError::HashMismatch {
                line: line_no,
                stored: fields[5].to_string(),
                computed: item.content_hash().to_string(),
            }
            .into());
        }

        Ok(LoadedRecord {
            hash: item.content_hash().to_string(),
            item,
        })
    }

    /// Adds an item, appending it to the log and folding it into the
    /// in-memory index.
    ///
    /// If the identity is already known this is a no-op reporting
    /// [`AddOutcome::Duplicate`]. The append is flushed before the index is
    /// updated, so a crash between the two can never leave the index ahead
    /// of the file.
    pub fn add(&mut self, item: Item) -> Result<AddOutcome, CensusError> {
        let hash = item.content_hash().to_string();
        if self.index.contains_key(&hash) {
            return Ok(AddOutcome::Duplicate(hash));
        }

        let sep = self.separator;
        writeln!(
            self.log,
            "{}{sep}{}{sep}{}{sep}{}{sep}{}{sep}{}",
            item.category(),
            item.subcategory(),
            item.name(),
            item.product_url(),
            item.image_url(),
            item.content_hash(),
        )?;
        self.log.flush()?;

        let position = self.tree.fold(item);
        self.index.insert(hash.clone(), position);
        Ok(AddOutcome::Added(hash))
    }

    /// Total number of distinct items.
    pub fn len(&self) -> usize {
        self.index.len()
    }

    pub fn is_empty(&self) -> bool {
        self.index.is_empty()
    }

    /// Looks an item up by its identity hash.
    pub fn item_by_hash(&self, hash: &str) -> Option<&Item> {
        self.index
            .get(hash)
            .and_then(|&position| self.tree.get(position))
    }

    /// All items recorded under a category, in discovery order.
    pub fn category_items(&self, category: &str) -> Vec<&Item> {
        self.tree
            .categories()
            .iter()
            .filter(|c| c.title == category)
            .flat_map(|c| c.subcategories.iter())
            .flat_map(|s| s.items.iter())
            .collect()
    }

    /// Read access to the aggregation tree for reporting.
    pub fn tree(&self) -> &AggregationTree {
        &self.tree
    }

    /// True when every non-empty category holds all items in a single
    /// subcategory.
    pub fn collapsed_to_single_subcategory(&self) -> bool {
        self.tree.collapsed_to_single_subcategory()
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}

struct LoadedRecord {
    hash: String,
    item: Item,
}
