//! The item model: one discovered product and its identity hash.

use crate::ValidationError;
use sha2::{Digest, Sha256};

/// One catalog entry.
///
/// An item is immutable once constructed. Its identity is
/// `sha256(category + subcategory + name)`, deliberately ignoring the
/// product and image URLs, so two product pages carrying the same name
/// under the same subsection count as one item. The field order fed to the
/// hash is a format contract; changing it changes every identity on disk.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Item {
    category: String,
    subcategory: String,
    name: String,
    product_url: String,
    image_url: String,
    content_hash: String,
}

impl Item {
    /// Constructs an item from its five textual fields.
    ///
    /// `category`, `subcategory`, `name` and `product_url` must be
    /// non-empty; an empty `image_url` is legal and means "no image
    /// available". Tab characters and line breaks in any field are replaced
    /// with a single space before the hash is computed, because the
    /// persisted format is tab-delimited and line-oriented.
    ///
    /// # Errors
    ///
    /// Returns [`ValidationError::MissingField`] naming the first empty
    /// required field.
    pub fn new(
        category: &str,
        subcategory: &str,
        name: &str,
        product_url: &str,
        image_url: &str,
    ) -> Result<Self, ValidationError> {
        let category = sanitize(category);
        let subcategory = sanitize(subcategory);
        let name = sanitize(name);
        let product_url = sanitize(product_url);
        let image_url = sanitize(image_url);

        for (field, value) in [
            ("category", &category),
            ("subcategory", &subcategory),
            ("name", &name),
            ("product_url", &product_url),
        ] {
            if value.is_empty() {
                return Err(ValidationError::MissingField(field));
            }
        }

        let content_hash = identity_hash(&category, &subcategory, &name);

        Ok(Self {
            category,
            subcategory,
            name,
            product_url,
            image_url,
            content_hash,
        })
    }

    pub fn category(&self) -> &str {
        &self.category
    }

    pub fn subcategory(&self) -> &str {
        &self.subcategory
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn product_url(&self) -> &str {
        &self.product_url
    }

    /// Empty when the source listed no usable image for this product.
    pub fn image_url(&self) -> &str {
        &self.image_url
    }

    pub fn content_hash(&self) -> &str {
        &self.content_hash
    }

    pub fn has_image(&self) -> bool {
        !self.image_url.is_empty()
    }
}

/// Computes the identity digest for an item: hex-encoded SHA-256 of the
/// concatenated category, subcategory and name. Always 64 hex characters.
pub fn identity_hash(category: &str, subcategory: &str, name: &str) -> String {
    let mut hasher = Sha256::new();
    hasher.update(category.as_bytes());
    hasher.update(subcategory.as_bytes());
    hasher.update(name.as_bytes());
    hex::encode(hasher.finalize())
}

/// Replaces tabs and line breaks with single spaces.
fn sanitize(field: &str) -> String {
    if field.contains(['\t', '\n', '\r']) {
        field.replace(['\t', '\n', '\r'], " ")
    } else {
        field.to_string()
    }
}
