//! In-memory product catalog.
//!
//! The catalog is loaded once at startup, either from the built-in seed
//! data or from a JSON file named by `CATALOG_PATH`, and then served
//! read-only for the life of the process. Carts capture product
//! snapshots at add time, so a catalog swap between deploys never
//! rewrites an existing cart.

use std::collections::HashMap;
use std::path::Path;

use thiserror::Error;

use freshmart_core::{Category, CategoryId, Product, ProductId, UsageMap};

/// The built-in seed catalog shipped with the binary.
const BUILTIN_CATALOG: &str = include_str!("../data/catalog.json");

/// Errors loading or validating a catalog file.
#[derive(Debug, Error)]
pub enum CatalogError {
    #[error("failed to read catalog file: {0}")]
    Io(#[from] std::io::Error),
    #[error("failed to parse catalog: {0}")]
    Parse(#[from] serde_json::Error),
    #[error("duplicate category id: {0}")]
    DuplicateCategory(CategoryId),
    #[error("duplicate product id: {0}")]
    DuplicateProduct(ProductId),
    #[error("product {product} references unknown category {category}")]
    UnknownCategory {
        product: ProductId,
        category: CategoryId,
    },
    #[error("product {0} has a negative price")]
    NegativePrice(ProductId),
}

/// On-disk catalog shape.
#[derive(serde::Deserialize)]
struct CatalogFile {
    categories: Vec<Category>,
    products: Vec<Product>,
}

/// Validated, indexed catalog.
pub struct Catalog {
    categories: Vec<Category>,
    products: Vec<Product>,
    product_index: HashMap<ProductId, usize>,
}

impl Catalog {
    /// Load and validate a catalog from raw JSON.
    ///
    /// # Errors
    ///
    /// Returns [`CatalogError`] when the JSON does not parse or fails
    /// validation (duplicate ids, unknown category references, negative
    /// prices).
    pub fn from_json(raw: &str) -> Result<Self, CatalogError> {
        let file: CatalogFile = serde_json::from_str(raw)?;
        Self::build(file)
    }

    /// Load and validate a catalog from a JSON file.
    ///
    /// # Errors
    ///
    /// Returns [`CatalogError`] when the file cannot be read or its
    /// contents fail validation.
    pub fn from_file(path: &Path) -> Result<Self, CatalogError> {
        let raw = std::fs::read_to_string(path)?;
        Self::from_json(&raw)
    }

    /// Load the built-in seed catalog.
    ///
    /// # Errors
    ///
    /// Returns [`CatalogError`] if the embedded seed data is invalid,
    /// which would be a packaging defect caught at startup.
    pub fn builtin() -> Result<Self, CatalogError> {
        Self::from_json(BUILTIN_CATALOG)
    }

    fn build(file: CatalogFile) -> Result<Self, CatalogError> {
        let mut categories = file.categories;
        let products = file.products;

        let mut category_index: HashMap<CategoryId, usize> = HashMap::new();
        for (position, category) in categories.iter().enumerate() {
            if category_index
                .insert(category.id.clone(), position)
                .is_some()
            {
                return Err(CatalogError::DuplicateCategory(category.id.clone()));
            }
        }

        let mut product_index: HashMap<ProductId, usize> = HashMap::new();
        let mut counts: HashMap<CategoryId, usize> = HashMap::new();
        for (position, product) in products.iter().enumerate() {
            if product_index.insert(product.id.clone(), position).is_some() {
                return Err(CatalogError::DuplicateProduct(product.id.clone()));
            }
            if !category_index.contains_key(&product.category) {
                return Err(CatalogError::UnknownCategory {
                    product: product.id.clone(),
                    category: product.category.clone(),
                });
            }
            if product.price.is_negative() {
                return Err(CatalogError::NegativePrice(product.id.clone()));
            }
            *counts.entry(product.category.clone()).or_insert(0) += 1;
        }

        for category in &mut categories {
            category.product_count = counts.get(&category.id).copied().unwrap_or(0);
        }

        Ok(Self {
            categories,
            products,
            product_index,
        })
    }

    /// All categories, in seed-file order.
    #[must_use]
    pub fn categories(&self) -> &[Category] {
        &self.categories
    }

    /// The category with `id`, if present.
    #[must_use]
    pub fn category(&self, id: &CategoryId) -> Option<&Category> {
        self.categories.iter().find(|category| &category.id == id)
    }

    /// The product with `id`, if present.
    #[must_use]
    pub fn product(&self, id: &ProductId) -> Option<&Product> {
        self.product_index
            .get(id)
            .and_then(|&position| self.products.get(position))
    }

    /// Products belonging to `category`, in seed-file order.
    #[must_use]
    pub fn products_in(&self, category: &CategoryId) -> Vec<&Product> {
        self.products
            .iter()
            .filter(|product| &product.category == category)
            .collect()
    }

    /// Total number of products.
    #[must_use]
    pub fn product_count(&self) -> usize {
        self.products.len()
    }

    /// Categories ordered by a client's usage scores, highest first.
    ///
    /// The sort is stable, so categories with equal scores (including
    /// the common all-zero case for a new client) keep seed-file order.
    #[must_use]
    pub fn ranked_categories(&self, usage: &UsageMap) -> Vec<&Category> {
        let mut ranked: Vec<&Category> = self.categories.iter().collect();
        ranked.sort_by_key(|category| std::cmp::Reverse(usage.score(&category.id)));
        ranked
    }
}
