//! Catalog inspection commands.
//!
//! Deployments can override the built-in seed catalog via the
//! `CATALOG_PATH` environment variable; these commands run the same
//! load-and-validate path the storefront runs at startup, so a bad file
//! fails here instead of at deploy time.

use std::path::{Path, PathBuf};

use tracing::info;

use freshmart_storefront::catalog::{Catalog, CatalogError};

/// Load the catalog at `path`, falling back to the `CATALOG_PATH`
/// environment variable and then the built-in seed catalog.
fn load(path: Option<&Path>) -> Result<Catalog, CatalogError> {
    let env_path = std::env::var("CATALOG_PATH")
        .ok()
        .filter(|p| !p.is_empty())
        .map(PathBuf::from);

    match path.map(Path::to_path_buf).or(env_path) {
        Some(path) => {
            info!(path = %path.display(), "Loading catalog file");
            Catalog::from_file(&path)
        }
        None => {
            info!("Loading built-in seed catalog");
            Catalog::builtin()
        }
    }
}

/// Validate a catalog file.
///
/// # Errors
///
/// Returns the first validation failure: unreadable file, malformed
/// JSON, duplicate ids, unknown category references, or negative prices.
pub fn validate(path: Option<&Path>) -> Result<(), CatalogError> {
    let catalog = load(path)?;

    info!(
        categories = catalog.categories().len(),
        products = catalog.product_count(),
        "Catalog is valid"
    );
    Ok(())
}

/// List categories and their product counts.
///
/// # Errors
///
/// Returns an error if the catalog fails to load or validate.
pub fn list(path: Option<&Path>) -> Result<(), CatalogError> {
    let catalog = load(path)?;

    for category in catalog.categories() {
        info!(
            id = %category.id,
            name = %category.name,
            products = category.product_count,
            "category"
        );
    }
    Ok(())
}
