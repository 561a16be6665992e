//! Reading product definitions and selection events published as JSON files.

use bindery_domain::catalog::Product;
use bindery_domain::config::CatalogConfig;
use serde::de::DeserializeOwned;
use std::borrow::Cow;
use std::fs;
use std::path::{Path, PathBuf};
use tracing::info;

#[bindery_derive::bindery_error]
pub enum CatalogError {
    #[error("Catalog I/O error{}: {source}", format_context(.context))]
    Io { source: std::io::Error, context: Option<Cow<'static, str>> },

    #[error("Catalog JSON error{}: {source}", format_context(.context))]
    Json { source: serde_json::Error, context: Option<Cow<'static, str>> },
}

/// Resolves `path` against the configured catalog root unless it is already absolute.
#[must_use]
pub fn resolve(config: &CatalogConfig, path: impl AsRef<Path>) -> PathBuf {
    let path = path.as_ref();
    if path.is_absolute() { path.to_path_buf() } else { config.root.join(path) }
}

/// Reads and deserializes a JSON document.
///
/// # Errors
/// [`CatalogError::Io`] when the file cannot be read, [`CatalogError::Json`] when it does
/// not match `T`.
pub fn load_json<T: DeserializeOwned>(path: impl AsRef<Path>) -> Result<T, CatalogError> {
    let path = path.as_ref();
    let raw = fs::read_to_string(path).context(format!("Failed to read {}", path.display()))?;
    let value = serde_json::from_str::<T>(&raw).context(format!("Failed to parse {}", path.display()))?;
    Ok(value)
}

/// Loads an (unvalidated) product definition.
///
/// # Errors
/// See [`load_json`].
pub fn load_product(config: &CatalogConfig, path: impl AsRef<Path>) -> Result<Product, CatalogError> {
    let path = resolve(config, path);
    let product: Product = load_json(&path)?;
    info!(path = %path.display(), groups = product.groups.len(), "Product definition loaded");
    Ok(product)
}
