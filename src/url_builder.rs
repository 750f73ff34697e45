//! Public URL derivation for uploaded bundles.

use crate::types::BuildResult;
use std::sync::Arc;

/// Maps `(static asset url, public path, file name, build result)` to the URL
/// the bundle is served from.
pub type StaticAssetUrlBuilder =
    Arc<dyn Fn(&str, &str, &str, &BuildResult) -> String + Send + Sync>;

/// Plain concatenation of url, public path and file name. Slashes are not
/// normalized.
pub fn concat_url(url: &str, public_path: &str, file: &str, _stats: &BuildResult) -> String {
    format!("{}{}{}", url, public_path, file)
}

/// The builder used when none is configured.
pub fn default_builder() -> StaticAssetUrlBuilder {
    Arc::new(concat_url)
}
