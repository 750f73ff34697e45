//! Source map registration.
//!
//! This module handles:
//! - Resolving an output asset to its emitted map file
//! - Deriving the public URL of the served bundle
//! - Handing both to a registration client

pub mod client;

pub use client::{NewRelicPublisher, PublishRequest, SourcemapPublisher, DEFAULT_ENDPOINT};

use crate::notify::UploadLogger;
use crate::types::{BuildAsset, BuildResult, UploadOutcome};
use crate::url_builder::StaticAssetUrlBuilder;
use std::collections::BTreeMap;
use tracing::debug;

/// Per-build inputs shared by every asset dispatched from one completion hook.
#[derive(Clone, Copy)]
pub struct UploadOptions<'a> {
    pub assets: &'a BTreeMap<String, BuildAsset>,
    pub static_asset_url_builder: &'a StaticAssetUrlBuilder,
    pub public_path: &'a str,
    pub application_id: &'a str,
    pub nr_admin_key: &'a str,
    /// Static asset root the bundles are served from.
    pub url: &'a str,
    pub release_name: &'a str,
    pub release_id: &'a str,
    pub stats: &'a BuildResult,
    pub publisher: &'a dyn SourcemapPublisher,
    pub logger: &'a dyn UploadLogger,
}

/// Register the map asset named `item`.
///
/// `item` is used directly as the key into the asset table, so callers pass
/// the map's own name. The URL handed to the builder is `item` with its
/// `.map` suffix removed.
pub async fn upload_source_map(opts: &UploadOptions<'_>, item: &str) -> UploadOutcome {
    let js_file_name = item.strip_suffix(".map").unwrap_or(item);

    let Some(sourcemap_path) = opts.assets.get(item).and_then(BuildAsset::emitted_path) else {
        opts.logger.info(&format!("could not find source map {}", item));
        return UploadOutcome::Skipped {
            asset: item.to_string(),
        };
    };

    let javascript_url =
        (opts.static_asset_url_builder)(opts.url, opts.public_path, js_file_name, opts.stats);

    let request = PublishRequest {
        sourcemap_path: sourcemap_path.to_path_buf(),
        javascript_url,
        application_id: opts.application_id.to_string(),
        nr_admin_key: opts.nr_admin_key.to_string(),
        release_name: opts.release_name.to_string(),
        release_id: opts.release_id.to_string(),
    };

    debug!(
        "Registering {} for {}",
        request.sourcemap_path.display(),
        request.javascript_url
    );

    match opts.publisher.publish(&request).await {
        Ok(()) => UploadOutcome::Uploaded {
            asset: item.to_string(),
            url: request.javascript_url,
        },
        Err(error) => UploadOutcome::Failed {
            asset: item.to_string(),
            error,
        },
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_support::{MockPublisher, RecordingLogger};
    use crate::url_builder::default_builder;
    use std::sync::Arc;

    fn make_stats() -> BuildResult {
        let mut stats = BuildResult::default();
        stats.compilation.output_options.public_path = "/static/".to_string();
        stats
            .compilation
            .assets
            .insert("main.js.map".to_string(), BuildAsset::emitted("/dist/main.js.map"));
        stats
            .compilation
            .assets
            .insert("stale.js.map".to_string(), BuildAsset::default());
        stats
    }

    fn make_options<'a>(
        stats: &'a BuildResult,
        builder: &'a StaticAssetUrlBuilder,
        publisher: &'a MockPublisher,
        logger: &'a RecordingLogger,
    ) -> UploadOptions<'a> {
        UploadOptions {
            assets: &stats.compilation.assets,
            static_asset_url_builder: builder,
            public_path: &stats.compilation.output_options.public_path,
            application_id: "id",
            nr_admin_key: "key",
            url: "https://cdn.example.com",
            release_name: "release",
            release_id: "",
            stats,
            publisher,
            logger,
        }
    }

    #[tokio::test]
    async fn test_uploads_emitted_map() {
        let stats = make_stats();
        let builder = default_builder();
        let publisher = MockPublisher::succeeding();
        let logger = RecordingLogger::default();
        let opts = make_options(&stats, &builder, &publisher, &logger);

        let outcome = upload_source_map(&opts, "main.js.map").await;

        match outcome {
            UploadOutcome::Uploaded { asset, url } => {
                assert_eq!(asset, "main.js.map");
                assert_eq!(url, "https://cdn.example.com/static/main.js");
            }
            other => panic!("Expected upload, got {:?}", other),
        }

        let requests = publisher.requests();
        assert_eq!(requests.len(), 1);
        assert_eq!(requests[0].sourcemap_path, std::path::PathBuf::from("/dist/main.js.map"));
        assert_eq!(requests[0].javascript_url, "https://cdn.example.com/static/main.js");
        assert_eq!(requests[0].application_id, "id");
        assert_eq!(requests[0].nr_admin_key, "key");
        assert_eq!(requests[0].release_name, "release");
        assert_eq!(requests[0].release_id, "");
    }

    #[tokio::test]
    async fn test_missing_asset_is_skipped() {
        let stats = make_stats();
        let builder = default_builder();
        let publisher = MockPublisher::succeeding();
        let logger = RecordingLogger::default();
        let opts = make_options(&stats, &builder, &publisher, &logger);

        let outcome = upload_source_map(&opts, "other.js").await;

        assert!(matches!(outcome, UploadOutcome::Skipped { .. }));
        assert!(publisher.requests().is_empty());
        assert_eq!(logger.infos(), vec!["could not find source map other.js"]);
    }

    #[tokio::test]
    async fn test_unemitted_asset_is_skipped() {
        let stats = make_stats();
        let builder = default_builder();
        let publisher = MockPublisher::succeeding();
        let logger = RecordingLogger::default();
        let opts = make_options(&stats, &builder, &publisher, &logger);

        let outcome = upload_source_map(&opts, "stale.js.map").await;

        assert!(matches!(outcome, UploadOutcome::Skipped { .. }));
        assert!(publisher.requests().is_empty());
    }

    #[tokio::test]
    async fn test_client_error_is_returned() {
        let stats = make_stats();
        let builder = default_builder();
        let publisher = MockPublisher::failing("boom");
        let logger = RecordingLogger::default();
        let opts = make_options(&stats, &builder, &publisher, &logger);

        let outcome = upload_source_map(&opts, "main.js.map").await;

        match outcome {
            UploadOutcome::Failed { asset, error } => {
                assert_eq!(asset, "main.js.map");
                assert_eq!(error.to_string(), "boom");
            }
            other => panic!("Expected failure, got {:?}", other),
        }
    }

    #[tokio::test]
    async fn test_custom_builder_receives_build_result() {
        let stats = make_stats();
        let builder: StaticAssetUrlBuilder = Arc::new(
            |url: &str, _public_path: &str, file: &str, stats: &BuildResult| {
                format!("{}/{}/{}", url, stats.compilation.assets.len(), file)
            },
        );
        let publisher = MockPublisher::succeeding();
        let logger = RecordingLogger::default();
        let opts = make_options(&stats, &builder, &publisher, &logger);

        let outcome = upload_source_map(&opts, "main.js.map").await;

        match outcome {
            UploadOutcome::Uploaded { url, .. } => {
                assert_eq!(url, "https://cdn.example.com/2/main.js")
            }
            other => panic!("Expected upload, got {:?}", other),
        }
    }
}
