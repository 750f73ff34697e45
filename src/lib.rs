//! newrelic-sourcemaps - Post-build source map registration with New Relic.
//!
//! After a bundler finishes a build pass, this library:
//! - Filters the build's output assets by an extension pattern
//! - Derives the public URL each bundle is served from
//! - Registers the matching source map with New Relic browser monitoring
//!
//! # Example
//!
//! ```no_run
//! use newrelic_sourcemaps::{BuildResult, NewRelicPlugin, NewRelicPublisher, PluginConfig, TracingLogger};
//! use std::sync::Arc;
//!
//! #[tokio::main]
//! async fn main() {
//!     let config = PluginConfig::new("1234", "admin-key", "https://cdn.example.com");
//!     let publisher = Arc::new(NewRelicPublisher::new(30).unwrap());
//!     let plugin = NewRelicPlugin::new(config, publisher, Arc::new(TracingLogger)).unwrap();
//!
//!     let outcomes = plugin.on_build_complete(&BuildResult::default()).await;
//!     println!("Dispatched {} source maps", outcomes.len());
//! }
//! ```

pub mod config;
pub mod notify;
pub mod parser;
pub mod plugin;
pub mod types;
pub mod upload;
pub mod url_builder;

#[cfg(test)]
mod test_support;

pub use config::{Commands, Config, ErrorCallback, PluginConfig};
pub use notify::{ConsoleOutput, TracingLogger, UploadLogger};
pub use parser::find_source_map;
pub use plugin::{Compiler, DoneCallback, NewRelicPlugin, DONE_EVENT};
pub use types::{
    BuildAsset, BuildResult, Chunk, PluginError, PublishError, Result, UploadOutcome,
};
pub use upload::{NewRelicPublisher, PublishRequest, SourcemapPublisher};
pub use url_builder::StaticAssetUrlBuilder;
