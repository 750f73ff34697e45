//! newrelic-sourcemaps - Post-build source map registration with New Relic.
//!
//! CLI entry point.

use clap::Parser;
use newrelic_sourcemaps::config::{load_build_result, LocateArgs, UploadArgs};
use newrelic_sourcemaps::{
    find_source_map, BuildResult, Commands, Compiler, Config, ConsoleOutput, DoneCallback,
    NewRelicPlugin, TracingLogger,
};
use std::process::ExitCode;
use std::sync::Arc;
use tracing::{error, info};
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() -> ExitCode {
    let config = Config::parse();

    // Set up logging
    let filter = if config.verbose {
        EnvFilter::new("newrelic_sourcemaps=debug,info")
    } else {
        EnvFilter::new("newrelic_sourcemaps=info,warn")
    };

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .init();

    let console = ConsoleOutput::new(config.verbose);

    let result = match config.command {
        Commands::Upload(args) => run_upload(args, &console).await,
        Commands::Locate(args) => run_locate(args, &console),
    };

    match result {
        Ok(()) => ExitCode::SUCCESS,
        Err(code) => code,
    }
}

/// Stand-in build tool that replays a stats file through the done hooks.
#[derive(Default)]
struct StatsReplay {
    hooks: Vec<DoneCallback>,
}

impl Compiler for StatsReplay {
    fn plugin(&mut self, _event: &str, callback: DoneCallback) {
        self.hooks.push(callback);
    }
}

async fn run_upload(args: UploadArgs, console: &ConsoleOutput) -> Result<(), ExitCode> {
    let stats = match load_build_result(&args.stats) {
        Ok(stats) => stats,
        Err(e) => {
            error!("Failed to load {}: {}", args.stats.display(), e);
            return Err(ExitCode::FAILURE);
        }
    };

    let plugin_config = match args.plugin_config() {
        Ok(c) => c,
        Err(e) => {
            error!("{}", e);
            return Err(ExitCode::FAILURE);
        }
    };

    let publisher = match args.publisher() {
        Ok(p) => p,
        Err(e) => {
            error!("{}", e);
            return Err(ExitCode::FAILURE);
        }
    };

    let plugin = match NewRelicPlugin::new(plugin_config, Arc::new(publisher), Arc::new(TracingLogger)) {
        Ok(p) => p,
        Err(e) => {
            error!("{}", e);
            return Err(ExitCode::FAILURE);
        }
    };

    let mut replay = StatsReplay::default();
    plugin.apply(&mut replay);

    if replay.hooks.is_empty() {
        console.print_info("noop mode, no source maps uploaded");
        return Ok(());
    }

    info!(
        "Uploading source maps for application {} served from {}",
        plugin.application_id(),
        plugin.static_asset_url()
    );

    let stats: Arc<BuildResult> = Arc::new(stats);
    for hook in &replay.hooks {
        let outcomes = hook(Arc::clone(&stats)).await;
        console.print_summary(&outcomes);
    }

    Ok(())
}

fn run_locate(args: LocateArgs, console: &ConsoleOutput) -> Result<(), ExitCode> {
    let stats = match load_build_result(&args.stats) {
        Ok(stats) => stats,
        Err(e) => {
            error!("Failed to load {}: {}", args.stats.display(), e);
            return Err(ExitCode::FAILURE);
        }
    };

    for (name, asset) in &stats.compilation.assets {
        console.print_reference(name, &find_source_map(&asset.children));
    }

    Ok(())
}
