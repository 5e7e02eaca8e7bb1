//! Amplirun CLI Binary
//!
//! Command-line entry point for the workflow launcher.

use amplirun::cli::{map_error, Cli, LaunchContext};
use amplirun::logging::{init_logging, LoggingConfig};
use amplirun::refdb::{self, RefDatabaseCatalog};
use amplirun::startup::{initialise, SystemConda, SystemProcess, TracingLogger};
use clap::Parser;
use std::process;
use tracing::{error, info};

fn main() {
    let cli = Cli::parse();

    let logging_config = build_logging_config(&cli);

    if let Err(e) = init_logging(Some(&logging_config)) {
        eprintln!("Failed to initialize logging: {}", e);
        process::exit(1);
    }

    let context = match LaunchContext::from_cli(&cli) {
        Ok(context) => context,
        Err(e) => {
            error!("Launch setup failed: {}", e);
            eprintln!("{}", map_error(&e));
            process::exit(1);
        }
    };

    if cli.list_databases {
        let catalog = RefDatabaseCatalog {
            dada: context.params.dada_ref_databases().clone(),
            qiime: context.params.qiime_ref_databases().clone(),
        };
        println!(
            "{}",
            refdb::catalog_listing(&catalog, cli.monochrome_logs)
        );
        return;
    }

    match initialise(
        &context.descriptor,
        &context.params,
        &context.schema,
        &TracingLogger,
        &SystemProcess,
        &SystemConda,
    ) {
        Ok(()) => {
            info!("Startup checks passed, workflow is ready to launch");
        }
        Err(e) => {
            error!("Startup validation failed");
            eprintln!("{}", map_error(&e));
            process::exit(1);
        }
    }
}

/// Build logging configuration from CLI args.
/// Precedence: explicit flags override quiet/verbose override defaults.
fn build_logging_config(cli: &Cli) -> LoggingConfig {
    let mut config = LoggingConfig::default();

    if cli.quiet {
        config.level = "error".to_string();
    }
    if cli.verbose {
        config.level = "debug".to_string();
    }
    if let Some(ref level) = cli.log_level {
        config.level = level.clone();
    }
    if let Some(ref format) = cli.log_format {
        config.format = format.clone();
    }
    if cli.monochrome_logs {
        config.color = false;
    }

    config
}
