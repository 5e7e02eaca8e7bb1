//! CLI types and launch context assembly.
//!
//! The built-in clap help and version flags are disabled so that `--help` and
//! `--version` reach the startup sequence as pipeline parameters, matching
//! the help/version branches of `initialise`.

use crate::error::LaunchError;
use crate::manifest::{PipelineManifest, WorkflowDescriptor};
use crate::params::{self, ParameterSet};
use crate::refdb::RefDatabaseCatalog;
use crate::schema::ParameterSchema;
use clap::Parser;
use serde_json::Value;
use std::path::PathBuf;

/// Amplirun - startup validation and launch reporting for amplicon
/// sequencing workflows
#[derive(Parser)]
#[command(name = "amplirun")]
#[command(about = "Startup validation and launch reporting for amplicon sequencing workflows")]
#[command(disable_help_flag = true, disable_version_flag = true)]
pub struct Cli {
    /// Pipeline manifest file (TOML; the embedded manifest when omitted)
    #[arg(long)]
    pub manifest: Option<PathBuf>,

    /// Parameter file layered over the schema defaults (TOML)
    #[arg(long)]
    pub params_file: Option<PathBuf>,

    /// Reference database catalog file (the embedded catalog when omitted)
    #[arg(long)]
    pub databases: Option<PathBuf>,

    /// Execution profiles, comma separated (for example docker or conda,test)
    #[arg(long, value_delimiter = ',')]
    pub profile: Vec<String>,

    /// Parameter override as KEY=VALUE; the value is parsed as JSON first,
    /// then taken as a string (repeatable)
    #[arg(long = "set", value_name = "KEY=VALUE")]
    pub set: Vec<String>,

    /// Print the pipeline help text and exit
    #[arg(long)]
    pub help: bool,

    /// Print the pipeline name and version and exit
    #[arg(long)]
    pub version: bool,

    /// Disable colored output
    #[arg(long = "monochrome_logs")]
    pub monochrome_logs: bool,

    /// Show parameters marked hidden in the help text
    #[arg(long = "show_hidden_params")]
    pub show_hidden_params: bool,

    /// List the reference taxonomy catalogs and exit
    #[arg(long)]
    pub list_databases: bool,

    /// Suppress informational logging
    #[arg(long)]
    pub quiet: bool,

    /// Enable verbose (debug) logging
    #[arg(long)]
    pub verbose: bool,

    /// Log level (trace, debug, info, warn, error, off)
    #[arg(long)]
    pub log_level: Option<String>,

    /// Log format (json, text)
    #[arg(long)]
    pub log_format: Option<String>,
}

/// Everything the startup sequence needs, assembled from the CLI.
#[derive(Debug)]
pub struct LaunchContext {
    pub descriptor: WorkflowDescriptor,
    pub params: ParameterSet,
    pub schema: ParameterSchema,
}

impl LaunchContext {
    /// Assemble descriptor, parameters, and schema from CLI arguments.
    ///
    /// Parameter layering, later layers winning: schema defaults, the
    /// parameter file, `--set` overrides, direct flags.
    pub fn from_cli(cli: &Cli) -> Result<Self, LaunchError> {
        let manifest = match &cli.manifest {
            Some(path) => PipelineManifest::from_file(path)?,
            None => PipelineManifest::embedded()?,
        };
        let descriptor = WorkflowDescriptor::new(&manifest, cli.profile.clone());

        let schema = ParameterSchema::embedded()?;

        let catalog = match &cli.databases {
            Some(path) => RefDatabaseCatalog::from_file(path)?,
            None => RefDatabaseCatalog::embedded()?,
        };

        let mut params = ParameterSet::with_catalog(catalog);
        params.merge_defaults(schema.defaults());
        if let Some(path) = &cli.params_file {
            params.merge_values(params::load_params_file(path)?);
        }
        for raw in &cli.set {
            let (key, value) = params::parse_override(raw)?;
            params.set(&key, value);
        }
        if cli.help {
            params.set("help", Value::Bool(true));
        }
        if cli.version {
            params.set("version", Value::Bool(true));
        }
        if cli.monochrome_logs {
            params.set("monochrome_logs", Value::Bool(true));
        }
        if cli.show_hidden_params {
            params.set("show_hidden_params", Value::Bool(true));
        }

        Ok(Self {
            descriptor,
            params,
            schema,
        })
    }
}

/// Map a launch error to the message printed on stderr.
pub fn map_error(error: &LaunchError) -> String {
    error.to_string()
}
