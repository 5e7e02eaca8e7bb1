//! Startup sequencing.
//!
//! `initialise` runs the launch checks in a fixed order: help text, taxonomy
//! key validation, version text, parameter summary, schema validation, and
//! the environment checks. Help and version terminate the process with exit
//! code 0 through the injected `ProcessController`; every other failure is a
//! `LaunchError` raised to the binary, which prints it and exits non-zero.
//!
//! Logging, process exit, and the conda channel query are injected
//! capabilities so the sequence can be driven in tests without terminating
//! the test process or touching the host environment.

use crate::checks;
use crate::error::{LaunchError, RefTaxonomyFlavor};
use crate::manifest::WorkflowDescriptor;
use crate::params::ParameterSet;
use crate::report;
use crate::schema::ParameterSchema;
use std::process::Command;

/// Logging capability used by the startup sequence.
pub trait Logger {
    fn info(&self, message: &str);
    fn warn(&self, message: &str);
}

/// Process termination capability used by the help and version branches.
pub trait ProcessController {
    fn exit(&self, code: i32);
}

/// Conda channel query capability used by the channel order check.
pub trait ChannelSource {
    /// The channel listing as reported by the host, or None when it cannot
    /// be fetched.
    fn channel_listing(&self) -> Option<String>;
}

/// Production logger backed by `tracing`.
pub struct TracingLogger;

impl Logger for TracingLogger {
    fn info(&self, message: &str) {
        tracing::info!("{}", message);
    }

    fn warn(&self, message: &str) {
        tracing::warn!("{}", message);
    }
}

/// Production process controller backed by `std::process::exit`.
pub struct SystemProcess;

impl ProcessController for SystemProcess {
    fn exit(&self, code: i32) {
        std::process::exit(code);
    }
}

/// Production channel source that queries the conda binary on the host.
pub struct SystemConda;

impl ChannelSource for SystemConda {
    fn channel_listing(&self) -> Option<String> {
        let output = Command::new("conda")
            .args(["config", "--show", "channels"])
            .output()
            .ok()?;
        if !output.status.success() {
            return None;
        }
        Some(String::from_utf8_lossy(&output.stdout).into_owned())
    }
}

/// Run the startup checks for one invocation.
///
/// Returns Ok(()) when the workflow is ready to launch. The help and version
/// branches request process exit and then return Ok so that test doubles
/// observe the sequence without terminating.
pub fn initialise(
    descriptor: &WorkflowDescriptor,
    params: &ParameterSet,
    schema: &ParameterSchema,
    logger: &dyn Logger,
    process: &dyn ProcessController,
    channels: &dyn ChannelSource,
) -> Result<(), LaunchError> {
    if params.help() {
        logger.info(&report::help_text(descriptor, params, schema));
        process.exit(0);
        return Ok(());
    }

    check_dada_taxonomy(params)?;
    check_qiime_taxonomy(params)?;

    if params.version() {
        logger.info(&format!(
            "{} {}",
            descriptor.name,
            descriptor.version_string()
        ));
        process.exit(0);
        return Ok(());
    }

    logger.info(&report::summary_log(descriptor, params, schema));

    if params.validate_params() {
        let schema_report = schema.check(params.values());
        for warning in &schema_report.warnings {
            logger.warn(warning);
        }
        if !schema_report.is_ok() {
            return Err(LaunchError::InvalidParameters(schema_report.errors));
        }
    }

    checks::config_provided(descriptor, params)?;

    if descriptor
        .profiles
        .iter()
        .any(|p| p == "conda" || p == "mamba")
    {
        checks::conda_channels(channels, logger)?;
    }

    checks::aws_batch(descriptor, params)?;

    Ok(())
}

/// DADA2 taxonomy key check. Fires when the lookup table is non-empty, a key
/// is configured, and taxonomy checking is not skipped.
fn check_dada_taxonomy(params: &ParameterSet) -> Result<(), LaunchError> {
    if params.skip_taxonomy() || params.skip_dada_taxonomy() {
        return Ok(());
    }
    let Some(key) = params.dada_ref_taxonomy() else {
        return Ok(());
    };
    let table = params.dada_ref_databases();
    if table.is_empty() || table.contains_key(key) {
        return Ok(());
    }
    Err(LaunchError::missing_taxonomy_key(
        RefTaxonomyFlavor::Dada2,
        key,
        table.keys(),
    ))
}

/// QIIME2 taxonomy key check. A supplied classifier overrides the reference
/// taxonomy and suppresses this check entirely.
fn check_qiime_taxonomy(params: &ParameterSet) -> Result<(), LaunchError> {
    if params.skip_taxonomy() || params.classifier().is_some() {
        return Ok(());
    }
    let Some(key) = params.qiime_ref_taxonomy() else {
        return Ok(());
    };
    let table = params.qiime_ref_databases();
    if table.is_empty() || table.contains_key(key) {
        return Ok(());
    }
    Err(LaunchError::missing_taxonomy_key(
        RefTaxonomyFlavor::Qiime2,
        key,
        table.keys(),
    ))
}
