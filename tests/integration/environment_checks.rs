//! Environment checks and full CLI-to-launch flows: profile selection, conda
//! channel ordering, AWS Batch requirements, and catalog overrides loaded
//! from disk.

use super::support::{demo_descriptor, params_with, FixedChannels, RecordingLogger, RecordingProcess};
use amplirun::cli::{Cli, LaunchContext};
use amplirun::error::LaunchError;
use amplirun::schema::ParameterSchema;
use amplirun::startup::initialise;
use clap::Parser;
use serde_json::json;

fn embedded_schema() -> ParameterSchema {
    ParameterSchema::embedded().unwrap()
}

#[test]
fn test_full_launch_from_cli_with_params_file() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("params.toml");
    std::fs::write(
        &path,
        "input = \"samplesheet.tsv\"\noutdir = \"results\"\nfw_primer = \"GTGYCAGCMGCCGCGGTAA\"\n",
    )
    .unwrap();

    let cli = Cli::try_parse_from([
        "amplirun",
        "--params-file",
        path.to_str().unwrap(),
        "--profile",
        "docker",
        "--monochrome_logs",
    ])
    .unwrap();
    let context = LaunchContext::from_cli(&cli).unwrap();
    let logger = RecordingLogger::default();
    let process = RecordingProcess::default();
    let channels = FixedChannels::default();

    let result = initialise(
        &context.descriptor,
        &context.params,
        &context.schema,
        &logger,
        &process,
        &channels,
    );

    assert!(result.is_ok(), "launch failed: {:?}", result);
    assert_eq!(process.exit_code.get(), None);
    let infos = logger.infos.borrow();
    assert_eq!(infos.len(), 1);
    assert!(infos[0].contains("samplesheet.tsv"));
    assert!(logger.warnings.borrow().is_empty());
}

#[test]
fn test_catalog_file_override_limits_valid_keys() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("databases.toml");
    std::fs::write(
        &path,
        r#"
[dada.demo]
title = "Demo database"
files = ["https://example.org/demo.fa.gz"]
citation = "Demo citation"
"#,
    )
    .unwrap();

    let cli = Cli::try_parse_from([
        "amplirun",
        "--databases",
        path.to_str().unwrap(),
        "--profile",
        "docker",
        "--set",
        "dada_ref_taxonomy=silva",
        "--monochrome_logs",
    ])
    .unwrap();
    let context = LaunchContext::from_cli(&cli).unwrap();
    let logger = RecordingLogger::default();
    let process = RecordingProcess::default();
    let channels = FixedChannels::default();

    let err = initialise(
        &context.descriptor,
        &context.params,
        &context.schema,
        &logger,
        &process,
        &channels,
    )
    .unwrap_err();

    match &err {
        LaunchError::MissingTaxonomyKey { key, valid_keys, .. } => {
            assert_eq!(key, "silva");
            assert_eq!(valid_keys, &vec!["demo".to_string()]);
        }
        other => panic!("unexpected error: {other}"),
    }
    assert!(err.to_string().contains("demo"));
}

#[test]
fn test_launch_without_profile_or_custom_config_fails() {
    let descriptor = demo_descriptor(&[]);
    let schema = embedded_schema();
    let params = params_with(
        &[
            ("validate_params", json!(false)),
            ("monochrome_logs", json!(true)),
        ],
        &[],
        &[],
    );
    let logger = RecordingLogger::default();
    let process = RecordingProcess::default();
    let channels = FixedChannels::default();

    let err = initialise(&descriptor, &params, &schema, &logger, &process, &channels).unwrap_err();

    assert!(matches!(err, LaunchError::NoProfileConfigured(_)));
    assert!(err.to_string().contains("--profile"));
}

#[test]
fn test_custom_config_counts_as_configuration() {
    let descriptor = demo_descriptor(&[]);
    let schema = embedded_schema();
    let params = params_with(
        &[
            ("validate_params", json!(false)),
            ("monochrome_logs", json!(true)),
            ("custom_config", json!("site.config")),
        ],
        &[],
        &[],
    );
    let logger = RecordingLogger::default();
    let process = RecordingProcess::default();
    let channels = FixedChannels::default();

    let result = initialise(&descriptor, &params, &schema, &logger, &process, &channels);
    assert!(result.is_ok());
}

#[test]
fn test_awsbatch_profile_requires_queue_and_region() {
    let descriptor = demo_descriptor(&["awsbatch"]);
    let schema = embedded_schema();
    let params = params_with(
        &[
            ("validate_params", json!(false)),
            ("monochrome_logs", json!(true)),
            ("outdir", json!("s3://bucket/run1")),
        ],
        &[],
        &[],
    );
    let logger = RecordingLogger::default();
    let process = RecordingProcess::default();
    let channels = FixedChannels::default();

    let err = initialise(&descriptor, &params, &schema, &logger, &process, &channels).unwrap_err();

    assert!(matches!(err, LaunchError::BatchConfig(_)));
    assert!(err.to_string().contains("aws_queue"));
}

#[test]
fn test_awsbatch_profile_requires_s3_outdir() {
    let descriptor = demo_descriptor(&["awsbatch"]);
    let schema = embedded_schema();
    let params = params_with(
        &[
            ("validate_params", json!(false)),
            ("monochrome_logs", json!(true)),
            ("aws_queue", json!("spot-queue")),
            ("aws_region", json!("eu-west-1")),
            ("outdir", json!("results")),
        ],
        &[],
        &[],
    );
    let logger = RecordingLogger::default();
    let process = RecordingProcess::default();
    let channels = FixedChannels::default();

    let err = initialise(&descriptor, &params, &schema, &logger, &process, &channels).unwrap_err();

    assert!(matches!(err, LaunchError::BatchConfig(_)));
    assert!(err.to_string().contains("s3://"));
}

#[test]
fn test_awsbatch_profile_fully_configured_is_ready() {
    let descriptor = demo_descriptor(&["awsbatch"]);
    let schema = embedded_schema();
    let params = params_with(
        &[
            ("validate_params", json!(false)),
            ("monochrome_logs", json!(true)),
            ("aws_queue", json!("spot-queue")),
            ("aws_region", json!("eu-west-1")),
            ("outdir", json!("s3://bucket/run1")),
        ],
        &[],
        &[],
    );
    let logger = RecordingLogger::default();
    let process = RecordingProcess::default();
    let channels = FixedChannels::default();

    let result = initialise(&descriptor, &params, &schema, &logger, &process, &channels);
    assert!(result.is_ok());
}

#[test]
fn test_conda_profile_checks_channel_order() {
    let descriptor = demo_descriptor(&["conda"]);
    let schema = embedded_schema();
    let params = params_with(
        &[
            ("validate_params", json!(false)),
            ("monochrome_logs", json!(true)),
        ],
        &[],
        &[],
    );
    let logger = RecordingLogger::default();
    let process = RecordingProcess::default();
    let channels = FixedChannels::with_listing(&["conda-forge", "bioconda", "defaults"]);

    let result = initialise(&descriptor, &params, &schema, &logger, &process, &channels);

    assert!(result.is_ok());
    assert!(channels.consulted.get());
    assert!(logger.warnings.borrow().is_empty());
}

#[test]
fn test_conda_profile_rejects_misordered_channels() {
    let descriptor = demo_descriptor(&["conda"]);
    let schema = embedded_schema();
    let params = params_with(
        &[
            ("validate_params", json!(false)),
            ("monochrome_logs", json!(true)),
        ],
        &[],
        &[],
    );
    let logger = RecordingLogger::default();
    let process = RecordingProcess::default();
    let channels = FixedChannels::with_listing(&["bioconda", "conda-forge", "defaults"]);

    let err = initialise(&descriptor, &params, &schema, &logger, &process, &channels).unwrap_err();

    assert!(matches!(err, LaunchError::CondaChannelOrder(_)));
}

#[test]
fn test_mamba_profile_checks_channels_too() {
    let descriptor = demo_descriptor(&["mamba"]);
    let schema = embedded_schema();
    let params = params_with(
        &[
            ("validate_params", json!(false)),
            ("monochrome_logs", json!(true)),
        ],
        &[],
        &[],
    );
    let logger = RecordingLogger::default();
    let process = RecordingProcess::default();
    let channels = FixedChannels::with_listing(&["defaults", "bioconda", "conda-forge"]);

    let err = initialise(&descriptor, &params, &schema, &logger, &process, &channels).unwrap_err();

    assert!(matches!(err, LaunchError::CondaChannelOrder(_)));
}

#[test]
fn test_conda_unavailable_warns_and_continues() {
    let descriptor = demo_descriptor(&["conda"]);
    let schema = embedded_schema();
    let params = params_with(
        &[
            ("validate_params", json!(false)),
            ("monochrome_logs", json!(true)),
        ],
        &[],
        &[],
    );
    let logger = RecordingLogger::default();
    let process = RecordingProcess::default();
    let channels = FixedChannels::default();

    let result = initialise(&descriptor, &params, &schema, &logger, &process, &channels);

    assert!(result.is_ok());
    assert!(channels.consulted.get());
    let warnings = logger.warnings.borrow();
    assert_eq!(warnings.len(), 1);
    assert_eq!(warnings[0], "Could not verify the conda channel configuration");
}

#[test]
fn test_channels_not_consulted_without_conda_profile() {
    let descriptor = demo_descriptor(&["docker"]);
    let schema = embedded_schema();
    let params = params_with(
        &[
            ("validate_params", json!(false)),
            ("monochrome_logs", json!(true)),
        ],
        &[],
        &[],
    );
    let logger = RecordingLogger::default();
    let process = RecordingProcess::default();
    let channels = FixedChannels::with_listing(&["defaults", "bioconda", "conda-forge"]);

    let result = initialise(&descriptor, &params, &schema, &logger, &process, &channels);

    assert!(result.is_ok());
    assert!(!channels.consulted.get());
}

#[test]
fn test_embedded_catalog_mixed_case_key_is_accepted() {
    let cli = Cli::try_parse_from([
        "amplirun",
        "--profile",
        "docker",
        "--set",
        "input=samplesheet.tsv",
        "--set",
        "outdir=results",
        "--set",
        "dada_ref_taxonomy=gtdb=R07-RS207",
        "--monochrome_logs",
    ])
    .unwrap();
    let context = LaunchContext::from_cli(&cli).unwrap();
    assert!(context
        .params
        .dada_ref_databases()
        .contains_key("gtdb=R07-RS207"));

    let logger = RecordingLogger::default();
    let process = RecordingProcess::default();
    let channels = FixedChannels::default();

    let result = initialise(
        &context.descriptor,
        &context.params,
        &context.schema,
        &logger,
        &process,
        &channels,
    );

    assert!(result.is_ok(), "launch failed: {:?}", result);
    assert_eq!(process.exit_code.get(), None);
}
