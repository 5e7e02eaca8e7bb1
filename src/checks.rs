//! Environment checks run at the end of the startup sequence.
//!
//! Three checks: an explicit execution profile (or site configuration) must
//! be selected, conda channels must be configured in the required order when
//! a conda-based profile is active, and AWS Batch launches need a queue, a
//! region, and an S3 output path.

use crate::error::LaunchError;
use crate::manifest::WorkflowDescriptor;
use crate::params::ParameterSet;
use crate::startup::{ChannelSource, Logger};

/// Channels that must be configured, in this order.
const REQUIRED_CHANNELS: [&str; 3] = ["conda-forge", "bioconda", "defaults"];

/// Confirm an explicit profile or a custom configuration was supplied.
pub fn config_provided(
    descriptor: &WorkflowDescriptor,
    params: &ParameterSet,
) -> Result<(), LaunchError> {
    let explicit = descriptor.profiles.iter().any(|p| p != "standard");
    if explicit || params.custom_config().is_some() {
        return Ok(());
    }
    Err(LaunchError::NoProfileConfigured(
        "no execution profile or site configuration was selected. \
         Choose one with --profile (for example --profile docker) or supply \
         --set custom_config=PATH"
            .to_string(),
    ))
}

/// Verify the conda channel configuration reported by the channel source.
///
/// A host where conda cannot be queried gets a warning and the launch
/// continues; a host that answers with missing or misordered channels fails.
pub fn conda_channels(
    source: &dyn ChannelSource,
    logger: &dyn Logger,
) -> Result<(), LaunchError> {
    let Some(listing) = source.channel_listing() else {
        logger.warn("Could not verify the conda channel configuration");
        return Ok(());
    };

    let channels = parse_channel_listing(&listing);
    check_channel_order(&channels)
}

/// Extract channel names from `conda config --show channels` output.
pub(crate) fn parse_channel_listing(listing: &str) -> Vec<String> {
    listing
        .lines()
        .filter_map(|line| line.trim().strip_prefix("- "))
        .map(|channel| channel.trim().to_string())
        .collect()
}

/// The required channels must all be present, in the required order.
pub(crate) fn check_channel_order(channels: &[String]) -> Result<(), LaunchError> {
    let positions: Vec<Option<usize>> = REQUIRED_CHANNELS
        .iter()
        .map(|required| channels.iter().position(|c| c == required))
        .collect();

    let missing: Vec<&str> = REQUIRED_CHANNELS
        .iter()
        .zip(&positions)
        .filter(|(_, position)| position.is_none())
        .map(|(name, _)| *name)
        .collect();
    if !missing.is_empty() {
        return Err(LaunchError::CondaChannelOrder(format!(
            "missing channel(s): {}. The channels conda-forge, bioconda and \
             defaults must all be configured, in that order",
            missing.join(", ")
        )));
    }

    let positions: Vec<usize> = positions.into_iter().flatten().collect();
    let ordered = positions.windows(2).all(|pair| pair[0] < pair[1]);
    if !ordered {
        return Err(LaunchError::CondaChannelOrder(format!(
            "channels are misordered (found [{}]). Expected conda-forge \
             before bioconda before defaults",
            channels.join(", ")
        )));
    }

    Ok(())
}

/// AWS Batch launches need a queue, a region, and an S3 output path.
pub fn aws_batch(
    descriptor: &WorkflowDescriptor,
    params: &ParameterSet,
) -> Result<(), LaunchError> {
    if !descriptor.has_profile("awsbatch") {
        return Ok(());
    }
    if params.aws_queue().is_none() || params.aws_region().is_none() {
        return Err(LaunchError::BatchConfig(
            "both aws_queue and aws_region must be set when the awsbatch \
             profile is active"
                .to_string(),
        ));
    }
    match params.outdir() {
        Some(outdir) if outdir.starts_with("s3://") => Ok(()),
        _ => Err(LaunchError::BatchConfig(
            "the output directory must be an s3:// bucket path when the \
             awsbatch profile is active"
                .to_string(),
        )),
    }
}
