//! Launch report text.
//!
//! Assembles the user-facing text blocks emitted at startup: the citation
//! text, the full help text, and the parameter summary logged before the
//! workflow proper begins.

use crate::banner;
use crate::manifest::WorkflowDescriptor;
use crate::params::ParameterSet;
use crate::schema::ParameterSchema;
use chrono::Utc;

/// Citation text for the pipeline. Embeds the pipeline name in the lead
/// line and in the CITATIONS document link; everything else is constant.
pub fn citation(descriptor: &WorkflowDescriptor) -> String {
    format!(
        "If you use {} for your analysis please cite:\n\n\
         * The pipeline publication\n  https://doi.org/10.3389/fmicb.2023.1184218\n\n\
         * The pipeline\n  https://doi.org/10.5281/zenodo.7798442\n\n\
         * The workflow framework\n  https://doi.org/10.1038/s41467-022-31821-3\n\n\
         * Software dependencies\n  https://github.com/{}/blob/master/CITATIONS.md",
        descriptor.name, descriptor.name
    )
}

/// Typical invocation shown at the top of the generated help body.
pub fn example_command() -> String {
    "amplirun --input samplesheet.tsv --fw_primer GTGYCAGCMGCCGCGGTAA \
     --rv_primer GGACTACNVGGGTWTCTAAT --outdir results --profile docker"
        .to_string()
}

/// Full help text: banner, schema-driven parameter help, citation, separator.
pub fn help_text(
    descriptor: &WorkflowDescriptor,
    params: &ParameterSet,
    schema: &ParameterSchema,
) -> String {
    let monochrome = params.monochrome_logs();
    let mut out = banner::logo(descriptor, monochrome);
    out.push('\n');
    out.push_str(&schema.help_body(
        &example_command(),
        params.show_hidden_params(),
        monochrome,
    ));
    out.push('\n');
    out.push_str(&citation(descriptor));
    out.push('\n');
    out.push_str(&banner::dashed_line(monochrome));
    out
}

/// Launch summary: banner, launch line, non-default parameter values,
/// citation, separator.
pub fn summary_log(
    descriptor: &WorkflowDescriptor,
    params: &ParameterSet,
    schema: &ParameterSchema,
) -> String {
    let monochrome = params.monochrome_logs();
    let mut out = banner::logo(descriptor, monochrome);
    out.push('\n');
    let profiles = if descriptor.profiles.is_empty() {
        "standard".to_string()
    } else {
        descriptor.profiles.join(",")
    };
    out.push_str(&format!(
        "Launched at {} with profile {}\n\n",
        Utc::now().format("%d-%b-%Y %H:%M:%S"),
        profiles
    ));
    out.push_str(&schema.summary_body(params.values(), monochrome));
    out.push('\n');
    out.push_str(&citation(descriptor));
    out.push('\n');
    out.push_str(&banner::dashed_line(monochrome));
    out
}
