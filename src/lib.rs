//! Amplirun: Startup Validation for Amplicon Sequencing Workflows
//!
//! A launcher front-end that validates pipeline parameters against the
//! embedded parameter schema and reference database catalogs, renders
//! help/version/summary text, and runs the environment checks a workflow
//! invocation needs before handing off.

pub mod banner;
pub mod checks;
pub mod cli;
pub mod error;
pub mod logging;
pub mod manifest;
pub mod params;
pub mod refdb;
pub mod report;
pub mod schema;
pub mod startup;
