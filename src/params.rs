//! Launch parameters.
//!
//! One `ParameterSet` is assembled per invocation from four layers, later
//! layers winning: schema defaults, an optional parameter file, repeatable
//! `--set KEY=VALUE` overrides, and direct CLI flags. The set also carries the
//! reference database lookup tables the taxonomy checks run against.

use crate::error::LaunchError;
use crate::refdb::{RefDatabase, RefDatabaseCatalog};
use config::{Config, File, FileFormat};
use serde_json::Value;
use std::collections::BTreeMap;
use std::path::Path;

/// Parameter name/value mapping plus the reference database tables.
#[derive(Debug, Clone, Default)]
pub struct ParameterSet {
    values: BTreeMap<String, Value>,
    dada_ref_databases: BTreeMap<String, RefDatabase>,
    qiime_ref_databases: BTreeMap<String, RefDatabase>,
}

impl ParameterSet {
    pub fn with_catalog(catalog: RefDatabaseCatalog) -> Self {
        Self {
            values: BTreeMap::new(),
            dada_ref_databases: catalog.dada,
            qiime_ref_databases: catalog.qiime,
        }
    }

    pub fn from_parts(
        values: BTreeMap<String, Value>,
        dada_ref_databases: BTreeMap<String, RefDatabase>,
        qiime_ref_databases: BTreeMap<String, RefDatabase>,
    ) -> Self {
        Self {
            values,
            dada_ref_databases,
            qiime_ref_databases,
        }
    }

    pub fn values(&self) -> &BTreeMap<String, Value> {
        &self.values
    }

    pub fn get(&self, name: &str) -> Option<&Value> {
        self.values.get(name)
    }

    pub fn set(&mut self, name: &str, value: Value) {
        self.values.insert(name.to_string(), value);
    }

    /// Insert defaults without overwriting values already present.
    pub fn merge_defaults(&mut self, defaults: BTreeMap<String, Value>) {
        for (name, value) in defaults {
            self.values.entry(name).or_insert(value);
        }
    }

    /// Overlay values, replacing anything already present.
    pub fn merge_values(&mut self, values: BTreeMap<String, Value>) {
        for (name, value) in values {
            self.values.insert(name, value);
        }
    }

    pub fn dada_ref_databases(&self) -> &BTreeMap<String, RefDatabase> {
        &self.dada_ref_databases
    }

    pub fn qiime_ref_databases(&self) -> &BTreeMap<String, RefDatabase> {
        &self.qiime_ref_databases
    }

    fn flag(&self, name: &str) -> bool {
        self.values
            .get(name)
            .and_then(Value::as_bool)
            .unwrap_or(false)
    }

    fn text(&self, name: &str) -> Option<&str> {
        self.values
            .get(name)
            .and_then(Value::as_str)
            .filter(|s| !s.is_empty())
    }

    pub fn help(&self) -> bool {
        self.flag("help")
    }

    pub fn version(&self) -> bool {
        self.flag("version")
    }

    pub fn validate_params(&self) -> bool {
        self.flag("validate_params")
    }

    pub fn monochrome_logs(&self) -> bool {
        self.flag("monochrome_logs")
    }

    pub fn show_hidden_params(&self) -> bool {
        self.flag("show_hidden_params")
    }

    pub fn skip_taxonomy(&self) -> bool {
        self.flag("skip_taxonomy")
    }

    pub fn skip_dada_taxonomy(&self) -> bool {
        self.flag("skip_dada_taxonomy")
    }

    pub fn dada_ref_taxonomy(&self) -> Option<&str> {
        self.text("dada_ref_taxonomy")
    }

    pub fn qiime_ref_taxonomy(&self) -> Option<&str> {
        self.text("qiime_ref_taxonomy")
    }

    pub fn classifier(&self) -> Option<&str> {
        self.text("classifier")
    }

    pub fn custom_config(&self) -> Option<&str> {
        self.text("custom_config")
    }

    pub fn outdir(&self) -> Option<&str> {
        self.text("outdir")
    }

    pub fn aws_queue(&self) -> Option<&str> {
        self.text("aws_queue")
    }

    pub fn aws_region(&self) -> Option<&str> {
        self.text("aws_region")
    }
}

/// Parse a `KEY=VALUE` override. The value is parsed as JSON first so
/// numbers and booleans keep their type; anything else is taken as a string.
pub fn parse_override(raw: &str) -> Result<(String, Value), LaunchError> {
    let (key, value) = raw.split_once('=').ok_or_else(|| {
        LaunchError::Config(format!(
            "Invalid parameter override '{}' (expected KEY=VALUE)",
            raw
        ))
    })?;
    if key.is_empty() {
        return Err(LaunchError::Config(format!(
            "Invalid parameter override '{}' (empty key)",
            raw
        )));
    }
    let parsed = serde_json::from_str(value).unwrap_or_else(|_| Value::String(value.to_string()));
    Ok((key.to_string(), parsed))
}

/// Load a TOML parameter file into a name/value map.
pub fn load_params_file(path: &Path) -> Result<BTreeMap<String, Value>, LaunchError> {
    let settings = Config::builder()
        .add_source(File::from(path).format(FileFormat::Toml))
        .build()?;
    Ok(settings.try_deserialize()?)
}
