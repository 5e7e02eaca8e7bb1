//! Reference taxonomy catalogs.
//!
//! The catalog maps taxonomy keys (the values accepted by `dada_ref_taxonomy`
//! and `qiime_ref_taxonomy`) to reference database descriptors. A default
//! catalog is embedded in the binary; an alternative file replaces it
//! entirely.

use crate::error::LaunchError;
use comfy_table::presets::UTF8_BORDERS_ONLY;
use comfy_table::Table;
use owo_colors::OwoColorize;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::path::Path;

/// Default catalog embedded in the binary at compile time
pub const EMBEDDED_CATALOG: &str = include_str!("../data/ref_databases.toml");

/// Reference database descriptor for one taxonomy key
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RefDatabase {
    pub title: String,
    #[serde(default)]
    pub files: Vec<String>,
    #[serde(default)]
    pub citation: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub taxonomic_levels: Option<String>,
}

/// Catalogs for both classification flavors, keyed by taxonomy key
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct RefDatabaseCatalog {
    #[serde(default)]
    pub dada: BTreeMap<String, RefDatabase>,
    #[serde(default)]
    pub qiime: BTreeMap<String, RefDatabase>,
}

impl RefDatabaseCatalog {
    // Parsed with toml directly rather than the config layer: taxonomy keys
    // such as "gtdb=R07-RS207" are case-sensitive lookup keys and must not
    // be normalised.
    pub fn embedded() -> Result<Self, LaunchError> {
        Ok(toml::from_str(EMBEDDED_CATALOG)?)
    }

    pub fn from_file(path: &Path) -> Result<Self, LaunchError> {
        let raw = std::fs::read_to_string(path)?;
        Ok(toml::from_str(&raw)?)
    }
}

/// Format both catalogs as human-readable tables for `--list-databases`.
pub fn catalog_listing(catalog: &RefDatabaseCatalog, monochrome: bool) -> String {
    let mut out = String::new();
    out.push_str(&format!(
        "{}\n{}\n",
        section_heading("DADA2 reference taxonomies", monochrome),
        render_table(&catalog.dada)
    ));
    out.push_str(&format!(
        "{}\n{}",
        section_heading("QIIME2 reference taxonomies", monochrome),
        render_table(&catalog.qiime)
    ));
    out
}

fn section_heading(title: &str, monochrome: bool) -> String {
    if monochrome {
        title.to_string()
    } else {
        format!("{}", title.bold().underline())
    }
}

fn render_table(entries: &BTreeMap<String, RefDatabase>) -> String {
    let mut table = Table::new();
    table.load_preset(UTF8_BORDERS_ONLY);
    table.set_header(vec!["Key", "Title", "Files"]);
    for (key, database) in entries {
        table.add_row(vec![
            key.clone(),
            database.title.clone(),
            database.files.len().to_string(),
        ]);
    }
    format!("{table}\n")
}
