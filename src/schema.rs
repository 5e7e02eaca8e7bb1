//! Parameter schema.
//!
//! A JSON-schema-like document describing every pipeline parameter, grouped
//! into titled sections. The schema drives three things: the generated help
//! body, the launch summary of non-default values, and parameter validation
//! (required, type, and enum checks). The pipeline schema is embedded in the
//! binary at build time.

use crate::error::LaunchError;
use owo_colors::OwoColorize;
use serde::Deserialize;
use serde_json::Value;
use std::collections::BTreeMap;
use std::path::Path;

/// Default schema embedded in the binary at compile time
pub const EMBEDDED_SCHEMA: &str = include_str!("../data/parameter_schema.json");

/// One parameter entry in the schema
#[derive(Debug, Clone, Deserialize)]
pub struct ParamSpec {
    #[serde(rename = "type")]
    pub kind: String,
    #[serde(default)]
    pub description: String,
    #[serde(default)]
    pub default: Option<Value>,
    #[serde(default, rename = "enum")]
    pub allowed: Option<Vec<Value>>,
    #[serde(default)]
    pub hidden: bool,
    #[serde(default)]
    pub format: Option<String>,
}

/// Titled group of parameters
#[derive(Debug, Clone, Deserialize)]
pub struct SchemaGroup {
    pub title: String,
    #[serde(default)]
    pub description: String,
    #[serde(default)]
    pub required: Vec<String>,
    #[serde(default)]
    pub properties: BTreeMap<String, ParamSpec>,
}

#[derive(Debug, Clone, Deserialize)]
struct GroupRef {
    #[serde(rename = "$ref")]
    reference: String,
}

#[derive(Debug, Clone, Deserialize)]
struct RawSchema {
    title: String,
    #[serde(default)]
    description: String,
    #[serde(default)]
    definitions: BTreeMap<String, SchemaGroup>,
    #[serde(default, rename = "allOf")]
    all_of: Vec<GroupRef>,
}

/// Parsed parameter schema with group order taken from the document's
/// `allOf` references.
#[derive(Debug, Clone)]
pub struct ParameterSchema {
    pub title: String,
    pub description: String,
    definitions: BTreeMap<String, SchemaGroup>,
    group_order: Vec<String>,
}

/// Validation outcome: unknown parameters are warnings, everything else in
/// `errors` is fatal to the launch.
#[derive(Debug, Default)]
pub struct SchemaReport {
    pub warnings: Vec<String>,
    pub errors: Vec<String>,
}

impl SchemaReport {
    pub fn is_ok(&self) -> bool {
        self.errors.is_empty()
    }
}

impl ParameterSchema {
    pub fn embedded() -> Result<Self, LaunchError> {
        Self::from_str(EMBEDDED_SCHEMA)
    }

    pub fn from_file(path: &Path) -> Result<Self, LaunchError> {
        let raw = std::fs::read_to_string(path)?;
        Self::from_str(&raw)
    }

    pub fn from_str(raw: &str) -> Result<Self, LaunchError> {
        let raw: RawSchema = serde_json::from_str(raw)?;
        let mut group_order: Vec<String> = raw
            .all_of
            .iter()
            .filter_map(|r| r.reference.strip_prefix("#/definitions/"))
            .map(|name| name.to_string())
            .collect();
        if group_order.is_empty() {
            group_order = raw.definitions.keys().cloned().collect();
        }
        for name in &group_order {
            if !raw.definitions.contains_key(name) {
                return Err(LaunchError::Config(format!(
                    "Schema references undefined group '{}'",
                    name
                )));
            }
        }
        Ok(Self {
            title: raw.title,
            description: raw.description,
            definitions: raw.definitions,
            group_order,
        })
    }

    /// Groups in document order.
    pub fn groups(&self) -> impl Iterator<Item = (&str, &SchemaGroup)> {
        self.group_order
            .iter()
            .filter_map(|name| Some((name.as_str(), self.definitions.get(name)?)))
    }

    /// Find the spec for a parameter in any group.
    pub fn lookup(&self, name: &str) -> Option<&ParamSpec> {
        self.groups().find_map(|(_, group)| group.properties.get(name))
    }

    /// Defaults declared in the schema, used as the base parameter layer.
    pub fn defaults(&self) -> BTreeMap<String, Value> {
        let mut defaults = BTreeMap::new();
        for (_, group) in self.groups() {
            for (name, spec) in &group.properties {
                if let Some(default) = &spec.default {
                    defaults.insert(name.clone(), default.clone());
                }
            }
        }
        defaults
    }

    /// Render the grouped parameter help body.
    ///
    /// Hidden parameters are elided with a count line unless `show_hidden`
    /// is set.
    pub fn help_body(&self, example_command: &str, show_hidden: bool, monochrome: bool) -> String {
        let mut out = String::from("Typical pipeline command:\n\n");
        if monochrome {
            out.push_str(&format!("  {}\n\n", example_command));
        } else {
            out.push_str(&format!("  {}\n\n", example_command.cyan()));
        }

        let width = self.name_column_width(show_hidden);
        let mut hidden_count = 0;
        for (_, group) in self.groups() {
            let mut body = String::new();
            for (name, spec) in &group.properties {
                if spec.hidden && !show_hidden {
                    hidden_count += 1;
                    continue;
                }
                let flag = format!("--{}", name);
                let kind = format!("[{}]", spec.kind);
                body.push_str(&format!("  {:<width$}  {:<9}  {}", flag, kind, spec.description));
                if let Some(default) = &spec.default {
                    let suffix = format!(" [default: {}]", render_value(default));
                    if monochrome {
                        body.push_str(&suffix);
                    } else {
                        body.push_str(&format!("{}", suffix.dimmed()));
                    }
                }
                body.push('\n');
            }
            if !body.is_empty() {
                out.push_str(&section_heading(&group.title, monochrome));
                out.push_str(&body);
                out.push('\n');
            }
        }

        if hidden_count > 0 {
            let note = format!(
                " !! Hiding {} params, use --show_hidden_params to show them !!\n",
                hidden_count
            );
            if monochrome {
                out.push_str(&note);
            } else {
                out.push_str(&format!("{}", note.dimmed()));
            }
        }
        out
    }

    /// Render the launch summary: per group, only parameters whose value
    /// differs from the schema default.
    pub fn summary_body(&self, values: &BTreeMap<String, Value>, monochrome: bool) -> String {
        let mut out = String::new();
        let width = self.name_column_width(true);
        for (_, group) in self.groups() {
            let mut body = String::new();
            for (name, spec) in &group.properties {
                let Some(value) = values.get(name) else {
                    continue;
                };
                if value.is_null() || Some(value) == spec.default.as_ref() {
                    continue;
                }
                body.push_str(&format!("  {:<width$}: {}\n", name, render_value(value)));
            }
            if !body.is_empty() {
                out.push_str(&section_heading(&group.title, monochrome));
                out.push_str(&body);
                out.push('\n');
            }
        }
        let note = "!! Only parameters differing from the pipeline defaults are shown !!\n";
        if monochrome {
            out.push_str(note);
        } else {
            out.push_str(&format!("{}", note.dimmed()));
        }
        out
    }

    /// Check the supplied values against the schema.
    pub fn check(&self, values: &BTreeMap<String, Value>) -> SchemaReport {
        let mut report = SchemaReport::default();

        for name in values.keys() {
            if self.lookup(name).is_none() {
                report.warnings.push(format!("Unknown parameter: --{}", name));
            }
        }

        for (_, group) in self.groups() {
            for required in &group.required {
                match values.get(required) {
                    Some(value) if !value.is_null() => {}
                    _ => report.errors.push(format!(
                        "Required parameter --{} was not provided",
                        required
                    )),
                }
            }

            for (name, spec) in &group.properties {
                let Some(value) = values.get(name) else {
                    continue;
                };
                if value.is_null() {
                    continue;
                }
                if !type_matches(&spec.kind, value) {
                    report.errors.push(format!(
                        "Parameter --{} expects a {} value, got {}",
                        name, spec.kind, value
                    ));
                    continue;
                }
                if let Some(allowed) = &spec.allowed {
                    if !allowed.contains(value) {
                        let choices: Vec<String> =
                            allowed.iter().map(render_value).collect();
                        report.errors.push(format!(
                            "Parameter --{} must be one of [{}], got {}",
                            name,
                            choices.join(", "),
                            render_value(value)
                        ));
                    }
                }
            }
        }

        report
    }

    fn name_column_width(&self, show_hidden: bool) -> usize {
        self.groups()
            .flat_map(|(_, group)| group.properties.iter())
            .filter(|(_, spec)| show_hidden || !spec.hidden)
            .map(|(name, _)| name.len() + 2)
            .max()
            .unwrap_or(2)
    }
}

fn section_heading(title: &str, monochrome: bool) -> String {
    if monochrome {
        format!("{}\n", title)
    } else {
        format!("{}\n", title.bold().underline())
    }
}

/// Strings render bare, everything else as JSON.
fn render_value(value: &Value) -> String {
    match value {
        Value::String(s) => s.clone(),
        other => other.to_string(),
    }
}

fn type_matches(kind: &str, value: &Value) -> bool {
    match kind {
        "string" => value.is_string(),
        "boolean" => value.is_boolean(),
        "integer" => value.is_i64() || value.is_u64(),
        "number" => value.is_number(),
        _ => true,
    }
}
