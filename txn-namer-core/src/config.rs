//! Configuration management for `txn-namer-core`.
//!
//! This module defines the data structures for the naming configuration:
//! grouping patterns, obfuscation patterns, and appended-parameter
//! declarations. It handles deserialization of the YAML configuration shape
//! used by agent config files, where the naming settings live under a
//! `httpservlet_transaction_namer` section.
//!
//! Two scalar types are deliberately tolerant, because the same settings can
//! arrive from YAML or from flat string properties:
//!
//! * `patterns` accepts either a list of strings or one space-delimited
//!   string;
//! * `enabled` accepts a boolean or the strings `"true"`/`"false"`
//!   (case-insensitive; anything else reads as false).
//!
//! License: MIT OR Apache-2.0

use anyhow::{Context, Result};
use log::{info, warn};
use serde::{Deserialize, Serialize};
use std::path::Path;

/// Maximum allowed length for a configured pattern string.
pub const MAX_PATTERN_LENGTH: usize = 500;

/// An enable flag that tolerates string-typed values.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Deserialize, Serialize)]
#[serde(untagged)]
pub enum Toggle {
    Flag(bool),
    Text(String),
}

impl Default for Toggle {
    fn default() -> Self {
        Toggle::Flag(false)
    }
}

impl Toggle {
    /// Resolves the flag. String values count as enabled only when they
    /// spell `true`, case-insensitively.
    pub fn as_bool(&self) -> bool {
        match self {
            Toggle::Flag(b) => *b,
            Toggle::Text(s) => s.eq_ignore_ascii_case("true"),
        }
    }
}

/// A pattern list that accepts either a YAML sequence or a single
/// space-delimited string.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Deserialize, Serialize)]
#[serde(untagged)]
pub enum PatternList {
    List(Vec<String>),
    Spaced(String),
}

impl PatternList {
    /// Returns the configured patterns as an ordered list of strings.
    pub fn to_vec(&self) -> Vec<String> {
        match self {
            PatternList::List(items) => items.clone(),
            PatternList::Spaced(s) => s.split_whitespace().map(str::to_owned).collect(),
        }
    }
}

/// Settings for one pattern-driven feature (grouping or obfuscation).
#[derive(Debug, Default, Clone, PartialEq, Eq, Hash, Deserialize, Serialize)]
#[serde(default)]
pub struct FeatureConfig {
    pub enabled: Toggle,
    pub patterns: Option<PatternList>,
}

impl FeatureConfig {
    /// The ordered pattern strings this feature should compile, or an empty
    /// list when the feature is disabled or has no patterns configured.
    pub fn pattern_strings(&self) -> Vec<String> {
        if !self.enabled.as_bool() {
            return Vec::new();
        }
        match &self.patterns {
            Some(patterns) => patterns.to_vec(),
            None => {
                warn!("patterns not defined; use \"patterns:\" with a list or a space-delimited string");
                Vec::new()
            }
        }
    }
}

/// One declared parameter to append to the transaction name.
///
/// Both fields are optional at the serde level so that a malformed entry can
/// be skipped with a warning instead of failing the whole config load. The
/// `type` value is kept as a raw string here and parsed by the appender,
/// which also logs unrecognized types.
#[derive(Debug, Default, Clone, PartialEq, Eq, Hash, Deserialize, Serialize)]
#[serde(default)]
pub struct ParameterDecl {
    pub name: Option<String>,
    #[serde(rename = "type")]
    pub kind: Option<String>,
}

/// Settings for the append-parameters feature.
#[derive(Debug, Default, Clone, PartialEq, Eq, Hash, Deserialize, Serialize)]
#[serde(default)]
pub struct AppendParametersConfig {
    pub enabled: Toggle,
    pub parameters: Vec<ParameterDecl>,
}

impl AppendParametersConfig {
    /// The declared parameters, or an empty list when the feature is
    /// disabled.
    pub fn declarations(&self) -> &[ParameterDecl] {
        if self.enabled.as_bool() {
            &self.parameters
        } else {
            &[]
        }
    }
}

/// The `httpservlet_transaction_namer` configuration section.
///
/// An absent sub-section means the corresponding feature is disabled; a
/// fully absent section yields a namer that leaves every request name
/// untouched.
#[derive(Debug, Default, Clone, PartialEq, Eq, Hash, Deserialize, Serialize)]
#[serde(default)]
pub struct NamerConfig {
    pub name_grouper: FeatureConfig,
    pub name_obfuscator: FeatureConfig,
    pub append_parameters: AppendParametersConfig,
}

/// Top-level shape of a config file carrying the naming section.
#[derive(Debug, Default, Deserialize)]
#[serde(default)]
struct ConfigFile {
    httpservlet_transaction_namer: NamerConfig,
}

impl NamerConfig {
    /// Loads the naming configuration from a YAML file containing a
    /// `httpservlet_transaction_namer` section.
    pub fn load_from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();
        info!("Loading naming configuration from: {}", path.display());
        let text = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read config file {}", path.display()))?;
        Self::from_yaml_str(&text)
            .with_context(|| format!("Failed to parse config file {}", path.display()))
    }

    /// Parses the naming configuration from a YAML string.
    pub fn from_yaml_str(text: &str) -> Result<Self> {
        let file: ConfigFile =
            serde_yml::from_str(text).context("Failed to parse naming configuration")?;
        Ok(file.httpservlet_transaction_namer)
    }
}
