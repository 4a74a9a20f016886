use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::path::{Path, PathBuf};

/// Errors from loading or checking a validation configuration
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("failed to read config file: {0}")]
    Io(#[from] std::io::Error),

    #[error("invalid config file {}: {message}", path.display())]
    Invalid { path: PathBuf, message: String },

    #[error("unsupported config format {} (expected .yml, .yaml or .json)", .0.display())]
    UnsupportedFormat(PathBuf),

    #[error("{0}")]
    UnknownNames(String),
}

/// Configured severity for a rule
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
#[non_exhaustive]
pub enum RuleSeverity {
    Off,
    Warn,
    Error,
}

/// YAML 1.1 loaders read a bare `off` as `false`, so that boolean is
/// accepted as `Off` alongside the three severity strings.
impl<'de> Deserialize<'de> for RuleSeverity {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: serde::Deserializer<'de>,
    {
        use serde::de::{self, Visitor};

        struct RuleSeverityVisitor;

        impl Visitor<'_> for RuleSeverityVisitor {
            type Value = RuleSeverity;

            fn expecting(&self, formatter: &mut std::fmt::Formatter) -> std::fmt::Result {
                formatter.write_str("a severity string ('off', 'warn', 'error') or false")
            }

            fn visit_str<E>(self, value: &str) -> Result<Self::Value, E>
            where
                E: de::Error,
            {
                match value {
                    "off" => Ok(RuleSeverity::Off),
                    "warn" => Ok(RuleSeverity::Warn),
                    "error" => Ok(RuleSeverity::Error),
                    _ => Err(E::custom(format!("unknown severity: {value}"))),
                }
            }

            fn visit_bool<E>(self, value: bool) -> Result<Self::Value, E>
            where
                E: de::Error,
            {
                if value {
                    Err(E::invalid_value(de::Unexpected::Bool(true), &self))
                } else {
                    Ok(RuleSeverity::Off)
                }
            }
        }

        deserializer.deserialize_any(RuleSeverityVisitor)
    }
}

/// One preset name or a list of them
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
#[non_exhaustive]
pub enum ExtendsConfig {
    /// Single preset: `extends: recommended`
    Single(String),
    /// Multiple presets: `extends: [recommended]`
    Multiple(Vec<String>),
}

impl ExtendsConfig {
    /// Preset names in declaration order
    #[must_use]
    pub fn presets(&self) -> Vec<&str> {
        match self {
            Self::Single(s) => vec![s.as_str()],
            Self::Multiple(v) => v.iter().map(String::as_str).collect(),
        }
    }
}

/// Full configuration with optional presets and per-rule severities
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct FullValidationConfig {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub extends: Option<ExtendsConfig>,

    #[serde(default, skip_serializing_if = "HashMap::is_empty")]
    pub rules: HashMap<String, RuleSeverity>,
}

/// Which rules run, and at what severity
///
/// Accepted shapes:
///
/// ```yaml
/// # Preset only
/// recommended
///
/// # Listed rules only; everything else is off
/// rules:
///   unique_type_names: error
///   no_deprecated: warn
///
/// # Preset, then overrides
/// extends: recommended
/// rules:
///   no_deprecated: off
/// ```
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(untagged)]
#[non_exhaustive]
pub enum ValidationConfig {
    /// Preset(s): `recommended` or `[recommended]`
    Preset(ExtendsConfig),

    /// `extends` and/or `rules` map
    Full(FullValidationConfig),
}

const VALID_PRESETS: [&str; 1] = ["recommended"];

impl Default for ValidationConfig {
    fn default() -> Self {
        Self::recommended()
    }
}

impl ValidationConfig {
    /// Load a configuration file, choosing the format from its extension.
    #[tracing::instrument(skip_all, fields(path = %path.display()))]
    pub fn from_file(path: &Path) -> Result<Self, ConfigError> {
        let contents = std::fs::read_to_string(path)?;
        Self::parse(&contents, path)
    }

    /// Parse configuration text; `path` selects the format and labels errors.
    pub fn parse(contents: &str, path: &Path) -> Result<Self, ConfigError> {
        let extension = path
            .extension()
            .and_then(|ext| ext.to_str())
            .map(str::to_ascii_lowercase);
        let config: Self = match extension.as_deref() {
            Some("yml" | "yaml") => {
                serde_saphyr::from_str(contents).map_err(|e| ConfigError::Invalid {
                    path: path.to_path_buf(),
                    message: e.to_string(),
                })?
            }
            Some("json") => serde_json::from_str(contents).map_err(|e| ConfigError::Invalid {
                path: path.to_path_buf(),
                message: e.to_string(),
            })?,
            _ => return Err(ConfigError::UnsupportedFormat(path.to_path_buf())),
        };
        config.validate()?;
        tracing::debug!(?config, "Loaded validation config");
        Ok(config)
    }

    /// Validate the configuration against available rules and presets
    ///
    /// The error message lists the valid names.
    pub fn validate(&self) -> Result<(), ConfigError> {
        let (extends, rules) = match self {
            Self::Preset(presets) => (Some(presets), None),
            Self::Full(FullValidationConfig { extends, rules }) => (extends.as_ref(), Some(rules)),
        };

        if let Some(ext) = extends {
            for preset in ext.presets() {
                if !VALID_PRESETS.contains(&preset) {
                    return Err(ConfigError::UnknownNames(format!(
                        "Invalid preset name: '{preset}'\n\nValid presets are:\n  - recommended"
                    )));
                }
            }
        }

        let valid_rules = crate::registry::all_rule_names();
        let mut invalid_rules: Vec<&str> = rules
            .into_iter()
            .flat_map(|rules| rules.keys())
            .map(String::as_str)
            .filter(|rule| !valid_rules.iter().any(|valid| valid == rule))
            .collect();

        if invalid_rules.is_empty() {
            return Ok(());
        }

        use std::fmt::Write;
        invalid_rules.sort_unstable();
        let mut error = format!(
            "Invalid rule name(s): {}\n\nValid rule names are:\n",
            invalid_rules.join(", ")
        );
        for rule in &valid_rules {
            let _ = writeln!(error, "  - {rule}");
        }
        Err(ConfigError::UnknownNames(error))
    }

    /// Explicit rule entries win over preset severities
    #[must_use]
    pub fn get_severity(&self, rule_name: &str) -> Option<RuleSeverity> {
        match self {
            Self::Preset(presets) => Self::severity_from_presets(presets, rule_name),
            Self::Full(FullValidationConfig { extends, rules }) => {
                let preset_severity = extends
                    .as_ref()
                    .and_then(|ext| Self::severity_from_presets(ext, rule_name));

                rules.get(rule_name).copied().or(preset_severity)
            }
        }
    }

    /// A rule runs only when it resolves to `warn` or `error`
    #[must_use]
    pub fn is_enabled(&self, rule_name: &str) -> bool {
        matches!(
            self.get_severity(rule_name),
            Some(RuleSeverity::Warn | RuleSeverity::Error)
        )
    }

    #[must_use]
    pub fn recommended() -> Self {
        Self::Preset(ExtendsConfig::Single("recommended".to_string()))
    }

    /// Later presets override earlier ones
    fn severity_from_presets(presets: &ExtendsConfig, rule_name: &str) -> Option<RuleSeverity> {
        let mut severity = None;
        for preset in presets.presets() {
            if preset == "recommended" {
                if let Some(s) = Self::recommended_severity(rule_name) {
                    severity = Some(s);
                }
            }
        }
        severity
    }

    fn recommended_severity(rule_name: &str) -> Option<RuleSeverity> {
        match rule_name {
            "unique_directive_names" | "unique_type_names" => Some(RuleSeverity::Error),
            "no_deprecated" => Some(RuleSeverity::Warn),
            _ => None,
        }
    }
}
