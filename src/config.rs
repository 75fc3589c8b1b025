//! Translator configuration.
//!
//! Every field has a default, so an empty TOML document is a valid config.

use std::collections::BTreeMap;
use std::time::Duration;

use serde::{Deserialize, Serialize};

use crate::error::{Result, TranslateError};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct TranslatorConfig {
    /// Binary that executes the wrapped CWL document.
    pub runner: String,
    /// Cheetah expression for the directory holding the CWL file next to the tool XML.
    pub tool_directory: String,
    /// Output name (and Cheetah variable) of the generated job document.
    pub job_file: String,
    /// Output name (and Cheetah variable) of the captured runner stdout.
    pub stdout_file: String,
    /// Version used when the document declares none.
    pub default_version: String,
    pub python_template_version: String,
    /// Import requirements/citations from a generated `macros.xml`.
    pub macros: bool,
    /// Shell command whose output becomes the help text when the document has no `doc`.
    pub help_from_command: Option<String>,
    pub help_timeout_secs: u64,
    /// Static format labels keyed by `prefix:tag`, e.g. `"edam:format_1930" = "fastq"`.
    pub formats: BTreeMap<String, String>,
}

impl Default for TranslatorConfig {
    fn default() -> Self {
        Self {
            runner: "cwltool".into(),
            tool_directory: "$__tool_directory__".into(),
            job_file: "job_gal".into(),
            stdout_file: "stdout_gal".into(),
            default_version: "0.1.0".into(),
            python_template_version: "3.5".into(),
            macros: false,
            help_from_command: None,
            help_timeout_secs: 30,
            formats: BTreeMap::new(),
        }
    }
}

impl TranslatorConfig {
    pub fn from_toml_str(text: &str) -> Result<Self> {
        toml::from_str(text).map_err(|e| TranslateError::Config(e.to_string()))
    }

    pub fn help_timeout(&self) -> Duration {
        Duration::from_secs(self.help_timeout_secs)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_toml_is_default() {
        let config = TranslatorConfig::from_toml_str("").unwrap();
        assert_eq!(config, TranslatorConfig::default());
        assert_eq!(config.help_timeout(), Duration::from_secs(30));
    }

    #[test]
    fn overrides_and_format_table() {
        let config = TranslatorConfig::from_toml_str(
            r#"
runner = "cwl-runner"
macros = true
help_timeout_secs = 5

[formats]
"edam:format_1930" = "fastq"
"#,
        )
        .unwrap();
        assert_eq!(config.runner, "cwl-runner");
        assert!(config.macros);
        assert_eq!(config.job_file, "job_gal");
        assert_eq!(config.formats.get("edam:format_1930").map(String::as_str), Some("fastq"));
    }

    #[test]
    fn invalid_toml_is_config_error() {
        let err = TranslatorConfig::from_toml_str("runner = [").unwrap_err();
        assert_eq!(err.code(), "C001");
    }
}
