use anyhow::{Context, Result};
use forensic_alpha::{NormalizationMode, PipelineConfig};
use forensic_core::CanonicalVariable;
use serde::{Deserialize, Serialize};
use statement_normalizer::parse_aliases;
use std::env;
use std::path::PathBuf;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ScannerConfig {
    /// Statement table to read; stdin when unset
    pub input: Option<PathBuf>,
    pub normalization: NormalizationMode,
    pub pretty: bool,
    pub aliases: Vec<(String, CanonicalVariable)>,
    pub log_json: bool,
}

impl ScannerConfig {
    pub fn from_env() -> Result<Self> {
        Self::from_lookup(|key| env::var(key).ok())
    }

    fn from_lookup(var: impl Fn(&str) -> Option<String>) -> Result<Self> {
        let config = Self {
            input: var("FORENSIC_INPUT").and_then(input_path),
            normalization: var("FORENSIC_NORMALIZATION")
                .unwrap_or_else(|| "full".to_string())
                .parse()
                .context("FORENSIC_NORMALIZATION must be 'full' or 'expanding'")?,
            pretty: var("FORENSIC_PRETTY")
                .unwrap_or_else(|| "true".to_string())
                .trim()
                .parse()
                .context("FORENSIC_PRETTY must be true or false")?,
            aliases: parse_aliases(&var("FORENSIC_ALIASES").unwrap_or_default())
                .context("FORENSIC_ALIASES must look like 'label=variable;label=variable'")?,
            log_json: var("FORENSIC_LOG_JSON")
                .unwrap_or_else(|| "false".to_string())
                .trim()
                .parse()
                .context("FORENSIC_LOG_JSON must be true or false")?,
        };

        Ok(config)
    }

    /// A positional argument overrides `FORENSIC_INPUT`
    pub fn with_input_arg(mut self, arg: Option<String>) -> Self {
        if let Some(arg) = arg {
            self.input = input_path(arg);
        }
        self
    }

    pub fn pipeline(&self) -> PipelineConfig {
        PipelineConfig {
            normalization: self.normalization,
            aliases: self.aliases.clone(),
        }
    }
}

/// `-` and empty mean stdin
fn input_path(raw: String) -> Option<PathBuf> {
    match raw.trim() {
        "" | "-" => None,
        path => Some(PathBuf::from(path)),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn config(vars: &[(&str, &str)]) -> Result<ScannerConfig> {
        let vars: HashMap<String, String> = vars
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        ScannerConfig::from_lookup(|key| vars.get(key).cloned())
    }

    #[test]
    fn test_defaults() {
        let config = config(&[]).unwrap();
        assert_eq!(config.input, None);
        assert_eq!(config.normalization, NormalizationMode::FullSeries);
        assert!(config.pretty);
        assert!(config.aliases.is_empty());
        assert!(!config.log_json);
        assert_eq!(config.pipeline(), PipelineConfig::default());
    }

    #[test]
    fn test_overrides() {
        let config = config(&[
            ("FORENSIC_INPUT", "statements.json"),
            ("FORENSIC_NORMALIZATION", "expanding"),
            ("FORENSIC_PRETTY", "false"),
            ("FORENSIC_ALIASES", "Umsatz=revenue; Bilanzsumme=total_assets"),
            ("FORENSIC_LOG_JSON", "true"),
        ])
        .unwrap();

        assert_eq!(config.input, Some(PathBuf::from("statements.json")));
        assert_eq!(config.normalization, NormalizationMode::Expanding);
        assert!(!config.pretty);
        assert!(config.log_json);
        assert_eq!(
            config.aliases,
            vec![
                ("Umsatz".to_string(), CanonicalVariable::Revenue),
                ("Bilanzsumme".to_string(), CanonicalVariable::TotalAssets),
            ]
        );
    }

    #[test]
    fn test_invalid_values() {
        assert!(config(&[("FORENSIC_NORMALIZATION", "rolling")]).is_err());
        assert!(config(&[("FORENSIC_PRETTY", "sometimes")]).is_err());
        assert!(config(&[("FORENSIC_ALIASES", "Umsatz")]).is_err());
        assert!(config(&[("FORENSIC_ALIASES", "Umsatz=goodwill")]).is_err());
    }

    #[test]
    fn test_input_argument() {
        let config = config(&[("FORENSIC_INPUT", "a.json")]).unwrap();
        let config = config.with_input_arg(Some("b.json".to_string()));
        assert_eq!(config.input, Some(PathBuf::from("b.json")));

        let config = config.with_input_arg(Some("-".to_string()));
        assert_eq!(config.input, None);

        let config = config.with_input_arg(None);
        assert_eq!(config.input, None);
    }
}
