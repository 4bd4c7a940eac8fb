//! Localized message lookup
//!
//! Messages are `key -> template` pairs loaded from YAML. Templates may use
//! `:name` placeholders which are substituted from the parameters passed to
//! [`Translator::trans`].

use regex::Regex;
use std::collections::HashMap;
use std::sync::LazyLock;

use crate::core::error::{ProposalError, Result};

const ENGLISH: &str = include_str!("../../lang/en.yaml");

static PLACEHOLDER: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r":([a-z_]+)").expect("placeholder pattern is valid"));

/// Message bundle for one locale
#[derive(Debug, Clone)]
pub struct Translator {
    locale: String,
    messages: HashMap<String, String>,
}

impl Translator {
    /// Built-in English bundle
    pub fn english() -> Self {
        let messages = serde_yaml::from_str(ENGLISH).unwrap_or_else(|e| {
            tracing::error!("embedded English messages are invalid: {}", e);
            HashMap::new()
        });
        Self {
            locale: "en".to_string(),
            messages,
        }
    }

    pub fn from_yaml_str(locale: &str, yaml: &str) -> Result<Self> {
        let messages: HashMap<String, String> = serde_yaml::from_str(yaml)?;
        Ok(Self {
            locale: locale.to_string(),
            messages,
        })
    }

    /// English defaults overlaid with the entries of a YAML file
    pub fn from_yaml_file(locale: &str, path: &str) -> Result<Self> {
        let content = std::fs::read_to_string(path)
            .map_err(|e| ProposalError::Config(format!("{}: {}", path, e)))?;
        let overrides = Self::from_yaml_str(locale, &content)?;

        let mut translator = Self::english();
        translator.locale = overrides.locale;
        translator.messages.extend(overrides.messages);
        Ok(translator)
    }

    pub fn locale(&self) -> &str {
        &self.locale
    }

    /// Translate `key`, falling back to the key itself when unknown
    pub fn trans(&self, key: &str, params: &[(&str, &str)]) -> String {
        let Some(template) = self.messages.get(key) else {
            return key.to_string();
        };

        PLACEHOLDER
            .replace_all(template, |caps: &regex::Captures<'_>| {
                params
                    .iter()
                    .find(|(name, _)| *name == &caps[1])
                    .map(|(_, value)| value.to_string())
                    .unwrap_or_else(|| caps[0].to_string())
            })
            .into_owned()
    }
}

impl Default for Translator {
    fn default() -> Self {
        Self::english()
    }
}
