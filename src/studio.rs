//! Authoring form boundary: maps the instructor's settings onto the
//! `studio_view_save` handler and reports through the host notifier.

use std::sync::LazyLock;

use regex::Regex;
use serde::{Deserialize, Deserializer, Serialize};
use thiserror::Error;
use tracing::warn;

use crate::widget::{Host, Notification, RequestError, Transport};

pub const SAVE_HANDLER: &str = "studio_view_save";

static LINE_BREAK: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"\s*\n\s*").unwrap());

#[derive(Error, Debug)]
pub enum SettingsError {
    #[error("invalid settings: {}", .0.join("; "))]
    Invalid(Vec<String>),

    #[error(transparent)]
    Request(#[from] RequestError),

    #[error("failed to parse settings: {0}")]
    Parse(#[from] serde_yaml_ng::Error),
}

#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
pub struct StudioSettings {
    pub display_name: String,
    pub prompt: String,
    #[serde(default)]
    pub weight: i64,
    /// 0 means unlimited
    #[serde(default)]
    pub max_attempts: i64,
    #[serde(default = "default_true")]
    pub display_correctness: bool,
    #[serde(default = "default_min_words")]
    pub min_word_count: i64,
    #[serde(default = "default_max_words")]
    pub max_word_count: i64,
    #[serde(default, deserialize_with = "keyphrases")]
    pub fullcredit_keyphrases: Vec<String>,
    #[serde(default, deserialize_with = "keyphrases")]
    pub halfcredit_keyphrases: Vec<String>,
}

fn default_true() -> bool {
    true
}

fn default_min_words() -> i64 {
    1
}

fn default_max_words() -> i64 {
    10000
}

// accepts either a list or a textarea value
fn keyphrases<'de, D>(deserializer: D) -> Result<Vec<String>, D::Error>
where
    D: Deserializer<'de>,
{
    #[derive(Deserialize)]
    #[serde(untagged)]
    enum Phrases {
        List(Vec<String>),
        Text(String),
    }

    Ok(match Phrases::deserialize(deserializer)? {
        Phrases::List(list) => list
            .iter()
            .map(|p| p.trim().to_string())
            .filter(|p| !p.is_empty())
            .collect(),
        Phrases::Text(text) => parse_keyphrases(&text),
    })
}

impl Default for StudioSettings {
    fn default() -> Self {
        Self {
            display_name: "Free-text Response".to_string(),
            prompt: "Please enter your response within this text area".to_string(),
            weight: 0,
            max_attempts: 0,
            display_correctness: true,
            min_word_count: default_min_words(),
            max_word_count: default_max_words(),
            fullcredit_keyphrases: Vec::new(),
            halfcredit_keyphrases: Vec::new(),
        }
    }
}

impl StudioSettings {
    pub fn from_yaml_str(source: &str) -> Result<Self, SettingsError> {
        Ok(serde_yaml_ng::from_str(source)?)
    }

    /// Every violated constraint, empty when the settings can be saved.
    pub fn validate(&self) -> Vec<String> {
        let mut problems = Vec::new();
        if self.weight < 0 {
            problems.push("Weight Attempts cannot be negative".to_string());
        }
        if self.max_attempts < 0 {
            problems.push("Maximum Attempts cannot be negative".to_string());
        }
        if self.min_word_count < 1 {
            problems.push("Minimum Word Count cannot be less than 1".to_string());
        }
        if self.min_word_count > self.max_word_count {
            problems.push("Minimum Word Count cannot be greater than Max Word Count".to_string());
        }
        problems
    }
}

/// Splits a keyphrase textarea into trimmed phrases, one per line.
pub fn parse_keyphrases(text: &str) -> Vec<String> {
    LINE_BREAK
        .split(text.trim())
        .filter(|p| !p.is_empty())
        .map(str::to_string)
        .collect()
}

pub fn save_settings(
    host: &Host,
    transport: &dyn Transport,
    settings: &StudioSettings,
) -> Result<(), SettingsError> {
    let problems = settings.validate();
    if !problems.is_empty() {
        return Err(SettingsError::Invalid(problems));
    }

    host.notify("save", &Notification::start("Saving..."));
    let body = serde_json::to_value(settings).map_err(RequestError::from)?;
    match transport.post_json(&host.handler_url(SAVE_HANDLER), &body) {
        Ok(_) => {
            host.notify("save", &Notification::end());
            Ok(())
        }
        Err(e) => {
            warn!(error = %e, "saving studio settings failed");
            host.notify("error", &Notification::empty());
            Err(e.into())
        }
    }
}

pub fn cancel(host: &Host) {
    host.notify("cancel", &Notification::empty());
}
