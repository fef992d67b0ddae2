use std::env;

use anyhow::Context;

use crate::widget::WidgetLabels;

pub const BASE_URL_VAR: &str = "FREETEXT_BASE_URL";
pub const USAGE_ID_VAR: &str = "FREETEXT_USAGE_ID";
pub const NO_RESPONSES_VAR: &str = "FREETEXT_NO_RESPONSES_TEXT";

#[derive(Debug, Clone)]
pub struct ConsoleConfig {
    /// LMS root the handler URLs are resolved against
    pub base_url: String,
    pub usage_id: String,
    pub labels: WidgetLabels,
}

impl ConsoleConfig {
    /// Reads the configuration from the environment, loading `.env` first.
    pub fn from_env() -> anyhow::Result<Self> {
        dotenv::dotenv().ok();
        Self::from_lookup(|key| env::var(key).ok())
    }

    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> anyhow::Result<Self> {
        let base_url = lookup(BASE_URL_VAR)
            .filter(|v| !v.trim().is_empty())
            .context(format!("{} must be set to the LMS base URL", BASE_URL_VAR))?;
        let usage_id = lookup(USAGE_ID_VAR)
            .filter(|v| !v.trim().is_empty())
            .context(format!("{} must be set to the question's usage id", USAGE_ID_VAR))?;

        let mut labels = WidgetLabels::default();
        if let Some(text) = lookup(NO_RESPONSES_VAR) {
            labels.no_responses = text;
        }

        Ok(Self {
            base_url,
            usage_id,
            labels,
        })
    }
}
