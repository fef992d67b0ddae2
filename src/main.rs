use std::{env, fs};

use anyhow::{Context, Result};
use freetext::config::{BASE_URL_VAR, USAGE_ID_VAR};
use freetext::studio::{save_settings, StudioSettings};
use freetext::widget::{BaseUrlHandlers, Host, UreqTransport};
use tracing::info;
use tracing_subscriber::EnvFilter;

const BOLD: &str = "\x1b[1m";
const RESET: &str = "\x1b[0m";

fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .init();
    dotenv::dotenv().ok();

    let args: Vec<String> = env::args().collect();
    if args.len() < 2 {
        return Err(anyhow::anyhow!("Usage: cargo run <settings.yaml>"));
    }

    let source = fs::read_to_string(&args[1]).context(format!("failed to read {}", args[1]))?;
    let settings = StudioSettings::from_yaml_str(&source).context("failed to parse settings")?;

    let base_url = env::var(BASE_URL_VAR).context(format!("{} is not set", BASE_URL_VAR))?;
    let usage_id = env::var(USAGE_ID_VAR).context(format!("{} is not set", USAGE_ID_VAR))?;
    let host = Host::new(Box::new(BaseUrlHandlers::new(&base_url, &usage_id)), None);

    save_settings(&host, &UreqTransport::new(), &settings)
        .context(format!("failed to save settings for {}", usage_id))?;

    info!(usage_id = %usage_id, "studio settings saved");
    println!("saved {BOLD}{}{RESET} to {BOLD}{}{RESET}", settings.display_name, usage_id);
    Ok(())
}
