pub mod structured_console_encoder;

use std::path::Path;
use std::sync::OnceLock;

use anyhow::{Context, Result, anyhow};
use log::{debug, info};
use log4rs::{
    Config,
    config::{Deserializers, RawConfig},
};

use crate::log::structured_console_encoder::StructuredConsoleEncoderDeserializer;

const DEFAULT_LOG_CONFIG: &str = "log4rs.yml";

/// Initializes logging from `log4rs.yml` in the working directory (or `path`
/// when given), falling back to the embedded defaults.
pub fn init_logging(path: Option<&Path>) -> Result<()> {
    let mut deserializers = Deserializers::default();
    deserializers.insert("structured_console", StructuredConsoleEncoderDeserializer);

    let path = path.unwrap_or(Path::new(DEFAULT_LOG_CONFIG));
    if path.exists() {
        log4rs::init_file(path, deserializers)
            .with_context(|| format!("Failed to load logging configuration {}", path.display()))?;
        info!(path:% = path.display(); "Logging initialized from external configuration");
        return Ok(());
    }

    let yaml_content = include_str!("../../resources/default_log4rs.yml");
    let raw_config: RawConfig =
        serde_yaml::from_str(yaml_content).context("Embedded logging configuration is invalid YAML")?;

    let (appenders, errors) = raw_config.appenders_lossy(&deserializers);
    if !errors.is_empty() {
        return Err(anyhow!("Errors parsing embedded appenders: {:?}", errors));
    }

    let config = Config::builder()
        .appenders(appenders)
        .loggers(raw_config.loggers())
        .build(raw_config.root())
        .context("Failed to build logging config")?;

    log4rs::init_config(config).context("Failed to initialize logging from embedded config")?;

    debug!("Logging initialized from embedded defaults (no external log4rs.yml found)");
    Ok(())
}

fn reveal_pii() -> bool {
    static REVEAL_PII_CACHE: OnceLock<bool> = OnceLock::new();

    *REVEAL_PII_CACHE.get_or_init(|| {
        std::env::var("RAVEN_REVEAL_PII")
            .map(|v| {
                let val = v.to_lowercase();
                val == "true" || val == "1"
            })
            .unwrap_or(false)
    })
}

/// Masks a string (like an address or user name) showing only start and end characters.
/// If RAVEN_REVEAL_PII is true, returns the original string.
pub fn mask_string(s: &str) -> String {
    if reveal_pii() {
        return s.to_string();
    }
    mask(s)
}

fn mask(s: &str) -> String {
    let chars: Vec<char> = s.chars().collect();
    if chars.len() <= 12 {
        return "***".to_string();
    }

    let head: String = chars[..6].iter().collect();
    let tail: String = chars[chars.len() - 6..].iter().collect();
    format!("{head}...{tail}")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn short_values_are_hidden() {
        assert_eq!(mask("raven"), "***");
        assert_eq!(mask(""), "***");
    }

    #[test]
    fn long_values_keep_ends() {
        assert_eq!(mask("RXissueAssetXXXXXXXXXXXXXXXXXaSdkr"), "RXissu...XaSdkr");
        assert_eq!(mask("ééééééééééééééé"), "éééééé...éééééé");
    }
}
