use std::{fs, fs::File, io::Write, path::Path};

use anyhow::{Context, Result};
use config::{Config, Environment, Map};
use log::{debug, info};

use super::ClientConfig;

const ENV_PREFIX: &str = "RAVEN";

pub fn get_default_config() -> &'static str {
    include_str!("../../config/config.toml")
}

/// Loads the configuration file at `path`, creating it from the defaults if it
/// does not exist, with `RAVEN_*` environment variables layered on top.
pub fn load_configuration(path: &Path) -> Result<ClientConfig> {
    load_configuration_with_env(path, None)
}

/// Like [`load_configuration`], reading the overrides from `env` instead of the
/// process environment when it is given.
pub fn load_configuration_with_env(path: &Path, env: Option<Map<String, String>>) -> Result<ClientConfig> {
    if !path.exists() {
        write_config_to(path, get_default_config()).context("Could not create default config")?;
        info!(path:% = path.display(); "Created new configuration file");
    }

    let filename = path.to_str().context("Invalid config file path")?;

    let cfg = Config::builder()
        .add_source(config::File::with_name(filename))
        .add_source(
            Environment::with_prefix(ENV_PREFIX)
                .prefix_separator("_")
                .separator("__")
                .try_parsing(true)
                .source(env),
        )
        .build()
        .context("Could not build config")?;

    let client_config: ClientConfig = cfg.try_deserialize().context("Invalid configuration")?;
    client_config.validate().context("Invalid configuration")?;

    debug!(path:% = path.display(), config:? = client_config; "Configuration loaded");
    Ok(client_config)
}

/// Writes the default configuration to `path`. An existing file is only
/// replaced when `force` is set. Returns whether the file was written.
pub fn init_config(path: &Path, force: bool) -> Result<bool> {
    if path.exists() && !force {
        return Ok(false);
    }
    write_config_to(path, get_default_config())?;
    info!(path:% = path.display(); "Wrote default configuration file");
    Ok(true)
}

pub fn write_config_to(path: &Path, source: &str) -> Result<()> {
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent).context("Failed to create parent directories")?;
    };

    let mut file = File::create(path).context("Failed to create config file")?;
    file.write_all(source.as_bytes())
        .context("Failed to write config content")?;
    file.write_all(b"\n").context("Failed to write newline")?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    fn env(pairs: &[(&str, &str)]) -> Option<Map<String, String>> {
        Some(pairs.iter().map(|(k, v)| (k.to_string(), v.to_string())).collect())
    }

    #[test]
    fn missing_file_is_created_from_defaults() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("nested").join("raven.toml");

        let config = load_configuration_with_env(&path, env(&[])).unwrap();

        assert!(path.exists());
        assert_eq!(config.url.as_str(), "http://127.0.0.1:8766/");
        assert_eq!(config.username, "raven");
        assert_eq!(config.queue_size, 16);
        assert_eq!(config.timeout_secs, 30);
        assert!(config.headers.is_empty());
    }

    #[test]
    fn file_values_are_read() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("raven.toml");
        write_config_to(
            &path,
            r#"
url = "https://node.example:8766"
username = "alice"
password = "pw"
queue_size = 4

[headers]
X-Client = "tests"
"#,
        )
        .unwrap();

        let config = load_configuration_with_env(&path, env(&[])).unwrap();

        assert_eq!(config.url.host_str(), Some("node.example"));
        assert_eq!(config.username, "alice");
        assert_eq!(config.password, "pw");
        assert_eq!(config.queue_size, 4);
        assert_eq!(config.timeout_secs, 30);
        assert_eq!(config.headers.get("X-Client").map(String::as_str), Some("tests"));
    }

    #[test]
    fn environment_overrides_file() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("raven.toml");

        let config = load_configuration_with_env(
            &path,
            env(&[
                ("RAVEN_USERNAME", "bob"),
                ("RAVEN_PASSWORD", "from-env"),
                ("RAVEN_QUEUE_SIZE", "2"),
                ("RAVEN_TIMEOUT_SECS", "5"),
            ]),
        )
        .unwrap();

        assert_eq!(config.username, "bob");
        assert_eq!(config.password, "from-env");
        assert_eq!(config.queue_size, 2);
        assert_eq!(config.timeout_secs, 5);
    }

    #[test]
    fn header_names_from_environment_are_lowercased() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("raven.toml");
        write_config_to(
            &path,
            r#"
url = "http://127.0.0.1:8766"
username = "raven"

[headers]
X-Client = "file"
"#,
        )
        .unwrap();

        let config = load_configuration_with_env(&path, env(&[("RAVEN_HEADERS__X_CLIENT", "env")])).unwrap();

        assert_eq!(config.headers.get("X-Client").map(String::as_str), Some("file"));
        assert_eq!(config.headers.get("x_client").map(String::as_str), Some("env"));
        assert!(!config.headers.contains_key("X_CLIENT"));
    }

    #[test]
    fn invalid_values_are_rejected() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("raven.toml");

        let result = load_configuration_with_env(&path, env(&[("RAVEN_QUEUE_SIZE", "0")]));
        assert!(result.is_err());

        let oversized = (tokio::sync::Semaphore::MAX_PERMITS as u64 + 1).to_string();
        let result = load_configuration_with_env(&path, env(&[("RAVEN_QUEUE_SIZE", oversized.as_str())]));
        assert!(result.is_err());
    }

    #[test]
    fn init_config_respects_force() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("raven.toml");

        assert!(init_config(&path, false).unwrap());
        fs::write(&path, "username = \"edited\"").unwrap();

        assert!(!init_config(&path, false).unwrap());
        assert_eq!(fs::read_to_string(&path).unwrap(), "username = \"edited\"");

        assert!(init_config(&path, true).unwrap());
        assert!(fs::read_to_string(&path).unwrap().contains("queue_size = 16"));
    }
}
