mod types;

pub use types::*;

use anyhow::{Context, Result};
use std::path::Path;

/// Load configuration from a TOML file
pub fn load_config(path: &Path) -> Result<Config> {
    let content = std::fs::read_to_string(path)
        .with_context(|| format!("Failed to read config file: {:?}", path))?;

    let config: Config = toml::from_str(&content)
        .with_context(|| format!("Failed to parse config file: {:?}", path))?;

    validate_config(&config)?;

    Ok(config)
}

/// Load config from default locations or return default config
pub fn load_config_or_default(custom_path: Option<&Path>) -> Result<Config> {
    if let Some(path) = custom_path {
        return load_config(path);
    }

    // Try default locations
    let default_paths = [
        "./cinegen.toml",
        "~/.config/cinegen/config.toml",
        "/etc/cinegen/config.toml",
    ];

    for path_str in default_paths {
        let path = shellexpand::tilde(path_str);
        let path = Path::new(path.as_ref());
        if path.exists() {
            return load_config(path);
        }
    }

    Ok(Config::default())
}

/// Validate configuration
pub fn validate_config(config: &Config) -> Result<()> {
    let base_url = config.service.base_url.trim();
    if base_url.is_empty() {
        anyhow::bail!("Service base_url cannot be empty");
    }
    if !(base_url.starts_with("http://") || base_url.starts_with("https://")) {
        anyhow::bail!(
            "Service base_url must start with http:// or https://, got '{}'",
            base_url
        );
    }

    if config.service.timeout_secs == 0 {
        anyhow::bail!("Service timeout_secs cannot be 0");
    }

    let wizard = &config.wizard;
    if wizard.max_scene_count == 0 {
        anyhow::bail!("Wizard max_scene_count cannot be 0");
    }
    if wizard.default_scene_count == 0 || wizard.default_scene_count > wizard.max_scene_count {
        anyhow::bail!(
            "Wizard default_scene_count must be between 1 and {}, got {}",
            wizard.max_scene_count,
            wizard.default_scene_count
        );
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_are_valid() {
        let config = Config::default();
        validate_config(&config).unwrap();
        assert_eq!(config.service.base_url, "http://127.0.0.1:5000");
        assert_eq!(config.wizard.default_scene_count, 5);
    }

    #[test]
    fn empty_document_uses_defaults() {
        let config: Config = toml::from_str("").unwrap();
        assert_eq!(config.service.timeout_secs, 600);
        assert_eq!(config.wizard.max_scene_count, 12);
    }

    #[test]
    fn rejects_non_http_base_url() {
        let mut config = Config::default();
        config.service.base_url = "ftp://example.com".into();
        let err = validate_config(&config).unwrap_err();
        assert!(err.to_string().contains("http://"));
    }

    #[test]
    fn rejects_zero_timeout() {
        let mut config = Config::default();
        config.service.timeout_secs = 0;
        assert!(validate_config(&config).is_err());
    }

    #[test]
    fn rejects_default_count_above_max() {
        let mut config = Config::default();
        config.wizard.default_scene_count = 20;
        assert!(validate_config(&config).is_err());
    }
}
