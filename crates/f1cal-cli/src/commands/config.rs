//! Configuration commands.

use std::path::Path;

use crate::config::Config;
use crate::error::{CliError, CliResult};

/// Dump the current configuration to stdout.
pub fn dump(config: &Config, path: &Path) -> CliResult<()> {
    let toml_str = toml::to_string_pretty(config)
        .map_err(|e| CliError::Config(format!("failed to serialize config: {}", e)))?;
    println!("# config.toml ({})", path.display());
    println!("{}", toml_str);

    Ok(())
}

/// Validate the configuration: configured venues must use known timezones,
/// `zoneinfo_dir` must be a directory when set, and the publisher name must be
/// writable as a `CN` parameter.
pub fn validate(config: &Config) -> CliResult<()> {
    check(config)?;
    println!("Configuration is valid.");
    Ok(())
}

fn check(config: &Config) -> CliResult<()> {
    let registry = config.registry()?;

    if let Some(dir) = &config.zoneinfo_dir
        && !dir.is_dir()
    {
        return Err(CliError::Config(format!(
            "zoneinfo_dir {} is not a directory",
            dir.display()
        )));
    }

    if config.publisher.name.contains('"') {
        return Err(CliError::Config(
            "publisher name must not contain '\"'".to_string(),
        ));
    }

    if config.publisher.email.trim().is_empty() {
        return Err(CliError::Config("publisher email must not be empty".to_string()));
    }

    if config
        .summary
        .corrections
        .iter()
        .any(|c| c.from.trim().is_empty())
    {
        return Err(CliError::Config(
            "summary corrections must have a non-empty `from`".to_string(),
        ));
    }

    tracing::debug!(venues = registry.len(), "Configuration checked");
    Ok(())
}

/// Show the configuration file path.
pub fn path(path: &Path) -> CliResult<()> {
    println!("config: {}", path.display());
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_config_is_valid() {
        assert!(check(&Config::default()).is_ok());
    }

    #[test]
    fn missing_zoneinfo_dir_is_invalid() {
        let config = Config::parse("zoneinfo_dir = \"/nonexistent/f1cal/zoneinfo\"").unwrap();
        assert!(matches!(check(&config), Err(CliError::Config(_))));
    }

    #[test]
    fn empty_email_is_invalid() {
        let config = Config::parse("[publisher]\nemail = \"\"").unwrap();
        assert!(check(&config).is_err());
    }

    #[test]
    fn quoted_publisher_name_is_invalid() {
        let config = Config::parse("[publisher]\nname = 'The \"Pit Wall\"'").unwrap();
        assert_eq!(config.publisher.name, "The \"Pit Wall\"");
        assert!(matches!(check(&config), Err(CliError::Config(msg)) if msg.contains("publisher name")));
    }

    #[test]
    fn empty_correction_is_invalid() {
        let config = Config::parse("[[summary.corrections]]\nfrom = \" \"\nto = \"X\"").unwrap();
        assert!(check(&config).is_err());
    }
}
