use figment::{
    providers::{Env, Format, Serialized, Toml},
    Figment,
};
use std::path::Path;

use super::{types::Config, ConfigError};

/// Prefix for environment variable overrides, e.g. `WEBPIFY_CONVERSION__QUALITY`.
pub const ENV_PREFIX: &str = "WEBPIFY_";

/// Load configuration from file with environment variable overrides
pub fn load_config(path: &Path) -> Result<Config, ConfigError> {
    if !path.exists() {
        return Err(ConfigError::FileNotFound(path.display().to_string()));
    }

    Figment::from(Serialized::defaults(Config::default()))
        .merge(Toml::file(path))
        .merge(Env::prefixed(ENV_PREFIX).split("__"))
        .extract()
        .map_err(|e| ConfigError::ParseError(e.to_string()))
}

/// Load built-in defaults with environment variable overrides (no file)
pub fn load_default_config() -> Result<Config, ConfigError> {
    Figment::from(Serialized::defaults(Config::default()))
        .merge(Env::prefixed(ENV_PREFIX).split("__"))
        .extract()
        .map_err(|e| ConfigError::ParseError(e.to_string()))
}

/// Load configuration from TOML string (useful for testing)
pub fn load_config_from_str(toml_str: &str) -> Result<Config, ConfigError> {
    toml::from_str(toml_str).map_err(|e| ConfigError::ParseError(e.to_string()))
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;
    use tempfile::NamedTempFile;

    #[test]
    fn test_load_config_from_str_valid() {
        let toml = r#"
[conversion]
quality = 60
"#;
        let config = load_config_from_str(toml).unwrap();
        assert_eq!(config.conversion.quality, 60);
    }

    #[test]
    fn test_load_config_from_str_bad_type() {
        let toml = r#"
[conversion]
quality = "high"
"#;
        let result = load_config_from_str(toml);
        assert!(result.is_err());
        let err = result.unwrap_err();
        assert!(matches!(err, ConfigError::ParseError(_)));
    }

    #[test]
    fn test_load_config_file_not_found() {
        let result = load_config(Path::new("/nonexistent/webpify.toml"));
        assert!(result.is_err());
        let err = result.unwrap_err();
        assert!(matches!(err, ConfigError::FileNotFound(_)));
    }

    #[test]
    fn test_load_config_from_file() {
        let mut temp_file = NamedTempFile::new().unwrap();
        writeln!(
            temp_file,
            r#"
[conversion]
quality = 92

[output]
archive_name = "batch.zip"
"#
        )
        .unwrap();

        let config = load_config(temp_file.path()).unwrap();
        assert_eq!(config.conversion.quality, 92);
        assert_eq!(config.output.archive_name, "batch.zip");
        assert_eq!(config.intake.max_files, 50);
    }

    #[test]
    fn test_env_override() {
        figment::Jail::expect_with(|jail| {
            jail.create_file("webpify.toml", "[conversion]\nquality = 40\n")?;
            jail.set_env("WEBPIFY_CONVERSION__QUALITY", "55");
            jail.set_env("WEBPIFY_INTAKE__MAX_FILES", "5");

            let config = load_config(Path::new("webpify.toml")).unwrap();
            assert_eq!(config.conversion.quality, 55);
            assert_eq!(config.intake.max_files, 5);
            Ok(())
        });
    }
}
