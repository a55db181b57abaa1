use super::{types::Config, ConfigError};

/// Validate configuration
/// Currently validates:
/// - Quality is within 1-100
/// - Intake limits are not 0
/// - Archive name is not empty
pub fn validate_config(config: &Config) -> Result<(), ConfigError> {
    let quality = config.conversion.quality;
    if !(1..=100).contains(&quality) {
        return Err(ConfigError::ValidationError(format!(
            "conversion.quality must be between 1 and 100, got {}",
            quality
        )));
    }

    if config.intake.max_files == 0 {
        return Err(ConfigError::ValidationError(
            "intake.max_files cannot be 0".to_string(),
        ));
    }

    if config.intake.max_file_bytes == 0 {
        return Err(ConfigError::ValidationError(
            "intake.max_file_bytes cannot be 0".to_string(),
        ));
    }

    if config.output.archive_name.trim().is_empty() {
        return Err(ConfigError::ValidationError(
            "output.archive_name cannot be empty".to_string(),
        ));
    }

    Ok(())
}
