use crate::config::types::{
    Config, CrawlerConfig, DownloadConfig, OutputConfig, SeederConfig, UserAgentConfig,
};
use crate::ConfigError;
use url::Url;

/// Validates the entire configuration
pub fn validate(config: &Config) -> Result<(), ConfigError> {
    validate_seeder_config(&config.seeder)?;
    validate_crawler_config(&config.crawler)?;
    validate_download_config(&config.download)?;
    validate_user_agent_config(&config.user_agent)?;
    validate_output_config(&config.output)?;
    Ok(())
}

/// Validates the top-level page list
fn validate_seeder_config(config: &SeederConfig) -> Result<(), ConfigError> {
    if config.pages.is_empty() {
        return Err(ConfigError::Validation(
            "seeder.pages must list at least one page".to_string(),
        ));
    }

    for page in &config.pages {
        let url = Url::parse(page)
            .map_err(|e| ConfigError::InvalidUrl(format!("Invalid seed page '{}': {}", page, e)))?;

        if url.scheme() != "https" && url.scheme() != "http" {
            return Err(ConfigError::Validation(format!(
                "Seed page '{}' must use an HTTP(S) scheme",
                page
            )));
        }
    }

    Ok(())
}

/// Validates crawler configuration
fn validate_crawler_config(config: &CrawlerConfig) -> Result<(), ConfigError> {
    if config.max_depth < 1 {
        return Err(ConfigError::Validation(
            "max-depth must be >= 1, otherwise no page is ever fetched".to_string(),
        ));
    }

    if config.throttle_interval < 1 {
        return Err(ConfigError::Validation(format!(
            "throttle-interval must be >= 1, got {}",
            config.throttle_interval
        )));
    }

    if config.target_extensions.is_empty() {
        return Err(ConfigError::Validation(
            "target-extensions cannot be empty".to_string(),
        ));
    }

    if config.target_extensions.iter().any(|ext| ext.is_empty()) {
        return Err(ConfigError::Validation(
            "target-extensions cannot contain an empty suffix".to_string(),
        ));
    }

    // An empty prefix or suffix would block every link
    if config.blocked_schemes.iter().any(|s| s.is_empty())
        || config.blocked_extensions.iter().any(|s| s.is_empty())
    {
        return Err(ConfigError::Validation(
            "blocked-schemes and blocked-extensions cannot contain empty entries".to_string(),
        ));
    }

    Ok(())
}

/// Validates download gates
fn validate_download_config(config: &DownloadConfig) -> Result<(), ConfigError> {
    if config.max_file_size == 0 {
        return Err(ConfigError::Validation(
            "max-file-size must be > 0".to_string(),
        ));
    }

    if let Some(content_type) = &config.target_content_type {
        if content_type.trim().is_empty() {
            return Err(ConfigError::Validation(
                "target-content-type cannot be blank; omit it to disable the check".to_string(),
            ));
        }
    }

    Ok(())
}

/// Validates user agent configuration
fn validate_user_agent_config(config: &UserAgentConfig) -> Result<(), ConfigError> {
    // Validate crawler name: non-empty, alphanumeric + hyphens only
    if config.crawler_name.is_empty() {
        return Err(ConfigError::Validation(
            "crawler-name cannot be empty".to_string(),
        ));
    }

    if !config
        .crawler_name
        .chars()
        .all(|c| c.is_alphanumeric() || c == '-')
    {
        return Err(ConfigError::Validation(format!(
            "crawler-name must contain only alphanumeric characters and hyphens, got '{}'",
            config.crawler_name
        )));
    }

    Url::parse(&config.contact_url)
        .map_err(|e| ConfigError::InvalidUrl(format!("Invalid contact-url: {}", e)))?;

    Ok(())
}

/// Validates output configuration
fn validate_output_config(config: &OutputConfig) -> Result<(), ConfigError> {
    if config.root.trim().is_empty() {
        return Err(ConfigError::Validation(
            "output.root cannot be empty".to_string(),
        ));
    }
    Ok(())
}
