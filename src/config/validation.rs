use crate::config::types::{ApiConfig, Config, CrawlerConfig, FeedConfig, OutputConfig};
use crate::ConfigError;
use url::Url;

/// Validates the entire configuration
pub fn validate(config: &Config) -> Result<(), ConfigError> {
    validate_api_config(&config.api)?;
    validate_crawler_config(&config.crawler)?;
    validate_feed_config(&config.feed)?;
    validate_not_empty("comments.sort-by", &config.comments.sort_by)?;
    validate_output_config(&config.output)?;
    Ok(())
}

/// Validates API connection settings
fn validate_api_config(config: &ApiConfig) -> Result<(), ConfigError> {
    let url = Url::parse(&config.base_url)
        .map_err(|e| ConfigError::InvalidUrl(format!("Invalid base-url: {}", e)))?;

    if url.scheme() != "https" && url.scheme() != "http" {
        return Err(ConfigError::InvalidUrl(format!(
            "base-url '{}' must use http or https",
            config.base_url
        )));
    }

    if url.host_str().is_none() {
        return Err(ConfigError::InvalidUrl(format!(
            "base-url '{}' has no host",
            config.base_url
        )));
    }

    if !config.referer_path.starts_with('/') {
        return Err(ConfigError::Validation(format!(
            "referer-path must start with '/', got '{}'",
            config.referer_path
        )));
    }

    validate_not_empty("api.locale", &config.locale)?;

    if config.timeout_secs < 1 {
        return Err(ConfigError::Validation(
            "timeout-secs must be >= 1".to_string(),
        ));
    }

    Ok(())
}

/// Validates pagination settings
fn validate_crawler_config(config: &CrawlerConfig) -> Result<(), ConfigError> {
    if config.min_offset < 0 {
        return Err(ConfigError::Validation(format!(
            "min-offset must be >= 0, got {}",
            config.min_offset
        )));
    }

    Ok(())
}

fn validate_feed_config(config: &FeedConfig) -> Result<(), ConfigError> {
    validate_not_empty("feed.cid", &config.cid)?;
    validate_not_empty("feed.sort-by", &config.sort_by)?;
    validate_not_empty("feed.tag-id", &config.tag_id)?;
    Ok(())
}

/// Validates output locations
fn validate_output_config(config: &OutputConfig) -> Result<(), ConfigError> {
    if config.data_dir.as_os_str().is_empty() {
        return Err(ConfigError::Validation(
            "data-dir cannot be empty".to_string(),
        ));
    }

    validate_not_empty("output.comments-dir", &config.comments_dir)?;
    validate_not_empty("output.manifest", &config.manifest)?;

    if config.log_file.as_os_str().is_empty() {
        return Err(ConfigError::Validation(
            "log-file cannot be empty".to_string(),
        ));
    }

    Ok(())
}

fn validate_not_empty(key: &str, value: &str) -> Result<(), ConfigError> {
    if value.trim().is_empty() {
        return Err(ConfigError::Validation(format!("{} cannot be empty", key)));
    }
    Ok(())
}
