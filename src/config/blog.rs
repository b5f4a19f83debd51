//! Blog behaviour settings

use serde::Deserialize;

use super::error::ValidationError;

/// Blog behaviour settings
#[derive(Debug, Clone, Deserialize)]
pub struct BlogConfig {
    /// Posts per listing page
    #[serde(default = "default_page_size")]
    pub page_size: u32,

    /// Characters kept in a post excerpt
    #[serde(default = "default_excerpt_chars")]
    pub excerpt_chars: usize,

    /// Entries in each sidebar ranking
    #[serde(default = "default_sidebar_limit")]
    pub sidebar_limit: u32,

    /// Lifetime of subscription confirmation tokens in seconds
    #[serde(default = "default_subscription_ttl")]
    pub subscription_ttl_secs: i64,
}

/// Longest accepted subscription token lifetime: one year.
pub const MAX_SUBSCRIPTION_TTL_SECS: i64 = 365 * 24 * 60 * 60;

impl BlogConfig {
    /// Subscription token lifetime
    pub fn subscription_ttl(&self) -> Result<chrono::Duration, ValidationError> {
        self.check_ttl()?;
        chrono::Duration::try_seconds(self.subscription_ttl_secs).ok_or_else(ttl_out_of_range)
    }

    /// Validate blog settings
    pub fn validate(&self) -> Result<(), ValidationError> {
        check_range("page_size", self.page_size as u64, 1, 100)?;
        check_range("excerpt_chars", self.excerpt_chars as u64, 1, 10_000)?;
        check_range("sidebar_limit", self.sidebar_limit as u64, 1, 50)?;
        self.check_ttl()
    }

    fn check_ttl(&self) -> Result<(), ValidationError> {
        if !(1..=MAX_SUBSCRIPTION_TTL_SECS).contains(&self.subscription_ttl_secs) {
            return Err(ttl_out_of_range());
        }
        Ok(())
    }
}

fn ttl_out_of_range() -> ValidationError {
    ValidationError::OutOfRange {
        field: "subscription_ttl_secs",
        min: 1,
        max: MAX_SUBSCRIPTION_TTL_SECS as u64,
    }
}

pub(super) fn check_range(field: &'static str, value: u64, min: u64, max: u64) -> Result<(), ValidationError> {
    if value < min || value > max {
        return Err(ValidationError::OutOfRange { field, min, max });
    }
    Ok(())
}

impl Default for BlogConfig {
    fn default() -> Self {
        Self {
            page_size: default_page_size(),
            excerpt_chars: default_excerpt_chars(),
            sidebar_limit: default_sidebar_limit(),
            subscription_ttl_secs: default_subscription_ttl(),
        }
    }
}

fn default_page_size() -> u32 {
    crate::domain::foundation::DEFAULT_PAGE_SIZE
}

fn default_excerpt_chars() -> usize {
    crate::domain::post::DEFAULT_EXCERPT_CHARS
}

fn default_sidebar_limit() -> u32 {
    crate::ports::DEFAULT_RANKING_LIMIT
}

fn default_subscription_ttl() -> i64 {
    // one day
    86_400
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_blog_defaults() {
        let config = BlogConfig::default();
        assert_eq!(config.page_size, 10);
        assert_eq!(config.excerpt_chars, 300);
        assert_eq!(config.sidebar_limit, 5);
        assert_eq!(config.subscription_ttl().unwrap(), chrono::Duration::days(1));
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_zero_page_size_rejected() {
        let config = BlogConfig {
            page_size: 0,
            ..Default::default()
        };
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_non_positive_ttl_rejected() {
        let config = BlogConfig {
            subscription_ttl_secs: 0,
            ..Default::default()
        };
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_huge_ttl_rejected() {
        let config = BlogConfig {
            subscription_ttl_secs: i64::MAX,
            ..Default::default()
        };
        assert!(config.validate().is_err());
        assert!(config.subscription_ttl().is_err());
    }

    #[test]
    fn test_one_year_ttl_accepted() {
        let config = BlogConfig {
            subscription_ttl_secs: MAX_SUBSCRIPTION_TTL_SECS,
            ..Default::default()
        };
        assert!(config.validate().is_ok());
        assert_eq!(config.subscription_ttl().unwrap(), chrono::Duration::days(365));
    }
}
