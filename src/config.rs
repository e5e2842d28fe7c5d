//! Audit configuration: URL template, batch size, concurrency cap and the
//! expected image format.
//!
//! Everything the pipeline needs is carried by an [`AuditConfig`] value that
//! is validated once, before any request is dispatched. A config that fails
//! validation is the only condition that aborts a run.

use thiserror::Error;
use url::Url;

/// Placeholder replaced by the decimal identifier in a [`UrlTemplate`].
pub const ID_PLACEHOLDER: &str = "{id}";

/// Default icon URL template.
pub const DEFAULT_URL_TEMPLATE: &str = "https://content.cdn.viber.com/apps/icons/100/{id}/icon.png";

/// Default number of identifiers audited (`[0, 20000)`).
pub const DEFAULT_COUNT: u32 = 20_000;

/// Default number of in-flight requests.
pub const DEFAULT_CONCURRENCY: usize = 100;

/// Minimum allowed concurrency value.
pub const MIN_CONCURRENCY: usize = 1;

/// Maximum allowed concurrency value.
pub const MAX_CONCURRENCY: usize = 1000;

/// Default expected format name.
pub const DEFAULT_EXPECTED_FORMAT: &str = "png";

/// Errors detected while validating an audit configuration.
#[derive(Debug, Error)]
pub enum ConfigError {
    /// Template is missing the `{id}` placeholder.
    #[error(
        "invalid URL template {template:?}: missing {placeholder} placeholder",
        placeholder = ID_PLACEHOLDER
    )]
    MissingPlaceholder {
        /// The rejected template.
        template: String,
    },

    /// Template renders to something that is not an http(s) URL.
    #[error("invalid URL template {template:?}: {reason}")]
    InvalidTemplate {
        /// The rejected template.
        template: String,
        /// Why the rendered URL was rejected.
        reason: String,
    },

    /// Concurrency outside the supported range.
    #[error(
        "invalid concurrency value {value}: must be between {min} and {max}",
        min = MIN_CONCURRENCY,
        max = MAX_CONCURRENCY
    )]
    InvalidConcurrency {
        /// The invalid value that was provided.
        value: usize,
    },

    /// Expected format is empty or not known to the format sniffer.
    #[error("unsupported expected format {format:?}")]
    UnsupportedFormat {
        /// The rejected format name.
        format: String,
    },
}

/// Icon URL pattern with a single `{id}` placeholder.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UrlTemplate {
    template: String,
}

impl UrlTemplate {
    /// Creates a template. Only the presence of the placeholder is checked
    /// here; [`AuditConfig::new`] additionally checks that it renders to a
    /// usable URL.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::MissingPlaceholder`] if `{id}` does not occur.
    pub fn new(template: impl Into<String>) -> Result<Self, ConfigError> {
        let template = template.into();
        if !template.contains(ID_PLACEHOLDER) {
            return Err(ConfigError::MissingPlaceholder { template });
        }
        Ok(Self { template })
    }

    /// Renders the URL for one identifier.
    #[must_use]
    pub fn render(&self, id: u32) -> String {
        self.template.replace(ID_PLACEHOLDER, &id.to_string())
    }

    /// Returns the raw template string.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.template
    }

    fn validate(&self) -> Result<(), ConfigError> {
        let rendered = self.render(0);
        let url = Url::parse(&rendered).map_err(|e| ConfigError::InvalidTemplate {
            template: self.template.clone(),
            reason: e.to_string(),
        })?;
        if !matches!(url.scheme(), "http" | "https") {
            return Err(ConfigError::InvalidTemplate {
                template: self.template.clone(),
                reason: format!("unsupported scheme {:?}", url.scheme()),
            });
        }
        Ok(())
    }
}

impl Default for UrlTemplate {
    fn default() -> Self {
        Self {
            template: DEFAULT_URL_TEMPLATE.to_string(),
        }
    }
}

/// Validated configuration for one audit batch.
#[derive(Debug, Clone)]
pub struct AuditConfig {
    url_template: UrlTemplate,
    count: u32,
    concurrency: usize,
    expected_format: String,
}

impl AuditConfig {
    /// Builds and validates a configuration.
    ///
    /// The expected format is normalized to lower case. Whether the format is
    /// one the sniffer can actually report is checked later by
    /// [`AuditEngine::new`](crate::AuditEngine::new).
    ///
    /// # Errors
    ///
    /// Returns a [`ConfigError`] if the template does not render to an
    /// http(s) URL, the concurrency is outside
    /// `MIN_CONCURRENCY..=MAX_CONCURRENCY`, or the expected format is blank.
    pub fn new(
        url_template: UrlTemplate,
        count: u32,
        concurrency: usize,
        expected_format: &str,
    ) -> Result<Self, ConfigError> {
        url_template.validate()?;

        if !(MIN_CONCURRENCY..=MAX_CONCURRENCY).contains(&concurrency) {
            return Err(ConfigError::InvalidConcurrency { value: concurrency });
        }

        let expected_format = expected_format.trim().to_ascii_lowercase();
        if expected_format.is_empty() {
            return Err(ConfigError::UnsupportedFormat {
                format: expected_format,
            });
        }

        Ok(Self {
            url_template,
            count,
            concurrency,
            expected_format,
        })
    }

    /// Returns the URL template.
    #[must_use]
    pub fn url_template(&self) -> &UrlTemplate {
        &self.url_template
    }

    /// Returns the number of identifiers audited.
    #[must_use]
    pub fn count(&self) -> u32 {
        self.count
    }

    /// Returns the concurrency cap.
    #[must_use]
    pub fn concurrency(&self) -> usize {
        self.concurrency
    }

    /// Returns the expected (lower-case) format name.
    #[must_use]
    pub fn expected_format(&self) -> &str {
        &self.expected_format
    }
}

impl Default for AuditConfig {
    fn default() -> Self {
        Self {
            url_template: UrlTemplate::default(),
            count: DEFAULT_COUNT,
            concurrency: DEFAULT_CONCURRENCY,
            expected_format: DEFAULT_EXPECTED_FORMAT.to_string(),
        }
    }
}
