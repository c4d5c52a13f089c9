/**
 * Static SDK configuration.
 *
 * The collector identifies a project by three pieces of static data from
 * the project settings page: the organization name, the API key, and the
 * numeric project id. Together with the collector endpoint and the
 * application description they form the process-wide, read-only `Config`
 * that both the report builder and the transport are constructed from.
 *
 * Configuration is validated once, up front — a reporter is either built
 * from a valid config or not built at all. Nothing revalidates per
 * trigger.
 */
use std::time::Duration;

use thiserror::Error;

use crate::protocol::constants::DEFAULT_ENDPOINT;
use crate::protocol::types::ApplicationInfo;

// ---------------------------------------------------------------------------
// Errors
// ---------------------------------------------------------------------------

/**
 * Rejection reasons for a `Config`.
 *
 * Raised by [`Config::validate`] (and therefore by reporter
 * construction). These are startup-time configuration bugs, not runtime
 * delivery failures.
 */
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("organization id must not be empty")]
    EmptyOrgId,

    #[error("API key must not be empty")]
    EmptyApiKey,

    #[error("project id must be non-zero")]
    ZeroProjectId,

    #[error("collector endpoint {0:?} is not an http(s) URL")]
    InvalidEndpoint(String),

    #[error("application name must not be empty")]
    EmptyApplicationName,
}

// ---------------------------------------------------------------------------
// Config
// ---------------------------------------------------------------------------

/**
 * Process-wide, read-only SDK configuration.
 *
 * Initialized once before any trigger fires and passed explicitly to the
 * components that need it — there is no ambient configuration global.
 *
 * # Example
 * ```ignore
 * let config = Config::new(
 *     "botsko",
 *     "20c49a711426788d6f91",
 *     103,
 *     ApplicationInfo::new("My App", "1.0", "2364"),
 * );
 * ```
 */
#[derive(Clone, Debug)]
pub struct Config {
    /// Organization the API key belongs to — the basic-auth username.
    pub org_id: String,

    /// Project API key — the basic-auth password.
    pub api_key: String,

    /// Numeric id of the project errors are reported to.
    pub project_id: u64,

    /// Collector endpoint URL. Defaults to the hosted collector.
    pub endpoint: String,

    /// Static description of the reporting application.
    pub application: ApplicationInfo,

    /// TCP connect timeout for the HTTP transport.
    pub connect_timeout: Duration,

    /// Total per-request timeout for the HTTP transport. The send blocks
    /// at most this long instead of hanging on a stalled collector.
    pub request_timeout: Duration,
}

impl Config {
    /// Default TCP connect timeout.
    pub const DEFAULT_CONNECT_TIMEOUT: Duration = Duration::from_secs(10);

    /// Default total per-request timeout.
    pub const DEFAULT_REQUEST_TIMEOUT: Duration = Duration::from_secs(30);

    /**
     * Creates a configuration for the hosted collector with default
     * timeouts.
     */
    pub fn new(org_id: &str, api_key: &str, project_id: u64, application: ApplicationInfo) -> Self {
        Self {
            org_id: org_id.to_string(),
            api_key: api_key.to_string(),
            project_id,
            endpoint: DEFAULT_ENDPOINT.to_string(),
            application,
            connect_timeout: Self::DEFAULT_CONNECT_TIMEOUT,
            request_timeout: Self::DEFAULT_REQUEST_TIMEOUT,
        }
    }

    /**
     * Points the configuration at a custom collector — self-hosted
     * installations or a local development collector.
     */
    pub fn with_endpoint(mut self, endpoint: &str) -> Self {
        self.endpoint = endpoint.to_string();
        self
    }

    /**
     * Checks the configuration for startup-time mistakes.
     *
     * # Returns
     * `Ok(())` if the credentials, project id, endpoint, and application
     * description are all usable; the first [`ConfigError`] found
     * otherwise.
     */
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.org_id.is_empty() {
            return Err(ConfigError::EmptyOrgId);
        }
        if self.api_key.is_empty() {
            return Err(ConfigError::EmptyApiKey);
        }
        if self.project_id == 0 {
            return Err(ConfigError::ZeroProjectId);
        }
        if !self.endpoint.starts_with("http://") && !self.endpoint.starts_with("https://") {
            return Err(ConfigError::InvalidEndpoint(self.endpoint.clone()));
        }
        if self.application.name.is_empty() {
            return Err(ConfigError::EmptyApplicationName);
        }
        Ok(())
    }
}
