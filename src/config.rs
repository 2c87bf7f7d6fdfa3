use anyhow::Result;

// ============================================================================
// Configuration Constants
// ============================================================================

const DEFAULT_PORT: u16 = 8082;

// Backend endpoints
const DEFAULT_CUSTOMERS_URL: &str = "http://localhost:8080/customers";
const DEFAULT_PROFILES_ADDR: &str = "localhost:8181";

// Default time intervals (in seconds)
// The profile channel has no protocol-level deadline of its own, so the
// response wait must be bounded here. Expiry surfaces as UpstreamTimeout.
const DEFAULT_PROFILE_TIMEOUT_SECS: u64 = 30;
const DEFAULT_HTTP_TIMEOUT_SECS: u64 = 30;

// ============================================================================
// Configuration Structure
// ============================================================================

#[derive(Clone, Debug)]
pub struct Config {
    /// Listen port for the edge gateway
    pub port: u16,
    /// Customer service list endpoint (also the /proxy forward target)
    pub customers_url: String,
    /// Profile service TCP address, host:port
    pub profiles_addr: String,
    /// Response wait window for one profile request (seconds)
    pub profile_timeout_secs: u64,
    /// Outbound HTTP client timeout (seconds)
    pub http_timeout_secs: u64,
    pub rust_log: String,
}

impl Config {
    pub fn from_env() -> Result<Self> {
        dotenvy::dotenv().ok();

        let customers_url = std::env::var("CUSTOMERS_URL")
            .unwrap_or_else(|_| DEFAULT_CUSTOMERS_URL.to_string());
        if !customers_url.starts_with("http://") && !customers_url.starts_with("https://") {
            anyhow::bail!(
                "CUSTOMERS_URL must be an http(s) URL, got: {}",
                customers_url
            );
        }

        Ok(Self {
            port: std::env::var("PORT")
                .ok()
                .and_then(|p| p.parse().ok())
                .unwrap_or(DEFAULT_PORT),
            customers_url,
            profiles_addr: std::env::var("PROFILES_ADDR")
                .unwrap_or_else(|_| DEFAULT_PROFILES_ADDR.to_string()),
            profile_timeout_secs: std::env::var("PROFILE_TIMEOUT_SECS")
                .ok()
                .and_then(|s| s.parse().ok())
                .unwrap_or(DEFAULT_PROFILE_TIMEOUT_SECS),
            http_timeout_secs: std::env::var("HTTP_TIMEOUT_SECS")
                .ok()
                .and_then(|s| s.parse().ok())
                .unwrap_or(DEFAULT_HTTP_TIMEOUT_SECS),
            rust_log: std::env::var("RUST_LOG").unwrap_or_else(|_| "info".to_string()),
        })
    }
}
