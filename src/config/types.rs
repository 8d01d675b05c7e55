use serde::Deserialize;

/// Default total request timeout in seconds
pub const DEFAULT_TIMEOUT_SECS: u64 = 30;

/// Default connect timeout in seconds
pub const DEFAULT_CONNECT_TIMEOUT_SECS: u64 = 10;

/// Main configuration structure for Email-Census
#[derive(Debug, Clone, Default, Deserialize)]
pub struct Config {
    #[serde(default)]
    pub http: HttpConfig,
    #[serde(default)]
    pub output: OutputConfig,
}

/// HTTP client configuration
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct HttpConfig {
    /// Total time allowed for a single request (seconds)
    #[serde(rename = "timeout-secs")]
    pub timeout_secs: u64,

    /// Time allowed to establish a connection (seconds)
    #[serde(rename = "connect-timeout-secs")]
    pub connect_timeout_secs: u64,

    /// Skip TLS certificate verification
    ///
    /// Defaults to `true`, which reproduces the behavior of the tool this
    /// crate replaces. It is a security relaxation: set it to `false` (or pass
    /// `--verify-tls`) whenever the scanned hosts have valid certificates.
    #[serde(rename = "accept-invalid-certs")]
    pub accept_invalid_certs: bool,

    /// User-Agent header sent with every request
    #[serde(rename = "user-agent")]
    pub user_agent: String,
}

impl Default for HttpConfig {
    fn default() -> Self {
        Self {
            timeout_secs: DEFAULT_TIMEOUT_SECS,
            connect_timeout_secs: DEFAULT_CONNECT_TIMEOUT_SECS,
            accept_invalid_certs: true,
            user_agent: format!("email-census/{}", env!("CARGO_PKG_VERSION")),
        }
    }
}

/// Output configuration
#[derive(Debug, Clone, Default, Deserialize)]
pub struct OutputConfig {
    /// File the results are exported to; the extension picks CSV or HTML
    pub path: Option<String>,
}
