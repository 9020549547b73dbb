use reqwest::blocking::{Client, ClientBuilder};
use std::time::Duration;

/// Default base URL for the push and schedule services
pub const PUSH_URL: &str = "https://api.jpush.cn";
/// Default base URL for the delivery-report service
pub const REPORT_URL: &str = "https://report.jpush.cn";
/// Default base URL for the device/alias/tag service
pub const DEVICE_URL: &str = "https://device.jpush.cn";

/// Create the HTTP client used for API requests.
///
/// Connection pooling and timeouts come from the configuration; there is
/// no retry policy, a failed call surfaces directly to the caller.
pub fn create_http_client(config: &Config) -> Client {
    ClientBuilder::new()
        .pool_max_idle_per_host(10)
        .timeout(config.timeout)
        .connect_timeout(config.connect_timeout)
        .build()
        .expect("Failed to create HTTP client")
}

/// Configuration for the JPush client
#[derive(Debug, Clone)]
pub struct Config {
    /// Base URL of the push/schedule service
    pub push_url: String,
    /// Base URL of the report service
    pub report_url: String,
    /// Base URL of the device service
    pub device_url: String,
    /// Total request timeout
    pub timeout: Duration,
    /// Connection establishment timeout
    pub connect_timeout: Duration,
    /// Enable debug logging to stderr
    pub debug: bool,
}

impl Default for Config {
    fn default() -> Self {
        Config {
            push_url: PUSH_URL.to_string(),
            report_url: REPORT_URL.to_string(),
            device_url: DEVICE_URL.to_string(),
            timeout: Duration::from_secs(30),
            connect_timeout: Duration::from_secs(10),
            debug: false,
        }
    }
}

impl Config {
    /// Create a configuration pointing all three services at one base URL.
    /// Mostly useful for testing against a local server.
    pub fn with_base_url(url: &str) -> Self {
        Config {
            push_url: url.to_string(),
            report_url: url.to_string(),
            device_url: url.to_string(),
            ..Config::default()
        }
    }

    /// Set the total request timeout
    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    /// Set the connection timeout
    pub fn with_connect_timeout(mut self, connect_timeout: Duration) -> Self {
        self.connect_timeout = connect_timeout;
        self
    }

    /// Set debug mode
    pub fn with_debug(mut self, debug: bool) -> Self {
        self.debug = debug;
        self
    }
}
