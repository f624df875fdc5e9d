//! Configuration module for environment variable parsing.
//!
//! Reads all configuration from environment variables. Values are read per
//! invocation: nothing here is cached, and a missing value defaults to empty so
//! the affected collaborator reports a failure instead of aborting the request.

use std::env;
use tracing::warn;

/// Default base URL for the Slack Web API.
pub const DEFAULT_SLACK_API_BASE: &str = "https://slack.com/api";

/// Default AWS region for SES.
pub const DEFAULT_SES_REGION: &str = "us-east-2";

/// Logging verbosity selected by the `debug` environment variable.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LogLevel {
    Off,
    Info,
    Warn,
    Debug,
}

impl LogLevel {
    /// Parse the `debug` variable. Anything unrecognized turns logging off.
    pub fn parse(raw: &str) -> Self {
        match raw.trim().to_lowercase().as_str() {
            "debug" => LogLevel::Debug,
            "warn" => LogLevel::Warn,
            "info" => LogLevel::Info,
            _ => LogLevel::Off,
        }
    }

    /// `EnvFilter` directive for this level.
    pub fn directive(self) -> &'static str {
        match self {
            LogLevel::Off => "off",
            LogLevel::Info => "info",
            LogLevel::Warn => "warn",
            LogLevel::Debug => "debug",
        }
    }
}

/// AWS credentials used to sign SES requests.
#[derive(Debug, Clone, Default)]
pub struct AwsCredentials {
    pub access_key_id: String,
    pub secret_access_key: String,
    /// Present when running with temporary (role) credentials
    pub session_token: Option<String>,
}

/// Application configuration loaded from environment variables.
#[derive(Debug, Clone)]
pub struct Config {
    /// Region label used in invite emails and as the sender display name
    pub f3_region: String,

    /// Slack bot token for `views.open` and `chat.postMessage`
    pub slack_api_key: String,

    /// Slack workspace invite link sent to new members
    pub slack_invite_link: String,

    /// Shared secret Slack uses to sign requests
    pub slack_signing_secret: String,

    /// Channel that receives the welcome report
    pub slack_channel_id: String,

    /// Base URL for the Slack Web API
    pub slack_api_base: String,

    /// From address for invite emails
    pub email_sender_address: String,

    /// Mailchimp API key
    pub mailchimp_api_key: String,

    /// Mailchimp API host, e.g. `us21.api.mailchimp.com`
    pub mailchimp_api_endpoint: String,

    /// Mailchimp audience (list) identifier
    pub mailchimp_list_id: String,

    /// AWS region for SES
    pub ses_region: String,

    /// Optional SES base URL override
    pub ses_endpoint: Option<String>,

    /// Credentials for signing SES requests
    pub aws: AwsCredentials,

    /// Logging verbosity
    pub log_level: LogLevel,

    /// Port for the web server to listen on
    pub port: u16,
}

impl Default for Config {
    fn default() -> Self {
        Config {
            f3_region: String::new(),
            slack_api_key: String::new(),
            slack_invite_link: String::new(),
            slack_signing_secret: String::new(),
            slack_channel_id: String::new(),
            slack_api_base: DEFAULT_SLACK_API_BASE.to_string(),
            email_sender_address: String::new(),
            mailchimp_api_key: String::new(),
            mailchimp_api_endpoint: String::new(),
            mailchimp_list_id: String::new(),
            ses_region: DEFAULT_SES_REGION.to_string(),
            ses_endpoint: None,
            aws: AwsCredentials::default(),
            log_level: LogLevel::Off,
            port: 8080,
        }
    }
}

impl Config {
    /// Load configuration from environment variables.
    pub fn from_env() -> Self {
        let ses_region = env::var("ses_region")
            .ok()
            .filter(|v| !v.trim().is_empty())
            .unwrap_or_else(|| DEFAULT_SES_REGION.to_string());

        Config {
            f3_region: var_or_empty("f3_region"),
            slack_api_key: var_or_empty("slack_api_key"),
            slack_invite_link: var_or_empty("slack_invite_link"),
            slack_signing_secret: var_or_empty("slack_signing_secret"),
            slack_channel_id: var_or_empty("slack_channel_id"),
            slack_api_base: env::var("slack_api_base")
                .ok()
                .filter(|v| !v.trim().is_empty())
                .unwrap_or_else(|| DEFAULT_SLACK_API_BASE.to_string()),
            email_sender_address: var_or_empty("email_sender_address"),
            mailchimp_api_key: var_or_empty("mailchimp_api_key"),
            mailchimp_api_endpoint: var_or_empty("mailchimp_api_endpoint"),
            mailchimp_list_id: var_or_empty("mailchimp_list_id"),
            ses_region,
            ses_endpoint: env::var("ses_endpoint")
                .ok()
                .filter(|v| !v.trim().is_empty()),
            aws: AwsCredentials {
                access_key_id: var_or_empty("AWS_ACCESS_KEY_ID"),
                secret_access_key: var_or_empty("AWS_SECRET_ACCESS_KEY"),
                session_token: env::var("AWS_SESSION_TOKEN")
                    .ok()
                    .filter(|v| !v.is_empty()),
            },
            log_level: LogLevel::parse(&var_or_empty("debug")),
            port: parse_port("PORT", 8080),
        }
    }

    /// Base URL for SES v2 calls.
    pub fn ses_base_url(&self) -> String {
        match &self.ses_endpoint {
            Some(endpoint) => endpoint.trim_end_matches('/').to_string(),
            None => format!("https://email.{}.amazonaws.com", self.ses_region),
        }
    }

    /// Base URL for Mailchimp calls.
    ///
    /// The endpoint is normally a bare host; a full `http(s)://` base is
    /// accepted as-is.
    pub fn mailchimp_base_url(&self) -> String {
        let endpoint = self.mailchimp_api_endpoint.trim_end_matches('/');
        if endpoint.starts_with("http://") || endpoint.starts_with("https://") {
            endpoint.to_string()
        } else {
            format!("https://{}", endpoint)
        }
    }
}

/// Where each invocation gets its configuration from.
#[derive(Debug, Clone)]
pub enum ConfigSource {
    /// Re-read the process environment on every request
    Env,
    /// Use a fixed configuration
    Fixed(Config),
}

impl ConfigSource {
    /// Materialize the configuration for one invocation.
    pub fn load(&self) -> Config {
        match self {
            ConfigSource::Env => Config::from_env(),
            ConfigSource::Fixed(config) => config.clone(),
        }
    }
}

fn var_or_empty(name: &str) -> String {
    env::var(name).unwrap_or_default()
}

/// Parse a port number, falling back to the default on bad input.
fn parse_port(name: &str, default: u16) -> u16 {
    let raw = match env::var(name) {
        Ok(v) => v,
        Err(_) => return default,
    };

    match raw.trim().parse::<u16>() {
        Ok(port) => port,
        Err(_) => {
            warn!(env_var = name, value = %raw, "Invalid port, using default");
            default
        }
    }
}

impl Config {
    /// Tracing filter directive: `RUST_LOG` wins, then the `debug` flag.
    pub fn log_filter_directive(&self) -> String {
        filter_directive(env::var("RUST_LOG").ok(), self.log_level)
    }
}

fn filter_directive(rust_log: Option<String>, level: LogLevel) -> String {
    rust_log
        .filter(|v| !v.trim().is_empty())
        .unwrap_or_else(|| level.directive().to_string())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample() -> Config {
        Config {
            f3_region: "F3 Test".to_string(),
            mailchimp_api_endpoint: "us21.api.mailchimp.com".to_string(),
            ..Config::default()
        }
    }

    #[test]
    fn test_log_level_parse() {
        assert_eq!(LogLevel::parse("debug"), LogLevel::Debug);
        assert_eq!(LogLevel::parse("WARN"), LogLevel::Warn);
        assert_eq!(LogLevel::parse(" info "), LogLevel::Info);
        assert_eq!(LogLevel::parse(""), LogLevel::Off);
        assert_eq!(LogLevel::parse("verbose"), LogLevel::Off);
    }

    #[test]
    fn test_filter_directive_prefers_rust_log() {
        assert_eq!(
            filter_directive(Some("fngbot=trace".to_string()), LogLevel::Off),
            "fngbot=trace"
        );
    }

    #[test]
    fn test_filter_directive_falls_back_to_log_level() {
        assert_eq!(filter_directive(None, LogLevel::Debug), "debug");
        assert_eq!(filter_directive(Some("  ".to_string()), LogLevel::Warn), "warn");
        assert_eq!(filter_directive(None, Config::default().log_level), "off");
    }

    #[test]
    fn test_parse_port_invalid() {
        env::set_var("FNGBOT_TEST_PORT", "not-a-port");
        assert_eq!(parse_port("FNGBOT_TEST_PORT", 9000), 9000);
        env::remove_var("FNGBOT_TEST_PORT");
    }

    #[test]
    fn test_parse_port_default() {
        assert_eq!(parse_port("FNGBOT_NONEXISTENT_PORT", 8080), 8080);
    }

    #[test]
    fn test_ses_base_url() {
        let mut config = sample();
        assert_eq!(config.ses_base_url(), "https://email.us-east-2.amazonaws.com");

        config.ses_endpoint = Some("http://127.0.0.1:4566/".to_string());
        assert_eq!(config.ses_base_url(), "http://127.0.0.1:4566");
    }

    #[test]
    fn test_mailchimp_base_url() {
        let mut config = sample();
        assert_eq!(config.mailchimp_base_url(), "https://us21.api.mailchimp.com");

        config.mailchimp_api_endpoint = "http://localhost:1234/".to_string();
        assert_eq!(config.mailchimp_base_url(), "http://localhost:1234");
    }

    #[test]
    fn test_fixed_source_returns_copy() {
        let source = ConfigSource::Fixed(sample());
        assert_eq!(source.load().f3_region, "F3 Test");
    }
}
