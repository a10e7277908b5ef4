//! FTP sink configuration
//!
//! Read from a JSON file (`ftp-config.json` by default) with the keys
//! `host`, `user`, `password`, `secure` and `remoteDir`, then overridden by
//! `FEEDSYNC_FTP_*` environment variables (a `.env` file is honored).

use feedsync_common::{FeedError, Result};
use serde::{Deserialize, Serialize};
use std::path::Path;

// ============================================================================
// Defaults
// ============================================================================

pub const DEFAULT_CONFIG_FILE: &str = "ftp-config.json";

pub const DEFAULT_FTP_PORT: u16 = 21;

/// Same anonymous login the usual FTP clients fall back to
pub const DEFAULT_FTP_USER: &str = "anonymous";
pub const DEFAULT_FTP_PASSWORD: &str = "guest";

pub const DEFAULT_MAX_RETRIES: u32 = 3;

fn default_port() -> u16 {
    DEFAULT_FTP_PORT
}

fn default_user() -> String {
    DEFAULT_FTP_USER.to_string()
}

fn default_password() -> String {
    DEFAULT_FTP_PASSWORD.to_string()
}

fn default_true() -> bool {
    true
}

fn default_max_retries() -> u32 {
    DEFAULT_MAX_RETRIES
}

/// Connection settings for the FTP sink
#[derive(Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FtpConfig {
    #[serde(default)]
    pub host: String,

    #[serde(default = "default_port")]
    pub port: u16,

    #[serde(default = "default_user")]
    pub user: String,

    #[serde(default = "default_password")]
    pub password: String,

    /// Upgrade the control connection with explicit TLS (FTPS)
    #[serde(default)]
    pub secure: bool,

    /// Directory to create (if needed) and upload into
    #[serde(default)]
    pub remote_dir: Option<String>,

    /// Use EPSV instead of PASV for data connections
    #[serde(default = "default_true")]
    pub extended_passive: bool,

    /// Upload attempts before a delivery is reported as failed
    #[serde(default = "default_max_retries")]
    pub max_retries: u32,
}

impl std::fmt::Debug for FtpConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("FtpConfig")
            .field("host", &self.host)
            .field("port", &self.port)
            .field("user", &self.user)
            .field("password", &"********")
            .field("secure", &self.secure)
            .field("remote_dir", &self.remote_dir)
            .field("extended_passive", &self.extended_passive)
            .field("max_retries", &self.max_retries)
            .finish()
    }
}

impl Default for FtpConfig {
    fn default() -> Self {
        Self {
            host: String::new(),
            port: DEFAULT_FTP_PORT,
            user: default_user(),
            password: default_password(),
            secure: false,
            remote_dir: None,
            extended_passive: true,
            max_retries: DEFAULT_MAX_RETRIES,
        }
    }
}

impl FtpConfig {
    /// Load the JSON file, apply environment overrides and validate.
    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        dotenvy::dotenv().ok();

        let config = Self::from_file(path)?.merge_env()?;
        config.validate()?;
        Ok(config)
    }

    /// Parse the JSON file without touching the environment
    pub fn from_file(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let raw = std::fs::read_to_string(path).map_err(|e| match e.kind() {
            std::io::ErrorKind::NotFound => {
                FeedError::config(format!("FTP config file '{}' not found", path.display()))
            },
            _ => FeedError::config(format!("cannot read '{}': {}", path.display(), e)),
        })?;
        serde_json::from_str(&raw)
            .map_err(|e| FeedError::config(format!("invalid FTP config '{}': {}", path.display(), e)))
    }

    pub fn from_json(raw: &str) -> Result<Self> {
        serde_json::from_str(raw).map_err(|e| FeedError::config(format!("invalid FTP config: {}", e)))
    }

    /// Apply overrides:
    /// - `FEEDSYNC_FTP_HOST`
    /// - `FEEDSYNC_FTP_PORT`
    /// - `FEEDSYNC_FTP_USER`
    /// - `FEEDSYNC_FTP_PASSWORD`
    /// - `FEEDSYNC_FTP_SECURE` (true/false)
    /// - `FEEDSYNC_FTP_REMOTE_DIR`
    pub fn merge_env(mut self) -> Result<Self> {
        if let Ok(host) = std::env::var("FEEDSYNC_FTP_HOST") {
            self.host = host;
        }
        if let Ok(port) = std::env::var("FEEDSYNC_FTP_PORT") {
            self.port = port
                .parse()
                .map_err(|_| FeedError::config(format!("FEEDSYNC_FTP_PORT '{}' is not a port", port)))?;
        }
        if let Ok(user) = std::env::var("FEEDSYNC_FTP_USER") {
            self.user = user;
        }
        if let Ok(password) = std::env::var("FEEDSYNC_FTP_PASSWORD") {
            self.password = password;
        }
        if let Ok(secure) = std::env::var("FEEDSYNC_FTP_SECURE") {
            self.secure = parse_flag(&secure).ok_or_else(|| {
                FeedError::config(format!("FEEDSYNC_FTP_SECURE '{}' is not true/false", secure))
            })?;
        }
        if let Ok(dir) = std::env::var("FEEDSYNC_FTP_REMOTE_DIR") {
            self.remote_dir = Some(dir);
        }
        Ok(self)
    }

    pub fn validate(&self) -> Result<()> {
        if self.host.trim().is_empty() {
            return Err(FeedError::config("FTP host is not set"));
        }
        if self.port == 0 {
            return Err(FeedError::config("FTP port must be greater than 0"));
        }
        if self.max_retries == 0 {
            return Err(FeedError::config("maxRetries must be at least 1"));
        }
        Ok(())
    }

    /// Remote directory, ignoring an empty value
    pub fn remote_dir(&self) -> Option<&str> {
        self.remote_dir
            .as_deref()
            .map(str::trim)
            .filter(|dir| !dir.is_empty())
    }

    pub fn address(&self) -> String {
        format!("{}:{}", self.host.trim(), self.port)
    }
}

fn parse_flag(value: &str) -> Option<bool> {
    match value.trim().to_lowercase().as_str() {
        "true" | "1" | "yes" | "on" => Some(true),
        "false" | "0" | "no" | "off" => Some(false),
        _ => None,
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::expect_used)]
mod tests {
    use super::*;
    use serial_test::serial;

    const ENV_KEYS: [&str; 6] = [
        "FEEDSYNC_FTP_HOST",
        "FEEDSYNC_FTP_PORT",
        "FEEDSYNC_FTP_USER",
        "FEEDSYNC_FTP_PASSWORD",
        "FEEDSYNC_FTP_SECURE",
        "FEEDSYNC_FTP_REMOTE_DIR",
    ];

    fn clear_env() {
        for key in ENV_KEYS {
            std::env::remove_var(key);
        }
    }

    #[test]
    fn test_from_json_reads_camel_case_fields() {
        let config = FtpConfig::from_json(
            r#"{
                "host": "ftp.example.com",
                "user": "catalog",
                "password": "s3cret",
                "secure": true,
                "remoteDir": "/public_html/xml"
            }"#,
        )
        .unwrap();

        assert_eq!(config.host, "ftp.example.com");
        assert_eq!(config.user, "catalog");
        assert_eq!(config.password, "s3cret");
        assert!(config.secure);
        assert_eq!(config.remote_dir(), Some("/public_html/xml"));
        assert_eq!(config.port, DEFAULT_FTP_PORT);
        assert!(config.extended_passive);
        assert_eq!(config.max_retries, DEFAULT_MAX_RETRIES);
        assert_eq!(config.address(), "ftp.example.com:21");
    }

    #[test]
    fn test_from_json_defaults() {
        let config = FtpConfig::from_json(r#"{"host": "ftp.example.com", "remoteDir": ""}"#).unwrap();
        assert_eq!(config.user, "anonymous");
        assert_eq!(config.password, "guest");
        assert!(!config.secure);
        assert_eq!(config.remote_dir(), None);
    }

    #[test]
    fn test_invalid_json_is_a_config_error() {
        let err = FtpConfig::from_json("{ host: ").unwrap_err();
        assert!(matches!(err, FeedError::Config(_)));
    }

    #[test]
    fn test_missing_file_is_a_config_error() {
        let err = FtpConfig::from_file("/nonexistent/ftp-config.json").unwrap_err();
        assert!(matches!(err, FeedError::Config(ref msg) if msg.contains("not found")));
    }

    #[test]
    fn test_validate() {
        assert!(FtpConfig::default().validate().is_err());

        let config = FtpConfig {
            host: "ftp.example.com".to_string(),
            ..FtpConfig::default()
        };
        assert!(config.validate().is_ok());

        let zero_port = FtpConfig { port: 0, ..config.clone() };
        assert!(zero_port.validate().is_err());
    }

    #[test]
    fn test_debug_hides_password() {
        let config = FtpConfig {
            password: "hunter2".to_string(),
            ..FtpConfig::default()
        };
        let rendered = format!("{:?}", config);
        assert!(!rendered.contains("hunter2"));
    }

    #[test]
    #[serial]
    fn test_env_overrides() {
        clear_env();
        std::env::set_var("FEEDSYNC_FTP_HOST", "ftp.override.test");
        std::env::set_var("FEEDSYNC_FTP_PORT", "2121");
        std::env::set_var("FEEDSYNC_FTP_SECURE", "yes");
        std::env::set_var("FEEDSYNC_FTP_REMOTE_DIR", "feeds");

        let config = FtpConfig::from_json(r#"{"host": "ftp.example.com"}"#)
            .unwrap()
            .merge_env();
        clear_env();
        let config = config.unwrap();

        assert_eq!(config.host, "ftp.override.test");
        assert_eq!(config.port, 2121);
        assert!(config.secure);
        assert_eq!(config.remote_dir(), Some("feeds"));
    }

    #[test]
    #[serial]
    fn test_bad_env_port_is_rejected() {
        clear_env();
        std::env::set_var("FEEDSYNC_FTP_PORT", "twenty-one");
        let result = FtpConfig::default().merge_env();
        clear_env();
        assert!(matches!(result.unwrap_err(), FeedError::Config(_)));
    }
}
