//! Connection configuration.
//!
//! Configuration is an explicit value handed to
//! [`FishbowlClient::connect`](crate::FishbowlClient::connect); nothing is
//! read from process-wide state. Files are TOML:
//!
//! ```toml
//! [connect]
//! host = "192.168.1.10"
//! port = 28192
//! timeout = 6000
//! username = "someuser"
//! password = "somepassword"
//!
//! [logging]
//! filter = "info,fishbowl_client=debug"
//! format = "pretty"
//! ```

use std::path::{Path, PathBuf};
use std::time::Duration;

use serde::Deserialize;

use fishbowl_codec::DEFAULT_MAX_FRAME_LEN;
use fishbowl_observability::LogConfig;

/// Well-known port of the Fishbowl XML API.
pub const DEFAULT_PORT: u16 = 28192;
pub const DEFAULT_TIMEOUT_MS: u64 = 5_000;
pub const DEFAULT_CONNECT_TIMEOUT_MS: u64 = 3_000;

#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("failed to read {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to parse configuration: {0}")]
    Parse(#[from] toml::de::Error),

    #[error("invalid configuration: {0}")]
    Invalid(String),
}

/// Integrated-application identity presented at login. The server operator
/// approves each application once.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct AppIdentity {
    pub id: u32,
    pub name: String,
    pub description: String,
}

impl Default for AppIdentity {
    fn default() -> Self {
        Self {
            id: 2286,
            name: "fishbowl-rs".to_string(),
            description: "Rust inventory client".to_string(),
        }
    }
}

/// Everything needed to open one session.
#[derive(Clone, PartialEq, Eq, Deserialize)]
pub struct ClientConfig {
    pub host: String,
    #[serde(default = "default_port")]
    pub port: u16,
    pub username: String,
    pub password: String,
    /// Per-request read/write timeout, in milliseconds.
    #[serde(default = "default_timeout", rename = "timeout")]
    pub timeout_ms: u64,
    /// TCP connect timeout, in milliseconds.
    #[serde(default = "default_connect_timeout", rename = "connect_timeout")]
    pub connect_timeout_ms: u64,
    #[serde(default = "default_max_frame_len")]
    pub max_frame_len: usize,
    #[serde(default)]
    pub app: AppIdentity,
}

fn default_port() -> u16 {
    DEFAULT_PORT
}

fn default_timeout() -> u64 {
    DEFAULT_TIMEOUT_MS
}

fn default_connect_timeout() -> u64 {
    DEFAULT_CONNECT_TIMEOUT_MS
}

fn default_max_frame_len() -> usize {
    DEFAULT_MAX_FRAME_LEN
}

impl ClientConfig {
    pub fn new(
        username: impl Into<String>,
        password: impl Into<String>,
        host: impl Into<String>,
    ) -> Self {
        Self {
            host: host.into(),
            port: DEFAULT_PORT,
            username: username.into(),
            password: password.into(),
            timeout_ms: DEFAULT_TIMEOUT_MS,
            connect_timeout_ms: DEFAULT_CONNECT_TIMEOUT_MS,
            max_frame_len: DEFAULT_MAX_FRAME_LEN,
            app: AppIdentity::default(),
        }
    }

    #[must_use]
    pub fn with_port(mut self, port: u16) -> Self {
        self.port = port;
        self
    }

    #[must_use]
    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout_ms = duration_ms(timeout);
        self
    }

    #[must_use]
    pub fn with_connect_timeout(mut self, timeout: Duration) -> Self {
        self.connect_timeout_ms = duration_ms(timeout);
        self
    }

    #[must_use]
    pub fn with_app(mut self, app: AppIdentity) -> Self {
        self.app = app;
        self
    }

    pub fn timeout(&self) -> Duration {
        Duration::from_millis(self.timeout_ms)
    }

    pub fn connect_timeout(&self) -> Duration {
        Duration::from_millis(self.connect_timeout_ms)
    }

    /// `host:port`, as used in log lines and errors.
    pub fn address(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.host.trim().is_empty() {
            return Err(ConfigError::Invalid("host cannot be empty".into()));
        }
        if self.username.trim().is_empty() {
            return Err(ConfigError::Invalid("username cannot be empty".into()));
        }
        if self.timeout_ms == 0 || self.connect_timeout_ms == 0 {
            return Err(ConfigError::Invalid("timeouts must be non-zero".into()));
        }
        if self.max_frame_len == 0 {
            return Err(ConfigError::Invalid("max_frame_len must be non-zero".into()));
        }
        Ok(())
    }

    /// Parse the `[connect]` table of a configuration file.
    pub fn from_toml_str(text: &str) -> Result<Self, ConfigError> {
        Ok(FileConfig::from_toml_str(text)?.connect)
    }

    pub fn load(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        Ok(FileConfig::load(path)?.connect)
    }
}

impl core::fmt::Debug for ClientConfig {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.debug_struct("ClientConfig")
            .field("host", &self.host)
            .field("port", &self.port)
            .field("username", &self.username)
            .field("password", &"<redacted>")
            .field("timeout_ms", &self.timeout_ms)
            .field("connect_timeout_ms", &self.connect_timeout_ms)
            .field("max_frame_len", &self.max_frame_len)
            .field("app", &self.app)
            .finish()
    }
}

/// A whole configuration file: connection options plus logging.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct FileConfig {
    pub connect: ClientConfig,
    #[serde(default)]
    pub logging: LogConfig,
}

impl FileConfig {
    pub fn from_toml_str(text: &str) -> Result<Self, ConfigError> {
        let config: Self = toml::from_str(text)?;
        config.connect.validate()?;
        Ok(config)
    }

    pub fn load(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let path = path.as_ref();
        let text = std::fs::read_to_string(path).map_err(|source| ConfigError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        Self::from_toml_str(&text)
    }
}

fn duration_ms(duration: Duration) -> u64 {
    u64::try_from(duration.as_millis()).unwrap_or(u64::MAX)
}

#[cfg(test)]
mod tests {
    use super::*;
    use fishbowl_observability::LogFormat;

    #[test]
    fn minimal_file_uses_defaults() {
        let config = ClientConfig::from_toml_str(
            r#"
            [connect]
            host = "10.0.2.2"
            username = "admin"
            password = "admin"
            "#,
        )
        .unwrap();
        assert_eq!(config, ClientConfig::new("admin", "admin", "10.0.2.2"));
        assert_eq!(config.port, DEFAULT_PORT);
        assert_eq!(config.timeout(), Duration::from_millis(DEFAULT_TIMEOUT_MS));
        assert_eq!(config.address(), "10.0.2.2:28192");
    }

    #[test]
    fn full_file_is_read() {
        let file = FileConfig::from_toml_str(
            r#"
            [connect]
            host = "192.168.1.10"
            port = 28193
            timeout = 6000
            connect_timeout = 1500
            username = "someuser"
            password = "somepassword"

            [connect.app]
            id = 9
            name = "Receiving"

            [logging]
            filter = "debug"
            format = "compact"
            "#,
        )
        .unwrap();
        let connect = &file.connect;
        assert_eq!(connect.port, 28193);
        assert_eq!(connect.timeout(), Duration::from_secs(6));
        assert_eq!(connect.connect_timeout(), Duration::from_millis(1500));
        assert_eq!(connect.app.id, 9);
        assert_eq!(connect.app.name, "Receiving");
        assert_eq!(connect.app.description, AppIdentity::default().description);
        assert_eq!(file.logging.format, LogFormat::Compact);
        assert_eq!(file.logging.filter, "debug");
    }

    #[test]
    fn missing_credentials_fail_to_parse() {
        let err = ClientConfig::from_toml_str("[connect]\nhost = \"h\"\n").unwrap_err();
        assert!(matches!(err, ConfigError::Parse(_)));
    }

    #[test]
    fn zero_timeout_is_invalid() {
        let err = ClientConfig::from_toml_str(
            "[connect]\nhost = \"h\"\nusername = \"u\"\npassword = \"p\"\ntimeout = 0\n",
        )
        .unwrap_err();
        assert!(matches!(err, ConfigError::Invalid(_)));
    }

    #[test]
    fn blank_host_is_invalid() {
        let config = ClientConfig::new("admin", "admin", " ");
        assert!(matches!(config.validate(), Err(ConfigError::Invalid(_))));
    }

    #[test]
    fn missing_file_reports_the_path() {
        let err = FileConfig::load("/definitely/not/here/fishbowl.toml").unwrap_err();
        match err {
            ConfigError::Io { path, .. } => assert!(path.ends_with("fishbowl.toml")),
            other => panic!("unexpected error: {other:?}"),
        }
    }

    #[test]
    fn debug_output_hides_the_password() {
        let config = ClientConfig::new("admin", "hunter2", "localhost");
        let shown = format!("{config:?}");
        assert!(!shown.contains("hunter2"));
        assert!(shown.contains("localhost"));
    }

    #[test]
    fn builders_override_defaults() {
        let config = ClientConfig::new("a", "b", "c")
            .with_port(1)
            .with_timeout(Duration::from_millis(250))
            .with_connect_timeout(Duration::from_secs(1));
        assert_eq!(config.port, 1);
        assert_eq!(config.timeout_ms, 250);
        assert_eq!(config.connect_timeout_ms, 1000);
    }
}
