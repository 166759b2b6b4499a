//! Configuration management

use clap::Parser;
use config::{Config as ConfigBuilder, ConfigError as BuilderError, Environment, File};
use serde::Deserialize;
use std::path::{Path, PathBuf};
use thiserror::Error;

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Invalid server configuration: {0}")]
    InvalidServer(String),

    #[error("Invalid auth configuration: {0}")]
    InvalidAuth(String),

    #[error("Invalid logging configuration: {0}")]
    InvalidLogging(String),

    #[error("Invalid CORS configuration: {0}")]
    InvalidCors(String),

    #[error("Failed to load configuration: {0}")]
    LoadError(String),

    #[error("Configuration file not found: {0}")]
    FileNotFound(String),
}

impl From<BuilderError> for ConfigError {
    fn from(err: BuilderError) -> Self {
        ConfigError::LoadError(err.to_string())
    }
}

#[derive(Debug, Clone, Deserialize)]
pub struct Config {
    pub server: ServerConfig,
    pub auth: AuthConfig,
    pub logging: LoggingConfig,
    pub cors: CorsConfig,
}

impl Config {
    /// Load configuration with precedence: CLI args > Environment variables > Config file > Defaults
    pub fn load() -> Result<Self, ConfigError> {
        Self::load_from(CliArgs::parse())
    }

    /// Load configuration from already-parsed command-line arguments
    pub fn load_from(cli_args: CliArgs) -> Result<Self, ConfigError> {
        let mut builder = Self::builder_with_defaults()?;

        // Load from config file if specified (medium priority)
        if let Some(config_path) = &cli_args.config {
            if !config_path.exists() {
                return Err(ConfigError::FileNotFound(
                    config_path.display().to_string(),
                ));
            }
            builder = builder.add_source(File::from(config_path.as_path()));
        }

        // Override with environment variables (higher priority)
        // Variables are prefixed with KEYGATE_ and use __ for nesting
        // Example: KEYGATE_AUTH__API_KEY_HASH='$2b$12$...'
        builder = builder.add_source(
            Environment::with_prefix("KEYGATE")
                .separator("__")
                .try_parsing(true),
        );

        // Override with CLI arguments (highest priority)
        if let Some(host) = &cli_args.host {
            builder = builder.set_override("server.host", host.clone())?;
        }
        if let Some(port) = cli_args.port {
            builder = builder.set_override("server.port", port)?;
        }
        if let Some(log_level) = &cli_args.log_level {
            builder = builder.set_override("logging.level", log_level.clone())?;
        }

        let config: Config = builder.build()?.try_deserialize()?;
        config.validate()?;

        Ok(config)
    }

    /// Load configuration from a specific file path
    pub fn from_file(path: &Path) -> Result<Self, ConfigError> {
        if !path.exists() {
            return Err(ConfigError::FileNotFound(path.display().to_string()));
        }

        let config: Config = Self::builder_with_defaults()?
            .add_source(File::from(path))
            .build()?
            .try_deserialize()?;

        config.validate()?;
        Ok(config)
    }

    fn builder_with_defaults(
    ) -> Result<config::builder::ConfigBuilder<config::builder::DefaultState>, ConfigError> {
        // Secrets intentionally default to empty strings; validation rejects
        // them so the process cannot start with authentication unconfigured.
        let builder = ConfigBuilder::builder()
            .set_default("server.host", "127.0.0.1")?
            .set_default("server.port", 8080)?
            .set_default("auth.mode", "api-key")?
            .set_default("auth.api_key_hash", "")?
            .set_default("auth.jwt_secret", "")?
            .set_default("auth.token_ttl_minutes", 0)?
            .set_default("logging.level", "info")?
            .set_default("logging.format", "json")?
            .set_default("logging.output", "stdout")?
            .set_default("cors.allowed_origins", vec!["*"])?;
        Ok(builder)
    }

    /// Validate all configuration parameters
    pub fn validate(&self) -> Result<(), ConfigError> {
        self.server.validate()?;
        self.auth.validate()?;
        self.logging.validate()?;
        self.cors.validate()?;
        Ok(())
    }
}

/// Command-line arguments for configuration override
#[derive(Debug, Parser)]
#[command(name = "keygate")]
#[command(about = "Keygate API-key authentication gateway", long_about = None)]
pub struct CliArgs {
    /// Path to configuration file (TOML format)
    #[arg(short, long, value_name = "FILE")]
    pub config: Option<PathBuf>,

    /// Server host address
    #[arg(long, value_name = "HOST")]
    pub host: Option<String>,

    /// Server port
    #[arg(short, long, value_name = "PORT")]
    pub port: Option<u16>,

    /// Log level (debug, info, warn, error)
    #[arg(short, long, value_name = "LEVEL")]
    pub log_level: Option<String>,

    /// Print the bcrypt hash of the given API key and exit
    #[arg(long, value_name = "KEY")]
    pub hash_key: Option<String>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct ServerConfig {
    pub host: String,
    pub port: u16,
}

impl ServerConfig {
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.host.is_empty() {
            return Err(ConfigError::InvalidServer("host cannot be empty".to_string()));
        }

        if self.port == 0 {
            return Err(ConfigError::InvalidServer(
                "port must be greater than 0".to_string(),
            ));
        }

        Ok(())
    }
}

/// How clients are expected to present their credential.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum AuthMode {
    /// The plaintext API key is presented on every request
    ApiKey,
    /// The API key is exchanged for a signed token at /login
    Token,
}

#[derive(Debug, Clone, Deserialize)]
pub struct AuthConfig {
    pub mode: AuthMode,
    /// bcrypt hash of the one valid API key
    pub api_key_hash: String,
    /// Symmetric signing secret for issued tokens (token mode)
    pub jwt_secret: String,
    /// Lifetime of issued tokens (token mode)
    pub token_ttl_minutes: u64,
}

impl AuthConfig {
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.api_key_hash.is_empty() {
            return Err(ConfigError::InvalidAuth(
                "api_key_hash must be provided".to_string(),
            ));
        }

        // bcrypt hashes are versioned strings of the form $2<v>$<cost>$<salt+digest>
        if !self.api_key_hash.starts_with("$2") {
            return Err(ConfigError::InvalidAuth(
                "api_key_hash is not a bcrypt hash".to_string(),
            ));
        }

        if self.mode == AuthMode::Token {
            if self.jwt_secret.is_empty() {
                return Err(ConfigError::InvalidAuth(
                    "jwt_secret must be provided in token mode".to_string(),
                ));
            }

            if self.token_ttl_minutes == 0 {
                return Err(ConfigError::InvalidAuth(
                    "token_ttl_minutes must be greater than 0 in token mode".to_string(),
                ));
            }
        }

        Ok(())
    }
}

#[derive(Debug, Clone, Deserialize)]
pub struct LoggingConfig {
    pub level: String,
    pub format: String,
    pub output: String,
    pub log_file: Option<PathBuf>,
}

impl LoggingConfig {
    pub fn validate(&self) -> Result<(), ConfigError> {
        let valid_levels = ["debug", "info", "warn", "error"];
        if !valid_levels.contains(&self.level.as_str()) {
            return Err(ConfigError::InvalidLogging(format!(
                "level must be one of: {:?}",
                valid_levels
            )));
        }

        let valid_formats = ["json", "text"];
        if !valid_formats.contains(&self.format.as_str()) {
            return Err(ConfigError::InvalidLogging(format!(
                "format must be one of: {:?}",
                valid_formats
            )));
        }

        let valid_outputs = ["stdout", "file"];
        if !valid_outputs.contains(&self.output.as_str()) {
            return Err(ConfigError::InvalidLogging(format!(
                "output must be one of: {:?}",
                valid_outputs
            )));
        }

        if self.output == "file" && self.log_file.is_none() {
            return Err(ConfigError::InvalidLogging(
                "log_file must be specified when output is 'file'".to_string(),
            ));
        }

        Ok(())
    }
}

#[derive(Debug, Clone, Deserialize)]
pub struct CorsConfig {
    pub allowed_origins: Vec<String>,
}

impl CorsConfig {
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.allowed_origins.is_empty() {
            return Err(ConfigError::InvalidCors(
                "allowed_origins cannot be empty".to_string(),
            ));
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    const TEST_HASH: &str = "$2b$12$AAAAAAAAAAAAAAAAAAAAAOxGgNFzQUeM3lS3PYrSMQICn2ZTDnzLa";

    fn valid_auth() -> AuthConfig {
        AuthConfig {
            mode: AuthMode::ApiKey,
            api_key_hash: TEST_HASH.to_string(),
            jwt_secret: String::new(),
            token_ttl_minutes: 0,
        }
    }

    #[test]
    fn test_auth_requires_hash() {
        let mut auth = valid_auth();
        auth.api_key_hash = String::new();
        assert!(auth.validate().is_err());
    }

    #[test]
    fn test_auth_rejects_non_bcrypt_hash() {
        let mut auth = valid_auth();
        auth.api_key_hash = "secret123".to_string();
        assert!(auth.validate().is_err());
    }

    #[test]
    fn test_api_key_mode_does_not_need_token_settings() {
        assert!(valid_auth().validate().is_ok());
    }

    #[test]
    fn test_token_mode_requires_secret_and_ttl() {
        let mut auth = valid_auth();
        auth.mode = AuthMode::Token;
        assert!(auth.validate().is_err());

        auth.jwt_secret = "server-side-secret".to_string();
        assert!(auth.validate().is_err());

        auth.token_ttl_minutes = 60;
        assert!(auth.validate().is_ok());
    }

    #[test]
    fn test_logging_validation() {
        let mut logging = LoggingConfig {
            level: "info".to_string(),
            format: "json".to_string(),
            output: "stdout".to_string(),
            log_file: None,
        };
        assert!(logging.validate().is_ok());

        logging.level = "verbose".to_string();
        assert!(logging.validate().is_err());

        logging.level = "info".to_string();
        logging.output = "file".to_string();
        assert!(logging.validate().is_err());

        logging.log_file = Some(PathBuf::from("/tmp/keygate.log"));
        assert!(logging.validate().is_ok());
    }

    fn temp_toml() -> tempfile::NamedTempFile {
        tempfile::Builder::new().suffix(".toml").tempfile().unwrap()
    }

    #[test]
    fn test_from_file() {
        let mut file = temp_toml();
        writeln!(
            file,
            r#"
[auth]
mode = "token"
api_key_hash = "{TEST_HASH}"
jwt_secret = "server-side-secret"
token_ttl_minutes = 60

[server]
port = 5050
"#
        )
        .unwrap();

        let config = Config::from_file(file.path()).unwrap();
        assert_eq!(config.auth.mode, AuthMode::Token);
        assert_eq!(config.auth.token_ttl_minutes, 60);
        assert_eq!(config.server.port, 5050);
        // Defaults still apply to sections the file does not mention
        assert_eq!(config.server.host, "127.0.0.1");
        assert_eq!(config.logging.level, "info");
    }

    #[test]
    fn test_from_file_fails_without_api_key_hash() {
        let mut file = temp_toml();
        writeln!(
            file,
            r#"
[server]
port = 5050
"#
        )
        .unwrap();

        assert!(Config::from_file(file.path()).is_err());
    }

    #[test]
    fn test_missing_file() {
        assert!(matches!(
            Config::from_file(Path::new("/nonexistent/keygate.toml")),
            Err(ConfigError::FileNotFound(_))
        ));
    }
}
