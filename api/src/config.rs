//! Server configuration module.
//!
//! Handles loading configuration from environment variables with sensible defaults.

use anyhow::{Context, Result};
use std::net::SocketAddr;
use std::path::PathBuf;

/// Default pulse log location, relative to the working directory.
pub const DEFAULT_LOG_FILE: &str = "pulses.txt";

/// Server configuration.
///
/// Configuration values can be set via environment variables (or a `.env` file):
/// - `PULSEWATCH_HOST`: The host address to bind to (default: "0.0.0.0")
/// - `PULSEWATCH_PORT`: The port to listen on (default: 8080)
/// - `PULSEWATCH_LOG_FILE`: Path of the pulse log (default: "pulses.txt")
/// - `PULSEWATCH_RECORDER_CMD`: Command that runs the recorder, split on
///   whitespace (default: unset, recorder control disabled)
#[derive(Debug, Clone)]
pub struct Config {
    /// The host address to bind to.
    pub host: String,
    /// The port to listen on.
    pub port: u16,
    /// Path of the pulse log file.
    pub log_file: PathBuf,
    /// Program and arguments used to start the recorder.
    pub recorder_command: Option<Vec<String>>,
}

impl Config {
    /// Creates a new configuration from environment variables.
    ///
    /// # Errors
    ///
    /// Returns an error if:
    /// - `PULSEWATCH_PORT` is set but cannot be parsed as a valid port number
    pub fn from_env() -> Result<Self> {
        let host = std::env::var("PULSEWATCH_HOST").unwrap_or_else(|_| "0.0.0.0".to_string());

        let port = std::env::var("PULSEWATCH_PORT")
            .ok()
            .map(|p| p.parse::<u16>())
            .transpose()
            .context("PULSEWATCH_PORT must be a valid port number")?
            .unwrap_or(8080);

        let log_file = std::env::var("PULSEWATCH_LOG_FILE")
            .map_or_else(|_| PathBuf::from(DEFAULT_LOG_FILE), PathBuf::from);

        let recorder_command = std::env::var("PULSEWATCH_RECORDER_CMD")
            .ok()
            .and_then(|cmd| parse_command(&cmd));

        Ok(Self {
            host,
            port,
            log_file,
            recorder_command,
        })
    }

    /// Returns the socket address for binding.
    ///
    /// # Errors
    ///
    /// Returns an error if the host and port combination is not a valid socket address.
    pub fn socket_addr(&self) -> Result<SocketAddr> {
        format!("{}:{}", self.host, self.port)
            .parse()
            .with_context(|| format!("Invalid socket address {}:{}", self.host, self.port))
    }
}

impl Default for Config {
    fn default() -> Self {
        Self {
            host: "0.0.0.0".to_string(),
            port: 8080,
            log_file: PathBuf::from(DEFAULT_LOG_FILE),
            recorder_command: None,
        }
    }
}

/// Splits a command line on whitespace. Returns `None` for a blank command.
fn parse_command(command: &str) -> Option<Vec<String>> {
    let parts: Vec<String> = command.split_whitespace().map(str::to_string).collect();
    if parts.is_empty() {
        None
    } else {
        Some(parts)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_config_default_values() {
        let config = Config::default();
        assert_eq!(config.host, "0.0.0.0");
        assert_eq!(config.port, 8080);
        assert_eq!(config.log_file, PathBuf::from("pulses.txt"));
        assert!(config.recorder_command.is_none());
    }

    #[test]
    fn test_config_socket_addr() {
        let config = Config {
            host: "127.0.0.1".to_string(),
            port: 3000,
            ..Config::default()
        };
        let addr = config.socket_addr().unwrap();
        assert_eq!(addr.to_string(), "127.0.0.1:3000");
    }

    #[test]
    fn test_config_invalid_socket_addr() {
        let config = Config {
            host: "not a host".to_string(),
            ..Config::default()
        };
        assert!(config.socket_addr().is_err());
    }

    #[test]
    fn test_parse_command() {
        assert_eq!(
            parse_command("pulsewatch record --device /dev/ttyUSB0"),
            Some(vec![
                "pulsewatch".to_string(),
                "record".to_string(),
                "--device".to_string(),
                "/dev/ttyUSB0".to_string(),
            ])
        );
        assert_eq!(parse_command("   "), None);
    }
}
