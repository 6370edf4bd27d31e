//! Process configuration from the environment.
//!
//! The service is configured exclusively through environment variables
//! (there is no config file): bus topic names, collaborator service
//! roots and a couple of tunables. Missing or malformed values are
//! startup errors - runtime code never re-reads the environment.

use std::time::Duration;
use thiserror::Error;
use transit_types::ErrorCode;

/// Bus topic names.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Topics {
    /// Outbound character command topic (`COMMAND_TOPIC_CHARACTER`).
    pub character_command: String,
    /// Outbound transport status topic (`EVENT_TOPIC_TRANSPORT_STATUS`).
    pub transport_status: String,
    /// Inbound channel lifecycle topic (`EVENT_TOPIC_CHANNEL_STATUS`).
    pub channel_status: String,
    /// Inbound character status topic (`EVENT_TOPIC_CHARACTER_STATUS`).
    pub character_status: String,
}

/// Everything the process reads from its environment.
#[derive(Debug, Clone)]
pub struct ServiceConfig {
    /// Port the HTTP collaborator binds (`REST_PORT`, default 8080).
    pub rest_port: u16,
    pub topics: Topics,
    /// Map service root (`MAPS`).
    pub maps_root: String,
    /// Game data service root (`DATA`).
    pub data_root: String,
    /// Tenant / configuration service root (`TENANTS`).
    pub tenants_root: String,
    /// Per-call collaborator timeout (`HTTP_TIMEOUT_MS`, default 5000).
    pub http_timeout: Duration,
    /// Shutdown grace for in-flight transactions (`TICK_GRACE_MS`,
    /// default 3000).
    pub tick_grace: Duration,
}

impl ServiceConfig {
    /// Reads the configuration from the process environment.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError`] when a required variable is unset or a
    /// numeric variable does not parse.
    pub fn from_env() -> Result<Self, ConfigError> {
        Ok(Self {
            rest_port: parse_or("REST_PORT", 8080)?,
            topics: Topics {
                character_command: require("COMMAND_TOPIC_CHARACTER")?,
                transport_status: require("EVENT_TOPIC_TRANSPORT_STATUS")?,
                channel_status: require("EVENT_TOPIC_CHANNEL_STATUS")?,
                character_status: require("EVENT_TOPIC_CHARACTER_STATUS")?,
            },
            maps_root: require("MAPS")?,
            data_root: require("DATA")?,
            tenants_root: require("TENANTS")?,
            http_timeout: Duration::from_millis(parse_or("HTTP_TIMEOUT_MS", 5000)?),
            tick_grace: Duration::from_millis(parse_or("TICK_GRACE_MS", 3000)?),
        })
    }
}

fn require(var: &'static str) -> Result<String, ConfigError> {
    match std::env::var(var) {
        Ok(v) if !v.is_empty() => Ok(v),
        _ => Err(ConfigError::Missing(var)),
    }
}

fn parse_or<T: std::str::FromStr>(var: &'static str, default: T) -> Result<T, ConfigError> {
    match std::env::var(var) {
        Ok(v) if !v.is_empty() => v.parse().map_err(|_| ConfigError::Invalid {
            var,
            value: v,
        }),
        _ => Ok(default),
    }
}

/// Startup configuration failure.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ConfigError {
    #[error("required environment variable {0} is not set")]
    Missing(&'static str),

    #[error("environment variable {var} has unparseable value {value:?}")]
    Invalid { var: &'static str, value: String },
}

impl ErrorCode for ConfigError {
    fn code(&self) -> &'static str {
        match self {
            Self::Missing(_) => "CFG_MISSING_VAR",
            Self::Invalid { .. } => "CFG_INVALID_VAR",
        }
    }

    fn is_recoverable(&self) -> bool {
        false
    }
}
