// SPDX-License-Identifier: MIT

//! Startup configuration
//!
//! Settings are resolved once in `main` and handed to the components that
//! need them. Keys are read from the environment (after `.env` is loaded),
//! never written back to it.

use crate::adk::error::{FlowdraftError, ModelError};
use crate::adk::model::{GenerationConfig, ModelSettings, Provider};
use std::env;
use std::net::{IpAddr, SocketAddr};

pub const DEFAULT_HOST: &str = "127.0.0.1";
pub const DEFAULT_PORT: u16 = 8000;
pub const DEFAULT_MAX_TURNS: u32 = 10;

/// Settings for the optional model-backed agent
#[derive(Debug, Clone)]
pub struct AgentSettings {
    pub model: ModelSettings,
    pub generation: GenerationConfig,
    pub max_turns: u32,
}

impl AgentSettings {
    /// Resolve settings for `provider`, reading keys through `lookup`.
    ///
    /// Fails with [`ModelError::ApiKeyMissing`] when the provider's key
    /// variable is unset or blank.
    pub fn resolve<F>(
        provider: Provider,
        model_name: Option<String>,
        generation: GenerationConfig,
        lookup: F,
    ) -> Result<Self, FlowdraftError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let api_key = lookup(provider.key_var())
            .filter(|k| !k.trim().is_empty())
            .ok_or_else(|| ModelError::ApiKeyMissing(provider.key_var().to_string()))?;

        let base_url = lookup(provider.base_url_var()).filter(|u| !u.trim().is_empty());

        Ok(Self {
            model: ModelSettings {
                provider,
                model_name: model_name.unwrap_or_else(|| provider.default_model().to_string()),
                api_key,
                base_url,
            },
            generation,
            max_turns: DEFAULT_MAX_TURNS,
        })
    }

    /// Resolve settings from the process environment
    pub fn from_env(
        provider: Provider,
        model_name: Option<String>,
        generation: GenerationConfig,
    ) -> Result<Self, FlowdraftError> {
        Self::resolve(provider, model_name, generation, |key| env::var(key).ok())
    }
}

/// Listen address for the HTTP server
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ServerSettings {
    pub host: String,
    pub port: u16,
}

impl ServerSettings {
    pub fn socket_addr(&self) -> Result<SocketAddr, FlowdraftError> {
        let ip: IpAddr = self
            .host
            .parse()
            .map_err(|e| FlowdraftError::config(format!("invalid host '{}': {}", self.host, e)))?;
        Ok(SocketAddr::new(ip, self.port))
    }
}

impl Default for ServerSettings {
    fn default() -> Self {
        Self {
            host: DEFAULT_HOST.to_string(),
            port: DEFAULT_PORT,
        }
    }
}
