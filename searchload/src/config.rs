//! Connection configuration

use serde::{Deserialize, Serialize};
use std::fmt;
use std::time::Duration;
use typed_builder::TypedBuilder;

use crate::error::{Error, Result};
use crate::random::RandomSource;

pub const DEFAULT_ADDRESS: &str = "https://localhost:9200";

/// Stands in for secrets in `Debug` output.
pub(crate) const REDACTED: &str = "<redacted>";

/// How a virtual user reaches the cluster.
#[derive(Clone, PartialEq, Eq, Serialize, Deserialize, TypedBuilder)]
pub struct ConnectionConfig {
    /// Cluster base URL
    #[builder(default = DEFAULT_ADDRESS.to_string(), setter(into))]
    #[serde(default = "default_address")]
    pub address: String,

    #[builder(default, setter(strip_option, into))]
    #[serde(default)]
    pub username: Option<String>,

    #[builder(default, setter(strip_option, into))]
    #[serde(default)]
    pub password: Option<String>,

    /// Skip TLS certificate verification, for self-signed test clusters
    #[builder(default)]
    #[serde(default)]
    pub accept_invalid_certs: bool,

    /// Whole-request timeout enforced by the HTTP client
    #[builder(default, setter(strip_option))]
    #[serde(default)]
    pub timeout: Option<Duration>,

    /// Seed for synthesized ids and bodies; unset means OS entropy
    #[builder(default, setter(strip_option))]
    #[serde(default)]
    pub seed: Option<u64>,
}

fn default_address() -> String {
    DEFAULT_ADDRESS.to_string()
}

impl fmt::Debug for ConnectionConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ConnectionConfig")
            .field("address", &self.address)
            .field("username", &self.username)
            .field("password", &self.password.as_ref().map(|_| REDACTED))
            .field("accept_invalid_certs", &self.accept_invalid_certs)
            .field("timeout", &self.timeout)
            .field("seed", &self.seed)
            .finish()
    }
}

impl Default for ConnectionConfig {
    fn default() -> Self {
        Self::builder().build()
    }
}

impl ConnectionConfig {
    /// Read the `SEARCHLOAD_*` environment variables.
    pub fn from_env() -> Result<Self> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self> {
        let mut config = Self::default();
        if let Some(address) = lookup("SEARCHLOAD_ADDRESS") {
            config.address = address;
        }
        config.username = lookup("SEARCHLOAD_USERNAME");
        config.password = lookup("SEARCHLOAD_PASSWORD");
        if let Some(insecure) = lookup("SEARCHLOAD_INSECURE") {
            config.accept_invalid_certs = matches!(insecure.to_ascii_lowercase().as_str(), "1" | "true" | "yes");
        }
        if let Some(ms) = lookup("SEARCHLOAD_TIMEOUT_MS") {
            config.timeout = Some(Duration::from_millis(parse_number("SEARCHLOAD_TIMEOUT_MS", &ms)?));
        }
        if let Some(seed) = lookup("SEARCHLOAD_SEED") {
            config.seed = Some(parse_number("SEARCHLOAD_SEED", &seed)?);
        }
        Ok(config)
    }

    pub fn random_source(&self) -> RandomSource {
        match self.seed {
            Some(seed) => RandomSource::seeded(seed),
            None => RandomSource::from_entropy(),
        }
    }
}

fn parse_number(key: &str, value: &str) -> Result<u64> {
    value
        .trim()
        .parse()
        .map_err(|e| Error::Config(format!("{key}={value:?}: {e}")))
}
