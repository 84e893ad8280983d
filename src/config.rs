//! Protocol configuration: the per-version contract the engine consumes and the
//! host-level settings used by the demo binary.

use figment::providers::{Env, Format, Toml};
use figment::Figment;
use num_bigint::BigUint;
use serde::{Deserialize, Serialize};

use crate::crypto::Group;
use crate::groups::modp1536;

/// Configuration contract supplied by the host integration for a negotiated
/// protocol version.
///
/// The engine only needs to know how large its random exponents are and how
/// to reject values that are not elements of the working group. Both are
/// consulted on every round.
pub trait ProtocolConfig: Send + Sync + 'static {
    /// The group all arithmetic happens in.
    fn group(&self) -> &'static Group {
        modp1536()
    }

    /// Byte length of every random exponent.
    fn parameter_length(&self) -> usize;

    /// Group-membership predicate applied to every element received from the peer.
    fn is_group_element(&self, value: &BigUint) -> bool {
        self.group().contains(value)
    }
}

/// OTR protocol versions that carry SMP.
#[derive(
    Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize, clap::ValueEnum,
)]
#[serde(rename_all = "lowercase")]
pub enum Version {
    /// OTR version 2: 128-bit exponents.
    #[value(alias = "2")]
    V2,
    /// OTR version 3: 1536-bit exponents.
    #[default]
    #[value(alias = "3")]
    V3,
}

impl Version {
    /// Random exponent length in bytes for this version.
    pub const fn parameter_length(self) -> usize {
        match self {
            Version::V2 => 16,
            Version::V3 => 192,
        }
    }
}

impl ProtocolConfig for Version {
    fn parameter_length(&self) -> usize {
        Version::parameter_length(*self)
    }
}

/// Host-level SMP settings.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct SmpConfig {
    /// Negotiated protocol version.
    pub version: Version,
    /// Question attached to exchanges started by this host, if any.
    pub question: Option<String>,
}

impl SmpConfig {
    /// Loads configuration from `.env` file, TOML file, and environment variables.
    ///
    /// Configuration priority (highest to lowest):
    /// 1. Environment variables with `SMP_` prefix (e.g., `SMP_VERSION=v2`)
    /// 2. TOML configuration file (if exists)
    /// 3. `.env` file (if exists)
    /// 4. Built-in defaults
    ///
    /// The TOML file path can be set via `SMP_CONFIG_PATH`. If not set, defaults
    /// to `./config/smp.toml`. A missing file is silently skipped.
    ///
    /// # Errors
    /// Returns an error if the configuration is malformed.
    #[allow(clippy::result_large_err)]
    pub fn from_env() -> figment::error::Result<Self> {
        let _ = dotenvy::dotenv();

        let config_path =
            std::env::var("SMP_CONFIG_PATH").unwrap_or_else(|_| "config/smp.toml".to_string());

        Self::from_figment(
            Figment::new()
                .merge(Toml::file(&config_path))
                .merge(Env::prefixed("SMP_").ignore(&["config_path"])),
        )
    }

    /// Extracts the configuration from an arbitrary provider stack.
    #[allow(clippy::result_large_err)]
    pub fn from_figment(figment: Figment) -> figment::error::Result<Self> {
        figment.extract()
    }

    /// Validates the configuration.
    ///
    /// # Errors
    /// Returns an error message if the question cannot be carried by an SMP1Q TLV.
    pub fn validate(&self) -> Result<(), String> {
        if let Some(question) = &self.question {
            if question.contains('\0') {
                return Err("question must not contain NUL bytes".to_string());
            }
            if question.len() > u16::MAX as usize / 2 {
                return Err(format!("question too long: {} bytes", question.len()));
            }
        }
        Ok(())
    }
}
