//! Service selection and credentials.
//!
//! - [`ServiceVariant`] - Provider family (Logentries or Rapid7 InsightOps)
//! - [`Region`] - Rapid7 data-center region
//! - [`Credential`] - API key and account selector

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use crate::error::CoreError;

// ============================================================================
// Service Variant
// ============================================================================

/// The provider family whose REST API is polled.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum ServiceVariant {
    /// Legacy Logentries API with per-log usage endpoints.
    #[default]
    Logentries,
    /// Region-aware Rapid7 InsightOps API with aggregated usage.
    Rapid7,
}

impl ServiceVariant {
    /// Returns all supported variants.
    pub fn all() -> &'static [ServiceVariant] {
        &[Self::Logentries, Self::Rapid7]
    }

    /// Returns the identifier used on the command line and in config files.
    pub fn cli_name(&self) -> &'static str {
        match self {
            Self::Logentries => "logentries",
            Self::Rapid7 => "rapid7",
        }
    }

    /// Returns the Prometheus metric namespace for this variant.
    pub fn namespace(&self) -> &'static str {
        self.cli_name()
    }

    /// Returns the human-readable name.
    pub fn display_name(&self) -> &'static str {
        match self {
            Self::Logentries => "Logentries",
            Self::Rapid7 => "Rapid7 InsightOps",
        }
    }

    /// Returns true if this variant needs an explicit account identifier.
    pub fn requires_account_id(&self) -> bool {
        matches!(self, Self::Logentries)
    }
}

impl fmt::Display for ServiceVariant {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.cli_name())
    }
}

impl FromStr for ServiceVariant {
    type Err = CoreError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "logentries" => Ok(Self::Logentries),
            "rapid7" | "insightops" => Ok(Self::Rapid7),
            other => Err(CoreError::UnknownVariant(other.to_string())),
        }
    }
}

// ============================================================================
// Region
// ============================================================================

/// Data-center region of a Rapid7 account.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum Region {
    /// United States.
    #[default]
    Us,
    /// Europe.
    Eu,
    /// Canada.
    Ca,
    /// Australia.
    Au,
}

impl Region {
    /// Returns all supported regions.
    pub fn all() -> &'static [Region] {
        &[Self::Us, Self::Eu, Self::Ca, Self::Au]
    }

    /// Returns the region code used as the API host prefix.
    pub fn code(&self) -> &'static str {
        match self {
            Self::Us => "us",
            Self::Eu => "eu",
            Self::Ca => "ca",
            Self::Au => "au",
        }
    }
}

impl fmt::Display for Region {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.code())
    }
}

impl FromStr for Region {
    type Err = CoreError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "us" => Ok(Self::Us),
            "eu" => Ok(Self::Eu),
            "ca" => Ok(Self::Ca),
            "au" => Ok(Self::Au),
            other => Err(CoreError::UnknownRegion(other.to_string())),
        }
    }
}

// ============================================================================
// Credential
// ============================================================================

/// Credentials and account selector used for every upstream request.
///
/// Built once at startup and never mutated.
#[derive(Clone, PartialEq, Eq)]
pub struct Credential {
    api_key: String,
    account_id: Option<String>,
    variant: ServiceVariant,
    region: Region,
}

impl Credential {
    /// Creates a credential after checking the variant's requirements.
    ///
    /// # Errors
    ///
    /// Returns `CoreError::InvalidConfig` if the API key is empty, or if the
    /// variant needs an account identifier and none was given.
    pub fn new(
        api_key: impl Into<String>,
        account_id: Option<String>,
        variant: ServiceVariant,
        region: Region,
    ) -> Result<Self, CoreError> {
        let api_key = api_key.into();
        if api_key.trim().is_empty() {
            return Err(CoreError::InvalidConfig("an API key is required".to_string()));
        }

        let account_id = account_id.filter(|id| !id.trim().is_empty());
        if variant.requires_account_id() && account_id.is_none() {
            return Err(CoreError::InvalidConfig(format!(
                "an account id is required for {variant}"
            )));
        }

        Ok(Self {
            api_key,
            account_id,
            variant,
            region,
        })
    }

    /// Returns the API key sent in the `x-api-key` header.
    pub fn api_key(&self) -> &str {
        &self.api_key
    }

    /// Returns the account identifier, if configured.
    pub fn account_id(&self) -> Option<&str> {
        self.account_id.as_deref()
    }

    /// Returns the service variant.
    pub fn variant(&self) -> ServiceVariant {
        self.variant
    }

    /// Returns the region.
    pub fn region(&self) -> Region {
        self.region
    }
}

impl fmt::Debug for Credential {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Credential")
            .field("api_key", &"<redacted>")
            .field("account_id", &self.account_id)
            .field("variant", &self.variant)
            .field("region", &self.region)
            .finish()
    }
}

// ============================================================================
// Tests
// ============================================================================
