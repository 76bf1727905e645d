use thiserror::Error;

use crate::domain::product::SkuId;

#[derive(Clone, Debug, Error, PartialEq, Eq)]
pub enum DomainError {
    #[error("anchor sku `{0}` is not in the catalog")]
    UnknownAnchor(SkuId),
    #[error("domain invariant violation: {0}")]
    InvariantViolation(String),
}

#[derive(Clone, Debug, Error, PartialEq, Eq)]
pub enum ApplicationError {
    #[error(transparent)]
    Domain(#[from] DomainError),
    #[error("input failure: {0}")]
    Input(String),
    #[error("configuration failure: {0}")]
    Configuration(String),
}

impl ApplicationError {
    /// Stable machine-readable class for command envelopes.
    pub fn error_class(&self) -> &'static str {
        match self {
            Self::Domain(DomainError::UnknownAnchor(_)) => "unknown_anchor",
            Self::Domain(DomainError::InvariantViolation(_)) => "domain_validation",
            Self::Input(_) => "input",
            Self::Configuration(_) => "config_validation",
        }
    }

    pub fn exit_code(&self) -> u8 {
        match self {
            Self::Configuration(_) => 2,
            Self::Input(_) | Self::Domain(_) => 3,
        }
    }

    pub fn user_message(&self) -> &'static str {
        match self {
            Self::Domain(DomainError::UnknownAnchor(_)) => {
                "The requested anchor product was not found in the catalog."
            }
            Self::Domain(DomainError::InvariantViolation(_)) | Self::Input(_) => {
                "The request could not be processed. Check inputs and try again."
            }
            Self::Configuration(_) => "Configuration is invalid. Run `aurora config` to inspect it.",
        }
    }
}
