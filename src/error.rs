// # Error Types
//
// Crate-wide error type for the AFD discovery engine. Mirrors the error kinds
// the search engine and its collaborators (PLI cache, measures, sampling) can
// surface; see each module for which variants it produces.

use thiserror::Error;

#[derive(Error, Debug, Clone, PartialEq)]
pub enum DiscoveryError {
    #[error("invalid input: {0}")]
    InvalidInput(String),

    #[error("PLI construction failure: {0}")]
    PliConstructionFailure(String),

    #[error("arithmetic overflow: {0}")]
    Overflow(String),

    #[error("configuration error: {0}")]
    Configuration(String),

    #[error("serialization error: {0}")]
    Serialization(String),

    #[error("internal error: {0}")]
    Internal(String),
}

pub type Result<T> = std::result::Result<T, DiscoveryError>;

impl From<serde_json::Error> for DiscoveryError {
    fn from(e: serde_json::Error) -> Self {
        DiscoveryError::Serialization(e.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn display_messages_are_stable() {
        let e = DiscoveryError::InvalidInput("too many columns".to_string());
        assert_eq!(e.to_string(), "invalid input: too many columns");
    }
}
