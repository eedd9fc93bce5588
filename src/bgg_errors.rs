//! # BoardGameGeek Error Types Module
//!
//! This module defines the errors returned by the remote game data source.

/// Custom error types for BoardGameGeek queries
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum BggError {
    /// The service could not be reached; `fatal` tells whether retrying makes sense
    Unreachable { fatal: bool },
    /// The query produced no usable result
    NoResult,
    /// The response could not be parsed
    MalformedResponse(String),
}

impl BggError {
    /// Whether the failure is worth another attempt
    pub fn is_recoverable(&self) -> bool {
        matches!(self, BggError::Unreachable { fatal: false })
    }
}

impl std::fmt::Display for BggError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            BggError::Unreachable { fatal: true } => write!(f, "BoardGameGeek unreachable (fatal)"),
            BggError::Unreachable { fatal: false } => write!(f, "BoardGameGeek unreachable"),
            BggError::NoResult => write!(f, "No result found"),
            BggError::MalformedResponse(msg) => write!(f, "Malformed response: {msg}"),
        }
    }
}

impl std::error::Error for BggError {}

impl From<quick_xml::Error> for BggError {
    fn from(err: quick_xml::Error) -> Self {
        BggError::MalformedResponse(err.to_string())
    }
}

impl From<quick_xml::events::attributes::AttrError> for BggError {
    fn from(err: quick_xml::events::attributes::AttrError) -> Self {
        BggError::MalformedResponse(err.to_string())
    }
}
