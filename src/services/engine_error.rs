use std::error::Error;
use std::fmt;

/// The only failures the generation engine surfaces to callers. Collaborator
/// outages and malformed model output never appear here; those downgrade to
/// fallback synthesis inside the engine.
#[derive(Debug, PartialEq, Eq)]
pub enum EngineError {
    /// Malformed or missing caller input. Rejected, never retried.
    Validation(String),
    /// Regeneration addressed a day or activity that does not exist.
    Index(String),
    /// Caller is not the owner of the document being mutated.
    Ownership,
}

impl fmt::Display for EngineError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            EngineError::Validation(msg) => write!(f, "Validation error: {}", msg),
            EngineError::Index(msg) => write!(f, "Index error: {}", msg),
            EngineError::Ownership => write!(f, "Not authorized to modify this document"),
        }
    }
}

impl Error for EngineError {}
