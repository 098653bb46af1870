use std::fmt;

/* Raised before any row is read, when we cannot resolve exactly one input source */
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ConfigurationError {
    NoCandidates { dir: String },
    MultipleCandidates { candidates: Vec<String> },
    UnreadableSource { path: String, reason: String },
}

impl fmt::Display for ConfigurationError {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            ConfigurationError::NoCandidates { dir } => {
                write!(f, "No activity export found in '{dir}'")
            }
            ConfigurationError::MultipleCandidates { candidates } => {
                write!(
                    f,
                    "Expected exactly one activity export but found {}: {}",
                    candidates.len(),
                    candidates.join(", ")
                )
            }
            ConfigurationError::UnreadableSource { path, reason } => {
                write!(f, "Cannot read activity export '{path}': {reason}")
            }
        }
    }
}

impl std::error::Error for ConfigurationError {}
