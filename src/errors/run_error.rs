use std::fmt;

use super::{ConfigurationError, DataError, IoError, SchemaError};

/* Any fatal condition of a run. Nothing is written when one of these is returned. */
#[derive(Debug, Clone)]
pub enum RunError {
    Configuration(ConfigurationError),
    Schema(SchemaError),
    Data(DataError),
    Io(IoError),
}

impl RunError {
    /* Process exit code, one per family so the orchestrator can tell them apart */
    pub fn exit_code(&self) -> i32 {
        match self {
            RunError::Configuration(_) => 2,
            RunError::Schema(_) => 3,
            RunError::Data(_) => 4,
            RunError::Io(_) => 5,
        }
    }
}

impl fmt::Display for RunError {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            RunError::Configuration(e) => write!(f, "Configuration error: {e}"),
            RunError::Schema(e) => write!(f, "Schema error: {e}"),
            RunError::Data(e) => write!(f, "Data error: {e}"),
            RunError::Io(e) => write!(f, "IO error: {e}"),
        }
    }
}

impl std::error::Error for RunError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            RunError::Configuration(e) => Some(e),
            RunError::Schema(e) => Some(e),
            RunError::Data(e) => Some(e),
            RunError::Io(e) => Some(e),
        }
    }
}

impl From<ConfigurationError> for RunError {
    fn from(e: ConfigurationError) -> Self {
        RunError::Configuration(e)
    }
}

impl From<SchemaError> for RunError {
    fn from(e: SchemaError) -> Self {
        RunError::Schema(e)
    }
}

impl From<DataError> for RunError {
    fn from(e: DataError) -> Self {
        RunError::Data(e)
    }
}

impl From<IoError> for RunError {
    fn from(e: IoError) -> Self {
        RunError::Io(e)
    }
}
