use std::fmt;

#[derive(Debug, Clone)]
pub struct IoError {
    error: String,
}

impl IoError {
    pub fn new(error: String) -> Self {
        return IoError { error };
    }

    /* Prefix the underlying error with what we were doing and on which path */
    pub fn with_context(action: &str, path: &str, error: impl fmt::Display) -> Self {
        return IoError {
            error: format!("{action} '{path}': {error}"),
        };
    }
}

impl fmt::Display for IoError {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "{}", self.error)
    }
}

impl std::error::Error for IoError {}
