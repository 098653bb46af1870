use std::fmt;

/* Every required header absent from the export, in the order they are declared */
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SchemaError {
    pub missing: Vec<String>,
}

impl SchemaError {
    pub fn new(missing: Vec<String>) -> Self {
        return SchemaError { missing };
    }
}

impl fmt::Display for SchemaError {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        let missing = self
            .missing
            .iter()
            .map(|header| format!("'{header}'"))
            .collect::<Vec<String>>()
            .join(", ");
        write!(f, "Activity export is missing required headers: {missing}")
    }
}

impl std::error::Error for SchemaError {}
