use std::fmt;

use serde::{Deserialize, Serialize};

/// Coarse error classes surfaced to the operator.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ErrorCode {
    /// Bad operator input: empty course, malformed import, invalid lead form.
    Validation,
    /// A credential or setting required by the operation is absent.
    MissingConfiguration,
    /// The external generation service failed or returned nothing usable.
    Collaborator,
    Internal,
}

impl ErrorCode {
    pub fn as_str(self) -> &'static str {
        match self {
            ErrorCode::Validation => "validation",
            ErrorCode::MissingConfiguration => "missing_configuration",
            ErrorCode::Collaborator => "collaborator",
            ErrorCode::Internal => "internal",
        }
    }
}

impl fmt::Display for ErrorCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}
