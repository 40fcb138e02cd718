use serde::{Deserialize, Serialize};

pub const MISSING_INPUT_MESSAGE: &str = "Please provide both names.";
pub const STORAGE_FAILURE_MESSAGE: &str = "An error occurred. Please try again later.";
pub const METHOD_NOT_ALLOWED_MESSAGE: &str = "Method not allowed";

#[derive(Debug, Default, Deserialize)]
pub struct CompatibilityRequest {
    #[serde(default)]
    pub name1: Option<String>,
    #[serde(default)]
    pub name2: Option<String>,
}

#[derive(Debug, Serialize, Deserialize, PartialEq, Eq)]
pub struct CompatibilityResponse {
    pub compatibility: u16,
}

#[derive(Debug, Serialize, Deserialize, PartialEq, Eq)]
pub struct ErrorBody {
    pub message: String,
}

impl ErrorBody {
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
        }
    }
}
