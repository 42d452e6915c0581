use serde::{Deserialize, Serialize};

/// Body Firecracker sends along with every non-successful status code.
#[derive(Serialize, Deserialize, Debug, Clone, Default, PartialEq, Eq, Hash)]
pub struct ApiError {
    /// A description of the error condition
    /// readOnly: true
    #[serde(default)]
    pub fault_message: String,
}

impl ApiError {
    pub fn new<S: Into<String>>(fault_message: S) -> Self {
        Self {
            fault_message: fault_message.into(),
        }
    }
}

impl std::fmt::Display for ApiError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "fault_message: {}", self.fault_message)
    }
}

#[cfg(test)]
mod test {
    use super::*;

    #[test]
    fn test_display_and_missing_field() {
        let err: ApiError = serde_json::from_str(r#"{"fault_message":"bad id"}"#).unwrap();
        assert_eq!(err.to_string(), "fault_message: bad id");

        // Firecracker always sends the field, but an empty object is still an error body
        let err: ApiError = serde_json::from_str("{}").unwrap();
        assert_eq!(err, ApiError::default());
    }
}
