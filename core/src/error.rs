//! Error types produced by the state store.

/// Errors returned by [`Store::set_state`](crate::Store::set_state).
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum StoreError {
    /// The update was not a mapping, so it cannot be shallow-merged into the state.
    #[error("state updates must be a mapping, found {found}")]
    InvalidStateUpdate {
        /// JSON kind of the rejected value.
        found: &'static str,
    },
}

/// Returns the JSON kind name of a value, used in diagnostics.
pub(crate) const fn kind_of(value: &serde_json::Value) -> &'static str {
    match value {
        serde_json::Value::Null => "null",
        serde_json::Value::Bool(_) => "a boolean",
        serde_json::Value::Number(_) => "a number",
        serde_json::Value::String(_) => "a string",
        serde_json::Value::Array(_) => "an array",
        serde_json::Value::Object(_) => "an object",
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn display_names_the_rejected_kind() {
        let error = StoreError::InvalidStateUpdate {
            found: kind_of(&json!([1, 2])),
        };
        assert_eq!(
            error.to_string(),
            "state updates must be a mapping, found an array"
        );
    }
}
