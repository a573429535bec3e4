/// A route pattern that cannot be compiled.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("invalid route pattern `{pattern}`: {reason}")]
pub struct RouteConfigError {
    pattern: String,
    reason: String,
}

impl RouteConfigError {
    pub(crate) fn new(pattern: &str, reason: impl Into<String>) -> Self {
        Self {
            pattern: pattern.to_owned(),
            reason: reason.into(),
        }
    }

    /// The offending pattern, verbatim.
    #[must_use]
    pub fn pattern(&self) -> &str {
        &self.pattern
    }

    /// Why the pattern was rejected.
    #[must_use]
    pub fn reason(&self) -> &str {
        &self.reason
    }
}
