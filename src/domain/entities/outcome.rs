/// Result of a single probe invocation, before a timestamp is attached.
///
/// Probe-reported failures, probe crashes, and timeouts all collapse into
/// this one shape; callers distinguish them only through `message`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CheckOutcome {
    pub success: bool,
    pub message: String,
}

impl CheckOutcome {
    /// A passing outcome.
    #[must_use]
    pub fn up(message: impl Into<String>) -> Self {
        Self {
            success: true,
            message: message.into(),
        }
    }

    /// A failing outcome.
    #[must_use]
    pub fn down(message: impl Into<String>) -> Self {
        Self {
            success: false,
            message: message.into(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn up_sets_success() {
        let outcome = CheckOutcome::up("'example.com' - UP");
        assert!(outcome.success);
        assert_eq!(outcome.message, "'example.com' - UP");
    }

    #[test]
    fn down_clears_success() {
        let outcome = CheckOutcome::down("'example.com' - DOWN or unreachable");
        assert!(!outcome.success);
        assert!(outcome.message.contains("DOWN"));
    }
}
