//! Unified error interface.
//!
//! Every error enum in the workspace implements [`ErrorCode`] so that
//! the orchestrator and the service binary can log and classify failures
//! uniformly: a machine-readable code plus a recoverability flag that
//! drives the log-and-continue policy (recoverable failures are retried
//! implicitly by the next tick; non-recoverable ones point at bad input
//! or configuration).

/// Machine-readable error classification.
///
/// # Code format
///
/// - UPPER_SNAKE_CASE, prefixed by layer (`CORE_`, `REG_`, `FETCH_`,
///   `BUS_`, `ORCH_`, `CFG_`)
/// - Stable once defined; changing a code is a breaking change
///
/// # Recoverability
///
/// An error is recoverable when retrying may succeed without a code or
/// configuration change - collaborator timeouts, transient transport
/// failures. Validation and not-found errors are not.
pub trait ErrorCode {
    /// Returns the stable machine-readable code.
    fn code(&self) -> &'static str;

    /// Returns whether a retry may succeed.
    fn is_recoverable(&self) -> bool;
}

/// Asserts that an error's code is non-empty, carries the expected
/// layer prefix, and is UPPER_SNAKE_CASE.
///
/// # Panics
///
/// Panics with a descriptive message on violation; intended for tests.
pub fn assert_error_code<E: ErrorCode>(err: &E, expected_prefix: &str) {
    let code = err.code();
    assert!(!code.is_empty(), "error code must not be empty");
    assert!(
        code.starts_with(expected_prefix),
        "error code '{code}' must start with prefix '{expected_prefix}'"
    );
    assert!(
        is_upper_snake_case(code),
        "error code '{code}' must be UPPER_SNAKE_CASE"
    );
}

/// [`assert_error_code`] over every variant of an enum at once.
pub fn assert_error_codes<E: ErrorCode>(errors: &[E], expected_prefix: &str) {
    for err in errors {
        assert_error_code(err, expected_prefix);
    }
}

fn is_upper_snake_case(s: &str) -> bool {
    !s.is_empty()
        && !s.starts_with('_')
        && !s.ends_with('_')
        && !s.contains("__")
        && s.chars()
            .all(|c| c.is_ascii_uppercase() || c.is_ascii_digit() || c == '_')
}

#[cfg(test)]
mod tests {
    use super::*;

    #[derive(Debug)]
    enum SampleError {
        Transient,
        Permanent,
    }

    impl ErrorCode for SampleError {
        fn code(&self) -> &'static str {
            match self {
                Self::Transient => "SAMPLE_TRANSIENT",
                Self::Permanent => "SAMPLE_PERMANENT",
            }
        }

        fn is_recoverable(&self) -> bool {
            matches!(self, Self::Transient)
        }
    }

    #[test]
    fn codes_and_recoverability() {
        assert_eq!(SampleError::Transient.code(), "SAMPLE_TRANSIENT");
        assert!(SampleError::Transient.is_recoverable());
        assert!(!SampleError::Permanent.is_recoverable());
    }

    #[test]
    fn all_variants_pass_assertion() {
        assert_error_codes(&[SampleError::Transient, SampleError::Permanent], "SAMPLE_");
    }

    #[test]
    #[should_panic(expected = "must start with prefix")]
    fn wrong_prefix_panics() {
        assert_error_code(&SampleError::Transient, "OTHER_");
    }

    #[test]
    fn snake_case_check() {
        assert!(is_upper_snake_case("FETCH_TIMEOUT"));
        assert!(!is_upper_snake_case("Fetch_Timeout"));
        assert!(!is_upper_snake_case("_FETCH"));
        assert!(!is_upper_snake_case("FETCH__TIMEOUT"));
    }
}
