//! Exit codes for the lp-core CLI.
//!
//! Exit codes communicate the outcome without requiring output parsing.
//!
//! Exit code ranges:
//! - 0: Success
//! - 10-19: User errors (bad arguments, model, or configuration)
//! - 20-29: Internal and environment errors

use lp_common::{Error, ErrorCategory};

/// Exit codes for lp-core operations.
///
/// These codes are a stable contract for automation.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[repr(i32)]
pub enum ExitCode {
    /// Command completed
    Clean = 0,

    /// Invalid arguments
    ArgsError = 10,

    /// Model document missing a component or malformed
    ModelError = 11,

    /// Solver configuration invalid or unsupported
    ConfigError = 12,

    /// Internal error (bug - please report)
    InternalError = 20,

    /// I/O error
    IoError = 21,
}

impl ExitCode {
    /// Convert to i32 for process exit.
    pub fn as_i32(self) -> i32 {
        self as i32
    }

    pub fn is_success(self) -> bool {
        matches!(self, ExitCode::Clean)
    }

    /// User errors (codes 10-19) can be fixed by changing the inputs.
    pub fn is_user_error(self) -> bool {
        (10..20).contains(&(self as i32))
    }

    /// Internal errors (codes 20-29) indicate bugs or a broken environment.
    pub fn is_internal_error(self) -> bool {
        (self as i32) >= 20
    }

    /// Get the error code name as a string constant (for JSON output).
    pub fn code_name(&self) -> &'static str {
        match self {
            ExitCode::Clean => "OK_CLEAN",
            ExitCode::ArgsError => "ERR_ARGS",
            ExitCode::ModelError => "ERR_MODEL",
            ExitCode::ConfigError => "ERR_CONFIG",
            ExitCode::InternalError => "ERR_INTERNAL",
            ExitCode::IoError => "ERR_IO",
        }
    }

    /// Exit code for a workspace error.
    pub fn for_error(err: &Error) -> Self {
        match err.category() {
            ErrorCategory::Model => ExitCode::ModelError,
            ErrorCategory::Config => ExitCode::ConfigError,
            ErrorCategory::Solve => ExitCode::InternalError,
            ErrorCategory::Io => ExitCode::IoError,
        }
    }
}

impl From<ExitCode> for i32 {
    fn from(code: ExitCode) -> Self {
        code as i32
    }
}

impl std::fmt::Display for ExitCode {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{} ({})", self.code_name(), self.as_i32())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn ranges_are_consistent() {
        assert!(ExitCode::Clean.is_success());
        assert!(ExitCode::ModelError.is_user_error());
        assert!(ExitCode::ConfigError.is_user_error());
        assert!(!ExitCode::IoError.is_user_error());
        assert!(ExitCode::IoError.is_internal_error());
    }

    #[test]
    fn errors_map_by_category() {
        assert_eq!(
            ExitCode::for_error(&Error::MissingComponent("transitions".into())),
            ExitCode::ModelError
        );
        assert_eq!(
            ExitCode::for_error(&Error::InvalidSlack("length".into())),
            ExitCode::ConfigError
        );
        assert_eq!(
            ExitCode::for_error(&Error::Solve("bug".into())),
            ExitCode::InternalError
        );
    }

    #[test]
    fn display_includes_name_and_code() {
        assert_eq!(ExitCode::ConfigError.to_string(), "ERR_CONFIG (12)");
    }
}
