//! Exit codes for the `pdm-core` CLI.
//!
//! Ranges:
//! - 0: success
//! - 10-19: user or configuration errors (fixable by the caller)
//! - 20-29: analysis and internal errors

use pdm_common::{Error, ErrorCategory};

/// Stable process exit codes.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[repr(i32)]
pub enum ExitCode {
    Ok = 0,

    /// Invalid command-line arguments
    ArgsError = 10,
    /// Rejected asset selection or override value
    InvalidInput = 11,
    /// Reference data missing, unreadable or invalid
    ConfigError = 12,

    /// Analysis generation failed
    AnalysisFailed = 20,
    IoError = 21,
    /// Bug; please report
    InternalError = 22,
}

impl ExitCode {
    pub fn as_i32(self) -> i32 {
        self as i32
    }

    pub fn is_success(self) -> bool {
        self == ExitCode::Ok
    }

    pub fn is_user_error(self) -> bool {
        (10..20).contains(&self.as_i32())
    }

    pub fn is_internal_error(self) -> bool {
        self.as_i32() >= 20
    }

    pub fn code_name(&self) -> &'static str {
        match self {
            ExitCode::Ok => "OK",
            ExitCode::ArgsError => "ERR_ARGS",
            ExitCode::InvalidInput => "ERR_INPUT",
            ExitCode::ConfigError => "ERR_CONFIG",
            ExitCode::AnalysisFailed => "ERR_ANALYSIS",
            ExitCode::IoError => "ERR_IO",
            ExitCode::InternalError => "ERR_INTERNAL",
        }
    }

    /// Exit code for a failed command.
    pub fn for_error(err: &Error) -> Self {
        match err.category() {
            ErrorCategory::Input => ExitCode::InvalidInput,
            ErrorCategory::Analysis => ExitCode::AnalysisFailed,
            ErrorCategory::Config => ExitCode::ConfigError,
            ErrorCategory::Io => ExitCode::IoError,
        }
    }
}

impl From<ExitCode> for i32 {
    fn from(code: ExitCode) -> Self {
        code.as_i32()
    }
}

impl From<ExitCode> for std::process::ExitCode {
    fn from(code: ExitCode) -> Self {
        // All codes fit in a u8.
        std::process::ExitCode::from(code.as_i32() as u8)
    }
}

impl std::fmt::Display for ExitCode {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{} ({})", self.code_name(), self.as_i32())
    }
}
