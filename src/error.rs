//! Application error carrying a process exit code.
//!
//! Exit codes:
//!
//! | code | meaning                                         |
//! |------|-------------------------------------------------|
//! | 2    | input/IO failure (unreadable log, unwritable PNG) |
//! | 3    | insufficient or invalid data for a fit          |
//! | 4    | fit failure (non-convergence, non-finite values) |
//! | 5    | rendering or terminal failure                   |

use std::path::Path;

#[derive(Clone)]
pub struct AppError {
    exit_code: u8,
    message: String,
}

impl AppError {
    pub fn new(exit_code: u8, message: impl Into<String>) -> Self {
        Self {
            exit_code,
            message: message.into(),
        }
    }

    /// IO failure tied to a specific file.
    pub fn io(action: &str, path: &Path, err: std::io::Error) -> Self {
        Self::new(2, format!("Failed to {action} '{}': {err}", path.display()))
    }

    pub fn exit_code(&self) -> u8 {
        self.exit_code
    }

    pub fn message(&self) -> &str {
        &self.message
    }
}

impl std::fmt::Display for AppError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.message)
    }
}

impl std::fmt::Debug for AppError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AppError")
            .field("exit_code", &self.exit_code)
            .field("message", &self.message)
            .finish()
    }
}

impl std::error::Error for AppError {}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn io_error_names_the_path() {
        let err = AppError::io(
            "open MD log",
            Path::new("runs/md1.out"),
            std::io::Error::new(std::io::ErrorKind::NotFound, "no such file"),
        );
        assert_eq!(err.exit_code(), 2);
        assert!(err.message().contains("runs/md1.out"));
        assert!(err.to_string().starts_with("Failed to open MD log"));
    }
}
