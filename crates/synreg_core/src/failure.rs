//! Opaque failure reported by an external tool (e.g. a table generator).
//!
//! The core never inspects these beyond classification; it only carries them
//! to the caller.

use serde::{Deserialize, Serialize};
use thiserror::Error;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum FailureKind {
    /// Terminated by a signal.
    Signaled(i32),
    /// Exited on its own with a non-zero status.
    Exited(i32),
    /// Could not be started, or died without a status.
    Other,
}

#[derive(Debug, Clone, PartialEq, Eq, Error, Serialize, Deserialize)]
#[error("{message}")]
pub struct ExternalToolFailure {
    pub signal: Option<i32>,
    pub exit_code: Option<i32>,
    pub message: String,
}

impl ExternalToolFailure {
    pub fn signaled(signal: i32) -> Self {
        Self {
            signal: Some(signal),
            exit_code: None,
            message: format!("process terminated by signal {signal}"),
        }
    }

    pub fn exited(code: i32, stderr: &str) -> Self {
        let stderr = stderr.trim();
        let message = if stderr.is_empty() {
            format!("process exited with status {code}")
        } else {
            format!("process exited with status {code}: {stderr}")
        };
        Self { signal: None, exit_code: Some(code), message }
    }

    pub fn other(message: impl Into<String>) -> Self {
        Self { signal: None, exit_code: None, message: message.into() }
    }

    pub fn kind(&self) -> FailureKind {
        match (self.signal, self.exit_code) {
            (Some(sig), _) => FailureKind::Signaled(sig),
            (None, Some(code)) => FailureKind::Exited(code),
            (None, None) => FailureKind::Other,
        }
    }

    /// Classify a finished child's status. `None` for success.
    pub fn from_status(status: std::process::ExitStatus, stderr: &str) -> Option<Self> {
        if status.success() {
            return None;
        }
        #[cfg(unix)]
        {
            use std::os::unix::process::ExitStatusExt;
            if let Some(sig) = status.signal() {
                return Some(Self::signaled(sig));
            }
        }
        Some(match status.code() {
            Some(code) => Self::exited(code, stderr),
            None => Self::other("process ended without an exit status"),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn signal_is_data_not_type() {
        let f = ExternalToolFailure::signaled(9);
        assert_eq!(f.kind(), FailureKind::Signaled(9));
        assert_eq!(f.to_string(), "process terminated by signal 9");
        let boxed: Box<dyn std::error::Error + Send + Sync> = Box::new(f.clone());
        assert_eq!(boxed.to_string(), "process terminated by signal 9");

        let f = ExternalToolFailure::exited(2, "  boom\n");
        assert_eq!(f.kind(), FailureKind::Exited(2));
        assert_eq!(f.to_string(), "process exited with status 2: boom");

        assert_eq!(ExternalToolFailure::other("spawn failed").kind(), FailureKind::Other);
    }

    #[cfg(unix)]
    #[test]
    fn classifies_killed_child() {
        let status = std::process::Command::new("sh")
            .args(["-c", "kill -9 $$"])
            .status()
            .unwrap();
        let f = ExternalToolFailure::from_status(status, "").unwrap();
        assert_eq!(f.kind(), FailureKind::Signaled(9));

        let ok = std::process::Command::new("true").status().unwrap();
        assert!(ExternalToolFailure::from_status(ok, "").is_none());
    }
}
