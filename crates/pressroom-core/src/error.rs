// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Unified error types for Pressroom.

use thiserror::Error;

use crate::types::JobId;

/// Top-level error type for all Pressroom operations.
#[derive(Debug, Error)]
pub enum CoreError {
    // -- Printer lifecycle --
    #[error("unable to allocate printer: {0}")]
    Allocation(String),

    #[error("printer not found: {0}")]
    PrinterNotFound(String),

    // -- Jobs --
    #[error("job {0} is not active")]
    JobNotActive(JobId),

    #[error("job {0} not found")]
    JobNotFound(JobId),

    // -- Collaborators --
    #[error("driver resolution failed: {0}")]
    Driver(String),

    #[error("service discovery failed: {0}")]
    Discovery(String),

    // -- Storage / persistence --
    #[error("file I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
}

/// Alias used throughout the codebase.
pub type Result<T> = std::result::Result<T, CoreError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn job_errors_name_the_job() {
        let err = CoreError::JobNotActive(JobId(12));
        assert_eq!(err.to_string(), "job 12 is not active");
    }

    #[test]
    fn io_errors_convert() {
        fn fails() -> Result<()> {
            Err(std::io::Error::new(std::io::ErrorKind::NotFound, "gone"))?;
            Ok(())
        }
        assert!(matches!(fails(), Err(CoreError::Io(_))));
    }
}
