// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Core domain types for the Pressroom printer system.

use serde::{Deserialize, Serialize};

/// Path prefix under which every printer resource is rooted.
///
/// A request for exactly this path (or for a numeric sub-path beneath it)
/// addresses the default printer.
pub const IPP_PRINT_BASE: &str = "/ipp/print";

/// Numeric `printer-id` of a printer within one system.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct PrinterId(pub u32);

impl std::fmt::Display for PrinterId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Numeric `job-id` allocated by a printer.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct JobId(pub u32);

impl std::fmt::Display for JobId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// IPP `printer-state` (RFC 8011 §5.4.11).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum PrinterState {
    Idle,
    Processing,
    Stopped,
}

impl PrinterState {
    /// IPP enum value for `printer-state`.
    pub fn ipp_enum_value(&self) -> i32 {
        match self {
            Self::Idle => 3,
            Self::Processing => 4,
            Self::Stopped => 5,
        }
    }
}

/// Selector for job listings, mirroring the IPP `which-jobs` keywords.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum WhichJobs {
    All,
    NotCompleted,
    Completed,
}

impl WhichJobs {
    /// Parse a `which-jobs` keyword. Unknown keywords yield `None`.
    pub fn from_keyword(keyword: &str) -> Option<Self> {
        match keyword {
            "all" => Some(Self::All),
            "not-completed" => Some(Self::NotCompleted),
            "completed" => Some(Self::Completed),
            _ => None,
        }
    }

    /// The `which-jobs` keyword for this selector.
    pub fn keyword(&self) -> &'static str {
        match self {
            Self::All => "all",
            Self::NotCompleted => "not-completed",
            Self::Completed => "completed",
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn which_jobs_keywords_parse_back() {
        for which in [WhichJobs::All, WhichJobs::NotCompleted, WhichJobs::Completed] {
            assert_eq!(WhichJobs::from_keyword(which.keyword()), Some(which));
        }
        assert_eq!(WhichJobs::from_keyword("fetchable"), None);
    }

    #[test]
    fn printer_state_enum_values() {
        assert_eq!(PrinterState::Idle.ipp_enum_value(), 3);
        assert_eq!(PrinterState::Processing.ipp_enum_value(), 4);
        assert_eq!(PrinterState::Stopped.ipp_enum_value(), 5);
    }

    #[test]
    fn ids_serialize_as_bare_integers() {
        assert_eq!(serde_json::to_string(&PrinterId(7)).unwrap(), "7");
        assert_eq!(serde_json::from_str::<JobId>("42").unwrap(), JobId(42));
    }
}
