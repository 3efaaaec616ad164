// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Pressroom: identifiers, configuration, and error definitions shared by the
// printer system and the daemon.

pub mod config;
pub mod error;
pub mod types;

pub use config::{PrinterConfig, SystemConfig};
pub use error::CoreError;
pub use types::*;
