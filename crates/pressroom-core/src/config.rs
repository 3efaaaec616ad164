// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// System configuration.

use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::error::Result;

/// Settings for one printer created at system start.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PrinterConfig {
    /// Printer name, used verbatim in the resource path.
    pub name: String,
    /// Driver name handed to the driver resolver.
    pub driver: String,
    /// Device URI the printer sends output to.
    pub device_uri: String,
    /// Fixed `printer-id`, or `None` to allocate the next free one.
    #[serde(default)]
    pub printer_id: Option<u32>,
}

/// Persistent system settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct SystemConfig {
    /// Host name advertised over DNS-SD and mixed into printer UUIDs.
    pub hostname: String,
    /// Port the IPP listener uses (default 631).
    pub port: u16,
    /// Spool directory; its filesystem bounds `job-k-octets-supported`.
    pub spool_dir: PathBuf,
    /// DNS-SD subtypes to advertise. Empty disables advertisement.
    pub dns_sd_subtypes: Vec<String>,
    /// Printers to create at start-up.
    pub printers: Vec<PrinterConfig>,
}

impl Default for SystemConfig {
    fn default() -> Self {
        Self {
            hostname: std::env::var("HOSTNAME").unwrap_or_else(|_| "pressroom".into()),
            port: 631,
            spool_dir: std::env::temp_dir().join("pressroom"),
            dns_sd_subtypes: Vec::new(),
            printers: Vec::new(),
        }
    }
}

impl SystemConfig {
    /// Load settings from a JSON file. Missing fields take their defaults.
    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let data = std::fs::read_to_string(path.as_ref())?;
        let config = serde_json::from_str(&data)?;
        debug!(path = %path.as_ref().display(), "system config loaded");
        Ok(config)
    }

    /// Write settings as pretty-printed JSON.
    pub fn save(&self, path: impl AsRef<Path>) -> Result<()> {
        let json = serde_json::to_string_pretty(self)?;
        std::fs::write(path.as_ref(), json)?;
        Ok(())
    }

    /// Whether printers should be advertised over DNS-SD.
    pub fn advertises(&self) -> bool {
        !self.dns_sd_subtypes.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn save_then_load_keeps_printers() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.json");

        let mut config = SystemConfig {
            hostname: "spool-host".into(),
            port: 8631,
            ..SystemConfig::default()
        };
        config.printers.push(PrinterConfig {
            name: "LabelPrinter".into(),
            driver: "pwg_2inch-203dpi-black_1".into(),
            device_uri: "file:///dev/null".into(),
            printer_id: Some(3),
        });
        config.save(&path).unwrap();

        let loaded = SystemConfig::load(&path).unwrap();
        assert_eq!(loaded.hostname, "spool-host");
        assert_eq!(loaded.port, 8631);
        assert_eq!(loaded.printers, config.printers);
    }

    #[test]
    fn missing_fields_take_defaults() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.json");
        std::fs::write(&path, r#"{ "port": 9100 }"#).unwrap();

        let loaded = SystemConfig::load(&path).unwrap();
        assert_eq!(loaded.port, 9100);
        assert!(loaded.printers.is_empty());
        assert!(!loaded.advertises());
    }

    #[test]
    fn missing_file_is_io_error() {
        let dir = tempfile::tempdir().unwrap();
        let result = SystemConfig::load(dir.path().join("absent.json"));
        assert!(matches!(result, Err(crate::CoreError::Io(_))));
    }
}
