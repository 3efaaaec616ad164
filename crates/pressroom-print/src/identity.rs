// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Printer addressing: resource paths and stable identity tokens.

use sha2::{Digest, Sha256};
use uuid::{Builder, Uuid};

use pressroom_core::types::{IPP_PRINT_BASE, JobId};

/// Build the resource path of the printer with the given name.
///
/// The name is used verbatim.  Validating it is the caller's job.
pub fn resource_path(name: &str) -> String {
    format!("{IPP_PRINT_BASE}/{name}")
}

/// Whether `path` addresses the default printer: the bare base path, or a
/// numeric sub-path such as `/ipp/print/42`.
pub fn is_default_path(path: &str) -> bool {
    match path.strip_prefix(IPP_PRINT_BASE) {
        Some("") => true,
        Some(rest) => rest
            .strip_prefix('/')
            .and_then(|tail| tail.bytes().next())
            .is_some_and(|b| b.is_ascii_digit()),
        None => false,
    }
}

/// The host-level identity every printer UUID is derived from.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SystemIdentity {
    hostname: String,
    port: u16,
}

impl SystemIdentity {
    pub fn new(hostname: impl Into<String>, port: u16) -> Self {
        Self {
            hostname: hostname.into(),
            port,
        }
    }

    pub fn hostname(&self) -> &str {
        &self.hostname
    }

    pub fn port(&self) -> u16 {
        self.port
    }

    /// Derive the `urn:uuid:` token for `name` with the given discriminator.
    ///
    /// Deterministic: the same system, name, and discriminator always give
    /// the same token.  Printers use discriminator 0.
    pub fn make_uuid(&self, name: &str, discriminator: u32) -> String {
        let seed = format!(
            "pressroom:{}:{}:{}:{}",
            self.hostname, self.port, name, discriminator
        );
        digest_uuid(&seed).urn().to_string()
    }

    /// `printer-uuid` for the printer called `name`.
    pub fn printer_uuid(&self, name: &str) -> String {
        self.make_uuid(name, 0)
    }

    /// `job-uuid` for a job on the printer called `printer_name`.
    ///
    /// The nonce keeps job UUIDs unique across restarts, which reuse job ids.
    pub fn job_uuid(&self, printer_name: &str, job_id: JobId, nonce: u32) -> String {
        let seed = format!(
            "pressroom-job:{}:{}:{}:{}:{:08x}",
            self.hostname, self.port, printer_name, job_id, nonce
        );
        digest_uuid(&seed).urn().to_string()
    }
}

/// First 16 bytes of the SHA-256 digest, stamped as an RFC 9562 version-8 UUID.
fn digest_uuid(seed: &str) -> Uuid {
    let digest = Sha256::digest(seed.as_bytes());
    let mut bytes = [0u8; 16];
    bytes.copy_from_slice(&digest[..16]);
    Builder::from_custom_bytes(bytes).into_uuid()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn identity() -> SystemIdentity {
        SystemIdentity::new("spool-host", 631)
    }

    #[test]
    fn resource_uses_name_verbatim() {
        assert_eq!(resource_path("LabelPrinter"), "/ipp/print/LabelPrinter");
        assert_eq!(resource_path("a b"), "/ipp/print/a b");
    }

    #[test]
    fn distinct_names_give_distinct_resources() {
        assert_ne!(resource_path("Foo"), resource_path("Foo2"));
    }

    #[test]
    fn default_path_detection() {
        assert!(is_default_path("/ipp/print"));
        assert!(is_default_path("/ipp/print/42"));
        assert!(is_default_path("/ipp/print/7/job"));
        assert!(!is_default_path("/ipp/print/"));
        assert!(!is_default_path("/ipp/print/LabelPrinter"));
        assert!(!is_default_path("/ipp/printer"));
        assert!(!is_default_path("/ipp/system"));
    }

    #[test]
    fn printer_uuid_is_deterministic() {
        let a = identity().printer_uuid("LabelPrinter");
        let b = identity().printer_uuid("LabelPrinter");
        assert_eq!(a, b);
        assert!(a.starts_with("urn:uuid:"));
        assert_eq!(a.len(), "urn:uuid:".len() + 36);
    }

    #[test]
    fn printer_uuid_depends_on_every_input() {
        let base = identity().printer_uuid("LabelPrinter");
        assert_ne!(base, identity().printer_uuid("LabelPrinter2"));
        assert_ne!(base, SystemIdentity::new("other-host", 631).printer_uuid("LabelPrinter"));
        assert_ne!(base, SystemIdentity::new("spool-host", 8631).printer_uuid("LabelPrinter"));
        assert_ne!(base, identity().make_uuid("LabelPrinter", 1));
    }

    #[test]
    fn uuid_carries_version_eight() {
        let token = identity().printer_uuid("LabelPrinter");
        let parsed = Uuid::parse_str(token.trim_start_matches("urn:uuid:")).unwrap();
        assert_eq!(parsed.get_version_num(), 8);
    }

    #[test]
    fn job_uuid_varies_with_nonce() {
        let id = identity();
        assert_ne!(
            id.job_uuid("LabelPrinter", JobId(1), 1),
            id.job_uuid("LabelPrinter", JobId(1), 2)
        );
    }
}
