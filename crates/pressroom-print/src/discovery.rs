// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// DNS-SD advertisement of registered printers.
//
// Each printer is announced as an `_ipp._tcp.local.` instance named after
// the printer, under the first configured subtype (e.g. `_print`), with the
// IPP Everywhere TXT keys clients use to pick a queue.  Advertisement
// failures are logged and otherwise ignored: the printer still works by
// direct URI.

use std::collections::HashMap;
use std::sync::{Mutex, PoisonError};

use mdns_sd::{ServiceDaemon, ServiceInfo};
use tracing::{debug, info, warn};

use pressroom_core::error::{CoreError, Result};
use pressroom_core::types::PrinterId;

use crate::printer::Printer;

/// mDNS service type for plain IPP.
const IPP_SERVICE_TYPE: &str = "_ipp._tcp.local.";

/// Announces printers to the local network.
pub trait ServiceAdvertiser: Send + Sync {
    /// Advertise a printer that has just been registered.
    fn register(&self, printer: &Printer) -> Result<()>;

    /// Withdraw a printer.  Must tolerate printers that were never
    /// registered or were already withdrawn.
    fn unregister(&self, printer: &Printer);
}

/// Service type string, including the subtype when one is configured.
fn service_type(subtype: Option<&str>) -> String {
    match subtype {
        Some(sub) => format!("{sub}._sub.{IPP_SERVICE_TYPE}"),
        None => IPP_SERVICE_TYPE.to_string(),
    }
}

/// The subtype announced for every printer: the first configured one.
fn advertised_subtype(subtypes: &[String]) -> Option<String> {
    if let [first, ignored @ ..] = subtypes {
        if !ignored.is_empty() {
            warn!(
                advertised = %first,
                ignored = ?ignored,
                "only the first DNS-SD subtype is advertised"
            );
        }
    }
    subtypes.first().cloned()
}

/// TXT record for a printer.
fn txt_properties(printer: &Printer) -> HashMap<String, String> {
    let resource = printer.resource().trim_start_matches('/');
    let uuid = printer.uuid().trim_start_matches("urn:uuid:");

    HashMap::from([
        ("txtvers".to_string(), "1".to_string()),
        ("qtotal".to_string(), "1".to_string()),
        ("rp".to_string(), resource.to_string()),
        ("ty".to_string(), printer.name().to_string()),
        ("pdl".to_string(), printer.document_formats().join(",")),
        ("UUID".to_string(), uuid.to_string()),
        ("Color".to_string(), "F".to_string()),
        ("Duplex".to_string(), "F".to_string()),
        ("URF".to_string(), "none".to_string()),
    ])
}

/// mDNS-SD advertiser backed by the `mdns-sd` daemon.
pub struct MdnsAdvertiser {
    daemon: ServiceDaemon,
    hostname: String,
    port: u16,
    subtype: Option<String>,
    /// Service fullnames of advertised printers, for unregistration.
    registered: Mutex<HashMap<PrinterId, String>>,
}

impl MdnsAdvertiser {
    /// Start an mDNS daemon that advertises printers on `port`.
    ///
    /// Only the first of `subtypes` is announced.
    pub fn new(hostname: &str, port: u16, subtypes: &[String]) -> Result<Self> {
        let daemon = ServiceDaemon::new()
            .map_err(|e| CoreError::Discovery(format!("mDNS daemon: {e}")))?;

        Ok(Self {
            daemon,
            hostname: hostname.to_string(),
            port,
            subtype: advertised_subtype(subtypes),
            registered: Mutex::new(HashMap::new()),
        })
    }

    /// Number of printers currently advertised.
    pub fn advertised(&self) -> usize {
        self.registered
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .len()
    }

    /// Withdraw everything and stop the daemon.
    pub fn shutdown(self) -> Result<()> {
        let fullnames: Vec<String> = self
            .registered
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .drain()
            .map(|(_, fullname)| fullname)
            .collect();
        for fullname in fullnames {
            if let Err(e) = self.daemon.unregister(&fullname) {
                warn!(name = %fullname, error = %e, "failed to unregister mDNS service");
            }
        }
        self.daemon
            .shutdown()
            .map_err(|e| CoreError::Discovery(format!("daemon shutdown: {e}")))?;
        info!("mDNS advertiser shut down");
        Ok(())
    }
}

impl ServiceAdvertiser for MdnsAdvertiser {
    fn register(&self, printer: &Printer) -> Result<()> {
        let ty_domain = service_type(self.subtype.as_deref());
        let host = format!("{}.local.", self.hostname);

        let service_info = ServiceInfo::new(
            &ty_domain,
            printer.dns_sd_name(),
            &host,
            "",
            self.port,
            txt_properties(printer),
        )
        .map_err(|e| CoreError::Discovery(format!("ServiceInfo for {}: {e}", printer.name())))?
        .enable_addr_auto();

        let fullname = service_info.get_fullname().to_owned();
        self.daemon
            .register(service_info)
            .map_err(|e| CoreError::Discovery(format!("register {fullname}: {e}")))?;

        info!(
            service_type = %ty_domain,
            name = %printer.dns_sd_name(),
            port = self.port,
            "mDNS service registered"
        );
        self.registered
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .insert(printer.id(), fullname);
        Ok(())
    }

    fn unregister(&self, printer: &Printer) {
        let fullname = self
            .registered
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .remove(&printer.id());

        let Some(fullname) = fullname else {
            debug!(printer_id = %printer.id(), "printer was not advertised");
            return;
        };

        match self.daemon.unregister(&fullname) {
            Ok(_) => info!(name = %fullname, "mDNS service unregistered"),
            Err(e) => warn!(name = %fullname, error = %e, "failed to unregister mDNS service"),
        }
    }
}
