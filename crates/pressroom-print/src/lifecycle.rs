// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Printer lifecycle: creation and two-phase destruction.
//
// Creation prepares everything a printer needs (resource, UUID, spool bound,
// document formats, attribute catalog) without holding any lock, registers it
// under the directory's write lock, and only then advertises it.
//
// Destruction is two-phase and the order matters:
//
//   1. unlink from the directory under its write lock, after which no new
//      lookup can return the printer;
//   2. with no directory lock held, withdraw the DNS-SD advertisement, then
//      release the attribute set and job taxonomy, then drop the owning
//      reference.
//
// Phase 2 runs only if phase 1 actually unlinked the printer, so it runs
// exactly once per printer.

use std::sync::Arc;

use tracing::{debug, error, info, warn};

use pressroom_core::error::{CoreError, Result};
use pressroom_core::types::PrinterId;

use crate::catalog::CatalogRequest;
use crate::driver::DriverData;
use crate::identity::resource_path;
use crate::printer::{NewPrinter, Printer};
use crate::spool::max_job_kilobytes;
use crate::system::System;

/// Formats every printer accepts regardless of driver.
const OCTET_STREAM: &str = "application/octet-stream";

/// Build `document-format-supported`: the generic formats, the driver's
/// native format when it differs from octet-stream, and the image formats
/// compiled in.
pub fn supported_formats(native_format: Option<&str>) -> Vec<String> {
    let mut formats = vec![OCTET_STREAM.to_string()];

    if let Some(native) = native_format.filter(|f| *f != OCTET_STREAM) {
        formats.push(native.to_string());
    }
    #[cfg(feature = "jpeg")]
    formats.push("image/jpeg".into());
    #[cfg(feature = "png")]
    formats.push("image/png".into());
    for always in ["image/pwg-raster", "image/urf"] {
        if !formats.iter().any(|f| f == always) {
            formats.push(always.into());
        }
    }

    formats
}

impl System {
    /// Create a printer and add it to the system.
    ///
    /// The only hard failures come from the directory: no memory for the
    /// entry, or no automatic printer id left.  Driver, spool, and
    /// advertisement problems are logged and the printer is created anyway.
    pub fn create_printer(
        &self,
        name: &str,
        driver_name: &str,
        device_uri: &str,
        explicit_id: Option<PrinterId>,
    ) -> Result<Arc<Printer>> {
        let resource = resource_path(name);
        let uuid = self.identity.printer_uuid(name);

        let capacity = self.collaborators.capacity.probe(&self.config.spool_dir);
        if let Err(e) = &capacity {
            debug!(
                spool_dir = %self.config.spool_dir.display(),
                error = %e,
                "spool capacity probe failed, job size is unbounded"
            );
        }
        let max_job_kilobytes = max_job_kilobytes(capacity);

        let driver: Option<DriverData> = match self.collaborators.driver.resolve(driver_name, device_uri) {
            Ok(data) => Some(data),
            Err(e) => {
                warn!(printer_name = name, driver_name, error = %e, "driver not resolved, using generic formats");
                None
            }
        };
        let document_formats =
            supported_formats(driver.as_ref().and_then(|d| d.native_format.as_deref()));

        let attributes = self.collaborators.catalog.build(&CatalogRequest {
            name,
            uuid: &uuid,
            resource: &resource,
            driver_name,
            device_uri,
            driver: driver.as_ref(),
            document_formats: &document_formats,
            max_job_kilobytes,
        });

        let new = NewPrinter {
            name: name.to_string(),
            resource,
            uuid,
            device_uri: device_uri.to_string(),
            driver_name: driver_name.to_string(),
            document_formats,
            max_job_kilobytes,
            attributes,
        };

        let printer = self.directory.register(new, explicit_id).map_err(|e| {
            error!(printer_name = name, error = %e, "unable to register printer");
            e
        })?;

        if self.config.advertises() {
            if let Some(advertiser) = &self.collaborators.advertiser {
                if let Err(e) = advertiser.register(&printer) {
                    warn!(printer_id = %printer.id(), error = %e, "DNS-SD registration failed");
                }
            }
        }

        info!(
            printer_id = %printer.id(),
            printer_name = name,
            resource = %printer.resource(),
            uuid = %printer.uuid(),
            "printer created"
        );
        Ok(printer)
    }

    /// Create every printer listed in the configuration.
    ///
    /// Returns the printers that were created; failures are logged.
    pub fn create_configured_printers(&self) -> Vec<Arc<Printer>> {
        self.config
            .printers
            .iter()
            .filter_map(|cfg| {
                self.create_printer(
                    &cfg.name,
                    &cfg.driver,
                    &cfg.device_uri,
                    cfg.printer_id.map(PrinterId),
                )
                .ok()
            })
            .collect()
    }

    /// Remove a printer from the system and tear it down.
    ///
    /// Fails with `PrinterNotFound` if the printer is not registered, for
    /// example because it was already destroyed.
    pub fn destroy_printer(&self, printer: &Printer) -> Result<()> {
        // Phase 1: unlink under the directory write lock (released on return).
        let owned = self.directory.remove(printer).ok_or_else(|| {
            CoreError::PrinterNotFound(format!("{} (printer-id {})", printer.name(), printer.id()))
        })?;

        // Phase 2: no directory lock held.
        if let Some(advertiser) = &self.collaborators.advertiser {
            advertiser.unregister(&owned);
        }
        owned.retire();

        info!(printer_id = %owned.id(), name = %owned.name(), "printer destroyed");
        drop(owned);
        Ok(())
    }

    /// Destroy every printer.  Called once when the process shuts down.
    pub fn shutdown(&self) {
        let printers = self.directory.printers();
        info!(printers = printers.len(), "shutting down system");
        for printer in printers {
            if let Err(e) = self.destroy_printer(&printer) {
                // Another thread destroyed it first.
                debug!(error = %e, "printer already gone during shutdown");
            }
        }
    }
}
