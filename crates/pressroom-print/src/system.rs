// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// The system object: one per process, constructed at start-up and shut down
// explicitly.  It owns the printer directory, the host identity, the entropy
// selector, and the collaborators the printer lifecycle consults.

use std::sync::Arc;

use tracing::info;

use pressroom_core::config::SystemConfig;
use pressroom_core::error::Result;
use pressroom_core::types::{JobId, PrinterId};

use crate::catalog::{AttributeCatalog, StandardCatalog};
use crate::directory::Directory;
use crate::discovery::ServiceAdvertiser;
use crate::driver::{DriverResolver, PwgDriverResolver};
use crate::entropy::EntropySelector;
use crate::identity::SystemIdentity;
use crate::jobs::JobRequest;
use crate::printer::Printer;
use crate::spool::{CapacityProbe, StatvfsProbe};

/// External collaborators consulted while creating and destroying printers.
#[derive(Clone)]
pub struct Collaborators {
    pub catalog: Arc<dyn AttributeCatalog>,
    pub driver: Arc<dyn DriverResolver>,
    /// DNS-SD advertiser, if one could be started.
    pub advertiser: Option<Arc<dyn ServiceAdvertiser>>,
    pub capacity: Arc<dyn CapacityProbe>,
}

impl Default for Collaborators {
    fn default() -> Self {
        Self {
            catalog: Arc::new(StandardCatalog),
            driver: Arc::new(PwgDriverResolver),
            advertiser: None,
            capacity: Arc::new(StatvfsProbe),
        }
    }
}

impl std::fmt::Debug for Collaborators {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Collaborators")
            .field("advertiser", &self.advertiser.is_some())
            .finish_non_exhaustive()
    }
}

/// A multi-printer IPP system.
#[derive(Debug)]
pub struct System {
    pub(crate) config: SystemConfig,
    pub(crate) identity: SystemIdentity,
    pub(crate) directory: Directory,
    pub(crate) entropy: EntropySelector,
    pub(crate) collaborators: Collaborators,
}

impl System {
    pub fn new(config: SystemConfig, collaborators: Collaborators) -> Self {
        let identity = SystemIdentity::new(config.hostname.clone(), config.port);
        info!(
            hostname = %identity.hostname(),
            port = identity.port(),
            spool_dir = %config.spool_dir.display(),
            "system created"
        );
        Self {
            config,
            identity,
            directory: Directory::new(),
            entropy: EntropySelector::probe(),
            collaborators,
        }
    }

    pub fn config(&self) -> &SystemConfig {
        &self.config
    }

    pub fn identity(&self) -> &SystemIdentity {
        &self.identity
    }

    pub fn directory(&self) -> &Directory {
        &self.directory
    }

    /// Resolve a request's resource path and/or printer id.
    pub fn find_printer(&self, resource: Option<&str>, printer_id: Option<PrinterId>) -> Option<Arc<Printer>> {
        self.directory.find(resource, printer_id)
    }

    pub fn default_printer(&self) -> Option<Arc<Printer>> {
        let id = self.directory.default_printer_id()?;
        self.directory.find(None, Some(id))
    }

    /// Best-effort 32-bit random value.
    pub fn random32(&self) -> u32 {
        self.entropy.next_u32()
    }

    /// Submit a job to `printer`, deriving its `job-uuid` from a fresh nonce.
    ///
    /// Fails with `PrinterNotFound` if the printer was destroyed after the
    /// caller looked it up.
    pub fn submit_job(&self, printer: &Printer, request: JobRequest) -> Result<JobId> {
        let nonce = self.random32();
        printer.submit_job(request, &self.identity, nonce)
    }
}
