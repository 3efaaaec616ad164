// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Printer object.
//
// Identity fields (id, name, resource, UUID, driver, device URI, formats) are
// fixed at registration and read without locking.  Everything that changes
// afterwards (state, timestamps, attribute set, job taxonomy) sits behind the
// printer's own reader-writer lock.

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{PoisonError, RwLock, RwLockReadGuard, RwLockWriteGuard};

use chrono::{DateTime, Utc};
use tracing::{debug, info};

use pressroom_core::error::{CoreError, Result};
use pressroom_core::types::{JobId, PrinterId, PrinterState, WhichJobs};

use crate::catalog::AttributeSet;
use crate::identity::SystemIdentity;
use crate::jobs::{Job, JobRequest, JobTaxonomy};

/// A fully prepared printer that has not been given an id yet.
///
/// Built by the lifecycle and turned into a [`Printer`] by the directory
/// while it holds its write lock.
#[derive(Debug)]
pub struct NewPrinter {
    pub name: String,
    pub resource: String,
    pub uuid: String,
    pub device_uri: String,
    pub driver_name: String,
    pub document_formats: Vec<String>,
    pub max_job_kilobytes: i32,
    pub attributes: AttributeSet,
}

/// Mutable printer state guarded by the printer lock.
#[derive(Debug)]
struct PrinterInner {
    state: PrinterState,
    state_reasons: Vec<String>,
    state_time: DateTime<Utc>,
    config_time: DateTime<Utc>,
    attributes: AttributeSet,
    jobs: JobTaxonomy,
}

/// One addressable printer endpoint.
#[derive(Debug)]
pub struct Printer {
    id: PrinterId,
    name: String,
    dns_sd_name: String,
    resource: String,
    resource_len: usize,
    uuid: String,
    device_uri: String,
    driver_name: String,
    document_formats: Vec<String>,
    max_job_kilobytes: i32,
    start_time: DateTime<Utc>,
    retired: AtomicBool,
    inner: RwLock<PrinterInner>,
}

impl Printer {
    /// Assemble the printer.  Only the directory calls this, with the id it
    /// allocated under its write lock.
    pub(crate) fn from_new(id: PrinterId, new: NewPrinter) -> Self {
        let now = Utc::now();
        let resource_len = new.resource.len();
        Self {
            id,
            dns_sd_name: new.name.clone(),
            name: new.name,
            resource: new.resource,
            resource_len,
            uuid: new.uuid,
            device_uri: new.device_uri,
            driver_name: new.driver_name,
            document_formats: new.document_formats,
            max_job_kilobytes: new.max_job_kilobytes,
            start_time: now,
            retired: AtomicBool::new(false),
            inner: RwLock::new(PrinterInner {
                state: PrinterState::Idle,
                state_reasons: Vec::new(),
                state_time: now,
                config_time: now,
                attributes: new.attributes,
                jobs: JobTaxonomy::new(),
            }),
        }
    }

    fn read(&self) -> RwLockReadGuard<'_, PrinterInner> {
        self.inner.read().unwrap_or_else(PoisonError::into_inner)
    }

    fn write(&self) -> RwLockWriteGuard<'_, PrinterInner> {
        self.inner.write().unwrap_or_else(PoisonError::into_inner)
    }

    // -- identity ------------------------------------------------------------

    pub fn id(&self) -> PrinterId {
        self.id
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    /// Instance name used for DNS-SD advertisement.
    pub fn dns_sd_name(&self) -> &str {
        &self.dns_sd_name
    }

    pub fn resource(&self) -> &str {
        &self.resource
    }

    pub fn resource_len(&self) -> usize {
        self.resource_len
    }

    /// `printer-uuid` as a `urn:uuid:` URI.
    pub fn uuid(&self) -> &str {
        &self.uuid
    }

    pub fn device_uri(&self) -> &str {
        &self.device_uri
    }

    pub fn driver_name(&self) -> &str {
        &self.driver_name
    }

    /// `document-format-supported`.
    pub fn document_formats(&self) -> &[String] {
        &self.document_formats
    }

    /// Upper bound of `job-k-octets-supported`.
    pub fn max_job_kilobytes(&self) -> i32 {
        self.max_job_kilobytes
    }

    pub fn start_time(&self) -> DateTime<Utc> {
        self.start_time
    }

    /// Whether `path` addresses this printer or something beneath it.
    ///
    /// The resource must be a prefix of `path` ending on a segment boundary,
    /// so `/ipp/print/Foo` never matches a printer named `Foo2`.
    pub fn matches_resource(&self, path: &str) -> bool {
        path.starts_with(self.resource.as_str())
            && matches!(path.as_bytes().get(self.resource_len), None | Some(b'/'))
    }

    // -- state ---------------------------------------------------------------

    pub fn state(&self) -> PrinterState {
        self.read().state
    }

    pub fn state_reasons(&self) -> Vec<String> {
        self.read().state_reasons.clone()
    }

    pub fn state_time(&self) -> DateTime<Utc> {
        self.read().state_time
    }

    pub fn config_time(&self) -> DateTime<Utc> {
        self.read().config_time
    }

    /// Record a new state reported by the job processor or device layer.
    pub fn set_state(&self, state: PrinterState, reasons: Vec<String>) {
        let mut inner = self.write();
        inner.state = state;
        inner.state_reasons = reasons;
        inner.state_time = Utc::now();
        debug!(printer_id = %self.id, state = ?state, "printer state changed");
    }

    // -- attributes ----------------------------------------------------------

    /// Run `f` against the printer's attribute set under the read lock.
    pub fn with_attributes<R>(&self, f: impl FnOnce(&AttributeSet) -> R) -> R {
        f(&self.read().attributes)
    }

    /// Replace the attribute set and bump the config time.
    pub fn replace_attributes(&self, attributes: AttributeSet) {
        let mut inner = self.write();
        inner.attributes = attributes;
        inner.config_time = Utc::now();
    }

    // -- jobs ----------------------------------------------------------------

    /// Add a job to this printer's taxonomy and return its id.
    ///
    /// Fails with `PrinterNotFound` once the printer has been destroyed.
    pub fn submit_job(&self, request: JobRequest, identity: &SystemIdentity, nonce: u32) -> Result<JobId> {
        let mut inner = self.write();
        self.ensure_live()?;
        let id = inner
            .jobs
            .insert(request, |id| identity.job_uuid(&self.name, id, nonce));
        drop(inner);
        info!(printer_id = %self.id, job_id = %id, "job submitted");
        Ok(id)
    }

    /// Move an active job to the completed view.
    pub fn complete_job(&self, id: JobId) -> Result<()> {
        let mut inner = self.write();
        self.ensure_live()?;
        inner.jobs.complete(id)
    }

    /// Checked under the printer write lock, which `retire` also takes.
    fn ensure_live(&self) -> Result<()> {
        if self.is_retired() {
            return Err(CoreError::PrinterNotFound(format!(
                "{} (printer-id {}) has been destroyed",
                self.name, self.id
            )));
        }
        Ok(())
    }

    pub fn job(&self, id: JobId) -> Option<Job> {
        self.read().jobs.get(id).cloned()
    }

    /// Snapshot of the jobs matching `which`, newest first.
    pub fn jobs(&self, which: WhichJobs) -> Vec<Job> {
        self.read().jobs.select(which).into_iter().cloned().collect()
    }

    /// Run `f` against the job taxonomy under the read lock.
    pub fn with_jobs<R>(&self, f: impl FnOnce(&JobTaxonomy) -> R) -> R {
        f(&self.read().jobs)
    }

    // -- teardown ------------------------------------------------------------

    /// Whether [`retire`](Self::retire) has run.
    pub fn is_retired(&self) -> bool {
        self.retired.load(Ordering::Acquire)
    }

    /// Release the attribute set and job taxonomy.
    ///
    /// Runs at most once; later calls return `false`.  Handles still held by
    /// in-flight requests stay valid but see an empty printer that refuses
    /// new jobs.  `state` is left as last reported.
    pub(crate) fn retire(&self) -> bool {
        let mut inner = self.write();
        if self.retired.swap(true, Ordering::AcqRel) {
            return false;
        }
        let released_jobs = inner.jobs.len();
        inner.jobs.clear();
        inner.attributes = AttributeSet::new();
        debug!(printer_id = %self.id, released_jobs, "printer resources released");
        true
    }
}
