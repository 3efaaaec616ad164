// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// System-wide printer directory.
//
// Holds the only owning references to registered printers, allocates
// printer ids, tracks the default printer, and resolves request resource
// paths to printers.
//
// # Locking
//
// One reader-writer lock guards membership, `next_printer_id`, and
// `default_printer_id`.  Lookups take it shared; register and remove take it
// exclusive.  It is held only for the scan or the mutation, never while a
// collaborator runs and never while a printer lock is held.
//
// # Routing
//
// `find` returns the FIRST printer in name order whose resource matches, not
// the longest match.  This is sound only because resources are derived 1:1
// from unique printer names.

use std::sync::{Arc, PoisonError, RwLock, RwLockReadGuard, RwLockWriteGuard};

use tracing::{debug, info};

use pressroom_core::error::{CoreError, Result};
use pressroom_core::types::PrinterId;

use crate::identity::is_default_path;
use crate::printer::{NewPrinter, Printer};

#[derive(Debug)]
struct DirectoryInner {
    /// Registered printers, sorted by name.
    printers: Vec<Arc<Printer>>,
    /// `None` once every id up to `u32::MAX` has been handed out.
    next_printer_id: Option<u32>,
    default_printer_id: Option<PrinterId>,
}

/// Registry of every printer in one system.
#[derive(Debug)]
pub struct Directory {
    inner: RwLock<DirectoryInner>,
}

impl Default for Directory {
    fn default() -> Self {
        Self::new()
    }
}

impl Directory {
    /// Empty directory.  The first allocated printer id is 1.
    pub fn new() -> Self {
        Self {
            inner: RwLock::new(DirectoryInner {
                printers: Vec::new(),
                next_printer_id: Some(1),
                default_printer_id: None,
            }),
        }
    }

    fn read(&self) -> RwLockReadGuard<'_, DirectoryInner> {
        self.inner.read().unwrap_or_else(PoisonError::into_inner)
    }

    fn write(&self) -> RwLockWriteGuard<'_, DirectoryInner> {
        self.inner.write().unwrap_or_else(PoisonError::into_inner)
    }

    /// Give `printer` an id and add it to the directory.
    ///
    /// A nonzero `explicit_id` is used as-is; the caller guarantees it is
    /// unique.  Otherwise the next id is allocated.  The first printer
    /// registered becomes the default.
    ///
    /// Fails when the collection cannot grow or automatic ids have run out,
    /// in which case nothing is registered.
    pub fn register(&self, printer: NewPrinter, explicit_id: Option<PrinterId>) -> Result<Arc<Printer>> {
        let mut inner = self.write();

        inner
            .printers
            .try_reserve(1)
            .map_err(|e| CoreError::Allocation(format!("printer directory: {e}")))?;

        let id = match explicit_id.filter(|id| id.0 != 0) {
            Some(id) => {
                // Keep automatic ids clear of explicit ones.
                inner.next_printer_id = inner
                    .next_printer_id
                    .zip(id.0.checked_add(1))
                    .map(|(next, after)| next.max(after));
                id
            }
            None => {
                let next = inner
                    .next_printer_id
                    .ok_or_else(|| CoreError::Allocation("printer ids exhausted".into()))?;
                inner.next_printer_id = next.checked_add(1);
                PrinterId(next)
            }
        };

        let printer = Arc::new(Printer::from_new(id, printer));
        let at = inner
            .printers
            .partition_point(|p| p.name() <= printer.name());
        inner.printers.insert(at, Arc::clone(&printer));

        if inner.default_printer_id.is_none() {
            inner.default_printer_id = Some(id);
        }

        info!(
            printer_id = %id,
            name = %printer.name(),
            resource = %printer.resource(),
            "printer registered"
        );
        Ok(printer)
    }

    /// Resolve a request to a printer.
    ///
    /// The bare base path and numeric sub-paths (`/ipp/print/42`) resolve to
    /// the default printer.  Otherwise the first printer in name order whose
    /// resource matches `resource` on a segment boundary, or whose id equals
    /// `printer_id`, wins.
    pub fn find(&self, resource: Option<&str>, printer_id: Option<PrinterId>) -> Option<Arc<Printer>> {
        debug!(resource = ?resource, printer_id = ?printer_id, "find printer");

        let inner = self.read();

        let (resource, printer_id) = match resource {
            Some(path) if is_default_path(path) => {
                debug!(default_printer_id = ?inner.default_printer_id, "looking for default printer");
                (None, inner.default_printer_id)
            }
            _ => (resource, printer_id),
        };

        let found = inner
            .printers
            .iter()
            .find(|printer| {
                debug!(
                    name = %printer.name(),
                    resource = %printer.resource(),
                    printer_id = %printer.id(),
                    "find printer: candidate"
                );
                resource.is_some_and(|path| printer.matches_resource(path))
                    || printer_id.is_some_and(|id| printer.id() == id)
            })
            .cloned();
        drop(inner);

        debug!(found = ?found.as_ref().map(|p| p.name()), "find printer: result");
        found
    }

    /// Unlink `printer` from the directory and hand back the owning reference.
    ///
    /// Returns `None` when the printer is not registered.  If it was the
    /// default, the first remaining printer becomes the default.
    pub fn remove(&self, printer: &Printer) -> Option<Arc<Printer>> {
        let mut inner = self.write();

        let at = inner
            .printers
            .iter()
            .position(|p| std::ptr::eq(Arc::as_ptr(p), printer))?;
        let removed = inner.printers.remove(at);

        if inner.default_printer_id == Some(removed.id()) {
            inner.default_printer_id = inner.printers.first().map(|p| p.id());
        }

        info!(printer_id = %removed.id(), name = %removed.name(), "printer removed from directory");
        Some(removed)
    }

    /// Snapshot of every printer in directory (name) order.
    pub fn printers(&self) -> Vec<Arc<Printer>> {
        self.read().printers.clone()
    }

    pub fn len(&self) -> usize {
        self.read().printers.len()
    }

    pub fn is_empty(&self) -> bool {
        self.read().printers.is_empty()
    }

    pub fn default_printer_id(&self) -> Option<PrinterId> {
        self.read().default_printer_id
    }

    /// The id the next automatically numbered printer will receive, or
    /// `None` when automatic ids are exhausted.
    pub fn next_printer_id(&self) -> Option<PrinterId> {
        self.read().next_printer_id.map(PrinterId)
    }

    /// Make the printer with `id` the default.
    pub fn set_default_printer(&self, id: PrinterId) -> Result<()> {
        let mut inner = self.write();
        if !inner.printers.iter().any(|p| p.id() == id) {
            return Err(CoreError::PrinterNotFound(format!("printer-id {id}")));
        }
        inner.default_printer_id = Some(id);
        info!(printer_id = %id, "default printer changed");
        Ok(())
    }
}
