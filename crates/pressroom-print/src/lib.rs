// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Pressroom Print: the printer directory, printer lifecycle, and per-printer
// job taxonomy of a multi-printer IPP system, plus the collaborators that the
// lifecycle consults (attribute catalog, driver resolver, DNS-SD advertiser,
// spool capacity probe, entropy selector).

pub mod catalog;
pub mod directory;
pub mod discovery;
pub mod driver;
pub mod entropy;
pub mod identity;
pub mod jobs;
pub mod lifecycle;
pub mod printer;
pub mod spool;
pub mod system;

pub use catalog::{AttributeCatalog, AttributeSet, AttributeValue, StandardCatalog};
pub use directory::Directory;
pub use discovery::{MdnsAdvertiser, ServiceAdvertiser};
pub use driver::{DriverData, DriverResolver, PwgDriverResolver};
pub use entropy::{EntropySelector, get_random32};
pub use identity::SystemIdentity;
pub use jobs::{Job, JobRequest, JobTaxonomy};
pub use printer::Printer;
pub use spool::{CapacityProbe, StatvfsProbe};
pub use system::{Collaborators, System};
