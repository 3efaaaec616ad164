// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Spool filesystem capacity probing.
//
// The size of the filesystem holding the spool directory bounds the largest
// job a printer accepts (`job-k-octets-supported`).  Probe failures and
// filesystems larger than `i32::MAX` KiB both report `i32::MAX`.

use std::io;
use std::path::Path;

/// Size report for a filesystem.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SpoolCapacity {
    /// Size of one block in bytes.
    pub block_size: u64,
    /// Total number of blocks.
    pub block_count: u64,
}

impl SpoolCapacity {
    /// Total size in whole KiB, clamped to `i32::MAX`.
    pub fn kilobytes(&self) -> i32 {
        let kib = u128::from(self.block_size) * u128::from(self.block_count) / 1024;
        i32::try_from(kib).unwrap_or(i32::MAX)
    }
}

/// Source of filesystem size reports.
pub trait CapacityProbe: Send + Sync {
    /// Report the size of the filesystem containing `dir`.
    fn probe(&self, dir: &Path) -> io::Result<SpoolCapacity>;
}

/// Probe backed by `statvfs(3)`.
#[derive(Debug, Clone, Copy, Default)]
pub struct StatvfsProbe;

impl CapacityProbe for StatvfsProbe {
    #[cfg(unix)]
    fn probe(&self, dir: &Path) -> io::Result<SpoolCapacity> {
        let stat = nix::sys::statvfs::statvfs(dir)?;
        // f_blocks is counted in fragment-size units.
        Ok(SpoolCapacity {
            block_size: stat.fragment_size() as u64,
            block_count: stat.blocks() as u64,
        })
    }

    #[cfg(not(unix))]
    fn probe(&self, _dir: &Path) -> io::Result<SpoolCapacity> {
        Err(io::Error::new(
            io::ErrorKind::Unsupported,
            "statvfs is not available on this platform",
        ))
    }
}

/// Largest job size in KiB for a probe result.
pub fn max_job_kilobytes(report: io::Result<SpoolCapacity>) -> i32 {
    match report {
        Ok(capacity) => capacity.kilobytes(),
        Err(_) => i32::MAX,
    }
}
