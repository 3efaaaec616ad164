// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Best-effort 32-bit random numbers for identifiers and nonces.
//
// Sources are tried in priority order:
//
//   1. the platform CSPRNG (`arc4random` on Apple and the BSDs)
//   2. the kernel `getrandom` call, accepted only for a full 4-byte read
//   3. `ring`'s `SystemRandom`
//   4. a `StdRng` seeded once per process from the wall clock
//
// The selector probes the chain once and remembers the first source that
// answered.  Per-call failures fall through to the next source, and the
// seeded fallback always answers, so `next_u32` cannot fail.  The fallback is
// NOT cryptographically strong.

use std::sync::{Mutex, OnceLock, PoisonError};
use std::time::{SystemTime, UNIX_EPOCH};

use rand::rngs::StdRng;
use rand::{RngCore, SeedableRng};
use ring::rand::{SecureRandom, SystemRandom};
use tracing::{debug, info};

/// One of the random number sources known to the selector.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EntropySource {
    /// `arc4random(3)`.
    PlatformCsprng,
    /// `getrandom(2)` without blocking.
    KernelGetrandom,
    /// `ring::rand::SystemRandom`.
    Ring,
    /// Time-seeded `StdRng`.
    SeededFallback,
}

impl EntropySource {
    /// Every source, highest priority first.
    pub const PRIORITY: [EntropySource; 4] = [
        Self::PlatformCsprng,
        Self::KernelGetrandom,
        Self::Ring,
        Self::SeededFallback,
    ];

    /// Whether values from this source are suitable for cryptographic use.
    pub fn is_cryptographic(&self) -> bool {
        !matches!(self, Self::SeededFallback)
    }

    /// Read one value, or `None` when the source is unavailable on this host
    /// or failed this time.
    fn read(&self) -> Option<u32> {
        match self {
            Self::PlatformCsprng => platform_csprng(),
            Self::KernelGetrandom => kernel_getrandom(),
            Self::Ring => ring_random(),
            Self::SeededFallback => Some(seeded_fallback()),
        }
    }
}

/// Runtime-selected random number source with a fallback chain.
#[derive(Debug, Clone)]
pub struct EntropySelector {
    /// Selected source followed by every lower-priority candidate.
    chain: Vec<EntropySource>,
}

impl EntropySelector {
    /// Probe every known source in priority order.
    pub fn probe() -> Self {
        Self::probe_from(&EntropySource::PRIORITY)
    }

    /// Probe the given candidates in order and keep the first one that
    /// answers.  The seeded fallback is always appended to the chain.
    pub fn probe_from(candidates: &[EntropySource]) -> Self {
        let start = candidates
            .iter()
            .position(|source| source.read().is_some())
            .unwrap_or(candidates.len());

        let mut chain: Vec<EntropySource> = candidates[start..].to_vec();
        if chain.last() != Some(&EntropySource::SeededFallback) {
            chain.retain(|source| *source != EntropySource::SeededFallback);
            chain.push(EntropySource::SeededFallback);
        }

        let selector = Self { chain };
        info!(
            source = ?selector.source(),
            cryptographic = selector.source().is_cryptographic(),
            "entropy source selected"
        );
        selector
    }

    /// The source that answered the start-up probe.
    pub fn source(&self) -> EntropySource {
        self.chain[0]
    }

    /// Return a random 32-bit value.  Never fails.
    pub fn next_u32(&self) -> u32 {
        for source in &self.chain {
            if let Some(value) = source.read() {
                return value;
            }
            debug!(source = ?source, "entropy source failed, falling back");
        }
        seeded_fallback()
    }
}

impl Default for EntropySelector {
    fn default() -> Self {
        Self::probe()
    }
}

/// Return the best 32-bit random number available to this process.
///
/// Uses a process-wide selector probed on first call.
pub fn get_random32() -> u32 {
    static SELECTOR: OnceLock<EntropySelector> = OnceLock::new();
    SELECTOR.get_or_init(EntropySelector::probe).next_u32()
}

// ---------------------------------------------------------------------------
// Sources
// ---------------------------------------------------------------------------

#[cfg(any(
    target_os = "macos",
    target_os = "ios",
    target_os = "freebsd",
    target_os = "openbsd",
    target_os = "netbsd"
))]
fn platform_csprng() -> Option<u32> {
    // SAFETY: arc4random takes no arguments and cannot fail.
    Some(unsafe { libc::arc4random() })
}

#[cfg(not(any(
    target_os = "macos",
    target_os = "ios",
    target_os = "freebsd",
    target_os = "openbsd",
    target_os = "netbsd"
)))]
fn platform_csprng() -> Option<u32> {
    None
}

#[cfg(any(target_os = "linux", target_os = "android"))]
fn kernel_getrandom() -> Option<u32> {
    let mut buf = [0u8; 4];
    // SAFETY: `buf` is valid for writes of `buf.len()` bytes.
    let read = unsafe { libc::getrandom(buf.as_mut_ptr().cast(), buf.len(), libc::GRND_NONBLOCK) };
    (read == buf.len() as isize).then(|| u32::from_ne_bytes(buf))
}

#[cfg(not(any(target_os = "linux", target_os = "android")))]
fn kernel_getrandom() -> Option<u32> {
    None
}

fn ring_random() -> Option<u32> {
    let mut buf = [0u8; 4];
    SystemRandom::new().fill(&mut buf).ok()?;
    Some(u32::from_ne_bytes(buf))
}

fn seeded_fallback() -> u32 {
    static FALLBACK: OnceLock<Mutex<StdRng>> = OnceLock::new();

    let rng = FALLBACK.get_or_init(|| {
        let seed = SystemTime::now()
            .duration_since(UNIX_EPOCH)
            .map(|elapsed| elapsed.as_secs())
            .unwrap_or_default();
        debug!(seed, "seeding fallback random number generator");
        Mutex::new(StdRng::seed_from_u64(seed))
    });

    rng.lock().unwrap_or_else(PoisonError::into_inner).next_u32()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn probe_never_selects_fallback_when_ring_is_available() {
        let selector = EntropySelector::probe();
        assert!(selector.source().is_cryptographic());
        assert_eq!(selector.chain.last(), Some(&EntropySource::SeededFallback));
    }

    #[test]
    fn fallback_only_chain_still_answers() {
        let selector = EntropySelector::probe_from(&[EntropySource::SeededFallback]);
        assert_eq!(selector.source(), EntropySource::SeededFallback);
        assert!(!selector.source().is_cryptographic());

        let values: Vec<u32> = (0..16).map(|_| selector.next_u32()).collect();
        assert!(values.windows(2).any(|pair| pair[0] != pair[1]));
    }

    #[test]
    fn empty_candidate_list_falls_back() {
        let selector = EntropySelector::probe_from(&[]);
        assert_eq!(selector.source(), EntropySource::SeededFallback);
    }

    #[test]
    fn ring_candidate_is_selected_when_listed_first() {
        let selector = EntropySelector::probe_from(&[EntropySource::Ring, EntropySource::SeededFallback]);
        assert_eq!(selector.source(), EntropySource::Ring);
        assert_eq!(selector.chain.len(), 2);
    }

    #[cfg(any(target_os = "linux", target_os = "android"))]
    #[test]
    fn arc4random_is_skipped_on_linux() {
        let selector = EntropySelector::probe();
        assert_eq!(selector.source(), EntropySource::KernelGetrandom);
    }

    #[test]
    fn ten_thousand_calls_cover_the_full_width() {
        let mut high_bit_seen = false;
        let mut low_bit_seen = false;
        for _ in 0..10_000 {
            let value = get_random32();
            high_bit_seen |= value & 0x8000_0000 != 0;
            low_bit_seen |= value & 1 != 0;
        }
        assert!(high_bit_seen, "values should use the top bit");
        assert!(low_bit_seen, "values should use the bottom bit");
    }
}
