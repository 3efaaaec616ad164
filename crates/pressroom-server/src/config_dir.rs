// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Configuration file location.

use std::path::{Path, PathBuf};

const CONFIG_FILE: &str = "config.json";

/// Where the system configuration lives when no path is given.
pub fn default_config_path() -> PathBuf {
    config_base(
        std::env::var_os("XDG_CONFIG_HOME").map(PathBuf::from),
        std::env::var_os("HOME").map(PathBuf::from),
    )
    .join("pressroom")
    .join(CONFIG_FILE)
}

fn config_base(xdg: Option<PathBuf>, home: Option<PathBuf>) -> PathBuf {
    // Try XDG config dir, then fall back to home
    if let Some(xdg) = xdg.filter(|p| !p.as_os_str().is_empty()) {
        return xdg;
    }
    if let Some(home) = home {
        return home.join(".config");
    }
    PathBuf::from("/etc")
}

/// Create the spool directory if it does not exist yet.
pub fn ensure_spool_dir(dir: &Path) -> std::io::Result<()> {
    std::fs::create_dir_all(dir)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn xdg_wins_over_home() {
        let base = config_base(Some("/xdg".into()), Some("/home/op".into()));
        assert_eq!(base, PathBuf::from("/xdg"));
    }

    #[test]
    fn empty_xdg_is_ignored() {
        let base = config_base(Some(PathBuf::new()), Some("/home/op".into()));
        assert_eq!(base, PathBuf::from("/home/op/.config"));
    }

    #[test]
    fn last_resort_is_etc() {
        assert_eq!(config_base(None, None), PathBuf::from("/etc"));
    }

    #[test]
    fn spool_dir_is_created() {
        let dir = tempfile::tempdir().unwrap();
        let spool = dir.path().join("spool").join("pressroom");
        ensure_spool_dir(&spool).unwrap();
        assert!(spool.is_dir());
    }
}
