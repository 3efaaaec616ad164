// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Pressroom: multi-printer IPP system daemon.
//
// Entry point. Initialises logging, loads the system configuration, creates
// the configured printers, and tears everything down on Ctrl-C.
//
// Usage: pressroom [CONFIG.json]

mod config_dir;

use std::path::{Path, PathBuf};
use std::sync::Arc;

use tracing::{error, info, warn};

use pressroom_core::config::SystemConfig;
use pressroom_print::{Collaborators, MdnsAdvertiser, ServiceAdvertiser, System};

/// Read the configuration, falling back to defaults when the file is absent
/// or unreadable.
fn load_config(path: &Path) -> SystemConfig {
    match SystemConfig::load(path) {
        Ok(config) => {
            info!(path = %path.display(), "configuration loaded");
            config
        }
        Err(e) => {
            warn!(path = %path.display(), error = %e, "using default configuration");
            SystemConfig::default()
        }
    }
}

/// Start the DNS-SD advertiser when subtypes are configured.
fn start_advertiser(config: &SystemConfig) -> Option<Arc<MdnsAdvertiser>> {
    if !config.advertises() {
        return None;
    }
    match MdnsAdvertiser::new(&config.hostname, config.port, &config.dns_sd_subtypes) {
        Ok(advertiser) => Some(Arc::new(advertiser)),
        Err(e) => {
            warn!(error = %e, "DNS-SD unavailable, printers will not be advertised");
            None
        }
    }
}

#[tokio::main]
async fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info")),
        )
        .init();

    info!("Pressroom starting");

    let config_path = std::env::args_os()
        .nth(1)
        .map(PathBuf::from)
        .unwrap_or_else(config_dir::default_config_path);
    let config = load_config(&config_path);

    if let Err(e) = config_dir::ensure_spool_dir(&config.spool_dir) {
        warn!(spool_dir = %config.spool_dir.display(), error = %e, "unable to create spool directory");
    }

    let advertiser = start_advertiser(&config);
    let collaborators = Collaborators {
        advertiser: advertiser
            .clone()
            .map(|a| a as Arc<dyn ServiceAdvertiser>),
        ..Collaborators::default()
    };

    let system = System::new(config, collaborators);
    let printers = system.create_configured_printers();
    info!(
        printers = printers.len(),
        default_printer_id = ?system.directory().default_printer_id(),
        "system ready"
    );
    drop(printers);

    if let Err(e) = tokio::signal::ctrl_c().await {
        error!(error = %e, "unable to listen for shutdown signal");
    }

    system.shutdown();
    drop(system);

    if let Some(advertiser) = advertiser.and_then(Arc::into_inner) {
        if let Err(e) = advertiser.shutdown() {
            warn!(error = %e, "DNS-SD shutdown failed");
        }
    }

    info!("Pressroom stopped");
}
