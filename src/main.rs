//! RapooLinux - Rapoo side-button daemon
//!
//! Reads raw side-button reports from the Rapoo 2.4G wireless dongle's
//! hidraw nodes and injects Back/Forward (or Alt+Arrow) key events through
//! a uinput virtual keyboard, without requiring kernel drivers.

mod device;
mod emit;
mod error;
mod hidpoll;
mod report;
mod settings;

use anyhow::{Context, Result};
use error::StartupError;
use settings::Settings;
use tracing::info;

fn main() -> Result<()> {
    // Initialize logging
    tracing_subscriber::fmt::init();

    let settings = Settings::from_env();
    info!("rapoolinux starting...");

    // The poll loop has no internal exit path; interruption is the one
    // clean way out.
    ctrlc::set_handler(|| {
        info!("Interrupted, exiting");
        std::process::exit(0);
    })
    .context("Failed to install signal handler")?;

    let candidates = device::discover_candidates();
    if candidates.is_empty() {
        return Err(StartupError::NoCandidates.into());
    }

    info!("Candidates:");
    for cand in &candidates {
        info!(
            " - {:?}  name='{}'  HID_ID='{}'",
            cand.devnode, cand.name, cand.hid_id
        );
    }

    let handles = hidpoll::open_candidates(&candidates);
    if handles.is_empty() {
        return Err(StartupError::NoDevicesOpened.into());
    }

    info!(
        "Mode: {}  (set {}=altarrow if needed)",
        settings.mode.label(),
        settings::MODE_ENV
    );
    let mut emitter = emit::KeyEmitter::new(settings.mode)?;

    hidpoll::run_poll_loop(handles, &mut emitter, &settings)
}
