//! hidraw polling
//!
//! All matched hidraw nodes are opened non-blocking and swept in a single
//! thread, one short read per handle per iteration. Reads that would block
//! are the normal idle case; any other read failure retires that handle
//! for good. An iteration that saw no data at all sleeps a few
//! milliseconds to keep the idle loop off the CPU.

use crate::device::Candidate;
use crate::emit::KeyEmitter;
use crate::report::{self, ButtonState};
use crate::settings::Settings;
use anyhow::{Context, Result};
use std::fs::File;
use std::io::Read;
use std::os::unix::io::AsRawFd;
use std::path::{Path, PathBuf};
use std::thread;
use std::time::Duration;
use tracing::{info, warn};

/// HID reports are at most 64 bytes on this device.
const READ_BUF_LEN: usize = 64;

/// Pause after an iteration that read nothing.
const IDLE_SLEEP: Duration = Duration::from_millis(3);

/// An open hidraw node. Dropping it closes the descriptor.
pub struct PollHandle {
    pub path: PathBuf,
    file: File,
}

fn set_nonblocking(file: &File) -> Result<()> {
    let fd = file.as_raw_fd();
    let flags = unsafe { libc::fcntl(fd, libc::F_GETFL) };
    if flags < 0 {
        return Err(std::io::Error::last_os_error()).context("fcntl(F_GETFL) failed");
    }
    let rc = unsafe { libc::fcntl(fd, libc::F_SETFL, flags | libc::O_NONBLOCK) };
    if rc < 0 {
        return Err(std::io::Error::last_os_error()).context("fcntl(F_SETFL) failed");
    }
    Ok(())
}

/// Open every candidate node read-only and non-blocking.
///
/// Per-node failures (permissions, races with unplug) are logged and
/// skipped; the caller decides whether an empty result is fatal.
pub fn open_candidates(candidates: &[Candidate]) -> Vec<PollHandle> {
    let mut handles = Vec::new();

    for cand in candidates {
        match File::open(&cand.devnode) {
            Ok(file) => {
                if let Err(e) = set_nonblocking(&file) {
                    warn!("Failed to set {:?} non-blocking: {:#}", cand.devnode, e);
                    continue;
                }
                info!("Opened {:?}", cand.devnode);
                handles.push(PollHandle {
                    path: cand.devnode.clone(),
                    file,
                });
            }
            Err(e) => warn!("Failed to open {:?}: {}", cand.devnode, e),
        }
    }

    handles
}

enum ReadOutcome {
    /// A report of this many bytes landed in the buffer.
    Data(usize),
    /// Nothing waiting right now (would block, or a zero-length read).
    Empty,
    /// The node is gone; close and forget it.
    Dead,
}

fn read_report(handle: &mut PollHandle, buf: &mut [u8]) -> ReadOutcome {
    match handle.file.read(buf) {
        Ok(0) => ReadOutcome::Empty,
        Ok(len) => ReadOutcome::Data(len),
        Err(ref e) if e.kind() == std::io::ErrorKind::WouldBlock => ReadOutcome::Empty,
        Err(e) => {
            warn!("Read error on {:?}: {}", handle.path, e);
            ReadOutcome::Dead
        }
    }
}

fn handle_report(
    path: &Path,
    data: &[u8],
    state: &mut ButtonState,
    emitter: &mut KeyEmitter,
    settings: &Settings,
) {
    let Some(mask) = report::parse_report(data) else {
        return;
    };

    if settings.debug {
        let hex: String = data
            .iter()
            .take(7)
            .map(|b| format!("{:02x}", b))
            .collect::<Vec<_>>()
            .join(" ");
        info!("{:?} report: {} mask=0x{:02x}", path, hex, mask);
    }

    for edge in state.apply_mask(mask) {
        if let Err(e) = emitter.emit_edge(edge) {
            warn!("Failed to inject key events: {:#}", e);
        }
    }
}

/// Poll all handles until the process is terminated.
///
/// Dead handles are retired in place; the loop keeps running even with
/// zero handles left rather than exiting mid-session.
pub fn run_poll_loop(
    mut handles: Vec<PollHandle>,
    emitter: &mut KeyEmitter,
    settings: &Settings,
) -> ! {
    let mut state = ButtonState::default();
    let mut buf = [0u8; READ_BUF_LEN];
    let mut warned_idle = false;

    loop {
        let mut had_data = false;

        let mut i = 0;
        while i < handles.len() {
            match read_report(&mut handles[i], &mut buf) {
                ReadOutcome::Data(len) => {
                    had_data = true;
                    handle_report(&handles[i].path, &buf[..len], &mut state, emitter, settings);
                    i += 1;
                }
                ReadOutcome::Empty => i += 1,
                ReadOutcome::Dead => {
                    let dropped = handles.swap_remove(i);
                    info!("Dropped {:?}; {} handle(s) remain", dropped.path, handles.len());
                }
            }
        }

        if handles.is_empty() && !warned_idle {
            warn!("All hidraw handles are gone; idling until terminated");
            warned_idle = true;
        }

        if !had_data {
            thread::sleep(IDLE_SLEEP);
        }
    }
}
