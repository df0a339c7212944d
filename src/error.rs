//! Startup error types.

use thiserror::Error;

/// Conditions that abort startup before the poll loop is entered.
///
/// Nothing after startup is allowed to terminate the process; mid-run
/// failures are contained per handle in the poll loop.
#[derive(Debug, Error)]
pub enum StartupError {
    /// Discovery found no matching dongle at all.
    #[error("no Rapoo 24AE:2015 hidraw nodes found")]
    NoCandidates,

    /// Every discovered node failed to open.
    #[error("could not open any hidraw device (check permissions on /dev/hidraw*)")]
    NoDevicesOpened,
}
