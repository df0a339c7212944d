//! Startup configuration
//!
//! Read once from the process environment; fixed for the process lifetime.

use tracing::warn;

/// Environment variable selecting the key emission mode.
pub const MODE_ENV: &str = "RAPOO_MODE";

/// Environment variable enabling raw report logging.
pub const DEBUG_ENV: &str = "RAPOO_DEBUG";

/// How side-button edges are translated into key events.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Mode {
    /// Mirror each button directly onto KEY_BACK / KEY_FORWARD.
    #[default]
    BackForward,
    /// Send a single Alt+Left / Alt+Right chord per press.
    AltArrow,
}

impl Mode {
    fn from_env_value(value: Option<&str>) -> Self {
        match value {
            None => Mode::BackForward,
            Some("backforward") => Mode::BackForward,
            Some("altarrow") => Mode::AltArrow,
            Some(other) => {
                warn!(
                    "Unrecognized {}='{}', using 'backforward' (valid: backforward, altarrow)",
                    MODE_ENV, other
                );
                Mode::BackForward
            }
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            Mode::BackForward => "backforward",
            Mode::AltArrow => "altarrow",
        }
    }
}

#[derive(Debug, Clone, Copy, Default)]
pub struct Settings {
    pub mode: Mode,
    /// Log raw bytes and mask of every recognized report.
    pub debug: bool,
}

impl Settings {
    /// Load settings from the environment.
    pub fn from_env() -> Self {
        let mode_var = std::env::var(MODE_ENV).ok();
        let debug_var = std::env::var(DEBUG_ENV).ok();
        Self::from_values(mode_var.as_deref(), debug_var.as_deref())
    }

    fn from_values(mode: Option<&str>, debug: Option<&str>) -> Self {
        Settings {
            mode: Mode::from_env_value(mode),
            debug: debug == Some("1"),
        }
    }
}
