//! Virtual key injection (evdev uinput)
//!
//! Owns the uinput device for the process lifetime. The key set is
//! declared up front from the selected mode; nothing outside it can be
//! emitted. Every key transition batch carries its own synchronization
//! events so consumers always observe complete transitions.

use crate::report::{Button, Edge};
use crate::settings::Mode;
use anyhow::{Context, Result};
use evdev::uinput::{VirtualDevice, VirtualDeviceBuilder};
use evdev::{AttributeSet, BusType, EventType, InputEvent, InputId, Key};
use tracing::debug;

/// Name the virtual device registers under.
const DEVICE_NAME: &str = "rapoo-m50-sidebuttons";

/// Identity advertised for the virtual device (mirrors the dongle).
const VENDOR_ID: u16 = 0x24ae;
const PRODUCT_ID: u16 = 0x2015;

pub struct KeyEmitter {
    device: VirtualDevice,
    mode: Mode,
}

impl KeyEmitter {
    /// Create the uinput device with the mode's key set.
    pub fn new(mode: Mode) -> Result<Self> {
        let mut keys = AttributeSet::<Key>::new();
        for key in mode_keys(mode) {
            keys.insert(*key);
        }

        let device = VirtualDeviceBuilder::new()
            .context("Failed to create uinput builder")?
            .name(DEVICE_NAME)
            .input_id(InputId::new(BusType::BUS_USB, VENDOR_ID, PRODUCT_ID, 0))
            .with_keys(&keys)
            .context("Failed to set key capabilities")?
            .build()
            .context("Failed to build uinput device (is the uinput module loaded?)")?;

        Ok(Self { device, mode })
    }

    /// Translate one button edge into key events and write them out.
    pub fn emit_edge(&mut self, edge: Edge) -> Result<()> {
        let events = edge_events(self.mode, edge);
        if events.is_empty() {
            return Ok(());
        }
        debug!(
            "{:?} {} -> {} event(s)",
            edge.button,
            if edge.pressed { "pressed" } else { "released" },
            events.len()
        );
        self.device
            .emit(&events)
            .context("Failed to write key events to uinput device")
    }
}

/// Keys a mode may emit, declared at device creation.
fn mode_keys(mode: Mode) -> &'static [Key] {
    match mode {
        Mode::BackForward => &[Key::KEY_BACK, Key::KEY_FORWARD],
        Mode::AltArrow => &[Key::KEY_LEFTALT, Key::KEY_LEFT, Key::KEY_RIGHT],
    }
}

fn key_event(key: Key, value: i32) -> InputEvent {
    InputEvent::new(EventType::KEY, key.code(), value)
}

fn sync_event() -> InputEvent {
    InputEvent::new(EventType::SYNCHRONIZATION, 0, 0)
}

/// Build the event sequence for one edge, synchronization markers included.
fn edge_events(mode: Mode, edge: Edge) -> Vec<InputEvent> {
    match mode {
        Mode::BackForward => {
            let key = match edge.button {
                Button::Back => Key::KEY_BACK,
                Button::Forward => Key::KEY_FORWARD,
            };
            vec![key_event(key, edge.pressed as i32), sync_event()]
        }
        Mode::AltArrow => {
            // One chord per physical press; the release is deliberately
            // silent, and there is no auto-repeat while held.
            if !edge.pressed {
                return Vec::new();
            }
            let arrow = match edge.button {
                Button::Back => Key::KEY_LEFT,
                Button::Forward => Key::KEY_RIGHT,
            };
            vec![
                key_event(Key::KEY_LEFTALT, 1),
                key_event(arrow, 1),
                sync_event(),
                key_event(arrow, 0),
                key_event(Key::KEY_LEFTALT, 0),
                sync_event(),
            ]
        }
    }
}
