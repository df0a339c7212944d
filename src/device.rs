//! Device detection via the sysfs HID tree
//!
//! The Rapoo 2.4G dongle is matched either by its USB vendor/product pair
//! or by the interface name the receiver reports. Each matched HID device
//! can expose several hidraw nodes; all of them become candidates, since
//! which interface carries the side-button reports varies by pairing.

use std::collections::HashMap;
use std::fs;
use std::path::{Path, PathBuf};
use tracing::{debug, warn};

/// Rapoo USB Vendor ID (normalized hex, no leading zeros)
pub const RAPOO_VENDOR_ID: &str = "24AE";

/// Rapoo M50 Plus/Silent 2.4G dongle Product ID
pub const RAPOO_PRODUCT_ID: &str = "2015";

/// Name substrings the receiver reports when the HID_ID is unusable
const NAME_HINT: &str = "RAPOO";
const NAME_MATCH: &str = "RAPOO 2.4G WIRELESS DEVICE";

const SYSFS_HID_DEVICES: &str = "/sys/bus/hid/devices";
const DEV_DIR: &str = "/dev";

/// Parsed and normalized `HID_ID` value (`BUS:VENDOR:PRODUCT`).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DeviceIdentity {
    #[allow(dead_code)]
    pub bus: String,
    pub vendor_id: String,
    pub product_id: String,
}

impl DeviceIdentity {
    /// Parse an identity string like `0003:000024AE:00002015`.
    ///
    /// Anything that is not exactly three colon-delimited fields is not an
    /// identity we can use.
    pub fn parse(hid_id: &str) -> Option<Self> {
        let mut parts = hid_id.trim().split(':');
        match (parts.next(), parts.next(), parts.next(), parts.next()) {
            (Some(bus), Some(vendor), Some(product), None) => Some(Self {
                bus: normalize_hex_field(bus),
                vendor_id: normalize_hex_field(vendor),
                product_id: normalize_hex_field(product),
            }),
            _ => None,
        }
    }

    /// Whether this identity names the Rapoo dongle.
    pub fn is_target(&self) -> bool {
        self.vendor_id == RAPOO_VENDOR_ID && self.product_id == RAPOO_PRODUCT_ID
    }
}

/// Strip leading zeros and upper-case a fixed-width hex field.
/// An all-zero field collapses to "0".
fn normalize_hex_field(field: &str) -> String {
    let stripped = field.trim_start_matches('0');
    if stripped.is_empty() {
        "0".to_string()
    } else {
        stripped.to_uppercase()
    }
}

/// One openable hidraw node of a matched device.
#[derive(Debug, Clone)]
pub struct Candidate {
    pub devnode: PathBuf,
    pub name: String,
    pub hid_id: String,
}

/// Parse a sysfs `uevent` file into its `KEY=VALUE` pairs.
fn parse_uevent(content: &str) -> HashMap<String, String> {
    content
        .lines()
        .filter_map(|line| {
            line.split_once('=')
                .map(|(k, v)| (k.trim().to_string(), v.trim().to_string()))
        })
        .collect()
}

/// Match rule: target vendor/product, or the receiver's name heuristic.
fn matches_target(name: &str, hid_id: &str) -> bool {
    let by_id = DeviceIdentity::parse(hid_id)
        .map(|id| id.is_target())
        .unwrap_or(false);
    let upper = name.to_uppercase();
    let by_name = upper.contains(NAME_HINT) && upper.contains(NAME_MATCH);
    by_id || by_name
}

/// Scan the sysfs HID tree for Rapoo dongle hidraw nodes.
///
/// Returns every hidraw node of every matched device. An empty result is
/// not an error here; the caller decides whether that is fatal.
pub fn discover_candidates() -> Vec<Candidate> {
    scan_hid_devices(Path::new(SYSFS_HID_DEVICES), Path::new(DEV_DIR))
}

fn scan_hid_devices(sysfs_root: &Path, dev_dir: &Path) -> Vec<Candidate> {
    let mut candidates = Vec::new();

    let entries = match fs::read_dir(sysfs_root) {
        Ok(entries) => entries,
        Err(e) => {
            warn!("Cannot read {:?}: {}", sysfs_root, e);
            return candidates;
        }
    };

    for entry in entries.flatten() {
        let device_path = entry.path();

        // Devices without a uevent file are skipped, not an error
        let Ok(content) = fs::read_to_string(device_path.join("uevent")) else {
            continue;
        };
        let kv = parse_uevent(&content);
        let name = kv.get("HID_NAME").cloned().unwrap_or_default();
        let hid_id = kv.get("HID_ID").cloned().unwrap_or_default();

        if !matches_target(&name, &hid_id) {
            continue;
        }
        debug!("Matched HID device {:?} ('{}')", device_path, name);

        // Same story for devices without a hidraw interface
        let Ok(raw_entries) = fs::read_dir(device_path.join("hidraw")) else {
            continue;
        };
        let mut nodes: Vec<String> = raw_entries
            .flatten()
            .map(|e| e.file_name().to_string_lossy().into_owned())
            .filter(|n| n.starts_with("hidraw"))
            .collect();
        nodes.sort();

        for node in nodes {
            candidates.push(Candidate {
                devnode: dev_dir.join(&node),
                name: name.clone(),
                hid_id: hid_id.clone(),
            });
        }
    }

    candidates
}
