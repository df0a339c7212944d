//! Hardware-dependent tests that require a real Rapoo dongle
//!
//! These tests are ignored by default and can be run with:
//! `cargo test -- --ignored`
//!
//! They require:
//! - A connected Rapoo 2.4G dongle (24ae:2015)
//! - Read permission on /dev/hidraw*
//! - uinput module loaded

/// Test dongle presence with real hardware
#[test]
#[ignore]
fn test_real_dongle_detection() {
    // Run with: cargo test -- --ignored test_real_dongle_detection

    use std::process::Command;

    let output = Command::new("lsusb").output().expect("Failed to run lsusb");

    let stdout = String::from_utf8_lossy(&output.stdout);

    if stdout.to_lowercase().contains("24ae:2015") {
        println!("Rapoo dongle found in USB devices");
    } else {
        panic!("No Rapoo dongle found. Plug in the receiver to run this test.");
    }
}

/// Test that the sysfs HID tree exposes the dongle
#[test]
#[ignore]
fn test_real_sysfs_hid_entries() {
    use std::fs;

    let entries: Vec<_> = fs::read_dir("/sys/bus/hid/devices")
        .expect("Can't read /sys/bus/hid/devices")
        .filter_map(|e| e.ok())
        .filter(|e| {
            fs::read_to_string(e.path().join("uevent"))
                .map(|s| s.to_uppercase().contains("RAPOO") || s.contains("24AE"))
                .unwrap_or(false)
        })
        .collect();

    println!("Found {} Rapoo HID device(s)", entries.len());
    assert!(!entries.is_empty(), "No Rapoo HID devices in sysfs");
}

/// Test hidraw node access with real hardware
#[test]
#[ignore]
fn test_real_hidraw_access() {
    use std::fs;

    let hidraw_devices: Vec<_> = fs::read_dir("/dev")
        .expect("Can't read /dev")
        .filter_map(|e| e.ok())
        .filter(|e| e.file_name().to_string_lossy().starts_with("hidraw"))
        .collect();

    println!("Found {} hidraw devices", hidraw_devices.len());
    assert!(!hidraw_devices.is_empty(), "No hidraw devices found");
}

/// Test that uinput is available for the virtual keyboard
#[test]
#[ignore]
fn test_real_uinput_available() {
    assert!(
        std::path::Path::new("/dev/uinput").exists(),
        "uinput module not loaded (modprobe uinput)"
    );
}
