//! Device identity derived from the ESP32 factory MAC address.
//!
//! - Device ID `RS-XXYYZZ` (last 3 MAC bytes, uppercase hex), stable
//!   across reboots and used as the thing id.
//! - Thing title: the configured device name, or "Roller Shutter".
//! - Network hostname: `Webthings Device` or `Webthings Device: <name>`.

use core::fmt::Write;

use crate::config::DEVICE_NAME_MAX;

/// Fixed-size device ID string: "RS-XXYYZZ".
pub type DeviceIdString = heapless::String<16>;

/// Hostname: prefix + ": " + up to [`DEVICE_NAME_MAX`] chars.
pub type Hostname = heapless::String<{ HOSTNAME_PREFIX.len() + 2 + DEVICE_NAME_MAX }>;

/// Full 6-byte MAC address.
pub type MacAddress = [u8; 6];

pub const HOSTNAME_PREFIX: &str = "Webthings Device";
pub const DEFAULT_TITLE: &str = "Roller Shutter";

/// Read the factory MAC address from eFuse.
#[cfg(target_os = "espidf")]
pub fn read_mac() -> MacAddress {
    let mut mac: MacAddress = [0u8; 6];
    // SAFETY: the buffer is exactly the 6 bytes the call writes.
    unsafe {
        esp_idf_svc::sys::esp_efuse_mac_get_default(mac.as_mut_ptr());
    }
    mac
}

/// Simulation: returns a deterministic fake MAC.
#[cfg(not(target_os = "espidf"))]
pub fn read_mac() -> MacAddress {
    [0xDE, 0xAD, 0xBE, 0xEF, 0xCA, 0xFE]
}

pub fn device_id(mac: &MacAddress) -> DeviceIdString {
    let mut id = DeviceIdString::new();
    let _ = write!(id, "RS-{:02X}{:02X}{:02X}", mac[3], mac[4], mac[5]);
    id
}

pub fn hostname(device_name: &str) -> Hostname {
    let mut name = Hostname::new();
    let _ = name.push_str(HOSTNAME_PREFIX);
    if !device_name.is_empty() {
        let _ = write!(name, ": {}", device_name);
    }
    name
}

pub fn thing_title(device_name: &str) -> &str {
    if device_name.is_empty() {
        DEFAULT_TITLE
    } else {
        device_name
    }
}
