//! Structured Vulkan report snapshots and their text layout.
//!
//! A [`VulkanReport`] is usually loaded from a JSON snapshot and turned into diagnostic text
//! with [`render_report`].

use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::fmt::Write;

/// Format a packed Vulkan version number as `major.minor.patch`.
pub fn format_version(version: u32) -> String {
    let major = version >> 22;
    let minor = (version >> 12) & 0x3ff;
    let patch = version & 0xfff;
    format!("{major}.{minor}.{patch}")
}

/// Pack `major.minor.patch` into a Vulkan version number.
pub const fn make_version(major: u32, minor: u32, patch: u32) -> u32 {
    (major << 22) | (minor << 12) | patch
}

/// Instance-level report: loader version, layers, extensions and every physical device.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct VulkanReport {
    /// Packed instance API version.
    pub api_version: u32,
    /// Layers available to the instance.
    pub layers: Vec<Layer>,
    /// Instance extensions.
    pub instance_extensions: Vec<Extension>,
    /// One entry per physical device.
    pub devices: Vec<DeviceReport>,
}

/// An available instance layer.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Layer {
    /// Layer name.
    pub name: String,
    /// Packed version.
    pub implementation_version: u32,
}

/// An instance or device extension.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Extension {
    /// Extension name.
    pub name: String,
    /// Packed version.
    pub spec_version: u32,
}

/// A named device limit. Values are numbers, booleans, strings or arrays of those.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Limit {
    /// Limit name, e.g. `maxImageDimension2D`.
    pub name: String,
    /// Value as reported by the driver.
    pub value: Value,
}

/// A device feature flag.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Feature {
    /// Feature name, e.g. `geometryShader`.
    pub name: String,
    /// Whether the device supports the feature.
    pub enabled: bool,
}

/// Properties, limits, extensions and features of one physical device.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct DeviceReport {
    /// Device name.
    pub name: String,
    /// Packed API version.
    pub api_version: u32,
    /// Packed driver version.
    pub driver_version: u32,
    /// Vendor-assigned device ID.
    pub device_id: u32,
    /// PCI vendor ID.
    pub vendor_id: u32,
    /// Pipeline cache UUID bytes.
    pub pipeline_cache_uuid: [u8; 16],
    /// Device limits in report order.
    pub limits: Vec<Limit>,
    /// Device extensions.
    pub extensions: Vec<Extension>,
    /// Device features.
    pub features: Vec<Feature>,
}

fn write_value(out: &mut String, value: &Value) {
    match value {
        Value::Null => {}
        Value::Bool(b) => out.push(if *b { '1' } else { '0' }),
        Value::Number(n) => {
            let _ = write!(out, "{n}");
        }
        Value::String(s) => out.push_str(s),
        Value::Array(items) => {
            out.push('(');
            for (i, item) in items.iter().enumerate() {
                if i != 0 {
                    out.push_str(", ");
                }
                write_value(out, item);
            }
            out.push(')');
        }
        Value::Object(_) => {
            let _ = write!(out, "{value}");
        }
    }
}

fn write_extensions(out: &mut String, title: &str, extensions: &[Extension]) {
    let _ = writeln!(out, "{title}:");
    for ext in extensions {
        let _ = writeln!(out, "\t{} ({})", ext.name, format_version(ext.spec_version));
    }
}

fn write_device(out: &mut String, device: &DeviceReport) {
    let _ = writeln!(out, "Device Name: {}", device.name);
    let _ = writeln!(out, "Device API Version: {}", format_version(device.api_version));
    let _ = writeln!(
        out,
        "Device Driver Version: {}",
        format_version(device.driver_version)
    );
    let _ = writeln!(out, "Device ID: {}", device.device_id);
    let _ = writeln!(out, "Device Vendor ID: {}", device.vendor_id);

    out.push_str("Device Pipeline Cache UUID: 0x");
    for byte in device.pipeline_cache_uuid {
        let _ = write!(out, "{byte:02X}");
    }
    out.push('\n');

    out.push_str("Device Limits:\n");
    for limit in &device.limits {
        let _ = write!(out, "\t{} ", limit.name);
        write_value(out, &limit.value);
        out.push('\n');
    }

    write_extensions(out, "Device Extensions", &device.extensions);

    out.push_str("Device Features:\n");
    for feature in &device.features {
        let _ = writeln!(out, "\t{} {}", feature.name, u8::from(feature.enabled));
    }
}

/// Render `report` as diagnostic text.
pub fn render_report(report: &VulkanReport) -> String {
    let mut out = String::new();
    let _ = writeln!(out, "Vulkan Version: {}", format_version(report.api_version));

    out.push_str("Layers:\n");
    for layer in &report.layers {
        let _ = writeln!(
            out,
            "\t{} ({})",
            layer.name,
            format_version(layer.implementation_version)
        );
    }

    write_extensions(&mut out, "Instance Extensions", &report.instance_extensions);

    let _ = writeln!(out, "Physical Device Count: {}", report.devices.len());
    for device in &report.devices {
        write_device(&mut out, device);
    }

    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use serde_json::json;

    #[test]
    fn test_format_version() {
        assert_eq!(format_version(4206592), "1.3.0");
        assert_eq!(format_version(make_version(1, 1, 128)), "1.1.128");
        assert_eq!(format_version(0), "0.0.0");
    }

    #[test]
    fn test_render_report_layout() {
        let report: VulkanReport = serde_json::from_value(json!({
            "api_version": make_version(1, 3, 0),
            "layers": [{ "name": "VK_LAYER_KHRONOS_validation", "implementation_version": 1 }],
            "instance_extensions": [{ "name": "VK_KHR_surface", "spec_version": 25 }],
            "devices": [{
                "name": "Adreno (TM) 650",
                "api_version": make_version(1, 1, 128),
                "driver_version": make_version(512, 502, 0),
                "device_id": 100794369,
                "vendor_id": 20803,
                "pipeline_cache_uuid": [1, 2, 3, 4, 5, 6, 7, 8, 9, 10, 11, 12, 13, 14, 15, 255],
                "limits": [
                    { "name": "maxImageDimension1D", "value": 16384 },
                    { "name": "maxComputeWorkGroupCount", "value": [65535, 65535, 65535] },
                    { "name": "timestampPeriod", "value": 52.083332 }
                ],
                "extensions": [{ "name": "VK_KHR_swapchain", "spec_version": 70 }],
                "features": [
                    { "name": "robustBufferAccess", "enabled": true },
                    { "name": "geometryShader", "enabled": false }
                ]
            }]
        }))
        .unwrap();

        let expected = "\
Vulkan Version: 1.3.0
Layers:
\tVK_LAYER_KHRONOS_validation (0.0.1)
Instance Extensions:
\tVK_KHR_surface (0.0.25)
Physical Device Count: 1
Device Name: Adreno (TM) 650
Device API Version: 1.1.128
Device Driver Version: 512.502.0
Device ID: 100794369
Device Vendor ID: 20803
Device Pipeline Cache UUID: 0x0102030405060708090A0B0C0D0E0FFF
Device Limits:
\tmaxImageDimension1D 16384
\tmaxComputeWorkGroupCount (65535, 65535, 65535)
\ttimestampPeriod 52.083332
Device Extensions:
\tVK_KHR_swapchain (0.0.70)
Device Features:
\trobustBufferAccess 1
\tgeometryShader 0
";
        assert_eq!(render_report(&report), expected);
    }

    #[test]
    fn test_missing_fields_default() {
        let report: VulkanReport = serde_json::from_str("{}").unwrap();
        assert_eq!(
            render_report(&report),
            "Vulkan Version: 0.0.0\nLayers:\nInstance Extensions:\nPhysical Device Count: 0\n"
        );
    }
}
