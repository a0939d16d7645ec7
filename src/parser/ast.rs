// AST for .desc files
// Typed tree built from one backend description: backend -> types -> manufacturers -> devices

use serde::{Deserialize, Serialize};

/// Complete backend description
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Document {
    /// Backend identifier (`:backend`)
    pub backend: String,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub version: Option<String>,

    /// Whether the backend is new in this release (`:new :yes`)
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub new: Option<bool>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub manpage: Option<String>,

    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub url: Vec<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub comment: Option<String>,

    /// Device type entries, in source order
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub types: Vec<DeviceType>,
}

/// Category named by `:devicetype`
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DeviceCategory {
    Scanner,
    Stillcam,
    Vidcam,
    Api,
    Meta,
}

impl DeviceCategory {
    pub fn as_str(&self) -> &'static str {
        match self {
            DeviceCategory::Scanner => "scanner",
            DeviceCategory::Stillcam => "stillcam",
            DeviceCategory::Vidcam => "vidcam",
            DeviceCategory::Api => "api",
            DeviceCategory::Meta => "meta",
        }
    }

    /// Parse a keyword value (without sigil) into a category
    pub fn from_keyword(s: &str) -> Option<DeviceCategory> {
        match s {
            "scanner" => Some(DeviceCategory::Scanner),
            "stillcam" => Some(DeviceCategory::Stillcam),
            "vidcam" => Some(DeviceCategory::Vidcam),
            "api" => Some(DeviceCategory::Api),
            "meta" => Some(DeviceCategory::Meta),
            _ => None,
        }
    }

    /// Physical devices listed per manufacturer
    pub fn is_hardware(&self) -> bool {
        matches!(
            self,
            DeviceCategory::Scanner | DeviceCategory::Stillcam | DeviceCategory::Vidcam
        )
    }
}

/// Support level named by `:status`
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SupportStatus {
    Unsupported,
    Untested,
    Minimal,
    Basic,
    Good,
    Complete,
}

impl SupportStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            SupportStatus::Unsupported => "unsupported",
            SupportStatus::Untested => "untested",
            SupportStatus::Minimal => "minimal",
            SupportStatus::Basic => "basic",
            SupportStatus::Good => "good",
            SupportStatus::Complete => "complete",
        }
    }

    pub fn from_keyword(s: &str) -> Option<SupportStatus> {
        match s {
            "unsupported" => Some(SupportStatus::Unsupported),
            "untested" => Some(SupportStatus::Untested),
            "minimal" => Some(SupportStatus::Minimal),
            "basic" => Some(SupportStatus::Basic),
            "good" => Some(SupportStatus::Good),
            "complete" => Some(SupportStatus::Complete),
            _ => None,
        }
    }
}

/// One `:devicetype` entry.
///
/// Hardware categories list manufacturers; `api`/`meta` entries carry a
/// description and links instead.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum DeviceType {
    Abstract(AbstractType),
    Hardware(HardwareType),
}

impl DeviceType {
    pub fn category(&self) -> DeviceCategory {
        match self {
            DeviceType::Abstract(t) => t.category,
            DeviceType::Hardware(t) => t.category,
        }
    }

    /// Manufacturers of a hardware entry (empty for api/meta)
    pub fn manufacturers(&self) -> &[Manufacturer] {
        match self {
            DeviceType::Abstract(_) => &[],
            DeviceType::Hardware(t) => &t.manufacturers,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct HardwareType {
    #[serde(rename = "type")]
    pub category: DeviceCategory,

    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub manufacturers: Vec<Manufacturer>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AbstractType {
    #[serde(rename = "type")]
    pub category: DeviceCategory,

    pub desc: String,

    /// Never empty
    pub url: Vec<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub comment: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Manufacturer {
    pub name: String,

    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub url: Vec<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub comment: Option<String>,

    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub devices: Vec<Device>,
}

/// One `:model` entry
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Device {
    pub name: String,

    pub status: SupportStatus,

    /// Connection description, e.g. "USB" or "SCSI Parport"
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub interface: Option<String>,

    /// SCSI vendor/model/type strings
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub scsi: Option<Vec<String>>,

    /// USB vendor/product ids
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub usbid: Option<Vec<String>>,

    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub url: Vec<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub comment: Option<String>,
}

impl Document {
    /// Every device of every hardware entry, in source order
    pub fn devices(&self) -> impl Iterator<Item = &Device> {
        self.types
            .iter()
            .flat_map(|t| t.manufacturers())
            .flat_map(|m| m.devices.iter())
    }

    pub fn manufacturers(&self) -> impl Iterator<Item = &Manufacturer> {
        self.types.iter().flat_map(|t| t.manufacturers())
    }

    /// Interface values of all devices (devices without one are skipped)
    pub fn interfaces(&self) -> impl Iterator<Item = &str> {
        self.devices().filter_map(|d| d.interface.as_deref())
    }

    /// True if any device's interface contains `needle`
    pub fn has_interface(&self, needle: &str) -> bool {
        self.interfaces().any(|iface| iface.contains(needle))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn device(name: &str, interface: Option<&str>) -> Device {
        Device {
            name: name.to_string(),
            status: SupportStatus::Good,
            interface: interface.map(str::to_string),
            scsi: None,
            usbid: None,
            url: Vec::new(),
            comment: None,
        }
    }

    fn sample() -> Document {
        Document {
            backend: "acme".to_string(),
            version: None,
            new: None,
            manpage: None,
            url: Vec::new(),
            comment: None,
            types: vec![
                DeviceType::Hardware(HardwareType {
                    category: DeviceCategory::Scanner,
                    manufacturers: vec![Manufacturer {
                        name: "Acme Corp".to_string(),
                        url: Vec::new(),
                        comment: None,
                        devices: vec![
                            device("A1", Some("SCSI")),
                            device("A2", None),
                            device("A3", Some("USB")),
                        ],
                    }],
                }),
                DeviceType::Abstract(AbstractType {
                    category: DeviceCategory::Api,
                    desc: "Interface".to_string(),
                    url: vec!["http://example.org".to_string()],
                    comment: None,
                }),
            ],
        }
    }

    #[test]
    fn test_category_keywords() {
        for keyword in crate::parser::catalog::DEVICE_TYPES {
            let category = DeviceCategory::from_keyword(keyword).unwrap();
            assert_eq!(category.as_str(), *keyword);
        }
        assert!(DeviceCategory::Vidcam.is_hardware());
        assert!(!DeviceCategory::Meta.is_hardware());
    }

    #[test]
    fn test_status_keywords() {
        for keyword in crate::parser::catalog::STATUSES {
            let status = SupportStatus::from_keyword(keyword).unwrap();
            assert_eq!(status.as_str(), *keyword);
        }
        assert!(SupportStatus::from_keyword("perfect").is_none());
        assert!(SupportStatus::Complete > SupportStatus::Minimal);
    }

    #[test]
    fn test_devices_and_interfaces() {
        let doc = sample();
        let names: Vec<&str> = doc.devices().map(|d| d.name.as_str()).collect();
        assert_eq!(names, vec!["A1", "A2", "A3"]);
        let interfaces: Vec<&str> = doc.interfaces().collect();
        assert_eq!(interfaces, vec!["SCSI", "USB"]);
        assert!(doc.has_interface("US"));
        assert!(!doc.has_interface("Parport"));
    }

    #[test]
    fn test_serialize_shapes() {
        let json = serde_json::to_value(sample()).unwrap();
        assert_eq!(json["backend"], "acme");
        assert!(json.get("version").is_none());
        assert_eq!(json["types"][0]["type"], "scanner");
        assert_eq!(json["types"][0]["manufacturers"][0]["devices"][2]["status"], "good");
        assert_eq!(json["types"][1]["type"], "api");
        assert_eq!(json["types"][1]["desc"], "Interface");
    }

    #[test]
    fn test_deserialize_picks_matching_shape() {
        let doc = sample();
        let json = serde_json::to_string(&doc).unwrap();
        let back: Document = serde_json::from_str(&json).unwrap();
        assert_eq!(back, doc);
    }
}
