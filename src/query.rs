// Aggregate reports over a set of parsed description files

use crate::parser::Document;
use serde::Serialize;
use std::collections::{BTreeMap, BTreeSet};
use std::path::PathBuf;

/// Interface substring marking USB-capable backends
pub const USB_INTERFACE: &str = "USB";

/// A parsed description and where it came from
#[derive(Debug, Clone, Serialize)]
pub struct DescFile {
    /// File stem, which is the backend name by convention
    pub name: String,
    pub path: PathBuf,
    pub document: Document,
}

/// How often each distinct interface value occurs across all devices
pub fn interface_counts(files: &[DescFile]) -> BTreeMap<String, usize> {
    let mut counts = BTreeMap::new();
    for iface in files.iter().flat_map(|f| f.document.interfaces()) {
        *counts.entry(iface.to_string()).or_insert(0) += 1;
    }
    counts
}

/// Backend identifiers with at least one device whose interface contains `needle`
pub fn backends_with_interface(files: &[DescFile], needle: &str) -> Vec<String> {
    files
        .iter()
        .filter(|f| f.document.has_interface(needle))
        .map(|f| f.document.backend.clone())
        .collect::<BTreeSet<_>>()
        .into_iter()
        .collect()
}

/// Filter applied to file stems before any parsing
#[derive(Debug, Clone, Default)]
pub struct BackendFilter {
    /// Always listed, without looking at their contents
    pub include: Vec<String>,
    /// Never listed
    pub exclude: Vec<String>,
}

/// What to do with a file, decided from its stem alone
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FilterDecision {
    Skip,
    Include,
    Inspect,
}

impl BackendFilter {
    /// Split a comma separated list as given on the command line
    pub fn parse_list(s: &str) -> Vec<String> {
        s.split(',')
            .map(str::trim)
            .filter(|s| !s.is_empty())
            .map(str::to_string)
            .collect()
    }

    pub fn decide(&self, name: &str) -> FilterDecision {
        if self.exclude.iter().any(|e| e == name) {
            FilterDecision::Skip
        } else if self.include.iter().any(|i| i == name) {
            FilterDecision::Include
        } else {
            FilterDecision::Inspect
        }
    }
}

/// Sorted backend names with USB devices, after applying the filter
pub fn usb_backends(files: &[DescFile], filter: &BackendFilter) -> Vec<String> {
    let mut names: Vec<String> = files
        .iter()
        .filter(|f| match filter.decide(&f.name) {
            FilterDecision::Skip => false,
            FilterDecision::Include => true,
            FilterDecision::Inspect => f.document.has_interface(USB_INTERFACE),
        })
        .map(|f| f.name.clone())
        .collect();
    names.sort();
    names.dedup();
    names
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::parser::parse_desc_from_str;

    fn desc(name: &str, interfaces: &[&str]) -> DescFile {
        let mut content = format!(":backend \"{name}\"\n:devicetype :scanner\n:mfg \"M\"\n");
        for (i, iface) in interfaces.iter().enumerate() {
            content.push_str(&format!(
                ":model \"m{i}\"\n:status :good\n:interface \"{iface}\"\n"
            ));
        }
        DescFile {
            name: name.to_string(),
            path: PathBuf::from(format!("{name}.desc")),
            document: parse_desc_from_str(&content, &format!("{name}.desc")).unwrap(),
        }
    }

    #[test]
    fn test_interface_counts() {
        let files = vec![
            desc("a", &["USB", "SCSI"]),
            desc("b", &["USB"]),
            desc("c", &[]),
        ];
        let counts = interface_counts(&files);
        assert_eq!(counts.get("USB"), Some(&2));
        assert_eq!(counts.get("SCSI"), Some(&1));
        assert_eq!(counts.len(), 2);
    }

    #[test]
    fn test_backends_with_interface() {
        let files = vec![
            desc("zeta", &["SCSI USB"]),
            desc("alpha", &["Parport"]),
            desc("beta", &["USB"]),
        ];
        assert_eq!(backends_with_interface(&files, "USB"), vec!["beta", "zeta"]);
        assert!(backends_with_interface(&files, "Firewire").is_empty());
    }

    #[test]
    fn test_usb_backends_with_filter() {
        let files = vec![
            desc("epson", &["USB"]),
            desc("hp", &["USB"]),
            desc("net", &[]),
            desc("canon", &["SCSI"]),
        ];
        let filter = BackendFilter {
            include: BackendFilter::parse_list("net"),
            exclude: BackendFilter::parse_list("hp"),
        };
        assert_eq!(usb_backends(&files, &filter), vec!["epson", "net"]);
    }

    #[test]
    fn test_filter_exclude_wins() {
        let filter = BackendFilter {
            include: vec!["x".to_string()],
            exclude: vec!["x".to_string()],
        };
        assert_eq!(filter.decide("x"), FilterDecision::Skip);
        assert_eq!(filter.decide("y"), FilterDecision::Inspect);
    }

    #[test]
    fn test_parse_list() {
        assert_eq!(BackendFilter::parse_list("a, b,,c"), vec!["a", "b", "c"]);
        assert!(BackendFilter::parse_list("").is_empty());
    }
}
