//! One attached filtered device and the check that decides whether a device is
//! filtered at all.
//!
//! The hosting framework reads the device's hardware-id property when the
//! device attaches.  The property is a multi-string: UTF-16 strings separated
//! by NUL and terminated by an empty string.  The instance keeps the parsed ids
//! for as long as it lives.

use std::sync::atomic::{AtomicU64, Ordering};

use guardian_core::{InstanceId, UnitIndex};

use crate::infrastructure::storage::config::DevicesConfig;

/// Counters of open attempts seen by one instance.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct InterceptionStats {
    pub forwarded: u64,
    pub denied: u64,
}

/// An attached device subject to interception.
#[derive(Debug)]
pub struct FilteredInstance {
    id: InstanceId,
    hardware_ids: Vec<String>,
    unit: Option<UnitIndex>,
    forwarded: AtomicU64,
    denied: AtomicU64,
}

impl FilteredInstance {
    /// Creates an instance from its raw hardware-id property.
    pub fn new(id: InstanceId, hardware_id_property: &[u16]) -> Self {
        Self::with_hardware_ids(id, parse_multi_sz(hardware_id_property))
    }

    /// Creates an instance from already-parsed hardware ids.
    pub fn with_hardware_ids(id: InstanceId, hardware_ids: Vec<String>) -> Self {
        Self {
            id,
            hardware_ids,
            unit: None,
            forwarded: AtomicU64::new(0),
            denied: AtomicU64::new(0),
        }
    }

    /// Binds the instance to the logical unit whose state it reports.
    pub fn bound_to(mut self, unit: UnitIndex) -> Self {
        self.unit = Some(unit);
        self
    }

    pub fn id(&self) -> InstanceId {
        self.id
    }

    pub fn hardware_ids(&self) -> &[String] {
        &self.hardware_ids
    }

    pub fn unit(&self) -> Option<UnitIndex> {
        self.unit
    }

    pub(crate) fn record_forwarded(&self) {
        self.forwarded.fetch_add(1, Ordering::Relaxed);
    }

    pub(crate) fn record_denied(&self) {
        self.denied.fetch_add(1, Ordering::Relaxed);
    }

    /// Snapshot of the interception counters.
    pub fn stats(&self) -> InterceptionStats {
        InterceptionStats {
            forwarded: self.forwarded.load(Ordering::Relaxed),
            denied: self.denied.load(Ordering::Relaxed),
        }
    }
}

/// Splits a NUL-separated, empty-string-terminated UTF-16 multi-string.
///
/// Parsing stops at the first empty string or at the end of the buffer,
/// whichever comes first, so a missing final terminator is tolerated.
pub fn parse_multi_sz(buffer: &[u16]) -> Vec<String> {
    buffer
        .split(|&unit| unit == 0)
        .take_while(|part| !part.is_empty())
        .map(String::from_utf16_lossy)
        .collect()
}

/// Decides which attaching devices the filter intercepts.
#[derive(Debug, Clone, Default)]
pub struct AffectedDevices {
    force: bool,
    /// Upper-cased for case-insensitive comparison.
    hardware_ids: Vec<String>,
}

impl AffectedDevices {
    pub fn new(force: bool, hardware_ids: &[String]) -> Self {
        Self {
            force,
            hardware_ids: hardware_ids.iter().map(|id| id.to_uppercase()).collect(),
        }
    }

    pub fn from_config(config: &DevicesConfig) -> Self {
        Self::new(config.force, &config.affected)
    }

    /// Returns `true` when `instance` should be intercepted.
    pub fn matches(&self, instance: &FilteredInstance) -> bool {
        self.force
            || instance.hardware_ids().iter().any(|id| {
                let id = id.to_uppercase();
                self.hardware_ids.iter().any(|affected| *affected == id)
            })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn wide(s: &str) -> Vec<u16> {
        s.encode_utf16().collect()
    }

    fn multi_sz(parts: &[&str]) -> Vec<u16> {
        let mut buf = Vec::new();
        for part in parts {
            buf.extend(wide(part));
            buf.push(0);
        }
        buf.push(0);
        buf
    }

    #[test]
    fn test_parse_multi_sz_splits_all_strings() {
        let buf = multi_sz(&[r"HID\VID_045E&PID_028E&REV_0114", r"HID\VID_045E&PID_028E"]);
        assert_eq!(
            parse_multi_sz(&buf),
            vec![
                r"HID\VID_045E&PID_028E&REV_0114".to_string(),
                r"HID\VID_045E&PID_028E".to_string()
            ]
        );
    }

    #[test]
    fn test_parse_multi_sz_tolerates_missing_terminator() {
        let mut buf = wide("USB\\VID_1");
        buf.push(0);
        buf.extend(wide("USB\\VID_2"));
        assert_eq!(parse_multi_sz(&buf), vec!["USB\\VID_1", "USB\\VID_2"]);
    }

    #[test]
    fn test_parse_multi_sz_empty_buffer_yields_nothing() {
        assert!(parse_multi_sz(&[]).is_empty());
        assert!(parse_multi_sz(&[0, 0]).is_empty());
    }

    #[test]
    fn test_parse_multi_sz_ignores_data_after_terminator() {
        let mut buf = multi_sz(&["A"]);
        buf.extend(wide("garbage"));
        assert_eq!(parse_multi_sz(&buf), vec!["A"]);
    }

    #[test]
    fn test_new_instance_parses_property_and_starts_unbound() {
        let instance = FilteredInstance::new(InstanceId::new(), &multi_sz(&["HID\\X"]));
        assert_eq!(instance.hardware_ids(), &["HID\\X".to_string()]);
        assert_eq!(instance.unit(), None);
        assert_eq!(instance.stats(), InterceptionStats::default());
    }

    #[test]
    fn test_bound_to_sets_unit() {
        let unit = UnitIndex::new(1).unwrap();
        let instance =
            FilteredInstance::with_hardware_ids(InstanceId::new(), vec![]).bound_to(unit);
        assert_eq!(instance.unit(), Some(unit));
    }

    #[test]
    fn test_counters_track_recorded_outcomes() {
        let instance = FilteredInstance::with_hardware_ids(InstanceId::new(), vec![]);
        instance.record_forwarded();
        instance.record_denied();
        instance.record_denied();
        assert_eq!(
            instance.stats(),
            InterceptionStats {
                forwarded: 1,
                denied: 2
            }
        );
    }

    #[test]
    fn test_affected_devices_match_case_insensitively() {
        let affected = AffectedDevices::new(false, &[r"hid\vid_045e&pid_028e".to_string()]);
        let instance = FilteredInstance::with_hardware_ids(
            InstanceId::new(),
            vec![r"HID\VID_045E&PID_028E".to_string()],
        );
        assert!(affected.matches(&instance));
    }

    #[test]
    fn test_affected_devices_reject_unlisted_device() {
        let affected = AffectedDevices::new(false, &[r"HID\VID_045E&PID_028E".to_string()]);
        let instance = FilteredInstance::with_hardware_ids(
            InstanceId::new(),
            vec![r"HID\VID_054C&PID_05C4".to_string()],
        );
        assert!(!affected.matches(&instance));
    }

    #[test]
    fn test_force_matches_everything() {
        let affected = AffectedDevices::new(true, &[]);
        let instance = FilteredInstance::with_hardware_ids(InstanceId::new(), vec![]);
        assert!(affected.matches(&instance));
    }

    #[test]
    fn test_from_config_copies_force_and_ids() {
        let config = DevicesConfig {
            force: false,
            affected: vec!["HID\\A".to_string()],
        };
        let affected = AffectedDevices::from_config(&config);
        let instance =
            FilteredInstance::with_hardware_ids(InstanceId::new(), vec!["hid\\a".to_string()]);
        assert!(affected.matches(&instance));
    }
}
