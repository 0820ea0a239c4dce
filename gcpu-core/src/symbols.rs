use std::collections::BTreeMap;
use std::fs;
use std::path::Path;

use log::debug;
use serde::{Deserialize, Serialize};

use crate::error::LoadError;

pub const DEBUG_INFO_VERSION: u32 = 1;

fn default_version() -> u32 {
    DEBUG_INFO_VERSION
}

///
/// Label and source-line records produced by the assembler and consumed
/// read-only by the debugger.
///
/// Serialized as `{"version": 1, "symbols": {label: addr}, "lines": {addr:
/// [line, text]}}`. Unknown fields are ignored and a missing `version` reads
/// as 1.
///
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct DebugInfo {
    #[serde(default = "default_version")]
    pub version: u32,
    #[serde(default)]
    pub symbols: BTreeMap<String, u16>,
    #[serde(default)]
    pub lines: BTreeMap<u16, (usize, String)>,
}

impl DebugInfo {
    pub fn new() -> DebugInfo {
        DebugInfo {
            version: DEBUG_INFO_VERSION,
            symbols: BTreeMap::new(),
            lines: BTreeMap::new(),
        }
    }

    pub fn from_json(text: &str) -> Result<DebugInfo, LoadError> {
        Ok(serde_json::from_str(text)?)
    }

    pub fn to_json(&self) -> Result<String, LoadError> {
        Ok(serde_json::to_string_pretty(self)?)
    }

    pub fn load<P: AsRef<Path>>(path: P) -> Result<DebugInfo, LoadError> {
        debug!("Loading debug info from {:?}", path.as_ref());
        let text = fs::read_to_string(path)?;
        DebugInfo::from_json(&text)
    }

    pub fn symbol(&self, name: &str) -> Option<u16> {
        self.symbols.get(name).copied()
    }

    pub fn line_at(&self, addr: u16) -> Option<&(usize, String)> {
        self.lines.get(&addr)
    }

    ///
    /// Finds the address whose recorded source line number is `line`.
    ///
    pub fn address_of_line(&self, line: usize) -> Option<u16> {
        self.lines
            .iter()
            .find(|(_, (num, _))| *num == line)
            .map(|(addr, _)| *addr)
    }
}

#[cfg(test)]
mod symbols_tests {
    use super::*;

    fn sample() -> DebugInfo {
        let mut info = DebugInfo::new();
        info.symbols.insert("foo".to_string(), 0x1050);
        info.lines.insert(0x0000, (3, "ldaa #$01".to_string()));
        info.lines.insert(0x0002, (4, "foo2: tab".to_string()));
        info
    }

    #[test]
    fn lookups() {
        let info = sample();
        assert_eq!(info.symbol("foo"), Some(0x1050));
        assert_eq!(info.symbol("bar"), None);
        assert_eq!(info.address_of_line(4), Some(0x0002));
        assert_eq!(info.address_of_line(5), None);
        assert_eq!(info.line_at(0x0000).map(|l| l.0), Some(3));
    }

    #[test]
    fn json_shape() {
        let info = sample();
        let text = info.to_json().unwrap();
        let value: serde_json::Value = serde_json::from_str(&text).unwrap();
        assert_eq!(value["version"], 1);
        assert_eq!(value["symbols"]["foo"], 0x1050);
        assert_eq!(value["lines"]["2"][0], 4);
        assert_eq!(value["lines"]["2"][1], "foo2: tab");
    }

    #[test]
    fn tolerant_parse() {
        let text = r#"{"symbols": {"a": 16}, "lines": {"16": [1, "a: tab"]}, "extra": true}"#;
        let info = DebugInfo::from_json(text).unwrap();
        assert_eq!(info.version, 1);
        assert_eq!(info.symbol("a"), Some(16));
        assert_eq!(info.address_of_line(1), Some(16));
    }

    #[test]
    fn malformed_json_is_reported() {
        assert!(matches!(
            DebugInfo::from_json("{\"symbols\": 3"),
            Err(LoadError::Json(_))
        ));
    }
}
