use std::collections::BTreeMap;
use std::fs;
use std::path::Path;

use log::debug;
use serde::{Deserialize, Serialize};

use gcpu_core::LoadError;

pub const DEFAULT_SESSION_FILE: &str = "debug.json";
pub const SESSION_VERSION: u32 = 1;

fn default_version() -> u32 {
    SESSION_VERSION
}

///
/// Persisted breakpoints and taps.
///
/// `{"version": 1, "breaks": {addr: label}, "taps": [[name, addr], ...]}`
///
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SessionFile {
    #[serde(default = "default_version")]
    pub version: u32,
    #[serde(default)]
    pub breaks: BTreeMap<u16, String>,
    #[serde(default)]
    pub taps: Vec<(Option<String>, u16)>,
}

impl SessionFile {
    pub fn load<P: AsRef<Path>>(path: P) -> Result<SessionFile, LoadError> {
        debug!("Loading session from {:?}", path.as_ref());
        let text = fs::read_to_string(path)?;
        Ok(serde_json::from_str(&text)?)
    }

    pub fn save<P: AsRef<Path>>(&self, path: P) -> Result<(), LoadError> {
        let text = serde_json::to_string_pretty(self)?;
        fs::write(path, text)?;
        Ok(())
    }
}
