use crate::error::DebugError;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Breakpoint {
    pub addr: u16,
    pub label: String,
}

///
/// Breakpoints in insertion order. A breakpoint's id is its position, so ids
/// shift down when an earlier entry is deleted.
///
#[derive(Debug, Clone, Default)]
pub struct Breakpoints {
    entries: Vec<Breakpoint>,
}

impl Breakpoints {
    pub fn new() -> Breakpoints {
        Breakpoints {
            entries: Vec::new(),
        }
    }

    ///
    /// Registers `addr`. An address that is already present keeps its id and
    /// takes the new label.
    ///
    pub fn add(&mut self, addr: u16, label: &str) -> usize {
        if let Some(id) = self.id_of(addr) {
            self.entries[id].label = label.to_string();
            return id;
        }
        self.entries.push(Breakpoint {
            addr,
            label: label.to_string(),
        });
        self.entries.len() - 1
    }

    pub fn remove(&mut self, id: usize) -> Result<Breakpoint, DebugError> {
        if id >= self.entries.len() {
            return Err(DebugError::InvalidId {
                kind: "breakpoint",
                id,
            });
        }
        Ok(self.entries.remove(id))
    }

    pub fn id_of(&self, addr: u16) -> Option<usize> {
        self.entries.iter().position(|b| b.addr == addr)
    }

    pub fn iter(&self) -> impl Iterator<Item = &Breakpoint> {
        self.entries.iter()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn clear(&mut self) {
        self.entries.clear();
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Tap {
    pub name: Option<String>,
    pub addr: u16,
}

/// Watched addresses, echoed after every stop. Id is the list position.
#[derive(Debug, Clone, Default)]
pub struct Taps {
    entries: Vec<Tap>,
}

impl Taps {
    pub fn new() -> Taps {
        Taps {
            entries: Vec::new(),
        }
    }

    pub fn add(&mut self, name: Option<String>, addr: u16) -> usize {
        self.entries.push(Tap { name, addr });
        self.entries.len() - 1
    }

    pub fn remove(&mut self, id: usize) -> Result<Tap, DebugError> {
        if id >= self.entries.len() {
            return Err(DebugError::InvalidId { kind: "tap", id });
        }
        Ok(self.entries.remove(id))
    }

    pub fn iter(&self) -> impl Iterator<Item = &Tap> {
        self.entries.iter()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn clear(&mut self) {
        self.entries.clear();
    }
}

#[cfg(test)]
mod registry_tests {
    use super::*;

    #[test]
    fn breakpoint_ids_are_positions() {
        let mut bps = Breakpoints::new();
        assert_eq!(bps.add(0x1050, "foo"), 0);
        assert_eq!(bps.add(0x0010, "12"), 1);
        assert_eq!(bps.add(0x1050, "bar"), 0);
        assert_eq!(bps.len(), 2);

        let removed = bps.remove(0).unwrap();
        assert_eq!(removed.label, "bar");
        assert_eq!(bps.id_of(0x0010), Some(0));
        assert!(matches!(
            bps.remove(5),
            Err(DebugError::InvalidId { kind: "breakpoint", id: 5 })
        ));
    }

    #[test]
    fn taps_allow_repeats() {
        let mut taps = Taps::new();
        assert_eq!(taps.add(None, 0x1000), 0);
        assert_eq!(taps.add(Some("x".to_string()), 0x1000), 1);
        assert_eq!(taps.remove(0).unwrap().name, None);
        assert_eq!(taps.iter().next().map(|t| t.addr), Some(0x1000));
        assert!(taps.remove(1).is_err());
    }
}
