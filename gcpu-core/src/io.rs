use std::convert::TryFrom;

use crossbeam_channel::{unbounded, Receiver, Sender};
use log::{debug, warn};

use crate::consts::io;
use crate::utils::parse_literal;

/// A single pending store into the memory-mapped I/O window.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct IoWrite {
    pub addr: u16,
    pub value: u8,
}

/// An edge reported by an input listener.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum InputEvent {
    Line { line: u16, pressed: bool },
    Pointer { x: u8, y: u8, state: u8 },
}

impl InputEvent {
    ///
    /// ## `parse` Function
    ///
    /// Reads one textual event: `down <line>`, `up <line>` or
    /// `ptr <x> <y> <state>`. Numbers take any literal form (`$hex`, `%bin`,
    /// decimal).
    ///
    pub fn parse(text: &str) -> Option<InputEvent> {
        let toks: Vec<&str> = text.split_whitespace().collect();
        let byte = |tok: &str| parse_literal(tok).and_then(|v| u8::try_from(v).ok());

        match toks.as_slice() {
            [edge, line] => {
                let pressed = match edge.to_lowercase().as_str() {
                    "down" => true,
                    "up" => false,
                    _ => return None,
                };
                let line = u16::try_from(parse_literal(line)?).ok()?;
                Some(InputEvent::Line { line, pressed })
            }
            [cmd, x, y, state] if cmd.eq_ignore_ascii_case("ptr") => Some(InputEvent::Pointer {
                x: byte(*x)?,
                y: byte(*y)?,
                state: byte(*state)?,
            }),
            _ => None,
        }
    }
}

///
/// Layout of the memory-mapped input window.
///
/// The pointer device occupies `base+0..=base+2` (x, y, button state). Input
/// lines hold one 0/1 byte each starting at `base + line_offset`.
///
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct IoMap {
    pub base: u16,
    pub line_offset: u16,
    pub line_count: u16,
    pub sticky: bool,
}

impl Default for IoMap {
    fn default() -> Self {
        IoMap {
            base: io::DEFAULT_IO_BASE,
            line_offset: io::DEFAULT_LINE_OFFSET,
            line_count: io::DEFAULT_LINE_COUNT,
            sticky: false,
        }
    }
}

impl IoMap {
    pub fn line_addr(&self, line: u16) -> u16 {
        self.base
            .wrapping_add(self.line_offset)
            .wrapping_add(line)
    }

    ///
    /// ## `line_writes` Function
    ///
    /// Returns the stores that reflect an input line edge. In sticky mode a
    /// press clears every line before setting the pressed one, and a release
    /// leaves the state untouched.
    ///
    pub fn line_writes(&self, line: u16, pressed: bool) -> Vec<IoWrite> {
        if line >= self.line_count {
            warn!("Input line {} outside of {} mapped lines", line, self.line_count);
            return Vec::new();
        }

        let mut writes = Vec::new();
        if self.sticky {
            if !pressed {
                return writes;
            }
            for l in 0..self.line_count {
                writes.push(IoWrite {
                    addr: self.line_addr(l),
                    value: 0,
                });
            }
        }
        writes.push(IoWrite {
            addr: self.line_addr(line),
            value: pressed as u8,
        });
        writes
    }

    pub fn pointer_writes(&self, x: u8, y: u8, state: u8) -> [IoWrite; 3] {
        [
            IoWrite {
                addr: self.base.wrapping_add(io::POINTER_X),
                value: x,
            },
            IoWrite {
                addr: self.base.wrapping_add(io::POINTER_Y),
                value: y,
            },
            IoWrite {
                addr: self.base.wrapping_add(io::POINTER_STATE),
                value: state,
            },
        ]
    }
}

///
/// Producer side of the I/O queue. Input listeners hold a clone of the port
/// and never touch memory directly; the execution thread applies the queued
/// writes between instructions.
///
#[derive(Clone)]
pub struct IoPort {
    map: IoMap,
    tx: Sender<IoWrite>,
}

impl IoPort {
    pub fn new(map: IoMap) -> (IoPort, Receiver<IoWrite>) {
        let (tx, rx) = unbounded();
        (IoPort { map, tx }, rx)
    }

    pub fn map(&self) -> &IoMap {
        &self.map
    }

    ///
    /// Queues the stores for an input line edge. Returns `false` once the
    /// consumer is gone.
    ///
    pub fn set_line(&self, line: u16, pressed: bool) -> bool {
        debug!("Input line {} -> {}", line, pressed);
        self.map
            .line_writes(line, pressed)
            .into_iter()
            .all(|w| self.tx.send(w).is_ok())
    }

    pub fn set_pointer(&self, x: u8, y: u8, state: u8) -> bool {
        self.map
            .pointer_writes(x, y, state)
            .iter()
            .all(|w| self.tx.send(*w).is_ok())
    }

    pub fn send(&self, event: InputEvent) -> bool {
        match event {
            InputEvent::Line { line, pressed } => self.set_line(line, pressed),
            InputEvent::Pointer { x, y, state } => self.set_pointer(x, y, state),
        }
    }
}

#[cfg(test)]
mod io_tests {
    use super::*;

    #[test]
    fn momentary_lines_follow_edges() {
        let map = IoMap::default();
        assert_eq!(
            map.line_writes(2, true),
            vec![IoWrite {
                addr: 0x1405,
                value: 1
            }]
        );
        assert_eq!(
            map.line_writes(2, false),
            vec![IoWrite {
                addr: 0x1405,
                value: 0
            }]
        );
    }

    #[test]
    fn sticky_press_clears_other_lines() {
        let map = IoMap {
            sticky: true,
            ..IoMap::default()
        };
        let writes = map.line_writes(1, true);
        assert_eq!(writes.len(), 5);
        assert!(writes[..4].iter().all(|w| w.value == 0));
        assert_eq!(writes[4], IoWrite { addr: 0x1404, value: 1 });

        assert!(map.line_writes(1, false).is_empty());
    }

    #[test]
    fn unmapped_line_is_ignored() {
        assert!(IoMap::default().line_writes(4, true).is_empty());
    }

    #[test]
    fn port_queues_pointer_state() {
        let (port, rx) = IoPort::new(IoMap::default());
        assert!(port.set_pointer(10, 20, 1));

        let got: Vec<IoWrite> = rx.try_iter().collect();
        assert_eq!(
            got,
            vec![
                IoWrite { addr: 0x1400, value: 10 },
                IoWrite { addr: 0x1401, value: 20 },
                IoWrite { addr: 0x1402, value: 1 },
            ]
        );

        drop(rx);
        assert!(!port.set_line(0, true));
    }

    #[test]
    fn parses_textual_events() {
        assert_eq!(
            InputEvent::parse("down 2"),
            Some(InputEvent::Line { line: 2, pressed: true })
        );
        assert_eq!(
            InputEvent::parse("  UP %1 "),
            Some(InputEvent::Line { line: 1, pressed: false })
        );
        assert_eq!(
            InputEvent::parse("ptr $10 20 1"),
            Some(InputEvent::Pointer { x: 0x10, y: 20, state: 1 })
        );
        assert_eq!(InputEvent::parse("ptr 256 0 0"), None);
        assert_eq!(InputEvent::parse("press 2"), None);
        assert_eq!(InputEvent::parse(""), None);
    }

    #[test]
    fn sticky_events_reach_memory_at_configured_base() {
        use crate::clock::{CancelToken, ClockConfig, GClock, Pacing, StopReason};
        use crate::consts::opcodes;
        use crate::instr::tests::init_cpu;

        let map = IoMap {
            base: 0x1800,
            sticky: true,
            ..IoMap::default()
        };
        let (port, rx) = IoPort::new(map);
        for text in ["down 0", "down 2", "up 2"].iter() {
            let event = InputEvent::parse(text).unwrap();
            assert!(port.send(event));
        }

        let mut cpu = init_cpu(&[opcodes::BEQ, 0x00]);
        let config = ClockConfig {
            rate_hz: 0,
            pacing: Pacing::Sleep,
            max_steps: Some(1),
        };
        let mut clk = GClock::new(config).with_io(rx);
        assert_eq!(clk.run(&mut cpu, &CancelToken::new()), Ok(StopReason::StepLimit));

        assert_eq!(cpu.read(0x1803), Ok(0));
        assert_eq!(cpu.read(0x1804), Ok(0));
        assert_eq!(cpu.read(0x1805), Ok(1));
        assert_eq!(cpu.read(0x1806), Ok(0));
        assert_eq!(cpu.read(0x1403), Ok(0));
    }
}
