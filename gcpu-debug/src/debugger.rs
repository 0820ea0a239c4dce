use std::io::{BufRead, Write};
use std::path::Path;

use log::{debug, info};

use gcpu_core::clock::CancelToken;
use gcpu_core::disasm::disasm;
use gcpu_core::{CpuError, DebugInfo, GCpu};

use crate::command::{self, Command, Target, HELP};
use crate::error::DebugError;
use crate::registry::{Breakpoints, Taps};
use crate::session::{SessionFile, DEFAULT_SESSION_FILE, SESSION_VERSION};

const PROMPT: &str = "(gcpu) ";

/// What ended a stepping command.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Stop {
    /// The requested number of steps ran.
    Done,
    Breakpoint(usize),
    Interrupted,
    Fault(CpuError),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Flow {
    Next,
    Quit,
}

///
/// Interactive breakpoint debugger. The command loop is also the execution
/// driver, so `run` and `continue` block until a breakpoint is hit, the CPU
/// faults or the cancel token trips.
///
pub struct Debugger<R: BufRead, W: Write> {
    cpu: GCpu,
    info: DebugInfo,
    breaks: Breakpoints,
    taps: Taps,
    cancel: CancelToken,
    input: R,
    out: W,
}

impl<R: BufRead, W: Write> Debugger<R, W> {
    pub fn new(cpu: GCpu, info: DebugInfo, input: R, out: W) -> Debugger<R, W> {
        Debugger {
            cpu,
            info,
            breaks: Breakpoints::new(),
            taps: Taps::new(),
            cancel: CancelToken::new(),
            input,
            out,
        }
    }

    pub fn with_cancel(mut self, cancel: CancelToken) -> Debugger<R, W> {
        self.cancel = cancel;
        self
    }

    pub fn cpu(&self) -> &GCpu {
        &self.cpu
    }

    pub fn breakpoints(&self) -> &Breakpoints {
        &self.breaks
    }

    pub fn taps(&self) -> &Taps {
        &self.taps
    }

    pub fn output(&self) -> &W {
        &self.out
    }

    ///
    /// ## `run_repl` Function
    ///
    /// Reads commands until `quit` or end of input. Command errors are
    /// printed and the session continues.
    ///
    pub fn run_repl(&mut self) -> Result<(), DebugError> {
        loop {
            write!(self.out, "{}", PROMPT)?;
            self.out.flush()?;

            let mut line = String::new();
            if self.input.read_line(&mut line)? == 0 {
                writeln!(self.out)?;
                return Ok(());
            }
            if line.trim().is_empty() {
                continue;
            }

            match command::parse(&line).and_then(|cmd| self.execute(cmd)) {
                Ok(Flow::Quit) => return Ok(()),
                Ok(Flow::Next) => {}
                Err(DebugError::Io(e)) => return Err(DebugError::Io(e)),
                Err(e) => writeln!(self.out, "error: {}", e)?,
            }
        }
    }

    fn execute(&mut self, cmd: Command) -> Result<Flow, DebugError> {
        debug!("Executing {:?}", cmd);
        match cmd {
            Command::Step(n) => {
                let stop = self.step_n(n);
                self.report(stop)?;
            }
            Command::Run => {
                if self.cpu.pc != 0 && !self.confirm_restart()? {
                    return Ok(Flow::Next);
                }
                self.cpu.pc = 0;
                let stop = self.run_to_break();
                self.report(stop)?;
            }
            Command::Continue => {
                let stop = self.run_to_break();
                self.report(stop)?;
            }
            Command::Tap(target) => self.add_tap(target)?,
            Command::Break(target) => self.add_break(target)?,
            Command::DeleteBreak(id) => {
                let bp = self.breaks.remove(id)?;
                writeln!(self.out, "Deleted breakpoint {} at ${:04X}", id, bp.addr)?;
            }
            Command::DeleteTap(id) => {
                let tap = self.taps.remove(id)?;
                writeln!(self.out, "Deleted tap {} at ${:04X}", id, tap.addr)?;
            }
            Command::InfoBreakpoints => self.print_breakpoints()?,
            Command::InfoRegisters => self.print_registers()?,
            Command::InfoTaps => self.print_taps()?,
            Command::ListLabels => self.print_labels()?,
            Command::PrintLine => self.print_line()?,
            Command::Save(file) => {
                let path = file.unwrap_or_else(|| DEFAULT_SESSION_FILE.to_string());
                self.save_session(&path)?;
            }
            Command::Load(file) => {
                let path = file.unwrap_or_else(|| DEFAULT_SESSION_FILE.to_string());
                self.load_session(&path)?;
            }
            Command::Help => {
                for (usage, text) in HELP.iter() {
                    writeln!(self.out, "{:<20} {}", usage, text)?;
                }
            }
            Command::Quit => return Ok(Flow::Quit),
        }
        Ok(Flow::Next)
    }

    fn confirm_restart(&mut self) -> Result<bool, DebugError> {
        write!(
            self.out,
            "The program has already been started.\nStart it from the beginning? (y or n) "
        )?;
        self.out.flush()?;

        let mut answer = String::new();
        self.input.read_line(&mut answer)?;
        let yes = matches!(answer.trim().to_lowercase().as_str(), "y" | "yes");
        if !yes {
            writeln!(self.out, "Not confirmed.")?;
        }
        Ok(yes)
    }

    fn step_n(&mut self, n: u32) -> Stop {
        for _ in 0..n {
            if self.cancel.take() {
                return Stop::Interrupted;
            }
            if let Err(e) = self.cpu.step() {
                return Stop::Fault(e);
            }
        }
        Stop::Done
    }

    ///
    /// Steps at least once, then until PC lands on a breakpoint.
    ///
    pub fn run_to_break(&mut self) -> Stop {
        loop {
            if self.cancel.take() {
                return Stop::Interrupted;
            }
            if let Err(e) = self.cpu.step() {
                return Stop::Fault(e);
            }
            if let Some(id) = self.breaks.id_of(self.cpu.pc) {
                return Stop::Breakpoint(id);
            }
        }
    }

    fn report(&mut self, stop: Stop) -> Result<(), DebugError> {
        let pc = self.cpu.pc;
        match stop {
            Stop::Done => writeln!(self.out, "Stopped at ${:04X}", pc)?,
            Stop::Breakpoint(id) => {
                writeln!(self.out, "Breakpoint {}, ${:04X}", id, pc)?;
                if let Some((line, text)) = self.info.line_at(pc) {
                    writeln!(self.out, "{}\t{}", line, text)?;
                }
            }
            Stop::Interrupted => writeln!(self.out, "Interrupted at ${:04X}", pc)?,
            Stop::Fault(e) => {
                info!("Execution stopped by fault: {}", e);
                writeln!(self.out, "error: {}", e)?;
            }
        }
        self.print_taps()
    }

    fn resolve_addr(&self, target: &Target) -> Result<u16, DebugError> {
        match target {
            Target::Literal(v) if *v > 0xFFFF => Err(DebugError::InvalidAddress(*v)),
            Target::Literal(v) => Ok(*v as u16),
            Target::Label(name) => self
                .info
                .symbol(name)
                .ok_or_else(|| DebugError::UnresolvedSymbol(name.clone())),
        }
    }

    fn add_tap(&mut self, target: Target) -> Result<(), DebugError> {
        let addr = self.resolve_addr(&target)?;
        let name = match target {
            Target::Label(name) => Some(name),
            Target::Literal(_) => None,
        };
        let id = self.taps.add(name, addr);
        writeln!(self.out, "Tap {} at ${:04X}", id, addr)?;
        Ok(())
    }

    fn add_break(&mut self, target: Target) -> Result<(), DebugError> {
        let (addr, label) = match &target {
            Target::Literal(line) => {
                let addr = self
                    .info
                    .address_of_line(*line as usize)
                    .ok_or(DebugError::UnknownLine(*line))?;
                (addr, line.to_string())
            }
            Target::Label(name) => (self.resolve_addr(&target)?, name.clone()),
        };
        let id = self.breaks.add(addr, &label);
        writeln!(self.out, "Breakpoint {} at ${:04X}", id, addr)?;
        Ok(())
    }

    fn print_breakpoints(&mut self) -> Result<(), DebugError> {
        if self.breaks.is_empty() {
            writeln!(self.out, "No breakpoints.")?;
        }
        for (id, bp) in self.breaks.iter().enumerate() {
            writeln!(self.out, "{}  {}  ${:04X}", id, bp.label, bp.addr)?;
        }
        Ok(())
    }

    fn byte_at(&self, addr: u16) -> String {
        match self.cpu.read(addr as usize) {
            Ok(v) => format!("${:02X}", v),
            Err(_) => "--".to_string(),
        }
    }

    fn print_taps(&mut self) -> Result<(), DebugError> {
        if self.taps.is_empty() {
            return Ok(());
        }
        let rows: Vec<String> = self
            .taps
            .iter()
            .enumerate()
            .map(|(id, tap)| {
                format!(
                    "{}  {:<12} ${:04X}  {}",
                    id,
                    tap.name.as_deref().unwrap_or(""),
                    tap.addr,
                    self.byte_at(tap.addr)
                )
            })
            .collect();
        for row in rows.iter() {
            writeln!(self.out, "{}", row)?;
        }
        Ok(())
    }

    fn print_registers(&mut self) -> Result<(), DebugError> {
        let r = self.cpu.registers();
        let pc = self.byte_at(r.pc);
        let x = self.byte_at(r.x);
        let y = self.byte_at(r.y);
        writeln!(self.out, "PC:\t${:04X}\t{}", r.pc, pc)?;
        writeln!(self.out, "A:\t${:02X}", r.a)?;
        writeln!(self.out, "B:\t${:02X}", r.b)?;
        writeln!(self.out, "X:\t${:04X}\t{}", r.x, x)?;
        writeln!(self.out, "Y:\t${:04X}\t{}", r.y, y)?;
        Ok(())
    }

    fn print_labels(&mut self) -> Result<(), DebugError> {
        let mut labels: Vec<(&String, &u16)> = self.info.symbols.iter().collect();
        labels.sort_by_key(|(_, addr)| **addr);
        for (name, addr) in labels {
            writeln!(self.out, "${:04X}  {}", addr, name)?;
        }
        Ok(())
    }

    fn print_line(&mut self) -> Result<(), DebugError> {
        let pc = self.cpu.pc;
        if let Some((line, text)) = self.info.line_at(pc) {
            writeln!(self.out, "{}\t{}", line, text)?;
            return Ok(());
        }
        match disasm(self.cpu.mem(), pc) {
            Ok((_, text)) => writeln!(self.out, "${:04X}\t{}", pc, text)?,
            Err(e) => writeln!(self.out, "${:04X}\t{}", pc, e)?,
        }
        Ok(())
    }

    fn save_session<P: AsRef<Path>>(&mut self, path: P) -> Result<(), DebugError> {
        let session = SessionFile {
            version: SESSION_VERSION,
            breaks: self
                .breaks
                .iter()
                .map(|b| (b.addr, b.label.clone()))
                .collect(),
            taps: self.taps.iter().map(|t| (t.name.clone(), t.addr)).collect(),
        };
        session.save(&path)?;
        writeln!(
            self.out,
            "Saved {} breakpoints and {} taps to {}",
            self.breaks.len(),
            self.taps.len(),
            path.as_ref().display()
        )?;
        Ok(())
    }

    ///
    /// Replaces breakpoints and taps with the saved ones. A stored breakpoint
    /// whose label is not a known symbol is skipped.
    ///
    fn load_session<P: AsRef<Path>>(&mut self, path: P) -> Result<(), DebugError> {
        let session = SessionFile::load(&path)?;

        self.breaks.clear();
        self.taps.clear();
        for label in session.breaks.values() {
            match self.info.symbol(label) {
                Some(addr) => {
                    self.breaks.add(addr, label);
                }
                None => debug!("Skipping saved breakpoint {}", label),
            }
        }
        for (name, addr) in session.taps.into_iter() {
            self.taps.add(name, addr);
        }

        writeln!(
            self.out,
            "Loaded {} breakpoints and {} taps from {}",
            self.breaks.len(),
            self.taps.len(),
            path.as_ref().display()
        )?;
        Ok(())
    }
}
