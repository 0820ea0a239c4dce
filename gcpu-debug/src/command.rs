//! Debugger command grammar.
//!
//! Input is split into whitespace separated words and matched against an
//! ordered table. The first entry whose keywords and argument shape fit wins.

use gcpu_core::utils::{is_symbol_name, parse_literal};

use crate::error::DebugError;

/// Argument of `tap` and `break`: a numeric literal or a symbol name.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Target {
    Literal(u32),
    Label(String),
}

impl Target {
    fn parse(tok: &str) -> Option<Target> {
        match parse_literal(tok) {
            Some(v) => Some(Target::Literal(v)),
            None if is_symbol_name(tok) => Some(Target::Label(tok.to_lowercase())),
            None => None,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Command {
    Step(u32),
    Run,
    Continue,
    Tap(Target),
    Break(Target),
    DeleteBreak(usize),
    DeleteTap(usize),
    InfoBreakpoints,
    InfoRegisters,
    InfoTaps,
    ListLabels,
    PrintLine,
    Save(Option<String>),
    Load(Option<String>),
    Help,
    Quit,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Arity {
    Zero,
    Optional,
    One,
}

struct Pattern {
    words: &'static [&'static str],
    arity: Arity,
    /// Command produced on a match. Argument-carrying variants are
    /// placeholders filled in by `build`.
    proto: Command,
}

const fn pat(words: &'static [&'static str], arity: Arity, proto: Command) -> Pattern {
    Pattern {
        words,
        arity,
        proto,
    }
}

const ANY: Target = Target::Literal(0);

static GRAMMAR: [Pattern; 22] = [
    pat(&["step"], Arity::Optional, Command::Step(1)),
    pat(&["s"], Arity::Optional, Command::Step(1)),
    pat(&["run"], Arity::Zero, Command::Run),
    pat(&["r"], Arity::Zero, Command::Run),
    pat(&["continue"], Arity::Zero, Command::Continue),
    pat(&["c"], Arity::Zero, Command::Continue),
    pat(&["tap"], Arity::One, Command::Tap(ANY)),
    pat(&["break"], Arity::One, Command::Break(ANY)),
    pat(&["b"], Arity::One, Command::Break(ANY)),
    pat(&["delete", "break"], Arity::One, Command::DeleteBreak(0)),
    pat(&["delete", "tap"], Arity::One, Command::DeleteTap(0)),
    pat(&["info", "breakpoints"], Arity::Zero, Command::InfoBreakpoints),
    pat(&["info", "registers"], Arity::Zero, Command::InfoRegisters),
    pat(&["info", "taps"], Arity::Zero, Command::InfoTaps),
    pat(&["list", "labels"], Arity::Zero, Command::ListLabels),
    pat(&["print", "line"], Arity::Zero, Command::PrintLine),
    pat(&["save"], Arity::Optional, Command::Save(None)),
    pat(&["load"], Arity::Optional, Command::Load(None)),
    pat(&["help"], Arity::Zero, Command::Help),
    pat(&["h"], Arity::Zero, Command::Help),
    pat(&["quit"], Arity::Zero, Command::Quit),
    pat(&["q"], Arity::Zero, Command::Quit),
];

/// One line per command, printed by `help`.
pub const HELP: &[(&str, &str)] = &[
    ("step [n]", "execute n instructions (default 1)"),
    ("run", "restart from $0000 and run to a breakpoint"),
    ("continue", "run to the next breakpoint"),
    ("tap <addr|label>", "echo a memory byte after every stop"),
    ("break <line|label>", "stop when PC reaches a source line or label"),
    ("delete break <id>", "remove a breakpoint"),
    ("delete tap <id>", "remove a tap"),
    ("info breakpoints", "list breakpoints"),
    ("info registers", "dump registers"),
    ("info taps", "print the tap table"),
    ("list labels", "list known symbols"),
    ("print line", "show the source line at PC"),
    ("save [file]", "save breakpoints and taps (default debug.json)"),
    ("load [file]", "restore breakpoints and taps (default debug.json)"),
    ("help", "show this text"),
    ("quit", "end the session"),
];

fn build(proto: &Command, arg: Option<&str>) -> Option<Command> {
    let cmd = match (proto, arg) {
        (Command::Step(_), Some(tok)) => Command::Step(parse_literal(tok)?),
        (Command::Tap(_), Some(tok)) => Command::Tap(Target::parse(tok)?),
        (Command::Break(_), Some(tok)) => Command::Break(Target::parse(tok)?),
        (Command::DeleteBreak(_), Some(tok)) => Command::DeleteBreak(tok.parse().ok()?),
        (Command::DeleteTap(_), Some(tok)) => Command::DeleteTap(tok.parse().ok()?),
        (Command::Save(_), Some(tok)) => Command::Save(Some(tok.to_string())),
        (Command::Load(_), Some(tok)) => Command::Load(Some(tok.to_string())),
        (other, _) => other.clone(),
    };
    Some(cmd)
}

fn matches_words(words: &[&str], input: &[&str]) -> bool {
    input.len() >= words.len()
        && words
            .iter()
            .zip(input.iter())
            .all(|(w, i)| w.eq_ignore_ascii_case(i))
}

///
/// ## `parse` Function
///
/// Resolves a line of input against the command grammar.
///
/// # Errors
///
///  - `NotRecognized` if no entry accepts the line.
///
pub fn parse(line: &str) -> Result<Command, DebugError> {
    let input: Vec<&str> = line.split_whitespace().collect();

    for p in GRAMMAR.iter() {
        if !matches_words(p.words, &input) {
            continue;
        }
        let rest = &input[p.words.len()..];
        let arg = match (p.arity, rest.len()) {
            (Arity::Zero, 0) | (Arity::Optional, 0) => None,
            (Arity::Optional, 1) | (Arity::One, 1) => Some(rest[0]),
            _ => continue,
        };
        if let Some(cmd) = build(&p.proto, arg) {
            return Ok(cmd);
        }
    }

    Err(DebugError::NotRecognized(line.trim().to_string()))
}
