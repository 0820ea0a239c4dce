extern crate clap;

use std::error::Error;
use std::fs;
use std::io::BufRead;
use std::path::Path;

use log::{debug, error, info, warn};

use gcpu_asm::output::write_outputs;
use gcpu_core::clock::{CancelToken, ClockConfig, GClock, Pacing, StopReason};
use gcpu_core::consts::{clock, io};
use gcpu_core::io::{InputEvent, IoMap, IoPort};
use gcpu_core::utils::parse_literal;
use gcpu_core::{DebugInfo, GCpu, MemoryImage};
use gcpu_debug::Debugger;

type CliResult = Result<(), Box<dyn Error>>;

fn fetch_config<'a>() -> clap::ArgMatches<'a> {
    let about = "Toolchain for the G-CPU: assembler, paced emulator and breakpoint debugger";
    let rom_arg = clap::Arg::with_name("rom")
        .long("rom")
        .takes_value(true)
        .default_value("rom.mif")
        .help("ROM image (MIF)");
    let ram_arg = clap::Arg::with_name("ram")
        .long("ram")
        .takes_value(true)
        .default_value("ram.mif")
        .help("RAM image (MIF)");

    let c = clap::App::new("G-CPU Toolchain")
        .version("0.1")
        .about(about)
        .setting(clap::AppSettings::SubcommandRequiredElseHelp)
        .subcommand(
            clap::SubCommand::with_name("asm")
                .about("Assemble a source file into rom.mif, ram.mif and symbols.json")
                .arg(
                    clap::Arg::with_name("source")
                        .index(1)
                        .required(true)
                        .help("Assembly source file"),
                )
                .arg(
                    clap::Arg::with_name("out-dir")
                        .long("out-dir")
                        .takes_value(true)
                        .default_value(".")
                        .help("Directory receiving the output files"),
                ),
        )
        .subcommand(
            clap::SubCommand::with_name("run")
                .about("Run the loaded images on a paced clock until Ctrl-C. Input events are read from stdin: `down N`, `up N`, `ptr X Y STATE`")
                .arg(rom_arg.clone())
                .arg(ram_arg.clone())
                .arg(
                    clap::Arg::with_name("rate")
                        .long("rate")
                        .takes_value(true)
                        .help("Instructions per second, 0 for unpaced (default 1100)"),
                )
                .arg(
                    clap::Arg::with_name("accurate")
                        .long("accurate")
                        .help("Busy-wait against a deadline instead of sleeping"),
                )
                .arg(
                    clap::Arg::with_name("io-base")
                        .long("io-base")
                        .takes_value(true)
                        .help("Memory-mapped I/O base address ($hex, %bin or decimal)"),
                )
                .arg(
                    clap::Arg::with_name("sticky")
                        .long("sticky")
                        .help("Input lines latch until another line is pressed"),
                )
                .arg(
                    clap::Arg::with_name("max-steps")
                        .long("max-steps")
                        .takes_value(true)
                        .help("Stop after this many instructions"),
                ),
        )
        .subcommand(
            clap::SubCommand::with_name("debug")
                .about("Interactive breakpoint debugger")
                .arg(rom_arg)
                .arg(ram_arg)
                .arg(
                    clap::Arg::with_name("symbols")
                        .long("symbols")
                        .takes_value(true)
                        .default_value("symbols.json")
                        .help("Debug symbols written by the assembler"),
                ),
        );
    c.get_matches()
}

fn number_arg(m: &clap::ArgMatches, name: &str) -> Result<Option<u32>, String> {
    match m.value_of(name) {
        Some(text) => match parse_literal(text) {
            Some(v) => Ok(Some(v)),
            None => Err(format!("invalid value for --{}: {}", name, text)),
        },
        None => Ok(None),
    }
}

fn assemble_file(m: &clap::ArgMatches) -> CliResult {
    let source = m.value_of("source").unwrap_or_default();
    let out_dir = m.value_of("out-dir").unwrap_or(".");

    let text = fs::read_to_string(source)?;
    let asm = gcpu_asm::assemble(&text)?;
    for d in asm.diagnostics.iter() {
        warn!("{}: {}", source, d);
    }

    write_outputs(&asm, Path::new(out_dir))?;
    info!(
        "Assembled {} into {} ({} bytes, {} symbols)",
        source,
        out_dir,
        asm.memory.len(),
        asm.symbols().len()
    );
    Ok(())
}

fn load_cpu(m: &clap::ArgMatches) -> Result<GCpu, Box<dyn Error>> {
    let rom = m.value_of("rom").unwrap_or("rom.mif");
    let ram = m.value_of("ram").unwrap_or("ram.mif");
    let mm = MemoryImage::load(rom, ram)?;
    Ok(GCpu::new(mm))
}

///
/// Feeds input events typed on stdin into the I/O port until stdin closes or
/// the clock stops consuming them.
///
fn spawn_input_listener(port: IoPort) {
    std::thread::spawn(move || {
        let stdin = std::io::stdin();
        for line in stdin.lock().lines() {
            let line = match line {
                Ok(l) => l,
                Err(_) => break,
            };
            if line.trim().is_empty() {
                continue;
            }
            match InputEvent::parse(&line) {
                Some(ev) => {
                    if !port.send(ev) {
                        break;
                    }
                }
                None => warn!("Ignoring input `{}`", line.trim()),
            }
        }
        debug!("Input listener done");
    });
}

fn run_clock(m: &clap::ArgMatches, cancel: CancelToken) -> CliResult {
    let mut cpu = load_cpu(m)?;

    let rate_hz = number_arg(m, "rate")?.unwrap_or(clock::DEFAULT_RATE_HZ);
    let max_steps = number_arg(m, "max-steps")?.map(|v| v as u64);
    let base = number_arg(m, "io-base")?.unwrap_or(io::DEFAULT_IO_BASE as u32);
    if base > 0xFFFF {
        return Err(format!("--io-base ${:X} is outside of the address space", base).into());
    }

    let config = ClockConfig {
        rate_hz,
        pacing: if m.is_present("accurate") {
            Pacing::BusyWait
        } else {
            Pacing::Sleep
        },
        max_steps,
    };
    let map = IoMap {
        base: base as u16,
        sticky: m.is_present("sticky"),
        ..IoMap::default()
    };

    // The listener only queues writes; the clock thread is the only writer
    let (port, io_rx) = IoPort::new(map);
    info!(
        "I/O window at ${:04X}, {} input lines from ${:04X}{}",
        map.base,
        map.line_count,
        map.line_addr(0),
        if map.sticky { " (sticky)" } else { "" }
    );
    spawn_input_listener(port);

    let handle = std::thread::spawn(move || {
        let mut clk = GClock::new(config).with_io(io_rx);
        let res = clk.run(&mut cpu, &cancel);
        (cpu, res)
    });

    let (cpu, res) = match handle.join() {
        Ok(r) => r,
        Err(_) => return Err("execution thread panicked".into()),
    };

    cpu.print_state();

    match res {
        Ok(StopReason::Cancelled) => info!("Stopped by user"),
        Ok(StopReason::StepLimit) => info!("Step limit reached"),
        Err(e) => return Err(e.into()),
    }
    Ok(())
}

fn debug_session(m: &clap::ArgMatches, cancel: CancelToken) -> CliResult {
    let cpu = load_cpu(m)?;
    let symbols = m.value_of("symbols").unwrap_or("symbols.json");
    let dbg_info = match DebugInfo::load(symbols) {
        Ok(i) => i,
        Err(e) => {
            warn!("No debug symbols from {}: {}", symbols, e);
            DebugInfo::new()
        }
    };

    let stdin = std::io::stdin();
    let mut dbg = Debugger::new(cpu, dbg_info, stdin.lock(), std::io::stdout()).with_cancel(cancel);
    dbg.run_repl()?;
    Ok(())
}

fn main() {
    env_logger::init();

    // Ctrl-C trips the cancel token. A second Ctrl-C before the first one has
    // been consumed force-exits the application.
    let cancel = CancelToken::new();
    let handler_token = cancel.clone();
    let res = ctrlc::set_handler(move || {
        if handler_token.is_cancelled() {
            std::process::exit(-1);
        }
        handler_token.cancel();
    });

    if let Err(x) = res {
        error!("Unable to register signal handler. {:?}.", x);
        return;
    }

    let matches = fetch_config();
    let res = match matches.subcommand() {
        ("asm", Some(m)) => assemble_file(m),
        ("run", Some(m)) => run_clock(m, cancel),
        ("debug", Some(m)) => debug_session(m, cancel),
        _ => {
            error!("Invalid subcommand. Exiting");
            std::process::exit(2);
        }
    };

    if let Err(e) = res {
        error!("{}", e);
        std::process::exit(1);
    }
}
