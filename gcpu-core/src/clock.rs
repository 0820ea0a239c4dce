use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::time::{Duration, Instant};

use crossbeam_channel::Receiver;
use log::{info, warn};

use crate::consts::clock;
use crate::cpu::GCpu;
use crate::error::CpuError;
use crate::io::IoWrite;

/// How the execution loop waits between instructions.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Pacing {
    /// Spins against an absolute deadline. Precise, burns a core.
    BusyWait,
    /// Sleeps one period after each instruction.
    Sleep,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ClockConfig {
    /// Instructions per second. Zero runs unpaced.
    pub rate_hz: u32,
    pub pacing: Pacing,
    pub max_steps: Option<u64>,
}

impl Default for ClockConfig {
    fn default() -> Self {
        ClockConfig {
            rate_hz: clock::DEFAULT_RATE_HZ,
            pacing: Pacing::Sleep,
            max_steps: None,
        }
    }
}

///
/// Shared run/cancel signal. Every loop polls it at its iteration boundary.
///
#[derive(Debug, Clone, Default)]
pub struct CancelToken(Arc<AtomicBool>);

impl CancelToken {
    pub fn new() -> CancelToken {
        CancelToken(Arc::new(AtomicBool::new(false)))
    }

    pub fn cancel(&self) {
        self.0.store(true, Ordering::SeqCst);
    }

    pub fn is_cancelled(&self) -> bool {
        self.0.load(Ordering::SeqCst)
    }

    ///
    /// Clears the signal, returning whether it was set. Used by sessions that
    /// survive an interrupt.
    ///
    pub fn take(&self) -> bool {
        self.0.swap(false, Ordering::SeqCst)
    }
}

/// Why a clock run ended without a fault.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StopReason {
    Cancelled,
    StepLimit,
}

///
/// Paced execution driver. The clock is the single writer of the memory it
/// runs against: queued I/O writes are applied between instructions.
///
pub struct GClock {
    config: ClockConfig,
    io_rx: Option<Receiver<IoWrite>>,
}

impl GClock {
    pub fn new(config: ClockConfig) -> GClock {
        GClock {
            config,
            io_rx: None,
        }
    }

    pub fn with_io(mut self, rx: Receiver<IoWrite>) -> GClock {
        self.io_rx = Some(rx);
        self
    }

    fn period(&self) -> Option<Duration> {
        if self.config.rate_hz == 0 {
            None
        } else {
            Some(Duration::from_nanos(
                1_000_000_000 / self.config.rate_hz as u64,
            ))
        }
    }

    fn apply_io(&self, cpu: &mut GCpu) {
        let rx = match &self.io_rx {
            Some(rx) => rx,
            None => return,
        };
        for w in rx.try_iter() {
            if let Err(e) = cpu.write(w.addr as usize, w.value) {
                warn!("Dropping I/O write {:04x}={:02x}: {}", w.addr, w.value, e);
            }
        }
    }

    ///
    /// ## `run` Function
    ///
    /// Steps the CPU until cancelled, the step limit is reached, or an
    /// instruction faults. Faults are returned to the caller as is.
    ///
    pub fn run(&mut self, cpu: &mut GCpu, cancel: &CancelToken) -> Result<StopReason, CpuError> {
        let period = self.period();
        let mut deadline = Instant::now();
        let mut steps: u64 = 0;

        info!(
            "Clock running at {} Hz ({:?})",
            self.config.rate_hz, self.config.pacing
        );

        loop {
            if cancel.is_cancelled() {
                return Ok(StopReason::Cancelled);
            }
            if let Some(limit) = self.config.max_steps {
                if steps >= limit {
                    return Ok(StopReason::StepLimit);
                }
            }

            self.apply_io(cpu);
            cpu.step()?;
            steps += 1;

            if let Some(period) = period {
                match self.config.pacing {
                    Pacing::BusyWait => {
                        deadline += period;
                        while Instant::now() < deadline {
                            std::hint::spin_loop();
                        }
                    }
                    Pacing::Sleep => std::thread::sleep(period),
                }
            }
        }
    }
}
