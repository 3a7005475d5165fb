use crossbeam_channel as cbc;
use std::time::Duration;

/// Why a clock stopped waiting.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Wake {
    Tick,
    Stop,
}

/**
 * Paces the tick loop.
 *
 * `wait` blocks until the next tick is due or the stop signal fires. A
 * disconnected stop channel counts as a stop signal.
 */
pub trait Clock {
    fn period(&self) -> Duration;

    fn wait(&self, stop_rx: &cbc::Receiver<()>) -> Wake;
}

/// Wall-clock pacing: one tick per period.
#[derive(Debug, Clone, Copy)]
pub struct SystemClock {
    period: Duration,
}

impl SystemClock {
    pub fn new(period: Duration) -> SystemClock {
        SystemClock { period }
    }
}

impl Clock for SystemClock {
    fn period(&self) -> Duration {
        self.period
    }

    fn wait(&self, stop_rx: &cbc::Receiver<()>) -> Wake {
        cbc::select! {
            recv(stop_rx) -> _ => Wake::Stop,
            default(self.period) => Wake::Tick,
        }
    }
}

/**
 * Clock that only ticks when pulsed, for deterministic tests.
 *
 * Dropping every pulse sender stops the loop after the tick in progress.
 */
pub struct ManualClock {
    pulse_rx: cbc::Receiver<()>,
}

impl ManualClock {
    /// Returns the clock and its pulse sender. Sends block until the loop takes the pulse.
    pub fn new() -> (ManualClock, cbc::Sender<()>) {
        let (pulse_tx, pulse_rx) = cbc::bounded::<()>(0);
        (ManualClock { pulse_rx }, pulse_tx)
    }
}

impl Clock for ManualClock {
    fn period(&self) -> Duration {
        Duration::ZERO
    }

    fn wait(&self, stop_rx: &cbc::Receiver<()>) -> Wake {
        cbc::select! {
            recv(stop_rx) -> _ => Wake::Stop,
            recv(self.pulse_rx) -> pulse => match pulse {
                Ok(()) => Wake::Tick,
                Err(_) => Wake::Stop,
            },
        }
    }
}
