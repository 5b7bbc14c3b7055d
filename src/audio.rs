//! Audible cue for critical alerts on the patient display.

use std::io::Write;
use std::sync::atomic::{AtomicBool, Ordering};
use std::time::Duration;

/// Tone shape for the critical-alert beep.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Tone {
    pub frequency_hz: f32,
    pub start_gain: f32,
    pub end_gain: f32,
    pub duration: Duration,
}

/// 800 Hz, gain 0.1 decaying to 0.01 over half a second
pub const CRITICAL_ALERT_TONE: Tone = Tone {
    frequency_hz: 800.0,
    start_gain: 0.1,
    end_gain: 0.01,
    duration: Duration::from_millis(500),
};

pub trait AudioCue: Send + Sync {
    /// Play a tone. Failures are swallowed; a missing beep never breaks a render.
    fn play(&self, tone: Tone);

    /// Release the output device. Playing after close is a no-op.
    fn close(&self);
}

/// For displays without speakers.
pub struct Silent;

impl AudioCue for Silent {
    fn play(&self, _tone: Tone) {}

    fn close(&self) {}
}

/// Rings the terminal bell on stderr.
pub struct TerminalBell {
    closed: AtomicBool,
}

impl TerminalBell {
    pub fn new() -> Self {
        Self {
            closed: AtomicBool::new(false),
        }
    }
}

impl Default for TerminalBell {
    fn default() -> Self {
        Self::new()
    }
}

impl AudioCue for TerminalBell {
    fn play(&self, tone: Tone) {
        if self.closed.load(Ordering::SeqCst) {
            return;
        }
        let mut stderr = std::io::stderr();
        if let Err(e) = stderr.write_all(b"\x07").and_then(|_| stderr.flush()) {
            tracing::debug!("Unable to play alert tone ({} Hz): {}", tone.frequency_hz, e);
        }
    }

    fn close(&self) {
        self.closed.store(true, Ordering::SeqCst);
    }
}
