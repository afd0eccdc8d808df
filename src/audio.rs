//! Sound cues from the falling-words game. Playing a cue can never fail the game:
//! players log and swallow their own errors.

use crate::falling::Cue;
use std::io::Write;
use tracing::debug;

pub trait CuePlayer {
    fn play(&mut self, cue: Cue);
}

/// Plays nothing.
#[derive(Debug, Default, Clone, Copy)]
pub struct Silent;

impl CuePlayer for Silent {
    fn play(&mut self, _cue: Cue) {}
}

/// Rings the terminal bell (BEL) on the given writer: once per hit or kill,
/// twice on game over.
#[derive(Debug)]
pub struct TerminalBell<W: Write> {
    out: W,
}

impl<W: Write> TerminalBell<W> {
    pub fn new(out: W) -> Self {
        Self { out }
    }

    fn ring(&mut self, times: usize) -> std::io::Result<()> {
        for _ in 0..times {
            self.out.write_all(b"\x07")?;
        }
        self.out.flush()
    }
}

impl<W: Write> CuePlayer for TerminalBell<W> {
    fn play(&mut self, cue: Cue) {
        let times = match cue {
            Cue::Hit | Cue::Destroy(_) => 1,
            Cue::GameOver => 2,
        };
        if let Err(e) = self.ring(times) {
            debug!(error = %e, ?cue, "bell failed");
        }
    }
}
