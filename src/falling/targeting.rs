//! Keystroke targeting: committing to a word, tracking progress, shooting it down.

use super::entity::{Explosion, LaserBeam};
use super::{Cue, DESTROY_VARIANTS, FallingGame};
use rand::Rng;
use tracing::debug;

/// Turret on the shield. Motion is recomputed from `start` and the typed fraction
/// rather than stepped, so it lands on the target exactly when the word is done.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Turret {
    /// Where the turret was when the current target was committed.
    pub start: i32,
    pub x: i32,
}

impl Turret {
    pub fn at(x: i32) -> Self {
        Self { start: x, x }
    }

    pub fn anchor(&mut self) {
        self.start = self.x;
    }

    /// Move `typed / len` of the way from `start` to `target_x`.
    pub fn aim(&mut self, target_x: i32, typed: usize, len: usize) {
        if len == 0 {
            return;
        }
        let fraction = (typed as f64 / len as f64).min(1.0);
        self.x = self.start + (fraction * f64::from(target_x - self.start)) as i32;
    }
}

impl FallingGame {
    /// Index of the lowest non-active word starting with `c`.
    pub fn find_target(&self, c: char) -> Option<usize> {
        self.words
            .iter()
            .enumerate()
            .filter(|(_, fw)| !fw.active && fw.first_char() == Some(c))
            .max_by(|(_, a), (_, b)| a.y.total_cmp(&b.y))
            .map(|(i, _)| i)
    }

    /// Feed one typed character. Returns [`Cue::Destroy`] when it completes the target.
    pub fn type_char(&mut self, c: char) -> Option<Cue> {
        if self.game_over {
            return None;
        }

        match self.target {
            None => match self.find_target(c) {
                Some(idx) => {
                    self.input.clear();
                    self.input.push(c);
                    let fw = &mut self.words[idx];
                    fw.active = true;
                    fw.typed = 1;
                    self.target = Some(idx);
                    self.turret.anchor();
                }
                // Miss: nothing to lock on to.
                None => self.input.push(c),
            },
            Some(idx) => {
                self.input.push(c);
                let typed = self.input.chars().count();
                if let Some(fw) = self.words.get_mut(idx) {
                    fw.typed = typed;
                }
            }
        }

        let idx = self.target?;
        let target = self.words.get(idx)?;
        let (center, typed, len) = (target.center_x(), target.typed, target.len());
        let done = self.input == target.word;
        self.turret.aim(center, typed, len);

        done.then(|| self.destroy(idx))
    }

    /// Shoot down the word at `idx`, which must be the current target.
    fn destroy(&mut self, idx: usize) -> Cue {
        let fw = self.words.remove(idx);
        let (center, row) = (fw.center_x(), fw.row());

        self.laser = Some(LaserBeam::new(center, self.boundary_row(), row - 1));
        self.explosions.push(Explosion::new(center, row));
        self.turret.x = center;
        self.score += 1;
        self.chars_typed += fw.len();
        self.target = None;
        self.input.clear();
        debug!(word = %fw.word, score = self.score, "word destroyed");

        Cue::Destroy(self.rng.random_range(0..DESTROY_VARIANTS))
    }

    /// Remove the last typed character; an empty buffer releases the target.
    pub fn backspace(&mut self) {
        if self.game_over || self.input.pop().is_none() {
            return;
        }
        let typed = self.input.chars().count();
        let Some(idx) = self.target else {
            return;
        };
        if let Some(fw) = self.words.get_mut(idx) {
            fw.typed = typed;
            if typed == 0 {
                fw.active = false;
            }
        }
        if typed == 0 {
            self.target = None;
        }
    }
}
