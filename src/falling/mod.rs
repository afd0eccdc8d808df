//! Falling-words arcade mode: session state and the fixed-interval simulation step.
//!
//! Words fall from the top of the field; typing a word shoots it down. A word that
//! reaches the shield costs a life, and the session ends when no lives remain.
//! Speed and spawn rate ramp up with elapsed ticks (see [`difficulty`]).

pub mod cycle;
pub mod difficulty;
pub mod entity;
pub mod grid;
pub mod placement;
pub mod targeting;

use crate::words::{ContentMode, WordSource};
use entity::{Explosion, FallingWord, LaserBeam};
use rand::SeedableRng;
use rand::rngs::StdRng;
use std::time::Duration;
use targeting::Turret;
use tracing::{debug, info};

/// Simulation step interval.
pub const TICK_INTERVAL: Duration = Duration::from_millis(150);
pub const START_LIVES: u32 = 3;
/// Rows below the play field reserved for status, shield, input and hint lines.
pub const HUD_ROWS: u16 = 6;
pub const MIN_PLAY_HEIGHT: u16 = 5;
pub const MIN_PLAY_WIDTH: u16 = 20;
/// Number of distinct destroy sounds a collaborator may pick from.
pub const DESTROY_VARIANTS: u8 = 4;

/// Something a sound player may react to. At most one is reported per tick or key.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Cue {
    Hit,
    Destroy(u8),
    GameOver,
}

/// Final totals of a finished session.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Summary {
    pub score: u32,
    pub chars_typed: usize,
    pub survived: Duration,
}

impl Summary {
    /// Words per minute using the 5-characters-per-word convention; elapsed time floored at 1 s.
    pub fn wpm(&self) -> f64 {
        let secs = self.survived.as_secs_f64().max(1.0);
        (self.chars_typed as f64 / 5.0) / (secs / 60.0)
    }
}

/// Play field size for a terminal size, with minimum floors.
pub fn play_area(screen_width: u16, screen_height: u16) -> (u16, u16) {
    (
        screen_width.max(MIN_PLAY_WIDTH),
        screen_height.saturating_sub(HUD_ROWS).max(MIN_PLAY_HEIGHT),
    )
}

#[derive(Debug)]
pub struct FallingGame {
    pub words: Vec<FallingWord>,
    pub explosions: Vec<Explosion>,
    pub laser: Option<LaserBeam>,
    pub lives: u32,
    /// Words destroyed.
    pub score: u32,
    /// Rows per tick.
    pub speed: f64,
    pub ticks: u64,
    pub game_over: bool,
    pub turret: Turret,
    /// Characters of destroyed words, for the words-per-minute figure.
    pub chars_typed: usize,
    pub summary: Option<Summary>,
    input: String,
    target: Option<usize>,
    spawn_countdown: i32,
    screen_width: u16,
    screen_height: u16,
    content: ContentMode,
    source: Box<dyn WordSource>,
    rng: StdRng,
}

impl FallingGame {
    pub fn new(
        screen_width: u16,
        screen_height: u16,
        content: ContentMode,
        source: Box<dyn WordSource>,
        seed: Option<u64>,
    ) -> Self {
        let rng = match seed {
            Some(s) => StdRng::seed_from_u64(s),
            None => StdRng::from_os_rng(),
        };
        let (play_width, _) = play_area(screen_width, screen_height);
        Self {
            words: Vec::new(),
            explosions: Vec::new(),
            laser: None,
            lives: START_LIVES,
            score: 0,
            speed: difficulty::speed_for_tick(0),
            ticks: 0,
            game_over: false,
            turret: Turret::at(i32::from(play_width) / 2),
            chars_typed: 0,
            summary: None,
            input: String::new(),
            target: None,
            spawn_countdown: 0,
            screen_width,
            screen_height,
            content,
            source,
            rng,
        }
    }

    /// Throw away every entity and counter and start over. Word source, RNG and
    /// screen size carry over.
    pub fn restart(&mut self) {
        let (play_width, _) = self.play_area();
        self.words = Vec::new();
        self.explosions = Vec::new();
        self.laser = None;
        self.lives = START_LIVES;
        self.score = 0;
        self.speed = difficulty::speed_for_tick(0);
        self.ticks = 0;
        self.game_over = false;
        self.turret = Turret::at(i32::from(play_width) / 2);
        self.chars_typed = 0;
        self.summary = None;
        self.input.clear();
        self.target = None;
        self.spawn_countdown = 0;
        info!(content = self.content.label(), "falling session restarted");
    }

    pub fn resize(&mut self, screen_width: u16, screen_height: u16) {
        self.screen_width = screen_width;
        self.screen_height = screen_height;
    }

    /// (width, height) of the play grid.
    pub fn play_area(&self) -> (u16, u16) {
        play_area(self.screen_width, self.screen_height)
    }

    /// Row at which a word breaches the shield.
    pub fn boundary_row(&self) -> i32 {
        i32::from(self.play_area().1)
    }

    pub fn content(&self) -> ContentMode {
        self.content
    }

    /// What the player has typed toward the current target.
    pub fn input(&self) -> &str {
        &self.input
    }

    pub fn target_word(&self) -> Option<&FallingWord> {
        self.target.and_then(|i| self.words.get(i))
    }

    /// Survival time so far, counted in simulation ticks.
    pub fn survival_time(&self) -> Duration {
        TICK_INTERVAL.saturating_mul(u32::try_from(self.ticks).unwrap_or(u32::MAX))
    }

    fn current_summary(&self) -> Summary {
        Summary {
            score: self.score,
            chars_typed: self.chars_typed,
            survived: self.survival_time(),
        }
    }

    /// Advance the simulation one step. Does nothing once the game is over.
    pub fn tick(&mut self) -> Option<Cue> {
        if self.game_over {
            return None;
        }
        self.ticks += 1;

        for fw in &mut self.words {
            fw.y += self.speed;
        }

        self.explosions.retain_mut(|e| {
            e.ticks = e.ticks.saturating_sub(1);
            e.ticks > 0
        });
        if let Some(laser) = &mut self.laser {
            laser.ticks = laser.ticks.saturating_sub(1);
            if laser.ticks == 0 {
                self.laser = None;
            }
        }

        let boundary = self.boundary_row();
        let mut target_text = self.target_word().map(|fw| fw.word.clone());
        let lives_before = self.lives;

        let (survived, breached): (Vec<FallingWord>, Vec<FallingWord>) =
            std::mem::take(&mut self.words)
                .into_iter()
                .partition(|fw| fw.row() < boundary);
        self.words = survived;

        for fw in &breached {
            self.lives = self.lives.saturating_sub(1);
            debug!(word = %fw.word, lives = self.lives, "word breached the shield");
            if fw.active {
                self.input.clear();
                target_text = None;
            }
            if self.lives == 0 {
                self.game_over = true;
                self.target = None;
                self.input.clear();
                for fw in &mut self.words {
                    fw.active = false;
                    fw.typed = 0;
                }
                let summary = self.current_summary();
                info!(
                    score = summary.score,
                    ticks = self.ticks,
                    wpm = summary.wpm(),
                    "falling session over"
                );
                self.summary = Some(summary);
                return Some(Cue::GameOver);
            }
        }

        self.target = None;
        if let Some(text) = target_text {
            self.target = self
                .words
                .iter()
                .position(|fw| fw.active && fw.word == text);
            if self.target.is_none() {
                self.input.clear();
            }
        }

        self.spawn_countdown -= 1;
        if self.spawn_countdown <= 0 {
            self.spawn_countdown = if self.spawn_word() {
                difficulty::spawn_interval(self.ticks) as i32
            } else {
                placement::SPAWN_RETRY_TICKS
            };
        }

        self.speed = difficulty::speed_for_tick(self.ticks);

        (self.lives < lives_before).then_some(Cue::Hit)
    }

    /// Place a fresh word at the top. Returns false when no free column was found.
    fn spawn_word(&mut self) -> bool {
        let word = self.source.next_word(self.content);
        let (play_width, _) = self.play_area();
        match placement::choose_column(&self.words, &word, i32::from(play_width), &mut self.rng)
        {
            Some(x) => {
                self.words.push(FallingWord::new(word, x));
                true
            }
            None => {
                debug!(%word, "no free spawn column, deferring");
                false
            }
        }
    }
}

#[cfg(test)]
pub(crate) mod test_support {
    use crate::words::{ContentMode, WordSource};
    use std::collections::VecDeque;

    /// Hands out a fixed list of words, then repeats the last one.
    #[derive(Debug, Default)]
    pub struct ScriptedWords {
        queue: VecDeque<String>,
        last: String,
    }

    impl ScriptedWords {
        pub fn new(words: &[&str]) -> Self {
            Self {
                queue: words.iter().map(|w| (*w).to_string()).collect(),
                last: "zz".to_string(),
            }
        }
    }

    impl WordSource for ScriptedWords {
        fn next_word(&mut self, _mode: ContentMode) -> String {
            if let Some(w) = self.queue.pop_front() {
                self.last.clone_from(&w);
                w
            } else {
                self.last.clone()
            }
        }
    }

    pub fn game(words: &[&str]) -> super::FallingGame {
        super::FallingGame::new(
            80,
            30,
            ContentMode::Words,
            Box::new(ScriptedWords::new(words)),
            Some(11),
        )
    }
}

#[cfg(test)]
mod tests {
    use super::test_support::game;
    use super::*;

    fn close(a: f64, b: f64) -> bool {
        (a - b).abs() < 1e-9
    }

    #[test]
    fn test_new_session() {
        let g = game(&[]);
        assert_eq!(g.lives, 3);
        assert_eq!(g.score, 0);
        assert!(close(g.speed, 0.3));
        assert!(!g.game_over);
        assert_eq!(g.turret.x, 40);
        assert_eq!(g.boundary_row(), 24);
    }

    #[test]
    fn test_play_area_floors() {
        assert_eq!(play_area(0, 0), (MIN_PLAY_WIDTH, MIN_PLAY_HEIGHT));
        assert_eq!(play_area(100, 40), (100, 34));
        assert_eq!(play_area(10, 9), (20, 5));
    }

    #[test]
    fn test_first_tick_spawns_at_top() {
        let mut g = game(&["quick"]);
        assert_eq!(g.tick(), None);
        assert_eq!(g.words.len(), 1);
        assert_eq!(g.words[0].word, "quick");
        assert!(close(g.words[0].y, 0.0));
        assert_eq!(g.spawn_countdown, 20);
    }

    #[test]
    fn test_words_fall_by_speed() {
        let mut g = game(&["quick"]);
        g.tick();
        g.tick();
        assert!(close(g.words[0].y, 0.3));
    }

    #[test]
    fn test_difficulty_follows_ticks() {
        let mut g = game(&[]);
        for _ in 0..67 {
            g.tick();
            // Keep the field clear so nothing breaches.
            g.words.clear();
        }
        assert!(close(g.speed, 0.35));
        assert_eq!(difficulty::spawn_interval(g.ticks), 18);
    }

    #[test]
    fn test_breach_costs_one_life() {
        let mut g = game(&[]);
        g.spawn_countdown = 100;
        let mut w = FallingWord::new("late", 10);
        w.y = 23.8;
        g.words.push(w);
        g.words.push(FallingWord::new("early", 40));
        assert_eq!(g.tick(), Some(Cue::Hit));
        assert_eq!(g.lives, 2);
        assert_eq!(g.words.len(), 1);
        assert_eq!(g.words[0].word, "early");
    }

    #[test]
    fn test_breach_of_target_clears_input() {
        let mut g = game(&[]);
        g.spawn_countdown = 100;
        let mut w = FallingWord::new("late", 10);
        w.y = 23.9;
        g.words.push(w);
        g.type_char('l');
        assert_eq!(g.target, Some(0));
        g.tick();
        assert_eq!(g.target, None);
        assert_eq!(g.input(), "");
        assert!(g.words.iter().all(|fw| !fw.active));
    }

    #[test]
    fn test_target_index_follows_removals() {
        let mut g = game(&[]);
        g.spawn_countdown = 100;
        let mut doomed = FallingWord::new("gone", 10);
        doomed.y = 23.9;
        g.words.push(doomed);
        g.words.push(FallingWord::new("stay", 40));
        g.type_char('s');
        assert_eq!(g.target, Some(1));
        g.tick();
        assert_eq!(g.target, Some(0));
        assert_eq!(g.input(), "s");
        assert!(g.words[0].active);
    }

    #[test]
    fn test_game_over_once() {
        let mut g = game(&[]);
        g.lives = 1;
        g.spawn_countdown = 100;
        for x in [10, 30] {
            let mut w = FallingWord::new("boom", x);
            w.y = 30.0;
            g.words.push(w);
        }
        assert_eq!(g.tick(), Some(Cue::GameOver));
        assert!(g.game_over);
        assert_eq!(g.lives, 0);
        let summary = g.summary.expect("summary");
        assert_eq!(summary.score, 0);

        let frozen_ticks = g.ticks;
        let frozen_words = g.words.clone();
        assert_eq!(g.tick(), None);
        assert_eq!(g.ticks, frozen_ticks);
        assert_eq!(g.words, frozen_words);
    }

    #[test]
    fn test_game_over_releases_surviving_target() {
        let mut g = game(&[]);
        g.lives = 1;
        g.spawn_countdown = 100;
        let mut doomed = FallingWord::new("boom", 10);
        doomed.y = 23.9;
        g.words.push(doomed);
        g.words.push(FallingWord::new("stay", 40));
        g.type_char('s');
        assert!(g.words[1].active);

        assert_eq!(g.tick(), Some(Cue::GameOver));
        assert_eq!(g.input(), "");
        assert_eq!(g.target, None);
        assert_eq!(g.words.len(), 1);
        assert!(!g.words[0].active);
        assert_eq!(g.words[0].typed, 0);
    }

    #[test]
    fn test_three_breaches_end_the_game() {
        let mut g = game(&[]);
        g.spawn_countdown = 1000;
        let mut cues = Vec::new();
        for x in [10, 30, 50] {
            let mut w = FallingWord::new("boom", x);
            w.y = 23.9;
            g.words.push(w);
            cues.push(g.tick());
        }
        assert_eq!(cues, vec![Some(Cue::Hit), Some(Cue::Hit), Some(Cue::GameOver)]);
    }

    #[test]
    fn test_effects_expire() {
        let mut g = game(&[]);
        g.spawn_countdown = 100;
        g.explosions.push(Explosion::new(5, 5));
        g.laser = Some(LaserBeam::new(5, 24, 4));
        for _ in 0..3 {
            g.tick();
        }
        assert!(g.laser.is_none());
        assert_eq!(g.explosions.len(), 1);
        g.tick();
        assert!(g.explosions.is_empty());
    }

    #[test]
    fn test_blocked_spawn_retries_soon() {
        // Narrow screen: only column 7 exists, and it is taken.
        let mut g = FallingGame::new(
            20,
            30,
            ContentMode::Words,
            Box::new(test_support::ScriptedWords::new(&["abc", "xyz"])),
            Some(1),
        );
        g.tick();
        assert_eq!(g.words.len(), 1);
        g.spawn_countdown = 1;
        g.speed = 0.0;
        g.tick();
        assert_eq!(g.words.len(), 1);
        assert_eq!(g.spawn_countdown, placement::SPAWN_RETRY_TICKS);
    }

    #[test]
    fn test_restart_discards_everything() {
        let mut g = game(&["quick"]);
        g.tick();
        g.type_char('q');
        g.lives = 1;
        g.score = 4;
        g.laser = Some(LaserBeam::new(1, 2, 0));
        g.restart();
        assert!(g.words.is_empty());
        assert!(g.laser.is_none());
        assert_eq!(g.input(), "");
        assert_eq!(g.target, None);
        assert_eq!((g.lives, g.score, g.ticks), (3, 0, 0));
    }

    #[test]
    fn test_summary_wpm() {
        let s = Summary {
            score: 10,
            chars_typed: 50,
            survived: Duration::from_secs(60),
        };
        assert!(close(s.wpm(), 10.0));
        let quick = Summary {
            score: 1,
            chars_typed: 5,
            survived: Duration::ZERO,
        };
        assert!(close(quick.wpm(), 60.0));
    }
}
