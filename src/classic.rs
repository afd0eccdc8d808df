//! Classic timed typing test.
//!
//! The clock starts on the first key. Each word collects its own input; Space moves
//! on (only once something was typed) and Backspace never crosses back into an
//! earlier word. Scoring uses the usual 5-characters-per-word convention and only
//! counts correct characters (net WPM).

use std::ops::Range;
use std::time::{Duration, Instant};
use tracing::info;

/// Words generated for one test.
pub const TEST_WORDS: usize = 200;
/// Extra characters accepted past the end of a word.
pub const MAX_WORD_OVERFLOW: usize = 5;
/// Durations the menu cycles through, in seconds.
pub const DURATIONS: [u64; 3] = [15, 30, 60];
/// Lines of text shown around the cursor.
pub const VISIBLE_LINES: usize = 3;

/// Next duration in the menu cycle (wrapping).
pub fn next_duration(secs: u64, forward: bool) -> u64 {
    let idx = DURATIONS.iter().position(|d| *d == secs).unwrap_or(1);
    let n = DURATIONS.len();
    let next = if forward { (idx + 1) % n } else { (idx + n - 1) % n };
    DURATIONS[next]
}

/// How a character of the word list should be drawn.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CharState {
    Correct,
    Incorrect,
    /// Next character to type.
    Cursor,
    Untyped,
    /// Typed past the end of the word.
    Extra,
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct TestResults {
    pub wpm: f64,
    pub accuracy: f64,
    pub correct_chars: usize,
    pub total_chars: usize,
    pub correct_words: usize,
    pub total_words: usize,
}

#[derive(Debug, Clone)]
pub struct TypingTest {
    pub words: Vec<String>,
    /// Per-word input; same length as `words`.
    pub input: Vec<Vec<char>>,
    pub word_index: usize,
    duration: Duration,
    started: Option<Instant>,
}

impl TypingTest {
    pub fn new(words: Vec<String>, duration: Duration) -> Self {
        let input = vec![Vec::new(); words.len()];
        Self {
            words,
            input,
            word_index: 0,
            duration,
            started: None,
        }
    }

    pub fn is_started(&self) -> bool {
        self.started.is_some()
    }

    fn start(&mut self, now: Instant) {
        if self.started.is_none() {
            self.started = Some(now);
            info!(
                words = self.words.len(),
                secs = self.duration.as_secs(),
                "classic test started"
            );
        }
    }

    fn current_len(&self) -> usize {
        self.words
            .get(self.word_index)
            .map_or(0, |w| w.chars().count())
    }

    pub fn type_char(&mut self, c: char, now: Instant) {
        self.start(now);
        let limit = self.current_len() + MAX_WORD_OVERFLOW;
        if let Some(typed) = self.input.get_mut(self.word_index) {
            if typed.len() < limit {
                typed.push(c);
            }
        }
    }

    pub fn space(&mut self, now: Instant) {
        self.start(now);
        let has_input = self
            .input
            .get(self.word_index)
            .is_some_and(|typed| !typed.is_empty());
        if has_input && self.word_index + 1 < self.words.len() {
            self.word_index += 1;
        }
    }

    pub fn backspace(&mut self, now: Instant) {
        self.start(now);
        if let Some(typed) = self.input.get_mut(self.word_index) {
            typed.pop();
        }
    }

    pub fn elapsed(&self, now: Instant) -> Duration {
        self.started
            .map_or(Duration::ZERO, |s| now.saturating_duration_since(s))
    }

    /// Time left; the full duration until the first key.
    pub fn remaining(&self, now: Instant) -> Duration {
        self.duration.saturating_sub(self.elapsed(now))
    }

    pub fn is_finished(&self, now: Instant) -> bool {
        self.is_started() && self.remaining(now).is_zero()
    }

    /// WPM over completed words so far; 0 during the first second.
    pub fn live_wpm(&self, now: Instant) -> f64 {
        let elapsed = self.elapsed(now).as_secs_f64();
        if elapsed < 1.0 {
            return 0.0;
        }
        let correct: usize = (0..self.word_index)
            .map(|i| self.correct_in_word(i) + 1)
            .sum();
        (correct as f64 / 5.0) / (elapsed / 60.0)
    }

    fn correct_in_word(&self, i: usize) -> usize {
        self.words[i]
            .chars()
            .zip(&self.input[i])
            .filter(|(want, got)| want == *got)
            .count()
    }

    /// Final scores over every word reached so far.
    pub fn results(&self, now: Instant) -> TestResults {
        let elapsed = self.elapsed(now).as_secs_f64().max(1.0);
        let mut correct_chars = 0;
        let mut total_chars = 0;
        let mut correct_words = 0;

        let reached = (self.word_index + 1).min(self.words.len());
        for i in 0..reached {
            let target: Vec<char> = self.words[i].chars().collect();
            let typed = &self.input[i];
            let correct = self.correct_in_word(i);

            correct_chars += correct;
            total_chars += target.len() + typed.len().saturating_sub(target.len());
            if i < self.word_index {
                // the space after a completed word
                correct_chars += 1;
                total_chars += 1;
            }
            if *typed == target {
                correct_words += 1;
            }
        }

        let accuracy = if total_chars > 0 {
            correct_chars as f64 / total_chars as f64 * 100.0
        } else {
            0.0
        };
        TestResults {
            wpm: (correct_chars as f64 / 5.0) / (elapsed / 60.0),
            accuracy,
            correct_chars,
            total_chars,
            correct_words,
            total_words: reached,
        }
    }

    /// Characters of word `idx` with their states, overflow included.
    pub fn char_states(&self, idx: usize) -> Vec<(char, CharState)> {
        let (Some(word), Some(typed)) = (self.words.get(idx), self.input.get(idx)) else {
            return Vec::new();
        };
        let mut out: Vec<(char, CharState)> = word
            .chars()
            .enumerate()
            .map(|(i, want)| {
                let state = match (idx.cmp(&self.word_index), typed.get(i)) {
                    (std::cmp::Ordering::Greater, _) => CharState::Untyped,
                    (_, Some(got)) if *got == want => CharState::Correct,
                    (_, Some(_)) => CharState::Incorrect,
                    (std::cmp::Ordering::Less, None) => CharState::Incorrect,
                    (_, None) if i == typed.len() => CharState::Cursor,
                    (_, None) => CharState::Untyped,
                };
                (want, state)
            })
            .collect();
        if idx <= self.word_index {
            out.extend(
                typed
                    .iter()
                    .skip(word.chars().count())
                    .map(|c| (*c, CharState::Extra)),
            );
        }
        out
    }
}

/// Text column width for a terminal width.
pub fn container_width(screen_width: u16) -> u16 {
    screen_width.saturating_sub(10).clamp(30, 70)
}

/// Group word indices into lines no wider than `max_width` (single spaces between words).
/// A word longer than the line gets a line to itself.
pub fn wrap_words(words: &[String], max_width: usize) -> Vec<Vec<usize>> {
    let mut lines = Vec::new();
    let mut line: Vec<usize> = Vec::new();
    let mut width = 0;
    for (i, word) in words.iter().enumerate() {
        let len = word.chars().count();
        let needed = if line.is_empty() { len } else { len + 1 };
        if width + needed > max_width && !line.is_empty() {
            lines.push(std::mem::take(&mut line));
            width = len;
        } else {
            width += needed;
        }
        line.push(i);
    }
    if !line.is_empty() {
        lines.push(line);
    }
    lines
}

/// Lines to show: the one before the cursor line, the cursor line and the one after.
pub fn visible_range(lines: &[Vec<usize>], word_index: usize) -> Range<usize> {
    let current = lines
        .iter()
        .position(|l| l.contains(&word_index))
        .unwrap_or(0);
    let start = current.saturating_sub(1);
    start..(start + VISIBLE_LINES).min(lines.len())
}
