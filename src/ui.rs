//! Layout and drawing: menu, classic test, results, falling field with its HUD
//! and game-over summary.

use crate::GameMode;
use crate::app::{MenuRow, MenuState, Screen, View};
use crate::classic::{self, CharState, TestResults, TypingTest};
use crate::falling::cycle::{self, ColorPalette};
use crate::falling::grid::{self, Scene};
use crate::falling::{FallingGame, HUD_ROWS};
use crate::theme::Theme;
use ratatui::Frame;
use ratatui::layout::{Alignment, Rect};
use ratatui::style::{Color, Style};
use ratatui::text::{Line, Span};
use ratatui::widgets::{Block, Borders, Clear, Paragraph, Widget};
use std::time::{Duration, Instant};
use tachyonfx::{Duration as TfxDuration, Effect, EffectRenderer, Interpolation, fx};

/// Flash over the play field when a word breaches the shield.
const HIT_FLASH_MS: u32 = 350;
/// Fade-in of the game-over summary.
const GAME_OVER_FADE_MS: u32 = 600;
const SUMMARY_WIDTH: u16 = 34;
const SUMMARY_HEIGHT: u16 = 9;

/// A one-shot effect and the time it was last advanced.
#[derive(Default)]
pub struct FxSlot {
    effect: Option<Effect>,
    last_process: Option<Instant>,
}

impl FxSlot {
    pub fn set(&mut self, effect: Effect) {
        self.effect = Some(effect);
        self.last_process = None;
    }

    pub fn clear(&mut self) {
        self.effect = None;
        self.last_process = None;
    }

    pub fn is_active(&self) -> bool {
        self.effect.is_some()
    }

    /// Advance the effect by the time since the last frame and apply it to `area`.
    fn render(&mut self, frame: &mut Frame, area: Rect, now: Instant) {
        if !self.is_active() {
            return;
        }
        let delta = self
            .last_process
            .map(|t| now.saturating_duration_since(t))
            .unwrap_or(Duration::ZERO);
        let delta_ms = delta.as_millis().min(u128::from(u32::MAX)) as u32;
        self.last_process = Some(now);

        let done = match &mut self.effect {
            Some(effect) => {
                frame.render_effect(effect, area, TfxDuration::from_millis(delta_ms));
                effect.done()
            }
            None => false,
        };
        if done {
            self.clear();
        }
    }
}

pub fn hit_flash(color: Color) -> Effect {
    fx::fade_from(color, color, (HIT_FLASH_MS, Interpolation::QuadOut))
}

pub fn game_over_fade(bg: Color) -> Effect {
    fx::fade_from(bg, bg, (GAME_OVER_FADE_MS, Interpolation::Linear))
}

fn centered(area: Rect, width: u16, height: u16) -> Rect {
    Rect {
        x: area.x + area.width.saturating_sub(width) / 2,
        y: area.y + area.height.saturating_sub(height) / 2,
        width: width.min(area.width),
        height: height.min(area.height),
    }
}

/// `mm:ss`.
fn clock(d: Duration) -> String {
    let secs = d.as_secs();
    format!("{:02}:{:02}", secs / 60, secs % 60)
}

fn fill_bg(frame: &mut Frame, area: Rect, bg: Color) {
    frame
        .buffer_mut()
        .set_style(area, Style::default().bg(bg));
}

/// Draw the current screen.
pub fn draw(frame: &mut Frame, view: View<'_>, now: Instant) {
    let area = frame.area();
    let theme = view.theme;
    fill_bg(frame, area, theme.bg);
    match view.screen {
        Screen::Menu => draw_menu(frame, view.menu, theme, area),
        Screen::Classic => {
            if let Some(test) = view.test {
                draw_classic(frame, test, theme, area, now);
            }
        }
        Screen::Results => {
            if let Some(results) = view.results {
                draw_results(frame, results, theme, area);
            }
        }
        Screen::Falling => {
            if let Some(game) = view.falling {
                let palette = if view.day_night {
                    cycle::palette(game.ticks)
                } else {
                    theme.palette()
                };
                draw_falling(
                    frame,
                    game,
                    &palette,
                    theme,
                    area,
                    view.day_night,
                    view.hit_fx,
                    view.game_over_fx,
                    now,
                );
            }
        }
    }
}

fn draw_menu(frame: &mut Frame, menu: &MenuState, theme: &Theme, area: Rect) {
    let highlight = Style::default().fg(theme.accent).bold();
    let idle = Style::default().fg(theme.dim);
    let label = Style::default().fg(theme.text);

    let option = |text: String, selected: bool| {
        if selected {
            Span::styled(format!("[ {text} ]"), highlight)
        } else {
            Span::styled(format!("  {text}  "), idle)
        }
    };

    let mut lines = vec![
        Line::from(Span::styled("typefall", highlight)),
        Line::from(""),
    ];
    for row in menu.rows() {
        let mut spans = vec![if *row == menu.row {
            Span::styled("▸ ", highlight)
        } else {
            Span::raw("  ")
        }];
        match row {
            MenuRow::Game => {
                spans.push(Span::styled("game      ", label));
                for g in [GameMode::Classic, GameMode::Falling] {
                    spans.push(option(g.label().to_string(), menu.game == g));
                    spans.push(Span::raw(" "));
                }
            }
            MenuRow::Content => {
                spans.push(Span::styled("content   ", label));
                for c in [crate::words::ContentMode::Words, crate::words::ContentMode::Quotes] {
                    spans.push(option(c.label().to_string(), menu.content == c));
                    spans.push(Span::raw(" "));
                }
            }
            MenuRow::Duration => {
                spans.push(Span::styled("duration  ", label));
                for d in classic::DURATIONS {
                    spans.push(option(format!("{d}s"), menu.duration_secs == d));
                    spans.push(Span::raw(" "));
                }
            }
        }
        lines.push(Line::from(spans));
    }
    lines.push(Line::from(""));
    lines.push(Line::from(Span::styled(
        "↑↓ navigate  ←→ change  enter start  q quit",
        idle,
    )));

    let height = lines.len() as u16;
    let width = lines.iter().map(Line::width).max().unwrap_or(0) as u16;
    Paragraph::new(lines).render(centered(area, width, height), frame.buffer_mut());
}

fn char_style(state: CharState, theme: &Theme) -> Style {
    match state {
        CharState::Correct => Style::default().fg(theme.text),
        CharState::Incorrect => Style::default().fg(theme.error),
        CharState::Cursor => Style::default().fg(theme.bg).bg(theme.accent),
        CharState::Untyped => Style::default().fg(theme.dim),
        CharState::Extra => Style::default().fg(theme.error).dim(),
    }
}

fn draw_classic(frame: &mut Frame, test: &TypingTest, theme: &Theme, area: Rect, now: Instant) {
    let width = classic::container_width(area.width);
    let wrapped = classic::wrap_words(&test.words, usize::from(width));
    let visible = classic::visible_range(&wrapped, test.word_index);

    let remaining = test.remaining(now).as_secs_f64().ceil() as u64;
    let mut status = vec![Span::styled(
        remaining.to_string(),
        Style::default().fg(theme.accent).bold(),
    )];
    if test.is_started() {
        status.push(Span::raw("    "));
        status.push(Span::styled(
            format!("{:.0} wpm", test.live_wpm(now)),
            Style::default().fg(theme.dim),
        ));
    }

    let mut lines = vec![Line::from(status), Line::from("")];
    for line in &wrapped[visible] {
        let mut spans = Vec::new();
        for (j, idx) in line.iter().enumerate() {
            if j > 0 {
                spans.push(Span::styled(" ", Style::default().fg(theme.dim)));
            }
            spans.extend(
                test.char_states(*idx)
                    .into_iter()
                    .map(|(c, state)| Span::styled(c.to_string(), char_style(state, theme))),
            );
        }
        lines.push(Line::from(spans));
    }
    lines.push(Line::from(""));
    lines.push(Line::from(Span::styled(
        "tab restart  esc menu",
        Style::default().fg(theme.dim),
    )));

    let height = lines.len() as u16;
    Paragraph::new(lines).render(centered(area, width, height), frame.buffer_mut());
}

fn draw_results(frame: &mut Frame, results: &TestResults, theme: &Theme, area: Rect) {
    let lines = results_lines(results, theme);
    let height = lines.len() as u16;
    let width = lines.iter().map(Line::width).max().unwrap_or(0) as u16;
    Paragraph::new(lines).render(centered(area, width, height), frame.buffer_mut());
}

/// Correct counts in the success colour, totals in the text colour.
fn results_lines(results: &TestResults, theme: &Theme) -> Vec<Line<'static>> {
    let label = Style::default().fg(theme.dim);
    let value = Style::default().fg(theme.text);
    let good = Style::default().fg(theme.success);
    let stat = |name: &'static str, text: String| {
        Line::from(vec![
            Span::styled(format!("{name:<13}"), label),
            Span::styled(text, value),
        ])
    };
    let ratio = |name: &'static str, correct: usize, total: usize| {
        Line::from(vec![
            Span::styled(format!("{name:<13}"), label),
            Span::styled(correct.to_string(), good),
            Span::styled(format!("/{total}"), value),
        ])
    };
    vec![
        Line::from(Span::styled(
            format!("{:.0} wpm", results.wpm),
            Style::default().fg(theme.accent).bold(),
        )),
        Line::from(""),
        stat("accuracy", format!("{:.1}%", results.accuracy)),
        ratio("characters", results.correct_chars, results.total_chars),
        ratio("words", results.correct_words, results.total_words),
        Line::from(""),
        Line::from(Span::styled("tab/enter restart  esc menu", label)),
    ]
}

fn draw_falling(
    frame: &mut Frame,
    game: &FallingGame,
    palette: &ColorPalette,
    theme: &Theme,
    area: Rect,
    day_night: bool,
    hit_fx: &mut FxSlot,
    game_over_fx: &mut FxSlot,
    now: Instant,
) {
    let (play_w, play_h) = game.play_area();
    let grid_rect = Rect {
        x: area.x,
        y: area.y,
        width: play_w.min(area.width),
        height: play_h.min(area.height),
    };
    fill_bg(frame, area, palette.bg);

    let scene = Scene::from_game(game, palette, day_night);
    let composed = grid::compose(&scene, grid_rect);
    let buf = frame.buffer_mut();
    for pos in grid_rect.positions() {
        if let (Some(src), Some(dst)) = (composed.cell(pos), buf.cell_mut(pos)) {
            *dst = src.clone();
        }
    }
    hit_fx.render(frame, grid_rect, now);

    let hud = hud_lines(game, palette, theme, play_w);
    for (i, line) in hud.into_iter().enumerate() {
        let y = grid_rect.bottom() + i as u16;
        if y >= area.bottom() {
            break;
        }
        let row = Rect::new(area.x, y, area.width, 1);
        line.render(row, frame.buffer_mut());
    }

    if let Some(summary) = game.summary.filter(|_| game.game_over) {
        let popup = centered(grid_rect, SUMMARY_WIDTH, SUMMARY_HEIGHT);
        let label = Style::default().fg(theme.dim);
        let value = Style::default().fg(theme.text).bold();
        let stat = |name: &'static str, text: String| {
            Line::from(vec![
                Span::styled(format!("{name:<17}"), label),
                Span::styled(text, value),
            ])
        };
        let lines = vec![
            stat("words destroyed", summary.score.to_string()),
            stat("survived", clock(summary.survived)),
            stat("wpm", format!("{:.0}", summary.wpm())),
            Line::from(""),
            Line::from(Span::styled("tab/enter restart  esc menu", label)),
        ];
        Clear.render(popup, frame.buffer_mut());
        Paragraph::new(lines)
            .alignment(Alignment::Center)
            .block(
                Block::default()
                    .borders(Borders::ALL)
                    .border_style(Style::default().fg(theme.error).bg(theme.bg))
                    .title(Span::styled(" game over ", Style::default().fg(theme.error).bold())),
            )
            .style(Style::default().bg(theme.bg))
            .render(popup, frame.buffer_mut());
        game_over_fx.render(frame, popup, now);
    }
}

/// Shield, status, input echo and key hint, top to bottom; `HUD_ROWS` lines.
fn hud_lines(
    game: &FallingGame,
    palette: &ColorPalette,
    theme: &Theme,
    play_w: u16,
) -> Vec<Line<'static>> {
    let shield = grid::shield_line(play_w, game.lives, game.turret.x, palette, theme.error);

    let hearts: String = (0..crate::falling::START_LIVES)
        .map(|i| if i < game.lives { '♥' } else { '♡' })
        .collect();
    let status = Line::from(vec![
        Span::styled(hearts, Style::default().fg(theme.error)),
        Span::styled(
            format!("   score {}", game.score),
            Style::default().fg(palette.text),
        ),
        Span::styled(
            format!("   {}", clock(game.survival_time())),
            Style::default().fg(palette.dim),
        ),
    ]);

    let target: Vec<char> = game
        .target_word()
        .map(|fw| fw.word.chars().collect())
        .unwrap_or_default();
    let mut echo = vec![Span::styled("> ", Style::default().fg(palette.accent))];
    echo.extend(game.input().chars().enumerate().map(|(i, c)| {
        let style = if target.get(i) == Some(&c) {
            Style::default().fg(palette.text)
        } else {
            Style::default().fg(theme.error)
        };
        Span::styled(c.to_string(), style)
    }));

    let hint = Line::from(Span::styled(
        "type to shoot  tab restart  esc menu",
        Style::default().fg(palette.hint),
    ));

    let lines = vec![
        shield,
        status,
        Line::from(""),
        Line::from(echo),
        Line::from(""),
        hint,
    ];
    debug_assert_eq!(lines.len(), usize::from(HUD_ROWS));
    lines
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::falling::test_support::game;
    use crate::falling::entity::FallingWord;
    use ratatui::Terminal;
    use ratatui::backend::TestBackend;

    fn screen_text(terminal: &Terminal<TestBackend>) -> String {
        let buf = terminal.backend().buffer();
        buf.content.iter().map(|c| c.symbol()).collect()
    }

    #[test]
    fn test_hud_echo_marks_mismatches() {
        let mut g = game(&[]);
        let mut w = FallingWord::new("cat", 10);
        w.y = 3.0;
        g.words.push(w);
        g.type_char('c');
        g.type_char('o');
        let theme = Theme::default();
        let lines = hud_lines(&g, &theme.palette(), &theme, 80);
        let echo = &lines[3];
        assert_eq!(echo.spans[1].content, "c");
        assert_eq!(echo.spans[1].style.fg, Some(theme.text));
        assert_eq!(echo.spans[2].style.fg, Some(theme.error));
        assert_eq!(lines[1].spans[0].content, "♥♥♥");
    }

    #[test]
    fn test_falling_frame_renders() {
        let mut terminal = Terminal::new(TestBackend::new(80, 30)).unwrap();
        let mut g = game(&["quick"]);
        g.tick();
        let theme = Theme::default();
        let palette = theme.palette();
        let mut hit = FxSlot::default();
        let mut over = FxSlot::default();
        hit.set(hit_flash(theme.error));
        terminal
            .draw(|f| {
                let area = f.area();
                draw_falling(f, &g, &palette, &theme, area, false, &mut hit, &mut over, Instant::now());
            })
            .unwrap();
        let text = screen_text(&terminal);
        assert!(text.contains("quick"));
        assert!(text.contains("score 0"));
        assert!(text.contains('▲'));
    }

    #[test]
    fn test_tiny_terminal_does_not_panic() {
        let mut terminal = Terminal::new(TestBackend::new(12, 4)).unwrap();
        let mut g = game(&["word"]);
        g.resize(12, 4);
        g.tick();
        g.lives = 1;
        g.game_over = true;
        g.summary = Some(crate::falling::Summary {
            score: 2,
            chars_typed: 9,
            survived: Duration::from_secs(61),
        });
        let theme = Theme::default();
        let mut hit = FxSlot::default();
        let mut over = FxSlot::default();
        over.set(game_over_fade(theme.bg));
        terminal
            .draw(|f| {
                let area = f.area();
                draw_falling(
                    f,
                    &g,
                    &cycle::palette(g.ticks),
                    &theme,
                    area,
                    true,
                    &mut hit,
                    &mut over,
                    Instant::now(),
                );
            })
            .unwrap();
    }

    #[test]
    fn test_classic_and_results_render() {
        let mut terminal = Terminal::new(TestBackend::new(80, 20)).unwrap();
        let theme = Theme::default();
        let words = ["alpha", "beta", "gamma"].map(String::from).to_vec();
        let test = TypingTest::new(words, Duration::from_secs(30));
        terminal
            .draw(|f| {
                let area = f.area();
                draw_classic(f, &test, &theme, area, Instant::now());
            })
            .unwrap();
        let text = screen_text(&terminal);
        assert!(text.contains("30"));
        assert!(text.contains("alpha beta gamma"));

        let results = TestResults {
            wpm: 71.6,
            accuracy: 97.25,
            correct_chars: 358,
            total_chars: 368,
            correct_words: 60,
            total_words: 62,
        };
        terminal
            .draw(|f| {
                let area = f.area();
                draw_results(f, &results, &theme, area);
            })
            .unwrap();
        let text = screen_text(&terminal);
        assert!(text.contains("72 wpm"));
        assert!(text.contains("97.2%") || text.contains("97.3%"));
        assert!(text.contains("358/368"));
    }

    #[test]
    fn test_results_highlight_correct_counts() {
        let theme = Theme::default();
        let results = TestResults {
            wpm: 40.0,
            accuracy: 90.0,
            correct_chars: 180,
            total_chars: 200,
            correct_words: 30,
            total_words: 33,
        };
        let lines = results_lines(&results, &theme);
        let words = &lines[4];
        assert_eq!(words.spans[1].content, "30");
        assert_eq!(words.spans[1].style.fg, Some(theme.success));
        assert_eq!(words.spans[2].content, "/33");
        assert_eq!(words.spans[2].style.fg, Some(theme.text));
        assert_eq!(lines[3].spans[1].style.fg, Some(theme.success));
    }

    #[test]
    fn test_clock_format() {
        assert_eq!(clock(Duration::from_secs(83)), "01:23");
        assert_eq!(clock(Duration::ZERO), "00:00");
    }
}
