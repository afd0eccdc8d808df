//! App: terminal init, main loop, tick scheduling and key handling.

use crate::audio::{CuePlayer, Silent, TerminalBell};
use crate::classic::{self, TestResults, TypingTest};
use crate::falling::{Cue, FallingGame, TICK_INTERVAL};
use crate::input::{Action, key_to_action};
use crate::theme::Theme;
use crate::ui::{self, FxSlot};
use crate::words::{ContentMode, Corpus};
use crate::{GameConfig, GameMode};
use anyhow::Result;
use crossterm::event::{self, Event};
use ratatui::DefaultTerminal;
use std::time::{Duration, Instant};
use tracing::info;

/// Upper bound on how long the loop sleeps waiting for input (~60 FPS).
const FRAME_DURATION: Duration = Duration::from_millis(16);

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Screen {
    Menu,
    Classic,
    Results,
    Falling,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MenuRow {
    Game,
    Content,
    /// Classic only.
    Duration,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct MenuState {
    pub row: MenuRow,
    pub game: GameMode,
    pub content: ContentMode,
    pub duration_secs: u64,
}

impl MenuState {
    pub fn new(config: &GameConfig) -> Self {
        Self {
            row: MenuRow::Game,
            game: config.game,
            content: config.content,
            duration_secs: config.duration_secs,
        }
    }

    /// Rows shown for the selected game.
    pub fn rows(&self) -> &'static [MenuRow] {
        match self.game {
            GameMode::Classic => &[MenuRow::Game, MenuRow::Content, MenuRow::Duration],
            GameMode::Falling => &[MenuRow::Game, MenuRow::Content],
        }
    }

    fn row_index(&self) -> usize {
        self.rows().iter().position(|r| *r == self.row).unwrap_or(0)
    }

    pub fn up(&mut self) {
        let rows = self.rows();
        self.row = rows[self.row_index().saturating_sub(1)];
    }

    pub fn down(&mut self) {
        let rows = self.rows();
        self.row = rows[(self.row_index() + 1).min(rows.len() - 1)];
    }

    /// Change the value on the current row.
    pub fn change(&mut self, forward: bool) {
        match self.row {
            MenuRow::Game => self.game = self.game.toggled(),
            MenuRow::Content => self.content = self.content.toggled(),
            MenuRow::Duration => {
                self.duration_secs = classic::next_duration(self.duration_secs, forward);
            }
        }
    }
}

/// What the loop should do after handling an event.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Flow {
    Continue,
    Quit,
}

/// Borrowed state handed to [`ui::draw`]. Effects are mutable because they
/// advance as they render.
pub struct View<'a> {
    pub screen: Screen,
    pub menu: &'a MenuState,
    pub theme: &'a Theme,
    pub day_night: bool,
    pub test: Option<&'a TypingTest>,
    pub results: Option<&'a TestResults>,
    pub falling: Option<&'a FallingGame>,
    pub hit_fx: &'a mut FxSlot,
    pub game_over_fx: &'a mut FxSlot,
}

pub struct App {
    config: GameConfig,
    theme: Theme,
    screen: Screen,
    menu: MenuState,
    corpus: Corpus,
    test: Option<TypingTest>,
    results: Option<TestResults>,
    falling: Option<FallingGame>,
    /// One-shot deadline of the next falling-words tick; re-armed after each tick.
    next_tick: Option<Instant>,
    player: Box<dyn CuePlayer>,
    hit_fx: FxSlot,
    game_over_fx: FxSlot,
    term_size: (u16, u16),
}

impl App {
    pub fn new(config: GameConfig, theme: Theme) -> Self {
        let player: Box<dyn CuePlayer> = if config.bell {
            Box::new(TerminalBell::new(std::io::stdout()))
        } else {
            Box::new(Silent)
        };
        Self::with_player(config, theme, player)
    }

    pub fn with_player(config: GameConfig, theme: Theme, player: Box<dyn CuePlayer>) -> Self {
        Self {
            menu: MenuState::new(&config),
            corpus: Corpus::new(config.seed),
            config,
            theme,
            screen: Screen::Menu,
            test: None,
            results: None,
            falling: None,
            next_tick: None,
            player,
            hit_fx: FxSlot::default(),
            game_over_fx: FxSlot::default(),
            term_size: (80, 24),
        }
    }

    /// Start whatever the menu has selected.
    fn start(&mut self, now: Instant) {
        match self.menu.game {
            GameMode::Classic => self.start_classic(),
            GameMode::Falling => self.start_falling(now),
        }
    }

    fn start_classic(&mut self) {
        let words = self
            .corpus
            .test_words(self.menu.content, classic::TEST_WORDS);
        let duration = Duration::from_secs(self.menu.duration_secs);
        self.test = Some(TypingTest::new(words, duration));
        self.results = None;
        self.next_tick = None;
        self.screen = Screen::Classic;
    }

    fn start_falling(&mut self, now: Instant) {
        let (w, h) = self.term_size;
        let seed = self.config.seed;
        let content = self.menu.content;
        match self.falling.as_mut().filter(|g| g.content() == content) {
            Some(game) => {
                game.resize(w, h);
                game.restart();
            }
            None => {
                self.falling = Some(FallingGame::new(
                    w,
                    h,
                    content,
                    Box::new(Corpus::new(seed)),
                    seed,
                ));
                info!(content = content.label(), "falling session started");
            }
        }
        self.hit_fx.clear();
        self.game_over_fx.clear();
        self.next_tick = Some(now + TICK_INTERVAL);
        self.screen = Screen::Falling;
    }

    fn to_menu(&mut self) {
        self.next_tick = None;
        self.screen = Screen::Menu;
    }

    fn on_cue(&mut self, cue: Cue) {
        self.player.play(cue);
        match cue {
            Cue::Hit => self.hit_fx.set(ui::hit_flash(self.theme.error)),
            Cue::GameOver => self.game_over_fx.set(ui::game_over_fade(self.theme.bg)),
            Cue::Destroy(_) => {}
        }
    }

    pub fn resize(&mut self, width: u16, height: u16) {
        self.term_size = (width, height);
        if let Some(game) = &mut self.falling {
            game.resize(width, height);
        }
    }

    /// Fire the falling-words tick if it is due, then re-arm it once.
    pub fn advance_clock(&mut self, now: Instant) {
        let Some(due) = self.next_tick else {
            return;
        };
        if now < due {
            return;
        }
        self.next_tick = None;
        if self.screen != Screen::Falling {
            return;
        }
        let Some(game) = self.falling.as_mut() else {
            return;
        };
        let cue = game.tick();
        if !game.game_over {
            self.next_tick = Some(now + TICK_INTERVAL);
        }
        if let Some(cue) = cue {
            self.on_cue(cue);
        }
    }

    /// End the classic test once its time is up.
    pub fn check_timeout(&mut self, now: Instant) {
        if self.screen != Screen::Classic {
            return;
        }
        let Some(test) = &self.test else {
            return;
        };
        if test.is_finished(now) {
            let results = test.results(now);
            info!(
                wpm = results.wpm,
                accuracy = results.accuracy,
                "classic test finished"
            );
            self.results = Some(results);
            self.screen = Screen::Results;
        }
    }

    /// How long the loop may wait for input before something is due.
    fn poll_timeout(&self, now: Instant) -> Duration {
        self.next_tick
            .map_or(FRAME_DURATION, |due| {
                due.saturating_duration_since(now).min(FRAME_DURATION)
            })
    }

    pub fn handle_action(&mut self, action: Action, now: Instant) -> Flow {
        if action == Action::Quit {
            return Flow::Quit;
        }
        match self.screen {
            Screen::Menu => return self.menu_action(action, now),
            Screen::Classic => self.classic_action(action, now),
            Screen::Results => match action {
                Action::Restart | Action::Confirm => self.start_classic(),
                Action::Back => self.to_menu(),
                _ => {}
            },
            Screen::Falling => self.falling_action(action, now),
        }
        Flow::Continue
    }

    fn menu_action(&mut self, action: Action, now: Instant) -> Flow {
        match action {
            Action::Up | Action::Char('k') => self.menu.up(),
            Action::Down | Action::Char('j') => self.menu.down(),
            Action::Left | Action::Char('h') => self.menu.change(false),
            Action::Right | Action::Char('l') => self.menu.change(true),
            Action::Confirm => self.start(now),
            Action::Char('q') => return Flow::Quit,
            _ => {}
        }
        Flow::Continue
    }

    fn classic_action(&mut self, action: Action, now: Instant) {
        match action {
            Action::Restart => return self.start_classic(),
            Action::Back => return self.to_menu(),
            _ => {}
        }
        let Some(test) = &mut self.test else {
            return;
        };
        match action {
            Action::Char(c) => test.type_char(c, now),
            Action::Space => test.space(now),
            Action::Backspace => test.backspace(now),
            _ => {}
        }
    }

    fn falling_action(&mut self, action: Action, now: Instant) {
        let over = self.falling.as_ref().is_none_or(|g| g.game_over);
        match action {
            Action::Restart => return self.start_falling(now),
            Action::Confirm if over => return self.start_falling(now),
            Action::Back => return self.to_menu(),
            _ => {}
        }
        let Some(game) = &mut self.falling else {
            return;
        };
        let cue = match action {
            Action::Char(c) => game.type_char(c),
            Action::Backspace => {
                game.backspace();
                None
            }
            _ => None,
        };
        if let Some(cue) = cue {
            self.on_cue(cue);
        }
    }

    pub fn run(&mut self) -> Result<()> {
        use crossterm::{
            event::{
                KeyboardEnhancementFlags, PopKeyboardEnhancementFlags,
                PushKeyboardEnhancementFlags,
            },
            execute,
            terminal::{
                EnterAlternateScreen, LeaveAlternateScreen, disable_raw_mode, enable_raw_mode,
                size,
            },
        };

        enable_raw_mode()?;
        let mut stdout = std::io::stdout();
        execute!(stdout, EnterAlternateScreen)?;
        // Release events let us ignore key-ups; terminals without the protocol just skip this.
        let _ = execute!(
            stdout,
            PushKeyboardEnhancementFlags(KeyboardEnhancementFlags::REPORT_EVENT_TYPES)
        );

        let mut terminal =
            ratatui::DefaultTerminal::new(ratatui::backend::CrosstermBackend::new(stdout))?;
        let (cols, rows) = size()?;
        self.resize(cols, rows);
        if self.config.no_menu {
            self.start(Instant::now());
        }
        info!(cols, rows, "terminal ready");

        let result = self.run_loop(&mut terminal);

        let _ = execute!(std::io::stdout(), PopKeyboardEnhancementFlags);
        execute!(std::io::stdout(), LeaveAlternateScreen)?;
        disable_raw_mode()?;

        result
    }

    fn run_loop(&mut self, terminal: &mut DefaultTerminal) -> Result<()> {
        loop {
            let now = Instant::now();
            self.check_timeout(now);
            self.advance_clock(now);

            terminal.draw(|f| ui::draw(f, self.view(), now))?;

            if event::poll(self.poll_timeout(Instant::now()))? {
                while event::poll(Duration::ZERO)? {
                    match event::read()? {
                        Event::Key(key) => {
                            let action = key_to_action(key);
                            if self.handle_action(action, Instant::now()) == Flow::Quit {
                                return Ok(());
                            }
                        }
                        Event::Resize(w, h) => self.resize(w, h),
                        _ => {}
                    }
                }
            }
        }
    }

    /// Everything the renderer needs for one frame.
    pub fn view(&mut self) -> View<'_> {
        View {
            screen: self.screen,
            menu: &self.menu,
            theme: &self.theme,
            day_night: self.config.day_night,
            test: self.test.as_ref(),
            results: self.results.as_ref(),
            falling: self.falling.as_ref(),
            hit_fx: &mut self.hit_fx,
            game_over_fx: &mut self.game_over_fx,
        }
    }
}
