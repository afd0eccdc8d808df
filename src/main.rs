//! typefall: typing speed trainer in the terminal, with a classic timed test
//! and a falling-words arcade mode.

mod app;
mod audio;
mod classic;
mod falling;
mod input;
mod theme;
mod ui;
mod words;

use anyhow::{Context, Result};
use app::App;
use clap::{Parser, ValueEnum};
use std::path::{Path, PathBuf};
use std::sync::Mutex;
use tracing::warn;
use tracing_subscriber::EnvFilter;
use words::ContentMode;

/// Options derived from the CLI that shape every session.
#[derive(Debug, Clone)]
pub struct GameConfig {
    pub game: GameMode,
    pub content: ContentMode,
    /// Classic test length in seconds.
    pub duration_secs: u64,
    pub no_menu: bool,
    /// Day/night colours on the falling field; the static theme palette otherwise.
    pub day_night: bool,
    pub seed: Option<u64>,
    pub bell: bool,
}

impl From<&Args> for GameConfig {
    fn from(args: &Args) -> Self {
        Self {
            game: args.game,
            content: args.content,
            duration_secs: args.duration,
            no_menu: args.no_menu,
            day_night: !args.no_cycle,
            seed: args.seed,
            bell: args.bell,
        }
    }
}

fn main() -> Result<()> {
    let args = Args::parse();
    if let Some(path) = &args.log_file {
        init_logging(path)?;
    }
    let theme = theme::Theme::load(args.theme.as_deref()).unwrap_or_else(|e| {
        warn!(error = %e, "could not load theme, using defaults");
        theme::Theme::default()
    });
    let mut app = App::new(GameConfig::from(&args), theme);
    app.run()?;
    Ok(())
}

/// Route `tracing` output to a file; the terminal belongs to the UI.
fn init_logging(path: &Path) -> Result<()> {
    let file = std::fs::File::create(path)
        .with_context(|| format!("creating log file {}", path.display()))?;
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_ansi(false)
        .with_writer(Mutex::new(file))
        .try_init()
        .map_err(|e| anyhow::anyhow!("installing tracing subscriber: {e}"))
}

/// Typing speed trainer in the terminal.
#[derive(Debug, Parser)]
#[command(
    name = "typefall",
    version,
    about = "Typing speed trainer in the terminal: a classic timed test and a falling-words arcade mode.",
    long_about = "typefall measures your typing speed.\n\n\
        CLASSIC: type the words shown before the timer runs out. The timer starts on your \
        first key. Space moves to the next word, Backspace corrects the current one.\n\n\
        FALLING: words descend on alien ships. Type a word to lock on and shoot it down. \
        Each word that reaches the shield costs a life; three and it is over. Speed and \
        spawn rate climb the longer you survive.\n\n\
        KEYS:\n  Tab  Restart    Esc  Menu    Ctrl-C  Quit\n  Menu: Up/Down (k/j) row, Left/Right (h/l) change, Enter start, q quit\n\n\
        Use --theme to load a btop-style theme file and --log-file to record logs (RUST_LOG filters)."
)]
pub struct Args {
    /// Game to select initially: classic (timed test) or falling (arcade).
    #[arg(short, long, default_value = "classic")]
    pub game: GameMode,

    /// What to type: common words or words from quotes.
    #[arg(short, long, default_value = "words")]
    pub content: ContentMode,

    /// Classic test length in seconds (the menu cycles 15/30/60).
    #[arg(short, long, default_value = "30", value_name = "SECS")]
    pub duration: u64,

    /// Skip the menu and start the selected game immediately.
    #[arg(long)]
    pub no_menu: bool,

    /// Disable the day/night cycle in falling mode; use the theme palette.
    #[arg(long)]
    pub no_cycle: bool,

    /// Path to theme file (btop-style theme[key]=\"value\").
    #[arg(short, long, value_name = "FILE")]
    pub theme: Option<PathBuf>,

    /// Seed for word choice and spawn placement (random if not set).
    #[arg(long, value_name = "N")]
    pub seed: Option<u64>,

    /// Ring the terminal bell on hits, kills and game over.
    #[arg(long)]
    pub bell: bool,

    /// Write logs to FILE (filter with RUST_LOG, default info).
    #[arg(long, value_name = "FILE")]
    pub log_file: Option<PathBuf>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, ValueEnum)]
pub enum GameMode {
    #[default]
    Classic,
    Falling,
}

impl GameMode {
    pub fn toggled(self) -> Self {
        match self {
            Self::Classic => Self::Falling,
            Self::Falling => Self::Classic,
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            Self::Classic => "classic",
            Self::Falling => "falling",
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let args = Args::parse_from(["typefall"]);
        let config = GameConfig::from(&args);
        assert_eq!(config.game, GameMode::Classic);
        assert_eq!(config.content, ContentMode::Words);
        assert_eq!(config.duration_secs, 30);
        assert!(config.day_night);
        assert!(!config.bell);
        assert!(args.log_file.is_none());
    }

    #[test]
    fn test_flags() {
        let args = Args::parse_from([
            "typefall",
            "--game",
            "falling",
            "--content",
            "quotes",
            "--no-cycle",
            "--seed",
            "9",
            "--no-menu",
        ]);
        let config = GameConfig::from(&args);
        assert_eq!(config.game, GameMode::Falling);
        assert_eq!(config.content, ContentMode::Quotes);
        assert!(!config.day_night);
        assert!(config.no_menu);
        assert_eq!(config.seed, Some(9));
    }

    #[test]
    fn test_cli_is_consistent() {
        use clap::CommandFactory;
        Args::command().debug_assert();
    }
}
