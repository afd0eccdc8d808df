//! Theme loading: btop-style `theme[key]="value"` files and hex → ratatui Color.

use crate::falling::cycle::ColorPalette;
use ratatui::style::Color;
use std::collections::HashMap;
use std::path::Path;
use thiserror::Error;

/// Colours for the menu, the classic test and the falling field when the
/// day/night cycle is off.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Theme {
    pub bg: Color,
    /// Untyped text, hints, borders.
    pub dim: Color,
    /// Correctly typed text.
    pub text: Color,
    pub error: Color,
    /// Cursor, selection, titles.
    pub accent: Color,
    /// Correct counts on the results screen.
    pub success: Color,
    pub shield: Color,
    pub alien: Color,
}

#[derive(Debug, Error)]
pub enum ThemeError {
    #[error("io error: {0}")]
    Io(#[from] std::io::Error),
    #[error("invalid hex: {0}")]
    InvalidHex(String),
}

const fn rgb(hex: u32) -> Color {
    Color::Rgb((hex >> 16) as u8, (hex >> 8) as u8, hex as u8)
}

impl Default for Theme {
    fn default() -> Self {
        Self {
            bg: rgb(0x323437),
            dim: rgb(0x646669),
            text: rgb(0xd1d0c5),
            error: rgb(0xca4754),
            accent: rgb(0xe2b714),
            success: rgb(0x98c379),
            shield: rgb(0x4fc1ff),
            alien: rgb(0x7c6f9f),
        }
    }
}

impl Theme {
    /// Load a theme file. A missing or absent path yields the default theme;
    /// keys the file leaves out keep their defaults.
    pub fn load(path: Option<&Path>) -> Result<Self, ThemeError> {
        let path = match path {
            Some(p) if p.exists() => p,
            _ => return Ok(Self::default()),
        };
        let s = std::fs::read_to_string(path)?;
        Ok(Self::from_map(&parse_theme_file(&s)))
    }

    fn from_map(map: &HashMap<String, String>) -> Self {
        let get = |key: &str| map.get(key).and_then(|v| parse_hex(v).ok());
        let d = Self::default();
        Self {
            bg: get("main_bg").unwrap_or(d.bg),
            dim: get("inactive_fg").unwrap_or(d.dim),
            text: get("main_fg").unwrap_or(d.text),
            error: get("cpu_end").or_else(|| get("temp_end")).unwrap_or(d.error),
            accent: get("title").unwrap_or(d.accent),
            success: get("mem_box").unwrap_or(d.success),
            shield: get("hi_fg").unwrap_or(d.shield),
            alien: get("proc_misc").unwrap_or(d.alien),
        }
    }

    /// Fixed falling-field palette used when the day/night cycle is disabled.
    pub fn palette(&self) -> ColorPalette {
        ColorPalette {
            bg: self.bg,
            dim: self.dim,
            text: self.text,
            alien: self.alien,
            shield: self.shield,
            accent: self.accent,
            hint: self.dim,
        }
    }
}

/// Parse btop-style theme file into key -> value map.
fn parse_theme_file(s: &str) -> HashMap<String, String> {
    let mut map = HashMap::new();
    for line in s.lines() {
        let line = line.trim();
        if line.is_empty() || line.starts_with('#') {
            continue;
        }
        let Some(stripped) = line.strip_prefix("theme[") else {
            continue;
        };
        let Some(end) = stripped.find(']') else {
            continue;
        };
        let key = stripped[..end].trim();
        let rest = stripped[end + 1..].trim();
        if let Some(value) = rest.strip_prefix('=') {
            let value = value.trim().trim_matches('"').trim_matches('\'');
            if !value.is_empty() {
                map.insert(key.to_string(), value.to_string());
            }
        }
    }
    map
}

/// Parse hex colour "#RRGGBB" or "#RGB" into ratatui Color.
pub fn parse_hex(s: &str) -> Result<Color, ThemeError> {
    let s = s.trim().trim_start_matches('#');
    let invalid = || ThemeError::InvalidHex(s.to_string());
    if !s.is_ascii() {
        return Err(invalid());
    }
    let digit = |range: std::ops::Range<usize>| {
        u8::from_str_radix(&s[range], 16).map_err(|_| invalid())
    };
    let (r, g, b) = match s.len() {
        6 => (digit(0..2)?, digit(2..4)?, digit(4..6)?),
        3 => (digit(0..1)? * 17, digit(1..2)? * 17, digit(2..3)? * 17),
        _ => return Err(invalid()),
    };
    Ok(Color::Rgb(r, g, b))
}
