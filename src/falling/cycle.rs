//! Day/night cycle for the falling-words field.
//!
//! A full cycle is 800 ticks (two minutes at 150 ms/tick): the sun crosses the sky
//! during ticks 0..400 and the moon during 400..800. Colours hold steady through
//! most of each half and blend between four keyframes (dawn, day, sunset, night)
//! inside short windows at the ends of each half. Everything here is a pure
//! function of the tick counter.

use ratatui::style::Color;
use std::f64::consts::PI;

pub const FULL_CYCLE_TICKS: u64 = 800;
pub const HALF_CYCLE_TICKS: u64 = 400;
/// Fraction of each half spent blending into or out of the held palette.
pub const TRANSITION_EDGE: f64 = 0.08;

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Rgb {
    pub r: f64,
    pub g: f64,
    pub b: f64,
}

impl Rgb {
    pub const fn new(r: f64, g: f64, b: f64) -> Self {
        Self { r, g, b }
    }

    pub fn lerp(self, other: Self, t: f64) -> Self {
        let t = t.clamp(0.0, 1.0);
        Self {
            r: self.r + (other.r - self.r) * t,
            g: self.g + (other.g - self.g) * t,
            b: self.b + (other.b - self.b) * t,
        }
    }

    pub fn to_color(self) -> Color {
        let ch = |v: f64| v.clamp(0.0, 255.0).round() as u8;
        Color::Rgb(ch(self.r), ch(self.g), ch(self.b))
    }
}

/// Colours used to draw one frame of the falling-words screen.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ColorPalette {
    pub bg: Color,
    /// Untyped text, inactive decoration.
    pub dim: Color,
    /// Typed text.
    pub text: Color,
    pub alien: Color,
    pub shield: Color,
    /// Active target, cursor, turret highlights.
    pub accent: Color,
    pub hint: Color,
}

#[derive(Debug, Clone, Copy, PartialEq)]
struct Keyframe {
    dim: Rgb,
    text: Rgb,
    alien: Rgb,
    shield: Rgb,
    accent: Rgb,
    hint: Rgb,
    bg: Rgb,
}

impl Keyframe {
    fn lerp(&self, other: &Self, t: f64) -> Self {
        Self {
            dim: self.dim.lerp(other.dim, t),
            text: self.text.lerp(other.text, t),
            alien: self.alien.lerp(other.alien, t),
            shield: self.shield.lerp(other.shield, t),
            accent: self.accent.lerp(other.accent, t),
            hint: self.hint.lerp(other.hint, t),
            bg: self.bg.lerp(other.bg, t),
        }
    }

    fn to_palette(self) -> ColorPalette {
        ColorPalette {
            bg: self.bg.to_color(),
            dim: self.dim.to_color(),
            text: self.text.to_color(),
            alien: self.alien.to_color(),
            shield: self.shield.to_color(),
            accent: self.accent.to_color(),
            hint: self.hint.to_color(),
        }
    }
}

const DAWN: Keyframe = Keyframe {
    dim: Rgb::new(138.0, 110.0, 66.0),
    text: Rgb::new(212.0, 184.0, 150.0),
    alien: Rgb::new(156.0, 118.0, 68.0),
    shield: Rgb::new(196.0, 154.0, 86.0),
    accent: Rgb::new(226.0, 168.0, 60.0),
    hint: Rgb::new(138.0, 110.0, 66.0),
    bg: Rgb::new(180.0, 140.0, 80.0),
};

const DAY: Keyframe = Keyframe {
    dim: Rgb::new(140.0, 140.0, 155.0),
    text: Rgb::new(20.0, 20.0, 30.0),
    alien: Rgb::new(50.0, 30.0, 110.0),
    shield: Rgb::new(20.0, 60.0, 140.0),
    accent: Rgb::new(130.0, 80.0, 0.0),
    hint: Rgb::new(140.0, 140.0, 155.0),
    bg: Rgb::new(255.0, 255.0, 255.0),
};

const SUNSET: Keyframe = Keyframe {
    dim: Rgb::new(139.0, 64.0, 73.0),
    text: Rgb::new(212.0, 150.0, 122.0),
    alien: Rgb::new(160.0, 72.0, 88.0),
    shield: Rgb::new(196.0, 90.0, 62.0),
    accent: Rgb::new(220.0, 130.0, 50.0),
    hint: Rgb::new(139.0, 64.0, 73.0),
    bg: Rgb::new(180.0, 100.0, 50.0),
};

const NIGHT: Keyframe = Keyframe {
    dim: Rgb::new(70.0, 80.0, 110.0),
    text: Rgb::new(180.0, 190.0, 220.0),
    alien: Rgb::new(90.0, 100.0, 160.0),
    shield: Rgb::new(100.0, 130.0, 190.0),
    accent: Rgb::new(140.0, 170.0, 220.0),
    hint: Rgb::new(70.0, 80.0, 110.0),
    bg: Rgb::new(0.0, 0.0, 0.0),
};

/// Whether `tick` falls in the day half, and the normalised progress through that half.
pub fn phase(tick: u64) -> (bool, f64) {
    let pos = tick % FULL_CYCLE_TICKS;
    let is_day = pos < HALF_CYCLE_TICKS;
    let into_half = if is_day { pos } else { pos - HALF_CYCLE_TICKS };
    (is_day, into_half as f64 / HALF_CYCLE_TICKS as f64)
}

/// Palette for a tick.
pub fn palette(tick: u64) -> ColorPalette {
    let (is_day, progress) = phase(tick);
    let (rise, held, set) = if is_day {
        (&DAWN, &DAY, &SUNSET)
    } else {
        (&SUNSET, &NIGHT, &DAWN)
    };
    let frame = if progress < TRANSITION_EDGE {
        rise.lerp(held, progress / TRANSITION_EDGE)
    } else if progress < 1.0 - TRANSITION_EDGE {
        *held
    } else {
        held.lerp(set, (progress - (1.0 - TRANSITION_EDGE)) / TRANSITION_EDGE)
    };
    frame.to_palette()
}

/// Sun or moon for the current tick.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CelestialBody {
    pub x: i32,
    pub y: i32,
    pub is_day: bool,
    pub core: Color,
    pub glow: Color,
}

/// One glyph of a celestial sprite; `bright` glyphs use the core colour.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SkyGlyph {
    pub dx: i32,
    pub dy: i32,
    pub ch: char,
    pub bright: bool,
}

const fn g(dx: i32, dy: i32, ch: char, bright: bool) -> SkyGlyph {
    SkyGlyph { dx, dy, ch, bright }
}

//  \|/
// --O--
//  /|\
pub const SUN_GLYPHS: &[SkyGlyph] = &[
    g(-1, -1, '\\', false),
    g(0, -1, '|', false),
    g(1, -1, '/', false),
    g(-2, 0, '-', false),
    g(-1, 0, '-', false),
    g(1, 0, '-', false),
    g(2, 0, '-', false),
    g(-1, 1, '/', false),
    g(0, 1, '|', false),
    g(1, 1, '\\', false),
    g(0, 0, 'O', true),
];

// ▄█
//  █
// ▀█
pub const MOON_GLYPHS: &[SkyGlyph] = &[
    g(0, -1, '▄', false),
    g(1, -1, '█', true),
    g(0, 0, ' ', false),
    g(1, 0, '█', true),
    g(0, 1, '▀', false),
    g(1, 1, '█', true),
];

impl CelestialBody {
    pub fn glyphs(&self) -> &'static [SkyGlyph] {
        if self.is_day { SUN_GLYPHS } else { MOON_GLYPHS }
    }
}

/// Position on an elliptical arc from the left horizon (progress 0) to the right (1).
pub fn celestial_position(progress: f64, play_width: u16, play_height: u16) -> (i32, i32) {
    let angle = PI * (1.0 - progress);
    let (w, h) = (f64::from(play_width), f64::from(play_height));

    let center_x = w / 2.0;
    let ground_y = h - 2.0;
    let radius_x = w / 2.5;
    let radius_y = (h - 4.0).max(3.0);

    let x = center_x + radius_x * angle.cos();
    let y = (ground_y - radius_y * angle.sin()).min(h - 2.0).max(1.0);
    (x.round() as i32, y.round() as i32)
}

const SUN_LOW: (Color, Color) = (Color::Rgb(0xe8, 0x90, 0x3a), Color::Rgb(0xa0, 0x60, 0x20));
const SUN_HIGH: (Color, Color) = (Color::Rgb(0xf5, 0xd4, 0x42), Color::Rgb(0xc4, 0xa0, 0x30));
const MOON_LOW: (Color, Color) = (Color::Rgb(0x66, 0x77, 0xaa), Color::Rgb(0x33, 0x44, 0x66));
const MOON_HIGH: (Color, Color) = (Color::Rgb(0xcc, 0xdd, 0xef), Color::Rgb(0x77, 0x99, 0xbb));

pub fn celestial_body(tick: u64, play_width: u16, play_height: u16) -> CelestialBody {
    let (is_day, progress) = phase(tick);
    let (x, y) = celestial_position(progress, play_width, play_height);
    let near_horizon = !(0.2..=0.8).contains(&progress);
    let (core, glow) = match (is_day, near_horizon) {
        (true, true) => SUN_LOW,
        (true, false) => SUN_HIGH,
        (false, true) => MOON_LOW,
        (false, false) => MOON_HIGH,
    };
    CelestialBody {
        x,
        y,
        is_day,
        core,
        glow,
    }
}
