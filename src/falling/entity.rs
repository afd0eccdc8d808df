//! Falling words, laser beams, explosions and the alien sprites drawn around words.
//!
//! Each word is a 2-row alien:
//!
//! ```text
//!   ╱◉‾‾‾◉╲     head row (y - 1)
//!   >{the}<     body row (y, where the word text lives)
//! ```

/// Columns of decoration on each side of the word text.
pub const WING_WIDTH: i32 = 2;
/// Ticks a laser beam stays on screen.
pub const LASER_TICKS: u8 = 3;
/// Ticks an explosion lasts; one particle pattern per tick.
pub const EXPLOSION_TICKS: u8 = 4;

#[derive(Debug, Clone, PartialEq)]
pub struct FallingWord {
    pub word: String,
    /// Column of the first text character (wings sit to the left of it).
    pub x: i32,
    /// Row of the body; grows every tick.
    pub y: f64,
    pub typed: usize,
    pub active: bool,
}

impl FallingWord {
    pub fn new(word: impl Into<String>, x: i32) -> Self {
        Self {
            word: word.into(),
            x,
            y: 0.0,
            typed: 0,
            active: false,
        }
    }

    /// Length in characters.
    #[inline]
    pub fn len(&self) -> usize {
        self.word.chars().count()
    }

    /// Integer row of the body.
    #[inline]
    pub fn row(&self) -> i32 {
        self.y.floor() as i32
    }

    /// Leftmost occupied column, wings included.
    #[inline]
    pub fn left_edge(&self) -> i32 {
        self.x - WING_WIDTH
    }

    /// One past the rightmost occupied column, wings included.
    #[inline]
    pub fn right_edge(&self) -> i32 {
        self.x + self.len() as i32 + WING_WIDTH
    }

    /// Column the turret and laser aim at.
    #[inline]
    pub fn center_x(&self) -> i32 {
        self.x + self.len() as i32 / 2
    }

    pub fn first_char(&self) -> Option<char> {
        self.word.chars().next()
    }
}

/// Full on-screen width of a word including its wings.
pub fn visual_width(word: &str) -> i32 {
    word.chars().count() as i32 + 2 * WING_WIDTH
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Explosion {
    pub x: i32,
    pub y: i32,
    pub ticks: u8,
}

impl Explosion {
    pub fn new(x: i32, y: i32) -> Self {
        Self {
            x,
            y,
            ticks: EXPLOSION_TICKS,
        }
    }

    /// 0 right after creation, counting up as the explosion ages.
    pub fn phase(&self) -> u8 {
        EXPLOSION_TICKS.saturating_sub(self.ticks)
    }
}

/// Vertical beam from the shield (`from_y`, exclusive) up to `to_y`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct LaserBeam {
    pub x: i32,
    pub from_y: i32,
    pub to_y: i32,
    pub ticks: u8,
}

impl LaserBeam {
    pub fn new(x: i32, from_y: i32, to_y: i32) -> Self {
        Self {
            x,
            from_y,
            to_y,
            ticks: LASER_TICKS,
        }
    }
}

/// One glyph of an explosion, offset from its origin.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Particle {
    pub dx: i32,
    pub dy: i32,
    pub ch: char,
}

const fn p(dx: i32, dy: i32, ch: char) -> Particle {
    Particle { dx, dy, ch }
}

const BURST_0: &[Particle] = &[p(0, 0, '✦')];
const BURST_1: &[Particle] = &[p(0, 0, '◇'), p(-1, 0, '✧'), p(1, 0, '✧'), p(0, -1, '·')];
const BURST_2: &[Particle] = &[
    p(-2, 0, '·'),
    p(2, 0, '·'),
    p(-1, -1, '✧'),
    p(1, -1, '✧'),
    p(-1, 1, '*'),
    p(1, 1, '*'),
    p(0, 0, ' '),
];
const BURST_3: &[Particle] = &[
    p(-3, 0, '.'),
    p(3, 0, '.'),
    p(-2, -1, '.'),
    p(2, -1, '.'),
    p(0, 0, ' '),
];

/// Particle pattern for an explosion phase; later phases spread out and fade.
pub fn explosion_particles(phase: u8) -> &'static [Particle] {
    match phase {
        0 => BURST_0,
        1 => BURST_1,
        2 => BURST_2,
        _ => BURST_3,
    }
}

/// Decoration around one word. Head caps are as wide as the wings, so the head fill
/// is exactly as long as the word.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct AlienSprite {
    pub body_left: &'static str,
    pub body_right: &'static str,
    pub head_left: &'static str,
    pub head_fill: char,
    pub head_right: &'static str,
}

pub const ALIEN_SPRITES: [AlienSprite; 4] = [
    // invader
    AlienSprite {
        body_left: ">{",
        body_right: "}<",
        head_left: "╱◉",
        head_fill: '‾',
        head_right: "◉╲",
    },
    // antenna bug
    AlienSprite {
        body_left: "◀[",
        body_right: "]▶",
        head_left: "¤◉",
        head_fill: '─',
        head_right: "◉¤",
    },
    // jellyfish
    AlienSprite {
        body_left: "({",
        body_right: "})",
        head_left: "~◎",
        head_fill: '~',
        head_right: "◎~",
    },
    // robot
    AlienSprite {
        body_left: "╞{",
        body_right: "}╡",
        head_left: "[◈",
        head_fill: '·',
        head_right: "◈]",
    },
];

/// Sprite for a word; stable for a given first letter.
pub fn sprite_for_word(word: &str) -> &'static AlienSprite {
    let idx = word.bytes().next().map_or(0, |b| b as usize % ALIEN_SPRITES.len());
    &ALIEN_SPRITES[idx]
}

impl AlienSprite {
    /// Head row glyphs, as wide as the body row (wings + word).
    pub fn head(&self, word: &str) -> String {
        let body_width = self.body_left.chars().count()
            + word.chars().count()
            + self.body_right.chars().count();
        let cap_width = self.head_left.chars().count() + self.head_right.chars().count();
        let fill = body_width.saturating_sub(cap_width);
        let mut head = String::with_capacity(body_width * 3);
        head.push_str(self.head_left);
        head.extend(std::iter::repeat_n(self.head_fill, fill));
        head.push_str(self.head_right);
        head
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_edges_include_wings() {
        let w = FallingWord::new("quick", 10);
        assert_eq!(w.left_edge(), 8);
        assert_eq!(w.right_edge(), 17);
        assert_eq!(w.center_x(), 12);
        assert_eq!(visual_width("quick"), 9);
    }

    #[test]
    fn test_row_floors_fractional_y() {
        let mut w = FallingWord::new("a", 0);
        w.y = 2.95;
        assert_eq!(w.row(), 2);
    }

    #[test]
    fn test_head_matches_body_width() {
        for sprite in &ALIEN_SPRITES {
            let head = sprite.head("hello");
            assert_eq!(head.chars().count(), 2 + 5 + 2);
        }
        assert_eq!(ALIEN_SPRITES[0].head("the"), "╱◉‾‾‾◉╲");
    }

    #[test]
    fn test_sprite_choice_is_stable() {
        assert_eq!(sprite_for_word("apple"), sprite_for_word("axe"));
        assert_eq!(sprite_for_word(""), &ALIEN_SPRITES[0]);
    }

    #[test]
    fn test_explosion_phases() {
        let mut e = Explosion::new(5, 5);
        assert_eq!(e.phase(), 0);
        assert_eq!(explosion_particles(e.phase()).len(), 1);
        e.ticks = 1;
        assert_eq!(e.phase(), 3);
        assert_eq!(explosion_particles(9), explosion_particles(3));
    }
}
