//! Compositing the falling-words field into a cell buffer.
//!
//! Layers, each overwriting the last: sky fill, sun or moon, laser, explosions,
//! alien sprites with their words. The shield row is composed separately and
//! sits directly under the grid.

use super::FallingGame;
use super::cycle::{CelestialBody, ColorPalette};
use super::entity::{Explosion, FallingWord, LaserBeam, explosion_particles, sprite_for_word};
use ratatui::buffer::Buffer;
use ratatui::layout::Rect;
use ratatui::style::{Color, Modifier, Style};
use ratatui::text::{Line, Span};

pub const LASER_COLOR: Color = Color::Rgb(0xff, 0x6b, 0x6b);
pub const EXPLOSION_COLOR: Color = Color::Rgb(0xff, 0xaa, 0x44);

/// Everything drawn on the play grid for one frame.
#[derive(Debug, Clone, Copy)]
pub struct Scene<'a> {
    pub words: &'a [FallingWord],
    pub explosions: &'a [Explosion],
    pub laser: Option<&'a LaserBeam>,
    pub celestial: Option<CelestialBody>,
    pub palette: &'a ColorPalette,
}

impl<'a> Scene<'a> {
    pub fn from_game(game: &'a FallingGame, palette: &'a ColorPalette, day_night: bool) -> Self {
        let (w, h) = game.play_area();
        Self {
            words: &game.words,
            explosions: &game.explosions,
            laser: game.laser.as_ref(),
            celestial: day_night.then(|| super::cycle::celestial_body(game.ticks, w, h)),
            palette,
        }
    }
}

/// Write one glyph at grid coordinates; anything outside `area` is dropped.
fn put(buf: &mut Buffer, area: Rect, x: i32, y: i32, ch: char, style: Style) {
    let (Ok(x), Ok(y)) = (u16::try_from(x), u16::try_from(y)) else {
        return;
    };
    if x >= area.width || y >= area.height {
        return;
    }
    if let Some(cell) = buf.cell_mut((area.x + x, area.y + y)) {
        cell.set_char(ch);
        cell.modifier = Modifier::empty();
        cell.set_style(style);
    }
}

fn put_str(buf: &mut Buffer, area: Rect, x: i32, y: i32, s: &str, style: Style) {
    for (i, ch) in s.chars().enumerate() {
        put(buf, area, x + i as i32, y, ch, style);
    }
}

/// Render the scene into a buffer covering `area`.
pub fn compose(scene: &Scene<'_>, area: Rect) -> Buffer {
    let palette = scene.palette;
    let mut buf = Buffer::empty(area);
    let sky = Style::default().fg(palette.text).bg(palette.bg);
    for y in area.top()..area.bottom() {
        for x in area.left()..area.right() {
            if let Some(cell) = buf.cell_mut((x, y)) {
                cell.set_char(' ').set_style(sky);
            }
        }
    }

    if let Some(body) = scene.celestial {
        draw_celestial(&mut buf, area, &body);
    }
    if let Some(laser) = scene.laser {
        draw_laser(&mut buf, area, laser);
    }
    for e in scene.explosions {
        draw_explosion(&mut buf, area, e);
    }
    for fw in scene.words {
        draw_alien(&mut buf, area, fw, palette);
    }
    buf
}

fn draw_celestial(buf: &mut Buffer, area: Rect, body: &CelestialBody) {
    let core = Style::default().fg(body.core).add_modifier(Modifier::BOLD);
    let glow = Style::default().fg(body.glow);
    for g in body.glyphs() {
        let style = if g.bright { core } else { glow };
        put(buf, area, body.x + g.dx, body.y + g.dy, g.ch, style);
    }
}

fn draw_laser(buf: &mut Buffer, area: Rect, laser: &LaserBeam) {
    let style = Style::default()
        .fg(LASER_COLOR)
        .add_modifier(Modifier::BOLD);
    for row in laser.to_y..laser.from_y {
        put(buf, area, laser.x, row, '│', style);
    }
}

fn draw_explosion(buf: &mut Buffer, area: Rect, e: &Explosion) {
    let style = Style::default()
        .fg(EXPLOSION_COLOR)
        .add_modifier(Modifier::BOLD);
    for p in explosion_particles(e.phase()) {
        put(buf, area, e.x + p.dx, e.y + p.dy, p.ch, style);
    }
}

fn draw_alien(buf: &mut Buffer, area: Rect, fw: &FallingWord, palette: &ColorPalette) {
    let sprite = sprite_for_word(&fw.word);
    let body_row = fw.row();
    let frame = if fw.active {
        Style::default()
            .fg(palette.accent)
            .add_modifier(Modifier::BOLD)
    } else {
        Style::default().fg(palette.alien)
    };

    put_str(
        buf,
        area,
        fw.left_edge(),
        body_row - 1,
        &sprite.head(&fw.word),
        frame,
    );

    let left_len = sprite.body_left.chars().count() as i32;
    put_str(buf, area, fw.x - left_len, body_row, sprite.body_left, frame);

    let typed = Style::default().fg(palette.text);
    let next = Style::default().fg(palette.bg).bg(palette.accent);
    let untouched = Style::default().fg(palette.dim);
    for (j, ch) in fw.word.chars().enumerate() {
        let style = match (fw.active, j.cmp(&fw.typed)) {
            (true, std::cmp::Ordering::Less) => typed,
            (true, std::cmp::Ordering::Equal) => next,
            _ => untouched,
        };
        put(buf, area, fw.x + j as i32, body_row, ch, style);
    }

    put_str(
        buf,
        area,
        fw.x + fw.len() as i32,
        body_row,
        sprite.body_right,
        frame,
    );
}

/// Shield texture by remaining lives, with the `/▲\` turret stamped in.
/// Returns the glyphs and the clamped turret column.
pub fn shield_glyphs(width: u16, lives: u32, turret_x: i32) -> (Vec<char>, usize) {
    let width = usize::from(width.max(4));
    let mut shield: Vec<char> = match lives {
        3.. => vec!['█'; width],
        2 => {
            let mut s = vec!['█'; width];
            for pos in [width / 4, width / 2, width * 3 / 4] {
                s[pos] = '░';
            }
            s
        }
        1 => (0..width)
            .map(|i| {
                if i % 3 == 0 {
                    '░'
                } else if i % 5 == 0 {
                    ' '
                } else {
                    '▒'
                }
            })
            .collect(),
        0 => (0..width)
            .map(|i| if i % 2 == 0 { '░' } else { ' ' })
            .collect(),
    };

    let turret = turret_x.clamp(1, width as i32 - 2) as usize;
    shield[turret - 1] = '/';
    shield[turret] = '▲';
    shield[turret + 1] = '\\';
    (shield, turret)
}

/// Shield row as a styled line; `damaged` colours the shield on the last life.
pub fn shield_line(
    width: u16,
    lives: u32,
    turret_x: i32,
    palette: &ColorPalette,
    damaged: Color,
) -> Line<'static> {
    let (glyphs, turret) = shield_glyphs(width, lives, turret_x);
    let strong = Style::default()
        .fg(palette.shield)
        .add_modifier(Modifier::BOLD);
    let body = match lives {
        2.. => strong,
        1 => Style::default().fg(damaged),
        0 => Style::default().fg(palette.hint),
    };
    let spans: Vec<Span<'static>> = glyphs
        .into_iter()
        .enumerate()
        .map(|(i, ch)| {
            let style = if i + 1 >= turret && i <= turret + 1 {
                strong
            } else {
                body
            };
            Span::styled(ch.to_string(), style)
        })
        .collect();
    Line::from(spans).style(Style::default().bg(palette.bg))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::falling::cycle;
    use crate::falling::entity::Explosion;

    fn symbol(buf: &Buffer, x: u16, y: u16) -> &str {
        buf.cell((x, y)).map_or("", |c| c.symbol())
    }

    fn row_text(buf: &Buffer, y: u16) -> String {
        (0..buf.area.width).map(|x| symbol(buf, x, y)).collect()
    }

    fn area() -> Rect {
        Rect::new(0, 0, 30, 10)
    }

    fn word(text: &str, x: i32, y: f64) -> FallingWord {
        let mut fw = FallingWord::new(text, x);
        fw.y = y;
        fw
    }

    #[test]
    fn test_empty_scene_is_sky() {
        let palette = cycle::palette(600);
        let scene = Scene {
            words: &[],
            explosions: &[],
            laser: None,
            celestial: None,
            palette: &palette,
        };
        let buf = compose(&scene, area());
        assert_eq!(buf.area, area());
        assert!(buf.content.iter().all(|c| c.symbol() == " " && c.bg == palette.bg));
    }

    #[test]
    fn test_alien_sprite_layout() {
        let palette = cycle::palette(200);
        let words = [word("the", 10, 4.0)];
        let scene = Scene {
            words: &words,
            explosions: &[],
            laser: None,
            celestial: None,
            palette: &palette,
        };
        let buf = compose(&scene, area());
        assert_eq!(&row_text(&buf, 3)[..], "        ╱◉‾‾‾◉╲               ");
        assert_eq!(&row_text(&buf, 4)[..], "        >{the}<               ");
        assert_eq!(buf.cell((10, 4)).unwrap().fg, palette.dim);
        assert_eq!(buf.cell((8, 4)).unwrap().fg, palette.alien);
    }

    #[test]
    fn test_progress_styling() {
        let palette = cycle::palette(600);
        let mut fw = word("quick", 5, 2.0);
        fw.active = true;
        fw.typed = 2;
        let words = [fw];
        let scene = Scene {
            words: &words,
            explosions: &[],
            laser: None,
            celestial: None,
            palette: &palette,
        };
        let buf = compose(&scene, area());
        let cell = |x| buf.cell((x, 2)).unwrap().clone();
        assert_eq!(cell(5).fg, palette.text);
        assert_eq!(cell(6).fg, palette.text);
        assert_eq!(cell(7).bg, palette.accent);
        assert_eq!(cell(8).fg, palette.dim);
        // Active frame uses the accent colour.
        assert_eq!(cell(3).fg, palette.accent);
    }

    #[test]
    fn test_layers_overwrite_in_order() {
        let palette = cycle::palette(600);
        let laser = LaserBeam::new(12, 10, 0);
        let explosions = [Explosion::new(12, 6)];
        let words = [word("ab", 11, 3.0)];
        let scene = Scene {
            words: &words,
            explosions: &explosions,
            laser: Some(&laser),
            celestial: None,
            palette: &palette,
        };
        let buf = compose(&scene, area());
        // Laser visible where nothing else is drawn.
        assert_eq!(symbol(&buf, 12, 0), "│");
        assert_eq!(symbol(&buf, 12, 9), "│");
        // Explosion (phase 0) covers the laser.
        assert_eq!(symbol(&buf, 12, 6), "✦");
        // The word covers the laser.
        assert_eq!(symbol(&buf, 12, 3), "b");
        assert_eq!(buf.cell((12, 3)).unwrap().fg, palette.dim);
    }

    #[test]
    fn test_celestial_under_everything() {
        let palette = cycle::palette(200);
        let body = cycle::CelestialBody {
            x: 11,
            y: 3,
            is_day: true,
            core: Color::Yellow,
            glow: Color::Red,
        };
        let words = [word("ab", 11, 3.0)];
        let scene = Scene {
            words: &words,
            explosions: &[],
            laser: None,
            celestial: Some(body),
            palette: &palette,
        };
        let buf = compose(&scene, area());
        assert_eq!(symbol(&buf, 11, 3), "a");
        assert!(!buf.cell((11, 3)).unwrap().modifier.contains(Modifier::BOLD));
        // Rays that no sprite covers stay visible.
        assert_eq!(symbol(&buf, 11, 4), "|");
        assert_eq!(buf.cell((11, 4)).unwrap().fg, Color::Red);
    }

    #[test]
    fn test_out_of_bounds_dropped() {
        let palette = cycle::palette(600);
        let words = [word("edge", -3, 0.0), word("low", 27, 9.9), word("gone", 5, 40.0)];
        let explosions = [Explosion::new(-1, -1)];
        let scene = Scene {
            words: &words,
            explosions: &explosions,
            laser: None,
            celestial: None,
            palette: &palette,
        };
        let buf = compose(&scene, area());
        assert_eq!(symbol(&buf, 0, 0), "e");
        assert_eq!(symbol(&buf, 1, 0), "]");
        assert_eq!(symbol(&buf, 26, 9), "{");
        assert_eq!(symbol(&buf, 29, 9), "w");
        assert!(row_text(&buf, 9).ends_with("low"));
    }

    #[test]
    fn test_composes_at_offset() {
        let palette = cycle::palette(600);
        let words = [word("hi", 3, 1.0)];
        let scene = Scene {
            words: &words,
            explosions: &[],
            laser: None,
            celestial: None,
            palette: &palette,
        };
        let offset = Rect::new(5, 2, 10, 4);
        let buf = compose(&scene, offset);
        assert_eq!(symbol(&buf, 8, 3), "h");
    }

    #[test]
    fn test_shield_by_lives() {
        let (full, t) = shield_glyphs(20, 3, 10);
        assert_eq!(t, 10);
        assert_eq!(full.iter().filter(|c| **c == '█').count(), 17);
        assert_eq!(&full[9..12], &['/', '▲', '\\']);

        let (cracked, _) = shield_glyphs(20, 2, 1);
        assert_eq!(cracked[10], '░');
        assert_eq!(cracked[15], '░');

        let (broken, _) = shield_glyphs(20, 0, 10);
        assert_eq!(broken[0], '░');
        assert_eq!(broken[14], '░');
        assert_eq!(broken[15], ' ');
    }

    #[test]
    fn test_turret_clamped_to_shield() {
        let (glyphs, t) = shield_glyphs(20, 3, -5);
        assert_eq!(t, 1);
        assert_eq!(glyphs[0], '/');
        let (glyphs, t) = shield_glyphs(20, 3, 500);
        assert_eq!(t, 18);
        assert_eq!(glyphs[19], '\\');
        assert_eq!(shield_glyphs(1, 3, 0).0.len(), 4);
    }

    #[test]
    fn test_shield_line_width() {
        let palette = cycle::palette(0);
        let line = shield_line(30, 1, 15, &palette, Color::Red);
        assert_eq!(line.width(), 30);
    }
}
