//! 3x5 bitmap font: digits and the handful of letters the screens use.

use super::{PixelBuf, Rgb, SHADOW};

pub const GLYPH_W: i32 = 3;
pub const GLYPH_H: i32 = 5;
/// Glyph width plus one pixel of spacing.
pub const ADVANCE: i32 = GLYPH_W + 1;

#[rustfmt::skip]
const DIGITS: [[u8; 15]; 10] = [
    [1,1,1, 1,0,1, 1,0,1, 1,0,1, 1,1,1], // 0
    [0,1,0, 1,1,0, 0,1,0, 0,1,0, 1,1,1], // 1
    [1,1,1, 0,0,1, 1,1,1, 1,0,0, 1,1,1], // 2
    [1,1,1, 0,0,1, 0,1,1, 0,0,1, 1,1,1], // 3
    [1,0,1, 1,0,1, 1,1,1, 0,0,1, 0,0,1], // 4
    [1,1,1, 1,0,0, 1,1,1, 0,0,1, 1,1,1], // 5
    [1,1,1, 1,0,0, 1,1,1, 1,0,1, 1,1,1], // 6
    [1,1,1, 0,0,1, 0,1,0, 0,1,0, 0,1,0], // 7
    [1,1,1, 1,0,1, 1,1,1, 1,0,1, 1,1,1], // 8
    [1,1,1, 1,0,1, 1,1,1, 0,0,1, 1,1,1], // 9
];

#[rustfmt::skip]
fn letter(ch: char) -> Option<[u8; 15]> {
    let glyph = match ch {
        'A' => [0,1,0, 1,0,1, 1,1,1, 1,0,1, 1,0,1],
        'B' => [1,1,0, 1,0,1, 1,1,0, 1,0,1, 1,1,0],
        'C' => [0,1,1, 1,0,0, 1,0,0, 1,0,0, 0,1,1],
        'E' => [1,1,1, 1,0,0, 1,1,0, 1,0,0, 1,1,1],
        'F' => [1,1,1, 1,0,0, 1,1,0, 1,0,0, 1,0,0],
        'G' => [0,1,1, 1,0,0, 1,0,1, 1,0,1, 0,1,1],
        'L' => [1,0,0, 1,0,0, 1,0,0, 1,0,0, 1,1,1],
        'M' => [1,0,1, 1,1,1, 1,1,1, 1,0,1, 1,0,1],
        'O' => [0,1,0, 1,0,1, 1,0,1, 1,0,1, 0,1,0],
        'P' => [1,1,0, 1,0,1, 1,1,0, 1,0,0, 1,0,0],
        'R' => [1,1,0, 1,0,1, 1,1,0, 1,0,1, 1,0,1],
        'S' => [0,1,1, 1,0,0, 0,1,0, 0,0,1, 1,1,0],
        'T' => [1,1,1, 0,1,0, 0,1,0, 0,1,0, 0,1,0],
        'V' => [1,0,1, 1,0,1, 1,0,1, 1,0,1, 0,1,0],
        'Y' => [1,0,1, 1,0,1, 0,1,0, 0,1,0, 0,1,0],
        _ => return None,
    };
    Some(glyph)
}

fn glyph(ch: char) -> Option<[u8; 15]> {
    match ch.to_digit(10) {
        Some(d) => Some(DIGITS[d as usize]),
        None => letter(ch.to_ascii_uppercase()),
    }
}

/// Width in pixels of `text` drawn at `scale`.
pub fn text_width(text: &str, scale: i32) -> i32 {
    let n = text.chars().count() as i32;
    if n == 0 {
        0
    } else {
        (n * ADVANCE - 1) * scale
    }
}

fn draw_glyph(buf: &mut PixelBuf, x: i32, y: i32, glyph: &[u8; 15], scale: i32, fg: Rgb) {
    for row in 0..GLYPH_H {
        for col in 0..GLYPH_W {
            if glyph[(row * GLYPH_W + col) as usize] == 1 {
                let px = x + col * scale;
                let py = y + row * scale;
                buf.fill_rect(px + scale.max(2) / 2, py + scale.max(2) / 2, scale, scale, SHADOW);
                buf.fill_rect(px, py, scale, scale, fg);
            }
        }
    }
}

/// Draws `text` horizontally centred on `cx`. Unknown characters leave a gap.
pub fn draw_text(buf: &mut PixelBuf, cx: i32, y: i32, text: &str, scale: i32, fg: Rgb) {
    let scale = scale.max(1);
    let start_x = cx - text_width(text, scale) / 2;
    for (i, ch) in text.chars().enumerate() {
        if let Some(g) = glyph(ch) {
            let x = start_x + i as i32 * ADVANCE * scale;
            draw_glyph(buf, x, y, &g, scale, fg);
        }
    }
}

pub fn draw_number(buf: &mut PixelBuf, cx: i32, y: i32, n: u32, scale: i32, fg: Rgb) {
    draw_text(buf, cx, y, &n.to_string(), scale, fg);
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::render::{SKY_TOP, WHITE};

    #[test]
    fn test_every_screen_string_is_drawable() {
        for text in ["FLAPPY", "SPACE TO FLAP", "GAME OVER", "BEST", "SPACE TO RETRY", "0123456789"] {
            for ch in text.chars().filter(|c| *c != ' ') {
                assert!(glyph(ch).is_some(), "missing glyph {ch}");
            }
        }
    }

    #[test]
    fn test_text_width() {
        assert_eq!(text_width("", 1), 0);
        assert_eq!(text_width("7", 1), 3);
        assert_eq!(text_width("42", 1), 7);
        assert_eq!(text_width("42", 2), 14);
    }

    #[test]
    fn test_draw_one() {
        let mut buf = PixelBuf::new(9, 9);
        draw_number(&mut buf, 4, 1, 1, 1, WHITE);
        // Glyph for 1 starts at x = 4 - 1 = 3: its top row is 0,1,0.
        assert_eq!(buf.get(4, 1), WHITE);
        assert_eq!(buf.get(3, 1), SKY_TOP);
        // Bottom row is 1,1,1.
        assert_eq!(buf.get(3, 5), WHITE);
        assert_eq!(buf.get(5, 5), WHITE);
    }
}
