//! Frame composition
//!
//! Concatenates the camera and screen frames horizontally and burns a
//! timestamp into the result. Pure pixel work, no I/O.

use crate::types::Frame;

/// Overlay inset from the top-left corner, in pixels
const OVERLAY_INSET: u32 = 10;

/// Overlay color (RGB)
const OVERLAY_COLOR: [u8; 3] = [0, 255, 0];

/// Integer upscale factor applied to the base glyphs
const OVERLAY_SCALE: u32 = 3;

const GLYPH_WIDTH: u32 = 5;
const GLYPH_HEIGHT: u32 = 7;

/// Horizontal gap between glyphs, before scaling
const GLYPH_SPACING: u32 = 1;

/// Merge two frames side by side (camera left, screen right) and burn the
/// timestamp string into the top-left corner.
///
/// The canvas is `w1 + w2` wide and `max(h1, h2)` tall; if one input is
/// shorter, the area below it stays black. Inputs are normally pre-resized
/// to matching heights, so no padding arises in practice.
pub fn compose(camera: &Frame, screen: &Frame, timestamp: &str) -> Frame {
    let width = camera.width() + screen.width();
    let height = camera.height().max(screen.height());
    let mut canvas = Frame::new(width, height);

    blit(&mut canvas, camera, 0);
    blit(&mut canvas, screen, camera.width());
    draw_text(&mut canvas, timestamp, OVERLAY_INSET, OVERLAY_INSET);

    canvas
}

/// Copy `src` into `dst` row by row at horizontal offset `x_off`
fn blit(dst: &mut Frame, src: &Frame, x_off: u32) {
    let dst_stride = dst.width() as usize * 3;
    let src_stride = src.width() as usize * 3;
    let x_bytes = x_off as usize * 3;

    for y in 0..src.height() as usize {
        let src_row = &src.data()[y * src_stride..(y + 1) * src_stride];
        let dst_start = y * dst_stride + x_bytes;
        dst.data_mut()[dst_start..dst_start + src_stride].copy_from_slice(src_row);
    }
}

/// Stamp `text` into the frame at (x, y). Characters outside the glyph set
/// render as blanks; pixels past the frame edge are clipped.
fn draw_text(frame: &mut Frame, text: &str, x: u32, y: u32) {
    let advance = (GLYPH_WIDTH + GLYPH_SPACING) * OVERLAY_SCALE;
    for (i, ch) in text.chars().enumerate() {
        draw_glyph(frame, ch, x + i as u32 * advance, y);
    }
}

fn draw_glyph(frame: &mut Frame, ch: char, x: u32, y: u32) {
    let rows = glyph(ch);
    for (gy, row) in rows.iter().enumerate() {
        for gx in 0..GLYPH_WIDTH {
            // Bit 4 is the leftmost column.
            if (u32::from(*row) >> (GLYPH_WIDTH - 1 - gx)) & 1 == 0 {
                continue;
            }
            for sy in 0..OVERLAY_SCALE {
                for sx in 0..OVERLAY_SCALE {
                    let px = x + gx * OVERLAY_SCALE + sx;
                    let py = y + gy as u32 * OVERLAY_SCALE + sy;
                    put_pixel(frame, px, py);
                }
            }
        }
    }
}

fn put_pixel(frame: &mut Frame, x: u32, y: u32) {
    if x >= frame.width() || y >= frame.height() {
        return;
    }
    let i = (y as usize * frame.width() as usize + x as usize) * 3;
    frame.data_mut()[i..i + 3].copy_from_slice(&OVERLAY_COLOR);
}

/// 5x7 bitmap glyphs for the timestamp character set
fn glyph(ch: char) -> [u8; GLYPH_HEIGHT as usize] {
    match ch {
        '0' => [0x0E, 0x11, 0x13, 0x15, 0x19, 0x11, 0x0E],
        '1' => [0x04, 0x0C, 0x04, 0x04, 0x04, 0x04, 0x0E],
        '2' => [0x0E, 0x11, 0x01, 0x02, 0x04, 0x08, 0x1F],
        '3' => [0x1F, 0x02, 0x04, 0x02, 0x01, 0x11, 0x0E],
        '4' => [0x02, 0x06, 0x0A, 0x12, 0x1F, 0x02, 0x02],
        '5' => [0x1F, 0x10, 0x1E, 0x01, 0x01, 0x11, 0x0E],
        '6' => [0x06, 0x08, 0x10, 0x1E, 0x11, 0x11, 0x0E],
        '7' => [0x1F, 0x01, 0x02, 0x04, 0x08, 0x08, 0x08],
        '8' => [0x0E, 0x11, 0x11, 0x0E, 0x11, 0x11, 0x0E],
        '9' => [0x0E, 0x11, 0x11, 0x0F, 0x01, 0x02, 0x0C],
        '-' => [0x00, 0x00, 0x00, 0x1F, 0x00, 0x00, 0x00],
        ':' => [0x00, 0x0C, 0x0C, 0x00, 0x0C, 0x0C, 0x00],
        _ => [0x00; GLYPH_HEIGHT as usize],
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn solid(width: u32, height: u32, color: [u8; 3]) -> Frame {
        let mut data = Vec::with_capacity(width as usize * height as usize * 3);
        for _ in 0..width * height {
            data.extend_from_slice(&color);
        }
        Frame::from_raw(width, height, data).unwrap()
    }

    #[test]
    fn left_half_is_camera_right_half_is_screen() {
        let cam = solid(100, 80, [200, 0, 0]);
        let screen = solid(60, 80, [0, 0, 200]);
        let out = compose(&cam, &screen, "");

        // Sample away from the overlay corner.
        assert_eq!(out.pixel(50, 70), [200, 0, 0]);
        assert_eq!(out.pixel(130, 70), [0, 0, 200]);
    }

    #[test]
    fn overlay_stamps_green_pixels() {
        let cam = solid(200, 100, [10, 10, 10]);
        let screen = solid(200, 100, [10, 10, 10]);
        let out = compose(&cam, &screen, "12:34");

        let green = (0..40)
            .flat_map(|x| (0..40).map(move |y| (x, y)))
            .filter(|&(x, y)| out.pixel(x, y) == OVERLAY_COLOR)
            .count();
        assert!(green > 0, "timestamp overlay left no pixels");
    }

    #[test]
    fn overlay_clips_at_frame_edge() {
        // A frame smaller than the overlay inset must not panic.
        let cam = solid(4, 4, [0, 0, 0]);
        let screen = solid(4, 4, [0, 0, 0]);
        let out = compose(&cam, &screen, "2025-08-24 13:05:59");
        assert_eq!(out.width(), 8);
        assert_eq!(out.height(), 4);
    }
}
