// Bounding box and label drawing on a copy of the source raster
use super::glyphs::{draw_text, text_width};
use image::{Rgba, RgbaImage};
use imageproc::drawing::draw_hollow_rect_mut;
use imageproc::rect::Rect;

pub const GREEN: Rgba<u8> = Rgba([0x00, 0xff, 0x00, 0xff]);
pub const RED: Rgba<u8> = Rgba([0xff, 0x00, 0x00, 0xff]);

/// Label baseline sits this many pixels above the box.
const LABEL_GAP: i32 = 5;

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct BoxStyle {
    pub color: Rgba<u8>,
    pub line_width: u32,
    /// `(on, off)` pixel lengths; `None` draws a solid line
    pub dash: Option<(u32, u32)>,
    pub label_scale: u32,
}

pub const FOUND_STYLE: BoxStyle = BoxStyle {
    color: GREEN,
    line_width: 3,
    dash: None,
    label_scale: 3,
};

pub const NOT_FOUND_STYLE: BoxStyle = BoxStyle {
    color: RED,
    line_width: 2,
    dash: Some((5, 5)),
    label_scale: 2,
};

/// Stroke a `width` x `height` box whose top-left is `(x, y)`. The stroke is
/// centered on the box edge and clipped to the canvas.
pub fn draw_match_box(
    canvas: &mut RgbaImage,
    x: u32,
    y: u32,
    width: u32,
    height: u32,
    style: &BoxStyle,
) {
    if width == 0 || height == 0 {
        return;
    }
    let half = (style.line_width / 2) as i64;
    for i in 0..style.line_width.max(1) as i64 {
        let offset = i - half;
        let x0 = x as i64 + offset;
        let y0 = y as i64 + offset;
        let x1 = (x + width - 1) as i64 - offset;
        let y1 = (y + height - 1) as i64 - offset;
        if x1 < x0 || y1 < y0 {
            continue;
        }
        match style.dash {
            None => draw_hollow_rect_mut(
                canvas,
                Rect::at(x0 as i32, y0 as i32).of_size((x1 - x0 + 1) as u32, (y1 - y0 + 1) as u32),
                style.color,
            ),
            Some((on, off)) => dashed_rect(canvas, (x0, y0), (x1, y1), on, off, style.color),
        }
    }
}

/// Draw the confidence label above the box's top-left corner, pulled left
/// when it would run past the right edge.
pub fn draw_label(canvas: &mut RgbaImage, text: &str, x: u32, y: u32, style: &BoxStyle) {
    let width = text_width(text, style.label_scale);
    let x = x.min(canvas.width().saturating_sub(width));
    draw_text(
        canvas,
        text,
        x as i32,
        y as i32 - LABEL_GAP,
        style.label_scale,
        style.color,
    );
}

/// Walk the perimeter clockwise from the top-left corner; the dash pattern
/// continues around corners.
fn dashed_rect(
    canvas: &mut RgbaImage,
    (x0, y0): (i64, i64),
    (x1, y1): (i64, i64),
    on: u32,
    off: u32,
    color: Rgba<u8>,
) {
    let period = (on + off).max(1) as usize;
    let mut perimeter: Vec<(i64, i64)> = (x0..=x1).map(|x| (x, y0)).collect();
    perimeter.extend((y0 + 1..=y1).map(|y| (x1, y)));
    if y1 > y0 {
        perimeter.extend((x0..x1).rev().map(|x| (x, y1)));
    }
    if x1 > x0 {
        perimeter.extend((y0 + 1..y1).rev().map(|y| (x0, y)));
    }

    for (distance, (x, y)) in perimeter.into_iter().enumerate() {
        if distance % period < on as usize {
            put_pixel_clipped(canvas, x, y, color);
        }
    }
}

fn put_pixel_clipped(canvas: &mut RgbaImage, x: i64, y: i64, color: Rgba<u8>) {
    if x >= 0 && y >= 0 && (x as u64) < canvas.width() as u64 && (y as u64) < canvas.height() as u64 {
        canvas.put_pixel(x as u32, y as u32, color);
    }
}
