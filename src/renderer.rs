use anyhow::{Context, Result};
use image::{Rgba, RgbaImage};
use rusttype::{point, Font, PositionedGlyph, Scale};
use std::fs;
use std::path::Path;

/// Gradient endpoints, top to bottom (#8b5cf6 → #6d28d9).
const GRADIENT_TOP: [u8; 3] = [139, 92, 246];
const GRADIENT_BOTTOM: [u8; 3] = [109, 40, 217];

const CORNER_RADIUS_RATIO: f32 = 0.2;
const RING_RADIUS_RATIO: f32 = 0.27;
const RING_STROKE_RATIO: f32 = 0.047;
const CHECK_STROKE_RATIO: f32 = 0.065;
const CAPTION_SCALE_RATIO: f32 = 0.095;
const CAPTION_TOP_RATIO: f32 = 0.80;

const RING_TRACK: Rgba<u8> = Rgba([255, 255, 255, 100]);
const WHITE: Rgba<u8> = Rgba([255, 255, 255, 255]);

/// Caption drawn on icons large enough to fit legible text.
const CAPTION: &str = "2026";
const CAPTION_MIN_EDGE: u32 = 144;
const CAPTION_ALPHA: u8 = 230;

/// Candidate caption fonts, tried in order when no override is given.
const FONT_SEARCH_PATHS: &[&str] = &[
    "/usr/share/fonts/truetype/dejavu/DejaVuSans.ttf",
    "/usr/share/fonts/TTF/DejaVuSans.ttf",
    "/usr/share/fonts/truetype/liberation/LiberationSans-Regular.ttf",
    "/System/Library/Fonts/Supplemental/Arial.ttf",
    "/Library/Fonts/Arial.ttf",
    "C:/Windows/Fonts/arial.ttf",
];

/// Renders one icon at the given edge length.
///
/// Layers, in order: vertical purple gradient, rounded-corner alpha clip,
/// progress ring, checkmark, and (for edges of 144px and up) the "2026"
/// caption. A caption font that can't be loaded is logged and skipped;
/// everything else is infallible per-pixel arithmetic.
pub fn render_icon(size: u32, font_override: Option<&Path>) -> RgbaImage {
    let mut img = RgbaImage::new(size, size);

    fill_gradient(&mut img);
    apply_rounded_corners(&mut img, (size as f32 * CORNER_RADIUS_RATIO).round() as u32);
    draw_progress_ring(&mut img);
    draw_checkmark(&mut img);

    if size >= CAPTION_MIN_EDGE {
        if let Err(err) = draw_caption(&mut img, size, font_override) {
            println!("  Could not add text to {size}x{size}: {err:#}");
        }
    }

    img
}

/// Fills the canvas with a vertical linear gradient, one opaque color per row.
fn fill_gradient(img: &mut RgbaImage) {
    let size = img.height();
    for y in 0..size {
        let t = y as f32 / size as f32;
        let mut channels = [0u8; 3];
        for c in 0..3 {
            channels[c] = (GRADIENT_TOP[c] as f32 * (1.0 - t) + GRADIENT_BOTTOM[c] as f32 * t)
                .round() as u8;
        }
        let pixel = Rgba([channels[0], channels[1], channels[2], 255]);
        for x in 0..img.width() {
            img.put_pixel(x, y, pixel);
        }
    }
}

/// Clears the alpha channel outside a rounded rectangle spanning the whole
/// canvas. Only the four corner squares need the distance test; the edge
/// strips and the interior stay fully opaque. A one-pixel anti-aliased band
/// softens the circular boundary.
fn apply_rounded_corners(img: &mut RgbaImage, radius: u32) {
    let max = (img.width() - 1) as f32;
    let r = radius as f32;

    for y in 0..img.height() {
        for x in 0..img.width() {
            let fx = x as f32;
            let fy = y as f32;
            let near_left = fx < r;
            let near_right = fx > max - r;
            let near_top = fy < r;
            let near_bottom = fy > max - r;
            if !(near_left || near_right) || !(near_top || near_bottom) {
                continue;
            }

            let cx = if near_left { r } else { max - r };
            let cy = if near_top { r } else { max - r };
            let dx = fx - cx;
            let dy = fy - cy;
            let distance = (dx * dx + dy * dy).sqrt();

            if distance > r {
                img.put_pixel(x, y, Rgba([0, 0, 0, 0]));
            } else if distance > r - 1.0 {
                let pixel = img.get_pixel_mut(x, y);
                pixel[3] = (pixel[3] as f32 * (r - distance)) as u8;
            }
        }
    }
}

/// Draws the 75% progress ring: a faint full-circle track with a bright arc
/// on top. Ring pixels are written directly rather than composited, so the
/// track genuinely is translucent white, matching the reference art.
fn draw_progress_ring(img: &mut RgbaImage) {
    let size = img.width();
    let center = (size / 2) as f32;
    let radius = (size as f32 * RING_RADIUS_RATIO).round();
    let stroke = (size as f32 * RING_STROKE_RATIO).round().max(3.0);
    let half = stroke / 2.0;

    let lo = (center - radius - half).floor().max(0.0) as u32;
    let hi = ((center + radius + half).ceil() as u32).min(size - 1);
    for y in lo..=hi {
        for x in lo..=hi {
            let dx = x as f32 - center;
            let dy = y as f32 - center;
            let distance = (dx * dx + dy * dy).sqrt();
            if (distance - radius).abs() > half {
                continue;
            }

            // Screen coordinates put 0° at 3 o'clock and -90° at 12 o'clock,
            // so the -90°..180° sweep starts at the top and runs 270°
            // clockwise, leaving the top-left quadrant as bare track.
            let angle = dy.atan2(dx).to_degrees();
            let color = if angle >= -90.0 { WHITE } else { RING_TRACK };
            img.put_pixel(x, y, color);
        }
    }
}

/// Draws the checkmark as two thick segments sharing their middle vertex.
fn draw_checkmark(img: &mut RgbaImage) {
    let size = img.width() as f32;
    let stroke = (size * CHECK_STROKE_RATIO).round().max(4.0);

    let p1 = ((size * 0.35).floor(), (size * 0.50).floor());
    let p2 = ((size * 0.45).floor(), (size * 0.60).floor());
    let p3 = ((size * 0.67).floor(), (size * 0.38).floor());

    draw_thick_segment(img, p1, p2, stroke, WHITE);
    draw_thick_segment(img, p2, p3, stroke, WHITE);
}

fn draw_thick_segment(
    img: &mut RgbaImage,
    a: (f32, f32),
    b: (f32, f32),
    stroke: f32,
    color: Rgba<u8>,
) {
    let half = stroke / 2.0;
    let x0 = (a.0.min(b.0) - half).floor().max(0.0) as u32;
    let y0 = (a.1.min(b.1) - half).floor().max(0.0) as u32;
    let x1 = ((a.0.max(b.0) + half).ceil() as u32).min(img.width() - 1);
    let y1 = ((a.1.max(b.1) + half).ceil() as u32).min(img.height() - 1);

    for y in y0..=y1 {
        for x in x0..=x1 {
            if distance_to_segment(x as f32, y as f32, a, b) <= half {
                img.put_pixel(x, y, color);
            }
        }
    }
}

fn distance_to_segment(px: f32, py: f32, a: (f32, f32), b: (f32, f32)) -> f32 {
    let abx = b.0 - a.0;
    let aby = b.1 - a.1;
    let len_sq = abx * abx + aby * aby;
    let t = if len_sq == 0.0 {
        0.0
    } else {
        (((px - a.0) * abx + (py - a.1) * aby) / len_sq).clamp(0.0, 1.0)
    };
    let cx = a.0 + t * abx;
    let cy = a.1 + t * aby;
    ((px - cx).powi(2) + (py - cy).powi(2)).sqrt()
}

/// Rasterizes the "2026" caption, horizontally centered with the top of the
/// text at 80% of the edge length. Fails if no usable font can be loaded;
/// the caller treats that as non-fatal.
fn draw_caption(img: &mut RgbaImage, size: u32, font_override: Option<&Path>) -> Result<()> {
    let font = load_caption_font(font_override)?;
    let scale = Scale::uniform((size as f32 * CAPTION_SCALE_RATIO).round());
    let v_metrics = font.v_metrics(scale);

    let glyphs: Vec<PositionedGlyph<'_>> = font
        .layout(CAPTION, scale, point(0.0, v_metrics.ascent))
        .collect();

    let bounds = glyphs
        .iter()
        .filter_map(|g| g.pixel_bounding_box())
        .fold(None, |acc: Option<(i32, i32)>, bb| match acc {
            Some((lo, hi)) => Some((lo.min(bb.min.x), hi.max(bb.max.x))),
            None => Some((bb.min.x, bb.max.x)),
        });
    let (min_x, max_x) = bounds.context("Caption produced no visible glyphs")?;

    let offset_x = (size as i32 - (max_x - min_x)) / 2 - min_x;
    let offset_y = (size as f32 * CAPTION_TOP_RATIO).round() as i32;

    for glyph in &glyphs {
        if let Some(bb) = glyph.pixel_bounding_box() {
            glyph.draw(|gx, gy, coverage| {
                if coverage <= 0.0 {
                    return;
                }
                let x = bb.min.x + gx as i32 + offset_x;
                let y = bb.min.y + gy as i32 + offset_y;
                if x >= 0 && y >= 0 && (x as u32) < img.width() && (y as u32) < img.height() {
                    let alpha = (coverage * f32::from(CAPTION_ALPHA)).round() as u8;
                    blend_pixel(img.get_pixel_mut(x as u32, y as u32), [255, 255, 255], alpha);
                }
            });
        }
    }

    Ok(())
}

/// Loads the caption font from the override path, or from the first readable
/// entry of the platform search list.
fn load_caption_font(path_override: Option<&Path>) -> Result<Font<'static>> {
    if let Some(path) = path_override {
        let data =
            fs::read(path).with_context(|| format!("Can't read font {}", path.display()))?;
        return Font::try_from_vec(data)
            .with_context(|| format!("Unsupported font data in {}", path.display()));
    }

    for candidate in FONT_SEARCH_PATHS {
        if let Ok(data) = fs::read(candidate) {
            if let Some(font) = Font::try_from_vec(data) {
                return Ok(font);
            }
        }
    }

    anyhow::bail!("No usable caption font found on this system")
}

/// Source-over blend of a translucent color onto one pixel.
fn blend_pixel(pixel: &mut Rgba<u8>, color: [u8; 3], alpha: u8) {
    let a = alpha as u32;
    let inv = 255 - a;
    for c in 0..3 {
        pixel[c] = ((color[c] as u32 * a + pixel[c] as u32 * inv) / 255) as u8;
    }
    pixel[3] = (a + pixel[3] as u32 * inv / 255) as u8;
}
