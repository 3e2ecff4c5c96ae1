// SPDX-License-Identifier: MIT
// Copyright 2026 The campuspass authors

//! Card rasterization.
//!
//! Coordinates below are in 1x card units; the canvas multiplies everything
//! by the export scale.

use font8x8::{UnicodeFonts, BASIC_FONTS, LATIN_FONTS};
use image::imageops::FilterType;
use image::{DynamicImage, Rgb as Pixel, RgbImage};
use qrcode::{EcLevel, QrCode};

use crate::models::card::Rgb;
use crate::services::card::CardLayout;

/// Card size at 1x.
pub const CARD_WIDTH: u32 = 400;
pub const CARD_HEIGHT: u32 = 440;
const MAX_SCALE: u32 = 8;

const WHITE: Rgb = [255, 255, 255];
const BLACK: Rgb = [0, 0, 0];
/// Glyph cell size of the bitmap font at size 1.
const GLYPH: u32 = 8;

const PHOTO_CX: i64 = 64;
const PHOTO_CY: i64 = 124;
const PHOTO_R: i64 = 40;
const QR_SIZE: u32 = 120;
const QR_PAD: u32 = 8;

/// Errors from drawing or encoding a card.
#[derive(Debug, thiserror::Error)]
pub enum RenderError {
    #[error("Unsupported render scale: {0}")]
    InvalidScale(u32),

    #[error("Failed to build QR code: {0}")]
    Qr(String),

    #[error("Failed to encode JPEG: {0}")]
    Encode(String),

    #[error("Render task failed: {0}")]
    Task(String),
}

/// Turns a card layout into a bitmap.
pub trait Rasterizer: Send + Sync + 'static {
    fn rasterize(
        &self,
        layout: &CardLayout,
        photo: Option<&DynamicImage>,
        scale: u32,
    ) -> Result<RgbImage, RenderError>;
}

/// Draws cards with plain pixel operations and an 8x8 bitmap font.
#[derive(Debug, Default, Clone, Copy)]
pub struct BitmapRasterizer;

impl Rasterizer for BitmapRasterizer {
    fn rasterize(
        &self,
        layout: &CardLayout,
        photo: Option<&DynamicImage>,
        scale: u32,
    ) -> Result<RgbImage, RenderError> {
        if scale == 0 || scale > MAX_SCALE {
            return Err(RenderError::InvalidScale(scale));
        }

        let palette = layout.color.palette();
        let text = palette.text;
        let mut canvas = Canvas::new(scale);

        canvas.horizontal_gradient(palette.from, palette.to);

        // Header
        canvas.text(24, 24, &layout.title, 2, text);
        canvas.text(24, 46, &layout.subtitle, 1, text);
        canvas.fill_rect(350, 20, 30, 30, WHITE);
        canvas.line(357, 35, 363, 42, 3, palette.accent);
        canvas.line(363, 42, 373, 28, 3, palette.accent);

        // Photo or placeholder
        match photo {
            Some(img) => canvas.photo_circle(PHOTO_CX, PHOTO_CY, PHOTO_R, img),
            None => canvas.placeholder_circle(PHOTO_CX, PHOTO_CY, PHOTO_R, palette.accent),
        }

        // Identity
        let max_chars = ((CARD_WIDTH - 124) / GLYPH) as usize;
        canvas.text(120, 100, &fit(&layout.name, max_chars / 2), 2, text);
        canvas.text(120, 124, &fit(&layout.course_line, max_chars), 1, text);
        canvas.text(120, 140, &fit(&layout.campus_line, max_chars), 1, text);

        // Info panel
        canvas.blend_rect(16, 176, CARD_WIDTH - 32, 60, WHITE, 0.15);
        let columns = [
            (28, "Matrícula", &layout.registration_number),
            (152, "Código", &layout.unique_code),
            (276, "Validade", &layout.valid_until),
        ];
        for (x, label, value) in columns {
            canvas.text(x, 188, label, 1, text);
            canvas.text(x, 206, &fit(value, 14), 1, text);
        }

        // QR code on a white tile
        let tile = QR_SIZE + 2 * QR_PAD;
        let tile_x = (CARD_WIDTH - tile) / 2;
        let tile_y = 250;
        canvas.fill_rect(tile_x, tile_y, tile, tile, WHITE);
        canvas.qr(tile_x + QR_PAD, tile_y + QR_PAD, QR_SIZE, &layout.qr_payload)?;

        canvas.text_centered(tile_y + tile + 10, &layout.semester_start, 1, text);
        canvas.text_centered(tile_y + tile + 26, &layout.footer, 1, text);

        Ok(canvas.into_image())
    }
}

/// Truncate to `max` characters, marking the cut with a trailing dot.
fn fit(text: &str, max: usize) -> String {
    if text.chars().count() <= max {
        return text.to_string();
    }
    let mut out: String = text.chars().take(max.saturating_sub(1)).collect();
    out.push('.');
    out
}

fn glyph(c: char) -> [u8; 8] {
    let c = match c {
        '•' => '·',
        other => other,
    };
    BASIC_FONTS
        .get(c)
        .or_else(|| LATIN_FONTS.get(c))
        .or_else(|| BASIC_FONTS.get('?'))
        .unwrap_or([0; 8])
}

fn lerp(a: Rgb, b: Rgb, t: f32) -> Rgb {
    let mix = |x: u8, y: u8| (x as f32 + (y as f32 - x as f32) * t).round() as u8;
    [mix(a[0], b[0]), mix(a[1], b[1]), mix(a[2], b[2])]
}

/// Scaled drawing surface.
struct Canvas {
    img: RgbImage,
    scale: u32,
}

impl Canvas {
    fn new(scale: u32) -> Self {
        Self {
            img: RgbImage::new(CARD_WIDTH * scale, CARD_HEIGHT * scale),
            scale,
        }
    }

    fn into_image(self) -> RgbImage {
        self.img
    }

    /// Set a device pixel, ignoring anything off-canvas.
    fn put(&mut self, x: i64, y: i64, color: Rgb) {
        if x >= 0 && y >= 0 && (x as u32) < self.img.width() && (y as u32) < self.img.height() {
            self.img.put_pixel(x as u32, y as u32, Pixel(color));
        }
    }

    fn horizontal_gradient(&mut self, from: Rgb, to: Rgb) {
        let width = self.img.width().max(2);
        for x in 0..self.img.width() {
            let color = lerp(from, to, x as f32 / (width - 1) as f32);
            for y in 0..self.img.height() {
                self.img.put_pixel(x, y, Pixel(color));
            }
        }
    }

    fn fill_rect(&mut self, x: u32, y: u32, w: u32, h: u32, color: Rgb) {
        let s = self.scale;
        for py in (y * s)..((y + h) * s) {
            for px in (x * s)..((x + w) * s) {
                self.put(px as i64, py as i64, color);
            }
        }
    }

    fn blend_rect(&mut self, x: u32, y: u32, w: u32, h: u32, color: Rgb, alpha: f32) {
        let s = self.scale;
        let max_x = ((x + w) * s).min(self.img.width());
        let max_y = ((y + h) * s).min(self.img.height());
        for py in (y * s)..max_y {
            for px in (x * s)..max_x {
                let under = self.img.get_pixel(px, py).0;
                self.img.put_pixel(px, py, Pixel(lerp(under, color, alpha)));
            }
        }
    }

    /// Thick line between two 1x points.
    fn line(&mut self, x0: i64, y0: i64, x1: i64, y1: i64, thickness: i64, color: Rgb) {
        let s = self.scale as i64;
        let (x0, y0, x1, y1) = (x0 * s, y0 * s, x1 * s, y1 * s);
        let half = (thickness * s) / 2;
        let steps = (x1 - x0).abs().max((y1 - y0).abs()).max(1);
        for i in 0..=steps {
            let x = x0 + (x1 - x0) * i / steps;
            let y = y0 + (y1 - y0) * i / steps;
            for dy in -half..=half {
                for dx in -half..=half {
                    self.put(x + dx, y + dy, color);
                }
            }
        }
    }

    /// Photo cropped to a circle with a white ring.
    fn photo_circle(&mut self, cx: i64, cy: i64, r: i64, photo: &DynamicImage) {
        let s = self.scale as i64;
        let (cx, cy, r) = (cx * s, cy * s, r * s);
        let side = (2 * r) as u32;
        let fitted = photo.resize_to_fill(side, side, FilterType::Triangle).to_rgb8();
        let ring = 2 * s;

        for dy in -r..r {
            for dx in -r..r {
                let d2 = dx * dx + dy * dy;
                if d2 >= r * r {
                    continue;
                }
                let color = if d2 >= (r - ring) * (r - ring) {
                    WHITE
                } else {
                    fitted.get_pixel((dx + r) as u32, (dy + r) as u32).0
                };
                self.put(cx + dx, cy + dy, color);
            }
        }
    }

    /// White disc with a head-and-shoulders glyph.
    fn placeholder_circle(&mut self, cx: i64, cy: i64, r: i64, accent: Rgb) {
        let s = self.scale as i64;
        let (cx, cy, r) = (cx * s, cy * s, r * s);
        let (head_cy, head_r) = (cy - 8 * s, 12 * s);
        let (body_cy, body_r) = (cy + 26 * s, 22 * s);

        for dy in -r..r {
            for dx in -r..r {
                if dx * dx + dy * dy >= r * r {
                    continue;
                }
                let (x, y) = (cx + dx, cy + dy);
                let in_head = (x - cx).pow(2) + (y - head_cy).pow(2) < head_r * head_r;
                let in_body = (x - cx).pow(2) + (y - body_cy).pow(2) < body_r * body_r;
                self.put(x, y, if in_head || in_body { accent } else { WHITE });
            }
        }
    }

    fn text_width(text: &str, size: u32) -> u32 {
        text.chars().count() as u32 * GLYPH * size
    }

    fn text(&mut self, x: u32, y: u32, text: &str, size: u32, color: Rgb) {
        let cell = (size * self.scale) as i64;
        let mut pen_x = (x * self.scale) as i64;
        let top = (y * self.scale) as i64;

        for c in text.chars() {
            for (row, bits) in glyph(c).iter().enumerate() {
                for col in 0..GLYPH as i64 {
                    if bits & (1 << col) == 0 {
                        continue;
                    }
                    for dy in 0..cell {
                        for dx in 0..cell {
                            self.put(pen_x + col * cell + dx, top + row as i64 * cell + dy, color);
                        }
                    }
                }
            }
            pen_x += GLYPH as i64 * cell;
        }
    }

    fn text_centered(&mut self, y: u32, text: &str, size: u32, color: Rgb) {
        let width = Self::text_width(text, size);
        let x = CARD_WIDTH.saturating_sub(width) / 2;
        self.text(x, y, text, size, color);
    }

    fn qr(&mut self, x: u32, y: u32, size: u32, payload: &str) -> Result<(), RenderError> {
        let code = QrCode::with_error_correction_level(payload.as_bytes(), EcLevel::H)
            .map_err(|e| RenderError::Qr(e.to_string()))?;
        let modules = code.width() as u32;
        let colors = code.to_colors();

        let area = size * self.scale;
        let module_px = (area / modules).max(1);
        let offset = (area.saturating_sub(module_px * modules)) / 2;
        let origin_x = x * self.scale + offset;
        let origin_y = y * self.scale + offset;

        for (i, color) in colors.iter().enumerate() {
            if *color != qrcode::Color::Dark {
                continue;
            }
            let mx = i as u32 % modules;
            let my = i as u32 / modules;
            for dy in 0..module_px {
                for dx in 0..module_px {
                    self.put(
                        (origin_x + mx * module_px + dx) as i64,
                        (origin_y + my * module_px + dy) as i64,
                        BLACK,
                    );
                }
            }
        }
        Ok(())
    }
}
