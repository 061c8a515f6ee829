//! Anti-aliased raster primitives over an RGBA frame buffer.

use std::f64::consts::TAU;

use rusttype::{point, Font, PositionedGlyph, Scale};

pub type Rgb = (u8, u8, u8);

pub struct Canvas<'a> {
    frame: &'a mut [u8],
    width: usize,
    height: usize,
}

impl<'a> Canvas<'a> {
    pub fn new(frame: &'a mut [u8], width: usize, height: usize) -> Self {
        Self {
            frame,
            width,
            height,
        }
    }

    pub fn width(&self) -> usize {
        self.width
    }

    pub fn height(&self) -> usize {
        self.height
    }

    pub fn clear(&mut self, color: Rgb) {
        for chunk in self.frame.chunks_exact_mut(4) {
            chunk.copy_from_slice(&[color.0, color.1, color.2, 0xff]);
        }
    }

    pub fn pixel(&self, x: usize, y: usize) -> Option<[u8; 4]> {
        if x >= self.width || y >= self.height {
            return None;
        }
        let idx = (y * self.width + x) * 4;
        let px = self.frame.get(idx..idx + 4)?;
        Some([px[0], px[1], px[2], px[3]])
    }

    /// Alpha-blend `color` over the pixel at `(x, y)`.
    pub fn blend(&mut self, x: i32, y: i32, color: Rgb, alpha: f32) {
        if x < 0 || y < 0 || x as usize >= self.width || y as usize >= self.height {
            return;
        }
        let idx = (y as usize * self.width + x as usize) * 4;
        let Some(dst) = self.frame.get_mut(idx..idx + 4) else {
            return;
        };
        let a = alpha.clamp(0.0, 1.0);
        let mix = |src: u8, dst: u8| (src as f32 * a + dst as f32 * (1.0 - a)).round() as u8;
        dst[0] = mix(color.0, dst[0]);
        dst[1] = mix(color.1, dst[1]);
        dst[2] = mix(color.2, dst[2]);
        dst[3] = 0xff;
    }

    /// Thick segment; `taper` narrows it towards `(x1, y1)`.
    pub fn line(&mut self, from: (f64, f64), to: (f64, f64), thickness: f32, taper: bool, color: Rgb) {
        let (x0, y0) = (from.0 as f32, from.1 as f32);
        let (x1, y1) = (to.0 as f32, to.1 as f32);
        let pad = thickness.ceil() + 1.0;
        let min_x = (x0.min(x1) - pad).floor() as i32;
        let max_x = (x0.max(x1) + pad).ceil() as i32;
        let min_y = (y0.min(y1) - pad).floor() as i32;
        let max_y = (y0.max(y1) + pad).ceil() as i32;
        let dx = x1 - x0;
        let dy = y1 - y0;
        let len_sq = (dx * dx + dy * dy).max(f32::EPSILON);
        for y in min_y..=max_y {
            for x in min_x..=max_x {
                let px = x as f32 - x0;
                let py = y as f32 - y0;
                let t = ((px * dx + py * dy) / len_sq).clamp(0.0, 1.0);
                let lx = x0 + t * dx;
                let ly = y0 + t * dy;
                let dist = ((lx - x as f32).powi(2) + (ly - y as f32).powi(2)).sqrt();
                let local = if taper {
                    thickness * (1.0 - t * 0.95)
                } else {
                    thickness
                };
                let aa = (1.0 - (dist - local / 2.0).clamp(0.0, 1.0)).clamp(0.0, 1.0);
                if aa > 0.01 {
                    self.blend(x, y, color, aa);
                }
            }
        }
    }

    pub fn disc(&mut self, cx: f64, cy: f64, radius: f64, color: Rgb) {
        let reach = radius.ceil() as i32 + 1;
        let (ox, oy) = (cx.round() as i32, cy.round() as i32);
        for y in -reach..=reach {
            for x in -reach..=reach {
                let dist = ((x * x + y * y) as f64).sqrt();
                let aa = 1.0 - (dist - radius).clamp(0.0, 1.0);
                if aa > 0.0 {
                    self.blend(ox + x, oy + y, color, aa as f32);
                }
            }
        }
    }

    /// Ring segment centred on radius `r`, from `start` sweeping clockwise by
    /// `span` radians (screen coordinates, y down).
    pub fn arc(&mut self, cx: f64, cy: f64, r: f64, thickness: f64, start: f64, span: f64, color: Rgb) {
        if span <= 0.0 || thickness <= 0.0 {
            return;
        }
        let inner = r - thickness / 2.0;
        let outer = r + thickness / 2.0;
        let reach = outer.ceil() as i32 + 1;
        let (ox, oy) = (cx.round() as i32, cy.round() as i32);
        for y in (oy - reach)..=(oy + reach) {
            for x in (ox - reach)..=(ox + reach) {
                let dx = x as f64 - cx;
                let dy = y as f64 - cy;
                let dist = (dx * dx + dy * dy).sqrt();
                if dist < inner - 1.0 || dist > outer + 1.0 {
                    continue;
                }
                if span < TAU && (dy.atan2(dx) - start).rem_euclid(TAU) > span {
                    continue;
                }
                let aa = if dist > outer {
                    1.0 - (dist - outer).min(1.0)
                } else if dist < inner {
                    1.0 - (inner - dist).min(1.0)
                } else {
                    1.0
                };
                if aa > 0.0 {
                    self.blend(x, y, color, aa as f32);
                }
            }
        }
    }

    /// Text centred on `(x, y)`.
    pub fn text(&mut self, x: f64, y: f64, text: &str, font: &Font<'_>, size: f32, color: Rgb) {
        let scale = Scale::uniform(size);
        let v_metrics = font.v_metrics(scale);
        let glyphs: Vec<PositionedGlyph> =
            font.layout(text, scale, point(0.0, v_metrics.ascent)).collect();
        let Some((min_x, max_x, min_y, max_y)) = glyphs
            .iter()
            .filter_map(|g| g.pixel_bounding_box())
            .fold(None, |acc: Option<(i32, i32, i32, i32)>, bb| {
                Some(match acc {
                    None => (bb.min.x, bb.max.x, bb.min.y, bb.max.y),
                    Some((a, b, c, d)) => {
                        (a.min(bb.min.x), b.max(bb.max.x), c.min(bb.min.y), d.max(bb.max.y))
                    }
                })
            })
        else {
            return;
        };
        let offset_x = x.round() as i32 - (max_x - min_x) / 2;
        let offset_y = y.round() as i32 - (max_y - min_y) / 2;
        for glyph in &glyphs {
            if let Some(bb) = glyph.pixel_bounding_box() {
                glyph.draw(|gx, gy, v| {
                    let px = offset_x + gx as i32 + bb.min.x - min_x;
                    let py = offset_y + gy as i32 + bb.min.y - min_y;
                    self.blend(px, py, color, v);
                });
            }
        }
    }
}
