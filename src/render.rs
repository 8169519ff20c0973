//! Cell-buffer terminal renderer: a braille subpixel canvas for the spheres,
//! orbit rings and starfield, with text and HUD drawn in cell space on top.
//! Presentation diffs against the previous frame so only changed cells are
//! written out.

use crate::kinematics::Vec3;
use crossterm::{
    cursor, execute, queue,
    style::{Color, Print, ResetColor, SetBackgroundColor, SetForegroundColor},
    terminal::{
        self, BeginSynchronizedUpdate, Clear, ClearType, DisableLineWrap, EnableLineWrap,
        EndSynchronizedUpdate, EnterAlternateScreen, LeaveAlternateScreen,
    },
};
use rand::{rngs::StdRng, Rng, SeedableRng};
use std::io::{self, Write};

/// Vertical field of view of the perspective camera, degrees.
const FOV_DEG: f64 = 60.0;
const NEAR_PLANE: f64 = 0.05;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub(crate) struct Cell {
    pub(crate) ch: char,
    pub(crate) fg: Color,
    pub(crate) bg: Color,
}

impl Default for Cell {
    fn default() -> Self {
        Self {
            ch: ' ',
            fg: Color::White,
            bg: Color::Black,
        }
    }
}

pub(crate) struct CellBuffer {
    pub(crate) w: u16,
    pub(crate) h: u16,
    pub(crate) cells: Vec<Cell>,
}

impl CellBuffer {
    pub(crate) fn new(w: u16, h: u16) -> Self {
        Self {
            w,
            h,
            cells: vec![Cell::default(); (w as usize) * (h as usize)],
        }
    }

    pub(crate) fn idx(&self, x: u16, y: u16) -> usize {
        (y as usize) * (self.w as usize) + (x as usize)
    }

    pub(crate) fn set(&mut self, x: u16, y: u16, c: Cell) {
        if x < self.w && y < self.h {
            let i = self.idx(x, y);
            self.cells[i] = c;
        }
    }

    pub(crate) fn clear(&mut self) {
        self.cells.fill(Cell::default());
    }
}

#[derive(Clone, Copy, Debug, Default)]
pub(crate) struct Pixel {
    pub(crate) r: u8,
    pub(crate) g: u8,
    pub(crate) b: u8,
    /// Treated as ink: subpixels with a >= 32 light their braille dot.
    pub(crate) a: u8,
}

pub(crate) struct PixelCanvas {
    pub(crate) w: u32,
    pub(crate) h: u32,
    pub(crate) px: Vec<Pixel>,
}

impl PixelCanvas {
    pub(crate) fn new(w: u32, h: u32) -> Self {
        Self {
            w,
            h,
            px: vec![Pixel::default(); (w as usize) * (h as usize)],
        }
    }

    pub(crate) fn idx(&self, x: u32, y: u32) -> usize {
        (y as usize) * (self.w as usize) + (x as usize)
    }

    pub(crate) fn clear(&mut self) {
        self.px.fill(Pixel::default());
    }

    /// Unconditional overwrite; callers draw back-to-front so nearer geometry
    /// occludes what it covers, including clearing dots with a blank pixel.
    pub(crate) fn put(&mut self, x: i32, y: i32, p: Pixel) {
        if x < 0 || y < 0 {
            return;
        }
        let (x, y) = (x as u32, y as u32);
        if x >= self.w || y >= self.h {
            return;
        }
        let i = self.idx(x, y);
        self.px[i] = p;
    }
}

pub(crate) struct Terminal {
    pub(crate) out: io::Stdout,
    pub(crate) cols: u16,
    pub(crate) rows: u16,
    pub(crate) prev: CellBuffer,
    pub(crate) cur: CellBuffer,
    pub(crate) canvas: PixelCanvas,
}

impl Terminal {
    pub(crate) fn begin() -> anyhow::Result<Self> {
        let mut out = io::stdout();
        execute!(
            out,
            EnterAlternateScreen,
            cursor::Hide,
            DisableLineWrap,
            terminal::Clear(ClearType::All)
        )?;
        terminal::enable_raw_mode()?;

        let (cols, rows) = terminal::size()?;
        Ok(Self {
            out,
            cols,
            rows,
            prev: CellBuffer::new(cols, rows),
            cur: CellBuffer::new(cols, rows),
            // braille: 2x4 subpixels per cell
            canvas: PixelCanvas::new(cols as u32 * 2, rows as u32 * 4),
        })
    }

    pub(crate) fn end(&mut self) -> anyhow::Result<()> {
        queue!(
            self.out,
            BeginSynchronizedUpdate,
            ResetColor,
            Clear(ClearType::All),
            cursor::Show,
            EnableLineWrap,
            EndSynchronizedUpdate,
            LeaveAlternateScreen
        )?;
        self.out.flush()?;
        terminal::disable_raw_mode()?;
        Ok(())
    }

    pub(crate) fn resize_if_needed(&mut self) -> anyhow::Result<bool> {
        let (c, r) = terminal::size()?;
        if c == self.cols && r == self.rows {
            return Ok(false);
        }
        self.cols = c;
        self.rows = r;
        self.prev = CellBuffer::new(c, r);
        self.cur = CellBuffer::new(c, r);
        self.canvas = PixelCanvas::new(c as u32 * 2, r as u32 * 4);
        execute!(self.out, terminal::Clear(ClearType::All))?;
        Ok(true)
    }

    pub(crate) fn present(&mut self) -> anyhow::Result<()> {
        queue!(self.out, BeginSynchronizedUpdate)?;

        let mut last_fg = None;
        let mut last_bg = None;

        for y in 0..self.rows {
            for x in 0..self.cols {
                let i = self.cur.idx(x, y);
                let c = self.cur.cells[i];
                if c == self.prev.cells[i] {
                    continue;
                }

                queue!(self.out, cursor::MoveTo(x, y))?;
                if last_fg != Some(c.fg) {
                    queue!(self.out, SetForegroundColor(c.fg))?;
                    last_fg = Some(c.fg);
                }
                if last_bg != Some(c.bg) {
                    queue!(self.out, SetBackgroundColor(c.bg))?;
                    last_bg = Some(c.bg);
                }
                queue!(self.out, Print(c.ch))?;
            }
        }

        queue!(self.out, ResetColor, EndSynchronizedUpdate)?;
        self.out.flush()?;
        self.prev.cells.copy_from_slice(&self.cur.cells);
        Ok(())
    }
}

/* -----------------------------
   Braille encoding: 2x4 subpixels -> U+2800..U+28FF
------------------------------ */

fn braille_bit(dx: u32, dy: u32) -> u8 {
    match (dx, dy) {
        (0, 0) => 0x01,
        (0, 1) => 0x02,
        (0, 2) => 0x04,
        (0, 3) => 0x40,
        (1, 0) => 0x08,
        (1, 1) => 0x10,
        (1, 2) => 0x20,
        (1, 3) => 0x80,
        _ => 0x00,
    }
}

pub(crate) fn canvas_to_cells(canvas: &PixelCanvas, out: &mut CellBuffer) {
    let cols = out.w as u32;
    let rows = out.h as u32;

    for cy in 0..rows {
        for cx in 0..cols {
            let px0 = cx * 2;
            let py0 = cy * 4;

            let mut mask: u8 = 0;
            let mut sum_r: u32 = 0;
            let mut sum_g: u32 = 0;
            let mut sum_b: u32 = 0;
            let mut ink: u32 = 0;

            for dy in 0..4 {
                for dx in 0..2 {
                    let x = px0 + dx;
                    let y = py0 + dy;
                    if x >= canvas.w || y >= canvas.h {
                        continue;
                    }
                    let p = canvas.px[canvas.idx(x, y)];
                    if p.a >= 32 {
                        mask |= braille_bit(dx, dy);
                        sum_r += p.r as u32;
                        sum_g += p.g as u32;
                        sum_b += p.b as u32;
                        ink += 1;
                    }
                }
            }

            let ch = char::from_u32(0x2800 + (mask as u32)).unwrap_or(' ');
            let fg = if ink > 0 {
                Color::Rgb {
                    r: (sum_r / ink) as u8,
                    g: (sum_g / ink) as u8,
                    b: (sum_b / ink) as u8,
                }
            } else {
                Color::White
            };

            out.set(
                cx as u16,
                cy as u16,
                Cell {
                    ch,
                    fg,
                    bg: Color::Black,
                },
            );
        }
    }
}

/// Ordered-dither threshold for a 2x4 subpixel block.
fn bayer_2x4_threshold(ix: i32, iy: i32) -> f64 {
    const M: [[u8; 2]; 4] = [[0, 4], [6, 2], [1, 5], [7, 3]];
    let v = M[(iy & 3) as usize][(ix & 1) as usize] as f64;
    (v + 0.5) / 8.0
}

/* -----------------------------
   Perspective camera projection
------------------------------ */

pub(crate) struct Projection {
    eye: Vec3,
    right: Vec3,
    up: Vec3,
    forward: Vec3,
    focal: f64,
    cx: f64,
    cy: f64,
}

impl Projection {
    /// Look-at basis for an eye orbiting the target; world up is +Y. The
    /// camera's polar angle is clamped well away from the poles, so the basis
    /// never degenerates.
    pub(crate) fn new(eye: Vec3, target: Vec3, canvas_w: u32, canvas_h: u32) -> Self {
        let forward = target.sub(eye).normalized();
        let right = forward.cross(Vec3::new(0.0, 1.0, 0.0)).normalized();
        let up = right.cross(forward);
        let focal = (canvas_h as f64 / 2.0) / (FOV_DEG.to_radians() / 2.0).tan();
        Self {
            eye,
            right,
            up,
            forward,
            focal,
            cx: canvas_w as f64 / 2.0,
            cy: canvas_h as f64 / 2.0,
        }
    }

    /// Subpixel screen position and view depth, or None behind the camera.
    pub(crate) fn to_screen(&self, p: Vec3) -> Option<(f64, f64, f64)> {
        let v = p.sub(self.eye);
        let depth = v.dot(self.forward);
        if depth <= NEAR_PLANE {
            return None;
        }
        let sx = self.cx + v.dot(self.right) / depth * self.focal;
        let sy = self.cy - v.dot(self.up) / depth * self.focal;
        Some((sx, sy, depth))
    }

    /// Subpixels per world unit at the given view depth.
    pub(crate) fn scale_at(&self, depth: f64) -> f64 {
        self.focal / depth
    }
}

/* -----------------------------
   Scene primitives
------------------------------ */

/// One shaded sphere, dithered into the braille canvas. `spin_deg` and
/// `tilt_deg` drive a faint longitude pattern so the spin is visible without
/// textures; `self_lit` bodies (the Sun) ignore the light direction.
#[allow(clippy::too_many_arguments)]
pub(crate) fn draw_sphere(
    canvas: &mut PixelCanvas,
    proj: &Projection,
    center: Vec3,
    world_radius: f64,
    color: (u8, u8, u8),
    light_dir: Vec3,
    self_lit: bool,
    spin_deg: f64,
    tilt_deg: f64,
) {
    let Some((sx, sy, depth)) = proj.to_screen(center) else {
        return;
    };
    let r = (world_radius * proj.scale_at(depth)).max(0.6);

    let x0 = ((sx - r).floor() as i32).max(0);
    let x1 = ((sx + r).ceil() as i32).min(canvas.w as i32 - 1);
    let y0 = ((sy - r).floor() as i32).max(0);
    let y1 = ((sy + r).ceil() as i32).min(canvas.h as i32 - 1);
    if x1 < x0 || y1 < y0 {
        return;
    }

    let (tilt_s, tilt_c) = tilt_deg.to_radians().sin_cos();
    let spin = spin_deg.to_radians();

    for py in y0..=y1 {
        for px in x0..=x1 {
            let nx = (px as f64 + 0.5 - sx) / r;
            let ny = -(py as f64 + 0.5 - sy) / r; // screen y grows downward
            let d2 = nx * nx + ny * ny;
            if d2 > 1.0 {
                continue;
            }
            let nz = (1.0 - d2).sqrt();

            // camera-facing hemisphere normal in world space
            let normal = proj
                .right
                .scale(nx)
                .add(proj.up.scale(ny))
                .add(proj.forward.scale(-nz));

            let lit = if self_lit {
                // limb darkening only
                1.0 - 0.30 * d2.sqrt()
            } else {
                let ndotl = normal.dot(light_dir).max(0.0);
                0.06 + 0.94 * ndotl.powf(0.9)
            };

            // tilt the spin axis in the view plane, then take the longitude
            let tx = tilt_c * nx - tilt_s * ny;
            let lon = tx.atan2(nz) + spin;
            let pattern = if self_lit {
                1.0
            } else {
                0.86 + 0.14 * (4.0 * lon).sin()
            };

            let intensity = (lit * pattern).clamp(0.0, 1.0);
            let th = bayer_2x4_threshold(px, py);
            if intensity > th {
                let level = 0.35 + 0.65 * intensity;
                canvas.put(
                    px,
                    py,
                    Pixel {
                        r: (color.0 as f64 * level) as u8,
                        g: (color.1 as f64 * level) as u8,
                        b: (color.2 as f64 * level) as u8,
                        a: 255,
                    },
                );
            } else {
                // dark side still occludes whatever sits behind the disc
                canvas.put(px, py, Pixel::default());
            }
        }
    }
}

/// Dotted ring of the given orbital radius around a parent position, in the
/// shared horizontal plane.
pub(crate) fn draw_orbit_ring(
    canvas: &mut PixelCanvas,
    proj: &Projection,
    parent: Vec3,
    orbit_radius: f64,
    color: (u8, u8, u8),
) {
    if orbit_radius <= 0.0 {
        return;
    }
    let steps = ((canvas.w + canvas.h) as i32).clamp(180, 1400);
    for s in 0..steps {
        if s % 3 != 0 {
            continue;
        }
        let a = std::f64::consts::TAU * (s as f64 / steps as f64);
        let p = Vec3::new(
            parent.x + orbit_radius * a.sin(),
            parent.y,
            parent.z + orbit_radius * a.cos(),
        );
        if let Some((sx, sy, _)) = proj.to_screen(p) {
            canvas.put(
                sx as i32,
                sy as i32,
                Pixel {
                    r: color.0 / 3,
                    g: color.1 / 3,
                    b: color.2 / 3,
                    a: 255,
                },
            );
        }
    }
}

/* -----------------------------
   Starfield backdrop
------------------------------ */

#[derive(Clone, Copy)]
pub(crate) struct Star {
    x: u32,
    y: u32,
    phase: f64,
    depth: f64,
}

pub(crate) fn build_stars(canvas_w: u32, canvas_h: u32, seed: u64) -> Vec<Star> {
    let mut rng = StdRng::seed_from_u64(seed);
    let count = ((canvas_w * canvas_h) / 320).clamp(80, 500) as usize;
    let mut stars = Vec::with_capacity(count);
    if canvas_w == 0 || canvas_h == 0 {
        return stars;
    }
    for _ in 0..count {
        stars.push(Star {
            x: rng.gen_range(0..canvas_w),
            y: rng.gen_range(0..canvas_h),
            phase: rng.gen_range(0.0..std::f64::consts::TAU),
            depth: rng.gen_range(0.35..1.0),
        });
    }
    stars
}

pub(crate) fn draw_stars(canvas: &mut PixelCanvas, stars: &[Star], t_real: f64) {
    for s in stars {
        let tw = ((t_real * 0.65 + s.phase).sin() * 0.5 + 0.5) * s.depth;
        let c = (60.0 + tw * 170.0) as u8;
        canvas.put(
            s.x as i32,
            s.y as i32,
            Pixel {
                r: c,
                g: c,
                b: c.saturating_add(20),
                a: if tw > 0.12 { 255 } else { 0 },
            },
        );
    }
}

/* -----------------------------
   Cell-space text and boxes (HUD)
------------------------------ */

pub(crate) fn write_str(buf: &mut CellBuffer, x: u16, y: u16, s: &str, fg: Color) {
    if y >= buf.h {
        return;
    }
    let mut xi = x;
    for ch in s.chars() {
        if xi >= buf.w {
            break;
        }
        buf.set(
            xi,
            y,
            Cell {
                ch,
                fg,
                bg: Color::Black,
            },
        );
        xi += 1;
    }
}

pub(crate) fn box_draw(buf: &mut CellBuffer, x0: u16, y0: u16, bw: u16, bh: u16, fg: Color) {
    if bw < 2 || bh < 2 {
        return;
    }
    let x1 = x0.saturating_add(bw - 1);
    let y1 = y0.saturating_add(bh - 1);
    let bg = Color::Black;

    for x in x0 + 1..x1 {
        buf.set(x, y0, Cell { ch: '─', fg, bg });
        buf.set(x, y1, Cell { ch: '─', fg, bg });
    }
    for y in y0 + 1..y1 {
        buf.set(x0, y, Cell { ch: '│', fg, bg });
        buf.set(x1, y, Cell { ch: '│', fg, bg });
    }
    buf.set(x0, y0, Cell { ch: '┌', fg, bg });
    buf.set(x1, y0, Cell { ch: '┐', fg, bg });
    buf.set(x0, y1, Cell { ch: '└', fg, bg });
    buf.set(x1, y1, Cell { ch: '┘', fg, bg });
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn projection_centers_the_lookat_target() {
        let eye = Vec3::new(0.0, 0.0, 10.0);
        let proj = Projection::new(eye, Vec3::ZERO, 200, 100);
        let (sx, sy, depth) = proj.to_screen(Vec3::ZERO).unwrap();
        assert!((sx - 100.0).abs() < 1e-9);
        assert!((sy - 50.0).abs() < 1e-9);
        assert!((depth - 10.0).abs() < 1e-9);
    }

    #[test]
    fn points_behind_the_camera_are_culled() {
        let proj = Projection::new(Vec3::new(0.0, 0.0, 10.0), Vec3::ZERO, 200, 100);
        assert!(proj.to_screen(Vec3::new(0.0, 0.0, 20.0)).is_none());
    }

    #[test]
    fn nearer_points_project_larger() {
        let proj = Projection::new(Vec3::new(0.0, 0.0, 10.0), Vec3::ZERO, 200, 100);
        assert!(proj.scale_at(2.0) > proj.scale_at(8.0));
    }

    #[test]
    fn canvas_ink_lights_braille_dots() {
        let mut canvas = PixelCanvas::new(2, 4);
        let mut cells = CellBuffer::new(1, 1);
        canvas.put(
            0,
            0,
            Pixel {
                r: 255,
                g: 255,
                b: 255,
                a: 255,
            },
        );
        canvas_to_cells(&canvas, &mut cells);
        assert_eq!(cells.cells[0].ch, '\u{2801}');

        canvas.put(0, 0, Pixel::default());
        canvas_to_cells(&canvas, &mut cells);
        assert_eq!(cells.cells[0].ch, '\u{2800}');
    }
}
