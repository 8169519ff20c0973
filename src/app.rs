//! Animation loop: fixed-step simulation ticks, camera control and frame
//! composition. All bodies are advanced for a tick before any position is
//! read for the frame.

use crate::catalog::BodyId;
use crate::input::{collect_input_nonblocking, map_key_to_action, ViewerAction};
use crate::kinematics::{DistanceMode, SolarSystemState, Vec3, TIME_SCALE};
use crate::render::{
    box_draw, build_stars, canvas_to_cells, draw_orbit_ring, draw_sphere, draw_stars, write_str,
    Projection, Star, Terminal,
};
use crossterm::style::Color;
use std::time::{Duration, Instant};

const FPS_CAP: u64 = 30;
/// Simulated tick cadence; every elapsed millisecond advances all angles once.
const TICK_STEP: Duration = Duration::from_millis(1);

/// Spherical orbit around the viewed body. Azimuth is composed with the
/// body's revolution angle so the camera co-rotates with its target.
struct Camera {
    theta: f64,
    phi: f64,
    dist: f64,
}

impl Camera {
    const PHI_LOWER: f64 = 10.0 * std::f64::consts::PI / 180.0;
    const PHI_UPPER: f64 = 170.0 * std::f64::consts::PI / 180.0;
    const STEP: f64 = std::f64::consts::PI / 180.0;

    fn new() -> Self {
        Self {
            theta: 0.0,
            phi: 90.0_f64.to_radians(),
            dist: 1.0,
        }
    }

    /// Eye position for the viewed body: its center plus a standoff of twice
    /// its rendered radius plus the adjustable distance.
    fn eye(&self, sim: &SolarSystemState, viewed: BodyId) -> Vec3 {
        let target = sim.position(viewed);
        let standoff = 2.0 * sim.radius(viewed) + self.dist;
        let azimuth = self.theta + sim.revolution_rad(viewed);
        Vec3::new(
            target.x + standoff * self.phi.sin() * azimuth.sin(),
            target.y + standoff * self.phi.cos(),
            target.z + standoff * self.phi.sin() * azimuth.cos(),
        )
    }
}

pub(crate) struct App {
    sim: SolarSystemState,
    camera: Camera,
    viewed: BodyId,
    paused: bool,
    show_labels: bool,
    show_orbits: bool,
    term: Terminal,
    stars: Vec<Star>,
    ticks: u64,
    started: Instant,
    should_quit: bool,
}

impl App {
    fn init() -> anyhow::Result<Self> {
        let term = Terminal::begin()?;
        let stars = star_layer(&term);
        Ok(Self {
            sim: SolarSystemState::new(),
            camera: Camera::new(),
            viewed: BodyId::Sun,
            paused: false,
            show_labels: true,
            show_orbits: true,
            term,
            stars,
            ticks: 0,
            started: Instant::now(),
            should_quit: false,
        })
    }

    fn apply(&mut self, action: ViewerAction) {
        match action {
            ViewerAction::View(id) => self.viewed = id,
            ViewerAction::OrbitLeft => self.camera.theta -= Camera::STEP,
            ViewerAction::OrbitRight => self.camera.theta += Camera::STEP,
            ViewerAction::OrbitUp => {
                self.camera.phi = (self.camera.phi - Camera::STEP).max(Camera::PHI_LOWER);
            }
            ViewerAction::OrbitDown => {
                self.camera.phi = (self.camera.phi + Camera::STEP).min(Camera::PHI_UPPER);
            }
            ViewerAction::Nearer => self.camera.dist = (self.camera.dist - 1.0).max(0.1),
            ViewerAction::Farther => self.camera.dist += 1.0,
            ViewerAction::ToggleDistanceMode => {
                let next = match self.sim.distance_mode() {
                    DistanceMode::Real => DistanceMode::Compact,
                    DistanceMode::Compact => DistanceMode::Real,
                };
                self.sim.set_distance_mode(next);
            }
            ViewerAction::ToggleLabels => self.show_labels = !self.show_labels,
            ViewerAction::ToggleOrbits => self.show_orbits = !self.show_orbits,
            ViewerAction::TogglePause => self.paused = !self.paused,
            ViewerAction::Quit => self.should_quit = true,
        }
    }

    fn run_loop(&mut self) -> anyhow::Result<()> {
        let frame_dt = Duration::from_millis(1000 / FPS_CAP);
        let mut last_frame = Instant::now();
        let mut sim_accum = Duration::ZERO;

        while !self.should_quit {
            if self.term.resize_if_needed()? {
                self.stars = star_layer(&self.term);
            }

            for key in collect_input_nonblocking(frame_dt)? {
                if let Some(action) = map_key_to_action(key) {
                    self.apply(action);
                }
            }

            // fixed-step ticks; clamp the debt so a stall can't spiral
            let now = Instant::now();
            let real_dt = now.saturating_duration_since(last_frame);
            last_frame = now;
            if !self.paused {
                sim_accum = (sim_accum + real_dt).min(Duration::from_millis(50));
                while sim_accum >= TICK_STEP {
                    self.sim.advance_all();
                    self.ticks += 1;
                    sim_accum -= TICK_STEP;
                }
            }

            self.render_frame()?;
            spin_sleep(frame_dt, Instant::now());
        }
        Ok(())
    }

    fn render_frame(&mut self) -> anyhow::Result<()> {
        self.term.cur.clear();
        let canvas = &mut self.term.canvas;
        canvas.clear();

        draw_stars(canvas, &self.stars, self.started.elapsed().as_secs_f64());

        let eye = self.camera.eye(&self.sim, self.viewed);
        let target = self.sim.position(self.viewed);
        let proj = Projection::new(eye, target, canvas.w, canvas.h);

        if self.show_orbits {
            for id in BodyId::ALL {
                if let Some(parent) = id.parent() {
                    draw_orbit_ring(
                        canvas,
                        &proj,
                        self.sim.position(parent),
                        self.sim.orbital_distance(id),
                        id.record().color,
                    );
                }
            }
        }

        // painter's order: far bodies first so near ones occlude them
        let mut order: Vec<(BodyId, Vec3, f64)> = BodyId::ALL
            .into_iter()
            .filter_map(|id| {
                let pos = self.sim.position(id);
                proj.to_screen(pos).map(|(_, _, depth)| (id, pos, depth))
            })
            .collect();
        order.sort_by(|a, b| b.2.total_cmp(&a.2));

        for &(id, pos, _) in &order {
            let self_lit = id == BodyId::Sun;
            let light_dir = if self_lit {
                Vec3::new(0.0, 1.0, 0.0)
            } else {
                self.sim.position(BodyId::Sun).sub(pos).normalized()
            };
            draw_sphere(
                canvas,
                &proj,
                pos,
                self.sim.radius(id),
                id.record().color,
                light_dir,
                self_lit,
                self.sim.rotation_angle(id),
                self.sim.axial_tilt(id),
            );
        }

        canvas_to_cells(&self.term.canvas, &mut self.term.cur);

        if self.show_labels {
            for &(id, pos, depth) in &order {
                if let Some((sx, sy, _)) = proj.to_screen(pos) {
                    let r_cells = self.sim.radius(id) * proj.scale_at(depth) / 2.0;
                    let lx = ((sx / 2.0) + r_cells + 2.0).max(0.0) as u16;
                    let ly = (sy / 4.0).max(0.0) as u16;
                    let fg = if id == self.viewed {
                        Color::White
                    } else {
                        Color::Rgb {
                            r: 130,
                            g: 130,
                            b: 140,
                        }
                    };
                    write_str(&mut self.term.cur, lx, ly, id.name(), fg);
                }
            }
        }

        self.draw_hud();
        self.term.present()?;
        Ok(())
    }

    fn draw_hud(&mut self) {
        let buf = &mut self.term.cur;
        let cols = buf.w;
        let rows = buf.h;
        let hud_w = 30u16.min(cols / 2);
        if hud_w < 10 || rows < 10 {
            return;
        }
        let x0 = cols - hud_w;

        let fg = Color::Rgb {
            r: 220,
            g: 220,
            b: 230,
        };
        let dim = Color::Rgb {
            r: 130,
            g: 140,
            b: 155,
        };
        let edge = Color::Rgb {
            r: 80,
            g: 95,
            b: 120,
        };

        // blank the column behind the panel
        for y in 0..rows {
            for x in x0..cols {
                buf.set(x, y, crate::render::Cell::default());
            }
        }
        box_draw(buf, x0, 0, hud_w, rows, edge);

        let tx = x0 + 2;
        let mode = match self.sim.distance_mode() {
            DistanceMode::Real => "real",
            DistanceMode::Compact => "compact",
        };
        let state = if self.paused { "paused" } else { "running" };
        let clock = chrono::Local::now().format("%H:%M:%S");

        write_str(buf, tx, 1, "Solar System", fg);
        write_str(buf, tx, 2, &format!("Clock: {clock}"), dim);
        write_str(buf, tx, 3, &format!("Sim: {}", sim_elapsed(self.ticks)), dim);
        write_str(buf, tx, 4, &format!("View: {}", self.viewed.name()), dim);
        write_str(buf, tx, 5, &format!("Mode: {mode}  ({state})"), dim);
        write_str(
            buf,
            tx,
            6,
            &format!(
                "Cam: az {:.0}°  pol {:.0}°  d {:.1}",
                self.camera.theta.to_degrees(),
                self.camera.phi.to_degrees(),
                self.camera.dist
            ),
            dim,
        );

        let mut y = 8;
        write_str(buf, tx, y, "Controls", fg);
        y += 1;
        for line in [
            "0-9  view Sun..Neptune, Moon",
            "arrows  orbit camera",
            "d/D  nearer / farther",
            "m  real/compact distances",
            "l labels  o orbits  p pause",
            "q quit",
        ] {
            if y >= rows.saturating_sub(1) {
                break;
            }
            write_str(buf, tx, y, line, dim);
            y += 1;
        }
    }
}

fn star_layer(term: &Terminal) -> Vec<Star> {
    let seed = 0x5A17_5A17u64 ^ ((term.canvas.w as u64) << 32) ^ term.canvas.h as u64;
    build_stars(term.canvas.w, term.canvas.h, seed)
}

fn sim_elapsed(ticks: u64) -> String {
    let hours = ticks as f64 * TIME_SCALE;
    let days = hours / 24.0;
    if days >= 365.25 {
        format!("{:.2} y", days / 365.25)
    } else if days >= 1.0 {
        format!("{days:.1} d")
    } else {
        format!("{hours:.0} h")
    }
}

pub(crate) fn run() -> anyhow::Result<()> {
    let mut app = App::init()?;
    let res = app.run_loop();
    let restored = app.term.end();
    res.and(restored)
}

/* -----------------------------
   Frame pacing helper
------------------------------ */

fn spin_sleep(target: Duration, now: Instant) {
    let end = now + target;
    loop {
        let t = Instant::now();
        if t >= end {
            break;
        }
        let left = end - t;
        if left > Duration::from_millis(2) {
            std::thread::sleep(Duration::from_millis(1));
        } else {
            std::hint::spin_loop();
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn camera_polar_angle_stays_clamped() {
        let mut cam = Camera::new();
        for _ in 0..500 {
            cam.phi = (cam.phi - Camera::STEP).max(Camera::PHI_LOWER);
        }
        assert!((cam.phi - Camera::PHI_LOWER).abs() < 1e-12);
        for _ in 0..500 {
            cam.phi = (cam.phi + Camera::STEP).min(Camera::PHI_UPPER);
        }
        assert!((cam.phi - Camera::PHI_UPPER).abs() < 1e-12);
    }

    #[test]
    fn eye_keeps_the_standoff_distance() {
        let sim = SolarSystemState::new();
        let cam = Camera::new();
        let eye = cam.eye(&sim, BodyId::Earth);
        let target = sim.position(BodyId::Earth);
        let want = 2.0 * sim.radius(BodyId::Earth) + cam.dist;
        assert!((eye.sub(target).len() - want).abs() < 1e-9);
    }

    #[test]
    fn sim_elapsed_picks_sensible_units() {
        assert_eq!(sim_elapsed(0), "0 h");
        assert!(sim_elapsed(24).ends_with("d")); // 2400 h = 100 d
        assert!(sim_elapsed(24 * 400).ends_with("y"));
    }
}
