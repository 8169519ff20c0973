//! Orbital kinematics: per-body angle state, per-tick advancement and the
//! hierarchical position model.
//!
//! Every body spins about its own axis and revolves around its parent in a
//! shared horizontal plane. Angles advance by `TIME_SCALE / period_hours`
//! degrees per tick. All spatial queries are rescaled from kilometers to
//! Earth-radius units so the renderer never sees astronomical magnitudes.

use crate::catalog::BodyId;

/// Simulated hours per tick. Big: fast, small: slow.
pub(crate) const TIME_SCALE: f64 = 100.0;

/// Normalization constant; positions and radii are reported in multiples of
/// Earth's radius.
pub(crate) const EARTH_RADIUS_KM: f64 = 6_378.0;

#[derive(Clone, Copy, Debug, PartialEq)]
pub(crate) enum DistanceMode {
    /// True astronomical distances. Outer planets end up enormously far from
    /// their rendered sphere size.
    Real,
    /// Compressed, non-to-scale layout that keeps neighbors visually adjacent.
    Compact,
}

#[derive(Clone, Copy, Debug, Default)]
pub(crate) struct Vec3 {
    pub(crate) x: f64,
    pub(crate) y: f64,
    pub(crate) z: f64,
}

impl Vec3 {
    pub(crate) const ZERO: Vec3 = Vec3 { x: 0.0, y: 0.0, z: 0.0 };

    pub(crate) fn new(x: f64, y: f64, z: f64) -> Vec3 {
        Vec3 { x, y, z }
    }

    pub(crate) fn add(self, o: Vec3) -> Vec3 {
        Vec3::new(self.x + o.x, self.y + o.y, self.z + o.z)
    }

    pub(crate) fn sub(self, o: Vec3) -> Vec3 {
        Vec3::new(self.x - o.x, self.y - o.y, self.z - o.z)
    }

    pub(crate) fn scale(self, s: f64) -> Vec3 {
        Vec3::new(self.x * s, self.y * s, self.z * s)
    }

    pub(crate) fn dot(self, o: Vec3) -> f64 {
        self.x * o.x + self.y * o.y + self.z * o.z
    }

    pub(crate) fn cross(self, o: Vec3) -> Vec3 {
        Vec3::new(
            self.y * o.z - self.z * o.y,
            self.z * o.x - self.x * o.z,
            self.x * o.y - self.y * o.x,
        )
    }

    pub(crate) fn len(self) -> f64 {
        self.dot(self).sqrt()
    }

    pub(crate) fn normalized(self) -> Vec3 {
        let l = self.len().max(1e-12);
        self.scale(1.0 / l)
    }
}

/// Mutable phase of one body, degrees.
#[derive(Clone, Copy, Debug, Default)]
struct BodyAngles {
    rotation_deg: f64,
    revolution_deg: f64,
}

/// Owns the angle state of all ten bodies plus the shared distance-mode flag.
///
/// Single-writer: the animation loop holds the only `&mut` and must advance
/// every body before querying positions for a frame.
pub(crate) struct SolarSystemState {
    angles: [BodyAngles; BodyId::COUNT],
    distance_mode: DistanceMode,
}

impl SolarSystemState {
    pub(crate) fn new() -> Self {
        Self {
            angles: [BodyAngles::default(); BodyId::COUNT],
            distance_mode: DistanceMode::Compact,
        }
    }

    /// Degrees added to the rotation angle by one tick; 0 for a body that
    /// does not rotate.
    pub(crate) fn delta_rotation(&self, id: BodyId) -> f64 {
        let hours = id.record().rotation_hours;
        if hours != 0.0 {
            TIME_SCALE / hours
        } else {
            0.0
        }
    }

    /// Degrees added to the revolution angle by one tick; 0 for the Sun.
    pub(crate) fn delta_revolution(&self, id: BodyId) -> f64 {
        let hours = id.record().revolution_hours;
        if hours != 0.0 {
            TIME_SCALE / hours
        } else {
            0.0
        }
    }

    pub(crate) fn advance_rotation(&mut self, id: BodyId) {
        let delta = self.delta_rotation(id);
        let angle = &mut self.angles[id as usize].rotation_deg;
        *angle = step_angle(*angle, delta);
    }

    pub(crate) fn advance_revolution(&mut self, id: BodyId) {
        let delta = self.delta_revolution(id);
        let angle = &mut self.angles[id as usize].revolution_deg;
        *angle = step_angle(*angle, delta);
    }

    /// One tick: advance both angles of every body. Call before any position
    /// query for the frame.
    pub(crate) fn advance_all(&mut self) {
        for id in BodyId::ALL {
            self.advance_rotation(id);
            self.advance_revolution(id);
        }
    }

    pub(crate) fn set_rotation(&mut self, id: BodyId, deg: f64) {
        self.angles[id as usize].rotation_deg = deg;
    }

    pub(crate) fn set_revolution(&mut self, id: BodyId, deg: f64) {
        self.angles[id as usize].revolution_deg = deg;
    }

    pub(crate) fn rotation_angle(&self, id: BodyId) -> f64 {
        self.angles[id as usize].rotation_deg
    }

    pub(crate) fn revolution_angle(&self, id: BodyId) -> f64 {
        self.angles[id as usize].revolution_deg
    }

    pub(crate) fn revolution_rad(&self, id: BodyId) -> f64 {
        self.revolution_angle(id).to_radians()
    }

    pub(crate) fn axial_tilt(&self, id: BodyId) -> f64 {
        id.record().axial_tilt_deg
    }

    /// Rendered radius in Earth-radius units.
    pub(crate) fn radius(&self, id: BodyId) -> f64 {
        id.record().radius_km / EARTH_RADIUS_KM
    }

    /// Distance to the parent in Earth-radius units, per the current mode.
    pub(crate) fn orbital_distance(&self, id: BodyId) -> f64 {
        let rec = id.record();
        let km = match self.distance_mode {
            DistanceMode::Real => rec.orbit_real_km,
            DistanceMode::Compact => rec.orbit_compact_km,
        };
        km / EARTH_RADIUS_KM
    }

    pub(crate) fn distance_mode(&self) -> DistanceMode {
        self.distance_mode
    }

    /// Instantaneous snap, applied to every body at once.
    pub(crate) fn set_distance_mode(&mut self, mode: DistanceMode) {
        self.distance_mode = mode;
    }

    /// Position in Earth-radius units: the body's own orbital offset plus its
    /// parent's position. All orbits share one horizontal plane, so y stays 0.
    pub(crate) fn position(&self, id: BodyId) -> Vec3 {
        let mut pos = Vec3::ZERO;
        let mut cur = Some(id);
        while let Some(b) = cur {
            let d = self.orbital_distance(b);
            let a = self.revolution_rad(b);
            pos.x += d * a.sin();
            pos.z += d * a.cos();
            cur = b.parent();
        }
        pos
    }
}

/// The wraparound check runs before the addition, so an angle can sit above
/// 360° for one tick before being pulled back. The original behaved this way
/// and the overshoot is kept deliberately.
fn step_angle(mut angle: f64, delta: f64) -> f64 {
    if angle > 360.0 {
        angle -= 360.0;
    }
    angle + delta
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn rotation_advances_by_time_scale_over_period() {
        let mut sim = SolarSystemState::new();
        let expected = TIME_SCALE / 24.0; // Earth spins once per 24 h
        for i in 1..=10 {
            sim.advance_rotation(BodyId::Earth);
            let angle = sim.rotation_angle(BodyId::Earth);
            assert!(
                (angle - expected * i as f64).abs() < 1e-9,
                "tick {i}: got {angle}"
            );
        }
    }

    #[test]
    fn sun_revolution_never_moves() {
        let mut sim = SolarSystemState::new();
        assert_eq!(sim.delta_revolution(BodyId::Sun), 0.0);
        for _ in 0..1000 {
            sim.advance_revolution(BodyId::Sun);
        }
        assert_eq!(sim.revolution_angle(BodyId::Sun), 0.0);
    }

    #[test]
    fn wraparound_overshoots_for_exactly_one_tick() {
        let mut sim = SolarSystemState::new();
        let delta = sim.delta_rotation(BodyId::Earth); // 100/24 ≈ 4.17°
        sim.set_rotation(BodyId::Earth, 358.0);

        sim.advance_rotation(BodyId::Earth);
        let over = sim.rotation_angle(BodyId::Earth);
        assert!((over - (358.0 + delta)).abs() < 1e-9);
        assert!(over > 360.0, "this step is allowed to overshoot");

        sim.advance_rotation(BodyId::Earth);
        let corrected = sim.rotation_angle(BodyId::Earth);
        assert!((corrected - (over - 360.0 + delta)).abs() < 1e-9);
        assert!(corrected < 360.0);
    }

    #[test]
    fn distance_mode_round_trip_is_lossless() {
        let mut sim = SolarSystemState::new();
        for (i, id) in BodyId::ALL.into_iter().enumerate() {
            sim.set_revolution(id, 17.0 * i as f64 + 3.0);
        }
        let before: Vec<Vec3> = BodyId::ALL.iter().map(|&id| sim.position(id)).collect();

        sim.set_distance_mode(DistanceMode::Real);
        sim.set_distance_mode(DistanceMode::Compact);

        for (&id, prev) in BodyId::ALL.iter().zip(&before) {
            let now = sim.position(id);
            assert_eq!(now.x, prev.x, "{} x drifted", id.name());
            assert_eq!(now.y, prev.y, "{} y drifted", id.name());
            assert_eq!(now.z, prev.z, "{} z drifted", id.name());
        }
    }

    #[test]
    fn child_position_is_parent_plus_own_offset() {
        let mut sim = SolarSystemState::new();
        sim.set_revolution(BodyId::Earth, 45.0);
        sim.set_revolution(BodyId::Moon, 123.4);

        let earth = sim.position(BodyId::Earth);
        let moon = sim.position(BodyId::Moon);
        let d = sim.orbital_distance(BodyId::Moon);
        let a = sim.revolution_rad(BodyId::Moon);

        assert!((moon.x - (earth.x + d * a.sin())).abs() < 1e-9);
        assert!((moon.z - (earth.z + d * a.cos())).abs() < 1e-9);
        assert_eq!(moon.y, earth.y, "orbits share one horizontal plane");
    }

    #[test]
    fn earth_compact_x_at_quarter_orbit() {
        let mut sim = SolarSystemState::new();
        sim.set_revolution(BodyId::Earth, 90.0);

        let expected = (695_000.0 + 2.0 * (2_440.0 + 6_052.0) + 6_378.0) / EARTH_RADIUS_KM;
        let earth = sim.position(BodyId::Earth);
        assert!(
            (earth.x - expected).abs() < 1e-9,
            "got {}, want {expected}",
            earth.x
        );
        // Sun sits at the origin and contributes nothing.
        assert_eq!(sim.position(BodyId::Sun).x, 0.0);
    }

    #[test]
    fn real_mode_pushes_planets_out() {
        let mut sim = SolarSystemState::new();
        sim.set_revolution(BodyId::Neptune, 90.0);
        let compact = sim.position(BodyId::Neptune).x;
        sim.set_distance_mode(DistanceMode::Real);
        let real = sim.position(BodyId::Neptune).x;
        assert!(real > 100.0 * compact);
    }
}
