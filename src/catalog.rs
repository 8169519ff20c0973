//! Fixed catalog of the ten simulated bodies.
//!
//! Radii and distances are kilometers, periods are hours. Compact-mode
//! distances follow a running offset over the radii of all closer planets so
//! the spheres never overlap on screen; the Moon instead sits a fixed margin
//! off Earth's surface.

/// Identifies one body in the simulation. The catalog is total over this
/// enum, so there is no "unknown body" failure path.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub(crate) enum BodyId {
    Sun,
    Mercury,
    Venus,
    Earth,
    Mars,
    Jupiter,
    Saturn,
    Uranus,
    Neptune,
    Moon,
}

impl BodyId {
    pub(crate) const COUNT: usize = 10;

    pub(crate) const ALL: [BodyId; Self::COUNT] = [
        BodyId::Sun,
        BodyId::Mercury,
        BodyId::Venus,
        BodyId::Earth,
        BodyId::Mars,
        BodyId::Jupiter,
        BodyId::Saturn,
        BodyId::Uranus,
        BodyId::Neptune,
        BodyId::Moon,
    ];

    pub(crate) fn record(self) -> &'static BodyRecord {
        &CATALOG[self as usize]
    }

    pub(crate) fn name(self) -> &'static str {
        self.record().name
    }

    pub(crate) fn parent(self) -> Option<BodyId> {
        self.record().parent
    }
}

/// Immutable physical and orbital constants for one body.
pub(crate) struct BodyRecord {
    pub(crate) name: &'static str,
    pub(crate) radius_km: f64,
    pub(crate) orbit_real_km: f64,
    pub(crate) orbit_compact_km: f64,
    /// Hours per full spin; 0 means the body does not rotate.
    pub(crate) rotation_hours: f64,
    /// Hours per full orbit; 0 for the Sun, which has nothing to orbit.
    pub(crate) revolution_hours: f64,
    pub(crate) axial_tilt_deg: f64,
    pub(crate) parent: Option<BodyId>,
    pub(crate) color: (u8, u8, u8),
}

const fn days(d: f64) -> f64 {
    d * 24.0
}

const fn years(y: f64) -> f64 {
    y * 365.25 * 24.0
}

const SUN_R: f64 = 695_000.0;
const MERCURY_R: f64 = 2_440.0;
const VENUS_R: f64 = 6_052.0;
const EARTH_R: f64 = 6_378.0;
const MARS_R: f64 = 3_397.0;
const JUPITER_R: f64 = 71_492.0;
const SATURN_R: f64 = 60_268.0;
const URANUS_R: f64 = 25_559.0;
const NEPTUNE_R: f64 = 24_766.0;
const MOON_R: f64 = 1_738.0;

/// Gap between the Moon and Earth's surface in compact mode.
const MOON_MARGIN_KM: f64 = 100.0;

/// Indexed by `BodyId as usize`.
pub(crate) const CATALOG: [BodyRecord; BodyId::COUNT] = [
    BodyRecord {
        name: "Sun",
        radius_km: SUN_R,
        orbit_real_km: 0.0,
        orbit_compact_km: 0.0,
        rotation_hours: days(24.47),
        revolution_hours: 0.0,
        axial_tilt_deg: 7.25,
        parent: None,
        color: (255, 214, 110),
    },
    BodyRecord {
        name: "Mercury",
        radius_km: MERCURY_R,
        orbit_real_km: 57.91e6,
        orbit_compact_km: SUN_R + MERCURY_R,
        rotation_hours: days(59.0),
        revolution_hours: days(87.97),
        axial_tilt_deg: 0.03,
        parent: Some(BodyId::Sun),
        color: (169, 158, 146),
    },
    BodyRecord {
        name: "Venus",
        radius_km: VENUS_R,
        orbit_real_km: 108.2e6,
        orbit_compact_km: SUN_R + 2.0 * MERCURY_R + VENUS_R,
        rotation_hours: days(243.0),
        revolution_hours: days(225.0),
        axial_tilt_deg: 177.36,
        parent: Some(BodyId::Sun),
        color: (222, 184, 120),
    },
    BodyRecord {
        name: "Earth",
        radius_km: EARTH_R,
        orbit_real_km: 149.6e6,
        orbit_compact_km: SUN_R + 2.0 * (MERCURY_R + VENUS_R) + EARTH_R,
        rotation_hours: 24.0,
        revolution_hours: days(365.0),
        axial_tilt_deg: 23.44,
        parent: Some(BodyId::Sun),
        color: (90, 140, 235),
    },
    BodyRecord {
        name: "Mars",
        radius_km: MARS_R,
        orbit_real_km: 227.94e6,
        orbit_compact_km: SUN_R + 2.0 * (MERCURY_R + VENUS_R + EARTH_R) + MARS_R,
        rotation_hours: 24.0 + 37.0 / 60.0, // 24 h 37 m
        revolution_hours: days(687.0),
        axial_tilt_deg: 25.19,
        parent: Some(BodyId::Sun),
        color: (205, 100, 70),
    },
    BodyRecord {
        name: "Jupiter",
        radius_km: JUPITER_R,
        orbit_real_km: 778.33e6,
        orbit_compact_km: SUN_R + 2.0 * (MERCURY_R + VENUS_R + EARTH_R + MARS_R) + JUPITER_R,
        rotation_hours: 9.8,
        revolution_hours: years(11.9),
        axial_tilt_deg: 3.13,
        parent: Some(BodyId::Sun),
        color: (216, 174, 132),
    },
    BodyRecord {
        name: "Saturn",
        radius_km: SATURN_R,
        orbit_real_km: 1_424.6e6,
        orbit_compact_km: SUN_R
            + 2.0 * (MERCURY_R + VENUS_R + EARTH_R + MARS_R + JUPITER_R)
            + SATURN_R,
        rotation_hours: 10.7,
        revolution_hours: years(29.5),
        axial_tilt_deg: 26.73,
        parent: Some(BodyId::Sun),
        color: (226, 200, 150),
    },
    BodyRecord {
        name: "Uranus",
        radius_km: URANUS_R,
        orbit_real_km: 2_873.55e6,
        orbit_compact_km: SUN_R
            + 2.0 * (MERCURY_R + VENUS_R + EARTH_R + MARS_R + JUPITER_R + SATURN_R)
            + URANUS_R,
        rotation_hours: 18.0,
        revolution_hours: years(84.0),
        axial_tilt_deg: 97.77,
        parent: Some(BodyId::Sun),
        color: (150, 212, 222),
    },
    BodyRecord {
        name: "Neptune",
        radius_km: NEPTUNE_R,
        orbit_real_km: 4_501.0e6,
        orbit_compact_km: SUN_R
            + 2.0 * (MERCURY_R + VENUS_R + EARTH_R + MARS_R + JUPITER_R + SATURN_R + URANUS_R)
            + NEPTUNE_R,
        rotation_hours: 16.0,
        revolution_hours: years(165.0),
        axial_tilt_deg: 28.32,
        parent: Some(BodyId::Sun),
        color: (95, 120, 230),
    },
    BodyRecord {
        name: "Moon",
        radius_km: MOON_R,
        orbit_real_km: 384.4e3,
        orbit_compact_km: EARTH_R + MOON_R + MOON_MARGIN_KM,
        rotation_hours: days(27.322),
        revolution_hours: days(27.322),
        axial_tilt_deg: 6.68,
        parent: Some(BodyId::Earth),
        color: (190, 190, 195),
    },
];

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn compact_distances_increase_with_orbital_order() {
        let planets = [
            BodyId::Mercury,
            BodyId::Venus,
            BodyId::Earth,
            BodyId::Mars,
            BodyId::Jupiter,
            BodyId::Saturn,
            BodyId::Uranus,
            BodyId::Neptune,
        ];
        for pair in planets.windows(2) {
            let inner = pair[0].record().orbit_compact_km;
            let outer = pair[1].record().orbit_compact_km;
            assert!(
                inner < outer,
                "{} ({inner} km) should sit inside {} ({outer} km)",
                pair[0].name(),
                pair[1].name()
            );
        }
    }

    #[test]
    fn parent_links_form_a_shallow_tree() {
        for id in BodyId::ALL {
            let mut depth = 0;
            let mut cur = id.parent();
            while let Some(p) = cur {
                depth += 1;
                cur = p.parent();
            }
            match id {
                BodyId::Sun => assert_eq!(depth, 0),
                BodyId::Moon => assert_eq!(depth, 2),
                _ => assert_eq!(depth, 1),
            }
        }
    }

    #[test]
    fn only_the_sun_skips_revolution() {
        for id in BodyId::ALL {
            let rec = id.record();
            if id == BodyId::Sun {
                assert_eq!(rec.revolution_hours, 0.0);
                assert!(rec.parent.is_none());
            } else {
                assert!(rec.revolution_hours > 0.0);
                assert!(rec.parent.is_some());
            }
            assert!(rec.rotation_hours > 0.0);
            assert!(rec.radius_km > 0.0);
        }
    }
}
