// ─────────────────────────────────────────────────────────────────────
// SCPN Monoblock Neutronics — CSG Surfaces
// © 1998–2026 Miroslav Šotek. All rights reserved.
// Contact: www.anulum.li | protoscience@anulum.li
// ORCID: https://orcid.org/0009-0009-3560-0851
// License: GNU AGPL v3 | Commercial licensing available
// ─────────────────────────────────────────────────────────────────────

//! Quadric surfaces for point sense tests and ray crossings.
//!
//! Only the primitives the monoblock needs: axis-aligned planes and
//! cylinders parallel to the pipe axis x. Sense is negative inside a
//! cylinder and below a plane, matching the usual half-space signs.

/// Crossing distances closer than this are treated as "already on the
/// surface" and skipped, so a particle sitting on a boundary does not
/// re-intersect it.
pub const SURFACE_EPS: f64 = 1e-10;

/// An unbounded quadric surface in the block frame.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Surface {
    /// Cylinder with axis parallel to x through (y0, z0).
    XCylinder { y0: f64, z0: f64, radius: f64 },
    /// Plane x = x0.
    XPlane { x0: f64 },
    /// Plane y = y0.
    YPlane { y0: f64 },
    /// Plane z = z0.
    ZPlane { z0: f64 },
}

impl Surface {
    /// Signed sense of a point: negative inside / below, positive
    /// outside / above.
    pub fn sense(&self, p: [f64; 3]) -> f64 {
        match *self {
            Surface::XCylinder { y0, z0, radius } => {
                let dy = p[1] - y0;
                let dz = p[2] - z0;
                dy * dy + dz * dz - radius * radius
            }
            Surface::XPlane { x0 } => p[0] - x0,
            Surface::YPlane { y0 } => p[1] - y0,
            Surface::ZPlane { z0 } => p[2] - z0,
        }
    }

    /// Distance along unit direction `u` from `p` to the nearest
    /// crossing, or `None` if the ray never crosses.
    pub fn distance(&self, p: [f64; 3], u: [f64; 3]) -> Option<f64> {
        match *self {
            Surface::XCylinder { y0, z0, radius } => {
                let dy = p[1] - y0;
                let dz = p[2] - z0;
                let a = u[1] * u[1] + u[2] * u[2];
                let b = 2.0 * (dy * u[1] + dz * u[2]);
                let c = dy * dy + dz * dz - radius * radius;
                smallest_positive_root(a, b, c)
            }
            Surface::XPlane { x0 } => plane_distance(p[0], u[0], x0),
            Surface::YPlane { y0 } => plane_distance(p[1], u[1], y0),
            Surface::ZPlane { z0 } => plane_distance(p[2], u[2], z0),
        }
    }
}

fn plane_distance(coord: f64, slope: f64, target: f64) -> Option<f64> {
    if slope.abs() < 1e-14 {
        return None;
    }
    let t = (target - coord) / slope;
    if t > SURFACE_EPS {
        Some(t)
    } else {
        None
    }
}

/// Smallest root of `a t^2 + b t + c = 0` greater than [`SURFACE_EPS`].
fn smallest_positive_root(a: f64, b: f64, c: f64) -> Option<f64> {
    if a.abs() < 1e-14 {
        // Ray parallel to the cylinder axis.
        return None;
    }
    let disc = b * b - 4.0 * a * c;
    if disc < 0.0 {
        return None;
    }
    let sqrt_disc = disc.sqrt();
    let t1 = (-b - sqrt_disc) / (2.0 * a);
    let t2 = (-b + sqrt_disc) / (2.0 * a);
    if t1 > SURFACE_EPS {
        Some(t1)
    } else if t2 > SURFACE_EPS {
        Some(t2)
    } else {
        None
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const PIPE: Surface = Surface::XCylinder {
        y0: 0.0,
        z0: 0.0,
        radius: 0.6,
    };

    #[test]
    fn sense_signs() {
        assert!(PIPE.sense([0.0, 0.0, 0.0]) < 0.0);
        assert!(PIPE.sense([0.0, 0.0, 1.0]) > 0.0);
        // x position is irrelevant for an x-cylinder.
        assert!(PIPE.sense([50.0, 0.3, 0.3]) < 0.0);

        let top = Surface::ZPlane { z0: 1.35 };
        assert!(top.sense([0.0, 0.0, 1.0]) < 0.0);
        assert!(top.sense([0.0, 0.0, 2.0]) > 0.0);
    }

    #[test]
    fn ray_hits_cylinder_from_outside() {
        // Heading straight down the z axis from above.
        let d = PIPE.distance([0.0, 0.0, 2.0], [0.0, 0.0, -1.0]).unwrap();
        assert!((d - 1.4).abs() < 1e-12);
    }

    #[test]
    fn ray_exits_cylinder_from_inside() {
        let d = PIPE.distance([0.0, 0.0, 0.0], [0.0, 0.0, 1.0]).unwrap();
        assert!((d - 0.6).abs() < 1e-12);
        // Off-axis chord.
        let d = PIPE.distance([0.0, 0.3, 0.0], [0.0, 1.0, 0.0]).unwrap();
        assert!((d - 0.3).abs() < 1e-12);
    }

    #[test]
    fn ray_missing_cylinder_returns_none() {
        assert!(PIPE.distance([0.0, 2.0, 2.0], [0.0, 0.0, 1.0]).is_none());
        // Parallel to the axis inside the bore: never crosses the wall.
        assert!(PIPE.distance([0.0, 0.0, 0.0], [1.0, 0.0, 0.0]).is_none());
    }

    #[test]
    fn tilted_ray_crosses_farther_than_perpendicular() {
        let straight = PIPE.distance([0.0, 0.0, 1.0], [0.0, 0.0, -1.0]).unwrap();
        let s = std::f64::consts::FRAC_1_SQRT_2;
        let tilted = PIPE.distance([0.0, 0.0, 1.0], [s, 0.0, -s]).unwrap();
        assert!(tilted > straight);
        assert!((tilted - straight * std::f64::consts::SQRT_2).abs() < 1e-12);
    }

    #[test]
    fn plane_crossings() {
        let top = Surface::ZPlane { z0: 1.35 };
        let d = top.distance([0.0, 0.0, 101.35], [0.0, 0.0, -1.0]).unwrap();
        assert!((d - 100.0).abs() < 1e-12);
        // Moving away from the plane.
        assert!(top.distance([0.0, 0.0, 2.0], [0.0, 0.0, 1.0]).is_none());
        // Parallel to the plane.
        assert!(top.distance([0.0, 0.0, 2.0], [1.0, 0.0, 0.0]).is_none());
    }

    #[test]
    fn point_on_surface_does_not_reintersect() {
        // Sitting exactly on the wall heading outward: next crossing is
        // the far side or nothing, never distance zero.
        let d = PIPE.distance([0.0, 0.6, 0.0], [0.0, -1.0, 0.0]).unwrap();
        assert!((d - 1.2).abs() < 1e-12);
        assert!(PIPE.distance([0.0, 0.6, 0.0], [0.0, 1.0, 0.0]).is_none());
    }
}
