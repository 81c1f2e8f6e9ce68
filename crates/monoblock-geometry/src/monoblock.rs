// ─────────────────────────────────────────────────────────────────────
// SCPN Monoblock Neutronics — Monoblock Model
// © 1998–2026 Miroslav Šotek. All rights reserved.
// Contact: www.anulum.li | protoscience@anulum.li
// ORCID: https://orcid.org/0009-0009-3560-0851
// License: GNU AGPL v3 | Commercial licensing available
// ─────────────────────────────────────────────────────────────────────

//! The four-region monoblock solid.
//!
//! Python builds this by boolean-cutting extruded sketches; here the
//! same solid is expressed directly as nested cylinders inside a box,
//! which gives exact point classification and ray crossings for free.
//!
//! Local frame: pipe axis along x through the origin, block width
//! along y, plasma-facing direction +z. The armour surface sits at
//! `z = cucrzr_inner_radius + cucrzr_thickness + cu_thickness +
//! w_thickness`, which reproduces the translation applied by the
//! Python workplane.

use monoblock_types::config::MonoblockParams;
use monoblock_types::{MonoblockError, MonoblockResult};

use crate::csg::Surface;

/// One of the monoblock's material regions, innermost first.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum MaterialRegion {
    Water,
    CuCrZr,
    Copper,
    Tungsten,
}

impl MaterialRegion {
    /// Region name as used in tally names and material assignments.
    pub fn name(&self) -> &'static str {
        match self {
            MaterialRegion::Water => "water",
            MaterialRegion::CuCrZr => "cucrzr",
            MaterialRegion::Copper => "copper",
            MaterialRegion::Tungsten => "tungsten",
        }
    }

    /// All regions, innermost first.
    pub fn all() -> [MaterialRegion; 4] {
        [
            MaterialRegion::Water,
            MaterialRegion::CuCrZr,
            MaterialRegion::Copper,
            MaterialRegion::Tungsten,
        ]
    }
}

/// Axis-aligned bounding box of the model [cm].
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct BoundingBox {
    pub min: [f64; 3],
    pub max: [f64; 3],
}

impl BoundingBox {
    pub fn center(&self) -> [f64; 3] {
        [
            0.5 * (self.min[0] + self.max[0]),
            0.5 * (self.min[1] + self.max[1]),
            0.5 * (self.min[2] + self.max[2]),
        ]
    }

    pub fn half_extents(&self) -> [f64; 3] {
        [
            0.5 * (self.max[0] - self.min[0]),
            0.5 * (self.max[1] - self.min[1]),
            0.5 * (self.max[2] - self.min[2]),
        ]
    }

    /// Scale about the centre. Python inflates the tally mesh extent by
    /// multiplying the half-extents by 1.1.
    pub fn inflated(&self, factor: f64) -> BoundingBox {
        let c = self.center();
        let h = self.half_extents();
        BoundingBox {
            min: [
                c[0] - h[0] * factor,
                c[1] - h[1] * factor,
                c[2] - h[2] * factor,
            ],
            max: [
                c[0] + h[0] * factor,
                c[1] + h[1] * factor,
                c[2] + h[2] * factor,
            ],
        }
    }
}

/// Validated monoblock with cached derived dimensions [cm].
#[derive(Debug, Clone)]
pub struct Monoblock {
    params: MonoblockParams,
    water_radius: f64,
    cucrzr_outer: f64,
    cu_outer: f64,
    /// Half-extent of the block along the pipe axis.
    x_half: f64,
    /// Half-length of the pipe itself (block plus protrusion).
    pipe_x_half: f64,
    y_half: f64,
    z_top: f64,
    z_bottom: f64,
    surfaces: Vec<Surface>,
}

impl Monoblock {
    /// Build and validate the solid from its parameters.
    pub fn new(params: &MonoblockParams) -> MonoblockResult<Self> {
        for (name, value) in [
            ("thickness", params.thickness),
            ("height", params.height),
            ("width", params.width),
            ("cucrzr_inner_radius", params.cucrzr_inner_radius),
            ("cucrzr_thickness", params.cucrzr_thickness),
            ("cu_thickness", params.cu_thickness),
            ("w_thickness", params.w_thickness),
        ] {
            if !(value > 0.0) || !value.is_finite() {
                return Err(MonoblockError::GeometryError(format!(
                    "{name} must be positive and finite, got {value}"
                )));
            }
        }
        if params.gap < 0.0 || !params.gap.is_finite() {
            return Err(MonoblockError::GeometryError(format!(
                "gap must be non-negative, got {}",
                params.gap
            )));
        }

        let water_radius = params.cucrzr_inner_radius;
        let cucrzr_outer = params.cucrzr_outer_radius();
        let cu_outer = params.cu_outer_radius();
        if 2.0 * cu_outer >= params.width {
            return Err(MonoblockError::GeometryError(format!(
                "pipe stack diameter {:.4} does not fit inside block width {:.4}",
                2.0 * cu_outer,
                params.width
            )));
        }
        if 2.0 * cu_outer + params.w_thickness > params.height {
            return Err(MonoblockError::GeometryError(format!(
                "block height {:.4} too small for pipe stack plus armour ({:.4})",
                params.height,
                2.0 * cu_outer + params.w_thickness
            )));
        }

        let x_half = 0.5 * params.thickness;
        let pipe_x_half = x_half + 0.5 * params.gap;
        let y_half = 0.5 * params.width;
        let z_top = params.armour_top();
        let z_bottom = z_top - params.height;

        let mut surfaces = vec![
            Surface::XCylinder {
                y0: 0.0,
                z0: 0.0,
                radius: water_radius,
            },
            Surface::XCylinder {
                y0: 0.0,
                z0: 0.0,
                radius: cucrzr_outer,
            },
            Surface::XCylinder {
                y0: 0.0,
                z0: 0.0,
                radius: cu_outer,
            },
            Surface::XPlane { x0: -x_half },
            Surface::XPlane { x0: x_half },
            Surface::YPlane { y0: -y_half },
            Surface::YPlane { y0: y_half },
            Surface::ZPlane { z0: z_bottom },
            Surface::ZPlane { z0: z_top },
        ];
        if params.gap > 0.0 {
            surfaces.push(Surface::XPlane { x0: -pipe_x_half });
            surfaces.push(Surface::XPlane { x0: pipe_x_half });
        }

        Ok(Monoblock {
            params: params.clone(),
            water_radius,
            cucrzr_outer,
            cu_outer,
            x_half,
            pipe_x_half,
            y_half,
            z_top,
            z_bottom,
            surfaces,
        })
    }

    pub fn params(&self) -> &MonoblockParams {
        &self.params
    }

    /// z of the plasma-facing armour surface.
    pub fn armour_top(&self) -> f64 {
        self.z_top
    }

    /// Classify a point. `None` means outside every region.
    pub fn region_at(&self, p: [f64; 3]) -> Option<MaterialRegion> {
        let rho2 = p[1] * p[1] + p[2] * p[2];
        let in_block_x = p[0].abs() <= self.x_half;
        let in_pipe_x = p[0].abs() <= self.pipe_x_half;

        if in_pipe_x && rho2 < self.water_radius * self.water_radius {
            return Some(MaterialRegion::Water);
        }
        if in_pipe_x && rho2 < self.cucrzr_outer * self.cucrzr_outer {
            return Some(MaterialRegion::CuCrZr);
        }
        if !in_block_x {
            return None;
        }
        if rho2 < self.cu_outer * self.cu_outer {
            return Some(MaterialRegion::Copper);
        }
        if p[1].abs() <= self.y_half && p[2] >= self.z_bottom && p[2] <= self.z_top {
            return Some(MaterialRegion::Tungsten);
        }
        None
    }

    pub fn contains(&self, p: [f64; 3]) -> bool {
        self.region_at(p).is_some()
    }

    /// Distance to the nearest region or outer boundary along `u`,
    /// `None` when the ray leaves every surface behind.
    pub fn distance_to_boundary(&self, p: [f64; 3], u: [f64; 3]) -> Option<f64> {
        let mut nearest: Option<f64> = None;
        for surface in &self.surfaces {
            if let Some(d) = surface.distance(p, u) {
                nearest = Some(match nearest {
                    Some(current) if current <= d => current,
                    _ => d,
                });
            }
        }
        nearest
    }

    /// Exact region volume [cm^3].
    pub fn volume_cm3(&self, region: MaterialRegion) -> f64 {
        use std::f64::consts::PI;
        let pipe_len = self.params.thickness + self.params.gap;
        match region {
            MaterialRegion::Water => PI * self.water_radius.powi(2) * pipe_len,
            MaterialRegion::CuCrZr => {
                PI * (self.cucrzr_outer.powi(2) - self.water_radius.powi(2)) * pipe_len
            }
            MaterialRegion::Copper => {
                PI * (self.cu_outer.powi(2) - self.cucrzr_outer.powi(2)) * self.params.thickness
            }
            MaterialRegion::Tungsten => {
                self.params.width * self.params.height * self.params.thickness
                    - PI * self.cu_outer.powi(2) * self.params.thickness
            }
        }
    }

    /// Volume of the whole model [cm^3].
    pub fn total_volume_cm3(&self) -> f64 {
        MaterialRegion::all()
            .into_iter()
            .map(|r| self.volume_cm3(r))
            .sum()
    }

    pub fn bounding_box(&self) -> BoundingBox {
        BoundingBox {
            min: [-self.pipe_x_half, -self.y_half, self.z_bottom],
            max: [self.pipe_x_half, self.y_half, self.z_top],
        }
    }

    /// Derived radii (water, CuCrZr outer, copper outer).
    pub fn radii(&self) -> [f64; 3] {
        [self.water_radius, self.cucrzr_outer, self.cu_outer]
    }

    /// Block extents: x half-width, pipe half-length, y half-width,
    /// z bottom, z top.
    pub fn extents(&self) -> (f64, f64, f64, f64, f64) {
        (
            self.x_half,
            self.pipe_x_half,
            self.y_half,
            self.z_bottom,
            self.z_top,
        )
    }
}
