// ─────────────────────────────────────────────────────────────────────
// SCPN Monoblock Neutronics — Geometry
// © 1998–2026 Miroslav Šotek. All rights reserved.
// Contact: www.anulum.li | protoscience@anulum.li
// ORCID: https://orcid.org/0009-0009-3560-0851
// License: GNU AGPL v3 | Commercial licensing available
// ─────────────────────────────────────────────────────────────────────

//! Parametric CSG model of a water-cooled tungsten divertor monoblock.
//!
//! Port of `create_geometry.py`. The block is modelled in a local frame
//! with the coolant pipe along x, the block width along y, and the
//! plasma-facing direction along +z. Four nested material regions:
//! water channel, CuCrZr pipe, copper interlayer, tungsten armour.
//!
//! The same model serves two consumers: particle transport queries it
//! point-wise and ray-wise, and the tessellation module turns it into
//! triangle meshes for STL export.

pub mod csg;
pub mod export;
pub mod monoblock;
pub mod tessellate;

pub use csg::Surface;
pub use export::{write_model_stl, write_region_stls, write_stl};
pub use monoblock::{BoundingBox, MaterialRegion, Monoblock};
pub use tessellate::{tessellate_model, tessellate_region, TriangleMesh};
