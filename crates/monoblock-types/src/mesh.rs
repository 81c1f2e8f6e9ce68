// ─────────────────────────────────────────────────────────────────────
// SCPN Monoblock Neutronics — Mesh
// © 1998–2026 Miroslav Šotek. All rights reserved.
// Contact: www.anulum.li | protoscience@anulum.li
// ORCID: https://orcid.org/0009-0009-3560-0851
// License: GNU AGPL v3 | Commercial licensing available
// ─────────────────────────────────────────────────────────────────────

//! Regular 2D tally mesh over the monoblock cross-section.
//!
//! The mesh spans the y-z plane (block width x plasma-facing direction)
//! and integrates over a slab of the pipe axis x. Flat tally bins are
//! ordered row-major with y fastest, matching the `[nz, ny]` array
//! convention used everywhere in this workspace.

use ndarray::{Array1, Array2};
use serde::{Deserialize, Serialize};

use crate::error::{MonoblockError, MonoblockResult};

/// Regular y-z mesh with an integrated x slab.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MeshGrid2d {
    pub ny: usize,
    pub nz: usize,
    pub y_min: f64,
    pub y_max: f64,
    pub z_min: f64,
    pub z_max: f64,
    pub x_min: f64,
    pub x_max: f64,
}

impl MeshGrid2d {
    #[allow(clippy::too_many_arguments)]
    pub fn new(
        ny: usize,
        nz: usize,
        y_min: f64,
        y_max: f64,
        z_min: f64,
        z_max: f64,
        x_min: f64,
        x_max: f64,
    ) -> MeshGrid2d {
        MeshGrid2d {
            ny,
            nz,
            y_min,
            y_max,
            z_min,
            z_max,
            x_min,
            x_max,
        }
    }

    /// Voxel pitch across the block width [cm].
    pub fn dy(&self) -> f64 {
        (self.y_max - self.y_min) / self.ny as f64
    }

    /// Voxel pitch along the plasma-facing direction [cm].
    pub fn dz(&self) -> f64 {
        (self.z_max - self.z_min) / self.nz as f64
    }

    /// Integrated slab depth along the pipe axis [cm].
    pub fn slab_depth(&self) -> f64 {
        self.x_max - self.x_min
    }

    /// Number of mesh bins.
    pub fn n_voxels(&self) -> usize {
        self.ny * self.nz
    }

    /// Volume of one voxel [cm^3]. Python: mesh volume / number of voxels.
    pub fn voxel_volume_cm3(&self) -> f64 {
        self.dy() * self.dz() * self.slab_depth()
    }

    /// Plot extent `[y_min, y_max, z_min, z_max]`.
    pub fn extent(&self) -> [f64; 4] {
        [self.y_min, self.y_max, self.z_min, self.z_max]
    }

    /// Flat bin index for a point, or `None` outside the mesh.
    /// Bins are half-open in both axes; a point exactly on the upper
    /// boundary is outside.
    pub fn voxel_index(&self, x: f64, y: f64, z: f64) -> Option<usize> {
        if x < self.x_min || x >= self.x_max {
            return None;
        }
        if y < self.y_min || y >= self.y_max || z < self.z_min || z >= self.z_max {
            return None;
        }
        let iy = ((y - self.y_min) / self.dy()) as usize;
        let iz = ((z - self.z_min) / self.dz()) as usize;
        // Floating-point division can land exactly on ny/nz for points
        // a ULP below the boundary.
        let iy = iy.min(self.ny - 1);
        let iz = iz.min(self.nz - 1);
        Some(iz * self.ny + iy)
    }

    /// Voxel centre coordinates along y.
    pub fn y_centers(&self) -> Array1<f64> {
        let dy = self.dy();
        Array1::from_shape_fn(self.ny, |i| self.y_min + (i as f64 + 0.5) * dy)
    }

    /// Voxel centre coordinates along z.
    pub fn z_centers(&self) -> Array1<f64> {
        let dz = self.dz();
        Array1::from_shape_fn(self.nz, |i| self.z_min + (i as f64 + 0.5) * dz)
    }

    /// Reshape a flat tally result onto this mesh as `[nz, ny]`.
    /// Row `iz = 0` is the z_min edge.
    pub fn reshape(&self, flat: &[f64]) -> MonoblockResult<Array2<f64>> {
        if flat.len() != self.n_voxels() {
            return Err(MonoblockError::ShapeMismatch {
                expected: self.n_voxels(),
                actual: flat.len(),
            });
        }
        Ok(Array2::from_shape_fn((self.nz, self.ny), |(iz, iy)| {
            flat[iz * self.ny + iy]
        }))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn reference_mesh() -> MeshGrid2d {
        // 2.3 x 2.5 cm block cross-section inflated by 1.1, 1.2 cm slab.
        MeshGrid2d::new(50, 50, -1.265, 1.265, -1.275, 1.475, -0.6, 0.6)
    }

    #[test]
    fn voxel_volume_matches_hand_calculation() {
        let mesh = reference_mesh();
        let dy = 2.53 / 50.0;
        let dz = 2.75 / 50.0;
        assert!((mesh.voxel_volume_cm3() - dy * dz * 1.2).abs() < 1e-12);
    }

    #[test]
    fn voxel_index_orders_y_fastest() {
        let mesh = MeshGrid2d::new(4, 3, 0.0, 4.0, 0.0, 3.0, -0.5, 0.5);
        assert_eq!(mesh.voxel_index(0.0, 0.5, 0.5), Some(0));
        assert_eq!(mesh.voxel_index(0.0, 3.5, 0.5), Some(3));
        assert_eq!(mesh.voxel_index(0.0, 0.5, 1.5), Some(4));
        assert_eq!(mesh.voxel_index(0.0, 3.5, 2.5), Some(11));
    }

    #[test]
    fn points_outside_return_none() {
        let mesh = reference_mesh();
        assert_eq!(mesh.voxel_index(0.0, -2.0, 0.0), None);
        assert_eq!(mesh.voxel_index(0.0, 0.0, 1.5), None);
        // Outside the x slab.
        assert_eq!(mesh.voxel_index(2.0, 0.0, 0.0), None);
        // Upper boundaries are exclusive.
        assert_eq!(mesh.voxel_index(0.0, 1.265, 0.0), None);
    }

    #[test]
    fn reshape_places_flat_bins_row_major() {
        let mesh = MeshGrid2d::new(3, 2, 0.0, 3.0, 0.0, 2.0, 0.0, 1.0);
        let flat: Vec<f64> = (0..6).map(|i| i as f64).collect();
        let arr = mesh.reshape(&flat).unwrap();
        assert_eq!(arr.shape(), &[2, 3]);
        assert!((arr[[0, 0]] - 0.0).abs() < 1e-15);
        assert!((arr[[0, 2]] - 2.0).abs() < 1e-15);
        assert!((arr[[1, 0]] - 3.0).abs() < 1e-15);
        assert!((arr[[1, 2]] - 5.0).abs() < 1e-15);
    }

    #[test]
    fn reshape_rejects_wrong_length() {
        let mesh = reference_mesh();
        let flat = vec![0.0; 2499];
        match mesh.reshape(&flat) {
            Err(MonoblockError::ShapeMismatch { expected, actual }) => {
                assert_eq!(expected, 2500);
                assert_eq!(actual, 2499);
            }
            other => panic!("Unexpected result: {other:?}"),
        }
    }

    #[test]
    fn centers_are_inside_bounds() {
        let mesh = reference_mesh();
        let y = mesh.y_centers();
        let z = mesh.z_centers();
        assert_eq!(y.len(), 50);
        assert_eq!(z.len(), 50);
        assert!(y[0] > mesh.y_min && y[49] < mesh.y_max);
        assert!(z[0] > mesh.z_min && z[49] < mesh.z_max);
        // Centres are symmetric about the midpoint.
        let mid = 0.5 * (mesh.y_min + mesh.y_max);
        assert!(((y[0] - mid) + (y[49] - mid)).abs() < 1e-12);
    }
}
