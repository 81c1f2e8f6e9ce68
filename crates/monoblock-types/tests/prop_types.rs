// ─────────────────────────────────────────────────────────────────────
// SCPN Monoblock Neutronics — Property Tests: Types
// © 1998–2026 Miroslav Šotek. All rights reserved.
// Contact: www.anulum.li | protoscience@anulum.li
// ORCID: https://orcid.org/0009-0009-3560-0851
// License: GNU AGPL v3 | Commercial licensing available
// ─────────────────────────────────────────────────────────────────────

//! Property-based tests for the shared mesh and config types.

use monoblock_types::{MeshGrid2d, MonoblockConfig};
use proptest::prelude::*;

// ── Mesh indexing ────────────────────────────────────────────────────

proptest! {
    /// Every point strictly inside the mesh maps to a valid flat bin.
    #[test]
    fn inside_points_always_bin(
        ny in 2usize..40,
        nz in 2usize..40,
        fy in 0.0f64..0.999,
        fz in 0.0f64..0.999,
    ) {
        let mesh = MeshGrid2d::new(ny, nz, -1.3, 1.3, -1.2, 1.5, -0.6, 0.6);
        let y = mesh.y_min + fy * (mesh.y_max - mesh.y_min);
        let z = mesh.z_min + fz * (mesh.z_max - mesh.z_min);
        let idx = mesh.voxel_index(0.0, y, z);
        prop_assert!(idx.is_some());
        prop_assert!(idx.unwrap() < mesh.n_voxels());
    }

    /// Points outside the slab never bin, wherever they sit in y-z.
    #[test]
    fn outside_slab_never_bins(
        x in prop::sample::select(vec![-10.0f64, -0.61, 0.6, 7.5]),
        y in -1.2f64..1.2,
        z in -1.1f64..1.4,
    ) {
        let mesh = MeshGrid2d::new(50, 50, -1.3, 1.3, -1.2, 1.5, -0.6, 0.6);
        prop_assert!(mesh.voxel_index(x, y, z).is_none());
    }

    /// Reshape is a pure reindexing: totals are preserved exactly.
    #[test]
    fn reshape_preserves_totals(
        ny in 2usize..30,
        nz in 2usize..30,
        scale in 1.0e-6f64..1.0e6,
    ) {
        let mesh = MeshGrid2d::new(ny, nz, 0.0, 1.0, 0.0, 1.0, 0.0, 1.0);
        let flat: Vec<f64> = (0..mesh.n_voxels()).map(|i| scale * (i as f64 + 1.0)).collect();
        let flat_sum: f64 = flat.iter().sum();
        let arr = mesh.reshape(&flat).unwrap();
        prop_assert_eq!(arr.shape(), &[nz, ny]);
        prop_assert!((arr.sum() - flat_sum).abs() <= 1e-9 * flat_sum.abs());
    }

    /// Voxel volume times voxel count recovers the mesh box volume.
    #[test]
    fn voxel_volume_tiles_the_box(
        ny in 2usize..60,
        nz in 2usize..60,
        width in 0.1f64..10.0,
        height in 0.1f64..10.0,
        depth in 0.1f64..5.0,
    ) {
        let mesh = MeshGrid2d::new(ny, nz, 0.0, width, 0.0, height, 0.0, depth);
        let tiled = mesh.voxel_volume_cm3() * mesh.n_voxels() as f64;
        let exact = width * height * depth;
        prop_assert!((tiled - exact).abs() <= 1e-9 * exact);
    }
}

// ── Config serialisation ─────────────────────────────────────────────

proptest! {
    /// Scaled-but-positive dimensions survive a JSON roundtrip and stay valid.
    #[test]
    fn scaled_configs_roundtrip(scale in 0.2f64..5.0) {
        let mut cfg = MonoblockConfig::default();
        cfg.monoblock.thickness *= scale;
        cfg.monoblock.height *= scale;
        cfg.monoblock.width *= scale;
        cfg.monoblock.cucrzr_inner_radius *= scale;
        cfg.monoblock.cucrzr_thickness *= scale;
        cfg.monoblock.cu_thickness *= scale;
        cfg.monoblock.w_thickness *= scale;
        prop_assert!(cfg.validate().is_ok());

        let json = serde_json::to_string(&cfg).unwrap();
        let back: MonoblockConfig = serde_json::from_str(&json).unwrap();
        prop_assert!((back.monoblock.armour_top() - cfg.monoblock.armour_top()).abs() < 1e-12);
    }
}
