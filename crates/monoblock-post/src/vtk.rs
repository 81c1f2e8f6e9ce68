//! Legacy ASCII VTK export of converted mesh values.
//!
//! Stands in for the `openmc_mesh_tally_to_vtk` import of
//! `post_processing.py`; the output loads directly in ParaView.

use monoblock_types::{MeshGrid2d, MonoblockError, MonoblockResult};
use ndarray::Array2;

/// Write `[nz, ny]` values over `grid` as a legacy VTK rectilinear grid.
///
/// The yz mesh becomes a one-cell-deep x slab, so cell data maps one to
/// one onto tally voxels in VTK's x-fastest cell order. The scalar name
/// is cut down to the characters VTK readers accept.
pub fn write_mesh_vtk(
    path: &str,
    grid: &MeshGrid2d,
    values: &Array2<f64>,
    name: &str,
) -> MonoblockResult<()> {
    if values.dim() != (grid.nz, grid.ny) {
        return Err(MonoblockError::ShapeMismatch {
            expected: grid.n_voxels(),
            actual: values.len(),
        });
    }

    let mut out = String::new();
    out.push_str("# vtk DataFile Version 3.0\n");
    out.push_str(&format!("{name}\n"));
    out.push_str("ASCII\n");
    out.push_str("DATASET RECTILINEAR_GRID\n");
    out.push_str(&format!("DIMENSIONS 2 {} {}\n", grid.ny + 1, grid.nz + 1));

    out.push_str("X_COORDINATES 2 double\n");
    out.push_str(&format!("{:.6e} {:.6e}\n", grid.x_min, grid.x_max));

    out.push_str(&format!("Y_COORDINATES {} double\n", grid.ny + 1));
    let dy = grid.dy();
    for i in 0..=grid.ny {
        let sep = if i == grid.ny { '\n' } else { ' ' };
        out.push_str(&format!("{:.6e}{sep}", grid.y_min + i as f64 * dy));
    }

    out.push_str(&format!("Z_COORDINATES {} double\n", grid.nz + 1));
    let dz = grid.dz();
    for i in 0..=grid.nz {
        let sep = if i == grid.nz { '\n' } else { ' ' };
        out.push_str(&format!("{:.6e}{sep}", grid.z_min + i as f64 * dz));
    }

    out.push_str(&format!("CELL_DATA {}\n", grid.n_voxels()));
    out.push_str(&format!("SCALARS {} double 1\n", sanitize(name)));
    out.push_str("LOOKUP_TABLE default\n");
    for iz in 0..grid.nz {
        for iy in 0..grid.ny {
            out.push_str(&format!("{:.6e}\n", values[[iz, iy]]));
        }
    }

    std::fs::write(path, out)?;
    Ok(())
}

fn sanitize(name: &str) -> String {
    name.chars()
        .map(|c| {
            if c.is_ascii_alphanumeric() || c == '_' {
                c
            } else {
                '_'
            }
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn temp_path() -> std::path::PathBuf {
        std::env::temp_dir().join(format!(
            "mesh_vtk_{}_{}.vtk",
            std::process::id(),
            std::time::SystemTime::now()
                .duration_since(std::time::UNIX_EPOCH)
                .unwrap()
                .as_nanos()
        ))
    }

    #[test]
    fn vtk_layout_matches_grid() {
        let grid = MeshGrid2d::new(3, 2, 0.0, 3.0, 0.0, 2.0, -0.6, 0.6);
        let values = Array2::from_shape_fn((2, 3), |(iz, iy)| (iz * 3 + iy) as f64);
        let path = temp_path();
        write_mesh_vtk(
            path.to_str().unwrap(),
            &grid,
            &values,
            "(n,Xa)_on_2D_mesh_yz",
        )
        .unwrap();

        let contents = std::fs::read_to_string(&path).unwrap();
        assert!(contents.starts_with("# vtk DataFile Version 3.0\n"));
        assert!(contents.contains("DIMENSIONS 2 4 3"));
        assert!(contents.contains("CELL_DATA 6"));
        // Parenthesised tally names are not valid VTK identifiers.
        assert!(contents.contains("SCALARS _n_Xa__on_2D_mesh_yz double 1"));

        let data: Vec<&str> = contents
            .lines()
            .skip_while(|l| !l.starts_with("LOOKUP_TABLE"))
            .skip(1)
            .collect();
        assert_eq!(data.len(), 6);
        // VTK cell order is x fastest, then y, then z; bin 3 is [iz=1, iy=0].
        assert!((data[3].parse::<f64>().unwrap() - 3.0).abs() < 1e-12);

        std::fs::remove_file(&path).ok();
    }

    #[test]
    fn vtk_rejects_mismatched_values() {
        let grid = MeshGrid2d::new(3, 2, 0.0, 3.0, 0.0, 2.0, -0.6, 0.6);
        let values = Array2::zeros((3, 3));
        match write_mesh_vtk("/tmp/unused.vtk", &grid, &values, "heating") {
            Err(MonoblockError::ShapeMismatch { expected, actual }) => {
                assert_eq!(expected, 6);
                assert_eq!(actual, 9);
            }
            other => panic!("Unexpected result: {other:?}"),
        }
    }

    #[test]
    fn names_without_specials_pass_through() {
        assert_eq!(sanitize("heating_on_2D_mesh_yz"), "heating_on_2D_mesh_yz");
        assert_eq!(sanitize("(n,Xa)"), "_n_Xa_");
    }
}
