//! NumPy interop for converted mesh grids.

use monoblock_types::{MonoblockError, MonoblockResult};
use ndarray::Array2;
use ndarray_npy::{read_npy, write_npy};

/// Write a converted `[nz, ny]` grid as `.npy` for numpy tooling.
pub fn write_mesh_npy(path: &str, values: &Array2<f64>) -> MonoblockResult<()> {
    write_npy(path, values).map_err(|e| {
        MonoblockError::PostProcessError(format!("Failed to write npy '{path}': {e}"))
    })
}

/// Read a grid written by [`write_mesh_npy`].
pub fn read_mesh_npy(path: &str) -> MonoblockResult<Array2<f64>> {
    read_npy(path).map_err(|e| {
        MonoblockError::PostProcessError(format!("Failed to read npy '{path}': {e}"))
    })
}
