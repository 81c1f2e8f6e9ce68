// ─────────────────────────────────────────────────────────────────────
// SCPN Monoblock Neutronics — Post-Processing
// © 1998–2026 Miroslav Šotek. All rights reserved.
// Contact: www.anulum.li | protoscience@anulum.li
// ORCID: https://orcid.org/0009-0009-3560-0851
// License: GNU AGPL v3 | Commercial licensing available
// ─────────────────────────────────────────────────────────────────────

//! Statepoint analysis: unit conversion, fits and figure export.
//!
//! Port of `post_processing.py` and `plot_source.py`. Tally results come
//! out of a transport run in per-source-particle units; this crate scales
//! them to volumetric rates for a given DT fusion power, reshapes them
//! onto their mesh, fits the depth attenuation, and renders the figures
//! (SVG) plus VTK / NumPy exports for external tooling.

pub mod npy;
pub mod plot;
pub mod stats;
pub mod units;
pub mod vtk;

pub use npy::{read_mesh_npy, write_mesh_npy};
pub use plot::{plot_mesh_tally, plot_spectrum};
pub use stats::{
    attenuation_fit, auto_bin_count, gaussian_pdf, histogram, linregress, Histogram, LinearFit,
};
pub use units::{
    cell_source_rate, find_source_strength, heating_power_density, helium_source_rate,
    voxel_volume_m3, ConvertedMesh,
};
pub use vtk::write_mesh_vtk;
