// ─────────────────────────────────────────────────────────────────────
// SCPN Monoblock Neutronics — Transport
// © 1998–2026 Miroslav Šotek. All rights reserved.
// Contact: www.anulum.li | protoscience@anulum.li
// ORCID: https://orcid.org/0009-0009-3560-0851
// License: GNU AGPL v3 | Commercial licensing available
// ─────────────────────────────────────────────────────────────────────

//! Analog Monte Carlo neutron transport through the monoblock.
//!
//! Port of `run_neutronics.py`. A D-T ring source drives batches of
//! neutron histories through the four-region CSG model; helium
//! production and heating are tallied per cell and on a regular y-z
//! mesh, and the batch statistics land in a statepoint file.

pub mod data;
pub mod materials;
pub mod model;
pub mod source;
pub mod tally;

pub use materials::{Material, MaterialSet};
pub use model::{Model, RunReport};
pub use source::{muir_mean_and_width, FusionRingSource};
pub use tally::{CellTallyDef, MeshTallyDef};
