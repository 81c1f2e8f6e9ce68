// ─────────────────────────────────────────────────────────────────────
// SCPN Monoblock Neutronics — Shared Types
// © 1998–2026 Miroslav Šotek. All rights reserved.
// Contact: www.anulum.li | protoscience@anulum.li
// ORCID: https://orcid.org/0009-0009-3560-0851
// License: GNU AGPL v3 | Commercial licensing available
// ─────────────────────────────────────────────────────────────────────

//! Shared types for the divertor monoblock neutronics pipeline.
//!
//! Everything the geometry, transport and post-processing crates agree
//! on lives here: the parametric monoblock description, physical
//! constants, the regular tally mesh, and the statepoint file written
//! at the end of a transport run.

pub mod config;
pub mod constants;
pub mod error;
pub mod mesh;
pub mod statepoint;

pub use config::{
    MaterialConfig, MonoblockConfig, MonoblockParams, RunSettings, SourceConfig, TallyConfig,
};
pub use error::{MonoblockError, MonoblockResult};
pub use mesh::MeshGrid2d;
pub use statepoint::{ScoreKind, Statepoint, TallyDomain, TallyRecord};
