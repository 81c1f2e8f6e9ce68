// ─────────────────────────────────────────────────────────────────────
// SCPN Monoblock Neutronics — Statepoint
// © 1998–2026 Miroslav Šotek. All rights reserved.
// Contact: www.anulum.li | protoscience@anulum.li
// ORCID: https://orcid.org/0009-0009-3560-0851
// License: GNU AGPL v3 | Commercial licensing available
// ─────────────────────────────────────────────────────────────────────

//! Statepoint file written at the end of a transport run.
//!
//! Holds per-tally batch statistics (mean and standard deviation of the
//! mean) keyed by tally name, in per-source-particle units. Serialised
//! as JSON under the traditional `statepoint.<batches>` naming scheme.

use serde::{Deserialize, Serialize};

use crate::error::{MonoblockError, MonoblockResult};
use crate::mesh::MeshGrid2d;

/// What a tally scores.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ScoreKind {
    /// Helium production, the (n,Xa) reaction rate [reactions / source particle].
    #[serde(rename = "(n,Xa)")]
    HeliumProduction,
    /// Energy deposition [eV / source particle].
    #[serde(rename = "heating")]
    Heating,
}

impl ScoreKind {
    /// Score label as it appears in tally names.
    pub fn label(&self) -> &'static str {
        match self {
            ScoreKind::HeliumProduction => "(n,Xa)",
            ScoreKind::Heating => "heating",
        }
    }
}

/// Where a tally scores.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum TallyDomain {
    /// One bin covering a single material region.
    Cell { region: String },
    /// One bin per voxel of a regular y-z mesh.
    Mesh { grid: MeshGrid2d },
}

/// One tally's batch statistics.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TallyRecord {
    pub name: String,
    pub score: ScoreKind,
    pub domain: TallyDomain,
    /// Restricts mesh scoring to one material, mirroring a material filter.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub material_filter: Option<String>,
    /// Batch mean per bin [score / source particle].
    pub mean: Vec<f64>,
    /// Standard deviation of the batch mean per bin.
    pub std_dev: Vec<f64>,
}

impl TallyRecord {
    /// Number of bins the domain implies.
    pub fn expected_bins(&self) -> usize {
        match &self.domain {
            TallyDomain::Cell { .. } => 1,
            TallyDomain::Mesh { grid } => grid.n_voxels(),
        }
    }

    /// Mesh grid for mesh tallies, `None` for cell tallies.
    pub fn mesh(&self) -> Option<&MeshGrid2d> {
        match &self.domain {
            TallyDomain::Mesh { grid } => Some(grid),
            TallyDomain::Cell { .. } => None,
        }
    }

    /// Sum of the per-bin means.
    pub fn total(&self) -> f64 {
        self.mean.iter().sum()
    }

    /// Per-bin relative error, zero where the mean is zero.
    pub fn relative_error(&self) -> Vec<f64> {
        self.mean
            .iter()
            .zip(&self.std_dev)
            .map(|(&m, &s)| if m != 0.0 { s / m.abs() } else { 0.0 })
            .collect()
    }

    fn validate(&self) -> MonoblockResult<()> {
        if self.mean.len() != self.expected_bins() {
            return Err(MonoblockError::ShapeMismatch {
                expected: self.expected_bins(),
                actual: self.mean.len(),
            });
        }
        if self.std_dev.len() != self.mean.len() {
            return Err(MonoblockError::ShapeMismatch {
                expected: self.mean.len(),
                actual: self.std_dev.len(),
            });
        }
        Ok(())
    }
}

/// Complete transport run output.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Statepoint {
    pub n_batches: usize,
    pub particles_per_batch: usize,
    pub seed: u64,
    pub tallies: Vec<TallyRecord>,
}

impl Statepoint {
    /// Conventional file name for a run of `batches` batches.
    pub fn filename(batches: usize) -> String {
        format!("statepoint.{batches}.json")
    }

    /// Look a tally up by name.
    pub fn tally(&self, name: &str) -> MonoblockResult<&TallyRecord> {
        self.tallies
            .iter()
            .find(|t| t.name == name)
            .ok_or_else(|| MonoblockError::TallyNotFound { name: name.into() })
    }

    /// Check every tally's data length against its domain.
    pub fn validate(&self) -> MonoblockResult<()> {
        for tally in &self.tallies {
            tally.validate()?;
        }
        Ok(())
    }

    /// Write to disk as pretty-printed JSON.
    pub fn save(&self, path: &str) -> MonoblockResult<()> {
        let json = serde_json::to_string_pretty(self)?;
        std::fs::write(path, json)?;
        Ok(())
    }

    /// Load from disk and validate tally shapes.
    pub fn load(path: &str) -> MonoblockResult<Self> {
        let contents = std::fs::read_to_string(path)?;
        let statepoint: Self = serde_json::from_str(&contents)?;
        statepoint.validate()?;
        Ok(statepoint)
    }
}
