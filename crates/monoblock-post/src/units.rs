// ─────────────────────────────────────────────────────────────────────
// SCPN Monoblock Neutronics — Unit Conversion
// © 1998–2026 Miroslav Šotek. All rights reserved.
// Contact: www.anulum.li | protoscience@anulum.li
// ORCID: https://orcid.org/0009-0009-3560-0851
// License: GNU AGPL v3 | Commercial licensing available
// ─────────────────────────────────────────────────────────────────────

//! Per-source-particle tally results scaled to reactor rates.
//!
//! Port of the `openmc_tally_unit_converter` calls in `post_processing.py`:
//! voxel volume in m^3, source strength from DT fusion power, then
//! `value *= 1 / voxel_volume; value *= source_strength`.

use monoblock_types::constants::{CM3_TO_M3, EV_TO_J, E_FUSION_DT_MEV, MEV_TO_J};
use monoblock_types::{
    MeshGrid2d, MonoblockError, MonoblockResult, ScoreKind, TallyRecord,
};
use ndarray::Array2;

/// A mesh tally converted to volumetric rates and reshaped to `[nz, ny]`.
#[derive(Debug, Clone)]
pub struct ConvertedMesh {
    pub mean: Array2<f64>,
    pub std_dev: Array2<f64>,
    pub grid: MeshGrid2d,
    pub unit: &'static str,
}

/// Neutron emission rate [n/s] of a DT plasma at `fusion_power_w`.
///
/// Each DT reaction releases 17.58 MeV and exactly one neutron, so the
/// strength is power over energy per reaction.
/// Python: find_source_strength(1000e6) = 3.55e20.
pub fn find_source_strength(fusion_power_w: f64) -> f64 {
    fusion_power_w / (E_FUSION_DT_MEV * MEV_TO_J)
}

/// Voxel volume [m^3] of the mesh behind a mesh tally.
/// Python: compute_volume_of_voxels(tally2) * 1e-6.
pub fn voxel_volume_m3(tally: &TallyRecord) -> MonoblockResult<f64> {
    let grid = require_mesh(tally)?;
    Ok(grid.voxel_volume_cm3() * CM3_TO_M3)
}

/// Convert a helium-production mesh tally to He atoms m^-3 s^-1.
///
/// The std_dev grid is scaled by the same factor as the mean, so relative
/// errors are preserved.
pub fn helium_source_rate(
    tally: &TallyRecord,
    fusion_power_w: f64,
) -> MonoblockResult<ConvertedMesh> {
    require_score(tally, ScoreKind::HeliumProduction)?;
    let factor = rate_factor(tally, fusion_power_w)?;
    convert_mesh(tally, factor, "He m^-3 s^-1")
}

/// Convert a heating mesh tally [eV per source particle] to W m^-3.
pub fn heating_power_density(
    tally: &TallyRecord,
    fusion_power_w: f64,
) -> MonoblockResult<ConvertedMesh> {
    require_score(tally, ScoreKind::Heating)?;
    let factor = rate_factor(tally, fusion_power_w)? * EV_TO_J;
    convert_mesh(tally, factor, "W m^-3")
}

/// Convert a cell tally to a volumetric rate over its region volume.
///
/// Returns `(mean, std_dev)` in m^-3 s^-1 for helium production, or
/// W m^-3 for heating. The region volume comes from the analytic
/// geometry, not the tally.
pub fn cell_source_rate(
    tally: &TallyRecord,
    region_volume_cm3: f64,
    fusion_power_w: f64,
) -> MonoblockResult<(f64, f64)> {
    if tally.mesh().is_some() {
        return Err(MonoblockError::PostProcessError(format!(
            "'{}' is a mesh tally, expected a cell tally",
            tally.name
        )));
    }
    if tally.mean.len() != 1 || tally.std_dev.len() != 1 {
        return Err(MonoblockError::ShapeMismatch {
            expected: 1,
            actual: tally.mean.len().max(tally.std_dev.len()),
        });
    }
    if region_volume_cm3 <= 0.0 {
        return Err(MonoblockError::PostProcessError(format!(
            "Region volume must be positive, got {region_volume_cm3}"
        )));
    }
    let strength = checked_strength(fusion_power_w)?;
    let per_score = match tally.score {
        ScoreKind::HeliumProduction => 1.0,
        ScoreKind::Heating => EV_TO_J,
    };
    let factor = per_score * strength / (region_volume_cm3 * CM3_TO_M3);
    Ok((tally.total() * factor, tally.std_dev[0] * factor))
}

fn checked_strength(fusion_power_w: f64) -> MonoblockResult<f64> {
    if fusion_power_w <= 0.0 {
        return Err(MonoblockError::PostProcessError(format!(
            "Fusion power must be positive, got {fusion_power_w}"
        )));
    }
    Ok(find_source_strength(fusion_power_w))
}

fn require_mesh(tally: &TallyRecord) -> MonoblockResult<&MeshGrid2d> {
    tally.mesh().ok_or_else(|| {
        MonoblockError::PostProcessError(format!("'{}' is not a mesh tally", tally.name))
    })
}

fn require_score(tally: &TallyRecord, score: ScoreKind) -> MonoblockResult<()> {
    if tally.score != score {
        return Err(MonoblockError::PostProcessError(format!(
            "'{}' scores {}, expected {}",
            tally.name,
            tally.score.label(),
            score.label()
        )));
    }
    Ok(())
}

fn rate_factor(tally: &TallyRecord, fusion_power_w: f64) -> MonoblockResult<f64> {
    let strength = checked_strength(fusion_power_w)?;
    Ok(strength / voxel_volume_m3(tally)?)
}

fn convert_mesh(
    tally: &TallyRecord,
    factor: f64,
    unit: &'static str,
) -> MonoblockResult<ConvertedMesh> {
    let grid = require_mesh(tally)?.clone();
    let mean: Vec<f64> = tally.mean.iter().map(|v| v * factor).collect();
    let std_dev: Vec<f64> = tally.std_dev.iter().map(|v| v * factor).collect();
    Ok(ConvertedMesh {
        mean: grid.reshape(&mean)?,
        std_dev: grid.reshape(&std_dev)?,
        grid,
        unit,
    })
}
