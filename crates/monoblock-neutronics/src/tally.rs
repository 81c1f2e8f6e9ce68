// ─────────────────────────────────────────────────────────────────────
// SCPN Monoblock Neutronics — Tallies
// © 1998–2026 Miroslav Šotek. All rights reserved.
// Contact: www.anulum.li | protoscience@anulum.li
// ORCID: https://orcid.org/0009-0009-3560-0851
// License: GNU AGPL v3 | Commercial licensing available
// ─────────────────────────────────────────────────────────────────────

//! Cell and mesh tallies with batch statistics.
//!
//! Scores accumulate per batch, are normalised to one source particle
//! at batch end, and the run-level mean carries the standard deviation
//! of the batch means. Tally names follow the original run script:
//! `tungsten_(n,Xa)`, `(n,Xa)_on_2D_mesh_yz`, `heating_on_2D_mesh_yz`.

use itertools::izip;
use ndarray::Array1;

use monoblock_geometry::MaterialRegion;
use monoblock_types::{MeshGrid2d, ScoreKind, TallyDomain, TallyRecord};

/// Per-bin batch accumulator: running batch, sum and sum of squares of
/// the per-particle batch means.
#[derive(Debug, Clone)]
struct BatchAccum {
    current: Array1<f64>,
    sum: Array1<f64>,
    sum_sq: Array1<f64>,
    batches: usize,
}

impl BatchAccum {
    fn new(bins: usize) -> BatchAccum {
        BatchAccum {
            current: Array1::zeros(bins),
            sum: Array1::zeros(bins),
            sum_sq: Array1::zeros(bins),
            batches: 0,
        }
    }

    fn score(&mut self, bin: usize, weight: f64) {
        self.current[bin] += weight;
    }

    fn end_batch(&mut self, particles: usize) {
        let batch = &self.current / particles as f64;
        self.sum += &batch;
        self.sum_sq += &(&batch * &batch);
        self.current.fill(0.0);
        self.batches += 1;
    }

    /// Batch mean and standard deviation of the mean per bin.
    fn finalize(&self) -> (Vec<f64>, Vec<f64>) {
        let n = self.batches as f64;
        let mut means = Vec::with_capacity(self.sum.len());
        let mut std_devs = Vec::with_capacity(self.sum.len());
        for (&s, &sq) in izip!(self.sum.iter(), self.sum_sq.iter()) {
            let mean = s / n;
            // Sample variance of the batch means; clamp the numerator
            // against floating-point cancellation.
            let var_num = (sq - n * mean * mean).max(0.0);
            let std_dev = if self.batches > 1 {
                (var_num / (n * (n - 1.0))).sqrt()
            } else {
                0.0
            };
            means.push(mean);
            std_devs.push(std_dev);
        }
        (means, std_devs)
    }
}

/// Single-bin tally over one material region.
#[derive(Debug, Clone)]
pub struct CellTallyDef {
    pub region: MaterialRegion,
    pub score: ScoreKind,
    acc: BatchAccum,
}

impl CellTallyDef {
    pub fn new(region: MaterialRegion, score: ScoreKind) -> CellTallyDef {
        CellTallyDef {
            region,
            score,
            acc: BatchAccum::new(1),
        }
    }

    /// Python: f"{cell.name}_{score}".
    pub fn name(&self) -> String {
        format!("{}_{}", self.region.name(), self.score.label())
    }

    pub fn score(&mut self, region: MaterialRegion, weight: f64) {
        if region == self.region {
            self.acc.score(0, weight);
        }
    }

    pub fn end_batch(&mut self, particles: usize) {
        self.acc.end_batch(particles);
    }

    pub fn into_record(self) -> TallyRecord {
        let (mean, std_dev) = self.acc.finalize();
        TallyRecord {
            name: self.name(),
            score: self.score,
            domain: TallyDomain::Cell {
                region: self.region.name().to_string(),
            },
            material_filter: None,
            mean,
            std_dev,
        }
    }
}

/// Mesh tally over the y-z grid, optionally restricted to one material.
#[derive(Debug, Clone)]
pub struct MeshTallyDef {
    pub grid: MeshGrid2d,
    pub score: ScoreKind,
    pub material_filter: Option<MaterialRegion>,
    acc: BatchAccum,
}

impl MeshTallyDef {
    pub fn new(
        grid: MeshGrid2d,
        score: ScoreKind,
        material_filter: Option<MaterialRegion>,
    ) -> MeshTallyDef {
        let bins = grid.n_voxels();
        MeshTallyDef {
            grid,
            score,
            material_filter,
            acc: BatchAccum::new(bins),
        }
    }

    /// Python: f"{score}_on_2D_mesh_yz".
    pub fn name(&self) -> String {
        format!("{}_on_2D_mesh_yz", self.score.label())
    }

    pub fn score(&mut self, region: MaterialRegion, position: [f64; 3], weight: f64) {
        if let Some(filter) = self.material_filter {
            if region != filter {
                return;
            }
        }
        if let Some(bin) = self.grid.voxel_index(position[0], position[1], position[2]) {
            self.acc.score(bin, weight);
        }
    }

    pub fn end_batch(&mut self, particles: usize) {
        self.acc.end_batch(particles);
    }

    pub fn into_record(self) -> TallyRecord {
        let (mean, std_dev) = self.acc.finalize();
        TallyRecord {
            name: self.name(),
            score: self.score,
            domain: TallyDomain::Mesh { grid: self.grid },
            material_filter: self.material_filter.map(|r| r.name().to_string()),
            mean,
            std_dev,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn cell_tally_names_match_the_run_script() {
        let t = CellTallyDef::new(MaterialRegion::Tungsten, ScoreKind::HeliumProduction);
        assert_eq!(t.name(), "tungsten_(n,Xa)");
        let t = CellTallyDef::new(MaterialRegion::Copper, ScoreKind::HeliumProduction);
        assert_eq!(t.name(), "copper_(n,Xa)");
    }

    #[test]
    fn mesh_tally_names_match_the_run_script() {
        let grid = MeshGrid2d::new(2, 2, -1.0, 1.0, -1.0, 1.0, -0.5, 0.5);
        let t = MeshTallyDef::new(grid.clone(), ScoreKind::HeliumProduction, None);
        assert_eq!(t.name(), "(n,Xa)_on_2D_mesh_yz");
        let t = MeshTallyDef::new(grid, ScoreKind::Heating, None);
        assert_eq!(t.name(), "heating_on_2D_mesh_yz");
    }

    #[test]
    fn batch_statistics_by_hand() {
        let mut t = CellTallyDef::new(MaterialRegion::Tungsten, ScoreKind::HeliumProduction);
        // Batch 1: three events over 100 particles -> 0.03.
        t.score(MaterialRegion::Tungsten, 1.0);
        t.score(MaterialRegion::Tungsten, 1.0);
        t.score(MaterialRegion::Tungsten, 1.0);
        t.end_batch(100);
        // Batch 2: one event -> 0.01.
        t.score(MaterialRegion::Tungsten, 1.0);
        t.end_batch(100);

        let record = t.into_record();
        assert!((record.mean[0] - 0.02).abs() < 1e-12);
        // s = 0.01414, sigma of the mean = 0.01.
        assert!((record.std_dev[0] - 0.01).abs() < 1e-12);
    }

    #[test]
    fn cell_tally_ignores_other_regions() {
        let mut t = CellTallyDef::new(MaterialRegion::Copper, ScoreKind::HeliumProduction);
        t.score(MaterialRegion::Tungsten, 1.0);
        t.score(MaterialRegion::Water, 1.0);
        t.end_batch(10);
        t.end_batch(10);
        let record = t.into_record();
        assert_eq!(record.mean[0], 0.0);
    }

    #[test]
    fn mesh_tally_respects_the_material_filter() {
        let grid = MeshGrid2d::new(2, 2, -1.0, 1.0, -1.0, 1.0, -0.5, 0.5);
        let mut t = MeshTallyDef::new(
            grid,
            ScoreKind::HeliumProduction,
            Some(MaterialRegion::Tungsten),
        );
        let p = [0.0, 0.5, 0.5];
        t.score(MaterialRegion::Tungsten, p, 1.0);
        t.score(MaterialRegion::Copper, p, 1.0);
        t.end_batch(1);
        t.end_batch(1);
        let record = t.into_record();
        assert!((record.total() - 1.0).abs() < 1e-12);
        assert_eq!(record.material_filter.as_deref(), Some("tungsten"));
    }

    #[test]
    fn mesh_tally_bins_by_position_and_drops_outside_points() {
        let grid = MeshGrid2d::new(2, 2, 0.0, 2.0, 0.0, 2.0, -0.5, 0.5);
        let mut t = MeshTallyDef::new(grid, ScoreKind::Heating, None);
        t.score(MaterialRegion::Water, [0.0, 0.5, 0.5], 5.0); // bin 0
        t.score(MaterialRegion::Water, [0.0, 1.5, 1.5], 7.0); // bin 3
        t.score(MaterialRegion::Water, [0.0, 3.0, 0.5], 9.0); // outside
        t.score(MaterialRegion::Water, [0.9, 0.5, 0.5], 9.0); // outside slab
        t.end_batch(1);
        t.end_batch(1);
        let record = t.into_record();
        assert!((record.mean[0] - 2.5).abs() < 1e-12);
        assert!((record.mean[3] - 3.5).abs() < 1e-12);
        assert!((record.total() - 6.0).abs() < 1e-12);
    }
}
