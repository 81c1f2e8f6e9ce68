// ─────────────────────────────────────────────────────────────────────
// SCPN Monoblock Neutronics — Transport Model
// © 1998–2026 Miroslav Šotek. All rights reserved.
// Contact: www.anulum.li | protoscience@anulum.li
// ORCID: https://orcid.org/0009-0009-3560-0851
// License: GNU AGPL v3 | Commercial licensing available
// ─────────────────────────────────────────────────────────────────────

//! The assembled transport model and its batch run loop.
//!
//! Python wraps the monoblock in a reflective wedge with a graveyard
//! box around it; here the same picture is a reflective unit cell. The
//! x and y cell walls reflect (an infinite array of monoblocks along
//! the pipe and across the target plate), the source plane above and
//! the open face below the block are vacuum kills.
//!
//! Transport is analog: free flights against the macroscopic total,
//! one sampled reaction per collision, energy deposited at collision
//! sites, histories killed at the energy cutoff with their remaining
//! energy banked as heating.

use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

use monoblock_geometry::{MaterialRegion, Monoblock};
use monoblock_types::config::{MonoblockConfig, RunSettings, TallyConfig};
use monoblock_types::{MeshGrid2d, MonoblockResult, ScoreKind, Statepoint};

use crate::materials::MaterialSet;
use crate::source::FusionRingSource;
use crate::tally::{CellTallyDef, MeshTallyDef};

/// Nudge past a crossed surface [cm].
const BUMP: f64 = 1e-8;

/// Hard cap on events per history; anything beyond counts as lost.
const MAX_EVENTS: usize = 100_000;

/// Outcome of a full transport run.
#[derive(Debug)]
pub struct RunReport {
    pub statepoint: Statepoint,
    pub lost_particles: usize,
    pub elapsed_s: f64,
}

/// Monoblock, materials, source and tally layout for one run.
#[derive(Debug, Clone)]
pub struct Model {
    block: Monoblock,
    materials: MaterialSet,
    source: FusionRingSource,
    settings: RunSettings,
    grid: MeshGrid2d,
}

impl Model {
    pub fn from_config(config: &MonoblockConfig) -> MonoblockResult<Model> {
        config.validate()?;
        let block = Monoblock::new(&config.monoblock)?;
        let materials = MaterialSet::from_config(&config.materials);
        let source = FusionRingSource::new(&config.source, &block);
        let grid = Model::tally_grid(&block, &config.tally);
        Ok(Model {
            block,
            materials,
            source,
            settings: config.settings.clone(),
            grid,
        })
    }

    /// y-z mesh over the inflated bounding box. Python: RegularMesh2D
    /// with half-extents scaled by the bbox margin.
    fn tally_grid(block: &Monoblock, tally: &TallyConfig) -> MeshGrid2d {
        let bbox = block.bounding_box().inflated(tally.bbox_margin);
        MeshGrid2d::new(
            tally.mesh_ny,
            tally.mesh_nz,
            bbox.min[1],
            bbox.max[1],
            bbox.min[2],
            bbox.max[2],
            bbox.min[0],
            bbox.max[0],
        )
    }

    pub fn block(&self) -> &Monoblock {
        &self.block
    }

    pub fn grid(&self) -> &MeshGrid2d {
        &self.grid
    }

    pub fn source(&self) -> &FusionRingSource {
        &self.source
    }

    /// Run all batches and collect the statepoint.
    pub fn run(&self) -> MonoblockResult<RunReport> {
        let start = std::time::Instant::now();

        let mut cell_tallies = vec![
            CellTallyDef::new(MaterialRegion::Tungsten, ScoreKind::HeliumProduction),
            CellTallyDef::new(MaterialRegion::Copper, ScoreKind::HeliumProduction),
        ];
        let mut mesh_tallies = vec![
            MeshTallyDef::new(
                self.grid.clone(),
                ScoreKind::HeliumProduction,
                Some(MaterialRegion::Tungsten),
            ),
            MeshTallyDef::new(
                self.grid.clone(),
                ScoreKind::Heating,
                Some(MaterialRegion::Tungsten),
            ),
        ];

        let mut lost_particles = 0usize;
        for batch in 0..self.settings.batches {
            let mut rng = StdRng::seed_from_u64(self.settings.seed + batch as u64);
            for _ in 0..self.settings.particles {
                if !self.track_history(&mut rng, &mut cell_tallies, &mut mesh_tallies) {
                    lost_particles += 1;
                }
            }
            for tally in &mut cell_tallies {
                tally.end_batch(self.settings.particles);
            }
            for tally in &mut mesh_tallies {
                tally.end_batch(self.settings.particles);
            }
        }

        let mut tallies = Vec::with_capacity(cell_tallies.len() + mesh_tallies.len());
        tallies.extend(cell_tallies.into_iter().map(CellTallyDef::into_record));
        tallies.extend(mesh_tallies.into_iter().map(MeshTallyDef::into_record));

        let statepoint = Statepoint {
            n_batches: self.settings.batches,
            particles_per_batch: self.settings.particles,
            seed: self.settings.seed,
            tallies,
        };

        Ok(RunReport {
            statepoint,
            lost_particles,
            elapsed_s: start.elapsed().as_secs_f64(),
        })
    }

    /// Follow one neutron from birth to death. Returns false if the
    /// history hit the event cap.
    fn track_history(
        &self,
        rng: &mut StdRng,
        cell_tallies: &mut [CellTallyDef],
        mesh_tallies: &mut [MeshTallyDef],
    ) -> bool {
        let born = self.source.sample(rng);
        let mut p = born.position;
        let mut u = born.direction;
        let mut energy = born.energy_ev;

        let kill_top = self.source.plane_z();
        let (_, pipe_x_half, y_half, z_bottom, _) = self.block.extents();

        for _ in 0..MAX_EVENTS {
            match self.block.region_at(p) {
                None => {
                    // Vacuum between source plane and block, or in the
                    // inter-block gap.
                    if p[2] >= kill_top && u[2] > 0.0 {
                        return true; // escaped upward
                    }
                    if p[2] <= z_bottom && u[2] < 0.0 {
                        return true; // escaped below the block
                    }
                    let d_surface = self
                        .block
                        .distance_to_boundary(p, u)
                        .unwrap_or(f64::INFINITY);
                    let d_wall_x = wall_distance(p[0], u[0], pipe_x_half);
                    let d_wall_y = wall_distance(p[1], u[1], y_half);
                    let d_kill = if u[2] > 0.0 {
                        (kill_top - p[2]) / u[2]
                    } else if u[2] < 0.0 {
                        (z_bottom - p[2]) / u[2]
                    } else {
                        f64::INFINITY
                    };
                    let d_min = d_surface.min(d_wall_x).min(d_wall_y);
                    if d_kill <= d_min {
                        return true; // leaves through an open face
                    }
                    if !d_min.is_finite() {
                        return false;
                    }
                    if d_wall_x <= d_surface && d_wall_x <= d_wall_y {
                        advance(&mut p, u, d_wall_x);
                        u[0] = -u[0];
                    } else if d_wall_y <= d_surface && d_wall_y <= d_wall_x {
                        advance(&mut p, u, d_wall_y);
                        u[1] = -u[1];
                    } else {
                        advance(&mut p, u, d_surface + BUMP);
                    }
                }
                Some(region) => {
                    let material = self.materials.get(region);
                    let xs = material.macro_xs(energy);
                    let flight = -rng.gen::<f64>().ln() / xs.total;

                    let d_surface = self
                        .block
                        .distance_to_boundary(p, u)
                        .unwrap_or(f64::INFINITY);
                    let d_wall_x = wall_distance(p[0], u[0], pipe_x_half);
                    let d_wall_y = wall_distance(p[1], u[1], y_half);
                    let d_geom = d_surface.min(d_wall_x).min(d_wall_y);

                    if flight < d_geom {
                        advance(&mut p, u, flight);
                        let alive = self.collide(
                            rng,
                            region,
                            p,
                            &mut u,
                            &mut energy,
                            cell_tallies,
                            mesh_tallies,
                        );
                        if !alive {
                            return true;
                        }
                    } else if d_wall_x <= d_surface && d_wall_x <= d_wall_y {
                        advance(&mut p, u, d_wall_x);
                        u[0] = -u[0];
                    } else if d_wall_y <= d_surface && d_wall_y <= d_wall_x {
                        advance(&mut p, u, d_wall_y);
                        u[1] = -u[1];
                    } else {
                        advance(&mut p, u, d_surface + BUMP);
                    }
                }
            }
        }
        false
    }

    /// Sample the reaction at a collision site, score, and update the
    /// neutron state. Returns false when the history ends here.
    #[allow(clippy::too_many_arguments)]
    fn collide(
        &self,
        rng: &mut StdRng,
        region: MaterialRegion,
        p: [f64; 3],
        u: &mut [f64; 3],
        energy: &mut f64,
        cell_tallies: &mut [CellTallyDef],
        mesh_tallies: &mut [MeshTallyDef],
    ) -> bool {
        let material = self.materials.get(region);
        let xs = material.macro_xs(*energy);
        let xi = rng.gen::<f64>() * xs.total;

        if xi < xs.n_alpha {
            // (n,Xa): helium made here, neutron absorbed.
            score_helium(cell_tallies, mesh_tallies, region, p);
            score_heating(mesh_tallies, region, p, *energy);
            return false;
        }
        if xi < xs.n_alpha + xs.capture {
            // Radiative capture.
            score_heating(mesh_tallies, region, p, *energy);
            return false;
        }

        // Elastic scatter off a sampled nuclide.
        let nuclide = material.sample_nuclide(*energy, rng.gen());
        let (e_new, u_new) = scatter_elastic(rng, nuclide.mass_ratio(), *energy, *u);
        let mut deposit = *energy - e_new;
        if e_new < self.settings.energy_cutoff_ev {
            // Kill at the cutoff, banking the remainder locally.
            deposit += e_new;
            score_heating(mesh_tallies, region, p, deposit);
            return false;
        }
        score_heating(mesh_tallies, region, p, deposit);
        *energy = e_new;
        *u = u_new;
        true
    }
}

fn score_helium(
    cell_tallies: &mut [CellTallyDef],
    mesh_tallies: &mut [MeshTallyDef],
    region: MaterialRegion,
    p: [f64; 3],
) {
    for tally in cell_tallies.iter_mut() {
        if tally.score == ScoreKind::HeliumProduction {
            tally.score(region, 1.0);
        }
    }
    for tally in mesh_tallies.iter_mut() {
        if tally.score == ScoreKind::HeliumProduction {
            tally.score(region, p, 1.0);
        }
    }
}

fn score_heating(
    mesh_tallies: &mut [MeshTallyDef],
    region: MaterialRegion,
    p: [f64; 3],
    deposit_ev: f64,
) {
    for tally in mesh_tallies.iter_mut() {
        if tally.score == ScoreKind::Heating {
            tally.score(region, p, deposit_ev);
        }
    }
}

fn advance(p: &mut [f64; 3], u: [f64; 3], d: f64) {
    p[0] += u[0] * d;
    p[1] += u[1] * d;
    p[2] += u[2] * d;
}

/// Distance to the reflective wall pair at ±half along one axis.
/// Clamped at zero so a float overshoot reflects immediately instead
/// of stepping backwards.
fn wall_distance(coord: f64, dir: f64, half: f64) -> f64 {
    if dir > 1e-14 {
        ((half - coord) / dir).max(0.0)
    } else if dir < -1e-14 {
        ((-half - coord) / dir).max(0.0)
    } else {
        f64::INFINITY
    }
}

/// Isotropic-in-CM elastic scatter off a target with mass ratio `a`.
/// Returns the lab energy and direction.
fn scatter_elastic<R: Rng>(rng: &mut R, a: f64, energy: f64, u: [f64; 3]) -> (f64, [f64; 3]) {
    let mu_cm: f64 = rng.gen_range(-1.0..1.0);
    let denom_sq = a * a + 2.0 * a * mu_cm + 1.0;
    let e_new = energy * denom_sq / ((a + 1.0) * (a + 1.0));
    let mu_lab = (1.0 + a * mu_cm) / denom_sq.sqrt();
    let phi: f64 = rng.gen_range(0.0..std::f64::consts::TAU);
    (e_new, rotate_direction(u, mu_lab, phi))
}

/// Rotate `u` by the polar cosine `mu` and azimuth `phi` about itself.
fn rotate_direction(u: [f64; 3], mu: f64, phi: f64) -> [f64; 3] {
    let sin_theta = (1.0 - mu * mu).max(0.0).sqrt();
    // Build a frame transverse to u, seeding with whichever axis is
    // least aligned.
    let t = if u[2].abs() < 0.9 {
        [0.0, 0.0, 1.0]
    } else {
        [1.0, 0.0, 0.0]
    };
    let mut v = cross(u, t);
    let v_norm = (v[0] * v[0] + v[1] * v[1] + v[2] * v[2]).sqrt();
    v = [v[0] / v_norm, v[1] / v_norm, v[2] / v_norm];
    let w = cross(u, v);

    let mut out = [
        mu * u[0] + sin_theta * (phi.cos() * v[0] + phi.sin() * w[0]),
        mu * u[1] + sin_theta * (phi.cos() * v[1] + phi.sin() * w[1]),
        mu * u[2] + sin_theta * (phi.cos() * v[2] + phi.sin() * w[2]),
    ];
    let norm = (out[0] * out[0] + out[1] * out[1] + out[2] * out[2]).sqrt();
    out = [out[0] / norm, out[1] / norm, out[2] / norm];
    out
}

fn cross(a: [f64; 3], b: [f64; 3]) -> [f64; 3] {
    [
        a[1] * b[2] - a[2] * b[1],
        a[2] * b[0] - a[0] * b[2],
        a[0] * b[1] - a[1] * b[0],
    ]
}

#[cfg(test)]
mod tests {
    use super::*;

    fn small_config() -> MonoblockConfig {
        let mut config = MonoblockConfig::default();
        config.settings.batches = 2;
        config.settings.particles = 400;
        config.settings.seed = 11;
        config.tally.mesh_ny = 10;
        config.tally.mesh_nz = 10;
        config
    }

    #[test]
    fn tally_grid_spans_the_inflated_bbox() {
        let model = Model::from_config(&MonoblockConfig::default()).unwrap();
        let grid = model.grid();
        assert_eq!(grid.ny, 50);
        assert_eq!(grid.nz, 50);
        assert!((grid.y_min - (-1.265)).abs() < 1e-12);
        assert!((grid.y_max - 1.265).abs() < 1e-12);
        assert!((grid.z_min - (-1.275)).abs() < 1e-12);
        assert!((grid.z_max - 1.475).abs() < 1e-12);
        assert!((grid.x_min - (-0.66)).abs() < 1e-12);
        assert!((grid.x_max - 0.66).abs() < 1e-12);
    }

    #[test]
    fn run_produces_all_four_tallies() {
        let model = Model::from_config(&small_config()).unwrap();
        let report = model.run().unwrap();
        let sp = &report.statepoint;

        assert_eq!(sp.n_batches, 2);
        assert_eq!(sp.particles_per_batch, 400);
        assert!(sp.validate().is_ok());
        assert!(sp.tally("tungsten_(n,Xa)").is_ok());
        assert!(sp.tally("copper_(n,Xa)").is_ok());
        assert!(sp.tally("(n,Xa)_on_2D_mesh_yz").is_ok());
        assert!(sp.tally("heating_on_2D_mesh_yz").is_ok());
        assert_eq!(report.lost_particles, 0);
    }

    #[test]
    fn heating_is_deposited_and_bounded_by_source_energy() {
        let model = Model::from_config(&small_config()).unwrap();
        let report = model.run().unwrap();
        let heating = report.statepoint.tally("heating_on_2D_mesh_yz").unwrap();
        let total = heating.total();
        // Roughly half the isotropic source heads down into the block;
        // collisions there are certain over 800 histories.
        assert!(total > 0.0);
        // Per source particle, deposits cannot exceed the birth energy.
        assert!(total < 1.5e7, "unphysical heating {total}");
        assert!(heating.mean.iter().all(|&m| m >= 0.0));
    }

    #[test]
    fn mesh_helium_never_exceeds_the_tungsten_cell_tally() {
        let model = Model::from_config(&small_config()).unwrap();
        let report = model.run().unwrap();
        let cell = report.statepoint.tally("tungsten_(n,Xa)").unwrap().total();
        let mesh = report
            .statepoint
            .tally("(n,Xa)_on_2D_mesh_yz")
            .unwrap()
            .total();
        // The mesh covers the whole block, so the filtered mesh tally
        // and the cell tally see the same events.
        assert!((cell - mesh).abs() < 1e-12);
    }

    #[test]
    fn identical_seeds_reproduce_identical_results() {
        let config = small_config();
        let a = Model::from_config(&config).unwrap().run().unwrap();
        let b = Model::from_config(&config).unwrap().run().unwrap();
        let ha = a.statepoint.tally("heating_on_2D_mesh_yz").unwrap();
        let hb = b.statepoint.tally("heating_on_2D_mesh_yz").unwrap();
        assert_eq!(ha.mean, hb.mean);
        assert_eq!(ha.std_dev, hb.std_dev);
    }

    #[test]
    fn different_seeds_decorrelate() {
        let mut config = small_config();
        let a = Model::from_config(&config).unwrap().run().unwrap();
        config.settings.seed = 99_991;
        let b = Model::from_config(&config).unwrap().run().unwrap();
        let ta = a.statepoint.tally("heating_on_2D_mesh_yz").unwrap().total();
        let tb = b.statepoint.tally("heating_on_2D_mesh_yz").unwrap().total();
        assert!((ta - tb).abs() > 0.0);
    }

    #[test]
    fn elastic_scatter_stays_within_kinematic_bounds() {
        let mut rng = StdRng::seed_from_u64(5);
        let a: f64 = 183.84 / 1.00866;
        let alpha = ((a - 1.0) / (a + 1.0)).powi(2);
        for _ in 0..5000 {
            let (e_new, u_new) = scatter_elastic(&mut rng, a, 14.08e6, [0.0, 0.0, -1.0]);
            assert!(e_new <= 14.08e6 + 1e-6);
            assert!(e_new >= alpha * 14.08e6 - 1e-6);
            let norm = (u_new[0] * u_new[0] + u_new[1] * u_new[1] + u_new[2] * u_new[2]).sqrt();
            assert!((norm - 1.0).abs() < 1e-9);
        }
    }

    #[test]
    fn hydrogen_halves_energy_on_average() {
        let mut rng = StdRng::seed_from_u64(17);
        let a = 1.008 / 1.00866;
        let n = 20_000;
        let mean_ratio: f64 = (0..n)
            .map(|_| scatter_elastic(&mut rng, a, 1.0e6, [1.0, 0.0, 0.0]).0 / 1.0e6)
            .sum::<f64>()
            / n as f64;
        assert!((mean_ratio - 0.5).abs() < 0.02, "mean ratio {mean_ratio}");

        let mut rng = StdRng::seed_from_u64(18);
        let a_w = 183.84 / 1.00866;
        let mean_ratio_w: f64 = (0..n)
            .map(|_| scatter_elastic(&mut rng, a_w, 1.0e6, [1.0, 0.0, 0.0]).0 / 1.0e6)
            .sum::<f64>()
            / n as f64;
        assert!(mean_ratio_w > 0.97, "tungsten ratio {mean_ratio_w}");
    }

    #[test]
    fn rotation_hits_the_requested_angle() {
        let u = [0.0, 0.0, 1.0];
        for (mu, phi) in [(0.3, 0.7), (-0.9, 2.0), (0.999, 4.2)] {
            let r = rotate_direction(u, mu, phi);
            let dot = r[0] * u[0] + r[1] * u[1] + r[2] * u[2];
            assert!((dot - mu).abs() < 1e-9, "mu {mu} got {dot}");
        }
    }

    #[test]
    fn wall_distances() {
        assert!((wall_distance(0.0, 1.0, 0.6) - 0.6).abs() < 1e-12);
        assert!((wall_distance(0.3, -1.0, 0.6) - 0.9).abs() < 1e-12);
        assert_eq!(wall_distance(0.0, 0.0, 0.6), f64::INFINITY);
    }
}
