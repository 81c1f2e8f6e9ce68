//! D-T fusion ring source.
//!
//! Port of the `FusionRingSource` setup in `run_neutronics.py` and the
//! Muir spectrum arithmetic of `plot_source.py`. The physical source is
//! a ring arc of plasma a standoff above the armour; under the
//! reflective unit-cell walls the arc folds onto the cell cross-section
//! as a uniform emitting sheet, which is how it is sampled here.

use monoblock_geometry::Monoblock;
use monoblock_types::config::SourceConfig;
use monoblock_types::constants::E_NEUTRON_DT_EV;
use rand::Rng;
use rand_distr::StandardNormal;

/// Fuel ion mass number entering the Muir width. Python: 5.0 for D-T.
const MUIR_MASS_RATIO: f64 = 5.0;

/// One neutron as born: position [cm], unit direction, energy [eV].
#[derive(Debug, Clone, Copy)]
pub struct SampledNeutron {
    pub position: [f64; 3],
    pub direction: [f64; 3],
    pub energy_ev: f64,
}

/// Gaussian approximation of the Muir D-T spectrum.
/// Python: mu = e0, sigma = sqrt(4 e0 kt / m).
pub fn muir_mean_and_width(e0_ev: f64, kt_ev: f64) -> (f64, f64) {
    (e0_ev, (4.0 * e0_ev * kt_ev / MUIR_MASS_RATIO).sqrt())
}

/// Isotropic D-T neutron source over the unit-cell cross-section.
#[derive(Debug, Clone)]
pub struct FusionRingSource {
    ring_radius: f64,
    angle_half_width_rad: f64,
    plane_z: f64,
    x_half: f64,
    y_half: f64,
    mean_energy_ev: f64,
    sigma_ev: f64,
}

impl FusionRingSource {
    pub fn new(config: &SourceConfig, block: &Monoblock) -> FusionRingSource {
        let (x_half, _, y_half, _, z_top) = block.extents();
        let (mean_energy_ev, sigma_ev) =
            muir_mean_and_width(E_NEUTRON_DT_EV, config.ion_temperature_ev);
        FusionRingSource {
            ring_radius: config.ring_radius,
            angle_half_width_rad: config.angle_half_width_deg.to_radians(),
            plane_z: z_top + config.standoff,
            x_half,
            y_half,
            mean_energy_ev,
            sigma_ev,
        }
    }

    /// Height of the emitting plane above the block origin [cm].
    pub fn plane_z(&self) -> f64 {
        self.plane_z
    }

    /// Length of the sampled ring arc [cm]. Wider than the cell, which
    /// is what justifies folding it to a uniform sheet.
    pub fn arc_length(&self) -> f64 {
        2.0 * self.ring_radius * self.angle_half_width_rad
    }

    pub fn mean_energy_ev(&self) -> f64 {
        self.mean_energy_ev
    }

    pub fn sigma_ev(&self) -> f64 {
        self.sigma_ev
    }

    /// Draw one energy from the Muir Gaussian [eV].
    pub fn sample_energy<R: Rng>(&self, rng: &mut R) -> f64 {
        loop {
            let z: f64 = rng.sample(StandardNormal);
            let energy = self.mean_energy_ev + self.sigma_ev * z;
            if energy > 0.0 {
                return energy;
            }
        }
    }

    /// Draw a full neutron: uniform position on the emitting sheet,
    /// isotropic direction, Muir energy.
    pub fn sample<R: Rng>(&self, rng: &mut R) -> SampledNeutron {
        let x = rng.gen_range(-self.x_half..self.x_half);
        let y = rng.gen_range(-self.y_half..self.y_half);

        let mu: f64 = rng.gen_range(-1.0..1.0);
        let phi: f64 = rng.gen_range(0.0..std::f64::consts::TAU);
        let sin_theta = (1.0 - mu * mu).sqrt();

        SampledNeutron {
            position: [x, y, self.plane_z],
            direction: [sin_theta * phi.cos(), sin_theta * phi.sin(), mu],
            energy_ev: self.sample_energy(rng),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use monoblock_types::config::MonoblockParams;
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    fn default_source() -> FusionRingSource {
        let block = Monoblock::new(&MonoblockParams::default()).unwrap();
        FusionRingSource::new(&SourceConfig::default(), &block)
    }

    #[test]
    fn muir_width_matches_reference_numbers() {
        let (mean, sigma) = muir_mean_and_width(14.08e6, 20000.0);
        assert!((mean - 14.08e6).abs() < 1e-6);
        // sqrt(4 * 14.08e6 * 2e4 / 5) = 4.746e5 eV
        assert!((sigma - 4.746e5).abs() / 4.746e5 < 1e-3);
    }

    #[test]
    fn emitting_plane_sits_a_standoff_above_the_armour() {
        let source = default_source();
        assert!((source.plane_z() - 101.35).abs() < 1e-9);
    }

    #[test]
    fn ring_arc_is_wider_than_the_cell() {
        let source = default_source();
        // 2 * 100 cm * 1 degree
        assert!((source.arc_length() - 3.4907).abs() < 1e-3);
        assert!(source.arc_length() > 2.3);
    }

    #[test]
    fn sampled_energies_follow_the_muir_gaussian() {
        let source = default_source();
        let mut rng = StdRng::seed_from_u64(42);
        let n = 20_000;
        let energies: Vec<f64> = (0..n).map(|_| source.sample_energy(&mut rng)).collect();
        let mean = energies.iter().sum::<f64>() / n as f64;
        let var = energies.iter().map(|e| (e - mean).powi(2)).sum::<f64>() / (n - 1) as f64;
        assert!((mean - 14.08e6).abs() < 2.0e4, "mean {mean}");
        assert!((var.sqrt() - 4.746e5).abs() / 4.746e5 < 0.05);
        assert!(energies.iter().all(|&e| e > 0.0));
    }

    #[test]
    fn sampled_directions_are_isotropic_unit_vectors() {
        let source = default_source();
        let mut rng = StdRng::seed_from_u64(7);
        let n = 20_000;
        let mut mean_mu = 0.0;
        let mut downward = 0usize;
        for _ in 0..n {
            let neutron = source.sample(&mut rng);
            let u = neutron.direction;
            let norm = (u[0] * u[0] + u[1] * u[1] + u[2] * u[2]).sqrt();
            assert!((norm - 1.0).abs() < 1e-12);
            mean_mu += u[2];
            if u[2] < 0.0 {
                downward += 1;
            }
        }
        mean_mu /= n as f64;
        assert!(mean_mu.abs() < 0.02, "mean mu {mean_mu}");
        let frac = downward as f64 / n as f64;
        assert!((frac - 0.5).abs() < 0.02, "downward fraction {frac}");
    }

    #[test]
    fn positions_cover_the_cell_cross_section() {
        let source = default_source();
        let mut rng = StdRng::seed_from_u64(3);
        for _ in 0..1000 {
            let neutron = source.sample(&mut rng);
            let [x, y, z] = neutron.position;
            assert!(x.abs() <= 0.6);
            assert!(y.abs() <= 1.15);
            assert!((z - source.plane_z()).abs() < 1e-12);
        }
    }
}
