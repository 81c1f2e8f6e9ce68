// ─────────────────────────────────────────────────────────────────────
// SCPN Monoblock Neutronics — Nuclear Data
// © 1998–2026 Miroslav Šotek. All rights reserved.
// Contact: www.anulum.li | protoscience@anulum.li
// ORCID: https://orcid.org/0009-0009-3560-0851
// License: GNU AGPL v3 | Commercial licensing available
// ─────────────────────────────────────────────────────────────────────

//! Pointwise cross sections for the monoblock nuclides.
//!
//! Coarse abridgements of ENDF/B-VIII.0 evaluations on a sparse energy
//! grid, interpolated log-log the way continuous-energy codes do.
//! Resonance structure is smoothed out and tungsten's inelastic
//! channels are folded into its elastic table; good enough for the
//! 14 MeV-dominated spectrum this model sees.

use monoblock_types::constants::NEUTRON_MASS_AMU;

/// One reaction's cross section table: energies in eV, values in barns.
#[derive(Debug, Clone)]
pub struct CrossSectionTable {
    energies: Vec<f64>,
    values: Vec<f64>,
}

impl CrossSectionTable {
    pub fn new(points: &[(f64, f64)]) -> CrossSectionTable {
        CrossSectionTable {
            energies: points.iter().map(|p| p.0).collect(),
            values: points.iter().map(|p| p.1).collect(),
        }
    }

    /// Empty table: the reaction does not occur for this nuclide.
    pub fn absent() -> CrossSectionTable {
        CrossSectionTable {
            energies: Vec::new(),
            values: Vec::new(),
        }
    }

    /// Interpolated cross section at `energy_ev` [barn].
    ///
    /// Below the first grid point the reaction is treated as closed
    /// (threshold behaviour); above the last the value is clamped.
    pub fn at_energy(&self, energy_ev: f64) -> f64 {
        let n = self.energies.len();
        if n == 0 || energy_ev < self.energies[0] {
            return 0.0;
        }
        if energy_ev >= self.energies[n - 1] {
            return self.values[n - 1];
        }
        let hi = self.energies.partition_point(|&e| e <= energy_ev);
        let lo = hi - 1;
        let (e0, e1) = (self.energies[lo], self.energies[hi]);
        let (v0, v1) = (self.values[lo], self.values[hi]);
        if v0 <= 0.0 || v1 <= 0.0 {
            // Logarithms blow up on zeros; fall back to linear.
            let f = (energy_ev - e0) / (e1 - e0);
            return v0 + f * (v1 - v0);
        }
        let f = (energy_ev.ln() - e0.ln()) / (e1.ln() - e0.ln());
        (v0.ln() + f * (v1.ln() - v0.ln())).exp()
    }
}

/// A nuclide with the three reaction channels the transport samples.
#[derive(Debug, Clone)]
pub struct Nuclide {
    pub name: &'static str,
    pub mass_amu: f64,
    pub elastic: CrossSectionTable,
    pub capture: CrossSectionTable,
    pub n_alpha: CrossSectionTable,
}

impl Nuclide {
    /// Target-to-neutron mass ratio used by the elastic kinematics.
    pub fn mass_ratio(&self) -> f64 {
        self.mass_amu / NEUTRON_MASS_AMU
    }

    /// Total microscopic cross section [barn].
    pub fn total(&self, energy_ev: f64) -> f64 {
        self.elastic.at_energy(energy_ev)
            + self.capture.at_energy(energy_ev)
            + self.n_alpha.at_energy(energy_ev)
    }
}

/// Hydrogen-1.
pub fn h1() -> Nuclide {
    Nuclide {
        name: "H1",
        mass_amu: 1.008,
        elastic: CrossSectionTable::new(&[
            (1.0e1, 20.4),
            (1.0e3, 20.0),
            (1.0e5, 12.8),
            (1.0e6, 4.26),
            (5.0e6, 1.57),
            (1.0e7, 0.94),
            (1.41e7, 0.687),
            (2.0e7, 0.48),
        ]),
        capture: CrossSectionTable::new(&[
            (1.0e1, 1.67e-2),
            (1.0e3, 1.67e-3),
            (1.0e5, 1.7e-4),
            (1.0e6, 3.6e-5),
            (1.41e7, 3.0e-5),
            (2.0e7, 2.8e-5),
        ]),
        n_alpha: CrossSectionTable::absent(),
    }
}

/// Oxygen-16.
pub fn o16() -> Nuclide {
    Nuclide {
        name: "O16",
        mass_amu: 15.995,
        elastic: CrossSectionTable::new(&[
            (1.0e1, 3.78),
            (1.0e3, 3.78),
            (1.0e5, 3.7),
            (1.0e6, 4.2),
            (5.0e6, 1.7),
            (1.0e7, 1.2),
            (1.41e7, 0.95),
            (2.0e7, 0.85),
        ]),
        capture: CrossSectionTable::new(&[
            (1.0e1, 1.0e-4),
            (1.0e3, 1.0e-5),
            (1.0e6, 2.0e-6),
            (1.41e7, 1.0e-5),
            (2.0e7, 1.0e-5),
        ]),
        // Threshold near 2.35 MeV, peaking around 9 MeV.
        n_alpha: CrossSectionTable::new(&[
            (2.4e6, 1.0e-4),
            (5.0e6, 0.06),
            (7.0e6, 0.12),
            (9.0e6, 0.25),
            (1.2e7, 0.18),
            (1.41e7, 0.14),
            (2.0e7, 0.1),
        ]),
    }
}

/// Natural copper.
pub fn cu_nat() -> Nuclide {
    Nuclide {
        name: "Cu",
        mass_amu: 63.546,
        elastic: CrossSectionTable::new(&[
            (1.0e1, 7.9),
            (1.0e3, 7.8),
            (1.0e5, 7.0),
            (1.0e6, 3.6),
            (5.0e6, 3.2),
            (1.0e7, 2.9),
            (1.41e7, 2.87),
            (2.0e7, 2.6),
        ]),
        capture: CrossSectionTable::new(&[
            (1.0e1, 0.47),
            (1.0e3, 0.12),
            (1.0e5, 0.03),
            (1.0e6, 0.01),
            (5.0e6, 4.0e-3),
            (1.41e7, 1.5e-3),
            (2.0e7, 1.0e-3),
        ]),
        n_alpha: CrossSectionTable::new(&[
            (3.0e6, 1.0e-4),
            (6.0e6, 5.0e-3),
            (1.0e7, 0.02),
            (1.41e7, 0.042),
            (2.0e7, 0.03),
        ]),
    }
}

/// Natural tungsten. Inelastic scattering is folded into the elastic
/// table, so its high-energy tail sits above the pure elastic value.
pub fn w_nat() -> Nuclide {
    Nuclide {
        name: "W",
        mass_amu: 183.84,
        elastic: CrossSectionTable::new(&[
            (1.0e1, 10.0),
            (1.0e3, 9.0),
            (1.0e5, 8.0),
            (1.0e6, 6.9),
            (5.0e6, 5.2),
            (1.0e7, 5.0),
            (1.41e7, 5.1),
            (2.0e7, 5.0),
        ]),
        capture: CrossSectionTable::new(&[
            (1.0e1, 6.0),
            (1.0e3, 1.0),
            (1.0e5, 0.25),
            (1.0e6, 0.1),
            (5.0e6, 1.5e-2),
            (1.41e7, 2.0e-3),
            (2.0e7, 1.5e-3),
        ]),
        n_alpha: CrossSectionTable::new(&[
            (8.0e6, 1.0e-6),
            (1.2e7, 1.0e-4),
            (1.41e7, 4.5e-4),
            (2.0e7, 1.5e-3),
        ]),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn interpolation_recovers_grid_points() {
        let w = w_nat();
        assert!((w.elastic.at_energy(1.0e6) - 6.9).abs() < 1e-12);
        assert!((w.capture.at_energy(1.0e3) - 1.0).abs() < 1e-12);
    }

    #[test]
    fn log_log_midpoint_is_geometric_mean() {
        let table = CrossSectionTable::new(&[(1.0e3, 4.0), (1.0e5, 1.0)]);
        // Geometric midpoint of the energy interval is 1e4.
        let mid = table.at_energy(1.0e4);
        assert!((mid - 2.0).abs() < 1e-12);
    }

    #[test]
    fn threshold_reactions_are_closed_below_threshold() {
        let cu = cu_nat();
        assert_eq!(cu.n_alpha.at_energy(1.0e6), 0.0);
        assert!(cu.n_alpha.at_energy(1.41e7) > 0.0);
        // Hydrogen never opens the channel at all.
        assert_eq!(h1().n_alpha.at_energy(1.41e7), 0.0);
    }

    #[test]
    fn clamps_above_the_grid() {
        let o = o16();
        assert!((o.elastic.at_energy(5.0e7) - 0.85).abs() < 1e-12);
    }

    #[test]
    fn totals_are_positive_at_dt_energy() {
        for nuclide in [h1(), o16(), cu_nat(), w_nat()] {
            let total = nuclide.total(14.08e6);
            assert!(total > 0.0, "{}: zero total", nuclide.name);
            assert!(total < 50.0, "{}: implausible total", nuclide.name);
        }
    }

    #[test]
    fn mass_ratios_order_by_weight() {
        assert!(h1().mass_ratio() < 1.01);
        assert!(o16().mass_ratio() > 15.0);
        assert!(cu_nat().mass_ratio() > 60.0);
        assert!(w_nat().mass_ratio() > 180.0);
    }
}
