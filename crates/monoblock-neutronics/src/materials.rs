// ─────────────────────────────────────────────────────────────────────
// SCPN Monoblock Neutronics — Materials
// © 1998–2026 Miroslav Šotek. All rights reserved.
// Contact: www.anulum.li | protoscience@anulum.li
// ORCID: https://orcid.org/0009-0009-3560-0851
// License: GNU AGPL v3 | Commercial licensing available
// ─────────────────────────────────────────────────────────────────────

//! The four monoblock materials and their macroscopic cross sections.
//!
//! Python: tungsten armour, copper interlayer, CuCrZr pipe and water
//! coolant, built from natural-abundance nuclides.

use monoblock_geometry::MaterialRegion;
use monoblock_types::config::MaterialConfig;
use monoblock_types::constants::{AVOGADRO, BARN_TO_CM2};

use crate::data::{self, Nuclide};

/// Macroscopic cross sections at one energy [1/cm].
#[derive(Debug, Clone, Copy)]
pub struct MacroXs {
    pub total: f64,
    pub elastic: f64,
    pub capture: f64,
    pub n_alpha: f64,
}

/// A homogeneous material mixed from nuclides by atom fraction.
#[derive(Debug, Clone)]
pub struct Material {
    pub name: &'static str,
    /// Mass density [g/cm^3].
    pub density: f64,
    nuclides: Vec<(Nuclide, f64)>,
    /// Total atom density [atoms/cm^3].
    number_density: f64,
}

impl Material {
    pub fn new(name: &'static str, density: f64, nuclides: Vec<(Nuclide, f64)>) -> Material {
        let mean_molar: f64 = nuclides.iter().map(|(n, f)| f * n.mass_amu).sum();
        let number_density = density * AVOGADRO / mean_molar;
        Material {
            name,
            density,
            nuclides,
            number_density,
        }
    }

    /// Coolant water at the configured density.
    pub fn water(density: f64) -> Material {
        Material::new(
            "water",
            density,
            vec![(data::h1(), 2.0 / 3.0), (data::o16(), 1.0 / 3.0)],
        )
    }

    /// CuCrZr pipe alloy.
    // TODO: fold in the ~1% Cr / 0.1% Zr once their tables are added;
    // until then the alloy transports as slightly light copper.
    pub fn cucrzr() -> Material {
        Material::new("cucrzr", 8.9, vec![(data::cu_nat(), 1.0)])
    }

    /// Copper interlayer.
    pub fn copper() -> Material {
        Material::new("copper", 8.96, vec![(data::cu_nat(), 1.0)])
    }

    /// Tungsten armour.
    pub fn tungsten() -> Material {
        Material::new("tungsten", 19.3, vec![(data::w_nat(), 1.0)])
    }

    /// Total atom density [atoms/cm^3].
    pub fn number_density(&self) -> f64 {
        self.number_density
    }

    /// Macroscopic cross sections at `energy_ev` [1/cm].
    pub fn macro_xs(&self, energy_ev: f64) -> MacroXs {
        let mut elastic = 0.0;
        let mut capture = 0.0;
        let mut n_alpha = 0.0;
        for (nuclide, fraction) in &self.nuclides {
            let n_i = self.number_density * fraction * BARN_TO_CM2;
            elastic += n_i * nuclide.elastic.at_energy(energy_ev);
            capture += n_i * nuclide.capture.at_energy(energy_ev);
            n_alpha += n_i * nuclide.n_alpha.at_energy(energy_ev);
        }
        MacroXs {
            total: elastic + capture + n_alpha,
            elastic,
            capture,
            n_alpha,
        }
    }

    /// Pick the collision nuclide with a uniform sample `xi` in [0, 1),
    /// weighted by each nuclide's share of the total cross section.
    pub fn sample_nuclide(&self, energy_ev: f64, xi: f64) -> &Nuclide {
        let shares: Vec<f64> = self
            .nuclides
            .iter()
            .map(|(n, f)| f * n.total(energy_ev))
            .collect();
        let total: f64 = shares.iter().sum();
        let mut target = xi * total;
        for ((nuclide, _), share) in self.nuclides.iter().zip(&shares) {
            target -= share;
            if target < 0.0 {
                return nuclide;
            }
        }
        // xi == 1.0 - epsilon rounding: fall through to the last.
        &self.nuclides[self.nuclides.len() - 1].0
    }
}

/// Region-to-material assignment for the whole model.
#[derive(Debug, Clone)]
pub struct MaterialSet {
    water: Material,
    cucrzr: Material,
    copper: Material,
    tungsten: Material,
}

impl MaterialSet {
    pub fn from_config(config: &MaterialConfig) -> MaterialSet {
        MaterialSet {
            water: Material::water(config.water_density),
            cucrzr: Material::cucrzr(),
            copper: Material::copper(),
            tungsten: Material::tungsten(),
        }
    }

    pub fn get(&self, region: MaterialRegion) -> &Material {
        match region {
            MaterialRegion::Water => &self.water,
            MaterialRegion::CuCrZr => &self.cucrzr,
            MaterialRegion::Copper => &self.copper,
            MaterialRegion::Tungsten => &self.tungsten,
        }
    }
}
