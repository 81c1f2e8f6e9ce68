// ─────────────────────────────────────────────────────────────────────
// SCPN Monoblock Neutronics — Physical Constants
// © 1998–2026 Miroslav Šotek. All rights reserved.
// Contact: www.anulum.li | protoscience@anulum.li
// ORCID: https://orcid.org/0009-0009-3560-0851
// License: GNU AGPL v3 | Commercial licensing available
// ─────────────────────────────────────────────────────────────────────

//! Physical constants used by the source, transport and unit-conversion
//! stages. CODATA 2018 values; reaction energetics follow the D-T
//! bookkeeping of the neutronics scripts this pipeline ports.

/// Avogadro constant [atoms/mol].
pub const AVOGADRO: f64 = 6.02214076e23;

/// Electron-volt [J]. Python: 1.602176634e-19.
pub const EV_TO_J: f64 = 1.602176634e-19;

/// Mega-electron-volt [J].
pub const MEV_TO_J: f64 = 1.602176634e-13;

/// One barn [cm^2].
pub const BARN_TO_CM2: f64 = 1.0e-24;

/// Cubic centimetre in cubic metres. Python: 1e-6.
pub const CM3_TO_M3: f64 = 1.0e-6;

/// Total energy released per D-T fusion reaction [MeV]. Python: 17.58e6 eV.
pub const E_FUSION_DT_MEV: f64 = 17.58;

/// Mean D-T fusion neutron energy [eV]. Python: 14.08e6.
pub const E_NEUTRON_DT_EV: f64 = 14.08e6;

/// Neutron rest mass [amu].
pub const NEUTRON_MASS_AMU: f64 = 1.00866491588;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn mev_is_a_million_ev() {
        assert!((MEV_TO_J - EV_TO_J * 1.0e6).abs() < 1.0e-25);
    }

    #[test]
    fn neutron_carries_most_of_the_dt_energy() {
        // 14.08 of 17.58 MeV rides on the neutron; the rest on the alpha.
        let fraction = (E_NEUTRON_DT_EV / 1.0e6) / E_FUSION_DT_MEV;
        assert!(fraction > 0.78 && fraction < 0.82);
    }
}
