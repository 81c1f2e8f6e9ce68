// ─────────────────────────────────────────────────────────────────────
// SCPN Monoblock Neutronics — Config
// © 1998–2026 Miroslav Šotek. All rights reserved.
// Contact: www.anulum.li | protoscience@anulum.li
// ORCID: https://orcid.org/0009-0009-3560-0851
// License: GNU AGPL v3 | Commercial licensing available
// ─────────────────────────────────────────────────────────────────────
use serde::{Deserialize, Serialize};

use crate::error::{MonoblockError, MonoblockResult};

/// Top-level pipeline configuration.
/// Defaults reproduce the reference tungsten/CuCrZr divertor monoblock
/// and the 50-batch transport run of the original study.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MonoblockConfig {
    #[serde(default)]
    pub monoblock: MonoblockParams,
    #[serde(default)]
    pub source: SourceConfig,
    #[serde(default)]
    pub settings: RunSettings,
    #[serde(default)]
    pub tally: TallyConfig,
    #[serde(default)]
    pub materials: MaterialConfig,
}

/// Parametric monoblock dimensions, all in centimetres.
///
/// The block is a box of `height x width x thickness` pierced by a
/// coolant pipe along the thickness axis: water channel, CuCrZr pipe
/// wall, a copper interlayer bonded to it, and tungsten armour making
/// up the rest of the box.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MonoblockParams {
    /// Block extent along the pipe axis [cm]. Python: 1.2.
    #[serde(default = "default_thickness")]
    pub thickness: f64,
    /// Block extent along the plasma-facing direction [cm]. Python: 2.5.
    #[serde(default = "default_height")]
    pub height: f64,
    /// Block extent across the pipe [cm]. Python: 2.3.
    #[serde(default = "default_width")]
    pub width: f64,
    /// Inner radius of the CuCrZr pipe (water channel radius) [cm]. Python: 0.6.
    #[serde(default = "default_cucrzr_inner_radius")]
    pub cucrzr_inner_radius: f64,
    /// CuCrZr pipe wall thickness [cm]. Python: 0.15.
    #[serde(default = "default_cucrzr_thickness")]
    pub cucrzr_thickness: f64,
    /// Copper interlayer thickness [cm]. Python: 0.1.
    #[serde(default = "default_cu_thickness")]
    pub cu_thickness: f64,
    /// Tungsten armour thickness above the interlayer [cm]. Python: 0.5.
    #[serde(default = "default_w_thickness")]
    pub w_thickness: f64,
    /// Extra pipe length protruding past each block face [cm]. Python: 0.0.
    #[serde(default = "default_gap")]
    pub gap: f64,
}

/// D-T ring source parameters.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SourceConfig {
    /// Major radius of the source ring [cm]. Python: 100.
    #[serde(default = "default_ring_radius")]
    pub ring_radius: f64,
    /// Half-width of the sampled ring arc [degrees]. Python: 1.
    #[serde(default = "default_angle_half_width")]
    pub angle_half_width_deg: f64,
    /// Distance between the ring plane and the armour surface [cm].
    #[serde(default = "default_standoff")]
    pub standoff: f64,
    /// Ion temperature of the Muir energy spectrum [eV]. Python: 20000.0.
    #[serde(default = "default_ion_temperature")]
    pub ion_temperature_ev: f64,
}

/// Transport run settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RunSettings {
    /// Number of statistical batches. Python: 50.
    #[serde(default = "default_batches")]
    pub batches: usize,
    /// Histories per batch. Python: 1_000_000.
    #[serde(default = "default_particles")]
    pub particles: usize,
    /// Base RNG seed; batch b runs on seed + b.
    #[serde(default = "default_seed")]
    pub seed: u64,
    /// Neutrons below this energy are terminated [eV].
    #[serde(default = "default_energy_cutoff")]
    pub energy_cutoff_ev: f64,
}

/// Regular mesh tally settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TallyConfig {
    /// Mesh voxels across the block width (y). Python: 50.
    #[serde(default = "default_mesh_ny")]
    pub mesh_ny: usize,
    /// Mesh voxels along the plasma-facing direction (z). Python: 50.
    #[serde(default = "default_mesh_nz")]
    pub mesh_nz: usize,
    /// Bounding-box inflation applied to the mesh extent. Python: 1.1.
    #[serde(default = "default_bbox_margin")]
    pub bbox_margin: f64,
}

/// Material overrides.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MaterialConfig {
    /// Coolant water density [g/cm^3]. Python: 0.9 (pressurised, ~150 C).
    #[serde(default = "default_water_density")]
    pub water_density: f64,
}

fn default_thickness() -> f64 {
    1.2
}
fn default_height() -> f64 {
    2.5
}
fn default_width() -> f64 {
    2.3
}
fn default_cucrzr_inner_radius() -> f64 {
    0.6
}
fn default_cucrzr_thickness() -> f64 {
    0.15
}
fn default_cu_thickness() -> f64 {
    0.1
}
fn default_w_thickness() -> f64 {
    0.5
}
fn default_gap() -> f64 {
    0.0
}
fn default_ring_radius() -> f64 {
    100.0
}
fn default_angle_half_width() -> f64 {
    1.0
}
fn default_standoff() -> f64 {
    100.0
}
fn default_ion_temperature() -> f64 {
    20000.0
}
fn default_batches() -> usize {
    50
}
fn default_particles() -> usize {
    1_000_000
}
fn default_seed() -> u64 {
    1
}
fn default_energy_cutoff() -> f64 {
    1.0e3
}
fn default_mesh_ny() -> usize {
    50
}
fn default_mesh_nz() -> usize {
    50
}
fn default_bbox_margin() -> f64 {
    1.1
}
fn default_water_density() -> f64 {
    0.9
}

impl Default for MonoblockConfig {
    fn default() -> Self {
        MonoblockConfig {
            monoblock: MonoblockParams::default(),
            source: SourceConfig::default(),
            settings: RunSettings::default(),
            tally: TallyConfig::default(),
            materials: MaterialConfig::default(),
        }
    }
}

impl Default for MonoblockParams {
    fn default() -> Self {
        MonoblockParams {
            thickness: default_thickness(),
            height: default_height(),
            width: default_width(),
            cucrzr_inner_radius: default_cucrzr_inner_radius(),
            cucrzr_thickness: default_cucrzr_thickness(),
            cu_thickness: default_cu_thickness(),
            w_thickness: default_w_thickness(),
            gap: default_gap(),
        }
    }
}

impl Default for SourceConfig {
    fn default() -> Self {
        SourceConfig {
            ring_radius: default_ring_radius(),
            angle_half_width_deg: default_angle_half_width(),
            standoff: default_standoff(),
            ion_temperature_ev: default_ion_temperature(),
        }
    }
}

impl Default for RunSettings {
    fn default() -> Self {
        RunSettings {
            batches: default_batches(),
            particles: default_particles(),
            seed: default_seed(),
            energy_cutoff_ev: default_energy_cutoff(),
        }
    }
}

impl Default for TallyConfig {
    fn default() -> Self {
        TallyConfig {
            mesh_ny: default_mesh_ny(),
            mesh_nz: default_mesh_nz(),
            bbox_margin: default_bbox_margin(),
        }
    }
}

impl Default for MaterialConfig {
    fn default() -> Self {
        MaterialConfig {
            water_density: default_water_density(),
        }
    }
}

impl MonoblockParams {
    /// Outer radius of the CuCrZr pipe [cm].
    pub fn cucrzr_outer_radius(&self) -> f64 {
        self.cucrzr_inner_radius + self.cucrzr_thickness
    }

    /// Outer radius of the copper interlayer [cm].
    pub fn cu_outer_radius(&self) -> f64 {
        self.cucrzr_outer_radius() + self.cu_thickness
    }

    /// z of the plasma-facing armour surface, with the pipe axis at z = 0 [cm].
    pub fn armour_top(&self) -> f64 {
        self.cu_outer_radius() + self.w_thickness
    }
}

impl MonoblockConfig {
    /// Load from a JSON file. Missing fields fall back to the reference
    /// monoblock defaults.
    pub fn from_file(path: &str) -> MonoblockResult<Self> {
        let contents = std::fs::read_to_string(path)?;
        let config: Self = serde_json::from_str(&contents)?;
        config.validate()?;
        Ok(config)
    }

    /// Reject configurations the pipeline cannot run.
    pub fn validate(&self) -> MonoblockResult<()> {
        let m = &self.monoblock;
        for (name, value) in [
            ("thickness", m.thickness),
            ("height", m.height),
            ("width", m.width),
            ("cucrzr_inner_radius", m.cucrzr_inner_radius),
            ("cucrzr_thickness", m.cucrzr_thickness),
            ("cu_thickness", m.cu_thickness),
            ("w_thickness", m.w_thickness),
        ] {
            if !(value > 0.0) || !value.is_finite() {
                return Err(MonoblockError::ConfigError(format!(
                    "monoblock.{name} must be positive and finite, got {value}"
                )));
            }
        }
        if m.gap < 0.0 || !m.gap.is_finite() {
            return Err(MonoblockError::ConfigError(format!(
                "monoblock.gap must be non-negative, got {}",
                m.gap
            )));
        }
        if self.settings.batches < 2 {
            return Err(MonoblockError::ConfigError(format!(
                "settings.batches must be >= 2 for batch statistics, got {}",
                self.settings.batches
            )));
        }
        if self.settings.particles == 0 {
            return Err(MonoblockError::ConfigError(
                "settings.particles must be >= 1".into(),
            ));
        }
        if self.tally.mesh_ny < 2 || self.tally.mesh_nz < 2 {
            return Err(MonoblockError::ConfigError(format!(
                "tally mesh must be at least 2x2, got {}x{}",
                self.tally.mesh_ny, self.tally.mesh_nz
            )));
        }
        if self.tally.bbox_margin < 1.0 {
            return Err(MonoblockError::ConfigError(format!(
                "tally.bbox_margin must be >= 1.0, got {}",
                self.tally.bbox_margin
            )));
        }
        if !(self.source.ion_temperature_ev > 0.0) {
            return Err(MonoblockError::ConfigError(format!(
                "source.ion_temperature_ev must be positive, got {}",
                self.source.ion_temperature_ev
            )));
        }
        if !(self.source.angle_half_width_deg > 0.0) || self.source.angle_half_width_deg > 90.0 {
            return Err(MonoblockError::ConfigError(format!(
                "source.angle_half_width_deg must be in (0, 90], got {}",
                self.source.angle_half_width_deg
            )));
        }
        if !(self.materials.water_density > 0.0) {
            return Err(MonoblockError::ConfigError(format!(
                "materials.water_density must be positive, got {}",
                self.materials.water_density
            )));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_config_is_valid() {
        let cfg = MonoblockConfig::default();
        assert!(cfg.validate().is_ok());
        assert!((cfg.monoblock.thickness - 1.2).abs() < 1e-12);
        assert!((cfg.monoblock.armour_top() - 1.35).abs() < 1e-12);
        assert_eq!(cfg.settings.batches, 50);
        assert_eq!(cfg.settings.particles, 1_000_000);
        assert_eq!(cfg.tally.mesh_ny, 50);
    }

    #[test]
    fn partial_json_falls_back_to_defaults() {
        let json = r#"{ "settings": { "batches": 5, "particles": 200 } }"#;
        let cfg: MonoblockConfig = serde_json::from_str(json).unwrap();
        assert_eq!(cfg.settings.batches, 5);
        assert_eq!(cfg.settings.particles, 200);
        // Untouched sections keep the reference monoblock.
        assert!((cfg.monoblock.width - 2.3).abs() < 1e-12);
        assert!((cfg.source.ring_radius - 100.0).abs() < 1e-12);
        assert!((cfg.materials.water_density - 0.9).abs() < 1e-12);
    }

    #[test]
    fn roundtrip_serialization() {
        let cfg = MonoblockConfig::default();
        let json = serde_json::to_string_pretty(&cfg).unwrap();
        let cfg2: MonoblockConfig = serde_json::from_str(&json).unwrap();
        let dr = (cfg.monoblock.cucrzr_inner_radius - cfg2.monoblock.cucrzr_inner_radius).abs();
        assert!(dr < 1e-15);
        assert_eq!(cfg.settings.seed, cfg2.settings.seed);
        assert!((cfg.tally.bbox_margin - cfg2.tally.bbox_margin).abs() < 1e-15);
    }

    #[test]
    fn from_file_roundtrip() {
        let path = std::env::temp_dir().join(format!(
            "monoblock_cfg_{}_{}.json",
            std::process::id(),
            std::time::SystemTime::now()
                .duration_since(std::time::UNIX_EPOCH)
                .unwrap()
                .as_nanos()
        ));
        let cfg = MonoblockConfig::default();
        std::fs::write(&path, serde_json::to_string_pretty(&cfg).unwrap()).unwrap();
        let loaded = MonoblockConfig::from_file(path.to_str().unwrap()).unwrap();
        assert_eq!(loaded.settings.batches, cfg.settings.batches);
        std::fs::remove_file(&path).ok();
    }

    #[test]
    fn negative_dimension_rejected() {
        let mut cfg = MonoblockConfig::default();
        cfg.monoblock.w_thickness = -0.5;
        match cfg.validate() {
            Err(MonoblockError::ConfigError(msg)) => {
                assert!(msg.contains("w_thickness"));
            }
            other => panic!("Unexpected result: {other:?}"),
        }
    }

    #[test]
    fn single_batch_rejected() {
        let mut cfg = MonoblockConfig::default();
        cfg.settings.batches = 1;
        match cfg.validate() {
            Err(MonoblockError::ConfigError(msg)) => {
                assert!(msg.contains("batches"));
            }
            other => panic!("Unexpected result: {other:?}"),
        }
    }

    #[test]
    fn missing_file_is_io_error() {
        let result = MonoblockConfig::from_file("/nonexistent/monoblock.json");
        match result {
            Err(MonoblockError::Io(_)) => {}
            other => panic!("Unexpected result: {other:?}"),
        }
    }
}
