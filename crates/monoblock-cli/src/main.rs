// ─────────────────────────────────────────────────────────────────────
// SCPN Monoblock Neutronics — Pipeline CLI
// © 1998–2026 Miroslav Šotek. All rights reserved.
// Contact: www.anulum.li | protoscience@anulum.li
// ORCID: https://orcid.org/0009-0009-3560-0851
// License: GNU AGPL v3 | Commercial licensing available
// ─────────────────────────────────────────────────────────────────────

//! Pipeline driver with one subcommand per stage: `geometry`
//! (create_geometry.py), `run` (run_neutronics.py), `post`
//! (post_processing.py) and `spectrum` (plot_source.py).
//!
//! Results go to stdout; progress and file paths go through `tracing`
//! (filterable via `RUST_LOG`).

use std::path::{Path, PathBuf};

use clap::{Parser, Subcommand};
use rand::rngs::StdRng;
use rand::SeedableRng;
use tracing::{error, info, warn};
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;

use monoblock_geometry::{write_model_stl, write_region_stls, MaterialRegion, Monoblock};
use monoblock_neutronics::{muir_mean_and_width, FusionRingSource, Model};
use monoblock_post::{
    attenuation_fit, cell_source_rate, find_source_strength, heating_power_density,
    helium_source_rate, plot_mesh_tally, plot_spectrum, voxel_volume_m3, write_mesh_npy,
    write_mesh_vtk, ConvertedMesh,
};
use monoblock_types::constants::E_NEUTRON_DT_EV;
use monoblock_types::{MonoblockConfig, MonoblockError, MonoblockResult, Statepoint};

#[derive(Parser, Debug)]
#[command(name = "monoblock")]
#[command(about = "Divertor monoblock neutronics pipeline")]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Build the CSG model, report region volumes and write the STLs
    Geometry {
        /// JSON configuration file; built-in defaults when omitted
        #[arg(long)]
        config: Option<PathBuf>,

        /// Output directory for the STL files
        #[arg(long, default_value = ".")]
        out_dir: PathBuf,

        /// Angular facets per full circle in the tessellation
        #[arg(long, default_value = "64")]
        segments: usize,
    },
    /// Run the Monte Carlo transport and write the statepoint
    Run {
        /// JSON configuration file; built-in defaults when omitted
        #[arg(long)]
        config: Option<PathBuf>,

        /// Output directory for the statepoint
        #[arg(long, default_value = ".")]
        out_dir: PathBuf,
    },
    /// Convert a statepoint to reactor rates, plot and export it
    Post {
        /// Statepoint written by `monoblock run`
        #[arg(long)]
        statepoint: PathBuf,

        /// JSON configuration file; built-in defaults when omitted
        #[arg(long)]
        config: Option<PathBuf>,

        /// DT fusion power the rates are scaled to [MW]
        #[arg(long, default_value = "1000")]
        fusion_power_mw: f64,

        /// Output directory for figures and exports
        #[arg(long, default_value = ".")]
        out_dir: PathBuf,
    },
    /// Sample the source spectrum and render the histogram figure
    Spectrum {
        /// JSON configuration file; built-in defaults when omitted
        #[arg(long)]
        config: Option<PathBuf>,

        /// Number of energy samples
        #[arg(long, default_value = "5000")]
        samples: usize,

        /// Output SVG path
        #[arg(long, default_value = "muir_spectrum.svg")]
        out: PathBuf,
    },
}

fn main() {
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "monoblock=info".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    let cli = Cli::parse();
    let result = match cli.command {
        Commands::Geometry {
            config,
            out_dir,
            segments,
        } => cmd_geometry(config.as_deref(), &out_dir, segments),
        Commands::Run { config, out_dir } => cmd_run(config.as_deref(), &out_dir),
        Commands::Post {
            statepoint,
            config,
            fusion_power_mw,
            out_dir,
        } => cmd_post(&statepoint, config.as_deref(), fusion_power_mw, &out_dir),
        Commands::Spectrum {
            config,
            samples,
            out,
        } => cmd_spectrum(config.as_deref(), samples, &out),
    };

    if let Err(e) = result {
        error!("{e}");
        std::process::exit(1);
    }
}

fn load_config(path: Option<&Path>) -> MonoblockResult<MonoblockConfig> {
    match path {
        Some(p) => {
            info!("Loading configuration from {}", p.display());
            MonoblockConfig::from_file(&p.to_string_lossy())
        }
        None => Ok(MonoblockConfig::default()),
    }
}

fn join(dir: &Path, name: &str) -> String {
    dir.join(name).to_string_lossy().to_string()
}

fn cmd_geometry(config: Option<&Path>, out_dir: &Path, segments: usize) -> MonoblockResult<()> {
    let cfg = load_config(config)?;
    let block = Monoblock::new(&cfg.monoblock)?;

    println!("Monoblock regions:");
    for region in MaterialRegion::all() {
        println!(
            "  {:<10} {:9.4} cm^3",
            region.name(),
            block.volume_cm3(region)
        );
    }
    println!("  {:<10} {:9.4} cm^3", "total", block.total_volume_cm3());

    std::fs::create_dir_all(out_dir)?;
    for path in write_region_stls(&out_dir.to_string_lossy(), &block, segments)? {
        info!("Wrote {path}");
    }
    let model_path = join(out_dir, "monoblock.stl");
    write_model_stl(&model_path, &block, segments)?;
    info!("Wrote {model_path}");
    Ok(())
}

fn cmd_run(config: Option<&Path>, out_dir: &Path) -> MonoblockResult<()> {
    let cfg = load_config(config)?;
    let model = Model::from_config(&cfg)?;
    info!(
        "Transporting {} batches x {} particles (seed {})",
        cfg.settings.batches, cfg.settings.particles, cfg.settings.seed
    );

    let report = model.run()?;
    if report.lost_particles > 0 {
        warn!("{} particles lost to the event cap", report.lost_particles);
    }
    info!("Transport finished in {:.2} s", report.elapsed_s);

    std::fs::create_dir_all(out_dir)?;
    let path = join(out_dir, &Statepoint::filename(cfg.settings.batches));
    report.statepoint.save(&path)?;
    info!("Wrote {path}");

    for tally in &report.statepoint.tallies {
        if tally.mesh().is_none() {
            println!(
                "{}: {:.6e} +/- {:.6e} per source particle",
                tally.name, tally.mean[0], tally.std_dev[0]
            );
        }
    }
    Ok(())
}

fn cmd_post(
    statepoint: &Path,
    config: Option<&Path>,
    fusion_power_mw: f64,
    out_dir: &Path,
) -> MonoblockResult<()> {
    let cfg = load_config(config)?;
    let block = Monoblock::new(&cfg.monoblock)?;
    let sp = Statepoint::load(&statepoint.to_string_lossy())?;
    info!(
        "Loaded {} ({} batches x {} particles)",
        statepoint.display(),
        sp.n_batches,
        sp.particles_per_batch
    );

    let power_w = fusion_power_mw * 1e6;
    let strength = find_source_strength(power_w);
    info!("Source strength {strength:.4e} n/s at {fusion_power_mw} MW");

    for (name, region) in [
        ("tungsten_(n,Xa)", MaterialRegion::Tungsten),
        ("copper_(n,Xa)", MaterialRegion::Copper),
    ] {
        let tally = sp.tally(name)?;
        let (rate, rate_std) = cell_source_rate(tally, block.volume_cm3(region), power_w)?;
        println!(
            "{name}: {:.6e} +/- {:.6e} per source particle | {rate:.4e} +/- {rate_std:.4e} He m^-3 s^-1",
            tally.mean[0], tally.std_dev[0]
        );
    }

    std::fs::create_dir_all(out_dir)?;

    let tally = sp.tally("(n,Xa)_on_2D_mesh_yz")?;
    info!("Voxel volume {:.4e} m^3", voxel_volume_m3(tally)?);
    let helium = helium_source_rate(tally, power_w)?;
    let plot_path = join(out_dir, "mesh_tally_plot.svg");
    plot_mesh_tally(
        &helium.mean,
        helium.grid.extent(),
        true,
        &tally.name,
        helium.unit,
        &plot_path,
    )?;
    info!("Wrote {plot_path}");
    let vtk_path = join(out_dir, "mesh_tally.vtk");
    write_mesh_vtk(&vtk_path, &helium.grid, &helium.mean, &tally.name)?;
    info!("Wrote {vtk_path}");
    let npy_path = join(out_dir, "mesh_tally.npy");
    write_mesh_npy(&npy_path, &helium.mean)?;
    info!("Wrote {npy_path}");

    let tally = sp.tally("heating_on_2D_mesh_yz")?;
    let heating = heating_power_density(tally, power_w)?;
    let heat_path = join(out_dir, "heating_plot.svg");
    plot_mesh_tally(
        &heating.mean,
        heating.grid.extent(),
        true,
        &tally.name,
        heating.unit,
        &heat_path,
    )?;
    info!("Wrote {heat_path}");

    report_attenuation(&block, &helium);
    Ok(())
}

/// Fit the helium production falloff under the armour surface along the
/// central column of the mesh.
fn report_attenuation(block: &Monoblock, helium: &ConvertedMesh) {
    if helium.mean.is_empty() {
        return;
    }
    let z_top = block.armour_top();
    let centers = helium.grid.z_centers();
    let mid = helium.grid.ny / 2;

    let mut depth = Vec::new();
    let mut rate = Vec::new();
    for (iz, &z) in centers.iter().enumerate() {
        let v = helium.mean[[iz, mid]];
        if z < z_top && v > 0.0 {
            depth.push(z_top - z);
            rate.push(v);
        }
    }

    match attenuation_fit(&depth, &rate) {
        Ok(fit) => {
            println!(
                "Attenuation fit: slope {:.4} 1/cm, r = {:.4}, stderr {:.4}",
                fit.slope, fit.r_value, fit.stderr
            );
            if fit.slope < 0.0 {
                println!("  e-folding depth {:.3} cm", -1.0 / fit.slope);
            }
        }
        Err(e) => warn!("Attenuation fit skipped: {e}"),
    }
}

fn cmd_spectrum(config: Option<&Path>, samples: usize, out: &Path) -> MonoblockResult<()> {
    if samples == 0 {
        return Err(MonoblockError::ConfigError(
            "Sample count must be positive".into(),
        ));
    }
    let cfg = load_config(config)?;
    let block = Monoblock::new(&cfg.monoblock)?;
    let source = FusionRingSource::new(&cfg.source, &block);
    let (mu, sigma) = muir_mean_and_width(E_NEUTRON_DT_EV, cfg.source.ion_temperature_ev);

    let mut rng = StdRng::seed_from_u64(cfg.settings.seed);
    let energies: Vec<f64> = (0..samples)
        .map(|_| source.sample_energy(&mut rng))
        .collect();
    info!(
        "Sampled {samples} energies: mu = {:.2} MeV, sigma = {:.3} MeV",
        mu * 1e-6,
        sigma * 1e-6
    );

    plot_spectrum(&energies, mu, sigma, &out.to_string_lossy())?;
    info!("Wrote {}", out.display());
    Ok(())
}
