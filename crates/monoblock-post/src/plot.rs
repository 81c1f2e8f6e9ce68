// ─────────────────────────────────────────────────────────────────────
// SCPN Monoblock Neutronics — Figures
// © 1998–2026 Miroslav Šotek. All rights reserved.
// Contact: www.anulum.li | protoscience@anulum.li
// ORCID: https://orcid.org/0009-0009-3560-0851
// License: GNU AGPL v3 | Commercial licensing available
// ─────────────────────────────────────────────────────────────────────

//! SVG figures for the analysis pipeline.
//!
//! Hand-rendered vector output standing in for the matplotlib calls of
//! `post_processing.py` and `plot_source.py`; SVG is one of the formats
//! those scripts already export. Two figures: the mesh-tally heatmap
//! (`plot_regular_mesh_values` with `rotate_plot=180`) and the Muir
//! spectrum histogram with its Gaussian overlay.

use monoblock_types::{MonoblockError, MonoblockResult};
use ndarray::{s, Array2};

use crate::stats::{auto_bin_count, gaussian_pdf, histogram};

/// Matplotlib viridis anchors, interpolated linearly in between.
const VIRIDIS: [(u8, u8, u8); 9] = [
    (68, 1, 84),
    (72, 40, 120),
    (62, 74, 137),
    (49, 104, 142),
    (38, 130, 142),
    (31, 158, 137),
    (53, 183, 121),
    (109, 205, 89),
    (253, 231, 37),
];

fn viridis(t: f64) -> (u8, u8, u8) {
    let t = t.clamp(0.0, 1.0);
    let x = t * (VIRIDIS.len() - 1) as f64;
    let i = (x.floor() as usize).min(VIRIDIS.len() - 2);
    let f = x - i as f64;
    let (r0, g0, b0) = VIRIDIS[i];
    let (r1, g1, b1) = VIRIDIS[i + 1];
    let lerp = |a: u8, b: u8| (a as f64 + f * (b as f64 - a as f64)).round() as u8;
    (lerp(r0, r1), lerp(g0, g1), lerp(b0, b1))
}

/// Render a `[nz, ny]` mesh-tally grid as a heatmap and write it to `path`.
///
/// `extent` is `[y_min, y_max, z_min, z_max]` in cm. With `rotate_180` the
/// grid is flipped along both axes before drawing, matching the
/// `rotate_plot=180` call of `post_processing.py`.
pub fn plot_mesh_tally(
    values: &Array2<f64>,
    extent: [f64; 4],
    rotate_180: bool,
    title: &str,
    unit: &str,
    path: &str,
) -> MonoblockResult<()> {
    let svg = render_mesh_svg(values, extent, rotate_180, title, unit)?;
    std::fs::write(path, svg)?;
    Ok(())
}

/// Render the sampled source spectrum and write it to `path`.
///
/// Density histogram of the samples (MeV axis) with the analytic Gaussian
/// overlaid and the mu / sigma annotations of `plot_source.py`. Top and
/// right spines are left out, as in the script.
pub fn plot_spectrum(
    samples_ev: &[f64],
    mu_ev: f64,
    sigma_ev: f64,
    path: &str,
) -> MonoblockResult<()> {
    let svg = render_spectrum_svg(samples_ev, mu_ev, sigma_ev)?;
    std::fs::write(path, svg)?;
    Ok(())
}

fn render_mesh_svg(
    values: &Array2<f64>,
    extent: [f64; 4],
    rotate_180: bool,
    title: &str,
    unit: &str,
) -> MonoblockResult<String> {
    let (nz, ny) = values.dim();
    if nz == 0 || ny == 0 {
        return Err(MonoblockError::PostProcessError(
            "mesh tally grid is empty".into(),
        ));
    }
    let v = if rotate_180 {
        values.slice(s![..;-1, ..;-1]).to_owned()
    } else {
        values.clone()
    };

    let mut vmin = f64::INFINITY;
    let mut vmax = f64::NEG_INFINITY;
    for &x in v.iter() {
        if x.is_finite() {
            vmin = vmin.min(x);
            vmax = vmax.max(x);
        }
    }
    if !vmin.is_finite() {
        return Err(MonoblockError::PostProcessError(
            "mesh tally grid has no finite values".into(),
        ));
    }
    let span = if vmax > vmin { vmax - vmin } else { 1.0 };

    let width = 640.0;
    let height = 480.0;
    let (ml, mr, mt, mb) = (70.0, 90.0, 40.0, 50.0);
    let plot_w = width - ml - mr;
    let plot_h = height - mt - mb;
    let cw = plot_w / ny as f64;
    let ch = plot_h / nz as f64;

    let mut svg = format!(
        "<svg xmlns=\"http://www.w3.org/2000/svg\" width=\"{width}\" height=\"{height}\" \
         style=\"background:#ffffff\">\n"
    );
    svg.push_str(&format!(
        "  <text x=\"{:.1}\" y=\"24\" font-family=\"monospace\" font-size=\"14\" \
         fill=\"#222\" text-anchor=\"middle\">{title}</text>\n",
        ml + plot_w / 2.0
    ));

    // Row iz = 0 is the z_min edge and draws at the bottom.
    for iz in 0..nz {
        for iy in 0..ny {
            let t = (v[[iz, iy]] - vmin) / span;
            let (r, g, b) = viridis(t);
            let x = ml + iy as f64 * cw;
            let y = mt + plot_h - (iz + 1) as f64 * ch;
            svg.push_str(&format!(
                "  <rect x=\"{x:.2}\" y=\"{y:.2}\" width=\"{cw:.2}\" height=\"{ch:.2}\" \
                 fill=\"rgb({r},{g},{b})\"/>\n"
            ));
        }
    }
    svg.push_str(&format!(
        "  <rect x=\"{ml:.1}\" y=\"{mt:.1}\" width=\"{plot_w:.1}\" height=\"{plot_h:.1}\" \
         fill=\"none\" stroke=\"#222\" stroke-width=\"1\"/>\n"
    ));

    // Axis ticks over the data extent.
    let [y_min, y_max, z_min, z_max] = extent;
    for i in 0..=4 {
        let frac = i as f64 / 4.0;
        let xpix = ml + frac * plot_w;
        let yval = y_min + frac * (y_max - y_min);
        svg.push_str(&format!(
            "  <line x1=\"{xpix:.1}\" y1=\"{:.1}\" x2=\"{xpix:.1}\" y2=\"{:.1}\" \
             stroke=\"#222\" stroke-width=\"1\"/>\n",
            mt + plot_h,
            mt + plot_h + 5.0
        ));
        svg.push_str(&format!(
            "  <text x=\"{xpix:.1}\" y=\"{:.1}\" font-family=\"monospace\" font-size=\"11\" \
             fill=\"#222\" text-anchor=\"middle\">{yval:.2}</text>\n",
            mt + plot_h + 18.0
        ));

        let ypix = mt + plot_h - frac * plot_h;
        let zval = z_min + frac * (z_max - z_min);
        svg.push_str(&format!(
            "  <line x1=\"{:.1}\" y1=\"{ypix:.1}\" x2=\"{ml:.1}\" y2=\"{ypix:.1}\" \
             stroke=\"#222\" stroke-width=\"1\"/>\n",
            ml - 5.0
        ));
        svg.push_str(&format!(
            "  <text x=\"{:.1}\" y=\"{:.1}\" font-family=\"monospace\" font-size=\"11\" \
             fill=\"#222\" text-anchor=\"end\">{zval:.2}</text>\n",
            ml - 8.0,
            ypix + 4.0
        ));
    }
    svg.push_str(&format!(
        "  <text x=\"{:.1}\" y=\"{:.1}\" font-family=\"monospace\" font-size=\"12\" \
         fill=\"#222\" text-anchor=\"middle\">y (cm)</text>\n",
        ml + plot_w / 2.0,
        height - 12.0
    ));
    let mid_y = mt + plot_h / 2.0;
    svg.push_str(&format!(
        "  <text x=\"18\" y=\"{mid_y:.1}\" font-family=\"monospace\" font-size=\"12\" \
         fill=\"#222\" text-anchor=\"middle\" transform=\"rotate(-90 18 {mid_y:.1})\">z (cm)</text>\n"
    ));

    // Colour bar with the value range and unit.
    let bar_x = width - mr + 20.0;
    let bar_w = 16.0;
    let steps = 64;
    let step_h = plot_h / steps as f64;
    for i in 0..steps {
        let t = i as f64 / (steps - 1) as f64;
        let (r, g, b) = viridis(t);
        let y = mt + plot_h - (i + 1) as f64 * step_h;
        svg.push_str(&format!(
            "  <rect x=\"{bar_x:.1}\" y=\"{y:.2}\" width=\"{bar_w:.1}\" height=\"{:.2}\" \
             fill=\"rgb({r},{g},{b})\"/>\n",
            step_h + 0.5
        ));
    }
    svg.push_str(&format!(
        "  <rect x=\"{bar_x:.1}\" y=\"{mt:.1}\" width=\"{bar_w:.1}\" height=\"{plot_h:.1}\" \
         fill=\"none\" stroke=\"#222\" stroke-width=\"1\"/>\n"
    ));
    svg.push_str(&format!(
        "  <text x=\"{:.1}\" y=\"{:.1}\" font-family=\"monospace\" font-size=\"10\" \
         fill=\"#222\">{vmax:.3e}</text>\n",
        bar_x + bar_w + 4.0,
        mt + 8.0
    ));
    svg.push_str(&format!(
        "  <text x=\"{:.1}\" y=\"{:.1}\" font-family=\"monospace\" font-size=\"10\" \
         fill=\"#222\">{vmin:.3e}</text>\n",
        bar_x + bar_w + 4.0,
        mt + plot_h
    ));
    svg.push_str(&format!(
        "  <text x=\"{:.1}\" y=\"{:.1}\" font-family=\"monospace\" font-size=\"10\" \
         fill=\"#222\" text-anchor=\"middle\">{unit}</text>\n",
        bar_x + bar_w / 2.0,
        mt - 8.0
    ));

    svg.push_str("</svg>\n");
    Ok(svg)
}

fn render_spectrum_svg(samples_ev: &[f64], mu_ev: f64, sigma_ev: f64) -> MonoblockResult<String> {
    if sigma_ev <= 0.0 {
        return Err(MonoblockError::PostProcessError(format!(
            "Spectrum width must be positive, got {sigma_ev}"
        )));
    }
    // Work in MeV throughout, as the figure does.
    let mev: Vec<f64> = samples_ev.iter().map(|e| e * 1e-6).collect();
    let hist = histogram(&mev, auto_bin_count(&mev), true)?;
    let mu = mu_ev * 1e-6;
    let sigma = sigma_ev * 1e-6;

    // The script draws the overlay over 11..17 MeV.
    let x_min = hist.edges[0].min(11.0);
    let x_max = hist.edges[hist.edges.len() - 1].max(17.0);
    let peak = gaussian_pdf(mu, mu, sigma);
    let y_max = hist
        .counts
        .iter()
        .fold(peak, |acc, &c| acc.max(c))
        * 1.08;

    let width = 640.0;
    let height = 480.0;
    let (ml, mr, mt, mb) = (70.0, 30.0, 40.0, 50.0);
    let plot_w = width - ml - mr;
    let plot_h = height - mt - mb;
    let tx = |x: f64| ml + (x - x_min) / (x_max - x_min) * plot_w;
    let ty = |y: f64| mt + plot_h - (y / y_max) * plot_h;

    let mut svg = format!(
        "<svg xmlns=\"http://www.w3.org/2000/svg\" width=\"{width}\" height=\"{height}\" \
         style=\"background:#ffffff\">\n"
    );
    svg.push_str(&format!(
        "  <text x=\"{:.1}\" y=\"24\" font-family=\"monospace\" font-size=\"14\" \
         fill=\"#222\" text-anchor=\"middle\">DT neutron source spectrum</text>\n",
        ml + plot_w / 2.0
    ));

    // Density histogram bars, white-edged as in the script.
    for (i, &count) in hist.counts.iter().enumerate() {
        let x0 = tx(hist.edges[i]);
        let x1 = tx(hist.edges[i + 1]);
        let y = ty(count);
        svg.push_str(&format!(
            "  <rect x=\"{x0:.2}\" y=\"{y:.2}\" width=\"{:.2}\" height=\"{:.2}\" \
             fill=\"#1f77b4\" fill-opacity=\"0.8\" stroke=\"#ffffff\" stroke-width=\"1\"/>\n",
            x1 - x0,
            mt + plot_h - y
        ));
    }

    // Gaussian overlay, 1000 points over 11..17 MeV.
    let mut points = String::new();
    for i in 0..1000 {
        let x = 11.0 + 6.0 * i as f64 / 999.0;
        let y = gaussian_pdf(x, mu, sigma);
        points.push_str(&format!("{:.2},{:.2} ", tx(x), ty(y)));
    }
    svg.push_str(&format!(
        "  <polyline points=\"{}\" fill=\"none\" stroke=\"#ff7f0e\" stroke-width=\"1.5\"/>\n",
        points.trim_end()
    ));

    // Annotations half an MeV to the right of mu + sigma.
    let y_ann = gaussian_pdf(mu + sigma, mu, sigma);
    let x_ann = mu + sigma + 0.5;
    svg.push_str(&format!(
        "  <text x=\"{:.1}\" y=\"{:.1}\" font-family=\"monospace\" font-size=\"12\" \
         fill=\"#222\">\u{3bc} = E\u{2080} = {mu:.0} MeV</text>\n",
        tx(x_ann),
        ty(y_ann)
    ));
    svg.push_str(&format!(
        "  <text x=\"{:.1}\" y=\"{:.1}\" font-family=\"monospace\" font-size=\"12\" \
         fill=\"#222\">\u{3c3} = \u{221a}(4 E\u{2080} T\u{1d62} / M)</text>\n",
        tx(x_ann),
        ty(y_ann * 0.8)
    ));

    // Left and bottom spines only; top and right stay hidden.
    svg.push_str(&format!(
        "  <line x1=\"{ml:.1}\" y1=\"{mt:.1}\" x2=\"{ml:.1}\" y2=\"{:.1}\" \
         stroke=\"#222\" stroke-width=\"1\"/>\n",
        mt + plot_h
    ));
    svg.push_str(&format!(
        "  <line x1=\"{ml:.1}\" y1=\"{:.1}\" x2=\"{:.1}\" y2=\"{:.1}\" \
         stroke=\"#222\" stroke-width=\"1\"/>\n",
        mt + plot_h,
        ml + plot_w,
        mt + plot_h
    ));

    for i in 0..=6 {
        let frac = i as f64 / 6.0;
        let xval = x_min + frac * (x_max - x_min);
        let xpix = tx(xval);
        svg.push_str(&format!(
            "  <line x1=\"{xpix:.1}\" y1=\"{:.1}\" x2=\"{xpix:.1}\" y2=\"{:.1}\" \
             stroke=\"#222\" stroke-width=\"1\"/>\n",
            mt + plot_h,
            mt + plot_h + 5.0
        ));
        svg.push_str(&format!(
            "  <text x=\"{xpix:.1}\" y=\"{:.1}\" font-family=\"monospace\" font-size=\"11\" \
             fill=\"#222\" text-anchor=\"middle\">{xval:.1}</text>\n",
            mt + plot_h + 18.0
        ));
    }
    for i in 0..=4 {
        let frac = i as f64 / 4.0;
        let yval = frac * y_max;
        let ypix = ty(yval);
        svg.push_str(&format!(
            "  <line x1=\"{:.1}\" y1=\"{ypix:.1}\" x2=\"{ml:.1}\" y2=\"{ypix:.1}\" \
             stroke=\"#222\" stroke-width=\"1\"/>\n",
            ml - 5.0
        ));
        svg.push_str(&format!(
            "  <text x=\"{:.1}\" y=\"{:.1}\" font-family=\"monospace\" font-size=\"11\" \
             fill=\"#222\" text-anchor=\"end\">{yval:.2}</text>\n",
            ml - 8.0,
            ypix + 4.0
        ));
    }

    svg.push_str(&format!(
        "  <text x=\"{:.1}\" y=\"{:.1}\" font-family=\"monospace\" font-size=\"12\" \
         fill=\"#222\" text-anchor=\"middle\">Neutron energy (MeV)</text>\n",
        ml + plot_w / 2.0,
        height - 12.0
    ));
    let mid_y = mt + plot_h / 2.0;
    svg.push_str(&format!(
        "  <text x=\"18\" y=\"{mid_y:.1}\" font-family=\"monospace\" font-size=\"12\" \
         fill=\"#222\" text-anchor=\"middle\" transform=\"rotate(-90 18 {mid_y:.1})\">Probability</text>\n"
    ));

    svg.push_str("</svg>\n");
    Ok(svg)
}
