// ─────────────────────────────────────────────────────────────────────
// SCPN Monoblock Neutronics — STL Export
// © 1998–2026 Miroslav Šotek. All rights reserved.
// Contact: www.anulum.li | protoscience@anulum.li
// ORCID: https://orcid.org/0009-0009-3560-0851
// License: GNU AGPL v3 | Commercial licensing available
// ─────────────────────────────────────────────────────────────────────

//! ASCII STL export.
//!
//! Python exports the structural solids one file each (`w.stl`,
//! `copper.stl`, `cucrzr.stl`) before tagging them into a combined
//! model; the same layout is kept here, with the combined file packing
//! one named `solid` block per region, water included.

use std::path::Path;

use monoblock_types::MonoblockResult;

use crate::monoblock::{MaterialRegion, Monoblock};
use crate::tessellate::{tessellate_model, tessellate_region, TriangleMesh};

/// File stem used for a region's standalone STL.
fn region_file_stem(region: MaterialRegion) -> &'static str {
    match region {
        MaterialRegion::Water => "water",
        MaterialRegion::CuCrZr => "cucrzr",
        MaterialRegion::Copper => "copper",
        MaterialRegion::Tungsten => "w",
    }
}

fn push_solid(out: &mut String, name: &str, mesh: &TriangleMesh) {
    out.push_str(&format!("solid {name}\n"));
    for i in 0..mesh.triangle_count() {
        let n = mesh.facet_normal(i);
        let (a, b, c) = mesh.triangle(i);
        out.push_str(&format!(
            "  facet normal {:.6e} {:.6e} {:.6e}\n",
            n[0], n[1], n[2]
        ));
        out.push_str("    outer loop\n");
        for v in [a, b, c] {
            out.push_str(&format!(
                "      vertex {:.6e} {:.6e} {:.6e}\n",
                v[0], v[1], v[2]
            ));
        }
        out.push_str("    endloop\n");
        out.push_str("  endfacet\n");
    }
    out.push_str(&format!("endsolid {name}\n"));
}

/// Write one mesh as a single-solid ASCII STL.
pub fn write_stl(path: &str, name: &str, mesh: &TriangleMesh) -> MonoblockResult<()> {
    let mut out = String::new();
    push_solid(&mut out, name, mesh);
    std::fs::write(path, out)?;
    Ok(())
}

/// Write the structural solids to `<dir>/w.stl`, `<dir>/copper.stl`,
/// `<dir>/cucrzr.stl`. Returns the paths written.
pub fn write_region_stls(
    dir: &str,
    block: &Monoblock,
    segments: usize,
) -> MonoblockResult<Vec<String>> {
    let mut written = Vec::new();
    for region in [
        MaterialRegion::Tungsten,
        MaterialRegion::Copper,
        MaterialRegion::CuCrZr,
    ] {
        let mesh = tessellate_region(block, region, segments);
        let path = Path::new(dir)
            .join(format!("{}.stl", region_file_stem(region)))
            .to_string_lossy()
            .to_string();
        write_stl(&path, region.name(), &mesh)?;
        written.push(path);
    }
    Ok(written)
}

/// Write all four regions into one multi-solid STL, each `solid` block
/// named after its material region.
pub fn write_model_stl(path: &str, block: &Monoblock, segments: usize) -> MonoblockResult<()> {
    let mut out = String::new();
    for (region, mesh) in tessellate_model(block, segments) {
        push_solid(&mut out, region.name(), &mesh);
    }
    std::fs::write(path, out)?;
    Ok(())
}
