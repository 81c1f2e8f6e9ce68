//! Triangle meshes for the monoblock regions.
//!
//! Each region is meshed as a closed, consistently outward-wound
//! surface so signed volumes come out positive and STL viewers shade
//! it correctly. All four regions share one angular discretisation
//! (plus the four box corner directions), which makes the region
//! volumes telescope: summed, they reproduce the block box exactly.

use std::f64::consts::TAU;

use crate::monoblock::{MaterialRegion, Monoblock};

/// Indexed triangle mesh with per-vertex normals.
#[derive(Debug, Clone, Default)]
pub struct TriangleMesh {
    pub positions: Vec<[f64; 3]>,
    pub normals: Vec<[f64; 3]>,
    pub indices: Vec<u32>,
}

impl TriangleMesh {
    pub fn new() -> TriangleMesh {
        TriangleMesh::default()
    }

    pub fn add_vertex(&mut self, position: [f64; 3], normal: [f64; 3]) -> u32 {
        let idx = self.positions.len() as u32;
        self.positions.push(position);
        self.normals.push(normal);
        idx
    }

    pub fn add_triangle(&mut self, a: u32, b: u32, c: u32) {
        self.indices.extend_from_slice(&[a, b, c]);
    }

    /// Append another mesh, remapping its indices.
    pub fn merge(&mut self, other: &TriangleMesh) {
        let offset = self.positions.len() as u32;
        self.positions.extend_from_slice(&other.positions);
        self.normals.extend_from_slice(&other.normals);
        self.indices.extend(other.indices.iter().map(|i| i + offset));
    }

    pub fn triangle_count(&self) -> usize {
        self.indices.len() / 3
    }

    /// Vertices of triangle `i`.
    pub fn triangle(&self, i: usize) -> ([f64; 3], [f64; 3], [f64; 3]) {
        let a = self.positions[self.indices[3 * i] as usize];
        let b = self.positions[self.indices[3 * i + 1] as usize];
        let c = self.positions[self.indices[3 * i + 2] as usize];
        (a, b, c)
    }

    /// Normal stored for triangle `i` (all three vertices of a facet
    /// carry the same normal).
    pub fn facet_normal(&self, i: usize) -> [f64; 3] {
        self.normals[self.indices[3 * i] as usize]
    }

    /// Signed enclosed volume via the divergence theorem. Positive for
    /// outward winding.
    pub fn signed_volume(&self) -> f64 {
        let mut six_v = 0.0;
        for i in 0..self.triangle_count() {
            let (a, b, c) = self.triangle(i);
            six_v += a[0] * (b[1] * c[2] - b[2] * c[1])
                - a[1] * (b[0] * c[2] - b[2] * c[0])
                + a[2] * (b[0] * c[1] - b[1] * c[0]);
        }
        six_v / 6.0
    }
}

/// Mesh one region of the block. `segments` controls the angular
/// resolution of the cylindrical walls.
pub fn tessellate_region(
    block: &Monoblock,
    region: MaterialRegion,
    segments: usize,
) -> TriangleMesh {
    let angles = angle_set(block, segments);
    let [r_water, r_cucrzr, r_cu] = block.radii();
    let (x_half, pipe_x_half, y_half, z_bottom, z_top) = block.extents();
    let rect = Rect {
        y_half,
        z_bottom,
        z_top,
    };

    let mut mesh = TriangleMesh::new();
    match region {
        MaterialRegion::Water => {
            lateral_ring(&mut mesh, r_water, -pipe_x_half, pipe_x_half, &angles, true);
            disk_cap(&mut mesh, r_water, pipe_x_half, &angles, true);
            disk_cap(&mut mesh, r_water, -pipe_x_half, &angles, false);
        }
        MaterialRegion::CuCrZr => {
            lateral_ring(&mut mesh, r_cucrzr, -pipe_x_half, pipe_x_half, &angles, true);
            lateral_ring(&mut mesh, r_water, -pipe_x_half, pipe_x_half, &angles, false);
            annulus_cap(&mut mesh, r_water, r_cucrzr, pipe_x_half, &angles, true);
            annulus_cap(&mut mesh, r_water, r_cucrzr, -pipe_x_half, &angles, false);
        }
        MaterialRegion::Copper => {
            lateral_ring(&mut mesh, r_cu, -x_half, x_half, &angles, true);
            lateral_ring(&mut mesh, r_cucrzr, -x_half, x_half, &angles, false);
            annulus_cap(&mut mesh, r_cucrzr, r_cu, x_half, &angles, true);
            annulus_cap(&mut mesh, r_cucrzr, r_cu, -x_half, &angles, false);
        }
        MaterialRegion::Tungsten => {
            holed_face(&mut mesh, r_cu, x_half, &angles, rect, true);
            holed_face(&mut mesh, r_cu, -x_half, &angles, rect, false);
            box_wall(&mut mesh, -x_half, x_half, &angles, rect);
            lateral_ring(&mut mesh, r_cu, -x_half, x_half, &angles, false);
        }
    }
    mesh
}

/// Mesh every region with a shared discretisation.
pub fn tessellate_model(block: &Monoblock, segments: usize) -> Vec<(MaterialRegion, TriangleMesh)> {
    MaterialRegion::all()
        .into_iter()
        .map(|region| (region, tessellate_region(block, region, segments)))
        .collect()
}

#[derive(Clone, Copy)]
struct Rect {
    y_half: f64,
    z_bottom: f64,
    z_top: f64,
}

impl Rect {
    /// Boundary point along the ray from the origin at angle `a` in the
    /// (y, z) plane. The origin is strictly inside the rectangle, so
    /// the ray always exits.
    fn boundary_point(&self, a: f64) -> (f64, f64) {
        let (cy, sz) = (a.cos(), a.sin());
        let mut t = f64::INFINITY;
        if cy > 1e-12 {
            t = t.min(self.y_half / cy);
        } else if cy < -1e-12 {
            t = t.min(-self.y_half / cy);
        }
        if sz > 1e-12 {
            t = t.min(self.z_top / sz);
        } else if sz < -1e-12 {
            t = t.min(self.z_bottom / sz);
        }
        (t * cy, t * sz)
    }
}

/// Base angles plus the four box corner directions, sorted. Sharing
/// this set across all surfaces is what makes region volumes telescope.
fn angle_set(block: &Monoblock, segments: usize) -> Vec<f64> {
    let segments = segments.max(8);
    let (_, _, y_half, z_bottom, z_top) = block.extents();
    let mut angles: Vec<f64> = (0..segments)
        .map(|k| k as f64 * TAU / segments as f64)
        .collect();
    for (y, z) in [
        (y_half, z_top),
        (-y_half, z_top),
        (-y_half, z_bottom),
        (y_half, z_bottom),
    ] {
        let mut a = z.atan2(y);
        if a < 0.0 {
            a += TAU;
        }
        angles.push(a);
    }
    angles.sort_by(f64::total_cmp);
    angles.dedup_by(|a, b| (*a - *b).abs() < 1e-9);
    angles
}

fn add_quad(mesh: &mut TriangleMesh, corners: [[f64; 3]; 4], normal: [f64; 3]) {
    let i0 = mesh.add_vertex(corners[0], normal);
    let i1 = mesh.add_vertex(corners[1], normal);
    let i2 = mesh.add_vertex(corners[2], normal);
    let i3 = mesh.add_vertex(corners[3], normal);
    mesh.add_triangle(i0, i1, i2);
    mesh.add_triangle(i0, i2, i3);
}

fn add_tri(mesh: &mut TriangleMesh, corners: [[f64; 3]; 3], normal: [f64; 3]) {
    let i0 = mesh.add_vertex(corners[0], normal);
    let i1 = mesh.add_vertex(corners[1], normal);
    let i2 = mesh.add_vertex(corners[2], normal);
    mesh.add_triangle(i0, i1, i2);
}

/// Pairs (a, b) walking the angle set once around, with b unwrapped so
/// b > a on the closing pair.
fn angle_pairs(angles: &[f64]) -> impl Iterator<Item = (f64, f64)> + '_ {
    let n = angles.len();
    (0..n).map(move |i| {
        let a = angles[i];
        let b = if i + 1 == n {
            angles[0] + TAU
        } else {
            angles[i + 1]
        };
        (a, b)
    })
}

/// Cylindrical wall at radius `r` spanning x0..x1. `outward` selects
/// whether the solid lies inside (true) or outside (false) the wall.
fn lateral_ring(mesh: &mut TriangleMesh, r: f64, x0: f64, x1: f64, angles: &[f64], outward: bool) {
    for (a, b) in angle_pairs(angles) {
        let pa = [x0, r * a.cos(), r * a.sin()];
        let pb = [x0, r * b.cos(), r * b.sin()];
        let pc = [x1, r * b.cos(), r * b.sin()];
        let pd = [x1, r * a.cos(), r * a.sin()];
        let mid = 0.5 * (a + b);
        let radial = [0.0, mid.cos(), mid.sin()];
        if outward {
            add_quad(mesh, [pa, pb, pc, pd], radial);
        } else {
            add_quad(mesh, [pa, pd, pc, pb], [0.0, -radial[1], -radial[2]]);
        }
    }
}

/// Flat annulus at `x` between radii, facing +x or -x.
fn annulus_cap(
    mesh: &mut TriangleMesh,
    r_in: f64,
    r_out: f64,
    x: f64,
    angles: &[f64],
    facing_pos_x: bool,
) {
    let normal = if facing_pos_x {
        [1.0, 0.0, 0.0]
    } else {
        [-1.0, 0.0, 0.0]
    };
    for (a, b) in angle_pairs(angles) {
        let ia = [x, r_in * a.cos(), r_in * a.sin()];
        let ib = [x, r_in * b.cos(), r_in * b.sin()];
        let oa = [x, r_out * a.cos(), r_out * a.sin()];
        let ob = [x, r_out * b.cos(), r_out * b.sin()];
        if facing_pos_x {
            add_quad(mesh, [ia, oa, ob, ib], normal);
        } else {
            add_quad(mesh, [ia, ib, ob, oa], normal);
        }
    }
}

/// Full disk at `x`, fanned from the axis.
fn disk_cap(mesh: &mut TriangleMesh, r: f64, x: f64, angles: &[f64], facing_pos_x: bool) {
    let normal = if facing_pos_x {
        [1.0, 0.0, 0.0]
    } else {
        [-1.0, 0.0, 0.0]
    };
    let center = [x, 0.0, 0.0];
    for (a, b) in angle_pairs(angles) {
        let oa = [x, r * a.cos(), r * a.sin()];
        let ob = [x, r * b.cos(), r * b.sin()];
        if facing_pos_x {
            add_tri(mesh, [center, oa, ob], normal);
        } else {
            add_tri(mesh, [center, ob, oa], normal);
        }
    }
}

/// Rectangular face with a circular hole, bridged ring-to-boundary.
fn holed_face(
    mesh: &mut TriangleMesh,
    r_hole: f64,
    x: f64,
    angles: &[f64],
    rect: Rect,
    facing_pos_x: bool,
) {
    let normal = if facing_pos_x {
        [1.0, 0.0, 0.0]
    } else {
        [-1.0, 0.0, 0.0]
    };
    for (a, b) in angle_pairs(angles) {
        let ca = [x, r_hole * a.cos(), r_hole * a.sin()];
        let cb = [x, r_hole * b.cos(), r_hole * b.sin()];
        let (ry, rz) = rect.boundary_point(a);
        let ra = [x, ry, rz];
        let (ry, rz) = rect.boundary_point(b);
        let rb = [x, ry, rz];
        if facing_pos_x {
            add_quad(mesh, [ca, ra, rb, cb], normal);
        } else {
            add_quad(mesh, [ca, cb, rb, ra], normal);
        }
    }
}

/// Outer walls of the box between the two x faces.
fn box_wall(mesh: &mut TriangleMesh, x0: f64, x1: f64, angles: &[f64], rect: Rect) {
    for (a, b) in angle_pairs(angles) {
        let (ay, az) = rect.boundary_point(a);
        let (by, bz) = rect.boundary_point(b);
        let (ey, ez) = (by - ay, bz - az);
        let len = (ey * ey + ez * ez).sqrt();
        if len < 1e-12 {
            continue;
        }
        // Outward normal of a CCW-traversed boundary edge.
        let normal = [0.0, ez / len, -ey / len];
        let pa = [x0, ay, az];
        let pb = [x0, by, bz];
        let pc = [x1, by, bz];
        let pd = [x1, ay, az];
        add_quad(mesh, [pa, pb, pc, pd], normal);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use monoblock_types::config::MonoblockParams;

    fn default_block() -> Monoblock {
        Monoblock::new(&MonoblockParams::default()).unwrap()
    }

    #[test]
    fn region_volumes_close_to_analytic() {
        let block = default_block();
        for region in MaterialRegion::all() {
            let mesh = tessellate_region(&block, region, 128);
            let analytic = block.volume_cm3(region);
            let meshed = mesh.signed_volume();
            assert!(meshed > 0.0, "{}: negative volume", region.name());
            let rel = (meshed - analytic).abs() / analytic;
            // Inscribed polygons undercut the circles slightly.
            assert!(
                rel < 1.5e-3,
                "{}: mesh volume {meshed} vs analytic {analytic}",
                region.name()
            );
        }
    }

    #[test]
    fn region_volumes_telescope_to_the_box() {
        let block = default_block();
        let total: f64 = tessellate_model(&block, 64)
            .iter()
            .map(|(_, mesh)| mesh.signed_volume())
            .sum();
        // Polygonal circles cancel between neighbouring regions.
        assert!((total - 6.9).abs() < 1e-9, "total {total}");
    }

    #[test]
    fn finer_discretisation_converges_upward() {
        let block = default_block();
        let coarse = tessellate_region(&block, MaterialRegion::Water, 16).signed_volume();
        let fine = tessellate_region(&block, MaterialRegion::Water, 256).signed_volume();
        let analytic = block.volume_cm3(MaterialRegion::Water);
        assert!(coarse < fine);
        assert!(fine < analytic);
        assert!((analytic - fine) / analytic < 1e-3);
    }

    #[test]
    fn meshes_are_triangle_soups_with_matched_normals() {
        let block = default_block();
        let mesh = tessellate_region(&block, MaterialRegion::CuCrZr, 32);
        assert_eq!(mesh.indices.len() % 3, 0);
        assert_eq!(mesh.positions.len(), mesh.normals.len());
        assert!(mesh.triangle_count() > 0);
        // Stored normals are unit length.
        for n in &mesh.normals {
            let len = (n[0] * n[0] + n[1] * n[1] + n[2] * n[2]).sqrt();
            assert!((len - 1.0).abs() < 1e-9);
        }
    }

    #[test]
    fn merge_offsets_indices() {
        let block = default_block();
        let mut combined = tessellate_region(&block, MaterialRegion::Water, 16);
        let before = combined.triangle_count();
        let other = tessellate_region(&block, MaterialRegion::Copper, 16);
        combined.merge(&other);
        assert_eq!(combined.triangle_count(), before + other.triangle_count());
        let max_index = combined.indices.iter().copied().max().unwrap() as usize;
        assert!(max_index < combined.positions.len());
        // Volumes add under merge.
        let expected = tessellate_region(&block, MaterialRegion::Water, 16).signed_volume()
            + other.signed_volume();
        assert!((combined.signed_volume() - expected).abs() < 1e-12);
    }
}
