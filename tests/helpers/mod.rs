// Copyright 2025 Lars Brubaker
// Shared test utilities for sweeptess tests.

#![allow(dead_code)]

use sweeptess::geom::{vert_eq, vert_leq};
use sweeptess::{Mesh, Tessellator, WindingRule};

/// Feed each contour into a fresh session and run the sweep.
pub fn sweep_contours(contours: &[&[(f64, f64)]], rule: WindingRule) -> Tessellator {
    let mut tess = Tessellator::new(rule);
    for contour in contours {
        tess.begin_contour().unwrap();
        for &(x, y) in contour.iter() {
            tess.add_vertex(x, y).unwrap();
        }
        tess.end_contour().unwrap();
    }
    tess.finish()
        .unwrap_or_else(|e| panic!("sweep failed for {:?}: {}", rule, e));
    tess
}

/// Collect the boundary loop of each inside face, as vertex positions in
/// lnext order.
pub fn inside_face_loops(mesh: &Mesh) -> Vec<Vec<(f64, f64)>> {
    let mut loops = Vec::new();
    for f in mesh.face_iter() {
        if !mesh.faces[f as usize].inside {
            continue;
        }
        let e0 = mesh.faces[f as usize].an_edge;
        let mut contour = Vec::new();
        let mut e = e0;
        loop {
            let v = mesh.edges[e as usize].org as usize;
            contour.push((mesh.verts[v].x, mesh.verts[v].y));
            e = mesh.edges[e as usize].lnext;
            if e == e0 {
                break;
            }
        }
        loops.push(contour);
    }
    loops
}

/// Shoelace signed area of a closed loop.
pub fn loop_signed_area(pts: &[(f64, f64)]) -> f64 {
    let n = pts.len();
    let mut area = 0.0;
    for i in 0..n {
        let (x0, y0) = pts[i];
        let (x1, y1) = pts[(i + 1) % n];
        area += x0 * y1 - x1 * y0;
    }
    area * 0.5
}

/// Total area of the interior.  Inside faces keep their interior on the
/// left of the lnext walk, so every loop is CCW and the signed areas sum
/// directly.
pub fn total_inside_area(mesh: &Mesh) -> f64 {
    inside_face_loops(mesh)
        .iter()
        .map(|l| loop_signed_area(l))
        .sum()
}

pub fn assert_area_approx(actual: f64, expected: f64, label: &str) {
    assert!(
        (actual - expected).abs() < 1e-9,
        "{}: expected area ~{}, got {}",
        label,
        expected,
        actual
    );
}

/// Every inside face the sweep produces must be monotone with respect to
/// the sweep direction: exactly one local minimum in the lexicographic
/// vertex order around the loop.
pub fn verify_inside_faces_monotone(mesh: &Mesh) {
    for (i, contour) in inside_face_loops(mesh).iter().enumerate() {
        let n = contour.len();
        assert!(n >= 3, "inside face {} has only {} vertices", i, n);
        let mut minima = 0;
        for j in 0..n {
            let (px, py) = contour[(j + n - 1) % n];
            let (x, y) = contour[j];
            let (nx, ny) = contour[(j + 1) % n];
            if vert_leq(x, y, px, py)
                && vert_leq(x, y, nx, ny)
                && !(vert_leq(px, py, x, y) || vert_leq(nx, ny, x, y))
            {
                minima += 1;
            }
        }
        assert_eq!(
            minima, 1,
            "inside face {} is not sweep-monotone: {:?}",
            i, contour
        );
    }
}

/// Degenerate input must not survive the sweep: no edge of zero length,
/// and no two vertices at the same position.
pub fn verify_no_degenerates(mesh: &Mesh) {
    for e in mesh.edge_iter() {
        let o = mesh.edges[e as usize].org as usize;
        let d = mesh.dst(e) as usize;
        assert!(
            !vert_eq(
                mesh.verts[o].x,
                mesh.verts[o].y,
                mesh.verts[d].x,
                mesh.verts[d].y
            ),
            "zero-length edge {} at ({}, {})",
            e,
            mesh.verts[o].x,
            mesh.verts[o].y
        );
    }

    let positions: Vec<(f64, f64)> = mesh
        .vertex_iter()
        .map(|v| (mesh.verts[v as usize].x, mesh.verts[v as usize].y))
        .collect();
    for i in 0..positions.len() {
        for j in i + 1..positions.len() {
            assert!(
                positions[i] != positions[j],
                "coincident vertices survived at {:?}",
                positions[i]
            );
        }
    }
}

/// Basic sanity of the swept mesh: coordinates finite, every face loop
/// closed with at least 3 vertices (except the unbounded outer face).
pub fn verify_valid_mesh(mesh: &Mesh) {
    for v in mesh.vertex_iter() {
        let vt = &mesh.verts[v as usize];
        assert!(
            vt.x.is_finite() && vt.y.is_finite(),
            "vertex {} has non-finite position ({}, {})",
            v,
            vt.x,
            vt.y
        );
    }
    for f in mesh.face_iter() {
        if mesh.faces[f as usize].inside {
            assert!(
                mesh.count_face_verts(f) >= 3,
                "inside face {} has fewer than 3 vertices",
                f
            );
        }
    }
}
