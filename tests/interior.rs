// Copyright 2025 Lars Brubaker
// Interior computation on well-formed input: simple polygons, holes,
// and multiple disjoint contours.

mod helpers;

use helpers::{
    assert_area_approx, inside_face_loops, total_inside_area, verify_inside_faces_monotone,
    verify_no_degenerates, verify_valid_mesh,
};
use sweeptess::WindingRule;

const SQUARE: &[(f64, f64)] = &[(0.0, 0.0), (4.0, 0.0), (4.0, 4.0), (0.0, 4.0)];

#[test]
fn simple_square() {
    let tess = helpers::sweep_contours(&[SQUARE], WindingRule::Odd);
    let mesh = tess.mesh().unwrap();
    verify_valid_mesh(mesh);
    assert_eq!(inside_face_loops(mesh).len(), 1);
    assert_area_approx(total_inside_area(mesh), 16.0, "square");
}

#[test]
fn square_orientation_does_not_matter_for_odd() {
    let cw: Vec<(f64, f64)> = SQUARE.iter().rev().copied().collect();
    let tess = helpers::sweep_contours(&[&cw], WindingRule::Odd);
    assert_area_approx(total_inside_area(tess.mesh().unwrap()), 16.0, "cw square");
}

#[test]
fn square_with_hole() {
    let hole: &[(f64, f64)] = &[(1.0, 1.0), (1.0, 3.0), (3.0, 3.0), (3.0, 1.0)];
    let tess = helpers::sweep_contours(&[SQUARE, hole], WindingRule::NonZero);
    let mesh = tess.mesh().unwrap();
    verify_valid_mesh(mesh);
    verify_inside_faces_monotone(mesh);
    assert_area_approx(total_inside_area(mesh), 12.0, "square minus hole");
}

#[test]
fn concave_polygon() {
    // A U shape: 6 wide, 4 tall, with a 2x3 notch cut from the top.
    let u: &[(f64, f64)] = &[
        (0.0, 0.0),
        (6.0, 0.0),
        (6.0, 4.0),
        (4.0, 4.0),
        (4.0, 1.0),
        (2.0, 1.0),
        (2.0, 4.0),
        (0.0, 4.0),
    ];
    let tess = helpers::sweep_contours(&[u], WindingRule::Odd);
    let mesh = tess.mesh().unwrap();
    verify_valid_mesh(mesh);
    verify_inside_faces_monotone(mesh);
    assert_area_approx(total_inside_area(mesh), 18.0, "U shape");
}

#[test]
fn two_disjoint_squares() {
    let right: &[(f64, f64)] = &[(10.0, 0.0), (14.0, 0.0), (14.0, 4.0), (10.0, 4.0)];
    let tess = helpers::sweep_contours(&[SQUARE, right], WindingRule::Odd);
    let mesh = tess.mesh().unwrap();
    verify_valid_mesh(mesh);
    assert_eq!(inside_face_loops(mesh).len(), 2);
    assert_area_approx(total_inside_area(mesh), 32.0, "two squares");
}

#[test]
fn shared_vertex_diamonds() {
    // Two diamonds meeting at a single point.
    let left: &[(f64, f64)] = &[(0.0, 2.0), (2.0, 0.0), (4.0, 2.0), (2.0, 4.0)];
    let right: &[(f64, f64)] = &[(4.0, 2.0), (6.0, 0.0), (8.0, 2.0), (6.0, 4.0)];
    let tess = helpers::sweep_contours(&[left, right], WindingRule::Odd);
    let mesh = tess.mesh().unwrap();
    verify_valid_mesh(mesh);
    verify_no_degenerates(mesh);
    assert_area_approx(total_inside_area(mesh), 16.0, "kissing diamonds");
}

#[test]
fn degenerate_contours_are_dropped() {
    // A point and a line segment contribute no area.
    let point: &[(f64, f64)] = &[(7.0, 7.0)];
    let segment: &[(f64, f64)] = &[(8.0, 8.0), (9.0, 9.0)];
    let tess = helpers::sweep_contours(&[SQUARE, point, segment], WindingRule::Odd);
    let mesh = tess.mesh().unwrap();
    verify_valid_mesh(mesh);
    assert_eq!(inside_face_loops(mesh).len(), 1);
    assert_area_approx(total_inside_area(mesh), 16.0, "square plus degenerates");
}

#[test]
fn repeated_vertices_are_merged() {
    // Consecutive duplicate vertices produce zero-length edges.
    let dup: &[(f64, f64)] = &[
        (0.0, 0.0),
        (0.0, 0.0),
        (4.0, 0.0),
        (4.0, 4.0),
        (4.0, 4.0),
        (0.0, 4.0),
    ];
    let tess = helpers::sweep_contours(&[dup], WindingRule::Odd);
    let mesh = tess.mesh().unwrap();
    verify_valid_mesh(mesh);
    verify_no_degenerates(mesh);
    assert_area_approx(total_inside_area(mesh), 16.0, "duplicate vertices");
}
