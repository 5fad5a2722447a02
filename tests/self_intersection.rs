// Copyright 2025 Lars Brubaker
// Self-intersecting and coincident input: crossings must be resolved
// into mesh vertices with correctly classified faces, and the combine
// hook must see sensible interpolation data.

mod helpers;

use std::cell::RefCell;
use std::rc::Rc;

use helpers::{assert_area_approx, total_inside_area, verify_no_degenerates, verify_valid_mesh};
use sweeptess::{Tessellator, WindingRule};

// Figure-eight quad crossing itself at (2, 2).
const BOWTIE: &[(f64, f64)] = &[(0.0, 0.0), (4.0, 4.0), (4.0, 0.0), (0.0, 4.0)];

#[test]
fn bowtie_under_odd_fills_both_lobes() {
    let tess = helpers::sweep_contours(&[BOWTIE], WindingRule::Odd);
    let mesh = tess.mesh().unwrap();
    verify_valid_mesh(mesh);
    assert_area_approx(total_inside_area(mesh), 8.0, "bowtie odd");

    // The crossing became a real vertex.
    let found = mesh.vertex_iter().any(|v| {
        let vt = &mesh.verts[v as usize];
        (vt.x - 2.0).abs() < 1e-9 && (vt.y - 2.0).abs() < 1e-9
    });
    assert!(found, "no vertex synthesized at the crossing");
}

#[test]
fn bowtie_under_positive_fills_one_lobe() {
    let tess = helpers::sweep_contours(&[BOWTIE], WindingRule::Positive);
    let mesh = tess.mesh().unwrap();
    assert_area_approx(total_inside_area(mesh), 4.0, "bowtie positive");
}

#[test]
fn crossing_squares_resolve_their_overlap() {
    // Two squares crossing like a plus sign.
    let horizontal: &[(f64, f64)] = &[(0.0, 2.0), (6.0, 2.0), (6.0, 4.0), (0.0, 4.0)];
    let vertical: &[(f64, f64)] = &[(2.0, 0.0), (4.0, 0.0), (4.0, 6.0), (2.0, 6.0)];
    let tess = helpers::sweep_contours(&[horizontal, vertical], WindingRule::Odd);
    let mesh = tess.mesh().unwrap();
    verify_valid_mesh(mesh);
    // 12 + 12 - 2 * 4: the doubly-covered center drops out under Odd.
    assert_area_approx(total_inside_area(mesh), 16.0, "plus sign odd");

    let tess = helpers::sweep_contours(&[horizontal, vertical], WindingRule::NonZero);
    assert_area_approx(
        total_inside_area(tess.mesh().unwrap()),
        20.0,
        "plus sign nonzero",
    );
}

#[test]
fn combine_hook_sees_the_intersection() {
    let seen: Rc<RefCell<Vec<(f64, f64, [Option<u32>; 4], [f64; 4])>>> =
        Rc::new(RefCell::new(Vec::new()));
    let sink = Rc::clone(&seen);

    let mut tess = Tessellator::new(WindingRule::Odd);
    let mut next = 100u32;
    tess.on_combine(move |x, y, sources, weights| {
        sink.borrow_mut().push((x, y, sources, weights));
        let idx = next;
        next += 1;
        idx
    });

    tess.begin_contour().unwrap();
    for &(x, y) in BOWTIE {
        tess.add_vertex(x, y).unwrap();
    }
    tess.end_contour().unwrap();
    tess.finish().unwrap();

    let calls = seen.borrow();
    assert_eq!(calls.len(), 1, "expected exactly one combine call");
    let (x, y, sources, weights) = calls[0];
    assert!((x - 2.0).abs() < 1e-9 && (y - 2.0).abs() < 1e-9);
    assert!(
        sources.iter().all(|s| s.is_some()),
        "an intersection interpolates between four endpoints: {:?}",
        sources
    );
    let total: f64 = weights.iter().sum();
    assert!(
        (total - 1.0).abs() < 1e-9,
        "weights should sum to 1, got {:?}",
        weights
    );

    // The hook's index is installed on the synthesized vertex.
    let mesh = tess.mesh().unwrap();
    let found = mesh
        .vertex_iter()
        .any(|v| mesh.verts[v as usize].idx == 100);
    assert!(found);
}

#[test]
fn combine_hook_sees_coincident_merges() {
    let merges: Rc<RefCell<u32>> = Rc::new(RefCell::new(0));
    let sink = Rc::clone(&merges);

    let mut tess = Tessellator::new(WindingRule::Odd);
    tess.on_combine(move |_x, _y, sources, _weights| {
        if sources[2].is_none() {
            *sink.borrow_mut() += 1;
        }
        sources[0].unwrap_or(0)
    });

    // Two triangles sharing the vertex (4, 2).
    for contour in [
        &[(0.0, 0.0), (4.0, 2.0), (0.0, 4.0)],
        &[(8.0, 0.0), (8.0, 4.0), (4.0, 2.0)],
    ] {
        tess.begin_contour().unwrap();
        for &(x, y) in contour.iter() {
            tess.add_vertex(x, y).unwrap();
        }
        tess.end_contour().unwrap();
    }
    tess.finish().unwrap();

    assert!(*merges.borrow() >= 1, "shared vertex should trigger a merge");
    verify_no_degenerates(tess.mesh().unwrap());
}

#[test]
fn overlapping_edges_collapse() {
    // Two squares sharing the full edge x=4: the shared boundary must not
    // leave a seam under NonZero.
    let left: &[(f64, f64)] = &[(0.0, 0.0), (4.0, 0.0), (4.0, 4.0), (0.0, 4.0)];
    let right: &[(f64, f64)] = &[(4.0, 0.0), (8.0, 0.0), (8.0, 4.0), (4.0, 4.0)];
    let tess = helpers::sweep_contours(&[left, right], WindingRule::NonZero);
    let mesh = tess.mesh().unwrap();
    verify_valid_mesh(mesh);
    verify_no_degenerates(mesh);
    assert_area_approx(total_inside_area(mesh), 32.0, "abutting squares");
}
