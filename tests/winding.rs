// Copyright 2025 Lars Brubaker
// Winding rule behavior with controlled orientations and overlaps.

mod helpers;

use helpers::{assert_area_approx, total_inside_area};
use sweeptess::WindingRule;

// CCW square: winding number +1 inside.
const CCW: &[(f64, f64)] = &[(0.0, 0.0), (4.0, 0.0), (4.0, 4.0), (0.0, 4.0)];
// The same square, CW: winding number -1 inside.
const CW: &[(f64, f64)] = &[(0.0, 4.0), (4.0, 4.0), (4.0, 0.0), (0.0, 0.0)];

fn area(contours: &[&[(f64, f64)]], rule: WindingRule) -> f64 {
    let tess = helpers::sweep_contours(contours, rule);
    total_inside_area(tess.mesh().unwrap())
}

#[test]
fn single_ccw_square_truth_table() {
    assert_area_approx(area(&[CCW], WindingRule::Odd), 16.0, "odd");
    assert_area_approx(area(&[CCW], WindingRule::NonZero), 16.0, "nonzero");
    assert_area_approx(area(&[CCW], WindingRule::Positive), 16.0, "positive");
    assert_area_approx(area(&[CCW], WindingRule::Negative), 0.0, "negative");
    assert_area_approx(area(&[CCW], WindingRule::AbsGeqTwo), 0.0, "abs>=2");
}

#[test]
fn single_cw_square_flips_signed_rules() {
    assert_area_approx(area(&[CW], WindingRule::Odd), 16.0, "odd");
    assert_area_approx(area(&[CW], WindingRule::NonZero), 16.0, "nonzero");
    assert_area_approx(area(&[CW], WindingRule::Positive), 0.0, "positive");
    assert_area_approx(area(&[CW], WindingRule::Negative), 16.0, "negative");
}

#[test]
fn doubled_square_cancels_under_odd() {
    // Two identical CCW squares: interior winding 2.
    assert_area_approx(area(&[CCW, CCW], WindingRule::Odd), 0.0, "odd");
    assert_area_approx(area(&[CCW, CCW], WindingRule::NonZero), 16.0, "nonzero");
    assert_area_approx(area(&[CCW, CCW], WindingRule::AbsGeqTwo), 16.0, "abs>=2");
}

#[test]
fn opposite_orientations_cancel_under_nonzero() {
    assert_area_approx(area(&[CCW, CW], WindingRule::NonZero), 0.0, "nonzero");
    assert_area_approx(area(&[CCW, CW], WindingRule::Odd), 0.0, "odd");
}

#[test]
fn abs_geq_two_selects_the_overlap() {
    // Two CCW squares overlapping in (2,0)-(4,4): winding 2 there, 1
    // elsewhere.
    let shifted: &[(f64, f64)] = &[(2.0, 0.0), (6.0, 0.0), (6.0, 4.0), (2.0, 4.0)];
    assert_area_approx(area(&[CCW, shifted], WindingRule::AbsGeqTwo), 8.0, "abs>=2");
    assert_area_approx(area(&[CCW, shifted], WindingRule::NonZero), 24.0, "nonzero");
    assert_area_approx(area(&[CCW, shifted], WindingRule::Odd), 16.0, "odd");
}

#[test]
fn nested_squares_alternate_under_odd() {
    // 6x6 CCW containing 4x4 CCW containing 2x2 CCW, all same
    // orientation: windings 1, 2, 3 from outside in.
    let outer: &[(f64, f64)] = &[(-3.0, -3.0), (3.0, -3.0), (3.0, 3.0), (-3.0, 3.0)];
    let middle: &[(f64, f64)] = &[(-2.0, -2.0), (2.0, -2.0), (2.0, 2.0), (-2.0, 2.0)];
    let inner: &[(f64, f64)] = &[(-1.0, -1.0), (1.0, -1.0), (1.0, 1.0), (-1.0, 1.0)];
    let all = [outer, middle, inner];

    // Odd keeps winding 1 and 3: ring (36-16) plus core (4).
    assert_area_approx(area(&all, WindingRule::Odd), 24.0, "odd");
    assert_area_approx(area(&all, WindingRule::NonZero), 36.0, "nonzero");
    // AbsGeqTwo keeps winding 2 and 3: the middle square.
    assert_area_approx(area(&all, WindingRule::AbsGeqTwo), 16.0, "abs>=2");
}
