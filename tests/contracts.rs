// Copyright 2025 Lars Brubaker
// Session lifecycle contracts: single-shot finish, input clamping, and
// accessor availability.

mod helpers;

use sweeptess::{TessError, Tessellator, WindingRule, MAX_COORD};

fn square(tess: &mut Tessellator) {
    tess.begin_contour().unwrap();
    tess.add_vertex(0.0, 0.0).unwrap();
    tess.add_vertex(4.0, 0.0).unwrap();
    tess.add_vertex(4.0, 4.0).unwrap();
    tess.add_vertex(0.0, 4.0).unwrap();
    tess.end_contour().unwrap();
}

#[test]
fn finish_is_single_shot() {
    let mut tess = Tessellator::new(WindingRule::Odd);
    square(&mut tess);
    assert_eq!(tess.finish(), Ok(()));
    assert_eq!(tess.finish(), Err(TessError::AlreadyFinished));
}

#[test]
fn contour_construction_rejected_after_finish() {
    let mut tess = Tessellator::new(WindingRule::Odd);
    square(&mut tess);
    tess.finish().unwrap();
    assert_eq!(tess.begin_contour(), Err(TessError::AlreadyFinished));
    assert_eq!(tess.add_vertex(0.0, 0.0), Err(TessError::AlreadyFinished));
    assert_eq!(tess.end_contour(), Err(TessError::AlreadyFinished));
}

#[test]
fn accessors_rejected_before_finish() {
    let mut tess = Tessellator::new(WindingRule::Odd);
    square(&mut tess);
    assert!(matches!(tess.mesh(), Err(TessError::NotFinished)));
    assert!(matches!(tess.outlines(), Err(TessError::NotFinished)));
}

#[test]
fn vertices_outside_a_contour_are_rejected() {
    let mut tess = Tessellator::new(WindingRule::Odd);
    assert_eq!(tess.add_vertex(0.0, 0.0), Err(TessError::NoContour));
    assert_eq!(tess.end_contour(), Err(TessError::NoContour));

    // A properly bracketed contour still goes through, and closing it
    // shuts the door again.
    square(&mut tess);
    assert_eq!(tess.add_vertex(5.0, 5.0), Err(TessError::NoContour));
    tess.finish().unwrap();
}

#[test]
fn empty_session_finishes_cleanly() {
    let mut tess = Tessellator::new(WindingRule::Odd);
    tess.finish().unwrap();
    let mesh = tess.mesh().unwrap();
    assert_eq!(mesh.face_iter().count(), 0);
    assert_eq!(mesh.vertex_iter().count(), 0);
}

#[test]
fn oversized_coordinates_are_clamped_and_counted() {
    let mut tess = Tessellator::new(WindingRule::Odd);
    tess.set_max_coord(100.0);
    tess.begin_contour().unwrap();
    tess.add_vertex(0.0, 0.0).unwrap();
    tess.add_vertex(1.0e6, 0.0).unwrap();
    tess.add_vertex(1.0e6, -1.0e6).unwrap(); // both components clamp, counted once
    tess.end_contour().unwrap();
    assert_eq!(tess.clamped_vertex_count(), 2);

    tess.finish().unwrap();
    let mesh = tess.mesh().unwrap();
    // Only input-derived vertices carry an output index; internal sweep
    // scaffolding may sit outside the input range.
    for v in mesh.vertex_iter() {
        if mesh.verts[v as usize].idx == sweeptess::INVALID {
            continue;
        }
        assert!(mesh.verts[v as usize].x.abs() <= 100.0);
        assert!(mesh.verts[v as usize].y.abs() <= 100.0);
    }
}

#[test]
fn default_limit_accepts_large_coordinates() {
    let mut tess = Tessellator::new(WindingRule::Odd);
    tess.begin_contour().unwrap();
    tess.add_vertex(0.0, 0.0).unwrap();
    tess.add_vertex(1.0e100, 0.0).unwrap();
    tess.add_vertex(0.0, 1.0e100).unwrap();
    tess.end_contour().unwrap();
    assert_eq!(tess.clamped_vertex_count(), 0);
    assert!(1.0e100 < MAX_COORD);
    tess.finish().unwrap();
}
