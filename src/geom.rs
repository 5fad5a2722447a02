// Copyright 2025 Lars Brubaker
// License: SGI Free Software License B (MIT-compatible)
//
// Pure geometric predicates operating on vertex (x, y) coordinates.
// These preserve the exact floating-point evaluation order of the SGI
// sample implementation; the sweep depends on their stability guarantees.

pub type Real = f64;

/// Returns true if u is lexicographically <= v (x first, then y).
#[inline]
pub fn vert_leq(u_x: Real, u_y: Real, v_x: Real, v_y: Real) -> bool {
    u_x < v_x || (u_x == v_x && u_y <= v_y)
}

/// Returns true if u == v (exact equality).
#[inline]
pub fn vert_eq(u_x: Real, u_y: Real, v_x: Real, v_y: Real) -> bool {
    u_x == v_x && u_y == v_y
}

/// Returns true if u is lexicographically <= v with x and y transposed.
#[inline]
pub fn trans_leq(u_x: Real, u_y: Real, v_x: Real, v_y: Real) -> bool {
    u_y < v_y || (u_y == v_y && u_x <= v_x)
}

/// Given three vertices u,v,w such that vert_leq(u,v) && vert_leq(v,w),
/// evaluates the y-coord of edge uw at the x-coord of v.
/// Returns v.y - (uw)(v.x), the signed distance from uw to v.
/// If uw is vertical (passes through v), returns zero.
///
/// The calculation is extremely accurate and stable, even when v is very
/// close to u or w: the interpolation is anchored at the nearer endpoint.
pub fn edge_eval(u_x: Real, u_y: Real, v_x: Real, v_y: Real, w_x: Real, w_y: Real) -> Real {
    debug_assert!(vert_leq(u_x, u_y, v_x, v_y) && vert_leq(v_x, v_y, w_x, w_y));
    let gap_l = v_x - u_x;
    let gap_r = w_x - v_x;
    if gap_l + gap_r > 0.0 {
        if gap_l < gap_r {
            (v_y - u_y) + (u_y - w_y) * (gap_l / (gap_l + gap_r))
        } else {
            (v_y - w_y) + (w_y - u_y) * (gap_r / (gap_l + gap_r))
        }
    } else {
        0.0
    }
}

/// Returns a value whose sign matches edge_eval(u,v,w) but is cheaper to
/// compute: > 0, == 0, or < 0 as v is above, on, or below the edge uw.
#[inline]
pub fn edge_sign(u_x: Real, u_y: Real, v_x: Real, v_y: Real, w_x: Real, w_y: Real) -> Real {
    debug_assert!(vert_leq(u_x, u_y, v_x, v_y) && vert_leq(v_x, v_y, w_x, w_y));
    let gap_l = v_x - u_x;
    let gap_r = w_x - v_x;
    if gap_l + gap_r > 0.0 {
        (v_y - w_y) * gap_l + (v_y - u_y) * gap_r
    } else {
        0.0
    }
}

/// Like edge_eval but with x and y transposed.
pub fn trans_eval(u_x: Real, u_y: Real, v_x: Real, v_y: Real, w_x: Real, w_y: Real) -> Real {
    debug_assert!(trans_leq(u_x, u_y, v_x, v_y) && trans_leq(v_x, v_y, w_x, w_y));
    let gap_l = v_y - u_y;
    let gap_r = w_y - v_y;
    if gap_l + gap_r > 0.0 {
        if gap_l < gap_r {
            (v_x - u_x) + (u_x - w_x) * (gap_l / (gap_l + gap_r))
        } else {
            (v_x - w_x) + (w_x - u_x) * (gap_r / (gap_l + gap_r))
        }
    } else {
        0.0
    }
}

/// Like edge_sign but with x and y transposed.
pub fn trans_sign(u_x: Real, u_y: Real, v_x: Real, v_y: Real, w_x: Real, w_y: Real) -> Real {
    debug_assert!(trans_leq(u_x, u_y, v_x, v_y) && trans_leq(v_x, v_y, w_x, w_y));
    let gap_l = v_y - u_y;
    let gap_r = w_y - v_y;
    if gap_l + gap_r > 0.0 {
        (v_x - w_x) * gap_l + (v_x - u_x) * gap_r
    } else {
        0.0
    }
}

/// L1 distance between two vertices.
#[inline]
pub fn vert_l1_dist(u_x: Real, u_y: Real, v_x: Real, v_y: Real) -> Real {
    (u_x - v_x).abs() + (u_y - v_y).abs()
}

/// Numerically stable interpolation: returns (b*x + a*y) / (a + b),
/// or (x + y) / 2 if a == b == 0. Requires a, b >= 0 and enforces this
/// in the rare case that one argument is slightly negative.
/// Guarantees MIN(x,y) <= result <= MAX(x,y).
#[inline]
pub fn real_interpolate(mut a: Real, x: Real, mut b: Real, y: Real) -> Real {
    if a < 0.0 {
        a = 0.0;
    }
    if b < 0.0 {
        b = 0.0;
    }
    if a <= b {
        if b == 0.0 {
            x / 2.0 + y / 2.0
        } else {
            x + (y - x) * (a / (a + b))
        }
    } else {
        y + (x - y) * (b / (a + b))
    }
}

/// Compute the intersection point of edges (o1,d1) and (o2,d2).
/// Returns (x, y) of the intersection.
/// The result is guaranteed to lie within the bounding rectangle of both edges.
pub fn edge_intersect(
    o1_x: Real,
    o1_y: Real,
    d1_x: Real,
    d1_y: Real,
    o2_x: Real,
    o2_y: Real,
    d2_x: Real,
    d2_y: Real,
) -> (Real, Real) {
    // The two coordinates are computed independently: x under the vert_leq
    // ordering, y under the trans_leq ordering. This keeps each within the
    // corresponding interval even when the edges are nearly parallel.
    let v_x;
    {
        let (mut a_x, mut a_y) = (o1_x, o1_y);
        let (mut b_x, mut b_y) = (d1_x, d1_y);
        let (mut c_x, mut c_y) = (o2_x, o2_y);
        let (mut d_x, mut d_y) = (d2_x, d2_y);

        if !vert_leq(a_x, a_y, b_x, b_y) {
            core::mem::swap(&mut a_x, &mut b_x);
            core::mem::swap(&mut a_y, &mut b_y);
        }
        if !vert_leq(c_x, c_y, d_x, d_y) {
            core::mem::swap(&mut c_x, &mut d_x);
            core::mem::swap(&mut c_y, &mut d_y);
        }
        if !vert_leq(a_x, a_y, c_x, c_y) {
            core::mem::swap(&mut a_x, &mut c_x);
            core::mem::swap(&mut a_y, &mut c_y);
            core::mem::swap(&mut b_x, &mut d_x);
            core::mem::swap(&mut b_y, &mut d_y);
        }

        if !vert_leq(c_x, c_y, b_x, b_y) {
            // Technically, not intersecting; use the midpoint of the overlap gap.
            v_x = c_x / 2.0 + b_x / 2.0;
        } else if vert_leq(b_x, b_y, d_x, d_y) {
            // Interpolate between c and b.
            let mut z1 = edge_eval(a_x, a_y, c_x, c_y, b_x, b_y);
            let mut z2 = edge_eval(c_x, c_y, b_x, b_y, d_x, d_y);
            if z1 + z2 < 0.0 {
                z1 = -z1;
                z2 = -z2;
            }
            v_x = real_interpolate(z1, c_x, z2, b_x);
        } else {
            // Interpolate between c and d.
            let mut z1 = edge_sign(a_x, a_y, c_x, c_y, b_x, b_y);
            let mut z2 = -edge_sign(a_x, a_y, d_x, d_y, b_x, b_y);
            if z1 + z2 < 0.0 {
                z1 = -z1;
                z2 = -z2;
            }
            v_x = real_interpolate(z1, c_x, z2, d_x);
        }
    }

    let v_y;
    {
        let (mut a_x, mut a_y) = (o1_x, o1_y);
        let (mut b_x, mut b_y) = (d1_x, d1_y);
        let (mut c_x, mut c_y) = (o2_x, o2_y);
        let (mut d_x, mut d_y) = (d2_x, d2_y);

        if !trans_leq(a_x, a_y, b_x, b_y) {
            core::mem::swap(&mut a_x, &mut b_x);
            core::mem::swap(&mut a_y, &mut b_y);
        }
        if !trans_leq(c_x, c_y, d_x, d_y) {
            core::mem::swap(&mut c_x, &mut d_x);
            core::mem::swap(&mut c_y, &mut d_y);
        }
        if !trans_leq(a_x, a_y, c_x, c_y) {
            core::mem::swap(&mut a_x, &mut c_x);
            core::mem::swap(&mut a_y, &mut c_y);
            core::mem::swap(&mut b_x, &mut d_x);
            core::mem::swap(&mut b_y, &mut d_y);
        }

        if !trans_leq(c_x, c_y, b_x, b_y) {
            v_y = c_y / 2.0 + b_y / 2.0;
        } else if trans_leq(b_x, b_y, d_x, d_y) {
            let mut z1 = trans_eval(a_x, a_y, c_x, c_y, b_x, b_y);
            let mut z2 = trans_eval(c_x, c_y, b_x, b_y, d_x, d_y);
            if z1 + z2 < 0.0 {
                z1 = -z1;
                z2 = -z2;
            }
            v_y = real_interpolate(z1, c_y, z2, b_y);
        } else {
            let mut z1 = trans_sign(a_x, a_y, c_x, c_y, b_x, b_y);
            let mut z2 = -trans_sign(a_x, a_y, d_x, d_y, b_x, b_y);
            if z1 + z2 < 0.0 {
                z1 = -z1;
                z2 = -z2;
            }
            v_y = real_interpolate(z1, c_y, z2, d_y);
        }
    }

    (v_x, v_y)
}
