// Copyright 2025 Lars Brubaker
// License: SGI Free Software License B (MIT-compatible)
//
// Session façade over the sweep: contour construction, the finish step
// that computes the interior, and mesh / outline retrieval.
//
// A session is single-shot.  Contours go in via begin_contour /
// add_vertex / end_contour; finish() runs the sweep exactly once; after
// that the classified mesh can be inspected or reduced to boundary
// outlines.

use log::warn;
use thiserror::Error;

use crate::mesh::{sym, EdgeIdx, Mesh, INVALID};
use crate::sweep::{Sweep, MAX_COORD};
use crate::geom::Real;

/// How a region's winding number maps to "inside".
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum WindingRule {
    Odd,
    NonZero,
    Positive,
    Negative,
    AbsGeqTwo,
}

impl WindingRule {
    #[inline]
    pub fn is_inside(self, n: i32) -> bool {
        match self {
            WindingRule::Odd => n & 1 != 0,
            WindingRule::NonZero => n != 0,
            WindingRule::Positive => n > 0,
            WindingRule::Negative => n < 0,
            WindingRule::AbsGeqTwo => n >= 2 || n <= -2,
        }
    }
}

#[derive(Debug, Error, PartialEq, Eq)]
pub enum TessError {
    #[error("contour construction is already finished")]
    AlreadyFinished,
    #[error("no contour is open")]
    NoContour,
    #[error("the sweep has not been run yet")]
    NotFinished,
    #[error("mesh was reduced to outlines")]
    Outlined,
    #[error("internal inconsistency while sweeping")]
    Inconsistency,
}

/// Hook invoked when the sweep synthesizes or merges vertices.  Receives
/// the new position, up to four source output indices with their
/// interpolation weights, and returns the output index for the result.
pub type CombineFn = dyn FnMut(Real, Real, [Option<u32>; 4], [Real; 4]) -> u32;

pub struct Tessellator {
    mesh: Mesh,
    winding_rule: WindingRule,
    combine: Option<Box<CombineFn>>,
    /// Last edge of the contour under construction (its Org is the most
    /// recently added vertex), or INVALID between contours.
    last_edge: EdgeIdx,
    next_index: u32,
    clamped: u32,
    max_coord: Real,
    in_contour: bool,
    finished: bool,
    poisoned: bool,
    outlined: bool,
}

impl Tessellator {
    pub fn new(winding_rule: WindingRule) -> Self {
        Tessellator {
            mesh: Mesh::new(),
            winding_rule,
            combine: None,
            last_edge: INVALID,
            next_index: 0,
            clamped: 0,
            max_coord: MAX_COORD,
            in_contour: false,
            finished: false,
            poisoned: false,
            outlined: false,
        }
    }

    /// Lower the coordinate magnitude limit (input is clamped to ±limit).
    pub fn set_max_coord(&mut self, max_coord: Real) {
        self.max_coord = max_coord;
    }

    /// Install the vertex combination hook.
    pub fn on_combine<F>(&mut self, f: F)
    where
        F: FnMut(Real, Real, [Option<u32>; 4], [Real; 4]) -> u32 + 'static,
    {
        self.combine = Some(Box::new(f));
    }

    pub fn begin_contour(&mut self) -> Result<(), TessError> {
        if self.finished {
            return Err(TessError::AlreadyFinished);
        }
        self.in_contour = true;
        self.last_edge = INVALID;
        Ok(())
    }

    /// Append a vertex to the current contour.  Coordinates beyond
    /// ±max_coord are clamped.
    pub fn add_vertex(&mut self, x: Real, y: Real) -> Result<(), TessError> {
        if self.finished {
            return Err(TessError::AlreadyFinished);
        }
        if !self.in_contour {
            return Err(TessError::NoContour);
        }

        let mut clamped = false;
        let x = Self::clamp_coord(x, self.max_coord, &mut clamped);
        let y = Self::clamp_coord(y, self.max_coord, &mut clamped);
        if clamped {
            warn!("vertex coordinate clamped to ±{}", self.max_coord);
            self.clamped += 1;
        }

        let e = if self.last_edge == INVALID {
            // First vertex of the contour: a self-loop with one vertex on
            // each side.
            let e = self.mesh.make_edge();
            self.mesh.splice(e, sym(e));
            e
        } else {
            // Split to create the new vertex, then advance.
            self.mesh.split_edge(self.last_edge);
            self.mesh.edges[self.last_edge as usize].lnext
        };

        let v = self.mesh.edges[e as usize].org;
        self.mesh.verts[v as usize].x = x;
        self.mesh.verts[v as usize].y = y;
        self.mesh.verts[v as usize].idx = self.next_index;
        self.next_index += 1;

        // The winding of an edge says how the contour crosses it left to
        // right.
        self.mesh.edges[e as usize].winding = 1;
        self.mesh.edges[sym(e) as usize].winding = -1;

        self.last_edge = e;
        Ok(())
    }

    pub fn end_contour(&mut self) -> Result<(), TessError> {
        if self.finished {
            return Err(TessError::AlreadyFinished);
        }
        if !self.in_contour {
            return Err(TessError::NoContour);
        }
        self.in_contour = false;
        self.last_edge = INVALID;
        Ok(())
    }

    /// Run the sweep: resolve self-intersections and classify every face
    /// under the winding rule.  May be called once per session.
    pub fn finish(&mut self) -> Result<(), TessError> {
        if self.finished {
            return Err(TessError::AlreadyFinished);
        }
        self.finished = true;

        let combine = self.combine.as_deref_mut();
        let sweep = Sweep::new(
            &mut self.mesh,
            self.winding_rule,
            combine,
            self.next_index,
            self.max_coord,
        );
        match sweep.compute_interior() {
            Ok(next) => {
                self.next_index = next;
                Ok(())
            }
            Err(e) => {
                // The mesh is in an unknown intermediate state; the
                // session yields no results from here on.
                self.poisoned = true;
                Err(e)
            }
        }
    }

    /// Number of input vertices whose coordinates were clamped.
    pub fn clamped_vertex_count(&self) -> u32 {
        self.clamped
    }

    /// The classified mesh.  Unavailable before finish(), after a failed
    /// sweep, and after the mesh has been reduced to outlines.
    pub fn mesh(&self) -> Result<&Mesh, TessError> {
        if !self.finished {
            return Err(TessError::NotFinished);
        }
        if self.poisoned {
            return Err(TessError::Inconsistency);
        }
        if self.outlined {
            return Err(TessError::Outlined);
        }
        Ok(&self.mesh)
    }

    /// Reduce the mesh to the boundary between inside and outside and
    /// return the resulting closed loops, each a list of vertex positions
    /// in left-face-inside order.  The first call destroys the interior
    /// connectivity; further calls re-walk the reduced mesh.
    pub fn outlines(&mut self) -> Result<Vec<Vec<(Real, Real)>>, TessError> {
        if !self.finished {
            return Err(TessError::NotFinished);
        }
        if self.poisoned {
            return Err(TessError::Inconsistency);
        }
        if !self.outlined {
            self.mesh.set_winding_number(1, true);
            self.outlined = true;
        }

        let mut loops = Vec::new();
        let mut visited = vec![false; self.mesh.edges.len()];
        for e in self.mesh.edge_iter() {
            for half in [e, sym(e)] {
                if self.mesh.edges[half as usize].winding <= 0 {
                    continue;
                }
                if visited[half as usize] {
                    continue;
                }
                let mut contour = Vec::new();
                let mut cur = half;
                loop {
                    visited[cur as usize] = true;
                    let v = self.mesh.edges[cur as usize].org;
                    contour.push((self.mesh.verts[v as usize].x, self.mesh.verts[v as usize].y));
                    cur = self.mesh.edges[cur as usize].lnext;
                    if cur == half {
                        break;
                    }
                }
                loops.push(contour);
            }
        }
        Ok(loops)
    }

    #[inline]
    fn clamp_coord(c: Real, limit: Real, clamped: &mut bool) -> Real {
        if c < -limit {
            *clamped = true;
            return -limit;
        }
        if c > limit {
            *clamped = true;
            return limit;
        }
        c
    }
}
