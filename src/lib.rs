// sweeptess: sweep-line polygon interior computation
// Copyright 2025 Lars Brubaker
// License: SGI Free Software License B (MIT-compatible)
//
// Feed contours into a [`Tessellator`], call `finish()`, and read back the
// classified half-edge mesh or the boundary outlines.  Self-intersecting
// and overlapping input is resolved during the sweep; the chosen
// [`WindingRule`] decides which regions count as interior.

mod dict;
pub mod geom;
pub mod mesh;
mod priorityq;
mod sweep;
mod tess;

pub use sweep::MAX_COORD;
pub use tess::{CombineFn, TessError, Tessellator, WindingRule};

pub use mesh::{EdgeIdx, FaceIdx, Mesh, VertIdx, INVALID};
