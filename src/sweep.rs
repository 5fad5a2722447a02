// Copyright 2025 Lars Brubaker
// License: SGI Free Software License B (MIT-compatible)
//
// Sweep-line computation of the polygon interior.
//
// Input contours are a soup of edges carrying winding numbers.  The sweep
// moves left to right (lexicographic x then y), maintaining:
//   - a priority queue of pending event vertices (src/priorityq.rs),
//   - a dictionary of active regions between adjacent sweep-crossing edges
//     (src/dict.rs), ordered bottom to top.
// Self-intersections are resolved by splitting edges and synthesizing
// vertices as they are discovered; when the sweep finishes, every face of
// the mesh has a consistent winding number and an "inside" classification
// under the session's winding rule.
//
// Active edges are oriented right to left: e_up->Org is the unprocessed
// (right) endpoint, e_up->Dst the processed (left) one.

use log::debug;

use crate::dict::{Dict, NodeIdx, DICT_HEAD};
use crate::geom::{
    edge_eval, edge_intersect, edge_sign, vert_eq, vert_l1_dist, vert_leq, Real,
};
use crate::mesh::{sym, EdgeIdx, Mesh, VertIdx, E_HEAD, F_HEAD, INVALID, V_HEAD};
use crate::priorityq::{EventKey, PriorityQ};
use crate::tess::{CombineFn, TessError, WindingRule};

/// Default coordinate magnitude limit.  The session layer clamps input to
/// ±this so the sentinel edges below stay strictly outside all input.
pub const MAX_COORD: Real = 1.0e150;

/// A region of the sweep plane, bounded above by `e_up` and below by the
/// upper edge of the next region down in the dictionary.
#[derive(Clone, Debug)]
struct ActiveRegion {
    /// Upper boundary edge, oriented right to left.
    e_up: EdgeIdx,
    /// Dictionary node holding this region.
    node_up: NodeIdx,
    /// Winding number of the region (used by the winding rule).
    winding_number: i32,
    inside: bool,
    sentinel: bool,
    /// Set when the upper or lower boundary changed and the pair must be
    /// re-checked for splices and intersections.
    dirty: bool,
    /// The upper edge is temporary, installed for an event vertex with no
    /// right-going edges; it is replaced when its right endpoint is swept.
    fix_upper_edge: bool,
}

#[inline]
fn vc(mesh: &Mesh, v: VertIdx) -> (Real, Real) {
    let vt = &mesh.verts[v as usize];
    (vt.x, vt.y)
}

fn add_winding(mesh: &mut Mesh, e_dst: EdgeIdx, e_src: EdgeIdx) {
    let w = mesh.edges[e_src as usize].winding;
    let ws = mesh.edges[sym(e_src) as usize].winding;
    mesh.edges[e_dst as usize].winding += w;
    mesh.edges[sym(e_dst) as usize].winding += ws;
}

/// Dictionary ordering: does region `r1` lie at or below `r2`?  Both
/// upper edges cross the sweep line through `event`.
fn edge_leq(mesh: &Mesh, regions: &[ActiveRegion], event: VertIdx, r1: u32, r2: u32) -> bool {
    let e1 = regions[r1 as usize].e_up;
    let e2 = regions[r2 as usize].e_up;
    let o1 = mesh.edges[e1 as usize].org;
    let o2 = mesh.edges[e2 as usize].org;
    let d1 = mesh.dst(e1);
    let d2 = mesh.dst(e2);

    let (ex, ey) = vc(mesh, event);
    let (o1x, o1y) = vc(mesh, o1);
    let (o2x, o2y) = vc(mesh, o2);
    let (d1x, d1y) = vc(mesh, d1);
    let (d2x, d2y) = vc(mesh, d2);

    if d1 == event {
        if d2 == event {
            // Both edges end at the event: sort by slope, anchored at
            // whichever origin is leftmost.
            if vert_leq(o1x, o1y, o2x, o2y) {
                return edge_sign(d2x, d2y, o1x, o1y, o2x, o2y) <= 0.0;
            }
            return edge_sign(d1x, d1y, o2x, o2y, o1x, o1y) >= 0.0;
        }
        return edge_sign(d2x, d2y, ex, ey, o2x, o2y) <= 0.0;
    }
    if d2 == event {
        return edge_sign(d1x, d1y, ex, ey, o1x, o1y) >= 0.0;
    }

    edge_eval(d1x, d1y, ex, ey, o1x, o1y) >= edge_eval(d2x, d2y, ex, ey, o2x, o2y)
}

pub(crate) struct Sweep<'a> {
    mesh: &'a mut Mesh,
    dict: Dict,
    pq: PriorityQ,
    regions: Vec<ActiveRegion>,
    free_regions: Vec<u32>,
    event_vert: VertIdx,
    event_x: Real,
    event_y: Real,
    winding_rule: WindingRule,
    combine: Option<&'a mut CombineFn>,
    next_index: u32,
    max_coord: Real,
}

impl<'a> Sweep<'a> {
    pub fn new(
        mesh: &'a mut Mesh,
        winding_rule: WindingRule,
        combine: Option<&'a mut CombineFn>,
        next_index: u32,
        max_coord: Real,
    ) -> Self {
        Sweep {
            mesh,
            dict: Dict::new(),
            pq: PriorityQ::new(),
            regions: Vec::new(),
            free_regions: Vec::new(),
            event_vert: INVALID,
            event_x: 0.0,
            event_y: 0.0,
            winding_rule,
            combine,
            next_index,
            max_coord,
        }
    }

    /// Run the sweep to completion: afterwards every face of the mesh has a
    /// correct `inside` flag and all self-intersections are mesh vertices.
    /// Returns the next unassigned output index.
    pub fn compute_interior(mut self) -> Result<u32, TessError> {
        self.remove_degenerate_edges();
        self.init_priority_q();
        self.init_edge_dict();

        while let Some(key) = self.pq.extract_min() {
            let v = key.vert;
            // Merge any queued vertices coincident with this one, so each
            // distinct position is swept exactly once.
            loop {
                match self.pq.minimum() {
                    Some(k) if vert_eq(k.x, k.y, key.x, key.y) => {}
                    _ => break,
                }
                let next = match self.pq.extract_min() {
                    Some(k) => k,
                    None => break,
                };
                let e1 = self.mesh.verts[v as usize].an_edge;
                let e2 = self.mesh.verts[next.vert as usize].an_edge;
                self.splice_merge_vertices(e1, e2);
            }
            self.sweep_event(v)?;
        }

        self.done_edge_dict();
        self.remove_degenerate_faces();

        let inside = self
            .mesh
            .face_iter()
            .filter(|&f| self.mesh.faces[f as usize].inside)
            .count();
        debug!("interior computed: {} inside faces", inside);

        Ok(self.next_index)
    }

    // ──────────────────────── Region bookkeeping ────────────────────────

    fn alloc_region(&mut self, reg: ActiveRegion) -> u32 {
        if let Some(i) = self.free_regions.pop() {
            self.regions[i as usize] = reg;
            i
        } else {
            self.regions.push(reg);
            (self.regions.len() - 1) as u32
        }
    }

    #[inline]
    fn region_below(&self, reg: u32) -> u32 {
        self.dict
            .key(self.dict.pred(self.regions[reg as usize].node_up))
    }

    #[inline]
    fn region_above(&self, reg: u32) -> u32 {
        self.dict
            .key(self.dict.succ(self.regions[reg as usize].node_up))
    }

    fn dict_insert_before(&mut self, node: NodeIdx, key: u32) -> NodeIdx {
        let mesh: &Mesh = &*self.mesh;
        let regions = &self.regions;
        let event = self.event_vert;
        let leq = |a: u32, b: u32| edge_leq(mesh, regions, event, a, b);
        self.dict.insert_before(node, key, &leq)
    }

    fn delete_region(&mut self, reg: u32) {
        if self.regions[reg as usize].fix_upper_edge {
            // A temporary edge may only be discarded while its winding is
            // still zero.
            debug_assert_eq!(
                self.mesh.edges[self.regions[reg as usize].e_up as usize].winding,
                0
            );
        }
        let e_up = self.regions[reg as usize].e_up;
        self.mesh.edges[e_up as usize].active_region = INVALID;
        self.dict.delete(self.regions[reg as usize].node_up);
        self.free_regions.push(reg);
    }

    /// Replace the temporary upper edge of `reg` with the permanent `e_new`.
    fn fix_upper_edge(&mut self, reg: u32, e_new: EdgeIdx) {
        debug_assert!(self.regions[reg as usize].fix_upper_edge);
        let old = self.regions[reg as usize].e_up;
        self.mesh.delete_edge(old);
        self.regions[reg as usize].fix_upper_edge = false;
        self.regions[reg as usize].e_up = e_new;
        self.mesh.edges[e_new as usize].active_region = reg;
    }

    /// Topmost region whose upper edge shares the given region's origin,
    /// fixing a temporary edge along the way when one is found.
    fn top_left_region(&mut self, mut reg: u32) -> u32 {
        let org = self.mesh.edges[self.regions[reg as usize].e_up as usize].org;
        loop {
            reg = self.region_above(reg);
            if self.mesh.edges[self.regions[reg as usize].e_up as usize].org != org {
                break;
            }
        }
        if self.regions[reg as usize].fix_upper_edge {
            let below = self.region_below(reg);
            let below_e_up = self.regions[below as usize].e_up;
            let lnext = self.mesh.edges[self.regions[reg as usize].e_up as usize].lnext;
            let e = self.mesh.connect(sym(below_e_up), lnext);
            self.fix_upper_edge(reg, e);
            reg = self.region_above(reg);
        }
        reg
    }

    /// Topmost region whose upper edge shares the given region's
    /// destination.
    fn top_right_region(&self, mut reg: u32) -> u32 {
        let dst = self.mesh.dst(self.regions[reg as usize].e_up);
        loop {
            reg = self.region_above(reg);
            if self.mesh.dst(self.regions[reg as usize].e_up) != dst {
                break;
            }
        }
        reg
    }

    /// Add a new active region just below `reg_above`, with `e_new_up` as
    /// its upper edge.  Winding number and inside flag are left for the
    /// caller.
    fn add_region_below(&mut self, reg_above: u32, e_new_up: EdgeIdx) -> u32 {
        let reg = self.alloc_region(ActiveRegion {
            e_up: e_new_up,
            node_up: DICT_HEAD,
            winding_number: 0,
            inside: false,
            sentinel: false,
            dirty: false,
            fix_upper_edge: false,
        });
        let node_above = self.regions[reg_above as usize].node_up;
        let node = self.dict_insert_before(node_above, reg);
        self.regions[reg as usize].node_up = node;
        self.mesh.edges[e_new_up as usize].active_region = reg;
        reg
    }

    fn compute_winding(&mut self, reg: u32) {
        let above = self.region_above(reg);
        let w = self.regions[above as usize].winding_number
            + self.mesh.edges[self.regions[reg as usize].e_up as usize].winding;
        self.regions[reg as usize].winding_number = w;
        self.regions[reg as usize].inside = self.winding_rule.is_inside(w);
    }

    /// The upper edge of `reg` has been fully swept: transfer the region's
    /// inside flag to the face it bounds and retire the region.
    fn finish_region(&mut self, reg: u32) {
        let e = self.regions[reg as usize].e_up;
        let f = self.mesh.edges[e as usize].lface;
        self.mesh.faces[f as usize].inside = self.regions[reg as usize].inside;
        self.mesh.faces[f as usize].an_edge = e;
        self.delete_region(reg);
    }

    /// Finish the chain of regions from `reg_first` down to (not
    /// including) `reg_last`; INVALID walks as far as the shared origin
    /// extends.  Returns the bottommost left-going edge at the event.
    fn finish_left_regions(&mut self, reg_first: u32, reg_last: u32) -> EdgeIdx {
        let mut reg_prev = reg_first;
        let mut e_prev = self.regions[reg_first as usize].e_up;

        while reg_prev != reg_last {
            self.regions[reg_prev as usize].fix_upper_edge = false;
            let reg = self.region_below(reg_prev);
            let mut e = self.regions[reg as usize].e_up;

            if self.mesh.edges[e as usize].org != self.mesh.edges[e_prev as usize].org {
                if !self.regions[reg as usize].fix_upper_edge {
                    self.finish_region(reg_prev);
                    break;
                }
                // The region below carries a temporary edge; replace it
                // with one ending at the proper origin.
                let lprev = self.mesh.lprev(e_prev);
                let e_new = self.mesh.connect(lprev, sym(e));
                self.fix_upper_edge(reg, e_new);
                e = e_new;
            }

            // Relink so that e_prev->Onext == e.
            if self.mesh.edges[e_prev as usize].onext != e {
                let e_oprev = self.mesh.oprev(e);
                self.mesh.splice(e_oprev, e);
                self.mesh.splice(e_prev, e);
            }

            self.finish_region(reg_prev);
            e_prev = self.regions[reg as usize].e_up;
            reg_prev = reg;
        }
        e_prev
    }

    /// Insert the right-going edges `e_first..e_last` (CCW around the
    /// event origin) into the dictionary.  `e_top_left` may be INVALID
    /// to derive it from the topmost new region.
    fn add_right_edges(
        &mut self,
        reg_up: u32,
        e_first: EdgeIdx,
        e_last: EdgeIdx,
        e_top_left: EdgeIdx,
        clean_up: bool,
    ) {
        let mut e = e_first;
        loop {
            debug_assert!(self.mesh.edge_goes_right(e));
            self.add_region_below(reg_up, sym(e));
            e = self.mesh.edges[e as usize].onext;
            if e == e_last {
                break;
            }
        }

        let mut e_top_left = e_top_left;
        if e_top_left == INVALID {
            let below = self.region_below(reg_up);
            e_top_left = self.mesh.rprev(self.regions[below as usize].e_up);
        }

        let mut reg_prev = reg_up;
        let mut e_prev = e_top_left;
        let mut first_time = true;
        loop {
            let reg = self.region_below(reg_prev);
            let e = sym(self.regions[reg as usize].e_up);
            if self.mesh.edges[e as usize].org != self.mesh.edges[e_prev as usize].org {
                break;
            }

            if self.mesh.edges[e as usize].onext != e_prev {
                // Unlink e and relink it below e_prev.
                let e_oprev = self.mesh.oprev(e);
                self.mesh.splice(e_oprev, e);
                let e_prev_oprev = self.mesh.oprev(e_prev);
                self.mesh.splice(e_prev_oprev, e);
            }

            let w = self.regions[reg_prev as usize].winding_number
                - self.mesh.edges[e as usize].winding;
            self.regions[reg as usize].winding_number = w;
            self.regions[reg as usize].inside = self.winding_rule.is_inside(w);

            // Two outgoing edges with identical slope are merged before any
            // intersection tests.
            self.regions[reg_prev as usize].dirty = true;
            if !first_time && self.check_for_right_splice(reg_prev) {
                add_winding(self.mesh, e, e_prev);
                self.delete_region(reg_prev);
                self.mesh.delete_edge(e_prev);
            }
            first_time = false;
            reg_prev = reg;
            e_prev = e;
        }
        self.regions[reg_prev as usize].dirty = true;

        if clean_up {
            self.walk_dirty_regions(reg_prev);
        }
    }

    // ──────────────────────── Vertex combination ────────────────────────

    fn out_idx(&self, v: VertIdx) -> Option<u32> {
        let i = self.mesh.verts[v as usize].idx;
        if i == INVALID {
            None
        } else {
            Some(i)
        }
    }

    fn call_combine(
        &mut self,
        v: VertIdx,
        sources: [Option<u32>; 4],
        weights: [Real; 4],
        is_intersect: bool,
    ) {
        let (x, y) = vc(self.mesh, v);
        let idx = match self.combine.as_mut() {
            Some(hook) => hook(x, y, sources, weights),
            None if is_intersect => {
                let i = self.next_index;
                self.next_index += 1;
                i
            }
            // A merged vertex keeps the surviving vertex's index.
            None => return,
        };
        self.mesh.verts[v as usize].idx = idx;
    }

    /// Merge the origins of e1 and e2 into one vertex (e1's survives),
    /// notifying the combination hook first.
    fn splice_merge_vertices(&mut self, e1: EdgeIdx, e2: EdgeIdx) {
        let v1 = self.mesh.edges[e1 as usize].org;
        let v2 = self.mesh.edges[e2 as usize].org;
        let sources = [self.out_idx(v1), self.out_idx(v2), None, None];
        self.call_combine(v1, sources, [0.5, 0.5, 0.0, 0.0], false);
        self.mesh.splice(e1, e2);
    }

    fn get_intersect_data(
        &mut self,
        isect: VertIdx,
        org_up: VertIdx,
        dst_up: VertIdx,
        org_lo: VertIdx,
        dst_lo: VertIdx,
    ) {
        let (ix, iy) = vc(self.mesh, isect);
        let edge_weights = |org: VertIdx, dst: VertIdx| {
            let (ox, oy) = vc(self.mesh, org);
            let (dx, dy) = vc(self.mesh, dst);
            let t1 = vert_l1_dist(ox, oy, ix, iy);
            let t2 = vert_l1_dist(dx, dy, ix, iy);
            (0.5 * t2 / (t1 + t2), 0.5 * t1 / (t1 + t2))
        };
        let (w0, w1) = edge_weights(org_up, dst_up);
        let (w2, w3) = edge_weights(org_lo, dst_lo);
        let sources = [
            self.out_idx(org_up),
            self.out_idx(dst_up),
            self.out_idx(org_lo),
            self.out_idx(dst_lo),
        ];
        self.call_combine(isect, sources, [w0, w1, w2, w3], true);
    }

    // ──────────────────────── Splice / intersection checks ──────────────

    /// Restore the dictionary ordering at the right (origin) endpoints of
    /// the upper and lower edge.  Returns true if topology changed.
    fn check_for_right_splice(&mut self, reg_up: u32) -> bool {
        let reg_lo = self.region_below(reg_up);
        let e_up = self.regions[reg_up as usize].e_up;
        let e_lo = self.regions[reg_lo as usize].e_up;
        let org_up = self.mesh.edges[e_up as usize].org;
        let org_lo = self.mesh.edges[e_lo as usize].org;
        let (oux, ouy) = vc(self.mesh, org_up);
        let (olx, oly) = vc(self.mesh, org_lo);

        if vert_leq(oux, ouy, olx, oly) {
            let (dlx, dly) = vc(self.mesh, self.mesh.dst(e_lo));
            if edge_sign(dlx, dly, oux, ouy, olx, oly) > 0.0 {
                return false;
            }
            if !vert_eq(oux, ouy, olx, oly) {
                // Splice org_up into e_lo.
                self.mesh.split_edge(sym(e_lo));
                let e_lo_oprev = self.mesh.oprev(e_lo);
                self.mesh.splice(e_up, e_lo_oprev);
                self.regions[reg_up as usize].dirty = true;
                self.regions[reg_lo as usize].dirty = true;
            } else if org_up != org_lo {
                // Coincident but distinct vertices: merge, discarding
                // org_up.
                let h = self.mesh.verts[org_up as usize].pq_handle;
                self.pq.delete(h);
                let e_lo_oprev = self.mesh.oprev(e_lo);
                self.splice_merge_vertices(e_lo_oprev, e_up);
            }
        } else {
            let (dux, duy) = vc(self.mesh, self.mesh.dst(e_up));
            if edge_sign(dux, duy, olx, oly, oux, ouy) < 0.0 {
                return false;
            }
            // org_lo lies on e_up: splice it in.
            let above = self.region_above(reg_up);
            self.regions[above as usize].dirty = true;
            self.regions[reg_up as usize].dirty = true;
            self.mesh.split_edge(sym(e_up));
            let e_lo_oprev = self.mesh.oprev(e_lo);
            self.mesh.splice(e_lo_oprev, e_up);
        }
        true
    }

    /// The left-endpoint counterpart of check_for_right_splice.  The
    /// destinations are known to be distinct.
    fn check_for_left_splice(&mut self, reg_up: u32) -> bool {
        let reg_lo = self.region_below(reg_up);
        let e_up = self.regions[reg_up as usize].e_up;
        let e_lo = self.regions[reg_lo as usize].e_up;
        let (dux, duy) = vc(self.mesh, self.mesh.dst(e_up));
        let (dlx, dly) = vc(self.mesh, self.mesh.dst(e_lo));
        debug_assert!(!vert_eq(dux, duy, dlx, dly));

        if vert_leq(dux, duy, dlx, dly) {
            let (oux, ouy) = vc(self.mesh, self.mesh.edges[e_up as usize].org);
            if edge_sign(dux, duy, dlx, dly, oux, ouy) < 0.0 {
                return false;
            }
            // dst_lo lies on e_up: splice it in.
            let above = self.region_above(reg_up);
            self.regions[above as usize].dirty = true;
            self.regions[reg_up as usize].dirty = true;
            let e = self.mesh.split_edge(e_up);
            self.mesh.splice(sym(e_lo), e);
            let lf = self.mesh.edges[e as usize].lface;
            self.mesh.faces[lf as usize].inside = self.regions[reg_up as usize].inside;
        } else {
            let (olx, oly) = vc(self.mesh, self.mesh.edges[e_lo as usize].org);
            if edge_sign(dlx, dly, dux, duy, olx, oly) > 0.0 {
                return false;
            }
            // dst_up lies on e_lo.
            self.regions[reg_up as usize].dirty = true;
            self.regions[reg_lo as usize].dirty = true;
            let e = self.mesh.split_edge(e_lo);
            let e_up_lnext = self.mesh.edges[e_up as usize].lnext;
            self.mesh.splice(e_up_lnext, sym(e_lo));
            let rf = self.mesh.rface(e);
            self.mesh.faces[rf as usize].inside = self.regions[reg_up as usize].inside;
        }
        true
    }

    /// Test the upper and lower edges of `reg_up` for an interior
    /// intersection, splitting both edges there when one exists.  Returns
    /// true when the current event was spliced into an edge and the
    /// caller's walk must restart.
    fn check_for_intersect(&mut self, mut reg_up: u32) -> bool {
        let mut reg_lo = self.region_below(reg_up);
        let mut e_up = self.regions[reg_up as usize].e_up;
        let e_lo = self.regions[reg_lo as usize].e_up;
        let org_up = self.mesh.edges[e_up as usize].org;
        let org_lo = self.mesh.edges[e_lo as usize].org;
        let dst_up = self.mesh.dst(e_up);
        let dst_lo = self.mesh.dst(e_lo);

        let (oux, ouy) = vc(self.mesh, org_up);
        let (olx, oly) = vc(self.mesh, org_lo);
        let (dux, duy) = vc(self.mesh, dst_up);
        let (dlx, dly) = vc(self.mesh, dst_lo);
        let (ex, ey) = (self.event_x, self.event_y);

        debug_assert!(!vert_eq(dlx, dly, dux, duy));
        debug_assert!(org_up != self.event_vert && org_lo != self.event_vert);
        debug_assert!(
            !self.regions[reg_up as usize].fix_upper_edge
                && !self.regions[reg_lo as usize].fix_upper_edge
        );

        if org_up == org_lo {
            return false; // right endpoints coincide
        }

        if ouy.min(duy) > oly.max(dly) {
            return false; // y ranges do not overlap
        }

        if vert_leq(oux, ouy, olx, oly) {
            if edge_sign(dlx, dly, oux, ouy, olx, oly) > 0.0 {
                return false;
            }
        } else if edge_sign(dux, duy, olx, oly, oux, ouy) < 0.0 {
            return false;
        }

        let (mut ix, mut iy) = edge_intersect(dux, duy, oux, ouy, dlx, dly, olx, oly);

        debug_assert!(ouy.min(duy) <= iy && iy <= oly.max(dly));
        debug_assert!(dlx.min(dux) <= ix && ix <= olx.max(oux));

        // Keep the intersection at or right of the sweep line, and never
        // beyond the nearer origin.
        if vert_leq(ix, iy, ex, ey) {
            ix = ex;
            iy = ey;
        }
        let (omx, omy) = if vert_leq(oux, ouy, olx, oly) {
            (oux, ouy)
        } else {
            (olx, oly)
        };
        if vert_leq(omx, omy, ix, iy) {
            ix = omx;
            iy = omy;
        }

        if vert_eq(ix, iy, oux, ouy) || vert_eq(ix, iy, olx, oly) {
            // Intersection at one of the right endpoints.
            self.check_for_right_splice(reg_up);
            return false;
        }

        let up_wrong = !vert_eq(dux, duy, ex, ey) && edge_sign(dux, duy, ex, ey, ix, iy) >= 0.0;
        let lo_wrong = !vert_eq(dlx, dly, ex, ey) && edge_sign(dlx, dly, ex, ey, ix, iy) <= 0.0;

        if up_wrong || lo_wrong {
            // The new edge would pass on the wrong side of the sweep event,
            // or through it.
            if dst_lo == self.event_vert {
                // Splice dst_lo into e_up and process the new regions.
                self.mesh.split_edge(sym(e_up));
                self.mesh.splice(sym(e_lo), e_up);
                reg_up = self.top_left_region(reg_up);
                let below = self.region_below(reg_up);
                e_up = self.regions[below as usize].e_up;
                self.finish_left_regions(below, reg_lo);
                let e_oprev = self.mesh.oprev(e_up);
                self.add_right_edges(reg_up, e_oprev, e_up, e_up, true);
                return true;
            }
            if dst_up == self.event_vert {
                // Splice dst_up into e_lo.
                self.mesh.split_edge(sym(e_lo));
                let e_up_lnext = self.mesh.edges[e_up as usize].lnext;
                let e_lo_oprev = self.mesh.oprev(e_lo);
                self.mesh.splice(e_up_lnext, e_lo_oprev);
                reg_lo = reg_up;
                reg_up = self.top_right_region(reg_up);
                let below_e_up = self.regions[self.region_below(reg_up) as usize].e_up;
                let e = self.mesh.rprev(below_e_up);
                self.regions[reg_lo as usize].e_up = self.mesh.oprev(e_lo);
                let e_last = self.finish_left_regions(reg_lo, INVALID);
                let e_last_onext = self.mesh.edges[e_last as usize].onext;
                let e_up_rprev = self.mesh.rprev(e_up);
                self.add_right_edges(reg_up, e_last_onext, e_up_rprev, e, true);
                return true;
            }
            // Only split the offending edge(s), relocating the split vertex
            // to the event; the caller splices appropriately.
            if up_wrong {
                let above = self.region_above(reg_up);
                self.regions[above as usize].dirty = true;
                self.regions[reg_up as usize].dirty = true;
                self.mesh.split_edge(sym(e_up));
                let v = self.mesh.edges[e_up as usize].org;
                self.mesh.verts[v as usize].x = ex;
                self.mesh.verts[v as usize].y = ey;
            }
            if lo_wrong {
                self.regions[reg_up as usize].dirty = true;
                self.regions[reg_lo as usize].dirty = true;
                self.mesh.split_edge(sym(e_lo));
                let v = self.mesh.edges[e_lo as usize].org;
                self.mesh.verts[v as usize].x = ex;
                self.mesh.verts[v as usize].y = ey;
            }
            return false;
        }

        // General case: split both edges and splice the halves together at
        // the intersection point.
        self.mesh.split_edge(sym(e_up));
        self.mesh.split_edge(sym(e_lo));
        let e_lo_oprev = self.mesh.oprev(e_lo);
        self.mesh.splice(e_lo_oprev, e_up);
        let v = self.mesh.edges[e_up as usize].org;
        self.mesh.verts[v as usize].x = ix;
        self.mesh.verts[v as usize].y = iy;
        let handle = self.pq.insert(EventKey { x: ix, y: iy, vert: v });
        self.mesh.verts[v as usize].pq_handle = handle;
        self.get_intersect_data(v, org_up, dst_up, org_lo, dst_lo);

        let above = self.region_above(reg_up);
        self.regions[above as usize].dirty = true;
        self.regions[reg_up as usize].dirty = true;
        self.regions[reg_lo as usize].dirty = true;
        false
    }

    /// Re-check every pair of adjacent regions marked dirty, bottom up,
    /// until the ordering invariants hold again.
    fn walk_dirty_regions(&mut self, mut reg_up: u32) {
        let mut reg_lo = self.region_below(reg_up);

        loop {
            // Find the lowest dirty region.
            while self.regions[reg_lo as usize].dirty {
                reg_up = reg_lo;
                reg_lo = self.region_below(reg_lo);
            }
            if !self.regions[reg_up as usize].dirty {
                reg_lo = reg_up;
                reg_up = self.region_above(reg_up);
                if reg_up == INVALID || !self.regions[reg_up as usize].dirty {
                    return;
                }
            }
            self.regions[reg_up as usize].dirty = false;
            let mut e_up = self.regions[reg_up as usize].e_up;
            let mut e_lo = self.regions[reg_lo as usize].e_up;

            if self.mesh.dst(e_up) != self.mesh.dst(e_lo) && self.check_for_left_splice(reg_up)
            {
                // A temporary edge is no longer needed once the vertex it
                // was holding open has a permanent right-going edge.
                if self.regions[reg_lo as usize].fix_upper_edge {
                    self.delete_region(reg_lo);
                    self.mesh.delete_edge(e_lo);
                    reg_lo = self.region_below(reg_up);
                    e_lo = self.regions[reg_lo as usize].e_up;
                } else if self.regions[reg_up as usize].fix_upper_edge {
                    self.delete_region(reg_up);
                    self.mesh.delete_edge(e_up);
                    reg_up = self.region_above(reg_lo);
                    e_up = self.regions[reg_up as usize].e_up;
                }
            }

            let org_up = self.mesh.edges[e_up as usize].org;
            let org_lo = self.mesh.edges[e_lo as usize].org;
            let dst_up = self.mesh.dst(e_up);
            let dst_lo = self.mesh.dst(e_lo);
            if org_up != org_lo {
                if dst_up != dst_lo
                    && !self.regions[reg_up as usize].fix_upper_edge
                    && !self.regions[reg_lo as usize].fix_upper_edge
                    && (dst_up == self.event_vert || dst_lo == self.event_vert)
                {
                    if self.check_for_intersect(reg_up) {
                        // The walk restarted recursively.
                        return;
                    }
                } else {
                    self.check_for_right_splice(reg_up);
                }
            }

            if self.mesh.edges[e_up as usize].org == self.mesh.edges[e_lo as usize].org
                && self.mesh.dst(e_up) == self.mesh.dst(e_lo)
            {
                // Degenerate two-edge loop.
                add_winding(self.mesh, e_lo, e_up);
                self.delete_region(reg_up);
                self.mesh.delete_edge(e_up);
                reg_up = self.region_above(reg_lo);
            }
        }
    }

    // ──────────────────────── Event processing ────────────────────────

    /// The event vertex has no right-going edges of its own: connect it
    /// with a temporary fixable edge to be replaced when its matching
    /// right endpoint arrives.
    fn connect_right_vertex(&mut self, mut reg_up: u32, mut e_bottom_left: EdgeIdx) {
        let mut e_top_left = self.mesh.edges[e_bottom_left as usize].onext;
        let reg_lo = self.region_below(reg_up);
        let e_up = self.regions[reg_up as usize].e_up;
        let e_lo = self.regions[reg_lo as usize].e_up;
        let mut degenerate = false;

        if self.mesh.dst(e_up) != self.mesh.dst(e_lo) {
            self.check_for_intersect(reg_up);
        }

        // Splices of the rightmost vertices may have produced
        // degeneracies.
        let (oux, ouy) = vc(self.mesh, self.mesh.edges[e_up as usize].org);
        if vert_eq(oux, ouy, self.event_x, self.event_y) {
            let e_tl_oprev = self.mesh.oprev(e_top_left);
            self.mesh.splice(e_tl_oprev, e_up);
            reg_up = self.top_left_region(reg_up);
            let below = self.region_below(reg_up);
            e_top_left = self.regions[below as usize].e_up;
            self.finish_left_regions(below, reg_lo);
            degenerate = true;
        }
        let (olx, oly) = vc(self.mesh, self.mesh.edges[e_lo as usize].org);
        if vert_eq(olx, oly, self.event_x, self.event_y) {
            let e_lo_oprev = self.mesh.oprev(e_lo);
            self.mesh.splice(e_bottom_left, e_lo_oprev);
            e_bottom_left = self.finish_left_regions(reg_lo, INVALID);
            degenerate = true;
        }
        if degenerate {
            let ebl_onext = self.mesh.edges[e_bottom_left as usize].onext;
            self.add_right_edges(reg_up, ebl_onext, e_top_left, e_top_left, true);
            return;
        }

        // Connect to the closer of the two chain endpoints.
        let e_dst = if vert_leq(olx, oly, oux, ouy) {
            self.mesh.oprev(e_lo)
        } else {
            e_up
        };
        let e_bl_lprev = self.mesh.lprev(e_bottom_left);
        let e_new = self.mesh.connect(e_bl_lprev, e_dst);

        // Defer cleanup until the new edge is marked temporary, or it
        // could be deleted before the mark is applied.
        let e_new_onext = self.mesh.edges[e_new as usize].onext;
        self.add_right_edges(reg_up, e_new, e_new_onext, e_new_onext, false);
        let r = self.mesh.edges[sym(e_new) as usize].active_region;
        self.regions[r as usize].fix_upper_edge = true;
        self.walk_dirty_regions(reg_up);
    }

    /// The event lies exactly on an active edge: split that edge and merge
    /// the event into the split point, then re-dispatch.
    fn connect_left_degenerate(&mut self, reg_up: u32, v_event: VertIdx) -> Result<(), TessError> {
        let e = self.regions[reg_up as usize].e_up;
        let (ox, oy) = vc(self.mesh, self.mesh.edges[e as usize].org);
        if vert_eq(ox, oy, self.event_x, self.event_y) {
            // Coincident with an unprocessed origin; exact arithmetic
            // merges coincident events before dispatch, so this state is
            // unreachable from well-formed input.
            return Err(TessError::Inconsistency);
        }

        let (dx, dy) = vc(self.mesh, self.mesh.dst(e));
        if !vert_eq(dx, dy, self.event_x, self.event_y) {
            self.mesh.split_edge(sym(e));
            if self.regions[reg_up as usize].fix_upper_edge {
                // The edge was temporary; the unused piece is discarded.
                let e_onext = self.mesh.edges[e as usize].onext;
                self.mesh.delete_edge(e_onext);
                self.regions[reg_up as usize].fix_upper_edge = false;
            }
            let an_edge = self.mesh.verts[v_event as usize].an_edge;
            self.mesh.splice(an_edge, e);
            return self.sweep_event(v_event);
        }

        // Coincident with the processed destination of an active edge,
        // which exact arithmetic rules out as well.
        Err(TessError::Inconsistency)
    }

    /// The event vertex has only right-going edges: connect it leftward
    /// when it falls in an interior region, otherwise just start its
    /// chains.
    fn connect_left_vertex(&mut self, v_event: VertIdx) -> Result<(), TessError> {
        let an_edge = self.mesh.verts[v_event as usize].an_edge;

        // Probe the dictionary with a temporary region.
        self.regions.push(ActiveRegion {
            e_up: sym(an_edge),
            node_up: DICT_HEAD,
            winding_number: 0,
            inside: false,
            sentinel: false,
            dirty: false,
            fix_upper_edge: false,
        });
        let tmp = (self.regions.len() - 1) as u32;
        let node = {
            let mesh: &Mesh = &*self.mesh;
            let regions = &self.regions;
            let event = self.event_vert;
            let leq = |a: u32, b: u32| edge_leq(mesh, regions, event, a, b);
            self.dict.search(tmp, &leq)
        };
        self.regions.pop();

        let reg_up = self.dict.key(node);
        if reg_up == INVALID {
            return Err(TessError::Inconsistency);
        }
        let reg_lo = self.region_below(reg_up);
        if reg_lo == INVALID {
            return Ok(());
        }
        let e_up = self.regions[reg_up as usize].e_up;
        let e_lo = self.regions[reg_lo as usize].e_up;

        let (dux, duy) = vc(self.mesh, self.mesh.dst(e_up));
        let (oux, ouy) = vc(self.mesh, self.mesh.edges[e_up as usize].org);
        if edge_sign(dux, duy, self.event_x, self.event_y, oux, ouy) == 0.0 {
            return self.connect_left_degenerate(reg_up, v_event);
        }

        // Connect to the rightmost processed vertex of either chain.
        let (dlx, dly) = vc(self.mesh, self.mesh.dst(e_lo));
        let reg = if vert_leq(dlx, dly, dux, duy) {
            reg_up
        } else {
            reg_lo
        };

        if self.regions[reg_up as usize].inside || self.regions[reg as usize].fix_upper_edge {
            let e_new = if reg == reg_up {
                let e_up_lnext = self.mesh.edges[e_up as usize].lnext;
                self.mesh.connect(sym(an_edge), e_up_lnext)
            } else {
                let e_lo_dnext = self.mesh.dnext(e_lo);
                sym(self.mesh.connect(e_lo_dnext, an_edge))
            };
            if self.regions[reg as usize].fix_upper_edge {
                self.fix_upper_edge(reg, e_new);
            } else {
                let new_reg = self.add_region_below(reg_up, e_new);
                self.compute_winding(new_reg);
            }
            self.sweep_event(v_event)
        } else {
            // The vertex lies in an exterior region; its right-going
            // edges simply start new regions.
            self.add_right_edges(reg_up, an_edge, an_edge, INVALID, true);
            Ok(())
        }
    }

    /// Dispatch one event vertex.
    fn sweep_event(&mut self, v_event: VertIdx) -> Result<(), TessError> {
        self.event_vert = v_event;
        let (x, y) = vc(self.mesh, v_event);
        self.event_x = x;
        self.event_y = y;

        // Is this vertex the right endpoint of an edge already in the
        // dictionary?
        let an_edge = self.mesh.verts[v_event as usize].an_edge;
        let mut e = an_edge;
        while self.mesh.edges[e as usize].active_region == INVALID {
            e = self.mesh.edges[e as usize].onext;
            if e == an_edge {
                // All edges go right.
                return self.connect_left_vertex(v_event);
            }
        }

        let reg_up = self.top_left_region(self.mesh.edges[e as usize].active_region);
        let reg = self.region_below(reg_up);
        let e_top_left = self.regions[reg as usize].e_up;
        let e_bottom_left = self.finish_left_regions(reg, INVALID);

        if self.mesh.edges[e_bottom_left as usize].onext == e_top_left {
            // No right-going edges; install a temporary one.
            self.connect_right_vertex(reg_up, e_bottom_left);
        } else {
            let ebl_onext = self.mesh.edges[e_bottom_left as usize].onext;
            self.add_right_edges(reg_up, ebl_onext, e_top_left, e_top_left, true);
        }
        Ok(())
    }

    // ──────────────────────── Setup / teardown ────────────────────────

    /// Zero-length edges are removed by merging their endpoints; contours
    /// reduced to one or two edges are deleted entirely.
    fn remove_degenerate_edges(&mut self) {
        let mut e = self.mesh.edges[E_HEAD as usize].next;
        while e != E_HEAD {
            let mut e_next = self.mesh.edges[e as usize].next;
            let mut e_lnext = self.mesh.edges[e as usize].lnext;

            let org = self.mesh.edges[e as usize].org;
            let dst = self.mesh.dst(e);
            let (ox, oy) = vc(self.mesh, org);
            let (dx, dy) = vc(self.mesh, dst);
            if vert_eq(ox, oy, dx, dy) && self.mesh.edges[e_lnext as usize].lnext != e {
                self.splice_merge_vertices(e_lnext, e);
                self.mesh.delete_edge(e);
                e = e_lnext;
                e_lnext = self.mesh.edges[e as usize].lnext;
            }
            if self.mesh.edges[e_lnext as usize].lnext == e {
                if e_lnext != e {
                    if (e_lnext & !1) == e_next {
                        e_next = self.mesh.edges[e_next as usize].next;
                    }
                    self.mesh.delete_edge(e_lnext);
                }
                if (e & !1) == e_next {
                    e_next = self.mesh.edges[e_next as usize].next;
                }
                self.mesh.delete_edge(e);
            }
            e = e_next;
        }
    }

    fn init_priority_q(&mut self) {
        let mut n = 0usize;
        let mut v = self.mesh.verts[V_HEAD as usize].next;
        while v != V_HEAD {
            let (x, y) = vc(self.mesh, v);
            let handle = self.pq.insert(EventKey { x, y, vert: v });
            self.mesh.verts[v as usize].pq_handle = handle;
            n += 1;
            v = self.mesh.verts[v as usize].next;
        }
        self.pq.init();
        debug!("sweep queue initialized with {} vertices", n);
    }

    /// A horizontal self-loop edge far outside the input, guaranteeing the
    /// dictionary always has a region above and below any event.
    fn add_sentinel(&mut self, t: Real) {
        let s = 4.0 * self.max_coord;
        let e = self.mesh.make_edge();
        let org = self.mesh.edges[e as usize].org;
        let dst = self.mesh.dst(e);
        self.mesh.verts[org as usize].x = s;
        self.mesh.verts[org as usize].y = t;
        self.mesh.verts[dst as usize].x = -s;
        self.mesh.verts[dst as usize].y = t;
        // Initialize the event so the dictionary comparison is usable.
        self.event_vert = dst;
        self.event_x = -s;
        self.event_y = t;

        let reg = self.alloc_region(ActiveRegion {
            e_up: e,
            node_up: DICT_HEAD,
            winding_number: 0,
            inside: false,
            sentinel: true,
            dirty: false,
            fix_upper_edge: false,
        });
        self.mesh.edges[e as usize].active_region = reg;
        let node = self.dict_insert_before(DICT_HEAD, reg);
        self.regions[reg as usize].node_up = node;
    }

    fn init_edge_dict(&mut self) {
        let s = 4.0 * self.max_coord;
        self.add_sentinel(-s);
        self.add_sentinel(s);
    }

    fn done_edge_dict(&mut self) {
        let mut fixed_edges = 0u32;
        loop {
            let node = self.dict.min();
            if node == DICT_HEAD {
                break;
            }
            let reg = self.dict.key(node);
            if !self.regions[reg as usize].sentinel {
                debug_assert!(self.regions[reg as usize].fix_upper_edge);
                fixed_edges += 1;
                debug_assert_eq!(fixed_edges, 1);
            }
            debug_assert_eq!(self.regions[reg as usize].winding_number, 0);
            self.delete_region(reg);
        }
        let _ = fixed_edges;
    }

    /// Two-edge faces (including the spent sentinel loops) are deleted,
    /// folding their windings together.
    fn remove_degenerate_faces(&mut self) {
        let mut f = self.mesh.faces[F_HEAD as usize].next;
        while f != F_HEAD {
            let f_next = self.mesh.faces[f as usize].next;
            let e = self.mesh.faces[f as usize].an_edge;
            debug_assert!(self.mesh.edges[e as usize].lnext != e);

            let e_lnext = self.mesh.edges[e as usize].lnext;
            if self.mesh.edges[e_lnext as usize].lnext == e {
                let e_onext = self.mesh.edges[e as usize].onext;
                add_winding(self.mesh, e_onext, e);
                self.mesh.delete_edge(e);
            }
            f = f_next;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::mesh::Mesh;

    // Contour building as the session layer does it: self-loop for the
    // first vertex, split-and-advance for the rest.
    fn add_contour(mesh: &mut Mesh, pts: &[(Real, Real)], start_idx: u32) {
        let mut e = INVALID;
        for (i, &(x, y)) in pts.iter().enumerate() {
            e = if e == INVALID {
                let e0 = mesh.make_edge();
                mesh.splice(e0, sym(e0));
                e0
            } else {
                mesh.split_edge(e);
                mesh.edges[e as usize].lnext
            };
            let v = mesh.edges[e as usize].org;
            mesh.verts[v as usize].x = x;
            mesh.verts[v as usize].y = y;
            mesh.verts[v as usize].idx = start_idx + i as u32;
            mesh.edges[e as usize].winding = 1;
            mesh.edges[sym(e) as usize].winding = -1;
        }
    }

    fn inside_faces(mesh: &Mesh) -> Vec<u32> {
        mesh.face_iter()
            .filter(|&f| mesh.faces[f as usize].inside)
            .collect()
    }

    #[test]
    fn square_yields_one_inside_face() {
        let mut mesh = Mesh::new();
        add_contour(
            &mut mesh,
            &[(0.0, 0.0), (4.0, 0.0), (4.0, 4.0), (0.0, 4.0)],
            0,
        );
        let sweep = Sweep::new(&mut mesh, WindingRule::Odd, None, 4, MAX_COORD);
        let next = sweep.compute_interior().unwrap();
        assert_eq!(next, 4); // no vertices synthesized

        let inside = inside_faces(&mesh);
        assert_eq!(inside.len(), 1);
        assert_eq!(mesh.count_face_verts(inside[0]), 4);
    }

    #[test]
    fn square_with_hole_keeps_hole_outside() {
        let mut mesh = Mesh::new();
        // Outer CCW, inner CW (a hole under the nonzero rule).
        add_contour(
            &mut mesh,
            &[(0.0, 0.0), (4.0, 0.0), (4.0, 4.0), (0.0, 4.0)],
            0,
        );
        add_contour(
            &mut mesh,
            &[(1.0, 1.0), (1.0, 3.0), (3.0, 3.0), (3.0, 1.0)],
            4,
        );
        let sweep = Sweep::new(&mut mesh, WindingRule::NonZero, None, 8, MAX_COORD);
        sweep.compute_interior().unwrap();

        assert!(!inside_faces(&mesh).is_empty());
        // No inside face may lie entirely within the hole.
        for f in mesh.face_iter() {
            if !mesh.faces[f as usize].inside {
                continue;
            }
            let e0 = mesh.faces[f as usize].an_edge;
            let mut e = e0;
            let mut all_in_hole = true;
            loop {
                let v = mesh.edges[e as usize].org;
                let (x, y) = (mesh.verts[v as usize].x, mesh.verts[v as usize].y);
                if !(x > 1.0 && x < 3.0 && y > 1.0 && y < 3.0) {
                    all_in_hole = false;
                }
                e = mesh.edges[e as usize].lnext;
                if e == e0 {
                    break;
                }
            }
            assert!(!all_in_hole);
        }
    }

    #[test]
    fn bowtie_intersection_synthesizes_vertex() {
        let mut mesh = Mesh::new();
        // Self-intersecting quad crossing itself at (2, 2).
        add_contour(
            &mut mesh,
            &[(0.0, 0.0), (4.0, 4.0), (4.0, 0.0), (0.0, 4.0)],
            0,
        );
        let sweep = Sweep::new(&mut mesh, WindingRule::Odd, None, 4, MAX_COORD);
        let next = sweep.compute_interior().unwrap();
        assert_eq!(next, 5); // exactly one intersection vertex

        // The synthesized vertex sits at the crossing.
        let found = mesh.vertex_iter().any(|v| {
            mesh.verts[v as usize].idx == 4
                && (mesh.verts[v as usize].x - 2.0).abs() < 1e-9
                && (mesh.verts[v as usize].y - 2.0).abs() < 1e-9
        });
        assert!(found);
        assert_eq!(inside_faces(&mesh).len(), 2);
    }
}
