// Copyright 2025 Lars Brubaker
// License: SGI Free Software License B (MIT-compatible)
//
// Half-edge mesh (planar subdivision) used throughout the sweep.
// All pointers are u32 indices into Vec arenas.
//
// Design:
//   - INVALID: u32::MAX  (null pointer equivalent)
//   - Half-edges allocated in pairs: edges[i] and edges[i^1] are always a pair.
//     sym(e) = e ^ 1.  Even index = e, odd index = eSym.
//   - Sentinel/dummy nodes:
//     - verts[0] = vHead (dummy vertex)
//     - faces[0] = fHead (dummy face)
//     - edges[0] = eHead, edges[1] = eHeadSym (dummy edge pair)
//   - New vertices/faces are inserted *before* the list head, so algorithms
//     walking the global lists never see elements created mid-walk.

use crate::geom::{vert_leq, Real};

pub const INVALID: u32 = u32::MAX;

/// Index into Mesh::verts
pub type VertIdx = u32;
/// Index into Mesh::faces
pub type FaceIdx = u32;
/// Index into Mesh::edges
pub type EdgeIdx = u32;

/// Compute the symmetric half-edge index (always the other half of the pair).
#[inline(always)]
pub fn sym(e: EdgeIdx) -> EdgeIdx {
    e ^ 1
}

#[derive(Clone, Debug)]
pub struct Vertex {
    pub next: VertIdx,
    pub prev: VertIdx,
    pub an_edge: EdgeIdx,
    pub x: Real,
    pub y: Real,
    /// Handle into the event queue while the sweep is running.
    pub pq_handle: i32,
    /// Output index: input order for contour vertices, combine-hook result
    /// (or a fresh index) for synthesized vertices, INVALID until assigned.
    pub idx: u32,
}

impl Default for Vertex {
    fn default() -> Self {
        Self {
            next: INVALID,
            prev: INVALID,
            an_edge: INVALID,
            x: 0.0,
            y: 0.0,
            pq_handle: 0,
            idx: INVALID,
        }
    }
}

#[derive(Clone, Debug)]
pub struct Face {
    pub next: FaceIdx,
    pub prev: FaceIdx,
    pub an_edge: EdgeIdx,
    /// True if this face is in the polygon interior under the winding rule.
    pub inside: bool,
}

impl Default for Face {
    fn default() -> Self {
        Self {
            next: INVALID,
            prev: INVALID,
            an_edge: INVALID,
            inside: false,
        }
    }
}

#[derive(Clone, Debug)]
pub struct HalfEdge {
    /// Next in the global edge list (even halves link to even halves,
    /// odd halves to odd halves).
    pub next: EdgeIdx,
    /// Next edge CCW around the origin vertex.
    pub onext: EdgeIdx,
    /// Next edge CCW around the left face.
    pub lnext: EdgeIdx,
    /// Origin vertex index.
    pub org: VertIdx,
    /// Left face index.
    pub lface: FaceIdx,
    /// Active region index (INVALID if not in the sweep dictionary).
    pub active_region: u32,
    /// Change in winding number when crossing from the right face to the left.
    pub winding: i32,
}

impl Default for HalfEdge {
    fn default() -> Self {
        Self {
            next: INVALID,
            onext: INVALID,
            lnext: INVALID,
            org: INVALID,
            lface: INVALID,
            active_region: INVALID,
            winding: 0,
        }
    }
}

/// The half-edge mesh.
pub struct Mesh {
    pub verts: Vec<Vertex>,
    pub faces: Vec<Face>,
    pub edges: Vec<HalfEdge>,
}

pub const V_HEAD: VertIdx = 0;
pub const F_HEAD: FaceIdx = 0;
pub const E_HEAD: EdgeIdx = 0;
pub const E_HEAD_SYM: EdgeIdx = 1;

impl Mesh {
    /// Create a new empty mesh with dummy sentinel nodes.
    pub fn new() -> Self {
        let mut m = Mesh {
            verts: Vec::new(),
            faces: Vec::new(),
            edges: Vec::new(),
        };

        let v_head = Vertex {
            next: V_HEAD,
            prev: V_HEAD,
            ..Vertex::default()
        };
        m.verts.push(v_head);

        let f_head = Face {
            next: F_HEAD,
            prev: F_HEAD,
            ..Face::default()
        };
        m.faces.push(f_head);

        let e_head = HalfEdge {
            next: E_HEAD,
            ..HalfEdge::default()
        };
        let e_head_sym = HalfEdge {
            next: E_HEAD_SYM,
            ..HalfEdge::default()
        };
        m.edges.push(e_head);
        m.edges.push(e_head_sym);

        m
    }

    // ──────────────────────── Navigation helpers ────────────────────────

    /// Destination vertex of e (= org of Sym).
    #[inline]
    pub fn dst(&self, e: EdgeIdx) -> VertIdx {
        self.edges[(e ^ 1) as usize].org
    }

    /// Right face of e (= lface of Sym).
    #[inline]
    pub fn rface(&self, e: EdgeIdx) -> FaceIdx {
        self.edges[(e ^ 1) as usize].lface
    }

    /// Oprev: Sym->Lnext (previous edge CCW around the origin).
    #[inline]
    pub fn oprev(&self, e: EdgeIdx) -> EdgeIdx {
        self.edges[(e ^ 1) as usize].lnext
    }

    /// Rprev: Sym->Onext.
    #[inline]
    pub fn rprev(&self, e: EdgeIdx) -> EdgeIdx {
        self.edges[(e ^ 1) as usize].onext
    }

    /// Lprev: Onext->Sym.
    #[inline]
    pub fn lprev(&self, e: EdgeIdx) -> EdgeIdx {
        self.edges[e as usize].onext ^ 1
    }

    /// Dnext: Rprev->Sym.
    #[inline]
    pub fn dnext(&self, e: EdgeIdx) -> EdgeIdx {
        self.edges[(e ^ 1) as usize].onext ^ 1
    }

    /// EdgeGoesLeft: VertLeq(Dst, Org).
    #[inline]
    pub fn edge_goes_left(&self, e: EdgeIdx) -> bool {
        let d = &self.verts[self.dst(e) as usize];
        let o = &self.verts[self.edges[e as usize].org as usize];
        vert_leq(d.x, d.y, o.x, o.y)
    }

    /// EdgeGoesRight: VertLeq(Org, Dst).
    #[inline]
    pub fn edge_goes_right(&self, e: EdgeIdx) -> bool {
        let o = &self.verts[self.edges[e as usize].org as usize];
        let d = &self.verts[self.dst(e) as usize];
        vert_leq(o.x, o.y, d.x, d.y)
    }

    // ──────────────────────── Global list iteration ────────────────────────

    /// Live even-indexed half-edges (one per undirected edge), in global
    /// list order.
    pub fn edge_iter(&self) -> impl Iterator<Item = EdgeIdx> + '_ {
        std::iter::successors(Some(self.edges[E_HEAD as usize].next), |&e| {
            Some(self.edges[e as usize].next)
        })
        .take_while(|&e| e != E_HEAD)
    }

    /// Live vertices in global list order.
    pub fn vertex_iter(&self) -> impl Iterator<Item = VertIdx> + '_ {
        std::iter::successors(Some(self.verts[V_HEAD as usize].next), |&v| {
            Some(self.verts[v as usize].next)
        })
        .take_while(|&v| v != V_HEAD)
    }

    /// Live faces in global list order.
    pub fn face_iter(&self) -> impl Iterator<Item = FaceIdx> + '_ {
        std::iter::successors(Some(self.faces[F_HEAD as usize].next), |&f| {
            Some(self.faces[f as usize].next)
        })
        .take_while(|&f| f != F_HEAD)
    }

    /// Number of vertices in a face loop.
    pub fn count_face_verts(&self, f: FaceIdx) -> usize {
        let e_start = self.faces[f as usize].an_edge;
        let mut e = e_start;
        let mut n = 0;
        loop {
            n += 1;
            e = self.edges[e as usize].lnext;
            if e == e_start {
                break;
            }
        }
        n
    }

    // ──────────────────────── Private allocation helpers ────────────────────

    /// Allocate a new half-edge pair.  Returns the index of `e` (even); sym is
    /// `e ^ 1`.  The new pair is inserted in the global edge list before `e_next`.
    fn make_edge_pair(&mut self, e_next: EdgeIdx) -> EdgeIdx {
        // Normalize: e_next must be the even half.
        let e_next = e_next & !1;

        let e_new = self.edges.len() as EdgeIdx;
        let e_sym = e_new ^ 1;

        // ePrev = eNext->Sym->next
        let e_prev = self.edges[(e_next ^ 1) as usize].next;

        self.edges.push(HalfEdge {
            next: e_next,
            onext: e_new,
            lnext: e_sym,
            ..HalfEdge::default()
        });
        self.edges.push(HalfEdge {
            next: e_prev,
            onext: e_sym,
            lnext: e_new,
            ..HalfEdge::default()
        });

        self.edges[(e_prev ^ 1) as usize].next = e_new;
        self.edges[(e_next ^ 1) as usize].next = e_sym;

        e_new
    }

    /// Allocate a new vertex, insert it before `v_next` in the vertex list, and
    /// make it the origin of every edge in e_orig's origin ring.
    fn make_vertex(&mut self, e_orig: EdgeIdx, v_next: VertIdx) -> VertIdx {
        let v_new = self.verts.len() as VertIdx;
        let v_prev = self.verts[v_next as usize].prev;

        self.verts.push(Vertex {
            prev: v_prev,
            next: v_next,
            an_edge: e_orig,
            ..Vertex::default()
        });
        self.verts[v_prev as usize].next = v_new;
        self.verts[v_next as usize].prev = v_new;

        let mut e = e_orig;
        loop {
            self.edges[e as usize].org = v_new;
            e = self.edges[e as usize].onext;
            if e == e_orig {
                break;
            }
        }

        v_new
    }

    /// Allocate a new face, insert it before `f_next` in the face list, and
    /// make it the left face of every edge in e_orig's face loop.
    /// The new face inherits the "inside" flag of f_next.
    fn make_face(&mut self, e_orig: EdgeIdx, f_next: FaceIdx) -> FaceIdx {
        let f_new = self.faces.len() as FaceIdx;
        let f_prev = self.faces[f_next as usize].prev;

        self.faces.push(Face {
            prev: f_prev,
            next: f_next,
            an_edge: e_orig,
            inside: self.faces[f_next as usize].inside,
        });
        self.faces[f_prev as usize].next = f_new;
        self.faces[f_next as usize].prev = f_new;

        let mut e = e_orig;
        loop {
            self.edges[e as usize].lface = f_new;
            e = self.edges[e as usize].lnext;
            if e == e_orig {
                break;
            }
        }

        f_new
    }

    /// Remove a vertex from the global list, repointing its origin ring at
    /// `new_org`.
    fn kill_vertex(&mut self, v_del: VertIdx, new_org: VertIdx) {
        let e_start = self.verts[v_del as usize].an_edge;
        if e_start != INVALID {
            let mut e = e_start;
            loop {
                self.edges[e as usize].org = new_org;
                e = self.edges[e as usize].onext;
                if e == e_start {
                    break;
                }
            }
        }

        let v_prev = self.verts[v_del as usize].prev;
        let v_next = self.verts[v_del as usize].next;
        self.verts[v_prev as usize].next = v_next;
        self.verts[v_next as usize].prev = v_prev;

        self.verts[v_del as usize].next = INVALID;
        self.verts[v_del as usize].prev = INVALID;
        self.verts[v_del as usize].an_edge = INVALID;
    }

    /// Remove a face from the global list, repointing its loop at `new_lface`.
    fn kill_face(&mut self, f_del: FaceIdx, new_lface: FaceIdx) {
        let e_start = self.faces[f_del as usize].an_edge;
        if e_start != INVALID {
            let mut e = e_start;
            loop {
                self.edges[e as usize].lface = new_lface;
                e = self.edges[e as usize].lnext;
                if e == e_start {
                    break;
                }
            }
        }

        let f_prev = self.faces[f_del as usize].prev;
        let f_next = self.faces[f_del as usize].next;
        self.faces[f_prev as usize].next = f_next;
        self.faces[f_next as usize].prev = f_prev;

        self.faces[f_del as usize].next = INVALID;
        self.faces[f_del as usize].prev = INVALID;
        self.faces[f_del as usize].an_edge = INVALID;
    }

    /// Remove an edge pair from the global edge list.
    fn kill_edge(&mut self, e_del: EdgeIdx) {
        let e_del = e_del & !1;
        let e_next = self.edges[e_del as usize].next;
        let e_prev = self.edges[(e_del ^ 1) as usize].next;

        self.edges[(e_next ^ 1) as usize].next = e_prev;
        self.edges[(e_prev ^ 1) as usize].next = e_next;

        self.edges[e_del as usize].next = INVALID;
        self.edges[(e_del ^ 1) as usize].next = INVALID;
    }

    /// Low-level splice primitive: exchanges a->Onext and b->Onext, keeping
    /// the Lnext rings consistent.
    fn do_splice(edges: &mut [HalfEdge], a: EdgeIdx, b: EdgeIdx) {
        let a_onext = edges[a as usize].onext;
        let b_onext = edges[b as usize].onext;
        edges[(a_onext ^ 1) as usize].lnext = b;
        edges[(b_onext ^ 1) as usize].lnext = a;
        edges[a as usize].onext = b_onext;
        edges[b as usize].onext = a_onext;
    }

    // ──────────────────────── Public mesh operations ────────────────────────

    /// Creates one edge, two vertices, and a loop (face) consisting of the
    /// two new half-edges.
    pub fn make_edge(&mut self) -> EdgeIdx {
        let e = self.make_edge_pair(E_HEAD);
        let e_sym = e ^ 1;

        self.make_vertex(e, V_HEAD);
        self.make_vertex(e_sym, V_HEAD);
        self.make_face(e, F_HEAD);

        e
    }

    /// The fundamental connectivity-changing operation: exchanges
    /// eOrg->Onext and eDst->Onext.
    ///
    /// Vertex effect: if the origins differ they are merged (eDst->Org dies);
    /// if they are the same the origin is split in two (a new vertex is
    /// created for eDst's ring).  Independently for faces: same left face
    /// splits the loop in two, different left faces joins them (eDst->Lface
    /// dies).  eOrg's vertex and face survive in every case.
    pub fn splice(&mut self, e_org: EdgeIdx, e_dst: EdgeIdx) {
        if e_org == e_dst {
            return;
        }

        let org_org = self.edges[e_org as usize].org;
        let dst_org = self.edges[e_dst as usize].org;
        let org_lface = self.edges[e_org as usize].lface;
        let dst_lface = self.edges[e_dst as usize].lface;

        let joining_vertices = dst_org != org_org;
        let joining_loops = dst_lface != org_lface;

        if joining_vertices {
            self.kill_vertex(dst_org, org_org);
        }
        if joining_loops {
            self.kill_face(dst_lface, org_lface);
        }

        Mesh::do_splice(&mut self.edges, e_org, e_dst);

        if !joining_vertices {
            // The origin was split in two; the new vertex takes eDst's ring.
            self.make_vertex(e_dst, org_org);
            self.verts[org_org as usize].an_edge = e_org;
        }
        if !joining_loops {
            self.make_face(e_dst, org_lface);
            self.faces[org_lface as usize].an_edge = e_org;
        }
    }

    /// Remove edge eDel.  There are several cases:
    /// if (eDel->Lface != eDel->Rface), we join two loops into one; the loop
    /// eDel->Lface is deleted.  Otherwise, we are splitting one loop into two;
    /// the new loop is eDel->Lface.  If the deletion of eDel would create
    /// isolated vertices, those are deleted as well.
    pub fn delete_edge(&mut self, e_del: EdgeIdx) {
        let e_del_sym = e_del ^ 1;

        let e_del_lface = self.edges[e_del as usize].lface;
        let e_del_rface = self.rface(e_del);
        let joining_loops = e_del_lface != e_del_rface;

        if joining_loops {
            self.kill_face(e_del_lface, e_del_rface);
        }

        let e_del_onext = self.edges[e_del as usize].onext;
        if e_del_onext == e_del {
            let org = self.edges[e_del as usize].org;
            self.kill_vertex(org, INVALID);
        } else {
            // Make sure eDel->Org and eDel->Rface point to valid half-edges.
            let e_del_oprev = self.oprev(e_del);
            let rf = self.rface(e_del);
            self.faces[rf as usize].an_edge = e_del_oprev;
            let org = self.edges[e_del as usize].org;
            self.verts[org as usize].an_edge = e_del_onext;

            Mesh::do_splice(&mut self.edges, e_del, e_del_oprev);

            if !joining_loops {
                self.make_face(e_del, e_del_lface);
            }
        }

        let e_sym_onext = self.edges[e_del_sym as usize].onext;
        if e_sym_onext == e_del_sym {
            let sym_org = self.edges[e_del_sym as usize].org;
            self.kill_vertex(sym_org, INVALID);
            let lf = self.edges[e_del as usize].lface;
            self.kill_face(lf, INVALID);
        } else {
            let lf = self.edges[e_del as usize].lface;
            let e_sym_oprev = self.oprev(e_del_sym);
            self.faces[lf as usize].an_edge = e_sym_oprev;
            let sym_org = self.edges[e_del_sym as usize].org;
            self.verts[sym_org as usize].an_edge = e_sym_onext;
            Mesh::do_splice(&mut self.edges, e_del_sym, e_sym_oprev);
        }

        self.kill_edge(e_del);
    }

    /// Create a new edge eNew = eOrg->Lnext whose destination is a new
    /// vertex; eOrg and eNew share the same left face.
    fn add_edge_vertex(&mut self, e_org: EdgeIdx) -> EdgeIdx {
        let e_new = self.make_edge_pair(e_org);
        let e_new_sym = e_new ^ 1;

        let e_org_lnext = self.edges[e_org as usize].lnext;
        Mesh::do_splice(&mut self.edges, e_new, e_org_lnext);

        let e_org_dst = self.dst(e_org);
        self.edges[e_new as usize].org = e_org_dst;
        self.make_vertex(e_new_sym, e_org_dst);

        let lf = self.edges[e_org as usize].lface;
        self.edges[e_new as usize].lface = lf;
        self.edges[e_new_sym as usize].lface = lf;

        e_new
    }

    /// Split eOrg in two: eOrg->Dst becomes a new vertex and the returned
    /// edge eNew = eOrg->Lnext carries the old destination.  Both halves
    /// inherit eOrg's winding.
    pub fn split_edge(&mut self, e_org: EdgeIdx) -> EdgeIdx {
        let temp = self.add_edge_vertex(e_org);
        let e_new = temp ^ 1;

        // Disconnect eOrg from eOrg->Dst and reconnect it to eNew->Org.
        let e_org_sym = e_org ^ 1;
        let e_org_sym_oprev = self.oprev(e_org_sym);
        Mesh::do_splice(&mut self.edges, e_org_sym, e_org_sym_oprev);
        Mesh::do_splice(&mut self.edges, e_org_sym, e_new);

        let e_new_org = self.edges[e_new as usize].org;
        self.edges[e_org_sym as usize].org = e_new_org;
        let e_new_dst = self.dst(e_new);
        self.verts[e_new_dst as usize].an_edge = e_new ^ 1;
        let e_org_rface = self.rface(e_org);
        self.edges[(e_new ^ 1) as usize].lface = e_org_rface;

        self.edges[e_new as usize].winding = self.edges[e_org as usize].winding;
        self.edges[(e_new ^ 1) as usize].winding = self.edges[e_org_sym as usize].winding;

        e_new
    }

    /// Create a new edge from eOrg->Dst to eDst->Org.  If the two edges share
    /// a left face it is split in two; otherwise the two loops are joined.
    /// Returns the new half-edge (with origin eOrg->Dst).
    pub fn connect(&mut self, e_org: EdgeIdx, e_dst: EdgeIdx) -> EdgeIdx {
        let e_new = self.make_edge_pair(e_org);
        let e_new_sym = e_new ^ 1;

        let e_dst_lface = self.edges[e_dst as usize].lface;
        let e_org_lface = self.edges[e_org as usize].lface;
        let joining_loops = e_dst_lface != e_org_lface;

        if joining_loops {
            self.kill_face(e_dst_lface, e_org_lface);
        }

        let e_org_lnext = self.edges[e_org as usize].lnext;
        Mesh::do_splice(&mut self.edges, e_new, e_org_lnext);
        Mesh::do_splice(&mut self.edges, e_new_sym, e_dst);

        let e_org_dst = self.dst(e_org);
        self.edges[e_new as usize].org = e_org_dst;
        let e_dst_org = self.edges[e_dst as usize].org;
        self.edges[e_new_sym as usize].org = e_dst_org;
        self.edges[e_new as usize].lface = e_org_lface;
        self.edges[e_new_sym as usize].lface = e_org_lface;

        // Make sure the old face points to a valid half-edge.
        self.faces[e_org_lface as usize].an_edge = e_new_sym;

        if !joining_loops {
            self.make_face(e_new, e_org_lface);
        }

        e_new
    }

    /// Resets edge windings so that boundary edges (inside on exactly one
    /// side) carry `value` when the interior is on their left and `-value`
    /// otherwise, and all other edges carry 0.  With `keep_outline_only`,
    /// non-boundary edges are deleted instead, leaving only the loops that
    /// separate interior from exterior.
    pub fn set_winding_number(&mut self, value: i32, keep_outline_only: bool) {
        let mut e = self.edges[E_HEAD as usize].next;
        while e != E_HEAD {
            let e_next = self.edges[e as usize].next;
            let lf_inside = self.faces[self.edges[e as usize].lface as usize].inside;
            let rf_inside = self.faces[self.rface(e) as usize].inside;
            if rf_inside != lf_inside {
                let w = if lf_inside { value } else { -value };
                self.edges[e as usize].winding = w;
                self.edges[(e ^ 1) as usize].winding = -w;
            } else if keep_outline_only {
                self.delete_edge(e);
            } else {
                self.edges[e as usize].winding = 0;
                self.edges[(e ^ 1) as usize].winding = 0;
            }
            e = e_next;
        }
    }
}

impl Default for Mesh {
    fn default() -> Self {
        Self::new()
    }
}
