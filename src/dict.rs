// Copyright 2025 Lars Brubaker
// License: SGI Free Software License B (MIT-compatible)
//
// Ordered dictionary of active regions, kept as a circular doubly-linked
// list over a node arena.  The sweep keeps one entry per edge currently
// crossing the sweep line, ordered bottom to top.
//
// The ordering predicate depends on the current event position, so it is
// supplied per call as a closure rather than stored in the structure.
// Keys are ActiveRegion indices; INVALID marks the head sentinel.

use crate::mesh::INVALID;

/// Index into Dict::nodes.
pub type NodeIdx = u32;

#[derive(Clone, Debug)]
pub struct DictNode {
    pub key: u32,
    pub next: NodeIdx,
    pub prev: NodeIdx,
}

/// Index of the head sentinel node; `head.next` is the minimum,
/// `head.prev` the maximum.
pub const DICT_HEAD: NodeIdx = 0;

pub struct Dict {
    nodes: Vec<DictNode>,
    /// Head of the deleted-node chain (threaded through `next`), or INVALID.
    free_list: NodeIdx,
}

impl Dict {
    pub fn new() -> Self {
        Dict {
            nodes: vec![DictNode {
                key: INVALID,
                next: DICT_HEAD,
                prev: DICT_HEAD,
            }],
            free_list: INVALID,
        }
    }

    /// Insert `key` in sorted position, scanning from the maximum.
    pub fn insert<F>(&mut self, key: u32, leq: &F) -> NodeIdx
    where
        F: Fn(u32, u32) -> bool,
    {
        self.insert_before(DICT_HEAD, key, leq)
    }

    /// Insert `key` at its sorted position at or below `node`, walking
    /// backward until a node with key <= `key` (or the sentinel) is found.
    pub fn insert_before<F>(&mut self, mut node: NodeIdx, key: u32, leq: &F) -> NodeIdx
    where
        F: Fn(u32, u32) -> bool,
    {
        loop {
            node = self.nodes[node as usize].prev;
            let node_key = self.nodes[node as usize].key;
            if node_key == INVALID || leq(node_key, key) {
                break;
            }
        }

        let next = self.nodes[node as usize].next;
        let new_idx = self.alloc(DictNode {
            key,
            next,
            prev: node,
        });
        self.nodes[node as usize].next = new_idx;
        self.nodes[next as usize].prev = new_idx;
        new_idx
    }

    /// Unlink a node and recycle its slot.
    pub fn delete(&mut self, node: NodeIdx) {
        debug_assert_ne!(node, DICT_HEAD);
        let next = self.nodes[node as usize].next;
        let prev = self.nodes[node as usize].prev;
        self.nodes[next as usize].prev = prev;
        self.nodes[prev as usize].next = next;

        self.nodes[node as usize].key = INVALID;
        self.nodes[node as usize].prev = INVALID;
        self.nodes[node as usize].next = self.free_list;
        self.free_list = node;
    }

    /// Find the first node (bottom up) whose key is >= `key`; returns the
    /// head sentinel when every key is smaller.
    pub fn search<F>(&self, key: u32, leq: &F) -> NodeIdx
    where
        F: Fn(u32, u32) -> bool,
    {
        let mut node = DICT_HEAD;
        loop {
            node = self.nodes[node as usize].next;
            let node_key = self.nodes[node as usize].key;
            if node_key == INVALID || leq(key, node_key) {
                return node;
            }
        }
    }

    #[inline]
    pub fn key(&self, node: NodeIdx) -> u32 {
        self.nodes[node as usize].key
    }

    #[inline]
    pub fn min(&self) -> NodeIdx {
        self.nodes[DICT_HEAD as usize].next
    }

    #[inline]
    pub fn max(&self) -> NodeIdx {
        self.nodes[DICT_HEAD as usize].prev
    }

    #[inline]
    pub fn succ(&self, node: NodeIdx) -> NodeIdx {
        self.nodes[node as usize].next
    }

    #[inline]
    pub fn pred(&self, node: NodeIdx) -> NodeIdx {
        self.nodes[node as usize].prev
    }

    fn alloc(&mut self, node: DictNode) -> NodeIdx {
        if self.free_list != INVALID {
            let idx = self.free_list;
            self.free_list = self.nodes[idx as usize].next;
            self.nodes[idx as usize] = node;
            idx
        } else {
            let idx = self.nodes.len() as NodeIdx;
            self.nodes.push(node);
            idx
        }
    }
}

impl Default for Dict {
    fn default() -> Self {
        Self::new()
    }
}
