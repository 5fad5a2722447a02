// Copyright 2025 Lars Brubaker
// License: SGI Free Software License B (MIT-compatible)
//
// Two-phase priority queue of sweep events:
//   Phase 1 (pre-init): inserts accumulate in an array which init() sorts
//     once with a fixed-seed randomized quicksort.
//   Phase 2 (post-init): inserts go into a binary min-heap (these are the
//     intersection vertices discovered during the sweep).
// extract_min() merges the two substructures; deletion is supported via
// handles.  Negative handles -(slot+1) address the sorted array,
// non-negative handles address the heap.
//
// Keys snapshot the vertex coordinates at insertion time; the sweep never
// moves a vertex while it is queued.

use arrayvec::ArrayVec;

use crate::geom::{vert_leq, Real};
use crate::mesh::{VertIdx, INVALID};

/// A queued sweep event: vertex plus its coordinates for ordering.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct EventKey {
    pub x: Real,
    pub y: Real,
    pub vert: VertIdx,
}

impl EventKey {
    const DEAD: EventKey = EventKey {
        x: 0.0,
        y: 0.0,
        vert: INVALID,
    };

    #[inline]
    fn is_dead(&self) -> bool {
        self.vert == INVALID
    }
}

#[inline]
fn key_leq(a: EventKey, b: EventKey) -> bool {
    vert_leq(a.x, a.y, b.x, b.y)
}

const INIT_SIZE: usize = 32;

#[derive(Clone, Copy)]
struct HandleElem {
    key: EventKey,
    /// Heap position while live; next free handle while on the free list.
    node: u32,
}

/// Handle-addressable binary min-heap, 1-indexed.
struct Heap {
    /// nodes[1..=size] are active heap positions holding handles.
    nodes: Vec<u32>,
    handles: Vec<HandleElem>,
    size: usize,
    max: usize,
    free_list: u32,
    initialized: bool,
}

impl Heap {
    fn new() -> Self {
        Heap {
            nodes: vec![0; INIT_SIZE + 1],
            handles: vec![
                HandleElem {
                    key: EventKey::DEAD,
                    node: 0,
                };
                INIT_SIZE + 1
            ],
            size: 0,
            max: INIT_SIZE,
            free_list: 0,
            initialized: false,
        }
    }

    #[inline]
    fn key_at(&self, pos: usize) -> EventKey {
        self.handles[self.nodes[pos] as usize].key
    }

    fn float_down(&mut self, mut curr: usize) {
        let h_curr = self.nodes[curr];
        loop {
            let mut child = curr << 1;
            if child < self.size && key_leq(self.key_at(child + 1), self.key_at(child)) {
                child += 1;
            }
            debug_assert!(child <= self.max);

            let h_child = self.nodes[child];
            if child > self.size
                || key_leq(
                    self.handles[h_curr as usize].key,
                    self.handles[h_child as usize].key,
                )
            {
                self.nodes[curr] = h_curr;
                self.handles[h_curr as usize].node = curr as u32;
                break;
            }
            self.nodes[curr] = h_child;
            self.handles[h_child as usize].node = curr as u32;
            curr = child;
        }
    }

    fn float_up(&mut self, mut curr: usize) {
        let h_curr = self.nodes[curr];
        loop {
            let parent = curr >> 1;
            let h_parent = self.nodes[parent];
            if parent == 0
                || key_leq(
                    self.handles[h_parent as usize].key,
                    self.handles[h_curr as usize].key,
                )
            {
                self.nodes[curr] = h_curr;
                self.handles[h_curr as usize].node = curr as u32;
                break;
            }
            self.nodes[curr] = h_parent;
            self.handles[h_parent as usize].node = curr as u32;
            curr = parent;
        }
    }

    /// O(n) heapify.
    fn init(&mut self) {
        for i in (1..=self.size).rev() {
            self.float_down(i);
        }
        self.initialized = true;
    }

    fn insert(&mut self, key: EventKey) -> i32 {
        self.size += 1;
        let curr = self.size;

        if curr * 2 > self.max {
            self.max <<= 1;
            self.nodes.resize(self.max + 1, 0);
            self.handles.resize(
                self.max + 1,
                HandleElem {
                    key: EventKey::DEAD,
                    node: 0,
                },
            );
        }

        let free = if self.free_list == 0 {
            curr as u32
        } else {
            let f = self.free_list;
            self.free_list = self.handles[f as usize].node;
            f
        };

        self.nodes[curr] = free;
        self.handles[free as usize] = HandleElem {
            key,
            node: curr as u32,
        };

        if self.initialized {
            self.float_up(curr);
        }

        free as i32
    }

    fn extract_min(&mut self) -> Option<EventKey> {
        if self.size == 0 {
            return None;
        }
        let h_min = self.nodes[1];
        let min = self.handles[h_min as usize].key;

        self.nodes[1] = self.nodes[self.size];
        self.handles[self.nodes[1] as usize].node = 1;

        self.handles[h_min as usize].key = EventKey::DEAD;
        self.handles[h_min as usize].node = self.free_list;
        self.free_list = h_min;

        self.size -= 1;
        if self.size > 0 {
            self.float_down(1);
        }

        Some(min)
    }

    fn delete(&mut self, h_curr: u32) {
        debug_assert!(!self.handles[h_curr as usize].key.is_dead());
        let curr = self.handles[h_curr as usize].node as usize;

        self.nodes[curr] = self.nodes[self.size];
        self.handles[self.nodes[curr] as usize].node = curr as u32;

        self.size -= 1;
        if curr <= self.size {
            if curr <= 1 || key_leq(self.key_at(curr >> 1), self.key_at(curr)) {
                self.float_down(curr);
            } else {
                self.float_up(curr);
            }
        }

        self.handles[h_curr as usize].key = EventKey::DEAD;
        self.handles[h_curr as usize].node = self.free_list;
        self.free_list = h_curr;
    }

    fn minimum(&self) -> Option<EventKey> {
        if self.size == 0 {
            None
        } else {
            Some(self.handles[self.nodes[1] as usize].key)
        }
    }

    #[inline]
    fn is_empty(&self) -> bool {
        self.size == 0
    }
}

/// The combined event queue (sorted array + heap).
pub struct PriorityQ {
    heap: Heap,
    /// Pre-init key storage; deleted entries are tombstoned.
    keys: Vec<EventKey>,
    /// Indirect indices into `keys`, sorted descending by init() so the
    /// minimum pops from the tail.
    order: Vec<u32>,
    size: usize,
    initialized: bool,
}

impl PriorityQ {
    pub fn new() -> Self {
        PriorityQ {
            heap: Heap::new(),
            keys: Vec::with_capacity(INIT_SIZE),
            order: Vec::new(),
            size: 0,
            initialized: false,
        }
    }

    /// Sort the pre-init keys.  Must be called once, after all bulk inserts
    /// and before any extraction.
    ///
    /// This is the classic randomized quicksort over an indirect index
    /// array, with small ranges finished by insertion sort and an explicit
    /// bounded range stack.  The pivot sequence comes from a fixed linear
    /// congruential generator so that event processing order is fully
    /// deterministic for a given input.
    pub fn init(&mut self) {
        debug_assert!(!self.initialized);

        self.order = (0..self.size as u32).collect();

        let keys = &self.keys;
        let order = &mut self.order;
        // greater/less in the *descending* target order.
        let gt = |a: EventKey, b: EventKey| !key_leq(a, b);
        let lt = |a: EventKey, b: EventKey| !key_leq(b, a);

        let mut stack: ArrayVec<(isize, isize), 50> = ArrayVec::new();
        let mut seed: i32 = 2016473283;

        stack.push((0, self.size as isize - 1));
        while let Some((mut p, mut r)) = stack.pop() {
            while r > p + 10 {
                seed = seed.wrapping_mul(1539415821).wrapping_add(1).wrapping_abs();
                let k = p + (seed.unsigned_abs() as isize) % (r - p + 1);
                let piv = order[k as usize];
                order[k as usize] = order[p as usize];
                order[p as usize] = piv;

                let mut i = p - 1;
                let mut j = r + 1;
                loop {
                    loop {
                        i += 1;
                        if !gt(keys[order[i as usize] as usize], keys[piv as usize]) {
                            break;
                        }
                    }
                    loop {
                        j -= 1;
                        if !lt(keys[order[j as usize] as usize], keys[piv as usize]) {
                            break;
                        }
                    }
                    order.swap(i as usize, j as usize);
                    if i >= j {
                        break;
                    }
                }
                order.swap(i as usize, j as usize); // undo last swap

                // Recurse into the smaller range, iterate on the larger.
                if i - p < r - j {
                    stack.push((j + 1, r));
                    r = i - 1;
                } else {
                    stack.push((p, i - 1));
                    p = j + 1;
                }
            }
            // Insertion sort small ranges.
            let mut i = p + 1;
            while i <= r {
                let piv = order[i as usize];
                let mut j = i;
                while j > p && lt(keys[order[(j - 1) as usize] as usize], keys[piv as usize]) {
                    order[j as usize] = order[(j - 1) as usize];
                    j -= 1;
                }
                order[j as usize] = piv;
                i += 1;
            }
        }

        self.initialized = true;
        self.heap.init();
    }

    /// Insert a key, returning a handle usable with delete().
    pub fn insert(&mut self, key: EventKey) -> i32 {
        if self.initialized {
            return self.heap.insert(key);
        }
        let curr = self.size;
        self.size += 1;
        self.keys.push(key);

        // Negative handles index the sorted array.
        -(curr as i32 + 1)
    }

    /// Extract the overall minimum from whichever substructure holds it;
    /// the heap wins ties so that an intersection vertex inserted at the
    /// current event location is processed before the pending input vertex.
    pub fn extract_min(&mut self) -> Option<EventKey> {
        if self.size == 0 {
            return self.heap.extract_min();
        }
        let sort_min = self.keys[self.order[self.size - 1] as usize];
        if let Some(heap_min) = self.heap.minimum() {
            if key_leq(heap_min, sort_min) {
                return self.heap.extract_min();
            }
        }
        // Pop from the sorted array, skipping deleted entries.
        loop {
            self.size -= 1;
            if self.size == 0 || !self.keys[self.order[self.size - 1] as usize].is_dead() {
                break;
            }
        }
        Some(sort_min)
    }

    /// Peek at the minimum without extracting it.
    pub fn minimum(&self) -> Option<EventKey> {
        if self.size == 0 {
            return self.heap.minimum();
        }
        let sort_min = self.keys[self.order[self.size - 1] as usize];
        if let Some(heap_min) = self.heap.minimum() {
            if key_leq(heap_min, sort_min) {
                return Some(heap_min);
            }
        }
        Some(sort_min)
    }

    pub fn is_empty(&self) -> bool {
        self.size == 0 && self.heap.is_empty()
    }

    /// Delete the key with the given handle.
    pub fn delete(&mut self, handle: i32) {
        if handle >= 0 {
            self.heap.delete(handle as u32);
            return;
        }
        let curr = (-(handle + 1)) as usize;
        debug_assert!(curr < self.keys.len() && !self.keys[curr].is_dead());
        self.keys[curr] = EventKey::DEAD;

        // Trim tombstones from the tail so extract_min stays O(1) amortized.
        while self.size > 0 && self.keys[self.order[self.size - 1] as usize].is_dead() {
            self.size -= 1;
        }
    }
}

impl Default for PriorityQ {
    fn default() -> Self {
        Self::new()
    }
}
