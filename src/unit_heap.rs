//! A max priority queue over the dense ids `0..n`, specialized for keys that
//! move by one at a time
//!
//! All elements live in one doubly linked list sorted by key, descending.
//! Elements sharing a key form a contiguous run of the list, and the bucket
//! table maps each key to the first and last element of its run. Raising a
//! key by one is then just moving the element from its run to the tail of
//! the run right before it, which is O(1).
//!
//! Decreases are lazy: they accumulate in a per-element delta that is only
//! folded into the key once the element reaches the top of the list. A fold
//! applies half of the pending decrease (rounded up) and re-inserts the
//! element further down, so the effective key `key + delta` of every element
//! is always exact, while the list order is only exact for elements with no
//! pending decrease.

use crate::data::*;
use crate::vec_map::{NumericId, VecMap};

/// End of the list / empty bucket
const NIL: u32 = u32::MAX;
/// Both links of an element that has been removed from the queue
const DELETED: u32 = u32::MAX - 1;

/// Number of bucket slots kept free past the largest key in the list
const BUCKET_HEADROOM: usize = 4;

#[derive(Debug, Copy, Clone)]
struct Node {
    key: i32,
    prev: u32,
    next: u32,
}

#[derive(Debug, Copy, Clone)]
struct Bucket {
    first: u32,
    last: u32,
}

impl Bucket {
    const EMPTY: Bucket = Bucket {
        first: NIL,
        last: NIL,
    };
}

#[derive(Debug, Clone)]
pub struct UnitHeap {
    nodes: Vec<Node>,
    /// Pending changes not yet reflected in the list order
    update: VecMap<VertexId, i32>,
    /// semantically: Map<key, run of elements with that key>
    buckets: Vec<Bucket>,
    top: u32,
    len: usize,
}

impl UnitHeap {
    /// A queue holding every id in `0..n`, all with key 0
    pub fn new(n: usize) -> Self {
        assert!(n < DELETED as usize, "too many elements: {}", n);

        let nodes = (0..n as u32)
            .map(|i| Node {
                key: 0,
                prev: if i == 0 { NIL } else { i - 1 },
                next: if i + 1 == n as u32 { NIL } else { i + 1 },
            })
            .collect();

        let mut buckets = vec![Bucket::EMPTY; std::cmp::max(BUCKET_HEADROOM, n >> 4)];
        let top = if n == 0 {
            NIL
        } else {
            buckets[0] = Bucket {
                first: 0,
                last: n as u32 - 1,
            };
            0
        };

        Self {
            nodes,
            update: VecMap::filled(0, n),
            buckets,
            top,
            len: n,
        }
    }

    /// The number of elements left in the queue
    #[inline]
    pub fn len(&self) -> usize {
        self.len
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.len == 0
    }

    /// The element at the head of the list, if any
    #[inline]
    pub fn top(&self) -> Option<VertexId> {
        if self.top == NIL {
            None
        } else {
            Some(VertexId(self.top))
        }
    }

    #[inline]
    pub fn is_deleted(&self, v: VertexId) -> bool {
        self.nodes[v.to_index()].prev == DELETED
    }

    /// The key `v` is currently sorted by
    #[inline]
    pub fn key(&self, v: VertexId) -> i32 {
        self.nodes[v.to_index()].key
    }

    /// The pending change for `v`
    #[inline]
    pub fn delta(&self, v: VertexId) -> i32 {
        self.update[v]
    }

    /// The key `v` would have if every pending change were applied
    #[inline]
    pub fn effective_key(&self, v: VertexId) -> i32 {
        self.key(v) + self.delta(v)
    }

    /// Record a change to `v`'s key without moving it
    #[inline]
    pub fn add_delta(&mut self, v: VertexId, delta: i32) {
        self.update[v] += delta;
    }

    #[inline]
    pub fn set_delta(&mut self, v: VertexId, delta: i32) {
        self.update[v] = delta;
    }

    /// Walk the live elements from the top down
    pub fn iter(&self) -> impl Iterator<Item = VertexId> + '_ {
        let mut cur = self.top;
        std::iter::from_fn(move || {
            if cur == NIL {
                None
            } else {
                let v = cur;
                cur = self.nodes[v as usize].next;
                Some(VertexId(v))
            }
        })
    }

    /// Assign every live element its starting key, and rebuild the list and
    /// the bucket table to match
    ///
    /// Elements with equal keys keep their id order. Keys must be
    /// non-negative.
    pub fn set_initial_keys(&mut self, mut key_of: impl FnMut(VertexId) -> i32) {
        for i in 0..self.nodes.len() {
            if self.nodes[i].prev == DELETED {
                continue;
            }
            let key = key_of(VertexId(i as u32));
            assert!(key >= 0, "negative initial key {} for {:?}", key, VertexId(i as u32));
            self.nodes[i].key = key;
        }
        self.reconstruct();
    }

    /// Re-sort the list by key, and rebuild the bucket table
    fn reconstruct(&mut self) {
        let mut order: Vec<u32> = (0..self.nodes.len() as u32)
            .filter(|&i| self.nodes[i as usize].prev != DELETED)
            .collect();
        // stable, so ties stay in id order
        order.sort_by(|&a, &b| self.nodes[b as usize].key.cmp(&self.nodes[a as usize].key));

        let max_key = order.first().map_or(0, |&i| self.nodes[i as usize].key as usize);
        self.buckets.clear();
        self.buckets.resize(
            std::cmp::max(max_key + 1 + BUCKET_HEADROOM, self.nodes.len() >> 4),
            Bucket::EMPTY,
        );

        for (pos, &i) in order.iter().enumerate() {
            let prev = if pos == 0 { NIL } else { order[pos - 1] };
            let next = order.get(pos + 1).copied().unwrap_or(NIL);
            let node = &mut self.nodes[i as usize];
            node.prev = prev;
            node.next = next;

            let bucket = &mut self.buckets[node.key as usize];
            if bucket.first == NIL {
                bucket.first = i;
            }
            bucket.last = i;
        }

        self.top = order.first().copied().unwrap_or(NIL);
        debug_assert_eq!(order.len(), self.len);
    }

    /// Make sure `key` plus some headroom has a slot in the bucket table
    #[inline]
    fn reserve_bucket(&mut self, key: usize) {
        if key + BUCKET_HEADROOM >= self.buckets.len() {
            let grown = std::cmp::max(self.buckets.len() * 3 / 2, key + BUCKET_HEADROOM + 1);
            self.buckets.resize(grown, Bucket::EMPTY);
        }
    }

    /// Fix up the bucket for `key` after `i`, with neighbors `prev` and
    /// `next`, left it
    #[inline]
    fn leave_bucket(&mut self, key: i32, i: u32, prev: u32, next: u32) {
        let bucket = &mut self.buckets[key as usize];
        if bucket.first == bucket.last {
            *bucket = Bucket::EMPTY;
        } else if bucket.first == i {
            bucket.first = next;
        } else if bucket.last == i {
            bucket.last = prev;
        }
    }

    /// Raise `v`'s key by one, keeping the list sorted
    ///
    /// Does nothing if `v` was already removed from the queue.
    pub fn increase_key(&mut self, v: VertexId) {
        let i = v.0;
        let Node { key, prev, next } = self.nodes[i as usize];
        if prev == DELETED {
            return;
        }

        // Move `i` in front of its run, ie. to the tail of the run for the
        // next higher key:
        //   | run with key > `key` | <- here | run with `key` |
        let run_first = self.buckets[key as usize].first;
        if run_first != i {
            // `i` isn't the first of its run, so it has a predecessor
            self.nodes[prev as usize].next = next;
            if next != NIL {
                self.nodes[next as usize].prev = prev;
            }

            let before_run = self.nodes[run_first as usize].prev;
            self.nodes[i as usize].prev = before_run;
            self.nodes[i as usize].next = run_first;
            self.nodes[run_first as usize].prev = i;
            if before_run != NIL {
                self.nodes[before_run as usize].next = i;
            }
        }

        let new_key = key + 1;
        self.nodes[i as usize].key = new_key;
        self.leave_bucket(key, i, prev, next);

        self.reserve_bucket(new_key as usize);
        let bucket = &mut self.buckets[new_key as usize];
        bucket.last = i;
        if bucket.first == NIL {
            bucket.first = i;
        }

        if self.nodes[self.top as usize].key < new_key {
            self.top = i;
        }
    }

    /// Remove `v` from the queue
    ///
    /// Removing an element twice is a no-op.
    pub fn delete_element(&mut self, v: VertexId) {
        let i = v.0;
        let Node { key, prev, next } = self.nodes[i as usize];
        if prev == DELETED {
            return;
        }

        if prev != NIL {
            self.nodes[prev as usize].next = next;
        }
        if next != NIL {
            self.nodes[next as usize].prev = prev;
        }
        self.leave_bucket(key, i, prev, next);

        if self.top == i {
            self.top = next;
        }

        let node = &mut self.nodes[i as usize];
        node.prev = DELETED;
        node.next = DELETED;
        self.len -= 1;
    }

    /// Remove and return the element at the top of the list
    ///
    /// Pending decreases of the top element are folded in first, which may
    /// sink it and expose a new top; this repeats until the top stays put.
    ///
    /// Panics if the queue is empty.
    pub fn extract_max(&mut self) -> VertexId {
        assert!(self.top != NIL, "extract_max on an empty queue");

        loop {
            let old_top = self.top;
            if self.update.inner[old_top as usize] < 0 {
                self.decrease_top();
            }
            if self.top == old_top {
                break;
            }
        }

        let top = VertexId(self.top);
        self.delete_element(top);
        top
    }

    /// Apply part of the top's pending decrease, and sink it to the run its
    /// new key belongs in
    ///
    /// Half of the decrease (rounded up) is applied, as long as the key stays
    /// non-negative; the rest stays pending. Nothing moves if the top would
    /// still sort before its successor.
    fn decrease_top(&mut self) {
        let t = self.top;
        let Node { key, next, .. } = self.nodes[t as usize];
        if next == NIL {
            return;
        }

        let delta = self.update.inner[t as usize];
        let new_key = std::cmp::max(0, key + delta - delta / 2);
        if new_key >= self.nodes[next as usize].key {
            return;
        }

        // Find the lowest key still >= `new_key`, walking down run by run:
        //   ... | run with key >= new_key | <- here | run with key < new_key | ...
        let mut ge_key = key;
        let mut after = self.nodes[self.buckets[ge_key as usize].last as usize].next;
        while after != NIL && self.nodes[after as usize].key >= new_key {
            ge_key = self.nodes[after as usize].key;
            after = self.nodes[self.buckets[ge_key as usize].last as usize].next;
        }

        // `t` is the head of the list, so unlinking it makes `next` the head
        self.nodes[next as usize].prev = NIL;

        let run_last = self.buckets[ge_key as usize].last;
        let run_after = self.nodes[run_last as usize].next;
        self.nodes[t as usize].prev = run_last;
        self.nodes[t as usize].next = run_after;
        if run_after != NIL {
            self.nodes[run_after as usize].prev = t;
        }
        self.nodes[run_last as usize].next = t;

        self.top = next;

        // `t` was the first of its run
        let bucket = &mut self.buckets[key as usize];
        if bucket.first == bucket.last {
            *bucket = Bucket::EMPTY;
        } else {
            bucket.first = next;
        }

        self.nodes[t as usize].key = new_key;
        self.update.inner[t as usize] = key + delta - new_key;

        let bucket = &mut self.buckets[new_key as usize];
        bucket.last = t;
        if bucket.first == NIL {
            bucket.first = t;
        }
    }
}
