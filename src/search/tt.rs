use std::collections::HashMap;
use std::sync::{Mutex, MutexGuard, PoisonError};

use crate::board::Move;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Bound {
    Exact,
    Lower,
    Upper,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Entry {
    pub key: u64,
    pub depth: u32,
    pub score: i32,
    pub best: Option<Move>,
    pub bound: Bound,
}

const DEFAULT_SHARDS: usize = 16;
const NIL: usize = usize::MAX;

struct Node {
    entry: Entry,
    prev: usize,
    next: usize,
}

/// Exact LRU map: a slab of nodes threaded on a recency list, head most recent.
struct LruShard {
    capacity: usize,
    map: HashMap<u64, usize>,
    nodes: Vec<Node>,
    head: usize,
    tail: usize,
}

impl LruShard {
    /// Storage grows on insert; `capacity` only bounds eviction.
    fn new(capacity: usize) -> Self {
        LruShard { capacity, map: HashMap::new(), nodes: Vec::new(), head: NIL, tail: NIL }
    }

    fn unlink(&mut self, slot: usize) {
        let (prev, next) = (self.nodes[slot].prev, self.nodes[slot].next);
        if prev == NIL { self.head = next } else { self.nodes[prev].next = next }
        if next == NIL { self.tail = prev } else { self.nodes[next].prev = prev }
    }

    fn push_front(&mut self, slot: usize) {
        self.nodes[slot].prev = NIL;
        self.nodes[slot].next = self.head;
        if self.head != NIL { self.nodes[self.head].prev = slot; }
        self.head = slot;
        if self.tail == NIL { self.tail = slot; }
    }

    fn touch(&mut self, slot: usize) {
        if self.head != slot {
            self.unlink(slot);
            self.push_front(slot);
        }
    }

    fn get(&mut self, key: u64) -> Option<Entry> {
        let slot = *self.map.get(&key)?;
        self.touch(slot);
        Some(self.nodes[slot].entry)
    }

    fn put(&mut self, entry: Entry) {
        if self.capacity == 0 { return; }
        if let Some(&slot) = self.map.get(&entry.key) {
            self.nodes[slot].entry = entry;
            self.touch(slot);
            return;
        }
        let slot = if self.nodes.len() < self.capacity {
            self.nodes.push(Node { entry, prev: NIL, next: NIL });
            self.nodes.len() - 1
        } else {
            // Full: recycle the least recently used node.
            let victim = self.tail;
            self.unlink(victim);
            self.map.remove(&self.nodes[victim].entry.key);
            self.nodes[victim].entry = entry;
            victim
        };
        self.map.insert(entry.key, slot);
        self.push_front(slot);
    }

    fn clear(&mut self) {
        self.map.clear();
        self.nodes.clear();
        self.head = NIL;
        self.tail = NIL;
    }
}

/// Bounded transposition cache shared between search threads.
///
/// Each shard is an independent LRU behind its own mutex, so eviction is
/// exact within a shard and approximate across the whole table.
pub struct Tt {
    shards: Vec<Mutex<LruShard>>,
    capacity: usize,
}

impl Tt {
    pub fn new(capacity: usize) -> Self {
        let shards = if capacity >= DEFAULT_SHARDS * 64 { DEFAULT_SHARDS } else { 1 };
        Self::with_shards(capacity, shards)
    }

    pub fn with_shards(capacity: usize, shards: usize) -> Self {
        let shards = shards.max(1);
        let per_shard = capacity.div_ceil(shards);
        Tt {
            shards: (0..shards).map(|_| Mutex::new(LruShard::new(per_shard))).collect(),
            capacity: per_shard * shards,
        }
    }

    fn shard(&self, key: u64) -> MutexGuard<'_, LruShard> {
        let mixed = key ^ (key >> 32);
        let index = (mixed as usize) % self.shards.len();
        self.shards[index].lock().unwrap_or_else(PoisonError::into_inner)
    }

    pub fn get(&self, key: u64) -> Option<Entry> {
        self.shard(key).get(key)
    }

    pub fn put(&self, entry: Entry) {
        self.shard(entry.key).put(entry);
    }

    pub fn len(&self) -> usize {
        self.shards.iter().map(|s| s.lock().unwrap_or_else(PoisonError::into_inner).map.len()).sum()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    pub fn capacity(&self) -> usize {
        self.capacity
    }

    pub fn clear(&self) {
        for shard in &self.shards {
            shard.lock().unwrap_or_else(PoisonError::into_inner).clear();
        }
    }
}

impl Default for Tt {
    fn default() -> Self {
        Tt::new(1 << 20)
    }
}
