//! Recency List Module
//!
//! Implements least-recently-used ordering for cache eviction.
//!
//! Keys live in a doubly linked list backed by a slab of nodes, with a
//! HashMap from key to slot index. Both "move to most-recent" and "evict
//! least-recent" are O(1), unlike a scan over access timestamps.

use std::collections::HashMap;
use std::mem;

/// Sentinel slot index meaning "no node".
const NIL: usize = usize::MAX;

// == List Node ==
#[derive(Debug)]
struct Node {
    key: String,
    prev: usize,
    next: usize,
}

// == Recency List ==
/// Tracks access order for LRU eviction.
///
/// - Head = most recently used
/// - Tail = least recently used
///
/// Keys inserted and never touched again sit in insertion order at the tail,
/// so eviction among never-reused entries is oldest-insertion-first and
/// deterministic.
#[derive(Debug, Default)]
pub struct RecencyList {
    /// Key to slot index
    index: HashMap<String, usize>,
    /// Slab of linked nodes; freed slots are recycled
    nodes: Vec<Node>,
    /// Recycled slot indices
    free: Vec<usize>,
    /// Most recently used slot, NIL when empty
    head: usize,
    /// Least recently used slot, NIL when empty
    tail: usize,
}

impl RecencyList {
    // == Constructor ==
    /// Creates a new empty recency list.
    pub fn new() -> Self {
        Self {
            index: HashMap::new(),
            nodes: Vec::new(),
            free: Vec::new(),
            head: NIL,
            tail: NIL,
        }
    }

    // == Touch ==
    /// Marks a key as most recently used.
    ///
    /// An existing key is unlinked and relinked at the head; a new key is
    /// allocated a slot and linked at the head. Both paths are O(1).
    pub fn touch(&mut self, key: &str) {
        if let Some(&slot) = self.index.get(key) {
            if slot == self.head {
                return;
            }
            self.unlink(slot);
            self.link_front(slot);
        } else {
            let slot = self.alloc(key.to_string());
            self.index.insert(key.to_string(), slot);
            self.link_front(slot);
        }
    }

    // == Remove ==
    /// Removes a key from the list. Returns false if the key was not tracked.
    pub fn remove(&mut self, key: &str) -> bool {
        match self.index.remove(key) {
            Some(slot) => {
                self.unlink(slot);
                self.release(slot);
                true
            }
            None => false,
        }
    }

    // == Pop Oldest ==
    /// Removes and returns the least recently used key.
    ///
    /// Returns None if the list is empty.
    pub fn pop_oldest(&mut self) -> Option<String> {
        if self.tail == NIL {
            return None;
        }

        let slot = self.tail;
        self.unlink(slot);
        let key = self.release(slot);
        self.index.remove(&key);
        Some(key)
    }

    // == Peek Oldest ==
    /// Returns the least recently used key without removing it.
    pub fn peek_oldest(&self) -> Option<&str> {
        if self.tail == NIL {
            None
        } else {
            Some(&self.nodes[self.tail].key)
        }
    }

    // == Clear ==
    /// Removes all keys.
    pub fn clear(&mut self) {
        self.index.clear();
        self.nodes.clear();
        self.free.clear();
        self.head = NIL;
        self.tail = NIL;
    }

    // == Length ==
    /// Returns the number of tracked keys.
    pub fn len(&self) -> usize {
        self.index.len()
    }

    // == Is Empty ==
    pub fn is_empty(&self) -> bool {
        self.index.is_empty()
    }

    // == Contains ==
    /// Checks if a key is being tracked.
    pub fn contains(&self, key: &str) -> bool {
        self.index.contains_key(key)
    }

    // == Internal: slot management ==
    /// Allocates a slot for `key`, reusing a freed slot when available.
    fn alloc(&mut self, key: String) -> usize {
        match self.free.pop() {
            Some(slot) => {
                self.nodes[slot] = Node {
                    key,
                    prev: NIL,
                    next: NIL,
                };
                slot
            }
            None => {
                self.nodes.push(Node {
                    key,
                    prev: NIL,
                    next: NIL,
                });
                self.nodes.len() - 1
            }
        }
    }

    /// Returns a slot to the free pool, taking its key out.
    fn release(&mut self, slot: usize) -> String {
        self.free.push(slot);
        mem::take(&mut self.nodes[slot].key)
    }

    /// Detaches a slot from the chain, fixing head/tail as needed.
    fn unlink(&mut self, slot: usize) {
        let (prev, next) = {
            let node = &self.nodes[slot];
            (node.prev, node.next)
        };

        if prev != NIL {
            self.nodes[prev].next = next;
        } else {
            self.head = next;
        }

        if next != NIL {
            self.nodes[next].prev = prev;
        } else {
            self.tail = prev;
        }

        self.nodes[slot].prev = NIL;
        self.nodes[slot].next = NIL;
    }

    /// Links a detached slot in at the head.
    fn link_front(&mut self, slot: usize) {
        self.nodes[slot].prev = NIL;
        self.nodes[slot].next = self.head;

        if self.head != NIL {
            self.nodes[self.head].prev = slot;
        }
        self.head = slot;

        if self.tail == NIL {
            self.tail = slot;
        }
    }
}
