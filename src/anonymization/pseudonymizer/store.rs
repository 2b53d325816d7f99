//! Pseudonym store capability
//!
//! The store maps original values to their deterministic tokens and back. It
//! is the idempotence fast path and the reverse-lookup fallback for tokens
//! the main key cannot open.

use std::collections::{BTreeMap, HashMap};

/// Default maximum number of stored pairs
pub const DEFAULT_CACHE_CAPACITY: usize = 100_000;

/// Storage for value ↔ token pairs
///
/// Implementations need no internal synchronization; a pseudonymizer shared
/// between threads must be wrapped in a mutex by the caller.
pub trait PseudonymStore: Send {
    /// Token previously stored for `original`
    fn get(&mut self, original: &str) -> Option<String>;

    /// Store a pair, possibly evicting older pairs
    fn insert(&mut self, original: String, token: String);

    /// Original value previously stored for `token`
    fn reverse(&self, token: &str) -> Option<String>;

    /// Number of stored pairs
    fn len(&self) -> usize;

    fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

/// Bounded store evicting the least recently used pair
#[derive(Debug)]
pub struct LruPseudonymStore {
    capacity: usize,
    entries: HashMap<String, Entry>,
    reverse: HashMap<String, String>,
    /// Last-use tick → original value
    order: BTreeMap<u64, String>,
    tick: u64,
}

#[derive(Debug)]
struct Entry {
    token: String,
    last_used: u64,
}

impl LruPseudonymStore {
    /// Create a store holding at most `capacity` pairs (at least one)
    pub fn new(capacity: usize) -> Self {
        Self {
            capacity: capacity.max(1),
            entries: HashMap::new(),
            reverse: HashMap::new(),
            order: BTreeMap::new(),
            tick: 0,
        }
    }

    pub fn capacity(&self) -> usize {
        self.capacity
    }

    fn next_tick(&mut self) -> u64 {
        self.tick += 1;
        self.tick
    }

    fn evict_oldest(&mut self) {
        if let Some((_, original)) = self.order.pop_first() {
            if let Some(entry) = self.entries.remove(&original) {
                self.reverse.remove(&entry.token);
            }
        }
    }
}

impl Default for LruPseudonymStore {
    fn default() -> Self {
        Self::new(DEFAULT_CACHE_CAPACITY)
    }
}

impl PseudonymStore for LruPseudonymStore {
    fn get(&mut self, original: &str) -> Option<String> {
        let tick = self.next_tick();
        let entry = self.entries.get_mut(original)?;
        self.order.remove(&entry.last_used);
        entry.last_used = tick;
        self.order.insert(tick, original.to_string());
        Some(entry.token.clone())
    }

    fn insert(&mut self, original: String, token: String) {
        let tick = self.next_tick();
        if let Some(old) = self.entries.remove(&original) {
            self.order.remove(&old.last_used);
            self.reverse.remove(&old.token);
        } else if self.entries.len() >= self.capacity {
            self.evict_oldest();
        }

        self.reverse.insert(token.clone(), original.clone());
        self.order.insert(tick, original.clone());
        self.entries.insert(
            original,
            Entry {
                token,
                last_used: tick,
            },
        );
    }

    fn reverse(&self, token: &str) -> Option<String> {
        self.reverse.get(token).cloned()
    }

    fn len(&self) -> usize {
        self.entries.len()
    }
}
