//! Bounded judgment cache with insertion-order eviction.
//!
//! Deliberately FIFO, not LRU: the oldest-inserted entry is evicted first
//! regardless of reads. TTL is checked on read.

use super::JudgeResult;
use std::collections::{HashMap, VecDeque};
use std::time::{Duration, Instant};

pub const DEFAULT_CAPACITY: usize = 256;
pub const DEFAULT_TTL: Duration = Duration::from_secs(600);

struct CachedVerdict {
    result: JudgeResult,
    inserted_at: Instant,
}

pub struct JudgeCache {
    capacity: usize,
    ttl: Duration,
    entries: HashMap<String, CachedVerdict>,
    insertion_order: VecDeque<String>,
}

impl JudgeCache {
    pub fn new(capacity: usize, ttl: Duration) -> Self {
        Self {
            capacity: capacity.max(1),
            ttl,
            entries: HashMap::new(),
            insertion_order: VecDeque::new(),
        }
    }

    pub fn with_defaults() -> Self {
        Self::new(DEFAULT_CAPACITY, DEFAULT_TTL)
    }

    pub fn get(&mut self, key: &str) -> Option<JudgeResult> {
        let entry = self.entries.get(key)?;
        if entry.inserted_at.elapsed() >= self.ttl {
            self.entries.remove(key);
            return None;
        }
        Some(entry.result.clone())
    }

    pub fn insert(&mut self, key: String, result: JudgeResult) {
        if self.entries.contains_key(&key) {
            // Refresh in place; insertion order keeps the original slot.
            self.entries.insert(
                key,
                CachedVerdict {
                    result,
                    inserted_at: Instant::now(),
                },
            );
            return;
        }

        while self.entries.len() >= self.capacity {
            let Some(oldest) = self.insertion_order.pop_front() else {
                break;
            };
            self.entries.remove(&oldest);
        }

        self.insertion_order.push_back(key.clone());
        self.entries.insert(
            key,
            CachedVerdict {
                result,
                inserted_at: Instant::now(),
            },
        );
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}
