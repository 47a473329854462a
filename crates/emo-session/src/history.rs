//! Bounded emotion history.

use std::collections::VecDeque;

use emo_models::EmotionSample;

/// Most samples the history will ever retain. Also the default.
pub const MAX_HISTORY_CAPACITY: usize = 20;

/// Insertion-ordered log of detections, evicting the oldest past capacity.
#[derive(Debug, Clone)]
pub struct EmotionHistory {
    samples: VecDeque<EmotionSample>,
    capacity: usize,
}

impl Default for EmotionHistory {
    fn default() -> Self {
        Self::with_capacity(MAX_HISTORY_CAPACITY)
    }
}

impl EmotionHistory {
    /// Capacity is clamped to `1..=MAX_HISTORY_CAPACITY`.
    pub fn with_capacity(capacity: usize) -> Self {
        let capacity = capacity.clamp(1, MAX_HISTORY_CAPACITY);
        Self {
            samples: VecDeque::with_capacity(capacity),
            capacity,
        }
    }

    pub fn push(&mut self, sample: EmotionSample) {
        while self.samples.len() >= self.capacity {
            self.samples.pop_front();
        }
        self.samples.push_back(sample);
    }

    pub fn len(&self) -> usize {
        self.samples.len()
    }

    pub fn is_empty(&self) -> bool {
        self.samples.is_empty()
    }

    pub fn capacity(&self) -> usize {
        self.capacity
    }

    pub fn latest(&self) -> Option<&EmotionSample> {
        self.samples.back()
    }

    /// Oldest first.
    pub fn iter(&self) -> impl Iterator<Item = &EmotionSample> {
        self.samples.iter()
    }

    pub fn to_vec(&self) -> Vec<EmotionSample> {
        self.samples.iter().cloned().collect()
    }

    pub fn clear(&mut self) {
        self.samples.clear();
    }
}
