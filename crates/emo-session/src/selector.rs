//! Non-repeating recommendation selection.
//!
//! Both selectors follow the same steps: resolve the raw label to a
//! category, look up the category's pool, drop items already issued in this
//! session, reset the category when nothing is left, pick, and record the
//! pick. Selection is linear in the pool size and never fails on an
//! exhausted pool.

use std::collections::{HashMap, HashSet};

use chrono::{DateTime, Utc};
use rand::seq::SliceRandom;
use rand::Rng;
use tracing::debug;

use emo_models::{EmotionCategory, MusicTrack, StudySubject};

use crate::catalog::{music_catalog, study_catalog, StudyEntry};

/// Maximum secondary subjects returned with a study recommendation.
pub const MAX_SECONDARY_SUBJECTS: usize = 3;

/// Items issued per category during the current session.
#[derive(Debug, Clone, Default)]
pub struct RecentlyUsed {
    by_category: HashMap<EmotionCategory, HashSet<String>>,
}

impl RecentlyUsed {
    pub fn contains(&self, category: &EmotionCategory, key: &str) -> bool {
        self.by_category
            .get(category)
            .is_some_and(|used| used.contains(key))
    }

    pub fn mark(&mut self, category: &EmotionCategory, key: &str) {
        self.by_category
            .entry(category.clone())
            .or_default()
            .insert(key.to_string());
    }

    pub fn used_count(&self, category: &EmotionCategory) -> usize {
        self.by_category.get(category).map_or(0, HashSet::len)
    }

    pub fn clear_category(&mut self, category: &EmotionCategory) {
        self.by_category.remove(category);
    }

    pub fn clear(&mut self) {
        self.by_category.clear();
    }

    /// Items of `pool` not yet issued for `category`.
    ///
    /// When every item has been issued the category is reset first and the
    /// whole pool is returned.
    pub fn available<'a, T, K>(
        &mut self,
        category: &EmotionCategory,
        pool: &'a [T],
        key: K,
    ) -> Vec<&'a T>
    where
        K: Fn(&T) -> &str,
    {
        let unused: Vec<&T> = pool
            .iter()
            .filter(|item| !self.contains(category, key(item)))
            .collect();

        if !unused.is_empty() || pool.is_empty() {
            return unused;
        }

        debug!(category = %category, pool = pool.len(), "Pool exhausted, resetting");
        self.clear_category(category);
        pool.iter().collect()
    }
}

/// Picks an index mixing a wall-clock seed with a random seed.
fn mixed_index<R: Rng>(len: usize, now: DateTime<Utc>, rng: &mut R) -> usize {
    const SEED_SPACE: u64 = 1_000_000;

    let time_seed = now.timestamp_millis().rem_euclid(SEED_SPACE as i64) as u64;
    let random_seed = rng.random_range(0..SEED_SPACE);
    let combined = (time_seed + random_seed) % SEED_SPACE;

    (combined * len as u64 / SEED_SPACE) as usize
}

/// Music track selection.
#[derive(Debug, Clone)]
pub struct MusicSelector {
    pools: HashMap<EmotionCategory, Vec<MusicTrack>>,
    used: RecentlyUsed,
}

impl Default for MusicSelector {
    fn default() -> Self {
        Self::new(music_catalog())
    }
}

impl MusicSelector {
    pub fn new(pools: HashMap<EmotionCategory, Vec<MusicTrack>>) -> Self {
        Self {
            pools,
            used: RecentlyUsed::default(),
        }
    }

    /// Pick a track for `label`. `None` when the label has no pool.
    pub fn select<R: Rng>(
        &mut self,
        label: &str,
        now: DateTime<Utc>,
        rng: &mut R,
    ) -> Option<MusicTrack> {
        self.select_excluding(label, None, now, rng)
    }

    /// Pick a track for `label` that differs from `exclude`.
    ///
    /// `None` when the label has no pool, or when the excluded track is the
    /// only one in it.
    pub fn select_excluding<R: Rng>(
        &mut self,
        label: &str,
        exclude: Option<&str>,
        now: DateTime<Utc>,
        rng: &mut R,
    ) -> Option<MusicTrack> {
        let category = EmotionCategory::resolve(label);
        let pool = self.pools.get(&category)?;

        let mut candidates = self.used.available(&category, pool, |t| t.id.as_str());
        if let Some(excluded) = exclude {
            candidates.retain(|t| t.id != excluded);
            if candidates.is_empty() {
                // Only the excluded track was left unused.
                self.used.clear_category(&category);
                candidates = pool.iter().filter(|t| t.id != excluded).collect();
            }
        }

        if candidates.is_empty() {
            return None;
        }

        let track = candidates[mixed_index(candidates.len(), now, rng)].clone();
        self.used.mark(&category, &track.id);

        debug!(
            category = %category,
            track = %track.title,
            used = self.used.used_count(&category),
            "Selected track"
        );
        Some(track)
    }

    pub fn recently_used(&self) -> &RecentlyUsed {
        &self.used
    }

    pub fn reset(&mut self) {
        self.used.clear();
    }
}

/// Study-subject selection.
#[derive(Debug, Clone)]
pub struct StudySelector {
    entries: HashMap<EmotionCategory, StudyEntry>,
    used: RecentlyUsed,
}

impl Default for StudySelector {
    fn default() -> Self {
        Self::new(study_catalog())
    }
}

impl StudySelector {
    pub fn new(entries: HashMap<EmotionCategory, StudyEntry>) -> Self {
        Self {
            entries,
            used: RecentlyUsed::default(),
        }
    }

    /// Recommend subjects for `label`. `None` when the label has no entry.
    pub fn recommend<R: Rng>(&mut self, label: &str, rng: &mut R) -> Option<StudySubject> {
        let category = EmotionCategory::resolve(label);
        let entry = self.entries.get(&category)?;

        // One primary per category, so a used primary means the pool is spent.
        if self.used.contains(&category, &entry.primary) {
            debug!(category = %category, "Resetting subject suggestions");
            self.used.clear_category(&category);
        }

        let mut secondary: Vec<String> = self
            .used
            .available(&category, &entry.secondary, String::as_str)
            .into_iter()
            .cloned()
            .collect();

        if secondary.len() > MAX_SECONDARY_SUBJECTS {
            secondary.shuffle(rng);
            secondary.truncate(MAX_SECONDARY_SUBJECTS);
        }

        self.used.mark(&category, &entry.primary);
        for subject in &secondary {
            self.used.mark(&category, subject);
        }

        Some(StudySubject {
            primary: entry.primary.clone(),
            secondary,
            duration: entry.duration.clone(),
            tips: entry.tips.clone(),
            reasoning: entry.reasoning.clone(),
        })
    }

    pub fn recently_used(&self) -> &RecentlyUsed {
        &self.used
    }

    pub fn reset(&mut self) {
        self.used.clear();
    }
}
