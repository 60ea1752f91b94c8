pub mod keys;

use std::collections::HashMap;
use std::sync::Arc;
use std::time::Duration;

use parking_lot::RwLock;

use crate::intelligence::clock::Clock;
use crate::intelligence::config::CacheParams;
use crate::intelligence::types::{ContentRecommendation, DailyContentPack};

#[derive(Debug, Clone)]
struct Entry<V> {
    value: V,
    /// `None` never expires.
    expires_at: Option<i64>,
}

impl<V> Entry<V> {
    fn is_expired(&self, now: i64) -> bool {
        self.expires_at.is_some_and(|at| now >= at)
    }
}

/// Keyed values with per-entry expiry. Expired entries are dropped when read.
struct TtlMap<V> {
    entries: RwLock<HashMap<String, Entry<V>>>,
}

impl<V: Clone> TtlMap<V> {
    fn new() -> Self {
        Self {
            entries: RwLock::new(HashMap::new()),
        }
    }

    fn get(&self, key: &str, now: i64) -> Option<V> {
        {
            let entries = self.entries.read();
            match entries.get(key) {
                None => return None,
                Some(entry) if !entry.is_expired(now) => return Some(entry.value.clone()),
                Some(_) => {}
            }
        }

        let mut entries = self.entries.write();
        // re-check under the write lock; a writer may have refreshed it
        match entries.get(key) {
            Some(entry) if !entry.is_expired(now) => Some(entry.value.clone()),
            Some(_) => {
                entries.remove(key);
                None
            }
            None => None,
        }
    }

    fn put(&self, key: &str, value: V, ttl: Duration, now: i64) {
        let expires_at = if ttl.is_zero() {
            None
        } else {
            let ttl_ms = i64::try_from(ttl.as_millis()).unwrap_or(i64::MAX);
            Some(now.saturating_add(ttl_ms))
        };
        self.entries
            .write()
            .insert(key.to_string(), Entry { value, expires_at });
    }

    fn remove(&self, key: &str) -> bool {
        self.entries.write().remove(key).is_some()
    }

    fn purge(&self, now: i64) -> usize {
        let mut entries = self.entries.write();
        let before = entries.len();
        entries.retain(|_, entry| !entry.is_expired(now));
        before - entries.len()
    }

    fn clear(&self) {
        self.entries.write().clear();
    }

    fn len(&self) -> usize {
        self.entries.read().len()
    }
}

/// Memoizes recommendation lists and daily content packs for a limited time.
///
/// A zero TTL stores the entry without expiry.
pub struct RecommendationCache {
    recommendations: TtlMap<Vec<ContentRecommendation>>,
    daily_packs: TtlMap<DailyContentPack>,
    params: CacheParams,
    clock: Arc<dyn Clock>,
}

impl RecommendationCache {
    pub fn new(params: CacheParams, clock: Arc<dyn Clock>) -> Self {
        Self {
            recommendations: TtlMap::new(),
            daily_packs: TtlMap::new(),
            params,
            clock,
        }
    }

    pub fn get_recommendations(&self, key: &str) -> Option<Vec<ContentRecommendation>> {
        let hit = self.recommendations.get(key, self.clock.now_ms());
        tracing::trace!(key, hit = hit.is_some(), "recommendation cache lookup");
        hit
    }

    pub fn put_recommendations(
        &self,
        key: &str,
        recommendations: Vec<ContentRecommendation>,
        ttl: Option<Duration>,
    ) {
        let ttl = ttl.unwrap_or_else(|| self.params.recommendation_ttl());
        self.recommendations
            .put(key, recommendations, ttl, self.clock.now_ms());
    }

    pub fn get_daily_pack(&self, key: &str) -> Option<DailyContentPack> {
        let hit = self.daily_packs.get(key, self.clock.now_ms());
        tracing::trace!(key, hit = hit.is_some(), "daily pack cache lookup");
        hit
    }

    pub fn put_daily_pack(&self, key: &str, pack: DailyContentPack, ttl: Option<Duration>) {
        let ttl = ttl.unwrap_or_else(|| self.params.daily_pack_ttl());
        self.daily_packs.put(key, pack, ttl, self.clock.now_ms());
    }

    /// Drops `key` from both maps. Returns whether anything was removed.
    pub fn invalidate(&self, key: &str) -> bool {
        let recommendations = self.recommendations.remove(key);
        let pack = self.daily_packs.remove(key);
        recommendations || pack
    }

    pub fn purge_expired(&self) -> usize {
        let now = self.clock.now_ms();
        let purged = self.recommendations.purge(now) + self.daily_packs.purge(now);
        if purged > 0 {
            tracing::debug!(purged, "purged expired cache entries");
        }
        purged
    }

    pub fn clear(&self) {
        self.recommendations.clear();
        self.daily_packs.clear();
    }

    pub fn len(&self) -> usize {
        self.recommendations.len() + self.daily_packs.len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

#[cfg(test)]
mod tests {
    use super::keys::{daily_pack_key, recommendations_key};
    use super::*;
    use crate::intelligence::clock::ManualClock;
    use crate::intelligence::types::{ContentType, SkillCategory};

    const MINUTE_MS: i64 = 60_000;

    fn recommendation(id: &str) -> ContentRecommendation {
        ContentRecommendation {
            content_id: id.to_string(),
            content_type: ContentType::Vocabulary,
            title: "ubiquitous".to_string(),
            description: String::new(),
            estimated_time: 2,
            difficulty: 3.0,
            relevance_score: 0.8,
            reason: "Matches your current level".to_string(),
            skill_focus: vec![SkillCategory::Vocab],
        }
    }

    fn pack(id: &str) -> DailyContentPack {
        DailyContentPack {
            id: id.to_string(),
            date: 0,
            vocabulary: vec![],
            questions: vec![],
            reading: None,
            recommended_sequence: vec![ContentType::Vocabulary, ContentType::Questions],
            estimated_total_time: 25,
            focus_areas: vec![SkillCategory::Grammar],
            difficulty_level: 3.0,
            confidence_score: 0.6,
        }
    }

    fn cache() -> (RecommendationCache, Arc<ManualClock>) {
        let clock = Arc::new(ManualClock::new(0));
        (
            RecommendationCache::new(CacheParams::default(), clock.clone()),
            clock,
        )
    }

    #[test]
    fn recommendations_expire_after_default_ttl() {
        let (cache, clock) = cache();
        let key = recommendations_key("u1", 5);
        cache.put_recommendations(&key, vec![recommendation("c1")], None);

        clock.advance_ms(29 * MINUTE_MS);
        assert_eq!(cache.get_recommendations(&key).map(|r| r.len()), Some(1));

        clock.advance_ms(MINUTE_MS);
        assert!(cache.get_recommendations(&key).is_none());
        // lazily removed on the failed read
        assert_eq!(cache.len(), 0);
    }

    #[test]
    fn daily_packs_live_longer_and_honor_overrides() {
        let (cache, clock) = cache();
        let day = daily_pack_key("2024-03-01");
        let short = daily_pack_key("2024-03-02");
        cache.put_daily_pack(&day, pack("p1"), None);
        cache.put_daily_pack(&short, pack("p2"), Some(Duration::from_secs(60)));

        clock.advance_ms(90 * MINUTE_MS);
        assert_eq!(cache.get_daily_pack(&day).map(|p| p.id), Some("p1".to_string()));
        assert!(cache.get_daily_pack(&short).is_none());

        clock.advance_ms(30 * MINUTE_MS);
        assert!(cache.get_daily_pack(&day).is_none());
    }

    #[test]
    fn zero_ttl_never_expires() {
        let (cache, clock) = cache();
        cache.put_recommendations("pinned", vec![], Some(Duration::ZERO));
        clock.advance_ms(i64::from(u32::MAX));
        assert!(cache.get_recommendations("pinned").is_some());
    }

    #[test]
    fn huge_default_ttl_is_stored_without_overflow() {
        let clock = Arc::new(ManualClock::new(0));
        let params = CacheParams {
            recommendation_ttl_minutes: u64::MAX,
            daily_pack_ttl_minutes: u64::MAX,
        };
        let cache = RecommendationCache::new(params, clock.clone());
        cache.put_recommendations("k", vec![], None);
        cache.put_daily_pack("d", pack("p1"), None);

        clock.advance_ms(365 * 24 * 60 * MINUTE_MS);
        assert!(cache.get_recommendations("k").is_some());
        assert!(cache.get_daily_pack("d").is_some());
    }

    #[test]
    fn purge_invalidate_and_clear() {
        let (cache, clock) = cache();
        cache.put_recommendations("a", vec![recommendation("c1")], None);
        cache.put_recommendations("b", vec![], Some(Duration::from_secs(10)));
        cache.put_daily_pack("a", pack("p1"), None);
        assert_eq!(cache.len(), 3);

        clock.advance_ms(20_000);
        assert_eq!(cache.purge_expired(), 1);
        assert_eq!(cache.len(), 2);

        assert!(cache.invalidate("a"));
        assert!(!cache.invalidate("a"));
        assert!(cache.is_empty());

        cache.put_daily_pack("c", pack("p3"), None);
        cache.clear();
        assert!(cache.is_empty());
    }

    #[test]
    fn concurrent_readers_and_writers() {
        let (cache, _) = cache();
        let cache = Arc::new(cache);
        let handles: Vec<_> = (0..4)
            .map(|i| {
                let cache = cache.clone();
                std::thread::spawn(move || {
                    for j in 0..100 {
                        let key = format!("u{}", (i * 100 + j) % 10);
                        cache.put_recommendations(&key, vec![recommendation("c")], None);
                        let _ = cache.get_recommendations(&key);
                    }
                })
            })
            .collect();
        for handle in handles {
            handle.join().unwrap();
        }
        assert_eq!(cache.len(), 10);
    }
}
