use std::collections::HashMap;
use std::sync::{Mutex, PoisonError};
use std::time::{Duration, Instant};

/// Short-lived per (session, item) cache of `/buy` responses so repeated
/// clicks do not create a new payment intent each time.
pub struct BuyCache<V> {
    ttl: Duration,
    entries: Mutex<HashMap<String, (Instant, V)>>,
}

impl<V: Clone> BuyCache<V> {
    pub fn new(ttl: Duration) -> Self {
        Self {
            ttl,
            entries: Mutex::new(HashMap::new()),
        }
    }

    pub fn key(session_key: &str, item_id: i64) -> String {
        format!("session_buy_{session_key}_{item_id}")
    }

    pub fn get(&self, session_key: &str, item_id: i64) -> Option<V> {
        let key = Self::key(session_key, item_id);
        let mut entries = self.entries.lock().unwrap_or_else(PoisonError::into_inner);
        match entries.get(&key) {
            Some((expires_at, value)) if Instant::now() < *expires_at => Some(value.clone()),
            Some(_) => {
                entries.remove(&key);
                None
            }
            None => None,
        }
    }

    pub fn set(&self, session_key: &str, item_id: i64, value: V) {
        let now = Instant::now();
        let mut entries = self.entries.lock().unwrap_or_else(PoisonError::into_inner);
        entries.retain(|_, (expires_at, _)| now < *expires_at);
        entries.insert(Self::key(session_key, item_id), (now + self.ttl, value));
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn returns_value_within_ttl() {
        let cache = BuyCache::new(Duration::from_secs(60));
        cache.set("abc", 1, "pi_secret".to_string());
        assert_eq!(cache.get("abc", 1), Some("pi_secret".to_string()));
    }

    #[test]
    fn keys_are_per_session_and_item() {
        let cache = BuyCache::new(Duration::from_secs(60));
        cache.set("abc", 1, 10);
        assert_eq!(cache.get("abc", 2), None);
        assert_eq!(cache.get("xyz", 1), None);
        assert_eq!(BuyCache::<i32>::key("abc", 1), "session_buy_abc_1");
    }

    #[test]
    fn expired_entries_are_dropped() {
        let cache = BuyCache::new(Duration::ZERO);
        cache.set("abc", 1, 10);
        assert_eq!(cache.get("abc", 1), None);
    }
}
