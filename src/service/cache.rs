use dashmap::DashMap;
use serde_json::Value;
use std::sync::Arc;
use std::time::Duration;
use tokio::task::JoinHandle;
use tokio::time::Instant;

/// 缓存服务接口，便于在测试中替换为空实现
pub trait CacheService: Send + Sync {
    /// 条目存在且 `now - timestamp < ttl` 时返回数据
    fn get(&self, key: &str, ttl: Duration) -> Option<Value>;

    /// 无条件覆盖
    fn set(&self, key: &str, data: Value, ttl: Duration);

    /// 删除超过自身 TTL 的条目，返回删除数量
    fn sweep(&self) -> usize;
}

struct CacheEntry {
    data: Value,
    timestamp: Instant,
    ttl: Duration,
}

/// 固定 TTL 内存缓存（无 LRU、无容量上限）
#[derive(Default)]
pub struct TtlCache {
    entries: DashMap<String, CacheEntry>,
}

impl TtlCache {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

impl CacheService for TtlCache {
    fn get(&self, key: &str, ttl: Duration) -> Option<Value> {
        let entry = self.entries.get(key)?;
        if entry.timestamp.elapsed() < ttl {
            Some(entry.data.clone())
        } else {
            None
        }
    }

    fn set(&self, key: &str, data: Value, ttl: Duration) {
        self.entries.insert(
            key.to_string(),
            CacheEntry {
                data,
                timestamp: Instant::now(),
                ttl,
            },
        );
    }

    fn sweep(&self) -> usize {
        let before = self.entries.len();
        let now = Instant::now();
        self.entries
            .retain(|_, e| now.duration_since(e.timestamp) <= e.ttl);
        before.saturating_sub(self.entries.len())
    }
}

/// 不缓存任何内容
#[derive(Debug, Default, Clone, Copy)]
pub struct NoopCache;

impl CacheService for NoopCache {
    fn get(&self, _key: &str, _ttl: Duration) -> Option<Value> {
        None
    }

    fn set(&self, _key: &str, _data: Value, _ttl: Duration) {}

    fn sweep(&self) -> usize {
        0
    }
}

/// 定期清理过期条目；中止返回的任务即停止清理
pub fn spawn_sweeper(cache: Arc<dyn CacheService>, every: Duration) -> JoinHandle<()> {
    tokio::spawn(async move {
        let mut ticker = tokio::time::interval(every);
        // 第一次 tick 立即完成
        ticker.tick().await;
        loop {
            ticker.tick().await;
            let removed = cache.sweep();
            if removed > 0 {
                tracing::info!("缓存清理: 删除 {} 个过期条目", removed);
            } else {
                tracing::debug!("缓存清理: 无过期条目");
            }
        }
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[tokio::test(start_paused = true)]
    async fn entry_is_never_returned_once_stale() {
        let cache = TtlCache::new();
        let ttl = Duration::from_millis(1000);
        cache.set("k", json!({"v": 1}), ttl);

        assert_eq!(cache.get("k", ttl), Some(json!({"v": 1})));

        tokio::time::advance(Duration::from_millis(999)).await;
        assert!(cache.get("k", ttl).is_some());

        tokio::time::advance(Duration::from_millis(2)).await;
        assert_eq!(cache.get("k", ttl), None);
    }

    #[tokio::test(start_paused = true)]
    async fn set_overwrites_and_restarts_clock() {
        let cache = TtlCache::new();
        let ttl = Duration::from_secs(1);
        cache.set("k", json!(1), ttl);
        tokio::time::advance(Duration::from_millis(800)).await;
        cache.set("k", json!(2), ttl);
        tokio::time::advance(Duration::from_millis(800)).await;

        assert_eq!(cache.get("k", ttl), Some(json!(2)));
    }

    #[tokio::test(start_paused = true)]
    async fn get_uses_caller_ttl() {
        let cache = TtlCache::new();
        cache.set("k", json!("x"), Duration::from_secs(60));
        tokio::time::advance(Duration::from_secs(5)).await;

        assert!(cache.get("k", Duration::from_secs(2)).is_none());
        assert!(cache.get("k", Duration::from_secs(10)).is_some());
    }

    #[tokio::test(start_paused = true)]
    async fn sweep_removes_entries_past_their_own_ttl() {
        let cache = TtlCache::new();
        cache.set("short", json!(1), Duration::from_secs(1));
        cache.set("long", json!(2), Duration::from_secs(600));

        tokio::time::advance(Duration::from_secs(2)).await;
        assert_eq!(cache.sweep(), 1);
        assert_eq!(cache.len(), 1);
        assert!(cache.get("long", Duration::from_secs(600)).is_some());
    }

    #[tokio::test(start_paused = true)]
    async fn sweeper_task_runs_on_interval() {
        let cache = Arc::new(TtlCache::new());
        cache.set("k", json!(1), Duration::from_secs(10));

        let handle = spawn_sweeper(cache.clone(), Duration::from_secs(300));
        // 暂停时钟下自动推进，清理任务在 300s 先触发
        tokio::time::sleep(Duration::from_secs(301)).await;

        assert!(cache.is_empty());
        handle.abort();
    }

    #[test]
    fn noop_cache_never_hits() {
        let cache = NoopCache;
        cache.set("k", json!(1), Duration::from_secs(60));
        assert!(cache.get("k", Duration::from_secs(60)).is_none());
        assert_eq!(cache.sweep(), 0);
    }
}
