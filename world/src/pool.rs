//! Default resource pool used when the host does not provide its own.

use std::collections::{BTreeMap, VecDeque};

use lane_blast_core::{PoolKind, PooledInstance, ResourcePool};
use tracing::warn;

#[derive(Clone, Debug, Default)]
struct Bucket {
    created: u32,
    free: VecDeque<PooledInstance>,
}

/// Pool that recycles released instances per kind before minting new ones.
#[derive(Clone, Debug, Default)]
pub struct RecyclingPool {
    buckets: BTreeMap<PoolKind, Bucket>,
}

impl RecyclingPool {
    /// Creates an empty pool.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of instances of the kind ever created.
    #[must_use]
    pub fn created(&self, kind: PoolKind) -> u32 {
        self.buckets.get(&kind).map_or(0, |bucket| bucket.created)
    }

    /// Number of instances of the kind currently borrowed.
    #[must_use]
    pub fn outstanding(&self, kind: PoolKind) -> u32 {
        self.buckets.get(&kind).map_or(0, |bucket| {
            bucket.created.saturating_sub(bucket.free.len() as u32)
        })
    }
}

impl ResourcePool for RecyclingPool {
    fn acquire(&mut self, kind: PoolKind) -> PooledInstance {
        let bucket = self.buckets.entry(kind).or_default();
        if let Some(instance) = bucket.free.pop_front() {
            return instance;
        }
        let instance = PooledInstance::new(bucket.created);
        bucket.created = bucket.created.saturating_add(1);
        instance
    }

    fn release(&mut self, kind: PoolKind, instance: PooledInstance) {
        let bucket = self.buckets.entry(kind).or_default();
        if instance.get() >= bucket.created || bucket.free.contains(&instance) {
            warn!(?kind, instance = instance.get(), "pool_release_ignored");
            return;
        }
        bucket.free.push_back(instance);
    }
}

#[cfg(test)]
mod tests {
    use lane_blast_core::{PoolKind, PooledInstance, ResourcePool};

    use super::RecyclingPool;

    #[test]
    fn released_instances_are_reused() {
        let mut pool = RecyclingPool::new();

        let first = pool.acquire(PoolKind::Projectile);
        let second = pool.acquire(PoolKind::Projectile);
        assert_ne!(first, second);
        assert_eq!(pool.outstanding(PoolKind::Projectile), 2);

        pool.release(PoolKind::Projectile, first);
        assert_eq!(pool.acquire(PoolKind::Projectile), first);
        assert_eq!(pool.created(PoolKind::Projectile), 2);
    }

    #[test]
    fn kinds_are_pooled_separately() {
        let mut pool = RecyclingPool::new();

        let projectile = pool.acquire(PoolKind::Projectile);
        pool.release(PoolKind::Projectile, projectile);
        let _ = pool.acquire(PoolKind::Effect);

        assert_eq!(pool.created(PoolKind::Effect), 1);
        assert_eq!(pool.outstanding(PoolKind::Projectile), 0);
    }

    #[test]
    fn double_and_foreign_releases_are_ignored() {
        let mut pool = RecyclingPool::new();

        let instance = pool.acquire(PoolKind::Effect);
        pool.release(PoolKind::Effect, instance);
        pool.release(PoolKind::Effect, instance);
        pool.release(PoolKind::Effect, PooledInstance::new(40));

        assert_eq!(pool.outstanding(PoolKind::Effect), 0);
        assert_eq!(pool.acquire(PoolKind::Effect), instance);
        assert_eq!(pool.created(PoolKind::Effect), 1);
    }
}
