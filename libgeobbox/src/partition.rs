use std::collections::hash_map::DefaultHasher;
use std::hash::{Hash, Hasher};

use errors::*;

/// The `Partition` trait defines a function for routing the output of a map operation to one of
/// the host's reduce partitions.
///
/// # Arguments
///
/// * `key` - The grouping key of a map emission.
///
/// # Outputs
///
/// A Result<u64>, representing the output partition for the given key. Every emission sharing a
/// key must be routed to the same partition.
pub trait Partition<K> {
    fn partition(&self, key: &K) -> Result<u64>;
}

/// `HashPartitioner` implements `Partition` for any key that can be hashed.
pub struct HashPartitioner {
    partition_count: u64,
}

impl HashPartitioner {
    pub fn new(partition_count: u64) -> Self {
        HashPartitioner { partition_count }
    }

    pub fn partition_count(&self) -> u64 {
        self.partition_count
    }

    fn calculate_hash<T: Hash>(&self, t: &T) -> u64 {
        let mut hasher = DefaultHasher::new();
        t.hash(&mut hasher);
        hasher.finish()
    }
}

impl<K: Hash> Partition<K> for HashPartitioner {
    fn partition(&self, key: &K) -> Result<u64> {
        if self.partition_count == 0 {
            return Err("Cannot partition map output into zero partitions.".into());
        }
        let hash: u64 = self.calculate_hash(key);
        Ok(hash % self.partition_count)
    }
}
