use std::cmp;
use std::collections::BTreeMap;

use combiner::Combine;
use emitter::PartitionVecEmitter;
use errors::*;
use intermediate::IntermediateInputKV;
use mapper::{map_split, Map};
use partition::Partition;
use record::Record;
use registry::JobRegistry;

const DEFAULT_SPLITS: usize = 1;
const DEFAULT_FAN_IN: usize = 2;

/// `LocalDriver` runs a whole job in-process, the way a cluster would run it across workers.
///
/// Records are divided into `splits` contiguous input splits. Each split is mapped and its output
/// grouped by partition and key, then pre-combined per key. The combined results of every split
/// are shuffled to their partition and reduced per key in a tree, combining at most `fan_in`
/// values at a time, until one value per key remains.
pub struct LocalDriver<'a, M, C, P>
where
    M: Map + 'a,
    C: Combine<M::Key, M::Value> + 'a,
    P: Partition<M::Key> + 'a,
{
    registry: &'a JobRegistry<'a, M, C, P>,
    splits: usize,
    fan_in: usize,
}

impl<'a, M, C, P> LocalDriver<'a, M, C, P>
where
    M: Map + 'a,
    C: Combine<M::Key, M::Value> + 'a,
    P: Partition<M::Key> + 'a,
{
    pub fn new(registry: &'a JobRegistry<'a, M, C, P>) -> Self {
        LocalDriver {
            registry,
            splits: DEFAULT_SPLITS,
            fan_in: DEFAULT_FAN_IN,
        }
    }

    pub fn splits(mut self, splits: usize) -> Self {
        self.splits = splits;
        self
    }

    pub fn fan_in(mut self, fan_in: usize) -> Self {
        self.fan_in = fan_in;
        self
    }

    /// Runs the job over `records`, returning one value per distinct key.
    pub fn run(&self, records: &[Record]) -> Result<BTreeMap<M::Key, M::Value>> {
        if self.splits == 0 {
            return Err("LocalDriver needs at least one input split.".into());
        }
        if self.fan_in < 2 {
            return Err("LocalDriver needs a reduce fan-in of at least 2.".into());
        }

        let split_len = cmp::max(1, div_ceil(records.len(), self.splits));
        let mut shuffled: BTreeMap<u64, BTreeMap<M::Key, Vec<M::Value>>> = BTreeMap::new();

        for (split_index, split) in records.chunks(split_len).enumerate() {
            let mut map_output: BTreeMap<u64, Vec<(M::Key, M::Value)>> = BTreeMap::new();
            let emitted = map_split(
                self.registry.mapper,
                self.registry.partitioner,
                split,
                PartitionVecEmitter::new(&mut map_output),
            ).chain_err(|| format!("Error mapping input split {}.", split_index))?;
            debug!(
                "Split {}: {} records, {} emissions.",
                split_index,
                split.len(),
                emitted
            );

            for (partition, pairs) in map_output {
                let reduce_input = shuffled.entry(partition).or_insert_with(BTreeMap::new);
                for (key, values) in group_by_key(pairs) {
                    let combined = self.combine(&key, values);
                    reduce_input.entry(key).or_insert_with(Vec::new).push(
                        combined,
                    );
                }
            }
        }

        let mut results = BTreeMap::new();
        for (partition, groups) in shuffled {
            debug!("Reducing partition {}: {} keys.", partition, groups.len());
            for (key, values) in groups {
                let value = self.reduce_tree(&key, values);
                results.insert(key, value);
            }
        }
        Ok(results)
    }

    fn combine(&self, key: &M::Key, values: Vec<M::Value>) -> M::Value {
        self.registry.combiner.combine(
            IntermediateInputKV::new(key.clone(), values),
        )
    }

    fn reduce_tree(&self, key: &M::Key, mut values: Vec<M::Value>) -> M::Value {
        while values.len() > self.fan_in {
            let mut level = Vec::with_capacity(values.len() / self.fan_in + 1);
            let mut remaining = values.into_iter().peekable();
            while remaining.peek().is_some() {
                let group: Vec<M::Value> = remaining.by_ref().take(self.fan_in).collect();
                level.push(self.combine(key, group));
            }
            values = level;
        }
        self.combine(key, values)
    }
}

fn div_ceil(numerator: usize, denominator: usize) -> usize {
    numerator / denominator + if numerator % denominator == 0 { 0 } else { 1 }
}

fn group_by_key<K: Ord, V>(pairs: Vec<(K, V)>) -> BTreeMap<K, Vec<V>> {
    let mut groups = BTreeMap::new();
    for (key, value) in pairs {
        groups.entry(key).or_insert_with(Vec::new).push(value);
    }
    groups
}
