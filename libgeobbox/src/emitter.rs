use std::collections::BTreeMap;

use serde::Serialize;

use errors::*;
use serialise::{IntermediateOutputObject, IntermediateOutputPair};

/// The `EmitPartitioned` trait specifies structs which can send key-value pairs to a given
/// partition of an in-memory data structure.
pub trait EmitPartitioned<K, V> {
    /// Takes ownership of a key-value pair and stores it in the given partition.
    ///
    /// Returns an empty `Result` used for error handling.
    fn emit(&mut self, partition: u64, key: K, value: V) -> Result<()>;
}

/// A struct implementing `EmitPartitioned` which emits to a partitioned map of `Vec`s.
pub struct PartitionVecEmitter<'a, K: 'a, V: 'a> {
    sink: &'a mut BTreeMap<u64, Vec<(K, V)>>,
}

impl<'a, K, V> PartitionVecEmitter<'a, K, V> {
    /// Constructs a new `PartitionVecEmitter` with a mutable reference to a given map.
    ///
    /// # Arguments
    ///
    /// * `sink` - A mutable reference to the map to receive the emitted values.
    pub fn new(sink: &'a mut BTreeMap<u64, Vec<(K, V)>>) -> Self {
        PartitionVecEmitter { sink }
    }
}

impl<'a, K, V> EmitPartitioned<K, V> for PartitionVecEmitter<'a, K, V> {
    fn emit(&mut self, partition: u64, key: K, value: V) -> Result<()> {
        self.sink.entry(partition).or_insert_with(Vec::new).push(
            (key, value),
        );
        Ok(())
    }
}

/// A struct implementing `EmitPartitioned` which emits to an `IntermediateOutputObject`, to be
/// written back to the host after a map operation.
pub struct IntermediateOutputObjectEmitter<'a, K: Serialize + 'a, V: Serialize + 'a> {
    sink: &'a mut IntermediateOutputObject<K, V>,
}

impl<'a, K: Serialize, V: Serialize> IntermediateOutputObjectEmitter<'a, K, V> {
    pub fn new(sink: &'a mut IntermediateOutputObject<K, V>) -> Self {
        IntermediateOutputObjectEmitter { sink }
    }
}

impl<'a, K: Serialize, V: Serialize> EmitPartitioned<K, V>
    for IntermediateOutputObjectEmitter<'a, K, V> {
    fn emit(&mut self, partition: u64, key: K, value: V) -> Result<()> {
        self.sink
            .partitions
            .entry(partition)
            .or_insert_with(Vec::new)
            .push(IntermediateOutputPair { key, value });
        Ok(())
    }
}
