use std::hash::Hash;

use serde::Serialize;
use serde::de::DeserializeOwned;

use emitter::EmitPartitioned;
use errors::*;
use partition::Partition;
use record::Record;

/// The `MapInputKV` is the document a host sends to a map operation.
///
/// `key` names the input split and `value` holds its records, one JSON document per line.
#[derive(Debug, Default, Deserialize, PartialEq, Serialize)]
pub struct MapInputKV {
    pub key: String,
    pub value: String,
}

/// An `Emission` is the keyed partial result a map operation produces for one record.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Emission<K, V> {
    pub key: K,
    pub value: V,
}

impl<K, V> Emission<K, V> {
    pub fn new(key: K, value: V) -> Self {
        Emission { key, value }
    }
}

/// The `Map` trait defines a function for performing a map operation on a single record.
///
/// Implementations must be pure: the result depends only on the record, so the host may invoke
/// them concurrently, in any order and more than once.
///
/// # Arguments
///
/// * `record` - The record to map.
///
/// # Outputs
///
/// `Some(Emission)` when the record contributes to the aggregation, `None` when it does not.
pub trait Map {
    type Key: Serialize + DeserializeOwned + Clone + Eq + Hash + Ord;
    type Value: Serialize + DeserializeOwned;
    fn map(&self, record: &Record) -> Option<Emission<Self::Key, Self::Value>>;
}

/// `map_split` runs `mapper` over every record of an input split and sends each emission to the
/// partition chosen by `partitioner`.
///
/// Returns the number of emissions sent.
pub fn map_split<'r, M, P, E, I>(
    mapper: &M,
    partitioner: &P,
    records: I,
    mut emitter: E,
) -> Result<usize>
where
    M: Map,
    P: Partition<M::Key>,
    E: EmitPartitioned<M::Key, M::Value>,
    I: IntoIterator<Item = &'r Record>,
{
    let mut emitted = 0;
    for record in records {
        if let Some(emission) = mapper.map(record) {
            let partition = partitioner.partition(&emission.key).chain_err(
                || "Error partitioning map output.",
            )?;
            emitter
                .emit(partition, emission.key, emission.value)
                .chain_err(|| "Error emitting map key-value pair.")?;
            emitted += 1;
        }
    }
    Ok(emitted)
}
