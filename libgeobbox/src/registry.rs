use combiner::Combine;
use errors::*;
use mapper::Map;
use partition::Partition;

/// `JobRegistry` tracks the implementations a job runs with: the mapper, the combiner and the
/// partitioner.
///
/// The combiner is used both for the combine and the reduce phase, so there is no separate
/// reducer. Use `JobRegistryBuilder` to create this and then pass it in to `run`.
pub struct JobRegistry<'a, M, C, P>
where
    M: Map + 'a,
    C: Combine<M::Key, M::Value> + 'a,
    P: Partition<M::Key> + 'a,
{
    pub mapper: &'a M,
    pub combiner: &'a C,
    pub partitioner: &'a P,
}

/// `JobRegistryBuilder` is used to create a `JobRegistry`.
pub struct JobRegistryBuilder<'a, M, C, P>
where
    M: Map + 'a,
    C: Combine<M::Key, M::Value> + 'a,
    P: Partition<M::Key> + 'a,
{
    mapper: Option<&'a M>,
    combiner: Option<&'a C>,
    partitioner: Option<&'a P>,
}

impl<'a, M, C, P> Default for JobRegistryBuilder<'a, M, C, P>
where
    M: Map + 'a,
    C: Combine<M::Key, M::Value> + 'a,
    P: Partition<M::Key> + 'a,
{
    fn default() -> JobRegistryBuilder<'a, M, C, P> {
        JobRegistryBuilder {
            mapper: None,
            combiner: None,
            partitioner: None,
        }
    }
}

impl<'a, M, C, P> JobRegistryBuilder<'a, M, C, P>
where
    M: Map + 'a,
    C: Combine<M::Key, M::Value> + 'a,
    P: Partition<M::Key> + 'a,
{
    pub fn new() -> JobRegistryBuilder<'a, M, C, P> {
        Default::default()
    }

    pub fn mapper(mut self, mapper: &'a M) -> JobRegistryBuilder<'a, M, C, P> {
        self.mapper = Some(mapper);
        self
    }

    pub fn combiner(mut self, combiner: &'a C) -> JobRegistryBuilder<'a, M, C, P> {
        self.combiner = Some(combiner);
        self
    }

    pub fn partitioner(mut self, partitioner: &'a P) -> JobRegistryBuilder<'a, M, C, P> {
        self.partitioner = Some(partitioner);
        self
    }

    pub fn build(&self) -> Result<JobRegistry<'a, M, C, P>> {
        let mapper = self.mapper.chain_err(
            || "Error building JobRegistry: No Mapper provided",
        )?;
        let combiner = self.combiner.chain_err(
            || "Error building JobRegistry: No Combiner provided",
        )?;
        let partitioner = self.partitioner.chain_err(
            || "Error building JobRegistry: No Partitioner provided",
        )?;

        Ok(JobRegistry {
            mapper,
            combiner,
            partitioner,
        })
    }
}
