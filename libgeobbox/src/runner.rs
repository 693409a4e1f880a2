use std::io::{stdin, stdout};

use chrono::prelude::*;
use clap::{App, Arg, ArgMatches, SubCommand};
use uuid::Uuid;

use combiner::Combine;
use emitter::IntermediateOutputObjectEmitter;
use errors::*;
use intermediate::IntermediateInputKV;
use io::*;
use mapper::{map_split, Map};
use partition::Partition;
use registry::JobRegistry;
use serialise::{FinalOutputObject, IntermediateOutputObject, IntermediateOutputPair};
use super::VERSION;

/// `build_app` describes the command-line interface of a payload binary.
///
/// Job options come before the subcommand, and each can also be set through the environment.
pub fn build_app<'a, 'b>() -> App<'a, 'b> {
    let current_time = Utc::now();
    let id = Uuid::new_v4();
    let payload_name = format!("{}_{}", current_time.format("%+"), id);
    App::new(payload_name)
        .version(VERSION.unwrap_or("unknown"))
        .about("Computes the bounding box of geometric records")
        .arg(
            Arg::with_name("geometry-path")
                .long("geometry-path")
                .help("Dotted path to the geometry field of each record")
                .takes_value(true)
                .env("GEOBBOX_GEOMETRY_PATH"),
        )
        .arg(
            Arg::with_name("key")
                .long("key")
                .help("Key every bounding box is emitted under")
                .takes_value(true)
                .env("GEOBBOX_KEY"),
        )
        .arg(
            Arg::with_name("group-by")
                .long("group-by")
                .help("Dotted path to a record attribute used as the key")
                .takes_value(true)
                .env("GEOBBOX_GROUP_BY"),
        )
        .arg(
            Arg::with_name("fallback-key")
                .long("fallback-key")
                .help("Key for records without the --group-by attribute")
                .takes_value(true)
                .env("GEOBBOX_FALLBACK_KEY"),
        )
        .arg(
            Arg::with_name("partitions")
                .long("partitions")
                .help("Number of partitions map output is split into")
                .takes_value(true)
                .env("GEOBBOX_PARTITIONS"),
        )
        .arg(
            Arg::with_name("collections")
                .long("collections")
                .help("How geometry collections contribute: skip or recurse")
                .takes_value(true)
                .env("GEOBBOX_COLLECTIONS"),
        )
        .subcommand(SubCommand::with_name("map"))
        .subcommand(SubCommand::with_name("combine"))
        .subcommand(SubCommand::with_name("reduce"))
        .subcommand(SubCommand::with_name("has-combine"))
        .subcommand(SubCommand::with_name("sanity-check"))
}

/// `parse_command_line` uses `clap` to parse the command-line arguments passed to the payload.
///
/// The output of this function is required by the `run` function, to decide what subcommand to
/// run.
pub fn parse_command_line<'a>() -> ArgMatches<'a> {
    build_app().get_matches()
}

/// `run` begins the primary operations of the payload, and delegates to sub-functions.
///
/// # Arguments
///
/// `matches` - The output of the `parse_command_line` function.
/// `registry` - The `JobRegistry` built from the job's mapper, combiner and partitioner.
pub fn run<M, C, P>(matches: &ArgMatches, registry: &JobRegistry<M, C, P>) -> Result<()>
where
    M: Map,
    C: Combine<M::Key, M::Value>,
    P: Partition<M::Key>,
{
    match matches.subcommand_name() {
        Some("map") => Ok(run_map(registry.mapper, registry.partitioner)?),
        Some("combine") => Ok(run_combine::<M::Key, M::Value, C>(registry.combiner)?),
        Some("reduce") => Ok(run_reduce::<M::Key, M::Value, C>(registry.combiner)?),
        Some("has-combine") => {
            run_has_combine();
            Ok(())
        }
        Some("sanity-check") => {
            run_sanity_check();
            Ok(())
        }
        None => {
            eprintln!("{}", matches.usage());
            Ok(())
        }
        // This won't ever be reached, due to clap checking invalid commands before this.
        _ => Ok(()),
    }
}

fn run_map<M, P>(mapper: &M, partitioner: &P) -> Result<()>
where
    M: Map,
    P: Partition<M::Key>,
{
    let mut source = stdin();
    let mut sink = stdout();
    let input_kv = read_map_input(&mut source).chain_err(
        || "Error getting input to map.",
    )?;

    let records = parse_records(&input_kv.value);
    let mut output_object = IntermediateOutputObject::<M::Key, M::Value>::default();

    let emitted = map_split(
        mapper,
        partitioner,
        &records,
        IntermediateOutputObjectEmitter::new(&mut output_object),
    ).chain_err(|| "Error running map operation.")?;
    info!(
        "Mapped input {}: {} records, {} emissions.",
        input_kv.key,
        records.len(),
        emitted
    );

    write_map_output(&mut sink, &output_object).chain_err(
        || "Error writing map output to stdout.",
    )?;
    Ok(())
}

fn combine_input<K, V, C>(combiner: &C, input: IntermediateInputKV<K, V>) -> (K, V)
where
    K: Clone,
    C: Combine<K, V>,
{
    let key = input.key.clone();
    let value = combiner.combine(input);
    (key, value)
}

fn run_combine<K, V, C>(combiner: &C) -> Result<()>
where
    K: ::serde::Serialize + ::serde::de::DeserializeOwned + Clone,
    V: ::serde::Serialize + ::serde::de::DeserializeOwned,
    C: Combine<K, V>,
{
    let mut source = stdin();
    let mut sink = stdout();
    let input_kv = read_combine_input(&mut source).chain_err(
        || "Error getting input to combine.",
    )?;

    let (key, value) = combine_input(combiner, input_kv);

    write_combine_output(&mut sink, &IntermediateOutputPair { key, value })
        .chain_err(|| "Error writing combine output to stdout.")?;
    Ok(())
}

fn run_reduce<K, V, C>(combiner: &C) -> Result<()>
where
    K: ::serde::de::DeserializeOwned,
    V: ::serde::Serialize + ::serde::de::DeserializeOwned,
    C: Combine<K, V>,
{
    let mut source = stdin();
    let mut sink = stdout();
    let inputs: Vec<IntermediateInputKV<K, V>> = read_reduce_input(&mut source).chain_err(
        || "Error getting input to reduce.",
    )?;

    let output_objects: Vec<FinalOutputObject<V>> = inputs
        .into_iter()
        .map(|input| FinalOutputObject { values: vec![combiner.combine(input)] })
        .collect();

    write_reduce_output(&mut sink, &output_objects).chain_err(
        || "Error writing reduce output to stdout.",
    )?;
    Ok(())
}

fn run_has_combine() {
    println!("yes");
}

fn run_sanity_check() {
    println!("sanity located");
}
