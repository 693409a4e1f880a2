extern crate error_chain;
extern crate geobbox;

use std::process;

use error_chain::ChainedError;
use geobbox::*;

fn run() -> Result<()> {
    let matches = geobbox::parse_command_line();
    let config = JobConfig::from_matches(&matches).chain_err(
        || "Error reading job configuration.",
    )?;

    let bbox_extractor = BBoxExtractor::new(&config);
    let bbox_combiner = BBoxCombiner;
    let bbox_partitioner = HashPartitioner::new(config.partitions);

    let registry = JobRegistryBuilder::new()
        .mapper(&bbox_extractor)
        .combiner(&bbox_combiner)
        .partitioner(&bbox_partitioner)
        .build()
        .chain_err(|| "Error building JobRegistry.")?;

    geobbox::run(&matches, &registry)
}

fn main() {
    if let Err(err) = init_logger() {
        eprintln!("{}", err.display_chain());
        process::exit(1);
    }

    if let Err(err) = run() {
        output_error(&err);
        process::exit(1);
    }
}
