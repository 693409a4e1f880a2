#![recursion_limit = "1024"]

extern crate bson;
extern crate chrono;
extern crate clap;
extern crate env_logger;
#[macro_use]
extern crate error_chain;
extern crate geojson;
#[macro_use]
extern crate log;
extern crate serde;
#[macro_use]
extern crate serde_derive;
#[cfg_attr(test, macro_use)]
extern crate serde_json;
extern crate uuid;

#[cfg(test)]
extern crate rand;

pub mod errors {
    error_chain! {
        foreign_links {
            BsonDecode(::bson::de::Error);
            Io(::std::io::Error);
            Json(::serde_json::Error);
        }
    }
}

pub mod bbox;
pub mod combiner;
pub mod config;
pub mod driver;
pub mod emitter;
pub mod extractor;
pub mod geometry;
pub mod intermediate;
pub mod io;
pub mod logging;
pub mod mapper;
pub mod partition;
pub mod record;
pub mod registry;
pub mod runner;
pub mod serialise;

// Public interface
pub use bbox::BBox;
pub use combiner::{merge_all, BBoxCombiner, Combine};
pub use config::{CollectionPolicy, GroupingKey, JobConfig};
pub use driver::LocalDriver;
pub use emitter::EmitPartitioned;
pub use errors::*;
pub use extractor::{extract, BBoxExtractor};
pub use geometry::{decode, decode_record, Coord, Geometry, Polygon};
pub use intermediate::IntermediateInputKV;
pub use logging::{init_logger, output_error};
pub use mapper::{map_split, Emission, Map, MapInputKV};
pub use partition::{HashPartitioner, Partition};
pub use record::{FieldPath, Record};
pub use registry::{JobRegistry, JobRegistryBuilder};
pub use runner::*;

const VERSION: Option<&'static str> = option_env!("CARGO_PKG_VERSION");
