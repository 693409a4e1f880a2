use std::str::FromStr;

use clap::ArgMatches;
use serde_json::{self, Value};

use errors::*;
use record::{FieldPath, Record};

pub const DEFAULT_GEOMETRY_PATH: &str = "geometry";
pub const DEFAULT_KEY: &str = "bbox";
pub const DEFAULT_PARTITIONS: u64 = 1;

/// How a `GeometryCollection` contributes to the bounding box.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum CollectionPolicy {
    /// A collection contributes nothing.
    Skip,
    /// A collection contributes the merged boxes of its members.
    Recurse,
}

impl Default for CollectionPolicy {
    fn default() -> Self {
        CollectionPolicy::Skip
    }
}

impl FromStr for CollectionPolicy {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        match s {
            "skip" => Ok(CollectionPolicy::Skip),
            "recurse" => Ok(CollectionPolicy::Recurse),
            _ => Err(format!("Unknown geometry collection policy: {}", s).into()),
        }
    }
}

/// `GroupingKey` decides which key a record's bounding box is emitted under.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum GroupingKey {
    /// Every record shares one key, producing a single bounding box for the collection.
    Constant(String),
    /// The key is read from an attribute of the record. Records without a usable attribute value
    /// are grouped under `fallback`.
    Attribute { path: FieldPath, fallback: String },
}

impl Default for GroupingKey {
    fn default() -> Self {
        GroupingKey::Constant(DEFAULT_KEY.to_owned())
    }
}

impl GroupingKey {
    pub fn key_for(&self, record: &Record) -> String {
        match *self {
            GroupingKey::Constant(ref key) => key.clone(),
            GroupingKey::Attribute {
                ref path,
                ref fallback,
            } => {
                match record.lookup(path) {
                    Some(&Value::String(ref value)) => value.clone(),
                    Some(value) if value.is_number() || value.is_boolean() => value.to_string(),
                    _ => fallback.clone(),
                }
            }
        }
    }
}

/// `JobConfig` holds the settings of a bounding box job.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct JobConfig {
    pub geometry_path: FieldPath,
    pub key: GroupingKey,
    pub collections: CollectionPolicy,
    pub partitions: u64,
}

impl Default for JobConfig {
    fn default() -> Self {
        JobConfig {
            geometry_path: FieldPath::new(DEFAULT_GEOMETRY_PATH),
            key: GroupingKey::default(),
            collections: CollectionPolicy::default(),
            partitions: DEFAULT_PARTITIONS,
        }
    }
}

impl JobConfig {
    /// Reads a `JobConfig` from JSON. Missing fields take their default values.
    pub fn from_json(input: &str) -> Result<Self> {
        let config: JobConfig = serde_json::from_str(input).chain_err(
            || "Error parsing job configuration JSON.",
        )?;
        config.validate()?;
        Ok(config)
    }

    /// Builds a `JobConfig` from the options parsed by `runner::parse_command_line`.
    pub fn from_matches(matches: &ArgMatches) -> Result<Self> {
        let mut config = JobConfig::default();

        if let Some(path) = matches.value_of("geometry-path") {
            config.geometry_path = FieldPath::new(path);
        }

        config.key = match matches.value_of("group-by") {
            Some(path) => GroupingKey::Attribute {
                path: FieldPath::new(path),
                fallback: matches
                    .value_of("fallback-key")
                    .unwrap_or(DEFAULT_KEY)
                    .to_owned(),
            },
            None => GroupingKey::Constant(
                matches.value_of("key").unwrap_or(DEFAULT_KEY).to_owned(),
            ),
        };

        if let Some(collections) = matches.value_of("collections") {
            config.collections = collections.parse().chain_err(
                || "Error parsing --collections.",
            )?;
        }

        if let Some(partitions) = matches.value_of("partitions") {
            config.partitions = partitions.parse().chain_err(|| {
                format!("Invalid partition count: {}", partitions)
            })?;
        }

        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> Result<()> {
        if self.partitions == 0 {
            return Err("Partition count must be at least 1.".into());
        }
        Ok(())
    }
}
