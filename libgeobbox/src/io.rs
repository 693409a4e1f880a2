use std::io::{Read, Write};

use bson;
use serde::Serialize;
use serde::de::DeserializeOwned;
use serde_json;

use errors::*;
use intermediate::IntermediateInputKV;
use mapper::MapInputKV;
use record::Record;
use serialise::{FinalOutputObject, IntermediateOutputObject, IntermediateOutputPair};

/// `read_map_input` reads a BSON document from a source and returns a `MapInputKV`.
///
/// It returns an `errors::Error` if the document cannot be read or does not have the shape of a
/// `MapInputKV`.
pub fn read_map_input<R: Read>(source: &mut R) -> Result<MapInputKV> {
    let document = bson::Document::from_reader(source)?;
    let result = bson::from_document(document).chain_err(
        || "Error parsing input BSON to MapInputKV.",
    )?;
    Ok(result)
}

/// `parse_records` splits the value of a map input into records, one JSON document per line.
///
/// Blank lines are skipped. A line which is not valid JSON is logged and skipped, so a single bad
/// record does not fail the whole map operation.
pub fn parse_records(input: &str) -> Vec<Record> {
    input
        .lines()
        .enumerate()
        .filter(|&(_, line)| !line.trim().is_empty())
        .filter_map(|(index, line)| match Record::parse(line) {
            Ok(record) => Some(record),
            Err(err) => {
                warn!("Skipping unparseable record on line {}: {}", index + 1, err);
                None
            }
        })
        .collect()
}

fn read_json<R, T>(source: &mut R, description: &str) -> Result<T>
where
    R: Read,
    T: DeserializeOwned,
{
    let mut input_string = String::new();
    let bytes_read = source.read_to_string(&mut input_string).chain_err(
        || "Error reading from source.",
    )?;
    if bytes_read == 0 {
        warn!("bytes_read is 0");
    }
    let result = serde_json::from_str(input_string.as_str()).chain_err(|| {
        format!("Error parsing input JSON to {}.", description)
    })?;
    Ok(result)
}

/// `read_combine_input` reads a single key and its partial results as JSON.
pub fn read_combine_input<R, K, V>(source: &mut R) -> Result<IntermediateInputKV<K, V>>
where
    R: Read,
    K: DeserializeOwned,
    V: DeserializeOwned,
{
    read_json(source, "IntermediateInputKV")
}

/// `read_reduce_input` reads a JSON array of keys and their partial results.
pub fn read_reduce_input<R, K, V>(source: &mut R) -> Result<Vec<IntermediateInputKV<K, V>>>
where
    R: Read,
    K: DeserializeOwned,
    V: DeserializeOwned,
{
    read_json(source, "a list of IntermediateInputKV")
}

fn write_json<W: Write, T: Serialize>(sink: &mut W, output: &T) -> Result<()> {
    let output_string = serde_json::to_string(output).chain_err(
        || "Error serialising output.",
    )?;
    sink.write_all(output_string.as_bytes()).chain_err(
        || "Error writing output to sink.",
    )?;
    sink.flush().chain_err(|| "Error flushing sink.")?;
    Ok(())
}

/// `write_map_output` writes the partitioned output of a map operation as JSON.
pub fn write_map_output<W, K, V>(
    sink: &mut W,
    output: &IntermediateOutputObject<K, V>,
) -> Result<()>
where
    W: Write,
    K: Serialize,
    V: Serialize,
{
    write_json(sink, output).chain_err(|| "Error writing map output.")
}

/// `write_combine_output` writes the single key-value pair produced by a combine operation.
pub fn write_combine_output<W, K, V>(
    sink: &mut W,
    output: &IntermediateOutputPair<K, V>,
) -> Result<()>
where
    W: Write,
    K: Serialize,
    V: Serialize,
{
    write_json(sink, output).chain_err(|| "Error writing combine output.")
}

/// `write_reduce_output` writes one `FinalOutputObject` per reduced key, in input order.
pub fn write_reduce_output<W, V>(sink: &mut W, output: &[FinalOutputObject<V>]) -> Result<()>
where
    W: Write,
    V: Serialize,
{
    write_json(sink, &output).chain_err(|| "Error writing reduce output.")
}

#[cfg(test)]
mod tests {
    use std::io::Cursor;

    use super::*;
    use bbox::BBox;

    #[test]
    fn read_valid_map_input_kv() {
        let mut document = bson::Document::new();
        document.insert("key", "split-0");
        document.insert("value", "{\"geometry\":null}\n");
        let mut buf = Vec::new();
        document.to_writer(&mut buf).unwrap();
        let expected_result = MapInputKV {
            key: "split-0".to_owned(),
            value: "{\"geometry\":null}\n".to_owned(),
        };

        let result = read_map_input(&mut Cursor::new(buf)).unwrap();

        assert_eq!(expected_result, result);
    }

    #[test]
    fn read_invalid_map_input_kv() {
        let test_string = "";
        let mut cursor = Cursor::new(test_string);

        match read_map_input(&mut cursor) {
            Err(Error(ErrorKind::BsonDecode(_), _)) => {}
            other => panic!("Unexpected map input result: {:?}", other),
        }
    }

    #[test]
    fn parse_records_skips_blank_and_bad_lines() {
        let input = "{\"id\": 1}\n\n   \nnot json\n{\"id\": 2}";

        let records = parse_records(input);

        assert_eq!(
            vec![Record::new(json!({"id": 1})), Record::new(json!({"id": 2}))],
            records
        );
    }

    #[test]
    fn read_valid_combine_input_kv() {
        let test_string = r#"{"key":"bbox","values":[{"x1":0,"y1":0,"x2":1,"y2":1},null]}"#;
        let mut cursor = Cursor::new(test_string);
        let expected_result = IntermediateInputKV::new(
            "bbox".to_owned(),
            vec![BBox::new(0.0, 0.0, 1.0, 1.0), BBox::Empty],
        );

        let result: IntermediateInputKV<String, BBox> = read_combine_input(&mut cursor).unwrap();

        assert_eq!(expected_result, result);
    }

    #[test]
    fn read_valid_reduce_input() {
        let test_string = r#"[{"key":"a","values":[null]},{"key":"b","values":[]}]"#;
        let mut cursor = Cursor::new(test_string);

        let result: Vec<IntermediateInputKV<String, BBox>> =
            read_reduce_input(&mut cursor).unwrap();

        assert_eq!(2, result.len());
        assert_eq!("b", result[1].key);
    }

    #[test]
    #[should_panic]
    fn read_invalid_reduce_input() {
        let test_string = "";
        let mut cursor = Cursor::new(test_string);

        let _: Vec<IntermediateInputKV<String, BBox>> = read_reduce_input(&mut cursor).unwrap();
    }

    #[test]
    fn write_reduce_output_in_order() {
        let output = vec![
            FinalOutputObject { values: vec![BBox::new(0.0, 0.0, 1.0, 1.0)] },
            FinalOutputObject { values: vec![BBox::Empty] },
        ];
        let mut sink = Vec::new();

        write_reduce_output(&mut sink, &output).unwrap();

        assert_eq!(
            r#"[{"values":[{"x1":0.0,"y1":0.0,"x2":1.0,"y2":1.0}]},{"values":[null]}]"#,
            String::from_utf8(sink).unwrap()
        );
    }
}
