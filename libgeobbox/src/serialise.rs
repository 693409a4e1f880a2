use std::collections::BTreeMap;

use serde::Serialize;

/// `IntermediateOutputPair` is a struct representing an intermediate key-value pair as outputted
/// from a map or combine operation.
#[derive(Debug, Deserialize, PartialEq, Serialize)]
pub struct IntermediateOutputPair<K, V> {
    pub key: K,
    pub value: V,
}

/// `IntermediateOutputObject` is a struct comprising a collection of `IntermediateOutputPair`s
/// grouped by partition, representing the entire output of a map operation, ready to be
/// serialised to JSON.
#[derive(Debug, Serialize)]
pub struct IntermediateOutputObject<K: Serialize, V: Serialize> {
    pub partitions: BTreeMap<u64, Vec<IntermediateOutputPair<K, V>>>,
}

impl<K: Serialize, V: Serialize> Default for IntermediateOutputObject<K, V> {
    fn default() -> Self {
        IntermediateOutputObject { partitions: BTreeMap::new() }
    }
}

/// `FinalOutputObject` is the result of a reduce operation for one key, ready to be serialised to
/// JSON.
#[derive(Debug, Default, Serialize)]
pub struct FinalOutputObject<V: Serialize> {
    pub values: Vec<V>,
}

#[cfg(test)]
mod tests {
    use serde_json;
    use super::*;
    use bbox::BBox;

    #[test]
    fn intermediate_output_object_json_format() {
        let mut output = IntermediateOutputObject::default();
        output.partitions.insert(
            0,
            vec![
                IntermediateOutputPair {
                    key: "bbox",
                    value: BBox::new(0.0, 0.0, 1.0, 1.0),
                },
            ],
        );
        let expected_json_string = "{\"partitions\":{\"0\":[{\"key\":\"bbox\",\
                                    \"value\":{\"x1\":0.0,\"y1\":0.0,\"x2\":1.0,\"y2\":1.0}}]}}";

        let json_string = serde_json::to_string(&output).unwrap();

        assert_eq!(expected_json_string, json_string)
    }

    #[test]
    fn final_output_object_json_format() {
        let output = FinalOutputObject { values: vec![BBox::new(-1.0, 0.0, 2.0, 5.0)] };

        let json_string = serde_json::to_string(&output).unwrap();

        assert_eq!(
            r#"{"values":[{"x1":-1.0,"y1":0.0,"x2":2.0,"y2":5.0}]}"#,
            json_string
        );
    }
}
