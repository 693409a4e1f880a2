/// The `IntermediateInputKV` is a struct for passing grouped partial results to a `Combine`.
///
/// `IntermediateInputKV` is a thin wrapper around a `(Key, Vec<Value>)`,
/// used for creating a clearer API.
/// It can be constructed normally or using `IntermediateInputKV::new()`.
#[derive(Debug, Default, Deserialize, PartialEq, Serialize)]
pub struct IntermediateInputKV<K, V> {
    pub key: K,
    pub values: Vec<V>,
}

impl<K, V> IntermediateInputKV<K, V> {
    pub fn new(key: K, values: Vec<V>) -> Self {
        IntermediateInputKV { key, values }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use bbox::BBox;
    use serde_json;

    #[test]
    fn intermediate_input_kv_construction() {
        let values = vec![BBox::new(0.0, 0.0, 1.0, 1.0), BBox::Empty];

        let input = IntermediateInputKV::new("bbox".to_owned(), values);

        assert_eq!("bbox", input.key);
        assert_eq!(BBox::Empty, input.values[1]);
    }

    #[test]
    fn intermediate_input_kv_from_json() {
        let input: IntermediateInputKV<String, BBox> =
            serde_json::from_str(r#"{"key":"bbox","values":[{"x1":1,"y1":2,"x2":3,"y2":4}]}"#)
                .unwrap();

        assert_eq!(
            IntermediateInputKV::new("bbox".to_owned(), vec![BBox::new(1.0, 2.0, 3.0, 4.0)]),
            input
        );
    }
}
