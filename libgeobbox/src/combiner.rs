use bbox::BBox;
use intermediate::IntermediateInputKV;

/// The `Combine` trait defines a function for merging the partial results grouped under one key.
///
/// The host uses the same implementation both to pre-combine results within a partition and to
/// reduce combined results across partitions, in any order and at any fan-in. Implementations
/// must therefore be associative, commutative and pure.
///
/// # Arguments
///
/// * `input` - A `IntermediateInputKV` containing a key and its partial results.
///
/// # Outputs
///
/// The merged value for the key.
pub trait Combine<K, V> {
    fn combine(&self, input: IntermediateInputKV<K, V>) -> V;
}

/// Folds any number of boxes into one. An empty input yields `BBox::Empty`.
pub fn merge_all<I>(values: I) -> BBox
where
    I: IntoIterator<Item = BBox>,
{
    values.into_iter().collect()
}

/// `BBoxCombiner` merges partial bounding boxes. A `null` partial read from the host arrives as
/// `BBox::Empty` and leaves the result unchanged.
#[derive(Clone, Copy, Debug, Default)]
pub struct BBoxCombiner;

impl<K> Combine<K, BBox> for BBoxCombiner {
    fn combine(&self, input: IntermediateInputKV<K, BBox>) -> BBox {
        merge_all(input.values)
    }
}

#[cfg(test)]
mod tests {
    use rand::{Rng, SeedableRng};
    use rand::rngs::StdRng;
    use rand::seq::SliceRandom;

    use super::*;

    fn random_bboxes(rng: &mut StdRng, count: usize) -> Vec<BBox> {
        (0..count)
            .map(|_| if rng.gen_bool(0.1) {
                BBox::Empty
            } else {
                BBox::new(
                    rng.gen_range(-180.0..180.0),
                    rng.gen_range(-90.0..90.0),
                    rng.gen_range(-180.0..180.0),
                    rng.gen_range(-90.0..90.0),
                )
            })
            .collect()
    }

    // Splits `values` into randomly sized groups of at least two, combines each group and
    // repeats on the group results until one value remains.
    fn random_tree_combine(rng: &mut StdRng, mut values: Vec<BBox>) -> BBox {
        let combiner = BBoxCombiner;
        while values.len() > 1 {
            let mut level = Vec::new();
            while !values.is_empty() {
                let take = if values.len() == 1 {
                    1
                } else {
                    rng.gen_range(2..values.len() + 1)
                };
                let rest = values.split_off(take);
                level.push(combiner.combine(IntermediateInputKV::new("bbox", values)));
                values = rest;
            }
            level.shuffle(rng);
            values = level;
        }
        combiner.combine(IntermediateInputKV::new("bbox", values))
    }

    #[test]
    fn combine_test_bboxes() {
        let combiner = BBoxCombiner;
        let input = IntermediateInputKV::new(
            "bbox".to_owned(),
            vec![BBox::new(0.0, 0.0, 1.0, 1.0), BBox::new(2.0, 2.0, 3.0, 3.0)],
        );

        assert_eq!(BBox::new(0.0, 0.0, 3.0, 3.0), combiner.combine(input));
    }

    #[test]
    fn combine_treats_empty_partial_as_identity() {
        let combiner = BBoxCombiner;
        let input = IntermediateInputKV::new(
            "bbox".to_owned(),
            vec![BBox::Empty, BBox::new(-1.0, 0.0, 2.0, 5.0), BBox::Empty],
        );

        assert_eq!(BBox::new(-1.0, 0.0, 2.0, 5.0), combiner.combine(input));
    }

    #[test]
    fn merge_all_of_nothing_is_empty() {
        assert_eq!(BBox::Empty, merge_all(Vec::new()));
    }

    #[test]
    fn combine_is_independent_of_order_and_grouping() {
        let mut rng = StdRng::seed_from_u64(0x6B62_6F78);

        for round in 0..200 {
            let count = rng.gen_range(1..40);
            let mut values = random_bboxes(&mut rng, count);
            let expected = values.iter().fold(BBox::Empty, |acc, bbox| acc.merge(*bbox));

            for _ in 0..5 {
                values.shuffle(&mut rng);
                let actual = random_tree_combine(&mut rng, values.clone());
                assert_eq!(expected, actual, "round {}", round);
            }
        }
    }

    #[test]
    fn combine_triples_associate_and_commute() {
        let mut rng = StdRng::seed_from_u64(42);

        for _ in 0..500 {
            let triple = random_bboxes(&mut rng, 3);
            let (a, b, c) = (triple[0], triple[1], triple[2]);

            assert_eq!(a.merge(b).merge(c), a.merge(b.merge(c)));
            assert_eq!(a.merge(b.merge(c)), b.merge(a.merge(c)));
            assert_eq!(a.merge(b), b.merge(a));
        }
    }

    #[test]
    fn combine_is_idempotent() {
        let mut rng = StdRng::seed_from_u64(7);
        let values = random_bboxes(&mut rng, 25);
        let mut reversed = values.clone();
        reversed.reverse();
        let combiner = BBoxCombiner;

        let first = combiner.combine(IntermediateInputKV::new("bbox", values.clone()));
        let second = combiner.combine(IntermediateInputKV::new("bbox", values));
        let third = combiner.combine(IntermediateInputKV::new("bbox", reversed));

        assert_eq!(first, second);
        assert_eq!(first, third);
    }
}
