//! Batch partitioner
//!
//! Slices an ordered sequence into consecutive batches of a fixed size. The last
//! batch may be shorter; an empty input yields no batches.

use std::num::NonZeroUsize;

/// Iterator over consecutive batches of `size` items
#[derive(Debug)]
pub struct Batches<I: Iterator> {
    inner: I,
    size: NonZeroUsize,
}

impl<I: Iterator> Iterator for Batches<I> {
    type Item = Vec<I::Item>;

    fn next(&mut self) -> Option<Self::Item> {
        let batch: Vec<I::Item> = self.inner.by_ref().take(self.size.get()).collect();
        if batch.is_empty() {
            None
        } else {
            Some(batch)
        }
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        let (lower, upper) = self.inner.size_hint();
        let size = self.size.get();
        (lower.div_ceil(size), upper.map(|u| u.div_ceil(size)))
    }
}

/// Partitions `items` into batches of `size`
///
/// # Example
///
/// ```rust
/// use std::num::NonZeroUsize;
/// use tableswap::core::sync::partition;
///
/// let size = NonZeroUsize::new(2).unwrap();
/// let batches: Vec<Vec<i32>> = partition(vec![1, 2, 3], size).collect();
/// assert_eq!(batches, vec![vec![1, 2], vec![3]]);
/// ```
pub fn partition<T: IntoIterator>(items: T, size: NonZeroUsize) -> Batches<T::IntoIter> {
    Batches {
        inner: items.into_iter(),
        size,
    }
}

/// Number of batches `len` items produce
pub fn batch_count(len: usize, size: NonZeroUsize) -> usize {
    len.div_ceil(size.get())
}

#[cfg(test)]
mod tests {
    use super::*;
    use test_case::test_case;

    fn size(n: usize) -> NonZeroUsize {
        NonZeroUsize::new(n).unwrap()
    }

    #[test_case(0, 250, 0 ; "empty")]
    #[test_case(1, 250, 1 ; "single")]
    #[test_case(250, 250, 1 ; "exact")]
    #[test_case(251, 250, 2 ; "one over")]
    #[test_case(600, 250, 3 ; "six hundred")]
    #[test_case(7, 1, 7 ; "size one")]
    fn test_batch_count(len: usize, batch: usize, expected: usize) {
        let batches: Vec<Vec<usize>> = partition(0..len, size(batch)).collect();
        assert_eq!(batches.len(), expected);
        assert_eq!(batch_count(len, size(batch)), expected);
    }

    #[test]
    fn test_concatenation_preserves_order() {
        let input: Vec<usize> = (0..1003).collect();
        let batches: Vec<Vec<usize>> = partition(input.clone(), size(250)).collect();

        assert!(batches[..batches.len() - 1].iter().all(|b| b.len() == 250));
        assert_eq!(batches.last().unwrap().len(), 1003 - 250 * 4);
        assert_eq!(batches.concat(), input);
    }

    #[test]
    fn test_scenario_sizes() {
        let sizes: Vec<usize> = partition(0..600, size(250)).map(|b| b.len()).collect();
        assert_eq!(sizes, vec![250, 250, 100]);
    }

    #[test]
    fn test_size_hint() {
        let batches = partition(0..600, size(250));
        assert_eq!(batches.size_hint(), (3, Some(3)));
    }

    #[test]
    fn test_exhausted_stays_exhausted() {
        let mut batches = partition(vec![1], size(4));
        assert_eq!(batches.next(), Some(vec![1]));
        assert_eq!(batches.next(), None);
        assert_eq!(batches.next(), None);
    }
}
