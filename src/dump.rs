//! Owned snapshot of every bucket chain, renderable as text.

use core::fmt;

/// Buckets in ascending index order, each chain head to tail.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct Dump {
    buckets: Vec<Vec<(i32, i32)>>,
}

impl Dump {
    pub(crate) fn new(buckets: Vec<Vec<(i32, i32)>>) -> Self {
        Self { buckets }
    }

    pub fn buckets(&self) -> &[Vec<(i32, i32)>] {
        &self.buckets
    }

    pub fn bucket(&self, index: usize) -> Option<&[(i32, i32)]> {
        self.buckets.get(index).map(Vec::as_slice)
    }

    /// Total number of entries across all buckets.
    pub fn len(&self) -> usize {
        self.buckets.iter().map(Vec::len).sum()
    }
    pub fn is_empty(&self) -> bool {
        self.buckets.iter().all(Vec::is_empty)
    }

    /// `(bucket, key, value)` in dump order.
    pub fn iter(&self) -> impl Iterator<Item = (usize, i32, i32)> + '_ {
        self.buckets
            .iter()
            .enumerate()
            .flat_map(|(b, chain)| chain.iter().map(move |&(k, v)| (b, k, v)))
    }

    pub fn into_buckets(self) -> Vec<Vec<(i32, i32)>> {
        self.buckets
    }
}

/// One line per bucket: `[i] -> (k,v) -> (k,v)`. Empty buckets keep the
/// trailing `-> `.
impl fmt::Display for Dump {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (i, chain) in self.buckets.iter().enumerate() {
            write!(f, "[{}] -> ", i)?;
            for (n, (k, v)) in chain.iter().enumerate() {
                if n > 0 {
                    f.write_str(" -> ")?;
                }
                write!(f, "({},{})", k, v)?;
            }
            f.write_str("\n")?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::Dump;

    #[test]
    fn renders_one_line_per_bucket() {
        let d = Dump::new(vec![vec![], vec![(1, 100), (5, 200)], vec![(-2, 7)]]);
        assert_eq!(d.to_string(), "[0] -> \n[1] -> (1,100) -> (5,200)\n[2] -> (-2,7)\n");
    }

    #[test]
    fn counts_and_iterates_in_order() {
        let d = Dump::new(vec![vec![(4, 1)], vec![], vec![(2, 2), (6, 3)]]);
        assert_eq!(d.len(), 3);
        assert!(!d.is_empty());
        let seen: Vec<_> = d.iter().collect();
        assert_eq!(seen, vec![(0, 4, 1), (2, 2, 2), (2, 6, 3)]);
        assert_eq!(d.bucket(1), Some(&[][..]));
        assert_eq!(d.bucket(3), None);
        assert!(Dump::new(vec![vec![], vec![]]).is_empty());
    }
}
