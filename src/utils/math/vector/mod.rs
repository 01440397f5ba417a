use std::{cmp::Ordering, fmt};

use serde::{Deserialize, Serialize};

/// SparseVector is a sparse feature vector keyed by 1-based feature index.
/// It holds `inds` and `vals`:
/// `inds` keeps the feature index of each stored element,
/// `vals` keeps the weight of each stored element.
///
/// Elements are guaranteed to be sorted by ascending index,
/// and absent indices are implicitly zero.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct SparseVector {
    inds: Vec<usize>,
    vals: Vec<f64>,
}

impl SparseVector {
    #[inline]
    pub fn new() -> Self {
        Self {
            inds: Vec::new(),
            vals: Vec::new(),
        }
    }

    #[inline]
    pub fn with_capacity(cap: usize) -> Self {
        Self {
            inds: Vec::with_capacity(cap),
            vals: Vec::with_capacity(cap),
        }
    }

    /// Build from `(index, weight)` pairs in any order.
    /// Zero weights are dropped, and for a repeated index the last weight wins.
    pub fn from_pairs<I>(pairs: I) -> Self
    where
        I: IntoIterator<Item = (usize, f64)>,
    {
        let mut pairs: Vec<(usize, f64)> = pairs.into_iter().collect();
        // stable sort so that "last wins" survives dedup
        pairs.sort_by_key(|(ind, _)| *ind);
        let mut vec = Self::with_capacity(pairs.len());
        for (ind, val) in pairs {
            if vec.inds.last() == Some(&ind) {
                vec.inds.pop();
                vec.vals.pop();
            }
            vec.inds.push(ind);
            vec.vals.push(val);
        }
        vec.retain_nonzero();
        vec
    }

    /// Append an element.
    /// `index` must be greater than every stored index; zero weights are not stored.
    #[inline]
    pub fn push(&mut self, index: usize, value: f64) {
        debug_assert!(
            self.inds.last().map_or(true, |last| *last < index),
            "SparseVector indices must be pushed in ascending order"
        );
        if value != 0.0 {
            self.inds.push(index);
            self.vals.push(value);
        }
    }

    /// Weight at `index`, `None` when the element is absent (implicit zero)
    #[inline]
    pub fn get(&self, index: usize) -> Option<f64> {
        self.inds
            .binary_search(&index)
            .ok()
            .map(|pos| self.vals[pos])
    }

    /// number of stored (non-zero) elements
    #[inline]
    pub fn len(&self) -> usize {
        self.inds.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.inds.is_empty()
    }

    #[inline]
    pub fn indices(&self) -> &[usize] {
        &self.inds
    }

    #[inline]
    pub fn values(&self) -> &[f64] {
        &self.vals
    }

    /// Iterate over stored `(index, weight)` pairs in ascending index order
    #[inline]
    pub fn iter(&self) -> impl Iterator<Item = (usize, f64)> + '_ {
        self.inds.iter().copied().zip(self.vals.iter().copied())
    }

    /// L2 norm, summed in ascending index order
    #[inline]
    pub fn norm(&self) -> f64 {
        self.vals.iter().map(|v| v * v).sum::<f64>().sqrt()
    }

    /// Dot product with another sparse vector
    ///
    /// # Arguments
    /// * `other` - the other vector
    ///
    /// # Returns
    /// * `f64` - dot product
    pub fn dot(&self, other: &Self) -> f64 {
        let mut result = 0.0;
        let (mut i, mut j) = (0, 0);
        while i < self.inds.len() && j < other.inds.len() {
            match self.inds[i].cmp(&other.inds[j]) {
                Ordering::Equal => {
                    result += self.vals[i] * other.vals[j];
                    i += 1;
                    j += 1;
                }
                Ordering::Less => i += 1,
                Ordering::Greater => j += 1,
            }
        }
        result
    }

    fn retain_nonzero(&mut self) {
        let mut w = 0;
        for r in 0..self.inds.len() {
            if self.vals[r] != 0.0 {
                self.inds[w] = self.inds[r];
                self.vals[w] = self.vals[r];
                w += 1;
            }
        }
        self.inds.truncate(w);
        self.vals.truncate(w);
    }
}

/// libsvm style `index:weight index:weight ...`
impl fmt::Display for SparseVector {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (pos, (ind, val)) in self.iter().enumerate() {
            if pos > 0 {
                f.write_str(" ")?;
            }
            write!(f, "{}:{}", ind, val)?;
        }
        Ok(())
    }
}
