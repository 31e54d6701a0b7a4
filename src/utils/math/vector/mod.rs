use std::cmp::Ordering;

use num::Float;
use serde::{Deserialize, Serialize};

use crate::utils::sort::radix_sort_u32_soa;

/// Sparse vector keeping only non-zero entries.
///
/// `inds` are strictly ascending term indices and `vals` the matching weights.
/// `dim` is the size of the dimension space the vector lives in.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SparseVec<N = f64>
where
    N: Float,
{
    inds: Vec<u32>,
    vals: Vec<N>,
    dim: usize,
}

impl<N> SparseVec<N>
where
    N: Float + Default,
{
    /// Build from unordered `(index, value)` pairs.
    /// Zero values are dropped, duplicate indices are summed.
    pub fn from_pairs(dim: usize, pairs: impl IntoIterator<Item = (u32, N)>) -> Self {
        let (mut inds, mut vals): (Vec<u32>, Vec<N>) = pairs
            .into_iter()
            .filter(|(_, v)| !v.is_zero())
            .unzip();
        radix_sort_u32_soa(&mut inds, &mut vals);

        let mut out_inds: Vec<u32> = Vec::with_capacity(inds.len());
        let mut out_vals: Vec<N> = Vec::with_capacity(vals.len());
        for (i, v) in inds.into_iter().zip(vals) {
            debug_assert!((i as usize) < dim, "index {i} out of dimension {dim}");
            match out_inds.last() {
                Some(&last) if last == i => {
                    if let Some(acc) = out_vals.last_mut() {
                        *acc = *acc + v;
                    }
                }
                _ => {
                    out_inds.push(i);
                    out_vals.push(v);
                }
            }
        }
        Self { inds: out_inds, vals: out_vals, dim }
    }
}

impl<N> SparseVec<N>
where
    N: Float,
{
    /// number of dimensions
    #[inline]
    pub fn dim(&self) -> usize {
        self.dim
    }

    /// number of non-zero entries
    #[inline]
    pub fn nnz(&self) -> usize {
        self.inds.len()
    }

    #[inline]
    pub fn is_zero(&self) -> bool {
        self.inds.is_empty()
    }

    /// Iterate `(index, value)` in ascending index order
    pub fn iter(&self) -> impl Iterator<Item = (u32, N)> + '_ {
        self.inds.iter().copied().zip(self.vals.iter().copied())
    }

    /// Value at `index`, zero when absent
    pub fn get(&self, index: u32) -> N {
        match self.inds.binary_search(&index) {
            Ok(pos) => self.vals[pos],
            Err(_) => N::zero(),
        }
    }

    /// dot product
    /// d(a, b) = Σ(a_i * b_i)
    ///
    /// Merge-join over the two sorted index lists.
    pub fn dot(&self, other: &Self) -> N {
        debug_assert_eq!(self.dim, other.dim, "vectors live in different dimension spaces");
        let mut i = 0;
        let mut j = 0;
        let mut sum = N::zero();
        while i < self.inds.len() && j < other.inds.len() {
            match self.inds[i].cmp(&other.inds[j]) {
                Ordering::Equal => {
                    sum = sum + self.vals[i] * other.vals[j];
                    i += 1;
                    j += 1;
                }
                Ordering::Less => i += 1,
                Ordering::Greater => j += 1,
            }
        }
        sum
    }

    /// ||a|| = sqrt(Σ(a_i^2))
    pub fn l2_norm(&self) -> N {
        self.vals
            .iter()
            .fold(N::zero(), |acc, &v| acc + v * v)
            .sqrt()
    }

    /// Scale to unit length in place.
    /// A zero vector is left untouched.
    pub fn l2_normalize(&mut self) -> &mut Self {
        let norm = self.l2_norm();
        if norm > N::zero() {
            for v in self.vals.iter_mut() {
                *v = *v / norm;
            }
        }
        self
    }

    /// cos(θ) = Σ(a_i * b_i) / (||a|| * ||b||)
    /// Zero when either side is a zero vector.
    pub fn cosine_similarity(&self, other: &Self) -> N {
        let denom = self.l2_norm() * other.l2_norm();
        if denom.is_zero() {
            N::zero()
        } else {
            self.dot(other) / denom
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn from_pairs_sorts_merges_and_drops_zeros() {
        let v = SparseVec::from_pairs(10, vec![(7u32, 1.0f64), (2, 3.0), (7, 2.0), (4, 0.0)]);
        let pairs: Vec<_> = v.iter().collect();
        assert_eq!(pairs, vec![(2, 3.0), (7, 3.0)]);
        assert_eq!(v.dim(), 10);
        assert_eq!(v.get(4), 0.0);
    }

    #[test]
    fn dot_only_counts_shared_indices() {
        let a = SparseVec::from_pairs(5, vec![(0u32, 1.0f64), (2, 2.0), (4, 3.0)]);
        let b = SparseVec::from_pairs(5, vec![(1u32, 5.0f64), (2, 4.0), (4, 1.0)]);
        assert_eq!(a.dot(&b), 11.0);
    }

    #[test]
    fn normalized_dot_equals_cosine() {
        let a = SparseVec::from_pairs(3, vec![(0u32, 3.0f64), (1, 4.0)]);
        let b = SparseVec::from_pairs(3, vec![(1u32, 2.0f64), (2, 2.0)]);
        let cos = a.cosine_similarity(&b);
        let mut an = a.clone();
        let mut bn = b.clone();
        an.l2_normalize();
        bn.l2_normalize();
        assert!((an.l2_norm() - 1.0).abs() < 1e-12);
        assert!((an.dot(&bn) - cos).abs() < 1e-12);
    }

    #[test]
    fn zero_vector_stays_zero() {
        let mut z: SparseVec<f64> = SparseVec::from_pairs(4, Vec::new());
        z.l2_normalize();
        assert!(z.is_zero());
        assert_eq!(z.cosine_similarity(&z), 0.0);
    }
}
