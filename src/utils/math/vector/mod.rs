pub mod math;

use std::fmt::Debug;

use num::Num;

use crate::utils::sort::radix_sort_u32_soa;

/// ZeroSpVec is a sparse vector that treats zero elements as absent.
/// It holds indices and values as two parallel arrays
/// (indices are term ids, values are counts or weights).
///
/// Elements are guaranteed to be sorted by ascending index,
/// and no index appears twice.
#[derive(Clone, PartialEq)]
pub struct ZeroSpVec<N>
where
    N: Num + Copy,
{
    inds: Vec<u32>,
    vals: Vec<N>,
}

impl<N> ZeroSpVec<N>
where
    N: Num + Copy,
{
    #[inline]
    pub fn new() -> Self {
        ZeroSpVec {
            inds: Vec::new(),
            vals: Vec::new(),
        }
    }

    #[inline]
    pub fn with_capacity(cap: usize) -> Self {
        ZeroSpVec {
            inds: Vec::with_capacity(cap),
            vals: Vec::with_capacity(cap),
        }
    }

    /// Build from `(index, value)` pairs in any order.
    /// Zero values are dropped; duplicated indices are summed.
    pub fn from_unsorted(pairs: Vec<(u32, N)>) -> Self {
        let (mut inds, mut vals): (Vec<u32>, Vec<N>) = pairs
            .into_iter()
            .filter(|(_, v)| !v.is_zero())
            .unzip();
        radix_sort_u32_soa(&mut inds, &mut vals);

        let mut vec = Self::with_capacity(inds.len());
        for (ind, val) in inds.into_iter().zip(vals) {
            match vec.inds.last() {
                Some(&last) if last == ind => {
                    if let Some(v) = vec.vals.last_mut() {
                        *v = *v + val;
                    }
                }
                _ => {
                    vec.inds.push(ind);
                    vec.vals.push(val);
                }
            }
        }
        vec
    }

    /// Append an element whose index is greater than every stored index.
    /// Zero values are skipped.
    ///
    /// # Panics
    /// In debug builds, if `index` does not keep the indices ascending.
    #[inline]
    pub fn push(&mut self, index: u32, value: N) {
        debug_assert!(
            self.inds.last().map_or(true, |&last| last < index),
            "ZeroSpVec::push requires strictly ascending indices"
        );
        if value.is_zero() {
            return;
        }
        self.inds.push(index);
        self.vals.push(value);
    }

    /// Value stored at `index`, if it is non-zero.
    #[inline]
    pub fn get(&self, index: u32) -> Option<&N> {
        self.inds
            .binary_search(&index)
            .ok()
            .map(|pos| &self.vals[pos])
    }

    #[inline]
    pub fn contains(&self, index: u32) -> bool {
        self.inds.binary_search(&index).is_ok()
    }

    /// number of non-zero elements
    #[inline]
    pub fn nnz(&self) -> usize {
        self.inds.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.inds.is_empty()
    }

    #[inline]
    pub fn shrink_to_fit(&mut self) {
        self.inds.shrink_to_fit();
        self.vals.shrink_to_fit();
    }

    #[inline]
    pub fn as_ind_slice(&self) -> &[u32] {
        &self.inds
    }

    #[inline]
    pub fn as_val_slice(&self) -> &[N] {
        &self.vals
    }

    /// Iterate over `(index, &value)` of the non-zero elements, ascending by index.
    #[inline]
    pub fn raw_iter(&self) -> impl ExactSizeIterator<Item = (u32, &N)> + '_ {
        self.inds.iter().copied().zip(self.vals.iter())
    }

    /// Apply `f` to every stored element, keeping the sparsity pattern
    /// except for results that become zero.
    pub fn map_values<M, F>(&self, mut f: F) -> ZeroSpVec<M>
    where
        M: Num + Copy,
        F: FnMut(u32, N) -> M,
    {
        let mut out = ZeroSpVec::with_capacity(self.nnz());
        for (ind, val) in self.raw_iter() {
            out.push(ind, f(ind, *val));
        }
        out
    }
}

impl<N> Default for ZeroSpVec<N>
where
    N: Num + Copy,
{
    fn default() -> Self {
        Self::new()
    }
}

impl<N> Debug for ZeroSpVec<N>
where
    N: Num + Copy + Debug,
{
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_map().entries(self.raw_iter()).finish()
    }
}

impl<N> FromIterator<(u32, N)> for ZeroSpVec<N>
where
    N: Num + Copy,
{
    fn from_iter<I: IntoIterator<Item = (u32, N)>>(iter: I) -> Self {
        Self::from_unsorted(iter.into_iter().collect())
    }
}
