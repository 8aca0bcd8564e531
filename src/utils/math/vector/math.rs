use std::{cmp::Ordering, ops::AddAssign};

use num::Num;

use super::ZeroSpVec;

impl<N> ZeroSpVec<N>
where
    N: Num + Copy,
{
    /// Sparse dot product.
    /// Only indices present in both vectors contribute; the walk is a merge
    /// over the two sorted index arrays.
    ///
    /// # Arguments
    /// * `other` - the other vector
    ///
    /// # Returns
    /// * `R` - the dot product, accumulated in `R`
    #[inline]
    pub fn dot<R>(&self, other: &Self) -> R
    where
        R: Num + AddAssign,
        N: Into<R>,
    {
        let mut result = R::zero();
        let self_inds = self.as_ind_slice();
        let self_vals = self.as_val_slice();
        let other_inds = other.as_ind_slice();
        let other_vals = other.as_val_slice();

        if self_inds.is_empty() || other_inds.is_empty() {
            return result;
        }

        let mut i = 0;
        let mut j = 0;
        while i < self_inds.len() && j < other_inds.len() {
            match self_inds[i].cmp(&other_inds[j]) {
                Ordering::Equal => {
                    let a: R = self_vals[i].into();
                    let b: R = other_vals[j].into();
                    result += a * b;
                    i += 1;
                    j += 1;
                }
                Ordering::Less => i += 1,
                Ordering::Greater => j += 1,
            }
        }

        result
    }

    #[inline]
    pub fn norm_sq<R>(&self) -> R
    where
        R: Num + AddAssign + Copy,
        N: Into<R>,
    {
        let mut result = R::zero();
        for val in self.as_val_slice() {
            let val: R = (*val).into();
            result += val * val;
        }
        result
    }

    /// L2 norm, computed in `f64`.
    #[inline]
    pub fn norm(&self) -> f64
    where
        N: Into<f64>,
    {
        self.norm_sq::<f64>().sqrt()
    }
}
