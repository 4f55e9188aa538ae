//! Core traits for dfit
//!
//! Estimators never assume a concrete container: everything they read goes
//! through [`SampleView`], a minimal size + indexed-access contract.

/// Read-only view over an ordered numeric sequence.
///
/// Entries may be NaN or infinite; consumers are responsible for skipping them.
pub trait SampleView {
    /// Number of entries, including non-finite ones.
    fn len(&self) -> usize;

    /// Entry at `index` as `f64`. `index` must be `< len()`.
    fn value(&self, index: usize) -> f64;

    /// `true` when the view has no entries.
    fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

impl SampleView for [f64] {
    #[inline]
    fn len(&self) -> usize {
        <[f64]>::len(self)
    }

    #[inline]
    fn value(&self, index: usize) -> f64 {
        self[index]
    }
}

impl SampleView for [f32] {
    #[inline]
    fn len(&self) -> usize {
        <[f32]>::len(self)
    }

    #[inline]
    fn value(&self, index: usize) -> f64 {
        f64::from(self[index])
    }
}

impl<const N: usize> SampleView for [f64; N] {
    #[inline]
    fn len(&self) -> usize {
        N
    }

    #[inline]
    fn value(&self, index: usize) -> f64 {
        self[index]
    }
}

impl SampleView for Vec<f64> {
    #[inline]
    fn len(&self) -> usize {
        Vec::len(self)
    }

    #[inline]
    fn value(&self, index: usize) -> f64 {
        self[index]
    }
}

impl SampleView for Vec<f32> {
    #[inline]
    fn len(&self) -> usize {
        Vec::len(self)
    }

    #[inline]
    fn value(&self, index: usize) -> f64 {
        f64::from(self[index])
    }
}

impl<T: SampleView + ?Sized> SampleView for &T {
    #[inline]
    fn len(&self) -> usize {
        (**self).len()
    }

    #[inline]
    fn value(&self, index: usize) -> f64 {
        (**self).value(index)
    }
}

/// Iterate over every entry of a sample view, in order.
pub fn sample_values<S: SampleView + ?Sized>(sample: &S) -> impl Iterator<Item = f64> + '_ {
    (0..sample.len()).map(move |i| sample.value(i))
}

/// Copy the finite entries of a sample view into a new vector.
pub fn finite_values<S: SampleView + ?Sized>(sample: &S) -> Vec<f64> {
    sample_values(sample).filter(|x| x.is_finite()).collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    struct Strided<'a> {
        data: &'a [f64],
        stride: usize,
    }

    impl SampleView for Strided<'_> {
        fn len(&self) -> usize {
            self.data.len().div_ceil(self.stride)
        }

        fn value(&self, index: usize) -> f64 {
            self.data[index * self.stride]
        }
    }

    #[test]
    fn test_slice_and_vec_views() {
        let v = vec![1.0, 2.0, 3.0];
        assert_eq!(SampleView::len(&v), 3);
        assert_eq!(SampleView::value(&v[..], 2), 3.0);
        let f: [f32; 2] = [0.5, 1.5];
        assert_eq!(SampleView::value(&f[..], 1), 1.5);
    }

    #[test]
    fn test_trait_in_scope_keeps_slice_get() {
        let v: Vec<f64> = vec![1.0, 2.0];
        assert_eq!(v.value(1), 2.0);
        assert_eq!(v.get(1).copied(), Some(2.0));
        assert_eq!(v.get(5), None);
        let f: Vec<f32> = vec![0.25];
        assert_eq!(f.value(0), 0.25);
        assert_eq!(f.get(1), None);
    }

    #[test]
    fn test_custom_view() {
        let data = [1.0, -1.0, 2.0, -2.0, 3.0];
        let view = Strided { data: &data, stride: 2 };
        assert_eq!(sample_values(&view).collect::<Vec<_>>(), vec![1.0, 2.0, 3.0]);
    }

    #[test]
    fn test_finite_values_skips_nan_and_inf() {
        let data = [1.0, f64::NAN, 2.0, f64::INFINITY, f64::NEG_INFINITY];
        assert_eq!(finite_values(&data[..]), vec![1.0, 2.0]);
    }
}
