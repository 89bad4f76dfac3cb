use std::{
    fmt::Debug,
    ops::{Add, Sub},
};

/// Numeric type usable as an assignment cost.
///
/// Implemented for `f64`, `f32`, `i64` and `i32`. Unsigned types are excluded because
/// column potentials go negative while the solver runs.
pub trait Cost:
    Copy + PartialOrd + Add<Output = Self> + Sub<Output = Self> + Debug + Send + Sync + 'static
{
    const ZERO: Self;

    fn is_finite(self) -> bool;

    /// Whether potentials derived from costs up to `max` on a `size`×`size` working
    /// matrix stay representable.
    fn has_headroom(max: Self, size: usize) -> bool;
}

fn headroom_factor(size: usize) -> usize {
    size.saturating_add(1).saturating_mul(4)
}

macro_rules! impl_float_cost {
    ($($ty:ty),*) => {
        $(
            impl Cost for $ty {
                const ZERO: Self = 0.0;

                fn is_finite(self) -> bool {
                    <$ty>::is_finite(self)
                }

                fn has_headroom(max: Self, size: usize) -> bool {
                    (max * headroom_factor(size) as $ty).is_finite()
                }
            }
        )*
    };
}

macro_rules! impl_int_cost {
    ($($ty:ty),*) => {
        $(
            impl Cost for $ty {
                const ZERO: Self = 0;

                fn is_finite(self) -> bool {
                    true
                }

                fn has_headroom(max: Self, size: usize) -> bool {
                    <$ty>::try_from(headroom_factor(size))
                        .map_or(max == 0, |factor| max.checked_mul(factor).is_some())
                }
            }
        )*
    };
}

impl_float_cost!(f64, f32);
impl_int_cost!(i64, i32);

#[cfg(test)]
mod tests {
    use super::Cost;
    use rstest::rstest;

    #[rstest]
    #[case::finite(1.5, true)]
    #[case::infinite(f64::INFINITY, false)]
    #[case::nan(f64::NAN, false)]
    fn float_finiteness(#[case] value: f64, #[case] expected: bool) {
        assert_eq!(Cost::is_finite(value), expected);
    }

    #[rstest]
    #[case::small(1_000, 10, true)]
    #[case::near_max(i64::MAX / 2, 3, false)]
    #[case::zero(0, usize::MAX, true)]
    fn integer_headroom(#[case] max: i64, #[case] size: usize, #[case] expected: bool) {
        assert_eq!(i64::has_headroom(max, size), expected);
    }

    #[test]
    fn float_headroom_rejects_overflow_to_infinity() {
        assert!(f64::has_headroom(1e300, 100));
        assert!(!f64::has_headroom(f64::MAX / 2.0, 100));
    }
}
