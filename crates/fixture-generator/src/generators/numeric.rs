//! Bounded numeric generators.
//!
//! Integer ranges are half-open `[min, max)`, floating-point ranges are
//! closed `[min, max]`. Any range that crosses zero is split in two:
//! a fair coin picks the negative or the non-negative side, and the
//! chosen side is sampled uniformly. Neither the span `max - min` nor the
//! negation of a bound is ever computed in a way that can overflow, so
//! ranges reaching the representable extremes are safe.

use fixture_core::{GenerationError, NumericMode};
use rand::distr::uniform::SampleUniform;
use rand::{Rng, RngCore};
use std::fmt::{Debug, Display};
use std::ops::{Add, Neg, Sub};

use crate::generator::ValueGenerator;

/// Signed integer types the range generators work over.
pub trait BoundedInt:
    Copy
    + Ord
    + Debug
    + Display
    + SampleUniform
    + Add<Output = Self>
    + Sub<Output = Self>
    + Neg<Output = Self>
    + Send
    + Sync
    + 'static
{
    const MIN: Self;
    const MAX: Self;
    const ZERO: Self;
    const ONE: Self;
}

macro_rules! bounded_int {
    ($($ty:ty),*) => {
        $(
            impl BoundedInt for $ty {
                const MIN: Self = <$ty>::MIN;
                const MAX: Self = <$ty>::MAX;
                const ZERO: Self = 0;
                const ONE: Self = 1;
            }
        )*
    };
}

bounded_int!(i32, i64);

/// `value + 1`, or `value` unchanged at the type's maximum.
pub fn safe_increment<T: BoundedInt>(value: T) -> T {
    if value == T::MAX {
        value
    } else {
        value + T::ONE
    }
}

/// `value - 1`, or `value` unchanged at the type's minimum.
pub fn safe_decrement<T: BoundedInt>(value: T) -> T {
    if value == T::MIN {
        value
    } else {
        value - T::ONE
    }
}

/// `-value`, saturating `MIN` to `MAX`.
fn bounded_negation<T: BoundedInt>(value: T) -> T {
    if value == T::MIN {
        T::MAX
    } else {
        -value
    }
}

/// Uniform draw from `[lower, upper)`; `lower` when the interval is empty.
fn uniform<T: BoundedInt>(rng: &mut dyn RngCore, lower: T, upper: T) -> T {
    if lower >= upper {
        lower
    } else {
        rng.random_range(lower..upper)
    }
}

/// Draw from the half-open range `[min, max)`.
///
/// Returns `min` when `min >= max`. When `min` is the type's minimum the
/// minimum itself is never produced.
pub fn int_in_range<T: BoundedInt>(rng: &mut dyn RngCore, min: T, max: T) -> T {
    if min >= max {
        return min;
    }

    if max <= T::ZERO {
        // Sample magnitudes in (-max, -min] and flip the sign back.
        // `max > min >= MIN`, so `-max` cannot overflow.
        let lower = -max;
        let upper = bounded_negation(min);
        if lower >= upper {
            return min;
        }
        let magnitude = safe_increment(uniform(rng, lower, upper));
        -magnitude
    } else if min < T::ZERO {
        if rng.random_bool(0.5) {
            let upper = safe_increment(bounded_negation(min));
            -uniform(rng, T::ZERO, upper)
        } else {
            uniform(rng, T::ZERO, max)
        }
    } else {
        uniform(rng, min, max)
    }
}

/// Uniform draw from the closed interval `[lower, upper]`, both bounds on
/// the same side of zero.
fn closed_uniform(rng: &mut dyn RngCore, lower: f64, upper: f64) -> f64 {
    let unit: f64 = rng.random_range(0.0..=1.0);
    (lower + (upper - lower) * unit).clamp(lower, upper)
}

/// Draw from the closed range `[min, max]`.
///
/// Returns `min` when `min >= max`.
pub fn double_in_range(rng: &mut dyn RngCore, min: f64, max: f64) -> f64 {
    if min >= max {
        return min;
    }

    if max <= 0.0 {
        -closed_uniform(rng, -max, -min)
    } else if min < 0.0 {
        if rng.random_bool(0.5) {
            -closed_uniform(rng, 0.0, -min)
        } else {
            closed_uniform(rng, 0.0, max)
        }
    } else {
        closed_uniform(rng, min, max)
    }
}

/// Half-open integer range generator.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct IntRange<T> {
    min: T,
    max: T,
}

impl<T: BoundedInt> IntRange<T> {
    /// Generator over `[min, max)`. Fails when `max < min`.
    pub fn new(min: T, max: T) -> Result<Self, GenerationError> {
        GenerationError::check_range(
            min <= max,
            format!("upper bound {max} is less than lower bound {min}"),
        )?;
        Ok(Self { min, max })
    }

    pub fn min(&self) -> T {
        self.min
    }

    pub fn max(&self) -> T {
        self.max
    }
}

impl<T: BoundedInt> ValueGenerator<T> for IntRange<T> {
    fn generate(&self, rng: &mut dyn RngCore) -> T {
        int_in_range(rng, self.min, self.max)
    }
}

/// Closed `f64` range generator.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct DoubleRange {
    min: f64,
    max: f64,
}

impl DoubleRange {
    /// Generator over `[min, max]`. Fails on non-finite bounds or `max < min`.
    pub fn new(min: f64, max: f64) -> Result<Self, GenerationError> {
        GenerationError::check_range(
            min.is_finite() && max.is_finite(),
            format!("bounds must be finite, got [{min}, {max}]"),
        )?;
        GenerationError::check_range(
            min <= max,
            format!("upper bound {max} is less than lower bound {min}"),
        )?;
        Ok(Self { min, max })
    }
}

impl ValueGenerator<f64> for DoubleRange {
    fn generate(&self, rng: &mut dyn RngCore) -> f64 {
        double_in_range(rng, self.min, self.max)
    }
}

/// Closed `f32` range generator.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct FloatRange {
    min: f32,
    max: f32,
}

impl FloatRange {
    pub fn new(min: f32, max: f32) -> Result<Self, GenerationError> {
        GenerationError::check_range(
            min.is_finite() && max.is_finite(),
            format!("bounds must be finite, got [{min}, {max}]"),
        )?;
        GenerationError::check_range(
            min <= max,
            format!("upper bound {max} is less than lower bound {min}"),
        )?;
        Ok(Self { min, max })
    }
}

impl ValueGenerator<f32> for FloatRange {
    fn generate(&self, rng: &mut dyn RngCore) -> f32 {
        let value = double_in_range(rng, f64::from(self.min), f64::from(self.max)) as f32;
        value.clamp(self.min, self.max)
    }
}

/// Fair coin.
#[derive(Debug, Clone, Copy, Default)]
pub struct Booleans;

impl ValueGenerator<bool> for Booleans {
    fn generate(&self, rng: &mut dyn RngCore) -> bool {
        rng.random_bool(0.5)
    }
}

pub fn booleans() -> Booleans {
    Booleans
}

pub fn integers(min: i32, max: i32) -> Result<IntRange<i32>, GenerationError> {
    IntRange::new(min, max)
}

/// `[1, i32::MAX)`
pub fn positive_integers() -> IntRange<i32> {
    IntRange { min: 1, max: i32::MAX }
}

/// Strictly negative, down to `-i32::MAX`.
pub fn negative_integers() -> IntRange<i32> {
    IntRange { min: i32::MIN, max: 0 }
}

pub fn any_integers() -> IntRange<i32> {
    IntRange { min: i32::MIN, max: i32::MAX }
}

/// `[1, 1000)`
pub fn small_positive_integers() -> IntRange<i32> {
    IntRange { min: 1, max: 1000 }
}

pub fn longs(min: i64, max: i64) -> Result<IntRange<i64>, GenerationError> {
    IntRange::new(min, max)
}

/// `[1, i64::MAX)`
pub fn positive_longs() -> IntRange<i64> {
    IntRange { min: 1, max: i64::MAX }
}

/// Strictly negative, down to `-i64::MAX`.
pub fn negative_longs() -> IntRange<i64> {
    IntRange { min: i64::MIN, max: 0 }
}

pub fn any_longs() -> IntRange<i64> {
    IntRange { min: i64::MIN, max: i64::MAX }
}

/// `[1, 10000)`
pub fn small_positive_longs() -> IntRange<i64> {
    IntRange { min: 1, max: 10_000 }
}

pub fn doubles(min: f64, max: f64) -> Result<DoubleRange, GenerationError> {
    DoubleRange::new(min, max)
}

/// `[0.1, f64::MAX]`
pub fn positive_doubles() -> DoubleRange {
    DoubleRange { min: 0.1, max: f64::MAX }
}

/// `[-f64::MAX, 0]`
pub fn negative_doubles() -> DoubleRange {
    DoubleRange { min: -f64::MAX, max: 0.0 }
}

pub fn any_doubles() -> DoubleRange {
    DoubleRange { min: -f64::MAX, max: f64::MAX }
}

/// `[0.1, 1000]`
pub fn small_positive_doubles() -> DoubleRange {
    DoubleRange { min: 0.1, max: 1000.0 }
}

pub fn floats(min: f32, max: f32) -> Result<FloatRange, GenerationError> {
    FloatRange::new(min, max)
}

/// `[0.1, f32::MAX]`
pub fn positive_floats() -> FloatRange {
    FloatRange { min: 0.1, max: f32::MAX }
}

pub fn negative_floats() -> FloatRange {
    FloatRange { min: -f32::MAX, max: 0.0 }
}

pub fn any_floats() -> FloatRange {
    FloatRange { min: -f32::MAX, max: f32::MAX }
}

fn strict_range<T: PartialOrd + Display>(min: T, max: T) -> Result<(), GenerationError> {
    GenerationError::check_range(
        min < max,
        format!("min ({min}) must be less than max ({max})"),
    )
}

/// Generator for an `integer` descriptor.
pub fn integer_generator(
    mode: NumericMode,
    min: i32,
    max: i32,
) -> Result<IntRange<i32>, GenerationError> {
    Ok(match mode {
        NumericMode::Positive => positive_integers(),
        NumericMode::Negative => negative_integers(),
        NumericMode::Any => any_integers(),
        NumericMode::Range => {
            strict_range(min, max)?;
            IntRange { min, max }
        }
    })
}

/// Generator for a `long` descriptor.
pub fn long_generator(
    mode: NumericMode,
    min: i64,
    max: i64,
) -> Result<IntRange<i64>, GenerationError> {
    Ok(match mode {
        NumericMode::Positive => positive_longs(),
        NumericMode::Negative => negative_longs(),
        NumericMode::Any => any_longs(),
        NumericMode::Range => {
            strict_range(min, max)?;
            IntRange { min, max }
        }
    })
}

/// Generator for a `double` descriptor.
pub fn double_generator(
    mode: NumericMode,
    min: f64,
    max: f64,
) -> Result<DoubleRange, GenerationError> {
    match mode {
        NumericMode::Positive => Ok(positive_doubles()),
        NumericMode::Negative => Ok(negative_doubles()),
        NumericMode::Any => Ok(any_doubles()),
        NumericMode::Range => {
            strict_range(min, max)?;
            DoubleRange::new(min, max)
        }
    }
}

/// Generator for a `float` descriptor.
pub fn float_generator(mode: NumericMode, min: f32, max: f32) -> Result<FloatRange, GenerationError> {
    match mode {
        NumericMode::Positive => Ok(positive_floats()),
        NumericMode::Negative => Ok(negative_floats()),
        NumericMode::Any => Ok(any_floats()),
        NumericMode::Range => {
            strict_range(min, max)?;
            FloatRange::new(min, max)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    const ITERATIONS: usize = 10_000;

    fn assert_int_range<T: BoundedInt>(min: T, max: T) {
        let mut rng = StdRng::seed_from_u64(42);
        let generator = IntRange::new(min, max).unwrap();
        for _ in 0..ITERATIONS {
            let v = generator.generate(&mut rng);
            assert!(v >= min && v < max, "{v} outside [{min}, {max})");
        }
    }

    #[test]
    fn test_safe_increment_decrement() {
        assert_eq!(safe_increment(5i32), 6);
        assert_eq!(safe_increment(i32::MAX), i32::MAX);
        assert_eq!(safe_increment(i64::MAX), i64::MAX);
        assert_eq!(safe_decrement(5i32), 4);
        assert_eq!(safe_decrement(i32::MIN), i32::MIN);
        assert_eq!(safe_decrement(i64::MIN), i64::MIN);
    }

    #[test]
    fn test_int_ranges_stay_in_bounds() {
        assert_int_range(0i32, 10);
        assert_int_range(5i32, 6);
        assert_int_range(-100i32, -1);
        assert_int_range(-100i32, 0);
        assert_int_range(-1i32, 1);
        assert_int_range(i32::MIN, i32::MAX);
        assert_int_range(i32::MIN, 0);
        assert_int_range(i32::MIN, i32::MIN + 2);
        assert_int_range(0i32, i32::MAX);
        assert_int_range(i64::MIN, i64::MAX);
        assert_int_range(i64::MIN, -5);
        assert_int_range(-7i64, i64::MAX);
    }

    #[test]
    fn test_minimal_range_at_type_minimum() {
        let mut rng = StdRng::seed_from_u64(42);
        for _ in 0..100 {
            assert_eq!(int_in_range(&mut rng, i32::MIN, i32::MIN + 1), i32::MIN);
        }
    }

    #[test]
    fn test_straddling_range_produces_both_signs() {
        let mut rng = StdRng::seed_from_u64(42);
        let generator = integers(-10, 150).unwrap();

        let mut negatives = 0;
        let mut non_negatives = 0;
        for _ in 0..ITERATIONS {
            let v = generator.generate(&mut rng);
            assert!((-10..150).contains(&v));
            if v < 0 {
                negatives += 1;
            } else {
                non_negatives += 1;
            }
        }

        assert!(negatives > 0);
        assert!(non_negatives > 0);
        // The sign is a fair coin, not proportional to the span
        assert!(negatives > ITERATIONS / 3);
    }

    #[test]
    fn test_negative_range_reaches_lower_bound() {
        let mut rng = StdRng::seed_from_u64(42);
        let mut seen = [false; 3];
        for _ in 0..1000 {
            let v = int_in_range(&mut rng, -3i32, 0);
            assert!((-3..0).contains(&v));
            seen[(v + 3) as usize] = true;
        }
        assert_eq!(seen, [true; 3]);
    }

    #[test]
    fn test_degenerate_range_returns_min() {
        let mut rng = StdRng::seed_from_u64(42);
        assert_eq!(integers(7, 7).unwrap().generate(&mut rng), 7);
        assert_eq!(doubles(2.5, 2.5).unwrap().generate(&mut rng), 2.5);
    }

    #[test]
    fn test_inverted_range_is_rejected() {
        assert!(matches!(integers(10, 5), Err(GenerationError::InvalidRange(_))));
        assert!(matches!(longs(0, -1), Err(GenerationError::InvalidRange(_))));
        assert!(matches!(doubles(1.0, 0.0), Err(GenerationError::InvalidRange(_))));
        assert!(matches!(doubles(f64::NAN, 1.0), Err(GenerationError::InvalidRange(_))));
        assert!(matches!(floats(0.0, f32::INFINITY), Err(GenerationError::InvalidRange(_))));
    }

    #[test]
    fn test_descriptor_range_requires_strict_order() {
        assert!(matches!(
            integer_generator(NumericMode::Range, 3, 3),
            Err(GenerationError::InvalidRange(_))
        ));
        assert!(matches!(
            long_generator(NumericMode::Range, 10, 1),
            Err(GenerationError::InvalidRange(_))
        ));
        assert!(matches!(
            double_generator(NumericMode::Range, 0.0, 0.0),
            Err(GenerationError::InvalidRange(_))
        ));
        // Bounds are ignored outside range mode
        assert!(integer_generator(NumericMode::Positive, 3, 3).is_ok());
    }

    #[test]
    fn test_modes() {
        let mut rng = StdRng::seed_from_u64(42);
        for _ in 0..ITERATIONS {
            assert!(positive_integers().generate(&mut rng) >= 1);
            assert!(negative_integers().generate(&mut rng) < 0);
            assert!(positive_longs().generate(&mut rng) >= 1);
            assert!(negative_longs().generate(&mut rng) < 0);
            assert!((1..1000).contains(&small_positive_integers().generate(&mut rng)));
            assert!((1..10_000).contains(&small_positive_longs().generate(&mut rng)));
        }
    }

    #[test]
    fn test_doubles_full_range_is_finite() {
        let mut rng = StdRng::seed_from_u64(42);
        let mut saw_negative = false;
        let mut saw_positive = false;
        for _ in 0..ITERATIONS {
            let v = any_doubles().generate(&mut rng);
            assert!(v.is_finite());
            saw_negative |= v < 0.0;
            saw_positive |= v > 0.0;

            let p = positive_doubles().generate(&mut rng);
            assert!((0.1..=f64::MAX).contains(&p));
            let n = negative_doubles().generate(&mut rng);
            assert!((-f64::MAX..=0.0).contains(&n));
        }
        assert!(saw_negative && saw_positive);
    }

    #[test]
    fn test_double_ranges_are_closed() {
        let mut rng = StdRng::seed_from_u64(42);
        for (min, max) in [(-5.0, 5.0), (-5.0, -1.0), (-5.0, 0.0), (1.5, 2.5), (0.0, 10_000.0)] {
            let generator = doubles(min, max).unwrap();
            for _ in 0..1000 {
                let v = generator.generate(&mut rng);
                assert!(v >= min && v <= max, "{v} outside [{min}, {max}]");
            }
        }
    }

    #[test]
    fn test_floats() {
        let mut rng = StdRng::seed_from_u64(42);
        let generator = floats(0.0, 1.0).unwrap();
        for _ in 0..1000 {
            let v = generator.generate(&mut rng);
            assert!((0.0..=1.0).contains(&v));
            assert!(any_floats().generate(&mut rng).is_finite());
        }
    }

    #[test]
    fn test_booleans_produce_both_values() {
        let mut rng = StdRng::seed_from_u64(42);
        let values: Vec<bool> = (0..100).map(|_| booleans().generate(&mut rng)).collect();
        assert!(values.contains(&true));
        assert!(values.contains(&false));
    }
}
