use std::ops::{Add, Mul, Sub};

/// Values the filter can interpolate: scalars and glam vectors.
pub trait Lerp: Copy + Add<Output = Self> + Sub<Output = Self> + Mul<f32, Output = Self> {}

impl<T> Lerp for T where T: Copy + Add<Output = T> + Sub<Output = T> + Mul<f32, Output = T> {}

/// One step of the single-pole low-pass filter.
///
/// Closes `factor` of the remaining gap; never overshoots for `factor` in (0, 1].
#[inline]
pub fn step<T: Lerp>(current: T, target: T, factor: f32) -> T {
    current + (target - current) * factor
}

/// Steps needed until the remaining gap is at most `epsilon` times the
/// initial gap: `ceil(ln(epsilon) / ln(1 - factor))`.
pub fn steps_to_converge(factor: f32, epsilon: f32) -> u32 {
    if factor >= 1.0 {
        return 1;
    }
    if factor <= 0.0 || epsilon <= 0.0 {
        return u32::MAX;
    }
    if epsilon >= 1.0 {
        return 0;
    }
    let n = (epsilon.ln() / (1.0 - factor).ln()).ceil();
    n.max(0.0) as u32
}

/// A target set asynchronously by input and a trailing value advanced once
/// per frame.
#[derive(Clone, Copy, Debug, PartialEq, Default)]
pub struct Damped<T> {
    pub target: T,
    pub current: T,
}

impl<T: Lerp> Damped<T> {
    pub fn new(value: T) -> Self {
        Self {
            target: value,
            current: value,
        }
    }

    pub fn set_target(&mut self, target: T) {
        self.target = target;
    }

    /// Jump both values, e.g. when the first real sample arrives.
    pub fn reset(&mut self, value: T) {
        self.target = value;
        self.current = value;
    }

    pub fn step(&mut self, factor: f32) -> T {
        self.current = step(self.current, self.target, factor);
        self.current
    }

    /// Displacement not yet applied to `current`.
    pub fn offset(&self) -> T {
        self.target - self.current
    }
}
