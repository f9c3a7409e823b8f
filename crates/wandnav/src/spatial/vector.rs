//! Fixed-length vector type used for all room-frame math

use std::ops::{Add, AddAssign, Index, Mul, MulAssign, Neg, Sub, SubAssign};

use crate::error::{NavError, Result};

/// A vector of `N` real components.
///
/// The length is pinned by the type. Operators return new values; the
/// `*Assign` operators and [`Vector::normalise`] mutate in place.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Vector<const N: usize> {
    pub data: [f64; N],
}

/// The common three-component case
pub type Vector3 = Vector<3>;

impl<const N: usize> Vector<N> {
    /// All components zero
    pub const ZERO: Self = Self { data: [0.0; N] };

    /// Create a vector that takes ownership of `data`
    pub const fn from_array(data: [f64; N]) -> Self {
        Self { data }
    }

    /// Number of components
    pub const fn len(&self) -> usize {
        N
    }

    pub const fn is_empty(&self) -> bool {
        N == 0
    }

    /// Sum of component-wise products
    pub fn dot(&self, other: &Self) -> f64 {
        self.data
            .iter()
            .zip(other.data.iter())
            .map(|(a, b)| a * b)
            .sum()
    }

    /// Euclidean length
    pub fn magnitude(&self) -> f64 {
        self.dot(self).sqrt()
    }

    /// Return a copy scaled by `k`
    pub fn scaled(&self, k: f64) -> Self {
        *self * k
    }

    /// Normalise in place.
    ///
    /// A zero-length vector becomes the first basis vector `(1, 0, 0, ...)`
    /// instead of propagating NaN.
    pub fn normalise(&mut self) -> &mut Self {
        let mag = self.magnitude();
        if mag == 0.0 {
            if let Some(first) = self.data.first_mut() {
                *first = 1.0;
            }
            return self;
        }
        for value in self.data.iter_mut() {
            *value /= mag;
        }
        self
    }

    /// Return a normalised copy, leaving `self` untouched
    pub fn normalised(&self) -> Self {
        let mut copy = *self;
        copy.normalise();
        copy
    }

    /// Cross product; only defined for three components
    pub fn cross(&self, other: &Self) -> Result<Vector3> {
        let (Ok(a), Ok(b)) = (
            <[f64; 3]>::try_from(&self.data[..]),
            <[f64; 3]>::try_from(&other.data[..]),
        ) else {
            return Err(NavError::InvalidDimension {
                expected: 3,
                actual: N,
            });
        };
        Ok(Vector3::from_array(a).cross_3d(&Vector3::from_array(b)))
    }

    /// Angle to `other` in radians, `0.0` when either vector is zero
    pub fn angle(&self, other: &Self) -> f64 {
        let mags = self.magnitude() * other.magnitude();
        if mags > 0.0 {
            (self.dot(other) / mags).clamp(-1.0, 1.0).acos()
        } else {
            0.0
        }
    }
}

impl Vector3 {
    /// Create a three-component vector
    pub const fn new(x: f64, y: f64, z: f64) -> Self {
        Self { data: [x, y, z] }
    }

    pub fn x(&self) -> f64 {
        self.data[0]
    }

    pub fn y(&self) -> f64 {
        self.data[1]
    }

    pub fn z(&self) -> f64 {
        self.data[2]
    }

    /// Infallible cross product for the three-component case
    pub fn cross_3d(&self, other: &Vector3) -> Vector3 {
        let a = &self.data;
        let b = &other.data;
        Vector3::new(
            a[1] * b[2] - b[1] * a[2],
            a[2] * b[0] - b[2] * a[0],
            a[0] * b[1] - b[0] * a[1],
        )
    }
}

impl<const N: usize> Default for Vector<N> {
    fn default() -> Self {
        Self::ZERO
    }
}

impl<const N: usize> From<[f64; N]> for Vector<N> {
    fn from(data: [f64; N]) -> Self {
        Self { data }
    }
}

impl<const N: usize> Index<usize> for Vector<N> {
    type Output = f64;

    fn index(&self, index: usize) -> &Self::Output {
        &self.data[index]
    }
}

impl<const N: usize> AddAssign for Vector<N> {
    fn add_assign(&mut self, rhs: Self) {
        for (a, b) in self.data.iter_mut().zip(rhs.data) {
            *a += b;
        }
    }
}

impl<const N: usize> SubAssign for Vector<N> {
    fn sub_assign(&mut self, rhs: Self) {
        for (a, b) in self.data.iter_mut().zip(rhs.data) {
            *a -= b;
        }
    }
}

impl<const N: usize> MulAssign<f64> for Vector<N> {
    fn mul_assign(&mut self, rhs: f64) {
        for a in self.data.iter_mut() {
            *a *= rhs;
        }
    }
}

impl<const N: usize> Add for Vector<N> {
    type Output = Vector<N>;

    fn add(mut self, rhs: Self) -> Self::Output {
        self += rhs;
        self
    }
}

impl<const N: usize> Sub for Vector<N> {
    type Output = Vector<N>;

    fn sub(mut self, rhs: Self) -> Self::Output {
        self -= rhs;
        self
    }
}

impl<const N: usize> Mul<f64> for Vector<N> {
    type Output = Vector<N>;

    fn mul(mut self, rhs: f64) -> Self::Output {
        self *= rhs;
        self
    }
}

impl<const N: usize> Neg for Vector<N> {
    type Output = Vector<N>;

    fn neg(self) -> Self::Output {
        self * -1.0
    }
}
