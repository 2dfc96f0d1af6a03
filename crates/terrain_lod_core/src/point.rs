use core::ops::{Add, AddAssign, Div, Mul, Neg, Sub, SubAssign};

/// An N-dimensional point (where N=2 or N=3), which is just a primitive array of type `D`.
///
/// ```
/// use terrain_lod_core::PointN;
///
/// let p1 = PointN([1.0, 2.0]);
/// let p2 = PointN([3.0, 4.0]);
///
/// assert_eq!(p1 + p2, PointN([4.0, 6.0]));
/// assert_eq!(p1 - p2, PointN([-2.0, -2.0]));
/// assert_eq!(p1 * 2.0, PointN([2.0, 4.0]));
/// assert_eq!(p2 / 2.0, PointN([1.5, 2.0]));
/// ```
#[derive(Copy, Clone, Debug, Default, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Deserialize, serde::Serialize))]
pub struct PointN<N>(pub N);

/// A 2-dimensional point with scalar type `T`.
pub type Point2<T> = PointN<[T; 2]>;
/// A 2-dimensional point with scalar type `f32`.
pub type Point2f = PointN<[f32; 2]>;
/// A 3-dimensional point with scalar type `T`.
pub type Point3<T> = PointN<[T; 3]>;
/// A 3-dimensional point with scalar type `f32`.
pub type Point3f = PointN<[f32; 3]>;

impl<T> Point2<T>
where
    T: Copy,
{
    #[inline]
    pub fn x(&self) -> T {
        self.0[0]
    }

    #[inline]
    pub fn y(&self) -> T {
        self.0[1]
    }

    pub fn fill(value: T) -> Self {
        PointN([value; 2])
    }
}

impl<T> Point3<T>
where
    T: Copy,
{
    #[inline]
    pub fn x(&self) -> T {
        self.0[0]
    }

    #[inline]
    pub fn y(&self) -> T {
        self.0[1]
    }

    #[inline]
    pub fn z(&self) -> T {
        self.0[2]
    }

    pub fn fill(value: T) -> Self {
        PointN([value; 3])
    }
}

impl Point2f {
    pub const ZERO: Self = PointN([0.0; 2]);
    pub const ONES: Self = PointN([1.0; 2]);

    /// Extend into 3D by appending `z`.
    pub fn extend(&self, z: f32) -> Point3f {
        PointN([self.x(), self.y(), z])
    }
}

impl Point3f {
    pub const ZERO: Self = PointN([0.0; 3]);

    pub fn cross(&self, other: &Self) -> Self {
        PointN([
            self.y() * other.z() - self.z() * other.y(),
            self.z() * other.x() - self.x() * other.z(),
            self.x() * other.y() - self.y() * other.x(),
        ])
    }

    pub fn dot(&self, other: &Self) -> f32 {
        self.x() * other.x() + self.y() * other.y() + self.z() * other.z()
    }
}

macro_rules! impl_point_ops {
    ($dim:literal) => {
        impl Add for PointN<[f32; $dim]> {
            type Output = Self;

            #[inline]
            fn add(self, rhs: Self) -> Self {
                let mut out = self;
                out += rhs;
                out
            }
        }

        impl AddAssign for PointN<[f32; $dim]> {
            #[inline]
            fn add_assign(&mut self, rhs: Self) {
                for (a, b) in self.0.iter_mut().zip(rhs.0.iter()) {
                    *a += *b;
                }
            }
        }

        impl Sub for PointN<[f32; $dim]> {
            type Output = Self;

            #[inline]
            fn sub(self, rhs: Self) -> Self {
                let mut out = self;
                out -= rhs;
                out
            }
        }

        impl SubAssign for PointN<[f32; $dim]> {
            #[inline]
            fn sub_assign(&mut self, rhs: Self) {
                for (a, b) in self.0.iter_mut().zip(rhs.0.iter()) {
                    *a -= *b;
                }
            }
        }

        impl Mul<f32> for PointN<[f32; $dim]> {
            type Output = Self;

            #[inline]
            fn mul(self, rhs: f32) -> Self {
                let mut out = self;
                for c in out.0.iter_mut() {
                    *c *= rhs;
                }
                out
            }
        }

        impl Mul for PointN<[f32; $dim]> {
            type Output = Self;

            #[inline]
            fn mul(self, rhs: Self) -> Self {
                let mut out = self;
                for (a, b) in out.0.iter_mut().zip(rhs.0.iter()) {
                    *a *= *b;
                }
                out
            }
        }

        impl Div<f32> for PointN<[f32; $dim]> {
            type Output = Self;

            #[inline]
            fn div(self, rhs: f32) -> Self {
                let mut out = self;
                for c in out.0.iter_mut() {
                    *c /= rhs;
                }
                out
            }
        }

        impl Neg for PointN<[f32; $dim]> {
            type Output = Self;

            #[inline]
            fn neg(self) -> Self {
                self * -1.0
            }
        }

        impl From<[f32; $dim]> for PointN<[f32; $dim]> {
            #[inline]
            fn from(array: [f32; $dim]) -> Self {
                PointN(array)
            }
        }

        impl From<PointN<[f32; $dim]>> for [f32; $dim] {
            #[inline]
            fn from(p: PointN<[f32; $dim]>) -> Self {
                p.0
            }
        }
    };
}

impl_point_ops!(2);
impl_point_ops!(3);

// ████████╗███████╗███████╗████████╗███████╗
// ╚══██╔══╝██╔════╝██╔════╝╚══██╔══╝██╔════╝
//    ██║   █████╗  ███████╗   ██║   ███████╗
//    ██║   ██╔══╝  ╚════██║   ██║   ╚════██║
//    ██║   ███████╗███████║   ██║   ███████║
//    ╚═╝   ╚══════╝╚══════╝   ╚═╝   ╚══════╝

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn cross_product_of_basis_vectors() {
        let x = PointN([1.0, 0.0, 0.0]);
        let y = PointN([0.0, 1.0, 0.0]);

        assert_eq!(x.cross(&y), PointN([0.0, 0.0, 1.0]));
        assert_eq!(y.cross(&x), PointN([0.0, 0.0, -1.0]));
    }

    #[test]
    fn negation_flips_every_component() {
        assert_eq!(-PointN([1.0, -2.0]), PointN([-1.0, 2.0]));
    }
}
