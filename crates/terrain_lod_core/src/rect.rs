use crate::{Point2f, PointN};

/// An axis-aligned rectangle in texture space, given by its `minimum` corner and `shape`.
///
/// Texture space runs opposite to world space along Y: the quadrant of a chunk at `+Y` in the world maps to the
/// *lower* half of the texture.
#[derive(Clone, Copy, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Deserialize, serde::Serialize))]
pub struct TexCoordRect {
    pub minimum: Point2f,
    pub shape: Point2f,
}

impl TexCoordRect {
    /// The entire texture.
    pub const UNIT: Self = TexCoordRect {
        minimum: PointN([0.0; 2]),
        shape: PointN([1.0; 2]),
    };

    pub fn from_min_and_shape(minimum: Point2f, shape: Point2f) -> Self {
        Self { minimum, shape }
    }

    pub fn area(&self) -> f32 {
        self.shape.x() * self.shape.y()
    }

    pub fn least_upper_bound(&self) -> Point2f {
        self.minimum + self.shape
    }

    /// Split into four equal quadrants. Each quadrant is paired with the direction (in world space, each component
    /// `±1`) in which the matching quarter of the chunk lies.
    pub fn quadrants(&self) -> [(Point2f, TexCoordRect); 4] {
        let half = self.shape / 2.0;
        let x = self.minimum.x();
        let y = self.minimum.y();
        let quadrant = |min_x: f32, min_y: f32| TexCoordRect::from_min_and_shape(PointN([min_x, min_y]), half);

        [
            (PointN([1.0, 1.0]), quadrant(x + half.x(), y)),
            (PointN([-1.0, 1.0]), quadrant(x, y)),
            (PointN([1.0, -1.0]), quadrant(x + half.x(), y + half.y())),
            (PointN([-1.0, -1.0]), quadrant(x, y + half.y())),
        ]
    }

    /// Returns `true` iff the interiors of `self` and `other` intersect.
    pub fn overlaps(&self, other: &Self) -> bool {
        let a_lub = self.least_upper_bound();
        let b_lub = other.least_upper_bound();

        self.minimum.x() < b_lub.x()
            && other.minimum.x() < a_lub.x()
            && self.minimum.y() < b_lub.y()
            && other.minimum.y() < a_lub.y()
    }
}

// ████████╗███████╗███████╗████████╗███████╗
// ╚══██╔══╝██╔════╝██╔════╝╚══██╔══╝██╔════╝
//    ██║   █████╗  ███████╗   ██║   ███████╗
//    ██║   ██╔══╝  ╚════██║   ██║   ╚════██║
//    ██║   ███████╗███████║   ██║   ███████║
//    ╚═╝   ╚══════╝╚══════╝   ╚═╝   ╚══════╝
