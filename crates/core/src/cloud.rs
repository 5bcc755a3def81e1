use crate::traits::HasPosition;
use crate::Aabb;

/// An ordered sequence of points sharing one point type.
///
/// `width`/`height` follow the PCD convention: an unorganized cloud has
/// `height == 1` and `width == len()`, an organized (image-like) cloud has
/// `width * height == len()` with points stored row-major.
#[derive(Debug, Clone, PartialEq)]
pub struct PointCloud<P> {
    pub points: Vec<P>,
    width: usize,
    height: usize,
}

impl<P> PointCloud<P> {
    pub fn new() -> Self {
        Self {
            points: Vec::new(),
            width: 0,
            height: 1,
        }
    }

    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            points: Vec::with_capacity(capacity),
            width: 0,
            height: 1,
        }
    }

    pub fn from_points(points: Vec<P>) -> Self {
        let width = points.len();
        Self {
            points,
            width,
            height: 1,
        }
    }

    /// Builds an organized cloud.
    ///
    /// # Panics
    ///
    /// Panics if `width * height` does not match the number of points.
    pub fn organized(points: Vec<P>, width: usize, height: usize) -> Self {
        assert_eq!(
            width * height,
            points.len(),
            "organized cloud must have width * height points"
        );
        Self {
            points,
            width,
            height,
        }
    }

    pub fn len(&self) -> usize {
        self.points.len()
    }

    pub fn is_empty(&self) -> bool {
        self.points.is_empty()
    }

    pub fn width(&self) -> usize {
        self.width
    }

    pub fn height(&self) -> usize {
        self.height
    }

    pub fn is_organized(&self) -> bool {
        self.height > 1
    }

    /// Appends a point. Pushing onto an organized cloud flattens it.
    pub fn push(&mut self, point: P) {
        self.points.push(point);
        self.width = self.points.len();
        self.height = 1;
    }

    pub fn point(&self, i: usize) -> &P {
        &self.points[i]
    }

    pub fn iter(&self) -> std::slice::Iter<'_, P> {
        self.points.iter()
    }

    /// Builds a new cloud of the same shape by mapping every point, stopping
    /// at the first error. `f` also receives the point's index.
    pub fn try_map<Q, E>(
        &self,
        mut f: impl FnMut(usize, &P) -> Result<Q, E>,
    ) -> Result<PointCloud<Q>, E> {
        let mut points = Vec::with_capacity(self.points.len());
        for (i, p) in self.points.iter().enumerate() {
            points.push(f(i, p)?);
        }
        Ok(PointCloud {
            points,
            width: self.width,
            height: self.height,
        })
    }
}

impl<P: HasPosition> PointCloud<P> {
    pub fn aabb(&self) -> Aabb {
        Aabb::from_points(&self.points)
    }
}

impl<P> Default for PointCloud<P> {
    fn default() -> Self {
        Self::new()
    }
}

impl<P> FromIterator<P> for PointCloud<P> {
    fn from_iter<I: IntoIterator<Item = P>>(iter: I) -> Self {
        Self::from_points(iter.into_iter().collect())
    }
}

impl<P> IntoIterator for PointCloud<P> {
    type Item = P;
    type IntoIter = std::vec::IntoIter<P>;

    fn into_iter(self) -> Self::IntoIter {
        self.points.into_iter()
    }
}

impl<'a, P> IntoIterator for &'a PointCloud<P> {
    type Item = &'a P;
    type IntoIter = std::slice::Iter<'a, P>;

    fn into_iter(self) -> Self::IntoIter {
        self.points.iter()
    }
}
