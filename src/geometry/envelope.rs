use nalgebra::Point2;

/// 2D axis-aligned bounding box accumulator.
///
/// A newly created envelope is *null*: it contains no points and every inclusion test fails. The
/// first call to [`expand_to_include`](Envelope::expand_to_include) initializes the bounds, and
/// every further call grows them as needed. The null state is encoded as `max < min`, so the raw
/// bounds of a null envelope carry no meaning.
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Envelope {
    min_x: f64,
    max_x: f64,
    min_y: f64,
    max_y: f64,
}

impl Envelope {
    /// Creates a null envelope
    /// ```
    /// # use coordseq::geometry::Envelope;
    /// let envelope = Envelope::null();
    /// assert!(envelope.is_null());
    /// ```
    pub fn null() -> Self {
        Self {
            min_x: 0.0,
            max_x: -1.0,
            min_y: 0.0,
            max_y: -1.0,
        }
    }

    /// Creates an envelope from the given minimum and maximum corners. Panics if the minimum
    /// corner is not less than or equal to the maximum corner
    /// ```
    /// # use coordseq::geometry::Envelope;
    /// let envelope = Envelope::from_min_max(
    ///     nalgebra::Point2::new(0.0, 0.0),
    ///     nalgebra::Point2::new(1.0, 1.0),
    /// );
    /// assert!(!envelope.is_null());
    /// ```
    pub fn from_min_max(min: Point2<f64>, max: Point2<f64>) -> Self {
        if min.x > max.x || min.y > max.y {
            panic!("Envelope::from_min_max: Minimum corner must be <= maximum corner!");
        }
        Self {
            min_x: min.x,
            max_x: max.x,
            min_y: min.y,
            max_y: max.y,
        }
    }

    /// Returns true if this envelope contains no points
    pub fn is_null(&self) -> bool {
        self.max_x < self.min_x
    }

    /// Grows this envelope to include the point `(x, y)`. On a null envelope this initializes
    /// the bounds to exactly that point
    /// ```
    /// # use coordseq::geometry::Envelope;
    /// let mut envelope = Envelope::null();
    /// envelope.expand_to_include(1.0, 2.0);
    /// envelope.expand_to_include(-3.0, 0.5);
    /// assert_eq!(nalgebra::Point2::new(-3.0, 0.5), envelope.min());
    /// assert_eq!(nalgebra::Point2::new(1.0, 2.0), envelope.max());
    /// ```
    pub fn expand_to_include(&mut self, x: f64, y: f64) {
        if self.is_null() {
            self.min_x = x;
            self.max_x = x;
            self.min_y = y;
            self.max_y = y;
            return;
        }
        if x < self.min_x {
            self.min_x = x;
        }
        if x > self.max_x {
            self.max_x = x;
        }
        if y < self.min_y {
            self.min_y = y;
        }
        if y > self.max_y {
            self.max_y = y;
        }
    }

    /// The minimum corner of this envelope. Meaningless if the envelope is null
    pub fn min(&self) -> Point2<f64> {
        Point2::new(self.min_x, self.min_y)
    }

    /// The maximum corner of this envelope. Meaningless if the envelope is null
    pub fn max(&self) -> Point2<f64> {
        Point2::new(self.max_x, self.max_y)
    }

    /// The extent of this envelope along the x axis. A null envelope has width 0
    pub fn width(&self) -> f64 {
        if self.is_null() {
            return 0.0;
        }
        self.max_x - self.min_x
    }

    /// The extent of this envelope along the y axis. A null envelope has height 0
    pub fn height(&self) -> f64 {
        if self.is_null() {
            return 0.0;
        }
        self.max_y - self.min_y
    }

    /// Returns true if the point `(x, y)` lies within this envelope. Points right on the boundary
    /// count as contained
    /// ```
    /// # use coordseq::geometry::Envelope;
    /// let mut envelope = Envelope::null();
    /// envelope.expand_to_include(0.0, 0.0);
    /// envelope.expand_to_include(2.0, 2.0);
    /// assert!(envelope.contains(2.0, 1.0));
    /// assert!(!envelope.contains(3.0, 1.0));
    /// ```
    pub fn contains(&self, x: f64, y: f64) -> bool {
        x >= self.min_x && x <= self.max_x && y >= self.min_y && y <= self.max_y
    }

    /// Performs an intersection test between this envelope and `other`. Null envelopes intersect
    /// nothing
    pub fn intersects(&self, other: &Envelope) -> bool {
        if self.is_null() || other.is_null() {
            return false;
        }
        self.min_x <= other.max_x
            && self.max_x >= other.min_x
            && self.min_y <= other.max_y
            && self.max_y >= other.min_y
    }
}

impl Default for Envelope {
    fn default() -> Self {
        Self::null()
    }
}
