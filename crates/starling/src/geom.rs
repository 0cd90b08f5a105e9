use serde::{Deserialize, Serialize};
use std::f64::consts::TAU;
use std::ops::{Add, AddAssign, Mul, Sub, SubAssign};

#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct Point {
    pub x: f64,
    pub y: f64,
}

impl Point {
    pub const ORIGIN: Point = Point { x: 0.0, y: 0.0 };

    pub fn new(x: f64, y: f64) -> Self {
        Self { x, y }
    }

    pub fn from_polar(radius: f64, angle: f64) -> Self {
        Self {
            x: radius * angle.cos(),
            y: radius * angle.sin(),
        }
    }

    /// Distance from the origin.
    pub fn length(self) -> f64 {
        self.x.hypot(self.y)
    }

    /// Polar angle in `(-pi, pi]`.
    pub fn angle(self) -> f64 {
        self.y.atan2(self.x)
    }

    pub fn distance(self, other: Point) -> f64 {
        (self - other).length()
    }

    /// Same direction, given length. The origin stays at the origin.
    pub fn with_length(self, length: f64) -> Self {
        let current = self.length();
        if current <= f64::EPSILON {
            return self;
        }
        self * (length / current)
    }

    /// Mean of the given points, `None` if there are none.
    pub fn centroid<I>(points: I) -> Option<Point>
    where
        I: IntoIterator<Item = Point>,
    {
        let mut sum = Point::ORIGIN;
        let mut count = 0usize;
        for p in points {
            sum += p;
            count += 1;
        }
        (count > 0).then(|| sum * (1.0 / count as f64))
    }
}

impl Add for Point {
    type Output = Point;

    fn add(self, rhs: Point) -> Point {
        Point::new(self.x + rhs.x, self.y + rhs.y)
    }
}

impl AddAssign for Point {
    fn add_assign(&mut self, rhs: Point) {
        self.x += rhs.x;
        self.y += rhs.y;
    }
}

impl Sub for Point {
    type Output = Point;

    fn sub(self, rhs: Point) -> Point {
        Point::new(self.x - rhs.x, self.y - rhs.y)
    }
}

impl SubAssign for Point {
    fn sub_assign(&mut self, rhs: Point) {
        self.x -= rhs.x;
        self.y -= rhs.y;
    }
}

impl Mul<f64> for Point {
    type Output = Point;

    fn mul(self, rhs: f64) -> Point {
        Point::new(self.x * rhs, self.y * rhs)
    }
}

/// Maps any angle into `[0, 2pi)`.
pub fn normalize_angle(angle: f64) -> f64 {
    let a = angle.rem_euclid(TAU);
    // rem_euclid can round up to exactly TAU for tiny negative inputs.
    if a >= TAU { 0.0 } else { a }
}

/// Signed shortest rotation from `from` to `to`, in `(-pi, pi]`.
pub fn angle_delta(from: f64, to: f64) -> f64 {
    let d = normalize_angle(to - from);
    if d > std::f64::consts::PI { d - TAU } else { d }
}
