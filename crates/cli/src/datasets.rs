//! Points in space and the built-in demo datasets.

use anomaly::AttributeSet;
use rand::seq::SliceRandom;
use rand::Rng;
use rand_distr::{Distribution, StandardNormal};
use serde::{Deserialize, Serialize};

/// A point in three dimensions. Missing `z` values read as 0.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Point {
    pub x: f64,
    pub y: f64,
    #[serde(default)]
    pub z: f64,
}

impl Point {
    pub fn new(x: f64, y: f64, z: f64) -> Self {
        Self { x, y, z }
    }

    /// Euclidean distance from the origin.
    pub fn norm(&self) -> f64 {
        (self.x * self.x + self.y * self.y + self.z * self.z).sqrt()
    }
}

/// Attributes used by every command: the three coordinates and the norm.
pub fn point_attributes() -> AttributeSet<Point> {
    AttributeSet::new()
        .with("x", |p: &Point| p.x)
        .with("y", |p: &Point| p.y)
        .with("z", |p: &Point| p.z)
        .with("norm", Point::norm)
}

/// `n` points from a 2-D standard normal distribution, in the `z = 0` plane.
pub fn standard_normal_cloud<R: Rng + ?Sized>(rng: &mut R, n: usize) -> Vec<Point> {
    (0..n)
        .map(|_| {
            let x: f64 = StandardNormal.sample(rng);
            let y: f64 = StandardNormal.sample(rng);
            Point::new(x, y, 0.0)
        })
        .collect()
}

fn gaussian_point<R: Rng + ?Sized>(rng: &mut R, x: (f64, f64), y: (f64, f64)) -> Point {
    let dx: f64 = StandardNormal.sample(rng);
    let dy: f64 = StandardNormal.sample(rng);
    Point::new(x.0 + x.1 * dx, y.0 + y.1 * dy, 0.0)
}

/// A tight cluster of `normal` points around the origin mixed with a second
/// group of `outliers` points far away, shuffled together.
pub fn two_clusters<R: Rng + ?Sized>(rng: &mut R, normal: usize, outliers: usize) -> Vec<Point> {
    let mut points = Vec::with_capacity(normal + outliers);
    points.extend((0..normal).map(|_| gaussian_point(rng, (0.0, 0.2), (0.0, 0.2))));
    points.extend((0..outliers).map(|_| gaussian_point(rng, (-50.5, 1.0), (135.0, 5.0))));
    points.shuffle(rng);
    points
}

/// A 3 x 5 grid near the origin followed by five scattered points.
pub fn grid_with_outliers() -> Vec<Point> {
    let mut points = Vec::with_capacity(20);
    for x in [0.0, 0.1, 0.2] {
        for y in [0.0, -0.1, 0.1, 0.2, -0.2] {
            points.push(Point::new(x, y, 0.0));
        }
    }
    points.extend([
        Point::new(-3.0, 3.0, 0.0),
        Point::new(-100.0, 3.0, 0.0),
        Point::new(5.0, 2.0, 0.0),
        Point::new(-10.0, -5.0, 0.0),
        Point::new(8.0, 8.0, 0.0),
    ]);
    points
}

/// Hawkins, Bradu and Kass (1984) artificial data, explanatory variables only.
/// The first 14 rows are the planted outliers.
const HBK: [[f64; 3]; 75] = [
    [10.1, 19.6, 28.3], [9.5, 20.5, 28.9], [10.7, 20.2, 31.0], [9.9, 21.5, 31.7], [10.3, 21.1, 31.1],
    [10.8, 20.4, 29.2], [10.5, 20.9, 29.1], [9.9, 19.6, 28.8], [9.7, 20.7, 31.0], [9.3, 19.7, 30.3],
    [11.0, 24.0, 35.0], [12.0, 23.0, 37.0], [12.0, 26.0, 34.0], [11.0, 34.0, 34.0], [3.4, 2.9, 2.1],
    [3.1, 2.2, 0.3], [0.0, 1.6, 0.2], [2.3, 1.6, 2.0], [0.8, 2.9, 1.6], [3.1, 3.4, 2.2],
    [2.6, 2.2, 1.9], [0.4, 3.2, 1.9], [2.0, 2.3, 0.8], [1.3, 2.3, 0.5], [1.0, 0.0, 0.4],
    [0.9, 3.3, 2.5], [3.3, 2.5, 2.9], [1.8, 0.8, 2.0], [1.2, 0.9, 0.8], [1.2, 0.7, 3.4],
    [3.1, 1.4, 1.0], [0.5, 2.4, 0.3], [1.5, 3.1, 1.5], [0.4, 0.0, 0.7], [3.1, 2.4, 3.0],
    [1.1, 2.2, 2.7], [0.1, 3.0, 2.6], [1.5, 1.2, 0.2], [2.1, 0.0, 1.2], [0.5, 2.0, 1.2],
    [3.4, 1.6, 2.9], [0.3, 1.0, 2.7], [0.1, 3.3, 0.9], [1.8, 0.5, 3.2], [1.9, 0.1, 0.6],
    [1.8, 0.5, 3.0], [3.0, 0.1, 0.8], [3.1, 1.6, 3.0], [3.1, 2.5, 1.9], [2.1, 2.8, 2.9],
    [2.3, 1.5, 0.4], [3.3, 0.6, 1.2], [0.3, 0.4, 3.3], [1.1, 3.0, 0.3], [0.5, 2.4, 0.9],
    [1.8, 3.2, 0.9], [1.8, 0.7, 0.7], [2.4, 3.4, 1.5], [1.6, 2.1, 3.0], [0.3, 1.5, 3.3],
    [0.4, 3.4, 3.0], [0.9, 0.1, 0.3], [1.1, 2.7, 0.2], [2.8, 3.0, 2.9], [2.0, 0.7, 2.7],
    [0.2, 1.8, 0.8], [1.6, 2.0, 1.2], [0.1, 0.0, 1.1], [2.0, 0.6, 0.3], [1.0, 2.2, 2.9],
    [2.2, 2.5, 2.3], [0.6, 2.0, 1.5], [0.3, 1.7, 2.2], [0.0, 2.2, 1.6], [0.3, 0.4, 2.6],
];

pub fn hbk() -> Vec<Point> {
    HBK.iter().map(|&[x, y, z]| Point::new(x, y, z)).collect()
}
