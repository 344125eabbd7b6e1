//! Basic example demonstrating isolation forest scoring
//!
//! Run with: cargo run --example basic -p anomaly

use anomaly::{AnomalyDetector, AttributeSet, DetectorConfig, ForestConfig, IsolationForestDetector};

#[derive(Debug, Clone, Copy)]
struct Point {
    x: f64,
    y: f64,
    z: f64,
}

impl Point {
    fn norm(&self) -> f64 {
        (self.x * self.x + self.y * self.y + self.z * self.z).sqrt()
    }
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    println!("=== anomaly Basic Example ===\n");

    // A small cluster around the origin and one far-away point
    let mut points: Vec<Point> = (0..14)
        .map(|i| {
            let t = i as f64;
            Point {
                x: (t * 1.3).sin() * 0.1,
                y: (t * 0.7).cos() * 0.1,
                z: (t * 2.1).sin() * 0.05,
            }
        })
        .collect();
    points.push(Point { x: 10.0, y: 10.0, z: 10.0 });

    let attributes = AttributeSet::new()
        .with("x", |p: &Point| p.x)
        .with("y", |p: &Point| p.y)
        .with("z", |p: &Point| p.z)
        .with("norm", Point::norm);

    let forest = ForestConfig::new(100, 256).clamped().with_seed(42);
    let mut detector = IsolationForestDetector::from_config(attributes, DetectorConfig::new(forest, 0.6));
    detector.fit(&points)?;
    let result = detector.detect(&points)?;

    if let Some(forest) = detector.forest() {
        println!(
            "Forest: {} trees, sample size {}, height limit {}",
            forest.n_trees(),
            forest.sample_size(),
            forest.height_limit()
        );
        let names = forest.attributes().names();
        for (name, share) in names.iter().zip(forest.attribute_usage()) {
            println!("   {:>5}: {:.1}% of splits", name, share * 100.0);
        }
        println!();
    }

    println!("Ranked points:");
    for (rank, (idx, score)) in result.ranked().into_iter().enumerate() {
        let p = points[idx];
        let flag = if result.is_anomaly[idx] { "  <-- anomaly" } else { "" };
        println!(
            "{:>3} - ({:.3}, {:.3}, {:.3}) = {:.4}{}",
            rank + 1,
            p.x,
            p.y,
            p.z,
            score,
            flag
        );
    }

    println!("\nAnomalies found: {}", result.anomaly_count());
    println!("\n=== Example Complete ===");
    Ok(())
}
