//! # iforest-cli
//!
//! Command-line interface for isolation forest anomaly scoring.

mod datasets;

use anomaly::{
    AnomalyResult, ForestConfig, IsolationForest, SamplePolicy, DEFAULT_SAMPLE_SIZE,
    DEFAULT_THRESHOLD,
};
use clap::{Args, Parser, Subcommand, ValueEnum};
use datasets::{point_attributes, Point};
use rand::SeedableRng;
use rand_chacha::ChaCha8Rng;
use std::fs::File;
use std::io::{BufReader, Read};
use std::path::{Path, PathBuf};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

type CliResult<T> = std::result::Result<T, String>;

#[derive(Parser)]
#[command(name = "iforest")]
#[command(about = "Isolation forest anomaly scoring CLI", long_about = None)]
struct Cli {
    /// Log build details (overridden by RUST_LOG)
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Score a generated or built-in dataset
    Demo {
        /// Dataset to score
        #[arg(short, long, value_enum, default_value_t = Dataset::Cloud)]
        dataset: Dataset,

        /// Number of points in the normal cloud (cloud dataset)
        #[arg(short, long, default_value = "200")]
        points: usize,

        /// Number of points in the central cluster (clusters dataset)
        #[arg(long, default_value = "1000")]
        normal: usize,

        /// Number of far-away points (clusters dataset)
        #[arg(long, default_value = "10")]
        outliers: usize,

        /// Number of highest-scored points to print
        #[arg(long, default_value = "20")]
        top: usize,

        #[command(flatten)]
        forest: ForestArgs,
    },

    /// Score points loaded from a file
    Score {
        /// Input file (CSV with x,y,z columns or JSON array of {x,y,z} objects)
        #[arg(short, long)]
        input: PathBuf,

        /// Scores above this value are reported as anomalies
        #[arg(short, long, default_value_t = DEFAULT_THRESHOLD)]
        threshold: f64,

        /// Number of highest-scored points to print
        #[arg(long, default_value = "20")]
        top: usize,

        /// Output file for the JSON report (optional)
        #[arg(short, long)]
        output: Option<PathBuf>,

        #[command(flatten)]
        forest: ForestArgs,
    },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
enum Dataset {
    /// 2-D standard normal cloud plus the point (10, 10, 10)
    Cloud,
    /// Tight cluster at the origin and a far cluster of outliers
    Clusters,
    /// 15-point grid with 5 scattered points
    Grid,
    /// Hawkins-Bradu-Kass data
    Hbk,
}

/// Forest parameters shared by every command.
#[derive(Debug, Default, Args)]
struct ForestArgs {
    /// Forest configuration file (JSON); flags override its fields
    #[arg(long)]
    config: Option<PathBuf>,

    /// Number of trees
    #[arg(long)]
    trees: Option<usize>,

    /// Subsample size per tree (default: min(256, number of points))
    #[arg(long)]
    sample_size: Option<usize>,

    /// Maximum explored depth (default: sample size - 1)
    #[arg(long)]
    height_limit: Option<usize>,

    /// Random seed for data generation and tree construction
    #[arg(long)]
    seed: Option<u64>,

    /// Clamp the sample size to the number of points instead of failing
    #[arg(long)]
    clamp: bool,

    /// Round the sample size down to a power of two
    #[arg(long)]
    power_of_two: bool,

    /// Build trees on the current thread only
    #[arg(long)]
    sequential: bool,
}

impl ForestArgs {
    /// Merge the configuration file and flags into a forest configuration for
    /// `population` points.
    ///
    /// Without an explicit `--sample-size`, the configured size is capped at
    /// the population.
    fn resolve(&self, population: usize) -> CliResult<ForestConfig> {
        let mut config = match &self.config {
            Some(path) => load_forest_config(path)?,
            None => ForestConfig::default(),
        };

        if let Some(trees) = self.trees {
            config.n_trees = trees;
        }
        config.sample_size = match self.sample_size {
            Some(size) => size,
            None => config.sample_size.min(population.max(1)),
        };
        if let Some(limit) = self.height_limit {
            config.height_limit = Some(limit);
        }
        if let Some(seed) = self.seed {
            config.seed = Some(seed);
        }
        if self.clamp {
            config.sample_policy = SamplePolicy::ClampToPopulation;
        }
        if self.power_of_two {
            config.round_to_power_of_two = true;
        }
        if self.sequential {
            config.parallel = false;
        }

        Ok(config)
    }

    fn data_rng(&self) -> ChaCha8Rng {
        match self.seed {
            Some(seed) => ChaCha8Rng::seed_from_u64(seed),
            None => ChaCha8Rng::from_entropy(),
        }
    }
}

/// Load a forest configuration from a JSON file
fn load_forest_config(path: &Path) -> CliResult<ForestConfig> {
    let file = File::open(path).map_err(|e| format!("Failed to open config: {}", e))?;
    serde_json::from_reader(BufReader::new(file))
        .map_err(|e| format!("Failed to parse config: {}", e))
}

/// Read points from CSV with a header row naming x, y and optionally z
fn read_csv_points<R: Read>(reader: R) -> CliResult<Vec<Point>> {
    let mut reader = csv::ReaderBuilder::new().trim(csv::Trim::All).from_reader(reader);
    let mut points = Vec::new();
    for (line, record) in reader.deserialize::<Point>().enumerate() {
        let point: Point =
            record.map_err(|e| format!("Failed to read record {}: {}", line + 1, e))?;
        points.push(point);
    }
    Ok(points)
}

/// Read points from a JSON array of {x, y, z} objects
fn read_json_points<R: Read>(reader: R) -> CliResult<Vec<Point>> {
    serde_json::from_reader(reader).map_err(|e| format!("Failed to parse JSON: {}", e))
}

/// Load points from file (auto-detect format)
fn load_points(path: &Path) -> CliResult<Vec<Point>> {
    let ext = path
        .extension()
        .and_then(|e| e.to_str())
        .unwrap_or("")
        .to_lowercase();
    let open = || {
        File::open(path)
            .map(BufReader::new)
            .map_err(|e| format!("Failed to open file: {}", e))
    };

    let points = match ext.as_str() {
        "csv" => read_csv_points(open()?)?,
        "json" => read_json_points(open()?)?,
        _ => {
            // Try CSV first, then JSON
            read_csv_points(open()?).or_else(|_| read_json_points(open()?))?
        }
    };

    if points.is_empty() {
        return Err("No points found in input".to_string());
    }
    Ok(points)
}

fn build_forest(points: &[Point], args: &ForestArgs) -> CliResult<IsolationForest<Point>> {
    let config = args.resolve(points.len())?;
    IsolationForest::builder(points, point_attributes())
        .config(config)
        .build()
        .map_err(|e| e.to_string())
}

fn print_forest_summary(forest: &IsolationForest<Point>, population: usize) {
    println!("Using {} points...", population);
    println!(
        "Built iForest [trees={}, sample_size={}, height_limit={}]",
        forest.n_trees(),
        forest.sample_size(),
        forest.height_limit()
    );
    tracing::debug!(usage = ?forest.attribute_usage(), "attribute usage");
}

/// Format one ranked row as `rank - (x, y, z) = score`
fn format_row(rank: usize, point: &Point, score: f64) -> String {
    format!(
        "{:3} - ({:.3}, {:.3}, {:.3}) = {:.3}",
        rank, point.x, point.y, point.z, score
    )
}

fn print_top(points: &[Point], result: &AnomalyResult, top: usize) {
    println!("{} highest anomaly scored values (possible outliers):", top.min(points.len()));
    println!("----------------------------------------");
    for (rank, (idx, score)) in result.top(top).into_iter().enumerate() {
        let flag = if result.is_anomaly[idx] { " *" } else { "" };
        println!("{}{}", format_row(rank + 1, &points[idx], score), flag);
    }
}

fn demo_points(
    dataset: Dataset,
    points: usize,
    normal: usize,
    outliers: usize,
    args: &ForestArgs,
) -> Vec<Point> {
    match dataset {
        Dataset::Cloud => {
            let mut values = datasets::standard_normal_cloud(&mut args.data_rng(), points);
            values.push(Point::new(10.0, 10.0, 10.0));
            values
        }
        Dataset::Clusters => datasets::two_clusters(&mut args.data_rng(), normal, outliers),
        Dataset::Grid => datasets::grid_with_outliers(),
        Dataset::Hbk => datasets::hbk(),
    }
}

/// Run demo command
fn run_demo(
    dataset: Dataset,
    points: usize,
    normal: usize,
    outliers: usize,
    top: usize,
    forest_args: ForestArgs,
) -> CliResult<()> {
    let values = demo_points(dataset, points, normal, outliers, &forest_args);
    tracing::info!(?dataset, points = values.len(), "generated dataset");

    let forest = build_forest(&values, &forest_args)?;
    print_forest_summary(&forest, values.len());

    let result = AnomalyResult::from_scores(forest.score_all(&values), DEFAULT_THRESHOLD);
    print_top(&values, &result, top);
    Ok(())
}

/// Run score command
fn run_score(
    input: PathBuf,
    threshold: f64,
    top: usize,
    output: Option<PathBuf>,
    forest_args: ForestArgs,
) -> CliResult<()> {
    if !(threshold > 0.0 && threshold <= 1.0) {
        return Err(format!("Threshold must be in (0, 1], got {}", threshold));
    }

    let points = load_points(&input)?;
    println!(
        "Loaded {} points from {:?}",
        points.len(),
        input.file_name().unwrap_or_default()
    );

    let forest = build_forest(&points, &forest_args)?;
    print_forest_summary(&forest, points.len());

    let result = AnomalyResult::from_scores(forest.score_all(&points), threshold);
    print_top(&points, &result, top);

    println!("\nThreshold: {}", threshold);
    println!("Anomalies found: {}", result.anomaly_count());

    if let Some(path) = output {
        let json = report_json(&points, &forest, &result);
        let mut file =
            File::create(&path).map_err(|e| format!("Failed to create output: {}", e))?;
        serde_json::to_writer_pretty(&mut file, &json)
            .map_err(|e| format!("Failed to write JSON: {}", e))?;
        println!("\nResults written to {:?}", path);
    }

    Ok(())
}

fn report_json(
    points: &[Point],
    forest: &IsolationForest<Point>,
    result: &AnomalyResult,
) -> serde_json::Value {
    let anomalies: Vec<serde_json::Value> = result
        .ranked()
        .into_iter()
        .filter(|&(idx, _)| result.is_anomaly[idx])
        .map(|(idx, score)| {
            serde_json::json!({
                "index": idx,
                "point": points[idx],
                "score": score
            })
        })
        .collect();

    serde_json::json!({
        "total_points": points.len(),
        "n_trees": forest.n_trees(),
        "sample_size": forest.sample_size(),
        "height_limit": forest.height_limit(),
        "attributes": forest.attributes().names(),
        "attribute_usage": forest.attribute_usage(),
        "threshold": result.threshold,
        "anomaly_count": anomalies.len(),
        "anomalies": anomalies,
        "scores": result.scores
    })
}

fn init_tracing(verbose: bool) {
    let default_filter = if verbose {
        "iforest=debug,anomaly_core=debug"
    } else {
        "iforest=info,anomaly_core=info"
    };
    tracing_subscriber::registry()
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| default_filter.into()),
        )
        .init();
}

fn main() {
    let cli = Cli::parse();
    init_tracing(cli.verbose);

    let result = match cli.command {
        Commands::Demo {
            dataset,
            points,
            normal,
            outliers,
            top,
            forest,
        } => run_demo(dataset, points, normal, outliers, top, forest),

        Commands::Score {
            input,
            threshold,
            top,
            output,
            forest,
        } => run_score(input, threshold, top, output, forest),
    };

    if let Err(e) = result {
        eprintln!("Error: {}", e);
        std::process::exit(1);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn seeded(seed: u64) -> ForestArgs {
        ForestArgs {
            seed: Some(seed),
            ..ForestArgs::default()
        }
    }

    fn top_indices(points: &[Point], args: &ForestArgs, n: usize) -> Vec<usize> {
        let forest = build_forest(points, args).unwrap();
        let result = AnomalyResult::from_scores(forest.score_all(points), DEFAULT_THRESHOLD);
        let mut top: Vec<usize> = result.top(n).into_iter().map(|(i, _)| i).collect();
        top.sort_unstable();
        top
    }

    #[test]
    fn test_cli_parses_demo() {
        let cli = Cli::try_parse_from([
            "iforest", "demo", "--dataset", "clusters", "--normal", "50", "--trees", "10",
            "--seed", "3", "--sequential",
        ])
        .unwrap();
        match cli.command {
            Commands::Demo {
                dataset,
                normal,
                points,
                top,
                forest,
                ..
            } => {
                assert_eq!(dataset, Dataset::Clusters);
                assert_eq!(normal, 50);
                assert_eq!(points, 200);
                assert_eq!(top, 20);
                assert_eq!(forest.trees, Some(10));
                assert_eq!(forest.seed, Some(3));
                assert!(forest.sequential);
                assert!(!forest.clamp);
            }
            Commands::Score { .. } => panic!("expected demo"),
        }
    }

    #[test]
    fn test_cli_parses_score() {
        let cli = Cli::try_parse_from([
            "iforest", "-v", "score", "-i", "points.csv", "-t", "0.7", "--clamp",
            "--power-of-two", "-o", "report.json",
        ])
        .unwrap();
        assert!(cli.verbose);
        match cli.command {
            Commands::Score {
                input,
                threshold,
                output,
                forest,
                ..
            } => {
                assert_eq!(input, PathBuf::from("points.csv"));
                assert_eq!(threshold, 0.7);
                assert_eq!(output, Some(PathBuf::from("report.json")));
                assert!(forest.clamp && forest.power_of_two);
            }
            Commands::Demo { .. } => panic!("expected score"),
        }
    }

    #[test]
    fn test_cli_rejects_unknown_dataset() {
        assert!(Cli::try_parse_from(["iforest", "demo", "--dataset", "spiral"]).is_err());
    }

    #[test]
    fn test_resolve_defaults() {
        let config = ForestArgs::default().resolve(201).unwrap();
        assert_eq!(config.n_trees, 100);
        assert_eq!(config.sample_size, 201);
        assert_eq!(config.sample_policy, SamplePolicy::Strict);
        assert!(config.parallel);

        let config = ForestArgs::default().resolve(10_000).unwrap();
        assert_eq!(config.sample_size, DEFAULT_SAMPLE_SIZE);
    }

    #[test]
    fn test_resolve_flags_override() {
        let args = ForestArgs {
            trees: Some(12),
            sample_size: Some(500),
            height_limit: Some(4),
            seed: Some(9),
            clamp: true,
            power_of_two: true,
            sequential: true,
            ..ForestArgs::default()
        };
        let config = args.resolve(100).unwrap();
        assert_eq!(config.n_trees, 12);
        assert_eq!(config.sample_size, 500);
        assert_eq!(config.height_limit, Some(4));
        assert_eq!(config.seed, Some(9));
        assert_eq!(config.sample_policy, SamplePolicy::ClampToPopulation);
        assert!(config.round_to_power_of_two);
        assert!(!config.parallel);
        assert_eq!(config.resolve_sample_size(100), Ok(64));
    }

    #[test]
    fn test_explicit_oversized_sample_fails_without_clamp() {
        let points = datasets::grid_with_outliers();
        let args = ForestArgs {
            sample_size: Some(64),
            ..seeded(1)
        };
        let err = build_forest(&points, &args).unwrap_err();
        assert!(err.contains("sample_size"), "{}", err);
    }

    #[test]
    fn test_config_file_with_flag_override() {
        let path = std::env::temp_dir().join(format!("iforest-config-{}.json", std::process::id()));
        std::fs::write(&path, r#"{"n_trees": 30, "sample_size": 128, "seed": 5}"#).unwrap();

        let args = ForestArgs {
            config: Some(path.clone()),
            trees: Some(40),
            ..ForestArgs::default()
        };
        let config = args.resolve(1_000).unwrap();
        std::fs::remove_file(&path).unwrap();

        assert_eq!(config.n_trees, 40);
        assert_eq!(config.sample_size, 128);
        assert_eq!(config.seed, Some(5));
    }

    #[test]
    fn test_missing_config_file() {
        let args = ForestArgs {
            config: Some(PathBuf::from("/nonexistent/iforest.json")),
            ..ForestArgs::default()
        };
        assert!(args.resolve(10).unwrap_err().starts_with("Failed to open config"));
    }

    #[test]
    fn test_read_csv_points() {
        let csv = "x, y, z\n1.0, 2.0, 3.0\n-0.5, 0.25, 0\n";
        let points = read_csv_points(csv.as_bytes()).unwrap();
        assert_eq!(
            points,
            vec![Point::new(1.0, 2.0, 3.0), Point::new(-0.5, 0.25, 0.0)]
        );
    }

    #[test]
    fn test_read_csv_rejects_bad_number() {
        let csv = "x,y,z\n1.0,abc,3.0\n";
        let err = read_csv_points(csv.as_bytes()).unwrap_err();
        assert!(err.starts_with("Failed to read record 1"), "{}", err);
    }

    #[test]
    fn test_read_json_points() {
        let json = r#"[{"x": 1, "y": 2, "z": 3}, {"x": 0.5, "y": -1}]"#;
        let points = read_json_points(json.as_bytes()).unwrap();
        assert_eq!(
            points,
            vec![Point::new(1.0, 2.0, 3.0), Point::new(0.5, -1.0, 0.0)]
        );
        assert!(read_json_points("{}".as_bytes()).is_err());
    }

    #[test]
    fn test_format_row() {
        assert_eq!(
            format_row(1, &Point::new(10.0, 10.0, 10.0), 0.81234),
            "  1 - (10.000, 10.000, 10.000) = 0.812"
        );
    }

    #[test]
    fn test_cloud_demo_ranks_far_point_first() {
        let args = seeded(42);
        let points = demo_points(Dataset::Cloud, 200, 0, 0, &args);
        assert_eq!(points.len(), 201);
        assert_eq!(top_indices(&points, &args, 1), vec![200]);
    }

    #[test]
    fn test_grid_demo_ranks_scattered_points_first() {
        let args = seeded(7);
        let points = demo_points(Dataset::Grid, 0, 0, 0, &args);
        assert_eq!(top_indices(&points, &args, 5), vec![15, 16, 17, 18, 19]);
    }

    #[test]
    fn test_hbk_planted_outliers_score_higher_on_average() {
        let args = seeded(11);
        let points = demo_points(Dataset::Hbk, 0, 0, 0, &args);
        let forest = build_forest(&points, &args).unwrap();
        let scores = forest.score_all(&points);

        let mean = |s: &[f64]| s.iter().sum::<f64>() / s.len() as f64;
        assert!(mean(&scores[..14]) > mean(&scores[14..]));
    }

    #[test]
    fn test_report_json() {
        let args = seeded(3);
        let points = datasets::grid_with_outliers();
        let forest = build_forest(&points, &args).unwrap();
        let result = AnomalyResult::from_scores(forest.score_all(&points), 0.6);
        let report = report_json(&points, &forest, &result);

        assert_eq!(report["total_points"], 20);
        assert_eq!(report["sample_size"], 20);
        assert_eq!(report["attributes"][3], "norm");
        assert_eq!(report["scores"].as_array().map(|s| s.len()), Some(20));
        assert_eq!(report["anomaly_count"], result.anomaly_count());

        let anomalies = report["anomalies"].as_array().unwrap();
        if anomalies.len() >= 2 {
            let first = anomalies[0]["score"].as_f64().unwrap();
            let second = anomalies[1]["score"].as_f64().unwrap();
            assert!(first >= second);
        }
    }
}
