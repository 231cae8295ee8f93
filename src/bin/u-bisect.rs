//! Command-line front end: reads an adjacency matrix, anneals a bisection,
//! and optionally prints the groups and a chart of the cost trace.

use std::fmt::Write as _;
use std::fs;
use std::path::PathBuf;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::time::Duration;

use anyhow::{Context, Result};
use clap::Parser;
use rand::rngs::StdRng;
use rand::SeedableRng;
use u_bisect::bisect::{AnnealConfig, AnnealResult, AnnealRunner, Progress, TrialCount};
use u_bisect::Graph;

const PLOT_TITLE: &str = "Change in Cost of Solution Over Time";
const PLOT_WIDTH: usize = 72;
const PLOT_HEIGHT: usize = 16;

#[derive(Parser, Debug)]
#[command(name = "u-bisect", version, about = "Split a graph into two groups with minimal connections")]
struct Args {
    /// Adjacency matrix file: one row per line, whitespace or comma separated.
    matrix: PathBuf,

    /// Random seed for a reproducible run.
    #[arg(long)]
    seed: Option<u64>,

    /// Geometric cooling factor in (0, 1] [default: 0.92].
    #[arg(long)]
    cooling_rate: Option<f64>,

    /// Penalty per node of group-size difference [default: 5].
    #[arg(long)]
    penalty: Option<f64>,

    /// Starting temperature multiplier over the mean trial delta [default: 2].
    #[arg(long)]
    multiplier: Option<f64>,

    /// Fixed starting temperature; 0 runs plain hill climbing.
    #[arg(long)]
    temperature: Option<f64>,

    /// Estimate the temperature from ⌈N/2⌉ trial swaps instead of ⌊N²/2⌋.
    #[arg(long)]
    quick_estimate: bool,

    /// Proposals per temperature level, as a multiple of N [default: 5].
    #[arg(long)]
    inner_multiplier: Option<usize>,

    /// Maximum number of proposals (0 = unlimited).
    #[arg(long, default_value_t = 0)]
    max_iterations: usize,

    /// Wall-clock limit in seconds.
    #[arg(long)]
    time_limit: Option<f64>,

    /// Print both groups (1-based node numbers) after the run.
    #[arg(long)]
    print_groups: bool,

    /// Draw the cost trace as a text chart after the run.
    #[arg(long)]
    plot: bool,

    /// Print a progress line for every accepted move.
    #[arg(short, long)]
    verbose: bool,
}

impl Args {
    fn config(&self) -> Result<AnnealConfig> {
        let mut config = AnnealConfig::default().with_max_iterations(self.max_iterations);
        if let Some(rate) = self.cooling_rate {
            config = config.with_cooling_rate(rate);
        }
        if let Some(penalty) = self.penalty {
            config = config.with_uneven_penalty(penalty);
        }
        if let Some(multiplier) = self.multiplier {
            config = config.with_temperature_multiplier(multiplier);
        }
        if let Some(multiplier) = self.inner_multiplier {
            config = config.with_inner_loop_multiplier(multiplier);
        }
        if self.quick_estimate {
            config = config.with_trial_count(TrialCount::GroupSize);
        }
        if let Some(t) = self.temperature {
            config = config.with_initial_temperature(t);
        }
        if let Some(secs) = self.time_limit {
            let limit = Duration::try_from_secs_f64(secs)
                .with_context(|| format!("invalid time limit: {secs}"))?;
            config = config.with_time_limit(limit);
        }
        if let Some(seed) = self.seed {
            config = config.with_seed(seed);
        }
        config.validate()?;
        Ok(config)
    }
}

fn main() -> Result<()> {
    env_logger::init();
    let args = Args::parse();

    let text = fs::read_to_string(&args.matrix)
        .with_context(|| format!("failed to read {}", args.matrix.display()))?;
    let graph: Graph = text
        .parse()
        .with_context(|| format!("failed to load matrix from {}", args.matrix.display()))?;
    let config = args.config()?;

    let interrupted = Arc::new(AtomicBool::new(false));
    let flag = Arc::clone(&interrupted);
    ctrlc::set_handler(move || flag.store(true, Ordering::Relaxed))
        .context("failed to install the Ctrl-C handler")?;

    println!("Using simulated annealing to split matrix into two groups with minimal connections.");
    println!("Press CTRL-C at any point to stop.\n");

    let mut rng = StdRng::seed_from_u64(config.seed.unwrap_or_else(rand::random::<u64>));
    let verbose = args.verbose;
    let mut report = |p: &Progress| {
        if verbose {
            println!("Iteration {}", p.iteration);
            println!(
                "Cost due to unevenness: {}\nConnection cost: {}\n",
                p.uneven_cost, p.connection_cost
            );
        }
    };
    let result =
        AnnealRunner::run_with(&graph, &config, &mut rng, &mut report, Some(interrupted.as_ref()))?;

    print!("{}", summary(&result, args.print_groups, args.plot));
    Ok(())
}

/// Final report: run statistics, best costs, and the optional groups and chart.
fn summary(result: &AnnealResult, print_groups: bool, plot: bool) -> String {
    let mut out = String::new();
    let _ = writeln!(
        out,
        "> Finished running after {} iterations ({}).",
        result.iterations, result.stop_reason
    );
    let _ = writeln!(out, "> Finished in {:.5} seconds\n", result.elapsed.as_secs_f64());
    let _ = writeln!(out, "Cost due to unevenness: {}", result.best.cost.uneven_cost);
    let _ = writeln!(out, "Connection cost: {}\n", result.best.cost.connection_cost);

    if print_groups {
        let (a, b) = result.best.partition.to_one_based();
        let _ = writeln!(out, "Group A: {a:?}");
        let _ = writeln!(out, "Group B: {b:?}\n");
    }
    if plot {
        out.push_str(&render_chart(&result.cost_trace, PLOT_WIDTH, PLOT_HEIGHT));
    }
    out
}

/// Renders `trace` as a text line chart: x = solution number, y = cost.
fn render_chart(trace: &[f64], width: usize, height: usize) -> String {
    let mut out = format!("{PLOT_TITLE}\n");
    if trace.is_empty() {
        out.push_str("(no accepted solutions)\n");
        return out;
    }

    let (lo, hi) = trace
        .iter()
        .fold((f64::INFINITY, f64::NEG_INFINITY), |(lo, hi), &c| {
            (lo.min(c), hi.max(c))
        });
    let span = if hi > lo { hi - lo } else { 1.0 };
    let columns = width.min(trace.len()).max(1);

    let mut grid = vec![vec![' '; columns]; height];
    for (col, chunk) in trace.chunks(trace.len().div_ceil(columns)).enumerate() {
        let mean = chunk.iter().sum::<f64>() / chunk.len() as f64;
        let level = ((mean - lo) / span * (height - 1) as f64).round() as usize;
        grid[height - 1 - level.min(height - 1)][col] = '*';
    }

    let label_width = format!("{hi:.1}").len().max(format!("{lo:.1}").len());
    for (row, cells) in grid.iter().enumerate() {
        let label = match row {
            0 => format!("{hi:.1}"),
            r if r == height - 1 => format!("{lo:.1}"),
            _ => String::new(),
        };
        let line: String = cells.iter().collect();
        out.push_str(&format!("{label:>label_width$} |{line}\n"));
    }
    out.push_str(&format!(
        "{:>label_width$} +{}\n{:>label_width$}  Solution number (1..{})\n",
        "",
        "-".repeat(columns),
        "",
        trace.len()
    ));
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    fn args(extra: &[&str]) -> Args {
        let mut argv = vec!["u-bisect", "matrix.txt"];
        argv.extend_from_slice(extra);
        Args::try_parse_from(argv).unwrap()
    }

    #[test]
    fn test_unset_flags_keep_library_defaults() {
        let config = args(&[]).config().unwrap();
        let defaults = AnnealConfig::default();
        assert_eq!(config.cooling_rate, defaults.cooling_rate);
        assert_eq!(config.uneven_penalty, defaults.uneven_penalty);
        assert_eq!(config.temperature_multiplier, defaults.temperature_multiplier);
        assert_eq!(config.inner_loop_multiplier, defaults.inner_loop_multiplier);
    }

    #[test]
    fn test_flags_override_defaults() {
        let config = args(&["--cooling-rate", "0.5", "--penalty", "1", "--inner-multiplier", "2"])
            .config()
            .unwrap();
        assert_eq!(config.cooling_rate, 0.5);
        assert_eq!(config.uneven_penalty, 1.0);
        assert_eq!(config.inner_loop_multiplier, 2);
        assert!(args(&["--cooling-rate", "2"]).config().is_err());
    }

    #[test]
    fn test_interrupted_run_still_reports_best() {
        let graph: Graph = "0 1 1 1\n1 0 1 1\n1 1 0 1\n1 1 1 0".parse().unwrap();
        let interrupted = AtomicBool::new(true);
        let mut rng = StdRng::seed_from_u64(5);
        let result = AnnealRunner::run_with(
            &graph,
            &AnnealConfig::default(),
            &mut rng,
            &mut (),
            Some(&interrupted),
        )
        .unwrap();

        let text = summary(&result, true, true);
        assert!(text.contains("(cancelled)"));
        assert!(text.contains("Group A: "));
        assert!(text.contains("Group B: "));
        assert!(text.contains(PLOT_TITLE));
    }

    #[test]
    fn test_chart_empty_trace() {
        let chart = render_chart(&[], 10, 4);
        assert!(chart.starts_with(PLOT_TITLE));
        assert!(chart.contains("no accepted"));
    }

    #[test]
    fn test_chart_marks_extremes() {
        let chart = render_chart(&[8.0, 6.0, 4.0, 2.0], 10, 4);
        let rows: Vec<&str> = chart.lines().collect();
        assert!(rows[1].starts_with("8.0 |*"));
        assert!(rows[4].starts_with("2.0 |   *"));
        assert!(chart.contains("Solution number (1..4)"));
    }
}
