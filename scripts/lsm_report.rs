// scripts/lsm_report.rs
use lsm_american::analytics::binomial::{crr_price, ExerciseStyle};
use lsm_american::analytics::bs_analytic;
use lsm_american::math_utils::Timer;
use lsm_american::mc::lsm_engine::{price_american_lsm, Diagnostics, LsmConfig, LsmResult};
use lsm_american::mc::payoffs::Payoff;
use lsm_american::output;
use std::env;
use std::error::Error;
use std::path::PathBuf;
use tracing::info;
use tracing_subscriber::EnvFilter;

const DEFAULT_PATHS: usize = 100_000;
const DEFAULT_STEPS: usize = 50;
const DEFAULT_SEED: u64 = 42;
const STRIKE: f64 = 100.0;

#[derive(Debug)]
struct SystemInfo {
    os: String,
    cpu_model: String,
    cpu_cores: usize,
    rustc_flags: String,
    rayon_threads: usize,
}

impl SystemInfo {
    fn gather() -> Self {
        Self {
            os: env::consts::OS.to_string(),
            cpu_model: Self::get_cpu_model(),
            cpu_cores: num_cpus::get(),
            rustc_flags: env::var("RUSTFLAGS").unwrap_or_else(|_| "default".to_string()),
            rayon_threads: rayon::current_num_threads(),
        }
    }

    fn get_cpu_model() -> String {
        #[cfg(target_os = "linux")]
        {
            std::fs::read_to_string("/proc/cpuinfo")
                .ok()
                .and_then(|content| {
                    content
                        .lines()
                        .find(|line| line.starts_with("model name"))
                        .and_then(|line| line.split(':').nth(1))
                        .map(|s| s.trim().to_string())
                })
                .unwrap_or_else(|| "Unknown CPU".to_string())
        }

        #[cfg(not(target_os = "linux"))]
        {
            "Unknown CPU".to_string()
        }
    }
}

struct ReportArgs {
    paths: usize,
    steps: usize,
    seed: u64,
    out_dir: PathBuf,
}

impl ReportArgs {
    fn parse() -> Result<Self, Box<dyn Error>> {
        let args: Vec<String> = env::args().skip(1).collect();
        let paths = match args.first() {
            Some(a) => a.parse()?,
            None => DEFAULT_PATHS,
        };
        let steps = match args.get(1) {
            Some(a) => a.parse()?,
            None => DEFAULT_STEPS,
        };
        let seed = match args.get(2) {
            Some(a) => a.parse()?,
            None => DEFAULT_SEED,
        };
        let out_dir = env::var("LSM_REPORT_DIR")
            .map(PathBuf::from)
            .unwrap_or_else(|_| PathBuf::from("."));
        Ok(ReportArgs {
            paths,
            steps,
            seed,
            out_dir,
        })
    }

    fn base_config(&self) -> LsmConfig {
        LsmConfig {
            paths: self.paths,
            steps: self.steps,
            seed: Some(self.seed),
            payoff: Payoff::Put { k: STRIKE },
            ..Default::default()
        }
    }
}

fn timed(cfg: &LsmConfig) -> Result<(LsmResult, f64), Box<dyn Error>> {
    let timer = Timer::new();
    let res = price_american_lsm(cfg)?;
    Ok((res, timer.elapsed_ms()))
}

fn convergence_in_paths(args: &ReportArgs) -> Result<Vec<Vec<String>>, Box<dyn Error>> {
    println!("\nConvergence in paths (seed {})", args.seed);
    println!("{:>10} {:>10} {:>10} {:>12}", "Paths", "Price", "StdErr", "Time (ms)");
    let mut rows = Vec::new();
    for &paths in &[5_000, 10_000, 20_000, 50_000, 100_000] {
        let (res, ms) = timed(&LsmConfig { paths, ..args.base_config() })?;
        println!("{:>10} {:>10.4} {:>10.4} {:>12.1}", paths, res.price, res.std_error, ms);
        rows.push(vec![
            paths.to_string(),
            format!("{:.6}", res.price),
            format!("{:.6}", res.std_error),
            format!("{:.2}", ms),
        ]);
    }
    Ok(rows)
}

fn basis_comparison(args: &ReportArgs) -> Result<Vec<Vec<String>>, Box<dyn Error>> {
    println!("\nRegression basis comparison");
    let mut rows = Vec::new();
    for (name, degree) in [("linear", 1), ("quadratic", 2), ("cubic", 3)] {
        let (res, _) = timed(&LsmConfig {
            basis_degree: degree,
            ..args.base_config()
        })?;
        println!("  {:<10} (degree {}): {:.4}", name, degree, res.price);
        rows.push(vec![name.to_string(), degree.to_string(), format!("{:.6}", res.price)]);
    }
    Ok(rows)
}

fn overfitting_diagnostics(args: &ReportArgs) -> Result<Vec<Vec<String>>, Box<dyn Error>> {
    println!("\nOverfitting diagnostics (in-sample vs path-split)");
    println!("{:>7} {:>10} {:>10} {:>12}", "Degree", "Naive", "Split", "Split eval");
    let mut rows = Vec::new();
    for degree in 1..=5 {
        let naive = price_american_lsm(&LsmConfig {
            basis_degree: degree,
            ..args.base_config()
        })?;
        let split = price_american_lsm(&LsmConfig {
            basis_degree: degree,
            split_paths: true,
            ..args.base_config()
        })?;
        let evaluation_price = split
            .split
            .as_ref()
            .map(|s| s.evaluation_price)
            .unwrap_or(f64::NAN);
        println!(
            "{:>7} {:>10.4} {:>10.4} {:>12.4}",
            degree, naive.price, split.price, evaluation_price
        );
        rows.push(vec![
            degree.to_string(),
            format!("{:.6}", naive.price),
            format!("{:.6}", split.price),
            format!("{:.6}", evaluation_price),
        ]);
    }
    Ok(rows)
}

fn early_exercise_premium(args: &ReportArgs) -> Result<Vec<Vec<String>>, Box<dyn Error>> {
    println!("\nEarly-exercise premium across spots");
    println!("{:>8} {:>10} {:>10} {:>10}", "S0", "American", "European", "Premium");
    let base = args.base_config();
    let mut rows = Vec::new();
    for i in 0..15 {
        let s0 = 60.0 + i as f64 * 80.0 / 14.0;
        let american = price_american_lsm(&LsmConfig { s0, ..base.clone() })?.price;
        let european = bs_analytic::bs_price(&base.payoff, s0, base.r, base.sigma, base.t);
        let premium = american - european;
        println!("{:>8.2} {:>10.4} {:>10.4} {:>10.4}", s0, american, european, premium);
        rows.push(vec![
            format!("{:.4}", s0),
            format!("{:.6}", american),
            format!("{:.6}", european),
            format!("{:.6}", premium),
        ]);
    }
    Ok(rows)
}

fn lsm_vs_binomial(args: &ReportArgs) -> Result<Vec<Vec<String>>, Box<dyn Error>> {
    let base = args.base_config();
    let lsm = price_american_lsm(&base)?;
    println!("\nLSM vs binomial");
    println!("  LSM ({} paths): {:.4} ± {:.4}", base.paths, lsm.price, lsm.std_error);
    let mut rows = vec![vec![
        "lsm".to_string(),
        base.paths.to_string(),
        format!("{:.6}", lsm.price),
    ]];
    for &n in &[50, 100, 200, 400] {
        let tree = crr_price(&base.payoff, base.s0, base.r, base.sigma, base.t, n, ExerciseStyle::American)?;
        println!("  Binomial steps={:<4} {:.4}", n, tree);
        rows.push(vec!["binomial".to_string(), n.to_string(), format!("{:.6}", tree)]);
    }
    Ok(rows)
}

fn main() -> Result<(), Box<dyn Error>> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .init();

    let args = ReportArgs::parse()?;
    std::fs::create_dir_all(&args.out_dir)?;

    println!("lsm-american Experiment Report");
    println!("==============================\n");

    let system_info = SystemInfo::gather();
    println!("System Information:");
    println!("  OS: {}", system_info.os);
    println!("  CPU: {}", system_info.cpu_model);
    println!("  CPU Cores: {}", system_info.cpu_cores);
    println!("  RUSTFLAGS: {}", system_info.rustc_flags);
    println!("  Rayon Threads: {}", system_info.rayon_threads);
    println!(
        "  Paths: {}  Steps: {}  Seed: {}",
        args.paths, args.steps, args.seed
    );

    let timestamp = chrono::Utc::now().format("%Y%m%d_%H%M%S");
    let csv = |name: &str| args.out_dir.join(format!("{}_{}.csv", name, timestamp));

    let rows = convergence_in_paths(&args)?;
    output::write_table_to_csv(csv("convergence"), &["paths", "price", "std_error", "time_ms"], &rows)?;

    let rows = basis_comparison(&args)?;
    output::write_table_to_csv(csv("basis_comparison"), &["basis", "degree", "price"], &rows)?;

    let rows = overfitting_diagnostics(&args)?;
    output::write_table_to_csv(
        csv("overfitting"),
        &["degree", "naive_price", "split_price", "split_evaluation_price"],
        &rows,
    )?;

    let rows = early_exercise_premium(&args)?;
    output::write_table_to_csv(
        csv("early_exercise_premium"),
        &["s0", "american", "european", "premium"],
        &rows,
    )?;

    let rows = lsm_vs_binomial(&args)?;
    output::write_table_to_csv(csv("lsm_vs_binomial"), &["method", "size", "price"], &rows)?;

    let (res, ms) = timed(&LsmConfig {
        diagnostics: Diagnostics::BOUNDARY,
        ..args.base_config()
    })?;
    println!("\nExercise boundary (American put {:.4})", res.price);
    if let Some(boundary) = &res.boundary {
        for (t, level) in boundary.times().iter().zip(boundary.levels()) {
            match level {
                Some(s) => println!("  t={:.3}  S*={:.4}", t, s),
                None => println!("  t={:.3}  S*=-", t),
            }
        }
        output::write_boundary_to_csv(csv("exercise_boundary"), boundary)?;
    }

    output::write_summary_to_csv(
        csv("summary"),
        &[
            ("timestamp", chrono::Utc::now().format("%Y-%m-%d %H:%M:%S UTC").to_string()),
            ("os", system_info.os.clone()),
            ("cpu", system_info.cpu_model.clone()),
            ("rayon_threads", system_info.rayon_threads.to_string()),
            ("paths", args.paths.to_string()),
            ("steps", args.steps.to_string()),
            ("seed", args.seed.to_string()),
            ("american_put", format!("{:.6}", res.price)),
            ("std_error", format!("{:.6}", res.std_error)),
            ("time_ms", format!("{:.2}", ms)),
        ],
    )?;

    info!(dir = %args.out_dir.display(), "report written");
    Ok(())
}
