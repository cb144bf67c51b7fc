// tests/boundary_test.rs
use approx::assert_relative_eq;
use lsm_american::mc::lsm_engine::{price_american_lsm, Diagnostics, LsmConfig};
use lsm_american::mc::payoffs::Payoff;
use lsm_american::output;
use std::fs;

fn put_config(steps: usize) -> LsmConfig {
    LsmConfig {
        paths: 50_000,
        steps,
        seed: Some(42),
        payoff: Payoff::Put { k: 100.0 },
        diagnostics: Diagnostics::BOUNDARY | Diagnostics::STEP_STATS,
        ..Default::default()
    }
}

#[test]
fn test_boundary_length_and_order() {
    for &steps in &[2, 10, 50] {
        let res = price_american_lsm(&put_config(steps)).unwrap();
        let boundary = res.boundary.expect("boundary requested");
        assert_eq!(boundary.len(), steps - 1);

        let dt = 1.0 / steps as f64;
        for (i, &t) in boundary.times().iter().enumerate() {
            assert_relative_eq!(t, (i + 1) as f64 * dt, epsilon = 1e-12);
        }
        assert!(boundary.times().windows(2).all(|w| w[0] < w[1]));
    }
}

#[test]
fn test_put_boundary_below_strike_and_rising_toward_maturity() {
    let res = price_american_lsm(&put_config(50)).unwrap();
    let boundary = res.boundary.unwrap();
    let defined = boundary.defined();
    assert!(defined.len() > 30, "only {} dates with exercise", defined.len());
    assert!(defined.iter().all(|&(_, s)| s < 100.0));

    let early: Vec<f64> = defined.iter().take(10).map(|&(_, s)| s).collect();
    let late: Vec<f64> = defined.iter().rev().take(10).map(|&(_, s)| s).collect();
    let early_mean = early.iter().sum::<f64>() / early.len() as f64;
    let late_mean = late.iter().sum::<f64>() / late.len() as f64;
    println!("\nEarly boundary mean {:.3}, late boundary mean {:.3}", early_mean, late_mean);
    assert!(late_mean > early_mean);
}

#[test]
fn test_step_stats_track_fit_and_exercise_counts() {
    let res = price_american_lsm(&put_config(20)).unwrap();
    let stats = res.step_stats.unwrap();
    assert_eq!(stats.len(), 19);
    for (i, s) in stats.iter().enumerate() {
        assert_eq!(s.step, i + 1);
        assert_eq!(s.fit_paths, s.itm_paths);
        assert!(s.exercised_paths <= s.itm_paths);
    }

    let split = price_american_lsm(&LsmConfig { split_paths: true, ..put_config(20) }).unwrap();
    for s in split.step_stats.unwrap() {
        assert!(s.fit_paths < s.itm_paths || s.itm_paths == 0);
    }
}

#[test]
fn test_boundary_csv_has_one_row_per_date() {
    let res = price_american_lsm(&LsmConfig { paths: 5_000, ..put_config(12) }).unwrap();
    let boundary = res.boundary.unwrap();

    let file = std::env::temp_dir().join("lsm_american_boundary_test.csv");
    output::write_boundary_to_csv(&file, &boundary).unwrap();
    let content = fs::read_to_string(&file).unwrap();
    let _ = fs::remove_file(&file);

    let lines: Vec<&str> = content.lines().collect();
    assert_eq!(lines[0], "step,time,boundary");
    assert_eq!(lines.len(), 12);
    assert!(lines[1].starts_with("1,"));
}
