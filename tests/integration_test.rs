// tests/integration_test.rs
use approx::assert_relative_eq;
use lsm_american::analytics::bs_analytic;
use lsm_american::mc::lsm_engine::{american_put_lsm, price_american_lsm, Diagnostics, LsmConfig};
use lsm_american::mc::payoffs::Payoff;
use lsm_american::PricingError;

fn canonical() -> LsmConfig {
    LsmConfig {
        paths: 100_000,
        steps: 50,
        s0: 100.0,
        r: 0.05,
        sigma: 0.2,
        t: 1.0,
        basis_degree: 2,
        seed: Some(42),
        payoff: Payoff::Put { k: 100.0 },
        ..Default::default()
    }
}

#[test]
fn test_canonical_put_above_european_and_near_reference() {
    let res = price_american_lsm(&canonical()).expect("Valid configuration");
    let european = bs_analytic::bs_put_price(100.0, 100.0, 0.05, 0.2, 1.0);

    println!("\nLSM American put: {:.4} ± {:.4}", res.price, res.std_error);
    println!("BS European put: {:.4}", european);

    assert!(res.price > european, "American {} <= European {}", res.price, european);
    assert!(
        (res.price - 6.08).abs() < 0.15,
        "price {} outside reference band",
        res.price
    );
    assert!(res.std_error > 0.0 && res.std_error < 0.05);
}

#[test]
fn test_same_seed_is_bit_identical() {
    let cfg = LsmConfig {
        paths: 20_000,
        diagnostics: Diagnostics::BOUNDARY,
        ..canonical()
    };
    let a = price_american_lsm(&cfg).unwrap();
    let b = price_american_lsm(&cfg).unwrap();
    assert_eq!(a.price, b.price);
    assert_eq!(a.boundary, b.boundary);

    let sequential = price_american_lsm(&LsmConfig { parallel: false, ..cfg.clone() }).unwrap();
    assert_eq!(a.price, sequential.price);
    assert_eq!(a.boundary, sequential.boundary);

    let other_seed = price_american_lsm(&LsmConfig { seed: Some(43), ..cfg }).unwrap();
    assert_ne!(a.price, other_seed.price);
}

#[test]
fn test_basis_degree_changes_price() {
    let cfg = LsmConfig { paths: 20_000, ..canonical() };
    let linear = price_american_lsm(&LsmConfig { basis_degree: 1, ..cfg.clone() }).unwrap();
    let cubic = price_american_lsm(&LsmConfig { basis_degree: 3, ..cfg }).unwrap();
    println!("\nDegree 1: {:.4}, degree 3: {:.4}", linear.price, cubic.price);
    assert_ne!(linear.price, cubic.price);
}

#[test]
fn test_split_price_not_above_in_sample_price() {
    let cfg = LsmConfig { paths: 50_000, ..canonical() };
    let naive = price_american_lsm(&cfg).unwrap();
    let split = price_american_lsm(&LsmConfig { split_paths: true, ..cfg }).unwrap();

    let summary = split.split.as_ref().expect("split summary");
    println!(
        "\nNaive: {:.4}, split: {:.4}, split evaluation only: {:.4}",
        naive.price, split.price, summary.evaluation_price
    );
    assert!(split.price <= naive.price);
    assert_eq!(summary.training_paths, 35_000);
    assert_eq!(summary.evaluation_paths, 15_000);
    assert!(summary.evaluation_price > split.price);
}

#[test]
fn test_zero_volatility_put_exercises_at_first_date() {
    let (k, r, steps) = (110.0, 0.05, 50);
    let dt = 1.0 / steps as f64;
    let res = price_american_lsm(&LsmConfig {
        paths: 1_000,
        steps,
        sigma: 0.0,
        r,
        payoff: Payoff::Put { k },
        seed: Some(1),
        diagnostics: Diagnostics::BOUNDARY,
        ..Default::default()
    })
    .unwrap();

    assert_relative_eq!(res.price, k * (-r * dt).exp() - 100.0, epsilon = 1e-9);
    assert_relative_eq!(res.std_error, 0.0, epsilon = 1e-9);
    let boundary = res.boundary.unwrap();
    assert!(boundary.levels()[0].is_some());
}

#[test]
fn test_zero_volatility_call_is_never_exercised_early() {
    let res = price_american_lsm(&LsmConfig {
        paths: 1_000,
        steps: 50,
        sigma: 0.0,
        payoff: Payoff::Call { k: 100.0 },
        seed: Some(1),
        diagnostics: Diagnostics::BOUNDARY,
        ..Default::default()
    })
    .unwrap();

    assert_relative_eq!(res.price, 100.0 - 100.0 * (-0.05_f64).exp(), epsilon = 1e-9);
    assert!(res.boundary.unwrap().no_exercise_observed());
}

#[test]
fn test_call_close_to_european_value() {
    let res = price_american_lsm(&LsmConfig {
        paths: 50_000,
        payoff: Payoff::Call { k: 100.0 },
        ..canonical()
    })
    .unwrap();
    let european = bs_analytic::bs_call_price(100.0, 100.0, 0.05, 0.2, 1.0);
    println!("\nLSM American call: {:.4}, BS call: {:.4}", res.price, european);
    assert!((res.price - european).abs() < 0.3);
}

#[test]
fn test_invalid_parameters_are_reported() {
    let err = price_american_lsm(&LsmConfig { sigma: -0.2, ..canonical() }).unwrap_err();
    assert!(matches!(err, PricingError::InvalidParameters { ref parameter, .. } if parameter == "sigma"));

    let err = price_american_lsm(&LsmConfig { paths: 0, ..canonical() }).unwrap_err();
    assert!(matches!(err, PricingError::InvalidConfiguration { .. }));

    let err = price_american_lsm(&LsmConfig { basis_degree: 0, ..canonical() }).unwrap_err();
    assert!(err.to_string().contains("basis_degree"));

    assert!(american_put_lsm(100.0, -5.0, 0.05, 0.2, 1.0, 1_000, 10, 2, Some(1)).is_err());
}

#[test]
fn test_unseeded_runs_report_their_seed() {
    let cfg = LsmConfig { paths: 5_000, steps: 10, seed: None, ..canonical() };
    let first = price_american_lsm(&cfg).unwrap();
    let seed = first.seed.expect("seed echoed");
    let replay = price_american_lsm(&LsmConfig { seed: Some(seed), ..cfg }).unwrap();
    assert_eq!(first.price, replay.price);
}

#[test]
fn test_convenience_function_matches_engine() {
    let price = american_put_lsm(100.0, 100.0, 0.05, 0.2, 1.0, 10_000, 25, 2, Some(42)).unwrap();
    let res = price_american_lsm(&LsmConfig { paths: 10_000, steps: 25, ..canonical() }).unwrap();
    assert_eq!(price, res.price);
}
