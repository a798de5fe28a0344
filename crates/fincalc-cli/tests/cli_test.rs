use clap::Parser;
use fincalc_cli::{Cli, FincalcConfig};
use std::fs;
use std::path::PathBuf;

const EXPERIMENTAL_PLAN: &str = r#"{
    "interpretation": "Tasa efectiva para 62 días a partir de una nominal trimestral",
    "initial_data": {"j": 0.1903},
    "final_target_variable": "tasa",
    "calculation_steps": [
        {
            "step_name": "Tasa del periodo",
            "target_variable": "tasa",
            "formula_name": "formula_experimental",
            "inputs": {"j": "{{j}}", "dias": 62},
            "generated_formula": "(1 + j / 4)^(dias / 90) - 1"
        }
    ]
}"#;

fn write_plan(name: &str) -> PathBuf {
    let path = std::env::temp_dir().join(format!("fincalc-{name}-{}.json", std::process::id()));
    fs::write(&path, EXPERIMENTAL_PLAN).unwrap();
    path
}

fn run(path: &PathBuf, extra: &[&str], config: &FincalcConfig) -> anyhow::Result<String> {
    let path_arg = path.to_string_lossy().to_string();
    let mut args = vec!["fincalc", "run", path_arg.as_str()];
    args.extend_from_slice(extra);
    Cli::try_parse_from(args)?.execute(config)
}

#[test]
fn test_run_experimental_plan_as_json() {
    let path = write_plan("experimental");
    let output = run(&path, &["--format", "json"], &FincalcConfig::default());
    fs::remove_file(&path).unwrap();

    let report: serde_json::Value = serde_json::from_str(&output.unwrap()).unwrap();
    let expected = (1.0_f64 + 0.1903 / 4.0).powf(62.0 / 90.0) - 1.0;
    assert!((report["final_result"].as_f64().unwrap() - expected).abs() < 1e-12);
    assert_eq!(report["steps"][0]["generated_formula"], "(1 + j / 4)^(dias / 90) - 1");
}

#[test]
fn test_configured_expression_limit_is_enforced() {
    let path = write_plan("limited");
    let config = FincalcConfig::default().apply_overrides(|key| {
        (key == "FINCALC_MAX_EXPRESSION_LENGTH").then(|| "10".to_string())
    });
    let result = run(&path, &[], &config);
    fs::remove_file(&path).unwrap();

    let message = result.unwrap_err().to_string();
    assert!(message.contains("Tasa del periodo"), "{message}");
}

#[test]
fn test_output_decimals_from_config() {
    let path = write_plan("decimals");
    let config = FincalcConfig::default().apply_overrides(|key| {
        (key == "FINCALC_OUTPUT_DECIMALS").then(|| "6".to_string())
    });
    let output = run(&path, &[], &config);
    fs::remove_file(&path).unwrap();

    let output = output.unwrap();
    assert!(output.starts_with("Tasa efectiva para 62 días"));
    assert!(output.ends_with("Resultado final: tasa = 0.032536"), "{output}");
}
