use criterion::{BenchmarkId, Criterion, black_box, criterion_group, criterion_main};
use fincalc_core::{
    CalculationPlan, CalculationStep, EXPERIMENTAL_FORMULA, ExpressionLimits, FormulaCatalog, PlanExecutor,
    PlanValue, parse_plan_response,
};
use std::time::Duration;

/// A chain of `length` compound-interest steps, each feeding the next.
fn generate_chained_plan(length: usize) -> CalculationPlan {
    let mut plan = CalculationPlan::new(format!("S{}", length - 1)).with_initial("S_seed", 1000.0);
    let mut previous = "S_seed".to_string();
    for index in 0..length {
        let target = format!("S{index}");
        plan = plan.with_step(
            CalculationStep::new(format!("Monto {index}"), target.clone(), "formula_ic_S_from_Pin")
                .with_input("P", PlanValue::reference_to(&previous))
                .with_input("i", 0.01)
                .with_input("n", 12.0),
        );
        previous = target;
    }
    plan
}

fn bench_plan_execution(c: &mut Criterion) {
    let mut group = c.benchmark_group("plan_execution");
    group.measurement_time(Duration::from_secs(5));

    let executor = PlanExecutor::new();
    for length in [1, 10, 100].iter() {
        let plan = generate_chained_plan(*length);
        group.bench_with_input(BenchmarkId::new("chained_steps", length), &plan, |b, plan| {
            b.iter(|| black_box(executor.execute(plan).unwrap()))
        });
    }
    group.finish();
}

fn bench_experimental_step(c: &mut Criterion) {
    let executor = PlanExecutor::new();
    let plan = CalculationPlan::new("tasa").with_step(
        CalculationStep::new("Tasa del periodo", "tasa", EXPERIMENTAL_FORMULA)
            .with_input("j", 0.1903)
            .with_input("dias", 62.0)
            .with_generated_formula("(1 + j / 4)^(dias / 90) - 1"),
    );

    c.bench_function("experimental_step", |b| b.iter(|| black_box(executor.execute(&plan).unwrap())));
}

fn bench_expression_compile(c: &mut Criterion) {
    let catalog = FormulaCatalog::with_limits(ExpressionLimits::default());
    let expression = "R * ((1 - ((1 + g) / (1 + i))^n) / (i - g)) + max(log(S / P), sqrt(2)) * -2^2";

    c.bench_function("expression_compile", |b| {
        b.iter(|| black_box(catalog.evaluator().compile(expression).unwrap()))
    });
}

fn bench_parallel_providers(c: &mut Criterion) {
    let mut group = c.benchmark_group("parallel_providers");
    group.sample_size(20);

    let executor = PlanExecutor::new();
    for providers in [2, 8, 32].iter() {
        let plans: Vec<(String, CalculationPlan)> =
            (0..*providers).map(|p| (format!("provider_{p}"), generate_chained_plan(50))).collect();
        group.bench_with_input(BenchmarkId::new("execute_all", providers), &plans, |b, plans| {
            b.iter(|| black_box(executor.execute_all(plans)))
        });
    }
    group.finish();
}

fn bench_response_repair(c: &mut Criterion) {
    let raw = r#"```json
{
  "interpretation": "Valor presente de una anualidad vencida"
  "final_target_variable": "P",
  "calculation_steps": [
    {
      "step_name": "Valor presente",
      "target_variable": "P",
      "formula_name": "formula_av_P_from_Rin",
      "inputs": {"R": 250, "i": 0.02, "n": 24,}
    },
  ]
}
```"#;

    c.bench_function("parse_plan_response", |b| b.iter(|| black_box(parse_plan_response(raw).unwrap())));
}

criterion_group!(
    benches,
    bench_plan_execution,
    bench_experimental_step,
    bench_expression_compile,
    bench_parallel_providers,
    bench_response_repair
);
criterion_main!(benches);
