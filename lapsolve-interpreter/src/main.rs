#![warn(clippy::uninlined_format_args)]

mod bootstrap;

use std::{borrow::Cow, env, fmt::Write as _, fs, process};

use bootstrap::{AppConfig, init_logging};
use lapsolve::{AssignmentSolver, CostMatrix, InvalidInputError, Solution};
use lapsolve_parser::{ParsedMatrix, parse_matrix};

type CliResult<T> = Result<T, Cow<'static, str>>;

fn main() {
    init_logging();
    if let Err(err) = run() {
        eprintln!("Error: {err}");
        process::exit(1);
    }
}

fn run() -> CliResult<()> {
    let Some(path) = env::args().nth(1) else {
        return Err("Usage: lapsolve-interpreter <matrix-file>".into());
    };

    let config = AppConfig::from_env().map_err(|err| err.to_string())?;
    let source =
        fs::read_to_string(&path).map_err(|err| format!("Failed to read '{path}': {err}"))?;

    let output = solve_source(&source, &config)?;
    print!("{output}");
    Ok(())
}

fn solve_source(source: &str, config: &AppConfig) -> CliResult<String> {
    let parsed = parse_matrix(source).map_err(|err| err.to_string())?;
    let costs = CostMatrix::new(parsed.costs())
        .map_err(|err| describe_invalid_input(&parsed, &err))?;
    tracing::info!(
        rows = costs.rows(),
        columns = costs.columns(),
        time_limit = ?config.time_limit,
        iteration_limit = ?config.iteration_limit,
        "Loaded cost matrix"
    );

    let solver = AssignmentSolver::new(config.solve_options());
    let solution = solver.solve(&costs).map_err(|err| err.to_string())?;

    Ok(render_solution(&costs, &solution))
}

fn describe_invalid_input(parsed: &ParsedMatrix, err: &InvalidInputError) -> String {
    match err.row().and_then(|row| parsed.line_of(row)) {
        Some(line) => format!("Invalid cost matrix at line {line}: {err}"),
        None => format!("Invalid cost matrix: {err}"),
    }
}

fn render_solution(costs: &CostMatrix, solution: &Solution) -> String {
    let mut output = String::new();
    for pair in &solution.pairs {
        let cost = costs.get(pair.row, pair.column).unwrap_or_default();
        let _ = writeln!(output, "{} -> {} ({cost})", pair.row, pair.column);
    }
    let _ = writeln!(output, "total: {}", solution.total_cost);

    let unassigned_rows = solution.unassigned_rows();
    if !unassigned_rows.is_empty() {
        let _ = writeln!(output, "unassigned rows: {}", join_indices(&unassigned_rows));
    }
    let unassigned_columns = solution.unassigned_columns();
    if !unassigned_columns.is_empty() {
        let _ = writeln!(
            output,
            "unassigned columns: {}",
            join_indices(&unassigned_columns)
        );
    }
    output
}

fn join_indices(indices: &[usize]) -> String {
    indices
        .iter()
        .map(usize::to_string)
        .collect::<Vec<_>>()
        .join(", ")
}
