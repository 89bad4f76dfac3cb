#![warn(clippy::uninlined_format_args)]

mod cost;
mod hungarian;
mod model;

use std::time::Duration;

use thiserror::Error;

use hungarian::{Budget, WorkingMatrix, solve_square};

pub use cost::Cost;
pub use model::{CostMatrix, Pair, Solution};

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum InvalidInputError {
    #[error("Cost matrix has no rows")]
    EmptyMatrix,
    #[error("Row {row} has no columns")]
    EmptyRow { row: usize },
    #[error("Row {row} has {found} columns (expected {expected})")]
    RaggedRow {
        row: usize,
        expected: usize,
        found: usize,
    },
    #[error("Cost at row {row}, column {column} is not finite")]
    NonFiniteCost { row: usize, column: usize },
    #[error("Cost at row {row}, column {column} is negative")]
    NegativeCost { row: usize, column: usize },
    #[error("Costs are too large to solve a {size}x{size} working matrix without overflow")]
    CostOutOfRange { size: usize },
}

impl InvalidInputError {
    /// Source row the error points at, when it points at one.
    pub fn row(&self) -> Option<usize> {
        match self {
            Self::EmptyRow { row }
            | Self::RaggedRow { row, .. }
            | Self::NonFiniteCost { row, .. }
            | Self::NegativeCost { row, .. } => Some(*row),
            Self::EmptyMatrix | Self::CostOutOfRange { .. } => None,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum TimedOutError {
    #[error("Time limit of {limit:?} exceeded after {iterations} iterations")]
    TimeLimit { limit: Duration, iterations: usize },
    #[error("Iteration limit of {limit} exceeded")]
    IterationLimit { limit: usize },
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum AssignmentError {
    #[error("Invalid cost matrix: {0}")]
    InvalidInput(#[from] InvalidInputError),
    #[error("Solver gave up: {0}")]
    TimedOut(#[from] TimedOutError),
}

/// Optional budget for a single solve. Both limits are off by default.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct SolveOptions {
    pub time_limit: Option<Duration>,
    /// Cap on alternating-tree growth steps. A full solve takes at most `K²` steps for a
    /// `K`×`K` working matrix.
    pub iteration_limit: Option<usize>,
}

impl SolveOptions {
    pub fn with_time_limit(mut self, limit: Duration) -> Self {
        self.time_limit = Some(limit);
        self
    }

    pub fn with_iteration_limit(mut self, limit: usize) -> Self {
        self.iteration_limit = Some(limit);
        self
    }
}

/// Exact minimum-cost rectangular assignment.
///
/// The matrix is padded to a square with zero-cost rows or columns, solved with the
/// Hungarian method in `O(K³)` for `K = max(rows, columns)`, and projected back so only
/// real rows and columns appear in the result. Every index of the smaller dimension is
/// matched exactly once.
#[derive(Debug, Clone, Copy, Default)]
pub struct AssignmentSolver {
    options: SolveOptions,
}

impl AssignmentSolver {
    pub fn new(options: SolveOptions) -> Self {
        Self { options }
    }

    pub fn options(&self) -> &SolveOptions {
        &self.options
    }

    pub fn solve<C: Cost>(&self, costs: &CostMatrix<C>) -> Result<Solution<C>, AssignmentError> {
        let working = WorkingMatrix::new(costs);
        tracing::debug!(
            rows = costs.rows(),
            columns = costs.columns(),
            working_size = working.size(),
            time_limit = ?self.options.time_limit,
            iteration_limit = ?self.options.iteration_limit,
            "Assignment solve started"
        );

        let mut budget = Budget::new(&self.options);
        let matching = match solve_square(&working, &mut budget) {
            Ok(matching) => matching,
            Err(err) => {
                tracing::warn!(
                    rows = costs.rows(),
                    columns = costs.columns(),
                    iterations = budget.iterations(),
                    reason = %err,
                    "Assignment solve exceeded its budget"
                );
                return Err(err.into());
            }
        };

        let pairs: Vec<Pair> = matching
            .row_to_column
            .iter()
            .enumerate()
            .filter(|&(row, &column)| !working.is_padding(row, column))
            .map(|(row, &column)| Pair { row, column })
            .collect();
        let total_cost = costs.cost_of(&pairs);
        let dual_objective = matching.dual_objective();

        tracing::debug!(
            pairs = pairs.len(),
            iterations = budget.iterations(),
            total_cost = ?total_cost,
            dual_objective = ?dual_objective,
            "Assignment solve finished"
        );

        Ok(Solution {
            pairs,
            total_cost,
            dual_objective,
            iterations: budget.iterations(),
            rows: costs.rows(),
            columns: costs.columns(),
        })
    }
}

/// Validates `rows` and returns an optimal set of `(row, column)` pairs, sorted by row.
pub fn solve<C: Cost, R: AsRef<[C]>>(rows: &[R]) -> Result<Vec<Pair>, AssignmentError> {
    let costs = CostMatrix::from_rows(rows)?;
    let solution = AssignmentSolver::default().solve(&costs)?;
    Ok(solution.pairs)
}
