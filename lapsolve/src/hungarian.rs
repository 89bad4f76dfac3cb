//! Shortest augmenting path variant of the Hungarian method.
//!
//! Rows of the square working matrix are inserted one at a time. Each insertion grows an
//! alternating tree from the new row, shifting row and column potentials by the minimum
//! frontier slack until a free column becomes reachable through tight edges, then flips
//! the path. Every reduced cost `cost - row_potential - column_potential` stays
//! non-negative throughout, and matched edges are tight.

use std::time::{Duration, Instant};

use crate::{SolveOptions, TimedOutError, cost::Cost, model::CostMatrix};

/// Square view over a cost matrix. Cells outside the source are zero-cost padding.
pub(crate) struct WorkingMatrix<'a, C> {
    source: &'a CostMatrix<C>,
    size: usize,
}

impl<'a, C: Cost> WorkingMatrix<'a, C> {
    pub(crate) fn new(source: &'a CostMatrix<C>) -> Self {
        Self {
            source,
            size: source.rows().max(source.columns()),
        }
    }

    pub(crate) fn size(&self) -> usize {
        self.size
    }

    pub(crate) fn is_padding(&self, row: usize, column: usize) -> bool {
        row >= self.source.rows() || column >= self.source.columns()
    }

    fn cost(&self, row: usize, column: usize) -> C {
        self.source.get(row, column).unwrap_or(C::ZERO)
    }

    fn row_min(&self, row: usize) -> C {
        if self.source.columns() < self.size {
            return C::ZERO;
        }
        match self.source.row(row) {
            Some(values) => values
                .iter()
                .copied()
                .fold(values[0], |min, cost| if cost < min { cost } else { min }),
            None => C::ZERO,
        }
    }
}

/// Wall-clock and step budget for one solve call.
pub(crate) struct Budget {
    started: Instant,
    time_limit: Option<Duration>,
    iteration_limit: Option<usize>,
    iterations: usize,
}

impl Budget {
    pub(crate) fn new(options: &SolveOptions) -> Self {
        Self {
            started: Instant::now(),
            time_limit: options.time_limit,
            iteration_limit: options.iteration_limit,
            iterations: 0,
        }
    }

    pub(crate) fn iterations(&self) -> usize {
        self.iterations
    }

    fn tick(&mut self) -> Result<(), TimedOutError> {
        self.iterations += 1;
        if let Some(limit) = self.iteration_limit {
            if self.iterations > limit {
                return Err(TimedOutError::IterationLimit { limit });
            }
        }
        if let Some(limit) = self.time_limit {
            if self.started.elapsed() > limit {
                return Err(TimedOutError::TimeLimit {
                    limit,
                    iterations: self.iterations,
                });
            }
        }
        Ok(())
    }
}

/// Perfect matching on the working matrix together with its optimality certificate.
pub(crate) struct Matching<C> {
    pub(crate) row_to_column: Vec<usize>,
    pub(crate) row_potential: Vec<C>,
    pub(crate) column_potential: Vec<C>,
}

impl<C: Cost> Matching<C> {
    pub(crate) fn dual_objective(&self) -> C {
        self.row_potential
            .iter()
            .chain(&self.column_potential)
            .fold(C::ZERO, |total, &potential| total + potential)
    }
}

pub(crate) fn solve_square<C: Cost>(
    matrix: &WorkingMatrix<'_, C>,
    budget: &mut Budget,
) -> Result<Matching<C>, TimedOutError> {
    let size = matrix.size();
    // Slot `size` is a virtual column that roots the tree of the row being inserted.
    let root = size;

    let mut row_potential: Vec<C> = (0..size).map(|row| matrix.row_min(row)).collect();
    let mut column_potential = vec![C::ZERO; size + 1];
    let mut column_owner: Vec<Option<usize>> = vec![None; size + 1];

    let mut slack: Vec<Option<C>> = vec![None; size];
    let mut predecessor = vec![root; size];
    let mut in_tree = vec![false; size + 1];

    for row in 0..size {
        column_owner[root] = Some(row);
        slack.fill(None);
        in_tree.fill(false);

        let mut column = root;
        let mut tree_row = row;
        loop {
            in_tree[column] = true;

            let mut best: Option<(usize, C)> = None;
            for next in 0..size {
                if in_tree[next] {
                    continue;
                }
                let reduced = matrix.cost(tree_row, next)
                    - row_potential[tree_row]
                    - column_potential[next];
                if slack[next].is_none_or(|current| reduced < current) {
                    slack[next] = Some(reduced);
                    predecessor[next] = column;
                }
                if let Some(candidate) = slack[next] {
                    if best.is_none_or(|(_, delta)| candidate < delta) {
                        best = Some((next, candidate));
                    }
                }
            }
            let Some((next_column, delta)) = best else {
                unreachable!("a tree with t matched columns spans t + 1 rows, so t < size");
            };

            for idx in 0..=size {
                if in_tree[idx] {
                    if let Some(owner) = column_owner[idx] {
                        row_potential[owner] = row_potential[owner] + delta;
                    }
                    column_potential[idx] = column_potential[idx] - delta;
                } else if let Some(current) = slack[idx] {
                    slack[idx] = Some(current - delta);
                }
            }

            budget.tick()?;

            column = next_column;
            match column_owner[column] {
                Some(owner) => tree_row = owner,
                None => break,
            }
        }

        while column != root {
            let previous = predecessor[column];
            column_owner[column] = column_owner[previous];
            column = previous;
        }
        column_owner[root] = None;
    }

    let mut row_to_column = vec![0; size];
    for (column, owner) in column_owner.iter().take(size).enumerate() {
        if let Some(row) = *owner {
            row_to_column[row] = column;
        }
    }
    column_potential.truncate(size);

    Ok(Matching {
        row_to_column,
        row_potential,
        column_potential,
    })
}
