use crate::{InvalidInputError, cost::Cost};

/// Validated rectangular cost matrix, stored row-major.
#[derive(Debug, Clone, PartialEq)]
pub struct CostMatrix<C = f64> {
    rows: usize,
    columns: usize,
    costs: Vec<C>,
}

impl<C: Cost> CostMatrix<C> {
    pub fn new(rows: Vec<Vec<C>>) -> Result<Self, InvalidInputError> {
        Self::from_rows(&rows)
    }

    /// Validates shape and values before copying anything.
    ///
    /// Rejects an empty matrix, empty or ragged rows, non-finite and negative costs,
    /// and costs large enough to overflow the solver's potentials.
    pub fn from_rows<R: AsRef<[C]>>(rows: &[R]) -> Result<Self, InvalidInputError> {
        let Some(first) = rows.first() else {
            return Err(InvalidInputError::EmptyMatrix);
        };
        let columns = first.as_ref().len();

        let mut max_cost = C::ZERO;
        for (row, values) in rows.iter().enumerate() {
            let values = values.as_ref();
            if values.is_empty() {
                return Err(InvalidInputError::EmptyRow { row });
            }
            if values.len() != columns {
                return Err(InvalidInputError::RaggedRow {
                    row,
                    expected: columns,
                    found: values.len(),
                });
            }
            for (column, &cost) in values.iter().enumerate() {
                if !cost.is_finite() {
                    return Err(InvalidInputError::NonFiniteCost { row, column });
                }
                if cost < C::ZERO {
                    return Err(InvalidInputError::NegativeCost { row, column });
                }
                if cost > max_cost {
                    max_cost = cost;
                }
            }
        }

        let size = rows.len().max(columns);
        if !C::has_headroom(max_cost, size) {
            return Err(InvalidInputError::CostOutOfRange { size });
        }

        let mut costs = Vec::with_capacity(rows.len() * columns);
        for values in rows {
            costs.extend_from_slice(values.as_ref());
        }

        Ok(Self {
            rows: rows.len(),
            columns,
            costs,
        })
    }

    pub fn rows(&self) -> usize {
        self.rows
    }

    pub fn columns(&self) -> usize {
        self.columns
    }

    pub fn get(&self, row: usize, column: usize) -> Option<C> {
        if row >= self.rows || column >= self.columns {
            return None;
        }
        Some(self.costs[row * self.columns + column])
    }

    pub fn row(&self, row: usize) -> Option<&[C]> {
        if row >= self.rows {
            return None;
        }
        let start = row * self.columns;
        Some(&self.costs[start..start + self.columns])
    }

    /// Sum of the costs selected by `pairs`. Pairs outside the matrix contribute nothing.
    pub fn cost_of(&self, pairs: &[Pair]) -> C {
        pairs
            .iter()
            .filter_map(|pair| self.get(pair.row, pair.column))
            .fold(C::ZERO, |total, cost| total + cost)
    }
}

impl<C: Cost> TryFrom<Vec<Vec<C>>> for CostMatrix<C> {
    type Error = InvalidInputError;

    fn try_from(rows: Vec<Vec<C>>) -> Result<Self, Self::Error> {
        Self::new(rows)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct Pair {
    pub row: usize,
    pub column: usize,
}

impl From<(usize, usize)> for Pair {
    fn from((row, column): (usize, usize)) -> Self {
        Self { row, column }
    }
}

impl From<Pair> for (usize, usize) {
    fn from(pair: Pair) -> Self {
        (pair.row, pair.column)
    }
}

/// Optimal assignment for one cost matrix.
#[derive(Debug, Clone, PartialEq)]
pub struct Solution<C = f64> {
    /// Matched pairs sorted by row. Padding never appears here.
    pub pairs: Vec<Pair>,
    pub total_cost: C,
    /// Sum of all row and column potentials over the square working matrix.
    /// Equals `total_cost` at optimality, up to rounding for floating-point costs.
    pub dual_objective: C,
    /// Alternating-tree growth steps taken.
    pub iterations: usize,
    pub(crate) rows: usize,
    pub(crate) columns: usize,
}

impl<C> Solution<C> {
    /// Rows left without a column. Non-empty only when there are more rows than columns.
    pub fn unassigned_rows(&self) -> Vec<usize> {
        let mut matched = vec![false; self.rows];
        for pair in &self.pairs {
            matched[pair.row] = true;
        }
        unmatched_indices(&matched)
    }

    /// Columns left without a row. Non-empty only when there are more columns than rows.
    pub fn unassigned_columns(&self) -> Vec<usize> {
        let mut matched = vec![false; self.columns];
        for pair in &self.pairs {
            matched[pair.column] = true;
        }
        unmatched_indices(&matched)
    }
}

fn unmatched_indices(matched: &[bool]) -> Vec<usize> {
    matched
        .iter()
        .enumerate()
        .filter_map(|(idx, &is_matched)| (!is_matched).then_some(idx))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::{CostMatrix, Pair};
    use crate::InvalidInputError;
    use rstest::rstest;

    #[test]
    fn stores_rows_in_order() {
        let matrix = CostMatrix::new(vec![vec![1, 2, 3], vec![4, 5, 6]]).expect("valid matrix");
        assert_eq!(matrix.rows(), 2);
        assert_eq!(matrix.columns(), 3);
        assert_eq!(matrix.get(1, 2), Some(6));
        assert_eq!(matrix.get(2, 0), None);
        assert_eq!(matrix.row(0), Some(&[1, 2, 3][..]));
        assert_eq!(matrix.row(2), None);
    }

    #[test]
    fn converts_from_nested_vectors() {
        let matrix = CostMatrix::try_from(vec![vec![2.5, 1.0]]).expect("valid matrix");
        assert_eq!(matrix.get(0, 1), Some(1.0));

        let rejected: Result<CostMatrix<f64>, _> = vec![vec![1.0], vec![]].try_into();
        assert_eq!(rejected, Err(InvalidInputError::EmptyRow { row: 1 }));
    }

    #[test]
    fn pair_converts_to_and_from_tuples() {
        let pair = Pair::from((3, 1));
        assert_eq!(pair, Pair { row: 3, column: 1 });
        assert_eq!(<(usize, usize)>::from(pair), (3, 1));
    }

    #[rstest]
    #[case::empty(vec![], InvalidInputError::EmptyMatrix)]
    #[case::empty_first_row(vec![vec![]], InvalidInputError::EmptyRow { row: 0 })]
    #[case::empty_later_row(vec![vec![1.0], vec![]], InvalidInputError::EmptyRow { row: 1 })]
    #[case::ragged(
        vec![vec![1.0, 2.0], vec![3.0]],
        InvalidInputError::RaggedRow { row: 1, expected: 2, found: 1 }
    )]
    #[case::negative(
        vec![vec![1.0, 2.0], vec![3.0, -0.5]],
        InvalidInputError::NegativeCost { row: 1, column: 1 }
    )]
    #[case::nan(vec![vec![f64::NAN]], InvalidInputError::NonFiniteCost { row: 0, column: 0 })]
    #[case::infinite(
        vec![vec![0.0, f64::INFINITY]],
        InvalidInputError::NonFiniteCost { row: 0, column: 1 }
    )]
    fn rejects_malformed_input(#[case] rows: Vec<Vec<f64>>, #[case] expected: InvalidInputError) {
        assert_eq!(CostMatrix::new(rows), Err(expected));
    }

    #[test]
    fn rejects_integer_costs_without_headroom() {
        let result = CostMatrix::new(vec![vec![i64::MAX, 0], vec![0, 0]]);
        assert_eq!(result, Err(InvalidInputError::CostOutOfRange { size: 2 }));
    }

    #[test]
    fn cost_of_ignores_out_of_range_pairs() {
        let matrix = CostMatrix::new(vec![vec![1, 2], vec![3, 4]]).expect("valid matrix");
        let pairs = [
            Pair { row: 0, column: 1 },
            Pair { row: 1, column: 0 },
            Pair { row: 5, column: 5 },
        ];
        assert_eq!(matrix.cost_of(&pairs), 5);
    }
}
