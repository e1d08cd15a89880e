//! Maximum-weight bipartite assignment.
//!
//! The score matrix is padded to a square `k × k` matrix (`k = max(n, m)`)
//! with zero-score dummy rows or columns, then solved as a minimum-cost
//! perfect matching with the Hungarian method (potentials, O(k³)). A real
//! record matched to a dummy is reported with `None` on the other side.
//!
//! Ties are not broken by any domain rule. The solver scans rows in order
//! and columns in ascending order, accepting only strict improvements, so a
//! given matrix always yields the same assignment.

use kinrec_model::{MatchEdge, Record};
use tracing::trace;

use crate::scorer::Objective;

/// Dense `rows × cols` matrix of finite, non-negative scores.
#[derive(Debug, Clone, PartialEq)]
pub struct ScoreMatrix {
    rows: usize,
    cols: usize,
    data: Vec<f64>,
}

impl ScoreMatrix {
    pub fn new(rows: usize, cols: usize) -> Self {
        Self {
            rows,
            cols,
            data: vec![0.0; rows * cols],
        }
    }

    /// Builds a matrix from `score(row, col)`. Scores are sanitized as by
    /// [`set`](Self::set).
    pub fn from_fn<F>(rows: usize, cols: usize, mut score: F) -> Self
    where
        F: FnMut(usize, usize) -> f64,
    {
        let mut matrix = Self::new(rows, cols);
        for row in 0..rows {
            for col in 0..cols {
                matrix.set(row, col, score(row, col));
            }
        }
        matrix
    }

    pub fn rows(&self) -> usize {
        self.rows
    }

    pub fn cols(&self) -> usize {
        self.cols
    }

    /// Score at `(row, col)`; 0 outside the matrix, i.e. for padding.
    pub fn get(&self, row: usize, col: usize) -> f64 {
        if row < self.rows && col < self.cols {
            self.data[row * self.cols + col]
        } else {
            0.0
        }
    }

    /// Stores `score`, mapping NaN, infinities and negatives to 0.
    pub fn set(&mut self, row: usize, col: usize, score: f64) {
        if row < self.rows && col < self.cols {
            self.data[row * self.cols + col] = sanitize(score);
        }
    }

    fn max(&self) -> f64 {
        self.data.iter().copied().fold(0.0, f64::max)
    }
}

fn sanitize(score: f64) -> f64 {
    if score.is_finite() && score > 0.0 {
        score
    } else {
        0.0
    }
}

/// Solves one group: scores every left/right pair with `objective` and
/// returns the optimal assignment. Indices are positions in the slices.
pub fn solve<O>(left: &[&Record], right: &[&Record], objective: &O) -> Vec<MatchEdge>
where
    O: Objective + ?Sized,
{
    let matrix = ScoreMatrix::from_fn(left.len(), right.len(), |row, col| {
        objective.score(left[row], right[col])
    });
    solve_matrix(&matrix)
}

/// Optimal assignment of a score matrix.
///
/// Returns exactly `max(rows, cols)` edges; every row and every column
/// appears in exactly one edge. Edges are ordered by left index, with
/// unmatched right entries last.
pub fn solve_matrix(matrix: &ScoreMatrix) -> Vec<MatchEdge> {
    let (n, m) = (matrix.rows(), matrix.cols());
    let k = n.max(m);
    if k == 0 {
        return Vec::new();
    }

    // Maximizing score is minimizing (max - score); padding costs max.
    let ceiling = matrix.max();
    let cost = |row: usize, col: usize| ceiling - matrix.get(row, col);

    // 1-based potentials; column 0 is the virtual start column.
    let mut u = vec![0.0_f64; k + 1];
    let mut v = vec![0.0_f64; k + 1];
    // assigned[j] = row matched to column j (1-based, 0 = free)
    let mut assigned = vec![0usize; k + 1];
    let mut way = vec![0usize; k + 1];

    for row in 1..=k {
        assigned[0] = row;
        let mut col0 = 0usize;
        let mut min_slack = vec![f64::INFINITY; k + 1];
        let mut used = vec![false; k + 1];

        loop {
            used[col0] = true;
            let row0 = assigned[col0];
            let mut delta = f64::INFINITY;
            let mut col1 = 0usize;

            for col in 1..=k {
                if used[col] {
                    continue;
                }
                let slack = cost(row0 - 1, col - 1) - u[row0] - v[col];
                if slack < min_slack[col] {
                    min_slack[col] = slack;
                    way[col] = col0;
                }
                if min_slack[col] < delta {
                    delta = min_slack[col];
                    col1 = col;
                }
            }

            for col in 0..=k {
                if used[col] {
                    u[assigned[col]] += delta;
                    v[col] -= delta;
                } else {
                    min_slack[col] -= delta;
                }
            }

            col0 = col1;
            if assigned[col0] == 0 {
                break;
            }
        }

        // Augment along the alternating path.
        loop {
            let prev = way[col0];
            assigned[col0] = assigned[prev];
            col0 = prev;
            if col0 == 0 {
                break;
            }
        }
    }

    let mut edges: Vec<MatchEdge> = (1..=k)
        .filter_map(|col| {
            let row = assigned[col].checked_sub(1)?;
            let col = col - 1;
            let left_index = (row < n).then_some(row);
            let right_index = (col < m).then_some(col);
            if left_index.is_none() && right_index.is_none() {
                return None;
            }
            let score = if left_index.is_some() && right_index.is_some() {
                matrix.get(row, col)
            } else {
                0.0
            };
            Some(MatchEdge {
                left_index,
                right_index,
                score,
            })
        })
        .collect();

    edges.sort_by_key(|edge| (edge.left_index.unwrap_or(usize::MAX), edge.right_index));
    trace!(rows = n, cols = m, edges = edges.len(), "assignment solved");
    edges
}
