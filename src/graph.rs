//! Undirected weighted graph stored as a dense symmetric adjacency matrix.

use std::str::FromStr;

use crate::error::BisectError;

/// Relative tolerance used when checking `w[i][j] == w[j][i]`.
const SYMMETRY_TOLERANCE: f64 = 1e-9;

/// A validated N×N symmetric adjacency matrix with non-negative weights.
///
/// Entry `(i, j)` is the weight of the edge between nodes `i` and `j`;
/// zero means no edge. Diagonal entries are accepted but never cross a cut.
///
/// # Examples
///
/// ```
/// use u_bisect::Graph;
///
/// let graph: Graph = "0 1 0 0\n1 0 0 0\n0 0 0 1\n0 0 1 0".parse().unwrap();
/// assert_eq!(graph.size(), 4);
/// assert_eq!(graph.weight(2, 3), 1.0);
/// ```
///
/// With the `serde` feature the graph (de)serializes as a list of rows, and
/// deserialization runs the same checks as [`Graph::from_rows`].
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(
    feature = "serde",
    serde(try_from = "Vec<Vec<f64>>", into = "Vec<Vec<f64>>")
)]
pub struct Graph {
    n: usize,
    weights: Vec<f64>,
}

impl Graph {
    /// Builds a graph from row vectors.
    ///
    /// Fails with [`BisectError::InvalidInput`] if the matrix is not square,
    /// has fewer than two nodes, holds a negative or non-finite weight, or is
    /// not symmetric.
    pub fn from_rows(rows: Vec<Vec<f64>>) -> Result<Self, BisectError> {
        let n = rows.len();
        if let Some((i, row)) = rows.iter().enumerate().find(|(_, r)| r.len() != n) {
            return Err(BisectError::InvalidInput(format!(
                "matrix is not square: row {i} has {} entries, expected {n}",
                row.len()
            )));
        }
        Self::from_flat(n, rows.into_iter().flatten().collect())
    }

    /// Builds a graph from a row-major buffer of `n * n` weights.
    pub fn from_flat(n: usize, weights: Vec<f64>) -> Result<Self, BisectError> {
        if n < 2 {
            return Err(BisectError::InvalidInput(format!(
                "graph needs at least 2 nodes, got {n}"
            )));
        }
        if weights.len() != n * n {
            return Err(BisectError::InvalidInput(format!(
                "expected {} weights for a {n}x{n} matrix, got {}",
                n * n,
                weights.len()
            )));
        }

        let graph = Self { n, weights };
        graph.check_weights()?;
        Ok(graph)
    }

    fn check_weights(&self) -> Result<(), BisectError> {
        for i in 0..self.n {
            for j in 0..self.n {
                let w = self.weight(i, j);
                if !w.is_finite() || w < 0.0 {
                    return Err(BisectError::InvalidInput(format!(
                        "weight ({i}, {j}) must be finite and non-negative, got {w}"
                    )));
                }
                if j > i {
                    let mirrored = self.weight(j, i);
                    let scale = 1.0_f64.max(w.abs()).max(mirrored.abs());
                    if (w - mirrored).abs() > SYMMETRY_TOLERANCE * scale {
                        return Err(BisectError::InvalidInput(format!(
                            "matrix is not symmetric: ({i}, {j}) = {w} but ({j}, {i}) = {mirrored}"
                        )));
                    }
                }
            }
        }
        Ok(())
    }

    /// Number of nodes.
    #[inline]
    pub fn size(&self) -> usize {
        self.n
    }

    /// Weight of the edge between `i` and `j`.
    ///
    /// # Panics
    ///
    /// Panics if either index is out of range.
    #[inline]
    pub fn weight(&self, i: usize, j: usize) -> f64 {
        self.row(i)[j]
    }

    /// All weights incident to node `i`.
    ///
    /// # Panics
    ///
    /// Panics if `i` is out of range.
    #[inline]
    pub fn row(&self, i: usize) -> &[f64] {
        &self.weights[i * self.n..(i + 1) * self.n]
    }

    /// Sum of every undirected edge weight, each edge counted once.
    pub fn total_weight(&self) -> f64 {
        (0..self.n)
            .flat_map(|i| (i + 1..self.n).map(move |j| (i, j)))
            .map(|(i, j)| self.weight(i, j))
            .sum()
    }
}

impl TryFrom<Vec<Vec<f64>>> for Graph {
    type Error = BisectError;

    fn try_from(rows: Vec<Vec<f64>>) -> Result<Self, Self::Error> {
        Self::from_rows(rows)
    }
}

impl From<Graph> for Vec<Vec<f64>> {
    fn from(graph: Graph) -> Self {
        graph.weights.chunks(graph.n).map(<[f64]>::to_vec).collect()
    }
}

impl FromStr for Graph {
    type Err = BisectError;

    /// Parses one matrix row per line. Values may be separated by whitespace
    /// or commas; blank lines and `#`/`%` comments are skipped.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let mut rows = Vec::new();
        for (idx, line) in s.lines().enumerate() {
            let line = line.trim();
            if line.is_empty() || line.starts_with('#') || line.starts_with('%') {
                continue;
            }
            let row = line
                .split(|c: char| c == ',' || c.is_whitespace())
                .filter(|t| !t.is_empty())
                .map(|token| {
                    token.parse::<f64>().map_err(|_| BisectError::Parse {
                        line: idx + 1,
                        token: token.to_string(),
                    })
                })
                .collect::<Result<Vec<_>, _>>()?;
            rows.push(row);
        }
        Self::from_rows(rows)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_from_rows_ok() {
        let g = Graph::from_rows(vec![vec![0.0, 2.0], vec![2.0, 0.0]]).unwrap();
        assert_eq!(g.size(), 2);
        assert_eq!(g.weight(0, 1), 2.0);
        assert_eq!(g.row(1), &[2.0, 0.0]);
        assert!((g.total_weight() - 2.0).abs() < 1e-12);
    }

    #[test]
    fn test_rejects_non_square() {
        let err = Graph::from_rows(vec![vec![0.0, 1.0], vec![1.0]]).unwrap_err();
        assert!(matches!(err, BisectError::InvalidInput(_)));
    }

    #[test]
    fn test_rejects_too_small() {
        assert!(matches!(
            Graph::from_rows(vec![vec![0.0]]),
            Err(BisectError::InvalidInput(_))
        ));
        assert!(matches!(
            Graph::from_rows(vec![]),
            Err(BisectError::InvalidInput(_))
        ));
    }

    #[test]
    fn test_rejects_negative_weight() {
        let err = Graph::from_rows(vec![vec![0.0, -1.0], vec![-1.0, 0.0]]).unwrap_err();
        match err {
            BisectError::InvalidInput(msg) => assert!(msg.contains("-1")),
            other => panic!("unexpected error: {other:?}"),
        }
    }

    #[test]
    fn test_rejects_nan() {
        let err = Graph::from_flat(2, vec![0.0, f64::NAN, f64::NAN, 0.0]).unwrap_err();
        assert!(matches!(err, BisectError::InvalidInput(_)));
    }

    #[test]
    fn test_rejects_asymmetric() {
        let err = Graph::from_rows(vec![
            vec![0.0, 1.0, 0.0],
            vec![1.0, 0.0, 3.0],
            vec![0.0, 2.0, 0.0],
        ])
        .unwrap_err();
        match err {
            BisectError::InvalidInput(msg) => assert!(msg.contains("(1, 2)")),
            other => panic!("unexpected error: {other:?}"),
        }
    }

    #[test]
    fn test_parse_mixed_separators() {
        let text = "# two cliques\n0, 1 0 0\n1 0 0 0\n\n0 0 0,1\n0 0 1 0\n";
        let g: Graph = text.parse().unwrap();
        assert_eq!(g.size(), 4);
        assert_eq!(g.weight(3, 2), 1.0);
        assert_eq!(g.weight(0, 3), 0.0);
    }

    #[test]
    #[should_panic]
    fn test_weight_out_of_range_panics() {
        let g = Graph::from_rows(vec![vec![0.0, 1.0], vec![1.0, 0.0]]).unwrap();
        g.weight(0, 2);
    }

    #[test]
    fn test_rows_conversion() {
        let rows = vec![vec![0.0, 2.0], vec![2.0, 0.0]];
        let g = Graph::try_from(rows.clone()).unwrap();
        assert_eq!(Vec::<Vec<f64>>::from(g), rows);
        assert!(Graph::try_from(vec![vec![0.0, 1.0]]).is_err());
    }

    #[test]
    fn test_parse_bad_token() {
        let err = "0 1\n1 x\n".parse::<Graph>().unwrap_err();
        assert_eq!(
            err,
            BisectError::Parse {
                line: 2,
                token: "x".into()
            }
        );
    }
}
