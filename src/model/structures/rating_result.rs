use super::{group::FinalGroup, performance_type::PerformanceType};

/// A dense triangular matrix indexed by `(i, j)` with `i > j`, used for the
/// pairwise rating-difference sdev produced by the simulation driver.
/// `N*(N-1)/2` entries, no wasted upper triangle.
#[derive(Debug, Clone)]
pub struct TriangularMatrix {
    n: usize,
    data: Vec<f64>
}

impl TriangularMatrix {
    pub fn zeros(n: usize) -> Self {
        TriangularMatrix {
            n,
            data: vec![0.0; n * n.saturating_sub(1) / 2]
        }
    }

    fn index(i: usize, j: usize) -> (usize, usize) {
        if i > j {
            (i, j)
        } else {
            (j, i)
        }
    }

    pub fn get(&self, i: usize, j: usize) -> f64 {
        let (hi, lo) = Self::index(i, j);
        self.data[hi * (hi - 1) / 2 + lo]
    }

    pub fn get_mut(&mut self, i: usize, j: usize) -> &mut f64 {
        let (hi, lo) = Self::index(i, j);
        &mut self.data[hi * (hi - 1) / 2 + lo]
    }

    pub fn len(&self) -> usize {
        self.data.len()
    }

    pub fn is_empty(&self) -> bool {
        self.data.is_empty()
    }

    pub fn n(&self) -> usize {
        self.n
    }
}

/// Per-competitor output.
#[derive(Debug, Clone)]
pub struct CompetitorResult {
    pub name: String,
    pub rating: f64,
    pub sdev: f64,
    pub obtained: f64,
    pub playedby: u32,
    pub performance_type: PerformanceType,
    pub flagged: bool
}

/// The full output of a pipeline run.
#[derive(Debug, Clone)]
pub struct RatingResult {
    pub competitors: Vec<CompetitorResult>,
    pub white_advantage: f64,
    pub white_advantage_sdev: f64,
    pub draw_rate: f64,
    pub draw_rate_sdev: f64,
    pub pairwise_sdev: TriangularMatrix,
    pub groups: Vec<FinalGroup>,
    /// Advisory: did the last invocation of the solver converge within
    /// `OUTER_PHASES`? Non-fatal — the caller still gets the best iterate.
    pub converged: bool
}
