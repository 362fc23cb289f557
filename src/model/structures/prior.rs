/// A loose anchor on a single competitor's rating. `sigma == 0.0`
/// upgrades it to a hard anchor: the competitor's `prefed` flag is set and
/// its rating is fixed exactly rather than merely pulled toward `value`.
#[derive(Debug, Clone, Copy)]
pub struct Prior {
    pub value: f64,
    pub sigma: f64
}

impl Prior {
    pub fn is_hard(&self) -> bool {
        self.sigma == 0.0
    }
}

/// Asserts `rating(player_a) - rating(player_b) ~= delta` with the stated
/// uncertainty. Perturbed on `delta` during simulation when priors are
/// active.
#[derive(Debug, Clone, Copy)]
pub struct RelativePrior {
    pub player_a: usize,
    pub player_b: usize,
    pub delta: f64,
    pub sigma: f64
}
