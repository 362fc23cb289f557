/// Float comparison tolerances shared across the test suite, since a
/// single `1e-9` epsilon is too tight for solver-convergence assertions
/// but appropriate for closed-form model checks.
pub struct TestConstants {
    pub model_leniency: f64,
    pub solver_leniency: f64
}

impl TestConstants {
    pub fn new() -> TestConstants {
        TestConstants {
            model_leniency: 1e-9,
            solver_leniency: 1e-3
        }
    }
}

impl Default for TestConstants {
    fn default() -> Self {
        Self::new()
    }
}
