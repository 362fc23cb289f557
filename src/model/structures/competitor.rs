use super::performance_type::PerformanceType;

/// A single competitor, identified by a stable 0-based index into
/// `Context::competitors`. The `name` field is carried opaquely for
/// reporting only — no numeric code ever reads it.
#[derive(Debug, Clone)]
pub struct Competitor {
    pub name: String,
    pub rating: f64,
    pub flagged: bool,
    pub performance_type: PerformanceType,
    /// Set when this competitor's rating is held fixed by an anchor or a
    /// zero-sigma (hard) prior.
    pub prefed: bool
}

impl Competitor {
    pub fn new(name: impl Into<String>) -> Self {
        Competitor {
            name: name.into(),
            rating: 0.0,
            flagged: false,
            performance_type: PerformanceType::Normal,
            prefed: false
        }
    }
}
