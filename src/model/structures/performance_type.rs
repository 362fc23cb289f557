use serde_repr::{Deserialize_repr, Serialize_repr};
use strum_macros::EnumIter;

/// A competitor's record classification, assigned once per run by
/// `flagging::set_super_players` and consumed by the super-player
/// estimator and the reporting symbols. Wire-repr'd as `u8` rather than by
/// name, the way the teacher's own small enums (`Ruleset`, `ScoringType`,
/// ...) are.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize_repr, Deserialize_repr, EnumIter, Default)]
#[repr(u8)]
pub enum PerformanceType {
    #[default]
    Normal = 0,
    SuperWinner = 1,
    SuperLoser = 2,
    NoGames = 3
}
