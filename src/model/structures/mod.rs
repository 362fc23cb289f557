pub mod competitor;
pub mod config;
pub mod encounter;
pub mod game;
pub mod group;
pub mod performance_type;
pub mod prior;
pub mod rating_result;
