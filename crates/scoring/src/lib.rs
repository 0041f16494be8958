pub mod balances;
pub mod decision;
pub mod engine;
pub mod metrics;
pub mod model;
pub mod points;
pub mod stats;
pub mod tagger;

pub use engine::{score_report, ScoringError, ENGINE_VERSION, MIN_HISTORY_DAYS};
pub use model::{
    DailyBalance, MetricVector, OverrideMap, PointBreakdown, Recommendation, ReportContext,
    ScoreReport, TagOverride, TaggedTransaction, Transaction, WarningFlags,
};
