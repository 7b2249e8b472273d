//! Pain-environment analysis
//!
//! The algorithmic core of the crate:
//!
//! - [`correlation`]: Pearson correlation between pain and each factor
//! - [`insights`]: human-readable findings derived from the same data
//! - [`risk`]: forecast-day flare risk scoring
//! - [`service`]: off-main-path execution and atomic result publishing

pub mod correlation;
pub mod insights;
pub mod risk;
pub mod service;

pub use correlation::{
    analyze, direction_description, pearson_correlation, CorrelationResult, Strength,
    DIRECTION_THRESHOLD, MIN_SAMPLE_SIZE,
};
pub use insights::{generate, Insight, InsightKind};
pub use risk::{
    recent_pain_average, score, RiskAssessment, RiskLevel, RiskTier, FALLBACK_RISK_PERCENT,
    HISTORY_RISK_MULTIPLIER, PRESSURE_RISK_MULTIPLIER, RECENT_HISTORY_WINDOW,
};
pub use service::{AnalysisResults, AnalysisService};
