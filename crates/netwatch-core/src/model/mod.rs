// ── Domain model ──
//
// Canonical types shared by the scorer, the store and consumers.

pub mod level;
pub mod quality;
pub mod state;

pub use level::QualityLevel;
pub use quality::{
    ConnectionQuality, QualityFactors, Recommendation, SpeedTestResult, StabilityScore,
};
pub use state::{LinkInfo, ManualOverride, NetworkState, Visibility};
