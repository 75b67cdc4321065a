// ── Pure analysis over measurements ──
//
// No I/O and no shared state: every function here is safe to call on
// every render.

pub mod quality;
pub mod schedule;
pub mod stability;

pub use quality::{QualityInputs, assess};
pub use schedule::IntervalScheduler;
pub use stability::estimate as estimate_stability;
