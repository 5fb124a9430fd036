//! 服务模块

pub mod analysis;
pub mod compression;
pub mod guardian;
pub mod profile_synthesizer;
pub mod prompt_builder;
pub mod token_estimator;

pub use analysis::{AnalysisOptions, AnalysisOutcome, AnalysisService};
pub use compression::{CompressedEventSet, DEFAULT_TOKEN_BUDGET, EventCompressor, TruncationReport};
pub use guardian::{ClearedText, EMERGENCY_RESPONSE, Guardian};
pub use profile_synthesizer::{INSUFFICIENT_PROFILE_DATA, synthesize_profile};
pub use prompt_builder::build_analysis_prompt;
pub use token_estimator::{TokenEstimator, estimate_tokens};
