//! Content intelligence: learner profiling, outcome prediction, session mix
//! planning, plateau detection and path adjustments, plus the feedback
//! stores that track how content performs.

pub mod clock;
pub mod config;
pub mod content;
pub mod engine;
pub mod error;
pub mod feedback;
pub mod modeling;
pub mod source;
pub mod types;

pub use clock::{Clock, ManualClock, SystemClock};
pub use config::EngineConfig;
pub use content::{
    ContentItem, EstimatedDuration, GeneratedQuestion, HasDifficulty, HasIdentity,
    LearningContent, OpaqueContent, ReadingPassage, VocabularyItem,
};
pub use engine::ContentIntelligenceEngine;
pub use error::IntelligenceError;
pub use feedback::{EffectivenessTracker, FeedbackStore, PerformanceStore};
pub use modeling::{AveragingStrategy, RunningStat};
pub use source::{InMemoryDataSource, LearningDataSource, UserActivity};
pub use types::*;
