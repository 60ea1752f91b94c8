pub mod adjustment;
pub mod mix;
pub mod plateau;
pub mod prediction;
pub mod profile;
pub mod running_stat;
pub mod stats;

pub use adjustment::AdjustmentRecommender;
pub use mix::ContentMixOptimizer;
pub use plateau::PlateauDetector;
pub use prediction::{PredictionContext, PredictionEngine, UserFactors};
pub use profile::{ProfileBuilder, ProfileSnapshot};
pub use running_stat::{AveragingStrategy, RunningStat};
