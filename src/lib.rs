pub mod config;
pub mod explain;
pub mod model;
pub mod normalize;
pub mod pipeline;

pub use config::Config;
pub use explain::{HighlightSpan, Label, RuleHit, TermContribution};
pub use model::{LinearModel, ModelArtifact};
pub use pipeline::{Message, PredictionResult, ScoringEngine};
