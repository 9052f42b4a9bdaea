pub mod catalog;
pub mod engine;
pub mod recommendations;
pub mod sources;

pub use catalog::CatalogStore;
pub use engine::{EngineStatus, QueryEngine, QueryError};
pub use recommendations::{RecommendationIndex, RecommendationKind, RecommendationTable};
pub use sources::{DatasetSource, Datasets, FileSource, HttpSource, LoadError};
