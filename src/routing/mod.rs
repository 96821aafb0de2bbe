// src/routing/mod.rs

pub mod classifier;
pub mod path;
pub mod router;
pub mod types;

pub use classifier::{Classifier, calculate_confidence};
pub use router::Router;
pub use types::{
    ClassificationResult, ClassificationSignal, ConflictResolution, ContextType,
    DirectoryStructure, FilenameComponent, ProjectClassification, ProjectRoute, RouteDecision,
    RouteDestination, RoutingConfig, RoutingContext, SignalKind,
};
