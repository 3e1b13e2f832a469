//! Data models: the parsed operation and the pipeline configuration.

pub mod config;
pub mod format;
pub mod operation;

pub use config::AlarmfaxConfig;
pub use format::FormatOptions;
pub use operation::{
    Operation, OperationKeywords, OperationResource, OperationResources, PropertyLocation,
    ResourceListStyle,
};
