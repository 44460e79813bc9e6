pub mod model;
pub mod ports;

pub use model::{BuildInfo, CommitRef, CommitState, MirrorJob, PipelineEvent, StatusJob};
pub use ports::StatusSink;
