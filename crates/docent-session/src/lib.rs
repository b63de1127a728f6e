//! Session orchestration for Docent.
//!
//! [`SessionOrchestrator`] owns the document session and its conversation.
//! It runs the status machine `Idle -> Uploading -> Ready <-> Querying`,
//! with `Error` reachable from either network call, and drives the
//! coordinator through a [`docent_client::CoordinatorClient`]. Presentation
//! code reads [`SessionView`] snapshots and listens for [`SessionEvent`]s.

pub mod error;
pub mod events;
pub mod ids;
pub mod orchestrator;
pub mod state;
pub mod view;

pub use error::SessionError;
pub use events::{CallKind, SessionEvent};
pub use ids::{IdGenerator, MessageKind, SequentialIds, UuidIds};
pub use orchestrator::{
    IngestOutcome, QueryOutcome, SessionOrchestrator, FAILURE_NOTICE, FALLBACK_ANSWER,
};
pub use state::{Lifecycle, SessionStatus, UploadStatus};
pub use view::SessionView;
