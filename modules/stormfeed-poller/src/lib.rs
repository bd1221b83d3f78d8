pub mod error;
pub mod payload;
pub mod poller;
pub mod publish;
pub mod traits;

pub use error::{PollerError, Result};
pub use payload::build_snapshot;
pub use poller::{CyclePhase, CycleReport, Poller};
pub use publish::SnapshotWriter;
pub use traits::{AlertSource, DiscussionSource};
