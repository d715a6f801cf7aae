//! Move reasons: what they are, the objects they refer to, and the API
//! analysers use to register them.

mod api;
mod describe;
pub mod error;
pub mod kind;
pub mod record;
pub mod registry;
pub mod replacement;

pub use error::ReasonError;
pub use kind::{
    ConnectionId, DragonId, EyeId, ReasonKind, Subject, SubjectClass, WormId, WormPairId,
};
pub use record::{MoveRecord, Reason, ReasonId, Redundancy, HUGE_MOVE_VALUE};
pub use registry::{Capacities, Lunch, Registry};
pub use replacement::ReplacementMap;
