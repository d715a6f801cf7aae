//! Tesuji move review library.
//!
//! Collects the reasons other analysers find for playing each point,
//! induces further reasons, checks move safety, values every point and
//! selects the move to play. The analysers themselves sit behind the
//! traits in [`oracle`]; [`sandbox`] provides a scripted implementation
//! used by the tests, the `review` binary and the benchmark.

pub mod board;
pub mod config;
pub mod eval;
mod induce;
pub mod oracle;
pub mod reasons;
pub mod safety;
pub mod sandbox;
pub mod select;
pub mod session;

pub use board::{BoardSize, Color, Outcome, Point, PointSet, Safety, Status};
pub use config::{ConfigError, ReviewConfig};
pub use oracle::Oracle;
pub use reasons::{ReasonError, ReasonKind};
pub use sandbox::{Sandbox, Scenario, ScenarioError};
pub use select::Decision;
pub use session::Session;
