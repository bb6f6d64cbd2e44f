//! Host side of the Helping Hand rehabilitation game.
//!
//! Hand units send one command byte per line; [`session::GameSession`] turns
//! them into moves on an obstacle field and answers with a [`protocol::Response`].

pub mod actor;
pub mod config;
pub mod error;
pub mod field;
pub mod link;
pub mod protocol;
pub mod session;

pub use actor::{Actor, ActorId, Control, NextMove};
pub use config::Settings;
pub use error::{ConfigError, DecodeError, PlacementError, SampleError};
pub use field::{ObstacleField, Rect};
pub use protocol::{Command, Direction, MenuCommand, Response, Sample};
pub use session::{GameSession, Input, Outcome, Phase, Players, SessionEvent, TickReport};
