// Command module - Front-end command surface
//
// Line commands are parsed into `Command`, executed against the session
// manager, and answered with JSON values.

pub mod dispatch;
pub mod parser;
pub mod types;

pub use dispatch::{DispatchError, Reply, execute, list_chords, list_patterns};
pub use parser::{Command, CommandError};
pub use types::{PlayRequest, PlayResponse, RobotStateResponse, StopResponse, TempoResponse};
