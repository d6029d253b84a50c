// Playback module
// Rigs, the background playback driver, and the session manager that owns it

pub mod cancel;
pub mod driver;
pub mod rig;
pub mod session;
pub mod state;

pub use cancel::CancellationToken;
pub use driver::{Performance, PlaybackDriver, Stage, StopReason};
pub use rig::{DualArmRig, PlanarRig, StrumRig, rig_for};
pub use session::{SessionError, SessionManager};
pub use state::SharedPlaybackState;
