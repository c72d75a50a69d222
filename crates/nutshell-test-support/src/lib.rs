//! Shared test doubles for the Nutshell roll-arbitration engine.

mod channel;
mod clock;
mod prompt;
mod rng;
mod session;

pub use channel::{RecordingChannel, UnavailableChannel};
pub use clock::FixedClock;
pub use prompt::ScriptedPrompt;
pub use rng::SequenceRng;
pub use session::StaticSession;
