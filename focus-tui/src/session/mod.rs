mod error;
mod launch;
mod messages;
mod orchestrator;
mod store;
mod timer_window;

pub use error::SessionError;
pub use messages::{format_clock, TimerCommand, TimerEvent, TimerSnapshot};
pub use orchestrator::{ModalKind, SessionOrchestrator, SessionPhase};
pub use store::{SharedStore, StoreChange, SESSION_DATA_KEY};
pub use timer_window::{TimerSettings, PANEL_HEIGHT, PANEL_WIDTH};
