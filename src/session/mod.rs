//! Interactive session: the state machine and the widgets it drives.

pub mod confirm;
pub mod controller;
pub mod editor;
pub mod selector;
pub mod state;
pub mod worker;

pub use confirm::ConfirmationGate;
pub use controller::{Session, prepare};
pub use editor::Editor;
pub use selector::{Direction, Selector};
pub use state::{Effect, Epoch, Intent, SessionState};
pub use worker::{GenerationOutcome, GenerationWorker};
