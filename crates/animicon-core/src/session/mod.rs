//! Session domain module.
//!
//! # Module Structure
//!
//! - `phase`: Discrete session stages (`Phase`)
//! - `state`: The session record and its transitions (`SessionState`, `ErrorMessage`)
//! - `outcome`: What an intent resulted in (`IntentOutcome`, `Rejection`)
//! - `flash`: Self-clearing copy acknowledgment timer (`ClipboardFlash`)
//! - `controller`: The state machine driving one session (`SessionController`)
//!
//! # Usage
//!
//! ```ignore
//! use animicon_core::session::{SessionController, IntentOutcome, Phase};
//!
//! let controller = SessionController::with_backend(backend, clipboard, saver);
//! if let IntentOutcome::Applied(Phase::SuggestionsReady) =
//!     controller.request_suggestions("a rocket launching").await
//! {
//!     let state = controller.snapshot();
//!     controller
//!         .request_artifact(&state.icon_description, &state.suggestions[0])
//!         .await;
//! }
//! ```

mod controller;
mod flash;
mod outcome;
mod phase;
mod state;

// Re-export public API
pub use controller::{SessionController, SessionWatcher};
pub use flash::{CLIPBOARD_FLASH_DURATION, ClipboardFlash, FlashTicket};
pub use outcome::{IntentOutcome, Rejection};
pub use phase::Phase;
pub use state::{ErrorMessage, SessionState};
