//! Write flows started from the modal's tabs.
//!
//! Every workflow writes through the backend only. Flows whose result other
//! tabs depend on report success back to the modal, which invalidates the
//! session instead of patching the snapshot.

pub mod ban;
pub mod notes;
pub mod revoke;
pub mod whitelist;

pub use ban::{BAN_DURATIONS, BanForm};
pub use notes::NotesBox;
pub use revoke::{RevokeAction, revoke_permission};
pub use whitelist::WhitelistToggle;
