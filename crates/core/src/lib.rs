pub mod error;
pub mod format;
pub mod history;
pub mod modal;
pub mod perms;
pub mod session;
pub mod tabs;
pub mod workflows;

pub use error::{DispatchError, ValidationError};
pub use history::{ActionTally, CounterBadge, Severity};
pub use modal::{ModalEvent, ModalOptions, PlayerModal};
pub use perms::{AdminPerms, Capabilities};
pub use session::{ModalSession, Phase};
pub use tabs::{Tab, TabRouter};

#[cfg(any(test, feature = "testing"))]
pub mod testing;
