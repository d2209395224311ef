//! The installation executor and its value types.
//!
//! The flow is: the caller validates raw input with
//! [`validate`](crate::validate), then hands the request to
//! [`execute`](crate::execute), which runs the package manager as a child
//! process and produces exactly one [`InstallOutcome`]. Liveness arrives
//! through the progress callback; cancellation goes the other way through a
//! [`CancelToken`].

mod cancel;
mod command;
mod executor;
mod outcome;
mod progress;

pub use cancel::CancelToken;
pub use executor::execute;
pub use outcome::{FailureReason, InstallOutcome};
pub use progress::InstallProgress;
