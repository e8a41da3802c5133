//! Service core: lifecycle, worker loop and shutdown coordination.
//!
//! The public API from this module is [`Service`] (with [`ServiceBuilder`] and
//! [`ServiceState`]) and the process-level signal helper.
//!
//! Internal modules:
//! - [`guard`]: single-fire stop signal and the state lock;
//! - [`worker`]: the background loop spawned by `run`;
//! - [`service`]: `init` / `run` / `stop` and drain;
//! - [`builder`]: optional settings (config, shared bus, parent token);
//! - [`signals`]: cross-platform termination signal handling.

mod builder;
mod guard;
mod service;
mod signals;
mod worker;

pub use builder::ServiceBuilder;
pub use service::{Service, ServiceState};
pub use signals::{TerminationSignal, wait_for_shutdown_signal};
