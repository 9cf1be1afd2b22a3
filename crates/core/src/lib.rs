pub mod error;
pub mod event;
pub mod state;

pub use error::{GaugeError, Result};
pub use event::Message;
pub use state::{Frame, HostInfo, HostState, ServerRecord, ONLINE_WINDOW_MS};
