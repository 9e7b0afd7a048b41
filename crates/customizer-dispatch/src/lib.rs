//! Update dispatcher for the customizer.
//!
//! Persists setting changes to the remote endpoint one request at a time,
//! collapsing identical submissions, retrying transient failures with
//! exponential backoff and holding the queue while the host is hidden or
//! offline.
//!
//! ```rust,no_run
//! use customizer_dispatch::{Dispatcher, HttpTransport, Priority};
//! use customizer_config::EndpointConfig;
//! use serde_json::json;
//!
//! # async fn run() -> Result<(), customizer_common::DispatchError> {
//! let transport = HttpTransport::from_config(&EndpointConfig::default())?;
//! let dispatcher = Dispatcher::new(transport);
//! let saved = dispatcher
//!     .submit("save_setting", json!({"accent_color": "#0af"}), Priority::Normal)
//!     .await?;
//! println!("{saved}");
//! # Ok(())
//! # }
//! ```

pub mod dispatcher;
pub mod history;
pub mod request;
pub mod transport;

pub use dispatcher::{Dispatcher, DispatcherBuilder, DispatcherOptions, HostSignal};
pub use history::{DispatchStats, History, Outcome};
pub use request::{Priority, RequestIdentity, RequestStatus, UpdateRequest, UpdateTicket};
pub use transport::{Envelope, HttpTransport, Transport, WireError, WireResponse};
