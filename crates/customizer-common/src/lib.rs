pub mod errors;
pub mod events;
pub mod id;
pub mod value;

pub use errors::{ConfigError, CustomizerError, DispatchError};
pub use events::{now_millis, Event, EventBus};
pub use id::RequestId;
pub use value::SettingValue;

pub type Result<T> = std::result::Result<T, CustomizerError>;
