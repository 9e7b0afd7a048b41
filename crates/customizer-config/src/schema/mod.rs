//! Configuration schema types for the customizer.
//!
//! All structs use `serde(default)` so partial configs work correctly.
//! Missing fields are filled with the defaults the dispatcher and the
//! render pipeline were tuned against.

mod dispatch;
mod endpoint;
mod logging;
mod render;

pub use dispatch::*;
pub use endpoint::*;
pub use logging::*;
pub use render::*;

use serde::{Deserialize, Serialize};

/// Current config schema version.
pub const CONFIG_SCHEMA_VERSION: u32 = 1;

/// Root configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
#[derive(Default)]
pub struct CustomizerConfig {
    pub endpoint: EndpointConfig,
    pub dispatch: DispatchConfig,
    pub render: RenderConfig,
    pub logging: LoggingConfig,
}
