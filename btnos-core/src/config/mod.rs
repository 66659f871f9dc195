//! Configuration types
//!
//! Static screen layout, app registration requests and the runtime
//! parameters apps read and modify.

pub mod install;
pub mod layout;
pub mod params;

pub use install::*;
pub use layout::*;
pub use params::*;
