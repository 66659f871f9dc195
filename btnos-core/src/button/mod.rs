//! Buttons: identifiers, descriptors and the registry that owns them

pub mod descriptor;
pub mod id;
pub mod registry;

pub use descriptor::{label, ButtonDescriptor, ButtonEdit, Label, LABEL_LEN};
pub use id::{AppSlot, ButtonId, TaskSlot};
pub use registry::{ButtonRegistry, Screen, ScreenKind, MAX_VISIBLE};
