//! Option resolution for file handles.
//!
//! Every file variant contributes a mapping of default options. Resolution
//! starts from the most general variant and lets each more specific one
//! override matching keys, then applies the user's [`Settings`] options,
//! and finally any per-call overrides. See [`Layered`].

pub mod error;
mod layered;
mod settings;

pub use crate::layered::{Layered, Options, options};
pub use crate::settings::Settings;
pub use figment::value::Value;
