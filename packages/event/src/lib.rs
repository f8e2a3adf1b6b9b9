#![doc = include_str!("../README.md")]
#![warn(missing_docs)]

pub use error::*;
pub use event::*;
pub use listener::*;
pub use subscription::*;

#[cfg(feature = "hooks")]
pub use use_listen::*;

mod error;
mod event;
mod listener;
mod subscription;

#[cfg(feature = "hooks")]
mod use_listen;
