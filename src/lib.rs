//! Typed data containers and device records shared between an application
//! and a data acquisition driver.

mod buffer;
mod channel;
mod config;
mod data_type;
mod device;
mod element;
pub mod emulator;
mod error;
pub mod logging;
mod persist;
mod port;
mod status;

pub use buffer::*;
pub use channel::*;
pub use config::*;
pub use data_type::*;
pub use device::*;
pub use element::*;
pub use emulator::Emulator;
pub use error::*;
pub use port::*;
pub use status::*;
