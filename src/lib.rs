//! Terminal snake with role skills, a timed food economy and an unlock shop.
//!
//! The simulation lives in [`session`]; everything under [`app`] is presentation.

pub mod app;
pub mod config;
pub mod error;
pub mod food;
pub mod grid;
pub mod input;
pub mod progress;
pub mod role;
pub mod session;
pub mod snake;
pub mod snapshot;

pub use error::{SetupError, ShopError};
pub use role::Role;
pub use session::{Input, Phase, Session, SessionSetup, TickResult};
