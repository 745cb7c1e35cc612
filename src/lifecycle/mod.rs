//! Wiring and process-level setup.
//!
//! - [`Takeout`] - owns one transport and one store and hands out
//!   [`Resource`](crate::resource::Resource)s that share them
//! - [`takeout`] - one-call factory with the default wiring
//! - [`setup_tracing`] - initializes the tracing/logging infrastructure

pub mod system;
pub mod tracing;

pub use self::system::*;
pub use self::tracing::*;
