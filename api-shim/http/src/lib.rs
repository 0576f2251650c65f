//! The HTTP surface of the API shim.
//!
//! Requests are decoded into payloads, served by handlers through the
//! cluster repositories, and rendered by presenters into the v3 wire format.

#![deny(rust_2018_idioms)]
#![forbid(unsafe_code)]

pub mod actions;
pub mod error;
mod handlers;
pub mod payloads;
pub mod presenters;
mod router;

pub use self::{
    error::ApiError,
    handlers::{ApiState, Authorization, HandlerConfig},
    router::router,
};
