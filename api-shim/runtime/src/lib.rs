#![deny(rust_2018_idioms)]
#![forbid(unsafe_code)]

mod args;
pub mod config;

pub use self::{args::Args, config::Config};
