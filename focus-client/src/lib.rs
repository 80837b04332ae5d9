mod client;
pub mod domain;
mod error;

pub use client::*;
pub use domain::*;
pub use error::*;
