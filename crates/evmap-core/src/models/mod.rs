//! Shared data models for availability detection

mod chargepoint;
mod location;
mod status;

pub use chargepoint::*;
pub use location::*;
pub use status::*;
