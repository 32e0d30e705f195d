//! Domain models for the wellness booking wizard.

mod booking;
mod consultation;
mod practitioner;
mod selection;

pub use booking::*;
pub use consultation::*;
pub use practitioner::*;
pub use selection::*;
