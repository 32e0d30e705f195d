//! Confirmation export (summary, plain text, JSON, print).

mod confirmation;

pub use confirmation::*;
