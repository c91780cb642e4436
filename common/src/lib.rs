//! Models shared between the document factory backend and any client that drives it.

pub mod model;
pub mod requests;
