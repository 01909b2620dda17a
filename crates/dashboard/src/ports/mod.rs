//! Dashboard port definitions.

pub mod outbound;
