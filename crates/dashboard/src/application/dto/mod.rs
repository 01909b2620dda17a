//! Data carried between services and views.

pub mod session;

pub use session::AdminSession;
