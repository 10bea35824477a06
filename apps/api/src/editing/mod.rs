// Inline-edit core: path grammar, copy-on-write applier, per-editor session
// state, and the in-memory store of open sessions.

pub mod applier;
pub mod error;
pub mod handlers;
pub mod node;
pub mod path;
pub mod session;
pub mod store;
