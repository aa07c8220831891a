mod backend;
pub mod local;

pub use backend::{create_backend, GateBackend};
pub use local::LocalBackend;
