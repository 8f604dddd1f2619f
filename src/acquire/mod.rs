mod coordinator;
mod sources;

pub use coordinator::Coordinator;
