mod channel;
mod protocol;
#[cfg(test)]
pub(crate) mod scripted;

pub use channel::{HardwareChannel, LinkState};
