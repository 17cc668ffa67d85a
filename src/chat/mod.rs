//! Chat streaming relay

pub mod relay;

pub use relay::{run, ChatEvent, ChatRelay, RelayState};
