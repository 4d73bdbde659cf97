mod listener;

pub use listener::{start_listener, ListenerHandle, SignalForwarder};
