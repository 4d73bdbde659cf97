mod echo_registry;

pub use echo_registry::InMemoryEchoRegistry;
