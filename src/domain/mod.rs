pub mod character;
pub mod command;
pub mod snapshot;
pub mod wire;
