pub mod client;
pub mod entry;
pub mod gate;
pub mod navigator;
