/// Terminal front end: crossterm drawing and input, optional gamepad and sound.

pub mod assets;
pub mod gamepad;
pub mod input;
pub mod renderer;
pub mod sound;
