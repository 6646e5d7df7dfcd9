pub mod dispatch;
pub mod geometry;
pub mod layout;
pub mod registry;
pub mod scene;
pub mod screens;
pub mod text;
pub mod theme;
