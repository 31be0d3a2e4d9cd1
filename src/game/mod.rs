pub mod bot;
pub mod collision;
pub mod config;
pub mod constants;
pub mod input;
pub mod math;
pub mod physics;
pub mod room;
pub mod snake;
pub mod types;
pub mod view;
pub mod world;
