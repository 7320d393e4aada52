pub mod ai;
pub mod entity;
pub mod geometry;
pub mod input;
pub mod level;
pub mod menu;
pub mod movement;
pub mod physics;
pub mod tile;
pub mod viewport;
