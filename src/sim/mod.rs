pub mod draw;
pub mod event;
pub mod field;
pub mod game;
pub mod level;
pub mod save;
pub mod scene;
pub mod session;
pub mod step;
pub mod surface;
