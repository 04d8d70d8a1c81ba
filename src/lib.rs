pub mod config;
pub mod engine;
pub mod error;
pub mod game_loop;
pub mod grid;
pub mod input;
pub mod item;
pub mod placement;
pub mod renderer;
pub mod snake;
pub mod terminal_runtime;
