//! ECS-компоненты ядра: агенты и движение.

pub mod agent;
pub mod movement;

pub use agent::*;
pub use movement::*;
