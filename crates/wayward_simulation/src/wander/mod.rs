//! Wander-контроллер: Idle → Rotating → Moving → Idle.
//!
//! Хореография "сначала довернись, потом иди": retarget выбирает точку из
//! региона и запускает интерполяцию поворота; запланированный BeginMoving
//! закрывает её точным целевым поворотом и отпускает агента в путь;
//! прибытие разыгрывает паузу до следующего retarget.

pub mod components;
pub mod systems;

pub use components::{WanderState, Wanderer};
pub use systems::{activate_wanderers, wander_movement, wander_rotation, wander_timer_transitions};

use bevy::prelude::*;

use crate::SimulationSet;

pub struct WanderPlugin;

impl Plugin for WanderPlugin {
    fn build(&self, app: &mut App) {
        app.add_systems(
            FixedUpdate,
            (
                activate_wanderers,
                wander_timer_transitions,
                wander_rotation,
                wander_movement,
            )
                .chain()
                .in_set(SimulationSet::Controllers),
        );
    }
}
