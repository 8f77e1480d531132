//! Состояние и параметры wander-контроллера.

use bevy::prelude::*;
use rand::Rng;
use serde::{Deserialize, Serialize};

use crate::components::Agent;

/// Состояние wander-цикла Idle → Rotating → Moving → Idle.
///
/// Каждый вариант несёт только валидные в нём поля: у Idle нет ни цели,
/// ни поворотов, у Moving — только цель. Целевой поворот пересчитывается
/// на каждом переходе Idle → Rotating.
#[derive(Component, Debug, Clone, Copy, Default, PartialEq, Reflect)]
#[reflect(Component)]
pub enum WanderState {
    /// Ожидание запланированного retarget (или вырожденного региона)
    #[default]
    Idle,
    /// Доворот к свежевыбранной цели перед движением
    Rotating {
        /// Точка, к которой пойдём после доворота
        target: Vec3,
        /// Поворот на момент retarget — начало интерполяции
        initial_rotation: Quat,
        /// Поворот "лицом к цели"
        target_rotation: Quat,
        /// Simulated time начала фазы, секунды
        started_at: f64,
    },
    /// Движение к цели неперелетающим шагом
    Moving { target: Vec3 },
}

/// Параметры wanderer.
#[derive(Component, Debug, Clone, Copy, PartialEq, Reflect, Serialize, Deserialize)]
#[reflect(Component)]
#[require(WanderState, Agent)]
pub struct Wanderer {
    /// Скорость движения, юниты/с. Default: 18.0
    pub move_speed: f32,
    /// Нижняя граница паузы перед retarget, секунды. Default: 4.4
    pub min_retarget_interval: f32,
    /// Верхняя граница паузы перед retarget, секунды. Default: 6.2
    pub max_retarget_interval: f32,
    /// Длительность интерполяции поворота, секунды. Default: 0.6
    pub rotation_time: f32,
    /// Пауза между концом поворота и началом движения, секунды. Default: 0.3
    pub post_rotation_wait_time: f32,
}

impl Default for Wanderer {
    fn default() -> Self {
        Self {
            move_speed: 18.0,
            min_retarget_interval: 4.4,
            max_retarget_interval: 6.2,
            rotation_time: 0.6,
            post_rotation_wait_time: 0.3,
        }
    }
}

impl Wanderer {
    /// Полная длительность фазы Rotating: доворот плюс пауза после него
    pub fn rotation_phase_duration(&self) -> f32 {
        self.rotation_time + self.post_rotation_wait_time
    }

    /// Равномерная пауза из [min, max]; перепутанные границы упорядочиваются
    pub fn sample_retarget_interval(&self, rng: &mut impl Rng) -> f32 {
        let lo = self.min_retarget_interval.min(self.max_retarget_interval);
        let hi = self.min_retarget_interval.max(self.max_retarget_interval);
        rng.gen_range(lo..=hi)
    }
}
