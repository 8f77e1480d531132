//! Движение: направленные намерения, моментум, общие примитивы перемещения.

use bevy::prelude::*;
use serde::{Deserialize, Serialize};

use super::agent::Agent;
use crate::lifecycle::RespawnPolicy;

/// Порог прибытия к цели, мировые юниты.
///
/// Сравнение позиций на точное равенство после инкрементального движения
/// ненадёжно: клампированный шаг может лечь в суб-эпсилонной близости от
/// цели и никогда не совпасть бит-в-бит. Tunable: миллиметровый масштаб при
/// мире в десятки юнитов — сильно меньше одного шага на эталонных скоростях.
pub const ARRIVAL_EPSILON: f32 = 1e-3;

/// Прибытие: расстояние до цели не превышает ARRIVAL_EPSILON
pub fn has_arrived(position: Vec3, target: Vec3) -> bool {
    position.distance_squared(target) <= ARRIVAL_EPSILON * ARRIVAL_EPSILON
}

/// Шаг к цели без перелёта: не дальше max_step, точно в цель если ближе
pub fn seek_toward(position: Vec3, target: Vec3, max_step: f32) -> Vec3 {
    let to_target = target - position;
    let distance = to_target.length();
    if distance <= max_step.max(0.0) || distance <= f32::EPSILON {
        target
    } else {
        position + to_target / distance * max_step
    }
}

/// Намерение по продольной оси. Вперёд/назад взаимоисключающи по построению.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Reflect)]
pub enum LongitudinalIntent {
    #[default]
    None,
    Forward,
    Backward,
}

impl LongitudinalIntent {
    /// Знак намерения: +1 вперёд, -1 назад, 0 без ввода
    pub fn sign(self) -> f32 {
        match self {
            LongitudinalIntent::None => 0.0,
            LongitudinalIntent::Forward => 1.0,
            LongitudinalIntent::Backward => -1.0,
        }
    }
}

/// Намерение по поперечной оси. Вправо/влево взаимоисключающи по построению.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Reflect)]
pub enum LateralIntent {
    #[default]
    None,
    Right,
    Left,
}

impl LateralIntent {
    /// Знак намерения: +1 вправо, -1 влево, 0 без ввода
    pub fn sign(self) -> f32 {
        match self {
            LateralIntent::None => 0.0,
            LateralIntent::Right => 1.0,
            LateralIntent::Left => -1.0,
        }
    }
}

/// Направленное намерение игрока на текущий тик.
///
/// Абстракция над вводом: embedding-слой маппит клавиши/оси сюда, ядро
/// ввода не знает.
#[derive(Component, Debug, Clone, Copy, Default, PartialEq, Eq, Reflect)]
#[reflect(Component)]
pub struct MoveIntent {
    pub longitudinal: LongitudinalIntent,
    pub lateral: LateralIntent,
}

impl MoveIntent {
    pub const NONE: Self = Self {
        longitudinal: LongitudinalIntent::None,
        lateral: LateralIntent::None,
    };

    pub fn forward() -> Self {
        Self {
            longitudinal: LongitudinalIntent::Forward,
            ..Self::NONE
        }
    }

    pub fn backward() -> Self {
        Self {
            longitudinal: LongitudinalIntent::Backward,
            ..Self::NONE
        }
    }

    pub fn right() -> Self {
        Self {
            lateral: LateralIntent::Right,
            ..Self::NONE
        }
    }

    pub fn left() -> Self {
        Self {
            lateral: LateralIntent::Left,
            ..Self::NONE
        }
    }
}

/// Моментум игрока: скорость по двум осям, Y не участвует.
///
/// Инвариант: |каждая ось| ≤ MomentumController::move_speed — stepper
/// клампит и не даёт перелетать ни ноль, ни предел.
#[derive(Component, Debug, Clone, Copy, Default, PartialEq, Reflect)]
#[reflect(Component)]
pub struct Momentum {
    /// Вперёд/назад, + = вперёд
    pub longitudinal: f32,
    /// Вправо/влево, + = вправо
    pub lateral: f32,
}

impl Momentum {
    pub fn is_zero(&self) -> bool {
        self.longitudinal == 0.0 && self.lateral == 0.0
    }

    /// Скорость в world-space (bevy: forward = -Z, right = +X)
    pub fn world_velocity(&self) -> Vec3 {
        Vec3::new(self.lateral, 0.0, -self.longitudinal)
    }
}

/// Параметры momentum-локомоции игрока.
///
/// Асимметрия зашита в три темпа: разгон, затухание без ввода и торможение
/// против текущего движения (reverse) — останов с разворотом резче разгона.
#[derive(Component, Debug, Clone, Copy, PartialEq, Reflect, Serialize, Deserialize)]
#[reflect(Component)]
#[require(Momentum, MoveIntent, Agent, RespawnPolicy)]
pub struct MomentumController {
    /// Предельная скорость по каждой оси, юниты/с
    pub move_speed: f32,
    /// Время разгона 0 → move_speed, секунды
    pub time_to_max_speed: f32,
    /// Время затухания move_speed → 0 без ввода, секунды
    pub time_to_lose_max_speed: f32,
    /// Множитель темпа торможения при вводе против текущего движения
    pub reverse_momentum_multiplier: f32,
}

impl Default for MomentumController {
    fn default() -> Self {
        Self {
            move_speed: 24.0,
            time_to_max_speed: 0.26,
            time_to_lose_max_speed: 0.2,
            reverse_momentum_multiplier: 2.2,
        }
    }
}

impl MomentumController {
    /// Темп разгона, юниты/с²
    pub fn velocity_gain_per_second(&self) -> f32 {
        self.move_speed / self.time_to_max_speed
    }

    /// Темп затухания без ввода, юниты/с²
    pub fn velocity_loss_per_second(&self) -> f32 {
        self.move_speed / self.time_to_lose_max_speed
    }
}
