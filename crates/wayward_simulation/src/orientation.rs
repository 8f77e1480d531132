//! Ориентация агентов: сглаживание поворота к целевому направлению.
//!
//! Архитектура:
//! - look_rotation строит поворот "смотреть вдоль направления" (forward = -Z, up = +Y)
//! - slerp_toward — один шаг сферической интерполяции к цели
//! - RotationSmoothing переводит "долю угла за тик" в time-correct фактор,
//!   чтобы угловая скорость не зависела от tick rate

use bevy::prelude::*;

/// Фактор сглаживания поворота, заданный как доля оставшегося угла за один
/// тик на опорной частоте 60 Гц.
///
/// Наивное `rotation.slerp(target, f)` раз в тик зависит от частоты: на
/// 120 Гц агент доворачивается вдвое резче. Экспоненциальная форма
/// `1 - (1 - f)^(dt * 60)` даёт ту же скорость на опорной частоте и
/// эквивалентную на любой другой.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RotationSmoothing {
    /// Доля оставшегося угла, проходимая за тик на опорной частоте, в (0, 1]
    pub per_tick_fraction: f32,
}

impl RotationSmoothing {
    /// Частота, на которой per_tick_fraction означает буквально "долю за тик"
    pub const REFERENCE_TICK_HZ: f32 = 60.0;

    pub const fn new(per_tick_fraction: f32) -> Self {
        Self { per_tick_fraction }
    }

    /// Blend-фактор для шага длиной dt секунд
    pub fn factor(&self, dt: f32) -> f32 {
        let fraction = self.per_tick_fraction.clamp(0.0, 1.0);
        if fraction >= 1.0 {
            return 1.0;
        }
        1.0 - (1.0 - fraction).powf(dt * Self::REFERENCE_TICK_HZ)
    }
}

/// Один шаг сферической интерполяции: поворот строго ближе к цели при blend > 0.
/// Blend клампится в [0, 1].
pub fn slerp_toward(current: Quat, target: Quat, blend: f32) -> Quat {
    current.slerp(target, blend.clamp(0.0, 1.0))
}

/// Поворот "смотреть вдоль direction" (up = +Y, forward = -Z).
///
/// None если направление вырождено — нулевая длина или вертикаль. Вызывающий
/// в этом случае сохраняет прежний поворот.
pub fn look_rotation(direction: Vec3) -> Option<Quat> {
    let back = -direction.try_normalize()?;
    let right = Vec3::Y.cross(back).try_normalize()?;
    let up = back.cross(right);
    Some(Quat::from_mat3(&Mat3::from_cols(right, up, back)))
}
