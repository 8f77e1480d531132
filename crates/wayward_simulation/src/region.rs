//! Регион блуждания: ограниченный объём с равномерным сэмплированием точек.
//!
//! Владение регионом — снаружи ядра: компонент вешается на агента при
//! спавне (embedding-слой решает, где агенту можно блуждать), wander
//! контроллер только сэмплирует.

use bevy::prelude::*;
use rand::Rng;
use thiserror::Error;

#[derive(Debug, Clone, Copy, PartialEq, Error)]
pub enum RegionError {
    /// Нулевой/отрицательный объём или не-конечные границы — точку выбрать нельзя
    #[error("wander region is degenerate: half_extents = {half_extents:?}")]
    Degenerate { half_extents: Vec3 },
}

/// AABB-объём, из которого wanderer выбирает цели.
#[derive(Component, Debug, Clone, Copy, PartialEq, Reflect)]
#[reflect(Component)]
pub struct WanderRegion {
    pub center: Vec3,
    pub half_extents: Vec3,
}

impl Default for WanderRegion {
    fn default() -> Self {
        // Вырожден до внешней настройки: сэмплирование вернёт ошибку,
        // а не молча выдаст точку из нулевого объёма
        Self {
            center: Vec3::ZERO,
            half_extents: Vec3::ZERO,
        }
    }
}

impl WanderRegion {
    pub fn new(center: Vec3, half_extents: Vec3) -> Self {
        Self {
            center,
            half_extents,
        }
    }

    /// Регион не способен дать точку: не-конечные границы или какой-то из
    /// half extents ≤ 0
    pub fn is_degenerate(&self) -> bool {
        !self.center.is_finite()
            || !self.half_extents.is_finite()
            || self.half_extents.min_element() <= 0.0
    }

    /// Равномерная случайная точка внутри объёма
    pub fn sample_point(&self, rng: &mut impl Rng) -> Result<Vec3, RegionError> {
        if self.is_degenerate() {
            return Err(RegionError::Degenerate {
                half_extents: self.half_extents,
            });
        }
        let min = self.center - self.half_extents;
        let max = self.center + self.half_extents;
        Ok(Vec3::new(
            rng.gen_range(min.x..=max.x),
            rng.gen_range(min.y..=max.y),
            rng.gen_range(min.z..=max.z),
        ))
    }

    pub fn contains(&self, point: Vec3) -> bool {
        let offset = (point - self.center).abs();
        offset.x <= self.half_extents.x
            && offset.y <= self.half_extents.y
            && offset.z <= self.half_extents.z
    }
}
