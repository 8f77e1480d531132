//! Шов между контроллерами и средой: "переместиться с учётом мира".
//!
//! Ядро не симулирует коллизии. Контроллер предлагает displacement, среда
//! возвращает фактически применимый. По умолчанию мир пуст и перемещение
//! проходит как есть; embedding-слой подставляет свой resolver.

use bevy::prelude::*;

/// Разрешение перемещения средой
pub trait MoveResolver: Send + Sync {
    /// Фактический displacement из позиции from при желаемом desired
    fn resolve(&self, from: Vec3, desired: Vec3) -> Vec3;
}

/// Мир без препятствий: displacement применяется без изменений
#[derive(Debug, Default, Clone, Copy)]
pub struct Unobstructed;

impl MoveResolver for Unobstructed {
    fn resolve(&self, _from: Vec3, desired: Vec3) -> Vec3 {
        desired
    }
}

/// Мир-коробка: конечная позиция зажимается в AABB-границы
#[derive(Debug, Clone, Copy)]
pub struct AabbBounds {
    pub min: Vec3,
    pub max: Vec3,
}

impl MoveResolver for AabbBounds {
    fn resolve(&self, from: Vec3, desired: Vec3) -> Vec3 {
        (from + desired).clamp(self.min, self.max) - from
    }
}

/// Текущая среда симуляции
#[derive(Resource)]
pub struct Environment {
    pub resolver: Box<dyn MoveResolver>,
}

impl Default for Environment {
    fn default() -> Self {
        Self::new(Unobstructed)
    }
}

impl Environment {
    pub fn new(resolver: impl MoveResolver + 'static) -> Self {
        Self {
            resolver: Box::new(resolver),
        }
    }

    pub fn resolve(&self, from: Vec3, desired: Vec3) -> Vec3 {
        self.resolver.resolve(from, desired)
    }
}
