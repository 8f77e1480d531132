//! Базовые компоненты агента.

use bevy::prelude::*;

/// Агент: entity с позицией и ориентацией.
///
/// Инвариант: трансформом агента за тик владеет ровно один контроллер
/// (локомоция, патруль или wander) — никаких конкурирующих записей.
#[derive(Component, Debug, Clone, Copy, Default, Reflect)]
#[reflect(Component)]
#[require(Transform, ModelVisibility)]
pub struct Agent;

/// Видимость визуального представления агента.
///
/// Ядро ничего не рендерит: флаг переключается lifecycle-логикой и читается
/// внешним визуальным слоем.
#[derive(Component, Debug, Clone, Copy, PartialEq, Eq, Reflect)]
#[reflect(Component)]
pub struct ModelVisibility {
    pub visible: bool,
}

impl Default for ModelVisibility {
    fn default() -> Self {
        Self { visible: true }
    }
}

/// Маркер: агент мёртв. Контроллеры движения пропускают таких агентов,
/// снимается при возрождении.
#[derive(Component, Debug, Clone, Copy, Default, Reflect)]
#[reflect(Component)]
pub struct Dead;
