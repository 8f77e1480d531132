//! Маршрут патруля: упорядоченный замкнутый список путевых точек.
//!
//! Первичный конструктор — явный упорядоченный список. Импорт из размеченных
//! точек ("Patrol Point (N)") — одноразовая миграционная утилита с жёсткой
//! валидацией: индексы обязаны образовывать плотную перестановку 0..N-1,
//! коллизии и дыры — ошибка конфигурации, не молчаливая перезапись.

use bevy::prelude::*;
use thiserror::Error;

/// Префикс метки путевой точки; за ним индекс и закрывающая скобка
pub const POINT_LABEL_PREFIX: &str = "Patrol Point (";

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum RouteError {
    /// Метка не соответствует конвенции "Patrol Point (N)"
    #[error("point label {label:?} does not follow the \"Patrol Point (N)\" convention")]
    UnparsableLabel { label: String },
    /// Два источника претендуют на один слот маршрута
    #[error("duplicate patrol point index {index}")]
    DuplicateIndex { index: usize },
    /// Индекс за пределами плотного диапазона 0..count
    #[error("patrol point index {index} out of range for {count} point(s)")]
    IndexOutOfRange { index: usize, count: usize },
}

/// Индекс, зашитый в метку точки: текст между префиксом и первой ')'
fn parse_point_label(label: &str) -> Option<usize> {
    let rest = label.strip_prefix(POINT_LABEL_PREFIX)?;
    let digits = rest.split(')').next()?;
    digits.trim().parse().ok()
}

/// Неизменяемая последовательность путевых точек, обход по кольцу.
#[derive(Debug, Clone, Default, PartialEq, Reflect)]
pub struct PatrolRoute {
    points: Vec<Vec3>,
}

impl PatrolRoute {
    /// Явный упорядоченный список — основной способ задать маршрут
    pub fn new(points: Vec<Vec3>) -> Self {
        Self { points }
    }

    pub fn empty() -> Self {
        Self::default()
    }

    pub fn len(&self) -> usize {
        self.points.len()
    }

    pub fn is_empty(&self) -> bool {
        self.points.is_empty()
    }

    pub fn point(&self, index: usize) -> Option<Vec3> {
        self.points.get(index).copied()
    }

    pub fn points(&self) -> &[Vec3] {
        &self.points
    }

    /// Импорт из неупорядоченного набора размеченных точек (миграция со
    /// сценовой конвенции). Каждая метка несёт слот; валидируем плотность.
    pub fn from_labeled_points<'a, I>(labeled: I) -> Result<Self, RouteError>
    where
        I: IntoIterator<Item = (&'a str, Vec3)>,
    {
        let labeled: Vec<(&str, Vec3)> = labeled.into_iter().collect();
        let count = labeled.len();
        let mut slots: Vec<Option<Vec3>> = vec![None; count];

        for (label, position) in labeled {
            let index = parse_point_label(label).ok_or_else(|| RouteError::UnparsableLabel {
                label: label.to_string(),
            })?;
            if index >= count {
                return Err(RouteError::IndexOutOfRange { index, count });
            }
            if slots[index].is_some() {
                return Err(RouteError::DuplicateIndex { index });
            }
            slots[index] = Some(position);
        }

        // count меток, все в диапазоне, без дублей — слоты заполнены плотно
        Ok(Self {
            points: slots.into_iter().flatten().collect(),
        })
    }
}
