//! Патрульный контроллер: обход замкнутого маршрута.
//!
//! Каждый тик: неперелетающий шаг к текущей точке, по эпсилон-прибытии —
//! следующая по кольцу. Пока не прибыли — доворот лица к точке.
//! Пустой маршрут — перманентный idle, тик остаётся no-op.

pub mod route;

pub use route::{PatrolRoute, RouteError, POINT_LABEL_PREFIX};

use bevy::prelude::*;

use crate::components::{has_arrived, seek_toward, Agent, Dead};
use crate::logger;
use crate::orientation::{look_rotation, slerp_toward, RotationSmoothing};
use crate::SimulationSet;

/// Доля доворота к направлению на точку за тик @ 60 Гц
const ROUTE_FACING_SMOOTHING: RotationSmoothing = RotationSmoothing::new(0.68);

/// Агент, обходящий маршрут по кольцу.
#[derive(Component, Debug, Clone, Reflect)]
#[reflect(Component)]
#[require(Agent)]
pub struct Patroller {
    /// Скорость движения, юниты/с
    pub move_speed: f32,
    route: PatrolRoute,
    current_index: usize,
}

impl Patroller {
    pub const DEFAULT_MOVE_SPEED: f32 = 30.0;

    /// Обход начинается с точки 0
    pub fn new(route: PatrolRoute) -> Self {
        Self {
            move_speed: Self::DEFAULT_MOVE_SPEED,
            route,
            current_index: 0,
        }
    }

    pub fn with_move_speed(mut self, move_speed: f32) -> Self {
        self.move_speed = move_speed;
        self
    }

    /// Импорт из размеченных точек. Ошибка конфигурации логируется, контроллер
    /// получает пустой маршрут и остаётся idle — не паникует посреди спавна.
    pub fn from_labeled_points<'a, I>(labeled: I) -> Self
    where
        I: IntoIterator<Item = (&'a str, Vec3)>,
    {
        match PatrolRoute::from_labeled_points(labeled) {
            Ok(route) => Self::new(route),
            Err(error) => {
                logger::log_warning(&format!(
                    "patrol route rejected: {error}; controller stays idle"
                ));
                Self::new(PatrolRoute::empty())
            }
        }
    }

    /// Текущая цель; None на пустом маршруте
    pub fn current_waypoint(&self) -> Option<Vec3> {
        self.route.point(self.current_index)
    }

    pub fn current_index(&self) -> usize {
        self.current_index
    }

    pub fn route(&self) -> &PatrolRoute {
        &self.route
    }

    fn advance_waypoint(&mut self) {
        if !self.route.is_empty() {
            self.current_index = (self.current_index + 1) % self.route.len();
        }
    }
}

/// Система: шаг патруля. Прибытие по эпсилону, кольцевой переход на
/// следующую точку тем же тиком, иначе доворот к цели.
pub fn patrol_step(
    time: Res<Time<Fixed>>,
    mut patrollers: Query<(&mut Patroller, &mut Transform), Without<Dead>>,
) {
    let dt = time.delta_secs();
    for (mut patroller, mut transform) in patrollers.iter_mut() {
        let Some(waypoint) = patroller.current_waypoint() else {
            continue;
        };

        transform.translation =
            seek_toward(transform.translation, waypoint, patroller.move_speed * dt);

        if has_arrived(transform.translation, waypoint) {
            patroller.advance_waypoint();
        } else if let Some(target) = look_rotation(waypoint - transform.translation) {
            transform.rotation =
                slerp_toward(transform.rotation, target, ROUTE_FACING_SMOOTHING.factor(dt));
        }
    }
}

pub struct PatrolPlugin;

impl Plugin for PatrolPlugin {
    fn build(&self, app: &mut App) {
        app.add_systems(FixedUpdate, patrol_step.in_set(SimulationSet::Controllers));
    }
}
