//! Momentum-локомоция игрока.
//!
//! Архитектура:
//! - advance_momentum: намерения → скорость по двум осям (чистый stepper)
//! - apply_locomotion: скорость → displacement через Environment + доворот
//!   лица к направлению движения
//! - Обе системы в FixedUpdate, chain: моментум этого тика применяется
//!   этим же тиком
//!
//! Асимметрия темпов: разгон (gain), затухание без ввода (loss) и
//! торможение против движения (gain * reverse multiplier) — независимы
//! по осям и клампятся так, что скорость не перелетает ни ноль, ни предел.

use bevy::prelude::*;

use crate::components::{Dead, Momentum, MomentumController, MoveIntent};
use crate::environment::Environment;
use crate::orientation::{look_rotation, slerp_toward, RotationSmoothing};
use crate::SimulationSet;

/// Доля доворота к направлению движения за тик @ 60 Гц
const FACING_SMOOTHING: RotationSmoothing = RotationSmoothing::new(0.18);

/// Скорость одной оси моментума через dt секунд.
///
/// Три ветки:
/// - намерение по ходу движения (или с нуля): разгон к пределу
/// - намерение против хода: торможение к нулю с reverse-множителем,
///   ноль не пересекается за один шаг
/// - без намерения: затухание к нулю
pub fn step_axis_velocity(
    velocity: f32,
    intent_sign: f32,
    controller: &MomentumController,
    dt: f32,
) -> f32 {
    let gain = controller.velocity_gain_per_second() * dt;
    let brake = gain * controller.reverse_momentum_multiplier;
    let loss = controller.velocity_loss_per_second() * dt;

    if intent_sign > 0.0 {
        if velocity >= 0.0 {
            (velocity + gain).min(controller.move_speed)
        } else {
            (velocity + brake).min(0.0)
        }
    } else if intent_sign < 0.0 {
        if velocity > 0.0 {
            (velocity - brake).max(0.0)
        } else {
            (velocity - gain).max(-controller.move_speed)
        }
    } else if velocity > 0.0 {
        (velocity - loss).max(0.0)
    } else if velocity < 0.0 {
        (velocity + loss).min(0.0)
    } else {
        0.0
    }
}

/// Система: моментум из намерений. Мёртвые агенты пропускаются.
pub fn advance_momentum(
    time: Res<Time<Fixed>>,
    mut agents: Query<(&MomentumController, &MoveIntent, &mut Momentum), Without<Dead>>,
) {
    let dt = time.delta_secs();
    for (controller, intent, mut momentum) in agents.iter_mut() {
        momentum.longitudinal =
            step_axis_velocity(momentum.longitudinal, intent.longitudinal.sign(), controller, dt);
        momentum.lateral =
            step_axis_velocity(momentum.lateral, intent.lateral.sign(), controller, dt);
    }
}

/// Система: применить моментум как перемещение через среду и довернуть
/// лицо к направлению скорости. При нулевой скорости — ни перемещения,
/// ни доворота.
pub fn apply_locomotion(
    time: Res<Time<Fixed>>,
    environment: Res<Environment>,
    mut agents: Query<(&Momentum, &mut Transform), (With<MomentumController>, Without<Dead>)>,
) {
    let dt = time.delta_secs();
    for (momentum, mut transform) in agents.iter_mut() {
        if momentum.is_zero() {
            continue;
        }

        let velocity = momentum.world_velocity();
        let applied = environment.resolve(transform.translation, velocity * dt);
        transform.translation += applied;

        // Горизонтальная скорость не бывает вертикальной, но look_rotation
        // всё равно отвечает Option — сохраняем прежний поворот на вырожденном
        if let Some(target) = look_rotation(velocity) {
            transform.rotation =
                slerp_toward(transform.rotation, target, FACING_SMOOTHING.factor(dt));
        }
    }
}

pub struct LocomotionPlugin;

impl Plugin for LocomotionPlugin {
    fn build(&self, app: &mut App) {
        app.add_systems(
            FixedUpdate,
            (advance_momentum, apply_locomotion)
                .chain()
                .in_set(SimulationSet::Controllers),
        );
    }
}
