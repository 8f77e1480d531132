//! Системы wander-цикла.
//!
//! Переходы двигаются двумя путями:
//! - по времени внутри тика (Rotating-прогресс, Moving-шаг)
//! - по событиям очереди таймеров (Retarget, BeginMoving), прочитанным
//!   в том же тике, в котором они созрели
//!
//! Вся случайность — через DeterministicRng; системы цепочкой, порядок
//! розыгрышей стабилен между прогонами.

use bevy::prelude::*;
use rand::Rng;

use crate::components::{has_arrived, seek_toward, Dead};
use crate::logger;
use crate::orientation::look_rotation;
use crate::region::WanderRegion;
use crate::scheduler::{TimerAction, TimerFired, TimerQueue};
use crate::DeterministicRng;

use super::{WanderState, Wanderer};

/// Idle → Rotating: выбрать цель, зафиксировать повороты, поставить таймер
/// конца фазы. Вырожденный регион оставляет агента Idle без таймера.
fn try_retarget(
    entity: Entity,
    wanderer: &Wanderer,
    region: Option<&WanderRegion>,
    transform: &Transform,
    state: &mut WanderState,
    rng: &mut impl Rng,
    queue: &mut TimerQueue,
) {
    let Some(region) = region else {
        logger::log_warning(&format!("wanderer {entity:?} has no region; staying idle"));
        *state = WanderState::Idle;
        return;
    };

    let target = match region.sample_point(rng) {
        Ok(point) => point,
        Err(error) => {
            // Без retry-цикла: Idle без запланированного retarget, пока регион
            // не починят снаружи.
            // TODO: переход по событию реактивации региона — сейчас такой агент
            // остаётся Idle до конца прогона
            logger::log_warning(&format!("wanderer {entity:?} retarget failed: {error}"));
            *state = WanderState::Idle;
            return;
        }
    };

    let initial_rotation = transform.rotation;
    // Цель совпала с позицией — направление вырождено, целимся прежним поворотом
    let target_rotation =
        look_rotation(target - transform.translation).unwrap_or(initial_rotation);

    *state = WanderState::Rotating {
        target,
        initial_rotation,
        target_rotation,
        started_at: queue.now(),
    };
    queue.schedule(
        entity,
        wanderer.rotation_phase_duration(),
        TimerAction::BeginMoving,
    );
}

/// Система: свежезаспавненный wanderer сразу начинает цикл с retarget
pub fn activate_wanderers(
    mut queue: ResMut<TimerQueue>,
    mut rng: ResMut<DeterministicRng>,
    mut fresh: Query<
        (
            Entity,
            &Wanderer,
            Option<&WanderRegion>,
            &Transform,
            &mut WanderState,
        ),
        (Added<Wanderer>, Without<Dead>),
    >,
) {
    for (entity, wanderer, region, transform, mut state) in fresh.iter_mut() {
        try_retarget(
            entity,
            wanderer,
            region,
            transform,
            &mut state,
            &mut rng.rng,
            &mut queue,
        );
    }
}

/// Система: переходы по событиям очереди.
///
/// BeginMoving закрывает фазу поворота точным попаданием в целевой поворот —
/// никакой остаточной ошибки интерполяции. BeginMoving вне Rotating —
/// нарушение инварианта: громко в dev, безопасный откат в Idle в release.
pub fn wander_timer_transitions(
    mut fired: EventReader<TimerFired>,
    mut queue: ResMut<TimerQueue>,
    mut rng: ResMut<DeterministicRng>,
    mut wanderers: Query<
        (
            &Wanderer,
            Option<&WanderRegion>,
            &mut Transform,
            &mut WanderState,
        ),
        Without<Dead>,
    >,
) {
    for event in fired.read() {
        let Ok((wanderer, region, mut transform, mut state)) = wanderers.get_mut(event.owner)
        else {
            continue; // событие чужого контроллера (respawn игрока и т.п.)
        };

        match event.action {
            TimerAction::Retarget => {
                try_retarget(
                    event.owner,
                    wanderer,
                    region,
                    &transform,
                    &mut state,
                    &mut rng.rng,
                    &mut queue,
                );
            }
            TimerAction::BeginMoving => {
                let WanderState::Rotating {
                    target,
                    target_rotation,
                    ..
                } = *state
                else {
                    debug_assert!(false, "BeginMoving вне Rotating");
                    logger::log_error(&format!(
                        "wanderer {:?} got BeginMoving in state {:?}; reset to Idle",
                        event.owner, *state
                    ));
                    *state = WanderState::Idle;
                    continue;
                };

                transform.rotation = target_rotation;
                *state = WanderState::Moving { target };
            }
            TimerAction::Respawn => {}
        }
    }
}

/// Система: интерполяция поворота во время Rotating.
///
/// Прогресс — отношение прошедшего времени к rotation_time (frame-rate
/// independent), клампится в [0, 1]: между логическим концом поворота и
/// срабатыванием BeginMoving агент стоит точно в целевом повороте.
pub fn wander_rotation(
    queue: Res<TimerQueue>,
    mut wanderers: Query<(&Wanderer, &WanderState, &mut Transform), Without<Dead>>,
) {
    let now = queue.now();
    for (wanderer, state, mut transform) in wanderers.iter_mut() {
        let WanderState::Rotating {
            initial_rotation,
            target_rotation,
            started_at,
            ..
        } = *state
        else {
            continue;
        };

        let progress = if wanderer.rotation_time > 0.0 {
            (((now - started_at) / f64::from(wanderer.rotation_time)) as f32).clamp(0.0, 1.0)
        } else {
            1.0
        };
        transform.rotation = initial_rotation.slerp(target_rotation, progress);
    }
}

/// Система: движение к цели. По эпсилон-прибытии — Idle и розыгрыш паузы
/// до следующего retarget.
pub fn wander_movement(
    time: Res<Time<Fixed>>,
    mut queue: ResMut<TimerQueue>,
    mut rng: ResMut<DeterministicRng>,
    mut wanderers: Query<(Entity, &Wanderer, &mut Transform, &mut WanderState), Without<Dead>>,
) {
    let dt = time.delta_secs();
    for (entity, wanderer, mut transform, mut state) in wanderers.iter_mut() {
        let WanderState::Moving { target } = *state else {
            continue;
        };

        transform.translation =
            seek_toward(transform.translation, target, wanderer.move_speed * dt);

        if has_arrived(transform.translation, target) {
            *state = WanderState::Idle;
            let pause = wanderer.sample_retarget_interval(&mut rng.rng);
            queue.schedule(entity, pause, TimerAction::Retarget);
        }
    }
}
