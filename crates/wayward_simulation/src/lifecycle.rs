//! Death/respawn lifecycle игрока.
//!
//! die() идемпотентен: запрос по уже мёртвому агенту — no-op, включая второй
//! запрос в том же тике. Смерть обнуляет моментум, прячет модель и глушит
//! контроллеры маркером Dead; очередь таймеров возвращает агента через
//! respawn_wait_time точно в захваченную позу спавна. Поза захватывается
//! один раз при инициализации — чекпоинтов нет.

use std::collections::HashSet;

use bevy::ecs::query::Has;
use bevy::prelude::*;
use serde::{Deserialize, Serialize};

use crate::components::{Dead, ModelVisibility, Momentum, MomentumController};
use crate::logger;
use crate::scheduler::{TimerAction, TimerFired, TimerQueue};
use crate::SimulationSet;

/// Поза спавна, к которой возвращает respawn.
#[derive(Component, Debug, Clone, Copy, PartialEq, Reflect)]
#[reflect(Component)]
pub struct SpawnPose {
    pub position: Vec3,
    pub rotation: Quat,
}

/// Параметры lifecycle.
#[derive(Component, Debug, Clone, Copy, PartialEq, Reflect, Serialize, Deserialize)]
#[reflect(Component)]
pub struct RespawnPolicy {
    /// Задержка между смертью и возрождением, секунды. Default: 2.0
    pub respawn_wait_time: f32,
}

impl Default for RespawnPolicy {
    fn default() -> Self {
        Self {
            respawn_wait_time: 2.0,
        }
    }
}

/// Запрос смерти агента. Источник снаружи ядра: урон, зона смерти, скрипт.
#[derive(Event, Debug, Clone, Copy)]
pub struct DeathIntent {
    pub entity: Entity,
}

/// Агент умер — для визуального слоя и периферии (спавнер и т.п.)
#[derive(Event, Debug, Clone, Copy)]
pub struct AgentDied {
    pub entity: Entity,
}

/// Агент возрождён в позе спавна
#[derive(Event, Debug, Clone, Copy)]
pub struct AgentRespawned {
    pub entity: Entity,
}

/// Система: захват позы спавна при появлении контроллера игрока.
/// Идёт раньше контроллеров того же тика — поза фиксируется до первого шага.
pub fn capture_spawn_pose(
    mut commands: Commands,
    fresh: Query<(Entity, &Transform), (Added<MomentumController>, Without<SpawnPose>)>,
) {
    for (entity, transform) in fresh.iter() {
        commands.entity(entity).insert(SpawnPose {
            position: transform.translation,
            rotation: transform.rotation,
        });
    }
}

/// Система: обработка запросов смерти.
///
/// Идемпотентность двухслойная: маркер Dead отсекает запросы следующих тиков,
/// локальный набор — дубликаты внутри текущего тика (маркер ложится через
/// commands и до конца тика ещё не виден).
pub fn process_death_intents(
    mut commands: Commands,
    mut intents: EventReader<DeathIntent>,
    mut died: EventWriter<AgentDied>,
    mut queue: ResMut<TimerQueue>,
    mut players: Query<(
        &RespawnPolicy,
        &mut Momentum,
        &mut ModelVisibility,
        Has<Dead>,
    )>,
) {
    let mut dying: HashSet<Entity> = HashSet::new();

    for intent in intents.read() {
        let Ok((policy, mut momentum, mut visibility, dead)) = players.get_mut(intent.entity)
        else {
            logger::log_warning(&format!(
                "death intent for {:?} ignored: not a lifecycle agent",
                intent.entity
            ));
            continue;
        };

        if dead || !dying.insert(intent.entity) {
            continue;
        }

        *momentum = Momentum::default();
        visibility.visible = false;
        commands.entity(intent.entity).insert(Dead);
        queue.schedule(intent.entity, policy.respawn_wait_time, TimerAction::Respawn);
        died.write(AgentDied {
            entity: intent.entity,
        });
    }
}

/// Система: возрождение по таймеру — точное восстановление позы спавна,
/// возврат видимости, снятие Dead.
pub fn process_respawns(
    mut commands: Commands,
    mut fired: EventReader<TimerFired>,
    mut respawned: EventWriter<AgentRespawned>,
    mut players: Query<(&SpawnPose, &mut Transform, &mut ModelVisibility), With<Dead>>,
) {
    for event in fired.read() {
        if event.action != TimerAction::Respawn {
            continue;
        }

        let Ok((spawn, mut transform, mut visibility)) = players.get_mut(event.owner) else {
            // Respawn ставится только смертью и потребляется только здесь
            debug_assert!(false, "Respawn сработал для агента вне Dead");
            logger::log_error(&format!(
                "respawn timer fired for {:?} which is not dead or has no spawn pose",
                event.owner
            ));
            continue;
        };

        transform.translation = spawn.position;
        transform.rotation = spawn.rotation;
        visibility.visible = true;
        commands.entity(event.owner).remove::<Dead>();
        respawned.write(AgentRespawned {
            entity: event.owner,
        });
    }
}

pub struct LifecyclePlugin;

impl Plugin for LifecyclePlugin {
    fn build(&self, app: &mut App) {
        app.add_event::<DeathIntent>()
            .add_event::<AgentDied>()
            .add_event::<AgentRespawned>()
            .add_systems(
                FixedUpdate,
                (capture_spawn_pose, process_death_intents, process_respawns)
                    .chain()
                    .in_set(SimulationSet::Lifecycle),
            );
    }
}
