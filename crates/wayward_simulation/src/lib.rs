//! WAYWARD Simulation Core
//!
//! Headless ECS-симуляция движения и поведения агентов на Bevy 0.16:
//! momentum-локомоция игрока, патруль по кольцевому маршруту, wander-цикл
//! (Idle → Rotating → Moving) и death/respawn lifecycle.
//!
//! Архитектура:
//! - ECS = ядро (состояние агентов, контроллеры, очередь таймеров);
//!   визуальный слой снаружи — читает Transform и ModelVisibility
//! - Все системы на fixed-тике; порядок фаз: Timers → Lifecycle → Controllers
//! - Вся случайность через DeterministicRng: одинаковый seed — одинаковый прогон

use bevy::prelude::*;
use rand::SeedableRng;
use rand_chacha::ChaCha8Rng;

// Публичные модули
pub mod components;
pub mod environment;
pub mod lifecycle;
pub mod locomotion;
pub mod logger;
pub mod orientation;
pub mod patrol;
pub mod region;
pub mod scheduler;
pub mod wander;

// Re-export базовых типов для удобства
pub use components::*;
pub use environment::{AabbBounds, Environment, MoveResolver, Unobstructed};
pub use lifecycle::{
    AgentDied, AgentRespawned, DeathIntent, LifecyclePlugin, RespawnPolicy, SpawnPose,
};
pub use locomotion::{step_axis_velocity, LocomotionPlugin};
pub use logger::init_logger;
pub use orientation::{look_rotation, slerp_toward, RotationSmoothing};
pub use patrol::{PatrolPlugin, PatrolRoute, Patroller, RouteError, POINT_LABEL_PREFIX};
pub use region::{RegionError, WanderRegion};
pub use scheduler::{SchedulerPlugin, TimerAction, TimerFired, TimerHandle, TimerQueue};
pub use wander::{WanderPlugin, WanderState, Wanderer};

/// Частота fixed-тика, Гц. Степень двойки: шаг точен в наносекундах,
/// ManualDuration в тестах и демо попадает тик-в-тик.
pub const SIMULATION_TICK_HZ: f64 = 64.0;

/// Порядок фаз внутри одного fixed-тика
#[derive(SystemSet, Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum SimulationSet {
    /// Продвижение очереди таймеров, публикация TimerFired
    Timers,
    /// Death/respawn: захват позы спавна, смерти, возрождения
    Lifecycle,
    /// Контроллеры агентов: локомоция, патруль, wander
    Controllers,
}

/// Главный plugin симуляции (объединяет все подсистемы)
pub struct SimulationPlugin;

impl Plugin for SimulationPlugin {
    fn build(&self, app: &mut App) {
        app
            // Fixed timestep: один тик = 1/64 с
            .insert_resource(Time::<Fixed>::from_hz(SIMULATION_TICK_HZ))
            // init_resource: заранее подсаженный seed не перетирается
            .init_resource::<DeterministicRng>()
            // Пустой мир по умолчанию; embedding подставляет свой resolver
            .init_resource::<Environment>()
            .configure_sets(
                FixedUpdate,
                (
                    SimulationSet::Timers,
                    SimulationSet::Lifecycle,
                    SimulationSet::Controllers,
                )
                    .chain(),
            )
            .add_plugins((
                SchedulerPlugin,
                LifecyclePlugin,
                LocomotionPlugin,
                PatrolPlugin,
                WanderPlugin,
            ));
    }
}

/// Детерминистичный RNG resource (seeded)
#[derive(Resource)]
pub struct DeterministicRng {
    pub rng: ChaCha8Rng,
    pub seed: u64,
}

impl DeterministicRng {
    pub const DEFAULT_SEED: u64 = 42;

    pub fn new(seed: u64) -> Self {
        Self {
            rng: ChaCha8Rng::seed_from_u64(seed),
            seed,
        }
    }
}

impl Default for DeterministicRng {
    fn default() -> Self {
        Self::new(Self::DEFAULT_SEED)
    }
}

/// Создаёт minimal Bevy App для headless симуляции
pub fn create_headless_app(seed: u64) -> App {
    let mut app = App::new();
    logger::init_logger();
    app.add_plugins(MinimalPlugins)
        .insert_resource(DeterministicRng::new(seed))
        .insert_resource(Time::<Fixed>::from_hz(SIMULATION_TICK_HZ));

    app
}

/// Snapshot состояния компонента T по всем entity для сравнения детерминизма
pub fn world_snapshot<T: Component>(world: &mut World) -> Vec<u8>
where
    T: std::fmt::Debug,
{
    let mut snapshot = Vec::new();

    let mut query = world.query::<(Entity, &T)>();
    let mut entities: Vec<_> = query.iter(world).collect();

    // Сортируем по Entity ID для стабильного порядка
    entities.sort_by_key(|(entity, _)| entity.index());

    for (entity, component) in entities {
        snapshot.extend_from_slice(&entity.index().to_le_bytes());
        snapshot.extend_from_slice(format!("{:?}", component).as_bytes());
    }

    snapshot
}
