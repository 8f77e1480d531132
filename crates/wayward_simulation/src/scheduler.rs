//! Очередь отложенных one-shot переходов на simulated time.
//!
//! Архитектура:
//! - TimerQueue — resource со списком (owner, fire_at, action)
//! - advance_timer_queue двигает очередь ПЕРВОЙ в каждом fixed-тике
//!   (SimulationSet::Timers) и публикует сработавшие записи как TimerFired
//! - Контроллеры читают события дальше по цепочке того же тика — никакой
//!   двусмысленности "сработает на следующем тике"
//!
//! Детерминизм: порядок срабатывания стабилен (fire_at, затем порядок
//! постановки). "Ожидание" — всегда состояние очереди, никогда не блокировка.

use bevy::prelude::*;

use crate::logger;
use crate::SimulationSet;

/// Назначение отложенного перехода
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TimerAction {
    /// Возрождение агента после смерти
    Respawn,
    /// Wanderer: конец фазы поворота, начало движения
    BeginMoving,
    /// Wanderer: выбор новой цели после паузы
    Retarget,
}

/// Хэндл запланированной записи; нужен только для отмены
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TimerHandle(u64);

/// Event: запись очереди сработала
#[derive(Event, Debug, Clone, Copy, PartialEq)]
pub struct TimerFired {
    pub owner: Entity,
    pub action: TimerAction,
}

#[derive(Debug, Clone)]
struct TimerEntry {
    id: u64,
    fire_at: f64,
    owner: Entity,
    action: TimerAction,
}

/// Очередь one-shot таймеров симуляции.
///
/// Инвариант: на одном агенте не бывает двух pending записей одного
/// назначения — повторный schedule заменяет старую с предупреждением.
#[derive(Resource, Debug, Default)]
pub struct TimerQueue {
    now: f64,
    next_id: u64,
    entries: Vec<TimerEntry>,
}

impl TimerQueue {
    /// Текущее simulated time очереди, секунды
    pub fn now(&self) -> f64 {
        self.now
    }

    /// Поставить one-shot запись: сработает через delay секунд simulated time.
    /// Отрицательный delay клампится к нулю (сработает на ближайшем advance).
    pub fn schedule(&mut self, owner: Entity, delay: f32, action: TimerAction) -> TimerHandle {
        if let Some(stale) = self
            .entries
            .iter()
            .position(|entry| entry.owner == owner && entry.action == action)
        {
            logger::log_warning(&format!(
                "timer {action:?} for {owner:?} rescheduled while still pending; stale entry replaced"
            ));
            self.entries.remove(stale);
        }

        let id = self.next_id;
        self.next_id += 1;
        self.entries.push(TimerEntry {
            id,
            fire_at: self.now + f64::from(delay.max(0.0)),
            owner,
            action,
        });
        TimerHandle(id)
    }

    /// Снять запись. Уже сработавшая или уже отменённая — no-op, false.
    pub fn cancel(&mut self, handle: TimerHandle) -> bool {
        let before = self.entries.len();
        self.entries.retain(|entry| entry.id != handle.0);
        self.entries.len() < before
    }

    /// Снять все записи агента (teardown). Возвращает число снятых.
    pub fn cancel_owned_by(&mut self, owner: Entity) -> usize {
        let before = self.entries.len();
        self.entries.retain(|entry| entry.owner != owner);
        before - self.entries.len()
    }

    pub fn has_pending(&self, owner: Entity, action: TimerAction) -> bool {
        self.entries
            .iter()
            .any(|entry| entry.owner == owner && entry.action == action)
    }

    pub fn pending_count(&self) -> usize {
        self.entries.len()
    }

    /// Оставить только записи, чей owner прошёл проверку; вернуть число выброшенных
    pub fn retain_owners(&mut self, mut is_live: impl FnMut(Entity) -> bool) -> usize {
        let before = self.entries.len();
        self.entries.retain(|entry| is_live(entry.owner));
        before - self.entries.len()
    }

    /// Продвинуть очередь до now и забрать все созревшие записи, каждую ровно
    /// один раз, в порядке (fire_at, порядок постановки).
    pub fn advance_to(&mut self, now: f64) -> Vec<TimerFired> {
        debug_assert!(now >= self.now, "время очереди не может идти назад");
        self.now = now;

        let (mut due, pending): (Vec<_>, Vec<_>) = self
            .entries
            .drain(..)
            .partition(|entry| entry.fire_at <= now);
        self.entries = pending;

        due.sort_by(|a, b| a.fire_at.total_cmp(&b.fire_at).then(a.id.cmp(&b.id)));
        due.into_iter()
            .map(|entry| TimerFired {
                owner: entry.owner,
                action: entry.action,
            })
            .collect()
    }
}

/// Система: продвинуть очередь на текущее fixed-время и опубликовать события.
/// Записи деспавнутых агентов выбрасываются — callback по мёртвому entity
/// не должен сработать.
pub fn advance_timer_queue(
    time: Res<Time<Fixed>>,
    live: Query<Entity>,
    mut queue: ResMut<TimerQueue>,
    mut fired: EventWriter<TimerFired>,
) {
    let dropped = queue.retain_owners(|owner| live.contains(owner));
    if dropped > 0 {
        logger::log_warning(&format!("{dropped} timer(s) dropped: owner despawned"));
    }

    for event in queue.advance_to(time.elapsed_secs_f64()) {
        fired.write(event);
    }
}

pub struct SchedulerPlugin;

impl Plugin for SchedulerPlugin {
    fn build(&self, app: &mut App) {
        app.init_resource::<TimerQueue>()
            .add_event::<TimerFired>()
            .add_systems(
                FixedUpdate,
                advance_timer_queue.in_set(SimulationSet::Timers),
            );
    }
}
