//! Интеграция wander-цикла
//!
//! Проверяем:
//! - retarget даёт свежую цель из региона и свежие повороты
//! - фаза Rotating длится ровно rotation_time + post_rotation_wait_time,
//!   прогресс клампится, BeginMoving закрывает её точным поворотом
//! - прибытие уводит в Idle и разыгрывает паузу в заданных границах
//! - вырожденный/отсутствующий регион оставляет агента Idle без таймера

use std::time::Duration;

use bevy::prelude::*;
use bevy::time::TimeUpdateStrategy;
use wayward_simulation::*;

/// Helper: App с ручным шагом времени — один update = ровно один fixed-тик
fn create_sim_app(seed: u64) -> App {
    let mut app = create_headless_app(seed);
    app.add_plugins(SimulationPlugin);
    app.insert_resource(TimeUpdateStrategy::ManualDuration(Duration::from_secs_f64(
        1.0 / SIMULATION_TICK_HZ,
    )));
    app.update();
    app
}

fn run_ticks(app: &mut App, ticks: usize) {
    for _ in 0..ticks {
        app.update();
    }
}

/// Фаза поворота 0.75 с = ровно 48 тиков: активация на тике 1,
/// BeginMoving срабатывает на тике 49
fn test_wanderer() -> Wanderer {
    Wanderer {
        move_speed: 16.0,
        min_retarget_interval: 0.5,
        max_retarget_interval: 1.0,
        rotation_time: 0.5,
        post_rotation_wait_time: 0.25,
    }
}

fn test_region() -> WanderRegion {
    WanderRegion::new(Vec3::new(20.0, 0.0, 0.0), Vec3::new(5.0, 1.0, 5.0))
}

fn spawn_wanderer(app: &mut App, region: Option<WanderRegion>, at: Vec3) -> Entity {
    let mut entity = app.world_mut().spawn((
        test_wanderer(),
        Transform::from_translation(at),
    ));
    if let Some(region) = region {
        entity.insert(region);
    }
    entity.id()
}

fn wander_state(app: &App, entity: Entity) -> WanderState {
    *app.world().get::<WanderState>(entity).unwrap()
}

fn translation(app: &App, entity: Entity) -> Vec3 {
    app.world().get::<Transform>(entity).unwrap().translation
}

fn rotation(app: &App, entity: Entity) -> Quat {
    app.world().get::<Transform>(entity).unwrap().rotation
}

#[test]
fn retarget_samples_a_fresh_target_with_fresh_rotations() {
    let mut app = create_sim_app(42);
    let region = test_region();
    let wanderer = spawn_wanderer(&mut app, Some(region), Vec3::ZERO);

    // Тик 1: активация свежего агента сразу делает retarget
    app.update();

    let WanderState::Rotating {
        target,
        initial_rotation,
        target_rotation,
        started_at,
    } = wander_state(&app, wanderer)
    else {
        panic!("после активации ожидается Rotating");
    };

    assert!(region.contains(target), "цель вне региона: {target:?}");
    assert_eq!(initial_rotation, Quat::IDENTITY, "старт захвачен до доворота");
    assert_eq!(started_at, 1.0 / SIMULATION_TICK_HZ);

    let expected = look_rotation(target - Vec3::ZERO).unwrap();
    assert!(
        target_rotation.abs_diff_eq(expected, 1e-5),
        "целевой поворот не из направления на цель"
    );
}

#[test]
fn rotating_phase_lasts_exactly_its_duration_and_snaps_on_begin_moving() {
    let mut app = create_sim_app(42);
    let wanderer = spawn_wanderer(&mut app, Some(test_region()), Vec3::ZERO);

    app.update();
    let WanderState::Rotating {
        target: chosen_target,
        initial_rotation,
        target_rotation,
        ..
    } = wander_state(&app, wanderer)
    else {
        panic!("после активации ожидается Rotating");
    };

    // Середина доворота (elapsed 0.25 из rotation_time 0.5): прогресс 0.5
    run_ticks(&mut app, 16);
    let halfway = initial_rotation.slerp(target_rotation, 0.5);
    assert!(
        rotation(&app, wanderer).abs_diff_eq(halfway, 1e-5),
        "прогресс поворота не time-based"
    );

    // Конец интерполяции до конца фазы: прогресс клампится на 1,
    // агент стоит в целевом повороте и ждёт BeginMoving
    run_ticks(&mut app, 31); // тик 48 — последний тик Rotating
    assert!(matches!(
        wander_state(&app, wanderer),
        WanderState::Rotating { .. }
    ));
    assert!(
        rotation(&app, wanderer).abs_diff_eq(target_rotation, 1e-5),
        "кламп прогресса должен удерживать целевой поворот"
    );

    // Тик 49 = 0.75 с фазы: BeginMoving, поворот точный, цель та же
    app.update();
    let WanderState::Moving { target } = wander_state(&app, wanderer) else {
        panic!("после BeginMoving ожидается Moving");
    };
    assert_eq!(target, chosen_target);
    assert_eq!(rotation(&app, wanderer), target_rotation, "без остаточной ошибки");
}

#[test]
fn arrival_goes_idle_and_draws_the_next_pause_within_bounds() {
    let mut app = create_sim_app(42);
    let wanderer = spawn_wanderer(&mut app, Some(test_region()), Vec3::ZERO);

    // До состояния Moving
    run_ticks(&mut app, 49);
    let WanderState::Moving { target } = wander_state(&app, wanderer) else {
        panic!("ожидается Moving");
    };

    // Едем до прибытия (дистанция ≤ ~26 юнитов на скорости 16 — с запасом)
    let mut arrived_at_tick = None;
    for tick in 0..400 {
        app.update();
        if wander_state(&app, wanderer) == WanderState::Idle {
            arrived_at_tick = Some(tick);
            break;
        }
    }
    assert!(arrived_at_tick.is_some(), "агент так и не прибыл");

    // Лендинг внутри эпсилона прибытия
    assert!(translation(&app, wanderer).distance(target) <= ARRIVAL_EPSILON);

    // Пауза разыграна и стоит в очереди
    assert!(app
        .world()
        .resource::<TimerQueue>()
        .has_pending(wanderer, TimerAction::Retarget));

    // Retarget приходит внутри [min, max]: 0.5..1.0 с = 32..=64 тиков
    let mut waited = 0;
    loop {
        app.update();
        waited += 1;
        if !matches!(wander_state(&app, wanderer), WanderState::Idle) {
            break;
        }
        assert!(waited <= 64, "retarget не пришёл в верхней границе паузы");
    }
    assert!(
        (32..=64).contains(&waited),
        "пауза вне границ розыгрыша: {waited} тиков"
    );
    assert!(matches!(
        wander_state(&app, wanderer),
        WanderState::Rotating { .. }
    ));
}

#[test]
fn motion_stays_inside_the_region_over_many_cycles() {
    let mut app = create_sim_app(7);
    let region = test_region();
    let wanderer = spawn_wanderer(&mut app, Some(region), region.center);

    for tick in 0..2000 {
        app.update();
        let position = translation(&app, wanderer);
        let offset = (position - region.center).abs();
        assert!(
            offset.x <= region.half_extents.x + 1e-3
                && offset.y <= region.half_extents.y + 1e-3
                && offset.z <= region.half_extents.z + 1e-3,
            "агент вышел из региона на тике {tick}: {position:?}"
        );
    }
}

#[test]
fn degenerate_region_leaves_the_wanderer_idle_without_a_timer() {
    let mut app = create_sim_app(42);
    let wanderer = spawn_wanderer(
        &mut app,
        Some(WanderRegion::new(Vec3::ZERO, Vec3::ZERO)),
        Vec3::new(1.0, 0.0, 1.0),
    );

    app.update();
    assert_eq!(wander_state(&app, wanderer), WanderState::Idle);
    assert_eq!(
        app.world().resource::<TimerQueue>().pending_count(),
        0,
        "вырожденный регион не должен планировать retarget"
    );

    // Состояние устойчиво: никакого retry-цикла
    run_ticks(&mut app, 100);
    assert_eq!(wander_state(&app, wanderer), WanderState::Idle);
    assert_eq!(translation(&app, wanderer), Vec3::new(1.0, 0.0, 1.0));
    assert_eq!(rotation(&app, wanderer), Quat::IDENTITY);
}

#[test]
fn missing_region_component_also_stays_idle() {
    let mut app = create_sim_app(42);
    let wanderer = spawn_wanderer(&mut app, None, Vec3::ZERO);

    run_ticks(&mut app, 50);
    assert_eq!(wander_state(&app, wanderer), WanderState::Idle);
    assert_eq!(
        app.world().resource::<TimerQueue>().pending_count(),
        0
    );
}
