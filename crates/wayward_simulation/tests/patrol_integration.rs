//! Интеграция патруля
//!
//! Проверяем:
//! - кольцевой обход 0→1→2→0 с точным таймингом ноги маршрута
//! - эпсилон-прибытие с точным лендингом seek-шага
//! - пустой/отвергнутый маршрут — перманентный no-op без паник
//! - доворот лица к текущей точке в пути

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

fn spawn_patroller(app: &mut App, patroller: Patroller, at: Vec3) -> Entity {
    app.world_mut()
        .spawn((patroller, Transform::from_translation(at)))
        .id()
}

fn translation(app: &App, entity: Entity) -> Vec3 {
    app.world().get::<Transform>(entity).unwrap().translation
}

fn waypoint_index(app: &App, entity: Entity) -> usize {
    app.world().get::<Patroller>(entity).unwrap().current_index()
}

#[test]
fn visits_waypoints_in_order_and_wraps() {
    let mut app = create_sim_app(42);

    // Нога маршрута 10 юнитов на скорости 10: ровно 64 тика (шаг 0.15625 —
    // точен в двоичной арифметике, лендинг бит-в-бит)
    let route = PatrolRoute::new(vec![
        Vec3::ZERO,
        Vec3::new(10.0, 0.0, 0.0),
        Vec3::new(10.0, 0.0, 10.0),
    ]);
    let patroller = spawn_patroller(
        &mut app,
        Patroller::new(route).with_move_speed(10.0),
        Vec3::ZERO,
    );

    // Тик 1: стоим на точке 0 — мгновенное прибытие, цель становится 1
    app.update();
    assert_eq!(waypoint_index(&app, patroller), 1);

    // Ровно 1 секунда пути до (10,0,0); прибытие двигает цель на 2 тем же тиком
    run_ticks(&mut app, 64);
    assert_eq!(translation(&app, patroller), Vec3::new(10.0, 0.0, 0.0));
    assert_eq!(waypoint_index(&app, patroller), 2);

    // Ещё секунда до (10,0,10) и wrap к точке 0 — цикл 0→1→2→0
    run_ticks(&mut app, 64);
    assert_eq!(translation(&app, patroller), Vec3::new(10.0, 0.0, 10.0));
    assert_eq!(waypoint_index(&app, patroller), 0);

    // Обход продолжается бесконечно: ещё полтора круга без сюрпризов
    run_ticks(&mut app, 300);
    let position = translation(&app, patroller);
    assert!(
        position.x.abs() <= 10.0 + 1e-3 && position.z.abs() <= 10.0 + 1e-3,
        "патрульный сошёл с маршрута: {position:?}"
    );
}

#[test]
fn empty_route_is_a_permanent_noop() {
    let mut app = create_sim_app(42);
    let start = Vec3::new(3.0, 0.0, -7.0);
    let patroller = spawn_patroller(&mut app, Patroller::new(PatrolRoute::empty()), start);

    run_ticks(&mut app, 200);

    assert_eq!(translation(&app, patroller), start);
    assert_eq!(
        app.world().get::<Transform>(patroller).unwrap().rotation,
        Quat::IDENTITY
    );
    assert_eq!(waypoint_index(&app, patroller), 0);
}

#[test]
fn labeled_import_drives_the_same_traversal() {
    let mut app = create_sim_app(42);

    // Метки перемешаны — порядок задаёт индекс в метке, не порядок объявления
    let patroller = spawn_patroller(
        &mut app,
        Patroller::from_labeled_points([
            ("Patrol Point (1)", Vec3::new(10.0, 0.0, 0.0)),
            ("Patrol Point (0)", Vec3::ZERO),
            ("Patrol Point (2)", Vec3::new(10.0, 0.0, 10.0)),
        ])
        .with_move_speed(10.0),
        Vec3::ZERO,
    );

    app.update();
    run_ticks(&mut app, 64);
    assert_eq!(translation(&app, patroller), Vec3::new(10.0, 0.0, 0.0));
}

#[test]
fn rejected_labels_leave_the_patroller_idle() {
    let mut app = create_sim_app(42);
    let start = Vec3::new(-2.0, 0.0, 2.0);

    // Дубликат индекса — ошибка конфигурации, маршрут пустой
    let patroller = spawn_patroller(
        &mut app,
        Patroller::from_labeled_points([
            ("Patrol Point (0)", Vec3::ZERO),
            ("Patrol Point (0)", Vec3::X),
        ]),
        start,
    );

    run_ticks(&mut app, 100);
    assert_eq!(translation(&app, patroller), start);
}

#[test]
fn faces_the_current_waypoint_while_traveling() {
    let mut app = create_sim_app(42);

    // Старт вне маршрута: целимся в (10,0,0) вдоль +X
    let patroller = spawn_patroller(
        &mut app,
        Patroller::new(PatrolRoute::new(vec![Vec3::new(10.0, 0.0, 0.0)]))
            .with_move_speed(10.0),
        Vec3::ZERO,
    );

    run_ticks(&mut app, 32);

    let rotation = app.world().get::<Transform>(patroller).unwrap().rotation;
    let target = look_rotation(Vec3::X).unwrap();
    assert!(
        rotation.angle_between(target) < 0.05,
        "лицо не довернулось к точке маршрута: {} rad",
        rotation.angle_between(target)
    );
}
