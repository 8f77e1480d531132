//! Детерминизм: одинаковый сид — бит-в-бит одинаковый мир.
//!
//! Полный прогон сцены с игроком, патрульным и двумя wanderer'ами, включая
//! смерть и возрождение посреди прогона. Снапшоты компонентов сравниваются
//! как байты.

use std::time::Duration;

use bevy::prelude::*;
use bevy::time::TimeUpdateStrategy;
use wayward_simulation::*;

/// Полный прогон сцены: возвращает снапшоты трансформов и wander-состояний
fn run_simulation(seed: u64, ticks: usize) -> (Vec<u8>, Vec<u8>) {
    let mut app = create_headless_app(seed);
    app.add_plugins(SimulationPlugin);
    app.insert_resource(TimeUpdateStrategy::ManualDuration(Duration::from_secs_f64(
        1.0 / SIMULATION_TICK_HZ,
    )));
    app.insert_resource(Environment::new(AabbBounds {
        min: Vec3::new(-50.0, -5.0, -50.0),
        max: Vec3::new(50.0, 5.0, 50.0),
    }));
    app.update();

    let player = app
        .world_mut()
        .spawn((
            MomentumController::default(),
            MoveIntent::forward(),
            Transform::default(),
        ))
        .id();

    app.world_mut().spawn((
        Patroller::new(PatrolRoute::new(vec![
            Vec3::new(-15.0, 0.0, -15.0),
            Vec3::new(15.0, 0.0, -15.0),
            Vec3::new(15.0, 0.0, 15.0),
            Vec3::new(-15.0, 0.0, 15.0),
        ]))
        .with_move_speed(12.0),
        Transform::from_xyz(-15.0, 0.0, -15.0),
    ));

    for side in [-1.0_f32, 1.0] {
        app.world_mut().spawn((
            Wanderer {
                move_speed: 16.0,
                min_retarget_interval: 0.5,
                max_retarget_interval: 1.0,
                rotation_time: 0.5,
                post_rotation_wait_time: 0.25,
            },
            WanderRegion::new(Vec3::new(20.0 * side, 0.0, 0.0), Vec3::new(6.0, 1.0, 6.0)),
            Transform::from_xyz(20.0 * side, 0.0, 0.0),
        ));
    }

    for tick in 0..ticks {
        // Смерть и возрождение — часть сценария, тик фиксирован
        if tick == 150 {
            app.world_mut().send_event(DeathIntent { entity: player });
        }
        app.update();
    }

    let world = app.world_mut();
    (
        world_snapshot::<Transform>(world),
        world_snapshot::<WanderState>(world),
    )
}

#[test]
fn same_seed_produces_identical_snapshots() {
    let (first_transforms, first_states) = run_simulation(42, 600);
    let (second_transforms, second_states) = run_simulation(42, 600);

    assert_eq!(
        first_transforms, second_transforms,
        "трансформы разошлись при одинаковом сиде"
    );
    assert_eq!(
        first_states, second_states,
        "wander-состояния разошлись при одинаковом сиде"
    );
}

#[test]
fn snapshots_stay_identical_across_repeated_runs() {
    let baseline = run_simulation(7, 400);

    for run in 0..3 {
        assert_eq!(
            run_simulation(7, 400),
            baseline,
            "прогон {run} разошёлся с эталоном"
        );
    }
}

#[test]
fn different_seeds_diverge() {
    let (first_transforms, _) = run_simulation(42, 600);
    let (other_transforms, _) = run_simulation(43, 600);

    assert_ne!(
        first_transforms, other_transforms,
        "wanderer'ы обязаны разыгрывать разные цели на разных сидах"
    );
}
