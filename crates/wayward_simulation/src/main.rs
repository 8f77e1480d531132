//! Headless-демо WAYWARD
//!
//! Ограниченная арена: игрок со скриптованным вводом (включая смерть на
//! середине прогона), патрульный по прямоугольному маршруту, два wanderer'а.
//! Время шагается вручную — один app.update() = ровно один fixed-тик.

use std::time::Duration;

use bevy::prelude::*;
use bevy::time::TimeUpdateStrategy;

use wayward_simulation::*;

fn main() {
    let seed = 42;
    println!("Starting WAYWARD headless demo (seed: {seed})");

    let mut app = create_headless_app(seed);
    app.add_plugins(SimulationPlugin);
    app.insert_resource(TimeUpdateStrategy::ManualDuration(Duration::from_secs_f64(
        1.0 / SIMULATION_TICK_HZ,
    )));
    // Арена-коробка: стены режут перемещение, не скорость
    app.insert_resource(Environment::new(AabbBounds {
        min: Vec3::new(-40.0, 0.0, -40.0),
        max: Vec3::new(40.0, 8.0, 40.0),
    }));

    let player = app
        .world_mut()
        .spawn((MomentumController::default(), MoveIntent::forward()))
        .id();

    let patroller = app
        .world_mut()
        .spawn((
            Patroller::from_labeled_points([
                ("Patrol Point (0)", Vec3::new(-20.0, 0.0, -20.0)),
                ("Patrol Point (1)", Vec3::new(20.0, 0.0, -20.0)),
                ("Patrol Point (2)", Vec3::new(20.0, 0.0, 20.0)),
                ("Patrol Point (3)", Vec3::new(-20.0, 0.0, 20.0)),
            ]),
            Transform::from_translation(Vec3::new(-20.0, 0.0, -20.0)),
        ))
        .id();

    for offset in [-12.0, 12.0] {
        app.world_mut().spawn((
            Wanderer::default(),
            WanderRegion::new(Vec3::new(offset, 0.0, 0.0), Vec3::new(10.0, 1.0, 10.0)),
            Transform::from_translation(Vec3::new(offset, 0.0, 0.0)),
        ));
    }

    // Первый update только прогревает Time (нулевой delta, fixed-тиков нет)
    app.update();

    let ticks_per_second = SIMULATION_TICK_HZ as u32;
    let total_ticks = 12 * ticks_per_second;

    for tick in 1..=total_ticks {
        // Скриптованный ввод: вперёд → вправо → смерть (респавн через 2 с) → вперёд
        if tick == 3 * ticks_per_second {
            set_intent(&mut app, player, MoveIntent::right());
        }
        if tick == 5 * ticks_per_second {
            app.world_mut().send_event(DeathIntent { entity: player });
            println!("-- death requested for the player --");
        }
        if tick == 8 * ticks_per_second {
            set_intent(&mut app, player, MoveIntent::forward());
        }

        app.update();

        if tick % ticks_per_second == 0 {
            report(&mut app, tick / ticks_per_second, player, patroller);
        }
    }

    println!("Demo complete!");
}

fn set_intent(app: &mut App, player: Entity, intent: MoveIntent) {
    if let Some(mut current) = app.world_mut().get_mut::<MoveIntent>(player) {
        *current = intent;
    }
}

fn report(app: &mut App, second: u32, player: Entity, patroller: Entity) {
    let world = app.world_mut();
    let player_pos = world.get::<Transform>(player).map(|t| t.translation);
    let player_alive = world.get::<Dead>(player).is_none();
    let patroller_pos = world.get::<Transform>(patroller).map(|t| t.translation);

    println!(
        "t={second:>2}s  player={player_pos:?} alive={player_alive}  patroller={patroller_pos:?}"
    );

    let mut wanderers = world.query::<(&Wanderer, &WanderState, &Transform)>();
    for (_, state, transform) in wanderers.iter(world) {
        let state_name = match state {
            WanderState::Idle => "Idle",
            WanderState::Rotating { .. } => "Rotating",
            WanderState::Moving { .. } => "Moving",
        };
        println!(
            "        wanderer {state_name:<8} at {:?}",
            transform.translation
        );
    }
}
