use std::time::Duration;

use lane_defence_core::{CellCoord, Command, DefenseKind, Event, GameConfig};
use lane_defence_system_projectiles::Projectiles;
use lane_defence_world::{self as world, query, World};

const FRAME: Duration = Duration::from_millis(16);

fn setup(kind: DefenseKind, volley: usize) -> (World, Vec<Event>) {
    let mut world = World::new(GameConfig::default()).expect("default config");
    let mut events = Vec::new();
    world::apply(
        &mut world,
        Command::PlaceDefense {
            kind,
            cell: CellCoord::new(0, 3),
        },
        &mut events,
    );
    world::apply(&mut world, Command::SpawnEnemy { wave: 0 }, &mut events);

    let (defense, target) = match events.as_slice() {
        [Event::DefensePlaced { defense, .. }, Event::EnemySpawned { enemy, .. }] => {
            (*defense, *enemy)
        }
        other => panic!("unexpected setup events: {other:?}"),
    };
    for _ in 0..volley {
        world::apply(
            &mut world,
            Command::FireProjectile { defense, target },
            &mut events,
        );
    }
    (world, events)
}

fn run_until_empty(world: &mut World, system: &mut Projectiles) -> Vec<Event> {
    let mut log = Vec::new();
    for _ in 0..100 {
        if query::projectile_view(world).is_empty() {
            break;
        }
        let mut events = Vec::new();
        world::apply(world, Command::Tick { dt: FRAME }, &mut events);

        let mut commands = Vec::new();
        system.handle(
            &events,
            &query::projectile_view(world),
            &query::enemy_view(world),
            &mut commands,
        );
        for command in commands {
            world::apply(world, command, &mut events);
        }
        log.extend(events);
    }
    log
}

#[test]
fn projectile_homes_in_and_damages_target() {
    let (mut world, _) = setup(DefenseKind::Basic, 1);
    let mut system = Projectiles::new();

    let log = run_until_empty(&mut world, &mut system);

    assert!(log
        .iter()
        .any(|event| matches!(event, Event::EnemyDamaged { remaining_health: 2, .. })));
    assert_eq!(query::enemy_count(&world), 1);
    assert_eq!(query::coins(&world), 80);
}

#[test]
fn second_projectile_on_killed_enemy_misses() {
    let (mut world, _) = setup(DefenseKind::Strong, 2);
    assert_eq!(query::projectile_view(&world).len(), 2);
    let mut system = Projectiles::new();

    let log = run_until_empty(&mut world, &mut system);

    let kills = log
        .iter()
        .filter(|event| matches!(event, Event::EnemyKilled { reward: 10, .. }))
        .count();
    let misses = log
        .iter()
        .filter(|event| matches!(event, Event::ProjectileMissed { .. }))
        .count();
    assert_eq!((kills, misses), (1, 1));
    assert_eq!(query::coins(&world), 60);
    assert_eq!(query::enemy_count(&world), 0);
}

#[test]
fn orphaned_projectiles_are_discarded() {
    let (mut world, events) = setup(DefenseKind::Basic, 1);
    let enemy = events
        .iter()
        .find_map(|event| match event {
            Event::EnemySpawned { enemy, .. } => Some(*enemy),
            _ => None,
        })
        .expect("spawned enemy");
    let mut leak_events = Vec::new();
    world::apply(&mut world, Command::LeakEnemy { enemy }, &mut leak_events);

    let log = run_until_empty(&mut world, &mut Projectiles::new());

    assert!(log
        .iter()
        .any(|event| matches!(event, Event::ProjectileMissed { target, .. } if *target == enemy)));
    assert!(query::projectile_view(&world).is_empty());
}
