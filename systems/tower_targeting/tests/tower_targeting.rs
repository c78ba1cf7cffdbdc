use std::time::Duration;

use glam::Vec2;
use lane_defence_core::{
    CellCoord, Command, DefenseId, DefenseKind, DefenseSnapshot, DefenseTarget, DefenseView,
    EnemyId, EnemySnapshot, EnemyView, Event, GameConfig,
};
use lane_defence_system_tower_targeting::TowerTargeting;
use lane_defence_world::{self as world, query, World};

#[test]
fn every_enemy_in_range_is_targeted() {
    let mut world = World::new(GameConfig::default()).expect("default config");
    let mut events = Vec::new();
    // Centre (25, 175) sits 25 units from the route entry at (0, 200).
    world::apply(
        &mut world,
        Command::PlaceDefense {
            kind: DefenseKind::Basic,
            cell: CellCoord::new(0, 3),
        },
        &mut events,
    );
    for _ in 0..3 {
        world::apply(&mut world, Command::SpawnEnemy { wave: 1 }, &mut events);
    }
    let enemies: Vec<EnemyId> = events
        .iter()
        .filter_map(|event| match event {
            Event::EnemySpawned { enemy, .. } => Some(*enemy),
            _ => None,
        })
        .collect();

    let mut targeting = TowerTargeting::new();
    let mut targets = Vec::new();
    targeting.handle(
        &query::defense_view(&world),
        &query::enemy_view(&world),
        &mut targets,
    );

    let targeted: Vec<EnemyId> = targets.iter().map(|target| target.enemy).collect();
    assert_eq!(targeted, enemies);
    assert!(targets
        .iter()
        .all(|target| target.defense_center == Vec2::new(25.0, 175.0)));
}

#[test]
fn range_boundary_is_exclusive() {
    let defense = defense(0, Vec2::ZERO, 100.0);
    let inside = enemy(Vec2::new(99.9, 0.0));
    let edge = enemy(Vec2::new(0.0, 100.0));
    let enemies = EnemyView::from_snapshots(vec![inside, edge]);

    let mut targets = Vec::new();
    TowerTargeting::new().handle(
        &DefenseView::from_snapshots(vec![defense]),
        &enemies,
        &mut targets,
    );

    assert_eq!(
        targets,
        vec![DefenseTarget {
            defense: DefenseId::new(0),
            enemy: inside.id,
            defense_center: Vec2::ZERO,
            enemy_position: inside.position,
        }]
    );
}

#[test]
fn pairs_are_grouped_by_defense_identifier() {
    let near = enemy(Vec2::new(10.0, 0.0));
    let defenses = DefenseView::from_snapshots(vec![
        defense(4, Vec2::ZERO, 50.0),
        defense(1, Vec2::new(20.0, 0.0), 50.0),
        defense(2, Vec2::new(500.0, 0.0), 50.0),
    ]);

    let mut targets = vec![DefenseTarget {
        defense: DefenseId::new(9),
        enemy: near.id,
        defense_center: Vec2::ZERO,
        enemy_position: Vec2::ZERO,
    }];
    TowerTargeting::new().handle(
        &defenses,
        &EnemyView::from_snapshots(vec![near]),
        &mut targets,
    );

    let order: Vec<u32> = targets.iter().map(|target| target.defense.get()).collect();
    assert_eq!(order, vec![1, 4], "stale entries are cleared first");
}

fn defense(id: u32, center: Vec2, range: f32) -> DefenseSnapshot {
    DefenseSnapshot {
        id: DefenseId::new(id),
        kind: DefenseKind::Basic,
        cell: CellCoord::new(0, 0),
        center,
        range,
        damage: 1,
        rate: Duration::from_secs(1),
        last_shot: None,
        level: 1,
        upgrade_cost: 20,
    }
}

fn enemy(position: Vec2) -> EnemySnapshot {
    EnemySnapshot {
        id: EnemyId::default(),
        position,
        path_index: 0,
        speed: 2.0,
        health: 4,
    }
}
