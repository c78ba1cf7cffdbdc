use lane_defence_core::{
    CellCoord, DefenseKind, Event, GameConfig, GameStatus, PlacementError, RemovalError,
    UpgradeError,
};
use lane_defence_session::{Session, FRAME};

const MAX_FRAMES: usize = 60 * 120;

#[test]
fn undefended_lane_loses_after_last_leak() {
    let mut session = Session::new(GameConfig {
        initial_lives: 1,
        ..GameConfig::default()
    })
    .expect("config");

    let mut lifecycle = Vec::new();
    for _ in 0..MAX_FRAMES {
        let report = session.step(FRAME);
        lifecycle.extend(report.lifecycle().cloned());
        if report.status == GameStatus::Lost {
            break;
        }
    }

    assert_eq!(session.status(), GameStatus::Lost);
    assert_eq!(session.lives(), 0);
    assert_eq!(session.pending_spawns(), 0);
    assert!(matches!(
        lifecycle.as_slice(),
        [
            Event::WaveStarted { wave: 1 },
            Event::EnemyLeaked {
                lives_remaining: 0,
                ..
            },
            Event::GameOver,
        ]
    ));

    let survivors = session.enemies();
    let report = session.step(FRAME);
    assert!(report.events.is_empty());
    assert_eq!(report.enemies, survivors);
    assert_eq!(
        session.place_defense(DefenseKind::Basic, CellCoord::new(0, 0)),
        Err(PlacementError::GameOver)
    );
    assert_eq!(
        session.upgrade_defense(lane_defence_core::DefenseId::new(0)),
        Err(UpgradeError::GameOver)
    );
    assert_eq!(
        session.remove_defense(lane_defence_core::DefenseId::new(0)),
        Err(RemovalError::GameOver)
    );
}

#[test]
fn kills_pay_exactly_the_reward() {
    let mut session = Session::new(GameConfig::default()).expect("config");
    let mut spent = 0;
    for (kind, cell) in [
        (DefenseKind::Strong, CellCoord::new(1, 3)),
        (DefenseKind::Fast, CellCoord::new(2, 3)),
    ] {
        let _ = session.place_defense(kind, cell).expect("grass cell");
        spent += kind.cost();
    }

    let mut kills = 0;
    let mut rewards = 0;
    for _ in 0..60 * 20 {
        let report = session.step(FRAME);
        for event in report.lifecycle() {
            if let Event::EnemyKilled { reward, .. } = event {
                kills += 1;
                rewards += reward;
            }
        }
    }

    assert!(kills > 0, "defenses next to the entry should score");
    assert_eq!(rewards, kills * 10);
    assert_eq!(session.coins(), 100 - spent + rewards);
}

#[test]
fn defenses_fire_volleys_at_every_enemy_in_range() {
    let mut session = Session::new(GameConfig::default()).expect("config");
    let defense = session
        .place_defense(DefenseKind::Basic, CellCoord::new(1, 3))
        .expect("grass cell");

    let mut largest_volley = 0;
    for _ in 0..60 * 13 {
        let report = session.step(FRAME);
        let volley = report
            .events
            .iter()
            .filter(|event| {
                matches!(event, Event::ProjectileFired { defense: shooter, .. } if *shooter == defense)
            })
            .count();
        largest_volley = largest_volley.max(volley);
    }

    assert!(
        largest_volley > 1,
        "staggered spawns bunch up in range, expected a multi-target volley"
    );
}
