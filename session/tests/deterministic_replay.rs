use std::{
    cell::RefCell,
    collections::hash_map::DefaultHasher,
    hash::{Hash, Hasher},
    rc::Rc,
};

use lane_defence_core::{CellCoord, DefenseKind, GameConfig};
use lane_defence_session::{FrameReport, Session, FRAME};

#[test]
fn deterministic_replay_produces_identical_snapshots() {
    let first = replay(&scripted_actions());
    let second = replay(&scripted_actions());

    assert_eq!(first, second, "replay diverged between runs");
    assert_eq!(first.fingerprint(), second.fingerprint());
    assert!(first.frames.iter().any(|frame| frame.enemies > 0));
}

#[test]
fn different_scripts_diverge() {
    let scripted = replay(&scripted_actions());
    let idle = replay(&[]);

    assert_ne!(scripted.fingerprint(), idle.fingerprint());
}

#[derive(Clone, Copy, Debug)]
enum Action {
    Place(DefenseKind, CellCoord),
    UpgradeFirst,
    RemoveFirst,
}

fn scripted_actions() -> Vec<(u64, Action)> {
    vec![
        (0, Action::Place(DefenseKind::Basic, CellCoord::new(1, 3))),
        (0, Action::Place(DefenseKind::Fast, CellCoord::new(4, 1))),
        (300, Action::UpgradeFirst),
        (650, Action::Place(DefenseKind::Strong, CellCoord::new(8, 3))),
        (900, Action::RemoveFirst),
        (950, Action::Place(DefenseKind::Basic, CellCoord::new(2, 3))),
    ]
}

fn replay(actions: &[(u64, Action)]) -> ReplayOutcome {
    let mut session = Session::new(GameConfig::default()).expect("default config");
    let frames = Rc::new(RefCell::new(Vec::new()));
    let sink = Rc::clone(&frames);
    session.on_frame(move |report| sink.borrow_mut().push(FrameRecord::from(report)));

    let mut actions = actions.iter().peekable();
    for frame in 0..60 * 30 {
        while let Some((_, action)) = actions.next_if(|(at, _)| *at == frame) {
            perform(&mut session, *action);
        }
        let _ = session.step(FRAME);
    }

    let frames = frames.borrow().clone();
    ReplayOutcome { frames }
}

fn perform(session: &mut Session, action: Action) {
    let first = session.defenses().iter().next().map(|defense| defense.id);
    match action {
        Action::Place(kind, cell) => {
            let _ = session.place_defense(kind, cell);
        }
        Action::UpgradeFirst => {
            if let Some(defense) = first {
                let _ = session.upgrade_defense(defense);
            }
        }
        Action::RemoveFirst => {
            if let Some(defense) = first {
                let _ = session.remove_defense(defense);
            }
        }
    }
}

#[derive(Clone, Debug, PartialEq, Eq, Hash)]
struct ReplayOutcome {
    frames: Vec<FrameRecord>,
}

impl ReplayOutcome {
    fn fingerprint(&self) -> u64 {
        let mut hasher = DefaultHasher::new();
        self.hash(&mut hasher);
        hasher.finish()
    }
}

#[derive(Clone, Debug, PartialEq, Eq, Hash)]
struct FrameRecord {
    frame: u64,
    coins: u32,
    lives: u32,
    wave: u32,
    enemies: usize,
    positions: Vec<(u32, u32, i32)>,
    projectiles: Vec<(u32, u32)>,
    events: Vec<String>,
}

impl From<&FrameReport> for FrameRecord {
    fn from(report: &FrameReport) -> Self {
        Self {
            frame: report.frame,
            coins: report.coins,
            lives: report.lives,
            wave: report.wave,
            enemies: report.enemies.len(),
            positions: report
                .enemies
                .iter()
                .map(|enemy| {
                    (
                        enemy.position.x.to_bits(),
                        enemy.position.y.to_bits(),
                        enemy.health,
                    )
                })
                .collect(),
            projectiles: report
                .projectiles
                .iter()
                .map(|projectile| {
                    (
                        projectile.position.x.to_bits(),
                        projectile.position.y.to_bits(),
                    )
                })
                .collect(),
            events: report
                .events
                .iter()
                .map(|event| format!("{event:?}"))
                .collect(),
        }
    }
}
