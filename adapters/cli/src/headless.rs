//! Rendering backend that presents scenes to the log instead of a window.

use std::time::Duration;

use anyhow::Result as AnyResult;
use lane_defence_core::GameStatus;
use lane_defence_rendering::{
    FrameInput, HudPresentation, Presentation, RenderingBackend, Scene,
};
use tracing::info;

use crate::scenario::Scenario;

/// Drives the update loop for a fixed number of frames without drawing.
#[derive(Debug)]
pub(crate) struct HeadlessBackend {
    frames: u64,
    frame_duration: Duration,
    scenario: Scenario,
}

impl HeadlessBackend {
    pub(crate) fn new(frames: u64, frame_duration: Duration, scenario: Scenario) -> Self {
        Self {
            frames,
            frame_duration,
            scenario,
        }
    }
}

impl RenderingBackend for HeadlessBackend {
    fn run<F>(self, presentation: Presentation, mut update_scene: F) -> AnyResult<()>
    where
        F: FnMut(Duration, FrameInput, &mut Scene) + 'static,
    {
        let Presentation {
            window_title,
            scene: mut current,
            ..
        } = presentation;

        info!(
            title = %window_title,
            cells = current.cells.len(),
            frames = self.frames,
            "starting headless presentation"
        );

        let mut shown = current.hud;
        let mut presented = 0;
        for frame in 0..self.frames {
            update_scene(self.frame_duration, self.scenario.input_at(frame), &mut current);
            presented = frame + 1;

            if current.hud != shown {
                report_hud(frame, &current.hud);
                shown = current.hud;
            }
            if current.hud.status == GameStatus::Lost {
                break;
            }
        }

        info!(
            frames = presented,
            coins = current.hud.coins,
            lives = current.hud.lives,
            wave = current.hud.wave,
            defenses = current.defenses.len(),
            enemies = current.enemies.len(),
            status = ?current.hud.status,
            "headless presentation finished"
        );
        Ok(())
    }
}

fn report_hud(frame: u64, hud: &HudPresentation) {
    info!(
        frame,
        coins = hud.coins,
        lives = hud.lives,
        wave = hud.wave,
        "hud changed"
    );
}

#[cfg(test)]
mod tests {
    use super::*;
    use lane_defence_core::{DefenseView, EnemyView, GridView, ProjectileView};
    use lane_defence_rendering::palette;
    use std::{cell::Cell, rc::Rc};

    fn presentation() -> Presentation {
        let scene = Scene::compose(
            &GridView::new(&[], 0, 0, 50.0),
            &EnemyView::default(),
            &DefenseView::default(),
            &ProjectileView::default(),
            HudPresentation {
                coins: 0,
                lives: 1,
                wave: 0,
                status: GameStatus::Running,
            },
        )
        .expect("positive cell size");
        Presentation::new("test", palette::BACKGROUND, scene)
    }

    #[test]
    fn runs_requested_number_of_frames() {
        let calls = Rc::new(Cell::new(0));
        let counter = Rc::clone(&calls);
        let backend = HeadlessBackend::new(12, Duration::from_millis(16), Scenario::default());

        backend
            .run(
                presentation(),
                move |dt, _, _| {
                    assert_eq!(dt, Duration::from_millis(16));
                    counter.set(counter.get() + 1);
                },
            )
            .expect("headless run succeeds");

        assert_eq!(calls.get(), 12);
    }

    #[test]
    fn stops_once_the_game_is_lost() {
        let calls = Rc::new(Cell::new(0));
        let counter = Rc::clone(&calls);
        let backend = HeadlessBackend::new(100, Duration::from_millis(16), Scenario::default());

        backend
            .run(
                presentation(),
                move |_, _, scene| {
                    counter.set(counter.get() + 1);
                    if counter.get() == 5 {
                        scene.hud.status = GameStatus::Lost;
                    }
                },
            )
            .expect("headless run succeeds");

        assert_eq!(calls.get(), 5);
    }
}
