#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Command-line adapter that runs a Lane Defence session headlessly.

mod headless;
mod scenario;

use std::{path::PathBuf, time::Duration};

use anyhow::{Context, Result};
use clap::Parser;
use lane_defence_core::Event;
use lane_defence_rendering::{
    palette, DialogPresentation, FrameInput, HudPresentation, Presentation, RenderingBackend,
    Scene,
};
use lane_defence_session::{FrameReport, Session, FRAME};
use lane_defence_system_builder::{Builder, BuilderInput, Selection};
use tracing::{info, warn};
use tracing_subscriber::EnvFilter;

use crate::{headless::HeadlessBackend, scenario::Scenario};

#[derive(Parser, Debug)]
#[command(name = "lane-defence")]
#[command(about = "Runs a Lane Defence session without a window")]
struct Args {
    /// Scenario file with game parameters and scripted player input
    #[arg(long)]
    scenario: Option<PathBuf>,

    /// Number of frames to simulate
    #[arg(long, default_value = "3600")]
    frames: u64,

    /// Frame duration in milliseconds; defaults to 60 frames per second
    #[arg(long)]
    frame_ms: Option<u64>,
}

/// Entry point for the Lane Defence command-line interface.
fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .init();

    let args = Args::parse();
    let scenario = match &args.scenario {
        Some(path) => Scenario::load(path)?,
        None => Scenario::default(),
    };
    let frame_duration = args.frame_ms.map_or(FRAME, Duration::from_millis);

    let session = Session::new(scenario.game.clone()).context("invalid game configuration")?;
    println!("{}", lane_defence_world::query::welcome_banner(session.world()));

    let scene = compose(&session, &snapshot(&session), None)?;
    let backend = HeadlessBackend::new(args.frames, frame_duration, scenario);
    backend.run(
        Presentation::new("Lane Defence", palette::BACKGROUND, scene),
        update_loop(session),
    )
}

/// Builds the per-frame closure that feeds input through the builder into the session.
fn update_loop(mut session: Session) -> impl FnMut(Duration, FrameInput, &mut Scene) {
    let mut builder = Builder::new();
    let mut observed: Vec<Event> = Vec::new();

    move |dt, input, scene| {
        let mut commands = Vec::new();
        builder.handle(&observed, &session.grid(), builder_input(&input), &mut commands);
        for command in commands {
            for event in session.perform(command) {
                log_action(&event);
            }
        }

        let report = session.step(dt);
        for event in report.lifecycle() {
            info!(frame = report.frame, ?event, "lifecycle");
        }
        observed = report.events.clone();

        match compose(&session, &report, builder.selection()) {
            Ok(next) => *scene = next,
            Err(error) => warn!(%error, "keeping previous scene"),
        }
    }
}

fn snapshot(session: &Session) -> FrameReport {
    FrameReport {
        frame: session.frame(),
        clock: session.clock(),
        events: Vec::new(),
        enemies: session.enemies(),
        defenses: session.defenses(),
        projectiles: session.projectiles(),
        coins: session.coins(),
        lives: session.lives(),
        wave: session.wave(),
        status: session.status(),
    }
}

fn compose(
    session: &Session,
    report: &FrameReport,
    selection: Option<Selection>,
) -> Result<Scene> {
    let hud = HudPresentation {
        coins: report.coins,
        lives: report.lives,
        wave: report.wave,
        status: report.status,
    };
    let mut scene = Scene::compose(
        &session.grid(),
        &report.enemies,
        &report.defenses,
        &report.projectiles,
        hud,
    )?;

    match selection {
        Some(Selection::Build(cell)) => {
            scene.highlight(cell);
            scene.dialog = Some(DialogPresentation::build(cell));
        }
        Some(Selection::Defense(defense)) => {
            scene.dialog = DialogPresentation::defense(&report.defenses, defense);
        }
        None => {}
    }
    Ok(scene)
}

/// Translates adapter input into a single builder input, most decisive action first.
fn builder_input(input: &FrameInput) -> BuilderInput {
    if input.dismiss {
        BuilderInput::Dismiss
    } else if let Some(kind) = input.place {
        BuilderInput::Place(kind)
    } else if input.upgrade {
        BuilderInput::Upgrade
    } else if input.remove {
        BuilderInput::Remove
    } else if let Some(point) = input.click_world_space {
        BuilderInput::Click(point)
    } else {
        BuilderInput::Idle
    }
}

fn log_action(event: &Event) {
    match event {
        Event::DefensePlaced { .. }
        | Event::DefenseUpgraded { .. }
        | Event::DefenseRemoved { .. } => {
            info!(?event, "player action applied");
        }
        rejected => warn!(event = ?rejected, "player action rejected"),
    }
}
