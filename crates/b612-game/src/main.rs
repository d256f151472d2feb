//! Headless B612 run: orbit, zoom onto a planet, walk, talk to its host and
//! leave again, logging every step.
//!
//! Run with: `cargo run -p b612-game --bin b612-sim -- --planet lamplighter`

use b612_config::{CliArgs, Config};
use b612_game::{FIXED_DT, FrameInput, FrameLoop, LogDialogueSink, Session, Settings, ViewModeKind};
use b612_input::{ActionMap, ActionState, KeyboardState, OrbitAxes, RawKeyEvent};
use b612_scene::{AssetGroup, PresetLighting, SceneDef, SceneError};
use b612_surface::Ray;
use clap::Parser;
use tracing::{info, warn};
use winit::event::ElementState;
use winit::keyboard::{KeyCode, PhysicalKey};

type SimSession = Session<PresetLighting, LogDialogueSink>;

/// CLI arguments for the headless run.
#[derive(Parser, Debug)]
#[command(name = "b612-sim", about = "Walk on a small sphere, headless")]
struct SimArgs {
    #[command(flatten)]
    common: CliArgs,

    /// Planet to visit.
    #[arg(long, default_value = "drunkard")]
    planet: String,

    /// Frames to walk forward once on the surface.
    #[arg(long, default_value_t = 120)]
    walk_frames: u32,

    /// Times to click the planet's host.
    #[arg(long, default_value_t = 6)]
    clicks: u32,
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    let args = SimArgs::parse();

    let config_dir = match &args.common.config {
        Some(dir) => dir.clone(),
        None => Config::default_dir()?,
    };
    let mut config = Config::load_or_create(&config_dir)?;
    config.apply_cli_overrides(&args.common);

    b612_log::init_logging(
        args.common.log_dir.as_deref(),
        cfg!(debug_assertions),
        Some(&config),
    );

    info!("B612 - headless run");
    info!(
        "Zoom: {} frames | Speed: {} | Up policy: {:?}",
        config.view.zoom_duration_frames, config.locomotion.speed, config.camera.up_policy
    );

    let scene = SceneDef::builtin()?;
    let mut session = Session::new(
        &scene,
        Settings::from_config(&config),
        scene.lighting_presets(),
        LogDialogueSink::new(),
    )?;
    let groups: Vec<AssetGroup> = session.asset_groups().cloned().collect();
    for group in &groups {
        session.on_assets_loaded(group)?;
    }

    let planet = session
        .spheres()
        .id_of(&args.planet)
        .and_then(|id| session.spheres().sphere(id).copied())
        .ok_or_else(|| SceneError::UnknownSphere(args.planet.clone()))?;

    let mut frame_loop = FrameLoop::new();

    // Orbit for a second.
    run(&mut frame_loop, &mut session, 60, FrameInput::default());

    // Click the planet.
    let click = Ray::through(session.camera().position, planet.center());
    run(
        &mut frame_loop,
        &mut session,
        1,
        FrameInput {
            click,
            ..FrameInput::default()
        },
    );
    if session.mode().kind() == ViewModeKind::Orbit {
        warn!(planet = %args.planet, "pick missed, nothing to visit");
        return Ok(());
    }

    let zoom_frames = config.view.zoom_duration_frames.max(1) + 1;
    run(&mut frame_loop, &mut session, zoom_frames, FrameInput::default());
    log_camera(&session, "landed");

    // Hold W for the walk.
    let bindings = ActionMap::default();
    let mut keyboard = KeyboardState::new();
    key(&mut keyboard, KeyCode::KeyW, ElementState::Pressed);
    let walk = FrameInput::from_actions(
        &ActionState::resolve(&keyboard, &bindings),
        None,
        FIXED_DT,
    );
    run(&mut frame_loop, &mut session, args.walk_frames, walk);
    key(&mut keyboard, KeyCode::KeyW, ElementState::Released);
    keyboard.clear_transients();
    if let Some(agent) = session.agent() {
        info!(
            position = ?agent.pose.position,
            altitude = planet.altitude(agent.pose.position),
            "walked"
        );
    }

    let orbit = |yaw, pitch| FrameInput {
        orbit: OrbitAxes { yaw, pitch },
        ..FrameInput::default()
    };
    run(&mut frame_loop, &mut session, 30, orbit(1, 0));
    run(&mut frame_loop, &mut session, 30, orbit(0, 1));
    log_camera(&session, "orbited");

    for _ in 0..args.clicks {
        let Some(host) = session.current_host().map(|(_, handle)| handle.pose.position) else {
            warn!(planet = %args.planet, "no host to talk to");
            break;
        };
        let click = FrameInput {
            click: Ray::through(session.camera().position, host),
            ..FrameInput::default()
        };
        run(&mut frame_loop, &mut session, 1, click);
        run(&mut frame_loop, &mut session, 30, FrameInput::default());
    }
    let minigame_done = FrameInput {
        minigame_complete: true,
        ..FrameInput::default()
    };
    run(&mut frame_loop, &mut session, 1, minigame_done);

    key(&mut keyboard, KeyCode::Escape, ElementState::Pressed);
    let back = FrameInput::from_actions(
        &ActionState::resolve(&keyboard, &bindings),
        None,
        FIXED_DT,
    );
    run(&mut frame_loop, &mut session, 1, back);
    log_camera(&session, "back in orbit");

    info!(
        frames = frame_loop.update_count(),
        sim_time = frame_loop.total_sim_time(),
        lines = session.sink().shown().len(),
        rewards = session.rewards().count(),
        "done"
    );
    Ok(())
}

fn run(frame_loop: &mut FrameLoop, session: &mut SimSession, frames: u32, input: FrameInput) {
    for _ in 0..frames {
        frame_loop.tick(FIXED_DT, |dt| {
            let output = session.update(&FrameInput { dt, ..input });
            for event in &output.events {
                info!(frame = output.frame, mode = %output.mode, ?event);
            }
        });
    }
}

fn key(keyboard: &mut KeyboardState, code: KeyCode, state: ElementState) {
    keyboard.process_raw(RawKeyEvent {
        key: PhysicalKey::Code(code),
        state,
        repeat: false,
    });
}

fn log_camera(session: &SimSession, label: &str) {
    let camera = session.camera();
    info!(
        mode = %session.mode().kind(),
        position = ?camera.position,
        up = ?camera.up,
        target = ?camera.target,
        "{label}"
    );
}
