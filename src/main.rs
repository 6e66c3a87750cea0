//! Aberred Actions headless runner.
//!
//! Loads a JSON script file, spawns one scripted entity and simulates it
//! frame by frame at a fixed rate, printing a trace of its position and
//! script state. Anything its generator spawns runs in the same world, so
//! the summary at the end shows how many entities a pattern leaves alive.
//!
//! # Frame
//!
//! 1. Advance [`WorldTime`] by one fixed step
//! 2. `action_system` moves scripted entities and runs their generators
//! 3. `spawn_system` turns generator requests into entities
//! 4. `ttl_system` despawns expired projectiles
//!
//! # Running
//!
//! ```sh
//! cargo run --release -- --script assets/actions.json --list zako --frames 300
//! ```

use std::path::PathBuf;

use aberredactions::action::controller::ActionController;
use aberredactions::components::animation::Animation;
use aberredactions::components::mapposition::MapPosition;
use aberredactions::components::rotation::Rotation;
use aberredactions::components::zindex::ZIndex;
use aberredactions::events::vanish::observe_despawn_on_vanish;
use aberredactions::generators::{self, BurstPattern};
use aberredactions::resources::actionconfig::ActionConfig;
use aberredactions::resources::scriptstore::ScriptStore;
use aberredactions::resources::spawnbridge::setup_spawning;
use aberredactions::resources::worldtime::WorldTime;
use aberredactions::systems::action::action_system;
use aberredactions::systems::spawn::spawn_system;
use aberredactions::systems::time::update_world_time;
use aberredactions::systems::ttl::ttl_system;
use bevy_ecs::prelude::*;
use clap::Parser;

/// Aberred Actions headless runner
#[derive(Parser)]
#[command(version, about = "Simulate an action script without a window and print a trace.")]
struct Cli {
    /// INI configuration file.
    #[arg(long, value_name = "PATH", default_value = "./config.ini")]
    config: PathBuf,

    /// Script file, overriding `[scripts] path` from the configuration.
    #[arg(long, value_name = "PATH")]
    script: Option<PathBuf>,

    /// Script list to run (default: the first one in the file).
    #[arg(long, value_name = "NAME")]
    list: Option<String>,

    /// Sequence index within the list.
    #[arg(long, default_value_t = 0)]
    sequence: usize,

    /// Print the script names in the file and exit.
    #[arg(long)]
    names: bool,

    /// Number of frames to simulate.
    #[arg(long, default_value_t = 240)]
    frames: u32,

    /// Simulation rate, overriding `[simulation] fps`.
    #[arg(long)]
    fps: Option<u32>,

    /// Start position.
    #[arg(long, default_value_t = 0.0, allow_negative_numbers = true)]
    x: f32,
    #[arg(long, default_value_t = 0.0, allow_negative_numbers = true)]
    y: f32,

    /// Keep firing every this many seconds after a `Generate` step.
    #[arg(long, value_name = "SECONDS")]
    every: Option<f32>,

    /// Projectiles per volley.
    #[arg(long, default_value_t = 1)]
    burst: usize,

    /// Fan width of a volley in degrees (360 for a ring).
    #[arg(long, default_value_t = 30.0)]
    spread: f32,

    /// Projectile lifetime in seconds.
    #[arg(long)]
    ttl: Option<f32>,

    /// Print one trace line every this many frames.
    #[arg(long, default_value_t = 10)]
    trace_every: u32,
}

fn main() {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    let cli = Cli::parse();

    let mut config = ActionConfig::with_path(&cli.config);
    if let Err(e) = config.load_from_file() {
        log::warn!("{}, using defaults", e);
    }
    if let Some(script) = cli.script.clone() {
        config.scripts_path = script;
    }
    if let Some(fps) = cli.fps.filter(|fps| *fps > 0) {
        config.fps = fps;
    }

    let store = match ScriptStore::load_from_file(&config.scripts_path) {
        Ok(store) => store,
        Err(e) => {
            eprintln!(
                "Error loading scripts from {}: {e}",
                config.scripts_path.display()
            );
            std::process::exit(1);
        }
    };

    if cli.names {
        for name in store.names() {
            let sequences = store.get(name).map_or(0, |s| s.len());
            println!("{name} ({sequences} sequence(s))");
        }
        return;
    }

    let script = match &cli.list {
        Some(name) => store.get(name),
        None => store.first(),
    };
    let Some(script) = script else {
        eprintln!(
            "Error: script list {} not found",
            cli.list.as_deref().unwrap_or("<first>")
        );
        std::process::exit(1);
    };
    if cli.sequence >= script.len() {
        eprintln!(
            "Error: '{}' has {} sequence(s), no index {}",
            script.name(),
            script.len(),
            cli.sequence
        );
        std::process::exit(1);
    }

    log::info!(
        "Running '{}'[{}] for {} frames at {} fps",
        script.name(),
        cli.sequence,
        cli.frames,
        config.fps
    );

    // --------------- ECS world + resources ---------------
    let mut world = World::new();
    world.insert_resource(WorldTime::default().with_time_scale(config.time_scale));
    let tx = setup_spawning(&mut world);
    world.add_observer(observe_despawn_on_vanish);

    let generator = if cli.burst > 1 || cli.every.is_some() {
        generators::burst(
            tx,
            BurstPattern {
                interval: cli.every.unwrap_or(0.0),
                count: cli.burst.max(1),
                spread: cli.spread,
                ttl: cli.ttl,
                ..BurstPattern::default()
            },
        )
    } else {
        generators::single_shot(tx, cli.ttl)
    };
    let controller = ActionController::manual()
        .with_curve_settings(config.curve_settings())
        .with_generator(generator)
        .with_script(script, cli.sequence);
    let actor = world
        .spawn((
            MapPosition::new(cli.x, cli.y),
            ZIndex(0.0),
            Rotation::default(),
            Animation::default(),
            controller,
        ))
        .id();

    let frame_delta = config.frame_delta();
    world.insert_resource(config);
    world.insert_resource(store);
    world.flush();

    let mut update = Schedule::default();
    update.add_systems((action_system, spawn_system, ttl_system).chain());

    // --------------- Main loop ---------------
    println!("frame   time        x        y  seq step mode");
    for frame in 1..=cli.frames {
        update_world_time(&mut world, frame_delta);
        update.run(&mut world);
        world.clear_trackers();

        if world.get_entity(actor).is_err() {
            println!("{frame:5} actor vanished");
            break;
        }
        if cli.trace_every > 0 && frame % cli.trace_every == 0 {
            let time = world.resource::<WorldTime>().elapsed;
            let pos = world.get::<MapPosition>(actor).map(|p| p.pos).unwrap_or_default();
            if let Some(controller) = world.get::<ActionController>(actor) {
                println!(
                    "{frame:5} {time:6.2} {:8.2} {:8.2} {:4} {:4} {:?}{}",
                    pos.x,
                    pos.y,
                    controller.sequence_index(),
                    controller.step_index(),
                    controller.mode(),
                    if controller.is_idle() { " (idle)" } else { "" }
                );
            }
        }
    }

    let alive = world
        .query_filtered::<Entity, With<ActionController>>()
        .iter(&world)
        .filter(|e| *e != actor)
        .count();
    println!("spawned entities alive: {alive}");
}
