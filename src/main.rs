//! Grapple Run entry point
//!
//! Headless native driver: builds a world from a seed, runs a scripted
//! session at the fixed timestep and dumps a JSON run summary. Interactive
//! embedders (renderer, input, HUD) use the library crate directly and feed
//! real input snapshots instead of the script.

use std::time::{Duration, Instant, SystemTime, UNIX_EPOCH};

use glam::Vec2;

use grapple_run::consts::{MAX_SUBSTEPS, SIM_DT};
use grapple_run::sim::{GamePhase, TickInput, World};

fn main() {
    env_logger::init();

    let mut args = std::env::args().skip(1);
    let seed = match args.next() {
        Some(raw) => match raw.parse::<u64>() {
            Ok(seed) => seed,
            Err(_) => {
                eprintln!("usage: grapple-run [seed] [seconds]");
                std::process::exit(2);
            }
        },
        None => SystemTime::now()
            .duration_since(UNIX_EPOCH)
            .map(|d| d.as_nanos() as u64)
            .unwrap_or(0),
    };
    let seconds: u64 = match args.next() {
        Some(raw) => match raw.parse() {
            Ok(s) => s,
            Err(_) => {
                eprintln!("usage: grapple-run [seed] [seconds]");
                std::process::exit(2);
            }
        },
        None => 10,
    };

    log::info!("starting run: seed={seed}, {seconds}s at {:.0} Hz", 1.0 / SIM_DT);

    let mut world = World::new(seed, 1280.0, 720.0);
    let total_ticks = seconds * 60;

    let mut last = Instant::now();
    let mut accumulator = 0.0f32;
    let mut events_seen = 0usize;

    while world.tick_count < total_ticks && world.phase != GamePhase::GameOver {
        let now = Instant::now();
        let mut dt = (now - last).as_secs_f32();
        last = now;
        // A stall (debugger, suspend) collapses to a single frame instead of
        // a catch-up burst
        if dt > 0.25 {
            dt = SIM_DT;
        }
        accumulator += dt;

        let mut substeps = 0;
        while accumulator >= SIM_DT && substeps < MAX_SUBSTEPS {
            let input = scripted_input(&world);
            world.tick(&input);
            events_seen += world.events.len();
            for event in world.events.drain(..) {
                log::trace!("event: {event:?}");
            }
            accumulator -= SIM_DT;
            substeps += 1;

            if world.tick_count % 300 == 0 {
                log::info!(
                    "t={}s x={:.0} ${} lives={} creatures={} coins={}",
                    world.tick_count / 60,
                    world.player.body.pos.x,
                    world.player.money,
                    world.player.lives,
                    world.creatures.len(),
                    world.coins.len()
                );
            }
        }

        std::thread::sleep(Duration::from_millis(1));
    }

    let summary = serde_json::json!({
        "seed": world.seed,
        "ticks": world.tick_count,
        "phase": world.phase,
        "distance_m": world.distance_m(),
        "money": world.player.money,
        "lives": world.player.lives,
        "creatures_live": world.creatures.len(),
        "obstacles_live": world.obstacles.len(),
        "holes": world.terrain.holes().len(),
        "events_emitted": events_seen,
    });
    match serde_json::to_string_pretty(&summary) {
        Ok(text) => println!("{text}"),
        Err(err) => eprintln!("summary serialization failed: {err}"),
    }
}

/// Deterministic demo input: run right, hop, lob the harpoon ahead and drop
/// the occasional lure
fn scripted_input(world: &World) -> TickInput {
    let t = world.tick_count;
    TickInput {
        move_left: false,
        move_right: true,
        jump: t % 180 < 25,
        aim: world.player.body.pos + Vec2::new(300.0, -120.0),
        fire_held: t % 240 < 40,
        drop_lure: t.is_multiple_of(300),
        interact: t.is_multiple_of(90),
    }
}
