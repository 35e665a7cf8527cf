//! Headless driver: loads a map from a WAD, spawns its things into a
//! [`MobjTable`], and runs a fixed number of tics through the movement
//! core, logging what happened. Exercises the same load → spawn → tick
//! path a game loop built on this crate would, without any renderer.
//!
//! ```bash
//! demo <doom.wad> [map_idx] [tics]
//! ```

use anyhow::{bail, Context, Result};
use glam::Vec2;
use log::info;

use doomcore::config::Config;
use doomcore::defs::{MobjInfo, MOBJINFO};
use doomcore::interfaces::{Activation, GameRules};
use doomcore::mobj::components::Position;
use doomcore::mobj::MobjTable;
use doomcore::movement::try_move;
use doomcore::rng::Rng;
use doomcore::wad::Wad;
use doomcore::world::material::MaterialBank;
use doomcore::world::Level;
use hecs::Entity;

/// Rules that log every hook instead of running actual game logic —
/// enough to drive the movement core standalone.
struct LoggingRules;

impl GameRules for LoggingRules {
    fn cross_special_line(&mut self, line: doomcore::world::LineId, mob: Entity, side: i32, activation: Activation) {
        info!("cross_special_line line={line:?} mob={mob:?} side={side} activation={activation:?}");
    }
    fn touch_special(&mut self, pickup: Entity, picker: Entity) {
        info!("touch_special pickup={pickup:?} picker={picker:?}");
    }
    fn damage_mob(&mut self, target: Entity, _inflictor: Option<Entity>, _source: Option<Entity>, amount: i32, _stomp: bool) -> i32 {
        info!("damage_mob target={target:?} amount={amount}");
        amount
    }
    fn change_mob_state(&mut self, mob: Entity, state: doomcore::defs::State) {
        info!("change_mob_state mob={mob:?} state={state:?}");
    }
    fn remove_mob(&mut self, mob: Entity) {
        info!("remove_mob mob={mob:?}");
    }
    fn floor_terrain(&self, _mob: Entity) -> doomcore::defs::TerrainResponse {
        doomcore::defs::TerrainResponse::None
    }
}

fn info_for_doomednum(n: u16) -> Option<&'static MobjInfo> {
    MOBJINFO.iter().find(|info| info.doomednum == n as i32).copied()
}

fn spawn_things(level: &Level, table: &mut MobjTable) -> usize {
    let mut spawned = 0;
    for thing in &level.things {
        let Some(info) = info_for_doomednum(thing.doomednum) else {
            continue;
        };
        let subsector = level.locate_subsector(thing.pos);
        table.spawn(level, info, thing.pos, thing.angle, subsector);
        spawned += 1;
    }
    spawned
}

fn run_tics<R: GameRules>(level: &Level, table: &mut MobjTable, rules: &mut R, config: &Config, rng: &mut Rng, tics: u32) {
    for tic in 0..tics {
        let entities: Vec<Entity> = table.world.iter().map(|r| r.entity()).collect();
        for ent in entities {
            let Ok((pos, vel)) = table
                .world
                .query_one_mut::<(&Position, &doomcore::mobj::components::Velocity)>(ent)
                .map(|(p, v)| (*p, *v))
            else {
                continue;
            };
            if vel.0 == Vec2::ZERO {
                continue;
            }
            let target = pos.0 + vel.0;
            let _ = try_move(level, table, rules, config, ent, target, false);
        }
        let _ = rng.random();
        if tic % 35 == 0 {
            info!("tic {tic}: {} mobjs live", table.world.len());
        }
    }
}

fn main() -> Result<()> {
    env_logger::init();

    let mut args = std::env::args().skip(1);
    let wad_path = args.next().context("usage: demo <doom.wad> [map_idx] [tics]")?;
    let map_idx: usize = args.next().map(|s| s.parse()).transpose()?.unwrap_or(0);
    let tics: u32 = args.next().map(|s| s.parse()).transpose()?.unwrap_or(35);

    let wad = Wad::from_file(&wad_path)?;
    let markers = wad.level_indices();
    if map_idx >= markers.len() {
        bail!("map_idx {map_idx} out of range ({} maps in {wad_path})", markers.len());
    }

    let mut bank = MaterialBank::new();
    let level = doomcore::wad::load_level(&wad, markers[map_idx], &mut bank)?;
    info!("loaded {} ({} lines, {} sectors, {} things)", level.name, level.lines.len(), level.sectors.len(), level.things.len());

    let origin = level.blockmap.origin;
    let mut table = MobjTable::new(origin);
    let spawned = spawn_things(&level, &mut table);
    info!("spawned {spawned} mobjs");

    let mut rules = LoggingRules;
    let config = Config::default();
    let mut rng = Rng::new(0);
    run_tics(&level, &mut table, &mut rules, &config, &mut rng, tics);

    info!("ran {tics} tics");
    Ok(())
}
