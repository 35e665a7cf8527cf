//! Owns every live mobj: the `hecs::World` component storage, the spatial
//! grid kept in sync with it, and a deferred-removal queue so a mobj
//! touched mid-iteration (e.g. killed by a crusher while `ChangeSector`
//! is still walking the sector's mobj list) is never freed while
//! something still holds its `Entity`.
//!
//! Grounded on the teacher's `sim/mob.rs` (`spawn_mobj`) and
//! `sim/spacial.rs` (`ThingGrid`), generalized to also track a sector-link
//! analogue of the original's intrusive `sector_list`.

use glam::{Vec2, Vec3};
use hecs::{Entity, World};

use crate::defs::flags::MobjFlags;
use crate::defs::{MobjInfo, State};
use crate::mobj::components::{ActorFlags, Angle, Animation, Class, Health, Position, Size, Velocity};
use crate::mobj::grid::{ThingGrid, ThingSpatial};
use crate::world::{Level, SubsectorId};

pub struct MobjTable {
    pub world: World,
    pub grid: ThingGrid,
    pending_removal: Vec<Entity>,
}

impl MobjTable {
    pub fn new(grid_origin: Vec2) -> MobjTable {
        MobjTable {
            world: World::new(),
            grid: ThingGrid::new(grid_origin),
            pending_removal: Vec::new(),
        }
    }

    /// Spawn a new mobj of `info` at `pos` in `subsector`, linking it
    /// into the spatial grid unless it carries `NOBLOCKMAP`.
    pub fn spawn(
        &mut self,
        level: &Level,
        info: &'static MobjInfo,
        pos: Vec2,
        angle: f32,
        subsector: SubsectorId,
    ) -> Entity {
        let sector = &level.sectors[level.sector_of_subsector(subsector).index()];
        let z = if info.flags.contains(MobjFlags::SPAWNCEILING) {
            sector.ceiling.height - info.height
        } else {
            sector.floor.height
        };

        let position = Position(pos, z);
        let class = Class(info);
        let flags = ActorFlags(info.flags);
        let size = Size::of(info);
        let ent = self.world.spawn((
            flags,
            position,
            Velocity(Vec3::ZERO),
            Angle(angle),
            crate::mobj::components::Subsector(subsector),
            Animation {
                state: info.spawnstate,
                tics: info.spawnstate.tics(),
            },
            class,
            size,
            Health(info.spawnhealth),
        ));

        if !flags.0.contains(MobjFlags::NOBLOCKMAP) {
            self.grid.insert(ThingSpatial {
                ent,
                pos: position,
                class,
                flags,
                size,
            });
        }
        ent
    }

    /// Mark a mobj for removal at the next `flush_removals` call rather
    /// than despawning it immediately — the caller may be mid-iteration
    /// over `self.world`/`self.grid`.
    pub fn queue_removal(&mut self, ent: Entity) {
        self.pending_removal.push(ent);
    }

    /// Actually despawn everything queued since the last flush. Call this
    /// between simulation phases, never from inside a query.
    pub fn flush_removals(&mut self) {
        for ent in self.pending_removal.drain(..) {
            if let Ok((pos, class, flags, size)) = self
                .world
                .query_one_mut::<(&Position, &Class, &ActorFlags, &Size)>(ent)
                .map(|(p, c, f, s)| (*p, *c, *f, *s))
            {
                self.grid.remove(&ThingSpatial {
                    ent,
                    pos,
                    class,
                    flags,
                    size,
                });
            }
            let _ = self.world.despawn(ent);
        }
    }

    pub fn set_state(&mut self, ent: Entity, state: State) {
        if let Ok(mut anim) = self.world.get::<&mut Animation>(ent) {
            anim.state = state;
            anim.tics = state.tics();
        }
    }
}
