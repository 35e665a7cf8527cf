//! Doom **map-lump parser** — builds on [`crate::wad::Wad`].
//!
//! Classic Doom stores each playable map as **eight mandatory lumps**
//! following a *zero-length marker* (`E1M1`, `MAP01`, …):
//!
//! ```text
//! [marker] THINGS LINEDEFS SIDEDEFS VERTEXES SEGS SSECTORS NODES SECTORS
//! ```
//!
//! This module adds two helpers to `Wad`:
//!
//! * `level_indices()` — discover all marker lumps.
//! * `parse_level()`   — decode a single map into raw, still-index-based
//!   structures. [`crate::wad::loader`] turns these into the
//!   [`crate::world::geometry`] model the simulation actually runs on.

use crate::wad::Wad;
use byteorder::{LittleEndian as LE, ReadBytesExt};
use once_cell::sync::Lazy;
use regex::Regex;
use std::io::{Cursor, Read};

/// An in-world object: monster, pickup, player start, etc.
#[derive(Clone, Debug)]
pub struct RawThing {
    pub x: i16,
    pub y: i16,
    pub angle: u16,
    pub type_: u16,
    pub flags: u16,
}

/// A map edge.
#[derive(Clone, Debug)]
pub struct RawLinedef {
    pub v1: u16,
    pub v2: u16,
    pub flags: u16,
    pub special: u16,
    pub tag: u16,
    pub right: u16,
    pub left: u16,
}

/// Texture information for one side of a linedef.
#[derive(Clone, Debug)]
pub struct RawSidedef {
    pub x_off: i16,
    pub y_off: i16,
    pub upper: [u8; 8],
    pub lower: [u8; 8],
    pub middle: [u8; 8],
    pub sector: u16,
}

/// A vertex in map space.
#[derive(Clone, Debug)]
pub struct RawVertex {
    pub x: i16,
    pub y: i16,
}

/// Segment (part of a linedef inside a subsector).
#[derive(Clone, Debug)]
pub struct RawSeg {
    pub v1: u16,
    pub v2: u16,
    pub angle: i16,
    pub linedef: u16,
    pub dir: u16,
    pub offset: i16,
}

/// BSP leaf.
#[derive(Clone, Debug)]
pub struct RawSubsector {
    pub seg_count: u16,
    pub first_seg: u16,
}

/// One BSP node that splits space.
#[derive(Clone, Debug)]
pub struct RawNode {
    pub x: i16,
    pub y: i16,
    pub dx: i16,
    pub dy: i16,
    /// [front: top, bottom, left, right] then [back: …]
    pub bbox: [[i16; 4]; 2],
    /// Child indices — bit 15 set ⇒ child is a subsector.
    pub child: [u16; 2],
}

/// A convex sector region (floor/ceiling/light).
#[derive(Clone, Debug)]
pub struct RawSector {
    pub floor: i16,
    pub ceil: i16,
    pub floor_tex: [u8; 8],
    pub ceil_tex: [u8; 8],
    pub light: i16,
    pub special: i16,
    pub tag: i16,
}

/// Still-index-based decoding of one map's eight lumps.
#[derive(Clone, Debug)]
pub struct RawLevel {
    pub things: Vec<RawThing>,
    pub linedefs: Vec<RawLinedef>,
    pub sidedefs: Vec<RawSidedef>,
    pub vertices: Vec<RawVertex>,
    pub segs: Vec<RawSeg>,
    pub subsectors: Vec<RawSubsector>,
    pub nodes: Vec<RawNode>,
    pub sectors: Vec<RawSector>,
}

/// Things that can go wrong while decoding.
#[derive(thiserror::Error, Debug)]
pub enum LevelError {
    #[error("level marker idx {0} out of range")]
    MarkerOob(usize),
    #[error("required lump {0} missing between markers")]
    Missing(&'static str),
    #[error("truncated lump {0}")]
    Truncated(&'static str),
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

impl Wad {
    /// Return directory indices of every map marker (`E#M#`, `MAP##`).
    pub fn level_indices(&self) -> Vec<usize> {
        static RE: Lazy<Regex> =
            Lazy::new(|| Regex::new(r"^(E[1-4]M[1-9]|MAP[0-3][0-9])$").unwrap());

        self.lumps
            .iter()
            .enumerate()
            .filter(|(_, l)| l.size == 0 && RE.is_match(Wad::lump_name(&l.name)))
            .map(|(i, _)| i)
            .collect()
    }

    /// Deserialize the eight mandatory lumps that form one map.
    pub fn parse_level(&self, marker_idx: usize) -> Result<RawLevel, LevelError> {
        if marker_idx >= self.lumps.len() {
            return Err(LevelError::MarkerOob(marker_idx));
        }

        let mut span_end = self.lumps.len();
        for i in marker_idx + 1..self.lumps.len() {
            if self.lumps[i].size == 0 {
                span_end = i;
                break;
            }
        }

        let find = |name: &str| -> Option<usize> {
            self.lumps[marker_idx + 1..span_end]
                .iter()
                .position(|l| Wad::lump_name(&l.name) == name)
                .map(|rel| rel + marker_idx + 1)
        };

        const NEED: &[&str] = &[
            "THINGS", "LINEDEFS", "SIDEDEFS", "VERTEXES", "SEGS", "SSECTORS", "NODES", "SECTORS",
        ];
        for &n in NEED {
            if find(n).is_none() {
                return Err(LevelError::Missing(n));
            }
        }

        macro_rules! parse_vec {
            ($buf:expr, $size:expr, $body:expr) => {{
                if $buf.len() % $size != 0 {
                    return Err(LevelError::Truncated(stringify!($body)));
                }
                let mut cur = Cursor::new($buf);
                let mut v = Vec::with_capacity($buf.len() / $size);
                while (cur.position() as usize) < $buf.len() {
                    v.push($body(&mut cur)?);
                }
                v
            }};
        }

        let things = {
            let buf = self.lump_bytes(find("THINGS").unwrap());
            parse_vec!(
                buf,
                10,
                |c: &mut Cursor<&[u8]>| -> std::io::Result<RawThing> {
                    Ok(RawThing {
                        x: c.read_i16::<LE>()?,
                        y: c.read_i16::<LE>()?,
                        angle: c.read_u16::<LE>()?,
                        type_: c.read_u16::<LE>()?,
                        flags: c.read_u16::<LE>()?,
                    })
                }
            )
        };

        let linedefs = {
            let buf = self.lump_bytes(find("LINEDEFS").unwrap());
            parse_vec!(
                buf,
                14,
                |c: &mut Cursor<&[u8]>| -> std::io::Result<RawLinedef> {
                    Ok(RawLinedef {
                        v1: c.read_u16::<LE>()?,
                        v2: c.read_u16::<LE>()?,
                        flags: c.read_u16::<LE>()?,
                        special: c.read_u16::<LE>()?,
                        tag: c.read_u16::<LE>()?,
                        right: c.read_u16::<LE>()?,
                        left: c.read_u16::<LE>()?,
                    })
                }
            )
        };

        let sidedefs = {
            let buf = self.lump_bytes(find("SIDEDEFS").unwrap());
            let read_tex = |c: &mut Cursor<&[u8]>| -> std::io::Result<[u8; 8]> {
                let mut t = [0u8; 8];
                c.read_exact(&mut t)?;
                Ok(t)
            };
            parse_vec!(
                buf,
                30,
                |c: &mut Cursor<&[u8]>| -> std::io::Result<RawSidedef> {
                    Ok(RawSidedef {
                        x_off: c.read_i16::<LE>()?,
                        y_off: c.read_i16::<LE>()?,
                        upper: read_tex(c)?,
                        lower: read_tex(c)?,
                        middle: read_tex(c)?,
                        sector: c.read_u16::<LE>()?,
                    })
                }
            )
        };

        let vertices = {
            let buf = self.lump_bytes(find("VERTEXES").unwrap());
            parse_vec!(
                buf,
                4,
                |c: &mut Cursor<&[u8]>| -> std::io::Result<RawVertex> {
                    Ok(RawVertex {
                        x: c.read_i16::<LE>()?,
                        y: c.read_i16::<LE>()?,
                    })
                }
            )
        };

        let segs = {
            let buf = self.lump_bytes(find("SEGS").unwrap());
            parse_vec!(
                buf,
                12,
                |c: &mut Cursor<&[u8]>| -> std::io::Result<RawSeg> {
                    Ok(RawSeg {
                        v1: c.read_u16::<LE>()?,
                        v2: c.read_u16::<LE>()?,
                        angle: c.read_i16::<LE>()?,
                        linedef: c.read_u16::<LE>()?,
                        dir: c.read_u16::<LE>()?,
                        offset: c.read_i16::<LE>()?,
                    })
                }
            )
        };

        let subsectors = {
            let buf = self.lump_bytes(find("SSECTORS").unwrap());
            parse_vec!(
                buf,
                4,
                |c: &mut Cursor<&[u8]>| -> std::io::Result<RawSubsector> {
                    Ok(RawSubsector {
                        seg_count: c.read_u16::<LE>()?,
                        first_seg: c.read_u16::<LE>()?,
                    })
                }
            )
        };

        let nodes = {
            let buf = self.lump_bytes(find("NODES").unwrap());
            parse_vec!(
                buf,
                28,
                |c: &mut Cursor<&[u8]>| -> std::io::Result<RawNode> {
                    Ok(RawNode {
                        x: c.read_i16::<LE>()?,
                        y: c.read_i16::<LE>()?,
                        dx: c.read_i16::<LE>()?,
                        dy: c.read_i16::<LE>()?,
                        bbox: [
                            [
                                c.read_i16::<LE>()?,
                                c.read_i16::<LE>()?,
                                c.read_i16::<LE>()?,
                                c.read_i16::<LE>()?,
                            ],
                            [
                                c.read_i16::<LE>()?,
                                c.read_i16::<LE>()?,
                                c.read_i16::<LE>()?,
                                c.read_i16::<LE>()?,
                            ],
                        ],
                        child: [c.read_u16::<LE>()?, c.read_u16::<LE>()?],
                    })
                }
            )
        };

        let sectors = {
            let buf = self.lump_bytes(find("SECTORS").unwrap());
            let read_tex = |c: &mut Cursor<&[u8]>| -> std::io::Result<[u8; 8]> {
                let mut t = [0u8; 8];
                c.read_exact(&mut t)?;
                Ok(t)
            };
            parse_vec!(
                buf,
                26,
                |c: &mut Cursor<&[u8]>| -> std::io::Result<RawSector> {
                    Ok(RawSector {
                        floor: c.read_i16::<LE>()?,
                        ceil: c.read_i16::<LE>()?,
                        floor_tex: read_tex(c)?,
                        ceil_tex: read_tex(c)?,
                        light: c.read_i16::<LE>()?,
                        special: c.read_i16::<LE>()?,
                        tag: c.read_i16::<LE>()?,
                    })
                }
            )
        };

        Ok(RawLevel {
            things,
            linedefs,
            sidedefs,
            vertices,
            segs,
            subsectors,
            nodes,
            sectors,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::wad::WadKind;

    /// Hand-build a one-map WAD: THINGS (1 entry) + the minimum empty
    /// lumps needed to satisfy `parse_level`'s mandatory-lump check.
    fn toy_map_wad() -> Wad {
        let mut bytes = Vec::new();
        bytes.extend_from_slice(b"PWAD");
        // lumps: MAP01(marker,0), THINGS(10), LINEDEFS(0), SIDEDEFS(0),
        // VERTEXES(0), SEGS(0), SSECTORS(0), NODES(0), SECTORS(0)
        let names: &[&[u8; 8]] = &[
            b"MAP01\0\0\0",
            b"THINGS\0\0",
            b"LINEDEFS",
            b"SIDEDEFS",
            b"VERTEXES",
            b"SEGS\0\0\0\0",
            b"SSECTORS",
            b"NODES\0\0\0",
            b"SECTORS\0",
        ];
        let mut payload = Vec::new();
        // one THINGS entry: player 1 start, type 1
        payload.extend(&0i16.to_le_bytes()); // x
        payload.extend(&0i16.to_le_bytes()); // y
        payload.extend(&90u16.to_le_bytes()); // angle
        payload.extend(&1u16.to_le_bytes()); // type
        payload.extend(&7u16.to_le_bytes()); // flags
        let sizes = [0u32, payload.len() as u32, 0, 0, 0, 0, 0, 0, 0];

        let header_len = 12;
        let mut offset = header_len as u32;
        let mut dir = Vec::new();
        for (name, size) in names.iter().zip(sizes.iter()) {
            dir.push((offset, *size, **name));
            if *name == b"THINGS\0\0" {
                offset += *size;
            }
        }
        bytes.extend(&(names.len() as u32).to_le_bytes());
        let dir_offset_pos = bytes.len();
        bytes.extend(&0u32.to_le_bytes()); // placeholder, patched below
        bytes.extend_from_slice(&payload);
        let dir_offset = bytes.len() as u32;
        bytes[dir_offset_pos..dir_offset_pos + 4].copy_from_slice(&dir_offset.to_le_bytes());
        for (off, size, name) in &dir {
            bytes.extend(&off.to_le_bytes());
            bytes.extend(&size.to_le_bytes());
            bytes.extend_from_slice(name);
        }

        Wad::from_bytes(WadKind::Pwad, bytes, names.len() as u32, dir_offset).unwrap()
    }

    #[test]
    fn finds_the_one_marker() {
        let wad = toy_map_wad();
        assert_eq!(wad.level_indices(), vec![0]);
    }

    #[test]
    fn parses_player_start() {
        let wad = toy_map_wad();
        let level = wad.parse_level(0).expect("parse");
        assert_eq!(level.things.len(), 1);
        assert_eq!(level.things[0].type_, 1, "player 1 start missing?");
    }

    #[test]
    fn rejects_marker_past_end() {
        let wad = toy_map_wad();
        assert!(matches!(
            wad.parse_level(999),
            Err(LevelError::MarkerOob(999))
        ));
    }
}
