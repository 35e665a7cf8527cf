//! Name-interning replacement for the teacher's pixel-backed texture bank.
//!
//! This crate never rasterizes a frame, so there is nothing to decode from
//! `PLAYPAL`/`TEXTURE1`/`PNAMES`. What the physics core still needs out of
//! a material name is its *kind* — floor/ceiling materials drive terrain
//! response (splash vs. footprint) and the "SKY" ceiling special that
//! exempts a sector from the normal crush/clip rules. `MaterialBank` keeps
//! exactly that, structured the way [`crate::world::texture::TextureBank`]
//! structures its own name → id table.

use std::collections::HashMap;

/// Runtime handle for an interned material name.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct MaterialId(pub u16);

impl MaterialId {
    /// Sentinel for "no material" (e.g. a one-sided line's back lower/
    /// upper surface). Always index 0; `MaterialBank::new` reserves it.
    pub const NONE: MaterialId = MaterialId(0);
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum MaterialKind {
    Normal,
    Liquid,
    Sky,
}

#[derive(Debug, thiserror::Error, PartialEq, Eq)]
pub enum MaterialError {
    #[error("material id {0:?} out of range")]
    BadId(MaterialId),
}

struct Entry {
    name: String,
    kind: MaterialKind,
}

pub struct MaterialBank {
    by_name: HashMap<String, MaterialId>,
    entries: Vec<Entry>,
}

impl MaterialBank {
    pub fn new() -> Self {
        let mut by_name = HashMap::new();
        by_name.insert("-".to_owned(), MaterialId::NONE);
        Self {
            by_name,
            entries: vec![Entry {
                name: "-".to_owned(),
                kind: MaterialKind::Normal,
            }],
        }
    }

    /// Intern `name`, classifying it by the same substring conventions the
    /// original engine's flat-name table relies on (`F_SKY1`, `NUKAGE*`,
    /// `LAVA*`, `BLOOD*`, `WATER*` name liquids).
    pub fn intern(&mut self, name: &str) -> MaterialId {
        if let Some(&id) = self.by_name.get(name) {
            return id;
        }
        let kind = classify(name);
        let id = MaterialId(self.entries.len() as u16);
        self.entries.push(Entry {
            name: name.to_owned(),
            kind,
        });
        self.by_name.insert(name.to_owned(), id);
        id
    }

    pub fn name(&self, id: MaterialId) -> Result<&str, MaterialError> {
        self.entries
            .get(id.0 as usize)
            .map(|e| e.name.as_str())
            .ok_or(MaterialError::BadId(id))
    }

    pub fn kind(&self, id: MaterialId) -> MaterialKind {
        self.entries
            .get(id.0 as usize)
            .map(|e| e.kind)
            .unwrap_or(MaterialKind::Normal)
    }

    pub fn is_sky(&self, id: MaterialId) -> bool {
        self.kind(id) == MaterialKind::Sky
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.len() == 1
    }
}

impl Default for MaterialBank {
    fn default() -> Self {
        Self::new()
    }
}

fn classify(name: &str) -> MaterialKind {
    if name.starts_with("F_SKY") {
        MaterialKind::Sky
    } else if name.starts_with("NUKAGE")
        || name.starts_with("LAVA")
        || name.starts_with("BLOOD")
        || name.starts_with("FWATER")
        || name.starts_with("WATER")
    {
        MaterialKind::Liquid
    } else {
        MaterialKind::Normal
    }
}
