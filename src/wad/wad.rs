//! Doom-format WAD container reader.
//!
//! Supports both `IWAD` (complete game data) and `PWAD` (patch, i.e.
//! user-supplied add-on levels) headers — the directory layout is identical,
//! only the four-byte magic differs.

use std::collections::HashMap;

use byteorder::{LittleEndian as LE, ReadBytesExt};
use std::{
    fs::File,
    io::{self, Read, Seek, SeekFrom},
    path::Path,
};
use thiserror::Error;

/// Size (in bytes) of one directory entry.
const DIR_ENTRY_SIZE: usize = 16;

/// Metadata for a single lump (asset) inside the WAD.
#[derive(Clone, Debug)]
pub struct LumpInfo {
    /// Eight-byte ASCII name, padded with NULs.
    pub name: [u8; 8],
    /// Offset to lump data from the beginning of the file.
    pub offset: u32,
    /// Size of the lump in bytes.
    pub size: u32,
}

/// Whether a loaded container was the base game data or a patch.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum WadKind {
    Iwad,
    Pwad,
}

/// Entire WAD resident in memory.
#[derive(Debug)]
pub struct Wad {
    pub kind: WadKind,
    /// Directory entries in the exact order they appear in the file.
    pub lumps: Vec<LumpInfo>,
    /// Backing buffer containing the raw file contents.
    bytes: Vec<u8>,
    /// fast name → index lookup
    by_name: HashMap<String, usize>,
}

/// Errors that can be encountered while opening/parsing a WAD.
#[derive(Error, Debug)]
pub enum WadError {
    /// Underlying I/O failure — propagated unchanged.
    #[error("I/O error: {0}")]
    Io(#[from] io::Error),

    /// Header magic was neither `IWAD` nor `PWAD`.
    #[error("not a WAD file (bad magic)")]
    BadMagic,

    /// Directory claims to extend past end-of-file.
    #[error("corrupt WAD: directory extends beyond end of file")]
    DirectoryOutOfBounds,
}

impl Wad {
    /// Load a WAD from disk into memory.
    ///
    /// The entire file is read into a `Vec<u8>` so subsequent lump requests
    /// are just slice operations.
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self, WadError> {
        let mut file = File::open(path)?;

        let mut id: [u8; 4] = [0; 4];
        file.read_exact(&mut id)?;
        let kind = match &id {
            b"IWAD" => WadKind::Iwad,
            b"PWAD" => WadKind::Pwad,
            _ => return Err(WadError::BadMagic),
        };

        let num_lumps = file.read_u32::<LE>()?;
        let dir_offset = file.read_u32::<LE>()?;

        let mut bytes = Vec::new();
        file.seek(SeekFrom::Start(0))?;
        file.read_to_end(&mut bytes)?;

        Self::from_bytes(kind, bytes, num_lumps, dir_offset)
    }

    /// Parse an already-loaded WAD image. Exposed mainly for tests that
    /// hand-craft small WAD images in memory without touching disk.
    pub fn from_bytes(
        kind: WadKind,
        bytes: Vec<u8>,
        num_lumps: u32,
        dir_offset: u32,
    ) -> Result<Self, WadError> {
        let dir_end = dir_offset as usize + num_lumps as usize * DIR_ENTRY_SIZE;
        if dir_end > bytes.len() {
            return Err(WadError::DirectoryOutOfBounds);
        }

        let mut lumps = Vec::with_capacity(num_lumps as usize);
        let mut cursor = &bytes[dir_offset as usize..dir_end];

        for _ in 0..num_lumps {
            let offset = cursor.read_u32::<LE>()?;
            let size = cursor.read_u32::<LE>()?;
            let mut name = [0u8; 8];
            cursor.read_exact(&mut name)?;
            lumps.push(LumpInfo { name, offset, size });
        }

        for l in &lumps {
            let end = l.offset as usize + l.size as usize;
            if end > bytes.len() {
                return Err(WadError::DirectoryOutOfBounds);
            }
        }

        let mut by_name = HashMap::with_capacity(lumps.len());
        // scan backwards so later lumps (patch overrides) win the lookup
        for (i, l) in lumps.iter().enumerate().rev() {
            by_name
                .entry(Self::lump_name(&l.name).to_owned())
                .or_insert(i);
        }

        Ok(Self {
            kind,
            lumps,
            bytes,
            by_name,
        })
    }

    /// Convert an eight-byte, NUL-padded lump name into a printable string.
    pub fn lump_name(raw: &[u8; 8]) -> &str {
        let end = raw.iter().position(|&b| b == 0).unwrap_or(raw.len());
        std::str::from_utf8(&raw[..end]).unwrap_or("?")
    }

    /// Borrow the raw bytes for lump `idx` without copying.
    pub fn lump_bytes(&self, idx: usize) -> &[u8] {
        assert!(idx < self.lumps.len(), "lump index out of bounds");
        let l = &self.lumps[idx];
        &self.bytes[l.offset as usize..(l.offset + l.size) as usize]
    }

    /// Locate a lump by name (case-sensitive). Returns its index in the
    /// directory, or `None` if missing.
    pub fn find_lump(&self, name: &str) -> Option<usize> {
        self.by_name.get(name).copied()
    }
}
