//! Immutable catalogs of boards and packs.
//!
//! Catalogs are loaded eagerly, one record per file, and never change
//! afterwards. A [`Registry`] owns both catalogs; it is built once by the
//! composition root and handed to consumers by reference.
//!
//! Layout under a data root:
//! ```text
//! <root>/
//!   boards/
//!     nucleo_f091rc.toml      # one record per board (.toml or .json)
//!   packs/
//!     stm32f0/
//!       pack.toml             # pack record (or pack.json)
//!       templates/            # files named by the pack's bindings
//! ```

use std::collections::BTreeMap;
use std::fmt;
use std::path::{Path, PathBuf};

use crate::board::BoardDefinition;
use crate::error::{CatalogError, Result};
use crate::pack::PackDefinition;
use crate::parse::{self, RecordFormat};

/// Which kind of record a catalog holds.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EntryKind {
    Board,
    Pack,
}

impl EntryKind {
    /// Capitalized name for the start of messages.
    pub fn title(self) -> &'static str {
        match self {
            EntryKind::Board => "Board",
            EntryKind::Pack => "Pack",
        }
    }

    /// Conventional directory name under a data root.
    pub fn dir_name(self) -> &'static str {
        match self {
            EntryKind::Board => "boards",
            EntryKind::Pack => "packs",
        }
    }
}

impl fmt::Display for EntryKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            EntryKind::Board => f.write_str("board"),
            EntryKind::Pack => f.write_str("pack"),
        }
    }
}

/// A record that can live in a [`Catalog`].
pub trait CatalogEntry {
    const KIND: EntryKind;

    fn id(&self) -> &str;

    /// The record file, for duplicate-id reports.
    fn origin(&self) -> &Path;
}

impl CatalogEntry for BoardDefinition {
    const KIND: EntryKind = EntryKind::Board;

    fn id(&self) -> &str {
        &self.id
    }

    fn origin(&self) -> &Path {
        &self.source
    }
}

impl CatalogEntry for PackDefinition {
    const KIND: EntryKind = EntryKind::Pack;

    fn id(&self) -> &str {
        &self.id
    }

    fn origin(&self) -> &Path {
        &self.source
    }
}

/// Records of one kind, keyed by id.
#[derive(Debug, Clone)]
pub struct Catalog<T> {
    dir: PathBuf,
    entries: BTreeMap<String, T>,
}

pub type BoardCatalog = Catalog<BoardDefinition>;
pub type PackCatalog = Catalog<PackDefinition>;

impl<T: CatalogEntry> Catalog<T> {
    /// Build a catalog from already-loaded records, rejecting duplicate ids.
    pub fn from_entries(dir: impl Into<PathBuf>, entries: impl IntoIterator<Item = T>) -> Result<Self> {
        let mut map: BTreeMap<String, T> = BTreeMap::new();
        for entry in entries {
            if let Some(existing) = map.get(entry.id()) {
                return Err(CatalogError::DuplicateId {
                    kind: T::KIND,
                    id: entry.id().to_string(),
                    first: existing.origin().to_path_buf(),
                    second: entry.origin().to_path_buf(),
                });
            }
            map.insert(entry.id().to_string(), entry);
        }
        Ok(Self {
            dir: dir.into(),
            entries: map,
        })
    }

    /// All records, ordered by id.
    pub fn list(&self) -> Vec<&T> {
        self.entries.values().collect()
    }

    /// Look up a record by id.
    pub fn get(&self, id: &str) -> Result<&T> {
        self.entries.get(id).ok_or_else(|| CatalogError::NotFound {
            kind: T::KIND,
            id: id.to_string(),
        })
    }

    pub fn contains(&self, id: &str) -> bool {
        self.entries.contains_key(id)
    }

    pub fn ids(&self) -> impl Iterator<Item = &str> {
        self.entries.keys().map(String::as_str)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Directory the records were loaded from.
    pub fn dir(&self) -> &Path {
        &self.dir
    }
}

fn sorted_dir_entries(dir: &Path, kind: EntryKind) -> Result<Vec<PathBuf>> {
    if !dir.is_dir() {
        return Err(CatalogError::MissingDirectory {
            kind,
            path: dir.to_path_buf(),
        });
    }
    let io_err = |source| CatalogError::Io {
        path: dir.to_path_buf(),
        source,
    };
    let mut paths = Vec::new();
    for entry in std::fs::read_dir(dir).map_err(io_err)? {
        paths.push(entry.map_err(io_err)?.path());
    }
    paths.sort();
    Ok(paths)
}

/// Load every `*.toml` / `*.json` board record in `dir`.
///
/// A missing directory is an error rather than an empty catalog.
pub fn load_boards(dir: &Path) -> Result<BoardCatalog> {
    let mut boards = Vec::new();
    for path in sorted_dir_entries(dir, EntryKind::Board)? {
        if !path.is_file() || RecordFormat::from_path(&path).is_none() {
            continue;
        }
        let board = parse::load_board(&path)?;
        tracing::debug!(id = %board.id, path = %path.display(), "loaded board");
        boards.push(board);
    }
    let catalog = Catalog::from_entries(dir, boards)?;
    tracing::info!(count = catalog.len(), dir = %dir.display(), "board catalog loaded");
    Ok(catalog)
}

/// Load every pack sub-directory of `dir` that holds a pack record.
pub fn load_packs(dir: &Path) -> Result<PackCatalog> {
    let mut packs = Vec::new();
    for path in sorted_dir_entries(dir, EntryKind::Pack)? {
        if !path.is_dir() || parse::pack_record_path(&path).is_none() {
            continue;
        }
        let pack = parse::load_pack(&path)?;
        tracing::debug!(id = %pack.id, path = %path.display(), "loaded pack");
        packs.push(pack);
    }
    let catalog = Catalog::from_entries(dir, packs)?;
    tracing::info!(count = catalog.len(), dir = %dir.display(), "pack catalog loaded");
    Ok(catalog)
}

/// Both catalogs, loaded once.
#[derive(Debug, Clone)]
pub struct Registry {
    pub boards: BoardCatalog,
    pub packs: PackCatalog,
}

impl Registry {
    pub fn new(boards: BoardCatalog, packs: PackCatalog) -> Self {
        Self { boards, packs }
    }

    /// Load `boards/` and `packs/` under `data_root`.
    pub fn load(data_root: &Path) -> Result<Self> {
        let boards = load_boards(&data_root.join(EntryKind::Board.dir_name()))?;
        let packs = load_packs(&data_root.join(EntryKind::Pack.dir_name()))?;
        Ok(Self::new(boards, packs))
    }

    pub fn board(&self, id: &str) -> Result<&BoardDefinition> {
        self.boards.get(id)
    }

    pub fn pack(&self, id: &str) -> Result<&PackDefinition> {
        self.packs.get(id)
    }

    /// Look up a board together with the pack it references.
    pub fn board_and_pack(&self, board_id: &str) -> Result<(&BoardDefinition, &PackDefinition)> {
        let board = self.board(board_id)?;
        let pack = self.pack(&board.pack)?;
        Ok((board, pack))
    }
}
