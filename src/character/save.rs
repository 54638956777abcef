//! Hero snapshot persistence.
//!
//! The battle core only needs `save`/`load` of a [`StatBlock`]. Where the
//! snapshot lands is up to the [`HeroStore`] the caller injects.

use super::stats::StatBlock;
use crate::core::constants::SAVE_VERSION_MAGIC;
use directories::ProjectDirs;
use serde::{Deserialize, Serialize};
use sha2::{Digest, Sha256};
use std::cell::RefCell;
use std::fs;
use std::io::{self, Read, Write};
use std::path::PathBuf;
use std::rc::Rc;

#[derive(Debug, thiserror::Error)]
pub enum SaveError {
    #[error("save i/o failed: {0}")]
    Io(#[from] io::Error),

    #[error("failed to encode hero snapshot: {0}")]
    Encode(#[from] bincode::Error),

    #[error("invalid save version: expected 0x{expected:016X}, got 0x{found:016X}")]
    InvalidVersion { expected: u64, found: u64 },

    #[error("checksum verification failed")]
    ChecksumMismatch,

    #[error("could not determine config directory")]
    NoConfigDir,
}

/// Key-value style storage for the hero snapshot.
pub trait HeroStore {
    fn save_hero(&mut self, hero: &StatBlock) -> Result<(), SaveError>;

    /// Returns `Ok(None)` when nothing has been saved yet.
    fn load_hero(&self) -> Result<Option<StatBlock>, SaveError>;
}

impl StatBlock {
    pub fn save(&self, store: &mut dyn HeroStore) -> Result<(), SaveError> {
        store.save_hero(self)
    }

    pub fn load(store: &dyn HeroStore) -> Result<Option<StatBlock>, SaveError> {
        store.load_hero()
    }
}

/// On-disk envelope around the stat snapshot.
#[derive(Debug, Clone, Serialize, Deserialize)]
struct HeroSaveData {
    saved_at: i64,
    hero: StatBlock,
}

/// Saves the hero to a checksummed binary file.
pub struct SaveManager {
    save_path: PathBuf,
}

impl SaveManager {
    /// Creates a SaveManager in the platform config directory
    /// (via the `directories` crate).
    pub fn new() -> Result<Self, SaveError> {
        let project_dirs = ProjectDirs::from("", "", "mathquest").ok_or(SaveError::NoConfigDir)?;

        let config_dir = project_dirs.config_dir();
        fs::create_dir_all(config_dir)?;

        Ok(Self {
            save_path: config_dir.join("hero.dat"),
        })
    }

    /// Creates a SaveManager writing to an explicit path.
    pub fn with_path(save_path: impl Into<PathBuf>) -> Self {
        Self {
            save_path: save_path.into(),
        }
    }

    pub fn save_path(&self) -> &PathBuf {
        &self.save_path
    }

    pub fn save_exists(&self) -> bool {
        self.save_path.exists()
    }

    /// File format:
    /// - Version magic (8 bytes)
    /// - Data length (4 bytes)
    /// - Serialized snapshot (variable length)
    /// - SHA256 checksum over all of the above (32 bytes)
    fn write_file(&self, hero: &StatBlock) -> Result<(), SaveError> {
        let envelope = HeroSaveData {
            saved_at: chrono::Utc::now().timestamp(),
            hero: hero.clone(),
        };
        let data = bincode::serialize(&envelope)?;
        let data_len = data.len() as u32;

        let mut hasher = Sha256::new();
        hasher.update(SAVE_VERSION_MAGIC.to_le_bytes());
        hasher.update(data_len.to_le_bytes());
        hasher.update(&data);
        let checksum = hasher.finalize();

        if let Some(parent) = self.save_path.parent() {
            fs::create_dir_all(parent)?;
        }
        let mut file = fs::File::create(&self.save_path)?;
        file.write_all(&SAVE_VERSION_MAGIC.to_le_bytes())?;
        file.write_all(&data_len.to_le_bytes())?;
        file.write_all(&data)?;
        file.write_all(&checksum)?;

        Ok(())
    }

    fn read_file(&self) -> Result<HeroSaveData, SaveError> {
        let mut file = fs::File::open(&self.save_path)?;

        let mut version_bytes = [0u8; 8];
        file.read_exact(&mut version_bytes)?;
        let version = u64::from_le_bytes(version_bytes);
        if version != SAVE_VERSION_MAGIC {
            return Err(SaveError::InvalidVersion {
                expected: SAVE_VERSION_MAGIC,
                found: version,
            });
        }

        let mut length_bytes = [0u8; 4];
        file.read_exact(&mut length_bytes)?;
        let data_len = u32::from_le_bytes(length_bytes);

        let mut data = vec![0u8; data_len as usize];
        file.read_exact(&mut data)?;

        let mut stored_checksum = [0u8; 32];
        file.read_exact(&mut stored_checksum)?;

        let mut hasher = Sha256::new();
        hasher.update(version_bytes);
        hasher.update(length_bytes);
        hasher.update(&data);
        if stored_checksum != hasher.finalize().as_slice() {
            return Err(SaveError::ChecksumMismatch);
        }

        Ok(bincode::deserialize(&data)?)
    }
}

impl HeroStore for SaveManager {
    fn save_hero(&mut self, hero: &StatBlock) -> Result<(), SaveError> {
        self.write_file(hero)
    }

    fn load_hero(&self) -> Result<Option<StatBlock>, SaveError> {
        match self.read_file() {
            Ok(envelope) => Ok(Some(envelope.hero)),
            Err(SaveError::Io(e)) if e.kind() == io::ErrorKind::NotFound => Ok(None),
            Err(e) => Err(e),
        }
    }
}

/// In-memory store. Clones share the same slot, so a caller can keep a
/// handle while the battle owns another.
#[derive(Debug, Clone, Default)]
pub struct MemoryStore {
    inner: Rc<RefCell<MemorySlot>>,
}

#[derive(Debug, Default)]
struct MemorySlot {
    hero: Option<StatBlock>,
    save_count: u32,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of successful saves through any handle.
    pub fn save_count(&self) -> u32 {
        self.inner.borrow().save_count
    }

    pub fn snapshot(&self) -> Option<StatBlock> {
        self.inner.borrow().hero.clone()
    }
}

impl HeroStore for MemoryStore {
    fn save_hero(&mut self, hero: &StatBlock) -> Result<(), SaveError> {
        let mut slot = self.inner.borrow_mut();
        slot.hero = Some(hero.clone());
        slot.save_count += 1;
        Ok(())
    }

    fn load_hero(&self) -> Result<Option<StatBlock>, SaveError> {
        Ok(self.inner.borrow().hero.clone())
    }
}

/// Discards every save. Default store when the caller injects none.
#[derive(Debug, Clone, Copy, Default)]
pub struct NullStore;

impl HeroStore for NullStore {
    fn save_hero(&mut self, _hero: &StatBlock) -> Result<(), SaveError> {
        Ok(())
    }

    fn load_hero(&self) -> Result<Option<StatBlock>, SaveError> {
        Ok(None)
    }
}
