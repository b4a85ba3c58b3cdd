//! Durable round-trip of the shopping list across restarts.
//!
//! Only the live list is persisted; undo history dies with the process.

use std::{
    fs,
    io::ErrorKind,
    path::PathBuf,
    sync::Mutex,
};

use serde::{Deserialize, Serialize};

use crate::{domain::ShoppingList, errors::Error, utils::iso_timestamp_utc, Result};

/// Storage port for the list state.
///
/// Both calls are synchronous: restore runs before the first command is
/// accepted, snapshot runs on the shutdown path before the process exits.
pub trait PersistenceGateway: Send + Sync {
    /// Load the saved list. A missing resource is a first run and yields an empty list.
    fn restore(&self) -> Result<ShoppingList>;

    /// Overwrite the saved list with `list`.
    fn snapshot(&self, list: &ShoppingList) -> Result<()>;
}

const STATE_FILE_VERSION: u32 = 1;

#[derive(Debug, Serialize, Deserialize)]
struct StateFileData {
    version: u32,
    saved_at: String,
    items: ShoppingList,
}

/// Stores the list as a small JSON document on disk.
#[derive(Clone, Debug)]
pub struct JsonFileGateway {
    path: PathBuf,
}

impl JsonFileGateway {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    fn corrupt(&self, reason: impl Into<String>) -> Error {
        Error::CorruptState {
            path: self.path.clone(),
            reason: reason.into(),
        }
    }

    fn write_failed(&self, source: std::io::Error) -> Error {
        Error::StateWrite {
            path: self.path.clone(),
            source,
        }
    }

    fn tmp_path(&self) -> PathBuf {
        let mut name = self
            .path
            .file_name()
            .map(|n| n.to_os_string())
            .unwrap_or_default();
        name.push(format!(".tmp-{}", std::process::id()));
        self.path.with_file_name(name)
    }
}

impl PersistenceGateway for JsonFileGateway {
    fn restore(&self) -> Result<ShoppingList> {
        let txt = match fs::read_to_string(&self.path) {
            Ok(txt) => txt,
            Err(e) if e.kind() == ErrorKind::NotFound => {
                tracing::info!(path = %self.path.display(), "no saved list; starting empty");
                return Ok(ShoppingList::new());
            }
            Err(e) => return Err(self.corrupt(format!("unreadable: {e}"))),
        };

        let data: StateFileData =
            serde_json::from_str(&txt).map_err(|e| self.corrupt(e.to_string()))?;
        if data.version != STATE_FILE_VERSION {
            return Err(self.corrupt(format!("unsupported version {}", data.version)));
        }

        tracing::info!(
            path = %self.path.display(),
            items = data.items.len(),
            saved_at = %data.saved_at,
            "restored shopping list"
        );
        Ok(data.items)
    }

    fn snapshot(&self, list: &ShoppingList) -> Result<()> {
        let data = StateFileData {
            version: STATE_FILE_VERSION,
            saved_at: iso_timestamp_utc(),
            items: list.clone(),
        };
        let txt = serde_json::to_string_pretty(&data)?;

        if let Some(parent) = self.path.parent().filter(|p| !p.as_os_str().is_empty()) {
            fs::create_dir_all(parent).map_err(|e| self.write_failed(e))?;
        }

        // Write-then-rename so a crash mid-write never leaves a truncated state file.
        let tmp = self.tmp_path();
        fs::write(&tmp, txt).map_err(|e| self.write_failed(e))?;
        if let Err(e) = fs::rename(&tmp, &self.path) {
            let _ = fs::remove_file(&tmp);
            return Err(self.write_failed(e));
        }

        tracing::info!(path = %self.path.display(), items = list.len(), "saved shopping list");
        Ok(())
    }
}

/// In-process gateway. Starts absent unless seeded.
#[derive(Debug, Default)]
pub struct MemoryGateway {
    saved: Mutex<Option<ShoppingList>>,
}

impl MemoryGateway {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn seeded(list: ShoppingList) -> Self {
        Self {
            saved: Mutex::new(Some(list)),
        }
    }

    pub fn saved(&self) -> Option<ShoppingList> {
        self.saved.lock().ok().and_then(|g| g.clone())
    }
}

impl PersistenceGateway for MemoryGateway {
    fn restore(&self) -> Result<ShoppingList> {
        Ok(self.saved().unwrap_or_default())
    }

    fn snapshot(&self, list: &ShoppingList) -> Result<()> {
        let mut saved = self
            .saved
            .lock()
            .map_err(|_| Error::External("memory gateway lock poisoned".to_string()))?;
        *saved = Some(list.clone());
        Ok(())
    }
}
