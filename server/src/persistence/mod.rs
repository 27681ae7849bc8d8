//! Persistence layer for the simulation.
//!
//! Save slots are written from a background task so the tick loop never
//! blocks on disk I/O. Periodic saves are fire-and-forget, `save_now` waits
//! for queue room; loads and listings answer through a oneshot channel.

mod save_file;

pub use save_file::{
    delete_save, list_saves, read_slot, slot_path, write_slot, EquippedItem, SaveData, SaveError, SaveSummary,
};

use std::path::{Path, PathBuf};

use log::{error, info, warn};
use tokio::sync::{mpsc, oneshot};

/// Commands sent to the persistence background task
#[derive(Debug)]
pub enum PersistenceCommand {
    /// Write a snapshot to a slot
    Save { slot: u8, data: Box<SaveData> },
    /// Read a slot (response sent via oneshot channel)
    Load {
        slot: u8,
        response: oneshot::Sender<Result<SaveData, SaveError>>,
    },
    /// Summaries of every readable slot
    List { response: oneshot::Sender<Vec<SaveSummary>> },
    Delete { slot: u8 },
    /// Stop the task once everything queued before it is written
    Shutdown { done: oneshot::Sender<()> },
}

/// Handle for sending commands to the persistence task
#[derive(Clone)]
pub struct PersistenceHandle {
    sender: mpsc::Sender<PersistenceCommand>,
}

impl PersistenceHandle {
    /// Save a snapshot (fire and forget - non-blocking)
    pub fn save(&self, slot: u8, data: SaveData) {
        if self
            .sender
            .try_send(PersistenceCommand::Save { slot, data: Box::new(data) })
            .is_err()
        {
            warn!("Persistence queue full, dropped save for slot {}", slot);
        }
    }

    /// Queue a save, waiting for room instead of dropping it
    pub async fn save_now(&self, slot: u8, data: SaveData) -> Result<(), SaveError> {
        self.sender
            .send(PersistenceCommand::Save { slot, data: Box::new(data) })
            .await
            .map_err(|_| task_gone())
    }

    pub async fn load(&self, slot: u8) -> Result<SaveData, SaveError> {
        let (tx, rx) = oneshot::channel();
        if self.sender.send(PersistenceCommand::Load { slot, response: tx }).await.is_err() {
            return Err(task_gone());
        }
        rx.await.map_err(|_| task_gone())?
    }

    pub async fn list(&self) -> Vec<SaveSummary> {
        let (tx, rx) = oneshot::channel();
        if self.sender.send(PersistenceCommand::List { response: tx }).await.is_err() {
            return Vec::new();
        }
        rx.await.unwrap_or_default()
    }

    pub fn delete(&self, slot: u8) {
        let _ = self.sender.try_send(PersistenceCommand::Delete { slot });
    }

    /// Shut the task down, waiting for queued saves to land
    pub async fn shutdown(&self) {
        let (tx, rx) = oneshot::channel();
        if self.sender.send(PersistenceCommand::Shutdown { done: tx }).await.is_ok() {
            let _ = rx.await;
        }
    }
}

fn task_gone() -> SaveError {
    SaveError::Io(std::io::Error::other("persistence task stopped"))
}

/// Create the save directory and spawn the background task.
/// Returns a handle for sending commands.
pub fn init(save_dir: &Path) -> Result<PersistenceHandle, SaveError> {
    std::fs::create_dir_all(save_dir)?;

    let (tx, rx) = mpsc::channel(64);
    tokio::spawn(persistence_task(save_dir.to_path_buf(), rx));
    info!("Persistence background task started ({})", save_dir.display());

    Ok(PersistenceHandle { sender: tx })
}

/// Run blocking file work off the async workers
async fn blocking<T, F>(f: F) -> Result<T, SaveError>
where
    T: Send + 'static,
    F: FnOnce() -> Result<T, SaveError> + Send + 'static,
{
    tokio::task::spawn_blocking(f)
        .await
        .map_err(|e| SaveError::Io(std::io::Error::other(e)))?
}

/// Background task that handles all persistence operations
async fn persistence_task(dir: PathBuf, mut rx: mpsc::Receiver<PersistenceCommand>) {
    info!("Persistence task running");

    while let Some(cmd) = rx.recv().await {
        match cmd {
            PersistenceCommand::Save { slot, data } => {
                let path = dir.clone();
                match blocking(move || write_slot(&path, slot, &data)).await {
                    Ok(()) => info!("Saved slot {}", slot),
                    Err(e) => error!("Failed to save slot {}: {}", slot, e),
                }
            }

            PersistenceCommand::Load { slot, response } => {
                let path = dir.clone();
                let result = blocking(move || read_slot(&path, slot)).await;
                match &result {
                    Ok(data) => info!("Loaded slot {} ({})", slot, data.name),
                    Err(SaveError::NotFound) => info!("No saved data in slot {}", slot),
                    Err(e) => warn!("Failed to load slot {}: {}", slot, e),
                }
                let _ = response.send(result);
            }

            PersistenceCommand::List { response } => {
                let path = dir.clone();
                let saves = blocking(move || Ok(list_saves(&path))).await.unwrap_or_default();
                let _ = response.send(saves);
            }

            PersistenceCommand::Delete { slot } => {
                let path = dir.clone();
                if let Err(e) = blocking(move || delete_save(&path, slot)).await {
                    warn!("Failed to delete slot {}: {}", slot, e);
                }
            }

            PersistenceCommand::Shutdown { done } => {
                info!("Persistence task shutting down");
                let _ = done.send(());
                break;
            }
        }
    }

    info!("Persistence task stopped");
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::catalog::ContentCatalog;
    use crate::entities::Player;
    use crate::navigation::Vec2;
    use mir_shared::Profession;

    #[tokio::test]
    async fn test_background_save_then_load() {
        let dir = std::env::temp_dir().join(format!("mir-persist-{}", std::process::id()));
        std::fs::remove_dir_all(&dir).ok();

        let catalog = ContentCatalog::builtin();
        let player = Player::new(1, "Hana", Profession::Taoist, Vec2::new(50.0, 60.0), &catalog);

        let handle = init(&dir).unwrap();
        assert!(matches!(handle.load(1).await, Err(SaveError::NotFound)));

        handle.save(1, SaveData::capture(&player, 0));
        // Commands are handled in order, so the load sees the save
        let loaded = handle.load(1).await.unwrap();
        assert_eq!(loaded.name, "Hana");
        assert_eq!(loaded.profession, Profession::Taoist);

        let saves = handle.list().await;
        assert_eq!(saves.len(), 1);

        handle.delete(1);
        assert!(handle.list().await.is_empty());

        handle.shutdown().await;
        assert!(handle.load(1).await.is_err());

        std::fs::remove_dir_all(&dir).ok();
    }

    #[tokio::test]
    async fn test_save_now_survives_a_full_queue() {
        let dir = std::env::temp_dir().join(format!("mir-persist-full-{}", std::process::id()));
        std::fs::remove_dir_all(&dir).ok();

        let catalog = ContentCatalog::builtin();
        let early = Player::new(1, "Early", Profession::Warrior, Vec2::new(0.0, 0.0), &catalog);
        let last = Player::new(1, "Last", Profession::Warrior, Vec2::new(0.0, 0.0), &catalog);

        let handle = init(&dir).unwrap();
        // The task can't drain while we hold the thread, so these overflow
        for _ in 0..100 {
            handle.save(2, SaveData::capture(&early, 0));
        }
        handle.save_now(2, SaveData::capture(&last, 0)).await.unwrap();
        handle.shutdown().await;

        assert_eq!(read_slot(&dir, 2).unwrap().name, "Last");
        assert!(handle.save_now(2, SaveData::capture(&last, 0)).await.is_err());

        std::fs::remove_dir_all(&dir).ok();
    }
}
