use std::sync::Arc;

use tokio::sync::RwLock;
use tokio_util::sync::CancellationToken;

use crate::{
    commands::{Command, CommandReply},
    errors::Error,
    persistence::PersistenceGateway,
    store::ListStore,
    Result,
};

#[derive(Debug)]
struct Intake {
    accepting: bool,
    /// Set once the shutdown snapshot has been written.
    saved: bool,
}

/// The list store wired to its persistence gateway.
///
/// Lifecycle: `bootstrap` restores before any command is accepted, `execute`
/// serves commands, `shutdown` stops intake and saves the list exactly once.
pub struct ShoppingService {
    store: Arc<ListStore>,
    gateway: Arc<dyn PersistenceGateway>,
    shutdown: CancellationToken,
    /// Commands hold a read guard for their whole run; shutdown takes the
    /// write guard, so every acknowledged command is in the snapshot.
    intake: RwLock<Intake>,
}

impl ShoppingService {
    /// Restore the saved list. A corrupt state file aborts startup.
    ///
    /// Runs synchronously; call it before serving any command.
    pub fn bootstrap(gateway: Arc<dyn PersistenceGateway>) -> Result<Self> {
        let list = gateway.restore()?;
        tracing::info!(items = list.len(), "shopping list ready");
        Ok(Self {
            store: Arc::new(ListStore::with_list(list)),
            gateway,
            shutdown: CancellationToken::new(),
            intake: RwLock::new(Intake {
                accepting: true,
                saved: false,
            }),
        })
    }

    pub fn store(&self) -> Arc<ListStore> {
        self.store.clone()
    }

    pub fn is_shutting_down(&self) -> bool {
        self.shutdown.is_cancelled()
    }

    /// Token cancelled when shutdown begins; transports select on it.
    pub fn shutdown_token(&self) -> CancellationToken {
        self.shutdown.clone()
    }

    pub async fn execute(&self, cmd: Command) -> Result<CommandReply> {
        let intake = self.intake.read().await;
        if !intake.accepting || self.is_shutting_down() {
            return Err(Error::ShuttingDown);
        }

        let reply = match cmd {
            Command::Start | Command::Help => CommandReply::Help,
            Command::List => CommandReply::List(self.store.show().await),
            Command::Add(raw) => CommandReply::Add(self.store.add(&raw).await),
            Command::Remove(raw) => CommandReply::Remove(self.store.remove(&raw).await),
            Command::Clear => {
                self.store.clear().await;
                CommandReply::Cleared
            }
            Command::Undo => CommandReply::Restored(self.store.undo().await),
            Command::Unknown(name) => CommandReply::Unknown(name),
        };
        drop(intake);
        Ok(reply)
    }

    /// Stop accepting commands and save the live list.
    ///
    /// Waits for in-flight commands, then runs the snapshot once on the
    /// blocking pool; later calls return `Ok(())` without writing. A failed
    /// write is returned so the host can exit non-zero. The saved flag stays
    /// unset on failure, so a retry is possible.
    pub async fn shutdown(&self) -> Result<()> {
        self.shutdown.cancel();

        let mut intake = self.intake.write().await;
        intake.accepting = false;
        if intake.saved {
            return Ok(());
        }

        tracing::info!("backing up shopping list before shutdown");
        let list = self.store.current().await;
        let gateway = self.gateway.clone();
        let res = tokio::task::spawn_blocking(move || gateway.snapshot(&list))
            .await
            .map_err(|e| Error::External(format!("snapshot task failed: {e}")))
            .and_then(|r| r);

        match res {
            Ok(()) => {
                intake.saved = true;
                Ok(())
            }
            Err(e) => {
                tracing::error!(error = %e, "failed to save shopping list");
                Err(e)
            }
        }
    }
}
