//! Application state management

use std::rc::Rc;

use gatepass_core::{Database, InvitationRepository, Result, SessionStore};
use tracing::info;

use crate::config::AppConfig;
use crate::notifications::NotificationService;

const DATABASE_FILE: &str = "gatepass.db";

/// Main application state
///
/// Built once at startup and handed to the view models. Both stores share
/// one database handle.
pub struct AppState {
    pub config: AppConfig,
    pub sessions: SessionStore<Rc<Database>>,
    pub invitations: InvitationRepository<Rc<Database>>,
    pub notifier: NotificationService,
}

impl AppState {
    /// Open the database in the configured data directory
    pub fn new(config: AppConfig) -> anyhow::Result<Self> {
        let data_dir = config.data_dir()?;
        std::fs::create_dir_all(&data_dir)?;

        let db_path = data_dir.join(DATABASE_FILE);
        info!(path = %db_path.display(), "Opening database");

        let db = Database::open(&db_path)?;
        Ok(Self::with_database(config, db)?)
    }

    /// Build state over an already opened database
    pub fn with_database(config: AppConfig, db: Database) -> Result<Self> {
        let db = Rc::new(db);
        let sessions = SessionStore::load(Rc::clone(&db))?;
        let invitations = InvitationRepository::load(db)?;
        let notifier = NotificationService::new(&config);

        Ok(Self {
            config,
            sessions,
            invitations,
            notifier,
        })
    }

    #[cfg(test)]
    pub fn in_memory() -> Self {
        let mut config = AppConfig::default();
        config.notifications.delivery_delay_ms = 0;
        Self::with_database(config, Database::open_in_memory().unwrap()).unwrap()
    }
}
