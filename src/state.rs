use std::sync::Arc;

use crate::config::Config;
use crate::db::Store;
use crate::services::{MailService, SeaOrmSessionService, SessionService};

#[derive(Clone)]
pub struct SharedState {
    pub config: Config,

    pub store: Store,

    pub sessions: Arc<dyn SessionService>,

    pub mail: Arc<MailService>,
}

impl SharedState {
    pub async fn new(config: Config) -> anyhow::Result<Self> {
        let store = Store::with_pool_options(
            &config.general.database_path,
            config.general.max_db_connections,
            config.general.min_db_connections,
        )
        .await?;

        let sessions = Arc::new(SeaOrmSessionService::new(
            store.clone(),
            config.security.clone(),
        )) as Arc<dyn SessionService>;

        let mail = Arc::new(MailService::new(config.mail.clone()));

        Ok(Self {
            config,
            store,
            sessions,
            mail,
        })
    }
}
