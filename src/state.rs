use std::sync::Arc;

use crate::{
    config::{AppConfig, SiteConfig},
    db::{DbPool, OrmConn, create_orm_conn},
};

#[derive(Clone)]
pub struct AppState {
    pub pool: DbPool,
    pub orm: OrmConn,
    pub config: Arc<AppConfig>,
}

impl AppState {
    pub fn new(pool: DbPool, config: AppConfig) -> Self {
        let orm = create_orm_conn(&pool);
        Self {
            pool,
            orm,
            config: Arc::new(config),
        }
    }

    pub fn site(&self) -> &SiteConfig {
        &self.config.site
    }
}
