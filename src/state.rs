use r2d2::Pool;
use r2d2_sqlite::SqliteConnectionManager;

use crate::config::Config;
use crate::store::SharedStore;
use crate::sync::Feed;

pub type DbPool = Pool<SqliteConnectionManager>;

#[derive(Clone)]
pub struct AppState {
    pub db: DbPool,
    pub config: Config,
    pub feed: Feed,
}

impl AppState {
    pub fn store(&self) -> &SharedStore {
        self.feed.store()
    }
}
