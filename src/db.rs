use diesel::pg::PgConnection;
use diesel::r2d2::{ConnectionManager, Pool};

pub type DbPool = Pool<ConnectionManager<PgConnection>>;

/// Build an r2d2 pool of at most `max_size` Postgres connections.
///
/// Connections are opened lazily, so this succeeds even when the database is
/// still starting; the first checkout surfaces connectivity errors.
pub fn create_pool(database_url: &str, max_size: u32) -> DbPool {
    let manager = ConnectionManager::<PgConnection>::new(database_url);
    Pool::builder()
        .max_size(max_size)
        .min_idle(Some(0))
        .build_unchecked(manager)
}
