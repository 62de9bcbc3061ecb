use diesel::PgConnection;
use diesel::r2d2::{ConnectionManager, Pool, PoolError};

pub type ConnectionPool = Pool<ConnectionManager<PgConnection>>;

/// Build the r2d2 connection pool (§5 "Resource Model"): one pool per
/// process, sized by the caller to the number of concurrent dataset
/// workers plus headroom for control-endpoint queries.
pub fn get_pool(max_size: u32) -> Result<ConnectionPool, PoolError> {
    let manager = ConnectionManager::new(crate::database_url_from_environment());

    Pool::builder().max_size(max_size).build(manager)
}
