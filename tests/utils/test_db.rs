/// Isolated test database that is created per test and dropped afterwards.
///
/// Connects to the server named by TEST_DATABASE_URL. When the variable is
/// unset, [`TestDb::new`] returns `None` and database tests skip themselves.
use diesel::r2d2::{self, ConnectionManager};
use diesel::{sql_query, Connection, PgConnection, RunQueryDsl};
use diesel_migrations::{embed_migrations, EmbeddedMigrations, MigrationHarness};
use std::sync::atomic::{AtomicU32, Ordering};
use std::thread;

pub const MIGRATIONS: EmbeddedMigrations = embed_migrations!("migrations");
static TEST_DB_COUNTER: AtomicU32 = AtomicU32::new(0);

pub type TestPool = r2d2::Pool<ConnectionManager<PgConnection>>;

pub struct TestDb {
    server_url: String,
    name: String,
    pool: TestPool,
}

impl TestDb {
    /// Create and migrate `test_media_{pid}_{counter}`.
    pub fn new() -> Option<Self> {
        dotenvy::dotenv().ok();

        let Ok(server_url) = std::env::var("TEST_DATABASE_URL") else {
            eprintln!("TEST_DATABASE_URL not set, skipping database test");
            return None;
        };

        let name = format!(
            "test_media_{}_{}",
            std::process::id(),
            TEST_DB_COUNTER.fetch_add(1, Ordering::SeqCst)
        );

        let mut conn =
            PgConnection::establish(&server_url).expect("Failed to connect to test database server");
        sql_query(format!("CREATE DATABASE {}", name))
            .execute(&mut conn)
            .unwrap_or_else(|e| panic!("Failed to create test database {}: {}", name, e));

        // Swap the database name (everything after the last '/')
        let last_slash = server_url
            .rfind('/')
            .unwrap_or_else(|| panic!("Invalid TEST_DATABASE_URL format: {}", server_url));
        let isolated_url = format!("{}/{}", &server_url[..last_slash], name);

        let manager = ConnectionManager::<PgConnection>::new(isolated_url);
        let pool = r2d2::Pool::builder()
            .max_size(5)
            .test_on_check_out(true)
            .build(manager)
            .expect("Failed to build test database connection pool");

        pool.get()
            .expect("Unable to connect to the test database")
            .run_pending_migrations(MIGRATIONS)
            .expect("Unable to migrate the test database");

        Some(Self {
            server_url,
            name,
            pool,
        })
    }

    pub fn pool(&self) -> TestPool {
        self.pool.clone()
    }

    /// Run raw SQL against the isolated database, for fixtures the
    /// repository API does not expose (soft deletes).
    pub fn execute(&self, statement: &str) {
        let mut conn = self.pool.get().expect("Unable to connect to the test database");
        sql_query(statement)
            .execute(&mut conn)
            .unwrap_or_else(|e| panic!("Fixture statement failed: {}", e));
    }
}

impl Drop for TestDb {
    /// Leaves the database in place when the test panicked, for debugging.
    fn drop(&mut self) {
        if thread::panicking() {
            eprintln!("TestDb keeping database '{}' after panic", self.name);
            return;
        }

        let Ok(mut conn) = PgConnection::establish(&self.server_url) else {
            eprintln!("Failed to reconnect for cleanup of '{}'", self.name);
            return;
        };

        let _ = sql_query(format!(
            "SELECT pg_terminate_backend(pid) FROM pg_stat_activity WHERE datname = '{}'",
            self.name
        ))
        .execute(&mut conn);

        if let Err(e) = sql_query(format!("DROP DATABASE IF EXISTS {}", self.name)).execute(&mut conn) {
            eprintln!("Failed to drop test database '{}': {}", self.name, e);
        }
    }
}
