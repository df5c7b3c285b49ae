use crustops_core::ServiceError;
use crustops_sql::SQLStore;

/// SQL DDL statements to initialize the storefront database schema.
///
/// Each table stores the full JSON document in a `data` TEXT column,
/// with indexed columns extracted for efficient filtering, summing and
/// uniqueness.
const SCHEMA: &[&str] = &[
    "CREATE TABLE IF NOT EXISTS users (
        id TEXT PRIMARY KEY,
        data TEXT NOT NULL,
        phone TEXT UNIQUE,
        create_at TEXT
    )",
    "CREATE TABLE IF NOT EXISTS pizzas (
        id TEXT PRIMARY KEY,
        data TEXT NOT NULL,
        active INTEGER,
        sold_out INTEGER,
        create_at TEXT
    )",
    "CREATE TABLE IF NOT EXISTS orders (
        id TEXT PRIMARY KEY,
        data TEXT NOT NULL,
        user_id TEXT,
        batch_id TEXT,
        pizza_id TEXT,
        quantity INTEGER,
        status TEXT,
        date TEXT,
        create_at TEXT
    )",
    "CREATE TABLE IF NOT EXISTS reviews (
        id TEXT PRIMARY KEY,
        data TEXT NOT NULL,
        order_id TEXT UNIQUE,
        pizza_id TEXT,
        create_at TEXT
    )",
    "CREATE TABLE IF NOT EXISTS settings (
        id TEXT PRIMARY KEY,
        data TEXT NOT NULL,
        create_at TEXT
    )",
    "CREATE TABLE IF NOT EXISTS otp_codes (
        id TEXT PRIMARY KEY,
        data TEXT NOT NULL,
        phone TEXT,
        code TEXT,
        expires_at TEXT,
        create_at TEXT
    )",
    "CREATE TABLE IF NOT EXISTS batches (
        id TEXT PRIMARY KEY,
        data TEXT NOT NULL,
        batch_number INTEGER UNIQUE,
        service_date TEXT,
        create_at TEXT
    )",
    "CREATE TABLE IF NOT EXISTS batch_pizzas (
        id TEXT PRIMARY KEY,
        data TEXT NOT NULL,
        batch_id TEXT,
        pizza_id TEXT,
        max_quantity INTEGER,
        create_at TEXT,
        UNIQUE(batch_id, pizza_id)
    )",
    // Indexes
    "CREATE INDEX IF NOT EXISTS idx_ord_user ON orders(user_id)",
    "CREATE INDEX IF NOT EXISTS idx_ord_batch_pizza ON orders(batch_id, pizza_id)",
    "CREATE INDEX IF NOT EXISTS idx_ord_date ON orders(date)",
    "CREATE INDEX IF NOT EXISTS idx_ord_status ON orders(status)",
    "CREATE INDEX IF NOT EXISTS idx_rev_pizza ON reviews(pizza_id)",
    "CREATE INDEX IF NOT EXISTS idx_otp_phone ON otp_codes(phone)",
    "CREATE INDEX IF NOT EXISTS idx_batch_date ON batches(service_date)",
    "CREATE INDEX IF NOT EXISTS idx_bp_batch ON batch_pizzas(batch_id)",
];

pub fn init_schema(sql: &dyn SQLStore) -> Result<(), ServiceError> {
    for stmt in SCHEMA {
        sql.exec(stmt, &[])
            .map_err(|e| ServiceError::Storage(format!("schema init failed: {}", e)))?;
    }
    Ok(())
}
