pub mod connection;
pub mod daily_tps;
pub mod migration;

pub const INIT_SCHEMA: &str = r#"
-- One row per calendar day
CREATE TABLE IF NOT EXISTS daily_tps (
    date TEXT NOT NULL UNIQUE,
    tps REAL NOT NULL,
    start_timestamp INTEGER NOT NULL,
    end_timestamp INTEGER NOT NULL,
    start_height INTEGER NOT NULL,
    end_height INTEGER NOT NULL,
    created_at TEXT NOT NULL,
    updated_at TEXT NOT NULL,
    CHECK (start_height <= end_height),
    CHECK (tps >= 0)
);
"#;
