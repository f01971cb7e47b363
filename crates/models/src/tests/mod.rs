

/// Database-backed tests only run when a server is configured.
pub(crate) fn db_tests_disabled() -> bool {
    std::env::var("SKIP_DB_TESTS").is_ok() || std::env::var("DATABASE_URL").is_err()
}

/// Pool settings pointing at `DATABASE_URL`, sized for a single test.
pub(crate) fn test_db_config() -> configs::DatabaseConfig {
    let mut cfg = configs::DatabaseConfig { min_connections: 1, ..Default::default() };
    cfg.normalize_from_env();
    cfg
}
