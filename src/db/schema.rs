use rusqlite::Connection;

/// Create the license registry and activation ledger tables.
pub fn init_db(conn: &Connection) -> rusqlite::Result<()> {
    conn.execute_batch(
        r#"
        -- Licenses (license_key is the public lookup key, immutable once issued)
        -- expires_on: last valid calendar day as YYYY-MM-DD, NULL = never expires
        CREATE TABLE IF NOT EXISTS licenses (
            id INTEGER PRIMARY KEY AUTOINCREMENT,
            license_key TEXT NOT NULL UNIQUE,
            owner TEXT NOT NULL,
            email TEXT NOT NULL,
            expires_on TEXT,
            max_activations INTEGER NOT NULL DEFAULT 1 CHECK (max_activations > 0),
            is_active INTEGER NOT NULL DEFAULT 1,
            created_at INTEGER NOT NULL
        );

        -- Activations (one row per machine holding a slot on a license)
        -- hardware_signature: machine_uuid || '_' || disk_serial
        CREATE TABLE IF NOT EXISTS activations (
            id INTEGER PRIMARY KEY AUTOINCREMENT,
            license_id INTEGER NOT NULL REFERENCES licenses(id) ON DELETE CASCADE,
            hardware_signature TEXT NOT NULL,
            activated_at INTEGER NOT NULL,
            UNIQUE(license_id, hardware_signature)
        );
        -- UNIQUE(license_id, hardware_signature) doubles as the per-license count index
        "#,
    )?;
    Ok(())
}
