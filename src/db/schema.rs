/// SQL statements for creating the catalog schema.
pub const CREATE_SCHEMA: &str = r"
CREATE TABLE IF NOT EXISTS files (
    path TEXT PRIMARY KEY NOT NULL,
    hash TEXT,
    size INTEGER NOT NULL,
    modified REAL NOT NULL,
    eligibility BOOL NOT NULL CHECK (eligibility IN (0, 1)),
    eligibilitynote TEXT NOT NULL,
    errornote TEXT,
    archived BOOL,
    state TEXT
);

CREATE INDEX IF NOT EXISTS idx_files_state ON files(state);
CREATE INDEX IF NOT EXISTS idx_files_eligibility ON files(eligibility, archived);
";

#[cfg(test)]
mod tests {
    use super::*;
    use rusqlite::Connection;

    #[test]
    fn schema_creates_without_error() {
        let conn = Connection::open_in_memory().unwrap();
        conn.execute_batch(CREATE_SCHEMA).unwrap();
    }

    #[test]
    fn schema_is_idempotent() {
        let conn = Connection::open_in_memory().unwrap();
        conn.execute_batch(CREATE_SCHEMA).unwrap();
        conn.execute_batch(CREATE_SCHEMA).unwrap();
    }

    #[test]
    fn eligibility_flag_is_constrained() {
        let conn = Connection::open_in_memory().unwrap();
        conn.execute_batch(CREATE_SCHEMA).unwrap();
        let res = conn.execute(
            "INSERT INTO files (path, size, modified, eligibility, eligibilitynote)
             VALUES ('/x', 1, 0.0, 2, '')",
            [],
        );
        assert!(res.is_err());
    }
}
