//! Contracts for the collaborators the surrounding application wires in.
//!
//! The scan pipeline itself never touches these; the application shell looks
//! up the decoded payload in a record store and journals what it did. The
//! backing implementations (spreadsheet, database, whatever) live outside
//! this crate.

use time::OffsetDateTime;

/// Opaque handle to a row in the record store.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RowRef(pub usize);

/// Key-value record storage, one row per tracked student/item.
pub trait RecordStore {
    /// Look up the row whose key column matches `key`.
    fn find(&self, key: &str) -> anyhow::Result<Option<RowRef>>;

    fn read_cell(&self, row: RowRef, col: usize) -> anyhow::Result<String>;

    fn write_cell(&mut self, row: RowRef, col: usize, value: &str) -> anyhow::Result<()>;

    fn append_row(&mut self, values: &[String]) -> anyhow::Result<()>;

    /// The ordered header row, i.e. the list of tracked courses.
    fn header_row(&self) -> anyhow::Result<Vec<String>>;
}

/// One journaled action.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LogEntry {
    pub timestamp: OffsetDateTime,
    pub actor: String,
    pub action: String,
    pub details: String,
    pub status: String,
}

/// Append-only activity journal.
pub trait ActivityLogger {
    fn append(&mut self, entry: LogEntry) -> anyhow::Result<()>;
}

#[cfg(test)]
mod tests {
    use super::*;

    /// Minimal in-memory store, enough to exercise the contract shape.
    struct MemoryStore {
        header: Vec<String>,
        rows: Vec<Vec<String>>,
    }

    impl RecordStore for MemoryStore {
        fn find(&self, key: &str) -> anyhow::Result<Option<RowRef>> {
            Ok(self
                .rows
                .iter()
                .position(|row| row.first().map(String::as_str) == Some(key))
                .map(RowRef))
        }

        fn read_cell(&self, row: RowRef, col: usize) -> anyhow::Result<String> {
            self.rows
                .get(row.0)
                .and_then(|r| r.get(col))
                .cloned()
                .ok_or_else(|| anyhow::anyhow!("cell ({}, {}) out of range", row.0, col))
        }

        fn write_cell(&mut self, row: RowRef, col: usize, value: &str) -> anyhow::Result<()> {
            let cell = self
                .rows
                .get_mut(row.0)
                .and_then(|r| r.get_mut(col))
                .ok_or_else(|| anyhow::anyhow!("cell ({}, {}) out of range", row.0, col))?;
            *cell = value.to_string();
            Ok(())
        }

        fn append_row(&mut self, values: &[String]) -> anyhow::Result<()> {
            self.rows.push(values.to_vec());
            Ok(())
        }

        fn header_row(&self) -> anyhow::Result<Vec<String>> {
            Ok(self.header.clone())
        }
    }

    #[test]
    fn appended_rows_become_findable() -> anyhow::Result<()> {
        let mut store = MemoryStore {
            header: vec!["id".into(), "Anatomy".into(), "Physiology".into()],
            rows: vec![vec!["12345".into(), "".into(), "".into()]],
        };

        assert!(store.find("67890")?.is_none());
        store.append_row(&["67890".into(), "".into(), "".into()])?;

        let row = store.find("67890")?.expect("appended row is findable");
        store.write_cell(row, 2, "x")?;
        assert_eq!(store.read_cell(row, 2)?, "x");
        assert_eq!(store.header_row()?.len(), 3);
        Ok(())
    }
}
