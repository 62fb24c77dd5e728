//! Generic insert-or-update over the tables of a [`VersionedSchema`].
//!
//! One call to [`upsert`] runs the key probe and the conditional statement
//! in a single transaction and commits it.
//! The statement text depends only on the table and the set of supplied
//! columns. Values are always bound, so the connection's prepared statement
//! cache reuses it across records.
//!
//! [`VersionedSchema`]: super::VersionedSchema

use super::versioned_schema::Table;
use anyhow::{bail, Context, Result};
use rusqlite::{params_from_iter, types::Value, Connection, OptionalExtension, Row};

/// What an upsert did to the target row.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum UpsertAction {
    Inserted,
    Updated,
}

/// Result of an upsert: the action taken and the effective key of the row,
/// including keys filled by the store.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UpsertOutcome<K> {
    pub action: UpsertAction,
    pub key: K,
}

/// A typed record that can be written with [`upsert`].
pub trait Upsertable {
    type Key;

    /// The declared table the record lives in.
    fn table() -> &'static Table;

    /// Columns to write, by name. Leaving out the key column of a table
    /// whose key is store-generated requests a new key.
    fn column_values(&self) -> Vec<(&'static str, Value)>;

    /// Decodes the key columns, in declaration order, from a returned row.
    fn key_from_row(row: &Row<'_>) -> rusqlite::Result<Self::Key>;
}

/// A conditional insert-or-update built for one (table, column set) pair.
#[derive(Debug, Clone)]
pub struct UpsertStatement {
    table_name: &'static str,
    columns: Vec<&'static str>,
    key_columns: Vec<&'static str>,
    key_supplied: bool,
    sql: String,
}

impl UpsertStatement {
    /// Builds the statement for writing `columns` into `table`.
    ///
    /// Fails when a column is not declared in the table, is given twice, or
    /// when the key is only partially supplied, or omitted on a table whose
    /// key is not store-generated.
    pub fn build(table: &'static Table, columns: &[&str]) -> Result<Self> {
        let mut resolved: Vec<&'static str> = Vec::with_capacity(columns.len());
        for name in columns {
            let Some(column) = table.column(name) else {
                bail!("Table {} has no column named {}", table.name, name);
            };
            if resolved.contains(&column.name) {
                bail!("Column {} given twice for table {}", name, table.name);
            }
            resolved.push(column.name);
        }

        let key_columns = table.primary_key_columns();
        if key_columns.is_empty() {
            bail!("Table {} has no primary key to upsert on", table.name);
        }
        let supplied_keys = key_columns
            .iter()
            .filter(|k| resolved.contains(*k))
            .count();
        let key_supplied = supplied_keys == key_columns.len();
        if !key_supplied {
            if supplied_keys > 0 || !table.generates_key() {
                bail!(
                    "Upsert into {} needs key column(s) {} (the store does not generate them)",
                    table.name,
                    key_columns.join(", ")
                );
            }
            if resolved.is_empty() {
                bail!("Upsert into {} has no columns to write", table.name);
            }
        }

        let non_key_columns: Vec<&str> = resolved
            .iter()
            .copied()
            .filter(|c| !key_columns.contains(c))
            .collect();
        let placeholders = (1..=resolved.len())
            .map(|i| format!("?{}", i))
            .collect::<Vec<_>>()
            .join(", ");

        let mut sql = format!(
            "INSERT INTO {} ({}) VALUES ({})",
            table.name,
            resolved.join(", "),
            placeholders
        );
        if key_supplied {
            // With nothing but key columns the update is a no-op, it still
            // makes RETURNING report the existing row.
            let set_clause = if non_key_columns.is_empty() {
                format!("{0} = excluded.{0}", key_columns[0])
            } else {
                non_key_columns
                    .iter()
                    .map(|c| format!("{0} = excluded.{0}", c))
                    .collect::<Vec<_>>()
                    .join(", ")
            };
            sql.push_str(&format!(
                " ON CONFLICT ({}) DO UPDATE SET {}",
                key_columns.join(", "),
                set_clause
            ));
        }
        sql.push_str(&format!(" RETURNING {}", key_columns.join(", ")));

        Ok(Self {
            table_name: table.name,
            columns: resolved,
            key_columns,
            key_supplied,
            sql,
        })
    }

    pub fn sql(&self) -> &str {
        &self.sql
    }

    /// Whether the store is expected to fill the key.
    pub fn generates_key(&self) -> bool {
        !self.key_supplied
    }

    fn probe(&self, conn: &Connection, values: &[Value]) -> Result<UpsertAction> {
        if !self.key_supplied {
            return Ok(UpsertAction::Inserted);
        }
        let where_clause = self
            .key_columns
            .iter()
            .enumerate()
            .map(|(i, k)| format!("{} = ?{}", k, i + 1))
            .collect::<Vec<_>>()
            .join(" AND ");
        let key_values = self.key_columns.iter().map(|k| {
            let position = self
                .columns
                .iter()
                .position(|c| c == k)
                .unwrap_or_default();
            &values[position]
        });
        let mut stmt = conn.prepare_cached(&format!(
            "SELECT 1 FROM {} WHERE {}",
            self.table_name, where_clause
        ))?;
        let exists = stmt
            .query_row(params_from_iter(key_values), |_| Ok(()))
            .optional()?
            .is_some();
        Ok(if exists {
            UpsertAction::Updated
        } else {
            UpsertAction::Inserted
        })
    }

    /// Runs the statement inside its own transaction and commits it.
    pub fn execute<K>(
        &self,
        conn: &Connection,
        values: &[Value],
        key_from_row: impl FnOnce(&Row<'_>) -> rusqlite::Result<K>,
    ) -> Result<UpsertOutcome<K>> {
        if values.len() != self.columns.len() {
            bail!(
                "Upsert into {} expects {} values, got {}",
                self.table_name,
                self.columns.len(),
                values.len()
            );
        }
        let tx = conn.unchecked_transaction()?;
        let action = self.probe(&tx, values)?;
        let key = {
            let mut stmt = tx.prepare_cached(&self.sql)?;
            stmt.query_row(params_from_iter(values.iter()), key_from_row)
                .with_context(|| format!("Failed to upsert into {}", self.table_name))?
        };
        tx.commit()
            .with_context(|| format!("Failed to commit upsert into {}", self.table_name))?;
        Ok(UpsertOutcome { action, key })
    }
}

/// Inserts `record`, or updates the row sharing its key, and commits.
pub fn upsert<T: Upsertable>(conn: &Connection, record: &T) -> Result<UpsertOutcome<T::Key>> {
    let (columns, values): (Vec<&'static str>, Vec<Value>) =
        record.column_values().into_iter().unzip();
    let statement = UpsertStatement::build(T::table(), &columns)?;
    statement.execute(conn, &values, T::key_from_row)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sqlite_column;
    use crate::sqlite_persistence::{
        Column, ForeignKey, ForeignKeyOnChange, SqlType, VersionedSchema, GENERATED_HEX_ID,
    };

    const SONGS_TABLE: Table = Table {
        name: "songs",
        columns: &[
            sqlite_column!("song_id", &SqlType::Text, is_primary_key = true),
            sqlite_column!("title", &SqlType::Text),
            sqlite_column!("plays", &SqlType::Integer),
        ],
        indices: &[],
        unique_constraints: &[],
    };

    const NOTES_TABLE: Table = Table {
        name: "notes",
        columns: &[
            sqlite_column!(
                "note_id",
                &SqlType::Text,
                is_primary_key = true,
                default_value = Some(GENERATED_HEX_ID)
            ),
            sqlite_column!("body", &SqlType::Text),
        ],
        indices: &[],
        unique_constraints: &[],
    };

    const SONG_NOTES_TABLE: Table = Table {
        name: "song_notes",
        columns: &[
            sqlite_column!(
                "song_id",
                &SqlType::Text,
                is_primary_key = true,
                non_null = true,
                foreign_key = Some(&ForeignKey {
                    foreign_table: "songs",
                    foreign_column: "song_id",
                    on_delete: ForeignKeyOnChange::Cascade,
                })
            ),
            sqlite_column!(
                "note_id",
                &SqlType::Text,
                is_primary_key = true,
                non_null = true,
                foreign_key = Some(&ForeignKey {
                    foreign_table: "notes",
                    foreign_column: "note_id",
                    on_delete: ForeignKeyOnChange::Cascade,
                })
            ),
        ],
        indices: &[],
        unique_constraints: &[],
    };

    const TEST_SCHEMA: VersionedSchema = VersionedSchema {
        version: 0,
        tables: &[SONGS_TABLE, NOTES_TABLE, SONG_NOTES_TABLE],
    };

    struct Song {
        id: &'static str,
        title: &'static str,
        plays: i64,
    }

    impl Upsertable for Song {
        type Key = String;

        fn table() -> &'static Table {
            &SONGS_TABLE
        }

        fn column_values(&self) -> Vec<(&'static str, Value)> {
            vec![
                ("song_id", Value::Text(self.id.to_string())),
                ("title", Value::Text(self.title.to_string())),
                ("plays", Value::Integer(self.plays)),
            ]
        }

        fn key_from_row(row: &Row<'_>) -> rusqlite::Result<String> {
            row.get(0)
        }
    }

    struct Note {
        id: Option<String>,
        body: &'static str,
    }

    impl Upsertable for Note {
        type Key = String;

        fn table() -> &'static Table {
            &NOTES_TABLE
        }

        fn column_values(&self) -> Vec<(&'static str, Value)> {
            let mut values = Vec::with_capacity(2);
            if let Some(id) = &self.id {
                values.push(("note_id", Value::Text(id.clone())));
            }
            values.push(("body", Value::Text(self.body.to_string())));
            values
        }

        fn key_from_row(row: &Row<'_>) -> rusqlite::Result<String> {
            row.get(0)
        }
    }

    struct SongNote {
        song_id: String,
        note_id: String,
    }

    impl Upsertable for SongNote {
        type Key = (String, String);

        fn table() -> &'static Table {
            &SONG_NOTES_TABLE
        }

        fn column_values(&self) -> Vec<(&'static str, Value)> {
            vec![
                ("song_id", Value::Text(self.song_id.clone())),
                ("note_id", Value::Text(self.note_id.clone())),
            ]
        }

        fn key_from_row(row: &Row<'_>) -> rusqlite::Result<(String, String)> {
            Ok((row.get(0)?, row.get(1)?))
        }
    }

    fn test_conn() -> Connection {
        let conn = Connection::open_in_memory().unwrap();
        TEST_SCHEMA.create(&conn).unwrap();
        conn
    }

    fn count(conn: &Connection, table: &str) -> i64 {
        conn.query_row(&format!("SELECT COUNT(*) FROM {}", table), [], |r| r.get(0))
            .unwrap()
    }

    #[test]
    fn test_statement_text_for_supplied_key() {
        let statement = UpsertStatement::build(&SONGS_TABLE, &["song_id", "title"]).unwrap();
        assert_eq!(
            statement.sql(),
            "INSERT INTO songs (song_id, title) VALUES (?1, ?2) \
             ON CONFLICT (song_id) DO UPDATE SET title = excluded.title \
             RETURNING song_id"
        );
        assert!(!statement.generates_key());
    }

    #[test]
    fn test_statement_text_for_generated_key() {
        let statement = UpsertStatement::build(&NOTES_TABLE, &["body"]).unwrap();
        assert_eq!(
            statement.sql(),
            "INSERT INTO notes (body) VALUES (?1) RETURNING note_id"
        );
        assert!(statement.generates_key());
    }

    #[test]
    fn test_statement_text_for_key_only_table() {
        let statement = UpsertStatement::build(&SONG_NOTES_TABLE, &["song_id", "note_id"]).unwrap();
        assert_eq!(
            statement.sql(),
            "INSERT INTO song_notes (song_id, note_id) VALUES (?1, ?2) \
             ON CONFLICT (song_id, note_id) DO UPDATE SET song_id = excluded.song_id \
             RETURNING song_id, note_id"
        );
    }

    #[test]
    fn test_build_rejects_unknown_column() {
        let err = UpsertStatement::build(&SONGS_TABLE, &["song_id", "lyrics"]).unwrap_err();
        assert!(err.to_string().contains("no column named lyrics"));
    }

    #[test]
    fn test_build_rejects_duplicate_column() {
        let err = UpsertStatement::build(&SONGS_TABLE, &["song_id", "title", "title"]).unwrap_err();
        assert!(err.to_string().contains("given twice"));
    }

    #[test]
    fn test_build_rejects_missing_key_when_not_generated() {
        let err = UpsertStatement::build(&SONGS_TABLE, &["title"]).unwrap_err();
        assert!(err.to_string().contains("needs key column(s) song_id"));
    }

    #[test]
    fn test_build_rejects_partial_composite_key() {
        assert!(UpsertStatement::build(&SONG_NOTES_TABLE, &["song_id"]).is_err());
    }

    #[test]
    fn test_upsert_twice_is_idempotent() {
        let conn = test_conn();
        let song = Song {
            id: "s1",
            title: "Song",
            plays: 3,
        };

        let first = upsert(&conn, &song).unwrap();
        let second = upsert(&conn, &song).unwrap();

        assert_eq!(first.action, UpsertAction::Inserted);
        assert_eq!(second.action, UpsertAction::Updated);
        assert_eq!(first.key, "s1");
        assert_eq!(second.key, "s1");
        assert_eq!(count(&conn, "songs"), 1);
        let (title, plays): (String, i64) = conn
            .query_row("SELECT title, plays FROM songs WHERE song_id = 's1'", [], |r| {
                Ok((r.get(0)?, r.get(1)?))
            })
            .unwrap();
        assert_eq!(title, "Song");
        assert_eq!(plays, 3);
    }

    #[test]
    fn test_upsert_updates_non_key_columns_in_place() {
        let conn = test_conn();
        upsert(
            &conn,
            &Song {
                id: "s1",
                title: "Old",
                plays: 1,
            },
        )
        .unwrap();

        let outcome = upsert(
            &conn,
            &Song {
                id: "s1",
                title: "New",
                plays: 7,
            },
        )
        .unwrap();

        assert_eq!(outcome.action, UpsertAction::Updated);
        assert_eq!(count(&conn, "songs"), 1);
        let (title, plays): (String, i64) = conn
            .query_row("SELECT title, plays FROM songs", [], |r| Ok((r.get(0)?, r.get(1)?)))
            .unwrap();
        assert_eq!(title, "New");
        assert_eq!(plays, 7);
    }

    #[test]
    fn test_omitted_key_is_generated_and_distinct() {
        let conn = test_conn();
        let mut keys = Vec::new();
        for _ in 0..5 {
            let outcome = upsert(
                &conn,
                &Note {
                    id: None,
                    body: "same body",
                },
            )
            .unwrap();
            assert_eq!(outcome.action, UpsertAction::Inserted);
            assert!(!keys.contains(&outcome.key));
            keys.push(outcome.key);
        }
        assert_eq!(count(&conn, "notes"), 5);
    }

    #[test]
    fn test_supplied_key_on_generating_table_updates() {
        let conn = test_conn();
        let created = upsert(
            &conn,
            &Note {
                id: None,
                body: "first",
            },
        )
        .unwrap();

        let updated = upsert(
            &conn,
            &Note {
                id: Some(created.key.clone()),
                body: "second",
            },
        )
        .unwrap();

        assert_eq!(updated.action, UpsertAction::Updated);
        assert_eq!(updated.key, created.key);
        let body: String = conn
            .query_row("SELECT body FROM notes", [], |r| r.get(0))
            .unwrap();
        assert_eq!(body, "second");
    }

    #[test]
    fn test_key_only_link_row_upserts_once() {
        let conn = test_conn();
        upsert(
            &conn,
            &Song {
                id: "s1",
                title: "Song",
                plays: 0,
            },
        )
        .unwrap();
        let note = upsert(
            &conn,
            &Note {
                id: None,
                body: "n",
            },
        )
        .unwrap();
        let link = SongNote {
            song_id: "s1".to_string(),
            note_id: note.key.clone(),
        };

        let first = upsert(&conn, &link).unwrap();
        let second = upsert(&conn, &link).unwrap();

        assert_eq!(first.action, UpsertAction::Inserted);
        assert_eq!(second.action, UpsertAction::Updated);
        assert_eq!(second.key, ("s1".to_string(), note.key));
        assert_eq!(count(&conn, "song_notes"), 1);
    }

    #[test]
    fn test_foreign_key_violation_propagates() {
        let conn = test_conn();
        let result = upsert(
            &conn,
            &SongNote {
                song_id: "missing".to_string(),
                note_id: "missing".to_string(),
            },
        );

        assert!(result.is_err());
        assert_eq!(count(&conn, "song_notes"), 0);
    }

    #[test]
    fn test_execute_rejects_value_count_mismatch() {
        let conn = test_conn();
        let statement = UpsertStatement::build(&SONGS_TABLE, &["song_id", "title"]).unwrap();
        let result = statement.execute(&conn, &[Value::Text("s1".to_string())], |r| {
            r.get::<_, String>(0)
        });
        assert!(result.is_err());
    }
}
