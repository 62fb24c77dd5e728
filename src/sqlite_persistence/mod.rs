mod upsert;
mod versioned_schema;

pub use upsert::{upsert, UpsertAction, UpsertOutcome, UpsertStatement, Upsertable};
pub use versioned_schema::{
    Column, ForeignKey, ForeignKeyOnChange, SqlType, Table, VersionedSchema, BASE_DB_VERSION,
    GENERATED_HEX_ID,
};
