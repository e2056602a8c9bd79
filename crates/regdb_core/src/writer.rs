//! Canonical serialization of a [`RegistryTable`].

use crate::parser::{KEY_PREFIX, VALUE_PREFIX};
use crate::table::RegistryTable;
use regdb_storage::{StorageBackend, StorageResult};

/// Renders the table in the canonical two-line format.
///
/// Records are ordered by case-folded key so that an unchanged table
/// always renders to the same bytes.
#[must_use]
pub fn render(table: &RegistryTable) -> String {
    let mut entries: Vec<_> = table.entries().collect();
    entries.sort_unstable_by(|a, b| a.0.cmp(b.0));

    let mut out = String::new();
    for (key, value) in entries {
        out.push_str(KEY_PREFIX);
        out.push_str(key.as_str());
        out.push('\n');
        out.push_str(VALUE_PREFIX);
        out.push_str(value);
        out.push('\n');
    }
    out
}

/// Replaces the whole content of `backend` with the table.
///
/// The backend is truncated before anything is written, so a failure part
/// way through leaves a truncated file rather than a mix of old and new
/// records. Returns the number of pairs written.
///
/// # Errors
///
/// Returns an error if truncating, appending or flushing fails.
pub fn write_table(table: &RegistryTable, backend: &mut dyn StorageBackend) -> StorageResult<usize> {
    let rendered = render(table);
    backend.truncate(0)?;
    backend.append(rendered.as_bytes())?;
    backend.flush()?;
    Ok(table.len())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::key::Key;
    use crate::parser::{load_records, CorruptionPolicy};
    use proptest::prelude::*;
    use regdb_storage::InMemoryBackend;
    use std::collections::HashMap;
    use std::path::Path;

    fn table_of(pairs: &[(&str, &str)]) -> RegistryTable {
        let mut table = RegistryTable::new();
        for (k, v) in pairs {
            table.put(Key::new(*k), (*v).to_owned());
        }
        table
    }

    #[test]
    fn render_empty_table() {
        assert_eq!(render(&RegistryTable::new()), "");
    }

    #[test]
    fn render_is_sorted_case_insensitively() {
        let table = table_of(&[("b", "2"), ("C", "3"), ("A", "1")]);
        assert_eq!(render(&table), "K: A\nV: 1\nK: b\nV: 2\nK: C\nV: 3\n");
    }

    #[test]
    fn write_replaces_previous_content() {
        let mut backend = InMemoryBackend::with_data(b"garbage\nK: old\n".to_vec());
        let table = table_of(&[("k", "v")]);

        assert_eq!(write_table(&table, &mut backend).unwrap(), 1);
        assert_eq!(backend.data(), b"K: k\nV: v\n");
    }

    #[test]
    fn write_is_idempotent() {
        let table = table_of(&[("x", "1"), ("y", "2"), ("z", "3")]);
        let mut backend = InMemoryBackend::new();

        write_table(&table, &mut backend).unwrap();
        let first = backend.data();
        write_table(&table, &mut backend).unwrap();

        assert_eq!(backend.data(), first);
    }

    fn field() -> impl Strategy<Value = String> {
        "[A-Za-z0-9_.][A-Za-z0-9_. -]{0,15}[A-Za-z0-9_.]"
    }

    proptest! {
        #![proptest_config(ProptestConfig::with_cases(64))]

        #[test]
        fn written_table_reloads_strictly(
            pairs in proptest::collection::vec((field(), field()), 0..20)
        ) {
            let mut table = RegistryTable::new();
            let mut expected = HashMap::new();
            for (k, v) in pairs {
                let key = Key::new(k);
                if !table.contains(&key) {
                    expected.insert(key.clone(), v.clone());
                    table.put(key, v);
                }
            }

            let mut backend = InMemoryBackend::new();
            write_table(&table, &mut backend).unwrap();
            let text = String::from_utf8(backend.data()).unwrap();

            let mut reloaded = RegistryTable::new();
            let report = load_records(
                text.lines(),
                Path::new("db"),
                &mut reloaded,
                CorruptionPolicy::Strict,
            ).unwrap();

            prop_assert_eq!(report.loaded, expected.len());
            prop_assert!(!reloaded.is_dirty());
            for (key, value) in &expected {
                prop_assert_eq!(reloaded.get(key), Some(value.as_str()));
            }
        }
    }
}
