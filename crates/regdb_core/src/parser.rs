//! Record parser for the two-line registry format.
//!
//! ```text
//! K: <key>
//! V: <value>
//! K: <key>
//! V: <value>
//! ```
//!
//! The parser is a single pass over the lines with two states, idle and
//! key-pending. Valid pairs are inserted into the destination table as soon
//! as their value line is seen. Every violation marks the table dirty; the
//! [`CorruptionPolicy`] decides whether it aborts the load or is dropped.

use crate::error::{CoreError, CoreResult, CorruptionKind};
use crate::field::parse_field;
use crate::key::Key;
use crate::table::RegistryTable;
use std::path::Path;
use tracing::warn;

/// Prefix of a key line.
pub const KEY_PREFIX: &str = "K: ";

/// Prefix of a value line.
pub const VALUE_PREFIX: &str = "V: ";

/// What to do when a corrupt row is found.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CorruptionPolicy {
    /// Abort the load with [`CoreError::CorruptData`].
    Strict,
    /// Drop the offending row and keep scanning.
    Lenient,
}

/// A row discarded under [`CorruptionPolicy::Lenient`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DroppedRow {
    /// 1-based line number of the row.
    pub line_number: usize,
    /// The raw row.
    pub line: String,
    /// Why it was rejected.
    pub kind: CorruptionKind,
}

/// Summary of one load.
#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct LoadReport {
    /// Pairs newly inserted into the table.
    pub loaded: usize,
    /// Rows dropped under lenient loading.
    pub dropped: Vec<DroppedRow>,
}

#[derive(Debug, Clone, Copy)]
struct PendingKey<'a> {
    key: &'a str,
    line: &'a str,
    line_number: usize,
}

#[derive(Debug)]
enum State<'a> {
    Idle,
    KeyPending(PendingKey<'a>),
}

struct Rejection<'a> {
    line: &'a str,
    line_number: usize,
    kind: CorruptionKind,
}

impl<'a> Rejection<'a> {
    fn new(line: &'a str, line_number: usize, kind: CorruptionKind) -> Self {
        Self {
            line,
            line_number,
            kind,
        }
    }
}

struct RecordParser<'a, 't> {
    source: &'a Path,
    policy: CorruptionPolicy,
    table: &'t mut RegistryTable,
    state: State<'a>,
    report: LoadReport,
}

impl<'a, 't> RecordParser<'a, 't> {
    fn step(&mut self, line: &'a str, line_number: usize) -> Result<(), Rejection<'a>> {
        // The pending slot is consumed by every line; failures leave it idle.
        let state = std::mem::replace(&mut self.state, State::Idle);

        if let Some(rest) = line.strip_prefix(KEY_PREFIX) {
            if let State::KeyPending(_) = state {
                return Err(Rejection::new(line, line_number, CorruptionKind::ExpectedValue));
            }
            let key = parse_field(rest)
                .ok_or_else(|| Rejection::new(line, line_number, CorruptionKind::InvalidKey))?;
            self.state = State::KeyPending(PendingKey {
                key,
                line,
                line_number,
            });
            return Ok(());
        }

        if let Some(rest) = line.strip_prefix(VALUE_PREFIX) {
            let State::KeyPending(pending) = state else {
                return Err(Rejection::new(line, line_number, CorruptionKind::ExpectedKey));
            };
            let key = Key::new(pending.key);
            if self.table.contains(&key) {
                return Err(Rejection::new(
                    pending.line,
                    pending.line_number,
                    CorruptionKind::DuplicateKey(pending.key.to_owned()),
                ));
            }
            let value = parse_field(rest)
                .ok_or_else(|| Rejection::new(line, line_number, CorruptionKind::InvalidValue))?;
            self.table.put(key, value.to_owned());
            self.report.loaded += 1;
            return Ok(());
        }

        Err(Rejection::new(line, line_number, CorruptionKind::InvalidLine))
    }

    fn reject(&mut self, rejection: Rejection<'_>) -> CoreResult<()> {
        self.table.mark_dirty();
        self.state = State::Idle;

        match self.policy {
            CorruptionPolicy::Strict => Err(CoreError::CorruptData {
                path: self.source.to_path_buf(),
                line_number: rejection.line_number,
                line: rejection.line.to_owned(),
                kind: rejection.kind,
            }),
            CorruptionPolicy::Lenient => {
                warn!(
                    file = %self.source.display(),
                    line_number = rejection.line_number,
                    row = rejection.line,
                    reason = %rejection.kind,
                    "dropping corrupt row"
                );
                self.report.dropped.push(DroppedRow {
                    line_number: rejection.line_number,
                    line: rejection.line.to_owned(),
                    kind: rejection.kind,
                });
                Ok(())
            }
        }
    }

    fn finish(mut self) -> CoreResult<LoadReport> {
        if let State::KeyPending(pending) = std::mem::replace(&mut self.state, State::Idle) {
            let kind = CorruptionKind::DanglingKey(pending.key.to_owned());
            self.reject(Rejection::new(pending.line, pending.line_number, kind))?;
        }
        Ok(self.report)
    }
}

/// Parses registry lines into `table`.
///
/// `source` identifies the file the lines came from and is only used for
/// diagnostics. Returns how many pairs were newly inserted, plus the rows
/// that were dropped under [`CorruptionPolicy::Lenient`].
///
/// # Errors
///
/// Under [`CorruptionPolicy::Strict`], returns [`CoreError::CorruptData`]
/// for the first violation. Pairs before it are already in the table.
pub fn load_records<'a, I>(
    lines: I,
    source: &'a Path,
    table: &mut RegistryTable,
    policy: CorruptionPolicy,
) -> CoreResult<LoadReport>
where
    I: IntoIterator<Item = &'a str>,
{
    let mut parser = RecordParser {
        source,
        policy,
        table,
        state: State::Idle,
        report: LoadReport::default(),
    };

    for (index, line) in lines.into_iter().enumerate() {
        if let Err(rejection) = parser.step(line, index + 1) {
            parser.reject(rejection)?;
        }
    }

    parser.finish()
}
