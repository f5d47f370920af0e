//! Streaming encoder for the dashboard wire format
//!
//! A [`TabularWriter`] is driven through an ordered sequence of operations:
//! declare a dataset, declare its columns, write one or more rows, then
//! either declare the next dataset or finish. The writer enforces that
//! ordering with an internal state machine, so the sink only ever receives
//! structurally complete output.
//!
//! Errors are sticky: the first violation (or sink failure) is remembered,
//! every later operation becomes a no-op, and [`TabularWriter::err`]
//! reports the original failure. A caller can therefore chain a whole
//! session without checking after every call and inspect the outcome once.

use std::borrow::Cow;
use std::io::Write;

use crate::error::ProtocolError;

/// Where the session currently is in the dataset grammar.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum State {
    Initial,
    DatasetDeclared,
    SchemaSet,
    RowOpen,
    Finished,
    Failed,
}

/// Streaming encoder for one session of the tabular wire format.
///
/// Writes directly to any [`Write`] sink as operations arrive. To avoid
/// transmitting partial output on failure, point it at an intermediate
/// buffer and check [`TabularWriter::err`] before committing the bytes.
#[derive(Debug)]
pub struct TabularWriter<W: Write> {
    sink: W,
    /// First error of the session, surfaced at the caller's leisure.
    err: Option<ProtocolError>,
    state: State,
    /// Declared column count of the current dataset. Zero until the
    /// schema is set, immutable until the next dataset begins.
    column_count: usize,
    /// Rows written so far for the current dataset. A dataset may not be
    /// left behind until this is at least one.
    rows_in_dataset: usize,
    /// Token of the currently open row, if any. Row handles carry a copy
    /// and must match to write.
    open_row: Option<u64>,
    row_seq: u64,
}

impl<W: Write> TabularWriter<W> {
    /// Create a writer that encodes one session into `sink`.
    pub fn new(sink: W) -> Self {
        Self {
            sink,
            err: None,
            state: State::Initial,
            column_count: 0,
            rows_in_dataset: 0,
            open_row: None,
            row_seq: 0,
        }
    }

    /// The first error of the session, if any. Pure inspection.
    pub fn err(&self) -> Option<&ProtocolError> {
        self.err.as_ref()
    }

    /// Begin a new named dataset.
    ///
    /// Legal as the first operation of a session, or after the previous
    /// dataset has a schema and at least one row. Emits a blank-line
    /// separator before every dataset except the first.
    pub fn begin_dataset(&mut self, name: &str) {
        if self.err.is_some() {
            return;
        }
        if self.state != State::Initial && self.state != State::SchemaSet {
            self.fail(format!("not in a state to begin dataset {name:?}"));
            return;
        }
        if self.state == State::SchemaSet
            && (self.column_count == 0 || self.rows_in_dataset == 0)
        {
            self.fail(format!(
                "cannot begin dataset {name:?}: previous dataset has no rows"
            ));
            return;
        }
        if self.state == State::SchemaSet {
            self.write_raw("\n");
        }
        self.write_escaped(name);
        self.write_raw("\n");
        self.column_count = 0;
        self.rows_in_dataset = 0;
        self.transition(State::DatasetDeclared);
    }

    /// Declare the column names of the current dataset.
    ///
    /// Legal exactly once per dataset, directly after
    /// [`TabularWriter::begin_dataset`]. Requires at least one column;
    /// every subsequent row must carry exactly this many values.
    pub fn write_columns<S: AsRef<str>>(&mut self, columns: &[S]) {
        if self.err.is_some() {
            return;
        }
        if self.state != State::DatasetDeclared {
            self.fail("columns may only directly follow a dataset declaration");
            return;
        }
        if columns.is_empty() {
            self.fail("a dataset needs at least one column");
            return;
        }
        for (i, column) in columns.iter().enumerate() {
            if i > 0 {
                self.write_raw("\t");
            }
            self.write_escaped(column.as_ref());
        }
        self.write_raw("\n");
        self.column_count = columns.len();
        self.transition(State::SchemaSet);
    }

    /// Open the next row of the current dataset.
    ///
    /// Legal only once a schema is set and no other row is open. Always
    /// returns a handle; if the operation was illegal the session is
    /// failed and the handle is inert (its writes are no-ops).
    pub fn open_row(&mut self) -> Row<'_, W> {
        self.row_seq += 1;
        let token = self.row_seq;
        if self.err.is_none() {
            if self.state != State::SchemaSet {
                self.fail("rows may only be opened after the dataset schema is set");
            } else if self.open_row.is_some() {
                self.fail("a row is already open");
            } else {
                self.rows_in_dataset += 1;
                self.open_row = Some(token);
                self.transition(State::RowOpen);
            }
        }
        Row {
            writer: self,
            token,
            written: 0,
        }
    }

    /// End the session.
    ///
    /// Legal only once the current dataset has a schema and at least one
    /// row. Emits the final blank line; the writer accepts no further
    /// operations afterwards.
    pub fn finish(&mut self) {
        if self.err.is_some() {
            return;
        }
        if self.state != State::SchemaSet {
            self.fail("cannot finish before the current dataset is complete");
            return;
        }
        if self.column_count == 0 || self.rows_in_dataset == 0 {
            self.fail("cannot finish: current dataset has no rows");
            return;
        }
        self.write_raw("\n");
        self.transition(State::Finished);
    }

    fn write_escaped(&mut self, value: &str) {
        let escaped = escape(value);
        self.write_raw(&escaped);
    }

    fn write_raw(&mut self, raw: &str) {
        if self.err.is_some() {
            return;
        }
        if let Err(err) = self.sink.write_all(raw.as_bytes()) {
            self.fail_with(ProtocolError::from(err));
        }
    }

    /// Remember the first error only; later failures are dropped.
    fn fail(&mut self, message: impl Into<String>) {
        self.fail_with(ProtocolError::new(message));
    }

    fn fail_with(&mut self, err: ProtocolError) {
        if self.err.is_none() {
            self.err = Some(err);
            self.state = State::Failed;
        }
    }

    fn transition(&mut self, next: State) {
        if self.err.is_none() {
            self.state = next;
        }
    }
}

/// Handle to the currently open row of a [`TabularWriter`].
///
/// The handle carries a token copied from the writer when the row was
/// opened; every operation compares it against the writer's current open
/// row and fails on mismatch, so a handle from a rejected
/// [`TabularWriter::open_row`] can never write.
#[derive(Debug)]
pub struct Row<'a, W: Write> {
    writer: &'a mut TabularWriter<W>,
    token: u64,
    /// Values written through this handle so far. Must reach exactly the
    /// dataset's column count before the row may close.
    written: usize,
}

impl<W: Write> Row<'_, W> {
    /// Write one text value into the row.
    pub fn write_text(mut self, value: &str) -> Self {
        self.push(value);
        self
    }

    /// Write one boolean value, rendered as `true` or `false`.
    pub fn write_bool(self, value: bool) -> Self {
        self.write_text(if value { "true" } else { "false" })
    }

    /// Write one integer value in base-10 decimal.
    pub fn write_int(self, value: i64) -> Self {
        self.write_text(&value.to_string())
    }

    /// Close the row.
    ///
    /// Fails unless exactly the declared number of values was written.
    pub fn close(self) {
        if self.writer.err.is_some() {
            return;
        }
        if self.writer.open_row != Some(self.token) {
            self.writer.fail("closed a row handle that is not the open row");
            return;
        }
        if self.written != self.writer.column_count {
            self.writer.fail(format!(
                "row closed with {} of {} values",
                self.written, self.writer.column_count
            ));
            return;
        }
        self.writer.write_raw("\n");
        self.writer.open_row = None;
        self.writer.transition(State::SchemaSet);
    }

    fn push(&mut self, value: &str) {
        if self.writer.err.is_some() {
            return;
        }
        if self.writer.open_row != Some(self.token) {
            self.writer
                .fail("wrote through a row handle that is not the open row");
            return;
        }
        if self.written >= self.writer.column_count {
            self.writer
                .fail(format!("too many values for this row, writing {value:?}"));
            return;
        }
        if self.written > 0 {
            self.writer.write_raw("\t");
        }
        self.written += 1;
        self.writer.write_escaped(value);
    }
}

/// Substitute the three delimiter bytes so a field can never break the
/// line or column structure: tab to `#`, newline to `@`, NUL to `!`.
/// Deliberately lossy; the substitution is not reversible.
fn escape(value: &str) -> Cow<'_, str> {
    if !value.contains(['\t', '\n', '\0']) {
        return Cow::Borrowed(value);
    }
    Cow::Owned(
        value
            .chars()
            .map(|c| match c {
                '\t' => '#',
                '\n' => '@',
                '\0' => '!',
                other => other,
            })
            .collect(),
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;
    use std::io;

    /// Sink that rejects every write.
    struct BrokenSink;

    impl Write for BrokenSink {
        fn write(&mut self, _buf: &[u8]) -> io::Result<usize> {
            Err(io::Error::new(io::ErrorKind::BrokenPipe, "sink closed"))
        }

        fn flush(&mut self) -> io::Result<()> {
            Ok(())
        }
    }

    #[test]
    fn test_end_to_end_two_datasets() {
        let mut buf = Vec::new();
        let mut w = TabularWriter::new(&mut buf);
        w.begin_dataset("Test");
        w.write_columns(&["A", "B", "C"]);
        w.open_row()
            .write_bool(true)
            .write_int(1)
            .write_text("abc")
            .close();
        w.open_row()
            .write_bool(false)
            .write_int(2)
            .write_text("def")
            .close();
        w.begin_dataset("Second");
        w.write_columns(&["X"]);
        w.open_row().write_text("Y").close();
        w.finish();

        assert!(w.err().is_none());
        drop(w);
        assert_eq!(
            String::from_utf8(buf).unwrap(),
            "Test\nA\tB\tC\ntrue\t1\tabc\nfalse\t2\tdef\n\nSecond\nX\nY\n\n"
        );
    }

    #[test]
    fn test_single_dataset_single_row() {
        let mut buf = Vec::new();
        let mut w = TabularWriter::new(&mut buf);
        w.begin_dataset("Only");
        w.write_columns(&["col"]);
        w.open_row().write_text("value").close();
        w.finish();

        assert!(w.err().is_none());
        drop(w);
        assert_eq!(buf, b"Only\ncol\nvalue\n\n");
    }

    #[test]
    fn test_empty_string_row_satisfies_dataset() {
        let mut buf = Vec::new();
        let mut w = TabularWriter::new(&mut buf);
        w.begin_dataset("Blank");
        w.write_columns(&["col"]);
        w.open_row().write_text("").close();
        w.finish();

        assert!(w.err().is_none());
        drop(w);
        assert_eq!(buf, b"Blank\ncol\n\n\n");
    }

    #[rstest]
    #[case("plain", "plain")]
    #[case("", "")]
    #[case("with space", "with space")]
    #[case("a\tb", "a#b")]
    #[case("a\nb", "a@b")]
    #[case("a\0b", "a!b")]
    #[case("\t\n\0", "#@!")]
    fn test_escape(#[case] input: &str, #[case] expected: &str) {
        assert_eq!(escape(input), expected);
    }

    #[test]
    fn test_escaped_values_keep_structure() {
        let mut buf = Vec::new();
        let mut w = TabularWriter::new(&mut buf);
        w.begin_dataset("Name\twith\ntab");
        w.write_columns(&["a\0col"]);
        w.open_row().write_text("x\ty\nz\0!").close();
        w.finish();

        assert!(w.err().is_none());
        drop(w);
        assert_eq!(buf, b"Name#with@tab\na!col\nx#y@z!!\n\n");
    }

    #[test]
    fn test_zero_columns_fails() {
        let mut w = TabularWriter::new(Vec::new());
        w.begin_dataset("Test");
        w.write_columns::<&str>(&[]);
        assert!(w.err().is_some());
    }

    #[test]
    fn test_columns_before_dataset_fails() {
        let mut w = TabularWriter::new(Vec::new());
        w.write_columns(&["a"]);
        assert!(w.err().is_some());
    }

    #[test]
    fn test_finish_before_any_dataset_fails() {
        let mut w = TabularWriter::new(Vec::new());
        w.finish();
        assert!(w.err().is_some());
    }

    #[test]
    fn test_finish_with_no_rows_fails() {
        let mut w = TabularWriter::new(Vec::new());
        w.begin_dataset("Test");
        w.write_columns(&["a"]);
        w.finish();
        assert!(w.err().is_some());
    }

    #[test]
    fn test_double_finish_fails() {
        let mut w = TabularWriter::new(Vec::new());
        w.begin_dataset("Test");
        w.write_columns(&["a"]);
        w.open_row().write_text("v").close();
        w.finish();
        assert!(w.err().is_none());
        w.finish();
        assert!(w.err().is_some());
    }

    #[test]
    fn test_dataset_after_dataset_without_schema_fails() {
        let mut w = TabularWriter::new(Vec::new());
        w.begin_dataset("First");
        w.begin_dataset("Second");
        assert!(w.err().is_some());
    }

    #[test]
    fn test_dataset_after_rowless_dataset_fails() {
        let mut w = TabularWriter::new(Vec::new());
        w.begin_dataset("First");
        w.write_columns(&["a"]);
        w.begin_dataset("Second");
        assert!(w.err().is_some());
    }

    #[test]
    fn test_too_few_values_fails_at_close() {
        let mut w = TabularWriter::new(Vec::new());
        w.begin_dataset("Test");
        w.write_columns(&["a", "b"]);
        w.open_row().write_text("only one").close();
        let err = w.err().expect("under-filled row must fail");
        assert!(err.message().contains("1 of 2"));
    }

    #[test]
    fn test_too_many_values_fails_at_write() {
        let mut w = TabularWriter::new(Vec::new());
        w.begin_dataset("Test");
        w.write_columns(&["a"]);
        w.open_row().write_text("one").write_text("two").close();
        let err = w.err().expect("over-filled row must fail");
        assert!(err.message().contains("too many"));
    }

    #[test]
    fn test_dataset_while_row_open_fails() {
        let mut w = TabularWriter::new(Vec::new());
        w.begin_dataset("Test");
        w.write_columns(&["a"]);
        let row = w.open_row().write_text("v");
        // Dropping the handle without closing leaves the row open.
        drop(row);
        w.begin_dataset("Second");
        assert!(w.err().is_some());
    }

    #[test]
    fn test_second_open_row_while_row_open_fails() {
        let mut w = TabularWriter::new(Vec::new());
        w.begin_dataset("Test");
        w.write_columns(&["a"]);
        drop(w.open_row());
        // The second handle never becomes the open row, so it cannot write,
        // and the sticky error stays the one from the rejected open_row.
        w.open_row().write_text("ignored").close();
        let err = w.err().expect("second open row must fail");
        assert!(
            err.message().contains("rows may only be opened")
                || err.message().contains("already open")
        );
    }

    #[test]
    fn test_inert_handle_from_wrong_state() {
        let mut w = TabularWriter::new(Vec::new());
        // No dataset, no schema: open_row is illegal and yields an inert
        // handle whose writes are no-ops.
        w.open_row().write_text("ignored").close();
        let first = w.err().cloned().expect("open_row in Initial must fail");
        assert!(first.message().contains("rows may only be opened"));

        // Later operations keep reporting the original error.
        w.begin_dataset("Test");
        assert_eq!(w.err(), Some(&first));
    }

    #[test]
    fn test_sticky_first_error_wins() {
        let mut buf = Vec::new();
        let mut w = TabularWriter::new(&mut buf);
        w.write_columns(&["a"]); // first violation
        let first = w.err().cloned().unwrap();

        // Everything after is a silent no-op.
        w.begin_dataset("Test");
        w.write_columns(&["a", "b"]);
        w.open_row().write_text("v").close();
        w.finish();

        assert_eq!(w.err(), Some(&first));
        drop(w);
        assert!(buf.is_empty());
    }

    #[test]
    fn test_sink_failure_is_sticky() {
        let mut w = TabularWriter::new(BrokenSink);
        w.begin_dataset("Test");
        let err = w.err().cloned().expect("sink failure must surface");
        assert!(err.message().contains("sink write failed"));

        // The session is dead; further operations keep the first error.
        w.write_columns(&["a"]);
        w.open_row().write_text("v").close();
        w.finish();
        assert_eq!(w.err(), Some(&err));
    }

    #[test]
    fn test_output_parses_back_into_datasets() {
        let mut buf = Vec::new();
        let mut w = TabularWriter::new(&mut buf);
        w.begin_dataset("People");
        w.write_columns(&["name", "admin"]);
        w.open_row().write_text("ada").write_bool(true).close();
        w.open_row().write_text("brian").write_bool(false).close();
        w.begin_dataset("Counts");
        w.write_columns(&["n"]);
        w.open_row().write_int(42).close();
        w.finish();
        assert!(w.err().is_none());
        drop(w);

        // Consumers recover dataset boundaries by splitting on blank lines.
        let text = String::from_utf8(buf).unwrap();
        let blocks: Vec<&str> = text.split("\n\n").filter(|b| !b.is_empty()).collect();
        assert_eq!(blocks.len(), 2);

        let people: Vec<&str> = blocks[0].lines().collect();
        assert_eq!(people[0], "People");
        assert_eq!(people[1].split('\t').count(), 2);
        assert_eq!(people[2], "ada\ttrue");
        assert_eq!(people[3], "brian\tfalse");

        let counts: Vec<&str> = blocks[1].lines().collect();
        assert_eq!(counts, vec!["Counts", "n", "42"]);
    }
}
