// crates/molt-migrate/src/parser.rs
//
// Newline-delimited JSON record reader.
//
// Lazy pull model: one line is read and decoded per next_record call,
// blank lines are skipped, and the first malformed line fails the whole
// run. A corrupt export is a fatal precondition, not something to recover
// from line by line.

use molt_core::{MoltError, UploadRecord};
use tokio::io::{AsyncBufRead, AsyncBufReadExt, Lines};

/// Reads legacy upload records from a newline-delimited JSON stream.
///
/// The input is exhausted exactly once; the reader is not restartable.
pub struct RecordReader<R> {
    lines: Lines<R>,
    line_no: u64,
}

impl<R: AsyncBufRead + Unpin> RecordReader<R> {
    pub fn new(reader: R) -> Self {
        Self {
            lines: reader.lines(),
            line_no: 0,
        }
    }

    /// Pull the next record, or `None` once the input is exhausted.
    ///
    /// Line numbers are 1-based and count blank lines, so a parse error
    /// names the offending line of the original export.
    pub async fn next_record(&mut self) -> Result<Option<UploadRecord>, MoltError> {
        while let Some(line) = self.lines.next_line().await? {
            self.line_no += 1;
            if line.trim().is_empty() {
                continue;
            }
            return match UploadRecord::decode(&line) {
                Ok(record) => Ok(Some(record)),
                Err(e) => Err(MoltError::Parse {
                    line: self.line_no,
                    reason: e.to_string(),
                }),
            };
        }
        Ok(None)
    }
}
