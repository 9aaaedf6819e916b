use std::path::{Path, PathBuf};
use tokio::fs::File;
use tokio::io::{AsyncBufReadExt, BufReader, Split};

use crate::error::{IngestError, Result};
use crate::record::RawRecord;

/// Parse one JSONL line. `line_no` is 1-based and only used for reporting.
///
/// Bytes that are not valid UTF-8 are reported as malformed input.
pub fn parse_line(line: &[u8], line_no: usize) -> Result<RawRecord> {
    serde_json::from_slice(line).map_err(|source| IngestError::Malformed {
        line: line_no,
        source,
    })
}

/// Streams `RawRecord`s out of a line-delimited JSON file.
pub struct RecordReader {
    path: PathBuf,
    lines: Split<BufReader<File>>,
    line_no: usize,
}

impl RecordReader {
    pub async fn open(path: &Path) -> Result<Self> {
        let file = File::open(path).await.map_err(|source| IngestError::Io {
            path: path.to_path_buf(),
            source,
        })?;

        Ok(Self {
            path: path.to_path_buf(),
            lines: BufReader::new(file).split(b'\n'),
            line_no: 0,
        })
    }

    /// Next record, or `None` at end of file. Blank lines are skipped.
    pub async fn next_record(&mut self) -> Result<Option<RawRecord>> {
        loop {
            let line = self
                .lines
                .next_segment()
                .await
                .map_err(|source| IngestError::Io {
                    path: self.path.clone(),
                    source,
                })?;

            let Some(mut line) = line else {
                return Ok(None);
            };
            self.line_no += 1;

            if line.last() == Some(&b'\r') {
                line.pop();
            }
            if line.iter().all(u8::is_ascii_whitespace) {
                continue;
            }
            return parse_line(&line, self.line_no).map(Some);
        }
    }

    /// Number of lines consumed so far.
    pub fn line_no(&self) -> usize {
        self.line_no
    }
}
