//! Bounded tail reads and in-place trimming of console.log.
//!
//! The game appends to console.log for as long as it runs and never rotates
//! it, so only the trailing window is ever read.

use std::fs::{File, OpenOptions};
use std::io::{self, Read, Seek, SeekFrom, Write};
use std::path::Path;

/// The trailing window of a log file, decoded into lines.
#[derive(Debug, Clone)]
pub struct TailRead {
    /// File size when the read started.
    pub file_size: u64,
    /// Byte offset the read started from (0 when the whole file fit).
    pub start_offset: u64,
    /// Number of bytes actually read.
    pub bytes_read: usize,
    /// Lines in file order, each keeping its `\n` terminator if it had one.
    pub lines: Vec<String>,
}

impl TailRead {
    /// Returns true if the head of the file was skipped.
    pub fn skipped(&self) -> bool {
        self.start_offset > 0
    }
}

/// Reads at most `byte_limit` trailing bytes of `path`.
///
/// Invalid UTF-8 is replaced, never rejected. The first line may be partial
/// when the head was skipped, and so may the last one if the game is mid-write.
pub fn read_tail(path: &Path, byte_limit: u64) -> io::Result<TailRead> {
    let mut file = File::open(path)?;
    let file_size = file.metadata()?.len();

    let start_offset = file_size.saturating_sub(byte_limit);
    if start_offset > 0 {
        file.seek(SeekFrom::Start(start_offset))?;
    }

    // Bounded by the size seen above even if the game keeps appending.
    let mut buf = Vec::with_capacity((file_size - start_offset) as usize);
    file.take(file_size - start_offset).read_to_end(&mut buf)?;

    let text = String::from_utf8_lossy(&buf);
    let lines = split_lines(&text);

    Ok(TailRead {
        file_size,
        start_offset,
        bytes_read: buf.len(),
        lines,
    })
}

/// Splits text into lines. `\n`, `\r\n` and a lone `\r` all end a line
/// and come out as `\n`; a trailing unterminated line is kept as is.
fn split_lines(text: &str) -> Vec<String> {
    let mut lines = Vec::new();
    let mut rest = text;
    while let Some(end) = rest.find(['\n', '\r']) {
        let terminator = if rest[end..].starts_with("\r\n") { 2 } else { 1 };
        lines.push(format!("{}\n", &rest[..end]));
        rest = &rest[end + terminator..];
    }
    if !rest.is_empty() {
        lines.push(rest.to_string());
    }
    lines
}

/// Rewrites `path` so that only its last `keep_bytes` bytes remain.
///
/// The cut is byte-exact and ignores line boundaries. Returns the new size.
pub fn trim_to_tail(path: &Path, keep_bytes: u64) -> io::Result<u64> {
    let mut file = OpenOptions::new().read(true).write(true).open(path)?;
    let size = file.metadata()?.len();
    if size <= keep_bytes {
        return Ok(size);
    }

    file.seek(SeekFrom::Start(size - keep_bytes))?;
    let mut tail = Vec::with_capacity(keep_bytes as usize);
    file.read_to_end(&mut tail)?;

    file.seek(SeekFrom::Start(0))?;
    file.set_len(0)?;
    file.write_all(&tail)?;
    file.flush()?;

    Ok(tail.len() as u64)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn write_tmp(content: &[u8]) -> tempfile::NamedTempFile {
        let mut tmp = tempfile::NamedTempFile::new().unwrap();
        tmp.write_all(content).unwrap();
        tmp.flush().unwrap();
        tmp
    }

    #[test]
    fn small_file_read_whole() {
        let tmp = write_tmp(b"Map: ctf_2fort\nSoldier selected \n");
        let tail = read_tail(tmp.path(), 1024).unwrap();
        assert_eq!(tail.start_offset, 0);
        assert!(!tail.skipped());
        assert_eq!(tail.file_size, 34);
        assert_eq!(tail.lines, vec!["Map: ctf_2fort\n", "Soldier selected \n"]);
    }

    #[test]
    fn large_file_skips_to_tail() {
        let content = "x".repeat(10_000) + "\nlast line\n";
        let tmp = write_tmp(content.as_bytes());
        let tail = read_tail(tmp.path(), 100).unwrap();

        assert!(tail.skipped());
        assert_eq!(tail.start_offset, content.len() as u64 - 100);
        assert_eq!(tail.bytes_read, 100);
        assert_eq!(tail.lines.last().unwrap(), "last line\n");
    }

    #[test]
    fn invalid_utf8_is_replaced() {
        let tmp = write_tmp(b"Map: cp_\xff\xfedust\nok\n");
        let tail = read_tail(tmp.path(), 1024).unwrap();
        assert_eq!(tail.lines.len(), 2);
        assert!(tail.lines[0].contains('\u{FFFD}'));
        assert_eq!(tail.lines[1], "ok\n");
    }

    #[test]
    fn crlf_is_folded() {
        let tmp = write_tmp(b"Spy selected \r\nno newline");
        let tail = read_tail(tmp.path(), 1024).unwrap();
        assert_eq!(tail.lines, vec!["Spy selected \n", "no newline"]);
    }

    #[test]
    fn lone_cr_ends_a_line() {
        let tmp = write_tmp(b"Map: pl_upward\rPyro selected \r\n\rlast");
        let tail = read_tail(tmp.path(), 1024).unwrap();
        assert_eq!(
            tail.lines,
            vec!["Map: pl_upward\n", "Pyro selected \n", "\n", "last"]
        );
    }

    #[test]
    fn blank_lines_survive_splitting() {
        assert_eq!(split_lines("\n\na\n"), vec!["\n", "\n", "a\n"]);
        assert!(split_lines("").is_empty());
    }

    #[test]
    fn missing_file_is_not_found() {
        let tmp = tempfile::tempdir().unwrap();
        let err = read_tail(&tmp.path().join("console.log"), 1024).unwrap_err();
        assert_eq!(err.kind(), io::ErrorKind::NotFound);
    }

    #[test]
    fn trim_keeps_exact_tail_bytes() {
        let content: Vec<u8> = (0..5000u32).map(|i| (i % 251) as u8).collect();
        let tmp = write_tmp(&content);

        let new_size = trim_to_tail(tmp.path(), 1200).unwrap();
        assert_eq!(new_size, 1200);

        let trimmed = std::fs::read(tmp.path()).unwrap();
        assert_eq!(trimmed.as_slice(), &content[content.len() - 1200..]);
    }

    #[test]
    fn trim_noop_when_already_small() {
        let tmp = write_tmp(b"short\n");
        assert_eq!(trim_to_tail(tmp.path(), 1024).unwrap(), 6);
        assert_eq!(std::fs::read(tmp.path()).unwrap(), b"short\n");
    }
}
