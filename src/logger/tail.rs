//! Collects the last lines of a file by reading fixed-size blocks from the
//! end toward the start, so a tail never loads the whole file.

use std::collections::VecDeque;
use std::io::{self, Read, Seek, SeekFrom};

/// Block size for the backward scan, in bytes.
pub const TAIL_BLOCK_LEN: u64 = 1000;

const NEWLINE: u8 = b'\n';

/// Returns up to `n` of the last non-empty lines within the first `file_len`
/// bytes of `reader`, oldest first.
///
/// Lines longer than `block_len` are reassembled across blocks. The first line
/// of the file is included even though no newline precedes it. On an I/O
/// error the lines gathered so far are returned together with the error.
pub fn tail_lines<R: Read + Seek>(
    reader: &mut R,
    file_len: u64,
    n: usize,
    block_len: u64,
) -> (Vec<String>, Option<io::Error>) {
    let mut scan = Scan::default();
    let err = scan.run(reader, file_len, n, block_len.max(1)).err();
    (scan.lines.into(), err)
}

#[derive(Default)]
struct Scan {
    lines: VecDeque<String>,
    // bytes of the line being rebuilt, last byte first
    pending: Vec<u8>,
}

impl Scan {
    fn run<R: Read + Seek>(
        &mut self,
        reader: &mut R,
        file_len: u64,
        n: usize,
        block_len: u64,
    ) -> io::Result<()> {
        let mut seek_pos = file_len.saturating_sub(block_len);
        let mut buf = vec![0u8; (file_len - seek_pos) as usize];

        while self.lines.len() < n {
            reader.seek(SeekFrom::Start(seek_pos))?;
            reader.read_exact(&mut buf)?;

            for &byte in buf.iter().rev() {
                if byte == NEWLINE {
                    self.finish_line();
                    if self.lines.len() >= n {
                        return Ok(());
                    }
                } else {
                    self.pending.push(byte);
                }
            }

            if seek_pos == 0 {
                self.finish_line();
                return Ok(());
            }

            let old_seek_pos = seek_pos;
            seek_pos = seek_pos.saturating_sub(block_len);
            buf.resize((old_seek_pos - seek_pos) as usize, 0);
        }
        Ok(())
    }

    fn finish_line(&mut self) {
        if self.pending.is_empty() {
            return;
        }
        self.pending.reverse();
        let line = String::from_utf8_lossy(&self.pending).into_owned();
        self.lines.push_front(line);
        self.pending.clear();
    }
}

#[cfg(test)]
mod tests {
    use std::io::Cursor;

    use super::*;

    fn tail(data: &[u8], n: usize, block: u64) -> Vec<String> {
        let mut cur = Cursor::new(data.to_vec());
        let (lines, err) = tail_lines(&mut cur, data.len() as u64, n, block);
        assert!(err.is_none());
        lines
    }

    #[test]
    fn empty_file_yields_nothing() {
        assert!(tail(b"", 5, TAIL_BLOCK_LEN).is_empty());
    }

    #[test]
    fn trailing_newline_and_blank_lines_are_skipped() {
        assert_eq!(tail(b"A\n\nB\n\nC\n", 3, TAIL_BLOCK_LEN), vec!["A", "B", "C"]);
    }

    #[test]
    fn first_line_without_newline_is_kept() {
        assert_eq!(tail(b"first\nsecond", 5, TAIL_BLOCK_LEN), vec!["first", "second"]);
    }

    #[test]
    fn stops_at_n_even_inside_first_block() {
        assert_eq!(tail(b"a\nb\nc\nd\n", 2, TAIL_BLOCK_LEN), vec!["c", "d"]);
    }

    #[test]
    fn zero_requested_reads_nothing() {
        assert!(tail(b"a\nb\n", 0, TAIL_BLOCK_LEN).is_empty());
    }

    #[test]
    fn lines_span_tiny_blocks() {
        let data = b"alpha\nbeta\ngamma\n";
        for block in 1..=8 {
            assert_eq!(tail(data, 10, block), vec!["alpha", "beta", "gamma"], "block {block}");
        }
    }

    #[test]
    fn only_the_sampled_length_is_considered() {
        let data = b"old\nnew\n";
        let mut cur = Cursor::new(data.to_vec());
        let (lines, err) = tail_lines(&mut cur, 4, 10, TAIL_BLOCK_LEN);
        assert!(err.is_none());
        assert_eq!(lines, vec!["old"]);
    }

    #[test]
    fn multibyte_text_survives_block_boundaries() {
        let data = "héllo wörld\nçava\n".as_bytes();
        assert_eq!(tail(data, 2, 3), vec!["héllo wörld", "çava"]);
    }

    #[test]
    fn short_read_returns_partial_result_and_error() {
        let data = b"x\ny\nz\n".to_vec();
        let mut cur = Cursor::new(data);
        // claims more bytes than exist
        let (lines, err) = tail_lines(&mut cur, 50, 10, 4);
        assert!(err.is_some());
        assert!(lines.is_empty());
    }
}
