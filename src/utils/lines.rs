use std::io::{self, BufRead};

/// Line reader over any `BufRead`.
/// Hands out each line without its `\n` / `\r\n` terminator, with a 1-based line number.
/// Lines of any length are read whole.
pub struct LineReader<R> {
    reader: R,
    buf: Vec<u8>,
    line_no: usize,
}

impl<R: BufRead> LineReader<R> {
    pub fn new(reader: R) -> Self {
        Self {
            reader,
            buf: Vec::new(),
            line_no: 0,
        }
    }

    /// Next raw line.
    /// `Ok(None)` at end of stream, any other read failure is returned as is.
    pub fn next_line(&mut self) -> io::Result<Option<(usize, &[u8])>> {
        self.buf.clear();
        if self.reader.read_until(b'\n', &mut self.buf)? == 0 {
            return Ok(None);
        }
        self.line_no += 1;
        let mut end = self.buf.len();
        if end > 0 && self.buf[end - 1] == b'\n' {
            end -= 1;
            if end > 0 && self.buf[end - 1] == b'\r' {
                end -= 1;
            }
        }
        Ok(Some((self.line_no, &self.buf[..end])))
    }
}

/// Walk every line of `reader`.
/// `#` lines are comments and skipped; every other line is trimmed and split on `sep`,
/// and `action` receives the raw line and its fields.
pub fn travel_lines<R, F>(reader: R, sep: char, mut action: F) -> io::Result<()>
where
    R: BufRead,
    F: FnMut(&str, &[&str]),
{
    let mut lines = LineReader::new(reader);
    while let Some((_, raw)) = lines.next_line()? {
        let line = String::from_utf8_lossy(raw);
        if line.starts_with('#') {
            continue;
        }
        let items: Vec<&str> = line.trim().split(sep).collect();
        action(&line, &items);
    }
    Ok(())
}
