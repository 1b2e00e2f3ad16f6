//! Line splitting that tolerates bytes which are not UTF-8.

use std::borrow::Cow;
use std::io::{self, BufRead};

/// Lines of a byte source with `\n` or `\r\n` removed.
///
/// Invalid UTF-8 sequences are replaced with U+FFFD rather than failing the
/// line, so a stray Latin-1 byte ends up inside a text field instead of
/// aborting the whole read. Only I/O errors are returned.
#[derive(Debug)]
pub struct LossyLines<R> {
    source: R,
    buf: Vec<u8>,
}

impl<R: BufRead> LossyLines<R> {
    pub fn new(source: R) -> Self {
        Self {
            source,
            buf: Vec::new(),
        }
    }
}

impl<R: BufRead> Iterator for LossyLines<R> {
    type Item = io::Result<String>;

    fn next(&mut self) -> Option<Self::Item> {
        self.buf.clear();
        match self.source.read_until(b'\n', &mut self.buf) {
            Ok(0) => None,
            Ok(_) => {
                if self.buf.last() == Some(&b'\n') {
                    self.buf.pop();
                    if self.buf.last() == Some(&b'\r') {
                        self.buf.pop();
                    }
                }
                let line = match String::from_utf8_lossy(&self.buf) {
                    Cow::Borrowed(text) => text.to_string(),
                    Cow::Owned(text) => {
                        log::debug!("replaced invalid UTF-8 in line {text:?}");
                        text
                    }
                };
                Some(Ok(line))
            }
            Err(err) => Some(Err(err)),
        }
    }
}
