use once_cell::sync::Lazy;
use regex::Regex;
use std::io::{self, BufRead};

static RE_PROJECT_START: Lazy<Regex> =
    Lazy::new(|| Regex::new(r#"^#pragma\s+project\s+"([^"]+)""#).expect("project pattern"));

static RE_CU_START: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r#"^#pragma\s+echo\s+"Processing (/[^\\]+)\\n""#).expect("cu pattern")
});

/// Prefix of the line that terminates a compilation-unit block.
///
/// The analysis tool emits one such line after every unit; the writer copies
/// through it, inclusive.
pub const CU_END_PREFIX: &str = r#"#pragma echo "Done processing /"#;

/// A recognized directive line.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Directive {
    /// `#pragma project "NAME"`: a new project block begins.
    ProjectStart { name: String },
    /// `#pragma echo "Processing /PATH\n"`: a compilation unit begins at
    /// `offset`, the byte position of the start of this line.
    CuStart { path: String, offset: u64 },
}

/// Lazy scanner over a directive-annotated stream.
///
/// Reads the stream line by line, tracking the byte offset of each line
/// start, and yields only the lines that match one of the two recognized
/// markers. All other content is left for the writer to copy verbatim later.
/// Nesting is not validated here; [`crate::UnitIndex`] rejects structurally
/// invalid sequences.
pub struct DirectiveScanner<R> {
    reader: R,
    offset: u64,
    buf: Vec<u8>,
}

impl<R: BufRead> DirectiveScanner<R> {
    pub fn new(reader: R) -> Self {
        Self {
            reader,
            offset: 0,
            buf: Vec::new(),
        }
    }

    fn next_directive(&mut self) -> io::Result<Option<Directive>> {
        loop {
            self.buf.clear();
            let line_start = self.offset;
            let read = self.reader.read_until(b'\n', &mut self.buf)?;
            if read == 0 {
                return Ok(None);
            }
            self.offset += read as u64;

            let line = String::from_utf8_lossy(&self.buf);
            let line = line.trim_end_matches(['\n', '\r']);

            if let Some(captures) = RE_PROJECT_START.captures(line) {
                return Ok(Some(Directive::ProjectStart {
                    name: captures[1].to_string(),
                }));
            }
            if let Some(captures) = RE_CU_START.captures(line) {
                return Ok(Some(Directive::CuStart {
                    path: captures[1].to_string(),
                    offset: line_start,
                }));
            }
        }
    }
}

impl<R: BufRead> Iterator for DirectiveScanner<R> {
    type Item = io::Result<Directive>;

    fn next(&mut self) -> Option<Self::Item> {
        self.next_directive().transpose()
    }
}
