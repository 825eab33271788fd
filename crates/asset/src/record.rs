//! Line scanner: classifies every OBJ line once into a closed [`Record`].

use std::io::{self, BufRead};
use std::iter::FusedIterator;

use corelib::{Vec2, Vec3};

use crate::error::{MeshError, MeshResult};

/// One classified OBJ line.
#[derive(Clone, Debug, PartialEq)]
pub enum Record {
    /// `v x y z`
    Position(Vec3),
    /// `vt u [v]`
    Texcoord(Vec2),
    /// `vn x y z`
    Normal(Vec3),
    /// `f c1 c2 ...`: raw corner tokens, decoded by [`crate::face`].
    Face(Vec<String>),
    /// `mtllib a.mtl [b.mtl ...]`
    MaterialLib(Vec<String>),
    /// `usemtl name`
    MaterialUse(String),
    /// Blank lines, comments and keywords the pipeline does not use.
    Ignored,
}

/// A record together with its 1-based source line.
#[derive(Clone, Debug, PartialEq)]
pub struct ScannedRecord {
    pub line: usize,
    pub record: Record,
}

/// Lazy, single-pass record stream over a [`BufRead`].
///
/// Lines are not retained after classification. The scanner stops after the
/// first error. Bytes that are not UTF-8 are decoded lossily, so they only
/// fail the load when they sit in a numeric field.
pub struct RecordScanner<R> {
    reader: R,
    buf: Vec<u8>,
    line_no: usize,
    origin: String,
    failed: bool,
}

impl<R: BufRead> RecordScanner<R> {
    pub fn new(reader: R) -> Self {
        Self::with_origin(reader, "<reader>")
    }

    /// `origin` names the source in I/O errors (usually the file path).
    pub fn with_origin(reader: R, origin: impl Into<String>) -> Self {
        Self {
            reader,
            buf: Vec::new(),
            line_no: 0,
            origin: origin.into(),
            failed: false,
        }
    }
}

impl<R: BufRead> Iterator for RecordScanner<R> {
    type Item = MeshResult<ScannedRecord>;

    fn next(&mut self) -> Option<Self::Item> {
        if self.failed {
            return None;
        }

        let line = match read_line_lossy(&mut self.reader, &mut self.buf) {
            Ok(Some(line)) => line,
            Ok(None) => return None,
            Err(source) => {
                self.failed = true;
                return Some(Err(MeshError::FileUnreadable {
                    origin: self.origin.clone(),
                    source,
                }));
            }
        };
        self.line_no += 1;

        let result = classify(&line, self.line_no).map(|record| ScannedRecord {
            line: self.line_no,
            record,
        });
        self.failed = result.is_err();
        Some(result)
    }
}

impl<R: BufRead> FusedIterator for RecordScanner<R> {}

/// Next line without its terminator, `None` at end of input.
pub(crate) fn read_line_lossy<R: BufRead>(
    reader: &mut R,
    buf: &mut Vec<u8>,
) -> io::Result<Option<String>> {
    buf.clear();
    if reader.read_until(b'\n', buf)? == 0 {
        return Ok(None);
    }
    if buf.last() == Some(&b'\n') {
        buf.pop();
        if buf.last() == Some(&b'\r') {
            buf.pop();
        }
    }
    Ok(Some(String::from_utf8_lossy(buf).into_owned()))
}

/// Classify a single OBJ line. `line_no` is only used for error reporting.
pub fn classify(line: &str, line_no: usize) -> MeshResult<Record> {
    let mut parts = strip_comment(line).split_whitespace();
    let Some(keyword) = parts.next() else {
        return Ok(Record::Ignored);
    };

    let record = match keyword {
        "v" => Record::Position(parse_vec3(&mut parts, line_no)?),
        "vt" => {
            let u = parse_f32(parts.next(), line_no, "u coordinate")?;
            // 1D texture coordinates omit v.
            let v = match parts.next() {
                Some(token) => parse_f32(Some(token), line_no, "v coordinate")?,
                None => 0.0,
            };
            Record::Texcoord(Vec2::new(u, v))
        }
        "vn" => Record::Normal(parse_vec3(&mut parts, line_no)?),
        "f" => Record::Face(parts.map(str::to_owned).collect()),
        "mtllib" => {
            let names: Vec<String> = parts.map(str::to_owned).collect();
            if names.is_empty() {
                return Err(MeshError::malformed(line_no, "mtllib without a library name"));
            }
            Record::MaterialLib(names)
        }
        "usemtl" => {
            let name = parts
                .next()
                .ok_or_else(|| MeshError::malformed(line_no, "usemtl without a material name"))?;
            Record::MaterialUse(name.to_owned())
        }
        other => {
            log::trace!("line {}: ignoring '{}' record", line_no, other);
            Record::Ignored
        }
    };

    Ok(record)
}

/// Drop a trailing `# ...` comment.
pub(crate) fn strip_comment(line: &str) -> &str {
    match line.find('#') {
        Some(at) => &line[..at],
        None => line,
    }
}

fn parse_vec3<'a>(parts: &mut impl Iterator<Item = &'a str>, line_no: usize) -> MeshResult<Vec3> {
    let x = parse_f32(parts.next(), line_no, "x coordinate")?;
    let y = parse_f32(parts.next(), line_no, "y coordinate")?;
    let z = parse_f32(parts.next(), line_no, "z coordinate")?;
    Ok(Vec3::new(x, y, z))
}

fn parse_f32(value: Option<&str>, line_no: usize, what: &str) -> MeshResult<f32> {
    let token = value.ok_or_else(|| MeshError::malformed(line_no, format!("missing {}", what)))?;
    token.parse::<f32>().map_err(|_| {
        MeshError::malformed(line_no, format!("cannot parse {} from '{}'", what, token))
    })
}
