//! Typed failures of a mesh load. Any of these aborts the whole load.

use std::{fmt, io};

use thiserror::Error;

/// Which attribute pool a face corner referenced.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum AttributeKind {
    Position,
    Texcoord,
    Normal,
}

impl fmt::Display for AttributeKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            AttributeKind::Position => "position",
            AttributeKind::Texcoord => "texcoord",
            AttributeKind::Normal => "normal",
        })
    }
}

#[derive(Debug, Error)]
pub enum MeshError {
    /// The source could not be opened or a line could not be read.
    #[error("cannot read mesh source '{origin}': {source}")]
    FileUnreadable {
        origin: String,
        #[source]
        source: io::Error,
    },

    /// A numeric field failed to parse, or a required field is missing.
    #[error("line {line}: malformed record: {reason}")]
    MalformedRecord { line: usize, reason: String },

    /// A face corner referenced an attribute that was not declared (yet).
    /// `index` is spelled the way the OBJ file does: 1-based, or negative
    /// for relative references.
    #[error("line {line}: {attribute} index {index} out of range ({len} declared so far)")]
    IndexOutOfRange {
        line: usize,
        attribute: AttributeKind,
        index: i64,
        len: usize,
    },

    #[error("line {line}: face has {corners} corner(s), at least 3 required")]
    DegenerateFace { line: usize, corners: usize },

    #[error("line {line}: unsupported face corner syntax '{token}'")]
    UnsupportedCornerSyntax { line: usize, token: String },

    /// Only raised with [`DegenerateUvPolicy::Fail`](crate::DegenerateUvPolicy::Fail).
    #[error("triangle {triangle}: degenerate texture coordinates, tangent frame undefined")]
    DegenerateTexcoords { triangle: usize },

    #[error("mesh needs more than {} vertices", u32::MAX)]
    TooManyVertices,

    #[error("invalid mesh: {reason}")]
    InvalidMesh { reason: String },
}

pub type MeshResult<T> = Result<T, MeshError>;

impl MeshError {
    pub(crate) fn malformed(line: usize, reason: impl Into<String>) -> Self {
        MeshError::MalformedRecord {
            line,
            reason: reason.into(),
        }
    }

    /// 1-based source line of the offending record, for parse-time errors.
    pub fn line(&self) -> Option<usize> {
        match self {
            MeshError::MalformedRecord { line, .. }
            | MeshError::IndexOutOfRange { line, .. }
            | MeshError::DegenerateFace { line, .. }
            | MeshError::UnsupportedCornerSyntax { line, .. } => Some(*line),
            _ => None,
        }
    }
}
