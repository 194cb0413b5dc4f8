//! Splits a combined `.shader` file into its vertex and fragment stages.
//!
//! A shader file carries both stages, separated by marker lines:
//!
//! ```text
//! #shader vertex
//! ...
//! #shader fragment
//! ...
//! ```
//!
//! Marker detection is substring based and case sensitive. A marker line is
//! tested for `vertex` first and `fragment` second, so a line mentioning both
//! selects the vertex stage.

use std::fmt;
use std::fs;
use std::io;
use std::path::{Path, PathBuf};
use thiserror::Error;

/// Token that turns a line into a section marker.
pub const MARKER: &str = "#shader";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ShaderStage {
    Vertex,
    Fragment,
}

impl ShaderStage {
    pub const ALL: [ShaderStage; 2] = [ShaderStage::Vertex, ShaderStage::Fragment];

    pub fn keyword(self) -> &'static str {
        match self {
            Self::Vertex => "vertex",
            Self::Fragment => "fragment",
        }
    }

    /// Stage selected by a marker line, `None` for an unknown keyword.
    pub fn from_marker(line: &str) -> Option<Self> {
        if line.contains(Self::Vertex.keyword()) {
            Some(Self::Vertex)
        } else if line.contains(Self::Fragment.keyword()) {
            Some(Self::Fragment)
        } else {
            None
        }
    }
}

impl fmt::Display for ShaderStage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.keyword())
    }
}

#[derive(Debug, Error)]
pub enum ShaderSourceError {
    #[error("shader file not found: {}", .path.display())]
    NotFound { path: PathBuf },

    #[error("failed to read shader file {}: {source}", .path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    #[error("shader source has no {0} section")]
    MissingStage(ShaderStage),
}

/// Vertex and fragment source text, each line terminated by `\n`.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ShaderProgramSource {
    pub vertex_source: String,
    pub fragment_source: String,
}

impl ShaderProgramSource {
    /// Reads and splits a shader file.
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self, ShaderSourceError> {
        let path = path.as_ref();
        let text = fs::read_to_string(path).map_err(|source| match source.kind() {
            io::ErrorKind::NotFound => ShaderSourceError::NotFound {
                path: path.to_path_buf(),
            },
            _ => ShaderSourceError::Io {
                path: path.to_path_buf(),
                source,
            },
        })?;

        let parsed = Self::parse(&text);
        log::debug!(
            "Split {:?}: {} vertex bytes, {} fragment bytes",
            path,
            parsed.vertex_source.len(),
            parsed.fragment_source.len()
        );
        Ok(parsed)
    }

    pub fn parse(text: &str) -> Self {
        let mut parsed = Self::default();
        let mut active: Option<ShaderStage> = None;

        for line in text.lines() {
            // `lines` leaves a bare `\r` on a final unterminated line.
            let line = line.strip_suffix('\r').unwrap_or(line);

            if line.contains(MARKER) {
                active = ShaderStage::from_marker(line);
                continue;
            }

            // Lines outside a known section are dropped.
            if let Some(stage) = active {
                let buffer = parsed.stage_mut(stage);
                buffer.push_str(line);
                buffer.push('\n');
            }
        }

        parsed
    }

    pub fn stage(&self, stage: ShaderStage) -> &str {
        match stage {
            ShaderStage::Vertex => &self.vertex_source,
            ShaderStage::Fragment => &self.fragment_source,
        }
    }

    fn stage_mut(&mut self, stage: ShaderStage) -> &mut String {
        match stage {
            ShaderStage::Vertex => &mut self.vertex_source,
            ShaderStage::Fragment => &mut self.fragment_source,
        }
    }

    /// Fails on the first stage with no source text.
    pub fn validate(&self) -> Result<(), ShaderSourceError> {
        match ShaderStage::ALL
            .into_iter()
            .find(|stage| self.stage(*stage).is_empty())
        {
            Some(stage) => Err(ShaderSourceError::MissingStage(stage)),
            None => Ok(()),
        }
    }

    /// Writes both stages back out in marker format.
    pub fn to_tagged_string(&self) -> String {
        let mut out = String::with_capacity(
            self.vertex_source.len() + self.fragment_source.len() + 2 * (MARKER.len() + 10),
        );
        for stage in ShaderStage::ALL {
            out.push_str(MARKER);
            out.push(' ');
            out.push_str(stage.keyword());
            out.push('\n');
            let text = self.stage(stage);
            out.push_str(text);
            if !text.is_empty() && !text.ends_with('\n') {
                out.push('\n');
            }
        }
        out
    }
}
