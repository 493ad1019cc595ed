//! Source buffers and position mapping.
//!
//! A [`Source`] concatenates one or more files into a single addressable text. Offsets produced by the lexer and
//! parser are offsets into that joined text; [`Source::position_info`] maps them back to a file, line and column.
//!
//! ## Notes
//! - Files are joined with exactly one `\n` separator.
//! - Valid offsets are `0..=join().len()`. The separator offset belongs to the end of the preceding file's last
//!   line, so every valid offset maps to exactly one `(file, line, column)` triple.
//! - Lines are 1-based, columns 0-based and counted in characters.

use std::fmt;
use std::fs;
use std::io;
use std::path::{Path, PathBuf};

use crate::diagnostics::CompileError;

/// One named source buffer.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SourceFile {
    pub name: String,
    pub text: String,
}

impl SourceFile {
    pub fn new(name: impl Into<String>, text: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            text: text.into(),
        }
    }
}

/// Location of an offset inside a [`Source`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PositionInfo {
    /// Name of the file containing the offset.
    pub file: String,
    /// 1-based line number within that file.
    pub line: usize,
    /// 0-based column (in characters) within that line.
    pub column: usize,
    /// Full text of the line, without its line terminator.
    pub line_text: String,
}

impl PositionInfo {
    /// Human-readable `file:line:col` link (column shown 1-based).
    pub fn link(&self) -> String {
        format!("{}:{}:{}", self.file, self.line, self.column + 1)
    }
}

impl fmt::Display for PositionInfo {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.link())
    }
}

/// Ordered set of files addressed through one global offset space.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Source {
    files: Vec<SourceFile>,
    joined: String,
    /// Offset of each file's first byte in `joined`.
    starts: Vec<usize>,
}

impl Source {
    pub fn new() -> Self {
        Self::default()
    }

    /// Build a source from in-memory buffers.
    pub fn from_files(files: impl IntoIterator<Item = SourceFile>) -> Self {
        let mut source = Self::new();
        for file in files {
            source.push(file);
        }
        source
    }

    /// Append a file to the end of the offset space.
    pub fn push(&mut self, file: SourceFile) {
        if !self.files.is_empty() {
            self.joined.push('\n');
        }
        self.starts.push(self.joined.len());
        self.joined.push_str(&file.text);
        self.files.push(file);
    }

    pub fn files(&self) -> &[SourceFile] {
        &self.files
    }

    pub fn is_empty(&self) -> bool {
        self.files.is_empty()
    }

    /// The concatenated text all offsets refer to.
    pub fn join(&self) -> &str {
        &self.joined
    }

    /// Length of the joined text in bytes.
    pub fn len(&self) -> usize {
        self.joined.len()
    }

    /// Map a global offset to its file, line and column.
    ///
    /// ## Errors
    /// Returns [`CompileError::PositionOutOfRange`] if `offset` is past the end of the joined text, falls inside a
    /// multi-byte character, or the source has no files.
    pub fn position_info(&self, offset: usize) -> Result<PositionInfo, CompileError> {
        let out_of_range = || CompileError::PositionOutOfRange { offset };
        if self.files.is_empty() || offset > self.joined.len() {
            return Err(out_of_range());
        }

        // starts[0] == 0, so at least one file starts at or before `offset`.
        let index = self.starts.partition_point(|&start| start <= offset) - 1;
        let file = &self.files[index];
        let local = offset - self.starts[index];
        if local > file.text.len() {
            // Only the separator byte sits between files, and it was assigned to the previous file above.
            return Err(out_of_range());
        }

        let mut line_start = 0;
        for (number, line) in file.text.split('\n').enumerate() {
            if local <= line_start + line.len() {
                let prefix = file.text.get(line_start..local).ok_or_else(out_of_range)?;
                return Ok(PositionInfo {
                    file: file.name.clone(),
                    line: number + 1,
                    column: prefix.chars().count(),
                    line_text: line.trim_end_matches('\r').to_string(),
                });
            }
            line_start += line.len() + 1;
        }
        Err(out_of_range())
    }
}

/// Module-loading collaborator.
///
/// Given a module name, a locator resolves the ordered list of source files that make up the module. The parser
/// consults it while parsing import directives; the compilation pipeline uses it to read the files afterwards.
pub trait ModuleLocator {
    /// Resolve `module` to its source file paths, or `None` if no such module exists.
    fn locate(&self, module: &str) -> Option<Vec<PathBuf>>;

    /// Read one located file. The default performs a blocking read from disk.
    fn read(&self, path: &Path) -> io::Result<String> {
        fs::read_to_string(path)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn two_files() -> Source {
        Source::from_files([
            SourceFile::new("a.j", "var x\nvar y"),
            SourceFile::new("b.j", "func f() {}\n"),
        ])
    }

    #[test]
    fn test_join_inserts_one_separator() {
        assert_eq!(two_files().join(), "var x\nvar y\nfunc f() {}\n");
    }

    #[test]
    fn test_position_in_first_file() {
        let source = two_files();
        let info = source.position_info(10).unwrap();
        assert_eq!(info.file, "a.j");
        assert_eq!(info.line, 2);
        assert_eq!(info.column, 4);
        assert_eq!(info.line_text, "var y");
        assert_eq!(info.link(), "a.j:2:5");
    }

    #[test]
    fn test_position_in_second_file_restarts_lines() {
        let source = two_files();
        let offset = source.join().find("func").unwrap();
        let info = source.position_info(offset).unwrap();
        assert_eq!(info.file, "b.j");
        assert_eq!(info.line, 1);
        assert_eq!(info.column, 0);
    }

    #[test]
    fn test_separator_maps_to_end_of_previous_file() {
        let source = two_files();
        let info = source.position_info("var x\nvar y".len()).unwrap();
        assert_eq!(info.file, "a.j");
        assert_eq!(info.line, 2);
        assert_eq!(info.column, 5);
    }

    #[test]
    fn test_end_of_text_is_valid_but_past_it_is_not() {
        let source = two_files();
        let end = source.len();
        let info = source.position_info(end).unwrap();
        assert_eq!(info.file, "b.j");
        assert_eq!(info.line, 2);
        assert_eq!(info.line_text, "");
        assert_eq!(
            source.position_info(end + 1),
            Err(CompileError::PositionOutOfRange { offset: end + 1 })
        );
    }

    #[test]
    fn test_empty_source_has_no_positions() {
        assert!(Source::new().position_info(0).is_err());
    }

    #[test]
    fn test_columns_count_characters() {
        let source = Source::from_files([SourceFile::new("u.j", "var é = x")]);
        let offset = source.join().find('=').unwrap();
        assert_eq!(source.position_info(offset).unwrap().column, 6);
        // Inside the two-byte 'é'.
        assert!(source.position_info(5).is_err());
    }

    #[test]
    fn test_carriage_return_is_not_part_of_line_text() {
        let source = Source::from_files([SourceFile::new("w.j", "var x\r\nvar y")]);
        assert_eq!(source.position_info(0).unwrap().line_text, "var x");
    }

    #[test]
    fn test_position_info_is_idempotent() {
        let source = two_files();
        assert_eq!(source.position_info(7), source.position_info(7));
    }
}
