//! Source text, positions, and line lookup.

/// One input file for a single pipeline run.
///
/// The text is never edited in place; the pipeline produces a new string.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SourceFile {
    pub path: String,
    pub text: String,
}

impl SourceFile {
    pub fn new(path: impl Into<String>, text: impl Into<String>) -> Self {
        Self {
            path: path.into(),
            text: text.into(),
        }
    }

    /// File name without extension, e.g. `SettingsView` for `./ui/SettingsView.swift`.
    pub fn stem(&self) -> &str {
        std::path::Path::new(&self.path)
            .file_stem()
            .and_then(|s| s.to_str())
            .unwrap_or("")
    }
}

/// Pure position information in a source file.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord)]
pub struct SourceLocation {
    pub file_path: String,
    /// Line number (1-indexed).
    pub line: usize,
    /// Column number in characters (1-indexed).
    pub col: usize,
}

impl SourceLocation {
    pub fn new(file_path: impl Into<String>, line: usize, col: usize) -> Self {
        Self {
            file_path: file_path.into(),
            line,
            col,
        }
    }
}

/// Position plus the text of the line it points into, for cargo-style reports.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SourceContext {
    pub location: SourceLocation,
    /// The source code line content for display.
    pub source_line: String,
}

impl SourceContext {
    pub fn new(location: SourceLocation, source_line: impl Into<String>) -> Self {
        Self {
            location,
            source_line: source_line.into(),
        }
    }

    pub fn file_path(&self) -> &str {
        &self.location.file_path
    }

    pub fn line(&self) -> usize {
        self.location.line
    }

    pub fn col(&self) -> usize {
        self.location.col
    }
}

/// Byte offset → line/column lookup.
///
/// Built once per file; lookups are a binary search over line starts.
#[derive(Debug, Clone)]
pub struct LineIndex<'a> {
    text: &'a str,
    line_starts: Vec<usize>,
}

impl<'a> LineIndex<'a> {
    pub fn new(text: &'a str) -> Self {
        let mut line_starts = vec![0];
        line_starts.extend(
            text.bytes()
                .enumerate()
                .filter(|(_, b)| *b == b'\n')
                .map(|(i, _)| i + 1),
        );
        Self { text, line_starts }
    }

    /// 0-indexed line containing `offset`.
    fn line_of(&self, offset: usize) -> usize {
        match self.line_starts.binary_search(&offset) {
            Ok(line) => line,
            Err(next) => next - 1,
        }
    }

    /// Byte offset where the line containing `offset` starts.
    pub fn line_start(&self, offset: usize) -> usize {
        self.line_starts[self.line_of(offset)]
    }

    /// Byte offset of the line terminator (or end of text) for the line containing `offset`.
    pub fn line_end(&self, offset: usize) -> usize {
        let line = self.line_of(offset);
        let end = self
            .line_starts
            .get(line + 1)
            .map(|next| next - 1)
            .unwrap_or(self.text.len());
        if end > 0 && self.text.as_bytes().get(end - 1) == Some(&b'\r') && end < self.text.len()
        {
            end - 1
        } else {
            end
        }
    }

    /// 1-indexed (line, column); the column counts characters, not bytes.
    pub fn line_col(&self, offset: usize) -> (usize, usize) {
        let line = self.line_of(offset);
        let start = self.line_starts[line];
        let col = self.text[start..offset.min(self.text.len())].chars().count() + 1;
        (line + 1, col)
    }

    /// Text of the line containing `offset`, without its terminator.
    pub fn line_text(&self, offset: usize) -> &'a str {
        &self.text[self.line_start(offset)..self.line_end(offset)]
    }

    /// Leading spaces and tabs of the line containing `offset`.
    pub fn indentation(&self, offset: usize) -> &'a str {
        let line = self.line_text(offset);
        let trimmed = line.trim_start_matches([' ', '\t']);
        &line[..line.len() - trimmed.len()]
    }

    /// Line terminator used by the line containing `offset`.
    ///
    /// Falls back to the first terminator in the file, then to `\n`.
    pub fn line_ending(&self, offset: usize) -> &'static str {
        let end = self.line_end(offset);
        let bytes = self.text.as_bytes();
        match (bytes.get(end), bytes.get(end + 1)) {
            (Some(b'\r'), Some(b'\n')) => "\r\n",
            (Some(b'\n'), _) => "\n",
            _ => detect_line_ending(self.text),
        }
    }

    pub fn context(&self, file_path: &str, offset: usize) -> SourceContext {
        let (line, col) = self.line_col(offset);
        SourceContext::new(
            SourceLocation::new(file_path, line, col),
            self.line_text(offset),
        )
    }
}

/// First line terminator style found in `text`, `\n` if there is none.
pub fn detect_line_ending(text: &str) -> &'static str {
    match text.find('\n') {
        Some(i) if i > 0 && text.as_bytes()[i - 1] == b'\r' => "\r\n",
        _ => "\n",
    }
}
