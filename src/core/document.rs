//! Source Document
//!
//! Raw source lines with tab-aware column arithmetic.

/// Source text split into physical lines
///
/// Lines are split on `\n`, `\r\n` and `\r`. Line numbers passed to the
/// accessors are 1-based; columns are 0-based character indices.
#[derive(Debug, Clone, Default)]
pub struct SourceDocument {
    lines: Vec<Vec<char>>,
}

impl SourceDocument {
    pub fn new(text: &str) -> Self {
        let mut lines = Vec::new();
        let mut current = Vec::new();
        let mut chars = text.chars().peekable();
        while let Some(c) = chars.next() {
            match c {
                '\n' => lines.push(std::mem::take(&mut current)),
                '\r' => {
                    if chars.peek() == Some(&'\n') {
                        chars.next();
                    }
                    lines.push(std::mem::take(&mut current));
                }
                _ => current.push(c),
            }
        }
        if !current.is_empty() || lines.is_empty() {
            lines.push(current);
        }
        Self { lines }
    }

    pub fn line_count(&self) -> usize {
        self.lines.len()
    }

    /// Text of a 1-based line, or `None` past the end
    pub fn line(&self, line: usize) -> Option<String> {
        self.chars(line).map(|chars| chars.iter().collect())
    }

    /// Column counted in UTF-16 code units, as LSP positions are.
    /// Characters past the end of the line count as one unit each.
    pub fn utf16_column(&self, line: usize, column: usize) -> usize {
        let chars = self.chars(line).unwrap_or_default();
        let inside = column.min(chars.len());
        let width: usize = chars[..inside].iter().map(|c| c.len_utf16()).sum();
        width + (column - inside)
    }

    fn chars(&self, line: usize) -> Option<&[char]> {
        line.checked_sub(1)
            .and_then(|index| self.lines.get(index))
            .map(Vec::as_slice)
    }

    /// Width of the first `column` characters of `line` once tabs are
    /// expanded to `tab_width` stops
    pub fn expanded_column(&self, line: usize, column: usize, tab_width: usize) -> usize {
        self.chars(line)
            .map(|chars| expanded_length(chars, column, tab_width))
            .unwrap_or(column)
    }

    /// Expanded column of the first non-whitespace character of `line`.
    /// A blank line yields its full expanded width.
    pub fn line_start(&self, line: usize, tab_width: usize) -> usize {
        let Some(chars) = self.chars(line) else {
            return 0;
        };
        let first = chars
            .iter()
            .position(|c| !c.is_whitespace())
            .unwrap_or(chars.len());
        expanded_length(chars, first, tab_width)
    }

    /// Character index of the first non-whitespace character strictly after
    /// `column` on `line`, or `None` when the rest of the line is blank
    pub fn next_non_blank_after(&self, line: usize, column: usize) -> Option<usize> {
        let chars = self.chars(line)?;
        (column + 1..chars.len()).find(|&index| !chars[index].is_whitespace())
    }
}

fn expanded_length(chars: &[char], to: usize, tab_width: usize) -> usize {
    let tab_width = tab_width.max(1);
    chars.iter().take(to).fold(0, |len, &c| {
        if c == '\t' {
            (len / tab_width + 1) * tab_width
        } else {
            len + 1
        }
    })
}
