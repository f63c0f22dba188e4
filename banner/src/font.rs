//! Glyph tables
//!
//! A banner is stored as a flat list of lines. The glyph for a printable ASCII character `c`
//! occupies the lines `(c - 32) * 9 + 1` through `(c - 32) * 9 + 8`; the line at `(c - 32) * 9`
//! is reserved and never rendered.

use std::ops::RangeInclusive;

use bstr::ByteSlice as _;
use itertools::Itertools as _;
use thiserror::Error;

use crate::render::Renderer;

/// Number of table lines per character, including the reserved line
pub const GLYPH_HEIGHT: usize = 9;

/// Offsets (within a character's slot) of the rows that are actually rendered
pub const BODY_ROWS: RangeInclusive<usize> = 1..=8;

/// The first character with a glyph slot
pub const FIRST_PRINTABLE: char = ' ';

/// The last character with a glyph slot
pub const LAST_PRINTABLE: char = '~';

/// Number of printable ASCII characters, `' '` through `'~'`
pub const PRINTABLE_COUNT: usize = 95;

/// Minimum number of lines for a table to cover every printable ASCII character
pub const COMPLETE_LEN: usize = PRINTABLE_COUNT * GLYPH_HEIGHT;

/// A banner's glyph table
///
/// Decoding is deliberately forgiving: any byte string is accepted, and lines that are not valid
/// UTF-8 are converted lossily. Problems that might affect the rendered output are reported by
/// [`GlyphTable::from_bytes_with_warnings`].
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct GlyphTable {
    lines: Vec<String>,
}

impl GlyphTable {
    /// Decodes the contents of a banner resource, ignoring warnings.
    #[must_use]
    pub fn from_bytes(bytes: impl AsRef<[u8]>) -> Self {
        Self::from_bytes_with_warnings(bytes).0
    }

    /// Decodes the contents of a banner resource and also returns any non-fatal issues found
    /// while decoding.
    ///
    /// `\r\n` is converted to `\n` before splitting. A trailing newline leaves an empty last
    /// line in the table, which is harmless since it falls outside every glyph slot of a
    /// complete table.
    #[must_use]
    pub fn from_bytes_with_warnings(bytes: impl AsRef<[u8]>) -> (Self, Vec<GlyphWarning>) {
        let normalized = bytes.as_ref().replace("\r\n", "\n");
        let lines = normalized
            .split_str("\n")
            .map(|line| String::from_utf8_lossy(line).into_owned())
            .collect();
        let table = Self { lines };
        let warnings = table.check();
        (table, warnings)
    }

    /// Builds a table from lines that have already been split.
    #[must_use]
    pub fn from_lines<I, S>(lines: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            lines: lines.into_iter().map(Into::into).collect(),
        }
    }

    /// Renders a string with the permissive default settings.
    ///
    /// Characters without a glyph are skipped, see [`Renderer`] for the alternatives.
    #[must_use]
    pub fn render(&self, text: &str) -> String {
        Renderer::new(self).render(text)
    }

    /// The line at a given table index, if there is one.
    #[must_use]
    pub fn line(&self, index: usize) -> Option<&str> {
        self.lines.get(index).map(String::as_str)
    }

    /// Number of lines in the table.
    #[must_use]
    pub fn len(&self) -> usize {
        self.lines.len()
    }

    /// Returns true if the table has no lines at all.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.lines.is_empty()
    }

    /// Returns true if every printable ASCII character has a full glyph slot.
    #[must_use]
    pub fn is_complete(&self) -> bool {
        self.len() >= COMPLETE_LEN
    }

    /// The table index of a body row of `c`.
    ///
    /// Returns `None` for characters below `' '`, whose slot would start before the table.
    #[must_use]
    pub fn index(c: char, row: usize) -> Option<usize> {
        let offset = usize::try_from(u32::from(c).checked_sub(u32::from(FIRST_PRINTABLE))?).ok()?;
        offset.checked_mul(GLYPH_HEIGHT)?.checked_add(row)
    }

    /// The table line for a body row of `c`, if both the slot and the line exist.
    #[must_use]
    pub fn row(&self, c: char, row: usize) -> Option<&str> {
        Self::index(c, row).and_then(|index| self.line(index))
    }

    /// The glyph for `c`, if all its body rows are present.
    #[must_use]
    pub fn glyph(&self, c: char) -> Option<Glyph<'_>> {
        let mut rows = [""; 8];
        for (slot, row) in rows.iter_mut().zip(BODY_ROWS) {
            *slot = self.row(c, row)?;
        }
        Some(Glyph { rows })
    }

    fn check(&self) -> Vec<GlyphWarning> {
        let mut warnings = Vec::new();
        if !self.is_complete() {
            warnings.push(GlyphWarning::Truncated { lines: self.len() });
        }
        for c in FIRST_PRINTABLE..=LAST_PRINTABLE {
            let Some(glyph) = self.glyph(c) else {
                continue;
            };
            if glyph.width().is_none() {
                warnings.push(GlyphWarning::InconsistentWidth(c));
            }
        }
        warnings
    }
}

/// The eight body rows of one character
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Glyph<'table> {
    rows: [&'table str; 8],
}

impl<'table> Glyph<'table> {
    /// The rows, top to bottom.
    #[must_use]
    pub const fn rows(&self) -> &[&'table str; 8] {
        &self.rows
    }

    /// The common width of the rows in `char`s, or `None` if they differ.
    #[must_use]
    pub fn width(&self) -> Option<usize> {
        self.rows
            .iter()
            .map(|row| row.chars().count())
            .all_equal_value()
            .ok()
    }
}

/// A non-fatal issue with a glyph table found while decoding
#[derive(Debug, Error, PartialEq, Eq)]
#[non_exhaustive]
pub enum GlyphWarning {
    /// The table is too short to hold a glyph for every printable ASCII character. Characters
    /// past the end are skipped when rendering.
    #[error("table has {lines} lines, expected at least {}", COMPLETE_LEN)]
    Truncated {
        /// The number of lines found
        lines: usize,
    },
    /// The rows of a glyph are not all the same width, so columns after it will not line up.
    #[error("glyph for {0:?} has rows of different widths")]
    InconsistentWidth(char),
}

#[cfg(test)]
pub(crate) mod tests {
    use super::{COMPLETE_LEN, GLYPH_HEIGHT, GlyphTable, GlyphWarning};

    /// A complete table where every glyph is its character repeated `width` times on every row.
    pub(crate) fn repeated(width: usize) -> GlyphTable {
        let mut lines = Vec::with_capacity(COMPLETE_LEN);
        for c in ' '..='~' {
            lines.push(String::new());
            for _ in 0..GLYPH_HEIGHT - 1 {
                lines.push(c.to_string().repeat(width));
            }
        }
        GlyphTable::from_lines(lines)
    }

    #[test]
    fn crlf_is_normalized() {
        let table = GlyphTable::from_bytes(b"a\r\nb\nc\r\n");
        assert_eq!(table.len(), 4);
        assert_eq!(table.line(0), Some("a"));
        assert_eq!(table.line(1), Some("b"));
        assert_eq!(table.line(2), Some("c"));
        assert_eq!(table.line(3), Some(""));
    }

    #[test]
    fn lone_carriage_return_is_kept() {
        let table = GlyphTable::from_bytes(b"a\rb");
        assert_eq!(table.len(), 1);
        assert_eq!(table.line(0), Some("a\rb"));
    }

    #[test]
    fn invalid_utf8_is_lossy() {
        let table = GlyphTable::from_bytes(b"ok\n\xff\n");
        assert_eq!(table.line(1), Some("\u{FFFD}"));
    }

    #[test]
    fn indices() {
        assert_eq!(GlyphTable::index(' ', 1), Some(1));
        assert_eq!(GlyphTable::index('h', 1), Some(649));
        assert_eq!(GlyphTable::index('~', 8), Some(COMPLETE_LEN - 1));
        assert_eq!(GlyphTable::index('\t', 1), None);
    }

    #[test]
    fn complete_table_has_no_warnings() {
        let table = repeated(3);
        let bytes = (0..table.len())
            .filter_map(|i| table.line(i))
            .collect::<Vec<_>>()
            .join("\r\n");
        let (decoded, warnings) = GlyphTable::from_bytes_with_warnings(bytes);
        assert!(warnings.is_empty(), "{warnings:?}");
        assert!(decoded.is_complete());
        assert_eq!(decoded, table);
    }

    #[test]
    fn truncated_table() {
        let (table, warnings) = GlyphTable::from_bytes_with_warnings("\n a\n a\n a\n a\n a\n a\n a\n a");
        assert_eq!(warnings, [GlyphWarning::Truncated { lines: 9 }]);
        assert!(table.glyph(' ').is_some());
        assert!(table.glyph('!').is_none());
    }

    #[test]
    fn inconsistent_width() {
        let mut lines: Vec<String> = (0..COMPLETE_LEN).map(|_| "  ".to_owned()).collect();
        lines[GlyphTable::index('x', 4).unwrap()] = "   ".to_owned();
        let bytes = lines.join("\n");
        let (_, warnings) = GlyphTable::from_bytes_with_warnings(bytes);
        assert_eq!(warnings, [GlyphWarning::InconsistentWidth('x')]);
    }

    #[test]
    fn glyph_rows() {
        let table = repeated(2);
        let glyph = table.glyph('q').unwrap();
        assert_eq!(glyph.rows(), &["qq"; 8]);
        assert_eq!(glyph.width(), Some(2));
        assert!(table.glyph('\u{7f}').is_none());
        assert!(table.glyph('é').is_none());
    }
}
