//! Renderer and rendering settings
mod validate;

use std::convert::Infallible;

use thiserror::Error;

use crate::font::{BODY_ROWS, GlyphTable};

pub use validate::{InvalidInput, normalize_newlines, validate};

/// Renders `text` with `table`, skipping characters without a glyph.
///
/// Equivalent to `Renderer::new(table).render(text)`.
#[must_use]
pub fn render(text: &str, table: &GlyphTable) -> String {
    Renderer::new(table).render(text)
}

/// The main type for rendering
///
/// Use [`render()`](Renderer::render) to process strings. Each `\n`-separated line of the input
/// becomes a block of eight rows, every row terminated by `\n`. An empty line between two blocks
/// becomes a single blank row; consecutive non-empty lines are stacked directly.
///
/// ```
/// # use banner::font::GlyphTable;
/// # use banner::render::Renderer;
/// // a table that stops right after the slot for 'i'
/// let mut lines = vec![String::new(); ('i' as usize - 31) * 9];
/// for row in 1..=8 {
///     lines[('i' as usize - 32) * 9 + row] = format!("i{row} ");
/// }
/// let table = GlyphTable::from_lines(lines);
/// let rendered: String = Renderer::new(&table).render("ii");
/// assert_eq!(rendered.lines().next(), Some("i1 i1 "));
/// assert_eq!(rendered.lines().count(), 8);
///
/// let strict = Renderer::new(&table).strict().render("ix");
/// assert!(strict.is_err());
/// ```
#[must_use]
#[derive(Debug, Clone, Copy)]
pub struct Renderer<'table, P = Permissive> {
    table: &'table GlyphTable,
    policy: P,
}

impl<'table> Renderer<'table, Permissive> {
    /// Creates a new renderer that skips characters without a glyph.
    pub const fn new(table: &'table GlyphTable) -> Self {
        Self {
            table,
            policy: Permissive,
        }
    }

    /// Fails instead of skipping when a character has no complete glyph. This changes the output
    /// type to [`Result`].
    pub const fn strict(self) -> Renderer<'table, Strict> {
        Renderer {
            table: self.table,
            policy: Strict,
        }
    }
}

impl<P: LookupPolicy> Renderer<'_, P> {
    /// Renders the given string.
    ///
    /// The input is not validated here; see [`validate`] for the check a caller is expected to
    /// make first. Characters without a slot in the table (control characters, anything past
    /// `'~'` in a standard table) produce nothing in permissive mode.
    pub fn render(&self, text: &str) -> P::Output {
        let checked = self.policy.check(self.table, text);
        self.policy
            .finish(checked.map(|()| self.render_unchecked(text)))
    }

    fn render_unchecked(&self, text: &str) -> String {
        let mut output = String::new();
        let mut lines = text.split('\n').peekable();
        while let Some(line) = lines.next() {
            if line.is_empty() {
                if lines.peek().is_some() {
                    output.push('\n');
                }
                continue;
            }
            for row in BODY_ROWS {
                for c in line.chars() {
                    if let Some(fragment) = self.table.row(c, row) {
                        output.push_str(fragment);
                    }
                }
                output.push('\n');
            }
        }
        output
    }
}

/// What to do about characters without a complete glyph
///
/// Implemented by [`Permissive`] and [`Strict`]; this trait is sealed.
pub trait LookupPolicy: sealed::Sealed + Copy {
    /// Reported before rendering when the policy rejects the input
    type Error;
    /// The type returned by [`Renderer::render`]
    type Output;

    #[doc(hidden)]
    fn check(self, table: &GlyphTable, text: &str) -> Result<(), Self::Error>;

    #[doc(hidden)]
    fn finish(self, rendered: Result<String, Self::Error>) -> Self::Output;
}

/// Skip characters without a glyph (the default)
#[derive(Debug, Clone, Copy, Default)]
pub struct Permissive;

/// Reject input containing a character without a complete glyph
#[derive(Debug, Clone, Copy, Default)]
pub struct Strict;

impl LookupPolicy for Permissive {
    type Error = Infallible;
    type Output = String;

    fn check(self, _: &GlyphTable, _: &str) -> Result<(), Infallible> {
        Ok(())
    }

    fn finish(self, rendered: Result<String, Infallible>) -> String {
        match rendered {
            Ok(rendered) => rendered,
            Err(never) => match never {},
        }
    }
}

impl LookupPolicy for Strict {
    type Error = MissingGlyph;
    type Output = Result<String, MissingGlyph>;

    fn check(self, table: &GlyphTable, text: &str) -> Result<(), MissingGlyph> {
        match text
            .chars()
            .enumerate()
            .find(|&(_, c)| c != '\n' && table.glyph(c).is_none())
        {
            Some((position, character)) => Err(MissingGlyph {
                position,
                character,
            }),
            None => Ok(()),
        }
    }

    fn finish(self, rendered: Result<String, MissingGlyph>) -> Self::Output {
        rendered
    }
}

mod sealed {
    pub trait Sealed {}

    impl Sealed for super::Permissive {}
    impl Sealed for super::Strict {}
}

/// A character that has no complete glyph in the table, reported by a [`Strict`] renderer
#[derive(Debug, Error, Clone, Copy, PartialEq, Eq)]
#[error("no glyph for {character:?} at position {position}")]
pub struct MissingGlyph {
    /// Position of the character in the input, counted in `char`s
    pub position: usize,
    /// The character
    pub character: char,
}
