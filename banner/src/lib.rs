//! A crate for rendering text as ASCII-art banners.
//!
//! A banner is a [`GlyphTable`](crate::font::GlyphTable): a flat list of lines in which every
//! printable ASCII character owns a slot of nine lines, the first reserved and the other eight
//! holding the glyph. Rendering concatenates the glyphs of each input line row by row.
//!
//! # Features
//!
//! - Permissive rendering that skips characters without a glyph, or strict rendering that
//!   reports them ([`Renderer`](crate::render::Renderer))
//! - Per-character input validation ([`validate`](crate::render::validate))
//! - Loading banners by name from a directory, with an optional process-wide cache
//!   ([`loader`])
//!
//! # Example
//!
//! ```
//! # use banner::font::GlyphTable;
//! // every glyph is two copies of its character on each row
//! let lines = (' '..='~').flat_map(|c| {
//!     std::iter::once(String::new()).chain(std::iter::repeat_n(format!("{c}{c}"), 8))
//! });
//! let table = GlyphTable::from_lines(lines);
//! assert!(table.is_complete());
//! assert_eq!(banner::render("Hi\n\n:)", &table), concat!(
//!     "HHii\n", "HHii\n", "HHii\n", "HHii\n", "HHii\n", "HHii\n", "HHii\n", "HHii\n",
//!     "\n",
//!     "::))\n", "::))\n", "::))\n", "::))\n", "::))\n", "::))\n", "::))\n", "::))\n",
//! ));
//! ```

pub mod font;
pub mod loader;
pub mod render;
mod str_ext;

pub use render::render;
