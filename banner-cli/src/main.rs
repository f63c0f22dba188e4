//! Render text as an ASCII-art banner on stdout.

use std::fs;
use std::path::PathBuf;
use std::sync::Arc;

use anyhow::{Context as _, Result, bail};
use banner::font::GlyphTable;
use banner::loader::{BannerSource as _, Directory};
use banner::render::{Renderer, normalize_newlines, validate};
use clap::Parser;

fn main() -> Result<()> {
    let cli = Cli::parse();
    if cli.list {
        for name in cli.names()? {
            println!("{name}");
        }
    } else {
        print!("{}", cli.render()?);
    }
    Ok(())
}

#[derive(Debug, Parser)]
#[command(version, about)]
struct Cli {
    /// Text to render; use a literal newline to start a new block
    #[arg(required_unless_present = "list")]
    input: Option<String>,
    /// Name of the banner to use
    #[arg(short = 'b', long, default_value = "block")]
    banner: String,
    /// Directory containing `<banner>.txt` files
    #[arg(short = 'd', long, env = "BANNER_DIR", default_value = "banners")]
    dir: PathBuf,
    /// Read the glyph table from this file instead of a named banner
    #[arg(short = 'f', long, conflicts_with = "banner")]
    file: Option<PathBuf>,
    /// Fail if a character has no complete glyph instead of skipping it
    #[arg(long)]
    strict: bool,
    /// List the banners in the banner directory and exit
    #[arg(short = 'l', long, conflicts_with_all = ["input", "file", "strict"])]
    list: bool,
}

impl Cli {
    fn names(&self) -> Result<Vec<String>> {
        Ok(Directory::new(&self.dir).names()?)
    }

    fn render(&self) -> Result<String> {
        let Some(input) = &self.input else {
            bail!("nothing to render");
        };
        let table = self.table()?;
        let input = normalize_newlines(input);
        if let Err(error) = validate(&input) {
            bail!("cannot render input: {error}");
        }
        let renderer = Renderer::new(&table);
        if self.strict {
            Ok(renderer.strict().render(&input)?)
        } else {
            Ok(renderer.render(&input))
        }
    }

    fn table(&self) -> Result<Arc<GlyphTable>> {
        if let Some(path) = &self.file {
            let bytes =
                fs::read(path).with_context(|| format!("failed to read {}", path.display()))?;
            let (table, warnings) = GlyphTable::from_bytes_with_warnings(bytes);
            for warning in warnings {
                eprintln!("WARNING: {warning}");
            }
            return Ok(Arc::new(table));
        }
        let source = Directory::new(&self.dir);
        let table = source.load(&self.banner).with_context(|| {
            format!("banner directory: {}", source.root().display())
        })?;
        if !table.is_complete() {
            eprintln!("WARNING: banner {} does not cover all printable characters", self.banner);
        }
        Ok(table)
    }
}
