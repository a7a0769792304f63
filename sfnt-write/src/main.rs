//! Inspect, unwrap and subset font files.

use std::error::Error;
use std::path::{Path, PathBuf};

use clap::{Parser, Subcommand};
use sfnt_read::{parse_font, types::GlyphId, Sfnt};
use sfnt_write::{glyphs_for_text, subset_with_options, SubsetOptions};

#[derive(Parser, Debug)]
#[command(name = "sfnt", version, about, long_about = None)]
struct Args {
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Print the container format, metrics and tables of a font.
    Info {
        /// The input font file.
        font: PathBuf,
    },
    /// Decode a WOFF, WOFF2 or EOT file and write the plain SFNT.
    Unwrap {
        /// The input font file.
        font: PathBuf,
        /// The output font file
        #[arg(short, long)]
        output: PathBuf,
    },
    /// Keep only some glyphs of a font.
    Subset {
        /// The input font file.
        font: PathBuf,
        /// Comma separated list of glyph ids
        #[arg(short, long, value_delimiter = ',')]
        gids: Vec<u16>,
        /// Keep the glyphs needed for this text
        #[arg(short, long)]
        text: Option<String>,
        /// drop hints
        #[arg(long)]
        no_hinting: bool,
        /// Comma separated list of tables to drop
        #[arg(long, value_delimiter = ',')]
        drop_tables: Vec<sfnt_read::types::Tag>,
        /// The output font file
        #[arg(short, long)]
        output: PathBuf,
    },
}

fn main() -> Result<(), Box<dyn Error>> {
    env_logger::init();
    match Args::parse().command {
        Command::Info { font } => {
            let font = load(&font)?;
            print_info(&font);
        }
        Command::Unwrap { font, output } => {
            let font = load(&font)?;
            std::fs::write(&output, font.data())?;
        }
        Command::Subset {
            font,
            gids,
            text,
            no_hinting,
            drop_tables,
            output,
        } => {
            let font = load(&font)?;
            let mut glyphs: Vec<_> = gids.into_iter().map(GlyphId::new).collect();
            if let Some(text) = text {
                glyphs.extend(glyphs_for_text(&font, &text));
            }
            let options = SubsetOptions {
                drop_hints: no_hinting,
                drop_tables,
            };
            let (bytes, retained) = subset_with_options(&font, &glyphs, &options)?;
            log::info!("kept {} glyphs", retained.len());
            std::fs::write(&output, bytes)?;
        }
    }
    Ok(())
}

fn load(path: &Path) -> Result<Sfnt, Box<dyn Error>> {
    let bytes = std::fs::read(path)?;
    Ok(parse_font(&bytes)?)
}

fn print_info(font: &Sfnt) {
    println!("format:        {}", font.format());
    if let Some(name) = font.full_name() {
        println!("name:          {name}");
    }
    println!("units per em:  {}", font.units_per_em());
    println!("glyphs:        {}", font.num_glyphs());
    println!("ascender:      {}", font.ascender());
    println!("descender:     {}", font.descender());
    println!("line gap:      {}", font.line_gap());
    if let Some(cap_height) = font.cap_height() {
        println!("cap height:    {cap_height}");
    }
    if let Some(x_height) = font.x_height() {
        println!("x height:      {x_height}");
    }
    let bbox = font.bounding_box();
    println!(
        "bounding box:  ({}, {}) ({}, {})",
        bbox.x_min, bbox.y_min, bbox.x_max, bbox.y_max
    );
    println!("tables:");
    for record in font.directory().records() {
        println!(
            "  {} {:>8} bytes  checksum {:08X}",
            record.tag, record.length, record.checksum
        );
    }
}
