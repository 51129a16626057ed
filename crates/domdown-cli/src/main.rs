//! Command-line HTML to Markdown converter built on the domdown engine.

use std::fs;
use std::io::Read;
use std::path::PathBuf;
use std::process::ExitCode;

use clap::{Parser, ValueEnum};
use domdown::{
    CodeBlockStyle, HeadingStyle, LinkReferenceStyle, LinkStyle, Options, convert_html,
};

#[derive(Debug, Clone, Copy, ValueEnum)]
enum HeadingStyleArg {
    Atx,
    Setext,
}

#[derive(Debug, Clone, Copy, ValueEnum)]
enum CodeBlockStyleArg {
    Fenced,
    Indented,
}

#[derive(Debug, Clone, Copy, ValueEnum)]
enum LinkStyleArg {
    Inlined,
    Referenced,
}

#[derive(Debug, Clone, Copy, ValueEnum)]
enum LinkReferenceStyleArg {
    Full,
    Collapsed,
    Shortcut,
}

/// Convert HTML to Markdown.
#[derive(Debug, Parser)]
#[command(name = "domdown", version)]
struct Cli {
    /// Input HTML file; use '-' or omit to read stdin.
    input: Option<PathBuf>,

    /// Write the Markdown here instead of stdout.
    #[arg(short, long)]
    output: Option<PathBuf>,

    /// Heading output style.
    #[arg(long, value_enum, default_value = "atx")]
    heading_style: HeadingStyleArg,

    /// Code block output style.
    #[arg(long, value_enum, default_value = "fenced")]
    code_block_style: CodeBlockStyleArg,

    /// Fence marker for fenced code blocks.
    #[arg(long, default_value = "```")]
    fence: String,

    /// Marker for unordered list items.
    #[arg(long, default_value = "-")]
    bullet: String,

    /// Delimiter for emphasis.
    #[arg(long, default_value = "_")]
    em_delimiter: String,

    /// Delimiter for strong emphasis.
    #[arg(long, default_value = "**")]
    strong_delimiter: String,

    /// Link output style.
    #[arg(long, value_enum, default_value = "inlined")]
    link_style: LinkStyleArg,

    /// Reference numbering scheme for referenced links.
    #[arg(long, value_enum, default_value = "full")]
    link_reference_style: LinkReferenceStyleArg,

    /// Hard line break marker, emitted before the newline.
    #[arg(long, default_value = "  ")]
    br: String,

    /// Horizontal rule marker.
    #[arg(long, default_value = "* * *", allow_hyphen_values = true)]
    hr: String,

    /// Comma-separated anchor identifiers to preserve as HTML anchors.
    #[arg(long, value_delimiter = ',')]
    anchor_names: Vec<String>,

    /// Keep <img> tags with explicit width/height as HTML.
    #[arg(long)]
    preserve_image_tags_with_size: bool,
}

impl Cli {
    fn to_options(&self) -> Options {
        Options {
            heading_style: match self.heading_style {
                HeadingStyleArg::Atx => HeadingStyle::Atx,
                HeadingStyleArg::Setext => HeadingStyle::Setext,
            },
            code_block_style: match self.code_block_style {
                CodeBlockStyleArg::Fenced => CodeBlockStyle::Fenced,
                CodeBlockStyleArg::Indented => CodeBlockStyle::Indented,
            },
            fence: self.fence.clone(),
            bullet_list_marker: self.bullet.clone(),
            em_delimiter: self.em_delimiter.clone(),
            strong_delimiter: self.strong_delimiter.clone(),
            link_style: match self.link_style {
                LinkStyleArg::Inlined => LinkStyle::Inlined,
                LinkStyleArg::Referenced => LinkStyle::Referenced,
            },
            link_reference_style: match self.link_reference_style {
                LinkReferenceStyleArg::Full => LinkReferenceStyle::Full,
                LinkReferenceStyleArg::Collapsed => LinkReferenceStyle::Collapsed,
                LinkReferenceStyleArg::Shortcut => LinkReferenceStyle::Shortcut,
            },
            br: self.br.clone(),
            hr: self.hr.clone(),
            anchor_names: self.anchor_names.clone(),
            preserve_image_tags_with_size: self.preserve_image_tags_with_size,
        }
    }
}

fn read_input(input: Option<&PathBuf>) -> Result<String, String> {
    match input {
        Some(path) if path.as_os_str() != "-" => fs::read_to_string(path)
            .map_err(|err| format!("Error reading file {}: {err}", path.display())),
        _ => {
            let mut html = String::new();
            std::io::stdin()
                .read_to_string(&mut html)
                .map_err(|err| format!("Error reading stdin: {err}"))?;
            Ok(html)
        }
    }
}

fn run(cli: &Cli) -> Result<(), String> {
    if cli.bullet.is_empty() {
        return Err("bullet marker cannot be empty".to_string());
    }
    if cli.fence.is_empty() {
        return Err("fence marker cannot be empty".to_string());
    }

    let html = read_input(cli.input.as_ref())?;
    let markdown =
        convert_html(&html, &cli.to_options()).map_err(|err| format!("Error: {err}"))?;

    let rendered = if markdown.is_empty() {
        markdown
    } else {
        format!("{markdown}\n")
    };

    match &cli.output {
        Some(path) => fs::write(path, rendered)
            .map_err(|err| format!("Error writing file {}: {err}", path.display())),
        None => {
            print!("{rendered}");
            Ok(())
        }
    }
}

fn main() -> ExitCode {
    let cli = Cli::parse();
    match run(&cli) {
        Ok(()) => ExitCode::SUCCESS,
        Err(message) => {
            eprintln!("{message}");
            ExitCode::FAILURE
        }
    }
}
