use anyhow::{anyhow, Context, Result};
use clap::{Args, Parser, Subcommand, ValueEnum};
use serde::Serialize;
use std::path::{Path, PathBuf};
use std::process::Command;
use tracing::debug;
use tracing_subscriber::EnvFilter;

use synreg_core::{
    content_key, Category, Codec, CodecConfig, ExternalToolFailure, KindTable, Registry,
    SyntaxNode,
};

#[derive(Parser)]
#[command(name = "synreg", about = "Node-kind registry and syntax tree stream codec")]
struct Cli {
    #[command(subcommand)]
    cmd: Cmd,
}

#[derive(Args)]
struct TableSource {
    /// Kind table (JSON). The builtin PHP table is used when no source is given.
    #[arg(long, conflicts_with = "table_cmd")]
    table: Option<PathBuf>,
    /// Shell command that prints a kind table on stdout
    #[arg(long, value_name = "CMD")]
    table_cmd: Option<String>,
}

#[derive(Args)]
struct Limits {
    #[arg(long)]
    max_depth: Option<usize>,
    #[arg(long, value_name = "BYTES")]
    max_payload: Option<usize>,
}

#[derive(ValueEnum, Clone, Copy)]
enum CliCategory {
    Decl,
    Expr,
    Stmt,
    Collection,
    Unclassified,
}

impl From<CliCategory> for Category {
    fn from(c: CliCategory) -> Self {
        match c {
            CliCategory::Decl => Category::Decl,
            CliCategory::Expr => Category::Expr,
            CliCategory::Stmt => Category::Stmt,
            CliCategory::Collection => Category::Collection,
            CliCategory::Unclassified => Category::Unclassified,
        }
    }
}

#[derive(Subcommand)]
enum Cmd {
    /// Build the registry and report its size and checksum
    Validate {
        #[command(flatten)]
        src: TableSource,
    },

    /// Print the table checksum as hex
    Checksum {
        #[command(flatten)]
        src: TableSource,
    },

    /// List kinds in code order
    Kinds {
        #[command(flatten)]
        src: TableSource,
        #[arg(long, value_enum)]
        category: Option<CliCategory>,
    },

    /// Encode a JSON syntax tree into a stream
    Encode {
        #[command(flatten)]
        src: TableSource,
        #[command(flatten)]
        limits: Limits,
        #[arg(long)]
        input: PathBuf,
        #[arg(long)]
        out: PathBuf,
    },

    /// Decode a stream and print the tree as JSON
    Decode {
        #[command(flatten)]
        src: TableSource,
        #[command(flatten)]
        limits: Limits,
        #[arg(long)]
        input: PathBuf,
        /// Keep numeric codes instead of kind names
        #[arg(long, default_value_t = false)]
        raw: bool,
        #[arg(long, default_value_t = false)]
        pretty: bool,
    },

    /// Check that NEW only appends to OLD
    Evolve {
        #[arg(long)]
        old: PathBuf,
        #[arg(long)]
        new: PathBuf,
    },

    /// Write the registry back out as a table sorted by code
    Export {
        #[command(flatten)]
        src: TableSource,
        #[arg(long)]
        out: PathBuf,
    },
}

fn run_generator(cmd: &str) -> Result<KindTable> {
    debug!(cmd, "running table generator");
    let out = Command::new("sh")
        .arg("-c")
        .arg(cmd)
        .output()
        .map_err(|e| ExternalToolFailure::other(format!("failed to start `{cmd}`: {e}")))?;
    if let Some(failure) = ExternalToolFailure::from_status(out.status, &String::from_utf8_lossy(&out.stderr)) {
        return Err(anyhow!(failure)).with_context(|| format!("table generator `{cmd}`"));
    }
    let text = String::from_utf8(out.stdout).context("table generator printed non-UTF-8 output")?;
    Ok(KindTable::from_json(&text)?)
}

fn load_table(src: &TableSource) -> Result<KindTable> {
    match (&src.table, &src.table_cmd) {
        (Some(path), _) => KindTable::load(path).with_context(|| format!("reading {}", path.display())),
        (None, Some(cmd)) => run_generator(cmd),
        (None, None) => Ok(synreg_core::builtin::table()),
    }
}

fn load_registry(src: &TableSource) -> Result<Registry> {
    Ok(Registry::build(&load_table(src)?)?)
}

fn registry_from(path: &Path) -> Result<Registry> {
    Registry::load(path).with_context(|| format!("loading {}", path.display()))
}

fn codec(limits: &Limits) -> Codec {
    let d = CodecConfig::default();
    Codec::new(CodecConfig {
        max_depth: limits.max_depth.unwrap_or(d.max_depth),
        max_payload_len: limits.max_payload.unwrap_or(d.max_payload_len),
    })
}

fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")))
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();
    match cli.cmd {
        Cmd::Validate { src } => {
            let reg = load_registry(&src)?;
            println!("ok: {} kinds, checksum {:016x}", reg.len(), reg.checksum());
        }
        Cmd::Checksum { src } => {
            let reg = load_registry(&src)?;
            println!("{}", hex::encode(reg.checksum().to_be_bytes()));
        }
        Cmd::Kinds { src, category } => {
            let reg = load_registry(&src)?;
            let want = category.map(Category::from);
            for k in reg.iter().filter(|k| want.map_or(true, |c| k.category == c)) {
                if k.is_collection() {
                    println!("{}\t{}\t{} ({})", k.code, k.name, k.category, k.family);
                } else {
                    println!("{}\t{}\t{}", k.code, k.name, k.category);
                }
            }
        }
        Cmd::Encode { src, limits, input, out } => {
            let reg = load_registry(&src)?;
            let text = std::fs::read_to_string(&input).with_context(|| format!("reading {}", input.display()))?;
            let tree: SyntaxNode = serde_json::from_str(&text)?;
            let bytes = codec(&limits).encode(&tree, &reg)?;
            std::fs::write(&out, &bytes)?;
            println!(
                "encoded: {} nodes, {} bytes, key {}",
                tree.size(),
                bytes.len(),
                hex::encode(content_key(&bytes))
            );
        }
        Cmd::Decode { src, limits, input, raw, pretty } => {
            let reg = load_registry(&src)?;
            let bytes = std::fs::read(&input).with_context(|| format!("reading {}", input.display()))?;
            // A table mismatch is only logged; codes missing locally fail the decode.
            let decoded = codec(&limits).decode_stream(&bytes, &reg)?;
            let json = if raw {
                render(&decoded.root, pretty)?
            } else {
                render(&reg.raise(&decoded.root)?, pretty)?
            };
            println!("{json}");
        }
        Cmd::Evolve { old, new } => {
            let old_reg = registry_from(&old)?;
            let new_reg = registry_from(&new)?;
            new_reg.check_evolution(&old_reg)?;
            let added = new_reg.len().saturating_sub(old_reg.len());
            println!("ok: {added} kinds appended");
        }
        Cmd::Export { src, out } => {
            let reg = load_registry(&src)?;
            reg.to_table().save_atomic(&out)?;
            println!("export: {} kinds -> {}", reg.len(), out.display());
        }
    }
    Ok(())
}

fn render<T: Serialize>(value: &T, pretty: bool) -> Result<String> {
    Ok(if pretty { serde_json::to_string_pretty(value)? } else { serde_json::to_string(value)? })
}
