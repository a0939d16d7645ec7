// Dump command - print parsed descriptions as JSON

use anyhow::{Context, Result};
use serde::Serialize;
use std::path::{Path, PathBuf};

use crate::cli::args::DumpArgs;
use crate::commands::Settings;
use crate::parser::{self, Document, SourceToken};

#[derive(Serialize)]
struct DocumentDump<'a> {
    file: &'a Path,
    document: &'a Document,
}

#[derive(Serialize)]
struct TokenDump {
    file: PathBuf,
    tokens: Vec<SourceToken>,
}

fn to_json<T: Serialize>(value: &T, compact: bool) -> Result<String> {
    let json = if compact {
        serde_json::to_string(value)?
    } else {
        serde_json::to_string_pretty(value)?
    };
    Ok(json)
}

pub async fn handle_dump(args: &DumpArgs, settings: &Settings) -> Result<()> {
    if args.tokens {
        return dump_tokens(args, settings);
    }

    let files = settings.load(&args.paths).await?;
    let dumps: Vec<DocumentDump> = files
        .iter()
        .map(|f| DocumentDump {
            file: &f.path,
            document: &f.document,
        })
        .collect();

    println!("{}", to_json(&dumps, args.compact)?);
    Ok(())
}

fn dump_tokens(args: &DumpArgs, settings: &Settings) -> Result<()> {
    let mut dumps = Vec::new();
    for path in settings.discover(&args.paths) {
        let content = std::fs::read_to_string(&path)
            .with_context(|| format!("Failed to read file: {}", path.display()))?;
        let tokens = parser::read_tokens(&content, &parser::file_base_name(&path))?;
        dumps.push(TokenDump { file: path, tokens });
    }

    println!("{}", to_json(&dumps, args.compact)?);
    Ok(())
}
