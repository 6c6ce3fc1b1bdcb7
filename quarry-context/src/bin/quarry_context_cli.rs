use clap::Parser;
use quarry_context::{ChunkSplitter, DocumentRecord, Provenance};
use std::fs;
use std::io::{self, Read};
use std::path::Path;

/// A CLI tool to split a text file into overlapping chunks as JSON output.
#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
struct Args {
    /// Path to the input text file. If not provided, reads from stdin.
    #[arg(short, long)]
    input: Option<String>,

    /// Filename recorded as chunk provenance. Defaults to the input file's
    /// basename, or "stdin".
    #[arg(short, long)]
    filename: Option<String>,

    /// Size of each chunk in characters.
    #[arg(short = 's', long, default_value_t = 1000)]
    chunk_size: usize,

    /// Number of characters shared between consecutive chunks.
    #[arg(short = 'o', long, default_value_t = 200)]
    chunk_overlap: usize,
}

fn main() -> io::Result<()> {
    let args = Args::parse();

    let (text, default_name) = if let Some(input_path) = &args.input {
        let basename = Path::new(input_path)
            .file_name()
            .map(|n| n.to_string_lossy().to_string())
            .unwrap_or_else(|| input_path.clone());
        (fs::read_to_string(input_path)?, basename)
    } else {
        let mut buffer = String::new();
        io::stdin().read_to_string(&mut buffer)?;
        (buffer, "stdin".to_string())
    };

    let filename = args.filename.unwrap_or(default_name);

    let splitter = ChunkSplitter::new(args.chunk_size, args.chunk_overlap)
        .map_err(|e| io::Error::new(io::ErrorKind::InvalidInput, e))?;
    let documents = vec![DocumentRecord::new(text, Provenance::new(filename))];
    let chunks = splitter.split(&documents);

    let json_output = serde_json::to_string_pretty(&chunks)?;
    println!("{json_output}");

    Ok(())
}
