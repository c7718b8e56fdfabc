//! clip-trim - trim a time range out of a video file
//!
//! Thin CLI over the external ffmpeg tool; independent of the detection
//! pipeline.

use std::path::PathBuf;

use anyhow::Result;
use clap::Parser;

use zonevision::clip::{extract_clip, parse_timestamp, ClipRequest};

#[derive(Debug, Parser)]
#[command(name = "clip-trim", about = "Produce a trimmed copy of a video file")]
struct Args {
    /// Input video file.
    input: PathBuf,

    /// Output video file.
    output: PathBuf,

    /// Start time: seconds or HH:MM:SS(.mmm).
    #[arg(long, default_value = "0")]
    start: String,

    /// End time: seconds or HH:MM:SS(.mmm).
    #[arg(long)]
    end: String,
}

fn main() -> Result<()> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    let args = Args::parse();
    let start_secs = parse_timestamp(&args.start)?;
    let end_secs = parse_timestamp(&args.end)?;

    let request = ClipRequest::new(args.input, args.output, start_secs, end_secs)?;
    extract_clip(&request)?;
    Ok(())
}
