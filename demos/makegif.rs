//! MakeGif.
//!
//! Build an animated GIF from the PNG and JPEG files in a directory.
//! Files are taken in lexicographic filename order.

use std::env;
use std::io;
use std::path::{Path, PathBuf};
use std::process::exit;

const DEFAULT_OUTPUT: &str = "out.gif";

fn main() {
    env_logger::init();

    let args: Vec<String> = env::args().skip(1).collect();
    let dir = match args.get(0) {
        Some(dir) => PathBuf::from(dir),
        None => {
            usage();
            exit(2);
        }
    };

    let output = match args.get(1).map(String::as_str) {
        Some("") | None => PathBuf::from(DEFAULT_OUTPUT),
        Some(name) => PathBuf::from(name),
    };

    // Missing or blank fps falls through to the library default of 30.
    let fps = match args.get(2).map(|s| s.trim()) {
        Some("") | None => 0,
        Some(s) => match s.parse::<u32>() {
            Ok(n) => n,
            Err(_) => {
                eprintln!("makegif: bad frame rate: {}", s);
                exit(2);
            }
        },
    };

    let files = match list_images(&dir) {
        Ok(files) => files,
        Err(e) => {
            eprintln!("makegif: {}: {}", dir.display(), e);
            exit(1);
        }
    };

    match gifrun::build_gif(&files, &output, fps) {
        Ok(report) => {
            println!("{}: stored {} of {} frame(s) in {:.2?}",
                    output.display(), report.runs, report.frames, report.elapsed);
        }
        Err(e) => {
            eprintln!("makegif: {}", e);
            exit(1);
        }
    }
}

/// List the .png and .jpg files in a directory, sorted by filename.
fn list_images(dir: &Path)
        -> io::Result<Vec<PathBuf>> {
    let mut files = Vec::new();

    for entry in std::fs::read_dir(dir)? {
        let path = entry?.path();
        if !path.is_file() {
            continue;
        }
        match path.extension().and_then(|e| e.to_str()) {
            Some("png") | Some("jpg") => files.push(path),
            _ => (),
        }
    }

    files.sort();
    Ok(files)
}

fn usage() {
    println!("usage: makegif <dir> [output.gif] [fps]");
}
