//! Local inspection CLI for the leafnote core.
//!
//! # Responsibility
//! - Open the workspace file and expose tree, search, export, and import
//!   commands for quick local checks of `leafnote_core` behavior.
//! - Keep output deterministic for scripting.

use leafnote_core::{
    default_log_level, init_logging, FileBlobStore, Folder, Node, WorkspaceService,
};
use std::path::PathBuf;
use std::process::ExitCode;

fn main() -> ExitCode {
    let data_dir = data_dir();
    if let Err(message) = init_logging(default_log_level(), data_dir.join("logs")) {
        eprintln!("warning: {message}");
    }

    let mut service = WorkspaceService::open(FileBlobStore::new(&data_dir));
    let args: Vec<String> = std::env::args().skip(1).collect();

    match args.first().map(String::as_str) {
        None => {
            println!("leafnote_core version={}", leafnote_core::core_version());
            println!(
                "workspace nodes={} notes={}",
                service.store().len(),
                service.store().note_count()
            );
            ExitCode::SUCCESS
        }
        Some("tree") => {
            let term = args.get(1).map(String::as_str).unwrap_or("");
            print_folder(&service.filter(term), 0);
            ExitCode::SUCCESS
        }
        Some("search") => {
            let Some(term) = args.get(1) else {
                eprintln!("usage: leafnote search <term>");
                return ExitCode::FAILURE;
            };
            for hit in service.search(term) {
                println!("{}\t{}\t{}", hit.note_id, hit.title, hit.snippet);
            }
            ExitCode::SUCCESS
        }
        Some("export") => {
            let Some(path) = args.get(1) else {
                eprintln!("usage: leafnote export <path>");
                return ExitCode::FAILURE;
            };
            let payload = match service.export() {
                Ok(payload) => payload,
                Err(err) => {
                    eprintln!("error: {err}");
                    return ExitCode::FAILURE;
                }
            };
            if let Err(err) = std::fs::write(path, payload) {
                eprintln!("error: failed to write `{path}`: {err}");
                return ExitCode::FAILURE;
            }
            println!("exported to {path}");
            ExitCode::SUCCESS
        }
        Some("import") => {
            let Some(path) = args.get(1) else {
                eprintln!("usage: leafnote import <path>");
                return ExitCode::FAILURE;
            };
            let raw = match std::fs::read_to_string(path) {
                Ok(raw) => raw,
                Err(err) => {
                    eprintln!("error: failed to read `{path}`: {err}");
                    return ExitCode::FAILURE;
                }
            };
            match service.import(&raw) {
                Ok(added) => {
                    println!("imported {added} nodes");
                    ExitCode::SUCCESS
                }
                Err(err) => {
                    eprintln!("error: {err}");
                    ExitCode::FAILURE
                }
            }
        }
        Some(other) => {
            eprintln!("unknown command `{other}`; expected tree|search|export|import");
            ExitCode::FAILURE
        }
    }
}

fn data_dir() -> PathBuf {
    std::env::var_os("LEAFNOTE_DATA_DIR")
        .map(PathBuf::from)
        .unwrap_or_else(|| PathBuf::from(".leafnote"))
}

fn print_folder(folder: &Folder, depth: usize) {
    println!("{}{}/", "  ".repeat(depth), folder.name);
    for child in &folder.children {
        match child {
            Node::Folder(inner) => print_folder(inner, depth + 1),
            Node::Note(note) => println!("{}{}", "  ".repeat(depth + 1), note.title),
        }
    }
}
