//! KoBoard headless driver.
//!
//! Builds a scene from an optional saved scene plus a streamed diagram
//! description and writes it out as scene JSON, SVG or PNG.

use clap::Parser;
use koboard_core::bridge::{DiagramBridge, JsonlDecoder};
use koboard_core::config::EditorConfig;
use koboard_core::editor::Editor;
use koboard_core::scene::SceneError;
use koboard_render::{RenderOptions, RendererError, export_png, export_svg};
use std::convert::Infallible;
use std::fs;
use std::io::{self, BufRead, BufReader, Read};
use std::path::{Path, PathBuf};
use thiserror::Error;

/// Driver errors.
#[derive(Debug, Error)]
pub enum AppError {
    #[error("IO error on {path}: {source}")]
    Io {
        path: String,
        #[source]
        source: io::Error,
    },
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
    #[error(transparent)]
    Scene(#[from] SceneError),
    #[error(transparent)]
    Render(#[from] RendererError),
}

fn io_error(path: impl Into<String>) -> impl FnOnce(io::Error) -> AppError {
    let path = path.into();
    move |source| AppError::Io { path, source }
}

/// Where diagram records come from.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Input {
    Stdin,
    File(PathBuf),
}

fn parse_input(raw: &str) -> Result<Input, Infallible> {
    Ok(match raw {
        "-" => Input::Stdin,
        path => Input::File(PathBuf::from(path)),
    })
}

/// Lay out a streamed diagram on the board and export it.
#[derive(Debug, Clone, PartialEq, Default, Parser)]
#[command(name = "koboard", version, about, long_about = None)]
pub struct Args {
    /// Newline-delimited diagram records ("-" for stdin)
    #[arg(value_name = "DIAGRAM", value_parser = parse_input)]
    pub input: Option<Input>,
    /// Start from a saved scene JSON
    #[arg(long, value_name = "FILE")]
    pub load: Option<PathBuf>,
    /// Editor configuration JSON
    #[arg(long, value_name = "FILE")]
    pub config: Option<PathBuf>,
    /// Write the scene JSON
    #[arg(long = "scene", value_name = "FILE")]
    pub scene_out: Option<PathBuf>,
    /// Write an SVG export
    #[arg(long = "svg", value_name = "FILE")]
    pub svg_out: Option<PathBuf>,
    /// Write a PNG export
    #[arg(long = "png", value_name = "FILE")]
    pub png_out: Option<PathBuf>,
    /// PNG pixels per world unit [default: 1]
    #[arg(long, value_name = "N")]
    pub scale: Option<f64>,
}

/// What a run produced.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Summary {
    pub nodes: usize,
    /// Diagram records applied to the scene.
    pub applied: usize,
    /// Diagram records dropped (repeats or unknown endpoints).
    pub dropped: usize,
}

/// Feed every record from `reader` through the bridge into the editor.
///
/// Lines that are not valid UTF-8 are skipped.
pub fn apply_stream(editor: &mut Editor, reader: impl Read) -> io::Result<(usize, usize)> {
    let mut reader = BufReader::new(reader);
    let mut decoder = JsonlDecoder::new();
    let mut bridge = DiagramBridge::default();
    let (mut applied, mut dropped) = (0, 0);
    let mut line = Vec::new();
    let mut line_number = 0;
    loop {
        line.clear();
        let read = reader.read_until(b'\n', &mut line)?;
        let items = if read == 0 {
            decoder.finish().into_iter().collect()
        } else {
            line_number += 1;
            match std::str::from_utf8(&line) {
                Ok(chunk) => decoder.push(chunk),
                Err(e) => {
                    log::warn!("Skipping diagram line {}: {}", line_number, e);
                    Vec::new()
                }
            }
        };
        for item in items {
            match bridge.apply(editor, item) {
                Some(_) => applied += 1,
                None => dropped += 1,
            }
        }
        if read == 0 {
            break;
        }
    }
    Ok((applied, dropped))
}

fn write_file(path: &Path, contents: &[u8]) -> Result<(), AppError> {
    fs::write(path, contents).map_err(io_error(path.display().to_string()))?;
    log::info!("Wrote {}", path.display());
    Ok(())
}

/// Execute one run.
pub fn run(args: &Args) -> Result<Summary, AppError> {
    let config = match &args.config {
        Some(path) => {
            let json = fs::read_to_string(path).map_err(io_error(path.display().to_string()))?;
            EditorConfig::from_json(&json)?
        }
        None => EditorConfig::default(),
    };
    let mut editor = Editor::new(config);

    if let Some(path) = &args.load {
        let json = fs::read_to_string(path).map_err(io_error(path.display().to_string()))?;
        editor.load_json(&json)?;
        log::info!("Loaded {} nodes from {}", editor.node_count(), path.display());
    }

    let (applied, dropped) = match &args.input {
        Some(Input::Stdin) => apply_stream(&mut editor, io::stdin().lock()).map_err(io_error("stdin"))?,
        Some(Input::File(path)) => {
            let file = fs::File::open(path).map_err(io_error(path.display().to_string()))?;
            apply_stream(&mut editor, file).map_err(io_error(path.display().to_string()))?
        }
        None => (0, 0),
    };
    if dropped > 0 {
        log::warn!("Dropped {} diagram records", dropped);
    }

    if let Some(path) = &args.scene_out {
        write_file(path, editor.save_json()?.as_bytes())?;
    }
    let options = RenderOptions::default().with_scale(args.scale.unwrap_or(1.0));
    if let Some(path) = &args.svg_out {
        write_file(path, export_svg(editor.scene(), &options).as_bytes())?;
    }
    if let Some(path) = &args.png_out {
        write_file(path, &export_png(editor.scene(), &options)?)?;
    }

    Ok(Summary {
        nodes: editor.node_count(),
        applied,
        dropped,
    })
}
