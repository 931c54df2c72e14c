// SPDX-License-Identifier: MIT
//
// asciir — vector geometry rendered into a character-cell terminal.
//
// This binary wires the crates into one frame pipeline:
//
//   ar-geom   → meshes, quads, transforms
//   ar-render → viewport clipping, rasterization into a TileBuffer
//   ar-term   → attribute diffing, row-differential frames, raw terminal
//
// Per frame:
//
//   scene.draw → Renderer (mesh → transform → clip → tiles)
//   TerminalRenderer.render (tiles → AttrEncoder → bytes) → one flush
//
// There is no input handling. The demo runs for a configured number of
// frames, following terminal resizes, and restores the terminal on exit.
// `--once` draws a single frame to stdout without touching terminal modes.

mod config;
mod scene;

use std::fs::File;
use std::io;
use std::path::{Path, PathBuf};
use std::process;
use std::thread;
use std::time::Duration;

use ar_render::Renderer;
use ar_term::ansi;
use ar_term::attr::AttrEncoder;
use ar_term::render::TerminalRenderer;
use ar_term::sink::Stream;
use ar_term::terminal::{Terminal, TerminalSize};
use clap::Parser;

use crate::config::{Config, Settings};
use crate::scene::Scene;

#[derive(Parser, Debug)]
#[command(name = "asciir", version)]
#[command(about = "Vector geometry rendered into a character-cell terminal", long_about = None)]
struct Args {
    /// Config file (default: ./asciir.toml when present)
    #[arg(short, long, value_name = "FILE")]
    config: Option<PathBuf>,

    /// Draw one frame to stdout and exit, leaving terminal modes alone
    #[arg(long)]
    once: bool,
}

fn main() {
    let args = Args::parse();

    let settings = match Config::load(args.config.as_deref()).and_then(|c| c.resolve()) {
        Ok(s) => s,
        Err(e) => {
            eprintln!("asciir: {e}");
            process::exit(1);
        }
    };

    init_logging(settings.log_file.as_deref(), args.once);
    log::debug!("starting with {settings:?}");

    if let Err(e) = run(&settings, args.once) {
        log::error!("{e}");
        eprintln!("asciir: {e}");
        process::exit(1);
    }
}

/// Logs go to `path` when given, since stdout carries the frames.
fn init_logging(path: Option<&Path>, once: bool) {
    let file = path.and_then(|path| match File::create(path) {
        Ok(file) => Some(file),
        Err(e) => {
            eprintln!("asciir: cannot open log file {}: {e}", path.display());
            None
        }
    });

    let filter = default_filter(file.is_some(), once);
    let env = env_logger::Env::new().filter_or("ASCIIR_LOG", filter);
    let mut builder = env_logger::Builder::from_env(env);
    if let Some(file) = file {
        builder.target(env_logger::Target::Pipe(Box::new(file)));
    }
    builder.init();
}

/// Log filter used when `ASCIIR_LOG` is unset. Without a log file, records
/// would go to stderr, which is the alternate screen while frames are drawn,
/// so logging stays off unless only a single frame is printed.
const fn default_filter(has_file: bool, once: bool) -> &'static str {
    if has_file || once { "warn" } else { "off" }
}

fn run(settings: &Settings, once: bool) -> io::Result<()> {
    let encoder = AttrEncoder::new(settings.policy).with_bold_offset(settings.bold_offset);
    let mut output = TerminalRenderer::new(encoder);
    let scene = Scene::new(settings);

    let mut term = Terminal::new();
    let mut renderer = Renderer::new(term.size());

    if once {
        scene.draw(&mut renderer, 0);
        output.render(renderer.tiles())?;
        return output.flush();
    }

    term.enter()?;
    ansi::set_title(&mut Stream(io::stdout().lock()), "asciir")?;

    let delay = Duration::from_millis(settings.frame_ms);
    for frame in 0..settings.frames {
        renderer.resize(term.refresh_size());
        scene.draw(&mut renderer, frame);

        let stats = output.render(renderer.tiles())?;
        log::trace!("frame {frame}: {stats:?}");
        output.flush()?;

        thread::sleep(delay);
    }

    term.leave()
}

// ─── Tests ───────────────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn logging_is_off_on_the_frame_screen() {
        assert_eq!(default_filter(false, false), "off");
    }

    #[test]
    fn logging_warns_into_a_file_or_for_one_frame() {
        assert_eq!(default_filter(true, false), "warn");
        assert_eq!(default_filter(false, true), "warn");
        assert_eq!(default_filter(true, true), "warn");
    }
}
