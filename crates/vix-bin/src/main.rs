//! vix entrypoint: startup, the key loop, and shutdown.

mod input;
mod render;
mod term;

use std::io::{BufWriter, Stdout, stdout};
use std::path::PathBuf;
use std::sync::Once;

use anyhow::{Context, Result};
use clap::Parser;
use core_actions::{OpenFileResult, Session, dispatch, open_file};
use core_events::Event;
use core_keymap::{Keymap, Resolution};
use core_state::TextBuffer;
use tracing::{debug, info};
use tracing_appender::non_blocking::WorkerGuard;

const STATUS_ROWS: u16 = 1;

/// CLI arguments.
#[derive(Parser, Debug)]
#[command(name = "vix", version, about = "A modal terminal text editor")]
struct Args {
    /// Path to open at startup. If omitted an empty buffer is used.
    pub path: Option<PathBuf>,
    /// Configuration file path (overrides discovery of `vix.toml`).
    #[arg(long = "config")]
    pub config: Option<PathBuf>,
}

fn main() -> Result<()> {
    let args = Args::parse();
    let config = core_config::Config::load(args.config.as_deref())?;
    let _log_guard = configure_logging(&config);
    install_panic_hook();
    info!(target: "runtime", "startup");

    let mut buf = make_buffer(&args, &config)?;
    let mut terminal = term::Terminal::new();
    terminal.set_title("vix")?;
    let _guard = terminal.enter_guard()?;

    // size the viewport to the terminal, reserving the status row
    let (cols, rows) = crossterm::terminal::size().context("querying terminal size")?;
    buf.resize(cols as usize, rows.saturating_sub(STATUS_ROWS) as usize);

    Editor::new(buf).run()?;

    info!(target: "runtime", "shutdown");
    Ok(())
}

fn make_buffer(args: &Args, config: &core_config::Config) -> Result<TextBuffer> {
    let mut buf = TextBuffer::new(80, 24);
    buf.set_tab_stop(config.editing.tab_stop);
    match &args.path {
        Some(path) => {
            let lines = match open_file(path)? {
                OpenFileResult::Existing(lines) => lines,
                OpenFileResult::NewFile => Vec::new(),
            };
            buf.load(lines, Some(path.clone()));
        }
        None => buf.load(Vec::new(), None),
    }
    Ok(buf)
}

struct Editor {
    buf: TextBuffer,
    session: Session,
    keymap: Keymap,
    out: BufWriter<Stdout>,
    last_key: String,
}

impl Editor {
    fn new(buf: TextBuffer) -> Self {
        Self {
            buf,
            session: Session::default(),
            keymap: Keymap::with_default_bindings(),
            out: BufWriter::new(stdout()),
            last_key: String::new(),
        }
    }

    fn run(&mut self) -> Result<()> {
        render::draw(&mut self.out, &self.buf, &self.last_key)?;
        loop {
            let Some(event) = input::decode(crossterm::event::read()?) else {
                continue;
            };
            match event {
                Event::Key(key) => {
                    self.last_key = key.to_string();
                    match self.keymap.resolve(self.buf.mode, key) {
                        Resolution::Act { op, count } => {
                            let result = dispatch(op, count, &mut self.buf, &mut self.session);
                            if result.quit {
                                debug!(target: "runtime", "quit requested");
                                break;
                            }
                        }
                        Resolution::Pending => {}
                    }
                }
                Event::Resize(cols, rows) => {
                    self.buf
                        .resize(cols as usize, rows.saturating_sub(STATUS_ROWS) as usize);
                }
            }
            render::draw(&mut self.out, &self.buf, &self.last_key)?;
        }
        Ok(())
    }
}

/// Trace output goes to the configured log file; `RUST_LOG` selects levels.
fn configure_logging(config: &core_config::Config) -> Option<WorkerGuard> {
    let path = &config.log.file;
    let dir = path.parent().filter(|p| !p.as_os_str().is_empty());
    let name = path.file_name()?;
    let appender = tracing_appender::rolling::never(
        dir.unwrap_or_else(|| std::path::Path::new(".")),
        name,
    );
    let (writer, guard) = tracing_appender::non_blocking(appender);
    match tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .with_writer(writer)
        .with_ansi(false)
        .try_init()
    {
        Ok(()) => Some(guard),
        // a global subscriber is already installed; drop the guard so the
        // writer thread shuts down
        Err(_) => None,
    }
}

fn install_panic_hook() {
    static HOOK: Once = Once::new();
    HOOK.call_once(|| {
        let default_panic = std::panic::take_hook();
        std::panic::set_hook(Box::new(move |info| {
            tracing::error!(target: "runtime.panic", ?info, "panic");
            default_panic(info);
        }));
    });
}
