// Copyright (c) 2024-2025 R3BL LLC. Licensed under Apache License, Version 2.0.

//! Interactive prompt on top of [`Readline`].
//!
//! - Lines with unbalanced brackets continue on the next line when you press Enter.
//! - Up and Down walk the history, which is saved to `--history-file` if given.
//! - Ctrl+D (or Ctrl+C) exits.
//!
//! Run with: `cargo run --example readline_demo -- --log-file /tmp/readline.log`

use clap::Parser;
use crossterm::terminal;
use futures_util::StreamExt;
use miette::IntoDiagnostic;
use r3bl_readline_core::{PinnedInputStream, Readline, ReadlineConfig, ReadlineError,
                         StdMutex, TracingConfig, Utf8ChunkAssembler, WriterSurface,
                         balanced_brackets_check_handler, ok, tracing_logging};
use std::{path::PathBuf,
          sync::{Arc,
                 atomic::{AtomicBool, Ordering}}};
use tokio::io::AsyncReadExt;

const CTRL_C: &str = "\x03";
const CTRL_D: &str = "\x04";

#[derive(Debug, Parser)]
#[command(about = "Line editing demo with history and multi-line input")]
struct CliArgs {
    /// Where to load and save history. In memory only when omitted.
    #[arg(long)]
    history_file: Option<PathBuf>,

    /// JSON config file, see `ReadlineConfig`.
    #[arg(long)]
    config_file: Option<PathBuf>,

    /// Log to this file. Logging is off when omitted.
    #[arg(long)]
    log_file: Option<String>,
}

#[tokio::main]
async fn main() -> miette::Result<()> {
    let cli_args = CliArgs::parse();

    if let Some(log_file) = cli_args.log_file.clone() {
        tracing_logging::init(TracingConfig::new_file(Some(log_file)))?;
    }

    let mut config = match &cli_args.config_file {
        Some(path) => ReadlineConfig::try_load_from_file(path)?,
        None => ReadlineConfig::default(),
    };
    if cli_args.history_file.is_some() {
        config.history_file = cli_args.history_file.clone();
    }

    terminal::enable_raw_mode().into_diagnostic()?;
    let result = run(&config).await;
    terminal::disable_raw_mode().into_diagnostic()?;
    result
}

async fn run(config: &ReadlineConfig) -> miette::Result<()> {
    let mut readline = Readline::new(config)?;
    readline.attach(Box::new(
        WriterSurface::new_with_terminal_size(Arc::new(StdMutex::new(std::io::stdout())))
            .with_tab_stop_width(config.tab_stop_width),
    ));
    readline.set_check_handler(balanced_brackets_check_handler());

    let exit_requested = Arc::new(AtomicBool::new(false));
    let exit_requested_clone = exit_requested.clone();
    readline.set_unrecognized_handler(move |raw| {
        if raw == CTRL_D || raw == CTRL_C {
            exit_requested_clone.store(true, Ordering::SeqCst);
        }
    });
    readline.set_pause_handler(|is_resume| {
        tracing::debug!(message = "flow control", is_resume = is_resume);
    });

    let mut stdin_stream = create_stdin_stream();

    loop {
        let mut pending_read = readline.read("demo> ");

        let result = loop {
            tokio::select! {
                biased;

                result = &mut pending_read => break result,

                maybe_chunk = stdin_stream.next() => {
                    let Some(chunk) = maybe_chunk else {
                        readline.abort();
                        continue;
                    };
                    readline.handle_data(&chunk);
                    if exit_requested.load(Ordering::SeqCst) {
                        readline.abort();
                    }
                }
            }
        };

        match result {
            Ok(line) => readline.println(&format!("you typed: {line:?}")),
            Err(ReadlineError::Aborted) => {
                readline.println("bye");
                break;
            }
            Err(error) => return Err(error.into()),
        }
    }

    drop(readline.detach());
    ok!()
}

/// Raw mode `stdin` as a stream of text chunks. One chunk is whatever a single read
/// returned, so a paste arrives as one chunk.
fn create_stdin_stream() -> PinnedInputStream<String> {
    Box::pin(async_stream::stream! {
        let mut stdin = tokio::io::stdin();
        let mut buffer = [0_u8; 1024];
        let mut assembler = Utf8ChunkAssembler::new();
        loop {
            match stdin.read(&mut buffer).await {
                Ok(0) => break,
                Ok(byte_count) => {
                    if let Some(text) = assembler.push(&buffer[..byte_count]) {
                        yield text;
                    }
                }
                Err(error) => {
                    tracing::error!(message = "could not read stdin", error = ?error);
                    break;
                }
            }
        }
        if let Some(text) = assembler.finish() {
            yield text;
        }
    })
}
