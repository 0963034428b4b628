// SPDX-License-Identifier: MIT
// Copyright (c) 2026 Alfred Jean LLC

//! trivia: command line client for the trivia server.

use std::path::PathBuf;
use std::process::ExitCode;
use std::sync::Arc;

use clap::{Parser, Subcommand};
use tokio::sync::mpsc;
use tracing::{info, warn};
use tracing_subscriber::EnvFilter;

use trivia_client::request::{ErrorBanners, RequestSignal, SignalSender};
use trivia_client::sync::{EnvToken, WebSocketTransport};
use trivia_client::{
    env, ClientConfig, Dispatch, Dispatcher, Result, TracingSink, TriviaClient, TriviaState,
};
use trivia_core::Event;

/// trivia: follow a live trivia game
#[derive(Parser, Debug)]
#[command(name = "trivia")]
#[command(about = "Client for the trivia event stream")]
struct Args {
    /// Path to a TOML config file (defaults to $TRIVIA_CONFIG)
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Enable verbose logging
    #[arg(short, long)]
    verbose: bool,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Register a team with the server
    Register {
        /// Team name
        team: String,
    },
    /// Print rounds, questions and answers as they arrive
    Watch,
}

#[tokio::main]
async fn main() -> ExitCode {
    let args = Args::parse();
    setup_logging(args.verbose);

    match run(args).await {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!("error: {}", e);
            ExitCode::FAILURE
        }
    }
}

fn setup_logging(verbose: bool) {
    let default = if verbose { "debug" } else { "info" };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();
}

async fn run(args: Args) -> Result<()> {
    let config = match args.config.or_else(env::config_path) {
        Some(path) => ClientConfig::load(&path)?,
        None => ClientConfig::default(),
    };

    let sink = Arc::new(TracingSink);
    let (signals, signal_rx) = SignalSender::channel();
    let client = TriviaClient::new(config, sink.clone(), signals)?;

    let cancel = client.cancel_token();
    tokio::spawn(async move {
        if tokio::signal::ctrl_c().await.is_ok() {
            cancel.cancel();
        }
    });
    tokio::spawn(report_banners(signal_rx));

    match args.command {
        Command::Register { team } => {
            if client.register(&team).await? {
                println!("registered team '{}'", team.trim());
            }
        }
        Command::Watch => {
            let mut transport = WebSocketTransport::new();
            if env::auth_token().is_some() {
                transport = transport.with_auth(Arc::new(EnvToken));
            }

            let (tx, rx) = mpsc::unbounded_channel();
            let printer = tokio::spawn(print_dispatches(rx, TriviaState::new(sink)));
            let tx = client.watch(tx, transport).await?;
            drop(tx);
            let _ = printer.await;
        }
    }
    Ok(())
}

/// Logs outstanding request errors as they appear and clear.
async fn report_banners(mut rx: mpsc::UnboundedReceiver<RequestSignal>) {
    let mut banners = ErrorBanners::new();
    while let Some(signal) = rx.recv().await {
        if !banners.apply(&signal) {
            continue;
        }
        match &signal {
            RequestSignal::Error {
                source_id, error, ..
            } => warn!(source_id = source_id.as_str(), "{}", error),
            RequestSignal::ClearError { source_id, .. } => {
                info!(source_id = source_id.as_str(), "recovered")
            }
        }
    }
}

async fn print_dispatches(mut rx: mpsc::UnboundedReceiver<Dispatch>, mut state: TriviaState) {
    while let Some(dispatch) = rx.recv().await {
        match dispatch {
            Dispatch::Snapshot(snapshot) => {
                let round = &snapshot.current_round;
                println!("== round: {} ({} questions)", round.description, round.questions.len());
                for question in &round.questions {
                    print_question(&question.prompt, question.answer.as_deref());
                }
                state.replace(snapshot);
            }
            Dispatch::Event(event) => {
                match &event {
                    Event::NewRound(round) => println!("== round: {}", round.description),
                    Event::NewQuestion(q) | Event::NewAnswer(q) => {
                        print_question(&q.prompt, q.answer.as_deref())
                    }
                }
                state.apply(event);
            }
        }
    }
}

fn print_question(prompt: &str, answer: Option<&str>) {
    match answer {
        Some(answer) => println!("   {} -> {}", prompt, answer),
        None => println!("   {}", prompt),
    }
}
