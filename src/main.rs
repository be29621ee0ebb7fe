use std::io::{self, BufRead, Write};

use anyhow::Result;
use clap::Parser;
use tracing::info;

use narrated_quest_client::config::settings_io;
use narrated_quest_client::console::{Console, Input, HELP};
use narrated_quest_client::engine::api_client::ApiClient;
use narrated_quest_client::engine::engine::Engine;
use narrated_quest_client::engine::protocol::EngineResponse;
use narrated_quest_client::logging;

#[derive(Debug, Parser)]
#[command(name = "narrated_quest", version)]
#[command(about = "Terminal client for the narrated quest backend")]
struct Args {
    /// Backend URL, overrides the settings file and environment
    #[arg(long)]
    base_url: Option<String>,

    /// Story genre sent when an adventure starts
    #[arg(long)]
    genre: Option<String>,

    /// Narration language
    #[arg(long)]
    language: Option<String>,

    /// Log filter used when RUST_LOG is unset
    #[arg(long, default_value = "info")]
    log: String,
}

fn main() -> Result<()> {
    let args = Args::parse();
    logging::init(&args.log);

    let mut settings = settings_io::load_settings()?;
    if let Some(url) = args.base_url {
        settings.base_url = url;
    }
    if let Some(genre) = args.genre {
        settings.genre = genre;
    }
    if let Some(language) = args.language {
        settings.language = language;
    }
    info!(base_url = %settings.base_url, player_id = %settings.player_id, "starting");

    let api = ApiClient::from_settings(&settings);
    let (tx, rx, handle) = Engine::new(api, settings).spawn();

    let mut console = Console::new();
    let stdout = io::stdout();
    println!("{HELP}");

    for line in io::stdin().lock().lines() {
        let line = line?;
        let cmd = match console.parse(&line) {
            Ok(Input::Command(cmd)) => cmd,
            Ok(Input::Help) => {
                println!("{HELP}");
                continue;
            }
            Ok(Input::Quit) => break,
            Err(msg) => {
                println!("* {msg}");
                continue;
            }
        };

        if tx.send(cmd).is_err() {
            break;
        }

        // Every command ends with a settled snapshot.
        while let Ok(resp) = rx.recv() {
            let settled = matches!(&resp, EngineResponse::Snapshot(s)
                if !s.is_processing() && !s.loading_story());
            if let Some(text) = console.render(resp) {
                let mut out = stdout.lock();
                writeln!(out, "{text}")?;
                out.flush()?;
            }
            if settled {
                break;
            }
        }
    }

    drop(tx);
    let _ = handle.join();
    Ok(())
}
