#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Command-line adapter that replays an input script against Scrollmap.

use std::{
    fs,
    io::{self, Read},
};

use anyhow::{bail, Context, Result};
use clap::Parser;
use log::info;
use scrollmap_cli::{script, Args, DirectoryLoader, Session, Settings, TextRenderer};
use scrollmap_core::{SessionState, WELCOME_BANNER};
use scrollmap_world::query;

/// Entry point for the Scrollmap command-line interface.
fn main() -> Result<()> {
    env_logger::init();

    let args = Args::parse();
    let settings = Settings::resolve(&args)?;
    let source = match &args.script {
        Some(path) => fs::read_to_string(path)
            .with_context(|| format!("failed to read script at {}", path.display()))?,
        None => {
            let mut buffer = String::new();
            let _ = io::stdin()
                .read_to_string(&mut buffer)
                .context("failed to read script from stdin")?;
            buffer
        }
    };
    let steps = script::parse(&source)?;

    println!("{WELCOME_BANNER}");
    let loader = DirectoryLoader::new(settings.levels.clone());
    let renderer = TextRenderer::new(io::stdout().lock());
    let mut session = Session::new(&settings, loader, renderer)?;

    session.start(settings.start_level(), settings.start_cell())?;
    if query::state(session.world()) != SessionState::Play {
        bail!("level {} could not be loaded", settings.start_level());
    }

    for step in steps {
        session.perform(step)?;
    }

    let world = session.world();
    info!(
        "script finished after {}ms in {:?} at {} with {} gold",
        session.elapsed().as_millis(),
        query::level_name(world).unwrap_or_default(),
        query::player_cell(world),
        query::gold(world)
    );
    Ok(())
}
