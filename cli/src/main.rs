use anyhow::Context;
use clap::Parser;
use flexi_logger::Logger;
use futures_util::StreamExt;
use memorito_core::RevealOutcome;
use memorito_protocol::{GameEvent, to_json_line};
use memorito_session::{GameEngine, JsonFileScoreService, MemoryScoreService, ScoreService};
use tokio::io::{AsyncBufReadExt, BufReader};

use command::{Command, HELP};
use settings::Args;

mod board;
mod command;
mod settings;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let args = Args::parse();

    let level = args.verbose.log_level_filter().to_string().to_lowercase();
    let _logger = Logger::try_with_env_or_str(level)?
        .log_to_stderr()
        .format(flexi_logger::colored_default_format)
        .start()?;

    let settings = args.settings()?;
    let config = args.engine_config(&settings);
    log::debug!("config: {:?}", config);

    if args.offline(&settings) {
        let engine = GameEngine::new(config, MemoryScoreService::unauthenticated()).context("starting game")?;
        play(engine, args.json).await
    } else {
        let path = args.scores_path(&settings);
        log::debug!("scores in {}", path.display());
        let engine = GameEngine::new(config, JsonFileScoreService::new(path)).context("starting game")?;
        play(engine, args.json).await
    }
}

async fn play<S: ScoreService>(engine: GameEngine<S>, json: bool) -> anyhow::Result<()> {
    let mut events = engine.subscribe();
    let mut lines = BufReader::new(tokio::io::stdin()).lines();

    show(&engine, json)?;
    if !json {
        println!("type \"help\" for commands");
    }

    loop {
        tokio::select! {
            line = lines.next_line() => {
                let Some(line) = line? else { break };
                match line.parse::<Command>() {
                    Ok(Command::Quit) => break,
                    Ok(command) => run(&engine, command, json)?,
                    Err(message) if json => log::warn!("{}", message),
                    Err(message) => println!("{message}"),
                }
            }
            Some(event) = events.next() => report(&engine, &event, json)?,
        }
    }
    Ok(())
}

fn run<S: ScoreService>(engine: &GameEngine<S>, command: Command, json: bool) -> anyhow::Result<()> {
    match command {
        Command::Flip(index) => match engine.reveal(index) {
            RevealOutcome::NoChange if !json => println!("tile {index} can't be flipped now"),
            RevealOutcome::FirstUp(_) => show(engine, json)?,
            _ => {}
        },
        Command::New => engine.new_game(),
        Command::Show => show(engine, json)?,
        Command::Help => println!("{HELP}"),
        Command::Quit => {}
    }
    Ok(())
}

fn show<S: ScoreService>(engine: &GameEngine<S>, json: bool) -> anyhow::Result<()> {
    let snapshot = engine.snapshot();
    if json {
        print!("{}", to_json_line(&snapshot)?);
    } else {
        print!("{}", board::render(&snapshot));
    }
    Ok(())
}

fn report<S: ScoreService>(engine: &GameEngine<S>, event: &GameEvent, json: bool) -> anyhow::Result<()> {
    if json {
        print!("{}", to_json_line(event)?);
        return Ok(());
    }

    match event {
        GameEvent::NewGame { pairs, .. } => {
            println!("new game with {pairs} pairs");
            show(engine, json)?;
        }
        GameEvent::Matched { indices: [a, b] } => {
            println!("{a} and {b} match");
            show(engine, json)?;
        }
        GameEvent::Mismatched { indices: [a, b] } => {
            println!("{a} and {b} don't match");
            show(engine, json)?;
        }
        GameEvent::MismatchHidden { .. } => show(engine, json)?,
        GameEvent::Won { moves } => println!("cleared in {moves} moves, \"new\" for another round"),
        GameEvent::PersonalBest { value } => println!("personal best: {value} moves"),
        GameEvent::AuthChanged { authenticated: true } => println!("signed in, wins are recorded"),
        GameEvent::AuthChanged { authenticated: false } => println!("playing signed out"),
    }
    Ok(())
}
