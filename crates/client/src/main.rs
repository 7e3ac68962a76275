//! Terminal client for the warren crawl.
//!
//! The binary owns every impure edge: flags, the config file, stdin, and
//! log output. It feeds command names into a [`GameSession`] and renders
//! whatever the session reports back, so all game behavior stays in the
//! `runtime` and `game-core` crates.

mod cli;
mod config_file;
mod input;
mod render;

use std::io::Write;

use anyhow::{Context, Result};
use clap::Parser;

use runtime::{GameSession, RuntimeError, TickOutcome};

use crate::input::Directive;

fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::from_default_env()
                .add_directive(tracing::Level::INFO.into()),
        )
        .with_writer(std::io::stderr)
        .init();

    let args = cli::Args::parse();
    let config = config_file::resolve(&args)?;
    let mut session = GameSession::new(config).context("opening session")?;

    match args.moves {
        Some(ref script) => run_script(&mut session, script),
        None => play(&mut session),
    }
}

/// Non-interactive mode: run a comma-separated command script, print what
/// happened, and exit. Unknown names abort the script.
fn run_script(session: &mut GameSession, script: &str) -> Result<()> {
    for name in script.split(',').map(str::trim).filter(|name| !name.is_empty()) {
        session
            .submit_command(name)
            .with_context(|| format!("command {name:?} in --moves"))?;
        let outcome = session.tick()?;
        report(session, outcome);
    }
    print!("{}", render::frame(session));
    Ok(())
}

fn play(session: &mut GameSession) -> Result<()> {
    println!("You drop into the warren. Type ? for help, q to quit.");
    print!("{}", render::frame(session));

    let stdin = std::io::stdin();
    let mut line = String::new();
    loop {
        print!("> ");
        std::io::stdout().flush()?;
        line.clear();
        if stdin.read_line(&mut line)? == 0 {
            break;
        }
        match input::parse_line(&line) {
            Directive::Empty => {}
            Directive::Quit => break,
            Directive::Help => println!("{}", input::HELP),
            Directive::Look => print!("{}", render::frame(session)),
            Directive::Submit(name) => {
                if !submit_turn(session, name)? {
                    continue;
                }
                print!("{}", render::frame(session));
                if session.is_game_over() {
                    println!("You have fallen. Farewell.");
                    break;
                }
            }
        }
    }
    Ok(())
}

/// Submits one command name and resolves it. Returns false when the name
/// was refused at the boundary and no tick happened.
fn submit_turn(session: &mut GameSession, name: &str) -> Result<bool> {
    match session.submit_command(name) {
        Ok(_) => {}
        Err(RuntimeError::InvalidCommand { name }) => {
            println!("Unknown command {name:?}. Type ? for help.");
            return Ok(false);
        }
        Err(error) => return Err(error.into()),
    }
    let outcome = session.tick()?;
    report(session, outcome);
    Ok(true)
}

fn report(session: &GameSession, outcome: TickOutcome) {
    match outcome {
        TickOutcome::Idle => {}
        TickOutcome::Rejected(rejection) => println!("{}", render::describe_rejection(&rejection)),
        TickOutcome::Turn(turn) => {
            for event in &turn.events {
                println!("{}", render::describe_event(session.state(), event));
            }
        }
        TickOutcome::GameOver => println!("The run is over."),
    }
}
