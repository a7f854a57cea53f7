mod args;
mod forms;

use clap::Parser;
use log::{info, warn, LevelFilter};
use std::io::{self, BufRead, Write};

use crate::args::{Args, Command};
use crate::forms::config_reader::resolve_settings;
use crate::forms::io_terminal::TerminalShell;
use crate::forms::*;

fn run<R: BufRead, W: Write>(args: &Args, shell: &mut TerminalShell<R, W>) -> FormsResult<()> {
    let settings = resolve_settings(
        args.config.as_deref(),
        args.data_dir.as_deref(),
        args.candidates.as_deref(),
    )?;
    info!("settings: {:?}", settings);

    match &args.command {
        Command::Vote { id, candidate } if id.is_some() || candidate.is_some() => {
            let input = VoteInput {
                id: id.clone(),
                candidate: candidate.clone(),
            };
            submit_vote(&settings, &input, shell)?;
        }
        Command::Vote { .. } => {
            run_voting(&settings, shell)?;
        }
        Command::Grade {
            name,
            attempts,
            scores,
        } if name.is_some() || attempts.is_some() || scores.is_some() => {
            let input = GradeInput {
                name: name.clone(),
                attempts: attempts.clone(),
                scores: scores.clone().unwrap_or_default(),
            };
            submit_grade(&settings, &input, shell)?;
        }
        Command::Grade { .. } => {
            run_grading(&settings, shell)?;
        }
        Command::Tally { out, reference } => {
            run_tally(&settings, out.as_deref(), reference.as_deref())?;
        }
    }
    Ok(())
}

fn main() {
    let args = Args::parse();

    let level = if args.verbose {
        LevelFilter::Debug
    } else {
        LevelFilter::Info
    };
    env_logger::Builder::new()
        .filter_level(level)
        .parse_default_env()
        .init();

    let stdin = io::stdin();
    let mut shell = TerminalShell::new(stdin.lock(), io::stdout());
    if let Err(e) = run(&args, &mut shell) {
        warn!("Error occured {:?}", e);
        eprintln!("An error occured: {}", e);
        std::process::exit(1);
    }
}
