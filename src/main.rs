mod commands;
mod config;
mod error;
mod external;
mod logging;
mod redirection;
mod resolve;
mod session;
mod signals;
mod tokenize;

use std::io;
use std::process::ExitCode;

use anyhow::{Context, Result};
use log::{debug, info};
use rustyline::DefaultEditor;
use rustyline::error::ReadlineError;

use crate::commands::Environment;
use crate::config::Config;
use crate::session::{Flow, Session};

const PROMPT: &str = "$ ";

fn main() -> Result<ExitCode> {
    logging::init_logger();
    signals::install_interrupt_handler().context("cannot install SIGINT handler")?;

    let config = Config::from_env()?;
    debug!("starting with {:?}", config);
    let env = Environment {
        cwd: config.start_dir,
        home: config.home,
        search: config.search_path,
    };
    let mut session = Session::new(env, io::stdout(), io::stderr());
    let mut editor = DefaultEditor::new().context("cannot initialise line editor")?;

    loop {
        match editor.readline(PROMPT) {
            Ok(line) => {
                let line = line.trim();
                if line.is_empty() {
                    continue;
                }
                match session.run_line(line) {
                    Flow::Continue => {}
                    Flow::Interrupted => println!(),
                    Flow::Exit(code) => {
                        info!("exit {}", code);
                        return Ok(ExitCode::from(code));
                    }
                }
            }
            Err(ReadlineError::Interrupted) => println!(),
            Err(ReadlineError::Eof) => {
                info!("end of input");
                return Ok(ExitCode::SUCCESS);
            }
            Err(e) => return Err(e).context("failed to read input"),
        }
    }
}
