mod builtins;
mod config;
mod coordinator;
mod dispatcher;
mod error;
mod launcher;
mod logging;
mod parser;
mod pipeline;
mod redirect;
mod status;

use std::io::{self, BufRead, IsTerminal, Write};

use clap::Parser;

use config::Config;

fn main() {
    let config = Config::parse();
    logging::init_logging(&config);

    if let Some(line) = &config.command {
        let mut should_exit = false;
        let status = dispatcher::dispatch_line(line, 0, &mut should_exit);
        std::process::exit(status);
    }

    // Children get default SIGINT handling back on exec; the shell just redraws.
    if let Err(e) = ctrlc::set_handler(|| {
        println!();
        let _ = io::stdout().flush();
    }) {
        eprintln!("pipesh: failed to set Ctrl-C handler: {e}");
    }

    std::process::exit(run_loop(&config));
}

/// Read and dispatch lines until end-of-input or `exit`. Returns the last status.
fn run_loop(config: &Config) -> i32 {
    let stdin = io::stdin();
    let interactive = stdin.is_terminal();
    let mut stdout = io::stdout();
    let mut last_status = 0;
    let mut should_exit = false;
    let mut input = String::new();

    while !should_exit {
        if interactive {
            print!("{}", config.prompt);
            if stdout.flush().is_err() {
                break;
            }
        }

        input.clear();
        match stdin.lock().read_line(&mut input) {
            Ok(0) => {
                if interactive {
                    println!();
                }
                break;
            }
            Ok(_) => {
                last_status = dispatcher::dispatch_line(&input, last_status, &mut should_exit);
            }
            Err(error) => {
                eprintln!("pipesh: error reading input: {error}");
                break;
            }
        }
    }

    last_status
}
