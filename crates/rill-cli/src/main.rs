use std::{
    env, fs,
    io::{self, Write},
    process::ExitCode,
};

use rill::{ReplError, ReplSession, Runner, StdPrint};

fn main() -> ExitCode {
    let args: Vec<String> = env::args().collect();
    match args.as_slice() {
        [_] => run_prompt(),
        [_, path] => run_file(path),
        _ => {
            eprintln!("Usage: rill [script]");
            ExitCode::from(64)
        }
    }
}

/// Runs a script file. Exit code 65 for compile errors, 70 for runtime
/// errors, 0 for success.
fn run_file(path: &str) -> ExitCode {
    let source = match fs::read_to_string(path) {
        Ok(source) => source,
        Err(err) => {
            eprintln!("Error reading {path}: {err}");
            return ExitCode::FAILURE;
        }
    };

    let runner = match Runner::new(&source) {
        Ok(runner) => runner,
        Err(errors) => {
            for error in errors.iter() {
                eprintln!("{error}");
            }
            return ExitCode::from(65);
        }
    };

    match runner.run(&mut StdPrint) {
        Ok(()) => ExitCode::SUCCESS,
        Err(error) => {
            eprintln!("{error}");
            ExitCode::from(70)
        }
    }
}

/// Interactive mode: one pipeline run per line against a persistent
/// session. Errors are reported and forgotten; the loop only ends at EOF.
fn run_prompt() -> ExitCode {
    let mut session = ReplSession::new();

    loop {
        let Some(line) = read_line("> ") else {
            println!();
            break;
        };
        if line.trim().is_empty() {
            continue;
        }

        match session.execute(&line, &mut StdPrint) {
            Ok(()) => {}
            Err(ReplError::Compile(errors)) => {
                for error in errors.iter() {
                    eprintln!("{error}");
                }
            }
            Err(ReplError::Runtime(error)) => eprintln!("{error}"),
        }
    }

    ExitCode::SUCCESS
}

/// Reads one line from stdin after printing a prompt.
///
/// Returns `None` on EOF (Ctrl+D).
fn read_line(prompt: &str) -> Option<String> {
    print!("{prompt}");
    if io::stdout().flush().is_err() {
        return None;
    }
    let mut input = String::new();
    let read = io::stdin().read_line(&mut input).ok()?;
    if read == 0 {
        return None;
    }
    Some(input.trim_end_matches(['\r', '\n']).to_owned())
}
