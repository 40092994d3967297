use log::{debug, error};

use std::{
    io::{BufReader, IsTerminal},
    process::ExitCode,
};

use monthrotate::{reader::LineReader, shutdown::Shutdown, Config, Error, MonthRotate};

fn stdin_is_terminal() -> bool {
    let terminal = std::io::stdin().is_terminal();
    debug!("stdin is_terminal = {}", terminal);
    terminal
}

fn run(config: Config) -> monthrotate::Result<()> {
    if stdin_is_terminal() {
        return Err(Error::NotPiped);
    }

    let shutdown = Shutdown::new();
    shutdown.register_signals()?;

    let mut reader = LineReader::spawn(BufReader::new(std::io::stdin()))?;
    MonthRotate::new(config).run(&mut reader, &shutdown)?;

    println!("Stopping log rotation");
    Ok(())
}

fn main() -> ExitCode {
    env_logger::builder().format_timestamp_nanos().init();

    let config = Config::from_args(std::env::args_os()).unwrap_or_else(|e| e.exit());

    match run(config) {
        Ok(()) => ExitCode::SUCCESS,
        Err(Error::NotPiped) => {
            println!("{}", Error::NotPiped);
            ExitCode::from(Error::NotPiped.exit_code())
        }
        Err(e) => {
            error!("{}", e);
            eprintln!("monthrotate: {}", e);
            ExitCode::from(e.exit_code())
        }
    }
}
