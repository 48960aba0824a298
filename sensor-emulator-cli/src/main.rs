use clap::Parser;
use env_logger::Env;
use log::LevelFilter;
use sensor_emulator::config::Correction;

use cli::Commands;
use sensor::Emulator;

mod cli;
mod control;
mod read;
mod registers;
mod sensor;
mod util;

fn main() -> anyhow::Result<()> {
    let cli = cli::Cli::parse();
    let default_level = default_log_level(cli.verbose);
    env_logger::Builder::from_env(Env::default().default_filter_or(default_level.as_str()))
        .try_init()?;
    let correction = Correction {
        offset: cli.offset,
        gain: cli.gain,
    };
    let mut emulator = Emulator::from_cli(&cli, &correction)?;
    match cli.command {
        Commands::Registers => registers::action(&mut emulator),
        Commands::Read => println!("{}", read::measure(emulator.peripheral())?),
        Commands::Control => control::action(&mut emulator, &correction)?,
    }
    Ok(())
}

/// Level used when `RUST_LOG` is not set.
fn default_log_level(verbose: bool) -> LevelFilter {
    if verbose {
        LevelFilter::Debug
    } else {
        LevelFilter::Warn
    }
}

#[cfg(test)]
mod test {
    use crate::cli::Cli;
    use crate::default_log_level;

    use clap::{CommandFactory, Parser};
    use log::LevelFilter;

    #[test]
    fn check_cli_debug_asserts() {
        Cli::command().debug_assert();
    }

    #[test]
    fn verbose_logs_bus_traffic() {
        let cli = Cli::parse_from(["sensor-emu", "--verbose", "registers"]);
        assert_eq!(default_log_level(cli.verbose), LevelFilter::Debug);
        let cli = Cli::parse_from(["sensor-emu", "registers"]);
        assert_eq!(default_log_level(cli.verbose), LevelFilter::Warn);
    }
}
