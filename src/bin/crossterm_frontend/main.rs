use std::error::Error;

use structopt::StructOpt;

use chip8_vm::cli::Opt;
use chip8_vm::emulator::{Emulator, Runner};

mod crossterm_io;
mod key_buffer;
mod key_manager;
use crossterm_io::{CrosstermInput, CrosstermOutput};
use key_manager::KeyManager;

fn main() -> Result<(), Box<dyn Error>> {
    // Get configuration and read input file
    let opt = Opt::from_args();
    env_logger::Builder::new().filter_level(opt.log_level()).init();
    let program = opt.read_rom()?;

    // Load instructions into emulator memory
    let mut emulator = Emulator::with_entropy(opt.quirks(), opt.entropy());
    emulator.load(&program)?;

    let key_manager = KeyManager::new();
    let result = {
        let mut runner = Runner::new(
            emulator,
            CrosstermInput::new(&key_manager),
            CrosstermOutput::new()?,
            opt.instruction_hz(),
        );
        // Start execution, Esc stops it
        runner.run(key_manager.stop_flag())
    };

    result?;
    Ok(())
}
