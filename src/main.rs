use std::error::Error;
use std::time::{Duration, Instant};

use structopt::StructOpt;

use chip8_vm::cli::Opt;
use chip8_vm::emulator::{input::DummyInput, output::DummyOutput};
use chip8_vm::emulator::{Emulator, Runner};

fn main() -> Result<(), Box<dyn Error>> {
    // Get configuration and read input file
    let opt = Opt::from_args();
    pretty_env_logger::formatted_builder()
        .filter_level(opt.log_level())
        .init();
    let program = opt.read_rom()?;

    // Load instructions into emulator memory
    let mut emulator = Emulator::with_entropy(opt.quirks(), opt.entropy());
    emulator.load(&program)?;

    // Start execution, without input and without a screen
    let mut runner = Runner::new(emulator, DummyInput, DummyOutput::new(), opt.instruction_hz());
    let limit = opt.duration.map(Duration::from_millis);
    let start = Instant::now();
    let result = runner.run_while(|| limit.map_or(true, |limit| start.elapsed() < limit));

    print!("{}", runner.emulator().framebuffer());
    log::info!("Drew {} frames", runner.output().frames_drawn());

    result?;
    Ok(())
}
