//! Command line options shared by the frontends.

use std::path::PathBuf;
use structopt::StructOpt;

use crate::emulator::quirks::Quirks;
use crate::emulator::random::{Entropy, SeededEntropy, SystemEntropy};
use crate::emulator::timing::DEFAULT_INSTRUCTION_HZ;

/// The program options.
#[derive(StructOpt, Debug)]
#[structopt(name = "chip8-vm")]
pub struct Opt {
    /// Instructions executed per second
    #[structopt(long, default_value = "700")]
    pub hz: u32,

    /// Shift VX in place for 8XY6/8XYE instead of reading VY
    #[structopt(long)]
    pub shift_vx: bool,

    /// Leave I unchanged after FX55/FX65
    #[structopt(long)]
    pub keep_index: bool,

    /// Set VF when FX1E moves I past 0xFFF
    #[structopt(long)]
    pub index_overflow: bool,

    /// Seed for the random number instruction
    #[structopt(long)]
    pub seed: Option<u64>,

    /// Stop after this many milliseconds
    #[structopt(long)]
    pub duration: Option<u64>,

    /// Verbose mode (-v, -vv, -vvv, etc.)
    #[structopt(short, long, parse(from_occurrences))]
    pub verbose: u8,

    /// The program to execute
    #[structopt(parse(from_os_str))]
    pub input: PathBuf,
}

impl Opt {
    pub fn quirks(&self) -> Quirks {
        Quirks {
            shift_reads_vy: !self.shift_vx,
            load_store_advances_index: !self.keep_index,
            index_overflow_sets_vf: self.index_overflow,
        }
    }

    pub fn entropy(&self) -> Box<dyn Entropy> {
        match self.seed {
            Some(seed) => Box::new(SeededEntropy::new(seed)),
            None => Box::new(SystemEntropy),
        }
    }

    pub fn instruction_hz(&self) -> u32 {
        if self.hz == 0 {
            DEFAULT_INSTRUCTION_HZ
        } else {
            self.hz
        }
    }

    pub fn log_level(&self) -> log::LevelFilter {
        match self.verbose {
            0 => log::LevelFilter::Warn,
            1 => log::LevelFilter::Info,
            2 => log::LevelFilter::Debug,
            _ => log::LevelFilter::Trace,
        }
    }

    pub fn read_rom(&self) -> std::io::Result<Vec<u8>> {
        log::info!("Executing {:?}", &self.input);
        std::fs::read(&self.input)
    }
}
