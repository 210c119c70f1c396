mod driver;
mod image;

use std::fs::File;
use std::io::Write;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use clap::Parser;
use sm83_core::logging::{LogCategory, LogConfig, LogLevel};
use sm83_core::{Memory, Sm83};

use driver::{DriverConfig, DEFAULT_FPS};

#[derive(Parser, Debug)]
#[command(name = "sm83", about = "Run a boot image on the SM83 interpreter")]
struct Args {
    /// Boot image, copied to address 0
    #[arg(default_value = "./roms/sgb_boot.bin")]
    image: PathBuf,

    /// Instructions per second
    #[arg(long, default_value_t = DEFAULT_FPS)]
    fps: u32,

    /// Stop after this many instructions
    #[arg(long)]
    max_steps: Option<u64>,

    /// Execute as fast as possible
    #[arg(long, default_value_t = false)]
    unpaced: bool,

    /// Print the boot image as hex before running
    #[arg(long, default_value_t = false)]
    dump: bool,

    /// Write the final register state to this file as JSON
    #[arg(long)]
    save: Option<PathBuf>,

    /// Level for every log category (off, error, warn, info, debug, trace)
    #[arg(long, default_value = "off", value_parser = parse_level)]
    log_level: LogLevel,

    /// Level for the instruction trace; overrides --log-level
    #[arg(long, value_parser = parse_level)]
    log_cpu: Option<LogLevel>,

    /// Send core log output to this file instead of stderr
    #[arg(long)]
    log_file: Option<PathBuf>,
}

impl Args {
    fn driver_config(&self) -> DriverConfig {
        DriverConfig {
            fps: self.fps,
            max_steps: self.max_steps,
            unpaced: self.unpaced,
        }
    }
}

fn parse_level(s: &str) -> Result<LogLevel, String> {
    LogLevel::from_str(s).ok_or_else(|| format!("unknown log level '{}'", s))
}

fn configure_logging(args: &Args) -> Result<()> {
    let config = LogConfig::global();
    config.set_global_level(args.log_level);
    if let Some(level) = args.log_cpu {
        config.set_level(LogCategory::Cpu, level);
    }
    if let Some(path) = args.log_file.as_ref() {
        config
            .set_log_file(path)
            .with_context(|| format!("cannot open log file {}", path.display()))?;
    }
    Ok(())
}

fn write_state(cpu: &Sm83, path: &Path) -> Result<()> {
    let state = cpu.save_state();
    let mut f = File::create(path)
        .with_context(|| format!("cannot create state file {}", path.display()))?;
    write!(f, "{}", serde_json::to_string_pretty(&state)?)?;
    Ok(())
}

fn main() -> Result<()> {
    env_logger::init();
    let args = Args::parse();
    configure_logging(&args)?;

    let rom = image::load_image(&args.image)?;
    log::info!("loaded {} bytes from {}", rom.len(), args.image.display());

    if args.dump {
        println!("BOOT ROM:");
        for row in image::hex_rows(&rom, 16) {
            println!("{}", row);
        }
    }

    let mut memory = Memory::new();
    memory.load(0, &rom)?;
    let mut cpu = Sm83::new(memory);

    let result = driver::run(&mut cpu, &args.driver_config());

    if let Some(path) = args.save.as_ref() {
        write_state(&cpu, path)?;
    }

    match result {
        Ok(steps) => {
            log::info!("stopped after {} instructions", steps);
            Ok(())
        }
        Err(err) => Err(anyhow::Error::new(err).context(format!(
            "execution stopped after {} instructions",
            cpu.instructions()
        ))),
    }
}
