use std::path::PathBuf;
use std::time::{Duration, Instant};

use anyhow::Context as _;
use clap::Parser;
#[allow(unused_imports)]
use log::{debug, error, info, trace, warn, LevelFilter};

use chip8_term::{logger, pacing, render, TermContext};
use chip8vm::{Builder, Clock, Quirks, Scheduler};

/// Host refresh, independent of the instruction rate
const REFRESH_HZ: u64 = 60;

#[derive(Parser, Debug)]
#[command(version, about = "Run a chip-8 program headless, printing frames as ASCII")]
struct Args {
    #[arg(long, help = "Path to the program image")]
    rom: PathBuf,

    #[arg(long, default_value_t = Clock::DEFAULT_CYCLE_HZ, help = "Instructions per second")]
    cycle_hz: u64,

    #[arg(long, default_value_t = 5000, help = "Stop after this many milliseconds")]
    duration_ms: u64,

    #[arg(long, help = "8XY6/8XYE shift VY instead of VX")]
    shift_uses_vy: bool,

    #[arg(long, help = "FX55/FX65 leave I unchanged")]
    no_index_increment: bool,

    #[arg(long, default_value_t = LevelFilter::Info, help = "off, error, warn, info, debug or trace")]
    log_level: LevelFilter,
}

fn main() -> anyhow::Result<()> {
    let args = Args::parse();
    logger::init(args.log_level)?;

    let program = std::fs::read(&args.rom)
        .with_context(|| format!("Failed reading program {}", args.rom.display()))?;
    info!("loaded {} ({} bytes)", args.rom.display(), program.len());

    let quirks = Quirks {
        shift_uses_vy: args.shift_uses_vy,
        increment_index_on_bulk_transfer: !args.no_index_increment,
    };
    let mut chip = Builder::new()
        .with_context(TermContext::new())
        .with_quirks(quirks)
        .with_program(&program)
        .build()
        .map_err(anyhow::Error::msg)?;
    let mut scheduler = Scheduler::new(Clock::with_cycle_hz(args.cycle_hz));
    debug!("clock {:?}, quirks {:?}", scheduler.clock(), chip.quirks());

    let refresh = Duration::from_nanos(1_000_000_000 / REFRESH_HZ);
    let deadline = Duration::from_millis(args.duration_ms);
    let started = Instant::now();
    let mut previous = started;
    scheduler.start();

    while started.elapsed() < deadline {
        let now = Instant::now();
        let elapsed = pacing::catch_up(now.duration_since(previous));
        if let Err(e) = scheduler.advance(&mut chip, elapsed) {
            error!("program halted: {}", e);
            return Err(e.into());
        }
        previous = now;

        if let Some(frame) = chip.take_frame() {
            print!("{}", render(frame.view()));
        }
        spin_sleep::sleep(refresh.saturating_sub(now.elapsed()));
    }

    scheduler.stop(&mut chip);
    info!("finished after {:?}", started.elapsed());
    Ok(())
}
