use cathode_core::prelude::Machine;
use cathode_machines::registry;
use clap::Parser;

mod config;
mod emulator;
mod input;
mod overlay;
mod rom_path;
mod screenshot;
mod video;

/// Cycle-counting 8080 arcade emulator.
#[derive(Parser)]
#[command(name = "cathode", version, about)]
struct Args {
    /// Machine to run (see --list)
    machine: Option<String>,

    /// ROM set: a .zip, a directory containing <machine>.zip, or loose files
    rom_path: Option<String>,

    /// Window scale factor
    #[arg(long)]
    scale: Option<u32>,

    /// Skip ROM CRC32 validation (modified or development ROM images)
    #[arg(long)]
    skip_checksums: bool,

    /// List available machines and exit
    #[arg(long)]
    list: bool,
}

fn main() {
    env_logger::init();
    let args = Args::parse();

    if args.list {
        for entry in registry::all() {
            println!("{}", entry.name);
        }
        return;
    }

    let Some(machine_name) = args.machine else {
        eprintln!("Usage: cathode <machine> [rom-path] (see --help)");
        std::process::exit(2);
    };
    let Some(entry) = registry::find(&machine_name) else {
        let names: Vec<_> = registry::all().iter().map(|e| e.name).collect();
        eprintln!("Unknown machine: {machine_name}");
        eprintln!("Available: {}", names.join(", "));
        std::process::exit(2);
    };

    let config = config::load();
    let rom_path = args.rom_path.or(config.rom_dir).unwrap_or_else(|| {
        eprintln!("No ROM path given and no rom_dir in the config file");
        std::process::exit(2);
    });
    let scale = args.scale.or(config.scale).unwrap_or(3);

    let rom_set = rom_path::load_rom_set(entry.rom_name, &rom_path).unwrap_or_else(|e| {
        eprintln!("Failed to load ROMs: {e}");
        std::process::exit(1);
    });

    let mut machine: Box<dyn Machine> =
        (entry.create)(&rom_set, args.skip_checksums).unwrap_or_else(|e| {
            eprintln!("Failed to start {machine_name}: {e}");
            std::process::exit(1);
        });

    log::info!("starting {machine_name} at scale {scale}");
    let key_map = input::default_key_map(machine.input_map());
    machine.reset();
    emulator::run(machine.as_mut(), &key_map, scale);
}
