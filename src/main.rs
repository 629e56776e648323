//! Toroidal Life CLI - Run a universe from JSON configuration.

#[cfg(feature = "dhat-heap")]
#[global_allocator]
static ALLOC: dhat::Alloc = dhat::Alloc;

use std::fs;
use std::path::PathBuf;
use std::time::Instant;

use toroidal_life::{
    compute::{Universe, create_universe},
    schema::{Seed, UniverseConfig},
};

/// Widest grid printed as text after the run.
const MAX_PRINT_WIDTH: usize = 80;

fn main() {
    #[cfg(feature = "dhat-heap")]
    let _profiler = dhat::Profiler::new_heap();

    env_logger::init();

    let args: Vec<String> = std::env::args().collect();

    if args.len() < 2 {
        eprintln!("Usage: {} <config.json> [ticks]", args[0]);
        eprintln!();
        eprintln!("Run a toroidal Game of Life universe from JSON configuration.");
        eprintln!();
        eprintln!("Arguments:");
        eprintln!("  config.json  Path to universe configuration file");
        eprintln!("  ticks        Number of generations to advance (default: 100)");
        eprintln!();
        eprintln!("Example configuration is generated with --example flag.");
        std::process::exit(1);
    }

    if args[1] == "--example" {
        print_example_config();
        return;
    }

    let config_path = PathBuf::from(&args[1]);
    let ticks: u64 = args.get(2).and_then(|s| s.parse().ok()).unwrap_or(100);

    // Load configuration
    let mut config = UniverseConfig::from_file(&config_path).unwrap_or_else(|e| {
        eprintln!("Error loading config: {}", e);
        std::process::exit(1);
    });

    // A sibling seed file overrides the configured seed
    let seed_path = config_path.with_extension("seed.json");
    if seed_path.exists() {
        let seed_str = fs::read_to_string(&seed_path).unwrap_or_else(|e| {
            eprintln!("Error reading seed file: {}", e);
            std::process::exit(1);
        });
        config.seed = serde_json::from_str::<Seed>(&seed_str).unwrap_or_else(|e| {
            eprintln!("Error parsing seed: {}", e);
            std::process::exit(1);
        });
    }

    println!("Toroidal Life");
    println!("=============");
    println!("Grid: {}x{}", config.width, config.height);
    println!("Backend: {:?}", config.backend);
    println!("Ticks: {}", ticks);
    println!();

    // Initialize
    let mut universe = create_universe(&config).unwrap_or_else(|e| {
        eprintln!("Error initializing universe: {}", e);
        std::process::exit(1);
    });
    let initial_stats = universe.stats().unwrap_or_else(|e| {
        eprintln!("Error reading universe: {}", e);
        std::process::exit(1);
    });

    println!("Initial population: {}", initial_stats.population);
    println!();

    // Run
    println!("Running...");
    let start = Instant::now();

    for i in 0..ticks {
        if let Err(e) = universe.tick() {
            eprintln!("Error at generation {}: {}", i, e);
            std::process::exit(1);
        }

        // Print progress every 10%
        if (i + 1) % (ticks / 10).max(1) == 0 {
            let population = universe.view().map(|v| v.population()).unwrap_or(0);
            let elapsed = start.elapsed().as_secs_f32();
            let ticks_per_sec = (i + 1) as f32 / elapsed;
            println!(
                "  Generation {}/{}: population={}, {:.1} ticks/s",
                i + 1,
                ticks,
                population,
                ticks_per_sec
            );
        }
    }

    let elapsed = start.elapsed();

    let view = universe.view().unwrap_or_else(|e| {
        eprintln!("Error reading universe: {}", e);
        std::process::exit(1);
    });

    println!();
    println!("Final population: {}", view.population());
    println!(
        "Time: {:.2}s ({:.1} ticks/s)",
        elapsed.as_secs_f32(),
        ticks as f32 / elapsed.as_secs_f32()
    );

    if view.width() <= MAX_PRINT_WIDTH {
        println!();
        print!("{view}");
    }
}

fn print_example_config() {
    let config = UniverseConfig::default();
    let seed = Seed::random(42);

    println!("Example configuration (config.json):");
    println!("{}", serde_json::to_string_pretty(&config).unwrap());
    println!();
    println!("Example seed override (config.seed.json):");
    println!("{}", serde_json::to_string_pretty(&seed).unwrap());
}
