use anyhow::{bail, Context, Result};
use clap::{Parser, Subcommand};
use rand::{Rng, SeedableRng};
use rand_chacha::ChaCha8Rng;
use std::sync::Arc;
use std::time::{Duration, Instant};
use tracing::{debug, info};
use tracing_subscriber::EnvFilter;

use dungeon_hunter::reduce::DEFAULT_LEAF_MULTIPLIER;
use dungeon_hunter::{
    cells_evaluated, hunt_count, reduce_observed, sequential_scan, spawn_hunts, DungeonMap, Hunt,
    ManaField, PartialResult, ReduceConfig, ReductionStats, TracingObserver,
};

// --- Command Line Arguments ---

#[derive(Parser)]
#[command(name = "dungeon-hunter")]
#[command(about = "dungeon-hunter - parallel search for the strongest mana peak")]
#[command(version)]
#[command(subcommand_required = true)]
#[command(arg_required_else_help = true)]
struct Args {
    #[command(subcommand)]
    command: Commands,
}

/// Dungeon shape and engine options shared by every command
#[derive(clap::Args, Clone, Debug)]
struct DungeonArgs {
    /// Half-width of the dungeon; the map spans [-gate, gate] on both axes
    #[arg(allow_negative_numbers = true)]
    gate_size: i64,
    /// Hunts per unit of map area (scaled by the grid resolution)
    #[arg(allow_negative_numbers = true)]
    density: f64,
    /// Random seed for the map and hunt placement (0 = random)
    #[arg(allow_negative_numbers = true)]
    seed: i64,

    // --- Engine options ---
    /// Number of worker threads (0 = all cores)
    #[arg(long, short = 'j', default_value = "0", allow_negative_numbers = true)]
    cores: i64,
    /// Leaf tasks per worker used to derive the cutoff
    #[arg(long, default_value_t = DEFAULT_LEAF_MULTIPLIER)]
    leaf_multiplier: usize,
    /// Fixed cutoff instead of the derived one
    #[arg(long)]
    cutoff: Option<usize>,
    /// Enable verbose output
    #[arg(long, short)]
    verbose: bool,
}

#[derive(Subcommand)]
enum Commands {
    /// Run every hunt and report the strongest peak
    Hunt {
        #[command(flatten)]
        dungeon: DungeonArgs,
        /// Scan the hunts sequentially instead of in parallel
        #[arg(long)]
        serial: bool,
    },
    /// Time the sequential scan against the parallel engine on the same hunts
    Speedup {
        #[command(flatten)]
        dungeon: DungeonArgs,
        /// Print a single `grid,rho,speedup` line
        #[arg(long)]
        csv: bool,
    },
}

impl Commands {
    fn dungeon(&self) -> &DungeonArgs {
        match self {
            Commands::Hunt { dungeon, .. } | Commands::Speedup { dungeon, .. } => dungeon,
        }
    }
}

// --- Dungeon Setup ---

struct Dungeon {
    gate_size: u32,
    field: Arc<DungeonMap>,
    hunts: Vec<Hunt>,
}

fn build_dungeon(args: &DungeonArgs) -> Result<Dungeon> {
    if args.gate_size <= 0 {
        bail!("Grid size must be greater than 0.");
    }
    let gate_size = u32::try_from(args.gate_size).context("Grid size is too large.")?;
    if !args.density.is_finite() || args.density < 0.0 {
        bail!("Search density must be a non-negative number.");
    }
    if args.seed < 0 {
        bail!("Random seed must be non-negative.");
    }

    let seed = if args.seed == 0 {
        rand::rng().random::<u64>()
    } else {
        args.seed as u64
    };
    info!(seed, "dungeon seed");

    let field = Arc::new(DungeonMap::square(gate_size as f64, seed)?);
    let count = hunt_count(gate_size, args.density);
    let mut rng = ChaCha8Rng::seed_from_u64(seed.wrapping_add(1));
    let hunts = spawn_hunts(&field, count, &mut rng);
    debug!(
        rows = field.rows(),
        columns = field.columns(),
        hunts = hunts.len(),
        "dungeon ready"
    );

    Ok(Dungeon {
        gate_size,
        field,
        hunts,
    })
}

fn reduce_config(args: &DungeonArgs) -> ReduceConfig {
    ReduceConfig::default()
        .with_parallelism(args.cores)
        .with_leaf_multiplier(args.leaf_multiplier)
        .with_cutoff_option(args.cutoff)
}

fn run_parallel(dungeon: &Dungeon, config: &ReduceConfig) -> Result<(PartialResult, ReductionStats)> {
    let reduction = reduce_observed(&dungeon.hunts, config, &TracingObserver)
        .context("parallel search failed")?;
    Ok((reduction.best, reduction.stats))
}

fn run_serial(dungeon: &Dungeon) -> Result<(PartialResult, Duration)> {
    let start = Instant::now();
    let best = sequential_scan(&dungeon.hunts).context("serial search failed")?;
    Ok((best, start.elapsed()))
}

// --- Commands ---

fn run_hunt(args: &DungeonArgs, serial: bool) -> Result<()> {
    // Engine options are checked even when the serial scan ignores them
    let config = reduce_config(args);
    config.validate()?;
    let dungeon = build_dungeon(args)?;

    let (best, elapsed) = if serial {
        run_serial(&dungeon)?
    } else {
        let (best, stats) = run_parallel(&dungeon, &config)?;
        if args.verbose {
            print!("{}", stats.format_summary());
        }
        (best, stats.elapsed_time)
    };

    print_report(&dungeon, best, elapsed);
    Ok(())
}

fn run_speedup(args: &DungeonArgs, csv: bool) -> Result<()> {
    let config = reduce_config(args);
    config.validate()?;
    let dungeon = build_dungeon(args)?;

    let (serial_best, serial_time) = run_serial(&dungeon)?;
    let (parallel_best, stats) = run_parallel(&dungeon, &config)?;

    if serial_best != parallel_best {
        bail!(
            "serial and parallel answers differ: {:?} vs {:?}",
            serial_best,
            parallel_best
        );
    }

    let parallel_secs = stats.elapsed_time.as_secs_f64();
    let speedup = if parallel_secs > 0.0 {
        serial_time.as_secs_f64() / parallel_secs
    } else {
        0.0
    };

    if csv {
        println!("{},{},{:.3}", dungeon.gate_size, args.density, speedup);
    } else {
        println!("\t Number searches: {}", dungeon.hunts.len());
        println!("\t workers: {}, cutoff: {}", stats.workers, stats.cutoff);
        println!("\t serial time: {} ms", serial_time.as_millis());
        println!("\t parallel time: {} ms", stats.elapsed_time.as_millis());
        println!("\t speedup: {:.3}", speedup);
    }
    Ok(())
}

// --- Reporting ---

fn print_report(dungeon: &Dungeon, best: PartialResult, elapsed: Duration) {
    let field = dungeon.field.as_ref();
    let (xmin, xmax, ymin, ymax) = field.extent();

    println!("\t dungeon size: {},", dungeon.gate_size);
    println!("\t rows: {}, columns: {}", field.rows(), field.columns());
    println!("\t x: [{:.6}, {:.6}], y: [{:.6}, {:.6}]", xmin, xmax, ymin, ymax);
    println!("\t Number searches: {}", dungeon.hunts.len());
    println!("\n\t time: {} ms", elapsed.as_millis());

    let evaluated = cells_evaluated(field, &dungeon.hunts);
    let share = evaluated as f64 / field.cells().max(1) as f64 * 100.0;
    println!(
        "\tnumber dungeon grid points evaluated: {}  ({:2.0}%)",
        evaluated, share
    );

    match best.best_index.and_then(|i| dungeon.hunts[i].peak()) {
        Some(peak) => println!(
            "Dungeon Master (mana {}) found at:  x={:.1} y={:.1}\n",
            best.best_value,
            field.x_coord(peak.row),
            field.y_coord(peak.col)
        ),
        None => println!("No hunts were run.\n"),
    }
}

fn init_tracing(verbose: bool) {
    let default_level = if verbose { "debug" } else { "warn" };
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level));
    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .try_init();
}

fn main() {
    let args = Args::parse();
    init_tracing(args.command.dungeon().verbose);

    let result = match &args.command {
        Commands::Hunt { dungeon, serial } => run_hunt(dungeon, *serial),
        Commands::Speedup { dungeon, csv } => run_speedup(dungeon, *csv),
    };

    if let Err(e) = result {
        eprintln!("Error: {:#}", e);
        std::process::exit(1);
    }
}
