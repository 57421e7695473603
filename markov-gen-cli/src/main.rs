use std::fs;
use std::path::PathBuf;

use anyhow::{Context, Result, anyhow, bail};
use clap::{ArgAction, Args, Parser, Subcommand};
use env_logger::Env;
use log::info;
use markov_gen_core::{GenerationInput, Generator, StopReason};

mod io;

const DEFAULT_FOLDER: &str = "./data";

#[derive(Parser, Debug)]
#[command(author, version, about = "Character-level Markov chain text generator", long_about = None)]
struct Cli {
	/// Increase verbosity (-v shows bifurcations, -vv more)
	#[arg(short = 'v', long, global = true, action = ArgAction::Count)]
	verbose: u8,

	/// Decrease verbosity (-q, -qq)
	#[arg(short = 'q', long, global = true, action = ArgAction::Count)]
	quiet: u8,

	#[command(subcommand)]
	command: Commands,
}

#[derive(Subcommand, Debug)]
enum Commands {
	/// List the sample texts available in a folder
	List {
		/// Folder holding `.txt` sample texts
		#[arg(default_value = DEFAULT_FOLDER)]
		folder: PathBuf,
	},
	/// Build a chain from a sample text and generate from it
	Generate(GenerateArgs),
}

#[derive(Args, Debug)]
struct GenerateArgs {
	/// Sample text to learn from (otherwise chosen with --pick)
	corpus: Option<PathBuf>,

	/// Folder searched when no corpus path is given
	#[arg(long, value_name = "DIR", default_value = DEFAULT_FOLDER)]
	folder: PathBuf,

	/// Index of the sample text in `list` output
	#[arg(long, value_name = "N")]
	pick: Option<usize>,

	/// JSON file with generation parameters; flags override its values
	#[arg(long, value_name = "PATH")]
	config: Option<PathBuf>,

	/// Order of the chain (usually 5 to 8)
	#[arg(short, long)]
	k: Option<usize>,

	/// Number of characters to generate
	#[arg(short, long)]
	length: Option<usize>,

	/// Seed for reproducible output
	#[arg(long)]
	seed: Option<u64>,

	/// Initial number of buckets of the index
	#[arg(long, value_name = "BUCKETS")]
	capacity: Option<usize>,

	/// Load factor at which the index grows
	#[arg(long, value_name = "RATIO")]
	load_factor: Option<f32>,

	/// Print index statistics as JSON
	#[arg(long)]
	stats: bool,

	/// Print every branch point met during generation
	#[arg(long)]
	show_bifurcations: bool,

	/// Print the whole index, bucket by bucket
	#[arg(long)]
	dump_index: bool,
}

fn main() -> Result<()> {
	let cli = Cli::parse();
	init_logging(cli.verbose, cli.quiet);

	match cli.command {
		Commands::List { folder } => run_list(folder),
		Commands::Generate(args) => run_generate(args),
	}
}

fn init_logging(verbose: u8, quiet: u8) {
	use log::LevelFilter;

	let level = if quiet > 0 {
		match quiet {
			1 => LevelFilter::Error,
			_ => LevelFilter::Off,
		}
	} else {
		match verbose {
			0 => LevelFilter::Warn,
			1 => LevelFilter::Info,
			2 => LevelFilter::Debug,
			_ => LevelFilter::Trace,
		}
	};

	let mut builder = env_logger::Builder::from_env(Env::default().default_filter_or("warn"));
	builder.format_timestamp_millis();
	builder.filter_level(level);
	let _ = builder.try_init();
}

fn run_list(folder: PathBuf) -> Result<()> {
	let folder = io::normalize_folder(&folder);
	let files = io::list_files(&folder, "txt")
		.with_context(|| format!("unable to list sample texts in {}", folder.display()))?;

	for (n, file) in files.iter().enumerate() {
		println!("[{}] {}", n, file);
	}
	Ok(())
}

fn resolve_corpus_path(args: &GenerateArgs) -> Result<PathBuf> {
	if let Some(path) = &args.corpus {
		return Ok(path.clone());
	}

	let folder = io::normalize_folder(&args.folder);
	let pick = args
		.pick
		.ok_or_else(|| anyhow!("give a corpus path, or --pick an entry of `list {}`", folder.display()))?;
	let files = io::list_files(&folder, "txt")
		.with_context(|| format!("unable to list sample texts in {}", folder.display()))?;

	match files.get(pick) {
		Some(file) => Ok(folder.join(file)),
		None => bail!("no sample text #{} in {} ({} available)", pick, folder.display(), files.len()),
	}
}

fn load_input(args: &GenerateArgs) -> Result<GenerationInput> {
	let mut input = match &args.config {
		Some(path) => {
			let raw = fs::read_to_string(path).with_context(|| format!("unable to read {}", path.display()))?;
			let input: GenerationInput =
				serde_json::from_str(&raw).with_context(|| format!("invalid config {}", path.display()))?;
			input.validate()?;
			input
		}
		None => GenerationInput::default(),
	};

	if let Some(k) = args.k {
		input.set_k(k)?;
	}
	if let Some(length) = args.length {
		input.length = length;
	}
	if let Some(capacity) = args.capacity {
		input.set_initial_capacity(capacity)?;
	}
	if let Some(load_factor) = args.load_factor {
		input.set_load_factor(load_factor)?;
	}
	if args.seed.is_some() {
		input.seed = args.seed;
	}
	Ok(input)
}

fn run_generate(args: GenerateArgs) -> Result<()> {
	let input = load_input(&args)?;
	let path = resolve_corpus_path(&args)?;
	let corpus = io::read_corpus(&path).with_context(|| format!("unable to read {}", path.display()))?;
	info!("Read {} characters from {}", corpus.chars().count(), path.display());

	let generator = Generator::from_corpus(&corpus, &input)
		.with_context(|| format!("unable to build a chain from {}", path.display()))?;

	if args.dump_index {
		println!("{}", generator.index());
	}
	if args.stats {
		println!("{}", serde_json::to_string_pretty(&generator.stats())?);
	}

	let generation = generator.predict(&input)?;

	if args.show_bifurcations {
		for point in &generation.bifurcations {
			let choices: Vec<String> = point.choices.iter().map(|(c, n)| format!("{:?} x{}", c, n)).collect();
			println!("  Bifurcation: '{}'; [{}] -> {:?}", point.key, choices.join(", "), point.chosen);
		}
	}

	println!("{}", generation.text);
	if generation.stop_reason == StopReason::ChainBroken {
		info!(
			"Chain broke after {} of {} characters",
			generation.text.chars().count(),
			input.length
		);
	}
	Ok(())
}
