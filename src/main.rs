use anyhow::Result;
use clap::Parser;
use flow::{Emitter, Options, RiverSource, TagCount};

/// flow - river status as JSON
///
/// Connects to the running river compositor and prints the focused view
/// title, input mode, layout name, and urgent/focused tags as one JSON
/// object per line.
///
/// Examples:
///   flow                # Print the current status once
///   flow --watch        # Print a new line whenever the status changes
///   flow -w --tags 5    # Only report the first five tags
#[derive(Parser, Debug)]
#[command(author, version = env!("FLOW_VERSION"), about)]
struct Cli {
    /// Keep watching for changes
    #[arg(short, long)]
    watch: bool,

    /// Number of tags you want to track (also via FLOW_TAGS)
    #[arg(
        short,
        long,
        env = "FLOW_TAGS",
        default_value_t = TagCount::DEFAULT,
        value_parser = clap::value_parser!(u8).range(TagCount::MIN as i64..=TagCount::MAX as i64)
    )]
    tags: u8,
}

fn main() -> Result<()> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("warn")).init();
    let cli = Cli::parse();

    let options = Options {
        watch: cli.watch,
        tags: TagCount::try_from(cli.tags)?,
    };

    let mut source = RiverSource::connect()?;
    let mut emitter = Emitter::new(std::io::stdout().lock());
    flow::run(&mut source, &mut emitter, options)
}
