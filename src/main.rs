use clap::Parser;
use graph_reorder::{graph_reader, reorder, Config};
use std::path::PathBuf;
use std::process;

/// Compute a locality-improving vertex order for a directed graph
#[derive(Debug, Parser)]
#[command(version)]
struct Args {
    /// Adjacency list: one line per vertex, `<label> <neighbor>...`
    graph: PathBuf,

    /// Number of recently placed vertices that influence the next choice
    #[arg(short, long, default_value_t = graph_reorder::gorder::DEFAULT_WINDOW)]
    window: usize,

    /// Print the new position of every vertex (in input order) instead of the
    /// vertices in their new order
    #[arg(long)]
    inverse: bool,
}

fn main() {
    pretty_env_logger::init();

    let args = Args::parse();
    if let Err(e) = run(&args) {
        eprintln!("error: {}", e);
        process::exit(1);
    }
}

fn run(args: &Args) -> graph_reorder::Result<()> {
    let (graph, labels) = graph_reader::read_from_file(&args.graph)?;
    let perm = reorder(&graph, &Config::with_window(args.window))?;

    if args.inverse {
        for (label, &old) in &labels {
            println!("{} {}", label, perm.new_of(old));
        }
    } else {
        for &old in perm.new_to_old() {
            // ids were handed out in insertion order
            if let Some((label, _)) = labels.get_index(old.0 as usize) {
                println!("{}", label);
            }
        }
    }

    Ok(())
}
