//! Replicated key-value store REPL.
//!
//! Boots an in-process cluster, optionally starts the failure
//! scheduler, and serves the interactive client grammar.

use clap::Parser;
use rand::SeedableRng;
use rand::rngs::StdRng;
use rustyline::DefaultEditor;
use rustyline::error::ReadlineError;
use tracing_subscriber::EnvFilter;

use quorumkv_cluster::scheduler::{self, SchedulerConfig};
use quorumkv_cluster::{Command, LocalCluster, ReplContext};
use quorumkv_paxos::NodeConfig;

/// Paxos-replicated key-value store with an interactive client.
#[derive(Parser, Debug)]
#[command(name = "quorumkv")]
#[command(about = "Interactive client for a Paxos-replicated key-value store")]
struct Args {
    /// Number of nodes in the cluster
    #[arg(short, long, default_value_t = 5)]
    nodes: usize,

    /// Seed for the failure scheduler and the per-command node picker
    #[arg(long)]
    seed: Option<u64>,

    /// Disable the random failure scheduler
    #[arg(long)]
    no_failures: bool,

    /// Write key0..key9 before the prompt appears
    #[arg(long)]
    prepopulate: bool,
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")),
        )
        .init();

    let args = Args::parse();

    let cluster = LocalCluster::start(NodeConfig::new(args.nodes))
        .map_err(|report| report.to_string())?;

    let scheduler_handle = if args.no_failures {
        None
    } else {
        Some(scheduler::spawn(
            cluster.nodes().to_vec(),
            SchedulerConfig {
                seed: args.seed,
                ..SchedulerConfig::default()
            },
        ))
    };

    let rng = match args.seed {
        Some(seed) => StdRng::seed_from_u64(seed),
        None => StdRng::from_os_rng(),
    };
    let mut context = ReplContext::new(cluster, rng);

    if args.prepopulate {
        context.prepopulate().await;
    }

    println!("quorumkv — {} node cluster", args.nodes);
    println!("Commands: PUT <key> <value>, GET <key>, DELETE <key>, EXIT\n");

    let mut rl = DefaultEditor::new()?;
    let (tx, mut rx) = tokio::sync::mpsc::channel::<String>(1);
    let (resp_tx, mut resp_rx) = tokio::sync::mpsc::channel::<Result<String, String>>(1);

    tokio::task::spawn_blocking(move || {
        loop {
            match rl.readline("kv> ") {
                Ok(line) => {
                    let line = line.trim();
                    if line.is_empty() {
                        continue;
                    }

                    if line.eq_ignore_ascii_case("exit") {
                        break;
                    }

                    let _ = rl.add_history_entry(line);
                    if tx.blocking_send(line.to_string()).is_err() {
                        break;
                    }

                    match resp_rx.blocking_recv() {
                        Some(Ok(output)) if !output.is_empty() => println!("{output}"),
                        Some(Err(e)) => eprintln!("Error: {e}"),
                        _ => {}
                    }
                }
                Err(ReadlineError::Interrupted) => {
                    println!("Interrupted. Use EXIT to quit.");
                }
                Err(ReadlineError::Eof) => {
                    break;
                }
                Err(e) => {
                    eprintln!("Readline error: {e}");
                    break;
                }
            }
        }
    });

    while let Some(line) = rx.recv().await {
        let result = match Command::parse(&line) {
            Ok(command) => context.execute(command).await,
            Err(message) => Err(message),
        };
        let _ = resp_tx.send(result).await;
    }

    if let Some(handle) = scheduler_handle {
        handle.abort();
    }

    Ok(())
}
