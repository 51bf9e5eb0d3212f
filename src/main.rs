use clap::{Parser, Subcommand};
use logsynth::GenerateOpts;

#[derive(Parser)]
#[command(name = "logsynth")]
#[command(about = "Generate synthetic access-log datasets and ship them to object storage")]
#[command(long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Generate a size-bounded synthetic access-log artifact
    Generate {
        #[command(flatten)]
        opts: GenerateOpts,
    },
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    if let Err(e) = run().await {
        eprintln!("Error: {e:#}");
        std::process::exit(1);
    }
    Ok(())
}

async fn run() -> anyhow::Result<()> {
    // Initialize tracing
    tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .init();

    let cli = Cli::parse();

    match cli.command {
        Commands::Generate { opts } => {
            let as_json = opts.json;
            let report = logsynth::generate::run(opts).await?;

            if as_json {
                println!("{}", serde_json::to_string_pretty(&report)?);
            } else {
                println!("Data generation complete. Result stored at: {}", report.location);
            }
        }
    }

    Ok(())
}
