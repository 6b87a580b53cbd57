use clap::{Parser, Subcommand};

#[derive(Debug, Parser)]
#[command(name = "sigdb-cli")]
#[command(about = "sigdb admin command line interface")]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Debug, Subcommand)]
enum Commands {
    /// Run pending database migrations.
    Migrate,
    /// Upsert the built-in demo channels.
    Seed,
    /// Channel record operations.
    Channels {
        #[command(subcommand)]
        command: ChannelCommands,
    },
}

#[derive(Debug, Subcommand)]
enum ChannelCommands {
    /// Print all channel records.
    List,
    /// Delete a channel by identifier (case-insensitive).
    Remove { channel_id: String },
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();
    tracing_subscriber::fmt::init();

    let cli = Cli::parse();
    let pool = sigdb_db::connect_pool_from_env().await?;

    match cli.command {
        Commands::Migrate => {
            sigdb_db::run_migrations(&pool).await?;
            println!("migrations up to date");
        }
        Commands::Seed => {
            sigdb_db::run_migrations(&pool).await?;
            let count = sigdb_db::seed_channels(&pool, &sigdb_db::demo_channels()).await?;
            println!("seeded {count} demo channels");
        }
        Commands::Channels { command } => match command {
            ChannelCommands::List => {
                let rows = sigdb_db::list_channels(&pool).await?;
                for row in &rows {
                    println!(
                        "{}\t{}\t{} subscribers\t{} signals",
                        row.channel_id,
                        row.verdict,
                        row.subscribers,
                        row.signals.0.len()
                    );
                }
                println!("{} channels total", rows.len());
            }
            ChannelCommands::Remove { channel_id } => {
                match sigdb_db::delete_channel(&pool, &channel_id).await? {
                    Some(row) => println!("removed '{}'", row.channel_id),
                    None => println!("no channel matching '{channel_id}'"),
                }
            }
        },
    }

    Ok(())
}
