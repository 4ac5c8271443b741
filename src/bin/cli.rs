//! rangekv CLI Client
//!
//! Command-line interface for interacting with rangekv.

use clap::{Parser, Subcommand};
use rangekv::{Client, KvPair, Result};

/// rangekv CLI
#[derive(Parser, Debug)]
#[command(name = "rangekv-cli")]
#[command(about = "CLI for the rangekv key-value store")]
struct Args {
    /// Server address
    #[arg(short, long, default_value = "127.0.0.1:7878")]
    server: String,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Ask the server for a greeting
    Hello {
        /// Name to greet
        name: String,
    },

    /// Set a key-value pair
    Add {
        /// The key to set
        key: String,

        /// The value to set
        value: String,
    },

    /// Get a value by key
    Get {
        /// The key to get
        key: String,
    },

    /// Delete a key
    Del {
        /// The key to delete
        key: String,
    },

    /// List pairs with start <= key <= end
    Range {
        start: String,
        end: String,
    },

    /// Delete and print pairs with start <= key <= end
    DelRange {
        start: String,
        end: String,
    },
}

fn main() {
    let args = Args::parse();

    if let Err(e) = run(args) {
        eprintln!("error: {}", e);
        std::process::exit(1);
    }
}

fn run(args: Args) -> Result<()> {
    let mut client = Client::connect(&args.server)?;

    match args.command {
        Commands::Hello { name } => println!("{}", client.helloworld(&name)?),
        Commands::Add { key, value } => {
            client.add(key.as_bytes(), value.as_bytes())?;
            println!("OK");
        }
        Commands::Get { key } => match client.select(key.as_bytes())? {
            Some(value) => println!("{}", String::from_utf8_lossy(&value)),
            None => println!("(not found)"),
        },
        Commands::Del { key } => {
            client.remove(key.as_bytes())?;
            println!("OK");
        }
        Commands::Range { start, end } => {
            print_pairs(&client.select_range(start.as_bytes(), end.as_bytes())?)
        }
        Commands::DelRange { start, end } => {
            let removed = client.remove_range(start.as_bytes(), end.as_bytes())?;
            print_pairs(&removed);
            println!("({} removed)", removed.len());
        }
    }

    Ok(())
}

fn print_pairs(pairs: &[KvPair]) {
    for pair in pairs {
        println!(
            "{} = {}",
            String::from_utf8_lossy(&pair.key),
            String::from_utf8_lossy(&pair.value)
        );
    }
}
