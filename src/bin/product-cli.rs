use clap::{Parser, Subcommand};
use reqwest::{Method, RequestBuilder};
use serde_json::Value;

#[derive(Parser)]
#[command(name = "product-cli")]
#[command(about = "Command-line client for the product service", long_about = None)]
struct Cli {
    #[arg(short, long, default_value = "http://localhost:3001")]
    url: String,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Check the service is up
    Ping,
    /// List products, optionally below a price
    List {
        #[arg(long)]
        price_limit: Option<String>,
    },
    /// Show one product
    Get { id: String },
    /// Delete one product
    Delete { id: String },
    /// Merge a JSON object into one product
    Patch { id: String, body: String },
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let cli = Cli::parse();
    let client = reqwest::Client::new();
    let base = cli.url.trim_end_matches('/');

    let request = match cli.command {
        Commands::Ping => client.get(format!("{base}/ping")),
        Commands::List { price_limit } => {
            let req = client.get(format!("{base}/products"));
            match price_limit {
                Some(limit) => req.query(&[("priceLimit", limit)]),
                None => req,
            }
        }
        Commands::Get { id } => product(&client, Method::GET, base, &id),
        Commands::Delete { id } => product(&client, Method::DELETE, base, &id),
        Commands::Patch { id, body } => {
            let body: Value = serde_json::from_str(&body)?;
            product(&client, Method::PATCH, base, &id).json(&body)
        }
    };

    print_response(request.send().await?).await
}

fn product(client: &reqwest::Client, method: Method, base: &str, id: &str) -> RequestBuilder {
    client.request(method, format!("{base}/products/{id}"))
}

async fn print_response(res: reqwest::Response) -> Result<(), Box<dyn std::error::Error>> {
    let status = res.status();
    let text = res.text().await?;

    if !status.is_success() {
        eprintln!("Error: service returned status {}", status);
    }
    match serde_json::from_str::<Value>(&text) {
        Ok(json) => println!("{}", serde_json::to_string_pretty(&json)?),
        Err(_) => println!("{}", text),
    }
    Ok(())
}
