use clap::{Parser, Subcommand};
use reqwest::header::{HeaderMap, HeaderValue};
use serde_json::Value;

#[derive(Parser)]
#[command(name = "persons-cli")]
#[command(about = "Command-line client for the persons gateway", long_about = None)]
struct Cli {
    #[arg(short, long, default_value = "http://localhost:3000")]
    url: String,

    /// Correlation id sent as the `requestId` header.
    #[arg(short, long)]
    request_id: Option<String>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Fetch a person
    Get { person_id: String },
    /// Fetch a person's children
    Children { person_id: String },
    /// Delete a person
    Delete { person_id: String },
    /// Check gateway health
    Status,
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let cli = Cli::parse();
    let client = reqwest::Client::new();
    let base = cli.url.trim_end_matches('/');

    let mut headers = HeaderMap::new();
    if let Some(request_id) = &cli.request_id {
        headers.insert("requestid", HeaderValue::from_str(request_id)?);
    }

    let request = match &cli.command {
        Commands::Get { person_id } => client.get(format!("{}/v1/persons/{}", base, person_id)),
        Commands::Children { person_id } => {
            client.get(format!("{}/v1/persons/{}/children", base, person_id))
        }
        Commands::Delete { person_id } => {
            client.delete(format!("{}/v1/persons/{}", base, person_id))
        }
        Commands::Status => client.get(format!("{}/status", base)),
    };

    let res = request.headers(headers).send().await?;
    print_response(res).await
}

async fn print_response(res: reqwest::Response) -> Result<(), Box<dyn std::error::Error>> {
    let status = res.status();
    let text = res.text().await?;

    if !status.is_success() {
        eprintln!("Error: gateway returned status {}", status);
    }
    if text.is_empty() {
        println!("{}", status);
        return Ok(());
    }

    match serde_json::from_str::<Value>(&text) {
        Ok(json) => println!("{}", serde_json::to_string_pretty(&json)?),
        Err(_) => println!("{}", text),
    }
    Ok(())
}
