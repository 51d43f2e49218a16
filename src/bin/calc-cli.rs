use clap::{Parser, Subcommand};
use serde_json::{json, Value};

use calc_gateway::config::BackendConfig;
use calc_gateway::BackendConnection;

#[derive(Parser)]
#[command(name = "calc-cli")]
#[command(about = "Call the calculator through the web front end or directly over gRPC", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// POST to /api/add on a running calc-web
    Add {
        #[arg(allow_hyphen_values = true)]
        a: i64,
        #[arg(allow_hyphen_values = true)]
        b: i64,
        #[arg(short, long, default_value = "http://localhost:8000")]
        url: String,
    },
    /// Call Add directly on a calc-server
    Rpc {
        #[arg(allow_hyphen_values = true)]
        a: i64,
        #[arg(allow_hyphen_values = true)]
        b: i64,
        #[arg(short, long, default_value = "localhost:50051", env = "CALC_BACKEND_TARGET")]
        target: String,
    },
}

#[tokio::main(flavor = "current_thread")]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let cli = Cli::parse();

    match cli.command {
        Commands::Add { a, b, url } => {
            let client = reqwest::Client::new();
            let res = client
                .post(format!("{}/api/add", url.trim_end_matches('/')))
                .json(&json!({ "a": a, "b": b }))
                .send()
                .await?;
            print_response(res).await?;
        }
        Commands::Rpc { a, b, target } => {
            let config = BackendConfig {
                target,
                ..Default::default()
            };
            let connection = BackendConnection::connect(&config).await?;
            let result = connection.add(a, b, None).await;
            connection.close();
            println!("{}", serde_json::to_string_pretty(&json!({ "sum": result? }))?);
        }
    }

    Ok(())
}

async fn print_response(res: reqwest::Response) -> Result<(), Box<dyn std::error::Error>> {
    let status = res.status();
    let text = res.text().await?;
    let body = serde_json::from_str::<Value>(&text)
        .map(|json| serde_json::to_string_pretty(&json).unwrap_or_else(|_| text.clone()))
        .unwrap_or_else(|_| text.clone());

    if !status.is_success() {
        eprintln!("Error: calc-web returned status {}", status);
        eprintln!("Response: {}", body);
        return Err(format!("request failed with status {}", status).into());
    }

    println!("{}", body);
    Ok(())
}
