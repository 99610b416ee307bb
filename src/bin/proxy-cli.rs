use clap::{Parser, Subcommand};
use serde_json::{json, Value};

#[derive(Parser)]
#[command(name = "proxy-cli")]
#[command(about = "Query a running homes-proxy", long_about = None)]
struct Cli {
    #[arg(short, long, default_value = "http://localhost:5000", env = "HOMES_PROXY_URL")]
    url: String,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Search properties by address text
    Search { address: String },
    /// Resolve an address to a property id
    Id { address: String },
    /// Basic property data
    Overview { id: String },
    /// Property events (valuations, sales)
    Timeline { id: String },
    /// Estimated value history
    EstimateHistory { id: String },
    /// In-depth property details
    Details { id: String },
    /// Resolve an address, then fetch timeline, estimate history and details
    Property { address: String },
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let cli = Cli::parse();
    let client = reqwest::Client::new();
    let base = cli.url.trim_end_matches('/');

    let output = match cli.command {
        Commands::Search { address } => {
            get(&client, &format!("{base}/search"), Some(&address)).await?
        }
        Commands::Id { address } => {
            get(&client, &format!("{base}/property-id"), Some(&address)).await?
        }
        Commands::Overview { id } => get_by_id(&client, base, "overview", &id).await?,
        Commands::Timeline { id } => get_by_id(&client, base, "timeline", &id).await?,
        Commands::EstimateHistory { id } => {
            get_by_id(&client, base, "estimate-history", &id).await?
        }
        Commands::Details { id } => get_by_id(&client, base, "details", &id).await?,
        Commands::Property { address } => property(&client, base, &address).await?,
    };

    if let Some(json) = output {
        println!("{}", serde_json::to_string_pretty(&json)?);
    }
    Ok(())
}

/// Fetch every view of the property at `address` into one document.
async fn property(
    client: &reqwest::Client,
    base: &str,
    address: &str,
) -> Result<Option<Value>, Box<dyn std::error::Error>> {
    let Some(resolved) = get(client, &format!("{base}/property-id"), Some(address)).await? else {
        return Ok(None);
    };
    let id = resolved["id"].as_str().unwrap_or_default().to_string();

    let (timeline, history, details) = tokio::try_join!(
        get_by_id(client, base, "timeline", &id),
        get_by_id(client, base, "estimate-history", &id),
        get_by_id(client, base, "details", &id),
    )?;

    Ok(Some(json!({
        "address": resolved["address"],
        "id": id,
        "timeline": timeline.map(|t| t["timeline"].clone()),
        "estimate_history": history,
        "details": details,
    })))
}

async fn get_by_id(
    client: &reqwest::Client,
    base: &str,
    view: &str,
    id: &str,
) -> Result<Option<Value>, Box<dyn std::error::Error>> {
    let url = format!("{base}/{view}/{}", urlencoding::encode(id));
    get(client, &url, None).await
}

/// GET a proxy endpoint; non-2xx responses are reported on stderr.
async fn get(
    client: &reqwest::Client,
    url: &str,
    address: Option<&str>,
) -> Result<Option<Value>, Box<dyn std::error::Error>> {
    let mut request = client.get(url);
    if let Some(address) = address {
        request = request.query(&[("address", address)]);
    }
    let res = request.send().await?;

    let status = res.status();
    if !status.is_success() {
        eprintln!("Error: {} returned status {}", url, status);
        if let Ok(text) = res.text().await {
            eprintln!("Response: {}", text);
        }
        return Ok(None);
    }

    Ok(Some(res.json().await?))
}
