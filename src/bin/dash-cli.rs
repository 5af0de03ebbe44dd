use clap::Parser;
use reqwest::header::{HeaderMap, HeaderValue, AUTHORIZATION};
use serde_json::{json, Value};

#[derive(Parser)]
#[command(name = "dash-cli")]
#[command(about = "Fetch organisation dashboard analytics", long_about = None)]
struct Cli {
    #[arg(short, long, default_value = "http://localhost:8080")]
    url: String,

    /// User access token sent as the Authorization header.
    #[arg(short, long, env = "DASH_ACCESS_TOKEN")]
    token: String,

    /// Organisation to report on.
    #[arg(short, long)]
    org_id: String,
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let cli = Cli::parse();
    let client = reqwest::Client::new();

    let mut headers = HeaderMap::new();
    headers.insert(
        AUTHORIZATION,
        HeaderValue::from_str(&format!("Bearer {}", cli.token))?,
    );

    let res = client
        .post(format!("{}/api/analytics/dash", cli.url.trim_end_matches('/')))
        .headers(headers)
        .json(&json!({ "orgId": cli.org_id }))
        .send()
        .await?;

    print_response(res).await
}

async fn print_response(res: reqwest::Response) -> Result<(), Box<dyn std::error::Error>> {
    let status = res.status();
    if let Some(cache) = res.headers().get("cache-control") {
        eprintln!("cache-control: {}", cache.to_str().unwrap_or("<binary>"));
    }

    if !status.is_success() {
        if let Ok(text) = res.text().await {
            eprintln!("Response: {}", text);
        }
        return Err(format!("analytics endpoint returned status {}", status).into());
    }

    let json: Value = res.json().await?;
    println!("{}", serde_json::to_string_pretty(&json)?);
    Ok(())
}
