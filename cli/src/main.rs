use std::io::Write;
use std::path::PathBuf;

use clap::{Args, Parser, Subcommand};
use reqwest::header::{AUTHORIZATION, HeaderMap, HeaderValue};
use serde_json::Value;
use tokio::io::{AsyncBufReadExt, BufReader};
use uuid::Uuid;
use wire::{ChatRequest, DeltaSink, PincodeError, StreamError, Transcript, TranscriptError, TransportError};

#[derive(Debug, thiserror::Error)]
enum CliError {
    #[error("missing session token; pass --session-token or set HEALTHWATCH_SESSION_TOKEN")]
    MissingSessionToken,
    #[error("http request failed: {0}")]
    Http(#[from] reqwest::Error),
    #[error("invalid header value: {0}")]
    InvalidHeader(#[from] reqwest::header::InvalidHeaderValue),
    #[error("server returned HTTP {status}: {message}")]
    ServerError { status: u16, message: String },
    #[error("invalid JSON payload: {0}")]
    InvalidJson(#[from] serde_json::Error),
    #[error("io error: {0}")]
    Io(#[from] std::io::Error),
    #[error("{0}")]
    Pincode(#[from] PincodeError),
    #[error("{0}")]
    Transport(#[from] TransportError),
    #[error(transparent)]
    Stream(#[from] StreamError),
    #[error(transparent)]
    Transcript(#[from] TranscriptError),
    #[error("no data rows found in {0}")]
    EmptyUpload(PathBuf),
}

#[derive(Parser, Debug)]
#[command(name = "healthwatch", about = "HealthWatch outbreak alerts and health chat CLI")]
struct Cli {
    #[arg(long, env = "HEALTHWATCH_BASE_URL", default_value = "http://127.0.0.1:3000")]
    base_url: String,

    #[arg(long, env = "HEALTHWATCH_SESSION_TOKEN")]
    session_token: Option<String>,

    #[command(subcommand)]
    command: Command,
}

#[derive(Debug, Clone)]
struct CliContext {
    base_url: String,
    session_token: Option<String>,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Check the server is up.
    Ping,
    /// Show the signed-in user.
    Me,
    /// Outbreak alerts for a 6-digit pincode.
    Alerts {
        pincode: String,
        #[arg(long)]
        limit: Option<i64>,
    },
    /// Latest alerts across all areas.
    Recent {
        #[arg(long, default_value_t = 6)]
        limit: i64,
    },
    /// Chat with the health assistant. Reads one message per line from stdin.
    Chat {
        #[arg(long, default_value = "")]
        pincode: String,
    },
    Admin(AdminCommand),
}

#[derive(Args, Debug)]
struct AdminCommand {
    #[command(subcommand)]
    command: AdminSubcommand,
}

#[derive(Subcommand, Debug)]
enum AdminSubcommand {
    List,
    Delete { id: Uuid },
    /// Upload a `pincode,disease_name,cases,date,advice` CSV file.
    Upload { file: PathBuf },
}

#[tokio::main]
async fn main() -> Result<(), CliError> {
    let cli = Cli::parse();
    let ctx = CliContext { base_url: cli.base_url, session_token: cli.session_token };

    match cli.command {
        Command::Ping => run_ping(&ctx).await,
        Command::Me => {
            let json = api_request(&ctx, reqwest::Method::GET, "/api/auth/me", None).await?;
            print_json(&json)
        }
        Command::Alerts { pincode, limit } => run_alerts(&ctx, &pincode, limit).await,
        Command::Recent { limit } => {
            let path = format!("/api/outbreaks/recent?limit={limit}");
            let json = public_request(&ctx, &path).await?;
            print_json(&json)
        }
        Command::Chat { pincode } => run_chat(&ctx, pincode).await,
        Command::Admin(admin) => run_admin(&ctx, admin).await,
    }
}

async fn run_ping(cli: &CliContext) -> Result<(), CliError> {
    let client = reqwest::Client::new();
    let response = client.get(api_url(&cli.base_url, "/healthz")).send().await?;
    let status = response.status();
    if !status.is_success() {
        return Err(CliError::ServerError { status: status.as_u16(), message: "health check failed".to_owned() });
    }
    println!("ok");
    Ok(())
}

async fn run_alerts(cli: &CliContext, raw_pincode: &str, limit: Option<i64>) -> Result<(), CliError> {
    let pincode = wire::validate_pincode(raw_pincode)?;
    let mut path = format!("/api/outbreaks?pincode={pincode}");
    if let Some(limit) = limit {
        path.push_str(&format!("&limit={limit}"));
    }
    let json = public_request(cli, &path).await?;
    print_json(&json)
}

async fn run_admin(cli: &CliContext, admin: AdminCommand) -> Result<(), CliError> {
    match admin.command {
        AdminSubcommand::List => {
            let json = api_request(cli, reqwest::Method::GET, "/api/admin/outbreaks", None).await?;
            print_json(&json)
        }
        AdminSubcommand::Delete { id } => {
            let path = format!("/api/admin/outbreaks/{id}");
            api_request(cli, reqwest::Method::DELETE, &path, None).await?;
            println!("deleted {id}");
            Ok(())
        }
        AdminSubcommand::Upload { file } => {
            let text = std::fs::read_to_string(&file)?;
            let rows = wire::parse_csv(&text);
            if rows.is_empty() {
                return Err(CliError::EmptyUpload(file));
            }
            let body = serde_json::to_value(wire::UploadRequest { data: &rows })?;
            let json = api_request(cli, reqwest::Method::POST, "/api/admin/outbreaks/upload", Some(body)).await?;
            let count = json.get("count").and_then(Value::as_u64).unwrap_or(0);
            println!("uploaded {count} records");
            Ok(())
        }
    }
}

// =============================================================================
// CHAT
// =============================================================================

/// Prints each delta as it arrives and records it in the transcript.
struct ConsoleSink<'a> {
    transcript: &'a mut Transcript,
}

impl DeltaSink for ConsoleSink<'_> {
    fn on_delta(&mut self, delta: &str) {
        print!("{delta}");
        let _ = std::io::stdout().flush();
        self.transcript.push_delta(delta);
    }

    fn on_done(&mut self) {
        println!();
        self.transcript.finish_turn();
    }
}

async fn run_chat(cli: &CliContext, pincode: String) -> Result<(), CliError> {
    let client = authed_client(cli)?;
    let url = api_url(&cli.base_url, "/api/chat");
    let mut transcript = Transcript::new();
    let mut lines = BufReader::new(tokio::io::stdin()).lines();

    eprintln!("Ask a health question (Ctrl-D to quit).");
    while let Some(line) = lines.next_line().await? {
        let messages = match transcript.begin_turn(&line) {
            Ok(messages) => messages,
            Err(TranscriptError::EmptyInput) => continue,
            Err(e) => return Err(e.into()),
        };

        let request = ChatRequest { messages, pincode: pincode.clone() };
        if let Err(e) = stream_turn(&client, &url, &request, &mut transcript).await {
            transcript.abort_turn();
            eprintln!("\nerror: {e}");
        }
    }
    Ok(())
}

async fn stream_turn(
    client: &reqwest::Client,
    url: &str,
    request: &ChatRequest,
    transcript: &mut Transcript,
) -> Result<(), CliError> {
    let response = client.post(url).json(request).send().await?;
    if let Some(e) = TransportError::from_status(response.status().as_u16()) {
        return Err(e.into());
    }

    let mut sink = ConsoleSink { transcript };
    wire::read_stream(response.bytes_stream(), &mut sink).await?;
    Ok(())
}

// =============================================================================
// HTTP
// =============================================================================

fn api_url(base_url: &str, path: &str) -> String {
    format!("{}{}", base_url.trim_end_matches('/'), path)
}

fn authed_client(cli: &CliContext) -> Result<reqwest::Client, CliError> {
    let session_token = cli
        .session_token
        .as_deref()
        .ok_or(CliError::MissingSessionToken)?;

    let mut headers = HeaderMap::new();
    headers.insert(AUTHORIZATION, HeaderValue::from_str(&format!("Bearer {session_token}"))?);

    Ok(reqwest::Client::builder().default_headers(headers).build()?)
}

async fn public_request(cli: &CliContext, path: &str) -> Result<Value, CliError> {
    let response = reqwest::Client::new().get(api_url(&cli.base_url, path)).send().await?;
    read_json(response).await
}

async fn api_request(
    cli: &CliContext,
    method: reqwest::Method,
    path: &str,
    body: Option<Value>,
) -> Result<Value, CliError> {
    let client = authed_client(cli)?;
    let request = client.request(method, api_url(&cli.base_url, path));
    let request = if let Some(json) = body { request.json(&json) } else { request };

    read_json(request.send().await?).await
}

async fn read_json(response: reqwest::Response) -> Result<Value, CliError> {
    let status = response.status();
    let value = response
        .json::<Value>()
        .await
        .unwrap_or_else(|_| Value::Null);

    if !status.is_success() {
        return Err(CliError::ServerError { status: status.as_u16(), message: error_message(&value) });
    }

    Ok(value)
}

/// The `error` field of an error body, or the raw JSON.
fn error_message(value: &Value) -> String {
    value
        .get("error")
        .and_then(Value::as_str)
        .map_or_else(|| value.to_string(), str::to_owned)
}

fn print_json(value: &Value) -> Result<(), CliError> {
    let rendered = serde_json::to_string_pretty(value)?;
    println!("{rendered}");
    Ok(())
}

#[cfg(test)]
#[path = "main_test.rs"]
mod tests;
