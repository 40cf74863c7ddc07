use clap::{Parser, Subcommand};
use serde::{Deserialize, Serialize};
use std::process::ExitCode;

#[derive(Parser)]
#[command(name = "authdemoctl", about = "Exercise a running authdemo service", version)]
struct Cli {
    /// authdemo endpoint
    #[arg(short, long, default_value = "http://127.0.0.1:8000", env = "AUTHDEMO_API")]
    api: String,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Call /test with a static API key header
    ApiKey {
        #[arg(short, long, default_value = "api_secret_key")]
        key: String,

        /// Header carrying the key
        #[arg(long, default_value = "Authorization")]
        header: String,

        #[arg(short, long, default_value = "Demo User")]
        name: String,
    },

    /// Get a token from /token (query params), then call /test with it
    Bearer {
        #[arg(short, long, default_value = "one")]
        username: String,

        #[arg(short, long, default_value = "secret_one")]
        password: String,

        #[arg(short, long, default_value = "Demo User")]
        name: String,
    },

    /// Run the OAuth2 password flow against /token; optionally call /test
    Oauth2 {
        #[arg(short, long, default_value = "one")]
        username: String,

        #[arg(short, long, default_value = "secret_one")]
        password: String,

        /// Also call /test with the issued token
        #[arg(short, long)]
        name: Option<String>,
    },

    /// Fetch the OpenAPI document served by the docs demo
    Docs,
}

#[derive(Debug, Deserialize, Serialize)]
struct TokenResponse {
    access_token: String,
    token_type: String,
}

#[derive(Debug, Deserialize)]
struct ErrorResponse {
    detail: String,
}

struct Client {
    base_url: String,
    http: reqwest::Client,
}

impl Client {
    fn new(base_url: String) -> Self {
        Self {
            base_url: base_url.trim_end_matches('/').to_string(),
            http: reqwest::Client::new(),
        }
    }

    fn request(&self, method: reqwest::Method, path: &str) -> reqwest::RequestBuilder {
        let url = format!("{}{}", self.base_url, path);
        self.http
            .request(method, &url)
            .header("accept", "application/json")
    }

    async fn send<T: for<'de> Deserialize<'de>>(req: reqwest::RequestBuilder) -> Result<T, String> {
        let resp = req
            .send()
            .await
            .map_err(|e| format!("request failed: {}", e))?;

        if !resp.status().is_success() {
            let status = resp.status();
            let err: ErrorResponse = resp.json().await.unwrap_or(ErrorResponse {
                detail: "unknown error".to_string(),
            });
            return Err(format!("{}: {}", status, err.detail));
        }

        resp.json().await.map_err(|e| format!("parse error: {}", e))
    }

    async fn greet(&self, name: &str, auth: (&str, String)) -> Result<String, String> {
        let req = self
            .request(reqwest::Method::GET, "/test")
            .query(&[("name", name)])
            .header(auth.0, auth.1);
        Self::send(req).await
    }

    async fn bearer_token(&self, username: &str, password: &str) -> Result<TokenResponse, String> {
        let req = self
            .request(reqwest::Method::POST, "/token")
            .query(&[("username", username), ("password", password)]);
        Self::send(req).await
    }

    async fn oauth2_token(&self, username: &str, password: &str) -> Result<TokenResponse, String> {
        let form = [
            ("grant_type", "password"),
            ("client_id", ""),
            ("client_secret", ""),
            ("username", username),
            ("password", password),
        ];
        let req = self.request(reqwest::Method::POST, "/token").form(&form);
        Self::send(req).await
    }

    async fn openapi(&self) -> Result<serde_json::Value, String> {
        Self::send(self.request(reqwest::Method::GET, "/openapi.json")).await
    }
}

fn bearer(token: &TokenResponse) -> (&'static str, String) {
    ("Authorization", format!("Bearer {}", token.access_token))
}

#[tokio::main]
async fn main() -> ExitCode {
    let cli = Cli::parse();
    let client = Client::new(cli.api);

    let result = match cli.command {
        Commands::ApiKey { key, header, name } => {
            cmd_api_key(&client, &header, key, &name).await
        }
        Commands::Bearer {
            username,
            password,
            name,
        } => cmd_bearer(&client, &username, &password, &name).await,
        Commands::Oauth2 {
            username,
            password,
            name,
        } => cmd_oauth2(&client, &username, &password, name.as_deref()).await,
        Commands::Docs => cmd_docs(&client).await,
    };

    match result {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!("error: {}", e);
            ExitCode::FAILURE
        }
    }
}

async fn cmd_api_key(client: &Client, header: &str, key: String, name: &str) -> Result<(), String> {
    let greeting = client.greet(name, (header, key)).await?;
    println!("{}", greeting);
    Ok(())
}

async fn cmd_bearer(
    client: &Client,
    username: &str,
    password: &str,
    name: &str,
) -> Result<(), String> {
    let token = client.bearer_token(username, password).await?;
    let greeting = client.greet(name, bearer(&token)).await?;
    println!("{}", greeting);
    Ok(())
}

async fn cmd_oauth2(
    client: &Client,
    username: &str,
    password: &str,
    name: Option<&str>,
) -> Result<(), String> {
    let token = client.oauth2_token(username, password).await?;
    let json = serde_json::to_string_pretty(&token).map_err(|e| e.to_string())?;
    println!("{}", json);

    if let Some(name) = name {
        let greeting = client.greet(name, bearer(&token)).await?;
        println!("{}", greeting);
    }
    Ok(())
}

async fn cmd_docs(client: &Client) -> Result<(), String> {
    let doc = client.openapi().await?;
    let info = &doc["info"];
    println!(
        "{} {}",
        info["title"].as_str().unwrap_or("?"),
        info["version"].as_str().unwrap_or("?")
    );
    if let Some(logo) = info["x-logo"]["url"].as_str() {
        println!("logo: {}", logo);
    }
    if let Some(paths) = doc["paths"].as_object() {
        for path in paths.keys() {
            println!("  {}", path);
        }
    }
    Ok(())
}
