mod upload;

use std::path::{Path, PathBuf};

use clap::{Parser, ValueEnum};
use tracing_subscriber::EnvFilter;
use yt_auth::{
    AuthError, Authenticator, CallbackAcquirer, ClientSecrets, CodeAcquirer, CredentialStore,
    PromptAcquirer,
};

use crate::upload::VideoMetadata;

/// YouTube Video Uploader - Authorizes against the YouTube Data API and uploads a video
#[derive(Parser, Debug)]
#[command(version, about, long_about = None)]
struct Args {
    /// Path to the client secrets JSON file; when absent, the secrets are
    /// assembled from YOUTUBE_CLIENT_ID/YOUTUBE_CLIENT_SECRET
    #[arg(long, default_value = "client_secret.json")]
    client_secrets: PathBuf,

    /// How to obtain the authorization code on first run
    #[arg(long, value_enum, default_value_t = AuthFlow::Prompt)]
    auth_flow: AuthFlow,

    /// Loopback port for the callback flow (must match a registered redirect URI)
    #[arg(long, default_value_t = 8090)]
    callback_port: u16,

    /// Credential cache name under ~/.credentials/
    #[arg(long, default_value = "yt-uploader")]
    cache_name: String,

    /// Path to the video file to upload
    #[arg(long)]
    file: PathBuf,

    /// Video title
    #[arg(long)]
    title: String,

    /// Video description
    #[arg(long, default_value = "")]
    description: String,

    /// Comma-separated video tags
    #[arg(long, default_value = "")]
    tags: String,

    /// Numeric video category ("22" is People & Blogs)
    #[arg(long, default_value = "22")]
    category_id: String,

    /// Privacy status: public, unlisted, or private
    #[arg(long, default_value = "unlisted")]
    privacy: String,
}

#[derive(Debug, Clone, Copy, ValueEnum)]
enum AuthFlow {
    /// Print the authorization URL and read the pasted code from stdin
    Prompt,
    /// Open a browser and capture the code with a local callback listener
    Callback,
}

/// Load client secrets from the configured file, falling back to the
/// environment when the file does not exist.
fn load_secrets(path: &Path) -> Result<ClientSecrets, AuthError> {
    if path.exists() {
        ClientSecrets::from_file(path)
    } else {
        tracing::debug!(
            path = %path.display(),
            "client secrets file not found, reading environment"
        );
        ClientSecrets::from_env()
    }
}

fn parse_tags(tags: &str) -> Vec<String> {
    tags.split(',')
        .map(str::trim)
        .filter(|t| !t.is_empty())
        .map(String::from)
        .collect()
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // A .env file is optional; variables already in the environment win.
    dotenvy::dotenv().ok();
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .init();

    let args = Args::parse();

    let secrets = load_secrets(&args.client_secrets)?;
    let config = secrets.into_config("https://www.googleapis.com/auth/youtube.upload");
    let store = CredentialStore::for_app(&args.cache_name)?;
    let authenticator = Authenticator::new(config, store);

    let acquirer: Box<dyn CodeAcquirer> = match args.auth_flow {
        AuthFlow::Prompt => Box::new(PromptAcquirer),
        AuthFlow::Callback => Box::new(CallbackAcquirer::new(args.callback_port)),
    };
    let client = authenticator.authorize(acquirer.as_ref()).await?;

    let api_base = std::env::var("YOUTUBE_API_BASE")
        .unwrap_or_else(|_| "https://www.googleapis.com".to_string());

    let metadata = VideoMetadata {
        title: args.title,
        description: args.description,
        tags: parse_tags(&args.tags),
        category_id: args.category_id,
        privacy_status: args.privacy,
    };

    let video_id = upload::upload_video(&client, &api_base, &args.file, &metadata).await?;
    println!("Upload successful! Video ID: {video_id}");

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parse_tags_splits_and_trims() {
        assert_eq!(
            parse_tags("rust, demo ,upload"),
            vec!["rust", "demo", "upload"]
        );
    }

    #[test]
    fn parse_tags_of_empty_string_is_empty() {
        assert!(parse_tags("").is_empty());
        assert!(parse_tags(" , ,").is_empty());
    }
}
