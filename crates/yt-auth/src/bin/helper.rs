use std::path::PathBuf;

use clap::{Parser, ValueEnum};
use yt_auth::{
    Authenticator, CallbackAcquirer, ClientSecrets, CodeAcquirer, CredentialStore, PromptAcquirer,
};

/// OAuth 2.0 helper tool: authorize once and cache the credential
#[derive(Parser, Debug)]
#[command(version, about, long_about = None)]
struct Args {
    /// Path to the client secrets JSON file
    #[arg(long, default_value = "client_secret.json")]
    client_secrets: PathBuf,

    /// Cache name; the token is stored as ~/.credentials/<name>.json
    #[arg(long, default_value = "yt-uploader")]
    cache_name: String,

    /// OAuth scope to request
    #[arg(long, default_value = "https://www.googleapis.com/auth/youtube.upload")]
    scope: String,

    /// How to obtain the authorization code
    #[arg(long, value_enum, default_value_t = Flow::Prompt)]
    auth_flow: Flow,

    /// Loopback port for the callback flow
    #[arg(long, default_value_t = 8090)]
    callback_port: u16,
}

#[derive(Debug, Clone, Copy, ValueEnum)]
enum Flow {
    /// Print the URL and read the pasted code from stdin
    Prompt,
    /// Capture the code with a local callback listener
    Callback,
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let args = Args::parse();

    let secrets = ClientSecrets::from_file(&args.client_secrets)?;
    let store = CredentialStore::for_app(&args.cache_name)?;
    let cache_path = store.path().to_path_buf();
    let authenticator = Authenticator::new(secrets.into_config(args.scope), store);

    let acquirer: Box<dyn CodeAcquirer> = match args.auth_flow {
        Flow::Prompt => Box::new(PromptAcquirer),
        Flow::Callback => Box::new(CallbackAcquirer::new(args.callback_port)),
    };
    authenticator.authorize(acquirer.as_ref()).await?;

    eprintln!("\nOAuth token cached at: {}", cache_path.display());
    eprintln!("You can now run yt-uploader without re-authorizing");

    Ok(())
}
