//! podu CLI: upload images to a podu server from the terminal

use std::path::PathBuf;
use std::sync::Arc;

use anyhow::Context;
use clap::{Parser, Subcommand};
use tracing_subscriber::{fmt, EnvFilter};
use upload_client::{
    api::HttpUploadApi,
    clipboard::Osc52Clipboard,
    session::{SelectedFile, UploadSession, UploadState},
};

#[derive(Parser)]
#[command(name = "podu", about = "Upload images to podu.pics")]
struct Cli {
    /// Base URL of the podu server
    #[arg(long, env = "PODU_SERVER", default_value = "http://localhost:3000")]
    server: String,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Upload an image and print its public URL
    Upload {
        /// Image to upload; only the first file is uploaded
        #[arg(required = true)]
        files: Vec<PathBuf>,
        /// Copy the URL to the clipboard (OSC 52)
        #[arg(long)]
        copy: bool,
    },
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();

    match cli.command {
        Commands::Upload { files, copy } => upload(&cli.server, &files, copy).await,
    }
}

async fn upload(server: &str, paths: &[PathBuf], copy: bool) -> anyhow::Result<()> {
    let mut files = Vec::with_capacity(1);
    if let Some(path) = paths.first() {
        let file = SelectedFile::from_path(path)
            .await
            .with_context(|| format!("Failed to read {}", path.display()))?;
        files.push(file);
    }
    if paths.len() > 1 {
        eprintln!("Only one image can be uploaded at a time; uploading {}", paths[0].display());
    }

    let mut session = UploadSession::new(Arc::new(HttpUploadApi::new(server)));

    let mut states = session.subscribe();
    let progress = tokio::spawn(async move {
        while states.changed().await.is_ok() {
            match &*states.borrow_and_update() {
                UploadState::Requesting => eprintln!("Requesting upload URL..."),
                UploadState::Uploading => eprintln!("Uploading..."),
                _ => {}
            }
        }
    });

    session.select_files(files).await?;

    match session.state() {
        UploadState::Succeeded { url } => {
            println!("{url}");
            if copy {
                session.copy_url(&Osc52Clipboard)?;
                eprintln!("Copied!");
            }
        }
        UploadState::Failed { message } => anyhow::bail!(message),
        state => anyhow::bail!("Upload ended in unexpected state {state:?}"),
    }

    drop(session);
    progress.await?;

    Ok(())
}
