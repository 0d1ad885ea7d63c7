use std::path::Path;
use std::process::ExitStatus;

use tokio::process::Command;
use tower_http::services::{ServeDir, ServeFile};

use crate::frameworks::config::RunMode;

// Command used to produce the frontend build output in development.
const BUILD_PROGRAM: &str = "npm";
const BUILD_ARGS: &[&str] = &["run", "build"];

#[derive(Debug)]
pub enum FrontendError {
    BuildSpawn(std::io::Error),
    BuildFailed(ExitStatus),
}

// Brings up the page-serving fallback for the given run mode. In
// development the frontend assets are rebuilt first; production serves
// the existing build output.
pub async fn init(
    mode: RunMode,
    frontend_dir: &Path,
    dist_dir: &Path,
) -> Result<ServeDir<ServeFile>, FrontendError> {
    if mode.is_development() {
        tracing::info!(dir = %frontend_dir.display(), "building frontend assets");
        run_build(BUILD_PROGRAM, BUILD_ARGS, frontend_dir).await?;
    }

    Ok(fallback_service(dist_dir))
}

// Static SPA fallback: serve built assets, and index.html for any path
// that does not match a file (client-side routing).
pub fn fallback_service(dist_dir: &Path) -> ServeDir<ServeFile> {
    let index = dist_dir.join("index.html");
    ServeDir::new(dist_dir).fallback(ServeFile::new(index))
}

async fn run_build(program: &str, args: &[&str], dir: &Path) -> Result<(), FrontendError> {
    let status = Command::new(program)
        .args(args)
        .current_dir(dir)
        .status()
        .await
        .map_err(FrontendError::BuildSpawn)?;

    if !status.success() {
        return Err(FrontendError::BuildFailed(status));
    }

    Ok(())
}
