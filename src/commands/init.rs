use crate::commands::Out;
use crate::{Config, Result};
use anyhow::Context;
use std::path::Path;

/// Creates the handy home directory and a default `config.json` inside it. Running it again
/// keeps the existing config.
///
/// # Errors
/// - Returns an error if any file operations fail.
pub async fn init(handy_home: &Path) -> Result<Out<()>> {
    let config = Config::create(handy_home)
        .await
        .context("Unable to create the handy home directory and config")?;
    Ok(format!(
        "The handy config is ready at {}",
        config.config_path().display()
    )
    .into())
}
