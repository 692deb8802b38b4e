use crate::commands::Out;
use crate::Result;
use anyhow::Context;

/// Runs the calculator on the console until the user quits.
pub async fn calc() -> Result<Out<()>> {
    let computed =
        tokio::task::spawn_blocking(|| crate::calc::run(std::io::stdin().lock(), std::io::stdout()))
            .await
            .context("The calculator stopped unexpectedly")??;
    Ok(format!("Calculator closed after {computed} operation(s)").into())
}
