use crate::cli::{actions::Action, globals::GlobalArgs};
use crate::entrata;
use anyhow::Result;

/// Handle the server action
pub async fn handle(action: Action) -> Result<()> {
    match action {
        Action::Server { port, secret_key } => {
            let globals = GlobalArgs::new(secret_key);

            entrata::new(port, &globals).await?;
        }
    }

    Ok(())
}
