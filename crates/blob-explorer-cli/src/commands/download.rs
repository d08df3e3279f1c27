use std::path::Path;

use anyhow::Result;

use super::{locate, open_session, save_entry};
use crate::Target;

pub async fn run(target: &Target, key: &str, output: Option<&str>) -> Result<()> {
    let mut session = open_session(target).await?;
    let entry = locate(&mut session, key).await?;

    let output = output.unwrap_or_else(|| entry.display_name()).to_string();
    let written = save_entry(&session, &entry, Path::new(&output)).await?;

    println!("Saved {} to {} ({} bytes)", key, output, written);
    session.disconnect();
    Ok(())
}
