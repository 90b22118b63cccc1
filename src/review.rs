//! Review decisions and comments written back to a mapping sheet.

use anyhow::{Context, Result};
use chrono::Utc;
use log::info;

use crate::{
    cli::{CommentArgs, ReviewArgs},
    store,
};

pub fn execute_review(args: &ReviewArgs) -> Result<()> {
    let mut sheet = store::load_mapping_file(&args.input)?;
    let previous = {
        let record = sheet
            .record_mut(&args.id)
            .with_context(|| format!("Reviewing mapping in {:?}", args.input))?;
        let previous = record.status;
        record.set_status(args.status, &args.reviewer, Utc::now());
        previous
    };
    let destination = args.output.as_deref().unwrap_or(args.input.as_path());
    store::save_mapping_file(destination, &sheet)?;
    info!(
        "Mapping '{}' moved from {} to {} by {} (written to {:?})",
        args.id, previous, args.status, args.reviewer, destination
    );
    Ok(())
}

pub fn execute_comment(args: &CommentArgs) -> Result<()> {
    let mut sheet = store::load_mapping_file(&args.input)?;
    let text = args.text.trim();
    sheet
        .record_mut(&args.id)
        .with_context(|| format!("Commenting on mapping in {:?}", args.input))?
        .add_comment(text, Utc::now());
    let destination = args.output.as_deref().unwrap_or(args.input.as_path());
    store::save_mapping_file(destination, &sheet)?;
    info!(
        "Added comment to mapping '{}' (written to {:?})",
        args.id, destination
    );
    Ok(())
}
