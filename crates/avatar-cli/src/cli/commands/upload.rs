//! `avatar upload` – run one request through the pipeline.

use anyhow::Result;
use avatar_core::config::AvatarConfig;
use avatar_core::pipeline::{Collaborators, ImageUploadRequest, Pipeline, PipelineOutcome};
use avatar_core::profile_db::ProfileDb;
use avatar_core::signal::ProbeCounter;
use std::sync::Arc;

pub async fn run_upload(
    cfg: &AvatarConfig,
    db: &ProfileDb,
    token: Option<String>,
    url: Option<String>,
    origin: String,
) -> Result<()> {
    let pipeline = Pipeline::from_config(
        cfg,
        Collaborators {
            identities: Arc::new(db.clone()),
            profiles: Arc::new(db.clone()),
            signal: Arc::new(ProbeCounter::new()),
        },
    )?;

    let request = ImageUploadRequest {
        raw_url: url,
        credential: token,
        origin,
    };
    let outcome = pipeline.handle(&request).await?;
    match &outcome {
        PipelineOutcome::PassThrough => println!("No image URL given; profile unchanged."),
        PipelineOutcome::Stored { asset, .. } => {
            println!("Stored {} ({} bytes)", asset.local_path.display(), asset.bytes)
        }
        PipelineOutcome::FellBack { reason, value, .. } => match value {
            Some(v) => println!("Could not store image ({reason}); linking {v}"),
            None => println!("Could not store image ({reason}); image cleared"),
        },
    }
    println!("Location: {}", pipeline.profile_redirect().location);
    Ok(())
}
