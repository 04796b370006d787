use std::path::PathBuf;

use clap::Parser;

use crate::commands::{Executor, ResourceArgs, report, save_form};

#[derive(Parser, Debug)]
pub struct UploadImageCmd {
    #[command(flatten)]
    resource: ResourceArgs,
    #[arg(short, long, help = "Path to image file")]
    file: PathBuf,
}

impl Executor for UploadImageCmd {
    async fn run(self) -> anyhow::Result<()> {
        let (session, service, mut form) = self.resource.open().await?;
        let info = session
            .assets()
            .upload_file(&self.file)
            .await
            .map_err(|e| report(&session, e.into()))?;
        println!("Uploaded {} bytes as {}", info.size, info.asset_key);
        form.add_image(info.asset_key);
        save_form(&session, &service, &mut form).await
    }
}
