use clap::Args;
use common::id::RecordId;
use common::meta::{write_file_meta, FileMeta, MetaError};
use common::store::StoreError;

use crate::state::StateError;

#[derive(Args, Debug, Clone)]
pub struct Touch {
    /// Parent directory
    pub parent: RecordId,

    /// Name of the new file
    pub name: String,

    /// Owner recorded in the file's metadata (defaults to $USER)
    #[arg(long)]
    pub owner: Option<String>,
}

#[derive(Debug, thiserror::Error)]
pub enum TouchError {
    #[error("state error: {0}")]
    State(#[from] StateError),
    #[error("store error: {0}")]
    Store(#[from] StoreError),
    #[error("metadata error: {0}")]
    Meta(#[from] MetaError),
}

impl crate::op::Op for Touch {
    type Error = TouchError;
    type Output = String;

    fn execute(&self, ctx: &crate::op::OpContext) -> Result<Self::Output, Self::Error> {
        let store = ctx.store()?;
        let id = store.touch(&self.parent, &self.name)?;

        let owner = self
            .owner
            .clone()
            .or_else(|| std::env::var("USER").ok())
            .unwrap_or_else(|| "unknown".to_string());
        let meta = FileMeta::new(id, "file", owner);

        if let Err(e) = write_file_meta(&store, &id, &meta) {
            // Don't leave a file without metadata behind
            if let Err(cleanup) = store.unmount(&self.parent, &id) {
                tracing::warn!(%id, error = %cleanup, "failed to remove file after metadata write failed");
            }
            return Err(e.into());
        }

        Ok(id.to_string())
    }
}
