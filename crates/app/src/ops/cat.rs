use std::path::PathBuf;

use clap::Args;
use common::id::RecordId;
use common::store::StoreError;

use crate::state::StateError;

#[derive(Args, Debug, Clone)]
pub struct Cat {
    /// Record owning the section
    pub id: RecordId,

    /// Section name
    pub section: String,

    /// Write the raw bytes to this file instead of printing them
    #[arg(long)]
    pub out: Option<PathBuf>,
}

#[derive(Debug, thiserror::Error)]
pub enum CatError {
    #[error("state error: {0}")]
    State(#[from] StateError),
    #[error("store error: {0}")]
    Store(#[from] StoreError),
    #[error("failed to write output: {0}")]
    Output(#[source] std::io::Error),
}

impl crate::op::Op for Cat {
    type Error = CatError;
    type Output = String;

    fn execute(&self, ctx: &crate::op::OpContext) -> Result<Self::Output, Self::Error> {
        let store = ctx.store()?;
        let data = store.read_section(&self.id, &self.section)?;

        match &self.out {
            Some(path) => {
                std::fs::write(path, &data).map_err(CatError::Output)?;
                Ok(format!("wrote {} bytes to {}", data.len(), path.display()))
            }
            // Non-UTF-8 content is replaced; use --out for binary sections
            None => Ok(String::from_utf8_lossy(&data).into_owned()),
        }
    }
}
