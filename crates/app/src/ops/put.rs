use std::io::Read;
use std::path::PathBuf;

use clap::Args;
use common::id::RecordId;
use common::store::StoreError;

use crate::state::StateError;

#[derive(Args, Debug, Clone)]
pub struct Put {
    /// Record owning the section
    pub id: RecordId,

    /// Section name
    pub section: String,

    /// Read content from this file instead of stdin
    #[arg(long)]
    pub file: Option<PathBuf>,
}

#[derive(Debug, thiserror::Error)]
pub enum PutError {
    #[error("state error: {0}")]
    State(#[from] StateError),
    #[error("store error: {0}")]
    Store(#[from] StoreError),
    #[error("failed to read input: {0}")]
    Input(#[source] std::io::Error),
}

impl crate::op::Op for Put {
    type Error = PutError;
    type Output = String;

    fn execute(&self, ctx: &crate::op::OpContext) -> Result<Self::Output, Self::Error> {
        let store = ctx.store()?;

        let data = match &self.file {
            Some(path) => std::fs::read(path).map_err(PutError::Input)?,
            None => {
                let mut buf = Vec::new();
                std::io::stdin()
                    .read_to_end(&mut buf)
                    .map_err(PutError::Input)?;
                buf
            }
        };

        store.write_section(&self.id, &self.section, &data)?;
        Ok(format!(
            "wrote {} bytes to {}.{}",
            data.len(),
            self.id,
            self.section
        ))
    }
}
