use clap::Args;
use common::id::RecordId;
use common::meta::{read_file_meta, MetaError};

use crate::state::StateError;

#[derive(Args, Debug, Clone)]
pub struct Meta {
    /// Record to inspect
    pub id: RecordId,
}

#[derive(Debug, thiserror::Error)]
pub enum MetaOpError {
    #[error("state error: {0}")]
    State(#[from] StateError),
    #[error("metadata error: {0}")]
    Meta(#[from] MetaError),
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

impl crate::op::Op for Meta {
    type Error = MetaOpError;
    type Output = String;

    fn execute(&self, ctx: &crate::op::OpContext) -> Result<Self::Output, Self::Error> {
        let store = ctx.store()?;
        let meta = read_file_meta(&store, &self.id)?;
        Ok(serde_json::to_string_pretty(&meta)?)
    }
}
