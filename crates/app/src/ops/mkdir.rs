use clap::Args;
use common::id::RecordId;
use common::store::StoreError;

use crate::state::StateError;

#[derive(Args, Debug, Clone)]
pub struct Mkdir {
    /// Parent directory
    pub parent: RecordId,

    /// Name of the new directory
    pub name: String,
}

#[derive(Debug, thiserror::Error)]
pub enum MkdirError {
    #[error("state error: {0}")]
    State(#[from] StateError),
    #[error("store error: {0}")]
    Store(#[from] StoreError),
}

impl crate::op::Op for Mkdir {
    type Error = MkdirError;
    type Output = String;

    fn execute(&self, ctx: &crate::op::OpContext) -> Result<Self::Output, Self::Error> {
        let store = ctx.store()?;
        let id = store.mkdir(&self.parent, &self.name)?;
        Ok(id.to_string())
    }
}
