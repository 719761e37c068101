use clap::Args;
use common::id::RecordId;
use common::store::StoreError;

use crate::state::StateError;

#[derive(Args, Debug, Clone)]
pub struct Mount {
    /// Directory to mount into
    pub parent: RecordId,

    /// Record to mount
    pub child: RecordId,
}

#[derive(Debug, thiserror::Error)]
pub enum MountError {
    #[error("state error: {0}")]
    State(#[from] StateError),
    #[error("store error: {0}")]
    Store(#[from] StoreError),
}

impl crate::op::Op for Mount {
    type Error = MountError;
    type Output = String;

    fn execute(&self, ctx: &crate::op::OpContext) -> Result<Self::Output, Self::Error> {
        let store = ctx.store()?;
        store.mount(&self.parent, &self.child)?;
        let info = store.stat(&self.child)?;
        Ok(format!(
            "mounted {} under {} (refs={})",
            self.child, self.parent, info.refs
        ))
    }
}
