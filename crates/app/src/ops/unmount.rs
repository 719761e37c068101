use clap::Args;
use common::id::RecordId;
use common::store::StoreError;

use crate::state::StateError;

#[derive(Args, Debug, Clone)]
pub struct Unmount {
    /// Directory to unmount from
    pub parent: RecordId,

    /// Record to unmount
    pub child: RecordId,
}

#[derive(Debug, thiserror::Error)]
pub enum UnmountError {
    #[error("state error: {0}")]
    State(#[from] StateError),
    #[error("store error: {0}")]
    Store(#[from] StoreError),
}

impl crate::op::Op for Unmount {
    type Error = UnmountError;
    type Output = String;

    fn execute(&self, ctx: &crate::op::OpContext) -> Result<Self::Output, Self::Error> {
        let store = ctx.store()?;
        store.unmount(&self.parent, &self.child)?;

        if store.contains(&self.child) {
            let info = store.stat(&self.child)?;
            Ok(format!(
                "unmounted {} from {} (refs={})",
                self.child, self.parent, info.refs
            ))
        } else {
            Ok(format!("unmounted {} from {} (deleted)", self.child, self.parent))
        }
    }
}
