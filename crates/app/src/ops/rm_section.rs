use clap::Args;
use common::id::RecordId;
use common::store::StoreError;

use crate::state::StateError;

#[derive(Args, Debug, Clone)]
pub struct RmSection {
    /// Record owning the section
    pub id: RecordId,

    /// Section name
    pub section: String,
}

#[derive(Debug, thiserror::Error)]
pub enum RmSectionError {
    #[error("state error: {0}")]
    State(#[from] StateError),
    #[error("store error: {0}")]
    Store(#[from] StoreError),
}

impl crate::op::Op for RmSection {
    type Error = RmSectionError;
    type Output = String;

    fn execute(&self, ctx: &crate::op::OpContext) -> Result<Self::Output, Self::Error> {
        let store = ctx.store()?;
        store.delete_section(&self.id, &self.section)?;
        Ok(format!("removed {}.{}", self.id, self.section))
    }
}
