use clap::Args;
use common::id::RecordId;
use common::store::StoreError;

use crate::state::StateError;

#[derive(Args, Debug, Clone)]
pub struct Sections {
    /// Record to inspect
    pub id: RecordId,
}

#[derive(Debug, thiserror::Error)]
pub enum SectionsError {
    #[error("state error: {0}")]
    State(#[from] StateError),
    #[error("store error: {0}")]
    Store(#[from] StoreError),
}

impl crate::op::Op for Sections {
    type Error = SectionsError;
    type Output = String;

    fn execute(&self, ctx: &crate::op::OpContext) -> Result<Self::Output, Self::Error> {
        let store = ctx.store()?;
        let names = store.list_sections(&self.id)?;
        if names.is_empty() {
            return Ok("(no sections)".to_string());
        }
        Ok(names.join("\n"))
    }
}
