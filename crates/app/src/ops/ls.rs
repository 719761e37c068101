use clap::Args;
use common::id::RecordId;
use common::store::StoreError;

use crate::state::StateError;

#[derive(Args, Debug, Clone)]
pub struct Ls {
    /// Directory to list (defaults to the root)
    pub id: Option<RecordId>,
}

#[derive(Debug, thiserror::Error)]
pub enum LsError {
    #[error("state error: {0}")]
    State(#[from] StateError),
    #[error("store error: {0}")]
    Store(#[from] StoreError),
}

impl crate::op::Op for Ls {
    type Error = LsError;
    type Output = String;

    fn execute(&self, ctx: &crate::op::OpContext) -> Result<Self::Output, Self::Error> {
        let store = ctx.store()?;
        let id = self.id.unwrap_or_else(|| store.get_root());

        let mut lines = Vec::new();
        for child in store.get_children(&id)? {
            let info = store.stat(&child)?;
            let kind = if info.is_dir { "dir " } else { "file" };
            lines.push(format!(
                "{}  {}  refs={}  {}",
                info.id, kind, info.refs, info.name
            ));
        }

        if lines.is_empty() {
            return Ok("(empty)".to_string());
        }
        Ok(lines.join("\n"))
    }
}
