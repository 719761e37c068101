use clap::Args;

use crate::state::StateError;

#[derive(Args, Debug, Clone)]
pub struct Root;

#[derive(Debug, thiserror::Error)]
pub enum RootError {
    #[error("state error: {0}")]
    State(#[from] StateError),
}

impl crate::op::Op for Root {
    type Error = RootError;
    type Output = String;

    fn execute(&self, ctx: &crate::op::OpContext) -> Result<Self::Output, Self::Error> {
        let state = ctx.state()?;
        Ok(state.config.root_id.to_string())
    }
}
