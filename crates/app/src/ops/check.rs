use clap::Args;

use crate::state::StateError;

#[derive(Args, Debug, Clone)]
pub struct Check;

#[derive(Debug, thiserror::Error)]
pub enum CheckError {
    #[error("state error: {0}")]
    State(#[from] StateError),
}

impl crate::op::Op for Check {
    type Error = CheckError;
    type Output = String;

    fn execute(&self, ctx: &crate::op::OpContext) -> Result<Self::Output, Self::Error> {
        let store = ctx.store()?;
        let problems = store.verify();

        if problems.is_empty() {
            return Ok(format!("ok: {} records", store.len()));
        }

        tracing::warn!(count = problems.len(), "store inconsistencies found");
        let mut lines = vec![format!(
            "{} problem(s) in {} records:",
            problems.len(),
            store.len()
        )];
        lines.extend(problems.iter().map(|p| format!("  {}", p)));
        Ok(lines.join("\n"))
    }
}
