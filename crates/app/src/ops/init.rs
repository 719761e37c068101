use std::path::PathBuf;

use clap::Args;

use crate::state::AppState;

#[derive(Args, Debug, Clone)]
pub struct Init {
    /// Directory holding records and sections (default: <config-path>/files)
    #[arg(long)]
    pub storage_root: Option<PathBuf>,

    /// Refuse mounts that would create a cycle
    #[arg(long)]
    pub reject_cycles: bool,
}

#[derive(Debug, thiserror::Error)]
pub enum InitError {
    #[error("init failed: {0}")]
    StateFailed(#[from] crate::state::StateError),
}

impl crate::op::Op for Init {
    type Error = InitError;
    type Output = String;

    fn execute(&self, ctx: &crate::op::OpContext) -> Result<Self::Output, Self::Error> {
        let state = AppState::init(
            ctx.config_path.clone(),
            self.storage_root.clone(),
            self.reject_cycles,
        )?;

        let output = format!(
            "Initialized arbor directory at: {}\n\
             - Config: {}\n\
             - Storage root: {}\n\
             - Reject cycles: {}\n\
             - Root: {}",
            state.arbor_dir.display(),
            state.config_path.display(),
            state.config.storage_root.display(),
            state.config.reject_cycles,
            state.config.root_id,
        );

        Ok(output)
    }
}
