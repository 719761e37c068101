#![allow(dead_code)]

use arbor_app::op::{Op, OpContext};
use arbor_app::ops::Init;
use ::common::id::RecordId;
use tempfile::TempDir;

/// Initialize a fresh arbor directory and return a context pointing at it
pub fn setup_test_context() -> (OpContext, RecordId, TempDir) {
    let temp_dir = TempDir::new().expect("failed to create temp dir");
    let ctx = OpContext::new(Some(temp_dir.path().join("arbor")));

    Init {
        storage_root: None,
        reject_cycles: false,
    }
    .execute(&ctx)
    .expect("failed to init");

    let root = ctx.state().expect("failed to load state").config.root_id;
    (ctx, root, temp_dir)
}

pub fn parse_id(output: &str) -> RecordId {
    output.trim().parse().expect("output is not a record id")
}
