// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

use checkpoint_core::ProjectId;

use super::*;

#[tokio::test]
async fn null_hook_always_succeeds() {
    let hook = NullRetentionHook;
    assert!(hook.run_retention(&ProjectId::new()).await.is_ok());
}
