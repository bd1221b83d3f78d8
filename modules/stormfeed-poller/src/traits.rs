// Source seams for the poll cycle.
//
// AlertSource: the NWS alerts feed. Errors abort the cycle.
// DiscussionSource: SPC discussions. Errors degrade to an empty list.
//
// Tests swap in in-memory implementations to drive the Poller without a network.

use async_trait::async_trait;
use nws_client::NwsClient;
use spc_client::{DiscussionBatch, SpcClient};
use stormfeed_common::Alert;

#[async_trait]
pub trait AlertSource: Send + Sync {
    /// Every retained active alert, in upstream order.
    async fn active_alerts(&self) -> nws_client::Result<Vec<Alert>>;
}

#[async_trait]
pub trait DiscussionSource: Send + Sync {
    /// Active discussions, in upstream order. Per-item text failures are
    /// already absorbed; an error here means the polygon query itself failed.
    async fn discussions(&self) -> spc_client::Result<DiscussionBatch>;
}

#[async_trait]
impl AlertSource for NwsClient {
    async fn active_alerts(&self) -> nws_client::Result<Vec<Alert>> {
        self.fetch_active_alerts().await
    }
}

#[async_trait]
impl DiscussionSource for SpcClient {
    async fn discussions(&self) -> spc_client::Result<DiscussionBatch> {
        self.fetch_discussions().await
    }
}
