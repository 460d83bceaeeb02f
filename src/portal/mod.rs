//! Client-facing portal: token gate, aggregated payload and the views built from it.

pub mod gate;
pub mod payload;
pub mod views;

pub use gate::{DenialReason, PortalAccess, PortalGate, PortalSession};
pub use payload::{PortalJobSummary, PortalPayload};
pub use views::{DocumentEntry, Overview, PhotoEntry, PortalPage, PortalView, StepState, TimelineStep};

use crate::client::ApiClient;

/// Verify `token` and build the page for it. Denied tokens never produce job data.
pub async fn open_portal(client: &ApiClient, token: &str) -> PortalPage {
    let access = PortalGate::new(client.clone()).verify(token).await;
    PortalPage::from_access(access)
}
