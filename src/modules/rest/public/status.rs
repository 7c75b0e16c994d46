// Copyright © 2025 rustmailer.com
// Licensed under RustMailer License Agreement v1.0
// Unauthorized copying, modification, or distribution is prohibited.

use std::{sync::LazyLock, time::Instant};

use poem::{handler, web::Json, IntoResponse};
use serde::Serialize;

use crate::forwarder_version;

/// Set when the server starts; uptime is measured from here.
pub static STARTED_AT: LazyLock<Instant> = LazyLock::new(Instant::now);

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ServiceStatus {
    pub status: &'static str,
    pub version: &'static str,
    pub uptime_ms: u128,
}

impl ServiceStatus {
    pub fn get() -> Self {
        Self {
            status: "ok",
            version: forwarder_version!(),
            uptime_ms: STARTED_AT.elapsed().as_millis(),
        }
    }
}

#[handler]
pub async fn get_status() -> impl IntoResponse {
    Json(ServiceStatus::get())
}
