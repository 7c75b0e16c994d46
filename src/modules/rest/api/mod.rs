// Copyright © 2025 rustmailer.com
// Licensed under RustMailer License Agreement v1.0
// Unauthorized copying, modification, or distribution is prohibited.

use forward::ForwardApi;
use poem_openapi::{OpenApiService, Tags};

use crate::forwarder_version;

pub mod forward;

#[derive(Tags)]
pub enum ApiTags {
    /// Locate a message and send a duplicate of it
    Forward,
}

pub fn create_openapi_service() -> OpenApiService<ForwardApi, ()> {
    OpenApiService::new(ForwardApi, "GraphForwarderApi", forwarder_version!())
}
