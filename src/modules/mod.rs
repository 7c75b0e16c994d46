// Copyright © 2025 rustmailer.com
// Licensed under RustMailer License Agreement v1.0
// Unauthorized copying, modification, or distribution is prohibited.

pub mod common;
pub mod error;
pub mod forward;
pub mod graph;
pub mod logger;
pub mod resolver;
pub mod rest;
pub mod settings;
pub mod utils;
