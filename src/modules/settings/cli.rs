// Copyright © 2025 rustmailer.com
// Licensed under RustMailer License Agreement v1.0
// Unauthorized copying, modification, or distribution is prohibited.

use clap::{builder::ValueParser, Parser};
use std::{collections::HashSet, path::PathBuf, sync::LazyLock};
use url::Url;

#[cfg(not(test))]
pub static SETTINGS: LazyLock<Settings> = LazyLock::new(Settings::parse);

#[cfg(test)]
pub static SETTINGS: LazyLock<Settings> = LazyLock::new(Settings::new_for_test);

fn parse_base_url(s: &str) -> Result<String, String> {
    let url = Url::parse(s).map_err(|e| format!("Invalid URL '{}': {}", s, e))?;
    if !matches!(url.scheme(), "http" | "https") {
        return Err(format!("URL '{}' must use http or https", s));
    }
    Ok(s.trim_end_matches('/').to_string())
}

#[derive(Debug, Parser)]
#[clap(
    name = "graph-forwarder",
    about = "An HTTP service that locates a mailbox message, sends a duplicate of it through Microsoft Graph \
    and moves the original to the trash.",
    version = env!("CARGO_PKG_VERSION")
)]
pub struct Settings {
    /// forwarder log level (default: "info")
    #[clap(
        long,
        default_value = "info",
        env,
        help = "Set the log level for the forwarder"
    )]
    pub forwarder_log_level: String,

    /// forwarder HTTP port (default: 15640)
    #[clap(
        long,
        default_value = "15640",
        env,
        help = "Set the HTTP port for the forwarder"
    )]
    pub forwarder_http_port: u16,

    /// The IP address that the HTTP server binds to, in IPv4 format.
    #[clap(
        long,
        env,
        default_value = "0.0.0.0",
        help = "The IP address that the HTTP server binds to, in IPv4 format (e.g., 192.168.1.1)",
        value_parser = ValueParser::new(|s: &str| {
            if s.parse::<std::net::Ipv4Addr>().is_err() {
                return Err("The bind IP address must be a valid IPv4 address.".to_string());
            }
            Ok(s.to_string())
        })
    )]
    pub forwarder_bind_ip: Option<String>,

    /// CORS allowed origins (default: "*")
    #[clap(
        long,
        default_value = "*",
        env,
        help = "Set the allowed CORS origins (comma-separated list, e.g., \"https://example.com, https://another.com\")",
        value_parser = ValueParser::new(|s: &str| -> Result<HashSet<String>, String> {
            let set: HashSet<String> = s.split(',')
                .map(|origin| origin.trim().to_string())
                .filter(|origin| !origin.is_empty())
                .collect();
            Ok(set)
        })
    )]
    pub forwarder_cors_origins: HashSet<String>,

    /// CORS max age in seconds (default: 86400)
    #[clap(
        long,
        default_value = "86400",
        env,
        help = "Set the CORS max age in seconds"
    )]
    pub forwarder_cors_max_age: i32,

    #[clap(
        long,
        default_value = "true",
        env,
        help = "Enable compression for the HTTP server"
    )]
    pub forwarder_http_compression_enabled: bool,

    /// Enable ANSI logs (default: true)
    #[clap(long, default_value = "true", env, help = "Enable ANSI formatted logs")]
    pub forwarder_ansi_logs: bool,

    /// Enable log file output (default: false)
    /// If false, logs will be printed to stdout
    #[clap(
        long,
        default_value = "false",
        env,
        help = "Enable log file output (otherwise logs go to stdout)"
    )]
    pub forwarder_log_to_file: bool,

    /// Enable JSON logs (default: false)
    #[clap(
        long,
        default_value = "false",
        env,
        help = "Enable JSON formatted logs"
    )]
    pub forwarder_json_logs: bool,

    #[clap(
        long,
        default_value = "./logs",
        env,
        help = "Directory that receives rolling log files when file logging is enabled"
    )]
    pub forwarder_log_dir: PathBuf,

    /// Maximum number of log files (default: 5)
    #[clap(
        long,
        default_value = "5",
        env,
        help = "Set the maximum number of server log files"
    )]
    pub forwarder_max_server_log_files: usize,

    #[clap(
        long,
        default_value = "https://graph.microsoft.com/v1.0",
        env,
        help = "Base URL of the Microsoft Graph API",
        value_parser = ValueParser::new(parse_base_url)
    )]
    pub forwarder_graph_base_url: String,

    #[clap(
        long,
        default_value = "https://graph.microsoft.com/beta",
        env,
        help = "Base URL of the Microsoft Graph beta API, used only by the fetch fallback",
        value_parser = ValueParser::new(parse_base_url)
    )]
    pub forwarder_graph_beta_url: String,

    /// Mailbox addressed by every Graph call. `/me` is used when unset.
    #[clap(
        long,
        env,
        help = "User id or principal name whose mailbox is addressed (defaults to the token owner, /me)"
    )]
    pub forwarder_graph_mailbox: Option<String>,

    #[clap(
        long,
        default_value = "30",
        env,
        help = "Timeout in seconds for a single Graph API call",
        value_parser = clap::value_parser!(u64).range(1..=600)
    )]
    pub forwarder_graph_timeout_secs: u64,

    #[clap(
        long,
        default_value = "true",
        env,
        help = "Allow metadata search when the request body does not say otherwise"
    )]
    pub forwarder_metadata_search_default: bool,

    #[clap(
        long,
        default_value = "5",
        env,
        help = "Number of candidate messages requested by a metadata search",
        value_parser = clap::value_parser!(u32).range(1..=50)
    )]
    pub forwarder_search_page_size: u32,

    #[clap(
        long,
        default_value = "false",
        env,
        help = "Retry a failed message fetch against the beta endpoint and with a reduced field set"
    )]
    pub forwarder_fetch_fallback_enabled: bool,

    #[clap(
        long,
        default_value = "deleteditems",
        env,
        help = "Well-known folder name or folder id that receives the original message after sending"
    )]
    pub forwarder_trash_folder: String,
}

impl Settings {
    #[cfg(test)]
    fn new_for_test() -> Self {
        Settings {
            forwarder_log_level: "info".to_string(),
            forwarder_http_port: 15640,
            forwarder_bind_ip: Default::default(),
            forwarder_cors_origins: Default::default(),
            forwarder_cors_max_age: 86400,
            forwarder_http_compression_enabled: true,
            forwarder_ansi_logs: false,
            forwarder_log_to_file: false,
            forwarder_json_logs: false,
            forwarder_log_dir: PathBuf::from("./logs"),
            forwarder_max_server_log_files: 5,
            forwarder_graph_base_url: "https://graph.microsoft.com/v1.0".to_string(),
            forwarder_graph_beta_url: "https://graph.microsoft.com/beta".to_string(),
            forwarder_graph_mailbox: None,
            forwarder_graph_timeout_secs: 30,
            forwarder_metadata_search_default: true,
            forwarder_search_page_size: 5,
            forwarder_fetch_fallback_enabled: false,
            forwarder_trash_folder: "deleteditems".to_string(),
        }
    }
}
