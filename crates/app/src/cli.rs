//! Command line definition.

use std::path::PathBuf;

use clap::{Args, Parser, Subcommand};

#[derive(Debug, Parser)]
#[command(name = "vcd")]
#[command(about = "vcd - call the VMware Cloud Director REST API")]
#[command(version)]
pub struct Cli {
    /// Configuration file (defaults to ./vcd.toml when present)
    #[arg(long, global = true, value_name = "PATH")]
    pub config: Option<PathBuf>,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Debug, Subcommand)]
pub enum Commands {
    /// Print the highest non-deprecated API version of an endpoint
    Versions(VersionsArgs),

    /// Send one request and optionally wait for the task it starts
    Invoke(InvokeArgs),
}

#[derive(Debug, Args)]
pub struct VersionsArgs {
    /// Any URL on the Cloud Director host
    pub uri: String,

    /// Per-request timeout in seconds
    #[arg(long, value_name = "SECS")]
    pub api_timeout: Option<u64>,

    /// Accept any TLS certificate
    #[arg(long)]
    pub skip_cert_check: bool,
}

#[derive(Debug, Args)]
pub struct InvokeArgs {
    /// Absolute URL of the resource
    pub uri: String,

    /// HTTP method
    #[arg(short = 'X', long, default_value = "GET")]
    pub method: String,

    /// API version; negotiated with the host when omitted
    #[arg(long, value_name = "VERSION")]
    pub api_version: Option<String>,

    /// Content type of the request body
    #[arg(long, value_name = "MEDIA_TYPE")]
    pub content_type: Option<String>,

    /// Request body
    #[arg(long, conflicts_with = "body_file", requires = "content_type")]
    pub body: Option<String>,

    /// Read the request body from a file
    #[arg(long, value_name = "PATH", requires = "content_type")]
    pub body_file: Option<PathBuf>,

    /// Media range for the Accept header (version is appended)
    #[arg(long, value_name = "MEDIA_RANGE")]
    pub accept: Option<String>,

    /// Per-request timeout in seconds
    #[arg(long, value_name = "SECS")]
    pub api_timeout: Option<u64>,

    /// Task wait budget in seconds
    #[arg(long, value_name = "SECS")]
    pub task_timeout: Option<u64>,

    /// Wait for the task started by the request and print true/false
    #[arg(long)]
    pub wait: bool,

    /// Session token (x-vcloud-authorization)
    #[arg(long, env = "VCD_SESSION_TOKEN", hide_env_values = true)]
    pub session_token: Option<String>,

    /// JWT access token
    #[arg(long, env = "VCD_JWT", hide_env_values = true)]
    pub jwt: Option<String>,

    /// Accept any TLS certificate
    #[arg(long)]
    pub skip_cert_check: bool,
}
