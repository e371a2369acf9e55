//! CLI arguments and server configuration defaults.

use clap::Parser;
use shadow_rs::formatcp;

use crate::build;

const VERSION_INFO: &str = formatcp!(
    r#"{}\ncommit_hash: {}\nbuild_time: {}\nbuild_env: {},{}"#,
    build::PKG_VERSION,
    build::SHORT_COMMIT,
    build::BUILD_TIME,
    build::RUST_VERSION,
    build::RUST_CHANNEL
);

/// Multipart field that carries the uploaded file.
pub const UPLOAD_FIELD: &str = "myfile";
/// Prefix reported to clients for stored files, independent of the on-disk location.
pub const PUBLIC_UPLOAD_PREFIX: &str = "uploads";
pub const DEFAULT_UPLOAD_DIR: &str = "uploads";
pub const DEFAULT_HTTP_PORT: u16 = 3000;
pub const DEFAULT_CORS_ORIGINS: &str = "http://localhost:3000,http://localhost:5173";
pub const CORS_ALLOWED_HEADERS: [&str; 3] = ["content-type", "authorization", "x-requested-with"];

/// CLI arguments and environment configuration for the server.
#[derive(Parser, Debug)]
#[command(name = "filedrop", version = VERSION_INFO, about = "Filedrop upload server")]
pub struct Args {
    #[arg(
        short = 'd',
        long,
        env = "FILEDROP_UPLOAD_DIR",
        default_value = DEFAULT_UPLOAD_DIR,
        help = "Directory uploaded files are stored in"
    )]
    pub upload_dir: String,
    #[arg(
        short = 'b',
        long,
        env = "FILEDROP_HOST",
        default_value = "0.0.0.0",
        help = "Bind address"
    )]
    pub host: String,
    #[arg(
        short = 'p',
        long,
        env = "PORT",
        default_value_t = DEFAULT_HTTP_PORT,
        help = "HTTP port"
    )]
    pub port: u16,
    #[arg(
        long,
        env = "FILEDROP_CORS_ORIGINS",
        default_value = DEFAULT_CORS_ORIGINS,
        help = "Comma separated CORS origins"
    )]
    pub cors_origins: String,
}
