use anyhow::{Context, Result, bail};
use clap::{Parser, ValueEnum};
use std::{env, fmt, time::Duration};

/// Centralized application configuration.
/// Combines environment variables and CLI arguments.
#[derive(Debug, Clone)]
pub struct AppConfig {
    pub host: String,
    pub port: u16,
    pub proxy: ProxyConfig,
    pub backend: StoreBackend,
    pub storage_dir: String,
    pub s3: S3Settings,
    pub store_retries: u32,
    pub retry_delay: Duration,
}

/// Immutable settings consulted by the proxy handler on every request.
#[derive(Debug, Clone)]
pub struct ProxyConfig {
    pub auth_token: AuthToken,
}

/// Shared secret expected in the `token` query parameter.
#[derive(Clone)]
pub struct AuthToken(String);

impl AuthToken {
    pub fn new(secret: impl Into<String>) -> Self {
        Self(secret.into())
    }

    /// Byte-exact comparison that inspects every byte of equal-length inputs.
    pub fn matches(&self, candidate: &str) -> bool {
        let expected = self.0.as_bytes();
        let candidate = candidate.as_bytes();
        if expected.len() != candidate.len() {
            return false;
        }
        expected
            .iter()
            .zip(candidate)
            .fold(0u8, |acc, (a, b)| acc | (a ^ b))
            == 0
    }
}

impl fmt::Debug for AuthToken {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("AuthToken(<redacted>)")
    }
}

/// Which object store implementation serves the keys.
#[derive(ValueEnum, Debug, Clone, Copy, PartialEq, Eq)]
pub enum StoreBackend {
    /// Files beneath `storage_dir`.
    Disk,
    /// An S3-compatible bucket (AWS S3, Cloudflare R2, MinIO).
    S3,
}

#[derive(Debug, Clone, Default)]
pub struct S3Settings {
    pub bucket: Option<String>,
    pub endpoint: Option<String>,
    pub region: String,
}

/// Command-line + environment configuration.
#[derive(Parser, Debug, Default)]
#[command(author, version, about = "Token-authenticated image proxy for an object-storage bucket")]
pub struct Args {
    /// Host to bind to (overrides IMAGE_PROXY_HOST)
    #[arg(long)]
    pub host: Option<String>,

    /// Port to bind to (overrides IMAGE_PROXY_PORT)
    #[arg(long)]
    pub port: Option<u16>,

    /// Shared secret clients pass as `?token=` (overrides IMAGE_PROXY_AUTH_TOKEN)
    #[arg(long)]
    pub auth_token: Option<String>,

    /// Object store backend (overrides IMAGE_PROXY_BACKEND)
    #[arg(long, value_enum)]
    pub backend: Option<StoreBackend>,

    /// Directory served by the disk backend (overrides IMAGE_PROXY_STORAGE_DIR)
    #[arg(long)]
    pub storage_dir: Option<String>,

    /// Bucket name for the s3 backend (overrides IMAGE_PROXY_S3_BUCKET)
    #[arg(long)]
    pub s3_bucket: Option<String>,

    /// Custom S3 endpoint, e.g. an R2 account URL (overrides IMAGE_PROXY_S3_ENDPOINT)
    #[arg(long)]
    pub s3_endpoint: Option<String>,

    /// S3 region (overrides IMAGE_PROXY_S3_REGION)
    #[arg(long)]
    pub s3_region: Option<String>,

    /// Extra attempts after a failed store lookup (overrides IMAGE_PROXY_STORE_RETRIES)
    #[arg(long)]
    pub store_retries: Option<u32>,

    /// Initial retry backoff in milliseconds (overrides IMAGE_PROXY_RETRY_DELAY_MS)
    #[arg(long)]
    pub retry_delay_ms: Option<u64>,
}

impl AppConfig {
    /// Parse environment variables + CLI args into AppConfig.
    pub fn from_env_and_args() -> Result<Self> {
        Self::resolve(Args::parse(), |name| env::var(name).ok())
    }

    /// Merge CLI args over values returned by `lookup`, then apply defaults.
    pub fn resolve(args: Args, lookup: impl Fn(&str) -> Option<String>) -> Result<Self> {
        let env_host = lookup("IMAGE_PROXY_HOST").unwrap_or_else(|| "0.0.0.0".into());
        let env_port = parse_var(&lookup, "IMAGE_PROXY_PORT")?.unwrap_or(3000);
        let env_backend = match lookup("IMAGE_PROXY_BACKEND") {
            Some(value) => StoreBackend::from_str(&value, true).map_err(|err| {
                anyhow::anyhow!("parsing IMAGE_PROXY_BACKEND value `{}`: {}", value, err)
            })?,
            None => StoreBackend::Disk,
        };
        let env_storage =
            lookup("IMAGE_PROXY_STORAGE_DIR").unwrap_or_else(|| "./data/objects".into());
        let env_retries = parse_var(&lookup, "IMAGE_PROXY_STORE_RETRIES")?.unwrap_or(0);
        let env_delay = parse_var(&lookup, "IMAGE_PROXY_RETRY_DELAY_MS")?.unwrap_or(100);

        let auth_token = match args.auth_token.or_else(|| lookup("IMAGE_PROXY_AUTH_TOKEN")) {
            Some(token) if !token.is_empty() => AuthToken::new(token),
            Some(_) => bail!("auth token must not be empty"),
            None => bail!("auth token missing: pass --auth-token or set IMAGE_PROXY_AUTH_TOKEN"),
        };

        let backend = args.backend.unwrap_or(env_backend);
        let s3 = S3Settings {
            bucket: args.s3_bucket.or_else(|| lookup("IMAGE_PROXY_S3_BUCKET")),
            endpoint: args.s3_endpoint.or_else(|| lookup("IMAGE_PROXY_S3_ENDPOINT")),
            region: args
                .s3_region
                .or_else(|| lookup("IMAGE_PROXY_S3_REGION"))
                .unwrap_or_else(|| "auto".into()),
        };
        if backend == StoreBackend::S3 && s3.bucket.is_none() {
            bail!("s3 backend requires --s3-bucket or IMAGE_PROXY_S3_BUCKET");
        }

        Ok(Self {
            host: args.host.unwrap_or(env_host),
            port: args.port.unwrap_or(env_port),
            proxy: ProxyConfig { auth_token },
            backend,
            storage_dir: args.storage_dir.unwrap_or(env_storage),
            s3,
            store_retries: args.store_retries.unwrap_or(env_retries),
            retry_delay: Duration::from_millis(args.retry_delay_ms.unwrap_or(env_delay)),
        })
    }

    pub fn addr(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }
}

fn parse_var<T>(lookup: &impl Fn(&str) -> Option<String>, name: &str) -> Result<Option<T>>
where
    T: std::str::FromStr,
    T::Err: std::error::Error + Send + Sync + 'static,
{
    lookup(name)
        .map(|value| {
            value
                .parse::<T>()
                .with_context(|| format!("parsing {} value `{}`", name, value))
        })
        .transpose()
}
