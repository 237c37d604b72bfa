use anyhow::Context;
use std::net::{IpAddr, SocketAddr};
use std::str::FromStr;

const PREFIX: &str = "SHIFTOPT__";

#[derive(Clone, Debug, PartialEq)]
pub struct Settings {
    pub host: IpAddr,
    pub port: u16,
    /// Largest accepted request body, in bytes.
    pub body_limit: usize,
    pub json_logs: bool,
    /// Finished jobs kept in memory before the oldest are dropped.
    pub jobs_retain: usize,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            host: IpAddr::from([0, 0, 0, 0]),
            port: 8080,
            body_limit: 2 * 1024 * 1024,
            json_logs: true,
            jobs_retain: jobs::DEFAULT_RETAIN,
        }
    }
}

impl Settings {
    pub fn from_env() -> anyhow::Result<Self> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Reads `SHIFTOPT__SERVER__HOST`, `SHIFTOPT__SERVER__PORT`,
    /// `SHIFTOPT__SERVER__BODY_LIMIT`, `SHIFTOPT__LOG__JSON` and
    /// `SHIFTOPT__JOBS__RETAIN`; anything unset keeps its default.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> anyhow::Result<Self> {
        let d = Self::default();
        Ok(Self {
            host: read(&lookup, "SERVER__HOST", d.host)?,
            port: read(&lookup, "SERVER__PORT", d.port)?,
            body_limit: read(&lookup, "SERVER__BODY_LIMIT", d.body_limit)?,
            json_logs: read(&lookup, "LOG__JSON", d.json_logs)?,
            jobs_retain: read(&lookup, "JOBS__RETAIN", d.jobs_retain)?,
        })
    }

    pub fn addr(&self) -> SocketAddr {
        SocketAddr::new(self.host, self.port)
    }
}

fn read<T>(lookup: &impl Fn(&str) -> Option<String>, key: &str, default: T) -> anyhow::Result<T>
where
    T: FromStr,
    T::Err: std::error::Error + Send + Sync + 'static,
{
    let name = format!("{PREFIX}{key}");
    match lookup(&name) {
        Some(raw) => raw
            .trim()
            .parse()
            .with_context(|| format!("invalid value {raw:?} for {name}")),
        None => Ok(default),
    }
}
