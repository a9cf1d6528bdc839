use crate::{env_parse_or, ConfigError, FromEnv};
use std::net::{IpAddr, Ipv4Addr, SocketAddr};

/// Port the inventory API listens on when `PORT` is unset.
pub const DEFAULT_PORT: u16 = 3000;

/// Where the HTTP listener binds: `HOST` (all interfaces by default) and `PORT`.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct ServerConfig {
    pub host: IpAddr,
    pub port: u16,
}

impl ServerConfig {
    pub fn address(&self) -> SocketAddr {
        SocketAddr::new(self.host, self.port)
    }
}

impl FromEnv for ServerConfig {
    /// A `HOST` that is not an IP literal or a `PORT` outside `u16` is an error
    /// naming the variable.
    fn from_env() -> Result<Self, ConfigError> {
        Ok(Self {
            host: env_parse_or("HOST", IpAddr::V4(Ipv4Addr::UNSPECIFIED))?,
            port: env_parse_or("PORT", DEFAULT_PORT)?,
        })
    }
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: IpAddr::V4(Ipv4Addr::UNSPECIFIED),
            port: DEFAULT_PORT,
        }
    }
}
