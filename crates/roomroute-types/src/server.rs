//! Backend media servers and how clients reach them.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::{ServerId, TypesError};

// ---------------------------------------------------------------------------
// Protocol
// ---------------------------------------------------------------------------

/// The scheme a client uses to connect to a media server.
///
/// Serialized in lowercase (`"https"`), matching what ends up in the
/// client bootstrap URL.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum Protocol {
    Http,
    #[default]
    Https,
    Rtmp,
    Rtmps,
    Rtmpt,
}

impl Protocol {
    /// The lowercase scheme name.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Http => "http",
            Self::Https => "https",
            Self::Rtmp => "rtmp",
            Self::Rtmps => "rtmps",
            Self::Rtmpt => "rtmpt",
        }
    }
}

impl fmt::Display for Protocol {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Protocol {
    type Err = TypesError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "http" => Ok(Self::Http),
            "https" => Ok(Self::Https),
            "rtmp" => Ok(Self::Rtmp),
            "rtmps" => Ok(Self::Rtmps),
            "rtmpt" => Ok(Self::Rtmpt),
            _ => Err(TypesError::UnknownProtocol(s.to_string())),
        }
    }
}

// ---------------------------------------------------------------------------
// Server
// ---------------------------------------------------------------------------

/// A backend media-serving node capable of hosting rooms.
///
/// Owned by the server registry; placement only reads it. `id` names the
/// registry entry. `==` compares every field, so two descriptions of one
/// entry (say, before and after an address change) are not equal; compare
/// `id`s to ask whether they are the same server.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Server {
    /// Registry identifier.
    pub id: ServerId,

    /// Human-readable name shown in logs and admin views.
    #[serde(default)]
    pub name: String,

    /// Host name or IP address clients connect to.
    pub address: String,

    /// Connection scheme.
    #[serde(default)]
    pub protocol: Protocol,

    /// TCP port.
    pub port: u16,

    /// Web-application context path (e.g. `"openmeetings"`).
    #[serde(default)]
    pub webapp: String,

    /// Whether the server currently accepts rooms.
    #[serde(default = "default_active")]
    pub active: bool,
}

fn default_active() -> bool {
    true
}

impl Server {
    /// Creates an active server with an empty name and context path.
    pub fn new(
        id: ServerId,
        address: impl Into<String>,
        protocol: Protocol,
        port: u16,
    ) -> Self {
        Self {
            id,
            name: String::new(),
            address: address.into(),
            protocol,
            port,
            webapp: String::new(),
            active: true,
        }
    }

    /// Sets the web-application context path.
    pub fn with_webapp(mut self, webapp: impl Into<String>) -> Self {
        self.webapp = webapp.into();
        self
    }

    /// Sets the display name.
    pub fn with_name(mut self, name: impl Into<String>) -> Self {
        self.name = name.into();
        self
    }

    /// Returns `true` if the server currently accepts rooms.
    pub fn is_active(&self) -> bool {
        self.active
    }

    /// The context path without leading or trailing slashes.
    fn context(&self) -> &str {
        self.webapp.trim_matches('/')
    }

    /// The base URL clients use: `protocol://address:port/webapp`.
    pub fn endpoint_url(&self) -> String {
        let context = self.context();
        if context.is_empty() {
            format!("{}://{}:{}/", self.protocol, self.address, self.port)
        } else {
            format!(
                "{}://{}:{}/{}",
                self.protocol, self.address, self.port, context
            )
        }
    }

    /// The parameters the surrounding application appends to the client
    /// bootstrap URL so the client connects to this server.
    ///
    /// Order is fixed: `protocol`, `host`, `port`, `context`.
    pub fn route_params(&self) -> Vec<(&'static str, String)> {
        vec![
            ("protocol", self.protocol.to_string()),
            ("host", self.address.clone()),
            ("port", self.port.to_string()),
            ("context", self.context().to_string()),
        ]
    }
}

impl fmt::Display for Server {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.name.is_empty() {
            write!(f, "{} ({})", self.id, self.endpoint_url())
        } else {
            write!(f, "{} {} ({})", self.id, self.name, self.endpoint_url())
        }
    }
}
