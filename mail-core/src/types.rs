//! Core types: message identity, SMTP envelope, parsed paths and content, and the stored message.
//!
//! Field names serialize in PascalCase (`ID`, `Raw`, `Created`, ...); the storage crate queries
//! the JSON document by these names, so renaming them changes the on-disk format.

use std::collections::BTreeMap;
use std::fmt;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use uuid::Uuid;

use crate::error::{MessageError, Result};

/// Caller-assigned message identity, embedded in the stored document.
///
/// Unrelated to the row identifier the store assigns on insert.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct MessageId(String);

impl MessageId {
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    /// Generates `<uuid>@hostname`, the form used for messages captured by the SMTP side.
    pub fn generate(hostname: &str) -> Self {
        Self(format!("{}@{}", Uuid::new_v4(), hostname))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for MessageId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.pad(&self.0)
    }
}

impl From<&str> for MessageId {
    fn from(id: &str) -> Self {
        Self(id.to_string())
    }
}

impl From<String> for MessageId {
    fn from(id: String) -> Self {
        Self(id)
    }
}

/// A reverse- or forward-path from the SMTP envelope, e.g. `<@relay:user@example.com>`.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct Path {
    pub relays: Vec<String>,
    pub mailbox: String,
    pub domain: String,
    pub params: String,
}

impl Path {
    /// Parses `user@domain`, `<user@domain> PARAMS` or `<@relay1,@relay2:user@domain>`.
    pub fn parse(input: &str) -> Result<Self> {
        let input = input.trim();
        let (path, params) = match input.strip_prefix('<') {
            Some(rest) => match rest.split_once('>') {
                Some((path, params)) => (path, params.trim()),
                None => return Err(MessageError::InvalidPath(input.to_string())),
            },
            None => (input, ""),
        };

        let (relays, address) = match path.split_once(':') {
            Some((relays, address)) => {
                let relays = relays
                    .split(',')
                    .map(|r| r.trim().trim_start_matches('@').to_string())
                    .filter(|r| !r.is_empty())
                    .collect();
                (relays, address)
            }
            None => (Vec::new(), path),
        };

        let (mailbox, domain) = address
            .rsplit_once('@')
            .ok_or_else(|| MessageError::InvalidPath(input.to_string()))?;
        if mailbox.is_empty() {
            return Err(MessageError::InvalidPath(input.to_string()));
        }

        Ok(Self {
            relays,
            mailbox: mailbox.to_string(),
            domain: domain.to_string(),
            params: params.to_string(),
        })
    }
}

impl fmt::Display for Path {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}@{}", self.mailbox, self.domain)
    }
}

/// Headers and body split out of the raw DATA section.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct Content {
    pub headers: BTreeMap<String, Vec<String>>,
    pub body: String,
    pub size: usize,
}

impl Content {
    /// Splits at the first blank line; without one, everything is treated as headers.
    /// Folded continuation lines are joined onto the previous header value.
    pub fn parse(data: &str) -> Self {
        let (head, body) = data
            .split_once("\r\n\r\n")
            .or_else(|| data.split_once("\n\n"))
            .unwrap_or((data, ""));

        let mut headers: BTreeMap<String, Vec<String>> = BTreeMap::new();
        let mut last: Option<String> = None;
        for line in head.lines() {
            if line.starts_with(' ') || line.starts_with('\t') {
                if let Some(value) = last
                    .as_ref()
                    .and_then(|name| headers.get_mut(name))
                    .and_then(|values| values.last_mut())
                {
                    value.push(' ');
                    value.push_str(line.trim());
                }
                continue;
            }
            if let Some((name, value)) = line.split_once(':') {
                let name = name.trim().to_string();
                headers
                    .entry(name.clone())
                    .or_default()
                    .push(value.trim().to_string());
                last = Some(name);
            }
        }

        Self {
            headers,
            body: body.to_string(),
            size: data.len(),
        }
    }

    /// First value of a header, matched case-insensitively.
    pub fn header(&self, name: &str) -> Option<&str> {
        self.headers
            .iter()
            .find(|(key, _)| key.eq_ignore_ascii_case(name))
            .and_then(|(_, values)| values.first())
            .map(String::as_str)
    }
}

/// The SMTP envelope exactly as received: `MAIL FROM`, `RCPT TO`s, DATA and HELO.
///
/// `From`, `To` and `Data` are the searchable fields of a stored message.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct Envelope {
    pub from: String,
    pub to: Vec<String>,
    pub data: String,
    #[serde(default)]
    pub helo: String,
}

impl Envelope {
    /// Builds the storable message: parses paths and content, stamps `Created` with now.
    ///
    /// An empty reverse-path (`<>`, used by bounces) yields `from: None`.
    pub fn into_message(self, id: MessageId) -> Result<Message> {
        if self.to.is_empty() {
            return Err(MessageError::NoRecipients);
        }

        let from = match self.from.trim() {
            "" | "<>" => None,
            from => Some(Path::parse(from)?),
        };
        let to = self
            .to
            .iter()
            .map(|rcpt| Path::parse(rcpt))
            .collect::<Result<Vec<_>>>()?;
        let content = Content::parse(&self.data);

        Ok(Message {
            id,
            from,
            to,
            content,
            created: Utc::now(),
            raw: self,
            extra: Map::new(),
        })
    }
}

/// A captured message as persisted by the store.
///
/// Producer-defined fields the model does not know about are kept in `extra` and written
/// back unchanged.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Message {
    #[serde(rename = "ID")]
    pub id: MessageId,
    #[serde(rename = "From")]
    pub from: Option<Path>,
    #[serde(rename = "To", default)]
    pub to: Vec<Path>,
    #[serde(rename = "Content", default)]
    pub content: Content,
    #[serde(rename = "Created")]
    pub created: DateTime<Utc>,
    #[serde(rename = "Raw")]
    pub raw: Envelope,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

impl Message {
    /// A message carrying only identity, timestamp and envelope; paths and content left empty.
    pub fn new(id: impl Into<MessageId>, created: DateTime<Utc>, raw: Envelope) -> Self {
        Self {
            id: id.into(),
            from: None,
            to: Vec::new(),
            content: Content::default(),
            created,
            raw,
            extra: Map::new(),
        }
    }
}
