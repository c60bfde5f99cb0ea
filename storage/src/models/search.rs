//! Search parameters and results.

use mail_core::Message;
use serde::{Deserialize, Serialize};

use crate::error::StorageError;

/// Which envelope field a search matches against.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SearchKind {
    /// `RCPT TO` addresses (`Raw.To`); each address is matched on its own.
    Recipient,
    /// `MAIL FROM` address (`Raw.From`).
    Sender,
    /// Raw DATA (`Raw.Data`).
    #[default]
    Body,
}

impl SearchKind {
    /// Maps an admin-facing selector to a kind. Anything unrecognised searches the body.
    pub fn parse(selector: &str) -> Self {
        match selector.trim().to_ascii_lowercase().as_str() {
            "to" | "recipient" => SearchKind::Recipient,
            "from" | "sender" => SearchKind::Sender,
            _ => SearchKind::Body,
        }
    }

    /// JSON path of the matched field inside the stored document.
    pub fn json_path(self) -> &'static str {
        match self {
            SearchKind::Recipient => "$.Raw.To",
            SearchKind::Sender => "$.Raw.From",
            SearchKind::Body => "$.Raw.Data",
        }
    }
}

impl From<&str> for SearchKind {
    fn from(selector: &str) -> Self {
        SearchKind::parse(selector)
    }
}

/// One page of search results plus the total match count across all pages.
///
/// The page and the total come from two separate statements; `total` can fail on its own
/// (the page is still usable) and may disagree with the page if writes land in between.
#[derive(Debug)]
pub struct SearchPage {
    pub messages: Vec<Message>,
    pub total: Result<u64, StorageError>,
}

impl SearchPage {
    /// Total as a signed count, `-1` when it could not be computed.
    pub fn total_or_sentinel(&self) -> i64 {
        match &self.total {
            Ok(total) => i64::try_from(*total).unwrap_or(i64::MAX),
            Err(_) => -1,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_selectors() {
        assert_eq!(SearchKind::parse("to"), SearchKind::Recipient);
        assert_eq!(SearchKind::parse("Recipient"), SearchKind::Recipient);
        assert_eq!(SearchKind::parse("from"), SearchKind::Sender);
        assert_eq!(SearchKind::parse("containing"), SearchKind::Body);
        assert_eq!(SearchKind::parse("subject"), SearchKind::Body);
        assert_eq!(SearchKind::from(""), SearchKind::Body);
    }

    #[test]
    fn test_json_paths() {
        assert_eq!(SearchKind::Recipient.json_path(), "$.Raw.To");
        assert_eq!(SearchKind::Sender.json_path(), "$.Raw.From");
        assert_eq!(SearchKind::Body.json_path(), "$.Raw.Data");
    }

    #[test]
    fn test_total_sentinel() {
        let page = SearchPage {
            messages: Vec::new(),
            total: Ok(7),
        };
        assert_eq!(page.total_or_sentinel(), 7);

        let failed = SearchPage {
            messages: Vec::new(),
            total: Err(StorageError::NotFound("count".to_string())),
        };
        assert_eq!(failed.total_or_sentinel(), -1);
    }
}
