//! Message dispatch through a messaging-app deep-link
//!
//! Orders and chat inquiries leave the storefront as a pre-filled
//! conversation link: `<base>/<phone>?text=<escaped body>`. Opening the link
//! is fire-and-forget; no delivery signal ever comes back. Each dispatch
//! still emits a log-only [`Receipt`] so an operator can correlate what was
//! handed off.

use crate::config::DispatchMode;
use chrono::{DateTime, Utc};
use serde::Serialize;
use std::fmt;
use std::process::{Child, ExitStatus};
use std::sync::{Arc, Mutex};
use std::thread::JoinHandle;
use ulid::Ulid;

/// Default messaging deep-link base
pub const DEFAULT_BASE_URL: &str = "https://wa.me";

/// What a dispatched message represents
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum MessageKind {
    /// Checkout order built from the cart
    Order,
    /// Lead-capture inquiry from the guided chat
    Inquiry,
}

impl fmt::Display for MessageKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Order => write!(f, "order"),
            Self::Inquiry => write!(f, "inquiry"),
        }
    }
}

/// Where dispatched messages are delivered
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Destination<'a> {
    pub base_url: &'a str,
    pub phone: &'a str,
}

impl<'a> Destination<'a> {
    pub fn link(&self, kind: MessageKind, body: impl Into<String>) -> DispatchLink {
        DispatchLink::new(kind, self.base_url, self.phone, body)
    }
}

/// A fully built deep-link plus the plain message it carries
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct DispatchLink {
    pub kind: MessageKind,
    pub phone: String,
    pub body: String,
    pub url: String,
}

impl DispatchLink {
    /// Build a link for `body` addressed to `phone`
    ///
    /// # Examples
    ///
    /// ```
    /// use ecopure::dispatch::{DispatchLink, MessageKind};
    ///
    /// let link = DispatchLink::new(MessageKind::Order, "https://wa.me", "918317581308", "Hi there!");
    /// assert_eq!(link.url, "https://wa.me/918317581308?text=Hi%20there!");
    /// ```
    pub fn new(kind: MessageKind, base_url: &str, phone: &str, body: impl Into<String>) -> Self {
        let body = body.into();
        let url = deep_link(base_url, phone, &body);
        Self {
            kind,
            phone: phone.to_string(),
            body,
            url,
        }
    }
}

/// `<base>/<phone>?text=<escaped body>`
pub fn deep_link(base_url: &str, phone: &str, body: &str) -> String {
    format!(
        "{}/{}?text={}",
        base_url.trim_end_matches('/'),
        phone,
        encode_uri_component(body)
    )
}

/// Percent-encode with `encodeURIComponent` semantics
///
/// Unreserved characters `A-Z a-z 0-9 - _ . ! ~ * ' ( )` pass through;
/// every other byte of the UTF-8 encoding becomes `%XX`.
///
/// # Examples
///
/// ```
/// use ecopure::dispatch::encode_uri_component;
///
/// assert_eq!(encode_uri_component("a b&c"), "a%20b%26c");
/// assert_eq!(encode_uri_component("₹"), "%E2%82%B9");
/// ```
pub fn encode_uri_component(input: &str) -> String {
    let mut out = String::with_capacity(input.len() * 3);
    for byte in input.bytes() {
        match byte {
            b'A'..=b'Z'
            | b'a'..=b'z'
            | b'0'..=b'9'
            | b'-'
            | b'_'
            | b'.'
            | b'!'
            | b'~'
            | b'*'
            | b'\''
            | b'('
            | b')' => out.push(byte as char),
            _ => out.push_str(&format!("%{:02X}", byte)),
        }
    }
    out
}

/// Reverse of [`encode_uri_component`]
///
/// Malformed escapes are kept literally. Invalid UTF-8 is replaced lossily.
pub fn decode_uri_component(input: &str) -> String {
    let bytes = input.as_bytes();
    let mut out = Vec::with_capacity(bytes.len());
    let mut i = 0;
    while i < bytes.len() {
        if bytes[i] == b'%' && i + 2 < bytes.len() {
            let decoded = std::str::from_utf8(&bytes[i + 1..i + 3])
                .ok()
                .and_then(|hex| u8::from_str_radix(hex, 16).ok());
            if let Some(byte) = decoded {
                out.push(byte);
                i += 3;
                continue;
            }
        }
        out.push(bytes[i]);
        i += 1;
    }
    String::from_utf8_lossy(&out).into_owned()
}

/// Extract and decode the `text` query parameter of a deep-link
pub fn decoded_text(url: &str) -> Option<String> {
    let (_, query) = url.split_once('?')?;
    query
        .split('&')
        .find_map(|pair| pair.strip_prefix("text="))
        .map(decode_uri_component)
}

/// Something that can open a deep-link in the external messaging app
///
/// Implementations must not block and must not report failure to the
/// caller: the contract has no acknowledgment channel.
pub trait Dispatcher: Send + Sync {
    fn dispatch(&self, link: &DispatchLink);
}

/// Opens links with the platform's URL opener in a new process
#[derive(Debug, Default, Clone)]
pub struct BrowserDispatcher;

impl BrowserDispatcher {
    pub fn new() -> Self {
        Self
    }

    fn opener(url: &str) -> std::process::Command {
        if cfg!(target_os = "macos") {
            let mut cmd = std::process::Command::new("open");
            cmd.arg(url);
            cmd
        } else if cfg!(target_os = "windows") {
            let mut cmd = std::process::Command::new("cmd");
            cmd.args(["/C", "start", "", url]);
            cmd
        } else {
            let mut cmd = std::process::Command::new("xdg-open");
            cmd.arg(url);
            cmd
        }
    }
}

impl Dispatcher for BrowserDispatcher {
    fn dispatch(&self, link: &DispatchLink) {
        let spawned = Self::opener(&link.url)
            .stdin(std::process::Stdio::null())
            .stdout(std::process::Stdio::null())
            .stderr(std::process::Stdio::null())
            .spawn();
        match spawned {
            Ok(child) => {
                reap(child);
            }
            Err(e) => tracing::warn!("Could not launch URL opener: {}", e),
        }
    }
}

/// Wait for `child` on a detached thread so it never lingers as a zombie
fn reap(mut child: Child) -> JoinHandle<Option<ExitStatus>> {
    std::thread::spawn(move || match child.wait() {
        Ok(status) => {
            if !status.success() {
                tracing::warn!("URL opener exited with {}", status);
            }
            Some(status)
        }
        Err(e) => {
            tracing::warn!("Could not wait for URL opener: {}", e);
            None
        }
    })
}

/// Prints the link and the plain message to stdout
#[derive(Debug, Default, Clone)]
pub struct PrintDispatcher;

impl Dispatcher for PrintDispatcher {
    fn dispatch(&self, link: &DispatchLink) {
        use colored::Colorize;

        println!("\n{}", format!("Open this link to send your {}:", link.kind).bold());
        println!("{}\n", link.url.cyan());
        println!("{}", "Message preview:".bold());
        println!("{}\n", link.body);
    }
}

/// Keeps dispatched links in memory
///
/// Used for dry runs and tests; the recorded links can be inspected after
/// the flow finishes.
#[derive(Debug, Default)]
pub struct RecordingDispatcher {
    links: Mutex<Vec<DispatchLink>>,
}

impl RecordingDispatcher {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn links(&self) -> Vec<DispatchLink> {
        self.links
            .lock()
            .map(|links| links.clone())
            .unwrap_or_default()
    }

    pub fn last(&self) -> Option<DispatchLink> {
        self.links().pop()
    }
}

impl Dispatcher for RecordingDispatcher {
    fn dispatch(&self, link: &DispatchLink) {
        if let Ok(mut links) = self.links.lock() {
            links.push(link.clone());
        }
    }
}

/// Log-only record of a hand-off to the dispatcher
#[derive(Debug, Clone, Serialize)]
pub struct Receipt {
    pub reference: Ulid,
    pub kind: MessageKind,
    pub item_count: usize,
    pub total: u64,
    pub dispatched_at: DateTime<Utc>,
}

/// Hand `link` to `dispatcher` and log a receipt for it
pub fn send(
    dispatcher: &dyn Dispatcher,
    link: &DispatchLink,
    item_count: usize,
    total: u64,
) -> Receipt {
    let receipt = Receipt {
        reference: Ulid::new(),
        kind: link.kind,
        item_count,
        total,
        dispatched_at: Utc::now(),
    };
    dispatcher.dispatch(link);
    tracing::info!(
        reference = %receipt.reference,
        kind = %receipt.kind,
        items = receipt.item_count,
        total = receipt.total,
        at = %receipt.dispatched_at.to_rfc3339(),
        "Message handed to dispatcher"
    );
    receipt
}

/// Create the dispatcher for a configured mode
///
/// # Examples
///
/// ```
/// use ecopure::config::DispatchMode;
/// use ecopure::dispatch::{create_dispatcher, DispatchLink, Dispatcher, MessageKind};
///
/// let dispatcher = create_dispatcher(DispatchMode::Record);
/// dispatcher.dispatch(&DispatchLink::new(MessageKind::Inquiry, "https://wa.me", "91", "hi"));
/// ```
pub fn create_dispatcher(mode: DispatchMode) -> Arc<dyn Dispatcher> {
    tracing::debug!("Using {} dispatcher", mode);
    match mode {
        DispatchMode::Browser => Arc::new(BrowserDispatcher::new()),
        DispatchMode::Print => Arc::new(PrintDispatcher),
        DispatchMode::Record => Arc::new(RecordingDispatcher::new()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[cfg(unix)]
    #[test]
    fn test_reap_waits_for_child() {
        let child = std::process::Command::new("true").spawn().unwrap();
        let status = reap(child).join().unwrap();
        assert!(status.unwrap().success());
    }

    #[cfg(unix)]
    #[test]
    fn test_reap_reports_failed_opener() {
        let child = std::process::Command::new("false").spawn().unwrap();
        let status = reap(child).join().unwrap();
        assert!(!status.unwrap().success());
    }

    #[test]
    fn test_encode_keeps_unreserved() {
        let unreserved = "AZaz09-_.!~*'()";
        assert_eq!(encode_uri_component(unreserved), unreserved);
    }

    #[test]
    fn test_encode_reserved_and_whitespace() {
        assert_eq!(
            encode_uri_component("Name: A/B?\n#1"),
            "Name%3A%20A%2FB%3F%0A%231"
        );
    }

    #[test]
    fn test_encode_multibyte() {
        assert_eq!(encode_uri_component("🛒"), "%F0%9F%9B%92");
        assert_eq!(encode_uri_component("’"), "%E2%80%99");
    }

    #[test]
    fn test_decode_reverses_encode() {
        let text = "*Total Amount: ₹450*\n- SUCHI’S (250 ml)";
        assert_eq!(decode_uri_component(&encode_uri_component(text)), text);
    }

    #[test]
    fn test_decode_keeps_malformed_escape() {
        assert_eq!(decode_uri_component("100%"), "100%");
        assert_eq!(decode_uri_component("%zz"), "%zz");
    }

    #[test]
    fn test_deep_link_trims_trailing_slash() {
        assert_eq!(
            deep_link("https://wa.me/", "918317581308", "hi"),
            "https://wa.me/918317581308?text=hi"
        );
    }

    #[test]
    fn test_decoded_text_from_link() {
        let link = DispatchLink::new(MessageKind::Inquiry, DEFAULT_BASE_URL, "91", "a & b");
        assert_eq!(decoded_text(&link.url).as_deref(), Some("a & b"));
    }

    #[test]
    fn test_recording_dispatcher_keeps_order() {
        let dispatcher = RecordingDispatcher::new();
        let a = DispatchLink::new(MessageKind::Order, DEFAULT_BASE_URL, "91", "a");
        let b = DispatchLink::new(MessageKind::Inquiry, DEFAULT_BASE_URL, "91", "b");
        dispatcher.dispatch(&a);
        dispatcher.dispatch(&b);
        assert_eq!(dispatcher.links(), vec![a, b.clone()]);
        assert_eq!(dispatcher.last(), Some(b));
    }

    #[test]
    fn test_send_returns_receipt_and_dispatches() {
        let dispatcher = RecordingDispatcher::new();
        let link = DispatchLink::new(MessageKind::Order, DEFAULT_BASE_URL, "91", "order");
        let receipt = send(&dispatcher, &link, 2, 900);
        assert_eq!(receipt.kind, MessageKind::Order);
        assert_eq!(receipt.item_count, 2);
        assert_eq!(receipt.total, 900);
        assert_eq!(dispatcher.links().len(), 1);
    }
}
