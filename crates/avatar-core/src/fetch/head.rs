//! Incremental response-head parsing fed from curl's header callback.

/// Status and the few headers the fetcher acts on.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ResponseHead {
    pub status: u32,
    pub content_type: Option<String>,
    pub content_length: Option<u64>,
    pub location: Option<String>,
}

impl ResponseHead {
    pub fn is_success(&self) -> bool {
        (200..300).contains(&self.status)
    }

    pub fn is_redirect(&self) -> bool {
        matches!(self.status, 301 | 302 | 303 | 307 | 308)
    }

    /// True when the response carries no body to store.
    pub fn has_no_body(&self) -> bool {
        matches!(self.status, 204 | 205) || self.content_length == Some(0)
    }
}

/// Accumulates header lines and keeps the most recent final (non-1xx) block.
///
/// curl reports every header block it sees: interim 1xx responses and, when
/// tunnelling through a proxy, the proxy's answer to CONNECT. Only the block
/// still current when the body starts (or the transfer ends) is the response.
#[derive(Debug, Default)]
pub(crate) struct HeadCollector {
    current: Option<ResponseHead>,
    last: Option<ResponseHead>,
}

impl HeadCollector {
    /// Feed one raw line as curl delivers it (status line, header, or the
    /// terminating blank line).
    pub fn push_line(&mut self, raw: &[u8]) {
        let line = String::from_utf8_lossy(raw);
        let line = line.trim();

        if line.starts_with("HTTP/") {
            self.current = Some(ResponseHead {
                status: parse_status(line).unwrap_or(0),
                ..ResponseHead::default()
            });
            return;
        }

        if line.is_empty() {
            if let Some(head) = self.current.take() {
                if !(100..200).contains(&head.status) {
                    self.last = Some(head);
                }
            }
            return;
        }

        let Some(head) = self.current.as_mut() else {
            return;
        };
        let Some((name, value)) = line.split_once(':') else {
            return;
        };
        let name = name.trim();
        let value = value.trim();
        if name.eq_ignore_ascii_case("content-type") {
            head.content_type = Some(value.to_string());
        } else if name.eq_ignore_ascii_case("content-length") {
            head.content_length = value.parse::<u64>().ok();
        } else if name.eq_ignore_ascii_case("location") {
            head.location = Some(value.to_string());
        }
    }

    /// The last complete final block, if any.
    pub fn take_final(&mut self) -> Option<ResponseHead> {
        self.last.take()
    }
}

fn parse_status(line: &str) -> Option<u32> {
    line.split_whitespace().nth(1)?.parse().ok()
}
