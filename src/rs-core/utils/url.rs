use std::fmt::Display;

/// Extension identifying an HLS Multivariant Playlist, the only adaptive format the
/// adaptive engine is asked to handle.
const ADAPTIVE_MANIFEST_EXTENSION: &str = "m3u8";

/// Abstraction allowing to help with the handling of URLs
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Url {
    inner: String,
}

impl Url {
    pub fn new(url: String) -> Self {
        Self { inner: url }
    }

    /// Resolve `relative_url` against the directory of `base_url`.
    ///
    /// Absolute URLs are returned untouched. Root-relative URLs (starting with `/`) are
    /// resolved against the domain of `base_url` when it has one.
    pub fn from_relative(base_url: &Url, relative_url: Url) -> Self {
        if relative_url.is_absolute() || base_url.inner.is_empty() {
            return relative_url;
        }
        if relative_url.inner.starts_with('/') {
            let complete_url = match base_url.domain_name() {
                Some(base_domain) => format!("{}{}", base_domain, relative_url),
                None => relative_url.inner,
            };
            return Url {
                inner: complete_url,
            };
        }
        let parsed = strip_query_and_fragment(&base_url.inner);
        let dir = match base_url.domain_name() {
            Some(domain) if parsed.len() <= domain.len() => Some(domain),
            _ => parsed.rfind('/').map(|idx| &parsed[0..idx]),
        };
        match dir {
            Some(dir) => Url {
                inner: format!("{}/{}", dir, relative_url),
            },
            None => relative_url,
        }
    }

    pub fn get_ref(&self) -> &str {
        self.inner.as_str()
    }

    pub fn domain_name(&self) -> Option<&str> {
        url_domain_name(&self.inner)
    }

    pub fn is_absolute(&self) -> bool {
        is_absolute_url(self.inner.as_bytes())
    }

    /// Returns `true` if this URL points to a manifest that should be played through the
    /// adaptive engine rather than natively by the media element.
    pub fn is_adaptive_manifest(&self) -> bool {
        self.extension()
            .eq_ignore_ascii_case(ADAPTIVE_MANIFEST_EXTENSION)
    }

    pub fn filename(&self) -> &str {
        let parsed = strip_query_and_fragment(&self.inner);
        match parsed.rfind('/') {
            Some(idx) => &parsed[idx + 1..],
            None => parsed,
        }
    }

    pub fn extension(&self) -> &str {
        let filename = self.filename();
        match filename.rfind('.') {
            Some(idx) => &filename[idx + 1..],
            None => "",
        }
    }
}

impl Display for Url {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.get_ref())
    }
}

fn strip_query_and_fragment(url: &str) -> &str {
    let parsed = match url.find('#') {
        Some(idx) => &url[0..idx],
        None => url,
    };
    match parsed.find('?') {
        Some(idx) => &parsed[0..idx],
        None => parsed,
    }
}

fn is_absolute_url(bytes: &[u8]) -> bool {
    let mut offset = 0;
    loop {
        if bytes.len() < offset + 1 {
            return false;
        }
        if bytes[offset].is_ascii_alphabetic() {
            offset += 1;
            continue;
        } else if bytes[offset] == b':' {
            if offset == 0 {
                return false;
            }
            offset += 1;
            break;
        } else {
            return false;
        }
    }

    bytes.len() >= offset + 2 && &bytes[offset..offset + 2] == b"//"
}

fn url_domain_name(url: &str) -> Option<&str> {
    if !is_absolute_url(url.as_bytes()) {
        return None;
    }
    let scheme_end = url.find("//")? + 2;
    match url[scheme_end..].find('/') {
        Some(path_start) => Some(&url[0..scheme_end + path_start]),
        None => Some(url),
    }
}
