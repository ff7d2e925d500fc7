/// URL fragment parsing and generation
///
/// Grammar: `albumId[/page][/debug]`, optionally prefixed by `#` and `/`.
/// The album id is percent-decoded; the page is one or more ASCII digits;
/// `debug` may only appear as the last segment.

use percent_encoding::{percent_decode_str, utf8_percent_encode, AsciiSet, CONTROLS};
use thiserror::Error;

/// The only non-numeric token allowed after the album id
const DEBUG_TOKEN: &str = "debug";

/// Characters escaped when an album id is written back into a fragment.
/// `/` is escaped so that nested album ids stay a single segment.
const ALBUM_ID_ESCAPES: &AsciiSet = &CONTROLS
    .add(b' ')
    .add(b'"')
    .add(b'#')
    .add(b'%')
    .add(b'/')
    .add(b'<')
    .add(b'>')
    .add(b'?')
    .add(b'`')
    .add(b'{')
    .add(b'}');

/// Where the user wants to be: an album, a page in it (0 = index) and
/// whether debug mode is on. A fresh value is produced for every
/// navigation event.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct NavigationTarget {
    /// Decoded album id (e.g. "2014/trip")
    pub album_id: String,
    /// Page number, 0 for the album index, 1..N for photos
    pub page: u32,
    /// Debug mode flag, carried through every generated link
    pub debug: bool,
}

/// Why a fragment could not be parsed
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum FragmentError {
    #[error("fragment is empty")]
    Empty,

    #[error("album id is empty")]
    EmptyAlbumId,

    #[error("album id is not valid UTF-8 once decoded")]
    BadEncoding,

    #[error("invalid page number `{0}`")]
    BadPage(String),

    #[error("unexpected token `{0}`")]
    UnexpectedToken(String),

    #[error("too many segments ({0})")]
    TooManySegments(usize),
}

/// Parse a URL fragment into a navigation target.
///
/// Accepts `#/trip/2`, `/trip/2` and `trip/2` alike. Pure: no I/O, no state.
pub fn parse(fragment: &str) -> Result<NavigationTarget, FragmentError> {
    let body = fragment.strip_prefix('#').unwrap_or(fragment);
    let body = body.strip_prefix('/').unwrap_or(body);
    if body.is_empty() {
        return Err(FragmentError::Empty);
    }

    let segments: Vec<&str> = body.split('/').collect();
    let album_id = decode_album_id(segments[0])?;

    let (page, debug) = match segments[1..] {
        [] => (0, false),
        [DEBUG_TOKEN] => (0, true),
        [page] => (parse_page(page)?, false),
        [page, last] => {
            let page = parse_page(page)?;
            if last != DEBUG_TOKEN {
                return Err(FragmentError::UnexpectedToken(last.to_string()));
            }
            (page, true)
        }
        _ => return Err(FragmentError::TooManySegments(segments.len())),
    };

    Ok(NavigationTarget {
        album_id,
        page,
        debug,
    })
}

fn decode_album_id(raw: &str) -> Result<String, FragmentError> {
    let decoded = percent_decode_str(raw)
        .decode_utf8()
        .map_err(|_| FragmentError::BadEncoding)?;
    if decoded.is_empty() {
        return Err(FragmentError::EmptyAlbumId);
    }
    Ok(decoded.into_owned())
}

fn parse_page(token: &str) -> Result<u32, FragmentError> {
    if token.is_empty() || !token.bytes().all(|b| b.is_ascii_digit()) {
        return Err(FragmentError::BadPage(token.to_string()));
    }
    token
        .parse()
        .map_err(|_| FragmentError::BadPage(token.to_string()))
}

impl NavigationTarget {
    /// Create a target for the given album and page, debug off
    pub fn new(album_id: impl Into<String>, page: u32) -> Self {
        Self {
            album_id: album_id.into(),
            page,
            debug: false,
        }
    }

    /// Same album and debug mode, different page
    pub fn with_page(&self, page: u32) -> Self {
        Self {
            album_id: self.album_id.clone(),
            page,
            debug: self.debug,
        }
    }

    /// Same location with debug mode switched off
    pub fn without_debug(&self) -> Self {
        Self {
            debug: false,
            ..self.clone()
        }
    }

    /// Is this the album index rather than a photo page?
    pub fn is_index(&self) -> bool {
        self.page == 0
    }

    /// Render the target back into a fragment (`#/trip/2/debug`).
    /// `parse(target.to_fragment())` yields `target` again.
    pub fn to_fragment(&self) -> String {
        let mut fragment = format!(
            "#/{}",
            utf8_percent_encode(&self.album_id, ALBUM_ID_ESCAPES)
        );
        if self.page != 0 {
            fragment.push('/');
            fragment.push_str(&self.page.to_string());
        }
        if self.debug {
            fragment.push('/');
            fragment.push_str(DEBUG_TOKEN);
        }
        fragment
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_album_only() {
        let target = parse("#/trip").unwrap();
        assert_eq!(target, NavigationTarget::new("trip", 0));
        assert!(target.is_index());
    }

    #[test]
    fn test_prefix_variants_are_equivalent() {
        let expected = NavigationTarget::new("trip", 2);
        assert_eq!(parse("#/trip/2").unwrap(), expected);
        assert_eq!(parse("/trip/2").unwrap(), expected);
        assert_eq!(parse("trip/2").unwrap(), expected);
    }

    #[test]
    fn test_debug_forms() {
        let index = parse("#/trip/debug").unwrap();
        assert_eq!(index.page, 0);
        assert!(index.debug);

        let photo = parse("#/trip/12/debug").unwrap();
        assert_eq!(photo.page, 12);
        assert!(photo.debug);
    }

    #[test]
    fn test_album_id_is_percent_decoded() {
        let target = parse("#/2014%2Fsummer%20trip/3").unwrap();
        assert_eq!(target.album_id, "2014/summer trip");
        assert_eq!(target.page, 3);
    }

    #[test]
    fn test_malformed_fragments() {
        assert_eq!(parse(""), Err(FragmentError::Empty));
        assert_eq!(parse("#"), Err(FragmentError::Empty));
        assert_eq!(parse("#/"), Err(FragmentError::Empty));
        assert_eq!(parse("#//2"), Err(FragmentError::EmptyAlbumId));
        assert_eq!(parse("#/trip/x"), Err(FragmentError::BadPage("x".into())));
        assert_eq!(parse("#/trip/-1"), Err(FragmentError::BadPage("-1".into())));
        assert_eq!(parse("#/trip/+1"), Err(FragmentError::BadPage("+1".into())));
        assert_eq!(parse("#/trip/"), Err(FragmentError::BadPage("".into())));
        assert_eq!(
            parse("#/trip/2/extra"),
            Err(FragmentError::UnexpectedToken("extra".into()))
        );
        assert_eq!(
            parse("#/trip/2/debug/more"),
            Err(FragmentError::TooManySegments(4))
        );
        assert_eq!(parse("#/%FF"), Err(FragmentError::BadEncoding));
    }

    #[test]
    fn test_debug_must_be_last() {
        assert!(parse("#/trip/debug/2").is_err());
        assert!(parse("#/trip/debug/debug").is_err());
    }

    #[test]
    fn test_page_overflow_is_malformed() {
        assert!(matches!(
            parse("#/trip/99999999999"),
            Err(FragmentError::BadPage(_))
        ));
    }

    #[test]
    fn test_to_fragment() {
        assert_eq!(NavigationTarget::new("trip", 0).to_fragment(), "#/trip");
        assert_eq!(NavigationTarget::new("trip", 4).to_fragment(), "#/trip/4");

        let mut target = NavigationTarget::new("2014/summer trip", 1);
        target.debug = true;
        let fragment = target.to_fragment();
        assert_eq!(fragment, "#/2014%2Fsummer%20trip/1/debug");
        assert_eq!(parse(&fragment).unwrap(), target);
        assert_eq!(target.without_debug().to_fragment(), "#/2014%2Fsummer%20trip/1");
    }
}
