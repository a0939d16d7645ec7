// Field catalog - the value kind of every recognized keyword

/// Legal values of `:new`
pub const NEW_VALUES: &[&str] = &["yes", "no"];

/// Legal values of `:devicetype`
pub const DEVICE_TYPES: &[&str] = &["scanner", "stillcam", "vidcam", "api", "meta"];

/// Legal values of `:status`
pub const STATUSES: &[&str] = &[
    "minimal",
    "basic",
    "good",
    "complete",
    "untested",
    "unsupported",
];

/// Shape of the value that follows a keyword
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ValueKind {
    /// A second keyword drawn from a closed set
    Keyword(&'static [&'static str]),
    /// One quoted string or bareword
    Text,
    /// One or more strings up to the end of the line
    TextList,
}

static FIELDS: &[(&str, ValueKind)] = &[
    ("backend", ValueKind::Text),
    ("version", ValueKind::Text),
    ("new", ValueKind::Keyword(NEW_VALUES)),
    ("manpage", ValueKind::Text),
    ("url", ValueKind::Text),
    ("comment", ValueKind::TextList),
    ("devicetype", ValueKind::Keyword(DEVICE_TYPES)),
    ("desc", ValueKind::Text),
    ("mfg", ValueKind::Text),
    ("model", ValueKind::Text),
    ("status", ValueKind::Keyword(STATUSES)),
    ("interface", ValueKind::Text),
    ("usbid", ValueKind::TextList),
    ("scsi", ValueKind::TextList),
];

/// Look up the value kind of a keyword (without its sigil)
pub fn lookup(keyword: &str) -> Option<ValueKind> {
    FIELDS
        .iter()
        .find(|(name, _)| *name == keyword)
        .map(|(_, kind)| *kind)
}

/// All keywords known to the catalog, in declaration order
pub fn keywords() -> impl Iterator<Item = &'static str> {
    FIELDS.iter().map(|(name, _)| *name)
}
