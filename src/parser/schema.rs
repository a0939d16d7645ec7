// Hierarchy schema - which keywords are legal at each nesting level
//
// Levels form a fixed tree. A branch keyword opens a child object; when the
// branch has alternatives, the value just read selects the child level.

/// Shape of the object built while a level is open
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ScopeKind {
    Document,
    HardwareType,
    AbstractType,
    Manufacturer,
    Device,
}

/// Cardinality of a keyword at one level, or the branch it opens
#[derive(Debug)]
pub enum Marker {
    RequiredOnce,
    OptionalOnce,
    OptionalRepeated,
    RequiredRepeated,
    Branch(&'static Branch),
}

impl Marker {
    pub fn is_required(&self) -> bool {
        matches!(self, Marker::RequiredOnce | Marker::RequiredRepeated)
    }

    pub fn is_repeated(&self) -> bool {
        matches!(self, Marker::OptionalRepeated | Marker::RequiredRepeated)
    }
}

#[derive(Debug)]
pub struct Level {
    /// Human-readable name, used in error messages
    pub name: &'static str,
    pub scope: ScopeKind,
    pub fields: &'static [(&'static str, Marker)],
}

impl Level {
    pub fn marker(&self, keyword: &str) -> Option<&'static Marker> {
        self.fields
            .iter()
            .find(|(name, _)| *name == keyword)
            .map(|(_, marker)| marker)
    }

    pub fn required_fields(&self) -> impl Iterator<Item = &'static str> {
        self.fields
            .iter()
            .filter(|(_, marker)| marker.is_required())
            .map(|(name, _)| *name)
    }
}

#[derive(Debug)]
pub struct Branch {
    /// Field on the parent collecting the children
    pub collection: &'static str,
    /// Field on each child holding the branching keyword's value
    pub key: &'static str,
    pub children: Children,
}

#[derive(Debug)]
pub enum Children {
    Single(&'static Level),
    Alternatives(&'static [Alternative]),
}

#[derive(Debug)]
pub struct Alternative {
    pub guard: &'static [&'static str],
    pub level: &'static Level,
}

impl Branch {
    /// Child level selected by the branching value
    pub fn select(&self, value: &str) -> Option<&'static Level> {
        match &self.children {
            Children::Single(level) => Some(*level),
            Children::Alternatives(alternatives) => alternatives
                .iter()
                .find(|alt| alt.guard.contains(&value))
                .map(|alt| alt.level),
        }
    }
}

/// Device types holding manufacturers and devices
pub const HARDWARE_TYPES: &[&str] = &["scanner", "stillcam", "vidcam"];

/// Device types describing an API or a meta backend
pub const ABSTRACT_TYPES: &[&str] = &["api", "meta"];

pub static ROOT: Level = Level {
    name: "backend",
    scope: ScopeKind::Document,
    fields: &[
        ("backend", Marker::RequiredOnce),
        ("version", Marker::OptionalOnce),
        ("new", Marker::OptionalOnce),
        ("manpage", Marker::OptionalOnce),
        ("url", Marker::OptionalRepeated),
        ("comment", Marker::OptionalOnce),
        ("devicetype", Marker::Branch(&DEVICETYPE)),
    ],
};

static DEVICETYPE: Branch = Branch {
    collection: "types",
    key: "type",
    children: Children::Alternatives(&[
        Alternative {
            guard: HARDWARE_TYPES,
            level: &HARDWARE,
        },
        Alternative {
            guard: ABSTRACT_TYPES,
            level: &ABSTRACT,
        },
    ]),
};

static HARDWARE: Level = Level {
    name: "devicetype",
    scope: ScopeKind::HardwareType,
    fields: &[("mfg", Marker::Branch(&MFG))],
};

static ABSTRACT: Level = Level {
    name: "devicetype",
    scope: ScopeKind::AbstractType,
    fields: &[
        ("desc", Marker::RequiredOnce),
        ("url", Marker::RequiredRepeated),
        ("comment", Marker::OptionalOnce),
    ],
};

static MFG: Branch = Branch {
    collection: "manufacturers",
    key: "name",
    children: Children::Single(&MANUFACTURER),
};

static MANUFACTURER: Level = Level {
    name: "mfg",
    scope: ScopeKind::Manufacturer,
    fields: &[
        ("url", Marker::OptionalRepeated),
        ("comment", Marker::OptionalOnce),
        ("model", Marker::Branch(&MODEL)),
    ],
};

static MODEL: Branch = Branch {
    collection: "devices",
    key: "name",
    children: Children::Single(&DEVICE),
};

static DEVICE: Level = Level {
    name: "model",
    scope: ScopeKind::Device,
    fields: &[
        ("status", Marker::RequiredOnce),
        ("interface", Marker::OptionalOnce),
        ("scsi", Marker::OptionalOnce),
        ("usbid", Marker::OptionalOnce),
        ("url", Marker::OptionalRepeated),
        ("comment", Marker::OptionalOnce),
    ],
};
