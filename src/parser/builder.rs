// Document builder - stack machine assembling the typed tree from lexed tokens
//
// Each frame pairs a schema level with the object being built at that depth.
// A keyword that is not legal at the current level closes scopes until an
// ancestor accepts it, so line order alone decides the tree shape.

use super::ast::*;
use super::error::ParseErrorKind;
use super::lexer::{Token, Value};
use super::schema::{self, Level, Marker, ScopeKind};
use std::collections::HashMap;
use tracing::{debug, trace};

/// Plain field values collected on an open scope
#[derive(Debug, Default)]
struct Fields {
    values: HashMap<String, Slot>,
}

#[derive(Debug)]
enum Slot {
    Single(Value),
    Repeated(Vec<Value>),
}

impl Fields {
    fn contains(&self, keyword: &str) -> bool {
        self.values.contains_key(keyword)
    }

    fn set(&mut self, keyword: String, value: Value, marker: &Marker) -> Result<(), ParseErrorKind> {
        match self.values.get_mut(&keyword) {
            Some(Slot::Repeated(values)) if marker.is_repeated() => {
                values.push(value);
                Ok(())
            }
            Some(_) => Err(ParseErrorKind::DuplicateKeyword(keyword)),
            None => {
                let slot = if marker.is_repeated() {
                    Slot::Repeated(vec![value])
                } else {
                    Slot::Single(value)
                };
                self.values.insert(keyword, slot);
                Ok(())
            }
        }
    }

    fn take(&mut self, keyword: &str) -> Option<Value> {
        match self.values.remove(keyword)? {
            Slot::Single(value) => Some(value),
            Slot::Repeated(values) => Some(Value::TextList(
                values.into_iter().map(Value::into_text).collect(),
            )),
        }
    }

    fn text(&mut self, keyword: &str) -> Option<String> {
        self.take(keyword).map(Value::into_text)
    }

    fn list(&mut self, keyword: &str) -> Vec<String> {
        self.take(keyword).map(Value::into_list).unwrap_or_default()
    }

    fn required_text(&mut self, level: &Level, keyword: &str) -> Result<String, ParseErrorKind> {
        self.text(keyword).ok_or_else(|| missing(level, keyword))
    }
}

fn missing(level: &Level, field: &str) -> ParseErrorKind {
    ParseErrorKind::MissingRequiredField {
        level: level.name.to_string(),
        field: field.to_string(),
    }
}

/// Object under construction, one variant per schema scope
#[derive(Debug)]
enum Scope {
    Document {
        fields: Fields,
        types: Vec<DeviceType>,
    },
    HardwareType {
        category: DeviceCategory,
        manufacturers: Vec<Manufacturer>,
    },
    AbstractType {
        category: DeviceCategory,
        fields: Fields,
    },
    Manufacturer {
        name: String,
        fields: Fields,
        devices: Vec<Device>,
    },
    Device {
        name: String,
        fields: Fields,
    },
}

/// A scope that passed validation, ready to be attached to its parent
enum Closed {
    Document(Document),
    Type(DeviceType),
    Manufacturer(Manufacturer),
    Device(Device),
}

impl Closed {
    fn describe(&self) -> &'static str {
        match self {
            Closed::Document(_) => "backend",
            Closed::Type(_) => "devicetype",
            Closed::Manufacturer(_) => "mfg",
            Closed::Device(_) => "model",
        }
    }
}

impl Scope {
    fn open(kind: ScopeKind, key: &str) -> Result<Self, ParseErrorKind> {
        let category = || {
            DeviceCategory::from_keyword(key).ok_or_else(|| ParseErrorKind::InvalidEnumValue {
                keyword: "devicetype".to_string(),
                value: key.to_string(),
            })
        };

        Ok(match kind {
            ScopeKind::Document => Scope::Document {
                fields: Fields::default(),
                types: Vec::new(),
            },
            ScopeKind::HardwareType => Scope::HardwareType {
                category: category()?,
                manufacturers: Vec::new(),
            },
            ScopeKind::AbstractType => Scope::AbstractType {
                category: category()?,
                fields: Fields::default(),
            },
            ScopeKind::Manufacturer => Scope::Manufacturer {
                name: key.to_string(),
                fields: Fields::default(),
                devices: Vec::new(),
            },
            ScopeKind::Device => Scope::Device {
                name: key.to_string(),
                fields: Fields::default(),
            },
        })
    }

    fn fields(&self) -> Option<&Fields> {
        match self {
            Scope::Document { fields, .. }
            | Scope::AbstractType { fields, .. }
            | Scope::Manufacturer { fields, .. }
            | Scope::Device { fields, .. } => Some(fields),
            Scope::HardwareType { .. } => None,
        }
    }

    fn fields_mut(&mut self) -> Option<&mut Fields> {
        match self {
            Scope::Document { fields, .. }
            | Scope::AbstractType { fields, .. }
            | Scope::Manufacturer { fields, .. }
            | Scope::Device { fields, .. } => Some(fields),
            Scope::HardwareType { .. } => None,
        }
    }

    fn describe(&self) -> &'static str {
        match self {
            Scope::Document { .. } => "backend",
            Scope::HardwareType { .. } | Scope::AbstractType { .. } => "devicetype",
            Scope::Manufacturer { .. } => "mfg",
            Scope::Device { .. } => "model",
        }
    }

    /// Convert into the typed node
    fn close(self, level: &Level) -> Result<Closed, ParseErrorKind> {
        Ok(match self {
            Scope::Document { mut fields, types } => {
                let backend = fields.required_text(level, "backend")?;
                let new = fields.text("new").map(|v| v == "yes");
                Closed::Document(Document {
                    backend,
                    version: fields.text("version"),
                    new,
                    manpage: fields.text("manpage"),
                    url: fields.list("url"),
                    comment: fields.text("comment"),
                    types,
                })
            }
            Scope::HardwareType {
                category,
                manufacturers,
            } => Closed::Type(DeviceType::Hardware(HardwareType {
                category,
                manufacturers,
            })),
            Scope::AbstractType {
                category,
                mut fields,
            } => {
                let desc = fields.required_text(level, "desc")?;
                let url = fields.list("url");
                if url.is_empty() {
                    return Err(missing(level, "url"));
                }
                Closed::Type(DeviceType::Abstract(AbstractType {
                    category,
                    desc,
                    url,
                    comment: fields.text("comment"),
                }))
            }
            Scope::Manufacturer {
                name,
                mut fields,
                devices,
            } => Closed::Manufacturer(Manufacturer {
                name,
                url: fields.list("url"),
                comment: fields.text("comment"),
                devices,
            }),
            Scope::Device { name, mut fields } => {
                let status_keyword = fields.required_text(level, "status")?;
                let status = SupportStatus::from_keyword(&status_keyword).ok_or_else(|| {
                    ParseErrorKind::InvalidEnumValue {
                        keyword: "status".to_string(),
                        value: status_keyword.clone(),
                    }
                })?;
                Closed::Device(Device {
                    name,
                    status,
                    interface: fields.text("interface"),
                    scsi: fields.take("scsi").map(Value::into_list),
                    usbid: fields.take("usbid").map(Value::into_list),
                    url: fields.list("url"),
                    comment: fields.text("comment"),
                })
            }
        })
    }

    /// Attach a closed child scope
    fn adopt(&mut self, child: Closed) -> Result<(), ParseErrorKind> {
        match (self, child) {
            (Scope::Document { types, .. }, Closed::Type(t)) => types.push(t),
            (Scope::HardwareType { manufacturers, .. }, Closed::Manufacturer(m)) => {
                manufacturers.push(m)
            }
            (Scope::Manufacturer { devices, .. }, Closed::Device(d)) => devices.push(d),
            (parent, child) => {
                return Err(ParseErrorKind::ShapeMismatch {
                    parent: parent.describe().to_string(),
                    child: child.describe().to_string(),
                });
            }
        }
        Ok(())
    }
}

/// One stack entry: a schema level and the object built under it
#[derive(Debug)]
struct Frame {
    level: &'static Level,
    scope: Scope,
}

impl Frame {
    /// Check the level's required keywords, then build the typed node
    fn close(self) -> Result<Closed, ParseErrorKind> {
        let present = |field: &str| self.scope.fields().is_some_and(|f| f.contains(field));
        if let Some(field) = self.level.required_fields().find(|field| !present(*field)) {
            return Err(missing(self.level, field));
        }
        trace!(level = self.level.name, "closing scope");
        self.scope.close(self.level)
    }
}

/// Builds one [`Document`] from a stream of tokens
#[derive(Debug)]
pub struct DocumentBuilder {
    current: Frame,
    parents: Vec<Frame>,
}

impl Default for DocumentBuilder {
    fn default() -> Self {
        Self::new()
    }
}

impl DocumentBuilder {
    pub fn new() -> Self {
        Self {
            current: Frame {
                level: &schema::ROOT,
                scope: Scope::Document {
                    fields: Fields::default(),
                    types: Vec::new(),
                },
            },
            parents: Vec::new(),
        }
    }

    /// Current nesting depth (0 at the root)
    pub fn depth(&self) -> usize {
        self.parents.len()
    }

    /// Close the current scope and make its parent current
    fn pop(&mut self) -> Result<(), ParseErrorKind> {
        let Some(parent) = self.parents.pop() else {
            return Ok(());
        };
        let child = std::mem::replace(&mut self.current, parent);
        let closed = child.close()?;
        self.current.scope.adopt(closed)
    }

    /// Feed one token
    pub fn push(&mut self, token: Token) -> Result<(), ParseErrorKind> {
        let marker = loop {
            if let Some(marker) = self.current.level.marker(&token.keyword) {
                break marker;
            }
            if self.parents.is_empty() {
                return Err(ParseErrorKind::UnexpectedKeyword(token.keyword));
            }
            self.pop()?;
        };

        match marker {
            Marker::Branch(branch) => {
                let key = token.value.as_key().unwrap_or_default();
                let level = branch
                    .select(key)
                    .ok_or_else(|| ParseErrorKind::UnexpectedKeyword(token.keyword.clone()))?;
                let scope = Scope::open(level.scope, key)?;
                debug!(
                    keyword = %token.keyword,
                    collection = branch.collection,
                    key = %key,
                    depth = self.parents.len() + 1,
                    "opening scope"
                );
                let parent = std::mem::replace(&mut self.current, Frame { level, scope });
                self.parents.push(parent);
                Ok(())
            }
            plain => match self.current.scope.fields_mut() {
                Some(fields) => fields.set(token.keyword, token.value, plain),
                None => Err(ParseErrorKind::UnexpectedKeyword(token.keyword)),
            },
        }
    }

    /// Close every open scope, root included, and return the document
    pub fn finish(mut self) -> Result<Document, ParseErrorKind> {
        while !self.parents.is_empty() {
            self.pop()?;
        }
        match self.current.close()? {
            Closed::Document(document) => Ok(document),
            other => Err(ParseErrorKind::ShapeMismatch {
                parent: "file".to_string(),
                child: other.describe().to_string(),
            }),
        }
    }
}
