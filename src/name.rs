use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::{Error, Result};

/// structural or scalar type tag carried by every stored node
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Kind {
    /// mapping from base names to children
    Dict,
    /// content-addressed collection of scalar children
    Set,
    /// raw text leaf
    Str,
    /// integer leaf
    Int,
    /// symbolic pointer to another tree location (unresolved)
    Ref,
}

impl Kind {
    /// the suffix used in typed names
    pub fn as_str(&self) -> &'static str {
        match self {
            Kind::Dict => "dict",
            Kind::Set => "set",
            Kind::Str => "str",
            Kind::Int => "int",
            Kind::Ref => "ref",
        }
    }

    pub fn is_container(&self) -> bool {
        matches!(self, Kind::Dict | Kind::Set)
    }
}

impl fmt::Display for Kind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// a tree-node identifier: `<base>#<kind>`
///
/// the kind is encoded directly into the stored name, so a tree is
/// self-describing without an external schema.
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub struct TypedName {
    base: String,
    kind: Kind,
}

impl TypedName {
    /// join a base and kind into a typed name
    ///
    /// the base must not contain `#` (it is the kind separator).
    pub fn new(base: impl Into<String>, kind: Kind) -> Result<Self> {
        let base = base.into();
        if base.contains('#') {
            return Err(Error::InvalidBase(base));
        }
        Ok(Self { base, kind })
    }

    /// split a stored name on its last `#` into base and kind
    pub fn parse(name: &str) -> Result<Self> {
        let (base, kind) = name
            .rsplit_once('#')
            .ok_or_else(|| Error::MalformedName(name.to_string()))?;
        let kind = match kind {
            "dict" => Kind::Dict,
            "set" => Kind::Set,
            "str" => Kind::Str,
            "int" => Kind::Int,
            "ref" => Kind::Ref,
            other => {
                return Err(Error::UnknownKind {
                    name: name.to_string(),
                    kind: other.to_string(),
                })
            }
        };
        Ok(Self {
            base: base.to_string(),
            kind,
        })
    }

    pub fn base(&self) -> &str {
        &self.base
    }

    pub fn kind(&self) -> Kind {
        self.kind
    }
}

impl fmt::Display for TypedName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}#{}", self.base, self.kind)
    }
}

impl FromStr for TypedName {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        Self::parse(s)
    }
}

impl Serialize for TypedName {
    fn serialize<S>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error>
    where
        S: serde::Serializer,
    {
        serializer.serialize_str(&self.to_string())
    }
}

impl<'de> Deserialize<'de> for TypedName {
    fn deserialize<D>(deserializer: D) -> std::result::Result<Self, D::Error>
    where
        D: serde::Deserializer<'de>,
    {
        let s = String::deserialize(deserializer)?;
        Self::parse(&s).map_err(serde::de::Error::custom)
    }
}
