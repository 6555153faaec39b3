//! Builder-local names for buckets, proofs, address reservations, and named
//! addresses.
//!
//! Valid names:
//! - Must be non-empty and at most 128 bytes
//! - Must not contain whitespace, control characters, or `"`
//!
//! Each kind has its own namespace. Ids are handed out in declaration order,
//! so the id of a name is its position in that namespace.

use indexmap::IndexMap;

use crate::error::{BuilderError, BuilderResult, NameKind};

const MAX_NAME_LEN: usize = 128;

/// Validate a builder-local name.
pub fn validate_name(kind: NameKind, name: &str) -> BuilderResult<()> {
    let invalid = |reason: &str| BuilderError::InvalidName {
        kind,
        name: name.to_string(),
        reason: reason.into(),
    };
    if name.is_empty() {
        return Err(invalid("name must not be empty"));
    }
    if name.len() > MAX_NAME_LEN {
        return Err(invalid("name is longer than 128 bytes"));
    }
    if let Some(ch) = name
        .chars()
        .find(|c| c.is_whitespace() || c.is_control() || *c == '"')
    {
        return Err(invalid(&format!("contains forbidden character: {ch:?}")));
    }
    Ok(())
}

/// One namespace: name to consumed flag, in declaration order.
#[derive(Clone, Debug, Default)]
struct Namespace {
    entries: IndexMap<String, bool>,
}

impl Namespace {
    fn declare(&mut self, kind: NameKind, name: &str) -> BuilderResult<u32> {
        validate_name(kind, name)?;
        if self.entries.contains_key(name) {
            return Err(BuilderError::DuplicateName {
                kind,
                name: name.to_string(),
            });
        }
        let id = self.entries.len() as u32;
        self.entries.insert(name.to_string(), false);
        Ok(id)
    }

    /// Id of a declared, unconsumed name.
    fn live(&self, kind: NameKind, name: &str) -> BuilderResult<u32> {
        match self.entries.get_full(name) {
            None => Err(BuilderError::UnknownName {
                kind,
                name: name.to_string(),
            }),
            Some((_, _, true)) => Err(BuilderError::NameConsumed {
                kind,
                name: name.to_string(),
            }),
            Some((id, _, false)) => Ok(id as u32),
        }
    }

    /// Check that `id` was handed out and is unconsumed.
    fn check_id(&self, kind: NameKind, id: u32) -> BuilderResult<()> {
        match self.entries.get_index(id as usize) {
            None => Err(BuilderError::UnknownId { kind, id }),
            Some((_, true)) => Err(BuilderError::IdConsumed { kind, id }),
            Some((_, false)) => Ok(()),
        }
    }

    fn consume(&mut self, id: u32) {
        if let Some((_, consumed)) = self.entries.get_index_mut(id as usize) {
            *consumed = true;
        }
    }

    fn consume_all(&mut self) {
        self.entries.values_mut().for_each(|consumed| *consumed = true);
    }

    fn next_id(&self) -> u32 {
        self.entries.len() as u32
    }
}

/// Name-to-id table for every builder-local namespace.
///
/// Checks come first and mutations second, so a failed lookup leaves the
/// record untouched.
#[derive(Clone, Debug, Default)]
pub struct NameRecord {
    buckets: Namespace,
    proofs: Namespace,
    reservations: Namespace,
    named_addresses: Namespace,
}

impl NameRecord {
    pub fn new() -> Self {
        Self::default()
    }

    fn namespace(&self, kind: NameKind) -> &Namespace {
        match kind {
            NameKind::Bucket => &self.buckets,
            NameKind::Proof => &self.proofs,
            NameKind::AddressReservation => &self.reservations,
            NameKind::NamedAddress => &self.named_addresses,
        }
    }

    fn namespace_mut(&mut self, kind: NameKind) -> &mut Namespace {
        match kind {
            NameKind::Bucket => &mut self.buckets,
            NameKind::Proof => &mut self.proofs,
            NameKind::AddressReservation => &mut self.reservations,
            NameKind::NamedAddress => &mut self.named_addresses,
        }
    }

    /// Check that `name` can be declared, without declaring it.
    pub fn check_new(&self, kind: NameKind, name: &str) -> BuilderResult<()> {
        validate_name(kind, name)?;
        if self.namespace(kind).entries.contains_key(name) {
            return Err(BuilderError::DuplicateName {
                kind,
                name: name.to_string(),
            });
        }
        Ok(())
    }

    /// Declare `name` and return its id.
    pub fn declare(&mut self, kind: NameKind, name: &str) -> BuilderResult<u32> {
        self.namespace_mut(kind).declare(kind, name)
    }

    /// Id of a declared name that has not been consumed.
    pub fn live(&self, kind: NameKind, name: &str) -> BuilderResult<u32> {
        self.namespace(kind).live(kind, name)
    }

    /// Id of a declared name, consumed or not. Named addresses are never
    /// consumed, so this is how they are looked up.
    pub fn id_of(&self, kind: NameKind, name: &str) -> BuilderResult<u32> {
        self.namespace(kind)
            .entries
            .get_index_of(name)
            .map(|id| id as u32)
            .ok_or_else(|| BuilderError::UnknownName {
                kind,
                name: name.to_string(),
            })
    }

    pub fn check_id(&self, kind: NameKind, id: u32) -> BuilderResult<()> {
        self.namespace(kind).check_id(kind, id)
    }

    pub fn consume(&mut self, kind: NameKind, id: u32) {
        self.namespace_mut(kind).consume(id)
    }

    pub fn consume_all(&mut self, kind: NameKind) {
        self.namespace_mut(kind).consume_all()
    }

    /// Id the next declaration of `kind` will receive.
    pub fn next_id(&self, kind: NameKind) -> u32 {
        self.namespace(kind).next_id()
    }

    /// Names declared for `kind`, in id order.
    pub fn names(&self, kind: NameKind) -> impl Iterator<Item = &str> {
        self.namespace(kind).entries.keys().map(String::as_str)
    }
}
