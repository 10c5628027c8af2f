//! Payload generation
//!
//! A [`PayloadGenerator`] produces one opaque byte message per call. It
//! must be callable concurrently from many workers, so generators keep
//! no shared mutable state; randomness comes from the thread-local RNG.

use crate::{Error, Result};
use bytes::Bytes;
use rand::RngCore;

/// One message to be sent. Immutable once created.
#[derive(Debug, Clone)]
pub struct Payload {
    data: Bytes,
    tag: &'static str,
}

impl Payload {
    pub fn new(data: impl Into<Bytes>, tag: &'static str) -> Self {
        Self {
            data: data.into(),
            tag,
        }
    }

    /// Raw message bytes
    pub fn data(&self) -> &[u8] {
        &self.data
    }

    pub fn len(&self) -> usize {
        self.data.len()
    }

    pub fn is_empty(&self) -> bool {
        self.data.is_empty()
    }

    /// Logical message-type label, used only for reporting
    pub fn tag(&self) -> &'static str {
        self.tag
    }
}

/// Produces one payload per invocation
///
/// `seq` is the worker-local monotonically increasing sequence number;
/// generators may ignore it. Implementations must be safe to call from
/// any worker concurrently.
pub trait PayloadGenerator: Send + Sync {
    fn generate(&self, seq: u64) -> Payload;

    /// Profile name, used for logging and the final report
    fn name(&self) -> &'static str;
}

impl std::fmt::Debug for dyn PayloadGenerator {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_tuple("PayloadGenerator").field(&self.name()).finish()
    }
}

/// Replays the same precomputed message on every call
///
/// Models "replay a captured message": the byte sequence is built once
/// and cheaply cloned per send.
#[derive(Debug, Clone)]
pub struct FixedPayload {
    data: Bytes,
    tag: &'static str,
}

impl FixedPayload {
    pub fn new(data: impl Into<Bytes>, tag: &'static str) -> Result<Self> {
        let data = data.into();
        if data.is_empty() {
            return Err(Error::invalid_template("fixed payload must not be empty"));
        }
        Ok(Self { data, tag })
    }
}

impl PayloadGenerator for FixedPayload {
    fn generate(&self, _seq: u64) -> Payload {
        Payload::new(self.data.clone(), self.tag)
    }

    fn name(&self) -> &'static str {
        self.tag
    }
}

/// A byte range inside a template that is rewritten per send
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ByteField {
    pub offset: usize,
    pub len: usize,
}

impl ByteField {
    pub const fn new(offset: usize, len: usize) -> Self {
        Self { offset, len }
    }
}

/// Template-based generator with randomized fields
///
/// Every call copies the template and overwrites the configured byte
/// ranges with fresh random values. This models "vary the UE identity
/// per request": the protocol framing stays constant while identity
/// fields churn.
#[derive(Debug, Clone)]
pub struct RandomizedTemplate {
    template: Bytes,
    fields: Vec<ByteField>,
    tag: &'static str,
}

impl RandomizedTemplate {
    /// Build a generator, rejecting field specs that fall outside the
    /// template with [`Error::InvalidTemplate`].
    pub fn new(template: Vec<u8>, fields: Vec<ByteField>, tag: &'static str) -> Result<Self> {
        if template.is_empty() {
            return Err(Error::invalid_template("template must not be empty"));
        }
        for field in &fields {
            if field.len == 0 {
                return Err(Error::invalid_template(format!(
                    "field at offset {} has zero length",
                    field.offset
                )));
            }
            let end = field.offset.checked_add(field.len).ok_or_else(|| {
                Error::invalid_template(format!("field at offset {} overflows", field.offset))
            })?;
            if end > template.len() {
                return Err(Error::invalid_template(format!(
                    "field [{}, {}) exceeds template length {}",
                    field.offset,
                    end,
                    template.len()
                )));
            }
        }
        Ok(Self {
            template: Bytes::from(template),
            fields,
            tag,
        })
    }

    /// Template length in bytes
    pub fn len(&self) -> usize {
        self.template.len()
    }

    pub fn is_empty(&self) -> bool {
        self.template.is_empty()
    }
}

impl PayloadGenerator for RandomizedTemplate {
    fn generate(&self, _seq: u64) -> Payload {
        let mut data = self.template.to_vec();
        let mut rng = rand::thread_rng();
        for field in &self.fields {
            rng.fill_bytes(&mut data[field.offset..field.offset + field.len]);
        }
        Payload::new(data, self.tag)
    }

    fn name(&self) -> &'static str {
        self.tag
    }
}
