use std::collections::BTreeSet;

use indexmap::{IndexMap, IndexSet};
use serde::{Deserialize, Serialize};
use tracing::debug;
use txkit_sbor::{
    decode_payload_with_limits, encode_payload, expect_kind, Categorize, Decode, DecodeError,
    Decoder, DecoderLimits, Encode, EncodeError, Encoder, ManifestAddress, ManifestValue,
    ValueKind,
};
use txkit_types::{Address, EntityType, Hash, NetworkId};

use crate::error::{ManifestError, NameKind, Result};
use crate::instruction::Instruction;

/// An immutable, ordered instruction list with the blobs it references.
///
/// A manifest is bound to the network it was built for. The network is not
/// part of the encoded form. Deserializing checks references the same way
/// [`Manifest::new`] does.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "ManifestRepr")]
pub struct Manifest {
    instructions: Vec<Instruction>,
    blobs: Vec<Vec<u8>>,
    network_id: NetworkId,
}

impl Manifest {
    /// Assemble a manifest and check its references.
    pub fn new(
        instructions: Vec<Instruction>,
        blobs: Vec<Vec<u8>>,
        network_id: NetworkId,
    ) -> Result<Self> {
        let manifest = Self {
            instructions,
            blobs,
            network_id,
        };
        manifest.validate()?;
        Ok(manifest)
    }

    pub(crate) fn new_unchecked(
        instructions: Vec<Instruction>,
        blobs: Vec<Vec<u8>>,
        network_id: NetworkId,
    ) -> Self {
        Self {
            instructions,
            blobs,
            network_id,
        }
    }

    pub fn instructions(&self) -> &[Instruction] {
        &self.instructions
    }

    pub fn blobs(&self) -> &[Vec<u8>] {
        &self.blobs
    }

    pub fn network_id(&self) -> NetworkId {
        self.network_id
    }

    pub fn len(&self) -> usize {
        self.instructions.len()
    }

    pub fn is_empty(&self) -> bool {
        self.instructions.is_empty()
    }

    /// Hashes of the carried blobs, in blob order.
    pub fn blob_hashes(&self) -> Vec<Hash> {
        self.blobs.iter().map(|blob| Hash::of(blob)).collect()
    }

    /// Hash of the compiled manifest.
    pub fn hash(&self) -> Result<Hash> {
        Ok(Hash::of(&self.compile()?))
    }

    /// Canonical bytes of the manifest payload.
    pub fn compile(&self) -> Result<Vec<u8>> {
        let bytes = encode_payload(self)?;
        debug!(
            instructions = self.instructions.len(),
            blobs = self.blobs.len(),
            bytes = bytes.len(),
            "compiled manifest"
        );
        Ok(bytes)
    }

    /// Decode a manifest payload and check its references.
    pub fn decompile(bytes: &[u8], network_id: NetworkId) -> Result<Self> {
        Self::decompile_with_limits(bytes, network_id, DecoderLimits::default())
    }

    pub fn decompile_with_limits(
        bytes: &[u8],
        network_id: NetworkId,
        limits: DecoderLimits,
    ) -> Result<Self> {
        let body: ManifestBody = decode_payload_with_limits(bytes, limits)?;
        Self::new(body.instructions, body.blobs, network_id)
    }

    /// Static addresses referenced anywhere in the manifest, grouped by
    /// entity type. Both levels keep first-seen order.
    pub fn extract_addresses(&self) -> Result<IndexMap<EntityType, IndexSet<Address>>> {
        let mut grouped: IndexMap<EntityType, IndexSet<Address>> = IndexMap::new();
        for address in self.static_addresses()? {
            grouped
                .entry(address.entity_type())
                .or_default()
                .insert(address);
        }
        Ok(grouped)
    }

    /// Static addresses referenced anywhere in the manifest, first-seen
    /// order, duplicates removed.
    pub fn static_addresses(&self) -> Result<IndexSet<Address>> {
        let mut out = IndexSet::new();
        for instruction in &self.instructions {
            for address in instruction.addresses() {
                if let ManifestAddress::Static(node_id) = address {
                    out.insert(Address::new(node_id, self.network_id)?);
                }
            }
        }
        Ok(out)
    }

    /// Write the instruction list and the blob list as two consecutive
    /// values, for payloads that embed a manifest in a larger tuple.
    pub fn encode_parts(&self, encoder: &mut Encoder) -> std::result::Result<(), EncodeError> {
        encoder.encode(&self.instructions)?;
        encode_blobs(encoder, &self.blobs)
    }

    /// Read what [`Manifest::encode_parts`] wrote. The result is unchecked;
    /// pass it to [`Manifest::new`].
    pub fn decode_parts(
        decoder: &mut Decoder<'_>,
    ) -> std::result::Result<(Vec<Instruction>, Vec<Vec<u8>>), DecodeError> {
        let instructions = decoder.decode()?;
        let blobs = decode_blobs(decoder)?;
        Ok((instructions, blobs))
    }

    /// Check that every bucket, proof, reservation, named address, and blob
    /// an instruction references is live at that point.
    pub fn validate(&self) -> Result<()> {
        let blob_hashes: BTreeSet<Hash> = self.blob_hashes().into_iter().collect();
        let mut tracker = ReferenceTracker::default();
        for (index, instruction) in self.instructions.iter().enumerate() {
            tracker.apply(index, instruction, &blob_hashes)?;
        }
        Ok(())
    }
}

/// Unchecked serde form of [`Manifest`].
#[derive(Deserialize)]
struct ManifestRepr {
    instructions: Vec<Instruction>,
    blobs: Vec<Vec<u8>>,
    network_id: NetworkId,
}

impl TryFrom<ManifestRepr> for Manifest {
    type Error = ManifestError;

    fn try_from(repr: ManifestRepr) -> Result<Self> {
        Self::new(repr.instructions, repr.blobs, repr.network_id)
    }
}

/// Replays id allocation and consumption over an instruction list.
#[derive(Default)]
struct ReferenceTracker {
    buckets: Vec<bool>,
    proofs: Vec<bool>,
    reservations: Vec<bool>,
    named_addresses: u32,
}

impl ReferenceTracker {
    fn live(slots: &[bool], index: usize, kind: NameKind, id: u32) -> Result<()> {
        match slots.get(id as usize) {
            Some(true) => Ok(()),
            _ => Err(ManifestError::InvalidReference { index, kind, id }),
        }
    }

    fn consume(slots: &mut [bool], index: usize, kind: NameKind, id: u32) -> Result<()> {
        Self::live(slots, index, kind, id)?;
        slots[id as usize] = false;
        Ok(())
    }

    fn apply(
        &mut self,
        index: usize,
        instruction: &Instruction,
        blob_hashes: &BTreeSet<Hash>,
    ) -> Result<()> {
        match instruction {
            Instruction::ReturnToWorktop { bucket } | Instruction::BurnResource { bucket } => {
                Self::consume(&mut self.buckets, index, NameKind::Bucket, bucket.0)?;
            }
            Instruction::CreateProofFromBucketOfAmount { bucket, .. }
            | Instruction::CreateProofFromBucketOfNonFungibles { bucket, .. }
            | Instruction::CreateProofFromBucketOfAll { bucket } => {
                Self::live(&self.buckets, index, NameKind::Bucket, bucket.0)?;
            }
            Instruction::CloneProof { proof } => {
                Self::live(&self.proofs, index, NameKind::Proof, proof.0)?;
            }
            Instruction::PushToAuthZone { proof } | Instruction::DropProof { proof } => {
                Self::consume(&mut self.proofs, index, NameKind::Proof, proof.0)?;
            }
            Instruction::DropNamedProofs | Instruction::DropAllProofs => {
                self.proofs.iter_mut().for_each(|live| *live = false);
            }
            _ => {}
        }

        for address in instruction.addresses() {
            if let ManifestAddress::Named(id) = address {
                if id >= self.named_addresses {
                    return Err(ManifestError::InvalidReference {
                        index,
                        kind: NameKind::NamedAddress,
                        id,
                    });
                }
            }
        }

        if let Some(args) = instruction.args() {
            for bucket in args.buckets() {
                Self::consume(&mut self.buckets, index, NameKind::Bucket, bucket.0)?;
            }
            for proof in args.proofs() {
                Self::consume(&mut self.proofs, index, NameKind::Proof, proof.0)?;
            }
            for reservation in args.address_reservations() {
                Self::consume(
                    &mut self.reservations,
                    index,
                    NameKind::AddressReservation,
                    reservation.0,
                )?;
            }
            let mut missing = None;
            args.visit(&mut |value| {
                if let ManifestValue::Blob(blob) = value {
                    if missing.is_none() && !blob_hashes.contains(&blob.0) {
                        missing = Some(blob.0);
                    }
                }
            });
            if let Some(hash) = missing {
                return Err(ManifestError::UnknownBlob { index, hash });
            }
        }

        if instruction.creates_bucket() {
            self.buckets.push(true);
        }
        if instruction.creates_proof() {
            self.proofs.push(true);
        }
        if matches!(instruction, Instruction::AllocateGlobalAddress { .. }) {
            self.reservations.push(true);
            self.named_addresses += 1;
        }
        Ok(())
    }
}

/// The encoded part of a manifest.
struct ManifestBody {
    instructions: Vec<Instruction>,
    blobs: Vec<Vec<u8>>,
}

impl Categorize for Manifest {
    const VALUE_KIND: ValueKind = ValueKind::Tuple;
}

impl Encode for Manifest {
    fn value_kind(&self) -> ValueKind {
        ValueKind::Tuple
    }

    fn encode_body(&self, encoder: &mut Encoder) -> std::result::Result<(), EncodeError> {
        encoder.nested(|e| {
            e.write_tuple_header(2)?;
            self.encode_parts(e)
        })
    }
}

/// Blobs as an array of byte arrays.
fn encode_blobs(
    encoder: &mut Encoder,
    blobs: &[Vec<u8>],
) -> std::result::Result<(), EncodeError> {
    encoder.write_kind(ValueKind::Array);
    encoder.nested(|e| {
        e.write_kind(ValueKind::Array);
        e.write_size(blobs.len())?;
        for blob in blobs {
            e.nested(|e| {
                e.write_kind(ValueKind::U8);
                e.write_size(blob.len())?;
                e.write_slice(blob);
                Ok(())
            })?;
        }
        Ok(())
    })
}

fn decode_blobs(decoder: &mut Decoder<'_>) -> std::result::Result<Vec<Vec<u8>>, DecodeError> {
    decoder.read_expected_kind(ValueKind::Array)?;
    decoder.nested(|d| {
        d.read_expected_kind(ValueKind::Array)?;
        let len = d.read_collection_size(2)?;
        let mut blobs = Vec::with_capacity(len);
        for _ in 0..len {
            blobs.push(d.read_bytes_body()?);
        }
        Ok(blobs)
    })
}

impl Decode for ManifestBody {
    fn decode_body_with_kind(
        decoder: &mut Decoder<'_>,
        kind: ValueKind,
    ) -> std::result::Result<Self, DecodeError> {
        expect_kind(ValueKind::Tuple, kind)?;
        decoder.nested(|d| {
            d.read_tuple_header(2)?;
            let (instructions, blobs) = Manifest::decode_parts(d)?;
            Ok(Self {
                instructions,
                blobs,
            })
        })
    }
}
