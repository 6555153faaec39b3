use serde::{Deserialize, Serialize};
use txkit_sbor::{
    expect_kind, Categorize, Decode, DecodeError, Decoder, Encode, EncodeError, Encoder,
    ManifestAddress, ManifestBucket, ManifestProof, ManifestValue, ValueKind,
};
use txkit_types::{Decimal, NodeId, NonFungibleLocalId};

/// Instruction discriminators of the V1 manifest format.
pub mod discriminator {
    pub const TAKE_FROM_WORKTOP: u8 = 0x00;
    pub const TAKE_NON_FUNGIBLES_FROM_WORKTOP: u8 = 0x01;
    pub const TAKE_ALL_FROM_WORKTOP: u8 = 0x02;
    pub const RETURN_TO_WORKTOP: u8 = 0x03;
    pub const ASSERT_WORKTOP_CONTAINS: u8 = 0x04;
    pub const ASSERT_WORKTOP_CONTAINS_NON_FUNGIBLES: u8 = 0x05;
    pub const ASSERT_WORKTOP_CONTAINS_ANY: u8 = 0x06;
    pub const POP_FROM_AUTH_ZONE: u8 = 0x10;
    pub const PUSH_TO_AUTH_ZONE: u8 = 0x11;
    pub const DROP_AUTH_ZONE_PROOFS: u8 = 0x12;
    pub const DROP_AUTH_ZONE_REGULAR_PROOFS: u8 = 0x13;
    pub const CREATE_PROOF_FROM_AUTH_ZONE_OF_AMOUNT: u8 = 0x14;
    pub const CREATE_PROOF_FROM_AUTH_ZONE_OF_NON_FUNGIBLES: u8 = 0x15;
    pub const CREATE_PROOF_FROM_AUTH_ZONE_OF_ALL: u8 = 0x16;
    pub const DROP_AUTH_ZONE_SIGNATURE_PROOFS: u8 = 0x17;
    pub const CREATE_PROOF_FROM_BUCKET_OF_AMOUNT: u8 = 0x21;
    pub const CREATE_PROOF_FROM_BUCKET_OF_NON_FUNGIBLES: u8 = 0x22;
    pub const CREATE_PROOF_FROM_BUCKET_OF_ALL: u8 = 0x23;
    pub const BURN_RESOURCE: u8 = 0x24;
    pub const CLONE_PROOF: u8 = 0x30;
    pub const DROP_PROOF: u8 = 0x31;
    pub const CALL_FUNCTION: u8 = 0x40;
    pub const CALL_METHOD: u8 = 0x41;
    pub const CALL_ROYALTY_METHOD: u8 = 0x42;
    pub const CALL_METADATA_METHOD: u8 = 0x43;
    pub const CALL_ROLE_ASSIGNMENT_METHOD: u8 = 0x44;
    pub const CALL_DIRECT_VAULT_METHOD: u8 = 0x45;
    pub const DROP_ALL_PROOFS: u8 = 0x50;
    pub const ALLOCATE_GLOBAL_ADDRESS: u8 = 0x51;
    pub const DROP_NAMED_PROOFS: u8 = 0x52;
}

use discriminator as d;

/// One manifest instruction.
///
/// Operands refer to buckets, proofs, reservations, and named addresses by
/// positional id; the ids are handed out in instruction order.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum Instruction {
    TakeFromWorktop {
        resource_address: NodeId,
        amount: Decimal,
    },
    TakeNonFungiblesFromWorktop {
        resource_address: NodeId,
        ids: Vec<NonFungibleLocalId>,
    },
    TakeAllFromWorktop {
        resource_address: NodeId,
    },
    ReturnToWorktop {
        bucket: ManifestBucket,
    },
    AssertWorktopContains {
        resource_address: NodeId,
        amount: Decimal,
    },
    AssertWorktopContainsNonFungibles {
        resource_address: NodeId,
        ids: Vec<NonFungibleLocalId>,
    },
    AssertWorktopContainsAny {
        resource_address: NodeId,
    },
    PopFromAuthZone,
    PushToAuthZone {
        proof: ManifestProof,
    },
    DropAuthZoneProofs,
    DropAuthZoneRegularProofs,
    DropAuthZoneSignatureProofs,
    CreateProofFromAuthZoneOfAmount {
        resource_address: NodeId,
        amount: Decimal,
    },
    CreateProofFromAuthZoneOfNonFungibles {
        resource_address: NodeId,
        ids: Vec<NonFungibleLocalId>,
    },
    CreateProofFromAuthZoneOfAll {
        resource_address: NodeId,
    },
    CreateProofFromBucketOfAmount {
        bucket: ManifestBucket,
        amount: Decimal,
    },
    CreateProofFromBucketOfNonFungibles {
        bucket: ManifestBucket,
        ids: Vec<NonFungibleLocalId>,
    },
    CreateProofFromBucketOfAll {
        bucket: ManifestBucket,
    },
    BurnResource {
        bucket: ManifestBucket,
    },
    CloneProof {
        proof: ManifestProof,
    },
    DropProof {
        proof: ManifestProof,
    },
    CallFunction {
        package_address: ManifestAddress,
        blueprint_name: String,
        function_name: String,
        args: ManifestValue,
    },
    CallMethod {
        address: ManifestAddress,
        method_name: String,
        args: ManifestValue,
    },
    CallRoyaltyMethod {
        address: ManifestAddress,
        method_name: String,
        args: ManifestValue,
    },
    CallMetadataMethod {
        address: ManifestAddress,
        method_name: String,
        args: ManifestValue,
    },
    CallRoleAssignmentMethod {
        address: ManifestAddress,
        method_name: String,
        args: ManifestValue,
    },
    CallDirectVaultMethod {
        address: NodeId,
        method_name: String,
        args: ManifestValue,
    },
    DropNamedProofs,
    DropAllProofs,
    AllocateGlobalAddress {
        package_address: NodeId,
        blueprint_name: String,
    },
}

impl Instruction {
    pub fn discriminator(&self) -> u8 {
        match self {
            Self::TakeFromWorktop { .. } => d::TAKE_FROM_WORKTOP,
            Self::TakeNonFungiblesFromWorktop { .. } => d::TAKE_NON_FUNGIBLES_FROM_WORKTOP,
            Self::TakeAllFromWorktop { .. } => d::TAKE_ALL_FROM_WORKTOP,
            Self::ReturnToWorktop { .. } => d::RETURN_TO_WORKTOP,
            Self::AssertWorktopContains { .. } => d::ASSERT_WORKTOP_CONTAINS,
            Self::AssertWorktopContainsNonFungibles { .. } => {
                d::ASSERT_WORKTOP_CONTAINS_NON_FUNGIBLES
            }
            Self::AssertWorktopContainsAny { .. } => d::ASSERT_WORKTOP_CONTAINS_ANY,
            Self::PopFromAuthZone => d::POP_FROM_AUTH_ZONE,
            Self::PushToAuthZone { .. } => d::PUSH_TO_AUTH_ZONE,
            Self::DropAuthZoneProofs => d::DROP_AUTH_ZONE_PROOFS,
            Self::DropAuthZoneRegularProofs => d::DROP_AUTH_ZONE_REGULAR_PROOFS,
            Self::DropAuthZoneSignatureProofs => d::DROP_AUTH_ZONE_SIGNATURE_PROOFS,
            Self::CreateProofFromAuthZoneOfAmount { .. } => d::CREATE_PROOF_FROM_AUTH_ZONE_OF_AMOUNT,
            Self::CreateProofFromAuthZoneOfNonFungibles { .. } => {
                d::CREATE_PROOF_FROM_AUTH_ZONE_OF_NON_FUNGIBLES
            }
            Self::CreateProofFromAuthZoneOfAll { .. } => d::CREATE_PROOF_FROM_AUTH_ZONE_OF_ALL,
            Self::CreateProofFromBucketOfAmount { .. } => d::CREATE_PROOF_FROM_BUCKET_OF_AMOUNT,
            Self::CreateProofFromBucketOfNonFungibles { .. } => {
                d::CREATE_PROOF_FROM_BUCKET_OF_NON_FUNGIBLES
            }
            Self::CreateProofFromBucketOfAll { .. } => d::CREATE_PROOF_FROM_BUCKET_OF_ALL,
            Self::BurnResource { .. } => d::BURN_RESOURCE,
            Self::CloneProof { .. } => d::CLONE_PROOF,
            Self::DropProof { .. } => d::DROP_PROOF,
            Self::CallFunction { .. } => d::CALL_FUNCTION,
            Self::CallMethod { .. } => d::CALL_METHOD,
            Self::CallRoyaltyMethod { .. } => d::CALL_ROYALTY_METHOD,
            Self::CallMetadataMethod { .. } => d::CALL_METADATA_METHOD,
            Self::CallRoleAssignmentMethod { .. } => d::CALL_ROLE_ASSIGNMENT_METHOD,
            Self::CallDirectVaultMethod { .. } => d::CALL_DIRECT_VAULT_METHOD,
            Self::DropNamedProofs => d::DROP_NAMED_PROOFS,
            Self::DropAllProofs => d::DROP_ALL_PROOFS,
            Self::AllocateGlobalAddress { .. } => d::ALLOCATE_GLOBAL_ADDRESS,
        }
    }

    /// Whether the instruction puts a new bucket on the manifest's bucket list.
    pub fn creates_bucket(&self) -> bool {
        matches!(
            self,
            Self::TakeFromWorktop { .. }
                | Self::TakeNonFungiblesFromWorktop { .. }
                | Self::TakeAllFromWorktop { .. }
        )
    }

    /// Whether the instruction creates a new named proof.
    pub fn creates_proof(&self) -> bool {
        matches!(
            self,
            Self::PopFromAuthZone
                | Self::CreateProofFromAuthZoneOfAmount { .. }
                | Self::CreateProofFromAuthZoneOfNonFungibles { .. }
                | Self::CreateProofFromAuthZoneOfAll { .. }
                | Self::CreateProofFromBucketOfAmount { .. }
                | Self::CreateProofFromBucketOfNonFungibles { .. }
                | Self::CreateProofFromBucketOfAll { .. }
                | Self::CloneProof { .. }
        )
    }

    /// Call arguments, for the invocation instructions.
    pub fn args(&self) -> Option<&ManifestValue> {
        match self {
            Self::CallFunction { args, .. }
            | Self::CallMethod { args, .. }
            | Self::CallRoyaltyMethod { args, .. }
            | Self::CallMetadataMethod { args, .. }
            | Self::CallRoleAssignmentMethod { args, .. }
            | Self::CallDirectVaultMethod { args, .. } => Some(args),
            _ => None,
        }
    }

    /// Every address the instruction mentions, in operand order.
    pub fn addresses(&self) -> Vec<ManifestAddress> {
        let mut out = Vec::new();
        match self {
            Self::TakeFromWorktop {
                resource_address, ..
            }
            | Self::TakeNonFungiblesFromWorktop {
                resource_address, ..
            }
            | Self::TakeAllFromWorktop { resource_address }
            | Self::AssertWorktopContains {
                resource_address, ..
            }
            | Self::AssertWorktopContainsNonFungibles {
                resource_address, ..
            }
            | Self::AssertWorktopContainsAny { resource_address }
            | Self::CreateProofFromAuthZoneOfAmount {
                resource_address, ..
            }
            | Self::CreateProofFromAuthZoneOfNonFungibles {
                resource_address, ..
            }
            | Self::CreateProofFromAuthZoneOfAll { resource_address } => {
                out.push(ManifestAddress::Static(*resource_address));
            }
            Self::CallFunction {
                package_address: address,
                ..
            }
            | Self::CallMethod { address, .. }
            | Self::CallRoyaltyMethod { address, .. }
            | Self::CallMetadataMethod { address, .. }
            | Self::CallRoleAssignmentMethod { address, .. } => out.push(*address),
            Self::CallDirectVaultMethod { address, .. } => {
                out.push(ManifestAddress::Static(*address));
            }
            Self::AllocateGlobalAddress {
                package_address, ..
            } => out.push(ManifestAddress::Static(*package_address)),
            _ => {}
        }
        if let Some(args) = self.args() {
            out.extend(args.addresses());
        }
        out
    }
}

fn expect_fields(expected: usize, actual: usize) -> Result<(), DecodeError> {
    if expected == actual {
        Ok(())
    } else {
        Err(DecodeError::UnexpectedSize { expected, actual })
    }
}

impl Categorize for Instruction {
    const VALUE_KIND: ValueKind = ValueKind::Enum;
}

impl Encode for Instruction {
    fn value_kind(&self) -> ValueKind {
        ValueKind::Enum
    }

    fn encode_body(&self, encoder: &mut Encoder) -> Result<(), EncodeError> {
        let disc = self.discriminator();
        encoder.nested(|e| match self {
            Self::TakeFromWorktop {
                resource_address,
                amount,
            }
            | Self::AssertWorktopContains {
                resource_address,
                amount,
            }
            | Self::CreateProofFromAuthZoneOfAmount {
                resource_address,
                amount,
            } => {
                e.write_enum_header(disc, 2)?;
                e.encode(resource_address)?;
                e.encode(amount)
            }
            Self::TakeNonFungiblesFromWorktop {
                resource_address,
                ids,
            }
            | Self::AssertWorktopContainsNonFungibles {
                resource_address,
                ids,
            }
            | Self::CreateProofFromAuthZoneOfNonFungibles {
                resource_address,
                ids,
            } => {
                e.write_enum_header(disc, 2)?;
                e.encode(resource_address)?;
                e.encode(ids)
            }
            Self::TakeAllFromWorktop { resource_address }
            | Self::AssertWorktopContainsAny { resource_address }
            | Self::CreateProofFromAuthZoneOfAll { resource_address } => {
                e.write_enum_header(disc, 1)?;
                e.encode(resource_address)
            }
            Self::ReturnToWorktop { bucket }
            | Self::CreateProofFromBucketOfAll { bucket }
            | Self::BurnResource { bucket } => {
                e.write_enum_header(disc, 1)?;
                e.encode(bucket)
            }
            Self::CreateProofFromBucketOfAmount { bucket, amount } => {
                e.write_enum_header(disc, 2)?;
                e.encode(bucket)?;
                e.encode(amount)
            }
            Self::CreateProofFromBucketOfNonFungibles { bucket, ids } => {
                e.write_enum_header(disc, 2)?;
                e.encode(bucket)?;
                e.encode(ids)
            }
            Self::PushToAuthZone { proof }
            | Self::CloneProof { proof }
            | Self::DropProof { proof } => {
                e.write_enum_header(disc, 1)?;
                e.encode(proof)
            }
            Self::PopFromAuthZone
            | Self::DropAuthZoneProofs
            | Self::DropAuthZoneRegularProofs
            | Self::DropAuthZoneSignatureProofs
            | Self::DropNamedProofs
            | Self::DropAllProofs => e.write_enum_header(disc, 0),
            Self::CallFunction {
                package_address,
                blueprint_name,
                function_name,
                args,
            } => {
                e.write_enum_header(disc, 4)?;
                e.encode(package_address)?;
                e.encode(blueprint_name)?;
                e.encode(function_name)?;
                e.encode(args)
            }
            Self::CallMethod {
                address,
                method_name,
                args,
            }
            | Self::CallRoyaltyMethod {
                address,
                method_name,
                args,
            }
            | Self::CallMetadataMethod {
                address,
                method_name,
                args,
            }
            | Self::CallRoleAssignmentMethod {
                address,
                method_name,
                args,
            } => {
                e.write_enum_header(disc, 3)?;
                e.encode(address)?;
                e.encode(method_name)?;
                e.encode(args)
            }
            Self::CallDirectVaultMethod {
                address,
                method_name,
                args,
            } => {
                e.write_enum_header(disc, 3)?;
                e.encode(address)?;
                e.encode(method_name)?;
                e.encode(args)
            }
            Self::AllocateGlobalAddress {
                package_address,
                blueprint_name,
            } => {
                e.write_enum_header(disc, 2)?;
                e.encode(package_address)?;
                e.encode(blueprint_name)
            }
        })
    }
}

impl Decode for Instruction {
    fn decode_body_with_kind(
        decoder: &mut Decoder<'_>,
        kind: ValueKind,
    ) -> Result<Self, DecodeError> {
        expect_kind(ValueKind::Enum, kind)?;
        decoder.nested(|dec| {
            let (disc, fields) = dec.read_enum_header()?;
            let arity = match disc {
                d::POP_FROM_AUTH_ZONE
                | d::DROP_AUTH_ZONE_PROOFS
                | d::DROP_AUTH_ZONE_REGULAR_PROOFS
                | d::DROP_AUTH_ZONE_SIGNATURE_PROOFS
                | d::DROP_NAMED_PROOFS
                | d::DROP_ALL_PROOFS => 0,
                d::TAKE_ALL_FROM_WORKTOP
                | d::ASSERT_WORKTOP_CONTAINS_ANY
                | d::CREATE_PROOF_FROM_AUTH_ZONE_OF_ALL
                | d::RETURN_TO_WORKTOP
                | d::CREATE_PROOF_FROM_BUCKET_OF_ALL
                | d::BURN_RESOURCE
                | d::PUSH_TO_AUTH_ZONE
                | d::CLONE_PROOF
                | d::DROP_PROOF => 1,
                d::TAKE_FROM_WORKTOP
                | d::ASSERT_WORKTOP_CONTAINS
                | d::CREATE_PROOF_FROM_AUTH_ZONE_OF_AMOUNT
                | d::TAKE_NON_FUNGIBLES_FROM_WORKTOP
                | d::ASSERT_WORKTOP_CONTAINS_NON_FUNGIBLES
                | d::CREATE_PROOF_FROM_AUTH_ZONE_OF_NON_FUNGIBLES
                | d::CREATE_PROOF_FROM_BUCKET_OF_AMOUNT
                | d::CREATE_PROOF_FROM_BUCKET_OF_NON_FUNGIBLES
                | d::ALLOCATE_GLOBAL_ADDRESS => 2,
                d::CALL_METHOD
                | d::CALL_ROYALTY_METHOD
                | d::CALL_METADATA_METHOD
                | d::CALL_ROLE_ASSIGNMENT_METHOD
                | d::CALL_DIRECT_VAULT_METHOD => 3,
                d::CALL_FUNCTION => 4,
                discriminator => {
                    return Err(DecodeError::UnknownDiscriminator {
                        type_name: "Instruction",
                        discriminator,
                    })
                }
            };
            expect_fields(arity, fields)?;

            let instruction = match disc {
                d::TAKE_FROM_WORKTOP => Self::TakeFromWorktop {
                    resource_address: dec.decode()?,
                    amount: dec.decode()?,
                },
                d::TAKE_NON_FUNGIBLES_FROM_WORKTOP => Self::TakeNonFungiblesFromWorktop {
                    resource_address: dec.decode()?,
                    ids: dec.decode()?,
                },
                d::TAKE_ALL_FROM_WORKTOP => Self::TakeAllFromWorktop {
                    resource_address: dec.decode()?,
                },
                d::RETURN_TO_WORKTOP => Self::ReturnToWorktop {
                    bucket: dec.decode()?,
                },
                d::ASSERT_WORKTOP_CONTAINS => Self::AssertWorktopContains {
                    resource_address: dec.decode()?,
                    amount: dec.decode()?,
                },
                d::ASSERT_WORKTOP_CONTAINS_NON_FUNGIBLES => Self::AssertWorktopContainsNonFungibles {
                    resource_address: dec.decode()?,
                    ids: dec.decode()?,
                },
                d::ASSERT_WORKTOP_CONTAINS_ANY => Self::AssertWorktopContainsAny {
                    resource_address: dec.decode()?,
                },
                d::POP_FROM_AUTH_ZONE => Self::PopFromAuthZone,
                d::PUSH_TO_AUTH_ZONE => Self::PushToAuthZone {
                    proof: dec.decode()?,
                },
                d::DROP_AUTH_ZONE_PROOFS => Self::DropAuthZoneProofs,
                d::DROP_AUTH_ZONE_REGULAR_PROOFS => Self::DropAuthZoneRegularProofs,
                d::DROP_AUTH_ZONE_SIGNATURE_PROOFS => Self::DropAuthZoneSignatureProofs,
                d::CREATE_PROOF_FROM_AUTH_ZONE_OF_AMOUNT => Self::CreateProofFromAuthZoneOfAmount {
                    resource_address: dec.decode()?,
                    amount: dec.decode()?,
                },
                d::CREATE_PROOF_FROM_AUTH_ZONE_OF_NON_FUNGIBLES => {
                    Self::CreateProofFromAuthZoneOfNonFungibles {
                        resource_address: dec.decode()?,
                        ids: dec.decode()?,
                    }
                }
                d::CREATE_PROOF_FROM_AUTH_ZONE_OF_ALL => Self::CreateProofFromAuthZoneOfAll {
                    resource_address: dec.decode()?,
                },
                d::CREATE_PROOF_FROM_BUCKET_OF_AMOUNT => Self::CreateProofFromBucketOfAmount {
                    bucket: dec.decode()?,
                    amount: dec.decode()?,
                },
                d::CREATE_PROOF_FROM_BUCKET_OF_NON_FUNGIBLES => {
                    Self::CreateProofFromBucketOfNonFungibles {
                        bucket: dec.decode()?,
                        ids: dec.decode()?,
                    }
                }
                d::CREATE_PROOF_FROM_BUCKET_OF_ALL => Self::CreateProofFromBucketOfAll {
                    bucket: dec.decode()?,
                },
                d::BURN_RESOURCE => Self::BurnResource {
                    bucket: dec.decode()?,
                },
                d::CLONE_PROOF => Self::CloneProof {
                    proof: dec.decode()?,
                },
                d::DROP_PROOF => Self::DropProof {
                    proof: dec.decode()?,
                },
                d::CALL_FUNCTION => Self::CallFunction {
                    package_address: dec.decode()?,
                    blueprint_name: dec.decode()?,
                    function_name: dec.decode()?,
                    args: dec.decode()?,
                },
                d::CALL_METHOD => Self::CallMethod {
                    address: dec.decode()?,
                    method_name: dec.decode()?,
                    args: dec.decode()?,
                },
                d::CALL_ROYALTY_METHOD => Self::CallRoyaltyMethod {
                    address: dec.decode()?,
                    method_name: dec.decode()?,
                    args: dec.decode()?,
                },
                d::CALL_METADATA_METHOD => Self::CallMetadataMethod {
                    address: dec.decode()?,
                    method_name: dec.decode()?,
                    args: dec.decode()?,
                },
                d::CALL_ROLE_ASSIGNMENT_METHOD => Self::CallRoleAssignmentMethod {
                    address: dec.decode()?,
                    method_name: dec.decode()?,
                    args: dec.decode()?,
                },
                d::CALL_DIRECT_VAULT_METHOD => Self::CallDirectVaultMethod {
                    address: dec.decode()?,
                    method_name: dec.decode()?,
                    args: dec.decode()?,
                },
                d::DROP_NAMED_PROOFS => Self::DropNamedProofs,
                d::DROP_ALL_PROOFS => Self::DropAllProofs,
                _ => Self::AllocateGlobalAddress {
                    package_address: dec.decode()?,
                    blueprint_name: dec.decode()?,
                },
            };
            Ok(instruction)
        })
    }
}
