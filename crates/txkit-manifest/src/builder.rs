use std::collections::BTreeSet;

use indexmap::{IndexMap, IndexSet};
use tracing::{debug, trace};
use txkit_sbor::{
    ManifestAddress, ManifestAddressReservation, ManifestBlobRef, ManifestBucket,
    ManifestExpression, ManifestProof, ManifestValue, ValueKind,
};
use txkit_types::known_addresses::node_ids;
use txkit_types::{Address, Decimal, Hash, NetworkId, NonFungibleLocalId};

use crate::error::{BuilderError, BuilderResult, NameKind};
use crate::idents;
use crate::instruction::Instruction;
use crate::manifest::Manifest;
use crate::names::NameRecord;

/// Fee locked by [`ManifestBuilder::lock_fee_from_faucet`].
pub const FAUCET_FEE: i64 = 5000;

/// Deposit rule applied to resources an account has not configured.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum DefaultDepositRule {
    Accept,
    Reject,
    AllowExisting,
}

impl DefaultDepositRule {
    fn discriminator(self) -> u8 {
        match self {
            Self::Accept => 0,
            Self::Reject => 1,
            Self::AllowExisting => 2,
        }
    }
}

/// Step-wise manifest constructor.
///
/// Every step consumes the builder and returns the next one. Steps that can
/// fail validate all of their inputs before touching any state, and return
/// an error instead of a builder.
///
/// ```
/// use txkit_manifest::ManifestBuilder;
/// use txkit_types::{known_addresses, Address, Ed25519PublicKey, PublicKey};
///
/// let network_id = 0x01;
/// let xrd = known_addresses(network_id).unwrap().resource_addresses.xrd;
/// let account = Address::virtual_account(&PublicKey::Ed25519(Ed25519PublicKey([1; 32])), network_id);
///
/// let manifest = ManifestBuilder::new()
///     .lock_fee_from_faucet()
///     .get_free_xrd_from_faucet()
///     .take_all_from_worktop(xrd, "xrd")
///     .and_then(|b| b.try_deposit_or_abort(account, "xrd"))
///     .and_then(|b| b.build(network_id))
///     .unwrap();
/// assert_eq!(manifest.len(), 4);
/// ```
#[derive(Clone, Debug, Default)]
pub struct ManifestBuilder {
    instructions: Vec<Instruction>,
    blobs: IndexMap<Hash, Vec<u8>>,
    names: NameRecord,
    addresses: IndexSet<Address>,
}

fn expect_entity(
    address: &Address,
    matches: bool,
    expected: &'static str,
) -> BuilderResult<()> {
    if matches {
        Ok(())
    } else {
        Err(BuilderError::UnexpectedEntity {
            address: display_address(address),
            expected,
        })
    }
}

pub(crate) fn display_address(address: &Address) -> String {
    address
        .to_bech32()
        .unwrap_or_else(|_| address.node_id().to_hex())
}

impl ManifestBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn instructions(&self) -> &[Instruction] {
        &self.instructions
    }

    pub fn names(&self) -> &NameRecord {
        &self.names
    }

    fn push(mut self, instruction: Instruction) -> Self {
        trace!(
            index = self.instructions.len(),
            discriminator = instruction.discriminator(),
            "appending instruction"
        );
        self.instructions.push(instruction);
        self
    }

    fn record(&mut self, address: Address) {
        self.addresses.insert(address);
    }

    /// Check that every bucket, proof, reservation, named address, and blob
    /// in `args` is usable, and that none is passed twice.
    fn check_args(&self, args: &ManifestValue) -> BuilderResult<()> {
        let mut seen: BTreeSet<(u8, u32)> = BTreeSet::new();
        let mut check = |kind: NameKind, tag: u8, id: u32| -> BuilderResult<()> {
            self.names.check_id(kind, id)?;
            if !seen.insert((tag, id)) {
                return Err(BuilderError::IdConsumed { kind, id });
            }
            Ok(())
        };
        for bucket in args.buckets() {
            check(NameKind::Bucket, 0, bucket.0)?;
        }
        for proof in args.proofs() {
            check(NameKind::Proof, 1, proof.0)?;
        }
        for reservation in args.address_reservations() {
            check(NameKind::AddressReservation, 2, reservation.0)?;
        }
        for address in args.addresses() {
            if let ManifestAddress::Named(id) = address {
                if id >= self.names.next_id(NameKind::NamedAddress) {
                    return Err(BuilderError::UnknownId {
                        kind: NameKind::NamedAddress,
                        id,
                    });
                }
            }
        }
        let mut missing = None;
        args.visit(&mut |value| {
            if let ManifestValue::Blob(blob) = value {
                if missing.is_none() && !self.blobs.contains_key(&blob.0) {
                    missing = Some(blob.0);
                }
            }
        });
        match missing {
            Some(hash) => Err(BuilderError::UnknownBlob(hash)),
            None => Ok(()),
        }
    }

    fn consume_args(&mut self, args: &ManifestValue) {
        for bucket in args.buckets() {
            self.names.consume(NameKind::Bucket, bucket.0);
        }
        for proof in args.proofs() {
            self.names.consume(NameKind::Proof, proof.0);
        }
        for reservation in args.address_reservations() {
            self.names.consume(NameKind::AddressReservation, reservation.0);
        }
    }

    // Lookups

    /// Id of a live bucket, for building call arguments by hand.
    pub fn bucket(&self, name: &str) -> BuilderResult<ManifestBucket> {
        self.names.live(NameKind::Bucket, name).map(ManifestBucket)
    }

    pub fn proof(&self, name: &str) -> BuilderResult<ManifestProof> {
        self.names.live(NameKind::Proof, name).map(ManifestProof)
    }

    pub fn address_reservation(&self, name: &str) -> BuilderResult<ManifestAddressReservation> {
        self.names
            .live(NameKind::AddressReservation, name)
            .map(ManifestAddressReservation)
    }

    pub fn named_address(&self, name: &str) -> BuilderResult<ManifestAddress> {
        self.names
            .id_of(NameKind::NamedAddress, name)
            .map(ManifestAddress::Named)
    }

    // Worktop

    pub fn take_from_worktop(
        mut self,
        resource_address: Address,
        amount: Decimal,
        new_bucket: &str,
    ) -> BuilderResult<Self> {
        expect_entity(&resource_address, resource_address.is_resource(), "resource")?;
        self.names.declare(NameKind::Bucket, new_bucket)?;
        self.record(resource_address);
        Ok(self.push(Instruction::TakeFromWorktop {
            resource_address: *resource_address.node_id(),
            amount,
        }))
    }

    pub fn take_non_fungibles_from_worktop(
        mut self,
        resource_address: Address,
        ids: impl IntoIterator<Item = NonFungibleLocalId>,
        new_bucket: &str,
    ) -> BuilderResult<Self> {
        expect_entity(
            &resource_address,
            resource_address.entity_type().is_non_fungible_resource(),
            "non-fungible resource",
        )?;
        self.names.declare(NameKind::Bucket, new_bucket)?;
        self.record(resource_address);
        Ok(self.push(Instruction::TakeNonFungiblesFromWorktop {
            resource_address: *resource_address.node_id(),
            ids: ids.into_iter().collect(),
        }))
    }

    pub fn take_all_from_worktop(
        mut self,
        resource_address: Address,
        new_bucket: &str,
    ) -> BuilderResult<Self> {
        expect_entity(&resource_address, resource_address.is_resource(), "resource")?;
        self.names.declare(NameKind::Bucket, new_bucket)?;
        self.record(resource_address);
        Ok(self.push(Instruction::TakeAllFromWorktop {
            resource_address: *resource_address.node_id(),
        }))
    }

    pub fn return_to_worktop(mut self, bucket: &str) -> BuilderResult<Self> {
        let id = self.names.live(NameKind::Bucket, bucket)?;
        self.names.consume(NameKind::Bucket, id);
        Ok(self.push(Instruction::ReturnToWorktop {
            bucket: ManifestBucket(id),
        }))
    }

    pub fn assert_worktop_contains(
        mut self,
        resource_address: Address,
        amount: Decimal,
    ) -> BuilderResult<Self> {
        expect_entity(&resource_address, resource_address.is_resource(), "resource")?;
        self.record(resource_address);
        Ok(self.push(Instruction::AssertWorktopContains {
            resource_address: *resource_address.node_id(),
            amount,
        }))
    }

    pub fn assert_worktop_contains_non_fungibles(
        mut self,
        resource_address: Address,
        ids: impl IntoIterator<Item = NonFungibleLocalId>,
    ) -> BuilderResult<Self> {
        expect_entity(
            &resource_address,
            resource_address.entity_type().is_non_fungible_resource(),
            "non-fungible resource",
        )?;
        self.record(resource_address);
        Ok(self.push(Instruction::AssertWorktopContainsNonFungibles {
            resource_address: *resource_address.node_id(),
            ids: ids.into_iter().collect(),
        }))
    }

    pub fn assert_worktop_contains_any(mut self, resource_address: Address) -> BuilderResult<Self> {
        expect_entity(&resource_address, resource_address.is_resource(), "resource")?;
        self.record(resource_address);
        Ok(self.push(Instruction::AssertWorktopContainsAny {
            resource_address: *resource_address.node_id(),
        }))
    }

    // Auth zone and proofs

    pub fn pop_from_auth_zone(mut self, new_proof: &str) -> BuilderResult<Self> {
        self.names.declare(NameKind::Proof, new_proof)?;
        Ok(self.push(Instruction::PopFromAuthZone))
    }

    pub fn push_to_auth_zone(mut self, proof: &str) -> BuilderResult<Self> {
        let id = self.names.live(NameKind::Proof, proof)?;
        self.names.consume(NameKind::Proof, id);
        Ok(self.push(Instruction::PushToAuthZone {
            proof: ManifestProof(id),
        }))
    }

    pub fn drop_auth_zone_proofs(self) -> Self {
        self.push(Instruction::DropAuthZoneProofs)
    }

    pub fn drop_auth_zone_regular_proofs(self) -> Self {
        self.push(Instruction::DropAuthZoneRegularProofs)
    }

    pub fn drop_auth_zone_signature_proofs(self) -> Self {
        self.push(Instruction::DropAuthZoneSignatureProofs)
    }

    pub fn create_proof_from_auth_zone_of_amount(
        mut self,
        resource_address: Address,
        amount: Decimal,
        new_proof: &str,
    ) -> BuilderResult<Self> {
        expect_entity(&resource_address, resource_address.is_resource(), "resource")?;
        self.names.declare(NameKind::Proof, new_proof)?;
        self.record(resource_address);
        Ok(self.push(Instruction::CreateProofFromAuthZoneOfAmount {
            resource_address: *resource_address.node_id(),
            amount,
        }))
    }

    pub fn create_proof_from_auth_zone_of_non_fungibles(
        mut self,
        resource_address: Address,
        ids: impl IntoIterator<Item = NonFungibleLocalId>,
        new_proof: &str,
    ) -> BuilderResult<Self> {
        expect_entity(
            &resource_address,
            resource_address.entity_type().is_non_fungible_resource(),
            "non-fungible resource",
        )?;
        self.names.declare(NameKind::Proof, new_proof)?;
        self.record(resource_address);
        Ok(self.push(Instruction::CreateProofFromAuthZoneOfNonFungibles {
            resource_address: *resource_address.node_id(),
            ids: ids.into_iter().collect(),
        }))
    }

    pub fn create_proof_from_auth_zone_of_all(
        mut self,
        resource_address: Address,
        new_proof: &str,
    ) -> BuilderResult<Self> {
        expect_entity(&resource_address, resource_address.is_resource(), "resource")?;
        self.names.declare(NameKind::Proof, new_proof)?;
        self.record(resource_address);
        Ok(self.push(Instruction::CreateProofFromAuthZoneOfAll {
            resource_address: *resource_address.node_id(),
        }))
    }

    pub fn create_proof_from_bucket_of_amount(
        mut self,
        bucket: &str,
        amount: Decimal,
        new_proof: &str,
    ) -> BuilderResult<Self> {
        let bucket = self.names.live(NameKind::Bucket, bucket)?;
        self.names.declare(NameKind::Proof, new_proof)?;
        Ok(self.push(Instruction::CreateProofFromBucketOfAmount {
            bucket: ManifestBucket(bucket),
            amount,
        }))
    }

    pub fn create_proof_from_bucket_of_non_fungibles(
        mut self,
        bucket: &str,
        ids: impl IntoIterator<Item = NonFungibleLocalId>,
        new_proof: &str,
    ) -> BuilderResult<Self> {
        let bucket = self.names.live(NameKind::Bucket, bucket)?;
        self.names.declare(NameKind::Proof, new_proof)?;
        Ok(self.push(Instruction::CreateProofFromBucketOfNonFungibles {
            bucket: ManifestBucket(bucket),
            ids: ids.into_iter().collect(),
        }))
    }

    pub fn create_proof_from_bucket_of_all(
        mut self,
        bucket: &str,
        new_proof: &str,
    ) -> BuilderResult<Self> {
        let bucket = self.names.live(NameKind::Bucket, bucket)?;
        self.names.declare(NameKind::Proof, new_proof)?;
        Ok(self.push(Instruction::CreateProofFromBucketOfAll {
            bucket: ManifestBucket(bucket),
        }))
    }

    pub fn burn_resource(mut self, bucket: &str) -> BuilderResult<Self> {
        let id = self.names.live(NameKind::Bucket, bucket)?;
        self.names.consume(NameKind::Bucket, id);
        Ok(self.push(Instruction::BurnResource {
            bucket: ManifestBucket(id),
        }))
    }

    pub fn clone_proof(mut self, proof: &str, new_proof: &str) -> BuilderResult<Self> {
        let id = self.names.live(NameKind::Proof, proof)?;
        self.names.declare(NameKind::Proof, new_proof)?;
        Ok(self.push(Instruction::CloneProof {
            proof: ManifestProof(id),
        }))
    }

    pub fn drop_proof(mut self, proof: &str) -> BuilderResult<Self> {
        let id = self.names.live(NameKind::Proof, proof)?;
        self.names.consume(NameKind::Proof, id);
        Ok(self.push(Instruction::DropProof {
            proof: ManifestProof(id),
        }))
    }

    pub fn drop_named_proofs(mut self) -> Self {
        self.names.consume_all(NameKind::Proof);
        self.push(Instruction::DropNamedProofs)
    }

    pub fn drop_all_proofs(mut self) -> Self {
        self.names.consume_all(NameKind::Proof);
        self.push(Instruction::DropAllProofs)
    }

    // Invocations

    pub fn call_function(
        mut self,
        package_address: Address,
        blueprint_name: &str,
        function_name: &str,
        args: impl IntoIterator<Item = ManifestValue>,
    ) -> BuilderResult<Self> {
        expect_entity(&package_address, package_address.is_package(), "package")?;
        let args = ManifestValue::tuple(args);
        self.check_args(&args)?;
        self.consume_args(&args);
        self.record(package_address);
        Ok(self.push(Instruction::CallFunction {
            package_address: ManifestAddress::Static(*package_address.node_id()),
            blueprint_name: blueprint_name.to_string(),
            function_name: function_name.to_string(),
            args,
        }))
    }

    pub fn call_method(
        self,
        address: Address,
        method_name: &str,
        args: impl IntoIterator<Item = ManifestValue>,
    ) -> BuilderResult<Self> {
        self.call(address, method_name, args, CallKind::Main)
    }

    /// Call a method on an address allocated earlier in this manifest.
    pub fn call_method_on_named(
        mut self,
        address_name: &str,
        method_name: &str,
        args: impl IntoIterator<Item = ManifestValue>,
    ) -> BuilderResult<Self> {
        let address = self.named_address(address_name)?;
        let args = ManifestValue::tuple(args);
        self.check_args(&args)?;
        self.consume_args(&args);
        Ok(self.push(Instruction::CallMethod {
            address,
            method_name: method_name.to_string(),
            args,
        }))
    }

    pub fn call_royalty_method(
        self,
        address: Address,
        method_name: &str,
        args: impl IntoIterator<Item = ManifestValue>,
    ) -> BuilderResult<Self> {
        self.call(address, method_name, args, CallKind::Royalty)
    }

    pub fn call_metadata_method(
        self,
        address: Address,
        method_name: &str,
        args: impl IntoIterator<Item = ManifestValue>,
    ) -> BuilderResult<Self> {
        self.call(address, method_name, args, CallKind::Metadata)
    }

    pub fn call_role_assignment_method(
        self,
        address: Address,
        method_name: &str,
        args: impl IntoIterator<Item = ManifestValue>,
    ) -> BuilderResult<Self> {
        self.call(address, method_name, args, CallKind::RoleAssignment)
    }

    pub fn call_direct_vault_method(
        mut self,
        vault_address: Address,
        method_name: &str,
        args: impl IntoIterator<Item = ManifestValue>,
    ) -> BuilderResult<Self> {
        expect_entity(&vault_address, vault_address.entity_type().is_vault(), "vault")?;
        let args = ManifestValue::tuple(args);
        self.check_args(&args)?;
        self.consume_args(&args);
        self.record(vault_address);
        Ok(self.push(Instruction::CallDirectVaultMethod {
            address: *vault_address.node_id(),
            method_name: method_name.to_string(),
            args,
        }))
    }

    fn call(
        mut self,
        address: Address,
        method_name: &str,
        args: impl IntoIterator<Item = ManifestValue>,
        kind: CallKind,
    ) -> BuilderResult<Self> {
        expect_entity(&address, address.is_global(), "global entity")?;
        let args = ManifestValue::tuple(args);
        self.check_args(&args)?;
        self.consume_args(&args);
        self.record(address);
        let target = ManifestAddress::Static(*address.node_id());
        let method_name = method_name.to_string();
        Ok(self.push(match kind {
            CallKind::Main => Instruction::CallMethod {
                address: target,
                method_name,
                args,
            },
            CallKind::Royalty => Instruction::CallRoyaltyMethod {
                address: target,
                method_name,
                args,
            },
            CallKind::Metadata => Instruction::CallMetadataMethod {
                address: target,
                method_name,
                args,
            },
            CallKind::RoleAssignment => Instruction::CallRoleAssignmentMethod {
                address: target,
                method_name,
                args,
            },
        }))
    }

    /// Reserve a global address of `blueprint_name` in `package_address`.
    /// The reservation and the address get separate names.
    pub fn allocate_global_address(
        mut self,
        package_address: Address,
        blueprint_name: &str,
        reservation_name: &str,
        address_name: &str,
    ) -> BuilderResult<Self> {
        expect_entity(&package_address, package_address.is_package(), "package")?;
        self.names
            .check_new(NameKind::AddressReservation, reservation_name)?;
        self.names.check_new(NameKind::NamedAddress, address_name)?;
        self.names
            .declare(NameKind::AddressReservation, reservation_name)?;
        self.names.declare(NameKind::NamedAddress, address_name)?;
        self.record(package_address);
        Ok(self.push(Instruction::AllocateGlobalAddress {
            package_address: *package_address.node_id(),
            blueprint_name: blueprint_name.to_string(),
        }))
    }

    // Blobs

    /// Attach a blob. Reference it from call arguments with [`blob_ref`].
    pub fn add_blob(mut self, blob: Vec<u8>) -> Self {
        self.blobs.entry(Hash::of(&blob)).or_insert(blob);
        self
    }

    // Faucet

    /// Lock the default fee from the faucet.
    pub fn lock_fee_from_faucet(self) -> Self {
        self.push(Instruction::CallMethod {
            address: ManifestAddress::Static(node_ids::FAUCET),
            method_name: idents::FAUCET_LOCK_FEE.to_string(),
            args: ManifestValue::tuple([ManifestValue::Decimal(Decimal::from(FAUCET_FEE))]),
        })
    }

    /// Put free XRD from the faucet on the worktop.
    pub fn get_free_xrd_from_faucet(self) -> Self {
        self.push(Instruction::CallMethod {
            address: ManifestAddress::Static(node_ids::FAUCET),
            method_name: idents::FAUCET_FREE.to_string(),
            args: ManifestValue::unit(),
        })
    }

    // Accounts

    fn account_call(
        self,
        account: Address,
        method_name: &str,
        args: impl IntoIterator<Item = ManifestValue>,
    ) -> BuilderResult<Self> {
        expect_entity(&account, account.is_account(), "account")?;
        self.call_method(account, method_name, args)
    }

    pub fn lock_fee(self, account: Address, amount: Decimal) -> BuilderResult<Self> {
        self.account_call(account, idents::ACCOUNT_LOCK_FEE, [ManifestValue::Decimal(amount)])
    }

    pub fn withdraw_from_account(
        self,
        account: Address,
        resource_address: Address,
        amount: Decimal,
    ) -> BuilderResult<Self> {
        expect_entity(&resource_address, resource_address.is_resource(), "resource")?;
        self.record_arg(resource_address).account_call(
            account,
            idents::ACCOUNT_WITHDRAW,
            [
                ManifestValue::static_address(*resource_address.node_id()),
                ManifestValue::Decimal(amount),
            ],
        )
    }

    pub fn withdraw_non_fungibles_from_account(
        self,
        account: Address,
        resource_address: Address,
        ids: impl IntoIterator<Item = NonFungibleLocalId>,
    ) -> BuilderResult<Self> {
        expect_entity(
            &resource_address,
            resource_address.entity_type().is_non_fungible_resource(),
            "non-fungible resource",
        )?;
        let ids = ManifestValue::array(
            ValueKind::NonFungibleLocalId,
            ids.into_iter().map(ManifestValue::NonFungibleLocalId),
        );
        self.record_arg(resource_address).account_call(
            account,
            idents::ACCOUNT_WITHDRAW_NON_FUNGIBLES,
            [ManifestValue::static_address(*resource_address.node_id()), ids],
        )
    }

    pub fn deposit(self, account: Address, bucket: &str) -> BuilderResult<Self> {
        let bucket = self.bucket(bucket)?;
        self.account_call(account, idents::ACCOUNT_DEPOSIT, [ManifestValue::Bucket(bucket)])
    }

    /// Deposit everything on the worktop.
    pub fn deposit_entire_worktop(self, account: Address) -> BuilderResult<Self> {
        self.account_call(
            account,
            idents::ACCOUNT_DEPOSIT_BATCH,
            [ManifestValue::Expression(ManifestExpression::EntireWorktop)],
        )
    }

    /// Deposit a bucket, aborting the transaction if the account's deposit
    /// rules refuse it.
    pub fn try_deposit_or_abort(self, account: Address, bucket: &str) -> BuilderResult<Self> {
        let bucket = self.bucket(bucket)?;
        self.account_call(
            account,
            idents::ACCOUNT_TRY_DEPOSIT_OR_ABORT,
            [ManifestValue::Bucket(bucket), ManifestValue::none()],
        )
    }

    /// Deposit a bucket, returning it to the worktop if refused.
    pub fn try_deposit_or_refund(self, account: Address, bucket: &str) -> BuilderResult<Self> {
        let bucket = self.bucket(bucket)?;
        self.account_call(
            account,
            idents::ACCOUNT_TRY_DEPOSIT_OR_REFUND,
            [ManifestValue::Bucket(bucket), ManifestValue::none()],
        )
    }

    pub fn try_deposit_entire_worktop_or_abort(self, account: Address) -> BuilderResult<Self> {
        self.account_call(
            account,
            idents::ACCOUNT_TRY_DEPOSIT_BATCH_OR_ABORT,
            [
                ManifestValue::Expression(ManifestExpression::EntireWorktop),
                ManifestValue::none(),
            ],
        )
    }

    pub fn try_deposit_entire_worktop_or_refund(self, account: Address) -> BuilderResult<Self> {
        self.account_call(
            account,
            idents::ACCOUNT_TRY_DEPOSIT_BATCH_OR_REFUND,
            [
                ManifestValue::Expression(ManifestExpression::EntireWorktop),
                ManifestValue::none(),
            ],
        )
    }

    /// Put a proof of `amount` of the account's resource in the auth zone.
    pub fn create_proof_from_account_of_amount(
        self,
        account: Address,
        resource_address: Address,
        amount: Decimal,
    ) -> BuilderResult<Self> {
        expect_entity(&resource_address, resource_address.is_resource(), "resource")?;
        self.record_arg(resource_address).account_call(
            account,
            idents::ACCOUNT_CREATE_PROOF_OF_AMOUNT,
            [
                ManifestValue::static_address(*resource_address.node_id()),
                ManifestValue::Decimal(amount),
            ],
        )
    }

    pub fn create_proof_from_account_of_non_fungibles(
        self,
        account: Address,
        resource_address: Address,
        ids: impl IntoIterator<Item = NonFungibleLocalId>,
    ) -> BuilderResult<Self> {
        expect_entity(
            &resource_address,
            resource_address.entity_type().is_non_fungible_resource(),
            "non-fungible resource",
        )?;
        let ids = ManifestValue::array(
            ValueKind::NonFungibleLocalId,
            ids.into_iter().map(ManifestValue::NonFungibleLocalId),
        );
        self.record_arg(resource_address).account_call(
            account,
            idents::ACCOUNT_CREATE_PROOF_OF_NON_FUNGIBLES,
            [ManifestValue::static_address(*resource_address.node_id()), ids],
        )
    }

    pub fn set_default_deposit_rule(
        self,
        account: Address,
        rule: DefaultDepositRule,
    ) -> BuilderResult<Self> {
        self.account_call(
            account,
            idents::ACCOUNT_SET_DEFAULT_DEPOSIT_RULE,
            [ManifestValue::enum_variant(rule.discriminator(), [])],
        )
    }

    // Validators and pools

    fn validator_call(self, validator: Address, method: &str, bucket: &str) -> BuilderResult<Self> {
        expect_entity(&validator, validator.is_validator(), "validator")?;
        let bucket = self.bucket(bucket)?;
        self.call_method(validator, method, [ManifestValue::Bucket(bucket)])
    }

    /// Stake the XRD in `bucket`.
    pub fn stake_validator(self, validator: Address, bucket: &str) -> BuilderResult<Self> {
        self.validator_call(validator, idents::VALIDATOR_STAKE, bucket)
    }

    /// Unstake the liquid stake units in `bucket`.
    pub fn unstake_validator(self, validator: Address, bucket: &str) -> BuilderResult<Self> {
        self.validator_call(validator, idents::VALIDATOR_UNSTAKE, bucket)
    }

    /// Claim XRD with the claim NFTs in `bucket`.
    pub fn claim_validator_xrd(self, validator: Address, bucket: &str) -> BuilderResult<Self> {
        self.validator_call(validator, idents::VALIDATOR_CLAIM_XRD, bucket)
    }

    /// Contribute the buckets to a pool. One-resource pools take a single
    /// bucket; the others take an array.
    pub fn contribute_to_pool(self, pool: Address, buckets: &[&str]) -> BuilderResult<Self> {
        expect_entity(&pool, pool.is_pool(), "pool")?;
        let buckets = buckets
            .iter()
            .map(|name| self.bucket(name).map(ManifestValue::Bucket))
            .collect::<BuilderResult<Vec<_>>>()?;
        let arg = match (pool.entity_type(), buckets.as_slice()) {
            (txkit_types::EntityType::GlobalOneResourcePool, [single]) => single.clone(),
            _ => ManifestValue::array(ValueKind::Bucket, buckets),
        };
        self.call_method(pool, idents::POOL_CONTRIBUTE, [arg])
    }

    /// Redeem the pool units in `bucket`.
    pub fn redeem_from_pool(self, pool: Address, bucket: &str) -> BuilderResult<Self> {
        expect_entity(&pool, pool.is_pool(), "pool")?;
        let bucket = self.bucket(bucket)?;
        self.call_method(pool, idents::POOL_REDEEM, [ManifestValue::Bucket(bucket)])
    }

    fn record_arg(mut self, address: Address) -> Self {
        self.record(address);
        self
    }

    /// Finish the manifest for `network_id`.
    ///
    /// Fails if any address passed to the builder belongs to another network.
    pub fn build(self, network_id: NetworkId) -> BuilderResult<Manifest> {
        if let Some(address) = self
            .addresses
            .iter()
            .find(|address| address.network_id() != network_id)
        {
            return Err(BuilderError::NetworkMismatch {
                address: display_address(address),
                expected: network_id,
                actual: address.network_id(),
            });
        }
        let manifest = Manifest::new_unchecked(
            self.instructions,
            self.blobs.into_values().collect(),
            network_id,
        );
        debug!(
            network_id,
            instructions = manifest.len(),
            blobs = manifest.blobs().len(),
            "built manifest"
        );
        Ok(manifest)
    }
}

#[derive(Clone, Copy)]
enum CallKind {
    Main,
    Royalty,
    Metadata,
    RoleAssignment,
}

/// Call argument referencing a blob by its hash.
pub fn blob_ref(blob: &[u8]) -> ManifestValue {
    ManifestValue::Blob(ManifestBlobRef(Hash::of(blob)))
}

#[cfg(test)]
mod tests {
    use super::*;
    use txkit_types::{known_addresses, EntityType, NodeId};

    const NETWORK: NetworkId = 0x01;

    fn xrd() -> Address {
        known_addresses(NETWORK).unwrap().resource_addresses.xrd
    }

    fn account() -> Address {
        Address::new(NodeId::from_parts(EntityType::GlobalAccount, &[7; 29]), NETWORK).unwrap()
    }

    #[test]
    fn faucet_transfer_builds() {
        let manifest = ManifestBuilder::new()
            .lock_fee_from_faucet()
            .get_free_xrd_from_faucet()
            .take_all_from_worktop(xrd(), "xrd")
            .unwrap()
            .try_deposit_or_abort(account(), "xrd")
            .unwrap()
            .build(NETWORK)
            .unwrap();
        assert_eq!(manifest.len(), 4);
        assert!(manifest.validate().is_ok());
        match &manifest.instructions()[3] {
            Instruction::CallMethod { args, .. } => {
                assert_eq!(args.buckets(), vec![ManifestBucket(0)]);
            }
            other => panic!("unexpected instruction {other:?}"),
        }
    }

    #[test]
    fn bucket_cannot_be_deposited_twice() {
        let builder = ManifestBuilder::new()
            .get_free_xrd_from_faucet()
            .take_all_from_worktop(xrd(), "xrd")
            .unwrap()
            .deposit(account(), "xrd")
            .unwrap();
        assert_eq!(
            builder.deposit(account(), "xrd").unwrap_err(),
            BuilderError::NameConsumed {
                kind: NameKind::Bucket,
                name: "xrd".into()
            }
        );
    }

    #[test]
    fn duplicate_bucket_name_is_rejected() {
        let builder = ManifestBuilder::new().take_all_from_worktop(xrd(), "b").unwrap();
        assert!(matches!(
            builder.take_all_from_worktop(xrd(), "b"),
            Err(BuilderError::DuplicateName { .. })
        ));
    }

    #[test]
    fn unknown_bucket_is_rejected() {
        assert!(matches!(
            ManifestBuilder::new().return_to_worktop("nope"),
            Err(BuilderError::UnknownName { .. })
        ));
    }

    #[test]
    fn bucket_ids_in_args_are_checked() {
        let result = ManifestBuilder::new().call_method(
            account(),
            "deposit",
            [ManifestValue::Bucket(ManifestBucket(3))],
        );
        assert_eq!(
            result.unwrap_err(),
            BuilderError::UnknownId {
                kind: NameKind::Bucket,
                id: 3
            }
        );
    }

    #[test]
    fn same_bucket_twice_in_args_is_rejected() {
        let builder = ManifestBuilder::new().take_all_from_worktop(xrd(), "b").unwrap();
        let bucket = builder.bucket("b").unwrap();
        let result = builder.call_method(
            account(),
            "deposit",
            [ManifestValue::Bucket(bucket), ManifestValue::Bucket(bucket)],
        );
        assert!(matches!(result, Err(BuilderError::IdConsumed { .. })));
    }

    #[test]
    fn wrong_entity_types_are_rejected() {
        assert!(matches!(
            ManifestBuilder::new().take_all_from_worktop(account(), "b"),
            Err(BuilderError::UnexpectedEntity {
                expected: "resource",
                ..
            })
        ));
        assert!(matches!(
            ManifestBuilder::new().deposit_entire_worktop(xrd()),
            Err(BuilderError::UnexpectedEntity { .. })
        ));
    }

    #[test]
    fn build_rejects_foreign_network_addresses() {
        let stokenet_xrd = xrd().on_network(0x02);
        let builder = ManifestBuilder::new()
            .take_all_from_worktop(stokenet_xrd, "b")
            .unwrap();
        assert!(matches!(
            builder.build(NETWORK),
            Err(BuilderError::NetworkMismatch {
                expected: NETWORK,
                actual: 0x02,
                ..
            })
        ));
    }

    #[test]
    fn proofs_follow_the_name_record() {
        let manifest = ManifestBuilder::new()
            .create_proof_from_auth_zone_of_all(xrd(), "p")
            .unwrap()
            .clone_proof("p", "p2")
            .unwrap()
            .drop_proof("p")
            .unwrap()
            .drop_all_proofs()
            .build(NETWORK)
            .unwrap();
        assert_eq!(
            manifest.instructions()[1],
            Instruction::CloneProof {
                proof: ManifestProof(0)
            }
        );
        assert!(manifest.validate().is_ok());
    }

    #[test]
    fn blobs_must_be_added_before_use() {
        let blob = b"code".to_vec();
        let err = ManifestBuilder::new()
            .call_method(account(), "publish", [blob_ref(&blob)])
            .unwrap_err();
        assert_eq!(err, BuilderError::UnknownBlob(Hash::of(&blob)));

        let manifest = ManifestBuilder::new()
            .add_blob(blob.clone())
            .call_method(account(), "publish", [blob_ref(&blob)])
            .unwrap()
            .build(NETWORK)
            .unwrap();
        assert_eq!(manifest.blobs(), &[blob]);
    }

    #[test]
    fn allocated_addresses_can_be_called() {
        let package = known_addresses(NETWORK).unwrap().package_addresses.account_package;
        let builder = ManifestBuilder::new()
            .allocate_global_address(package, "Account", "reservation", "new_account")
            .unwrap();
        let reservation = builder.address_reservation("reservation").unwrap();
        let manifest = builder
            .call_function(
                package,
                "Account",
                "create_advanced",
                [ManifestValue::AddressReservation(reservation)],
            )
            .unwrap()
            .call_method_on_named("new_account", "lock_fee", [ManifestValue::Decimal(Decimal::ONE)])
            .unwrap()
            .build(NETWORK)
            .unwrap();
        assert_eq!(manifest.len(), 3);
        assert!(manifest.validate().is_ok());
    }
}
