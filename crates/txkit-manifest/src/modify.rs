//! Edits applied to an already-built manifest.
//!
//! Wallets receive manifests from dApps and add their own instructions
//! before signing: guarantees on what lands on the worktop, the fee lock,
//! and proofs from access controllers that guard the fee account.

use serde::{Deserialize, Serialize};
use tracing::debug;
use txkit_sbor::{Encode, ManifestAddress, ManifestValue, ValueKind};
use txkit_types::{Address, Decimal, EntityType, NetworkId, NonFungibleLocalId};

use crate::builder::display_address;
use crate::error::{ManifestError, Result};
use crate::idents;
use crate::instruction::Instruction;
use crate::manifest::Manifest;

/// A worktop assertion to insert into a manifest.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum Assertion {
    /// At least `amount` of the resource is on the worktop.
    Amount {
        resource_address: Address,
        amount: Decimal,
    },
    /// Every listed non-fungible is on the worktop.
    Ids {
        resource_address: Address,
        ids: Vec<NonFungibleLocalId>,
    },
}

impl Assertion {
    pub fn resource_address(&self) -> &Address {
        match self {
            Self::Amount {
                resource_address, ..
            }
            | Self::Ids {
                resource_address, ..
            } => resource_address,
        }
    }

    fn into_instruction(self) -> Instruction {
        match self {
            Self::Amount {
                resource_address,
                amount,
            } => Instruction::AssertWorktopContains {
                resource_address: *resource_address.node_id(),
                amount,
            },
            Self::Ids {
                resource_address,
                ids,
            } => Instruction::AssertWorktopContainsNonFungibles {
                resource_address: *resource_address.node_id(),
                ids,
            },
        }
    }
}

/// Edits for [`Manifest::modify`].
///
/// Assertions go in first, so their indexes refer to the unmodified
/// instruction list. The fee lock follows, then the access controller
/// proofs, which end up ahead of everything else.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ManifestModifications {
    /// Access controllers to call `create_proof` on, in call order.
    pub add_access_controller_proofs: Vec<Address>,
    /// Account to lock the fee against, and the amount to lock.
    pub add_lock_fee: Option<(Address, Decimal)>,
    /// Assertions keyed by the instruction index they are inserted at.
    pub add_assertions: Vec<(usize, Assertion)>,
}

impl ManifestModifications {
    pub fn is_empty(&self) -> bool {
        self.add_access_controller_proofs.is_empty()
            && self.add_lock_fee.is_none()
            && self.add_assertions.is_empty()
    }
}

impl Manifest {
    /// Apply `modifications`, returning a new manifest.
    ///
    /// If the first instruction withdraws from the fee account, it is turned
    /// into the matching lock-fee-and-withdraw call; otherwise a `lock_fee`
    /// call is inserted at the start. The result is validated like any other
    /// manifest.
    pub fn modify(&self, modifications: ManifestModifications) -> Result<Manifest> {
        let ManifestModifications {
            add_access_controller_proofs,
            add_lock_fee,
            mut add_assertions,
        } = modifications;
        let network_id = self.network_id();
        let mut instructions = self.instructions().to_vec();
        let original_length = instructions.len();

        // Descending, so an insertion never shifts a later target.
        add_assertions.sort_by(|(a, _), (b, _)| b.cmp(a));
        if let Some((index, _)) = add_assertions.first() {
            if *index > instructions.len() {
                return Err(ManifestError::AssertionIndexOutOfBounds {
                    index: *index,
                    length: instructions.len(),
                });
            }
        }
        let assertions = add_assertions.len();
        for (index, assertion) in add_assertions {
            let resource = assertion.resource_address();
            let expected = match assertion {
                Assertion::Amount { .. } => "resource",
                Assertion::Ids { .. } => "non-fungible resource",
            };
            let matches = match assertion {
                Assertion::Amount { .. } => resource.is_resource(),
                Assertion::Ids { .. } => resource.entity_type().is_non_fungible_resource(),
            };
            check_address(resource, network_id, matches, expected)?;
            instructions.insert(index, assertion.into_instruction());
        }

        if let Some((account, amount)) = add_lock_fee {
            check_address(&account, network_id, account.is_account(), "account")?;
            if !fold_into_withdraw(&mut instructions, &account, amount)? {
                instructions.insert(
                    0,
                    Instruction::CallMethod {
                        address: ManifestAddress::Static(*account.node_id()),
                        method_name: idents::ACCOUNT_LOCK_FEE.to_owned(),
                        args: ManifestValue::tuple([ManifestValue::Decimal(amount)]),
                    },
                );
            }
        }

        for controller in &add_access_controller_proofs {
            check_address(
                controller,
                network_id,
                controller.entity_type() == EntityType::GlobalAccessController,
                "access controller",
            )?;
        }
        let proofs = add_access_controller_proofs.len();
        let instructions: Vec<Instruction> = add_access_controller_proofs
            .into_iter()
            .map(|controller| Instruction::CallMethod {
                address: ManifestAddress::Static(*controller.node_id()),
                method_name: idents::ACCESS_CONTROLLER_CREATE_PROOF.to_owned(),
                args: ManifestValue::unit(),
            })
            .chain(instructions)
            .collect();

        debug!(
            original_length,
            length = instructions.len(),
            assertions,
            access_controller_proofs = proofs,
            lock_fee = add_lock_fee.is_some(),
            "modified manifest"
        );
        Manifest::new(instructions, self.blobs().to_vec(), network_id)
    }
}

fn check_address(
    address: &Address,
    network_id: NetworkId,
    matches: bool,
    expected: &'static str,
) -> Result<()> {
    if address.network_id() != network_id {
        return Err(ManifestError::NetworkMismatch {
            address: display_address(address),
            expected: network_id,
            actual: address.network_id(),
        });
    }
    if !matches {
        return Err(ManifestError::UnexpectedEntity {
            address: display_address(address),
            expected,
        });
    }
    Ok(())
}

/// Rewrite a leading withdraw from `account` so it also locks the fee.
/// Returns `false` when the first instruction is anything else.
fn fold_into_withdraw(
    instructions: &mut [Instruction],
    account: &Address,
    fee: Decimal,
) -> Result<bool> {
    let Some(Instruction::CallMethod {
        address: ManifestAddress::Static(node_id),
        method_name,
        args,
    }) = instructions.first_mut()
    else {
        return Ok(false);
    };
    if *node_id != *account.node_id() {
        return Ok(false);
    }
    let (rewritten, withdrawn_kind) = match method_name.as_str() {
        idents::ACCOUNT_WITHDRAW => (idents::ACCOUNT_LOCK_FEE_AND_WITHDRAW, ValueKind::Decimal),
        idents::ACCOUNT_WITHDRAW_NON_FUNGIBLES => (
            idents::ACCOUNT_LOCK_FEE_AND_WITHDRAW_NON_FUNGIBLES,
            ValueKind::Array,
        ),
        _ => return Ok(false),
    };

    let fields = match args.as_tuple() {
        Some([resource @ ManifestValue::Address(_), withdrawn])
            if withdrawn.value_kind() == withdrawn_kind =>
        {
            [
                ManifestValue::Decimal(fee),
                resource.clone(),
                withdrawn.clone(),
            ]
        }
        _ => {
            return Err(ManifestError::InvalidArguments {
                index: 0,
                method_name: method_name.clone(),
            })
        }
    };
    *method_name = rewritten.to_owned();
    *args = ManifestValue::tuple(fields);
    Ok(true)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::builder::ManifestBuilder;
    use txkit_types::known_addresses::node_ids;
    use txkit_types::{known_addresses, NodeId};

    const NETWORK: NetworkId = 0x01;

    fn xrd() -> Address {
        known_addresses(NETWORK).unwrap().resource_addresses.xrd
    }

    fn account() -> Address {
        Address::new(NodeId::from_parts(EntityType::GlobalAccount, &[7; 29]), NETWORK).unwrap()
    }

    fn other_account() -> Address {
        Address::new(NodeId::from_parts(EntityType::GlobalAccount, &[8; 29]), NETWORK).unwrap()
    }

    fn badges() -> Address {
        Address::new(
            NodeId::from_parts(EntityType::GlobalNonFungibleResourceManager, &[3; 29]),
            NETWORK,
        )
        .unwrap()
    }

    fn controller() -> Address {
        Address::new(
            NodeId::from_parts(EntityType::GlobalAccessController, &[5; 29]),
            NETWORK,
        )
        .unwrap()
    }

    fn fee() -> Decimal {
        Decimal::from(10i64)
    }

    fn transfer() -> Manifest {
        ManifestBuilder::new()
            .withdraw_from_account(account(), xrd(), Decimal::from(100i64))
            .unwrap()
            .take_all_from_worktop(xrd(), "xrd")
            .unwrap()
            .try_deposit_or_abort(other_account(), "xrd")
            .unwrap()
            .build(NETWORK)
            .unwrap()
    }

    fn method(instruction: &Instruction) -> (&NodeId, &str, &ManifestValue) {
        match instruction {
            Instruction::CallMethod {
                address: ManifestAddress::Static(node_id),
                method_name,
                args,
            } => (node_id, method_name.as_str(), args),
            other => panic!("expected a static method call, got {other:?}"),
        }
    }

    #[test]
    fn no_modifications_is_identity() {
        let manifest = transfer();
        let modifications = ManifestModifications::default();
        assert!(modifications.is_empty());
        assert_eq!(manifest.modify(modifications).unwrap(), manifest);
    }

    #[test]
    fn assertion_past_the_end_is_rejected() {
        let manifest = transfer();
        let err = manifest
            .modify(ManifestModifications {
                add_assertions: vec![(
                    4,
                    Assertion::Amount {
                        resource_address: xrd(),
                        amount: Decimal::ONE,
                    },
                )],
                ..Default::default()
            })
            .unwrap_err();
        assert_eq!(
            err,
            ManifestError::AssertionIndexOutOfBounds {
                index: 4,
                length: 3
            }
        );
    }

    #[test]
    fn assertions_land_at_their_original_indexes() {
        let manifest = transfer();
        let ids = vec![NonFungibleLocalId::integer(1)];
        let modified = manifest
            .modify(ManifestModifications {
                add_assertions: vec![
                    (
                        1,
                        Assertion::Amount {
                            resource_address: xrd(),
                            amount: Decimal::from(100i64),
                        },
                    ),
                    (
                        3,
                        Assertion::Ids {
                            resource_address: badges(),
                            ids: ids.clone(),
                        },
                    ),
                ],
                ..Default::default()
            })
            .unwrap();

        let instructions = modified.instructions();
        assert_eq!(instructions.len(), 5);
        assert_eq!(instructions[0], manifest.instructions()[0]);
        assert_eq!(
            instructions[1],
            Instruction::AssertWorktopContains {
                resource_address: *xrd().node_id(),
                amount: Decimal::from(100i64),
            }
        );
        assert_eq!(instructions[2], manifest.instructions()[1]);
        assert_eq!(instructions[3], manifest.instructions()[2]);
        assert_eq!(
            instructions[4],
            Instruction::AssertWorktopContainsNonFungibles {
                resource_address: *badges().node_id(),
                ids,
            }
        );
    }

    #[test]
    fn leading_withdraw_becomes_lock_fee_and_withdraw() {
        let manifest = transfer();
        let modified = manifest
            .modify(ManifestModifications {
                add_lock_fee: Some((account(), fee())),
                ..Default::default()
            })
            .unwrap();

        assert_eq!(modified.len(), manifest.len());
        let (node_id, method_name, args) = method(&modified.instructions()[0]);
        assert_eq!(node_id, account().node_id());
        assert_eq!(method_name, idents::ACCOUNT_LOCK_FEE_AND_WITHDRAW);
        assert_eq!(
            *args,
            ManifestValue::tuple([
                ManifestValue::Decimal(fee()),
                ManifestValue::static_address(*xrd().node_id()),
                ManifestValue::Decimal(Decimal::from(100i64)),
            ])
        );
        assert_eq!(modified.instructions()[1..], manifest.instructions()[1..]);
    }

    #[test]
    fn leading_non_fungible_withdraw_keeps_its_ids() {
        let ids = vec![NonFungibleLocalId::integer(1), NonFungibleLocalId::integer(2)];
        let manifest = ManifestBuilder::new()
            .withdraw_non_fungibles_from_account(account(), badges(), ids.clone())
            .unwrap()
            .take_all_from_worktop(badges(), "badges")
            .unwrap()
            .try_deposit_or_abort(other_account(), "badges")
            .unwrap()
            .build(NETWORK)
            .unwrap();
        let modified = manifest
            .modify(ManifestModifications {
                add_lock_fee: Some((account(), fee())),
                ..Default::default()
            })
            .unwrap();

        let (_, method_name, args) = method(&modified.instructions()[0]);
        assert_eq!(method_name, idents::ACCOUNT_LOCK_FEE_AND_WITHDRAW_NON_FUNGIBLES);
        assert_eq!(
            *args,
            ManifestValue::tuple([
                ManifestValue::Decimal(fee()),
                ManifestValue::static_address(*badges().node_id()),
                ManifestValue::array(
                    ValueKind::NonFungibleLocalId,
                    ids.into_iter().map(ManifestValue::NonFungibleLocalId),
                ),
            ])
        );
    }

    #[test]
    fn lock_fee_is_inserted_when_first_call_is_not_a_withdraw_from_the_fee_account() {
        let manifest = transfer();
        let modified = manifest
            .modify(ManifestModifications {
                add_lock_fee: Some((other_account(), fee())),
                ..Default::default()
            })
            .unwrap();

        assert_eq!(modified.len(), manifest.len() + 1);
        let (node_id, method_name, args) = method(&modified.instructions()[0]);
        assert_eq!(node_id, other_account().node_id());
        assert_eq!(method_name, idents::ACCOUNT_LOCK_FEE);
        assert_eq!(*args, ManifestValue::tuple([ManifestValue::Decimal(fee())]));
        assert_eq!(modified.instructions()[1..], manifest.instructions()[..]);
    }

    #[test]
    fn lock_fee_is_inserted_into_an_empty_manifest() {
        let manifest = Manifest::new(vec![], vec![], NETWORK).unwrap();
        let modified = manifest
            .modify(ManifestModifications {
                add_lock_fee: Some((account(), fee())),
                ..Default::default()
            })
            .unwrap();
        assert_eq!(modified.len(), 1);
        assert_eq!(method(&modified.instructions()[0]).1, idents::ACCOUNT_LOCK_FEE);
    }

    #[test]
    fn access_controller_proofs_come_first() {
        let manifest = transfer();
        let modified = manifest
            .modify(ManifestModifications {
                add_access_controller_proofs: vec![controller()],
                add_lock_fee: Some((account(), fee())),
                add_assertions: vec![],
            })
            .unwrap();

        assert_eq!(modified.len(), manifest.len() + 1);
        let (node_id, method_name, args) = method(&modified.instructions()[0]);
        assert_eq!(node_id, controller().node_id());
        assert_eq!(method_name, idents::ACCESS_CONTROLLER_CREATE_PROOF);
        assert_eq!(*args, ManifestValue::unit());
        assert_eq!(
            method(&modified.instructions()[1]).1,
            idents::ACCOUNT_LOCK_FEE_AND_WITHDRAW
        );
    }

    #[test]
    fn malformed_withdraw_arguments_are_rejected() {
        let manifest = Manifest::new(
            vec![Instruction::CallMethod {
                address: ManifestAddress::Static(*account().node_id()),
                method_name: idents::ACCOUNT_WITHDRAW.to_owned(),
                args: ManifestValue::tuple([ManifestValue::Decimal(Decimal::ONE)]),
            }],
            vec![],
            NETWORK,
        )
        .unwrap();
        assert!(matches!(
            manifest.modify(ManifestModifications {
                add_lock_fee: Some((account(), fee())),
                ..Default::default()
            }),
            Err(ManifestError::InvalidArguments { index: 0, .. })
        ));
    }

    #[test]
    fn wrong_entities_and_networks_are_rejected() {
        let manifest = transfer();
        assert!(matches!(
            manifest.modify(ManifestModifications {
                add_lock_fee: Some((xrd(), fee())),
                ..Default::default()
            }),
            Err(ManifestError::UnexpectedEntity {
                expected: "account",
                ..
            })
        ));
        assert!(matches!(
            manifest.modify(ManifestModifications {
                add_access_controller_proofs: vec![account()],
                ..Default::default()
            }),
            Err(ManifestError::UnexpectedEntity {
                expected: "access controller",
                ..
            })
        ));
        assert!(matches!(
            manifest.modify(ManifestModifications {
                add_lock_fee: Some((account().on_network(2), fee())),
                ..Default::default()
            }),
            Err(ManifestError::NetworkMismatch {
                expected: NETWORK,
                actual: 2,
                ..
            })
        ));
    }

    #[test]
    fn modified_manifests_still_compile() {
        let modified = transfer()
            .modify(ManifestModifications {
                add_lock_fee: Some((account(), fee())),
                add_assertions: vec![(
                    1,
                    Assertion::Amount {
                        resource_address: Address::new(node_ids::XRD, NETWORK).unwrap(),
                        amount: Decimal::ONE,
                    },
                )],
                ..Default::default()
            })
            .unwrap();
        let bytes = modified.compile().unwrap();
        assert_eq!(Manifest::decompile(&bytes, NETWORK).unwrap(), modified);
        assert_ne!(modified.hash().unwrap(), transfer().hash().unwrap());
    }
}
