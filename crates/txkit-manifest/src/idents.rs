//! Method and function names of the native blueprints the toolkit builds
//! calls for and recognises during analysis.

pub const FAUCET_LOCK_FEE: &str = "lock_fee";
pub const FAUCET_FREE: &str = "free";

pub const ACCOUNT_LOCK_FEE: &str = "lock_fee";
pub const ACCOUNT_LOCK_CONTINGENT_FEE: &str = "lock_contingent_fee";
pub const ACCOUNT_WITHDRAW: &str = "withdraw";
pub const ACCOUNT_WITHDRAW_NON_FUNGIBLES: &str = "withdraw_non_fungibles";
pub const ACCOUNT_LOCK_FEE_AND_WITHDRAW: &str = "lock_fee_and_withdraw";
pub const ACCOUNT_LOCK_FEE_AND_WITHDRAW_NON_FUNGIBLES: &str = "lock_fee_and_withdraw_non_fungibles";
pub const ACCOUNT_DEPOSIT: &str = "deposit";
pub const ACCOUNT_DEPOSIT_BATCH: &str = "deposit_batch";
pub const ACCOUNT_TRY_DEPOSIT_OR_ABORT: &str = "try_deposit_or_abort";
pub const ACCOUNT_TRY_DEPOSIT_BATCH_OR_ABORT: &str = "try_deposit_batch_or_abort";
pub const ACCOUNT_TRY_DEPOSIT_OR_REFUND: &str = "try_deposit_or_refund";
pub const ACCOUNT_TRY_DEPOSIT_BATCH_OR_REFUND: &str = "try_deposit_batch_or_refund";
pub const ACCOUNT_CREATE_PROOF_OF_AMOUNT: &str = "create_proof_of_amount";
pub const ACCOUNT_CREATE_PROOF_OF_NON_FUNGIBLES: &str = "create_proof_of_non_fungibles";
pub const ACCOUNT_SECURIFY: &str = "securify";
pub const ACCOUNT_SET_DEFAULT_DEPOSIT_RULE: &str = "set_default_deposit_rule";
pub const ACCOUNT_SET_RESOURCE_PREFERENCE: &str = "set_resource_preference";
pub const ACCOUNT_REMOVE_RESOURCE_PREFERENCE: &str = "remove_resource_preference";
pub const ACCOUNT_ADD_AUTHORIZED_DEPOSITOR: &str = "add_authorized_depositor";
pub const ACCOUNT_REMOVE_AUTHORIZED_DEPOSITOR: &str = "remove_authorized_depositor";

pub const IDENTITY_SECURIFY: &str = "securify";

pub const VALIDATOR_STAKE: &str = "stake";
pub const VALIDATOR_UNSTAKE: &str = "unstake";
pub const VALIDATOR_CLAIM_XRD: &str = "claim_xrd";

pub const POOL_CONTRIBUTE: &str = "contribute";
pub const POOL_REDEEM: &str = "redeem";

pub const ACCESS_CONTROLLER_CREATE_PROOF: &str = "create_proof";

pub const METADATA_SET: &str = "set";
pub const METADATA_LOCK: &str = "lock";

/// Metadata field holding the public key hashes that own an entity.
pub const OWNER_KEYS_METADATA_KEY: &str = "owner_keys";

pub const ROYALTY_SET: &str = "set_royalty";
pub const ROLE_ASSIGNMENT_SET: &str = "set";

/// Account methods that deposit resources into the receiver.
pub const ACCOUNT_DEPOSIT_METHODS: [&str; 6] = [
    ACCOUNT_DEPOSIT,
    ACCOUNT_DEPOSIT_BATCH,
    ACCOUNT_TRY_DEPOSIT_OR_ABORT,
    ACCOUNT_TRY_DEPOSIT_BATCH_OR_ABORT,
    ACCOUNT_TRY_DEPOSIT_OR_REFUND,
    ACCOUNT_TRY_DEPOSIT_BATCH_OR_REFUND,
];

/// Account methods that withdraw resources from the receiver.
pub const ACCOUNT_WITHDRAW_METHODS: [&str; 4] = [
    ACCOUNT_WITHDRAW,
    ACCOUNT_WITHDRAW_NON_FUNGIBLES,
    ACCOUNT_LOCK_FEE_AND_WITHDRAW,
    ACCOUNT_LOCK_FEE_AND_WITHDRAW_NON_FUNGIBLES,
];
