//! Root- and child-chain contract bindings.
//!
//! Calls are ABI-encoded with `alloy-sol-types`; events are matched by topic
//! and decoded from receipt logs.

use alloy_primitives::{Address as SolAddress, Bytes, B256, U256 as SolU256};
use alloy_sol_types::{sol, SolCall, SolEvent};
use pb_04_checkpoint::ExitProof;
use shared_types::{u256_to_be_bytes, Address, U256};

use crate::domain::{CheckpointSubmission, Log};

/// Child-chain system contract holding the validator set.
pub const VALIDATOR_SET_CONTRACT: Address = {
    let mut address = [0u8; 20];
    address[18] = 0x01;
    address[19] = 0x01;
    address
};

sol! {
    // ERC-20 / mintable token
    function approve(address spender, uint256 amount) external returns (bool);
    function mint(address to, uint256 amount) external;

    // Predicates
    function depositTo(address rootToken, address receiver, uint256 amount) external;
    function withdrawTo(address childToken, address receiver, uint256 amount) external;

    // Exit helper
    function exit(uint256 blockNumber, uint256 leafIndex, bytes unhashedLeaf, bytes32[] proof) external;

    // Validator set
    function addToWhitelist(address[] whitelistAddresses) external;
    function register(bytes signature, bytes pubkey) external;
    function stake() external payable;

    // Checkpoint manager
    struct CheckpointMetadata {
        bytes32 blockHash;
        uint256 blockRound;
        bytes32 currentValidatorSetHash;
    }

    struct Checkpoint {
        uint256 epoch;
        uint256 blockNumber;
        bytes32 eventRoot;
    }

    function submit(
        CheckpointMetadata checkpointMetadata,
        Checkpoint checkpoint,
        bytes signature,
        bytes bitmap
    ) external;

    event AddedToWhitelist(address indexed validator);
    event NewValidator(address indexed validator, bytes blsKey);
    event Staked(address indexed validator, uint256 amount);
    event ExitProcessed(uint256 indexed id, bool indexed success, bytes returnData);
}

fn sol_address(address: &Address) -> SolAddress {
    SolAddress::from(*address)
}

fn sol_u256(value: &U256) -> SolU256 {
    SolU256::from_be_bytes(u256_to_be_bytes(value))
}

pub(crate) fn native_address(address: SolAddress) -> Address {
    address.0 .0
}

pub fn encode_approve(spender: &Address, amount: &U256) -> Vec<u8> {
    approveCall {
        spender: sol_address(spender),
        amount: sol_u256(amount),
    }
    .abi_encode()
}

pub fn encode_mint(to: &Address, amount: &U256) -> Vec<u8> {
    mintCall {
        to: sol_address(to),
        amount: sol_u256(amount),
    }
    .abi_encode()
}

pub fn encode_deposit_to(root_token: &Address, receiver: &Address, amount: &U256) -> Vec<u8> {
    depositToCall {
        rootToken: sol_address(root_token),
        receiver: sol_address(receiver),
        amount: sol_u256(amount),
    }
    .abi_encode()
}

pub fn encode_withdraw_to(child_token: &Address, receiver: &Address, amount: &U256) -> Vec<u8> {
    withdrawToCall {
        childToken: sol_address(child_token),
        receiver: sol_address(receiver),
        amount: sol_u256(amount),
    }
    .abi_encode()
}

pub fn encode_exit(proof: &ExitProof) -> Vec<u8> {
    exitCall {
        blockNumber: SolU256::from(proof.checkpoint_block),
        leafIndex: SolU256::from(proof.leaf_index),
        unhashedLeaf: Bytes::from(proof.unhashed_leaf.clone()),
        proof: proof.proof.iter().map(|h| B256::from(*h)).collect(),
    }
    .abi_encode()
}

pub fn encode_add_to_whitelist(validators: &[Address]) -> Vec<u8> {
    addToWhitelistCall {
        whitelistAddresses: validators.iter().map(sol_address).collect(),
    }
    .abi_encode()
}

pub fn encode_register(signature: &[u8], pubkey: &[u8]) -> Vec<u8> {
    registerCall {
        signature: Bytes::copy_from_slice(signature),
        pubkey: Bytes::copy_from_slice(pubkey),
    }
    .abi_encode()
}

pub fn encode_stake() -> Vec<u8> {
    stakeCall {}.abi_encode()
}

pub fn encode_submit(submission: &CheckpointSubmission) -> Vec<u8> {
    submitCall {
        checkpointMetadata: CheckpointMetadata {
            blockHash: B256::from(submission.block_hash),
            blockRound: SolU256::from(submission.block_round),
            currentValidatorSetHash: B256::from(submission.current_validator_set_hash),
        },
        checkpoint: Checkpoint {
            epoch: SolU256::from(submission.epoch),
            blockNumber: SolU256::from(submission.block_number),
            eventRoot: B256::from(submission.event_root),
        },
        signature: Bytes::copy_from_slice(&submission.signature),
        bitmap: Bytes::copy_from_slice(&submission.bitmap),
    }
    .abi_encode()
}

/// Decode `log` as event `E`; `None` if the topics do not match.
pub fn decode_event<E: SolEvent>(log: &Log) -> Option<E> {
    if log.topics.first().map(|t| B256::from(*t)) != Some(E::SIGNATURE_HASH) {
        return None;
    }
    E::decode_raw_log(log.topics.iter().map(|t| B256::from(*t)), &log.data, true).ok()
}

/// Render event `E` as a receipt log emitted by `address`.
pub fn event_log<E: SolEvent>(address: Address, event: &E) -> Log {
    let encoded = event.encode_log_data();
    Log {
        address,
        topics: encoded.topics().iter().map(|t| t.0).collect(),
        data: encoded.data.to_vec(),
    }
}
