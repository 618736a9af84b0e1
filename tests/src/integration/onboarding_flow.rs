//! # Validator Onboarding Flow
//!
//! A new validator is whitelisted by the governance owner, registers its BLS
//! key with a KOSK proof, stakes, and joins the child-chain roster through
//! the next epoch-ending delta.

#[cfg(test)]
mod tests {
    use std::sync::Arc;
    use std::time::Duration;

    use alloy_primitives::{Address as SolAddress, Bytes, U256 as SolU256};
    use alloy_sol_types::SolCall;
    use node_runtime::RuntimeError;
    use pb_01_header_extra::{Bitmap, ValidatorMetadata, ValidatorSetDelta};
    use pb_02_bls_signer::{verify_kosk_signature, PublicKey, Signature};
    use pb_03_validator_set::{EpochSchedule, ValidatorSetError};
    use pb_05_bridge::adapters::Script;
    use pb_05_bridge::contracts::{
        addToWhitelistCall, event_log, registerCall, stakeCall, AddedToWhitelist, NewValidator,
        Staked, VALIDATOR_SET_CONTRACT,
    };
    use pb_05_bridge::{
        BridgeError, BridgeOrchestrator, InMemoryTxRelayer, OrchestratorConfig, Transaction,
    };
    use pb_06_secrets::{Account, EcdsaKeyPair};
    use shared_types::{Address, U256};

    use crate::fixtures::{LocalChain, Validator, CHAIN_ID};

    const EPOCH_SIZE: u64 = 4;

    fn orchestrator(relayer: &Arc<InMemoryTxRelayer>) -> BridgeOrchestrator {
        BridgeOrchestrator::new(
            relayer.clone(),
            OrchestratorConfig {
                receipt_timeout: Duration::from_secs(1),
                poll_interval: Duration::from_millis(10),
                max_concurrent_legs: 1,
            },
        )
    }

    fn selector(selector: [u8; 4]) -> impl Fn(&Transaction) -> bool + Send + Sync + 'static {
        move |txn: &Transaction| txn.input.starts_with(&selector)
    }

    /// Validator set contract that acknowledges every call for `validator`.
    fn validator_set_contract(validator: Address, stake: U256) -> Arc<InMemoryTxRelayer> {
        let relayer = Arc::new(InMemoryTxRelayer::new());
        let who = SolAddress::from(validator);
        relayer.script(
            selector(addToWhitelistCall::SELECTOR),
            Script::success().with_logs(vec![event_log(
                VALIDATOR_SET_CONTRACT,
                &AddedToWhitelist { validator: who },
            )]),
        );
        relayer.script(
            selector(registerCall::SELECTOR),
            Script::success().with_logs(vec![event_log(
                VALIDATOR_SET_CONTRACT,
                &NewValidator {
                    validator: who,
                    blsKey: Bytes::new(),
                },
            )]),
        );
        relayer.script(
            selector(stakeCall::SELECTOR),
            Script::success().with_logs(vec![event_log(
                VALIDATOR_SET_CONTRACT,
                &Staked {
                    validator: who,
                    amount: SolU256::from_limbs(stake.0),
                },
            )]),
        );
        relayer
    }

    #[tokio::test]
    async fn test_whitelist_register_stake_then_join_roster() {
        let owner = EcdsaKeyPair::generate();
        let account = Account::generate().unwrap();
        let stake = U256::from(2);

        let relayer = validator_set_contract(account.address(), stake);
        let bridge = orchestrator(&relayer);

        let whitelisted = bridge
            .whitelist_validators(&[account.address()], &owner)
            .await
            .unwrap();
        assert_eq!(whitelisted.validators, vec![account.address()]);

        let registered = bridge.register_validator(&account, CHAIN_ID).await.unwrap();
        assert_eq!(registered.validator, account.address());

        // The contract receives a KOSK proof it can check on its own
        let register_txn = relayer.sent()[1].txn.clone();
        assert_eq!(register_txn.from, account.address());
        let call = registerCall::abi_decode(&register_txn.input, true).unwrap();
        let signature = Signature::from_bytes(&call.signature).unwrap();
        let pubkey = PublicKey::from_bytes(&call.pubkey).unwrap();
        verify_kosk_signature(&signature, &pubkey, &account.address(), CHAIN_ID).unwrap();

        let staked = bridge.stake(&account.ecdsa, stake).await.unwrap();
        assert_eq!(staked.amount, stake);
        assert_eq!(relayer.sent()[2].txn.value, stake);

        // Child chain: three genesis validators, one unit each
        let genesis: Vec<Validator> = (1..=3).map(Validator::new).collect();
        let genesis_signers: Vec<Address> = genesis.iter().map(|v| v.address).collect();
        let mut chain = LocalChain::new(EpochSchedule::new(EPOCH_SIZE, 2).unwrap(), &genesis);
        let newcomer = Validator::with_key(account.address(), account.bls.clone());
        chain.enroll(&newcomer);

        chain.advance_to(EPOCH_SIZE - 1, &genesis_signers).unwrap();
        let joining = ValidatorSetDelta {
            added: vec![ValidatorMetadata::new(
                account.address(),
                account.bls_public_key(),
                stake,
            )],
            removed: Bitmap::new(),
        };
        let boundary = chain
            .propose(&genesis_signers, Some(joining), [0; 32])
            .unwrap();
        let (_, summary) = chain.import(boundary).unwrap();
        let next = summary.unwrap().next_validators;
        assert_eq!(next.voting_power_of(&account.address()), stake);
        assert_eq!(next.total_voting_power(), U256::from(5));

        // 3 of 5 is short of quorum without the newcomer
        let without = chain.propose(&genesis_signers, None, [0; 32]).unwrap();
        assert!(matches!(
            chain.import(without),
            Err(RuntimeError::InvalidSeal {
                source: ValidatorSetError::QuorumNotReached { .. },
                ..
            })
        ));

        let with = chain
            .propose(&[genesis_signers[0], genesis_signers[1], account.address()], None, [0; 32])
            .unwrap();
        let (verified, _) = chain.import(with).unwrap();
        assert_eq!(verified.signed_power, U256::from(4));
    }

    #[tokio::test]
    async fn test_registration_requires_own_event() {
        let account = Account::generate().unwrap();
        let relayer = validator_set_contract([0x99; 20], U256::from(1));

        let err = orchestrator(&relayer)
            .register_validator(&account, CHAIN_ID)
            .await
            .unwrap_err();
        assert!(matches!(
            err,
            BridgeError::MissingLog {
                event: "NewValidator",
                ..
            }
        ));
    }

    #[tokio::test]
    async fn test_whitelist_requires_every_address() {
        let owner = EcdsaKeyPair::generate();
        let relayer = validator_set_contract([0x01; 20], U256::from(1));

        let err = orchestrator(&relayer)
            .whitelist_validators(&[[0x01; 20], [0x02; 20]], &owner)
            .await
            .unwrap_err();
        assert!(matches!(
            err,
            BridgeError::MissingLog {
                event: "AddedToWhitelist",
                ..
            }
        ));
    }

    #[tokio::test]
    async fn test_zero_stake_rejected_before_broadcast() {
        let account = Account::generate().unwrap();
        let relayer = validator_set_contract(account.address(), U256::zero());

        let err = orchestrator(&relayer)
            .stake(&account.ecdsa, U256::zero())
            .await
            .unwrap_err();
        assert!(matches!(err, BridgeError::InvalidRequest(_)));
        assert!(relayer.sent().is_empty());
    }
}
