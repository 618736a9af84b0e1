//! # Consensus Flow
//!
//! Header verification and roster rotation across epoch boundaries:
//!
//! 1. Blocks 1..=4 sealed by the genesis roster (epoch 1)
//! 2. Block 4 carries a delta removing one validator and adding another
//! 3. Finalising block 4 reports uptime and installs the epoch-2 roster
//! 4. Block 5 carries a parent seal checked against the epoch-1 roster and
//!    a committed seal checked against the epoch-2 roster

#[cfg(test)]
mod tests {
    use node_runtime::RuntimeError;
    use pb_01_header_extra::{Bitmap, ValidatorSetDelta};
    use pb_03_validator_set::{EpochSchedule, ValidatorSetError};
    use shared_types::{Address, U256};

    use crate::fixtures::{LocalChain, Validator};

    const EPOCH_SIZE: u64 = 4;

    fn setup() -> (LocalChain, Vec<Validator>) {
        let validators: Vec<Validator> = (1..=4).map(Validator::new).collect();
        let chain = LocalChain::new(EpochSchedule::new(EPOCH_SIZE, 2).unwrap(), &validators);
        (chain, validators)
    }

    fn addresses(validators: &[&Validator]) -> Vec<Address> {
        validators.iter().map(|v| v.address).collect()
    }

    #[test]
    fn test_roster_rotation_across_epoch_boundary() {
        let (mut chain, v) = setup();
        let newcomer = Validator::new(0xee);
        chain.enroll(&newcomer);

        // Epoch 1: D never signs
        let epoch_one = addresses(&[&v[0], &v[1], &v[2]]);
        chain.advance_to(EPOCH_SIZE - 1, &epoch_one).unwrap();

        let rotation = ValidatorSetDelta {
            added: vec![newcomer.metadata(1)],
            removed: Bitmap::from_indices([3]),
        };
        let boundary = chain.propose(&epoch_one, Some(rotation), [0; 32]).unwrap();
        let (verified, summary) = chain.import(boundary).unwrap();
        assert_eq!(verified.epoch, 1);

        let summary = summary.expect("epoch end must produce a summary");
        assert_eq!(summary.epoch, 1);
        assert_eq!(summary.uptime.total_blocks, EPOCH_SIZE);
        for signer in &epoch_one {
            assert_eq!(summary.uptime.signed_blocks(signer), EPOCH_SIZE);
        }
        assert_eq!(summary.uptime.signed_blocks(&v[3].address), 0);

        let next = &summary.next_validators;
        assert_eq!(next.epoch(), 2);
        assert!(next.is_active(&newcomer.address));
        assert!(!next.is_active(&v[3].address));
        assert_eq!(next.total_voting_power(), U256::from(4));
        assert_eq!(chain.runtime.validators().current().epoch(), 2);
        assert_eq!(chain.runtime.validators().previous().unwrap().epoch(), 1);

        // Epoch 2: the newcomer's seal counts
        let epoch_two = addresses(&[&v[0], &v[1], &newcomer]);
        let first = chain.propose(&epoch_two, None, [0; 32]).unwrap();
        let (verified, summary) = chain.import(first).unwrap();
        assert_eq!(verified.epoch, 2);
        assert!(verified.signers.contains(&newcomer.address));
        assert!(summary.is_none());

        chain.advance_to(2 * EPOCH_SIZE, &epoch_two).unwrap();
        assert_eq!(chain.runtime.validators().current().epoch(), 3);
    }

    #[test]
    fn test_removed_validator_cannot_seal_next_epoch() {
        let (mut chain, v) = setup();
        let newcomer = Validator::new(0xee);
        chain.enroll(&newcomer);

        let signers = addresses(&[&v[0], &v[1], &v[2]]);
        chain.advance_to(EPOCH_SIZE - 1, &signers).unwrap();
        let rotation = ValidatorSetDelta {
            added: vec![newcomer.metadata(1)],
            removed: Bitmap::from_indices([3]),
        };
        let boundary = chain.propose(&signers, Some(rotation), [0; 32]).unwrap();
        chain.import(boundary).unwrap();

        // D signs under index 3, which now belongs to the newcomer
        let number = EPOCH_SIZE + 1;
        let parent_seal = chain.head().extra().unwrap().committed;
        let extra = chain
            .runtime
            .build_extra(number, parent_seal, None, [0; 32])
            .unwrap();
        let forged = chain.seal(
            number,
            extra,
            &[(0, v[0].address), (1, v[1].address), (3, v[3].address)],
        );
        assert!(matches!(
            chain.import(forged),
            Err(RuntimeError::InvalidSeal {
                seal: "committed",
                source: ValidatorSetError::SignatureMismatch,
                ..
            })
        ));
        assert_eq!(chain.head().number, EPOCH_SIZE);
    }

    #[test]
    fn test_minority_seal_rejected_and_chain_recovers() {
        let (mut chain, v) = setup();
        let minority = chain
            .propose(&addresses(&[&v[0], &v[1]]), None, [0; 32])
            .unwrap();
        assert!(matches!(
            chain.import(minority),
            Err(RuntimeError::InvalidSeal {
                source: ValidatorSetError::QuorumNotReached { .. },
                ..
            })
        ));
        assert_eq!(chain.head().number, 0);

        let all = addresses(&[&v[0], &v[1], &v[2], &v[3]]);
        let block = chain.propose(&all, None, [0; 32]).unwrap();
        let (verified, _) = chain.import(block).unwrap();
        assert_eq!(verified.signed_power, U256::from(4));
    }

    #[test]
    fn test_competing_candidates_finalise_once() {
        let (chain, v) = setup();
        let a = chain
            .propose(&addresses(&[&v[0], &v[1], &v[2]]), None, [0; 32])
            .unwrap();
        let b = chain
            .propose(&addresses(&[&v[1], &v[2], &v[3]]), None, [1; 32])
            .unwrap();

        // Both verify concurrently against the same parent
        let runtime = &chain.runtime;
        let parent = chain.head().clone();
        let (va, vb) = std::thread::scope(|s| {
            let ha = s.spawn(|| runtime.verify_header(&a, &parent));
            let hb = s.spawn(|| runtime.verify_header(&b, &parent));
            (ha.join().unwrap(), hb.join().unwrap())
        });
        let (va, vb) = (va.unwrap(), vb.unwrap());
        assert_ne!(va.hash, vb.hash);

        runtime.finalize_block(&va).unwrap();
        assert!(matches!(
            runtime.finalize_block(&vb),
            Err(RuntimeError::ValidatorSet(
                ValidatorSetError::UptimeAlreadyRecorded { .. }
            ))
        ));
    }

    #[test]
    fn test_delta_only_at_epoch_end() {
        let (chain, v) = setup();
        let stray = ValidatorSetDelta {
            added: vec![Validator::new(0xee).metadata(1)],
            removed: Bitmap::new(),
        };
        assert!(matches!(
            chain.propose(&addresses(&[&v[0], &v[1], &v[2]]), Some(stray), [0; 32]),
            Err(RuntimeError::UnexpectedDelta { number: 1 })
        ));
    }
}
