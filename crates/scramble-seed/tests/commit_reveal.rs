//! end-to-end exchange between the seed holder and a contributor

use rand::SeedableRng;
use rand_chacha::ChaCha20Rng;
use scramble_seed::{
    derive_hierarchy, CommitRevealConfig, Commitment, Contributor, DerivationSeed, Error, Salt,
    Session, Transcript,
};

const ROOT_HEX: &str = "67002dfc95e6d4288f418fbaa9150aa65b239fd5581f2d067d0293b9321a8b67";

fn exchange(seed: u64) -> (Contributor, Transcript, DerivationSeed) {
    let mut rng = ChaCha20Rng::seed_from_u64(seed);
    let mut session = Session::generate(&mut rng);
    let commitment = session.commit().unwrap();

    let contributor = Contributor::respond(commitment, &mut rng, &CommitRevealConfig::default())
        .unwrap();
    session.contribute(contributor.salt().clone()).unwrap();
    let competition_seed = session.finalize().unwrap();
    let transcript = session.reveal().unwrap();
    (contributor, transcript, competition_seed)
}

#[test]
fn test_full_exchange_audits() {
    let (contributor, transcript, competition_seed) = exchange(1);
    assert_eq!(contributor.salt().len(), 64);
    assert_eq!(competition_seed.level(), 1);
    assert_eq!(contributor.audit(&transcript).unwrap(), competition_seed);

    let round = derive_hierarchy(&competition_seed, &"scrambles/333/r1".parse().unwrap());
    assert_eq!(round.level(), 4);
}

#[test]
fn test_empty_contribution_refused() {
    let mut rng = ChaCha20Rng::seed_from_u64(8);
    let mut session = Session::generate(&mut rng);
    let commitment = session.commit().unwrap();

    // an empty salt would make the final seed computable before contribution
    let config = CommitRevealConfig::default().with_contributor_salt_len(0);
    assert!(matches!(
        Contributor::respond(commitment, &mut rng, &config),
        Err(Error::ContributorSaltTooShort { len: 0, .. })
    ));
    assert_eq!(session.state(), "committed");
}

#[test]
fn test_transcript_survives_json() {
    let (contributor, transcript, competition_seed) = exchange(2);
    let json = transcript.to_json().unwrap();
    let parsed = Transcript::from_json(&json).unwrap();
    assert_eq!(parsed, transcript);
    assert_eq!(contributor.audit(&parsed).unwrap(), competition_seed);
}

#[test]
fn test_swapped_root_is_caught() {
    let (contributor, mut transcript, _) = exchange(3);
    let mut rng = ChaCha20Rng::seed_from_u64(99);
    transcript.root_seed = DerivationSeed::random_root(&mut rng);
    assert!(matches!(
        contributor.audit(&transcript),
        Err(Error::CommitmentMismatch { .. })
    ));
}

#[test]
fn test_swapped_salt_is_caught() {
    let (contributor, mut transcript, _) = exchange(4);
    transcript.contributor_salt = "not the salt i sent".parse().unwrap();
    assert!(matches!(
        contributor.audit(&transcript),
        Err(Error::SaltMismatch)
    ));
}

#[test]
fn test_forged_final_seed_is_caught() {
    let (contributor, mut transcript, _) = exchange(5);
    transcript.final_seed = transcript.final_seed.derive(&"extra".parse().unwrap());
    assert!(matches!(
        contributor.audit(&transcript),
        Err(Error::FinalSeedMismatch { .. })
    ));
}

#[test]
fn test_known_root_transcript() {
    let root: DerivationSeed = ROOT_HEX.parse().unwrap();
    let salt: Salt = "EBNLEND@MABLNHJFHGFEKFIA@DNBKABHHNANA@FD@KKADJAKNFCIJNJGIFCBLEDF"
        .parse()
        .unwrap();

    let mut session = Session::new(root).unwrap();
    let commitment = session.commit().unwrap();
    assert_eq!(
        commitment,
        "67016c7c5b0c6be46599bc3cdd9fc940554a4422f9c308c2852bf9ed8f2adc7f"
            .parse::<Commitment>()
            .unwrap()
    );
    session.contribute(salt).unwrap();
    assert_eq!(
        session.finalize().unwrap().to_hex(),
        "6701881f76fec0b68067fadd787854e41c4c7407b8416ee26b4bacd14000900b"
    );
    session.reveal().unwrap().verify().unwrap();
}

#[test]
fn test_out_of_order_calls() {
    let mut rng = ChaCha20Rng::seed_from_u64(6);
    let mut session = Session::generate(&mut rng);
    assert!(matches!(
        session.finalize(),
        Err(Error::InvalidTransition { .. })
    ));
    assert!(matches!(session.reveal(), Err(Error::InvalidTransition { .. })));
    assert_eq!(session.state(), "uncommitted");
}
