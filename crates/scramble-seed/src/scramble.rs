//! leaf seeds for scramble generation
//!
//! a scramble hierarchy below a root seed has 8 levels, e.g.
//!
//! ```text
//! <contributor salt>/scrambles/<event>/<round>/<group>/<attempt>/<subevent>/<sub index>
//! ```
//!
//! the 8th-level seed is then derived once more with the subevent id and
//! handed to the external generator together with the event id.

use tracing::debug;

use crate::registry::{EventId, EventRegistry};
use crate::salt::DerivationPath;
use crate::seed::DerivationSeed;
use crate::{Error, Result};

/// level the hierarchy must reach before the final subevent step
pub const SCRAMBLE_DERIVATION_LEVEL: u8 = 8;

/// external move-sequence generator
pub trait ScrambleGenerator {
    /// produce a scramble for `event`, using `leaf` as the only randomness
    fn generate(&self, event: &EventId, leaf: &DerivationSeed) -> Result<String>;
}

impl<F> ScrambleGenerator for F
where
    F: Fn(&EventId, &DerivationSeed) -> Result<String>,
{
    fn generate(&self, event: &EventId, leaf: &DerivationSeed) -> Result<String> {
        self(event, leaf)
    }
}

/// derive the seed a generator receives for `subevent`
pub fn leaf_seed_for_event(
    seed: &DerivationSeed,
    path: &DerivationPath,
    subevent: &EventId,
) -> Result<DerivationSeed> {
    let salts = path.salts();
    if salts.len() > 1 {
        let found = &salts[salts.len() - 2];
        if found.as_str() != subevent.as_str() {
            return Err(Error::SubeventMismatch {
                expected: subevent.to_string(),
                found: found.to_string(),
            });
        }
    }

    let seed = seed.derive_hierarchy(path);
    if seed.level() != SCRAMBLE_DERIVATION_LEVEL {
        return Err(Error::UnexpectedLevel {
            expected: SCRAMBLE_DERIVATION_LEVEL,
            actual: seed.level(),
        });
    }

    Ok(seed.derive(&subevent.to_salt()?))
}

/// derive the leaf seed and ask `generator` for a scramble
pub fn derive_scramble_for_event<G: ScrambleGenerator + ?Sized>(
    generator: &G,
    seed: &DerivationSeed,
    path: &DerivationPath,
    subevent: &EventId,
) -> Result<String> {
    let leaf = leaf_seed_for_event(seed, path, subevent)?;
    debug!(event = %subevent, level = leaf.level(), "leaf seed derived");
    generator.generate(subevent, &leaf)
}

/// like [`derive_scramble_for_event`], resolving generator delegation
///
/// the leaf stays bound to `subevent`; only the generator id changes
/// (e.g. `333oh` is served by the `333` generator).
pub fn derive_scramble_with_registry<G: ScrambleGenerator + ?Sized>(
    generator: &G,
    registry: &EventRegistry,
    seed: &DerivationSeed,
    path: &DerivationPath,
    subevent: &EventId,
) -> Result<String> {
    let generator_event = registry.generator_for(subevent.as_str())?;
    let leaf = leaf_seed_for_event(seed, path, subevent)?;
    debug!(
        event = %subevent,
        generator = %generator_event,
        level = leaf.level(),
        "leaf seed derived"
    );
    generator.generate(generator_event, &leaf)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::rng::SeedRng;
    use rand_core::RngCore;

    const ROOT_HEX: &str = "67002dfc95e6d4288f418fbaa9150aa65b239fd5581f2d067d0293b9321a8b67";
    const PATH: &str =
        "EBNLEND@MABLNHJFHGFEKFIA@DNBKABHHNANA@FD@KKADJAKNFCIJNJGIFCBLEDF/scrambles/333/r1/g1/a1/333/sub1";

    fn root() -> DerivationSeed {
        ROOT_HEX.parse().unwrap()
    }

    fn echo(event: &EventId, leaf: &DerivationSeed) -> Result<String> {
        Ok(format!("{} {}", event, leaf))
    }

    #[test]
    fn test_leaf_vector() {
        let leaf = leaf_seed_for_event(&root(), &PATH.parse().unwrap(), &"333".into()).unwrap();
        assert_eq!(
            leaf.to_hex(),
            "67096f1ef2a16d9ef222f08d4090153a1f03018aec927c020f4bb70e1b90e0ef"
        );
    }

    #[test]
    fn test_generator_receives_leaf() {
        let out = derive_scramble_for_event(&echo, &root(), &PATH.parse().unwrap(), &"333".into())
            .unwrap();
        assert_eq!(
            out,
            "333 67096f1ef2a16d9ef222f08d4090153a1f03018aec927c020f4bb70e1b90e0ef"
        );
    }

    #[test]
    fn test_subevent_mismatch() {
        assert!(matches!(
            leaf_seed_for_event(&root(), &PATH.parse().unwrap(), &"222".into()),
            Err(Error::SubeventMismatch { .. })
        ));
    }

    #[test]
    fn test_wrong_depth() {
        let short: DerivationPath = "scrambles/333/r1/g1/a1/333/sub1".parse().unwrap();
        assert!(matches!(
            leaf_seed_for_event(&root(), &short, &"333".into()),
            Err(Error::UnexpectedLevel { expected: 8, actual: 7 })
        ));
    }

    #[test]
    fn test_registry_delegation() {
        let path: DerivationPath = PATH.replace("/333/sub1", "/333oh/sub1").parse().unwrap();
        let registry = EventRegistry::builtin();
        let out = derive_scramble_with_registry(&echo, &registry, &root(), &path, &"333oh".into())
            .unwrap();
        let leaf = leaf_seed_for_event(&root(), &path, &"333oh".into()).unwrap();
        assert_eq!(out, format!("333 {}", leaf));
    }

    #[test]
    fn test_generator_with_seed_rng() {
        let generator = |_: &EventId, leaf: &DerivationSeed| -> Result<String> {
            let mut rng = SeedRng::new(*leaf);
            let moves = ["R", "U", "F"];
            let picks: Vec<&str> = (0..5)
                .map(|_| moves[(rng.next_u32() % 3) as usize])
                .collect();
            Ok(picks.join(" "))
        };
        let path: DerivationPath = PATH.parse().unwrap();
        let a = derive_scramble_for_event(&generator, &root(), &path, &"333".into()).unwrap();
        let b = derive_scramble_for_event(&generator, &root(), &path, &"333".into()).unwrap();
        assert_eq!(a, b);
        assert_eq!(a.split(' ').count(), 5);
    }

    #[test]
    fn test_generator_error_propagates() {
        let failing = |event: &EventId, _: &DerivationSeed| -> Result<String> {
            Err(Error::Generator(format!("no generator for {}", event)))
        };
        assert!(matches!(
            derive_scramble_for_event(&failing, &root(), &PATH.parse().unwrap(), &"333".into()),
            Err(Error::Generator(_))
        ));
    }
}
