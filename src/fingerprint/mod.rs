//! Best-effort device fingerprinting.
//!
//! A fingerprint is produced by walking a fallback ladder of strategies:
//!
//! 1. the primary strategy: a delegated [`FingerprintLibrary`] when one is
//!    configured, otherwise [`ComposedStrategy`] over the full characteristic
//!    list (plus canvas, WebGL and font probes in comprehensive mode)
//! 2. [`BasicStrategy`], a hash of the characteristics nearly every host has
//! 3. [`TimestampStrategy`], which always succeeds
//!
//! Each tier that fails is logged as a warning, so degraded fingerprinting
//! rates show up in logs. Callers never see an error from the generator.

mod hash;
mod probes;
mod strategies;

use std::sync::Arc;

use crate::environment::Environment;
use crate::error_handling::FingerprintError;

pub use hash::rolling_hash;
pub use probes::{
    canvas_probe, font_probe, webgl_probe, CANVAS_ERROR, FONT_ERROR, NO_CANVAS, NO_FONT_PROBE,
    NO_WEBGL, WEBGL_ERROR,
};
pub use strategies::{
    BasicStrategy, ComposedStrategy, FingerprintLibrary, FingerprintStrategy, LibraryStrategy,
    TimestampStrategy, BASIC_FINGERPRINT_PREFIX,
};

/// A strategy that failed on the way to the final value.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Degradation {
    /// Name of the failed strategy
    pub strategy: &'static str,
    /// Why it failed
    pub error: FingerprintError,
}

/// Result of one generator run.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FingerprintOutcome {
    /// The fingerprint, never empty
    pub value: String,
    /// Name of the strategy that produced `value`
    pub strategy: &'static str,
    /// Strategies that failed before `strategy`, in ladder order
    pub degradations: Vec<Degradation>,
}

/// Anything the collector can ask for a fingerprint.
///
/// [`FingerprintGenerator`] never fails; the `Result` lets embedders plug in
/// sources that can.
pub trait FingerprintSource: Send + Sync {
    /// Produces a fingerprint for `env`.
    fn fingerprint(
        &self,
        env: &dyn Environment,
        comprehensive: bool,
    ) -> Result<String, FingerprintError>;
}

/// Runs the fallback ladder.
pub struct FingerprintGenerator {
    strategies: Vec<Box<dyn FingerprintStrategy>>,
}

impl Default for FingerprintGenerator {
    fn default() -> Self {
        Self::new()
    }
}

impl FingerprintGenerator {
    /// Self-composed fingerprinting: composed → basic → timestamp.
    pub fn new() -> Self {
        Self::with_primary(Box::new(ComposedStrategy))
    }

    /// Library-delegated fingerprinting: library → basic → timestamp.
    pub fn with_library(library: Arc<dyn FingerprintLibrary>) -> Self {
        Self::with_primary(Box::new(LibraryStrategy::new(library)))
    }

    /// Uses `primary` as the first tier, followed by the standard fallbacks.
    pub fn with_primary(primary: Box<dyn FingerprintStrategy>) -> Self {
        Self {
            strategies: vec![primary, Box::new(BasicStrategy), Box::new(TimestampStrategy)],
        }
    }

    /// Runs the ladder and reports which tier produced the value.
    pub fn generate_detailed(
        &self,
        env: &dyn Environment,
        comprehensive: bool,
    ) -> FingerprintOutcome {
        let mut degradations = Vec::new();

        for (index, strategy) in self.strategies.iter().enumerate() {
            match strategy.attempt(env, comprehensive) {
                Ok(value) if !value.is_empty() => {
                    return FingerprintOutcome {
                        value,
                        strategy: strategy.name(),
                        degradations,
                    };
                }
                Ok(_) => self.degrade(index, FingerprintError::EmptyValue, &mut degradations),
                Err(e) => self.degrade(index, e, &mut degradations),
            }
        }

        // Only reachable if a custom primary shadowed the built-in fallbacks
        FingerprintOutcome {
            value: TimestampStrategy::token(),
            strategy: TimestampStrategy.name(),
            degradations,
        }
    }

    /// Runs the ladder and returns the fingerprint value.
    pub fn generate(&self, env: &dyn Environment, comprehensive: bool) -> String {
        self.generate_detailed(env, comprehensive).value
    }

    fn degrade(&self, index: usize, error: FingerprintError, degradations: &mut Vec<Degradation>) {
        let failed = self.strategies[index].name();
        let next = self
            .strategies
            .get(index + 1)
            .map(|s| s.name())
            .unwrap_or("timestamp");
        log::warn!(
            "Fingerprint strategy '{}' failed ({}), falling back to '{}'",
            failed,
            error,
            next
        );
        degradations.push(Degradation {
            strategy: failed,
            error,
        });
    }
}

impl FingerprintSource for FingerprintGenerator {
    fn fingerprint(
        &self,
        env: &dyn Environment,
        comprehensive: bool,
    ) -> Result<String, FingerprintError> {
        Ok(self.generate(env, comprehensive))
    }
}


#[cfg(test)]
mod tests {
    use super::test_support::{full_environment, DeniedHardware, FailingProbes, StubLibrary};
    use super::*;
    use crate::config::FALLBACK_FINGERPRINT_PREFIX;
    use crate::environment::StaticEnvironment;

    #[test]
    fn test_stable_in_unchanged_environment() {
        let generator = FingerprintGenerator::new();
        let env = full_environment();
        let first = generator.generate_detailed(&env, false);
        let second = generator.generate_detailed(&env, false);
        assert_eq!(first.value, second.value);
        assert_eq!(first.strategy, "composed");
        assert!(first.degradations.is_empty());
    }

    #[test]
    fn test_comprehensive_is_stable() {
        let generator = FingerprintGenerator::new();
        let env = full_environment()
            .with_canvas("data:image/png;base64,iVBORw0KGgo")
            .with_webgl("Mesa", "llvmpipe");
        assert_eq!(generator.generate(&env, true), generator.generate(&env, true));
    }

    #[test]
    fn test_primary_failure_falls_back_to_basic() {
        // Hardware queries fail: composed gives up, basic never reads them
        let primary = FingerprintGenerator::new().generate(&full_environment(), false);

        let outcome = FingerprintGenerator::new().generate_detailed(&DeniedHardware, false);
        assert_eq!(outcome.strategy, "basic");
        assert!(outcome.value.starts_with(BASIC_FINGERPRINT_PREFIX));
        assert!(!primary.starts_with(BASIC_FINGERPRINT_PREFIX));
        assert_eq!(outcome.degradations.len(), 1);
        assert_eq!(outcome.degradations[0].strategy, "composed");
    }

    #[test]
    fn test_host_snapshot_is_stable() {
        let env = StaticEnvironment::from_host("Mozilla/5.0 (X11; Linux x86_64) Firefox/126.0");
        let generator = FingerprintGenerator::new();
        for comprehensive in [false, true] {
            let first = generator.generate_detailed(&env, comprehensive);
            std::thread::sleep(std::time::Duration::from_millis(5));
            let second = generator.generate_detailed(&env, comprehensive);
            assert_eq!(first.strategy, "composed");
            assert!(first.degradations.is_empty());
            assert_eq!(first.value, second.value);
        }
    }

    #[test]
    fn test_sparse_environment_stays_on_composed() {
        let env = StaticEnvironment::new("Mozilla/5.0");
        let outcome = FingerprintGenerator::new().generate_detailed(&env, false);
        assert_eq!(outcome.strategy, "composed");
        assert!(!outcome.value.starts_with(FALLBACK_FINGERPRINT_PREFIX));
    }

    #[test]
    fn test_library_failure_falls_back_to_basic() {
        let generator = FingerprintGenerator::with_library(Arc::new(StubLibrary(Err(
            FingerprintError::Library("agent blocked".into()),
        ))));
        let outcome = generator.generate_detailed(&full_environment(), false);
        assert_eq!(outcome.strategy, "basic");
        assert_eq!(
            outcome.degradations,
            vec![Degradation {
                strategy: "library",
                error: FingerprintError::Library("agent blocked".into()),
            }]
        );
    }

    #[test]
    fn test_library_success_is_primary() {
        let generator =
            FingerprintGenerator::with_library(Arc::new(StubLibrary(Ok(Some("abc123".into())))));
        let outcome = generator.generate_detailed(&full_environment(), false);
        assert_eq!(outcome.value, "abc123");
        assert_eq!(outcome.strategy, "library");
    }

    #[test]
    fn test_all_tiers_fail_uses_timestamp() {
        let outcome = FingerprintGenerator::new().generate_detailed(&FailingProbes, true);
        assert_eq!(outcome.strategy, "timestamp");
        assert!(outcome.value.starts_with(FALLBACK_FINGERPRINT_PREFIX));
        // One record per failed tier
        let failed: Vec<_> = outcome.degradations.iter().map(|d| d.strategy).collect();
        assert_eq!(failed, vec!["composed", "basic"]);
    }

    #[test]
    fn test_fingerprint_source_never_fails() {
        let generator = FingerprintGenerator::new();
        let value = generator.fingerprint(&FailingProbes, false).unwrap();
        assert!(!value.is_empty());
    }

    struct EmptyStrategy;

    impl FingerprintStrategy for EmptyStrategy {
        fn name(&self) -> &'static str {
            "empty"
        }
        fn attempt(&self, _: &dyn Environment, _: bool) -> Result<String, FingerprintError> {
            Ok(String::new())
        }
    }

    #[test]
    fn test_empty_value_is_demoted() {
        let generator = FingerprintGenerator::with_primary(Box::new(EmptyStrategy));
        let outcome = generator.generate_detailed(&full_environment(), false);
        assert_eq!(outcome.strategy, "basic");
        assert_eq!(outcome.degradations[0].error, FingerprintError::EmptyValue);
    }
}
