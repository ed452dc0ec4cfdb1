//! Ordered fallback chains of model identifiers.

use super::RoutingDomainError;

/// Non-empty ordered list of models with a session-scoped cursor.
///
/// The cursor starts at the head. [`Self::advance`] moves it forward and
/// reports exhaustion by returning `false` without moving; exhaustion is
/// what ends a routing attempt, never a silent wrap.
///
/// # Examples
///
///     use multiagent::routing::domain::FallbackChain;
///
///     let mut chain = FallbackChain::new("premium", vec!["a".into(), "b".into()])
///         .expect("non-empty chain");
///     assert_eq!(chain.current(), "a");
///     assert!(chain.advance());
///     assert_eq!(chain.current(), "b");
///     assert!(!chain.advance());
///     chain.reset();
///     assert_eq!(chain.current(), "a");
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FallbackChain {
    name: String,
    models: Vec<String>,
    cursor: usize,
}

impl FallbackChain {
    /// Creates a chain positioned at its first model.
    ///
    /// Blank model identifiers are dropped.
    ///
    /// # Errors
    ///
    /// Returns [`RoutingDomainError::EmptyChain`] when no model remains.
    pub fn new(name: impl Into<String>, models: Vec<String>) -> Result<Self, RoutingDomainError> {
        let chain_name = name.into();
        let usable: Vec<String> = models
            .into_iter()
            .map(|model| model.trim().to_owned())
            .filter(|model| !model.is_empty())
            .collect();
        if usable.is_empty() {
            return Err(RoutingDomainError::EmptyChain(chain_name));
        }
        Ok(Self {
            name: chain_name,
            models: usable,
            cursor: 0,
        })
    }

    /// Returns the chain's name, such as a tier or role.
    #[must_use]
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Returns every model in fallback order.
    #[must_use]
    pub fn models(&self) -> &[String] {
        &self.models
    }

    /// Returns the index of the current model.
    #[must_use]
    pub const fn position(&self) -> usize {
        self.cursor
    }

    /// Returns the model calls should currently go to.
    ///
    /// A cursor past the end reads as the head model.
    #[must_use]
    pub fn current(&self) -> &str {
        self.models
            .get(self.cursor)
            .or_else(|| self.models.first())
            .map_or("", String::as_str)
    }

    /// Moves to the next model, returning `false` when none is left.
    pub fn advance(&mut self) -> bool {
        let next = self.cursor.saturating_add(1);
        if next >= self.models.len() {
            return false;
        }
        self.cursor = next;
        true
    }

    /// Moves the cursor back to the head model.
    pub const fn reset(&mut self) {
        self.cursor = 0;
    }
}
