//! Tests for tiers, roles, chains, and failure classification.

use crate::routing::domain::{
    AgentRole, FallbackChain, ModelTier, ProviderError, ProviderErrorKind, RoutingDomainError,
    tier_for_role,
};
use rstest::rstest;

fn models(names: &[&str]) -> Vec<String> {
    names.iter().map(|name| (*name).to_owned()).collect()
}

#[rstest]
#[case("architect", ModelTier::Premium)]
#[case("reviewer", ModelTier::Premium)]
#[case("manager", ModelTier::Standard)]
#[case("coder", ModelTier::Fast)]
#[case("coder_frontend", ModelTier::Fast)]
#[case("Coder_Backend", ModelTier::Fast)]
#[case("tester", ModelTier::Standard)]
#[case("translator", ModelTier::Standard)]
fn roles_map_to_default_tiers(#[case] role: &str, #[case] expected: ModelTier) {
    assert_eq!(tier_for_role(role), expected);
}

#[rstest]
fn unknown_role_is_rejected_when_parsed_strictly() {
    assert_eq!(
        AgentRole::try_from("poet"),
        Err(RoutingDomainError::UnknownRole("poet".to_owned()))
    );
}

#[rstest]
#[case("premium", ModelTier::Premium)]
#[case(" FAST ", ModelTier::Fast)]
fn tiers_parse_case_insensitively(#[case] raw: &str, #[case] expected: ModelTier) {
    assert_eq!(ModelTier::try_from(raw), Ok(expected));
}

#[rstest]
fn default_chains_are_non_empty_and_lead_with_documented_models() {
    for tier in ModelTier::ALL {
        assert!(!tier.default_chain().is_empty());
    }
    assert_eq!(
        ModelTier::Premium.default_chain().first().map(String::as_str),
        Some("gpt-5.2-codex")
    );
    assert_eq!(
        ModelTier::Standard.default_chain().first().map(String::as_str),
        Some("gemini-2.5-pro")
    );
}

#[rstest]
fn chain_rejects_blank_models() {
    let result = FallbackChain::new("fast", models(&["", "  "]));
    assert_eq!(result, Err(RoutingDomainError::EmptyChain("fast".to_owned())));
}

#[rstest]
fn chain_signals_exhaustion_without_wrapping() {
    let mut chain = FallbackChain::new("t", models(&["a", "b"])).expect("valid chain");
    assert!(chain.advance());
    assert!(!chain.advance());
    assert_eq!(chain.current(), "b");
    assert_eq!(chain.position(), 1);
}

#[rstest]
fn chain_trims_model_names() {
    let chain = FallbackChain::new("t", models(&[" a ", "", "b"])).expect("valid chain");
    assert_eq!(chain.models(), ["a".to_owned(), "b".to_owned()]);
}

#[rstest]
#[case(401, ProviderErrorKind::Auth)]
#[case(403, ProviderErrorKind::Auth)]
#[case(429, ProviderErrorKind::RateLimit)]
#[case(500, ProviderErrorKind::Server)]
#[case(503, ProviderErrorKind::Server)]
#[case(400, ProviderErrorKind::Other)]
#[case(404, ProviderErrorKind::Other)]
fn statuses_are_classified(#[case] status: u16, #[case] expected: ProviderErrorKind) {
    let err = ProviderError::from_status(status, " body ");
    assert_eq!(err.kind(), expected);
    assert_eq!(err.message(), format!("HTTP {status}: body"));
}

#[rstest]
#[case(ProviderErrorKind::Auth, true)]
#[case(ProviderErrorKind::RateLimit, true)]
#[case(ProviderErrorKind::Server, true)]
#[case(ProviderErrorKind::Other, false)]
fn only_upstream_failures_advance_the_chain(
    #[case] kind: ProviderErrorKind,
    #[case] advances: bool,
) {
    assert_eq!(kind.advances_chain(), advances);
}
