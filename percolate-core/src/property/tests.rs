//! Proptest runners and targeted rstest cases for evolution properties.

use proptest::prelude::*;
use rand::SeedableRng;
use rand::rngs::SmallRng;

use crate::test_utils::suite_proptest_config;

use super::invariants::{ChunkingEquivalence, Determinism, StructuralInvariants, run_property};
use super::strategies::{evolution_fixture_strategy, generate_fixture};
use super::types::{ModelKind, TopologyKind};

proptest! {
    #![proptest_config(suite_proptest_config(128))]

    #[test]
    fn evolution_preserves_structural_invariants(fixture in evolution_fixture_strategy()) {
        run_property(&fixture, &StructuralInvariants)?;
    }

    #[test]
    fn evolution_is_deterministic(fixture in evolution_fixture_strategy()) {
        run_property(&fixture, &Determinism)?;
    }

    #[test]
    fn evolution_is_chunking_invariant(fixture in evolution_fixture_strategy()) {
        run_property(&fixture, &ChunkingEquivalence)?;
    }
}

#[rstest::rstest]
#[case::network_er(TopologyKind::Network, ModelKind::ErdosRenyi, 42)]
#[case::network_bf(TopologyKind::Network, ModelKind::BohmanFrieze, 42)]
#[case::square_pr(TopologyKind::Square, ModelKind::ProductRule, 7)]
#[case::square_sea(TopologyKind::Square, ModelKind::StochasticEdgeAcceptance, 7)]
#[case::cubic_bf(TopologyKind::Cubic, ModelKind::BohmanFrieze, 999)]
#[case::cubic_sea(TopologyKind::Cubic, ModelKind::StochasticEdgeAcceptance, 999)]
fn targeted_structural_invariants(
    #[case] topology: TopologyKind,
    #[case] model: ModelKind,
    #[case] seed: u64,
) {
    let mut rng = SmallRng::seed_from_u64(seed);
    let fixture = generate_fixture(topology, model, &mut rng);
    run_property(&fixture, &StructuralInvariants).expect("structural invariants must hold");
    run_property(&fixture, &ChunkingEquivalence).expect("chunking must not change the run");
}
