//! Strategy builders for the evolution property suite.

use proptest::prelude::*;
use rand::rngs::SmallRng;
use rand::{Rng, SeedableRng};

use crate::EvolutionModel;

use super::types::{EvolutionFixture, ModelKind, TopologyKind};

/// Generates fixtures across every topology and model family.
pub(super) fn evolution_fixture_strategy() -> impl Strategy<Value = EvolutionFixture> {
    (any::<TopologyKind>(), any::<ModelKind>(), any::<u64>()).prop_map(|(topology, model, seed)| {
        let mut rng = SmallRng::seed_from_u64(seed);
        generate_fixture(topology, model, &mut rng)
    })
}

/// Generates a fixture for explicit topology and model families.
pub(super) fn generate_fixture(
    topology: TopologyKind,
    model: ModelKind,
    rng: &mut SmallRng,
) -> EvolutionFixture {
    let (size, node_count) = match topology {
        TopologyKind::Network => {
            let nodes = rng.gen_range(1..=48);
            (nodes, nodes)
        }
        TopologyKind::Square => {
            let side = rng.gen_range(1..=8);
            (side, side * side)
        }
        TopologyKind::Cubic => {
            let side = rng.gen_range(1..=4);
            (side, side * side * side)
        }
    };
    // Chunks may overshoot the n - 1 possible merges so exhaustion is covered.
    let chunks = [rng.gen_range(0..=node_count), rng.gen_range(0..=node_count)];
    EvolutionFixture {
        topology,
        size,
        model: generate_model(model, rng),
        chunks,
        seed: rng.r#gen(),
    }
}

fn generate_model(model: ModelKind, rng: &mut SmallRng) -> EvolutionModel {
    match model {
        ModelKind::ErdosRenyi => EvolutionModel::ErdosRenyi,
        ModelKind::BohmanFrieze => EvolutionModel::BohmanFrieze {
            bound: rng.gen_range(1..=6),
        },
        ModelKind::ProductRule => EvolutionModel::ProductRule,
        ModelKind::StochasticEdgeAcceptance => EvolutionModel::StochasticEdgeAcceptance {
            min_acceptance: rng.gen_range(0.0..=1.0),
        },
    }
}
