use tubesim_engine::cards::Card;
use tubesim_engine::config::SimConfig;
use tubesim_engine::driver::Simulation;
use tubesim_engine::holds::{HoldCategory, HoldDecision, HoldResolver};

struct Pat;
impl HoldResolver for Pat {
    fn resolve(&self, _hand: &[Card; 5]) -> HoldDecision {
        HoldDecision {
            keep: [true; 5],
            id: "stand-pat",
            category: HoldCategory::H5,
            ev_estimate: 0.0,
            bust_possible: false,
        }
    }
    fn name(&self) -> &str {
        "pat"
    }
}

#[test]
fn max_threshold_refills_every_tube_every_round() {
    let config = SimConfig {
        rounds: 10,
        players: 2,
        seed: Some(3),
        trigger_threshold: u64::MAX,
        refill_amount: 20,
        house_refill_enabled: true,
        player_refill_enabled: false,
        ..SimConfig::default()
    };
    let mut sim = Simulation::new(config, Box::new(Pat)).expect("valid config");
    sim.run().expect("run completes");
    let report = sim.into_report();

    for outcome in &report.history {
        assert_eq!(outcome.triggered_tubes.len(), 5);
    }
    // every tube was topped up all ten rounds regardless of hits
    for tube in &report.analysis.tubes {
        assert_eq!(
            tube.funded,
            report.config.tube_initial(tube.kind) + 10 * 20
        );
    }
}

#[test]
fn zero_threshold_only_fires_on_drained_tubes() {
    let config = SimConfig {
        rounds: 300,
        players: 4,
        seed: Some(13),
        trigger_threshold: 0,
        house_refill_enabled: true,
        player_refill_enabled: false,
        ..SimConfig::default()
    };
    let mut sim = Simulation::new(config, Box::new(Pat)).expect("valid config");
    sim.run().expect("run completes");
    let report = sim.into_report();

    // a zero threshold can only be reached by a full drain, and the
    // house refill restores the tube the same round, so every trigger
    // coincides with a drain
    for outcome in &report.history {
        for kind in &outcome.triggered_tubes {
            assert!(
                outcome.drained_tubes.contains(kind),
                "round {} triggered {:?} without draining it",
                outcome.round_index,
                kind
            );
        }
    }
}
