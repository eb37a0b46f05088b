//! Running aggregates, volatility, and end-of-run economic analysis.
//!
//! The statistics engine folds one [`RoundOutcome`] in per round and
//! keeps everything incremental: aggregate totals are exact regardless
//! of run length, and the volatility index uses Welford accumulation so
//! no per-round history is required. Exploit detection runs once, at
//! finalize.

use std::collections::HashMap;

use serde::{Deserialize, Serialize};

use crate::hand::CATEGORY_COUNT;
use crate::round::{OutcomeKind, RoundOutcome};
use crate::tube::{Tube, TubeKind, TubeLedger};

/// Minimum times a strategy must have been used before the exploit
/// scan will consider it. Small samples produce meaningless EVs.
pub const EXPLOIT_MIN_SAMPLE: u64 = 100;

/// A strategy is flagged when its expected value exceeds this fraction
/// of the ante; twice the threshold escalates to critical.
pub const EXPLOIT_COEFFICIENT: f64 = 0.02;

/// Target house-edge band: the house should retain between 3% and 7%
/// of total antes.
pub const EDGE_TARGET_MIN: f64 = 0.03;
pub const EDGE_TARGET_MAX: f64 = 0.07;

/// Where the realized house edge sits relative to the target band.
#[derive(Debug, Copy, Clone, Eq, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum EdgeStatus {
    BelowTarget,
    WithinTarget,
    AboveTarget,
}

/// Volatility bucket relative to the ante size.
#[derive(Debug, Copy, Clone, Eq, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RiskTier {
    Low,
    Moderate,
    Elevated,
    High,
}

#[derive(Debug, Copy, Clone, Eq, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AlertSeverity {
    Warning,
    Critical,
}

/// Per-decision-identifier performance, created lazily on first use.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct StrategyRecord {
    pub uses: u64,
    pub wins: u64,
    pub losses: u64,
    pub busts: u64,
    pub ties: u64,
    /// Total antes wagered on rounds using this decision.
    pub wagered: u64,
    /// Total credits returned (all outcomes).
    pub returned: u64,
    /// Credits returned on wins only, for the EV win average.
    pub won_amount: u64,
    /// Tube hits by this strategy, in [`TubeKind::ALL`] order.
    pub tube_hits: [u64; 5],
}

/// A strategy whose expected value cleared the exploit threshold.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ExploitAlert {
    pub strategy: String,
    pub uses: u64,
    /// Expected value per round, in credits.
    pub expected_value: f64,
    /// The threshold it was judged against, in credits.
    pub threshold: f64,
    pub severity: AlertSeverity,
}

/// Incremental population variance (Welford).
#[derive(Debug, Clone, Default)]
struct Welford {
    count: u64,
    mean: f64,
    m2: f64,
}

impl Welford {
    fn push(&mut self, x: f64) {
        self.count += 1;
        let delta = x - self.mean;
        self.mean += delta / self.count as f64;
        self.m2 += delta * (x - self.mean);
    }

    fn population_std_dev(&self) -> f64 {
        if self.count == 0 {
            0.0
        } else {
            (self.m2 / self.count as f64).sqrt()
        }
    }
}

/// Snapshot of run-wide totals, serializable into reports.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct AggregateTotals {
    pub rounds: u64,
    pub wins: u64,
    pub losses: u64,
    pub busts: u64,
    pub ties: u64,
    pub ante_collected: u64,
    pub dealer_ante_collected: u64,
    pub pot_payouts: u64,
    pub tube_payouts: u64,
    pub bust_penalties: u64,
    pub house_net: i64,
    /// Showdown hand counts indexed by hand category, dealer included.
    pub rank_distribution: [u64; CATEGORY_COUNT],
}

/// One tube's lifetime totals for the report.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TubeSummary {
    pub kind: TubeKind,
    pub balance: u64,
    pub funded: u64,
    pub paid: u64,
    pub hits: u64,
}

/// End-of-run economic analysis: the product the simulation exists to
/// produce.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EconomicReport {
    pub house_edge: f64,
    pub edge_status: EdgeStatus,
    pub volatility_index: f64,
    pub risk_tier: RiskTier,
    pub exploit_alerts: Vec<ExploitAlert>,
    pub totals: AggregateTotals,
    pub tubes: Vec<TubeSummary>,
    pub strategies: HashMap<String, StrategyRecord>,
}

/// The running statistics accumulator, exclusively owned by one
/// simulation driver.
#[derive(Debug, Clone)]
pub struct StatsEngine {
    ante: u64,
    refresh_interval: u64,
    totals: AggregateTotals,
    strategies: HashMap<String, StrategyRecord>,
    deltas: Welford,
    volatility_index: f64,
}

impl StatsEngine {
    pub fn new(ante: u64, refresh_interval: u64) -> Self {
        Self {
            ante,
            refresh_interval,
            totals: AggregateTotals::default(),
            strategies: HashMap::new(),
            deltas: Welford::default(),
            volatility_index: 0.0,
        }
    }

    /// Fold one completed round into the aggregates.
    pub fn record_round(&mut self, outcome: &RoundOutcome) {
        self.totals.rounds += 1;
        self.totals.ante_collected += outcome.pot_collected;
        self.totals.dealer_ante_collected += outcome.dealer_ante;
        self.totals.house_net += outcome.house_net;
        self.totals.rank_distribution[outcome.dealer_category.index()] += 1;

        for po in &outcome.outcomes {
            self.totals.rank_distribution[po.category.index()] += 1;
            let record = self.strategies.entry(po.decision_id.clone()).or_default();
            record.uses += 1;
            record.wagered += self.ante;
            record.returned += po.payout;
            match po.outcome {
                OutcomeKind::Win => {
                    self.totals.wins += 1;
                    record.wins += 1;
                    record.won_amount += po.payout;
                    if po.tube_payout > 0 {
                        if let Some(idx) = tube_index(po.category) {
                            record.tube_hits[idx] += 1;
                        }
                    }
                }
                OutcomeKind::Loss => {
                    self.totals.losses += 1;
                    record.losses += 1;
                }
                OutcomeKind::Bust => {
                    self.totals.busts += 1;
                    record.busts += 1;
                }
                OutcomeKind::Tie => {
                    self.totals.ties += 1;
                    record.ties += 1;
                }
            }
            self.totals.pot_payouts += po.payout - po.tube_payout;
            self.totals.tube_payouts += po.tube_payout;
            self.totals.bust_penalties += po.bust_penalty;
        }

        self.deltas.push(outcome.net_delta as f64);
        if self.totals.rounds % self.refresh_interval == 0 {
            self.volatility_index = self.deltas.population_std_dev();
        }
    }

    pub fn totals(&self) -> &AggregateTotals {
        &self.totals
    }

    pub fn strategy(&self, id: &str) -> Option<&StrategyRecord> {
        self.strategies.get(id)
    }

    /// Volatility index as of the last refresh.
    pub fn volatility_index(&self) -> f64 {
        self.volatility_index
    }

    /// Refresh volatility, scan for exploits, and emit the economic
    /// report. Consumes the accumulator; aggregation is over.
    pub fn finalize(mut self, tubes: &TubeLedger) -> EconomicReport {
        self.volatility_index = self.deltas.population_std_dev();

        let edge = house_edge(
            self.totals.ante_collected,
            self.totals.pot_payouts,
            self.totals.tube_payouts,
            self.totals.bust_penalties,
        );

        let mut alerts = detect_exploits(&self.strategies, self.ante);
        alerts.sort_by(|a, b| {
            b.expected_value
                .partial_cmp(&a.expected_value)
                .unwrap_or(std::cmp::Ordering::Equal)
        });

        let tube_summaries = TubeKind::ALL
            .into_iter()
            .map(|kind| {
                let t: &Tube = tubes.tube(kind);
                TubeSummary {
                    kind,
                    balance: t.balance,
                    funded: t.funded,
                    paid: t.paid,
                    hits: t.hits,
                }
            })
            .collect();

        EconomicReport {
            house_edge: edge,
            edge_status: edge_status(edge),
            volatility_index: self.volatility_index,
            risk_tier: risk_tier(self.volatility_index, self.ante),
            exploit_alerts: alerts,
            totals: self.totals,
            tubes: tube_summaries,
            strategies: self.strategies,
        }
    }
}

/// Fraction of total antes the house retained. Bust penalties are house
/// income, so they offset payouts.
pub fn house_edge(ante_collected: u64, pot_payouts: u64, tube_payouts: u64, bust_penalties: u64) -> f64 {
    if ante_collected == 0 {
        return 0.0;
    }
    let paid_out = pot_payouts as f64 + tube_payouts as f64 - bust_penalties as f64;
    (ante_collected as f64 - paid_out) / ante_collected as f64
}

pub fn edge_status(edge: f64) -> EdgeStatus {
    if edge < EDGE_TARGET_MIN {
        EdgeStatus::BelowTarget
    } else if edge > EDGE_TARGET_MAX {
        EdgeStatus::AboveTarget
    } else {
        EdgeStatus::WithinTarget
    }
}

/// Bucket the volatility index against the ante: below one ante of
/// per-round spread is quiet, beyond five is wild.
pub fn risk_tier(volatility_index: f64, ante: u64) -> RiskTier {
    if ante == 0 {
        return RiskTier::Low;
    }
    let ratio = volatility_index / ante as f64;
    if ratio < 1.0 {
        RiskTier::Low
    } else if ratio < 2.5 {
        RiskTier::Moderate
    } else if ratio < 5.0 {
        RiskTier::Elevated
    } else {
        RiskTier::High
    }
}

fn detect_exploits(strategies: &HashMap<String, StrategyRecord>, ante: u64) -> Vec<ExploitAlert> {
    let threshold = EXPLOIT_COEFFICIENT * ante as f64;
    let mut alerts = Vec::new();
    for (id, record) in strategies {
        if record.uses < EXPLOIT_MIN_SAMPLE {
            continue;
        }
        let ev = strategy_expected_value(record, ante);
        if ev > threshold {
            let severity = if ev > threshold * 2.0 {
                AlertSeverity::Critical
            } else {
                AlertSeverity::Warning
            };
            alerts.push(ExploitAlert {
                strategy: id.clone(),
                uses: record.uses,
                expected_value: ev,
                threshold,
                severity,
            });
        }
    }
    alerts
}

/// Player-perspective EV of one decision in credits per round:
/// `winP * avgWin - lossP * ante - bustP * ante`.
pub fn strategy_expected_value(record: &StrategyRecord, ante: u64) -> f64 {
    if record.uses == 0 {
        return 0.0;
    }
    let uses = record.uses as f64;
    let win_p = record.wins as f64 / uses;
    let loss_p = record.losses as f64 / uses;
    let bust_p = record.busts as f64 / uses;
    let avg_win = if record.wins > 0 {
        record.won_amount as f64 / record.wins as f64
    } else {
        0.0
    };
    win_p * avg_win - loss_p * ante as f64 - bust_p * ante as f64
}

fn tube_index(category: crate::hand::Category) -> Option<usize> {
    TubeKind::from_category(category).map(|kind| {
        TubeKind::ALL
            .iter()
            .position(|&k| k == kind)
            .unwrap_or_default()
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::hand::Category;
    use crate::round::ParticipantOutcome;

    fn outcome_with(deltas: (u64, u64, u64, u64), net_delta: i64) -> RoundOutcome {
        let (pot, pot_pay, tube_pay, bust) = deltas;
        RoundOutcome {
            round_index: 0,
            pot_collected: pot,
            dealer_ante: 5,
            dealer_category: Category::HighCard,
            outcomes: vec![ParticipantOutcome {
                participant_id: 0,
                outcome: if bust > 0 {
                    OutcomeKind::Bust
                } else if pot_pay + tube_pay > 0 {
                    OutcomeKind::Win
                } else {
                    OutcomeKind::Loss
                },
                payout: pot_pay + tube_pay,
                tube_payout: tube_pay,
                bust_penalty: bust,
                decision_id: "draw-five".to_string(),
                category: if tube_pay > 0 {
                    Category::Flush
                } else {
                    Category::OnePair
                },
            }],
            tube_balances_after: [0; 5],
            triggered_tubes: vec![],
            drained_tubes: vec![],
            house_net: pot as i64 - (pot_pay + tube_pay) as i64 - bust as i64,
            net_delta,
        }
    }

    #[test]
    fn house_edge_matches_reference_figures() {
        // totalAnte=1000, potPayouts=400, tubePayouts=100, bust=50
        let edge = house_edge(1000, 400, 100, 50);
        assert!((edge - 0.55).abs() < 1e-12);
    }

    #[test]
    fn house_edge_of_empty_run_is_zero() {
        assert_eq!(house_edge(0, 0, 0, 0), 0.0);
    }

    #[test]
    fn edge_status_tri_state() {
        assert_eq!(edge_status(0.01), EdgeStatus::BelowTarget);
        assert_eq!(edge_status(0.05), EdgeStatus::WithinTarget);
        assert_eq!(edge_status(0.20), EdgeStatus::AboveTarget);
    }

    #[test]
    fn volatility_of_constant_deltas_is_zero() {
        let mut stats = StatsEngine::new(5, 1);
        for i in 0..10 {
            let mut o = outcome_with((25, 5, 0, 0), 20);
            o.round_index = i;
            stats.record_round(&o);
        }
        assert_eq!(stats.volatility_index(), 0.0);
    }

    #[test]
    fn wider_spread_raises_volatility() {
        // Same mean (0), increasing dispersion
        let mut narrow = StatsEngine::new(5, 1);
        let mut wide = StatsEngine::new(5, 1);
        for i in 0..50 {
            let sign = if i % 2 == 0 { 1 } else { -1 };
            let mut o = outcome_with((25, 5, 0, 0), sign * 2);
            o.round_index = i as u64;
            narrow.record_round(&o);
            let mut o = outcome_with((25, 5, 0, 0), sign * 40);
            o.round_index = i as u64;
            wide.record_round(&o);
        }
        assert!(wide.volatility_index() > narrow.volatility_index());
    }

    #[test]
    fn exploit_scan_skips_small_samples() {
        let mut strategies = HashMap::new();
        strategies.insert(
            "lucky".to_string(),
            StrategyRecord {
                uses: EXPLOIT_MIN_SAMPLE - 1,
                wins: EXPLOIT_MIN_SAMPLE - 1,
                won_amount: 10_000,
                ..Default::default()
            },
        );
        let alerts = detect_exploits(&strategies, 5);
        assert!(alerts.is_empty());
    }

    #[test]
    fn exploit_scan_flags_profitable_strategy() {
        let mut strategies = HashMap::new();
        // always wins 10 credits: EV = 10, far above 0.02 * 5
        strategies.insert(
            "printer".to_string(),
            StrategyRecord {
                uses: 200,
                wins: 200,
                won_amount: 2_000,
                ..Default::default()
            },
        );
        let alerts = detect_exploits(&strategies, 5);
        assert_eq!(alerts.len(), 1);
        assert_eq!(alerts[0].severity, AlertSeverity::Critical);
        assert!((alerts[0].expected_value - 10.0).abs() < 1e-9);
    }

    #[test]
    fn alerts_sorted_by_descending_ev() {
        let mut stats = StatsEngine::new(5, 1);
        // seed two strategies through real rounds: one modest, one rich
        for i in 0..200 {
            let mut o = outcome_with((25, 0, 50, 0), -25);
            o.round_index = i;
            o.outcomes[0].decision_id = "rich".to_string();
            stats.record_round(&o);

            let mut o = outcome_with((25, 6, 0, 0), 19);
            o.round_index = i;
            o.outcomes[0].decision_id = "modest".to_string();
            stats.record_round(&o);
        }
        let config = crate::config::SimConfig::default();
        let report = stats.finalize(&TubeLedger::new(&config));
        assert!(report.exploit_alerts.len() >= 2);
        let evs: Vec<f64> = report
            .exploit_alerts
            .iter()
            .map(|a| a.expected_value)
            .collect();
        let mut sorted = evs.clone();
        sorted.sort_by(|a, b| b.partial_cmp(a).unwrap());
        assert_eq!(evs, sorted);
        assert_eq!(report.exploit_alerts[0].strategy, "rich");
    }

    #[test]
    fn risk_tier_scales_with_ante() {
        assert_eq!(risk_tier(2.0, 5), RiskTier::Low);
        assert_eq!(risk_tier(8.0, 5), RiskTier::Moderate);
        assert_eq!(risk_tier(20.0, 5), RiskTier::Elevated);
        assert_eq!(risk_tier(40.0, 5), RiskTier::High);
    }

    #[test]
    fn totals_track_wins_losses_and_penalties() {
        let mut stats = StatsEngine::new(5, 10);
        stats.record_round(&outcome_with((25, 5, 0, 0), 20));
        stats.record_round(&outcome_with((25, 0, 0, 5), 30));
        stats.record_round(&outcome_with((25, 0, 0, 0), 25));
        let t = stats.totals();
        assert_eq!(t.rounds, 3);
        assert_eq!(t.wins, 1);
        assert_eq!(t.busts, 1);
        assert_eq!(t.losses, 1);
        assert_eq!(t.pot_payouts, 5);
        assert_eq!(t.bust_penalties, 5);
        assert_eq!(t.ante_collected, 75);
    }
}
