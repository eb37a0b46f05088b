//! Per-round resolution pipeline.
//!
//! One round advances through a strict linear phase order with no
//! backward transitions:
//!
//! ```text
//! ante -> deal -> hold -> draw -> showdown -> payout -> complete
//! ```
//!
//! Each phase is a function over explicit state; the phase tag is
//! carried alongside so contract violations surface as typed errors
//! rather than silent misordering.

use serde::{Deserialize, Serialize};

use crate::config::SimConfig;
use crate::deck::Deck;
use crate::errors::SimError;
use crate::hand::{compare_hands, evaluate_hand, Category, HandStrength};
use crate::holds::{dealer_stand_pat, HoldResolver};
use crate::participant::Participant;
use crate::tube::{Funder, TubeKind, TubeLedger};

/// Phase tag for the round state machine.
#[derive(Debug, Copy, Clone, Eq, PartialEq, Serialize, Deserialize)]
pub enum RoundPhase {
    Ante,
    Deal,
    Hold,
    Draw,
    Showdown,
    Payout,
    Complete,
}

impl RoundPhase {
    /// The only legal successor of each phase.
    pub fn next(self) -> RoundPhase {
        match self {
            RoundPhase::Ante => RoundPhase::Deal,
            RoundPhase::Deal => RoundPhase::Hold,
            RoundPhase::Hold => RoundPhase::Draw,
            RoundPhase::Draw => RoundPhase::Showdown,
            RoundPhase::Showdown => RoundPhase::Payout,
            RoundPhase::Payout => RoundPhase::Complete,
            RoundPhase::Complete => RoundPhase::Complete,
        }
    }
}

/// Per-participant showdown result.
#[derive(Debug, Copy, Clone, Eq, PartialEq, Serialize, Deserialize)]
pub enum OutcomeKind {
    Win,
    Loss,
    Bust,
    Tie,
}

/// One player's settlement for the round.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ParticipantOutcome {
    pub participant_id: usize,
    pub outcome: OutcomeKind,
    /// Total credits paid to the participant (flat return plus tube).
    pub payout: u64,
    /// Portion of `payout` drained from a tube.
    pub tube_payout: u64,
    /// Penalty charged on a tube-empty win.
    pub bust_penalty: u64,
    /// Hold-decision identifier that produced the final hand.
    pub decision_id: String,
    /// Final hand category at showdown.
    pub category: Category,
}

/// Immutable record of one completed round.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RoundOutcome {
    pub round_index: u64,
    /// Sum of all antes actually collected, dealer included.
    pub pot_collected: u64,
    /// The dealer's share of the pot.
    pub dealer_ante: u64,
    pub dealer_category: Category,
    pub outcomes: Vec<ParticipantOutcome>,
    /// Balances after settlement and refills, in [`TubeKind::ALL`] order.
    pub tube_balances_after: [u64; 5],
    /// Tubes at or below the trigger threshold after payouts.
    pub triggered_tubes: Vec<TubeKind>,
    /// Tubes drained by a winner this round.
    pub drained_tubes: Vec<TubeKind>,
    /// Pot minus all payouts minus all bust penalties.
    pub house_net: i64,
    /// House-perspective net used for volatility and edge: antes
    /// collected minus payouts, with bust penalties as house income.
    pub net_delta: i64,
}

impl RoundOutcome {
    pub fn total_payout(&self) -> u64 {
        self.outcomes.iter().map(|o| o.payout).sum()
    }

    pub fn total_bust_penalties(&self) -> u64 {
        self.outcomes.iter().map(|o| o.bust_penalty).sum()
    }
}

/// Run one complete round. `players` are settled against `dealer`;
/// `deck` must be freshly shuffled; tube and credit state carry over
/// from previous rounds.
pub fn run_round(
    round_index: u64,
    config: &SimConfig,
    deck: &mut Deck,
    players: &mut [Participant],
    dealer: &mut Participant,
    tubes: &mut TubeLedger,
    resolver: &dyn HoldResolver,
) -> Result<RoundOutcome, SimError> {
    let mut phase = RoundPhase::Ante;

    for p in players.iter_mut() {
        p.reset_for_round();
    }
    dealer.reset_for_round();

    // ante: players then dealer, short stacks contribute what they have
    let mut pot = 0u64;
    for p in players.iter_mut() {
        pot += p.collect_ante(config.ante);
    }
    let dealer_ante = dealer.collect_ante(config.ante);
    pot += dealer_ante;
    phase = phase.next();

    deal_phase(phase, deck, players, dealer)?;
    phase = phase.next();

    // hold: resolver per player; the dealer stands pat unless drawing
    // is enabled for it
    for p in players.iter_mut() {
        let decision = resolver.resolve(hand_array(p, phase)?);
        p.holds = decision.keep;
        p.decision_id = Some(decision.id);
    }
    let dealer_decision = if config.dealer_draw_allowed {
        resolver.resolve(hand_array(dealer, phase)?)
    } else {
        dealer_stand_pat()
    };
    dealer.holds = dealer_decision.keep;
    dealer.decision_id = Some(dealer_decision.id);
    phase = phase.next();

    draw_phase(phase, deck, players, dealer)?;
    phase = phase.next();

    // showdown: evaluate everyone once, then settle player-vs-dealer
    for p in players.iter_mut() {
        p.strength = Some(evaluate_hand(hand_array(p, phase)?));
    }
    let dealer_strength = evaluate_hand(hand_array(dealer, phase)?);
    dealer.strength = Some(dealer_strength.clone());
    phase = phase.next();

    let settlement = payout_phase(config, players, &dealer_strength, tubes);
    phase = phase.next();
    debug_assert_eq!(phase, RoundPhase::Complete);

    let triggered = tubes.check_triggers(config.trigger_threshold);
    if config.house_refill_enabled {
        tubes.process_triggers(&triggered, config.refill_amount, Funder::House);
    }
    if config.player_refill_enabled {
        for &(kind, winner) in &settlement.drained {
            tubes.refill(kind, config.refill_amount, Funder::Player(winner));
        }
    }

    let payouts = settlement.pot_payouts + settlement.tube_payouts;
    let house_net = pot as i64 - payouts as i64 - settlement.bust_penalties as i64;
    let net_delta = pot as i64 - payouts as i64 + settlement.bust_penalties as i64;

    Ok(RoundOutcome {
        round_index,
        pot_collected: pot,
        dealer_ante,
        dealer_category: dealer_strength.category,
        outcomes: settlement.outcomes,
        tube_balances_after: tubes.balances(),
        triggered_tubes: triggered,
        drained_tubes: settlement.drained.iter().map(|&(k, _)| k).collect(),
        house_net,
        net_delta,
    })
}

struct Settlement {
    outcomes: Vec<ParticipantOutcome>,
    pot_payouts: u64,
    tube_payouts: u64,
    bust_penalties: u64,
    /// Tubes drained this round, with the winner that took each.
    drained: Vec<(TubeKind, usize)>,
}

fn deal_phase(
    phase: RoundPhase,
    deck: &mut Deck,
    players: &mut [Participant],
    dealer: &mut Participant,
) -> Result<(), SimError> {
    debug_assert_eq!(phase, RoundPhase::Deal);
    for p in players.iter_mut() {
        for _ in 0..5 {
            let c = deck.deal_card().ok_or(SimError::DeckExhausted { phase: "deal" })?;
            p.hand.push(c);
        }
    }
    for _ in 0..5 {
        let c = deck.deal_card().ok_or(SimError::DeckExhausted { phase: "deal" })?;
        dealer.hand.push(c);
    }
    Ok(())
}

fn draw_phase(
    phase: RoundPhase,
    deck: &mut Deck,
    players: &mut [Participant],
    dealer: &mut Participant,
) -> Result<(), SimError> {
    debug_assert_eq!(phase, RoundPhase::Draw);
    for p in players.iter_mut() {
        replace_unheld(deck, p)?;
    }
    replace_unheld(deck, dealer)
}

/// Replace every unheld position in hand order, consuming the same
/// deck the deal used.
fn replace_unheld(deck: &mut Deck, p: &mut Participant) -> Result<(), SimError> {
    for pos in 0..5 {
        if !p.holds[pos] {
            let c = deck.deal_card().ok_or(SimError::DeckExhausted { phase: "draw" })?;
            p.hand[pos] = c;
        }
    }
    Ok(())
}

fn payout_phase(
    config: &SimConfig,
    players: &mut [Participant],
    dealer_strength: &HandStrength,
    tubes: &mut TubeLedger,
) -> Settlement {
    let mut settlement = Settlement {
        outcomes: Vec::with_capacity(players.len()),
        pot_payouts: 0,
        tube_payouts: 0,
        bust_penalties: 0,
        drained: Vec::new(),
    };

    for p in players.iter_mut() {
        let strength = match &p.strength {
            Some(s) => s.clone(),
            None => continue,
        };
        let decision_id = p.decision_id.unwrap_or("").to_string();

        let mut outcome = ParticipantOutcome {
            participant_id: p.id(),
            outcome: OutcomeKind::Loss,
            payout: 0,
            tube_payout: 0,
            bust_penalty: 0,
            decision_id,
            category: strength.category,
        };

        match compare_hands(&strength, dealer_strength) {
            std::cmp::Ordering::Greater => {
                if let Some(kind) = TubeKind::from_category(strength.category) {
                    let balance = tubes.balance_of(kind);
                    if balance > 0 {
                        // the defining payout rule: a hit drains the
                        // entire pool, not a fraction of it
                        tubes.pay(kind, balance, p.id());
                        p.award(balance);
                        outcome.outcome = OutcomeKind::Win;
                        outcome.payout = balance;
                        outcome.tube_payout = balance;
                        settlement.tube_payouts += balance;
                        settlement.drained.push((kind, p.id()));
                    } else {
                        let charged = p.charge(config.bust_penalty());
                        p.busted = true;
                        outcome.outcome = OutcomeKind::Bust;
                        outcome.bust_penalty = charged;
                        settlement.bust_penalties += charged;
                    }
                } else {
                    p.award(config.ante);
                    outcome.outcome = OutcomeKind::Win;
                    outcome.payout = config.ante;
                    settlement.pot_payouts += config.ante;
                }
            }
            std::cmp::Ordering::Equal => {
                p.award(config.ante);
                outcome.outcome = OutcomeKind::Tie;
                outcome.payout = config.ante;
                settlement.pot_payouts += config.ante;
            }
            std::cmp::Ordering::Less => {}
        }

        settlement.outcomes.push(outcome);
    }

    settlement
}

fn hand_array(p: &Participant, phase: RoundPhase) -> Result<&[crate::cards::Card; 5], SimError> {
    p.hand
        .as_slice()
        .try_into()
        .map_err(|_| SimError::IncompleteHand {
            participant: p.id(),
            phase: phase_name(phase),
        })
}

fn phase_name(phase: RoundPhase) -> &'static str {
    match phase {
        RoundPhase::Ante => "ante",
        RoundPhase::Deal => "deal",
        RoundPhase::Hold => "hold",
        RoundPhase::Draw => "draw",
        RoundPhase::Showdown => "showdown",
        RoundPhase::Payout => "payout",
        RoundPhase::Complete => "complete",
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::holds::{HoldCategory, HoldDecision};

    /// Test resolver that always stands pat.
    struct PatResolver;
    impl HoldResolver for PatResolver {
        fn resolve(&self, _hand: &[crate::cards::Card; 5]) -> HoldDecision {
            HoldDecision {
                keep: [true; 5],
                id: "pat",
                category: HoldCategory::H5,
                ev_estimate: 0.0,
                bust_possible: false,
            }
        }
        fn name(&self) -> &str {
            "pat"
        }
    }

    /// Test resolver that always redraws everything.
    struct DrawFiveResolver;
    impl HoldResolver for DrawFiveResolver {
        fn resolve(&self, _hand: &[crate::cards::Card; 5]) -> HoldDecision {
            HoldDecision {
                keep: [false; 5],
                id: "draw-five",
                category: HoldCategory::H0,
                ev_estimate: 0.0,
                bust_possible: false,
            }
        }
        fn name(&self) -> &str {
            "draw-five"
        }
    }

    fn setup(players: usize) -> (SimConfig, Deck, Vec<Participant>, Participant, TubeLedger) {
        let mut config = SimConfig::default();
        config.players = players;
        let mut deck = Deck::new_with_seed(99);
        deck.shuffle();
        let participants: Vec<Participant> = (0..players)
            .map(|i| Participant::new(i, false, config.starting_credits))
            .collect();
        let dealer = Participant::new(players, true, config.starting_credits);
        let tubes = TubeLedger::new(&config);
        (config, deck, participants, dealer, tubes)
    }

    #[test]
    fn pot_collects_player_and_dealer_antes() {
        let (config, mut deck, mut players, mut dealer, mut tubes) = setup(4);
        let outcome = run_round(
            0,
            &config,
            &mut deck,
            &mut players,
            &mut dealer,
            &mut tubes,
            &PatResolver,
        )
        .expect("round runs");
        // ante=5, 4 players + dealer
        assert_eq!(outcome.pot_collected, 25);
        assert_eq!(outcome.dealer_ante, 5);
    }

    #[test]
    fn pot_for_two_players_at_ante_ten() {
        let (mut config, mut deck, _, _, _) = setup(2);
        config.ante = 10;
        config.players = 2;
        let mut players: Vec<Participant> = (0..2)
            .map(|i| Participant::new(i, false, config.starting_credits))
            .collect();
        let mut dealer = Participant::new(2, true, config.starting_credits);
        let mut tubes = TubeLedger::new(&config);
        let outcome = run_round(
            0,
            &config,
            &mut deck,
            &mut players,
            &mut dealer,
            &mut tubes,
            &PatResolver,
        )
        .expect("round runs");
        assert_eq!(outcome.pot_collected, 30);
    }

    #[test]
    fn house_net_matches_settlement_identity() {
        let (config, mut deck, mut players, mut dealer, mut tubes) = setup(4);
        let outcome = run_round(
            0,
            &config,
            &mut deck,
            &mut players,
            &mut dealer,
            &mut tubes,
            &DrawFiveResolver,
        )
        .expect("round runs");
        let payouts = outcome.total_payout() as i64;
        let penalties = outcome.total_bust_penalties() as i64;
        assert_eq!(
            outcome.house_net,
            outcome.pot_collected as i64 - payouts - penalties
        );
        assert_eq!(
            outcome.net_delta,
            outcome.pot_collected as i64 - payouts + penalties
        );
    }

    #[test]
    fn draw_five_consumes_deck_without_reshuffle() {
        let (config, mut deck, mut players, mut dealer, mut tubes) = setup(4);
        run_round(
            0,
            &config,
            &mut deck,
            &mut players,
            &mut dealer,
            &mut tubes,
            &DrawFiveResolver,
        )
        .expect("round runs");
        // 5 participants dealt 5 then redrew 5: 50 of 52 consumed
        assert_eq!(deck.remaining(), 2);
    }

    #[test]
    fn dealer_stands_pat_when_draw_disallowed() {
        let (mut config, mut deck, mut players, mut dealer, mut tubes) = setup(4);
        config.dealer_draw_allowed = false;
        run_round(
            0,
            &config,
            &mut deck,
            &mut players,
            &mut dealer,
            &mut tubes,
            &DrawFiveResolver,
        )
        .expect("round runs");
        assert_eq!(dealer.decision_id, Some(crate::holds::DEALER_STAND_PAT));
        assert_eq!(dealer.holds, [true; 5]);
        // 4 players consumed 10 cards each, dealer only 5
        assert_eq!(deck.remaining(), 52 - 45);
    }

    #[test]
    fn outcomes_cover_every_player_exactly_once() {
        let (config, mut deck, mut players, mut dealer, mut tubes) = setup(3);
        let outcome = run_round(
            0,
            &config,
            &mut deck,
            &mut players,
            &mut dealer,
            &mut tubes,
            &PatResolver,
        )
        .expect("round runs");
        assert_eq!(outcome.outcomes.len(), 3);
        let mut ids: Vec<usize> = outcome.outcomes.iter().map(|o| o.participant_id).collect();
        ids.sort_unstable();
        assert_eq!(ids, vec![0, 1, 2]);
    }

    #[test]
    fn phase_order_is_linear_and_terminal() {
        let mut phase = RoundPhase::Ante;
        let expected = [
            RoundPhase::Deal,
            RoundPhase::Hold,
            RoundPhase::Draw,
            RoundPhase::Showdown,
            RoundPhase::Payout,
            RoundPhase::Complete,
        ];
        for want in expected {
            phase = phase.next();
            assert_eq!(phase, want);
        }
        assert_eq!(phase.next(), RoundPhase::Complete);
    }
}
