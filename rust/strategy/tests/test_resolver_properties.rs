use tubesim_engine::cards::Card;
use tubesim_engine::deck::Deck;
use tubesim_strategy::create_resolver;

#[test]
fn held_count_matches_category_for_dealt_hands() {
    let resolver = create_resolver("rulebook");
    for seed in 0..200u64 {
        let mut deck = Deck::new_with_seed(seed);
        deck.shuffle();
        while deck.remaining() >= 5 {
            let hand: [Card; 5] = deck.deal_n(5).try_into().expect("five cards");
            let decision = resolver.resolve(&hand);
            assert_eq!(
                decision.held_count(),
                decision.category.held_count(),
                "hand {:?} decided {}",
                hand,
                decision.id
            );
        }
    }
}

#[test]
fn repeated_resolution_is_deterministic() {
    let resolver = create_resolver("rulebook");
    for seed in 0..50u64 {
        let mut deck = Deck::new_with_seed(seed);
        deck.shuffle();
        let hand: [Card; 5] = deck.deal_n(5).try_into().expect("five cards");
        let first = resolver.resolve(&hand);
        for _ in 0..3 {
            let again = resolver.resolve(&hand);
            assert_eq!(again.id, first.id);
            assert_eq!(again.keep, first.keep);
            assert_eq!(again.category, first.category);
        }
    }
}
