//! Property-based checks for pot arithmetic and hand ranking.

use hodlem::cards::Card;
use hodlem::game::pot::{build_pots, split, Contribution};
use hodlem::game::ranking::{best_hand, evaluate_five};
use hodlem::room::escrow::split_forfeit;
use proptest::prelude::*;
use std::collections::BTreeSet;

fn unique_cards(count: usize) -> impl Strategy<Value = Vec<Card>> {
    prop::collection::btree_set(1u8..=52, count).prop_map(|values| {
        values
            .into_iter()
            .map(|v| Card::new(v).unwrap())
            .collect()
    })
}

fn contributions() -> impl Strategy<Value = Vec<Contribution>> {
    prop::collection::vec((0u64..500, any::<bool>()), 2..8).prop_map(|entries| {
        entries
            .into_iter()
            .enumerate()
            .map(|(seat, (amount, contending))| Contribution {
                seat,
                amount,
                contending,
            })
            .collect()
    })
}

proptest! {
    #[test]
    fn split_hands_out_every_chip(amount in 0u64..1_000_000, winners in 1usize..10) {
        let seats: Vec<usize> = (0..winners).collect();
        let shares = split(amount, &seats);
        prop_assert_eq!(shares.iter().map(|(_, a)| a).sum::<u64>(), amount);
        let low = shares.iter().map(|(_, a)| *a).min().unwrap();
        let high = shares.iter().map(|(_, a)| *a).max().unwrap();
        prop_assert!(high - low <= 1);
    }

    #[test]
    fn pots_and_refunds_cover_every_contribution(mut entries in contributions()) {
        // somebody is always still in the hand
        entries[0].contending = true;
        let total: u64 = entries.iter().map(|c| c.amount).sum();
        let (pots, refunds) = build_pots(&entries);
        let pooled: u64 = pots.iter().map(|p| p.amount).sum();
        let refunded: u64 = refunds.iter().map(|(_, a)| a).sum();
        prop_assert_eq!(pooled + refunded, total);

        let folded: BTreeSet<usize> = entries
            .iter()
            .filter(|c| !c.contending)
            .map(|c| c.seat)
            .collect();
        for pot in &pots {
            prop_assert!(pot.eligible.iter().all(|s| !folded.contains(s)));
        }
    }

    #[test]
    fn forfeits_are_fully_accounted(amount in 0u64..1_000_000, percent in 0u8..=100, seats in 0usize..10) {
        let f = split_forfeit(amount, percent, seats);
        prop_assert_eq!(f.burned + f.share * seats as u64, amount);
    }

    #[test]
    fn best_hand_is_the_best_five(cards in unique_cards(7)) {
        let best = best_hand(&cards);
        let mut found = false;
        for skip_a in 0..7 {
            for skip_b in skip_a + 1..7 {
                let five: Vec<Card> = cards
                    .iter()
                    .enumerate()
                    .filter(|(i, _)| *i != skip_a && *i != skip_b)
                    .map(|(_, c)| *c)
                    .collect();
                let rank = evaluate_five(&[five[0], five[1], five[2], five[3], five[4]]);
                prop_assert!(rank <= best);
                found |= rank == best;
            }
        }
        prop_assert!(found);
    }

    #[test]
    fn ranking_ignores_card_order(mut cards in unique_cards(7)) {
        let before = best_hand(&cards);
        cards.reverse();
        prop_assert_eq!(best_hand(&cards), before);
        prop_assert!(before.category().is_some());
    }
}
