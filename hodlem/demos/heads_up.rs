use hodlem::prover::Player;
use hodlem::room::Phase;
use hodlem::types::SeatIndex;
use hodlem::{Address, Context, Event, Room, TableConfig};

use anyhow::Context as _;
use rand::thread_rng;
use tracing_subscriber::EnvFilter;

const CONFIG: &str = r#"{
    "buyIn": 300, "bond": 500, "startsWith": 2, "untilLeft": 1,
    "structure": [10, 20, 30, 40], "levelBlocks": 20, "verifRounds": 16,
    "prepBlocks": 10, "shuffBlocks": 10, "verifBlocks": 15,
    "dealBlocks": 10, "actBlocks": 15
}"#;

fn print_events(events: &[Event]) {
    for event in events {
        println!("  {}", serde_json::to_string(event).unwrap_or_default());
    }
}

fn has_settled(events: &[Event]) -> bool {
    events.iter().any(|e| matches!(e, Event::CollectPot { .. }))
}

fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .init();

    let rng = &mut thread_rng();
    let config = TableConfig::from_json(CONFIG)?;
    let deposit = config.deposit()?;
    let game = Address::from(0xbeef);
    let alice = Address::from(1);
    let bob = Address::from(2);
    let seats = [alice, bob];
    let block = 1;
    let at = |seat: SeatIndex| Context::new(seats[seat], block);

    let mut room = Room::new();
    let (table, _) = room.create_table(&at(0).with_value(deposit), 0, config.clone(), game)?;
    room.join_table(&at(1).with_value(deposit), table, 1)?;
    let deck_id = room.table(table)?.deck_id();

    let mut players: Vec<Player> = (0..2).map(|seat| Player::new(deck_id, seat)).collect();

    // ------------------ Key setup ------------------
    for (seat, player) in players.iter_mut().enumerate() {
        let commitment = player.prepare(rng)?;
        room.submit_prep(&at(seat), table, seat, commitment)?;
    }
    for (seat, player) in players.iter().enumerate() {
        let receipt = room.verify_prep(&at(seat), table, seat, player.prep_rows())?;
        print_events(&receipt.events);
    }

    // ------------------ Draw, then one hand ------------------
    let mut bits = [0u64; 2];
    let mut settled = false;
    while !settled {
        match room.table(table)?.phase() {
            Phase::Shuffle => {
                let seat = room.table(table)?.commit().turn.context("nobody on turn")?;
                let previous = room
                    .table_deck(table)?
                    .hand()
                    .and_then(|h| h.stages().last().cloned())
                    .context("no deck to shuffle")?;
                let (shuffled, seed) = players[seat].shuffle(rng, &previous, config.verif_rounds)?;
                let receipt = room.submit_shuffle(&at(seat), table, seat, shuffled, seed)?;
                for event in &receipt.events {
                    if let Event::Challenge { bits: b, .. } = event {
                        bits[seat] = *b;
                    }
                }
            }
            Phase::Verify => {
                for seat in 0..2 {
                    let proof = players[seat].prove_shuffle(bits[seat])?;
                    let receipt = room.verify_shuffle(&at(seat), table, seat, &proof)?;
                    print_events(&receipt.events);
                }
            }
            Phase::Deal => {
                for seat in 0..2 {
                    let t = room.table(table)?;
                    let slots = t.deal_step().context("no deal step")?.slots.clone();
                    let deck = room.table_deck(table)?.clone();
                    let shares = players[seat].decrypt_shares(rng, &deck, &slots)?;
                    let receipt = room.decrypt_cards(&at(seat), table, seat, &shares, true)?;
                    print_events(&receipt.events);
                }
                if room.table(table)?.phase() == Phase::Act {
                    let deck = room.table_deck(table)?;
                    for (seat, player) in players.iter().enumerate() {
                        if let Some(slots) = room.table(table)?.hole_slots(seat) {
                            let cards = slots
                                .iter()
                                .map(|s| player.peek(deck, *s).map(|c| c.to_string()))
                                .collect::<anyhow::Result<Vec<_>>>()?;
                            println!("seat {} holds {}", seat, cards.join(" "));
                        }
                    }
                }
            }
            Phase::Draw => {
                let seat = room.table(table)?.commit().turn.context("nobody on turn")?;
                let slot = room.table(table)?.draw_slot(seat).context("no draw card")?;
                let deck = room.table_deck(table)?.clone();
                let proofs = players[seat].reveal(rng, &deck, &[slot])?;
                let receipt = room.show_cards(&at(seat), table, seat, &proofs)?;
                print_events(&receipt.events);
            }
            Phase::Act => {
                let seat = room.table(table)?.commit().turn.context("nobody on turn")?;
                let receipt = room.call_bet(&at(seat), table, seat)?;
                print_events(&receipt.events);
                settled = has_settled(&receipt.events);
            }
            Phase::Showdown => {
                let seat = room.table(table)?.commit().turn.context("nobody on turn")?;
                let slots = room.table(table)?.hole_slots(seat).context("no hole cards")?;
                let deck = room.table_deck(table)?.clone();
                let proofs = players[seat].reveal(rng, &deck, &slots)?;
                let receipt = room.show_cards(&at(seat), table, seat, &proofs)?;
                print_events(&receipt.events);
                settled = has_settled(&receipt.events);
            }
            _ => break,
        }
    }

    for (seat, s) in room.table(table)?.seats().iter().enumerate() {
        if let Some(s) = s {
            println!("seat {} ({}) stack {}", seat, s.player, s.stack);
        }
    }
    Ok(())
}
