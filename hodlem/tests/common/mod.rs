#![allow(dead_code)]

use ark_std::rand::rngs::StdRng;
use ark_std::rand::SeedableRng;
use hodlem::deck::DeckInstance;
use hodlem::prover::Player;
use hodlem::room::Table;
use hodlem::types::{BlockNumber, SeatIndex, TableId};
use hodlem::{Address, Context, Event, Receipt, Room, TableConfig};

pub const GAME: u64 = 0xbeef;

pub fn config(starts_with: usize) -> TableConfig {
    TableConfig {
        buy_in: 300,
        bond: 500,
        starts_with,
        until_left: 1,
        structure: vec![10, 20, 30, 40],
        level_blocks: 20,
        verif_rounds: 4,
        prep_blocks: 10,
        shuff_blocks: 10,
        verif_blocks: 15,
        deal_blocks: 10,
        act_blocks: 15,
        forfeit_burn_percent: 0,
    }
}

pub fn address(seat: SeatIndex) -> Address {
    Address::from(seat as u64 + 1)
}

pub fn game() -> Address {
    Address::from(GAME)
}

/// A room with one table whose seats are all taken, seat `i` by
/// `address(i)`.
pub struct Harness {
    pub room: Room,
    pub table: TableId,
    pub block: BlockNumber,
    pub rng: StdRng,
    pub players: Vec<Player>,
    /// Challenge bits of each seat's latest shuffle.
    pub bits: Vec<u64>,
}

impl Harness {
    pub fn seated(config: TableConfig) -> Self {
        let seats = config.starts_with;
        let deposit = config.bond + config.buy_in;
        let mut room = Room::new();
        let ctx = Context::new(address(0), 1).with_value(deposit);
        let (table, _) = room.create_table(&ctx, 0, config, game()).unwrap();
        for seat in 1..seats {
            let ctx = Context::new(address(seat), 1).with_value(deposit);
            room.join_table(&ctx, table, seat).unwrap();
        }
        let deck = room.table(table).unwrap().deck_id();
        Self {
            room,
            table,
            block: 2,
            rng: StdRng::seed_from_u64(0x5eed),
            players: (0..seats).map(|seat| Player::new(deck, seat)).collect(),
            bits: vec![0; seats],
        }
    }

    /// Seated and prepped, waiting for the dealer-draw shuffle.
    pub fn drawing(config: TableConfig) -> Self {
        let mut h = Self::seated(config);
        h.prep();
        h
    }

    /// Dealer drawn and waiting for the first hand's shuffle.
    pub fn prepped(config: TableConfig) -> Self {
        let mut h = Self::drawing(config);
        h.draw();
        h
    }

    /// Hole cards dealt and betting open.
    pub fn dealt(config: TableConfig) -> Self {
        let mut h = Self::prepped(config);
        h.shuffle_all();
        h.deal_step();
        h
    }

    pub fn dealer(&self) -> SeatIndex {
        self.table().dealer().unwrap()
    }

    /// Heads-up seats as (dealer, big blind).
    pub fn roles(&self) -> (SeatIndex, SeatIndex) {
        let dealer = self.dealer();
        (dealer, 1 - dealer)
    }

    pub fn ctx(&self, seat: SeatIndex) -> Context {
        Context::new(address(seat), self.block)
    }

    pub fn mine(&mut self, blocks: BlockNumber) {
        self.block += blocks;
    }

    pub fn table(&self) -> &Table {
        self.room.table(self.table).unwrap()
    }

    pub fn deck(&self) -> &DeckInstance {
        self.room.table_deck(self.table).unwrap()
    }

    pub fn stacks(&self) -> Vec<u64> {
        self.table()
            .seats()
            .iter()
            .map(|s| s.as_ref().map_or(0, |s| s.stack))
            .collect()
    }

    pub fn prep(&mut self) -> Vec<Receipt> {
        let seats = self.players.len();
        for seat in 0..seats {
            let commitment = self.players[seat].prepare(&mut self.rng).unwrap();
            let ctx = self.ctx(seat);
            self.room
                .submit_prep(&ctx, self.table, seat, commitment)
                .unwrap();
        }
        (0..seats)
            .map(|seat| {
                let ctx = self.ctx(seat);
                let rows = self.players[seat].prep_rows().to_vec();
                self.room.verify_prep(&ctx, self.table, seat, &rows).unwrap()
            })
            .collect()
    }

    /// Submit the shuffle of the seat on turn.
    pub fn shuffle_one(&mut self) -> Receipt {
        let seat = self.table().commit().turn.unwrap();
        let previous = self.deck().hand().unwrap().stages().last().unwrap().clone();
        let rounds = self.table().config().verif_rounds;
        let (shuffled, seed) = self.players[seat]
            .shuffle(&mut self.rng, &previous, rounds)
            .unwrap();
        let ctx = self.ctx(seat);
        let receipt = self
            .room
            .submit_shuffle(&ctx, self.table, seat, shuffled, seed)
            .unwrap();
        self.bits[seat] = challenge_bits(&receipt);
        receipt
    }

    pub fn verify_one(&mut self, seat: SeatIndex) -> Receipt {
        let proof = self.players[seat].prove_shuffle(self.bits[seat]).unwrap();
        let ctx = self.ctx(seat);
        self.room
            .verify_shuffle(&ctx, self.table, seat, &proof)
            .unwrap()
    }

    /// Every seat shuffles in turn, then every proof is checked.
    pub fn shuffle_all(&mut self) -> Vec<Receipt> {
        let order = self.deck().hand().unwrap().order().to_vec();
        let mut receipts: Vec<Receipt> = order.iter().map(|_| self.shuffle_one()).collect();
        for seat in order {
            receipts.push(self.verify_one(seat));
        }
        receipts
    }

    pub fn shares(&mut self, seat: SeatIndex) -> Vec<hodlem::deck::DecryptShare> {
        let slots = self.table().deal_step().unwrap().slots.clone();
        let deck = self.room.table_deck(self.table).unwrap().clone();
        self.players[seat]
            .decrypt_shares(&mut self.rng, &deck, &slots)
            .unwrap()
    }

    /// Every seat in the hand sends its shares for the current step.
    pub fn deal_step(&mut self) -> Vec<Receipt> {
        let order = self.deck().hand().unwrap().order().to_vec();
        order
            .into_iter()
            .map(|seat| {
                let shares = self.shares(seat);
                let ctx = self.ctx(seat);
                self.room
                    .decrypt_cards(&ctx, self.table, seat, &shares, true)
                    .unwrap()
            })
            .collect()
    }

    /// Shuffle, deal one card to every seat and open them in seat order.
    pub fn draw(&mut self) -> Vec<Receipt> {
        let mut receipts = self.shuffle_all();
        receipts.extend(self.deal_step());
        let order = self.deck().hand().unwrap().order().to_vec();
        for seat in order {
            receipts.push(self.show_draw(seat));
        }
        receipts
    }

    pub fn show_draw(&mut self, seat: SeatIndex) -> Receipt {
        let slot = self.table().draw_slot(seat).unwrap();
        let deck = self.room.table_deck(self.table).unwrap().clone();
        let proofs = self.players[seat]
            .reveal(&mut self.rng, &deck, &[slot])
            .unwrap();
        let ctx = self.ctx(seat);
        self.room
            .show_cards(&ctx, self.table, seat, &proofs)
            .unwrap()
    }

    /// Reveal proofs for both of `seat`'s hole cards.
    pub fn reveals(&mut self, seat: SeatIndex) -> Vec<hodlem::deck::RevealProof> {
        let slots = self.table().hole_slots(seat).unwrap();
        let deck = self.room.table_deck(self.table).unwrap().clone();
        self.players[seat]
            .reveal(&mut self.rng, &deck, &slots)
            .unwrap()
    }

    pub fn call(&mut self, seat: SeatIndex) -> Receipt {
        let ctx = self.ctx(seat);
        self.room.call_bet(&ctx, self.table, seat).unwrap()
    }
}

pub fn challenge_bits(receipt: &Receipt) -> u64 {
    receipt
        .events
        .iter()
        .find_map(|e| match e {
            Event::Challenge { bits, .. } => Some(*bits),
            _ => None,
        })
        .unwrap()
}

pub fn flatten(receipts: &[Receipt]) -> Vec<Event> {
    receipts.iter().flat_map(|r| r.events.clone()).collect()
}
