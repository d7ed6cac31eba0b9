mod common;

use common::{address, config, game, Harness};
use hodlem::room::Phase;
use hodlem::{Address, Context, Event, HodlemError, Room, TableConfig};

fn small(prep_blocks: u64, buy_in: u64, bond: u64) -> TableConfig {
    let mut cfg = config(2);
    cfg.buy_in = buy_in;
    cfg.bond = bond;
    cfg.prep_blocks = prep_blocks;
    cfg
}

/// Seat 1 taken by `address(0)`, seat 0 by `address(1)`, as a table client
/// would see it.
fn crossed(cfg: TableConfig) -> (Room, u64) {
    let value = cfg.bond + cfg.buy_in;
    let mut room = Room::new();
    let ctx = Context::new(address(0), 1).with_value(value);
    let (table, _) = room.create_table(&ctx, 1, cfg, game()).unwrap();
    let ctx = Context::new(address(1), 1).with_value(value);
    room.join_table(&ctx, table, 0).unwrap();
    (room, table)
}

#[test]
fn submit_prep_timeout() {
    let (mut room, table) = crossed(small(2, 100, 200));
    room.submit_prep(&Context::new(address(0), 2), table, 1, [1u8; 32])
        .unwrap();

    let late = Context::new(address(0), 20);
    assert!(matches!(
        room.verify_prep_timeout(&late, table, 0),
        Err(HodlemError::NotSubmitted)
    ));
    let early = Context::new(address(0), 3);
    assert!(matches!(
        room.submit_prep_timeout(&early, table, 0),
        Err(HodlemError::DeadlineNotPassed)
    ));

    let receipt = room.submit_prep_timeout(&late, table, 0).unwrap();
    // own deposit back plus the offender's
    assert_eq!(receipt.paid_to(address(0)), 600);
    assert_eq!(receipt.paid_to(address(1)), 0);
    assert_eq!(room.balance(), 0);
    assert!(receipt.events.contains(&Event::Eliminate {
        table,
        seat: 0,
        player: address(1)
    }));
    assert_eq!(receipt.events.last(), Some(&Event::EndGame { table }));

    let rejoin = Context::new(address(1), 21).with_value(300);
    assert!(matches!(
        room.join_table(&rejoin, table, 0),
        Err(HodlemError::WrongPhase)
    ));
}

#[test]
fn submit_prep_timeout_on_self() {
    let (mut room, table) = crossed(small(2, 100, 200));
    let receipt = room
        .submit_prep_timeout(&Context::new(address(0), 20), table, 1)
        .unwrap();
    assert_eq!(receipt.paid_to(address(0)), 0);
    assert_eq!(receipt.paid_to(address(1)), 600);
    assert_eq!(room.balance(), 0);
}

#[test]
fn verify_prep_timeout() {
    let (mut room, table) = crossed(small(1, 300, 200));
    room.submit_prep(&Context::new(address(0), 2), table, 1, [1u8; 32])
        .unwrap();
    room.submit_prep(&Context::new(address(1), 5), table, 0, [2u8; 32])
        .unwrap();

    // the reveal window restarted at block 5
    let ctx = Context::new(address(0), 6);
    assert!(matches!(
        room.verify_prep_timeout(&ctx, table, 0),
        Err(HodlemError::DeadlineNotPassed)
    ));

    let ctx = Context::new(address(0), 7);
    assert!(matches!(
        room.submit_prep_timeout(&ctx, table, 0),
        Err(HodlemError::AlreadySubmitted)
    ));
    let receipt = room
        .verify_prep_timeout(&Context::new(address(0), 7), table, 0)
        .unwrap();
    assert_eq!(receipt.paid_to(address(1)), 0);
    assert_eq!(receipt.paid_to(address(0)), 1000);
    assert_eq!(room.balance(), 0);

    assert!(matches!(
        room.verify_prep_timeout(&Context::new(address(1), 8), table, 1),
        Err(HodlemError::WrongPhase)
    ));
}

#[test]
fn submit_shuffle_timeout() {
    let mut h = Harness::prepped(config(2));
    let deadline = h.table().commit().deadline;
    assert_eq!(h.table().commit().turn, Some(0));

    h.block = deadline;
    assert!(matches!(
        h.room.submit_shuffle_timeout(&h.ctx(1), h.table, 0),
        Err(HodlemError::DeadlineNotPassed)
    ));
    h.mine(1);
    assert!(matches!(
        h.room.submit_shuffle_timeout(&h.ctx(1), h.table, 1),
        Err(HodlemError::WrongTurn)
    ));

    let receipt = h
        .room
        .submit_shuffle_timeout(&h.ctx(0), h.table, 0)
        .unwrap();
    assert_eq!(receipt.paid_to(address(0)), 0);
    assert_eq!(receipt.paid_to(address(1)), 800 + 800);
    assert_eq!(h.room.balance(), 0);
    assert_eq!(h.table().phase(), Phase::Ended);
}

#[test]
fn shuffle_deadline_restarts_each_turn() {
    let mut h = Harness::prepped(config(3));
    h.mine(5);
    h.shuffle_one();
    let deadline = h.table().commit().deadline;
    assert_eq!(deadline, h.block + 10);

    h.block = deadline + 1;
    assert!(matches!(
        h.room.submit_shuffle_timeout(&h.ctx(2), h.table, 0),
        Err(HodlemError::AlreadySubmitted)
    ));
    h.room
        .submit_shuffle_timeout(&h.ctx(2), h.table, 1)
        .unwrap();
    // two seats remain above untilLeft, so a fresh hand starts
    assert_eq!(h.table().phase(), Phase::Shuffle);
    assert_eq!(h.stacks(), vec![700, 0, 700]);
    assert!(h.table().escrow_balanced());
    assert_eq!(h.deck().hand().unwrap().order(), &[0, 2]);
}

#[test]
fn verify_shuffle_timeout_blames_unverified_seats() {
    let mut h = Harness::prepped(config(2));
    h.shuffle_one();
    h.shuffle_one();
    h.verify_one(0);
    h.mine(100);
    assert!(matches!(
        h.room.verify_shuffle_timeout(&h.ctx(1), h.table, 0),
        Err(HodlemError::AlreadySubmitted)
    ));
    let receipt = h
        .room
        .verify_shuffle_timeout(&h.ctx(0), h.table, 1)
        .unwrap();
    assert_eq!(receipt.paid_to(address(0)), 1600);
}

#[test]
fn deal_and_act_timeouts() {
    let mut cfg = config(2);
    cfg.forfeit_burn_percent = 25;
    let mut h = Harness::prepped(cfg.clone());
    h.shuffle_all();
    let shares = h.shares(1);
    h.room
        .decrypt_cards(&h.ctx(1), h.table, 1, &shares, true)
        .unwrap();
    h.mine(100);
    assert!(matches!(
        h.room.deal_timeout(&h.ctx(0), h.table, 1),
        Err(HodlemError::AlreadySubmitted)
    ));
    let receipt = h.room.deal_timeout(&h.ctx(1), h.table, 0).unwrap();
    // a quarter of 800 burned
    assert_eq!(receipt.paid_to(Address::ZERO), 200);
    assert_eq!(receipt.paid_to(address(1)), 1400);

    let mut h = Harness::dealt(cfg);
    let (dealer, big_blind) = h.roles();
    h.mine(100);
    assert!(matches!(
        h.room.act_timeout(&h.ctx(dealer), h.table, big_blind),
        Err(HodlemError::WrongTurn)
    ));
    let receipt = h
        .room
        .act_timeout(&h.ctx(big_blind), h.table, dealer)
        .unwrap();
    assert_eq!(receipt.paid_to(Address::ZERO), 200);
    assert_eq!(receipt.paid_to(address(big_blind)), 1400);
    assert_eq!(h.room.balance(), 0);
}

#[test]
fn draw_timeout_restarts_the_draw() {
    let mut h = Harness::drawing(config(3));
    h.shuffle_all();
    h.deal_step();
    h.show_draw(0);
    assert_eq!(h.table().commit().turn, Some(1));

    h.mine(100);
    assert!(matches!(
        h.room.act_timeout(&h.ctx(0), h.table, 2),
        Err(HodlemError::WrongTurn)
    ));
    let receipt = h.room.act_timeout(&h.ctx(0), h.table, 1).unwrap();
    assert!(receipt.events.contains(&Event::Eliminate {
        table: h.table,
        seat: 1,
        player: address(1)
    }));
    assert_eq!(h.table().phase(), Phase::Shuffle);
    assert_eq!(h.table().dealer(), None);
    assert_eq!(h.table().draw_slot(0), None);
    assert_eq!(h.deck().hand().unwrap().order(), &[0, 2]);
    assert_eq!(h.stacks(), vec![700, 0, 700]);
    assert!(h.table().escrow_balanced());

    // the remaining seats draw again
    h.draw();
    assert!(matches!(h.table().dealer(), Some(0) | Some(2)));
    assert_eq!(h.table().phase(), Phase::Shuffle);
}
