//! End-to-end ledger scenarios
//!
//! ETH/USD at $2000.00000000 (8 decimals), minimum contribution $50.

use fundme_core::{Address, Wei};
use fundme_ledger::{
    FundingLedger, InMemoryPayout, LedgerConfig, LedgerError, LedgerEvent, PayoutError,
};
use fundme_oracle::{FeedAdapter, MockAggregator};
use rust_decimal_macros::dec;
use std::sync::Arc;

const OWNER: Address = Address::repeat_byte(0xaa);
const FEED: Address = Address::repeat_byte(0xfe);
const STRANGER: Address = Address::repeat_byte(0x66);

type Ledger = FundingLedger<FeedAdapter<Arc<MockAggregator>>, InMemoryPayout>;

fn deploy() -> (Ledger, Arc<MockAggregator>) {
    let aggregator = Arc::new(MockAggregator::new(FEED, 8, 200_000_000_000));
    let ledger = FundingLedger::new(
        OWNER,
        FeedAdapter::new(aggregator.clone()),
        InMemoryPayout::new(),
    );
    (ledger, aggregator)
}

fn ether(value: rust_decimal::Decimal) -> Wei {
    Wei::from_ether(value).unwrap()
}

fn funder(i: u8) -> Address {
    Address::repeat_byte(i)
}

/// $49.99 rejected, $50.00 accepted, $4000 accepted, stranger cannot
/// withdraw, owner drains everything.
#[test]
fn test_fifty_dollar_threshold_and_full_cycle() -> anyhow::Result<()> {
    let (mut ledger, _) = deploy();
    let alice = funder(1);

    // $49.99
    let before = ledger.state().clone();
    let result = ledger.fund(alice, ether(dec!(0.024995)));
    assert!(matches!(
        result,
        Err(LedgerError::InsufficientContribution { .. })
    ));
    assert_eq!(ledger.state(), &before);

    // $50.00
    ledger.fund(alice, ether(dec!(0.025)))?;
    assert_eq!(ledger.contribution(&alice), ether(dec!(0.025)));

    // fresh cycle for the $4000 part
    ledger.withdraw(OWNER)?;
    ledger.take_events();

    // $4000
    ledger.fund(alice, ether(dec!(2)))?;
    assert_eq!(ledger.balance(), ether(dec!(2)));

    let result = ledger.withdraw(STRANGER);
    assert!(matches!(
        result,
        Err(LedgerError::NotOwner { caller }) if caller == STRANGER
    ));
    assert_eq!(ledger.balance(), ether(dec!(2)));

    let paid = ledger.withdraw(OWNER)?;
    assert_eq!(paid, ether(dec!(2)));
    assert_eq!(ledger.balance(), Wei::ZERO);
    assert_eq!(ledger.contribution(&alice), Wei::ZERO);
    assert!(ledger.contributors().is_empty());
    assert_eq!(
        ledger.payout().credited(&OWNER),
        ether(dec!(2.025))
    );

    assert_eq!(
        ledger.take_events(),
        vec![
            LedgerEvent::funded(alice, ether(dec!(2))),
            LedgerEvent::withdrawn(OWNER, ether(dec!(2))),
        ]
    );
    Ok(())
}

#[test]
fn test_accepted_contribution_adds_exactly_amount() -> anyhow::Result<()> {
    let (mut ledger, _) = deploy();
    let alice = funder(1);
    let amounts = [dec!(0.05), dec!(1.5), dec!(0.025)];

    for value in amounts {
        let amount = ether(value);
        let balance_before = ledger.balance();
        let contribution_before = ledger.contribution(&alice);

        ledger.fund(alice, amount)?;

        assert_eq!(ledger.balance(), balance_before.checked_add(amount).unwrap());
        assert_eq!(
            ledger.contribution(&alice),
            contribution_before.checked_add(amount).unwrap()
        );
        assert!(ledger.state().is_consistent());
    }
    Ok(())
}

#[test]
fn test_repeat_contributor_is_listed_each_time() -> anyhow::Result<()> {
    let (mut ledger, _) = deploy();
    let alice = funder(1);
    let bob = funder(2);

    ledger.fund(alice, ether(dec!(1)))?;
    ledger.fund(bob, ether(dec!(1)))?;
    ledger.fund(alice, ether(dec!(1)))?;

    assert_eq!(ledger.contributors(), &[alice, bob, alice]);
    assert_eq!(ledger.contributor_at(2)?, alice);
    assert_eq!(ledger.contribution(&alice), ether(dec!(2)));
    Ok(())
}

#[test]
fn test_withdraw_with_many_funders() -> anyhow::Result<()> {
    let (mut ledger, _) = deploy();
    let funders: Vec<Address> = (1..=6).map(funder).collect();

    for f in &funders {
        ledger.fund(*f, ether(dec!(20)))?;
    }
    assert_eq!(ledger.balance(), ether(dec!(120)));

    ledger.withdraw(OWNER)?;

    assert_eq!(ledger.balance(), Wei::ZERO);
    for f in &funders {
        assert_eq!(ledger.contribution(f), Wei::ZERO);
    }
    assert!(matches!(
        ledger.contributor_at(0),
        Err(LedgerError::IndexOutOfRange { .. })
    ));
    assert_eq!(ledger.payout().credited(&OWNER), ether(dec!(120)));
    Ok(())
}

#[test]
fn test_oracle_failure_leaves_state_identical() -> anyhow::Result<()> {
    let (mut ledger, aggregator) = deploy();
    ledger.fund(funder(1), ether(dec!(1)))?;
    ledger.take_events();

    aggregator.set_available(false);
    let before = serde_json::to_vec(ledger.state())?;

    let result = ledger.fund(funder(2), ether(dec!(5)));
    assert!(matches!(result, Err(LedgerError::OracleUnavailable(_))));

    // HashMap order is stable for an unchanged map
    assert_eq!(serde_json::to_vec(ledger.state())?, before);
    assert!(ledger.events().is_empty());

    aggregator.set_available(true);
    ledger.fund(funder(2), ether(dec!(5)))?;
    assert_eq!(ledger.balance(), ether(dec!(6)));
    Ok(())
}

#[test]
fn test_invalid_answer_is_oracle_unavailable() {
    let (mut ledger, aggregator) = deploy();
    aggregator.update_answer(0);

    let result = ledger.fund(funder(1), ether(dec!(1)));
    assert!(matches!(result, Err(LedgerError::OracleUnavailable(_))));
    assert_eq!(ledger.balance(), Wei::ZERO);
}

#[test]
fn test_failed_payout_rolls_back_withdrawal() -> anyhow::Result<()> {
    let (mut ledger, _) = deploy();
    let alice = funder(1);
    ledger.fund(alice, ether(dec!(2)))?;
    ledger.take_events();
    ledger.payout_mut().reject(OWNER);

    let before = ledger.state().clone();
    let result = ledger.withdraw(OWNER);

    assert!(matches!(
        result,
        Err(LedgerError::TransferFailed {
            source: PayoutError::Rejected(_),
            ..
        })
    ));
    assert_eq!(ledger.state(), &before);
    assert_eq!(ledger.contribution(&alice), ether(dec!(2)));
    assert!(ledger.events().is_empty());

    // recipient fixed, retry succeeds
    ledger.payout_mut().accept(OWNER);
    assert_eq!(ledger.withdraw(OWNER)?, ether(dec!(2)));
    Ok(())
}

#[test]
fn test_ledger_reusable_after_withdrawal() -> anyhow::Result<()> {
    let (mut ledger, _) = deploy();
    let alice = funder(1);

    ledger.fund(alice, ether(dec!(1)))?;
    ledger.withdraw(OWNER)?;
    ledger.fund(alice, ether(dec!(0.5)))?;

    assert_eq!(ledger.contribution(&alice), ether(dec!(0.5)));
    assert_eq!(ledger.contributors(), &[alice]);
    assert_eq!(ledger.balance(), ether(dec!(0.5)));
    Ok(())
}

#[test]
fn test_replay_rebuilds_state() -> anyhow::Result<()> {
    let (mut live, _) = deploy();
    live.fund(funder(1), ether(dec!(1)))?;
    live.fund(funder(2), ether(dec!(3)))?;
    live.withdraw(OWNER)?;
    live.fund(funder(1), ether(dec!(0.1)))?;
    let events = live.take_events();

    let replayed = FundingLedger::replay(
        OWNER,
        FeedAdapter::new(Arc::new(MockAggregator::new(FEED, 8, 200_000_000_000))),
        InMemoryPayout::new(),
        LedgerConfig::default(),
        &events,
    )?;

    assert_eq!(replayed.state(), live.state());
    assert_eq!(
        replayed.payout().credited(&OWNER),
        live.payout().credited(&OWNER)
    );
    Ok(())
}
