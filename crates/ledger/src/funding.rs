//! Funding ledger
//!
//! Every mutating call runs against a staged copy of the state and replaces
//! the live state only if the whole call succeeded, so a failed `fund` or
//! `withdraw` is never observable.

use fundme_core::{Address, Wei};
use fundme_oracle::{PriceFeed, PriceQuote};
use tracing::{debug, info, warn};

use crate::config::LedgerConfig;
use crate::conversion::{usd_value, Usd};
use crate::error::LedgerError;
use crate::event::LedgerEvent;
use crate::payout::Payout;
use crate::state::LedgerState;

/// Pooled contributions with owner-only full withdrawal
///
/// Once built, state only changes through `fund` and `withdraw`:
///
/// ```compile_fail
/// use fundme_core::{Address, Wei};
/// use fundme_ledger::{FundingLedger, InMemoryPayout, LedgerEvent};
/// use fundme_oracle::{FeedAdapter, MockAggregator};
///
/// let feed = FeedAdapter::new(MockAggregator::new(Address::ZERO, 8, 200_000_000_000));
/// let mut ledger = FundingLedger::new(Address::ZERO, feed, InMemoryPayout::new());
/// ledger.apply(&LedgerEvent::funded(Address::ZERO, Wei::new(1)));
/// ```
pub struct FundingLedger<F, P> {
    state: LedgerState,
    config: LedgerConfig,
    price_feed: F,
    payout: P,
    events: Vec<LedgerEvent>,
}

impl<F: PriceFeed, P: Payout> FundingLedger<F, P> {
    /// Deploy a ledger owned by `owner` and bound to `price_feed`
    pub fn new(owner: Address, price_feed: F, payout: P) -> Self {
        Self::with_config(owner, price_feed, payout, LedgerConfig::default())
    }

    pub fn with_config(owner: Address, price_feed: F, payout: P, config: LedgerConfig) -> Self {
        let state = LedgerState::new(owner, price_feed.address());
        info!(
            %owner,
            price_feed = %state.price_feed,
            minimum_usd = %config.minimum_usd,
            "Ledger deployed"
        );

        Self {
            state,
            config,
            price_feed,
            payout,
            events: Vec::new(),
        }
    }

    /// Accept `amount` from `contributor` if it is worth at least the minimum.
    ///
    /// The price is read once per call.
    pub fn fund(&mut self, contributor: Address, amount: Wei) -> Result<(), LedgerError> {
        let quote = self.price_feed.latest_price().map_err(|e| {
            warn!(%contributor, error = %e, "Price feed unavailable");
            LedgerError::OracleUnavailable(e)
        })?;
        let value = usd_value(amount, &quote)?;

        if value < self.config.minimum_usd {
            warn!(%contributor, %amount, usd_value = %value, "Contribution below minimum");
            return Err(LedgerError::InsufficientContribution {
                usd_value: value,
                minimum_usd: self.config.minimum_usd,
            });
        }

        let event = LedgerEvent::funded(contributor, amount);
        transact(&mut self.state, |staged| staged.apply(&event))?;

        info!(%contributor, %amount, usd_value = %value, balance = %self.state.balance, "Funded");
        self.events.push(event);
        Ok(())
    }

    /// Sweep the whole balance to the owner and clear all contribution records.
    ///
    /// Returns the amount paid out.
    pub fn withdraw(&mut self, caller: Address) -> Result<Wei, LedgerError> {
        let owner = self.state.owner;
        if caller != owner {
            warn!(%caller, "Withdrawal by non-owner rejected");
            return Err(LedgerError::NotOwner { caller });
        }

        let amount = self.state.balance;
        let event = LedgerEvent::withdrawn(owner, amount);
        let payout = &mut self.payout;

        transact(&mut self.state, |staged| {
            staged.apply(&event)?;
            debug!(%owner, %amount, "State cleared, paying out");
            payout.pay(owner, amount).map_err(|source| {
                warn!(%owner, %amount, error = %source, "Payout failed");
                LedgerError::TransferFailed {
                    recipient: owner,
                    amount,
                    source,
                }
            })
        })?;

        info!(%owner, %amount, "Withdrawn");
        self.events.push(event);
        Ok(amount)
    }

    /// Rebuild a ledger from its journaled events.
    ///
    /// The feed is not consulted. Every `Withdrawn` is paid out again so the
    /// payout book matches the journal. Nothing is emitted.
    pub fn replay<'a>(
        owner: Address,
        price_feed: F,
        payout: P,
        config: LedgerConfig,
        events: impl IntoIterator<Item = &'a LedgerEvent>,
    ) -> Result<Self, LedgerError> {
        let mut ledger = Self::with_config(owner, price_feed, payout, config);
        let mut replayed = 0usize;

        for event in events {
            ledger.state.apply(event)?;
            if let LedgerEvent::Withdrawn { owner, amount } = *event {
                ledger
                    .payout
                    .pay(owner, amount)
                    .map_err(|source| LedgerError::TransferFailed {
                        recipient: owner,
                        amount,
                        source,
                    })?;
            }
            replayed += 1;
        }

        debug!(replayed, balance = %ledger.state.balance, "Ledger replayed");
        Ok(ledger)
    }

    /// Current price and the USD value of `amount` at that price
    pub fn quote(&self, amount: Wei) -> Result<(PriceQuote, Usd), LedgerError> {
        let quote = self.price_feed.latest_price()?;
        let value = usd_value(amount, &quote)?;
        Ok((quote, value))
    }

    /// Drain events emitted since the last call
    pub fn take_events(&mut self) -> Vec<LedgerEvent> {
        std::mem::take(&mut self.events)
    }

    pub fn events(&self) -> &[LedgerEvent] {
        &self.events
    }

    pub fn balance(&self) -> Wei {
        self.state.balance
    }

    /// Amount recorded for `contributor`; zero if never funded or reset
    pub fn contribution(&self, contributor: &Address) -> Wei {
        self.state.contribution(contributor)
    }

    pub fn contributor_at(&self, index: usize) -> Result<Address, LedgerError> {
        self.state
            .contributors
            .get(index)
            .copied()
            .ok_or(LedgerError::IndexOutOfRange {
                index,
                len: self.state.contributors.len(),
            })
    }

    pub fn contributors(&self) -> &[Address] {
        &self.state.contributors
    }

    pub fn owner(&self) -> Address {
        self.state.owner
    }

    /// Reference of the bound price feed
    pub fn price_feed(&self) -> Address {
        self.state.price_feed
    }

    pub fn state(&self) -> &LedgerState {
        &self.state
    }

    pub fn config(&self) -> &LedgerConfig {
        &self.config
    }

    pub fn feed(&self) -> &F {
        &self.price_feed
    }

    pub fn payout(&self) -> &P {
        &self.payout
    }

    pub fn payout_mut(&mut self) -> &mut P {
        &mut self.payout
    }
}

/// Run `op` on a copy of `state`; commit the copy only on success
fn transact<T>(
    state: &mut LedgerState,
    op: impl FnOnce(&mut LedgerState) -> Result<T, LedgerError>,
) -> Result<T, LedgerError> {
    let mut staged = state.clone();
    let out = op(&mut staged)?;
    *state = staged;
    Ok(out)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::payout::InMemoryPayout;
    use fundme_oracle::{FeedAdapter, MockAggregator};
    use std::sync::Arc;

    const OWNER: Address = Address::repeat_byte(0xaa);
    const ALICE: Address = Address::repeat_byte(0x01);
    const FEED: Address = Address::repeat_byte(0xfe);

    type Ledger = FundingLedger<FeedAdapter<Arc<MockAggregator>>, InMemoryPayout>;

    fn ledger() -> (Ledger, Arc<MockAggregator>) {
        let aggregator = Arc::new(MockAggregator::new(FEED, 8, 200_000_000_000));
        let ledger = FundingLedger::new(
            OWNER,
            FeedAdapter::new(aggregator.clone()),
            InMemoryPayout::new(),
        );
        (ledger, aggregator)
    }

    #[test]
    fn test_construction_binds_owner_and_feed() {
        let (ledger, _) = ledger();
        assert_eq!(ledger.owner(), OWNER);
        assert_eq!(ledger.price_feed(), FEED);
        assert_eq!(ledger.balance(), Wei::ZERO);
        assert!(ledger.contributors().is_empty());
    }

    #[test]
    fn test_fund_records_and_emits() {
        let (mut ledger, _) = ledger();
        let amount = Wei::ether(1).unwrap();

        ledger.fund(ALICE, amount).unwrap();

        assert_eq!(ledger.balance(), amount);
        assert_eq!(ledger.contribution(&ALICE), amount);
        assert_eq!(ledger.contributor_at(0).unwrap(), ALICE);
        assert_eq!(ledger.take_events(), vec![LedgerEvent::funded(ALICE, amount)]);
        assert!(ledger.events().is_empty());
    }

    #[test]
    fn test_contributor_at_out_of_range() {
        let (ledger, _) = ledger();
        assert!(matches!(
            ledger.contributor_at(0),
            Err(LedgerError::IndexOutOfRange { index: 0, len: 0 })
        ));
    }

    #[test]
    fn test_zero_amount_rejected() {
        let (mut ledger, _) = ledger();
        assert!(matches!(
            ledger.fund(ALICE, Wei::ZERO),
            Err(LedgerError::InsufficientContribution { .. })
        ));
    }

    #[test]
    fn test_price_change_between_calls() {
        let (mut ledger, aggregator) = ledger();
        let amount = Wei::new(25_000_000_000_000_000); // $50 at $2000

        aggregator.update_answer(100_000_000_000); // $1000
        assert!(ledger.fund(ALICE, amount).is_err());

        aggregator.update_answer(400_000_000_000); // $4000
        assert!(ledger.fund(ALICE, amount).is_ok());
    }

    #[test]
    fn test_custom_minimum() {
        let aggregator = Arc::new(MockAggregator::new(FEED, 8, 200_000_000_000));
        let config = LedgerConfig::default().with_minimum_usd(Usd::dollars(1).unwrap());
        let mut ledger = FundingLedger::with_config(
            OWNER,
            FeedAdapter::new(aggregator),
            InMemoryPayout::new(),
            config,
        );

        // $2 at $2000
        assert!(ledger.fund(ALICE, Wei::new(1_000_000_000_000_000)).is_ok());
    }

    #[test]
    fn test_withdraw_empty_ledger() {
        let (mut ledger, _) = ledger();
        assert_eq!(ledger.withdraw(OWNER).unwrap(), Wei::ZERO);
        assert_eq!(
            ledger.take_events(),
            vec![LedgerEvent::withdrawn(OWNER, Wei::ZERO)]
        );
    }

    #[test]
    fn test_replay_pays_out_and_emits_nothing() {
        let amount = Wei::ether(1).unwrap();
        let events = [
            LedgerEvent::funded(ALICE, amount),
            LedgerEvent::withdrawn(OWNER, amount),
        ];
        let aggregator = Arc::new(MockAggregator::new(FEED, 8, 200_000_000_000));

        let ledger = FundingLedger::replay(
            OWNER,
            FeedAdapter::new(aggregator),
            InMemoryPayout::new(),
            LedgerConfig::default(),
            &events,
        )
        .unwrap();

        assert!(ledger.events().is_empty());
        assert_eq!(ledger.payout().credited(&OWNER), amount);
        assert_eq!(ledger.balance(), Wei::ZERO);
        assert!(ledger.state().is_consistent());
    }

    #[test]
    fn test_replay_skips_the_feed() {
        // Offline feed and a 1-wei contribution: replay trusts the journal
        let aggregator = Arc::new(MockAggregator::new(FEED, 8, 200_000_000_000));
        aggregator.set_available(false);

        let ledger = FundingLedger::replay(
            OWNER,
            FeedAdapter::new(aggregator),
            InMemoryPayout::new(),
            LedgerConfig::default(),
            &[LedgerEvent::funded(ALICE, Wei::new(1))],
        )
        .unwrap();

        assert_eq!(ledger.contribution(&ALICE), Wei::new(1));
    }

    #[test]
    fn test_replay_rejects_inconsistent_withdrawal() {
        let aggregator = Arc::new(MockAggregator::new(FEED, 8, 200_000_000_000));
        let result = FundingLedger::replay(
            OWNER,
            FeedAdapter::new(aggregator),
            InMemoryPayout::new(),
            LedgerConfig::default(),
            &[
                LedgerEvent::funded(ALICE, Wei::ether(1).unwrap()),
                LedgerEvent::withdrawn(OWNER, Wei::ZERO),
            ],
        );
        assert!(matches!(result, Err(LedgerError::InconsistentReplay { .. })));
    }

    #[test]
    fn test_fund_overflow_in_conversion_leaves_state() {
        let (mut ledger, _) = ledger();
        ledger.fund(ALICE, Wei::ether(1).unwrap()).unwrap();
        let before = ledger.state().clone();

        let result = ledger.fund(ALICE, Wei::MAX);

        assert!(matches!(result, Err(LedgerError::Overflow { .. })));
        assert_eq!(ledger.state(), &before);
        assert_eq!(ledger.take_events().len(), 1);
    }

    #[test]
    fn test_fund_overflow_in_balance_leaves_state() {
        // $1 per wei at 0 decimals keeps the conversion in range
        let aggregator = Arc::new(MockAggregator::new(FEED, 0, 1));
        let mut ledger = FundingLedger::new(
            OWNER,
            FeedAdapter::new(aggregator),
            InMemoryPayout::new(),
        );
        ledger.fund(ALICE, Wei::MAX).unwrap();
        let before = ledger.state().clone();

        let result = ledger.fund(Address::repeat_byte(0x02), Wei::ether(50).unwrap());

        assert!(matches!(result, Err(LedgerError::Overflow { .. })));
        assert_eq!(ledger.state(), &before);
        assert_eq!(ledger.contributors(), &[ALICE]);
    }

    #[test]
    fn test_quote() {
        let (ledger, _) = ledger();
        let (quote, value) = ledger.quote(Wei::ether(2).unwrap()).unwrap();
        assert_eq!(quote.price, 200_000_000_000);
        assert_eq!(value, Usd::dollars(4000).unwrap());
    }
}
