use crate::{
    amount,
    debt::{DebtEvent, NetObligation},
    store::DebtStore,
    vocab::Vocabulary,
    LedgerError,
};
use indexmap::IndexMap;
use rust_decimal::Decimal;
use tracing::instrument;

use std::sync::Arc;

type Direction = (String, String);

/// Sum booked amounts per exact `(debtor, creditor)` direction.
///
/// Self-debts are dropped here, they can never be owed to anyone. Sums are
/// exact, so the totals do not depend on the order events come in.
pub fn gross<'a, I>(events: I) -> IndexMap<Direction, Decimal>
where
    I: IntoIterator<Item = &'a DebtEvent>,
{
    let mut totals: IndexMap<Direction, Decimal> = IndexMap::new();
    for event in events {
        if event.debtor == event.creditor {
            continue;
        }
        let total = totals
            .entry((event.debtor.clone(), event.creditor.clone()))
            .or_insert(Decimal::ZERO);
        *total = total.saturating_add(event.amount);
    }
    totals
}

/// Net balances, at most one direction per pair of people.
#[derive(Debug, Default)]
pub struct NetBook {
    entries: IndexMap<Direction, Decimal>,
}

impl NetBook {
    pub fn new() -> NetBook {
        NetBook {
            entries: IndexMap::new(),
        }
    }

    /// Book `amount` from `debtor` to `creditor`, cancelling it against
    /// whatever `creditor` already owes `debtor`.
    pub fn settle(&mut self, debtor: &str, creditor: &str, amount: Decimal) {
        if debtor == creditor || amount <= Decimal::ZERO {
            return;
        }

        let forward = (debtor.to_string(), creditor.to_string());
        let reverse = (creditor.to_string(), debtor.to_string());

        match self.entries.get(&reverse).copied() {
            None => {
                let total = self.entries.entry(forward).or_insert(Decimal::ZERO);
                *total = total.saturating_add(amount);
            }
            Some(existing) if existing == amount => {
                self.entries.shift_remove(&reverse);
            }
            Some(existing) if existing > amount => {
                self.entries.insert(reverse, existing - amount);
            }
            Some(existing) => {
                self.entries.shift_remove(&reverse);
                self.entries.insert(forward, amount - existing);
            }
        }
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Balances that still show up once rounded to cents.
    pub fn obligations(&self) -> Vec<NetObligation> {
        self.entries
            .iter()
            .filter(|(_, &amount)| !amount::to_cents(amount).is_zero())
            .map(|((debtor, creditor), &amount)| NetObligation {
                debtor: debtor.clone(),
                creditor: creditor.clone(),
                amount,
            })
            .collect()
    }
}

/// Outcome of netting the whole ledger.
#[derive(Clone, Debug, PartialEq)]
pub enum Summary {
    /// Nothing booked, or everything cancelled out.
    Settled,
    Outstanding(Vec<NetObligation>),
}

impl Summary {
    pub fn from_events<'a, I>(events: I) -> Summary
    where
        I: IntoIterator<Item = &'a DebtEvent>,
    {
        let mut book = NetBook::new();
        for ((debtor, creditor), amount) in gross(events) {
            book.settle(&debtor, &creditor, amount);
        }

        let obligations = book.obligations();
        if obligations.is_empty() {
            Summary::Settled
        } else {
            Summary::Outstanding(obligations)
        }
    }

    pub fn is_settled(&self) -> bool {
        matches!(self, Summary::Settled)
    }

    pub fn obligations(&self) -> &[NetObligation] {
        match self {
            Summary::Settled => &[],
            Summary::Outstanding(obligations) => obligations,
        }
    }

    pub fn render(&self, vocab: &Vocabulary) -> String {
        match self {
            Summary::Settled => vocab.settled(),
            Summary::Outstanding(obligations) => obligations
                .iter()
                .map(|obligation| obligation.render(vocab))
                .collect::<Vec<_>>()
                .join("\n"),
        }
    }
}

/// Append-only debt ledger over a [`DebtStore`].
///
/// Raw events are kept as booked and netted again on every summary, so the
/// store never holds derived balances.
#[derive(Clone)]
pub struct Ledger {
    store: Arc<dyn DebtStore>,
}

impl Ledger {
    pub fn new(store: Arc<dyn DebtStore>) -> Ledger {
        Ledger { store }
    }

    #[instrument(skip_all, fields(debtor = %event.debtor, creditor = %event.creditor), err)]
    pub async fn append(&self, event: &DebtEvent) -> Result<(), LedgerError> {
        self.store.append(event).await?;
        tracing::info!(amount = %event.amount, "debt booked");
        Ok(())
    }

    /// Drop every booked event. Clearing an empty ledger is fine.
    #[instrument(skip_all, err)]
    pub async fn clear_all(&self) -> Result<(), LedgerError> {
        self.store.clear().await?;
        tracing::info!("ledger cleared");
        Ok(())
    }

    #[instrument(skip_all, err)]
    pub async fn summarize(&self) -> Result<Summary, LedgerError> {
        let events = self.store.events().await?;
        let summary = Summary::from_events(&events);
        tracing::debug!(
            events = events.len(),
            obligations = summary.obligations().len(),
            "ledger summarized"
        );
        Ok(summary)
    }
}
