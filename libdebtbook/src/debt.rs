use crate::amount;
use crate::parser::Rule;
use crate::vocab::Vocabulary;

use anyhow::{anyhow, Result};
use pest::iterators::{Pair, Pairs};
use rust_decimal::Decimal;

/// One recorded debt: `debtor` owes `creditor` `amount`.
///
/// Events are never mutated once booked, only wiped all together by
/// [`Ledger::clear_all`][crate::ledger::Ledger::clear_all].
#[derive(Clone, Debug, PartialEq)]
pub struct DebtEvent {
    pub debtor: String,
    pub creditor: String,
    pub amount: Decimal,
}

impl DebtEvent {
    pub fn new(debtor: &str, creditor: &str, amount: Decimal) -> DebtEvent {
        DebtEvent {
            debtor: debtor.to_string(),
            creditor: creditor.to_string(),
            amount,
        }
    }

    /// Build an event out of a matched `debt` token.
    pub fn parse(token: Pair<'_, Rule>) -> Result<DebtEvent> {
        if token.as_rule() != Rule::debt {
            return Err(anyhow!(format!(
                "unexpected token for debt: '{}'",
                token.as_str()
            )));
        }

        let mut pairs = token.into_inner();
        let debtor = next_str(&mut pairs, "debtor")?;
        next_str(&mut pairs, "verb")?;
        let creditor = next_str(&mut pairs, "creditor")?;
        let nominal = amount::parse_nominal(next_str(&mut pairs, "amount")?)?;

        Ok(DebtEvent::new(debtor, creditor, nominal))
    }
}

fn next_str<'i>(pairs: &mut Pairs<'i, Rule>, what: &str) -> Result<&'i str> {
    pairs
        .next()
        .map(|pair| pair.as_str())
        .ok_or(anyhow!(format!("invalid next token, expected {}", what)))
}

/// What is left between two people after netting: `debtor` owes
/// `creditor` a strictly positive `amount`.
#[derive(Clone, Debug, PartialEq)]
pub struct NetObligation {
    pub debtor: String,
    pub creditor: String,
    pub amount: Decimal,
}

impl NetObligation {
    /// `<debtor> <verb> <creditor>: <amount><unit>`, amount to 2 decimals.
    pub fn render(&self, vocab: &Vocabulary) -> String {
        format!(
            "{} {} {}: {:.2}{}",
            self.debtor,
            vocab.verb(),
            self.creditor,
            amount::to_cents(self.amount),
            vocab.unit()
        )
    }
}
