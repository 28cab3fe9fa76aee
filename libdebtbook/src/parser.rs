use crate::debt::DebtEvent;
use pest::Parser;

#[derive(Parser)]
#[grammar = "debt.pest"]
pub struct DebtParser;

/// Find the first `@debtor <verb> @creditor <amount>` in `input`.
///
/// Returns `None` when no complete debt is written anywhere in the text,
/// callers are expected to answer with a format hint in that case.
pub fn parse(input: &str) -> Option<DebtEvent> {
    let token = DebtParser::parse(Rule::scan, input)
        .ok()?
        .next()?
        .into_inner()
        .next()?;
    match DebtEvent::parse(token) {
        Ok(event) => Some(event),
        Err(err) => {
            tracing::warn!(%err, "matched debt could not be booked");
            None
        }
    }
}

/// Whether `input` uses a debt verb as a word of its own, well-formed
/// debt or not.
pub fn mentions_debt(input: &str) -> bool {
    DebtParser::parse(Rule::verb_mention, input).is_ok()
}
