#![no_main]

use libdebtbook::{parse, Summary};
use libfuzzer_sys::fuzz_target;
use rust_decimal::Decimal;

fuzz_target!(|data: &[u8]| {
    if let Ok(text) = std::str::from_utf8(data) {
        if let Some(event) = parse(text) {
            assert!(!event.debtor.is_empty());
            assert!(!event.creditor.is_empty());
            assert!(!event.amount.is_sign_negative());

            let summary = Summary::from_events([&event]);
            assert!(summary.obligations().iter().all(|o| o.amount > Decimal::ZERO));
        }
    }
});
