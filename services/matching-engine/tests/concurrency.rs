//! Concurrency test
//!
//! The engine does no locking of its own. Several producers sharing one
//! engine serialize through a mutex, and the book must end up consistent.

use matching_engine::MatchingEngine;
use rust_decimal::Decimal;
use std::sync::{Arc, Mutex};
use std::thread;
use types::order::{OrderRequest, Side};

#[test]
fn test_serialized_producers_share_one_book() {
    let engine = Arc::new(Mutex::new(MatchingEngine::new()));

    let handles: Vec<_> = [Side::BUY, Side::SELL]
        .into_iter()
        .map(|side| {
            let engine = Arc::clone(&engine);
            thread::spawn(move || {
                let mut traded = Decimal::ZERO;
                for _ in 0..500 {
                    let request = OrderRequest::new(side, Decimal::from(50000), Decimal::ONE);
                    let result = engine.lock().unwrap().submit(request).unwrap();
                    traded += result.filled_quantity().as_decimal();
                }
                traded
            })
        })
        .collect();

    let total_traded: Decimal = handles.into_iter().map(|h| h.join().unwrap()).sum();

    let engine = engine.lock().unwrap();
    // Each trade is reported once, to its aggressor
    assert_eq!(total_traded, Decimal::from(500));
    assert!(engine.book().is_empty());
    assert!(engine.check_invariants().is_ok());
}
