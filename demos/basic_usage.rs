// ============================================================================
// Basic Usage Example
// ============================================================================

use orderbook_engine::numeric::{Price, Quantity};
use orderbook_engine::prelude::*;
use std::sync::Arc;

fn main() {
    println!("=== Order Book Engine Example ===\n");

    let engine = MatchingEngineBuilder::new("BTC-USD")
        .with_event_handler(Arc::new(LoggingEventHandler))
        .build();

    println!("Created matching engine for BTC-USD\n");

    // Add sell orders at different prices
    println!("Adding sell orders...");
    for i in 0i64..5 {
        let sell = Arc::new(Order::limit(
            OrderId::new(i as u64 + 1),
            "BTC-USD",
            Side::Sell,
            Quantity::new(1),
            Price::new(50_000 + i * 100),
        ));
        engine.submit_order(sell);
    }

    // Add buy orders
    println!("Adding buy orders...");
    for i in 0i64..5 {
        let buy = Arc::new(Order::limit(
            OrderId::new(i as u64 + 6),
            "BTC-USD",
            Side::Buy,
            Quantity::new(1),
            Price::new(49_900 - i * 100),
        ));
        engine.submit_order(buy);
    }

    // Get order book snapshot
    println!("\n=== Order Book Snapshot ===");
    let snapshot = engine.get_snapshot(5);

    println!("\nBids:");
    for (price, qty) in &snapshot.bids {
        println!("  {} @ {}", qty, price);
    }

    println!("\nAsks:");
    for (price, qty) in &snapshot.asks {
        println!("  {} @ {}", qty, price);
    }

    println!("\nSpread: {:?}", snapshot.spread);
    println!("Mid Price: {:?}", snapshot.mid_price);

    // Cross the book with a limit buy
    println!("\n=== Submitting Crossing Limit Order ===");
    let crossing_buy = Arc::new(Order::limit(
        OrderId::new(11),
        "BTC-USD",
        Side::Buy,
        Quantity::new(2),
        Price::new(50_200), // Crosses the first three ask levels
    ));

    let trades = engine.submit_order(crossing_buy);

    println!("\nTrades generated:");
    for trade in &trades {
        println!(
            "  Trade {}: buy #{} x sell #{} -> {} @ {}",
            trade.id, trade.buy_order_id, trade.sell_order_id, trade.quantity, trade.price
        );
    }

    // Arm a stop that fires off the last trade price
    println!("\n=== Submitting Stop Order ===");
    let stop = Arc::new(Order::stop(
        OrderId::new(12),
        "BTC-USD",
        Side::Buy,
        Quantity::new(1),
        Price::new(50_100),
    ));
    let stop_trades = engine.submit_order(Arc::clone(&stop));
    println!(
        "Stop triggered immediately: {} ({} trade(s))",
        stop.is_triggered(),
        stop_trades.len()
    );

    // Final snapshot
    println!("\n=== Final Order Book ===");
    let final_snapshot = engine.get_snapshot(10);
    println!("Bids: {} levels", final_snapshot.bids.len());
    println!("Asks: {} levels", final_snapshot.asks.len());
    println!("Spread: {:?}", final_snapshot.spread);
    println!("Last trade price: {:?}", engine.last_trade_price());
}
