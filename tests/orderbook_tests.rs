use carbonmarket::models::{Actor, Order, OrderStatus, Side, Trade};
use carbonmarket::orderbook::{
    aggregate_depth, can_cancel, can_submit, can_trade_against, cancel_hint, compute_band, filter, is_within_band,
    last_traded_price, liquidity_stats, normalize, price_history, DepthChart, DepthPoint, NormalizedOrder, PriceBand,
    PriceConstraint, ViewSpec,
};
use chrono::NaiveDate;
use proptest::prelude::*;
use rust_decimal::Decimal;
use rust_decimal_macros::dec;

fn order(id: &str, owner: &str, side: Side, status: OrderStatus, qty: Decimal, price: Decimal) -> Order {
    Order {
        id: id.to_string(),
        side,
        quantity: Some(qty),
        price_per_unit: Some(price),
        status,
        owner_id: owner.to_string(),
        created_at: None,
    }
}

fn bid(id: &str, qty: Decimal, price: Decimal) -> Order {
    order(id, "maker", Side::Buy, OrderStatus::Pending, qty, price)
}

fn ask(id: &str, qty: Decimal, price: Decimal) -> Order {
    order(id, "maker", Side::Sell, OrderStatus::Pending, qty, price)
}

fn pt(price: Decimal, cumulative_volume: Decimal) -> DepthPoint {
    DepthPoint { price, cumulative_volume }
}

fn mixed_book() -> Vec<NormalizedOrder> {
    normalize(&[
        order("b1", "alice", Side::Buy, OrderStatus::Pending, dec!(5), dec!(10)),
        order("s1", "bob", Side::Sell, OrderStatus::Partial, dec!(2), dec!(12)),
        order("b2", "alice", Side::Buy, OrderStatus::Executed, dec!(1), dec!(11)),
        order("b3", "bob", Side::Buy, OrderStatus::Partial, dec!(3), dec!(9)),
        order("s2", "alice", Side::Sell, OrderStatus::Cancelled, dec!(7), dec!(13)),
        order("s3", "carol", Side::Sell, OrderStatus::Pending, dec!(4), dec!(14)),
    ])
}

fn ids(orders: &[NormalizedOrder]) -> Vec<&str> {
    orders.iter().map(|o| o.order.id.as_str()).collect()
}

// --- normalizer ---

#[test]
fn normalize_derives_total_and_keeps_shape() {
    let raw = vec![
        bid("a", dec!(3), dec!(12.5)),
        ask("b", dec!(0.5), dec!(100)),
        bid("c", dec!(2), dec!(7)),
    ];
    let before = raw.clone();

    let out = normalize(&raw);

    assert_eq!(raw, before);
    assert_eq!(ids(&out), vec!["a", "b", "c"]);
    assert_eq!(out[0].total, dec!(37.5));
    assert_eq!(out[1].total, dec!(50));
    assert_eq!(out[2].total, dec!(14));
}

#[test]
fn normalize_degrades_malformed_records_to_zero_total() {
    let mut missing_qty = bid("x", dec!(1), dec!(10));
    missing_qty.quantity = None;
    let mut missing_price = ask("y", dec!(4), dec!(10));
    missing_price.price_per_unit = None;

    let out = normalize(&[missing_qty, bid("ok", dec!(2), dec!(3)), missing_price]);

    assert_eq!(out.len(), 3);
    assert_eq!(out[0].total, Decimal::ZERO);
    assert_eq!(out[1].total, dec!(6));
    assert_eq!(out[2].total, Decimal::ZERO);
}

#[test]
fn normalize_is_idempotent() {
    let once = mixed_book();
    let twice = normalize(once.iter().map(|n| &n.order));
    assert_eq!(once, twice);
}

#[test]
fn normalize_empty_is_empty() {
    assert!(normalize(&Vec::<Order>::new()).is_empty());
}

// --- filter ---

#[test]
fn filter_all_is_identity() {
    let book = mixed_book();
    assert_eq!(filter(&book, &ViewSpec::All), book);
}

#[test]
fn book_views_only_show_open_orders_of_that_side() {
    let book = mixed_book();
    assert_eq!(ids(&filter(&book, &ViewSpec::BySide(Side::Buy))), vec!["b1", "b3"]);
    assert_eq!(ids(&filter(&book, &ViewSpec::BySide(Side::Sell))), vec!["s1", "s3"]);
}

#[test]
fn ownership_view_keeps_terminal_orders() {
    let book = mixed_book();
    let mine = filter(&book, &ViewSpec::OwnedBy("alice".to_string()));

    // executed b2 and cancelled s2 must still be there
    assert_eq!(ids(&mine), vec!["b1", "b2", "s2"]);
}

#[test]
fn view_ids_map_to_specs() {
    assert_eq!(ViewSpec::from_view_id("all", "u"), Some(ViewSpec::All));
    assert_eq!(ViewSpec::from_view_id("BUY", "u"), Some(ViewSpec::BySide(Side::Buy)));
    assert_eq!(ViewSpec::from_view_id("sell", "u"), Some(ViewSpec::BySide(Side::Sell)));
    assert_eq!(
        ViewSpec::from_view_id("my_orders", "u"),
        Some(ViewSpec::OwnedBy("u".to_string()))
    );
    assert_eq!(ViewSpec::from_view_id("bogus", "u"), None);
    assert_eq!(ViewSpec::OwnedBy("u".into()).view_id(), "my_orders");
}

// --- depth ---

#[test]
fn bid_depth_groups_accumulates_from_best_and_presents_ascending() {
    let bids = normalize(&[
        bid("1", dec!(5), dec!(10)),
        bid("2", dec!(3), dec!(10)),
        bid("3", dec!(2), dec!(9)),
    ]);

    let curve = aggregate_depth(&bids, Side::Buy);

    assert_eq!(curve, vec![pt(dec!(9), dec!(10)), pt(dec!(10), dec!(8))]);
}

#[test]
fn ask_depth_accumulates_upward() {
    let asks = normalize(&[
        ask("1", dec!(4), dec!(12)),
        ask("2", dec!(1), dec!(11)),
        ask("3", dec!(2), dec!(12)),
        ask("4", dec!(3), dec!(15)),
    ]);

    let curve = aggregate_depth(&asks, Side::Sell);

    assert_eq!(
        curve,
        vec![pt(dec!(11), dec!(1)), pt(dec!(12), dec!(7)), pt(dec!(15), dec!(10))]
    );
}

#[test]
fn depth_of_empty_side_is_empty() {
    assert!(aggregate_depth(&[], Side::Buy).is_empty());
    assert!(aggregate_depth(&[], Side::Sell).is_empty());

    let only_asks = normalize(&[ask("1", dec!(1), dec!(5))]);
    assert!(aggregate_depth(&only_asks, Side::Buy).is_empty());
}

#[test]
fn depth_groups_prices_by_exact_decimal_value() {
    let raw: Vec<Order> = serde_json::from_value(serde_json::json!([
        { "id": "a", "userId": "m", "type": "SELL", "status": "PENDING", "quantity": 1, "pricePerUnit": 0.3 },
        { "id": "b", "userId": "m", "type": "SELL", "status": "PENDING", "quantity": 2, "pricePerUnit": "0.30" },
        { "id": "c", "userId": "m", "type": "SELL", "status": "PENDING", "quantity": 4, "pricePerUnit": 0.31 }
    ]))
    .unwrap();

    let curve = aggregate_depth(&normalize(&raw), Side::Sell);

    assert_eq!(curve.len(), 2);
    assert_eq!(curve[0].price, dec!(0.3));
    assert_eq!(curve[0].cumulative_volume, dec!(3));
    assert_eq!(curve[1].cumulative_volume, dec!(7));
}

#[test]
fn depth_skips_records_without_usable_numbers() {
    let mut broken = bid("x", dec!(9), dec!(10));
    broken.price_per_unit = None;
    let zero_qty = bid("z", dec!(0), dec!(11));

    let curve = aggregate_depth(&normalize(&[broken, zero_qty, bid("ok", dec!(2), dec!(10))]), Side::Buy);

    assert_eq!(curve, vec![pt(dec!(10), dec!(2))]);
}

#[test]
fn depth_chart_uses_open_book_and_keeps_curves_separate() {
    let chart = DepthChart::from_book(&mixed_book());

    // executed b2 @ 11 and cancelled s2 @ 13 are not liquidity
    assert_eq!(chart.bids, vec![pt(dec!(9), dec!(8)), pt(dec!(10), dec!(5))]);
    assert_eq!(chart.asks, vec![pt(dec!(12), dec!(2)), pt(dec!(14), dec!(6))]);
    assert!(chart.has_liquidity());

    assert!(!DepthChart::from_book(&[]).has_liquidity());
}

fn book_from(levels: &[(u32, u32)], side: Side) -> Vec<NormalizedOrder> {
    let raw: Vec<Order> = levels
        .iter()
        .enumerate()
        .map(|(i, (qty, cents))| {
            order(
                &i.to_string(),
                "m",
                side,
                OrderStatus::Pending,
                Decimal::from(*qty),
                Decimal::new(i64::from(*cents), 2),
            )
        })
        .collect();
    normalize(&raw)
}

proptest! {
    #[test]
    fn bid_curve_grows_away_from_best_and_conserves_volume(
        levels in prop::collection::vec((1u32..1_000, 1u32..500), 1..40)
    ) {
        let book = book_from(&levels, Side::Buy);
        let curve = aggregate_depth(&book, Side::Buy);
        let total: Decimal = levels.iter().map(|(q, _)| Decimal::from(*q)).sum();

        prop_assert!(!curve.is_empty());
        for w in curve.windows(2) {
            prop_assert!(w[0].price < w[1].price);
            // lower bid price includes every higher bid
            prop_assert!(w[0].cumulative_volume >= w[1].cumulative_volume);
        }

        let best = curve.last().unwrap();
        let best_level: Decimal = book
            .iter()
            .filter(|o| o.order.price_per_unit == Some(best.price))
            .filter_map(|o| o.order.quantity)
            .sum();
        prop_assert_eq!(best.cumulative_volume, best_level);
        prop_assert_eq!(curve[0].cumulative_volume, total);
    }

    #[test]
    fn ask_curve_grows_away_from_best_and_conserves_volume(
        levels in prop::collection::vec((1u32..1_000, 1u32..500), 1..40)
    ) {
        let book = book_from(&levels, Side::Sell);
        let curve = aggregate_depth(&book, Side::Sell);
        let total: Decimal = levels.iter().map(|(q, _)| Decimal::from(*q)).sum();

        for w in curve.windows(2) {
            prop_assert!(w[0].price < w[1].price);
            prop_assert!(w[0].cumulative_volume <= w[1].cumulative_volume);
        }

        let best = curve[0];
        let best_level: Decimal = book
            .iter()
            .filter(|o| o.order.price_per_unit == Some(best.price))
            .filter_map(|o| o.order.quantity)
            .sum();
        prop_assert_eq!(best.cumulative_volume, best_level);
        prop_assert_eq!(curve.last().unwrap().cumulative_volume, total);
    }
}

// --- price band ---

#[test]
fn band_around_reference_price() {
    let band = compute_band(dec!(100), dec!(0.10));

    assert_eq!(
        band,
        PriceBand {
            reference: dec!(100),
            min: dec!(90),
            max: dec!(110),
        }
    );
    assert!(is_within_band(dec!(95), &band));
    assert!(!is_within_band(dec!(89), &band));
}

#[test]
fn band_is_inclusive_at_both_edges() {
    for reference in [dec!(100), dec!(37.37), dec!(0.07), dec!(12345.678)] {
        let band = compute_band(reference, dec!(0.10));
        let upper = reference * dec!(1.10);
        let lower = reference * dec!(0.90);
        let eps = dec!(0.0000001);

        assert!(is_within_band(upper, &band), "{reference}");
        assert!(!is_within_band(upper + eps, &band), "{reference}");
        assert!(is_within_band(lower, &band), "{reference}");
        assert!(!is_within_band(lower - eps, &band), "{reference}");
    }
}

#[test]
fn no_reference_price_means_no_constraint() {
    let c = PriceConstraint::from_reference(None, dec!(0.10));

    assert_eq!(c, PriceConstraint::Unconstrained);
    assert!(c.band().is_none());
    assert!(c.admits(dec!(0.01)));
    assert!(c.admits(dec!(1000000)));
    assert!(!c.admits(Decimal::ZERO));

    // a zero reference is "unknown", never a [0, 0] band
    assert_eq!(
        PriceConstraint::from_reference(Some(Decimal::ZERO), dec!(0.10)),
        PriceConstraint::Unconstrained
    );
}

#[test]
fn constraint_message_names_the_allowed_range() {
    let c = PriceConstraint::from_reference(Some(dec!(100)), dec!(0.10));

    assert!(c.admits(dec!(110)));
    assert!(!c.admits(dec!(110.01)));

    let msg = c.to_string();
    assert!(msg.contains("±10%"), "{msg}");
    assert!(msg.contains("(100.00)"), "{msg}");
    assert!(msg.contains("90.00 - 110.00"), "{msg}");
}

fn trade(price: Option<Decimal>, at: Option<(u32, u32)>) -> Trade {
    Trade {
        id: None,
        quantity: Some(dec!(1)),
        price_per_unit: price,
        executed_at: at.and_then(|(day, hour)| {
            NaiveDate::from_ymd_opt(2024, 6, day).and_then(|d| d.and_hms_opt(hour, 0, 0))
        }),
    }
}

#[test]
fn last_traded_price_is_the_newest_execution() {
    let trades = vec![
        trade(Some(dec!(101)), Some((1, 9))),
        trade(Some(dec!(104)), Some((3, 9))),
        trade(Some(dec!(99)), Some((2, 17))),
    ];
    assert_eq!(last_traded_price(&trades), Some(dec!(104)));
}

#[test]
fn last_traded_price_edge_cases() {
    assert_eq!(last_traded_price(&[]), None);

    // undated feed: first entry is the most recent
    let undated = vec![trade(Some(dec!(50)), None), trade(Some(dec!(40)), None)];
    assert_eq!(last_traded_price(&undated), Some(dec!(50)));

    // unusable prices are skipped, even when newest
    let broken = vec![trade(None, Some((5, 0))), trade(Some(dec!(0)), Some((4, 0))), trade(Some(dec!(77)), Some((1, 0)))];
    assert_eq!(last_traded_price(&broken), Some(dec!(77)));
}

#[test]
fn price_history_runs_oldest_first_and_drops_unplottable_trades() {
    let trades = vec![
        trade(Some(dec!(104)), Some((3, 9))),
        trade(Some(dec!(101)), Some((1, 9))),
        trade(Some(dec!(999)), None),
        trade(Some(dec!(0)), Some((2, 9))),
        trade(None, Some((2, 10))),
        trade(Some(dec!(99)), Some((2, 17))),
    ];

    let series: Vec<Decimal> = price_history(&trades).iter().map(|p| p.price_per_unit).collect();

    assert_eq!(series, vec![dec!(101), dec!(99), dec!(104)]);
    assert!(price_history(&[]).is_empty());
}

// --- authorizer ---

fn one(owner: &str, status: OrderStatus) -> NormalizedOrder {
    NormalizedOrder::from_order(order("o", owner, Side::Sell, status, dec!(1), dec!(10)))
}

#[test]
fn owner_may_cancel_only_open_orders() {
    let me = Actor::new("u1", ["ROLE_USER"]);

    assert!(can_cancel(&one("u1", OrderStatus::Pending), &me));
    assert!(can_cancel(&one("u1", OrderStatus::Partial), &me));
    assert!(!can_cancel(&one("u1", OrderStatus::Executed), &me));
    assert!(!can_cancel(&one("u1", OrderStatus::Cancelled), &me));
    assert!(!can_cancel(&one("u2", OrderStatus::Pending), &me));
}

#[test]
fn admins_never_cancel_even_their_own_orders() {
    for spelling in ["ADMIN", "ROLE_ADMIN", "admin", "Role_Admin"] {
        let admin = Actor::new("u1", [spelling, "ROLE_USER"]);
        assert!(!can_cancel(&one("u1", OrderStatus::Pending), &admin), "{spelling}");
        assert!(!can_trade_against(&one("u2", OrderStatus::Pending), &admin), "{spelling}");
        assert!(!can_submit(&admin), "{spelling}");
    }
}

#[test]
fn trading_against_ignores_ownership_but_needs_open_status() {
    let me = Actor::new("u1", ["USER"]);

    assert!(can_trade_against(&one("u2", OrderStatus::Pending), &me));
    assert!(can_trade_against(&one("u1", OrderStatus::Partial), &me));
    assert!(!can_trade_against(&one("u2", OrderStatus::Executed), &me));
    assert!(!can_trade_against(&one("u2", OrderStatus::Cancelled), &me));
    assert!(can_submit(&me));
}

#[test]
fn cancel_hint_agrees_with_can_cancel() {
    let actors = [
        Actor::new("u1", ["ROLE_USER"]),
        Actor::new("u1", ["ROLE_ADMIN"]),
        Actor::new("u2", Vec::<String>::new()),
    ];
    let statuses = [
        OrderStatus::Pending,
        OrderStatus::Partial,
        OrderStatus::Executed,
        OrderStatus::Cancelled,
    ];

    for actor in &actors {
        for status in statuses {
            let o = one("u1", status);
            assert_eq!(
                can_cancel(&o, actor),
                cancel_hint(&o, actor) == "Cancel this order",
                "{actor:?} {status:?}"
            );
        }
    }

    let admin = Actor::new("u1", ["ADMIN"]);
    assert_eq!(cancel_hint(&one("u1", OrderStatus::Pending), &admin), "Admins cannot cancel orders");
    let other = Actor::new("u9", ["USER"]);
    assert_eq!(
        cancel_hint(&one("u1", OrderStatus::Pending), &other),
        "You can only cancel your own orders"
    );
}

// --- stats ---

#[test]
fn liquidity_stats_over_open_orders() {
    let stats = liquidity_stats(&mixed_book());

    assert_eq!(stats.open_orders, 4);
    assert_eq!(stats.best_bid, Some(dec!(10)));
    assert_eq!(stats.best_ask, Some(dec!(12)));
    assert_eq!(stats.spread(), Some(dec!(2)));

    // (5*10 + 2*12 + 3*9 + 4*14) / (5 + 2 + 3 + 4)
    assert_eq!(stats.blended_price, Some(dec!(157) / dec!(14)));
}

#[test]
fn liquidity_stats_of_empty_book() {
    let stats = liquidity_stats(&[]);
    assert_eq!(stats.open_orders, 0);
    assert_eq!(stats.best_bid, None);
    assert_eq!(stats.spread(), None);
    assert_eq!(stats.blended_price, None);
}
