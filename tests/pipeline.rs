//! End-to-end pipeline tests: platforms → router → scanner → cycle report.

#[path = "integration/mock_platform.rs"]
mod mock_platform;

use betscout::engine::cycle::run_cycle;
use betscout::engine::scanner::MarketRouter;
use betscout::platforms::verify_bet;
use betscout::strategy::odds::{rank_opportunities, OddsEvaluator};
use betscout::strategy::stake::{recommend_stake, StakeSizer};
use betscout::strategy::{OpportunityScanner, ScanConfig};
use betscout::types::{BetRequest, BetStatus, Market, Position, RiskTier};
use mock_platform::MockSportsbook;
use rust_decimal::Decimal;
use rust_decimal_macros::dec;

fn even_market(id: &str, platform: &str) -> Market {
    Market::new(
        id,
        platform,
        "Basketball",
        format!("Game {id}"),
        vec![("Home".into(), dec!(2.0)), ("Away".into(), dec!(2.0))],
    )
}

#[tokio::test]
async fn test_full_cycle_ranks_and_sizes() {
    let router = MarketRouter::new(vec![Box::new(MockSportsbook::new("books"))]);
    let scanner = OpportunityScanner::default();

    let report = run_cycle(&router, &scanner, dec!(10), 1).await.unwrap();
    assert_eq!(report.markets_scanned, 3);
    assert_eq!(report.outcomes_scored, 7);

    let labels: Vec<_> = report
        .recommendations
        .iter()
        .map(|r| r.outcome_label.as_str())
        .collect();
    assert_eq!(
        labels,
        vec!["Chelsea", "Alcaraz", "Draw", "Blue", "Arsenal", "Red", "Sinner"]
    );

    let tiers: Vec<_> = report
        .recommendations
        .iter()
        .map(|r| r.score.risk_tier)
        .collect();
    assert_eq!(tiers[0], RiskTier::High);
    assert_eq!(tiers[4], RiskTier::Medium);
    assert_eq!(tiers[6], RiskTier::Low);

    // 0.75 confidence × 0.1 tolerance on a bankroll of 10
    assert!(report.recommendations.iter().all(|r| r.stake.stake == dec!(0.75)));
    assert_eq!(report.total_recommended(), dec!(5.25));
}

#[tokio::test]
async fn test_equal_roi_keeps_platform_order() {
    let router = MarketRouter::new(vec![
        Box::new(MockSportsbook::with_markets("first", vec![even_market("a", "first")])),
        Box::new(MockSportsbook::with_markets("second", vec![even_market("b", "second")])),
    ]);
    let markets = router.scan_all().await.unwrap();
    let (ranked, _) = OpportunityScanner::default().scan(&markets);

    let order: Vec<_> = ranked
        .iter()
        .map(|s| (s.market_id.as_str(), s.outcome_index))
        .collect();
    assert_eq!(order, vec![("a", 0), ("a", 1), ("b", 0), ("b", 1)]);
}

#[tokio::test]
async fn test_ranking_caps_at_ten() {
    let markets: Vec<_> = (0..6).map(|i| even_market(&format!("m{i}"), "books")).collect();
    let router = MarketRouter::new(vec![Box::new(MockSportsbook::with_markets("books", markets))]);

    let report = run_cycle(&router, &OpportunityScanner::default(), dec!(1), 1)
        .await
        .unwrap();
    assert_eq!(report.outcomes_scored, 12);
    assert_eq!(report.recommendations.len(), 10);
    assert_eq!(report.recommendations[9].score.market_id, "m4");
}

#[tokio::test]
async fn test_failing_platform_does_not_stop_cycle() {
    let broken = MockSportsbook::new("broken");
    broken.set_error("503 Service Unavailable");
    let router = MarketRouter::new(vec![
        Box::new(broken),
        Box::new(MockSportsbook::new("books")),
    ]);

    let report = run_cycle(&router, &OpportunityScanner::default(), dec!(1), 2)
        .await
        .unwrap();
    assert_eq!(report.markets_scanned, 3);
}

#[tokio::test]
async fn test_zero_odds_outcome_is_rejected_not_fatal() {
    let market = Market::new(
        "suspended",
        "books",
        "Football",
        "Suspended match",
        vec![("Home".into(), Decimal::ZERO), ("Away".into(), dec!(3))],
    );
    let router = MarketRouter::new(vec![Box::new(MockSportsbook::with_markets("books", vec![market]))]);

    let report = run_cycle(&router, &OpportunityScanner::default(), dec!(1), 1)
        .await
        .unwrap();
    assert_eq!(report.outcomes_rejected, 1);
    assert_eq!(report.recommendations.len(), 1);
    assert_eq!(report.recommendations[0].outcome_label, "Away");
}

#[tokio::test]
async fn test_custom_config_changes_sizing() {
    let scanner = OpportunityScanner::new(
        OddsEvaluator::default(),
        StakeSizer::default(),
        ScanConfig {
            default_confidence: dec!(1),
            risk_tolerance: dec!(0.5),
            rank_limit: 2,
            ..ScanConfig::default()
        },
    );
    let router = MarketRouter::new(vec![Box::new(MockSportsbook::new("books"))]);

    let report = run_cycle(&router, &scanner, dec!(1000), 1).await.unwrap();
    assert_eq!(report.recommendations.len(), 2);
    let stake = report.recommendations[0].stake;
    assert_eq!(stake.stake, dec!(100));
    assert!(stake.capped);
}

#[test]
fn test_simulate_and_verify() {
    use betscout::platforms::SportsbookPlatform;

    let book = MockSportsbook::new("books");
    let log = book.simulated_log();

    let bet = tokio_test::block_on(book.simulate_bet(&BetRequest {
        market_id: "football-1".into(),
        position: Position::Draw,
        amount: dec!(0.5),
        odds: None,
    }));
    let bet = tokio_test::assert_ok!(bet);
    assert_eq!(bet.potential_payout, dec!(2.1));
    assert_eq!(log.lock().unwrap().len(), 1);

    let verification = verify_bet(&bet.tx_hash);
    assert!(verification.verified);
    assert_eq!(verification.status, BetStatus::Simulated);
}

#[test]
fn test_free_functions_agree_with_scanner() {
    let market = Market::new(
        "x",
        "books",
        "Tennis",
        "Final",
        vec![("A".into(), dec!(1.8)), ("B".into(), dec!(2.1))],
    );
    let scores = vec![
        betscout::strategy::odds::evaluate_opportunity(&market, 0, dec!(10)).unwrap(),
        betscout::strategy::odds::evaluate_opportunity(&market, 1, dec!(10)).unwrap(),
    ];
    let ranked = rank_opportunities(scores);
    assert_eq!(ranked[0].outcome_index, 1);
    assert_eq!(ranked[0].roi_percent, dec!(110));
    assert_eq!(ranked[1].risk_tier, RiskTier::High);

    assert_eq!(recommend_stake(dec!(1000), dec!(0.5), dec!(0.1)).unwrap(), dec!(50));
}
