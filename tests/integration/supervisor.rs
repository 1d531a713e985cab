//! Integration tests for the execution supervisor

use crate::test_utils::{strategies, PartialFeeds, FALLING_CLOSES, RISING_CLOSES, RSI_SCRIPT};
use approx::assert_relative_eq;
use pinelite::config::EngineConfig;
use pinelite::core::{EngineStatus, ExecutionSupervisor, SupervisorStateError};
use pinelite::models::{SignalAction, SignalEvent, StrategyDefinition};
use pinelite::services::SimulatedFeedFactory;
use pinelite::signals::ChannelSink;
use std::collections::HashMap;
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::mpsc::UnboundedReceiver;
use tokio::time::{sleep, timeout};

const PERIOD: Duration = Duration::from_secs(5);

fn simulated(prices: &[f64]) -> (ExecutionSupervisor, UnboundedReceiver<SignalEvent>) {
    let (sink, receiver) = ChannelSink::new();
    let supervisor = ExecutionSupervisor::new(
        EngineConfig::default(),
        Arc::new(SimulatedFeedFactory::new(prices.to_vec(), PERIOD)),
        Arc::new(sink),
    );
    (supervisor, receiver)
}

async fn next_signal(receiver: &mut UnboundedReceiver<SignalEvent>) -> SignalEvent {
    timeout(Duration::from_secs(60), receiver.recv())
        .await
        .expect("signal within a minute")
        .expect("sink still open")
}

#[tokio::test(start_paused = true)]
async fn rising_prices_emit_sell_signal() {
    let (supervisor, mut signals) = simulated(&RISING_CLOSES);

    let started = supervisor.start_all(strategies(&["BTCUSDT"])).await.unwrap();
    assert_eq!(started, 1);
    assert_eq!(supervisor.status().await, EngineStatus { is_running: true });

    let event = next_signal(&mut signals).await;
    assert_eq!(event.symbol, "BTCUSDT");
    assert_eq!(event.action, SignalAction::Sell);
    assert_relative_eq!(event.value, 79.68882408668019, epsilon = 1e-9);

    supervisor.stop_all().await.unwrap();
}

#[tokio::test(start_paused = true)]
async fn falling_prices_emit_buy_signal() {
    let (supervisor, mut signals) = simulated(&FALLING_CLOSES);
    supervisor.start_all(strategies(&["ETHUSDT"])).await.unwrap();

    let event = next_signal(&mut signals).await;
    assert_eq!(event.action, SignalAction::Buy);
    assert_relative_eq!(event.value, 20.16372219371395, epsilon = 1e-9);

    supervisor.stop_all().await.unwrap();
}

#[tokio::test(start_paused = true)]
async fn loop_repeats_on_interval() {
    let (supervisor, mut signals) = simulated(&RISING_CLOSES);
    supervisor.start_all(strategies(&["BTCUSDT"])).await.unwrap();

    for _ in 0..3 {
        next_signal(&mut signals).await;
    }

    supervisor.stop_all().await.unwrap();
}

#[tokio::test(start_paused = true)]
async fn neutral_values_emit_nothing() {
    let (supervisor, mut signals) = simulated(&[100.0, 101.0, 100.0, 101.0, 100.0, 101.0]);
    supervisor.start_all(strategies(&["BTCUSDT"])).await.unwrap();

    sleep(PERIOD * 4).await;
    assert!(signals.try_recv().is_err());

    supervisor.stop_all().await.unwrap();
}

#[tokio::test(start_paused = true)]
async fn one_loop_per_symbol() {
    let (supervisor, mut signals) = simulated(&RISING_CLOSES);
    supervisor
        .start_all(strategies(&["BTCUSDT", "ETHUSDT", "SOLUSDT"]))
        .await
        .unwrap();

    assert_eq!(
        supervisor.active_symbols().await,
        vec!["BTCUSDT", "ETHUSDT", "SOLUSDT"]
    );

    let mut seen = Vec::new();
    for _ in 0..3 {
        seen.push(next_signal(&mut signals).await.symbol);
    }
    seen.sort();
    assert_eq!(seen, vec!["BTCUSDT", "ETHUSDT", "SOLUSDT"]);

    assert_eq!(supervisor.stop_all().await.unwrap(), 3);
    assert!(supervisor.active_symbols().await.is_empty());
}

#[tokio::test(start_paused = true)]
async fn start_while_running_is_rejected() {
    let (supervisor, _signals) = simulated(&RISING_CLOSES);
    supervisor.start_all(strategies(&["BTCUSDT"])).await.unwrap();

    let second = supervisor.start_all(strategies(&["BTCUSDT", "ETHUSDT"])).await;
    assert_eq!(second, Err(SupervisorStateError::AlreadyRunning));
    assert_eq!(supervisor.active_symbols().await, vec!["BTCUSDT"]);

    let again = supervisor
        .start_symbol("BTCUSDT", &StrategyDefinition::from(RSI_SCRIPT))
        .await;
    assert_eq!(again, Ok(false));
    assert_eq!(supervisor.active_symbols().await, vec!["BTCUSDT"]);

    supervisor.stop_all().await.unwrap();
}

#[tokio::test(start_paused = true)]
async fn stop_while_stopped_is_noop() {
    let (supervisor, _signals) = simulated(&RISING_CLOSES);

    assert_eq!(supervisor.stop_all().await, Err(SupervisorStateError::NotRunning));
    assert_eq!(supervisor.status().await, EngineStatus { is_running: false });

    supervisor.start_all(strategies(&["BTCUSDT"])).await.unwrap();
    supervisor.stop_all().await.unwrap();
    assert_eq!(supervisor.stop_all().await, Err(SupervisorStateError::NotRunning));
    assert!(!supervisor.status().await.is_running);
}

#[tokio::test(start_paused = true)]
async fn no_signals_after_stop() {
    let (supervisor, mut signals) = simulated(&RISING_CLOSES);
    supervisor.start_all(strategies(&["BTCUSDT"])).await.unwrap();
    next_signal(&mut signals).await;

    supervisor.stop_all().await.unwrap();
    while signals.try_recv().is_ok() {}

    sleep(PERIOD * 10).await;
    assert!(signals.try_recv().is_err());
}

#[tokio::test(start_paused = true)]
async fn restart_after_stop() {
    let (supervisor, mut signals) = simulated(&RISING_CLOSES);

    supervisor.start_all(strategies(&["BTCUSDT"])).await.unwrap();
    supervisor.stop_all().await.unwrap();
    while signals.try_recv().is_ok() {}

    supervisor.start_all(strategies(&["ETHUSDT"])).await.unwrap();
    assert_eq!(supervisor.active_symbols().await, vec!["ETHUSDT"]);
    assert_eq!(next_signal(&mut signals).await.symbol, "ETHUSDT");

    supervisor.stop_all().await.unwrap();
}

#[tokio::test(start_paused = true)]
async fn stop_symbol_leaves_siblings_running() {
    let (supervisor, mut signals) = simulated(&RISING_CLOSES);
    supervisor
        .start_all(strategies(&["BTCUSDT", "ETHUSDT"]))
        .await
        .unwrap();

    supervisor.stop_symbol("BTCUSDT").await.unwrap();
    assert_eq!(
        supervisor.stop_symbol("BTCUSDT").await,
        Err(SupervisorStateError::UnknownSymbol {
            symbol: "BTCUSDT".to_string()
        })
    );
    assert!(supervisor.status().await.is_running);

    while signals.try_recv().is_ok() {}
    for _ in 0..3 {
        assert_eq!(next_signal(&mut signals).await.symbol, "ETHUSDT");
    }

    supervisor.stop_all().await.unwrap();
}

#[tokio::test(start_paused = true)]
async fn start_symbol_requires_running_engine() {
    let (supervisor, mut signals) = simulated(&RISING_CLOSES);
    let definition = StrategyDefinition::from(RSI_SCRIPT);

    assert_eq!(
        supervisor.start_symbol("BTCUSDT", &definition).await,
        Err(SupervisorStateError::NotRunning)
    );

    supervisor.start_all(HashMap::new()).await.unwrap();
    assert_eq!(supervisor.start_symbol("BTCUSDT", &definition).await, Ok(true));
    assert_eq!(next_signal(&mut signals).await.symbol, "BTCUSDT");

    supervisor.stop_all().await.unwrap();
}

#[tokio::test(start_paused = true)]
async fn failed_feed_does_not_affect_siblings() {
    let (sink, mut signals) = ChannelSink::new();
    let supervisor = ExecutionSupervisor::new(
        EngineConfig::default(),
        Arc::new(PartialFeeds::new(&["BROKEN"], PERIOD)),
        Arc::new(sink),
    );

    supervisor
        .start_all(strategies(&["BROKEN", "BTCUSDT"]))
        .await
        .unwrap();

    assert_eq!(next_signal(&mut signals).await.symbol, "BTCUSDT");
    sleep(PERIOD).await;

    assert_eq!(supervisor.active_symbols().await, vec!["BTCUSDT"]);
    assert!(supervisor.status().await.is_running);

    supervisor.stop_all().await.unwrap();
}

#[tokio::test(start_paused = true)]
async fn invalid_strategy_is_skipped() {
    let (supervisor, _signals) = simulated(&RISING_CLOSES);
    let bad: StrategyDefinition = serde_json::from_str(
        r#"{"condition": {"operator": ">", "inputs": [{"type": "value", "value": 1}]}}"#,
    )
    .unwrap();

    let mut map = strategies(&["BTCUSDT"]);
    map.insert("BAD".to_string(), bad.clone());

    assert_eq!(supervisor.start_all(map).await, Ok(1));
    assert_eq!(supervisor.active_symbols().await, vec!["BTCUSDT"]);
    assert!(matches!(
        supervisor.start_symbol("BAD", &bad).await,
        Err(SupervisorStateError::InvalidStrategy { .. })
    ));

    supervisor.stop_all().await.unwrap();
}

#[tokio::test(start_paused = true)]
async fn structured_strategy_watches_its_indicator() {
    let (supervisor, mut signals) = simulated(&RISING_CLOSES);
    let structured: StrategyDefinition = serde_json::from_str(
        r#"{"condition": {
            "type": "operator",
            "operator": ">",
            "inputs": [
                {"type": "indicator", "name": "rsi", "params": {"period": 14}},
                {"type": "value", "value": 70}
            ]
        }}"#,
    )
    .unwrap();

    supervisor
        .start_all(HashMap::from([("BTCUSDT".to_string(), structured)]))
        .await
        .unwrap();

    let event = next_signal(&mut signals).await;
    assert_eq!(event.action, SignalAction::Sell);
    assert_relative_eq!(event.value, 79.68882408668019, epsilon = 1e-9);

    supervisor.stop_all().await.unwrap();
}
