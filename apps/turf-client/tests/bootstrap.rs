//! Startup from a config file, end to end.

use std::path::PathBuf;

use turf_client::bootstrap;
use turf_client::commands::{auth, payment};
use turf_client::state::PaymentRequest;
use turf_core::{Money, PaymentMethod, PaymentStatus};

fn temp_dir() -> PathBuf {
    std::env::temp_dir().join(format!("turf-client-it-{}", rand::random::<u64>()))
}

fn write_config(dir: &PathBuf) -> PathBuf {
    std::fs::create_dir_all(dir).unwrap();
    let config = dir.join("turf.toml");
    let session = dir.join("data").join("session.json");
    std::fs::write(
        &config,
        format!(
            "payment_latency_ms = 10\nlogin_latency_ms = 10\nstorage_path = {:?}\n",
            session.display().to_string()
        ),
    )
    .unwrap();
    config
}

#[tokio::test(start_paused = true)]
async fn session_persists_across_bootstraps() {
    let dir = temp_dir();
    let config = write_config(&dir);

    let first = bootstrap(Some(config.clone())).unwrap();
    assert_eq!(first.config.payment_latency_ms, 10);
    assert!(!first.session.is_authenticated());
    auth::login(&first, "admin@turf.com", "admin123").await.unwrap();
    first.shutdown();
    drop(first);

    let second = bootstrap(Some(config)).unwrap();
    let user = auth::current_user(&second).unwrap();
    assert_eq!(user.email, "admin@turf.com");
    assert_eq!(user.name, "Platform Admin");

    auth::logout(&second);
    assert!(auth::current_user(&second).is_none());

    let _ = std::fs::remove_dir_all(dir);
}

#[tokio::test(start_paused = true)]
async fn gateway_payment_through_bootstrapped_state() {
    let dir = temp_dir();
    let state = bootstrap(Some(write_config(&dir))).unwrap();
    auth::login(&state, "player@turf.com", "player123").await.unwrap();

    state.checkout.open(PaymentRequest::for_tournament(
        "t-11",
        Money::from_taka(1200),
        "Futsal League",
    ));
    state.checkout.select_method(PaymentMethod::Gateway);
    let response = payment::submit_payment(&state).await.unwrap();

    assert_eq!(response.payment.status, PaymentStatus::Paid);
    assert_eq!(response.payment.tournament_id.as_deref(), Some("t-11"));
    let reference = response.payment.transaction_id.unwrap();
    assert_eq!(reference.len(), 13);
    assert!(reference.starts_with("TXN"));

    let _ = std::fs::remove_dir_all(dir);
}
