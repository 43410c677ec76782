//! Cross-store flows exercised through the public API.

use std::sync::Arc;

use chrono::{Duration, NaiveDate, NaiveTime, TimeZone, Utc};
use turf_core::{BookingStatus, Money, NewBooking, NewPayment, PaymentMethod, PaymentStatus};
use turf_store::{
    BookingStore, FileStorage, KeyValueStorage, ManualClock, PaymentStore, SessionConfig,
    SessionStore, EXPIRY_KEY, USER_KEY,
};

fn temp_session_file() -> std::path::PathBuf {
    std::env::temp_dir()
        .join(format!("turf-store-it-{}", rand::random::<u64>()))
        .join("session.json")
}

fn booking_for(email: &str) -> NewBooking {
    NewBooking {
        turf_id: "turf-7".to_string(),
        turf_name: "Dhanmondi Kick Zone".to_string(),
        date: NaiveDate::from_ymd_opt(2026, 10, 30).unwrap(),
        start_time: NaiveTime::from_hms_opt(17, 0, 0).unwrap(),
        duration: 1,
        player_name: "Demo Player".to_string(),
        player_email: email.to_string(),
        total_amount: Money::from_taka(2500),
        status: BookingStatus::Pending,
        payment_status: None,
        payment_id: None,
    }
}

#[tokio::test(start_paused = true)]
async fn session_survives_restart_on_disk_until_expiry() {
    let path = temp_session_file();
    let clock = Arc::new(ManualClock::new(
        Utc.with_ymd_and_hms(2026, 10, 19, 20, 0, 0).unwrap(),
    ));

    let first = SessionStore::restore(
        Arc::new(FileStorage::new(&path)),
        clock.clone(),
        SessionConfig::default(),
    );
    assert!(first.login("admin@turf.com", "admin123").await);
    let user = first.current_user().unwrap();
    drop(first);

    clock.advance(Duration::hours(12));
    let second = SessionStore::restore(
        Arc::new(FileStorage::new(&path)),
        clock.clone(),
        SessionConfig::default(),
    );
    assert_eq!(second.current_user(), Some(user));
    drop(second);

    clock.advance(Duration::hours(12));
    let storage = Arc::new(FileStorage::new(&path));
    let third = SessionStore::restore(storage.clone(), clock.clone(), SessionConfig::default());
    assert!(!third.is_authenticated());
    assert_eq!(storage.get(USER_KEY).unwrap(), None);
    assert_eq!(storage.get(EXPIRY_KEY).unwrap(), None);

    let _ = std::fs::remove_dir_all(path.parent().unwrap());
}

#[test]
fn created_booking_is_listed_exactly_once_for_its_player() {
    let clock = Arc::new(ManualClock::new(Utc::now()));
    let bookings = BookingStore::new(clock);

    let id = bookings.create_booking(booking_for("player@turf.com"));
    bookings.create_booking(booking_for("someone@turf.com"));

    let mine = bookings.bookings_by_user("player@turf.com");
    assert_eq!(mine.iter().filter(|b| b.id == id).count(), 1);
    assert_eq!(mine.len(), 1);
    assert!(bookings.bookings_by_user("nobody@turf.com").is_empty());
}

#[test]
fn payment_and_booking_link_by_id_only() {
    let clock = Arc::new(ManualClock::new(Utc::now()));
    let bookings = BookingStore::new(clock.clone());
    let payments = PaymentStore::new(clock.clone());

    let booking_id = bookings.create_booking(booking_for("player@turf.com"));
    let payment_id = payments.create_payment(NewPayment {
        booking_id: Some(booking_id.clone()),
        tournament_id: None,
        amount: Money::from_taka(2500),
        method: PaymentMethod::Manual,
        status: PaymentStatus::Unpaid,
        transaction_id: Some(String::new()),
    });

    // Two independent steps; the booking only learns of the payment when told.
    assert!(bookings.get(&booking_id).unwrap().payment_id.is_none());
    bookings.attach_payment(&booking_id, &payment_id).unwrap();
    bookings
        .update_payment_status(&booking_id, PaymentStatus::Pending, None)
        .unwrap();

    let booking = bookings.get(&booking_id).unwrap();
    assert_eq!(booking.payment_id.as_deref(), Some(payment_id.as_str()));
    assert_eq!(booking.payment_status, PaymentStatus::Pending);
    assert_eq!(
        payments.payment_by_booking(&booking_id).map(|p| p.id),
        Some(payment_id)
    );
}
