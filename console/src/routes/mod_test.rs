use super::*;

// =============================================================================
// parse
// =============================================================================

#[test]
fn parses_every_table_entry() {
    assert_eq!(Route::parse("/login"), Route::Login);
    assert_eq!(Route::parse("/"), Route::Dashboard);
    assert_eq!(Route::parse("/users"), Route::Users);
    assert_eq!(Route::parse("/users/u1"), Route::UserDetail("u1".into()));
    assert_eq!(Route::parse("/mechanics"), Route::Mechanics);
    assert_eq!(Route::parse("/mechanics/m1"), Route::MechanicDetail("m1".into()));
    assert_eq!(Route::parse("/bookings"), Route::Bookings);
    assert_eq!(Route::parse("/bookings/b1"), Route::BookingDetail("b1".into()));
    assert_eq!(Route::parse("/transactions"), Route::Transactions);
    assert_eq!(Route::parse("/payouts"), Route::Payouts);
}

#[test]
fn query_string_is_ignored() {
    assert_eq!(Route::parse("/bookings?hasDispute=true"), Route::Bookings);
    assert_eq!(Route::parse("/users/u1#profile"), Route::UserDetail("u1".into()));
}

#[test]
fn unknown_paths_fall_back_to_dashboard() {
    assert_eq!(Route::parse("/nope"), Route::Dashboard);
    assert_eq!(Route::parse("/users/u1/edit"), Route::Dashboard);
    assert_eq!(Route::parse(""), Route::Dashboard);
}

#[test]
fn trailing_slash_matches() {
    assert_eq!(Route::parse("/payouts/"), Route::Payouts);
}

// =============================================================================
// path
// =============================================================================

#[test]
fn path_round_trips_encoded_ids() {
    let route = Route::BookingDetail("a b/c".into());
    assert_eq!(route.path(), "/bookings/a%20b%2Fc");
    assert_eq!(Route::parse(&route.path()), route);
}

#[test]
fn only_login_is_public() {
    assert!(!Route::Login.is_protected());
    assert!(Route::Dashboard.is_protected());
    assert!(Route::Payouts.is_protected());
    assert!(Route::UserDetail("u1".into()).is_protected());
}
