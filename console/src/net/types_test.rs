use super::*;

// =============================================================================
// AdminUser / LoginResponse
// =============================================================================

#[test]
fn admin_user_role_check() {
    let admin = AdminUser { id: "1".into(), email: "a@x.io".into(), role: "ADMIN".into() };
    let user = AdminUser { role: "USER".into(), ..admin.clone() };
    assert!(admin.is_admin());
    assert!(!user.is_admin());
}

#[test]
fn admin_role_is_case_sensitive() {
    let user = AdminUser { id: "1".into(), email: "a@x.io".into(), role: "admin".into() };
    assert!(!user.is_admin());
}

#[test]
fn login_response_decodes_snake_case_token() {
    let json = serde_json::json!({
        "access_token": "tok",
        "user": { "id": "u1", "email": "ops@garage.ng", "role": "ADMIN" }
    });
    let resp: LoginResponse = serde_json::from_value(json).unwrap();
    assert_eq!(resp.access_token, "tok");
    assert_eq!(resp.user.email, "ops@garage.ng");
}

// =============================================================================
// Paged envelope
// =============================================================================

#[test]
fn paged_envelope_decodes_camel_case() {
    let json = serde_json::json!({
        "items": [{ "id": "u1", "email": "a@x.io" }],
        "total": 45,
        "page": 3,
        "totalPages": 3
    });
    let paged: Paged<UserSummary> = serde_json::from_value(json).unwrap();
    assert_eq!(paged.items.len(), 1);
    assert_eq!(paged.total, 45);
    assert_eq!(paged.total_pages, 3);
    assert!(!paged.items[0].email_verified);
}

// =============================================================================
// Stats
// =============================================================================

#[test]
fn stats_missing_fields_default_to_zero() {
    let stats: Stats = serde_json::from_value(serde_json::json!({ "usersCount": 7 })).unwrap();
    assert_eq!(stats.users_count, 7);
    assert_eq!(stats.mechanics_count, 0);
    assert!(stats.bookings_by_status.is_empty());
}

#[test]
fn stats_null_fields_default_to_zero() {
    let stats: Stats = serde_json::from_value(serde_json::json!({
        "usersCount": 7,
        "revenueNaira": null,
        "disputedCount": null,
        "bookingsByStatus": null
    }))
    .unwrap();
    assert_eq!(stats.users_count, 7);
    assert!(stats.revenue_naira.abs() < f64::EPSILON);
    assert_eq!(stats.disputed_count, 0);
    assert!(stats.bookings_by_status.is_empty());
}

#[test]
fn mechanics_page_with_null_members_decodes() {
    let page: Paged<MechanicSummary> = serde_json::from_value(serde_json::json!({
        "items": [{
            "id": "m1",
            "companyName": null,
            "ownerFullName": null,
            "isVerified": null,
            "balance": { "balanceMinor": null, "balanceNaira": null }
        }],
        "total": 1,
        "page": 1,
        "totalPages": 1
    }))
    .unwrap();
    let mechanic = &page.items[0];
    assert_eq!(mechanic.company_name, "");
    assert!(!mechanic.is_verified);
    assert_eq!(mechanic.balance_minor(), 0);
    assert!(!mechanic.is_payout_eligible());
}

#[test]
fn page_with_null_items_is_empty() {
    let page: Paged<UserSummary> =
        serde_json::from_value(serde_json::json!({ "items": null, "total": 0, "page": 1, "totalPages": 0 })).unwrap();
    assert!(page.items.is_empty());
}

#[test]
fn transaction_with_null_members_decodes() {
    let tx: Transaction = serde_json::from_value(serde_json::json!({
        "id": "t1",
        "type": null,
        "status": null,
        "amountMinor": null
    }))
    .unwrap();
    assert_eq!(tx.amount_minor, 0);
    assert_eq!(tx.kind, "");
    assert_eq!(tx.status, "");
}

#[test]
fn detail_null_lists_are_empty() {
    let booking: BookingDetail =
        serde_json::from_value(serde_json::json!({ "id": "b1", "status": null, "transactions": null })).unwrap();
    assert!(booking.transactions.is_empty());
    assert_eq!(booking.summary.status, "");

    let user: UserDetail =
        serde_json::from_value(serde_json::json!({ "id": "u1", "email": "a@x.io", "emailVerified": null, "bookings": null }))
            .unwrap();
    assert!(!user.summary.email_verified);
    assert!(user.bookings.is_empty());
}

#[test]
fn stats_bookings_by_status_decodes() {
    let stats: Stats = serde_json::from_value(serde_json::json!({
        "bookingsByStatus": { "DONE": 3, "IN_PROGRESS": 1 }
    }))
    .unwrap();
    assert_eq!(stats.bookings_by_status.get("DONE"), Some(&3));
}

// =============================================================================
// Users / mechanics
// =============================================================================

#[test]
fn display_name_joins_present_parts() {
    assert_eq!(display_name(Some("Ada"), Some("Obi")), "Ada Obi");
    assert_eq!(display_name(Some("Ada"), None), "Ada");
    assert_eq!(display_name(Some(""), Some("Obi")), "Obi");
    assert_eq!(display_name(None, None), "No name");
}

#[test]
fn user_detail_flattens_summary() {
    let json = serde_json::json!({
        "id": "u1",
        "email": "a@x.io",
        "firstName": "Ada",
        "profile": { "phone": "0800" },
        "bookings": [{ "id": "b1", "status": "DONE" }]
    });
    let detail: UserDetail = serde_json::from_value(json).unwrap();
    assert_eq!(detail.summary.display_name(), "Ada");
    assert_eq!(detail.profile.unwrap().phone.as_deref(), Some("0800"));
    assert_eq!(detail.bookings[0].status, "DONE");
}

#[test]
fn payout_eligibility_requires_positive_balance() {
    let mut mechanic = MechanicSummary { id: "m1".into(), ..MechanicSummary::default() };
    assert!(!mechanic.is_payout_eligible());

    mechanic.balance = Some(Balance { balance_minor: 0, balance_naira: 0.0 });
    assert!(!mechanic.is_payout_eligible());

    mechanic.balance = Some(Balance { balance_minor: 150_000, balance_naira: 1500.0 });
    assert!(mechanic.is_payout_eligible());
}

#[test]
fn payout_mechanic_decodes_bank_account() {
    let json = serde_json::json!({
        "id": "m1",
        "companyName": "Fix It Ltd",
        "ownerFullName": "Tunde",
        "email": "fix@it.ng",
        "balance": { "balanceMinor": 250000, "balanceNaira": 2500 },
        "defaultBankAccount": { "bankName": "GTB", "accountNumber": "0123", "accountName": "Fix It" }
    });
    let entry: PayoutMechanic = serde_json::from_value(json).unwrap();
    assert_eq!(entry.summary.balance_minor(), 250_000);
    assert_eq!(entry.default_bank_account.unwrap().bank_name, "GTB");
}

// =============================================================================
// Bookings / transactions
// =============================================================================

#[test]
fn booking_status_label_replaces_first_underscore() {
    assert_eq!(booking_status_label("IN_PROGRESS"), "IN PROGRESS");
    assert_eq!(booking_status_label("DONE"), "DONE");
}

#[test]
fn open_dispute_needs_reason_and_no_resolution() {
    let mut booking = BookingSummary { id: "b1".into(), ..BookingSummary::default() };
    assert!(!booking.has_open_dispute());

    booking.dispute_reason = Some("no show".into());
    assert!(booking.has_open_dispute());

    booking.dispute_resolved_at = Some("2026-01-01T00:00:00Z".into());
    assert!(!booking.has_open_dispute());

    booking.dispute_reason = Some(String::new());
    booking.dispute_resolved_at = None;
    assert!(!booking.has_open_dispute());
}

#[test]
fn booking_missing_estimated_cost_is_none() {
    let booking: BookingSummary = serde_json::from_value(serde_json::json!({ "id": "b1" })).unwrap();
    assert!(booking.estimated_cost.is_none());
    assert_eq!(booking.status, "");
}

#[test]
fn transaction_type_labels() {
    assert_eq!(transaction_type_label("USER_PAYMENT"), "User payment");
    assert_eq!(transaction_type_label("PLATFORM_PAYOUT"), "Payout");
    assert_eq!(transaction_type_label("SOMETHING_NEW"), "SOMETHING_NEW");
}

#[test]
fn transaction_party_prefers_user_email() {
    let json = serde_json::json!({
        "id": "t1",
        "type": "USER_PAYMENT",
        "amountMinor": 5000,
        "user": { "email": "a@x.io" },
        "mechanic": { "companyName": "Fix It" }
    });
    let tx: Transaction = serde_json::from_value(json).unwrap();
    assert_eq!(tx.kind, "USER_PAYMENT");
    assert_eq!(tx.party(), Some("a@x.io"));

    let tx = Transaction { user: None, ..tx };
    assert_eq!(tx.party(), Some("Fix It"));
}

// =============================================================================
// Mutation bodies
// =============================================================================

#[test]
fn dispute_reason_serializes_reason_only() {
    let body = serde_json::to_value(DisputeUpdate::reason("  late arrival ")).unwrap();
    assert_eq!(body, serde_json::json!({ "disputeReason": "late arrival" }));
}

#[test]
fn blank_dispute_reason_serializes_empty_object() {
    let body = serde_json::to_value(DisputeUpdate::reason("   ")).unwrap();
    assert_eq!(body, serde_json::json!({}));
}

#[test]
fn dispute_resolve_serializes_flag() {
    let body = serde_json::to_value(DisputeUpdate::Resolve).unwrap();
    assert_eq!(body, serde_json::json!({ "resolve": true }));
}

#[test]
fn verify_request_is_camel_case() {
    let body = serde_json::to_value(VerifyRequest { is_verified: true }).unwrap();
    assert_eq!(body, serde_json::json!({ "isVerified": true }));
}

#[test]
fn payout_request_rejects_non_positive_amount() {
    assert!(matches!(PayoutRequest::new("m1", 0, None), Err(ApiError::Validation(_))));
    assert!(matches!(PayoutRequest::new("m1", -5, None), Err(ApiError::Validation(_))));
}

#[test]
fn payout_request_rejects_blank_mechanic() {
    assert!(matches!(PayoutRequest::new("  ", 100, None), Err(ApiError::Validation(_))));
}

#[test]
fn payout_request_drops_blank_reference() {
    let req = PayoutRequest::new("m1", 1250, Some("  ")).unwrap();
    assert_eq!(req.reference(), None);
    let body = serde_json::to_value(&req).unwrap();
    assert_eq!(body, serde_json::json!({ "mechanicId": "m1", "amountMinor": 1250 }));
}

#[test]
fn payout_request_keeps_reference() {
    let req = PayoutRequest::new("m1", 1250, Some("TRF-001")).unwrap();
    let body = serde_json::to_value(&req).unwrap();
    assert_eq!(body["reference"], "TRF-001");
    assert_eq!(req.amount_minor(), 1250);
    assert_eq!(req.mechanic_id(), "m1");
}
