//! Integration tests for the cart, delivery and checkout rules, end to end.

use bites::{
    checkout::{CheckoutDraft, Field, OrderType},
    delivery::{Coordinates, Eligibility, haversine_km},
    fixtures::Fixture,
    orders::{OrderStatus, Progress},
    prelude::{Cart, CartAddition, DeliverySettings, Price, Quantity, Size, Totals},
    products::AddOn,
};
use smallvec::smallvec;
use testresult::TestResult;

fn addition(name: &str, size: Size, rand: u32, quantity: i64) -> CartAddition {
    CartAddition {
        name: name.to_string(),
        size,
        quantity: Quantity::clamped(quantity),
        base_price: Price::from_rand(rand),
        size_ref: Some(12),
        addons: smallvec![],
        image_url: None,
    }
}

fn draft(name: &str, phone: &str, address: &str) -> CheckoutDraft {
    CheckoutDraft {
        customer_name: name.to_string(),
        phone_number: phone.to_string(),
        delivery_address: address.to_string(),
        ..CheckoutDraft::default()
    }
}

#[test]
fn adding_grows_subtotal_by_line_price() {
    let mut cart = Cart::default();

    let fries = addition("Large Fries", Size::Large, 45, 2);
    let line_price = fries.line_price();

    cart.add(fries);
    let before = cart.subtotal();

    let cola = addition("Cola", Size::Small, 12, 3);
    let cola_price = cola.line_price();

    cart.add(cola);

    assert_eq!(before, line_price);
    assert_eq!(cart.subtotal(), before + cola_price);
    assert_eq!(cart.item_count(), 5);
}

#[test]
fn repeated_selection_merges_and_clamps() {
    let mut cart = Cart::default();

    let first = cart.add(addition("Large Fries", Size::Large, 45, 8));
    let second = cart.add(addition("Large Fries", Size::Large, 45, 5));

    assert_eq!(first, second);
    assert_eq!(cart.items().len(), 1);
    assert_eq!(cart.item_count(), 10);
}

#[test]
fn different_addons_make_different_lines() {
    let mut cart = Cart::default();

    cart.add(addition("Large Fries", Size::Large, 45, 1));
    cart.add(CartAddition {
        addons: smallvec![AddOn {
            id: 1,
            name: "Cheese Sauce".to_string(),
            price: Price::from_rand(10),
        }],
        ..addition("Large Fries", Size::Large, 45, 1)
    });

    assert_eq!(cart.items().len(), 2);
    assert_eq!(cart.subtotal(), Price::from_rand(100));
}

#[test]
fn quantity_updates_respect_bounds() {
    let mut cart = Cart::default();
    let id = cart.add(addition("Large Fries", Size::Large, 45, 1));

    cart.update_quantity(&id, 25);
    assert_eq!(cart.item_count(), 10);

    cart.update_quantity(&id, 0);
    assert!(cart.is_empty());
    assert_eq!(cart.get(&id), None);
}

#[test]
fn empty_cart_has_no_delivery_fee() {
    let cart = Cart::default();
    let settings = DeliverySettings::default();

    assert_eq!(cart.delivery_fee(&settings), Price::ZERO);
    assert_eq!(cart.total(&settings), Price::ZERO);
}

#[test]
fn large_fries_delivered() {
    let mut cart = Cart::default();
    cart.add(addition("Large Fries", Size::Large, 45, 2));

    let totals = cart.totals(&DeliverySettings::default());

    assert_eq!(totals.subtotal, Price::from_rand(90));
    assert_eq!(totals.delivery_fee, Price::from_rand(30));
    assert_eq!(totals.total, Price::from_rand(120));
}

#[test]
fn collection_pays_no_delivery() {
    let mut cart = Cart::default();
    cart.add(addition("Large Fries", Size::Large, 45, 2));

    let totals = Totals::for_checkout(
        cart.items(),
        OrderType::Collection,
        &DeliverySettings::default(),
    );

    assert_eq!(totals.delivery_fee, Price::ZERO);
    assert_eq!(totals.total, Price::from_rand(90));
}

#[test]
fn distance_properties() {
    let store = Coordinates::new(-33.011_664, 27.866_664);
    let customer = Coordinates::new(-33.015, 27.870);

    assert!(haversine_km(store, store).abs() < 1e-12);
    assert!((haversine_km(store, customer) - haversine_km(customer, store)).abs() < 1e-9);
}

#[test]
fn delivery_radius_is_inclusive() {
    assert!(Eligibility::for_distance(5.0, 5.0).is_available);
    assert!(!Eligibility::for_distance(5.0001, 5.0).is_available);
}

#[test]
fn phone_number_boundaries() {
    let valid = ["0821234567", "+27821234567", "27821234567", "082 123 4567"];
    let invalid = ["082123456", "0021234567", "08212345678"];

    for phone in valid {
        assert!(
            draft("Thandi", phone, "12 Main Road, Mdantsane").validate().is_ok(),
            "{phone} should be accepted"
        );
    }

    for phone in invalid {
        let errors = draft("Thandi", phone, "12 Main Road, Mdantsane")
            .validate()
            .err()
            .unwrap_or_default();

        assert_eq!(
            errors.get(Field::PhoneNumber),
            Some("Please enter a valid SA phone number"),
            "{phone} should be rejected"
        );
    }
}

#[test]
fn address_length_boundary() {
    let nine = draft("Thandi", "0821234567", "123456789").validate();
    let ten = draft("Thandi", "0821234567", "1234567890").validate();

    assert!(nine.is_err());
    assert!(ten.is_ok());
}

#[test]
fn preparing_order_progress() {
    let Progress::Active { steps, current } = Progress::project(OrderStatus::Preparing) else {
        unreachable!("preparing is on the timeline");
    };

    let completed: Vec<_> = steps.iter().map(|step| step.completed).collect();
    let in_progress: Vec<_> = steps.iter().map(|step| step.in_progress).collect();

    assert_eq!(current, OrderStatus::Preparing);
    assert_eq!(completed, [true, true, true, false, false, false]);
    assert_eq!(in_progress, [false, false, true, false, false, false]);
}

#[test]
fn fixture_cart_totals() -> TestResult {
    let fixture = Fixture::from_set("kasi")?;
    let cart = fixture.cart(None)?;

    // The second helping of large chips merges into the first line.
    assert_eq!(cart.items().len(), 4);
    assert_eq!(cart.item_count(), 8);

    // 3 x 45.00 + (55.00 + 6.50 + 8.00) + (49.99 + 12.00) + 3 x 12.00
    assert_eq!(cart.subtotal(), Price::from_cents(30_249));

    let settings = fixture.settings().delivery();

    assert_eq!(
        cart.total(&settings),
        Price::from_cents(30_249) + Price::from_rand(30)
    );

    Ok(())
}

#[test]
fn fixture_cart_prefix() -> TestResult {
    let fixture = Fixture::from_set("kasi")?;
    let cart = fixture.cart(Some(1))?;

    assert_eq!(cart.item_count(), 2);
    assert_eq!(cart.subtotal(), Price::from_rand(90));

    Ok(())
}
