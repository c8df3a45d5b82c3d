//! Checkout Example
//!
//! This example fills a cart from a fixture set, checks delivery eligibility, prints
//! the cart receipt and places the order against an in-process order API.
//!
//! Use `-f` to load a fixture set by name
//! Use `-n` to specify the number of selections to add to the cart
//! Use `--collect` to collect instead of delivering, `--card` to pay by card
//! Use `--lat` and `--lng` to give the delivery address coordinates
//!
//! Set `RUST_LOG=debug` to see the cart and delivery logs.

use std::{io, sync::Mutex};

use anyhow::Result;
use async_trait::async_trait;
use clap::Parser;
use jiff::Timestamp;
use tracing_subscriber::{EnvFilter, fmt, layer::SubscriberExt, util::SubscriberInitExt};

use bites::{
    checkout::{CheckoutDraft, OrderSubmission, OrderType, ProfileUpdate, place_order},
    context::User,
    delivery::{Eligibility, OrderTypeSelector},
    fixtures::Fixture,
    gateway::{GatewayError, OrderGateway},
    orders::{ApiOrder, ApiOrderItem, OrderPage, OrderStatus, PageMeta, Progress},
    prices::Price,
    products::{Catalog, Product},
    quantity::Quantity,
    receipt::Receipt,
    settings::{DeliverySettings, RemoteSettings},
    utils::DemoCheckoutArgs,
};

/// Order API that prices submissions against the fixture menu.
#[derive(Debug)]
struct LocalGateway {
    catalog: Catalog,
    settings: DeliverySettings,
    orders: Mutex<Vec<ApiOrder>>,
}

impl LocalGateway {
    fn price_line(&self, size_ref: u64, addon_ids: &[u64]) -> Option<(String, String, Price)> {
        self.catalog.available().find_map(|product| {
            let size = product.sizes.iter().find(|size| size.id == size_ref)?;
            let addons: Price = product
                .addons
                .iter()
                .filter(|addon| addon_ids.contains(&addon.id))
                .map(|addon| addon.price)
                .sum();

            Some((
                product.name.clone(),
                size.size.label().to_lowercase(),
                product.unit_base_price(size) + addons,
            ))
        })
    }
}

#[async_trait]
impl OrderGateway for LocalGateway {
    async fn create_order(&self, submission: &OrderSubmission) -> Result<ApiOrder, GatewayError> {
        let mut items = Vec::with_capacity(submission.line_items.len());

        for (id, line) in (1..).zip(&submission.line_items) {
            let (product_name, size, unit_price) = self
                .price_line(line.size_ref, &line.addon_ids)
                .ok_or(GatewayError::Rejected {
                    status: 422,
                    message: Some("One of your items is no longer available".to_string()),
                })?;

            items.push(ApiOrderItem {
                id,
                product_name,
                size,
                quantity: line.quantity,
                unit_price,
                total_price: unit_price.times(Quantity::clamped(i64::from(line.quantity))),
            });
        }

        let mut orders = self
            .orders
            .lock()
            .map_err(|_err| GatewayError::Network("order store poisoned".to_string()))?;

        let subtotal: Price = items.iter().map(|item| item.total_price).sum();
        let delivery_fee = match submission.order_type {
            OrderType::Delivery => self.settings.fee_amount,
            OrderType::Collection => Price::ZERO,
        };
        let id = u64::try_from(orders.len()).unwrap_or(u64::MAX).saturating_add(1);

        let order = ApiOrder {
            id,
            order_number: format!("KB-{:04}", 1000 + id),
            customer_name: submission.customer_name.clone(),
            customer_phone: submission.customer_phone.clone(),
            delivery_address: submission.delivery_address.clone(),
            delivery_latitude: submission.delivery_latitude,
            delivery_longitude: submission.delivery_longitude,
            order_type: Some(submission.order_type),
            subtotal,
            delivery_fee,
            total: subtotal + delivery_fee,
            status: OrderStatus::Pending,
            status_label: OrderStatus::Pending.label().to_string(),
            payment_method: format!("{:?}", submission.payment_method).to_lowercase(),
            payment_method_label: format!("{:?}", submission.payment_method),
            notes: submission.notes.clone(),
            estimated_delivery_at: None,
            created_at: Timestamp::now(),
            items,
            status_history: Vec::new(),
        };

        orders.push(order.clone());

        Ok(order)
    }

    async fn get_order(&self, order_number: &str) -> Result<ApiOrder, GatewayError> {
        self.orders
            .lock()
            .map_err(|_err| GatewayError::Network("order store poisoned".to_string()))?
            .iter()
            .find(|order| order.order_number == order_number)
            .cloned()
            .ok_or(GatewayError::NotFound)
    }

    async fn list_orders(&self, page: u32, _per_page: u32) -> Result<OrderPage, GatewayError> {
        let orders = self
            .orders
            .lock()
            .map_err(|_err| GatewayError::Network("order store poisoned".to_string()))?
            .clone();
        let total = u32::try_from(orders.len()).unwrap_or(u32::MAX);

        Ok(OrderPage {
            orders,
            meta: PageMeta {
                current_page: page,
                last_page: 1,
                total,
            },
        })
    }

    async fn update_profile(&self, _update: &ProfileUpdate) -> Result<User, GatewayError> {
        Err(GatewayError::Rejected {
            status: 401,
            message: Some("Unauthenticated".to_string()),
        })
    }

    async fn list_products(&self) -> Result<Vec<Product>, GatewayError> {
        Ok(self.catalog.available().cloned().collect())
    }

    async fn store_settings(&self) -> Result<RemoteSettings, GatewayError> {
        Ok(RemoteSettings::default())
    }
}

/// Checkout Example
#[tokio::main(flavor = "current_thread")]
#[expect(clippy::print_stdout, reason = "Example code")]
pub async fn main() -> Result<()> {
    tracing_subscriber::registry()
        .with(EnvFilter::try_from_default_env().unwrap_or_else(|_err| EnvFilter::new("info")))
        .with(fmt::layer().compact().with_target(true))
        .init();

    let args = DemoCheckoutArgs::parse();

    let fixture = Fixture::from_set(&args.fixture)?;
    let settings = fixture.settings().delivery();
    let mut cart = fixture.cart(args.n)?;

    let mut selector = OrderTypeSelector::default();
    let eligibility = Eligibility::check(args.coordinates(), &settings);

    selector.reconcile(&eligibility);

    if !selector.select(args.order_type()) {
        println!("Delivery is not available to this address, collecting instead.");
    }

    if let Some(note) = eligibility.note() {
        println!("{note}");
    }

    let mut draft = fixture_draft();
    draft.order_type = selector.order_type();
    draft.payment_method = args.payment_method();
    draft.set_address("14 Mdantsane Road, East London", args.coordinates());

    let stdout = io::stdout();
    let mut handle = stdout.lock();

    Receipt::from_cart(cart.items(), draft.order_type, &settings).write_to(&mut handle)?;

    let gateway = LocalGateway {
        catalog: fixture.catalog(),
        settings,
        orders: Mutex::new(Vec::new()),
    };

    match place_order(&mut cart, &draft, &settings, None, &gateway).await {
        Ok(confirmation) => {
            Receipt::from_order(&confirmation.order).write_to(&mut handle)?;

            for step in Progress::for_order(&confirmation.order).steps() {
                let marker = if step.completed { "●" } else { "○" };

                println!(" {marker} {}", step.label);
            }
        }
        Err(err) => println!("Checkout failed: {}", err.user_message()),
    }

    Ok(())
}

fn fixture_draft() -> CheckoutDraft {
    CheckoutDraft {
        customer_name: "Thandi Mokoena".to_string(),
        phone_number: "082 123 4567".to_string(),
        special_instructions: Some("Extra vinegar on the chips".to_string()),
        ..CheckoutDraft::default()
    }
}
