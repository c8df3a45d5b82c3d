//! Receipt
//!
//! Plain-text order summaries for the terminal.

use std::io;

use smallvec::{SmallVec, smallvec};
use tabled::{
    builder::Builder,
    grid::config::HorizontalLine,
    settings::{
        Alignment, Color, Style, Theme,
        object::{Columns, Rows},
    },
};
use thiserror::Error;

use crate::{
    checkout::OrderType,
    items::LineItem,
    orders::ApiOrder,
    prices::Price,
    pricing::Totals,
    settings::DeliverySettings,
};

/// Errors that can occur when writing a receipt.
#[derive(Debug, Error)]
pub enum ReceiptError {
    /// IO error
    #[error("IO error")]
    IO,
}

/// A receipt line.
#[derive(Debug, Clone, PartialEq)]
pub struct ReceiptLine {
    /// Product name
    pub name: String,

    /// Size label
    pub size: String,

    /// Number of units
    pub quantity: u32,

    /// Price of one unit
    pub unit_price: Price,

    /// Price of the whole line
    pub line_total: Price,

    /// Names of the selected add-ons
    pub addons: SmallVec<[String; 4]>,
}

/// A priced order, ready to be printed.
#[derive(Debug, Clone, PartialEq)]
pub struct Receipt {
    title: Option<String>,
    lines: Vec<ReceiptLine>,
    subtotal: Price,
    delivery_fee: Price,
    total: Price,
}

impl Receipt {
    /// Receipt for the cart as it would be checked out.
    pub fn from_cart(items: &[LineItem], order_type: OrderType, settings: &DeliverySettings) -> Self {
        let totals = Totals::for_checkout(items, order_type, settings);

        let lines = items
            .iter()
            .map(|item| ReceiptLine {
                name: item.name.clone(),
                size: item.size.label().to_string(),
                quantity: item.quantity.get(),
                unit_price: item.unit_price,
                line_total: item.line_total(),
                addons: item.addons.iter().map(|addon| addon.name.clone()).collect(),
            })
            .collect();

        Self {
            title: Some(format!("{} order", order_type.label())),
            lines,
            subtotal: totals.subtotal,
            delivery_fee: totals.delivery_fee,
            total: totals.total,
        }
    }

    /// Receipt for an order placed with the server, using the server's figures.
    pub fn from_order(order: &ApiOrder) -> Self {
        let lines = order
            .items
            .iter()
            .map(|item| ReceiptLine {
                name: item.product_name.clone(),
                size: capitalise(&item.size),
                quantity: item.quantity,
                unit_price: item.unit_price,
                line_total: item.total_price,
                addons: smallvec![],
            })
            .collect();

        Self {
            title: Some(format!("Order {} ({})", order.order_number, order.status_label)),
            lines,
            subtotal: order.subtotal,
            delivery_fee: order.delivery_fee,
            total: order.total,
        }
    }

    /// The receipt lines.
    pub fn lines(&self) -> &[ReceiptLine] {
        &self.lines
    }

    /// Sum of line totals.
    pub fn subtotal(&self) -> Price {
        self.subtotal
    }

    /// Delivery fee charged.
    pub fn delivery_fee(&self) -> Price {
        self.delivery_fee
    }

    /// Amount payable.
    pub fn total(&self) -> Price {
        self.total
    }

    /// Write the receipt as a table followed by the totals.
    ///
    /// # Errors
    ///
    /// Returns [`ReceiptError::IO`] if writing fails.
    pub fn write_to(&self, mut out: impl io::Write) -> Result<(), ReceiptError> {
        if let Some(title) = &self.title {
            writeln!(out, "\n {title}").map_err(|_err| ReceiptError::IO)?;
        }

        let mut builder = Builder::default();
        builder.push_record(["#", "Item", "Size", "Qty", "Unit", "Total"]);

        let mut addon_rows: SmallVec<[usize; 16]> = smallvec![];
        let mut row = 1;

        for (idx, line) in self.lines.iter().enumerate() {
            builder.push_record([
                format!("#{:<3}", idx + 1),
                line.name.clone(),
                line.size.clone(),
                line.quantity.to_string(),
                line.unit_price.to_string(),
                line.line_total.to_string(),
            ]);
            row += 1;

            for addon in &line.addons {
                builder.push_record([
                    String::new(),
                    format!("  + {addon}"),
                    String::new(),
                    String::new(),
                    String::new(),
                    String::new(),
                ]);
                addon_rows.push(row);
                row += 1;
            }
        }

        write_receipt_table(&mut out, builder, &addon_rows)?;

        write_receipt_summary(&mut out, self)
    }
}

fn write_receipt_table(
    out: &mut impl io::Write,
    builder: Builder,
    addon_rows: &[usize],
) -> Result<(), ReceiptError> {
    let mut table = builder.build();
    let mut theme = Theme::from(Style::modern_rounded());
    let separator = HorizontalLine::new(Some('─'), Some('┼'), Some('├'), Some('┤'));

    theme.remove_horizontal_lines();
    theme.insert_horizontal_line(1, separator);

    table.with(theme);
    table.modify(Rows::first(), Color::BOLD);
    table.modify(Columns::new(3..6), Alignment::right());

    for &row in addon_rows {
        table.modify((row, 1), color_dark_grey());
    }

    writeln!(out, "{table}").map_err(|_err| ReceiptError::IO)
}

fn write_receipt_summary(out: &mut impl io::Write, receipt: &Receipt) -> Result<(), ReceiptError> {
    let rows = [
        (" Subtotal:", receipt.subtotal.to_string()),
        (" Delivery:", receipt.delivery_fee.to_string()),
        (" Total:", receipt.total.to_money().to_string()),
    ];

    let label_width = rows.iter().map(|(label, _)| label.len()).max().unwrap_or(0);
    let value_width = rows.iter().map(|(_, value)| value.len()).max().unwrap_or(0);

    for (label, value) in &rows {
        writeln!(out, "{label:>label_width$}  {value:>value_width$}  ")
            .map_err(|_err| ReceiptError::IO)?;
    }

    writeln!(out).map_err(|_err| ReceiptError::IO)
}

fn color_dark_grey() -> Color {
    Color::new("\x1b[90m", "\x1b[0m")
}

fn capitalise(label: &str) -> String {
    let mut chars = label.chars();

    chars.next().map_or_else(String::new, |first| {
        first.to_uppercase().chain(chars).collect()
    })
}
