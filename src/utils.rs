//! Utils

use clap::Parser;

use crate::{
    checkout::{OrderType, PaymentMethod},
    delivery::Coordinates,
};

/// Arguments for the checkout demo
#[derive(Debug, Parser)]
pub struct DemoCheckoutArgs {
    /// Number of fixture selections to add to the cart
    #[clap(short, long)]
    pub n: Option<usize>,

    /// Fixture set to use for the menu, cart & settings
    #[clap(short, long, default_value = "kasi")]
    pub fixture: String,

    /// Collect from the store instead of delivering
    #[clap(short, long)]
    pub collect: bool,

    /// Pay by card instead of cash
    #[clap(long)]
    pub card: bool,

    /// Delivery address latitude
    #[clap(long, allow_hyphen_values = true, requires = "lng")]
    pub lat: Option<f64>,

    /// Delivery address longitude
    #[clap(long, allow_hyphen_values = true, requires = "lat")]
    pub lng: Option<f64>,
}

impl DemoCheckoutArgs {
    /// Order type requested on the command line.
    pub fn order_type(&self) -> OrderType {
        if self.collect {
            OrderType::Collection
        } else {
            OrderType::Delivery
        }
    }

    /// Payment method requested on the command line.
    pub fn payment_method(&self) -> PaymentMethod {
        if self.card {
            PaymentMethod::Card
        } else {
            PaymentMethod::Cash
        }
    }

    /// Delivery coordinates, when both were given.
    pub fn coordinates(&self) -> Option<Coordinates> {
        Coordinates::from_parts(self.lat, self.lng)
    }
}

#[cfg(test)]
mod tests {
    use testresult::TestResult;

    use super::*;

    #[test]
    fn parses_demo_arguments() -> TestResult {
        let args = DemoCheckoutArgs::try_parse_from([
            "checkout", "-n", "2", "--collect", "--lat", "-33.01", "--lng", "27.86",
        ])?;

        assert_eq!(args.n, Some(2));
        assert_eq!(args.fixture, "kasi");
        assert_eq!(args.order_type(), OrderType::Collection);
        assert_eq!(args.payment_method(), PaymentMethod::Cash);
        assert_eq!(args.coordinates(), Some(Coordinates::new(-33.01, 27.86)));

        Ok(())
    }

    #[test]
    fn latitude_requires_longitude() {
        assert!(DemoCheckoutArgs::try_parse_from(["checkout", "--lat", "-33.01"]).is_err());
    }
}
