use std::io::{self, Write};

use surplus_engine::{Notifier, NotifyError, OfferNotice};

const HIGHLIGHT: &str = "\x1b[1;32m";
const RESET: &str = "\x1b[0m";

/// Alerts on the terminal: a bell and a highlighted notice block.
pub(crate) struct ConsoleNotifier {
    bell: bool,
}

impl ConsoleNotifier {
    pub fn new(bell: bool) -> Self {
        Self { bell }
    }

    fn write_notice(&self, out: &mut impl Write, notice: &OfferNotice) -> io::Result<()> {
        if self.bell {
            write!(out, "\x07")?;
        }
        writeln!(out, "{HIGHLIGHT}*** {} ***{RESET}", notice.title)?;
        for line in notice.body().lines() {
            writeln!(out, "    {line}")?;
        }
        out.flush()
    }
}

impl Notifier for ConsoleNotifier {
    fn notify(&self, notice: &OfferNotice) -> Result<(), NotifyError> {
        let mut out = io::stdout().lock();
        self.write_notice(&mut out, notice)
            .map_err(|err| NotifyError(err.to_string()))
    }
}

#[cfg(test)]
mod tests {
    use surplus_core::{Offer, OfferId, Price};

    use super::*;

    #[test]
    fn notice_block_has_title_vendor_and_price() {
        let offer = Offer {
            id: OfferId::new("9"),
            vendor_name: "Green Bakery".to_string(),
            address: None,
            price: Price::new(1299, "PLN"),
            quantity_available: 1,
            pickup_window: None,
            distance_km: 0.4,
        };
        let mut out = Vec::new();
        ConsoleNotifier::new(false)
            .write_notice(&mut out, &OfferNotice::for_offer(&offer))
            .unwrap();

        let text = String::from_utf8(out).unwrap();
        assert!(text.contains("*** New surplus offer! ***"));
        assert!(text.contains("    Green Bakery\n"));
        assert!(text.contains("    Price: 12.99 PLN\n"));
        assert!(!text.starts_with('\x07'));
    }
}
