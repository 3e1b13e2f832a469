//! Fax layouts of the individual dispatch centers, one module each.

pub mod allgaeu;
pub mod amberg;
pub mod ansbach;
pub mod augsburg;
pub mod bayreuth;
pub mod darmstadt_dieburg;
pub mod donau_iller;
pub mod erding;
pub mod fez_muenchen_land;
pub mod ffb;
pub mod ffb_germering;
pub mod gera;
pub mod ingolstadt;
pub mod kaiserslautern;
pub mod kleve;
pub mod kreuznach;
pub mod limburg;
pub mod ludwigsburg;
pub mod magdeburg;
pub mod mansfeld_suedharz;
pub mod nuernberg;
pub mod offenbach;
pub mod passau;
pub mod regensburg;
pub mod rosenheim;
pub mod straubing;
pub mod suedtirol;
pub mod tirol;
pub mod trier;
pub mod wuerzburg;

use super::engine::Layout;

/// Every shipped layout, in registration order.
pub static LAYOUTS: &[&Layout] = &[
    &augsburg::LAYOUT,
    &donau_iller::LAYOUT,
    &allgaeu::LAYOUT,
    &ansbach::LAYOUT,
    &nuernberg::LAYOUT,
    &passau::LAYOUT,
    &erding::LAYOUT,
    &amberg::LAYOUT,
    &bayreuth::LAYOUT,
    &ingolstadt::LAYOUT,
    &regensburg::LAYOUT,
    &rosenheim::LAYOUT,
    &wuerzburg::LAYOUT,
    &magdeburg::LAYOUT,
    &tirol::LAYOUT,
    &kreuznach::LAYOUT,
    &fez_muenchen_land::LAYOUT,
    &ffb::LAYOUT,
    &trier::LAYOUT,
    &darmstadt_dieburg::LAYOUT,
    &gera::LAYOUT,
    &ludwigsburg::LAYOUT,
    &limburg::LAYOUT,
    &suedtirol::LAYOUT,
    &offenbach::LAYOUT,
    &kleve::LAYOUT,
    &mansfeld_suedharz::LAYOUT,
    &kaiserslautern::LAYOUT,
    &straubing::LAYOUT,
    &ffb_germering::LAYOUT,
];

#[cfg(test)]
pub(crate) mod test_support {
    use chrono::{NaiveDate, NaiveDateTime};

    use crate::fax::engine::{Layout, LayoutParser};
    use crate::fax::{ExtractionResult, FaxParser};

    /// Ingestion time used by all layout tests.
    pub fn received() -> NaiveDateTime {
        at(2020, 3, 5, 14, 40)
    }

    pub fn at(year: i32, month: u32, day: u32, hour: u32, minute: u32) -> NaiveDateTime {
        NaiveDate::from_ymd_opt(year, month, day)
            .unwrap()
            .and_hms_opt(hour, minute, 0)
            .unwrap()
    }

    pub fn parse(layout: &'static Layout, lines: &[&str]) -> ExtractionResult {
        LayoutParser::new(layout).parse_at(lines, received())
    }
}
